use axum::{
    Router,
    extract::{Json, Query, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::core::{
    AnnotatedDatum, BEND_POINTS, ControlPoint, CurvePoint, EncodeError, NavigationState,
    ReferenceTable, Series, Stage, Step, benefit_curve, chart_ceiling, project,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StateQuery {
    step: Option<String>,
    dots: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum EditAction {
    Add {
        year: f64,
        earnings: f64,
    },
    Move {
        id: String,
        year: f64,
        earnings: f64,
    },
    #[serde(alias = "delete")]
    Remove {
        id: String,
    },
    #[serde(alias = "next")]
    Forward,
    #[serde(alias = "previous")]
    Backward,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditPayload {
    #[serde(default)]
    state: String,
    action: EditAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeResponse {
    step: u8,
    last_step: u8,
    stage: Stage,
    title: &'static str,
    series: Series,
    /// Set by `/api/edit` when the action was refused.
    ignored: bool,
    dots: Vec<ControlPoint>,
    data: Vec<AnnotatedDatum>,
    average_indexed_earnings: f64,
    benefit: f64,
    bend_points: [f64; 4],
    benefit_curve: Vec<CurvePoint>,
    benefit_ceiling: f64,
    earnings_ceiling: f64,
    first_year: i32,
    last_year: i32,
    state: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let table = reference_table()?;
    info!(
        rows = table.len(),
        first_year = table.first().year,
        last_year = table.last().year,
        "reference table loaded"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/reference", get(reference_handler))
        .route("/api/compute", get(compute_get_handler))
        .route("/api/edit", post(edit_post_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("benefit explainer listening on http://{addr}");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

/// Compute the response body for an encoded navigation state, as the CLI's
/// `compute` subcommand prints it.
pub fn compute_json(state: &str, pretty: bool) -> Result<String, String> {
    let table = reference_table().map_err(|e| e.to_string())?;
    let response = build_compute_response(&NavigationState::decode(state, table), table, false)
        .map_err(|e| e.to_string())?;
    let json = if pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    };
    json.map_err(|e| format!("failed to serialize response: {e}"))
}

fn reference_table() -> std::io::Result<&'static ReferenceTable> {
    ReferenceTable::embedded()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn reference_handler() -> Response {
    match reference_table() {
        Ok(table) => json_response(StatusCode::OK, table.rows()),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

async fn compute_get_handler(Query(query): Query<StateQuery>) -> Response {
    let table = match reference_table() {
        Ok(table) => table,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };
    let state = NavigationState::from_parts(query.step.as_deref(), query.dots.as_deref(), table);
    debug!(step = state.step.value(), dots = state.dots.len(), "compute");
    compute_response(build_compute_response(&state, table, false))
}

async fn edit_post_handler(payload: Result<Json<EditPayload>, JsonRejection>) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("Invalid edit payload: {rejection}"),
            );
        }
    };
    let table = match reference_table() {
        Ok(table) => table,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };
    let mut state = NavigationState::decode(&payload.state, table);
    let applied = apply_edit(&mut state, &payload.action);
    debug!(action = ?payload.action, applied, "edit");
    compute_response(build_compute_response(&state, table, !applied))
}

fn compute_response(response: Result<ComputeResponse, EncodeError>) -> Response {
    match response {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

/// Applies one gesture. Returns `false` when it was refused and the state is
/// unchanged.
fn apply_edit(state: &mut NavigationState, action: &EditAction) -> bool {
    match action {
        EditAction::Add { year, earnings } => state.dots.add(*year, *earnings).is_some(),
        EditAction::Move { id, year, earnings } => state.dots.move_point(id, *year, *earnings),
        EditAction::Remove { id } => state.dots.remove(id),
        EditAction::Forward => step_to(&mut state.step, Step::forward),
        EditAction::Backward => step_to(&mut state.step, Step::backward),
    }
}

fn step_to(step: &mut Step, advance: fn(Step) -> Step) -> bool {
    let next = advance(*step);
    let moved = next != *step;
    *step = next;
    moved
}

fn build_compute_response(
    state: &NavigationState,
    table: &ReferenceTable,
    ignored: bool,
) -> Result<ComputeResponse, EncodeError> {
    let encoded = state.encode()?;
    let projection = project(&state.dots, table);
    let stage = state.step.stage();
    let (step, last_step) = state.step.progress();
    Ok(ComputeResponse {
        step,
        last_step,
        stage,
        title: stage.title(),
        series: stage.series(),
        ignored,
        dots: state.dots.points().to_vec(),
        data: projection.data,
        average_indexed_earnings: projection.average_indexed_earnings,
        benefit: projection.benefit,
        bend_points: BEND_POINTS,
        benefit_curve: benefit_curve(),
        benefit_ceiling: chart_ceiling(),
        earnings_ceiling: table.earnings_ceiling(),
        first_year: table.first().year,
        last_year: table.last().year,
        state: encoded,
    })
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
