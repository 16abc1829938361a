use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::controls::ControlPointSet;
use super::narrative::Step;
use super::reference::ReferenceTable;

/// Shareable UI state: the narrative step and the control points.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    pub step: Step,
    pub dots: ControlPointSet,
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to serialize control points: {0}")]
    Dots(#[from] serde_json::Error),
    #[error("failed to build query string: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawQuery {
    step: Option<String>,
    dots: Option<String>,
}

impl NavigationState {
    pub fn initial(table: &ReferenceTable) -> Self {
        Self {
            step: Step::FIRST,
            dots: ControlPointSet::defaults(table),
        }
    }

    /// Query-string form: `step=<n>&dots=<json array>`.
    pub fn encode(&self) -> Result<String, EncodeError> {
        let dots = serde_json::to_string(&self.dots)?;
        Ok(serde_urlencoded::to_string(&[
            ("step", self.step.value().to_string()),
            ("dots", dots),
        ])?)
    }

    /// Never fails: anything missing or malformed falls back to the initial
    /// step or the default control points.
    pub fn decode(query: &str, table: &ReferenceTable) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let raw = match serde_urlencoded::from_str::<RawQuery>(query) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("unreadable navigation state, using defaults: {e}");
                RawQuery::default()
            }
        };
        Self::from_parts(raw.step.as_deref(), raw.dots.as_deref(), table)
    }

    pub fn from_parts(step: Option<&str>, dots: Option<&str>, table: &ReferenceTable) -> Self {
        Self {
            step: step.map(parse_step).unwrap_or_default(),
            dots: dots
                .and_then(parse_dots)
                .unwrap_or_else(|| ControlPointSet::defaults(table)),
        }
    }
}

fn parse_step(raw: &str) -> Step {
    match raw.trim().parse::<i64>() {
        Ok(value) => Step::clamped(value),
        Err(e) => {
            warn!(raw, "invalid step, using the first step: {e}");
            Step::FIRST
        }
    }
}

fn parse_dots(raw: &str) -> Option<ControlPointSet> {
    match serde_json::from_str::<ControlPointSet>(raw) {
        Ok(dots) => Some(dots),
        Err(e) => {
            warn!("invalid dots, using the default control points: {e}");
            None
        }
    }
}
