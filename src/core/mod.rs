mod benefit;
mod controls;
mod engine;
mod interpolate;
mod narrative;
mod reference;
mod state;
mod types;

pub use benefit::{BEND_POINTS, BRACKET_RATES, CurvePoint, benefit, benefit_curve, chart_ceiling};
pub use controls::{CREATE_FLOOR, ControlPointSet, DRAG_FLOOR, MIN_POINTS};
pub use engine::{COUNTED_YEARS, average_indexed_earnings, mark_counted, project, project_points};
pub use interpolate::EarningsCurve;
pub use narrative::{Series, Stage, Step};
pub use reference::{ReferenceError, ReferenceTable};
pub use state::{EncodeError, NavigationState};
pub use types::{AnnotatedDatum, ControlPoint, PipelineError, Projection, ReferenceRow};
