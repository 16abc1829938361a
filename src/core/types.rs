use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user-placed `(year, earnings)` anchor of the earnings curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub id: String,
    pub year: i32,
    pub earnings: f64,
}

impl ControlPoint {
    pub fn new(id: impl Into<String>, year: i32, earnings: f64) -> Self {
        Self {
            id: id.into(),
            year,
            earnings,
        }
    }
}

/// One static row of the reference table: the statutory cap, the index factor
/// and the average wage index for a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRow {
    pub year: i32,
    pub cap: f64,
    pub index: f64,
    pub awi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedDatum {
    pub year: i32,
    pub cap: f64,
    pub index: f64,
    pub awi: f64,
    pub earnings: f64,
    pub earnings_capped: f64,
    pub earnings_adjusted: f64,
    pub counted: bool,
}

/// Output of the full pipeline for one control point set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    /// Ascending by year, one entry per reference row.
    pub data: Vec<AnnotatedDatum>,
    pub average_indexed_earnings: f64,
    pub benefit: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("at least 2 control points are required, got {0}")]
    TooFewControlPoints(usize),
    #[error("control point id {0} is used more than once")]
    DuplicateId(String),
    #[error("control point {id} has invalid earnings {earnings}")]
    InvalidEarnings { id: String, earnings: f64 },
}
