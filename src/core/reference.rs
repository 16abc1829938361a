use std::sync::OnceLock;

use thiserror::Error;

use super::types::ReferenceRow;

const EMBEDDED_TABLE: &str = include_str!("../../data/reference_table.json");

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to parse reference table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("reference table is empty")]
    Empty,
    #[error("reference years must be strictly ascending ({previous} then {year})")]
    OutOfOrder { previous: i32, year: i32 },
    #[error("reference row {year} is invalid: {reason}")]
    InvalidRow { year: i32, reason: &'static str },
}

/// Per-year taxable maximums and wage-index factors, ascending by year.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
    pub fn from_rows(rows: Vec<ReferenceRow>) -> Result<Self, ReferenceError> {
        if rows.is_empty() {
            return Err(ReferenceError::Empty);
        }
        for row in &rows {
            validate_row(row)?;
        }
        for pair in rows.windows(2) {
            if pair[1].year <= pair[0].year {
                return Err(ReferenceError::OutOfOrder {
                    previous: pair[0].year,
                    year: pair[1].year,
                });
            }
        }
        Ok(Self { rows })
    }

    pub fn from_json(json: &str) -> Result<Self, ReferenceError> {
        let rows: Vec<ReferenceRow> = serde_json::from_str(json)?;
        Self::from_rows(rows)
    }

    /// The table compiled into the binary, parsed on first use.
    pub fn embedded() -> Result<&'static ReferenceTable, &'static ReferenceError> {
        static TABLE: OnceLock<Result<ReferenceTable, ReferenceError>> = OnceLock::new();
        TABLE
            .get_or_init(|| Self::from_json(EMBEDDED_TABLE))
            .as_ref()
    }

    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> &ReferenceRow {
        &self.rows[0]
    }

    pub fn last(&self) -> &ReferenceRow {
        &self.rows[self.rows.len() - 1]
    }

    /// Top of the earnings chart: a little headroom above the latest cap.
    pub fn earnings_ceiling(&self) -> f64 {
        self.last().cap * 1.05
    }
}

fn validate_row(row: &ReferenceRow) -> Result<(), ReferenceError> {
    let invalid = |reason: &'static str| ReferenceError::InvalidRow {
        year: row.year,
        reason,
    };
    if !row.cap.is_finite() || row.cap < 0.0 {
        return Err(invalid("cap must be finite and >= 0"));
    }
    if !row.index.is_finite() || row.index <= 0.0 {
        return Err(invalid("index must be finite and > 0"));
    }
    if !row.awi.is_finite() {
        return Err(invalid("awi must be finite"));
    }
    Ok(())
}
