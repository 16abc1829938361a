use super::benefit::benefit;
use super::controls::ControlPointSet;
use super::interpolate::EarningsCurve;
use super::reference::ReferenceTable;
use super::types::{AnnotatedDatum, ControlPoint, PipelineError, Projection, ReferenceRow};

/// Number of top years that enter the average. Also the fixed divisor, so a
/// shorter career is averaged as if padded with zero years.
pub const COUNTED_YEARS: usize = 35;

pub fn project(dots: &ControlPointSet, table: &ReferenceTable) -> Projection {
    project_curve(&EarningsCurve::from(dots), table.rows())
}

pub fn project_points(
    points: &[ControlPoint],
    rows: &[ReferenceRow],
) -> Result<Projection, PipelineError> {
    Ok(project_curve(&EarningsCurve::new(points)?, rows))
}

fn project_curve(curve: &EarningsCurve, rows: &[ReferenceRow]) -> Projection {
    let data = annotate(curve, rows);
    let average_indexed_earnings = average_indexed_earnings(&data);
    Projection {
        benefit: benefit(average_indexed_earnings),
        average_indexed_earnings,
        data,
    }
}

pub fn annotate(curve: &EarningsCurve, rows: &[ReferenceRow]) -> Vec<AnnotatedDatum> {
    let mut data: Vec<AnnotatedDatum> = rows
        .iter()
        .map(|row| adjust(row, curve.at(row.year)))
        .collect();
    mark_counted(&mut data);
    data
}

fn adjust(row: &ReferenceRow, earnings: f64) -> AnnotatedDatum {
    let earnings_capped = row.cap.min(earnings);
    AnnotatedDatum {
        year: row.year,
        cap: row.cap,
        index: row.index,
        awi: row.awi,
        earnings,
        earnings_capped,
        earnings_adjusted: earnings_capped * row.index,
        counted: false,
    }
}

/// Flags the `COUNTED_YEARS` highest adjusted years and leaves `data` ascending
/// by year. Ties keep their original (year) order.
pub fn mark_counted(data: &mut [AnnotatedDatum]) {
    data.sort_by(|a, b| b.earnings_adjusted.total_cmp(&a.earnings_adjusted));
    for (rank, datum) in data.iter_mut().enumerate() {
        datum.counted = rank < COUNTED_YEARS;
    }
    data.sort_by_key(|d| d.year);
}

pub fn average_indexed_earnings(data: &[AnnotatedDatum]) -> f64 {
    let total: f64 = data
        .iter()
        .filter(|d| d.counted)
        .map(|d| d.earnings_adjusted)
        .sum();
    total / COUNTED_YEARS as f64
}
