use super::controls::ControlPointSet;
use super::types::{ControlPoint, PipelineError};

#[derive(Debug, Clone, Copy)]
struct Knot {
    year: i32,
    earnings: f64,
}

/// Earnings as a function of year, passing through every control point and
/// growing at a constant percentage rate between neighbouring points.
#[derive(Debug, Clone)]
pub struct EarningsCurve {
    knots: Vec<Knot>,
}

impl EarningsCurve {
    pub fn new(points: &[ControlPoint]) -> Result<Self, PipelineError> {
        if points.len() < 2 {
            return Err(PipelineError::TooFewControlPoints(points.len()));
        }
        let mut knots: Vec<Knot> = points
            .iter()
            .map(|p| Knot {
                year: p.year,
                earnings: p.earnings,
            })
            .collect();
        // Stable: equal years keep insertion order.
        knots.sort_by_key(|k| k.year);
        Ok(Self { knots })
    }

    pub fn at(&self, year: i32) -> f64 {
        let first = self.knots[0];
        let last = self.knots[self.knots.len() - 1];
        if year <= first.year {
            return first.earnings;
        }
        if year >= last.year {
            return last.earnings;
        }

        // Bisect right over the interior knots, the way a polylinear scale
        // locates the segment containing `year`.
        let upper = self.knots[1..self.knots.len() - 1].partition_point(|k| k.year <= year) + 1;
        let lo = self.knots[upper - 1];
        let hi = self.knots[upper];
        geometric_between(lo, hi, year)
    }
}

impl From<&ControlPointSet> for EarningsCurve {
    fn from(dots: &ControlPointSet) -> Self {
        // The set is already year-ordered and never below two points.
        let knots = dots
            .points()
            .iter()
            .map(|p| Knot {
                year: p.year,
                earnings: p.earnings,
            })
            .collect();
        Self { knots }
    }
}

fn geometric_between(lo: Knot, hi: Knot, year: i32) -> f64 {
    let span = hi.year - lo.year;
    if span == 0 {
        return hi.earnings;
    }
    let t = f64::from(year - lo.year) / f64::from(span);
    if t <= 0.0 {
        return lo.earnings;
    }
    if t >= 1.0 {
        return hi.earnings;
    }
    if lo.earnings <= 0.0 || hi.earnings <= 0.0 {
        return 0.0;
    }
    lo.earnings * (hi.earnings / lo.earnings).powf(t)
}
