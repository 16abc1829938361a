use serde::Serialize;

/// Annual bend points of the benefit formula. The last entry only bounds the
/// formula chart; the top bracket rate applies beyond it.
pub const BEND_POINTS: [f64; 4] = [0.0, 885.0 * 12.0, 5336.0 * 12.0, 10_000.0 * 12.0];

/// Marginal replacement rate of each bracket.
pub const BRACKET_RATES: [f64; 3] = [0.90, 0.32, 0.15];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvePoint {
    pub average_indexed_earnings: f64,
    pub benefit: f64,
}

/// Annual benefit for an average indexed earnings amount.
pub fn benefit(average_indexed_earnings: f64) -> f64 {
    let bracket = BEND_POINTS[1..BRACKET_RATES.len()]
        .iter()
        .position(|&bend| average_indexed_earnings <= bend)
        .unwrap_or(BRACKET_RATES.len() - 1);
    bracket_benefit(bracket, average_indexed_earnings)
}

// Each bracket starts from the previous bracket evaluated at its own bend point,
// so the formula cannot jump at a bend.
fn bracket_benefit(bracket: usize, average_indexed_earnings: f64) -> f64 {
    let start = BEND_POINTS[bracket];
    let base = match bracket {
        0 => 0.0,
        _ => bracket_benefit(bracket - 1, start),
    };
    base + BRACKET_RATES[bracket] * (average_indexed_earnings - start)
}

/// The formula sampled at each bend point.
pub fn benefit_curve() -> Vec<CurvePoint> {
    BEND_POINTS
        .iter()
        .map(|&aie| CurvePoint {
            average_indexed_earnings: aie,
            benefit: benefit(aie),
        })
        .collect()
}

pub fn chart_ceiling() -> f64 {
    benefit(BEND_POINTS[BEND_POINTS.len() - 1])
}
