use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Landing,
    SetEarnings,
    CapEarnings,
    Indexing,
    TopYears,
    Average,
    DeriveBenefit,
    Notes,
}

/// Which per-year value the earnings chart draws as bars.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Series {
    Earnings,
    Capped,
    Adjusted,
    Counted,
}

const STAGES: [Stage; 8] = [
    Stage::Landing,
    Stage::SetEarnings,
    Stage::CapEarnings,
    Stage::Indexing,
    Stage::TopYears,
    Stage::Average,
    Stage::DeriveBenefit,
    Stage::Notes,
];

impl Stage {
    pub fn title(self) -> &'static str {
        match self {
            Stage::Landing => "Social Security retirement benefits explained visually",
            Stage::SetEarnings => "Set earnings",
            Stage::CapEarnings => "Cap earnings",
            Stage::Indexing => "Indexing",
            Stage::TopYears => "Top 35 years",
            Stage::Average => "Average",
            Stage::DeriveBenefit => "Derive benefit",
            Stage::Notes => "Notes",
        }
    }

    pub fn series(self) -> Series {
        match self {
            Stage::Landing | Stage::SetEarnings => Series::Earnings,
            Stage::CapEarnings => Series::Capped,
            Stage::Indexing => Series::Adjusted,
            Stage::TopYears | Stage::Average | Stage::DeriveBenefit | Stage::Notes => {
                Series::Counted
            }
        }
    }
}

/// Position in the guided narrative: 0 is the landing page, `LAST` the notes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Step(u8);

impl Step {
    pub const FIRST: Step = Step(0);
    pub const LAST: Step = Step(STAGES.len() as u8 - 1);

    /// Out-of-range values clamp to the nearest end.
    pub fn clamped(value: i64) -> Self {
        Step(value.clamp(0, i64::from(Self::LAST.0)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn stage(self) -> Stage {
        STAGES[usize::from(self.0)]
    }

    pub fn forward(self) -> Self {
        Step((self.0 + 1).min(Self::LAST.0))
    }

    pub fn backward(self) -> Self {
        Step(self.0.saturating_sub(1))
    }

    /// Narrative progress as shown in the progress bar ("Step n/7").
    pub fn progress(self) -> (u8, u8) {
        (self.0, Self::LAST.0)
    }
}
