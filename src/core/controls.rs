use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::reference::ReferenceTable;
use super::types::{ControlPoint, PipelineError};

/// Creation gestures below this many dollars are ignored.
pub const CREATE_FLOOR: f64 = 500.0;
/// Drags below this many dollars are ignored.
pub const DRAG_FLOOR: f64 = 100.0;
pub const MIN_POINTS: usize = 2;

/// The user's control points, kept ascending by year. Points sharing a year
/// stay in the order they were placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ControlPoint>", into = "Vec<ControlPoint>")]
pub struct ControlPointSet {
    points: Vec<ControlPoint>,
}

impl ControlPointSet {
    pub fn new(mut points: Vec<ControlPoint>) -> Result<Self, PipelineError> {
        if points.len() < MIN_POINTS {
            return Err(PipelineError::TooFewControlPoints(points.len()));
        }
        if let Some(bad) = points
            .iter()
            .find(|p| !p.earnings.is_finite() || p.earnings < 0.0)
        {
            return Err(PipelineError::InvalidEarnings {
                id: bad.id.clone(),
                earnings: bad.earnings,
            });
        }
        let mut seen = HashSet::with_capacity(points.len());
        if let Some(dup) = points.iter().find(|p| !seen.insert(p.id.as_str())) {
            return Err(PipelineError::DuplicateId(dup.id.clone()));
        }
        points.sort_by_key(|p| p.year);
        Ok(Self { points })
    }

    /// Four points spanning the table: half the cap at each end, with two
    /// mid-career anchors.
    pub fn defaults(table: &ReferenceTable) -> Self {
        let first = table.first();
        let last = table.last();
        let mut points = vec![
            ControlPoint::new("a", first.year, first.cap / 2.0),
            ControlPoint::new("d", 1985, 70_000.0),
            ControlPoint::new("e", 1992, 90_000.0),
            ControlPoint::new("b", last.year, last.cap / 2.0),
        ];
        points.sort_by_key(|p| p.year);
        Self { points }
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ControlPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// Places a new point. Returns its id, or `None` when the earnings are
    /// under `CREATE_FLOOR`.
    pub fn add(&mut self, year: f64, earnings: f64) -> Option<String> {
        let (year, earnings) = snap(year, earnings)?;
        if earnings < CREATE_FLOOR {
            return None;
        }
        let id = self.next_id();
        self.points.push(ControlPoint::new(id.clone(), year, earnings));
        self.points.sort_by_key(|p| p.year);
        Some(id)
    }

    /// Drags an existing point. Returns `false` when nothing changed.
    pub fn move_point(&mut self, id: &str, year: f64, earnings: f64) -> bool {
        let Some((year, earnings)) = snap(year, earnings) else {
            return false;
        };
        if earnings < DRAG_FLOOR {
            return false;
        }
        let Some(point) = self.points.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        point.year = year;
        point.earnings = earnings;
        self.points.sort_by_key(|p| p.year);
        true
    }

    /// Deletes a point unless that would leave fewer than `MIN_POINTS`.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.points.len() <= MIN_POINTS {
            return false;
        }
        match self.points.iter().position(|p| p.id == id) {
            Some(at) => {
                self.points.remove(at);
                true
            }
            None => false,
        }
    }

    fn next_id(&self) -> String {
        let mut n = self.points.len();
        loop {
            let id = format!("dot-{n}");
            if self.get(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }
}

// Gestures arrive in chart coordinates; points live on whole years and dollars.
fn snap(year: f64, earnings: f64) -> Option<(i32, f64)> {
    if !year.is_finite() || !earnings.is_finite() {
        return None;
    }
    let year = year.round();
    if year < f64::from(i32::MIN) || year > f64::from(i32::MAX) {
        return None;
    }
    Some((year as i32, earnings.round()))
}

impl TryFrom<Vec<ControlPoint>> for ControlPointSet {
    type Error = PipelineError;

    fn try_from(points: Vec<ControlPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<ControlPointSet> for Vec<ControlPoint> {
    fn from(set: ControlPointSet) -> Self {
        set.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn pair() -> ControlPointSet {
        ControlPointSet::new(vec![
            ControlPoint::new("a", 1980, 20_000.0),
            ControlPoint::new("b", 2010, 60_000.0),
        ])
        .expect("valid set")
    }

    fn years(set: &ControlPointSet) -> Vec<i32> {
        set.points().iter().map(|p| p.year).collect()
    }

    #[test]
    fn new_rejects_a_single_point() {
        let err = ControlPointSet::new(vec![ControlPoint::new("a", 2000, 1.0)])
            .expect_err("needs two points");
        assert_eq!(err, PipelineError::TooFewControlPoints(1));
    }

    #[test]
    fn new_rejects_negative_earnings() {
        let err = ControlPointSet::new(vec![
            ControlPoint::new("a", 2000, 1.0),
            ControlPoint::new("b", 2001, -5.0),
        ])
        .expect_err("negative earnings");
        assert!(matches!(err, PipelineError::InvalidEarnings { ref id, .. } if id == "b"));
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let err = ControlPointSet::new(vec![
            ControlPoint::new("x", 1970, 10_000.0),
            ControlPoint::new("x", 1990, 30_000.0),
            ControlPoint::new("y", 2010, 50_000.0),
        ])
        .expect_err("duplicate ids");
        assert_eq!(err, PipelineError::DuplicateId("x".to_string()));

        let json = r#"[{"id":"x","year":1970,"earnings":1},{"id":"x","year":1990,"earnings":2},{"id":"y","year":2010,"earnings":3}]"#;
        assert!(serde_json::from_str::<ControlPointSet>(json).is_err());
    }

    #[test]
    fn new_sorts_by_year() {
        let set = ControlPointSet::new(vec![
            ControlPoint::new("late", 2010, 1.0),
            ControlPoint::new("early", 1990, 1.0),
        ])
        .expect("valid set");
        assert_eq!(set.points()[0].id, "early");
    }

    #[test]
    fn defaults_span_the_reference_table() {
        let table = ReferenceTable::embedded().expect("embedded table");
        let set = ControlPointSet::defaults(table);
        assert_eq!(set.len(), 4);
        assert_eq!(years(&set), vec![1961, 1985, 1992, 2016]);
        assert_eq!(set.points()[0].earnings, table.first().cap / 2.0);
        assert_eq!(set.points()[3].earnings, table.last().cap / 2.0);
    }

    #[test]
    fn remove_refuses_to_go_below_two_points() {
        let mut set = pair();
        assert!(!set.remove("a"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_down_to_two_then_refuse() {
        let mut set = pair();
        let id = set.add(1995.0, 40_000.0).expect("added");
        assert!(set.remove(&id));
        assert!(!set.remove("b"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let mut set = pair();
        set.add(1995.0, 40_000.0).expect("added");
        assert!(!set.remove("missing"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn add_ignores_earnings_below_the_floor() {
        let mut set = pair();
        assert_eq!(set.add(1995.0, 499.0), None);
        assert_eq!(set.len(), 2);
        assert!(set.add(1995.0, 500.0).is_some());
    }

    #[test]
    fn add_keeps_year_order_and_rounds() {
        let mut set = pair();
        let id = set.add(1994.6, 41_234.4).expect("added");
        assert_eq!(years(&set), vec![1980, 1995, 2010]);
        let point = set.get(&id).expect("present");
        assert_eq!(point.earnings, 41_234.0);
    }

    #[test]
    fn add_assigns_unique_ids() {
        let mut set = pair();
        let first = set.add(1990.0, 1_000.0).expect("added");
        let second = set.add(1991.0, 1_000.0).expect("added");
        assert_ne!(first, second);
        set.remove(&first);
        let third = set.add(1992.0, 1_000.0).expect("added");
        assert_ne!(third, second);
    }

    #[test]
    fn move_ignores_drags_below_the_floor() {
        let mut set = pair();
        assert!(!set.move_point("a", 1985.0, 99.0));
        assert_eq!(set.get("a").expect("present").year, 1980);
        assert!(set.move_point("a", 1985.0, 100.0));
        assert_eq!(set.get("a").expect("present").earnings, 100.0);
    }

    #[test]
    fn move_reorders_when_crossing_a_neighbour() {
        let mut set = pair();
        assert!(set.move_point("a", 2020.0, 30_000.0));
        assert_eq!(set.points()[0].id, "b");
        assert!(!set.move_point("missing", 2000.0, 30_000.0));
    }

    #[test]
    fn deserializes_from_a_json_array() {
        let json = r#"[{"id":"x","year":2001,"earnings":5},{"id":"y","year":1999,"earnings":7}]"#;
        let set: ControlPointSet = serde_json::from_str(json).expect("valid json");
        assert_eq!(set.points()[0].id, "y");
        let single = r#"[{"id":"x","year":2001,"earnings":5}]"#;
        assert!(serde_json::from_str::<ControlPointSet>(single).is_err());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_edits_never_break_set_invariants(
            ops in vec((0u8..3, 1950u32..2030, 0u32..150_000, 0usize..8), 1..40)
        ) {
            let mut set = pair();
            for (kind, year, earnings, pick) in ops {
                let id = set.points()[pick % set.len()].id.clone();
                match kind {
                    0 => {
                        set.add(year as f64, earnings as f64);
                    }
                    1 => {
                        set.move_point(&id, year as f64, earnings as f64);
                    }
                    _ => {
                        set.remove(&id);
                    }
                }
                prop_assert!(set.len() >= MIN_POINTS);
                prop_assert!(set.points().windows(2).all(|w| w[0].year <= w[1].year));
                let mut ids: Vec<&str> = set.points().iter().map(|p| p.id.as_str()).collect();
                ids.sort_unstable();
                ids.dedup();
                prop_assert_eq!(ids.len(), set.len());
            }
        }
    }
}
