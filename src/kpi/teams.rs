use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::chart::{HeatmapCell, heatmap};
use crate::record::TeamRecord;

/// Availability label → score. Labels are matched exactly; unknown labels
/// score 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityScale(IndexMap<String, f64>);

impl Default for AvailabilityScale {
    fn default() -> Self {
        Self(IndexMap::from([
            ("Disponible".to_string(), 2.0),
            ("Partielle".to_string(), 1.0),
            ("Occupée".to_string(), 0.0),
        ]))
    }
}

impl AvailabilityScale {
    pub fn score(
        &self,
        label: Option<&str>,
    ) -> f64 {
        label
            .and_then(|label| self.0.get(label))
            .copied()
            .filter(|score| score.is_finite())
            .unwrap_or(0.0)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, score)| (label.as_str(), *score))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamKpis {
    /// Distinct team names; also the number of rows per day.
    pub team_count: usize,
    pub availability: Vec<HeatmapCell>,
    pub work_hours: Vec<HeatmapCell>,
    pub staff: Vec<HeatmapCell>,
}

impl TeamKpis {
    pub fn compute(
        records: &[TeamRecord],
        scale: &AvailabilityScale,
    ) -> Self {
        let team_count = distinct_teams(records);
        Self {
            team_count,
            availability: heatmap(records, team_count, |team| {
                scale.score(team.availability.as_deref())
            }),
            work_hours: heatmap(records, team_count, TeamRecord::hours_worked),
            staff: heatmap(records, team_count, TeamRecord::staff),
        }
    }

    pub fn day_count(&self) -> usize {
        self.availability
            .iter()
            .map(|cell| cell.x)
            .collect::<IndexSet<_>>()
            .len()
    }
}

fn distinct_teams(records: &[TeamRecord]) -> usize {
    records
        .iter()
        .map(TeamRecord::name_label)
        .collect::<IndexSet<_>>()
        .len()
}
