use indexmap::IndexMap;
use serde::Serialize;

use crate::aggregate::{FinancialTotals, GroupTotals, MaterialLocationGrid};
use crate::record::TeamRecord;

/// One pie slice or bar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

impl NamedValue {
    pub fn new(
        name: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Heat map cell: `x` is the day, `y` the team.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub x: i64,
    pub y: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub idx: usize,
    pub y: f64,
    pub name: String,
}

/// Cost, revenue and gain per group. Position `i` of every series describes
/// the same group and carries `idx == i`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FinancialSeries {
    pub costs: Vec<ScatterPoint>,
    pub revenues: Vec<ScatterPoint>,
    pub gains: Vec<ScatterPoint>,
}

impl FinancialSeries {
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// `(cost, revenue, gain)` of the group at `idx`.
    pub fn lookup(
        &self,
        idx: usize,
    ) -> Option<(f64, f64, f64)> {
        let find = |series: &[ScatterPoint]| {
            series
                .iter()
                .find(|point| point.idx == idx)
                .map(|point| point.y)
        };
        Some((
            find(&self.costs)?,
            find(&self.revenues)?,
            find(&self.gains)?,
        ))
    }

    pub fn name(
        &self,
        idx: usize,
    ) -> Option<&str> {
        self.costs
            .iter()
            .find(|point| point.idx == idx)
            .map(|point| point.name.as_str())
    }
}

/// One stacked bar: the material plus a value for every observed location.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StackedBarRow {
    pub label: String,
    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MaterialTotal {
    pub label: String,
    #[serde(rename = "totalQuantity")]
    pub total_quantity: f64,
}

pub fn named_values(groups: &GroupTotals) -> Vec<NamedValue> {
    groups
        .iter()
        .map(|(name, value)| NamedValue::new(name.as_str(), *value))
        .collect()
}

pub fn sort_by_name(values: &mut [NamedValue]) {
    values.sort_by(|left, right| left.name.cmp(&right.name));
}

pub fn financial_series(totals: &FinancialTotals) -> FinancialSeries {
    let mut series = FinancialSeries::default();
    for (idx, (name, financials)) in totals.iter().enumerate() {
        let point = |y| ScatterPoint {
            idx,
            y,
            name: name.clone(),
        };
        series.costs.push(point(financials.cost));
        series.revenues.push(point(financials.revenue));
        series.gains.push(point(financials.gain()));
    }
    series
}

pub fn heatmap(
    teams: &[TeamRecord],
    team_count: usize,
    value: impl Fn(&TeamRecord) -> f64,
) -> Vec<HeatmapCell> {
    teams
        .iter()
        .map(|team| HeatmapCell {
            x: team.day(team_count),
            y: team.name_label().to_string(),
            value: value(team),
        })
        .collect()
}

/// Rows sorted by material, columns by location name.
pub fn stacked_rows(grid: &MaterialLocationGrid) -> Vec<StackedBarRow> {
    let locations = grid.sorted_locations();
    let mut rows: Vec<StackedBarRow> = grid
        .materials()
        .map(|material| StackedBarRow {
            label: material.to_string(),
            values: locations
                .iter()
                .map(|location| (location.clone(), grid.quantity(material, location)))
                .collect(),
        })
        .collect();
    rows.sort_by(|left, right| left.label.cmp(&right.label));
    rows
}

pub fn material_totals(grid: &MaterialLocationGrid) -> Vec<MaterialTotal> {
    let mut totals: Vec<MaterialTotal> = grid
        .totals()
        .iter()
        .map(|(label, total)| MaterialTotal {
            label: label.clone(),
            total_quantity: *total,
        })
        .collect();
    totals.sort_by(|left, right| left.label.cmp(&right.label));
    totals
}
