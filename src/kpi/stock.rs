use serde::Serialize;

use super::{KpiTile, sum};
use crate::aggregate::{MaterialLocationGrid, group_sum};
use crate::chart::{
    MaterialTotal, NamedValue, StackedBarRow, material_totals, named_values, sort_by_name,
    stacked_rows,
};
use crate::record::StockRecord;

/// Stock views; every series is sorted by name for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockKpis {
    pub total_quantity: f64,
    pub by_location: Vec<NamedValue>,
    pub by_material: Vec<StackedBarRow>,
    pub locations: Vec<String>,
    pub material_totals: Vec<MaterialTotal>,
}

impl StockKpis {
    pub fn compute(records: &[StockRecord]) -> Self {
        let mut by_location = named_values(&group_sum(
            records,
            StockRecord::location_label,
            StockRecord::available_quantity,
        ));
        sort_by_name(&mut by_location);

        let grid = MaterialLocationGrid::from_records(
            records,
            StockRecord::material_label,
            StockRecord::location_label,
            StockRecord::available_quantity,
        );

        Self {
            total_quantity: sum(records, StockRecord::available_quantity),
            by_location,
            by_material: stacked_rows(&grid),
            locations: grid.sorted_locations(),
            material_totals: material_totals(&grid),
        }
    }

    pub fn total_tile(&self) -> KpiTile {
        KpiTile::number("Quantité totale en stock", self.total_quantity)
    }
}
