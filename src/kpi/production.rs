use serde::Serialize;

use super::{
    KpiTile, ProductionStatusCounts, StatusLabels, argmax_group, average, ratio, sum,
};
use crate::aggregate::{financials_by, group_sum, value_occurrences};
use crate::chart::{FinancialSeries, NamedValue, financial_series, named_values};
use crate::record::ProductionRecord;

/// How many production runs produced exactly `quantity` units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct QuantityOccurrence {
    pub quantity: f64,
    pub runs: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductionKpis {
    pub record_count: usize,
    pub total_quantity: f64,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub average_time_per_unit: f64,
    pub average_cost_per_unit: f64,
    pub average_unit_price: f64,
    pub most_produced: Option<String>,
    pub quantity_by_product: Vec<NamedValue>,
    /// Mean of the per-product totals; drawn as the reference line of the
    /// quantity histogram.
    pub average_product_quantity: f64,
    pub quantity_occurrences: Vec<QuantityOccurrence>,
    pub financials: FinancialSeries,
    pub status: ProductionStatusCounts,
}

impl ProductionKpis {
    pub fn compute(
        records: &[ProductionRecord],
        labels: &StatusLabels,
    ) -> Self {
        let total_quantity = sum(records, ProductionRecord::quantity);
        let total_cost = sum(records, ProductionRecord::production_cost);
        let total_time = sum(records, ProductionRecord::production_time);

        let by_product = group_sum(
            records,
            ProductionRecord::product_label,
            ProductionRecord::quantity,
        );
        let financials = financials_by(
            records,
            ProductionRecord::product_label,
            ProductionRecord::production_cost,
            ProductionRecord::revenue,
        );

        Self {
            record_count: records.len(),
            total_quantity,
            total_cost,
            total_revenue: sum(records, ProductionRecord::revenue),
            average_time_per_unit: ratio(total_time, total_quantity),
            average_cost_per_unit: ratio(total_cost, total_quantity),
            average_unit_price: average(records, ProductionRecord::unit_price),
            most_produced: argmax_group(&by_product).map(str::to_string),
            average_product_quantity: ratio(
                by_product.values().sum(),
                by_product.len() as f64,
            ),
            quantity_by_product: named_values(&by_product),
            quantity_occurrences: value_occurrences(records, ProductionRecord::quantity)
                .into_iter()
                .map(|(quantity, runs)| QuantityOccurrence { quantity, runs })
                .collect(),
            financials: financial_series(&financials),
            status: ProductionStatusCounts::tally(records, labels),
        }
    }

    pub fn status_chart(&self) -> Vec<NamedValue> {
        self.status.chart()
    }

    pub fn most_produced_tile(&self) -> KpiTile {
        KpiTile::text(
            "Produit le plus fabriqué",
            self.most_produced.clone().unwrap_or_default(),
        )
    }

    pub fn headline_tiles(&self) -> Vec<KpiTile> {
        vec![
            self.most_produced_tile(),
            KpiTile::euros("Coût total de production", self.total_cost),
            KpiTile::euros("Revenu estimé total", self.total_revenue),
        ]
    }

    pub fn detail_tiles(&self) -> Vec<KpiTile> {
        vec![
            KpiTile::hours(
                "Temps moyen de production / unité",
                self.average_time_per_unit,
            ),
            KpiTile::euros(
                "Coût moyen de production / unité",
                self.average_cost_per_unit,
            ),
            KpiTile::euros("Prix moyen de vente / unité", self.average_unit_price),
        ]
    }
}
