use serde::Serialize;

use super::{KpiTile, OrderStatusCounts, StatusLabels, argmax_group, sum};
use crate::aggregate::{group_count, group_sum};
use crate::chart::{NamedValue, named_values};
use crate::record::OrderRecord;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OrderKpis {
    pub order_count: usize,
    pub total_quantity: f64,
    pub quantity_by_client: Vec<NamedValue>,
    /// Client with the most orders, not the largest ordered quantity.
    pub top_client: Option<String>,
    pub status: OrderStatusCounts,
}

impl OrderKpis {
    pub fn compute(
        records: &[OrderRecord],
        labels: &StatusLabels,
    ) -> Self {
        let quantity_by_client =
            group_sum(records, OrderRecord::client_label, OrderRecord::quantity);
        let orders_by_client = group_count(records, OrderRecord::client_label);

        Self {
            order_count: records.len(),
            total_quantity: sum(records, OrderRecord::quantity),
            quantity_by_client: named_values(&quantity_by_client),
            top_client: argmax_group(&orders_by_client).map(str::to_string),
            status: OrderStatusCounts::tally(records, labels),
        }
    }

    pub fn status_chart(&self) -> Vec<NamedValue> {
        self.status.chart()
    }

    pub fn top_client_tile(&self) -> KpiTile {
        KpiTile::text(
            "Meilleur client (par commande)",
            self.top_client.clone().unwrap_or_default(),
        )
    }

    pub fn total_quantity_tile(&self) -> KpiTile {
        KpiTile::number("Quantité totale commandée", self.total_quantity)
    }
}
