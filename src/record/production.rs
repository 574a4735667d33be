use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{OrderRecord, Record, lenient};
use crate::normalize;

/// One row of `/productions/flat`; `/productions` also nests the order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    #[serde(rename = "id_production", default, deserialize_with = "lenient::integer")]
    pub id: Option<i64>,
    #[serde(rename = "date_production", default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(rename = "produit", default, deserialize_with = "lenient::text")]
    pub product: Option<String>,
    #[serde(rename = "quantite", default, deserialize_with = "lenient::float")]
    pub quantity: Option<f64>,
    #[serde(rename = "statut", default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(rename = "prix_unitaire", default, deserialize_with = "lenient::float")]
    pub unit_price: Option<f64>,
    #[serde(rename = "cout_production", default, deserialize_with = "lenient::float")]
    pub production_cost: Option<f64>,
    #[serde(rename = "temps_production", default, deserialize_with = "lenient::float")]
    pub production_time: Option<f64>,
    #[serde(rename = "id_commande", default, deserialize_with = "lenient::integer")]
    pub order_id: Option<i64>,
    #[serde(
        rename = "commande",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::nested"
    )]
    pub order: Option<OrderRecord>,
}

impl ProductionRecord {
    pub fn product_label(&self) -> &str {
        normalize::label(self.product.as_deref())
    }

    pub fn quantity(&self) -> f64 {
        normalize::number(self.quantity)
    }

    pub fn unit_price(&self) -> f64 {
        normalize::number(self.unit_price)
    }

    pub fn production_cost(&self) -> f64 {
        normalize::number(self.production_cost)
    }

    pub fn production_time(&self) -> f64 {
        normalize::number(self.production_time)
    }

    /// Estimated revenue of this run: quantity × unit price.
    pub fn revenue(&self) -> f64 {
        self.quantity() * self.unit_price()
    }
}

impl Record for ProductionRecord {
    const FIELDS: &'static [&'static str] = &[
        "id_production",
        "date_production",
        "produit",
        "quantite",
        "statut",
        "prix_unitaire",
        "cout_production",
        "temps_production",
        "id_commande",
    ];
    const DEFAULT_SORT: &'static str = "id_production";

    fn field(
        &self,
        name: &str,
    ) -> Option<Value> {
        let value = match name {
            "id_production" => Value::from(self.id),
            "date_production" => Value::from(self.date.clone()),
            "produit" => Value::from(self.product.clone()),
            "quantite" => Value::from(self.quantity),
            "statut" => Value::from(self.status.clone()),
            "prix_unitaire" => Value::from(self.unit_price),
            "cout_production" => Value::from(self.production_cost),
            "temps_production" => Value::from(self.production_time),
            "id_commande" => Value::from(self.order_id),
            "commande" => self.order.as_ref()?.to_object(),
            _ => return None,
        };
        Some(value)
    }
}
