use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Record, lenient};
use crate::normalize;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(rename = "ID_Stock", default, deserialize_with = "lenient::integer")]
    pub id: Option<i64>,
    #[serde(rename = "Produit", default, deserialize_with = "lenient::text")]
    pub product: Option<String>,
    #[serde(rename = "Quantité_Disponible", default, deserialize_with = "lenient::float")]
    pub available_quantity: Option<f64>,
    #[serde(rename = "Lieu_Stockage", default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(rename = "Type_Matière", default, deserialize_with = "lenient::text")]
    pub material: Option<String>,
    #[serde(rename = "Mise_à_Jour", default, deserialize_with = "lenient::text")]
    pub updated_on: Option<String>,
}

impl StockRecord {
    pub fn location_label(&self) -> &str {
        normalize::label(self.location.as_deref())
    }

    pub fn material_label(&self) -> &str {
        normalize::label(self.material.as_deref())
    }

    pub fn available_quantity(&self) -> f64 {
        normalize::number(self.available_quantity)
    }
}

impl Record for StockRecord {
    const FIELDS: &'static [&'static str] = &[
        "ID_Stock",
        "Produit",
        "Quantité_Disponible",
        "Lieu_Stockage",
        "Type_Matière",
        "Mise_à_Jour",
    ];
    const DEFAULT_SORT: &'static str = "ID_Stock";

    fn field(
        &self,
        name: &str,
    ) -> Option<Value> {
        let value = match name {
            "ID_Stock" => Value::from(self.id),
            "Produit" => Value::from(self.product.clone()),
            "Quantité_Disponible" => Value::from(self.available_quantity),
            "Lieu_Stockage" => Value::from(self.location.clone()),
            "Type_Matière" => Value::from(self.material.clone()),
            "Mise_à_Jour" => Value::from(self.updated_on.clone()),
            _ => return None,
        };
        Some(value)
    }
}
