use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Record, lenient};
use crate::normalize;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "id_commande", default, deserialize_with = "lenient::integer")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub client: Option<String>,
    #[serde(rename = "produit_commande", default, deserialize_with = "lenient::text")]
    pub product: Option<String>,
    #[serde(rename = "quantite", default, deserialize_with = "lenient::float")]
    pub quantity: Option<f64>,
    #[serde(rename = "statut", default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(rename = "date_commande", default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
}

impl OrderRecord {
    pub fn client_label(&self) -> &str {
        normalize::label(self.client.as_deref())
    }

    pub fn quantity(&self) -> f64 {
        normalize::number(self.quantity)
    }
}

impl Record for OrderRecord {
    const FIELDS: &'static [&'static str] = &[
        "id_commande",
        "client",
        "produit_commande",
        "quantite",
        "statut",
        "date_commande",
    ];
    const DEFAULT_SORT: &'static str = "id_commande";

    fn field(
        &self,
        name: &str,
    ) -> Option<Value> {
        let value = match name {
            "id_commande" => Value::from(self.id),
            "client" => Value::from(self.client.clone()),
            "produit_commande" => Value::from(self.product.clone()),
            "quantite" => Value::from(self.quantity),
            "statut" => Value::from(self.status.clone()),
            "date_commande" => Value::from(self.date.clone()),
            _ => return None,
        };
        Some(value)
    }
}
