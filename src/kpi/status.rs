use serde::{Deserialize, Serialize};

use super::count;
use crate::chart::NamedValue;
use crate::record::{OrderRecord, ProductionRecord};

/// Accepted spellings per status bucket, compared case-insensitively.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusLabels {
    pub completed: Vec<String>,
    pub in_progress: Vec<String>,
    pub pending: Vec<String>,
    pub delivered: Vec<String>,
}

impl Default for StatusLabels {
    fn default() -> Self {
        let labels = |names: &[&str]| -> Vec<String> {
            names.iter().map(|name| (*name).to_string()).collect()
        };
        Self {
            completed: labels(&["terminé", "completed"]),
            in_progress: labels(&["en cours", "in progress"]),
            pending: labels(&["en attente", "pending"]),
            delivered: labels(&["livrée", "delivered"]),
        }
    }
}

fn matches_any(
    labels: &[String],
    status: Option<&str>,
) -> bool {
    let Some(status) = status else {
        return false;
    };
    let status = status.to_lowercase();
    labels.iter().any(|label| label.to_lowercase() == status)
}

/// Three-way split of production runs. Statuses outside the three buckets
/// only show up in `total`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProductionStatusCounts {
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub total: usize,
}

impl ProductionStatusCounts {
    pub fn tally(
        records: &[ProductionRecord],
        labels: &StatusLabels,
    ) -> Self {
        let bucket = |accepted: &[String]| {
            count(records, |record| {
                matches_any(accepted, record.status.as_deref())
            })
        };
        Self {
            completed: bucket(&labels.completed),
            in_progress: bucket(&labels.in_progress),
            pending: bucket(&labels.pending),
            total: records.len(),
        }
    }

    pub fn unclassified(&self) -> usize {
        self.total
            .saturating_sub(self.completed + self.in_progress + self.pending)
    }

    pub fn chart(&self) -> Vec<NamedValue> {
        vec![
            NamedValue::new("In progress", self.in_progress as f64),
            NamedValue::new("Pending", self.pending as f64),
            NamedValue::new("Completed", self.completed as f64),
        ]
    }
}

/// Delivered versus everything else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OrderStatusCounts {
    pub delivered: usize,
    pub pending: usize,
    pub total: usize,
}

impl OrderStatusCounts {
    pub fn tally(
        records: &[OrderRecord],
        labels: &StatusLabels,
    ) -> Self {
        let delivered = count(records, |record| {
            matches_any(&labels.delivered, record.status.as_deref())
        });
        Self {
            delivered,
            pending: records.len() - delivered,
            total: records.len(),
        }
    }

    pub fn chart(&self) -> Vec<NamedValue> {
        vec![
            NamedValue::new("Pending", self.pending as f64),
            NamedValue::new("Delivered", self.delivered as f64),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{OrderStatusCounts, ProductionStatusCounts, StatusLabels};
    use crate::record::{OrderRecord, ProductionRecord};

    fn production(status: Option<&str>) -> ProductionRecord {
        ProductionRecord {
            status: status.map(str::to_string),
            ..ProductionRecord::default()
        }
    }

    fn order(status: Option<&str>) -> OrderRecord {
        OrderRecord {
            status: status.map(str::to_string),
            ..OrderRecord::default()
        }
    }

    #[test]
    fn production_statuses_match_case_insensitively() {
        let records = vec![
            production(Some("Terminé")),
            production(Some("TERMINÉ")),
            production(Some("En cours")),
            production(Some("in progress")),
            production(Some("En attente")),
            production(Some("Annulé")),
            production(None),
        ];
        let counts = ProductionStatusCounts::tally(&records, &StatusLabels::default());

        assert_eq!(counts.completed, 2);
        assert_eq!(counts.in_progress, 2);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.total, 7);
        assert_eq!(counts.unclassified(), 2);

        let chart = counts.chart();
        let names: Vec<&str> = chart.iter().map(|slice| slice.name.as_str()).collect();
        assert_eq!(names, vec!["In progress", "Pending", "Completed"]);
    }

    #[test]
    fn labels_must_match_exactly_after_lowercasing() {
        let records = vec![production(Some(" terminé")), production(Some("terminée"))];
        let counts = ProductionStatusCounts::tally(&records, &StatusLabels::default());
        assert_eq!(counts.completed, 0);
        assert_eq!(counts.unclassified(), 2);
    }

    #[test]
    fn orders_split_delivered_from_the_rest() {
        let records = vec![
            order(Some("Livrée")),
            order(Some("delivered")),
            order(Some("En cours")),
            order(None),
        ];
        let counts = OrderStatusCounts::tally(&records, &StatusLabels::default());
        assert_eq!(counts.delivered, 2);
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.chart()[0].name, "Pending");
    }

    #[test]
    fn empty_input_counts_nothing() {
        let counts = OrderStatusCounts::tally(&[], &StatusLabels::default());
        assert_eq!(counts, OrderStatusCounts::default());
        let counts = ProductionStatusCounts::tally(&[], &StatusLabels::default());
        assert_eq!(counts.unclassified(), 0);
    }
}
