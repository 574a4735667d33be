mod orders;
mod production;
mod status;
mod stock;
mod teams;

pub use orders::OrderKpis;
pub use production::{ProductionKpis, QuantityOccurrence};
pub use status::{OrderStatusCounts, ProductionStatusCounts, StatusLabels};
pub use stock::StockKpis;
pub use teams::{AvailabilityScale, TeamKpis};

use serde::Serialize;

use crate::aggregate::GroupTotals;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct KpiSettings {
    pub status: StatusLabels,
    pub availability: AvailabilityScale,
}

pub fn sum<R>(
    records: &[R],
    value: impl Fn(&R) -> f64,
) -> f64 {
    records.iter().map(value).sum()
}

pub fn count<R>(
    records: &[R],
    predicate: impl Fn(&R) -> bool,
) -> usize {
    records.iter().filter(|record| predicate(record)).count()
}

/// Mean over the records that are present; 0 for an empty slice.
pub fn average<R>(
    records: &[R],
    value: impl Fn(&R) -> f64,
) -> f64 {
    ratio(sum(records, value), records.len() as f64)
}

pub fn ratio(
    numerator: f64,
    denominator: f64,
) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Key of the largest total. Ties keep the key inserted first.
pub fn argmax_group(groups: &GroupTotals) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for (key, value) in groups {
        match best {
            Some((_, top)) if *value <= top => {}
            _ => best = Some((key.as_str(), *value)),
        }
    }
    best.map(|(key, _)| key)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KpiTile {
    pub label: String,
    pub value: String,
}

impl KpiTile {
    pub fn text(
        label: &str,
        value: impl Into<String>,
    ) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }

    pub fn number(
        label: &str,
        value: f64,
    ) -> Self {
        Self::text(label, format_number(value))
    }

    pub fn euros(
        label: &str,
        value: f64,
    ) -> Self {
        Self::text(label, format!("{} €", format_number(value)))
    }

    pub fn hours(
        label: &str,
        value: f64,
    ) -> Self {
        Self::text(label, format!("{} h", format_number(value)))
    }
}

/// Thousands separators and at most two fraction digits, trailing zeros
/// dropped: `1234.5` → `1,234.5`, `0.004` → `0`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    // past 1e15 there are no fraction digits left and the ×100 could overflow
    let rounded = if value.abs() < 1e15 {
        (value * 100.0).round() / 100.0
    } else {
        value
    };
    let digits = format!("{:.2}", rounded.abs());
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (position, digit) in integer.chars().enumerate() {
        if position > 0 && (integer.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::{KpiTile, argmax_group, average, count, format_number, ratio, sum};
    use crate::aggregate::{GroupTotals, group_sum};
    use crate::record::ProductionRecord;

    fn production(
        product: &str,
        quantity: f64,
    ) -> ProductionRecord {
        ProductionRecord {
            product: Some(product.to_string()),
            quantity: Some(quantity),
            ..ProductionRecord::default()
        }
    }

    #[test]
    fn most_produced_product_scenario() {
        let records = vec![
            production("A", 5.0),
            production("B", 3.0),
            production("A", 2.0),
        ];
        let totals = group_sum(
            &records,
            ProductionRecord::product_label,
            ProductionRecord::quantity,
        );

        assert_eq!(totals["A"], 7.0);
        assert_eq!(totals["B"], 3.0);
        assert_eq!(argmax_group(&totals), Some("A"));
    }

    #[test]
    fn argmax_ties_keep_first_inserted_key() {
        let mut totals = GroupTotals::new();
        totals.insert("Zeta".to_string(), 4.0);
        totals.insert("Alpha".to_string(), 4.0);
        totals.insert("Mid".to_string(), 1.0);
        assert_eq!(argmax_group(&totals), Some("Zeta"));

        assert_eq!(argmax_group(&GroupTotals::new()), None);

        let mut negative = GroupTotals::new();
        negative.insert("Loss".to_string(), -3.0);
        negative.insert("Bigger loss".to_string(), -9.0);
        assert_eq!(argmax_group(&negative), Some("Loss"));
    }

    #[test]
    fn all_zero_totals_still_name_the_first_key() {
        let records = vec![production("Rotor", 0.0), production("Stator", 0.0)];
        let totals = group_sum(
            &records,
            ProductionRecord::product_label,
            ProductionRecord::quantity,
        );
        assert_eq!(argmax_group(&totals), Some("Rotor"));
    }

    #[test]
    fn average_of_nothing_is_zero() {
        let records: Vec<ProductionRecord> = Vec::new();
        let value = average(&records, ProductionRecord::unit_price);
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
        assert_eq!(ratio(10.0, 0.0), 0.0);
    }

    #[test]
    fn average_divides_by_available_records() {
        let records = vec![
            ProductionRecord {
                unit_price: Some(10.0),
                ..ProductionRecord::default()
            },
            ProductionRecord::default(),
        ];
        assert_eq!(average(&records, ProductionRecord::unit_price), 5.0);
        assert_eq!(sum(&records, ProductionRecord::unit_price), 10.0);
        assert_eq!(count(&records, |record| record.unit_price.is_some()), 1);
    }

    #[test]
    fn formats_like_a_dashboard_tile() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(1234567.891), "1,234,567.89");
        assert_eq!(format_number(999.999), "1,000");
        assert_eq!(format_number(-2500.0), "-2,500");
        assert_eq!(format_number(-0.001), "0");
        assert_eq!(format_number(f64::NAN), "0");
        assert_eq!(KpiTile::euros("Coût", 1500.0).value, "1,500 €");
        assert_eq!(KpiTile::hours("Temps", 2.25).value, "2.25 h");
    }

    #[test]
    fn huge_finite_values_keep_their_digits() {
        assert_eq!(format_number(-1e20), "-100,000,000,000,000,000,000");
        assert_eq!(format_number(1e15 + 0.5), "1,000,000,000,000,000.5");

        for value in [1e307, f64::MAX, -f64::MAX] {
            let rendered = format_number(value);
            assert!(!rendered.contains("inf"), "{value} rendered as {rendered}");
            assert!(rendered.len() > 300);
        }
    }
}
