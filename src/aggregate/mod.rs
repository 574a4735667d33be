use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

pub type GroupTotals = IndexMap<String, f64>;

pub fn group_sum<R>(
    records: &[R],
    key: impl Fn(&R) -> &str,
    value: impl Fn(&R) -> f64,
) -> GroupTotals {
    let mut totals = GroupTotals::new();
    for record in records {
        accumulate(&mut totals, key(record), value(record));
    }
    totals
}

pub fn group_count<R>(
    records: &[R],
    key: impl Fn(&R) -> &str,
) -> GroupTotals {
    group_sum(records, key, |_| 1.0)
}

/// Sums `N` numeric fields per key in a single pass.
pub fn group_sums<R, const N: usize>(
    records: &[R],
    key: impl Fn(&R) -> &str,
    values: [&dyn Fn(&R) -> f64; N],
) -> IndexMap<String, [f64; N]> {
    let mut totals: IndexMap<String, [f64; N]> = IndexMap::new();
    for record in records {
        let slot = entry(&mut totals, key(record), [0.0; N]);
        for (total, value) in slot.iter_mut().zip(values.iter()) {
            *total += value(record);
        }
    }
    totals
}

/// How many records carry each distinct value, in first-seen order.
pub fn value_occurrences<R>(
    records: &[R],
    value: impl Fn(&R) -> f64,
) -> Vec<(f64, usize)> {
    let mut counts: IndexMap<u64, (f64, usize)> = IndexMap::new();
    for record in records {
        // +0.0 and -0.0 share a bucket
        let observed = value(record) + 0.0;
        counts.entry(observed.to_bits()).or_insert((observed, 0)).1 += 1;
    }
    counts.into_values().collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Financials {
    pub cost: f64,
    pub revenue: f64,
}

impl Financials {
    /// Revenue minus cost of the accumulated group, not a sum of per-record gains.
    pub fn gain(&self) -> f64 {
        self.revenue - self.cost
    }
}

pub type FinancialTotals = IndexMap<String, Financials>;

pub fn financials_by<R>(
    records: &[R],
    key: impl Fn(&R) -> &str,
    cost: impl Fn(&R) -> f64,
    revenue: impl Fn(&R) -> f64,
) -> FinancialTotals {
    let values: [&dyn Fn(&R) -> f64; 2] = [&cost, &revenue];
    group_sums(records, key, values)
        .into_iter()
        .map(|(name, [cost, revenue])| (name, Financials { cost, revenue }))
        .collect()
}

/// Two-level grouping: row key → column key → sum.
///
/// Every row exposes a value for every observed column; cells that never
/// received a record read as zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialLocationGrid {
    cells: IndexMap<String, GroupTotals>,
    locations: IndexSet<String>,
    totals: GroupTotals,
}

impl MaterialLocationGrid {
    pub fn from_records<R>(
        records: &[R],
        material: impl Fn(&R) -> &str,
        location: impl Fn(&R) -> &str,
        quantity: impl Fn(&R) -> f64,
    ) -> Self {
        let mut grid = Self::default();
        for record in records {
            let row_key = material(record);
            let column_key = location(record);
            let amount = quantity(record);

            if !grid.locations.contains(column_key) {
                grid.locations.insert(column_key.to_string());
            }
            let row = entry(&mut grid.cells, row_key, GroupTotals::new());
            accumulate(row, column_key, amount);
            accumulate(&mut grid.totals, row_key, amount);
        }
        grid
    }

    pub fn quantity(
        &self,
        material: &str,
        location: &str,
    ) -> f64 {
        self.cells
            .get(material)
            .and_then(|row| row.get(location))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn locations(&self) -> &IndexSet<String> {
        &self.locations
    }

    pub fn sorted_locations(&self) -> Vec<String> {
        let mut locations: Vec<String> = self.locations.iter().cloned().collect();
        locations.sort();
        locations
    }

    pub fn total(
        &self,
        material: &str,
    ) -> f64 {
        self.totals.get(material).copied().unwrap_or(0.0)
    }

    pub fn totals(&self) -> &GroupTotals {
        &self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn accumulate(
    totals: &mut GroupTotals,
    key: &str,
    value: f64,
) {
    *entry(totals, key, 0.0) += value;
}

fn entry<'a, V>(
    map: &'a mut IndexMap<String, V>,
    key: &str,
    initial: V,
) -> &'a mut V {
    let index = match map.get_index_of(key) {
        Some(index) => index,
        None => map.insert_full(key.to_string(), initial).0,
    };
    &mut map[index]
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{
        MaterialLocationGrid, financials_by, group_count, group_sum, group_sums, value_occurrences,
    };
    use crate::normalize::{self, UNKNOWN_LABEL};

    struct Row {
        key: Option<String>,
        amount: Option<f64>,
    }

    fn row(
        key: Option<&str>,
        amount: Option<f64>,
    ) -> Row {
        Row {
            key: key.map(str::to_string),
            amount,
        }
    }

    fn key(row: &Row) -> &str {
        normalize::label(row.key.as_deref())
    }

    fn amount(row: &Row) -> f64 {
        normalize::number(row.amount)
    }

    #[test]
    fn groups_products_and_accumulates_duplicates() {
        let rows = vec![
            row(Some("A"), Some(5.0)),
            row(Some("B"), Some(3.0)),
            row(Some("A"), Some(2.0)),
        ];
        let totals = group_sum(&rows, key, amount);

        assert_eq!(totals.len(), 2);
        assert_eq!(totals["A"], 7.0);
        assert_eq!(totals["B"], 3.0);
        assert_eq!(totals.keys().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn empty_input_gives_empty_map() {
        let rows: Vec<Row> = Vec::new();
        assert!(group_sum(&rows, key, amount).is_empty());
        assert!(group_count(&rows, key).is_empty());
        assert!(MaterialLocationGrid::from_records(&rows, key, key, amount).is_empty());
    }

    #[test]
    fn missing_keys_and_amounts_fall_back() {
        let rows = vec![row(None, None), row(Some(""), Some(4.0)), row(Some("A"), None)];
        let totals = group_sum(&rows, key, amount);

        assert_eq!(totals[UNKNOWN_LABEL], 4.0);
        assert_eq!(totals["A"], 0.0);
    }

    #[test]
    fn counts_records_per_key() {
        let rows = vec![
            row(Some("Airbus"), Some(100.0)),
            row(Some("Safran"), Some(1.0)),
            row(Some("Safran"), Some(1.0)),
        ];
        let counts = group_count(&rows, key);
        assert_eq!(counts["Airbus"], 1.0);
        assert_eq!(counts["Safran"], 2.0);
    }

    #[test]
    fn sums_several_fields_in_one_pass() {
        let rows = vec![
            row(Some("A"), Some(2.0)),
            row(Some("A"), Some(3.0)),
            row(Some("B"), Some(1.0)),
        ];
        let double = |row: &Row| amount(row) * 2.0;
        let values: [&dyn Fn(&Row) -> f64; 2] = [&amount, &double];
        let totals = group_sums(&rows, key, values);

        assert_eq!(totals["A"], [5.0, 10.0]);
        assert_eq!(totals["B"], [1.0, 2.0]);
    }

    #[test]
    fn gain_is_computed_after_accumulation() {
        let rows = vec![
            row(Some("A"), Some(10.0)),
            row(Some("A"), Some(30.0)),
            row(Some("B"), Some(5.0)),
        ];
        let totals = financials_by(&rows, key, amount, |row| amount(row) * 3.0);

        assert_eq!(totals["A"].cost, 40.0);
        assert_eq!(totals["A"].revenue, 120.0);
        assert_eq!(totals["A"].gain(), 80.0);
        assert_eq!(totals["B"].gain(), 10.0);
    }

    #[test]
    fn grid_zero_fills_unseen_cells() {
        struct Stock(&'static str, &'static str, f64);
        let stocks = vec![
            Stock("Cuivre", "Toulouse", 10.0),
            Stock("Cuivre", "Nantes", 4.0),
            Stock("Acier", "Toulouse", 7.0),
            Stock("Cuivre", "Toulouse", 1.0),
        ];
        let grid = MaterialLocationGrid::from_records(&stocks, |s| s.0, |s| s.1, |s| s.2);

        assert_eq!(grid.quantity("Cuivre", "Toulouse"), 11.0);
        assert_eq!(grid.quantity("Acier", "Nantes"), 0.0);
        assert_eq!(grid.quantity("Bois", "Nantes"), 0.0);
        assert_eq!(grid.total("Cuivre"), 15.0);
        assert_eq!(grid.materials().collect::<Vec<_>>(), vec!["Cuivre", "Acier"]);
        assert_eq!(grid.sorted_locations(), vec!["Nantes", "Toulouse"]);
        assert_eq!(grid.locations().len(), 2);
    }

    #[test]
    fn occurrences_count_distinct_values() {
        let rows = vec![
            row(None, Some(5.0)),
            row(None, Some(2.0)),
            row(None, Some(5.0)),
            row(None, None),
        ];
        assert_eq!(
            value_occurrences(&rows, amount),
            vec![(5.0, 2), (2.0, 1), (0.0, 1)]
        );
    }

    proptest! {
        #[test]
        fn grouping_is_a_lossless_partition(
            entries in prop::collection::vec(
                (prop::option::of("[a-d]{0,1}"), prop::option::of(-1_000i32..1_000)),
                1..60,
            )
        ) {
            let rows: Vec<Row> = entries
                .iter()
                .map(|(key, amount)| Row {
                    key: key.clone(),
                    amount: amount.map(f64::from),
                })
                .collect();

            let grouped: f64 = group_sum(&rows, key, amount).values().sum();
            let direct: f64 = rows.iter().map(amount).sum();
            prop_assert_eq!(grouped, direct);
        }

        #[test]
        fn absent_keys_collapse_into_one_unknown_bucket(
            amounts in prop::collection::vec(prop::option::of(0i32..500), 1..40)
        ) {
            let rows: Vec<Row> = amounts
                .iter()
                .map(|amount| Row { key: None, amount: amount.map(f64::from) })
                .collect();

            let totals = group_sum(&rows, key, amount);
            let grand_total: f64 = rows.iter().map(amount).sum();
            prop_assert_eq!(totals.len(), 1);
            prop_assert_eq!(totals[UNKNOWN_LABEL], grand_total);
        }
    }
}
