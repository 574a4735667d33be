use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::record::{Record, lookup};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 50];

pub fn is_page_size_option(size: usize) -> bool {
    PAGE_SIZE_OPTIONS.contains(&size)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn for_record<R: Record>() -> Self {
        Self::new(R::DEFAULT_SORT)
    }

    /// Clicking the active column flips its direction; any other column
    /// becomes active in ascending order.
    pub fn toggle(
        &mut self,
        column: &str,
    ) {
        if self.column == column {
            self.direction = self.direction.reverse();
        } else {
            self.column = column.to_string();
            self.direction = SortDirection::Asc;
        }
    }
}

/// Stable; values that cannot be ordered against each other keep their input order.
pub fn sort_records<'a, R: Record>(
    records: &'a [R],
    path: &str,
    direction: SortDirection,
) -> Vec<&'a R> {
    let keys: Vec<Option<Value>> = records.iter().map(|record| lookup(record, path)).collect();
    sorted_indices(&keys, direction)
        .into_iter()
        .map(|index| &records[index])
        .collect()
}

fn sorted_indices(
    keys: &[Option<Value>],
    direction: SortDirection,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    let mut scratch = Vec::with_capacity(keys.len() / 2 + 1);
    let compare = |left: &usize, right: &usize| {
        let ordering = compare_values(keys[*left].as_ref(), keys[*right].as_ref());
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    };
    merge_sort(&mut order, &mut scratch, &compare);
    order
}

// must not panic when `compare` is not a total order
fn merge_sort<T: Copy>(
    items: &mut [T],
    scratch: &mut Vec<T>,
    compare: &impl Fn(&T, &T) -> Ordering,
) {
    let len = items.len();
    if len <= 1 {
        return;
    }

    let mid = len / 2;
    merge_sort(&mut items[..mid], scratch, compare);
    merge_sort(&mut items[mid..], scratch, compare);

    scratch.clear();
    scratch.extend_from_slice(&items[..mid]);

    let (mut left, mut right, mut out) = (0, mid, 0);
    while left < scratch.len() && right < len {
        if compare(&items[right], &scratch[left]) == Ordering::Less {
            items[out] = items[right];
            right += 1;
        } else {
            items[out] = scratch[left];
            left += 1;
        }
        out += 1;
    }
    while left < scratch.len() {
        items[out] = scratch[left];
        left += 1;
        out += 1;
    }
}

fn compare_values(
    left: Option<&Value>,
    right: Option<&Value>,
) -> Ordering {
    match (left, right) {
        (Some(Value::Bool(left)), Some(Value::Bool(right))) => left.cmp(right),
        (Some(Value::Number(left)), Some(Value::Number(right))) => compare_numbers(left, right),
        (Some(Value::String(left)), Some(Value::String(right))) => left.cmp(right),
        _ => Ordering::Equal,
    }
}

fn compare_numbers(
    left: &serde_json::Number,
    right: &serde_json::Number,
) -> Ordering {
    if let (Some(left), Some(right)) = (left.as_i64(), right.as_i64()) {
        return left.cmp(&right);
    }

    if let (Some(left), Some(right)) = (left.as_u64(), right.as_u64()) {
        return left.cmp(&right);
    }

    match (left.as_f64(), right.as_f64()) {
        (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// Items `[page * size, page * size + size)`, clamped to the slice.
pub fn paginate<T>(
    items: &[T],
    page: usize,
    size: usize,
) -> &[T] {
    let start = page.saturating_mul(size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

pub fn page_count(
    total: usize,
    size: usize,
) -> usize {
    if size == 0 { 0 } else { total.div_ceil(size) }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    pub id: String,
    pub label: String,
}

impl Column {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            label: humanize_label(id),
        }
    }
}

/// Columns taken from the first record's fields; no records, no columns.
pub fn infer_columns<R: Record>(records: &[R]) -> Vec<Column> {
    let Some(first) = records.first() else {
        return Vec::new();
    };
    R::FIELDS
        .iter()
        .filter(|name| first.field(name).is_some())
        .map(|name| Column::new(name))
        .collect()
}

/// `quantite_disponible` → `Quantite Disponible`.
pub fn humanize_label(id: &str) -> String {
    let mut label = String::with_capacity(id.len());
    let mut word_start = true;
    for ch in id.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_whitespace() {
            word_start = true;
            label.push(ch);
        } else if word_start {
            label.extend(ch.to_uppercase());
            word_start = false;
        } else {
            label.push(ch);
        }
    }
    label
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableState {
    pub sort: SortState,
    page: usize,
    page_size: usize,
}

impl TableState {
    pub fn for_record<R: Record>() -> Self {
        Self {
            sort: SortState::for_record::<R>(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_page(
        &mut self,
        page: usize,
    ) {
        self.page = page;
    }

    /// A new page size always returns to the first page.
    pub fn set_page_size(
        &mut self,
        size: usize,
    ) {
        self.page_size = size.max(1);
        self.page = 0;
    }

    pub fn toggle_sort(
        &mut self,
        column: &str,
    ) {
        self.sort.toggle(column);
    }

    pub fn view<'a, R: Record>(
        &self,
        records: &'a [R],
    ) -> TablePage<'a, R> {
        let sorted = sort_records(records, &self.sort.column, self.sort.direction);
        TablePage {
            columns: infer_columns(records),
            rows: paginate(&sorted, self.page, self.page_size).to_vec(),
            page: self.page,
            page_count: page_count(records.len(), self.page_size),
            total: records.len(),
        }
    }
}

#[derive(Clone, Serialize)]
pub struct TablePage<'a, R> {
    pub columns: Vec<Column>,
    pub rows: Vec<&'a R>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}
