mod lenient;
mod order;
mod production;
mod stock;
mod team;

pub use order::OrderRecord;
pub use production::ProductionRecord;
pub use stock::StockRecord;
pub use team::TeamRecord;

use serde::Serialize;
use serde_json::{Map, Value};

/// `field` answers `None` for names outside `FIELDS` and `Some(Value::Null)`
/// for a known field that is absent.
pub trait Record: Serialize {
    /// Column ids in wire order.
    const FIELDS: &'static [&'static str];
    const DEFAULT_SORT: &'static str;

    fn field(
        &self,
        name: &str,
    ) -> Option<Value>;

    fn to_object(&self) -> Value {
        let fields: Map<String, Value> = Self::FIELDS
            .iter()
            .filter_map(|name| Some(((*name).to_string(), self.field(name)?)))
            .collect();
        Value::Object(fields)
    }
}

/// Resolves a dot-separated path: the first segment through [`Record::field`],
/// the rest by walking nested objects and array indexes.
pub fn lookup<R: Record + ?Sized>(
    record: &R,
    path: &str,
) -> Option<Value> {
    let mut segments = path.split('.');
    let head = segments.next()?;
    let mut current = record.field(head)?;

    for segment in segments {
        current = match current {
            Value::Object(mut map) => map.remove(segment)?,
            Value::Array(mut items) => {
                let index = segment.parse::<usize>().ok()?;
                if index >= items.len() {
                    return None;
                }
                items.swap_remove(index)
            }
            _ => return None,
        };
    }

    Some(current)
}
