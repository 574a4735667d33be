//! A numeric string is coerced; any other value of the wrong type decodes as `None`.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(to_integer))
}

pub fn float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(to_float))
}

pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

pub fn nested<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(object @ Value::Object(_)) => serde_json::from_value(object).ok(),
        _ => None,
    })
}

fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.is_finite() && float.fract() == 0.0)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|float| float.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::integer")]
        id: Option<i64>,
        #[serde(default, deserialize_with = "super::float")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "super::text")]
        name: Option<String>,
    }

    fn decode_sample(value: serde_json::Value) -> Sample {
        serde_json::from_value(value).expect("sample must always decode")
    }

    #[test]
    fn coerces_numeric_strings() {
        let decoded = decode_sample(json!({"id": " 7 ", "amount": "12.5", "name": 42}));
        assert_eq!(decoded.id, Some(7));
        assert_eq!(decoded.amount, Some(12.5));
        assert_eq!(decoded.name.as_deref(), Some("42"));
    }

    #[test]
    fn wrong_types_decode_as_absent() {
        let decoded = decode_sample(json!({"id": "seven", "amount": [1, 2], "name": {"k": "v"}}));
        assert_eq!(decoded.id, None);
        assert_eq!(decoded.amount, None);
        assert_eq!(decoded.name, None);
    }

    #[test]
    fn null_and_missing_decode_as_absent() {
        let decoded = decode_sample(json!({"id": null}));
        assert_eq!(decoded.id, None);
        assert_eq!(decoded.amount, None);
        assert_eq!(decoded.name, None);
    }

    #[test]
    fn integral_floats_are_accepted_as_ids() {
        assert_eq!(decode_sample(json!({"id": 3.0})).id, Some(3));
        assert_eq!(decode_sample(json!({"id": 3.5})).id, None);
    }
}
