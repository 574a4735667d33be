/// Bucket used for records whose grouping key is absent or blank.
pub const UNKNOWN_LABEL: &str = "Inconnu";

/// Missing, NaN and infinite values read as zero.
pub fn number(value: Option<f64>) -> f64 {
    value.filter(|value| value.is_finite()).unwrap_or(0.0)
}

/// Missing or empty labels read as [`UNKNOWN_LABEL`].
pub fn label(value: Option<&str>) -> &str {
    match value {
        Some(text) if !text.is_empty() => text,
        _ => UNKNOWN_LABEL,
    }
}

#[cfg(test)]
mod tests {
    use super::{UNKNOWN_LABEL, label, number};

    #[test]
    fn missing_numbers_read_as_zero() {
        assert_eq!(number(None), 0.0);
        assert_eq!(number(Some(f64::NAN)), 0.0);
        assert_eq!(number(Some(f64::INFINITY)), 0.0);
        assert_eq!(number(Some(-2.5)), -2.5);
    }

    #[test]
    fn missing_or_empty_labels_read_as_unknown() {
        assert_eq!(label(None), UNKNOWN_LABEL);
        assert_eq!(label(Some("")), UNKNOWN_LABEL);
        assert_eq!(label(Some(" ")), " ");
        assert_eq!(label(Some("Airbus")), "Airbus");
    }
}
