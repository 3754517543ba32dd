//! Utility functions and helpers

use serde_json::Value;

/// Strip zero-width characters and trim surrounding whitespace.
///
/// Client ids and secrets pasted from provider consoles routinely pick up
/// U+200B..U+200D or a BOM, which then fails the token exchange with an
/// opaque `invalid_client`.
pub fn strip_zero_width(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// JavaScript-style truthiness for JSON values.
///
/// The required-field precondition treats `null`, `""`, `0`, and `false` as
/// missing, matching what the front-end already relies on.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a JSON value into a URL path segment without quoting strings.
pub fn value_to_plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_zero_width_and_trims() {
        assert_eq!(strip_zero_width("  abc\u{200B}def \u{FEFF}"), "abcdef");
        assert_eq!(strip_zero_width("plain"), "plain");
    }

    #[test]
    fn truthiness_matches_javascript() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn plain_string_rendering() {
        assert_eq!(value_to_plain_string(&json!("tbl")), "tbl");
        assert_eq!(value_to_plain_string(&json!(42)), "42");
        assert_eq!(value_to_plain_string(&Value::Null), "");
    }
}
