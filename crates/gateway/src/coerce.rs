//! Deterministic coercion of dynamic JSON values.
//!
//! Inbound documents and backend replies are open JSON, so the fields the
//! proxy itself reads can arrive with any type. These rules pin the behavior
//! down:
//!
//! - text: strings pass through, absent and null become empty, any other
//!   value keeps its compact JSON text
//! - token counts: integral numbers and strings parsing as integers count,
//!   everything else is zero
//! - flags: booleans pass through, `"true"`/`"t"`/`"1"` strings and the
//!   number one are true, everything else is false

use serde_json::Value;

pub(crate) fn text_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub(crate) fn token_count(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(count) = n.as_u64() {
                u32::try_from(count).unwrap_or(0)
            } else {
                // Backends serializing counts as floats still count when the
                // value is integral.
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => f as u32,
                    _ => 0,
                }
            }
        }
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

pub(crate) fn bool_value(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.to_ascii_lowercase().as_str(), "true" | "t" | "1"),
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn text_passes_strings_through() {
        assert_eq!(text_value(Some(&json!("hello"))), "hello");
    }

    #[test]
    fn text_of_absent_and_null_is_empty() {
        assert_eq!(text_value(None), "");
        assert_eq!(text_value(Some(&Value::Null)), "");
    }

    #[test]
    fn text_of_other_values_is_their_json() {
        assert_eq!(text_value(Some(&json!(42))), "42");
        assert_eq!(text_value(Some(&json!(true))), "true");
        assert_eq!(text_value(Some(&json!({"a": 1}))), r#"{"a":1}"#);
    }

    #[test]
    fn counts_accept_integers_and_numeric_strings() {
        assert_eq!(token_count(Some(&json!(17))), 17);
        assert_eq!(token_count(Some(&json!(17.0))), 17);
        assert_eq!(token_count(Some(&json!("17"))), 17);
    }

    #[test]
    fn counts_of_everything_else_are_zero() {
        assert_eq!(token_count(None), 0);
        assert_eq!(token_count(Some(&Value::Null)), 0);
        assert_eq!(token_count(Some(&json!(17.5))), 0);
        assert_eq!(token_count(Some(&json!(-3))), 0);
        assert_eq!(token_count(Some(&json!("many"))), 0);
        assert_eq!(token_count(Some(&json!([1]))), 0);
    }

    #[test]
    fn flags_accept_booleans_and_their_spellings() {
        assert!(bool_value(Some(&json!(true))));
        assert!(bool_value(Some(&json!("true"))));
        assert!(bool_value(Some(&json!("TRUE"))));
        assert!(bool_value(Some(&json!("1"))));
        assert!(bool_value(Some(&json!(1))));

        assert!(!bool_value(Some(&json!(false))));
        assert!(!bool_value(Some(&json!("yes"))));
        assert!(!bool_value(Some(&json!(0))));
        assert!(!bool_value(None));
    }
}
