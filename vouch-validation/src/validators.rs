// Built-in predicates

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;

// Local part (dot-atoms or a quoted string) @ bracketed IPv4 or dotted domain
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .unwrap()
});

/// Check whether a value is structured JSON.
///
/// Objects, arrays and `null` are already structured. Strings qualify when
/// they parse as JSON. Numbers and booleans never do.
///
/// ```
/// use serde_json::json;
/// use vouch_validation::is_json;
///
/// assert!(is_json(&json!({"a": 1})));
/// assert!(is_json(&json!("{}")));
/// assert!(is_json(&json!("1")));
/// assert!(!is_json(&json!("")));
/// assert!(!is_json(&json!(1)));
/// ```
pub fn is_json(value: &Value) -> bool {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => true,
        Value::String(s) => serde_json::from_str::<Value>(s).is_ok(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Check whether a value is an email-shaped string.
///
/// Purely syntactic: no DNS or mailbox verification.
///
/// ```
/// use serde_json::json;
/// use vouch_validation::is_email;
///
/// assert!(is_email(&json!("hihi@gmail.com")));
/// assert!(!is_email(&json!("")));
/// assert!(!is_email(&json!(42)));
/// ```
pub fn is_email(value: &Value) -> bool {
    match value {
        Value::String(s) => EMAIL_REGEX.is_match(s),
        _ => false,
    }
}

/// Check whether a value is an array, or a string holding a JSON array.
pub fn is_array_like(value: &Value) -> bool {
    match value {
        Value::Array(_) => true,
        Value::String(s) => matches!(serde_json::from_str::<Value>(s), Ok(Value::Array(_))),
        _ => false,
    }
}

/// Get the structured form of a value.
///
/// Strings are parsed as JSON, returning `None` when they do not parse.
/// Any other value is borrowed as-is.
pub fn parse_structured(value: &Value) -> Option<Cow<'_, Value>> {
    match value {
        Value::String(s) => serde_json::from_str(s).ok().map(Cow::Owned),
        other => Some(Cow::Borrowed(other)),
    }
}
