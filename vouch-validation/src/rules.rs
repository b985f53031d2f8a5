// Field rules and builder

use crate::{Schema, ValueType};
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Callback deciding the failure message for a field.
///
/// Receives the field key, the value (`None` when the key is missing) and the
/// rule. Returning `None` vetoes the failure and the field counts as valid.
pub type ErrorCallback = Arc<dyn Fn(&str, Option<&Value>, &FieldRule) -> Option<String> + Send + Sync>;

/// Custom error setting of a rule
#[derive(Clone)]
pub enum ErrorMessage {
    /// Always fail with this text
    Literal(String),
    /// Let a callback pick the text, or veto the failure
    Callback(ErrorCallback),
}

impl fmt::Debug for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMessage::Literal(message) => f.debug_tuple("Literal").field(message).finish(),
            ErrorMessage::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<&str> for ErrorMessage {
    fn from(message: &str) -> Self {
        ErrorMessage::Literal(message.to_string())
    }
}

impl From<String> for ErrorMessage {
    fn from(message: String) -> Self {
        ErrorMessage::Literal(message)
    }
}

/// Accepted type(s) of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    One(ValueType),
    AnyOf(Vec<ValueType>),
}

impl TypeSpec {
    /// Check whether a value type is accepted.
    pub fn accepts(&self, actual: ValueType) -> bool {
        match self {
            TypeSpec::One(expected) => *expected == actual,
            TypeSpec::AnyOf(expected) => expected.contains(&actual),
        }
    }
}

/// Constraint a field can violate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    Required,
    Nullable,
    Type,
    Regex,
    Empty,
    InValues,
    IsArray,
    IsJson,
    IsEmail,
    UnknownField,
}

impl Constraint {
    /// Get the attribute name of the constraint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Constraint::Required => "optional",
            Constraint::Nullable => "nullable",
            Constraint::Type => "type",
            Constraint::Regex => "regex",
            Constraint::Empty => "empty",
            Constraint::InValues => "inValues",
            Constraint::IsArray => "isArray",
            Constraint::IsJson => "isJson",
            Constraint::IsEmail => "isEmail",
            Constraint::UnknownField => "allowExtraProperties",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraints applied to one field's value.
///
/// Every attribute is optional; a default rule only requires the key to be
/// present.
///
/// ```
/// use vouch_validation::{FieldRule, ValueType};
///
/// let rule = FieldRule::new()
///     .of_type(ValueType::String)
///     .non_empty()
///     .error_message("name is required");
///
/// assert!(!rule.empty);
/// ```
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Absence of the key is acceptable
    pub optional: bool,
    /// `Some(true)` passes `null`/`"null"` unconditionally, `Some(false)` rejects them
    pub nullable: Option<bool>,
    pub types: Option<TypeSpec>,
    /// Pattern the coerced string form must match
    pub regex: Option<Regex>,
    /// Zero-length coerced string is acceptable (default: true)
    pub empty: bool,
    /// Allow-list of exact values. An empty list rejects everything.
    pub in_values: Option<Vec<Value>>,
    pub is_array: bool,
    pub is_json: bool,
    pub is_email: bool,
    /// Applied to the parsed object value, requires `is_json`
    pub child_schema: Option<Box<Schema>>,
    /// Applied to each element of the parsed array value, requires `is_array`
    pub children_schema: Option<Box<Schema>>,
    pub error: Option<ErrorMessage>,
}

impl Default for FieldRule {
    fn default() -> Self {
        Self {
            optional: false,
            nullable: None,
            types: None,
            regex: None,
            empty: true,
            in_values: None,
            is_array: false,
            is_json: false,
            is_email: false,
            child_schema: None,
            children_schema: None,
            error: None,
        }
    }
}

impl FieldRule {
    /// Create a rule that only requires presence
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a missing key
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Accept (`true`) or reject (`false`) `null` and `"null"`
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Require a single type
    pub fn of_type(mut self, value_type: ValueType) -> Self {
        self.types = Some(TypeSpec::One(value_type));
        self
    }

    /// Require any of the given types
    pub fn any_of_types(mut self, types: impl IntoIterator<Item = ValueType>) -> Self {
        self.types = Some(TypeSpec::AnyOf(types.into_iter().collect()));
        self
    }

    /// Require the coerced string form to match a pattern
    pub fn regex(mut self, regex: Regex) -> Self {
        self.regex = Some(regex);
        self
    }

    /// Reject zero-length values
    pub fn non_empty(mut self) -> Self {
        self.empty = false;
        self
    }

    /// Require the value to equal one of the listed values
    pub fn in_values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.in_values = Some(values.into_iter().collect());
        self
    }

    /// Require an array, or a string holding a JSON array
    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// Require structured JSON, or a string holding JSON
    pub fn json(mut self) -> Self {
        self.is_json = true;
        self
    }

    /// Require an email-shaped string
    pub fn email(mut self) -> Self {
        self.is_email = true;
        self
    }

    /// Validate the parsed object value against a nested schema.
    ///
    /// Only valid together with [`FieldRule::json`].
    pub fn child_schema(mut self, schema: Schema) -> Self {
        self.child_schema = Some(Box::new(schema));
        self
    }

    /// Validate each element of the parsed array value against a nested schema.
    ///
    /// Only valid together with [`FieldRule::array`].
    pub fn children_schema(mut self, schema: Schema) -> Self {
        self.children_schema = Some(Box::new(schema));
        self
    }

    /// Fail with a fixed message whatever the violated constraint
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error = Some(ErrorMessage::Literal(message.into()));
        self
    }

    /// Decide the failure message with a callback
    pub fn error_with<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, Option<&Value>, &FieldRule) -> Option<String> + Send + Sync + 'static,
    {
        self.error = Some(ErrorMessage::Callback(Arc::new(callback)));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_rule() {
        let rule = FieldRule::new();
        assert!(!rule.optional);
        assert!(rule.empty);
        assert!(rule.nullable.is_none());
        assert!(rule.types.is_none());
        assert!(rule.error.is_none());
    }

    #[test]
    fn test_builder() {
        let rule = FieldRule::new()
            .optional()
            .nullable(false)
            .any_of_types([ValueType::Boolean, ValueType::String])
            .regex(Regex::new("^a").unwrap())
            .non_empty()
            .in_values([json!("a"), json!("ab")])
            .email();

        assert!(rule.optional);
        assert_eq!(rule.nullable, Some(false));
        assert_eq!(
            rule.types,
            Some(TypeSpec::AnyOf(vec![ValueType::Boolean, ValueType::String]))
        );
        assert!(!rule.empty);
        assert_eq!(rule.in_values.as_ref().map(Vec::len), Some(2));
        assert!(rule.is_email);
    }

    #[test]
    fn test_nested_builders() {
        let rule = FieldRule::new()
            .json()
            .child_schema(Schema::new().field("bar", FieldRule::new()));
        assert!(rule.is_json);
        assert!(rule.child_schema.is_some());

        let rule = FieldRule::new()
            .array()
            .children_schema(Schema::direct(FieldRule::new().of_type(ValueType::String)));
        assert!(rule.is_array);
        assert!(rule.children_schema.is_some());
    }

    #[test]
    fn test_type_spec_accepts() {
        assert!(TypeSpec::One(ValueType::Number).accepts(ValueType::Number));
        assert!(!TypeSpec::One(ValueType::Number).accepts(ValueType::String));

        let any = TypeSpec::AnyOf(vec![ValueType::Boolean, ValueType::String]);
        assert!(any.accepts(ValueType::String));
        assert!(!any.accepts(ValueType::Object));
        assert!(!TypeSpec::AnyOf(vec![]).accepts(ValueType::String));
    }

    #[test]
    fn test_error_message_callback() {
        let rule = FieldRule::new().error_with(|key, value, _| {
            value.map(|v| format!("{} rejected {}", key, v))
        });

        match &rule.error {
            Some(ErrorMessage::Callback(callback)) => {
                assert_eq!(
                    callback("foo", Some(&json!(1)), &rule),
                    Some("foo rejected 1".to_string())
                );
                assert_eq!(callback("foo", None, &rule), None);
            }
            other => panic!("expected callback, got {:?}", other),
        }
    }

    #[test]
    fn test_constraint_names() {
        assert_eq!(Constraint::InValues.to_string(), "inValues");
        assert_eq!(Constraint::IsEmail.as_str(), "isEmail");
    }
}
