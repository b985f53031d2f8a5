// Validation errors

use crate::Constraint;
use thiserror::Error;

/// A broken schema, independent of the validated input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("when using child schema, should turn on isJson checking (field `{field}`)")]
    ChildSchemaRequiresJson { field: String },

    #[error("when using children schema, should turn on isArray checking (field `{field}`)")]
    ChildrenSchemaRequiresArray { field: String },

    #[error("schema must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("rule of `{field}` must be an object")]
    RuleNotAnObject { field: String },

    #[error("unknown attribute `{attribute}` in rule of `{field}`")]
    UnknownAttribute { field: String, attribute: String },

    #[error("attribute `{attribute}` of `{field}` must be {expected}")]
    InvalidAttribute {
        field: String,
        attribute: &'static str,
        expected: &'static str,
    },

    #[error("unknown type `{name}` in rule of `{field}`")]
    UnknownType { field: String, name: String },

    #[error("invalid regex in rule of `{field}`: {reason}")]
    InvalidRegex { field: String, reason: String },
}

/// Outcome of a failed validation.
///
/// `Display` of an [`ValidationError::Invalid`] is exactly the failure
/// message, so callers can surface it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The input violates a rule
    #[error("{message}")]
    Invalid {
        field: String,
        constraint: Constraint,
        message: String,
    },

    /// The schema itself is broken
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ValidationError {
    /// Create an input failure
    pub fn invalid(
        field: impl Into<String>,
        constraint: Constraint,
        message: impl Into<String>,
    ) -> Self {
        ValidationError::Invalid {
            field: field.into(),
            constraint,
            message: message.into(),
        }
    }

    /// Get the failure message
    pub fn message(&self) -> String {
        match self {
            ValidationError::Invalid { message, .. } => message.clone(),
            ValidationError::Schema(err) => err.to_string(),
        }
    }

    /// Get the failing field, for input failures
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::Invalid { field, .. } => Some(field),
            ValidationError::Schema(_) => None,
        }
    }

    /// Get the violated constraint, for input failures
    pub fn constraint(&self) -> Option<Constraint> {
        match self {
            ValidationError::Invalid { constraint, .. } => Some(*constraint),
            ValidationError::Schema(_) => None,
        }
    }

    /// Check whether the schema, not the input, is at fault
    pub fn is_schema_error(&self) -> bool {
        matches!(self, ValidationError::Schema(_))
    }
}
