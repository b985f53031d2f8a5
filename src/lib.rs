// Vouch - declarative validation of JSON payloads
//
// Schemas are data: build them with the rule builders or load them from JSON,
// then validate inputs against them.

// Re-export the validation engine
pub use vouch_validation::*;

// Re-export serde_json so callers build inputs with the same `Value`
pub use serde_json;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Constraint, FieldRule, Schema, SchemaError, ValidationError, ValidationOptions, Validator,
        ValueType, is_email, is_json, validate, validate_with_options,
    };
    pub use serde_json::{Value, json};
}
