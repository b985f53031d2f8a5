//! Declarative object validation for Vouch
//!
//! Validates JSON payloads against schemas that are data, not code: each
//! field gets a rule (presence, nullability, type, pattern, allow-list,
//! array/JSON/email shape) and nested objects or arrays get nested schemas.
//! Validation stops at the first violation.
//!
//! # Examples
//!
//! ## Building a Schema
//!
//! ```
//! use serde_json::json;
//! use vouch_validation::{validate, FieldRule, Schema, ValueType};
//!
//! let schema = Schema::new()
//!     .field("name", FieldRule::new().of_type(ValueType::String).non_empty())
//!     .field("email", FieldRule::new().email().error_message("email is invalid"))
//!     .field("age", FieldRule::new().optional().nullable(true).of_type(ValueType::Number));
//!
//! assert!(validate(&json!({ "name": "John", "email": "john@example.com" }), &schema).is_ok());
//!
//! let err = validate(&json!({ "name": "John", "email": "john" }), &schema).unwrap_err();
//! assert_eq!(err.to_string(), "email is invalid");
//! ```
//!
//! ## Schemas as Data
//!
//! ```
//! use serde_json::json;
//! use vouch_validation::{Schema, ValidationOptions, Validator};
//!
//! let schema = Schema::from_json(&json!({
//!     "items": {
//!         "isArray": true,
//!         "childrenSchema": {
//!             "sku": { "type": "string", "regex": "^[A-Z]{3}-\\d+$" },
//!             "qty": { "type": "number" }
//!         }
//!     }
//! })).unwrap();
//!
//! let validator = Validator::new(schema)
//!     .unwrap()
//!     .with_options(ValidationOptions::new().deny_extra_properties());
//!
//! assert!(validator.validate(&json!({ "items": [{ "sku": "ABC-1", "qty": 2 }] })).is_ok());
//!
//! let err = validator.validate(&json!({ "items": [{ "sku": "abc", "qty": 2 }] })).unwrap_err();
//! assert_eq!(err.to_string(), "invalid value of sku");
//! ```
//!
//! ## Direct Rules
//!
//! ```
//! use serde_json::json;
//! use vouch_validation::{validate, FieldRule, Schema, ValueType};
//!
//! let schema = Schema::direct(FieldRule::new().of_type(ValueType::String));
//!
//! assert!(validate(&json!("hello world"), &schema).is_ok());
//! assert!(validate(&json!(42), &schema).is_err());
//! ```
//!
//! Schemas are plain trees, so nesting depth is bounded only by the stack.

mod errors;
mod options;
mod rules;
mod schema;
mod validator;
mod validators;
mod value;

pub use errors::*;
pub use options::*;
pub use rules::*;
pub use schema::*;
pub use validator::*;
pub use validators::*;
pub use value::*;
