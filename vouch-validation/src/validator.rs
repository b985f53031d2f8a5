// Recursive schema validation

use crate::validators::{is_array_like, is_email, is_json, parse_structured};
use crate::value::{coerce_to_string, is_null_like, strict_equals};
use crate::{
    Constraint, ErrorMessage, FieldRule, Schema, SchemaError, ValidationError, ValidationOptions,
    ValueType,
};
use serde_json::Value;
use tracing::{debug, trace};

type Check = fn(&Value, &FieldRule) -> bool;

// Evaluated in order after the nullable short-circuit. Unset attributes pass.
const CHECKS: &[(Constraint, Check)] = &[
    (Constraint::Type, check_type as Check),
    (Constraint::Regex, check_regex as Check),
    (Constraint::Empty, check_empty as Check),
    (Constraint::InValues, check_in_values as Check),
    (Constraint::IsArray, check_is_array as Check),
    (Constraint::IsJson, check_is_json as Check),
    (Constraint::IsEmail, check_is_email as Check),
];

/// Validate a value against a schema with default options.
///
/// Stops at the first violation.
///
/// ```
/// use serde_json::json;
/// use vouch_validation::{validate, FieldRule, Schema, ValueType};
///
/// let schema = Schema::new().field("foo", FieldRule::new().of_type(ValueType::Number));
///
/// assert!(validate(&json!({ "foo": 1 }), &schema).is_ok());
///
/// let err = validate(&json!({ "foo": "tom" }), &schema).unwrap_err();
/// assert_eq!(err.to_string(), "invalid value of foo");
/// ```
pub fn validate(input: &Value, schema: &Schema) -> Result<(), ValidationError> {
    validate_with_options(input, schema, &ValidationOptions::default())
}

/// Validate a value against a schema.
///
/// The schema is checked first: a child schema without `isJson` or a
/// children schema without `isArray` fails whatever the input.
pub fn validate_with_options(
    input: &Value,
    schema: &Schema,
    options: &ValidationOptions,
) -> Result<(), ValidationError> {
    if let Err(err) = schema.check() {
        debug!("Rejected schema: {}", err);
        return Err(err.into());
    }

    validate_checked(input, schema, options)
}

/// Reusable validator over a checked schema.
///
/// The schema is checked once on construction. A validator is `Send + Sync`
/// and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Schema,
    options: ValidationOptions,
}

impl Validator {
    /// Create a validator with default options
    pub fn new(schema: Schema) -> Result<Self, SchemaError> {
        schema.check()?;
        Ok(Self {
            schema,
            options: ValidationOptions::default(),
        })
    }

    /// Replace the options
    pub fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Get the schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Get the options
    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Validate a value
    pub fn validate(&self, input: &Value) -> Result<(), ValidationError> {
        validate_checked(input, &self.schema, &self.options)
    }

    /// Check whether a value is valid
    pub fn is_valid(&self, input: &Value) -> bool {
        self.validate(input).is_ok()
    }
}

impl TryFrom<Schema> for Validator {
    type Error = SchemaError;

    fn try_from(schema: Schema) -> Result<Self, Self::Error> {
        Validator::new(schema)
    }
}

fn validate_checked(
    input: &Value,
    schema: &Schema,
    options: &ValidationOptions,
) -> Result<(), ValidationError> {
    let fields = match schema {
        // Same as a one-field schema keyed by the parent key wrapping the input
        Schema::Direct(rule) => return validate_field(options.parent_key(), Some(input), rule),
        Schema::Fields(fields) => fields,
    };

    // Non-object inputs expose no keys
    let object = input.as_object();

    if !options.allow_extra_properties {
        let unknown = object.and_then(|object| object.keys().find(|key| schema.rule(key).is_none()));
        if let Some(key) = unknown {
            debug!("Unknown input key: {}", key);
            return Err(ValidationError::invalid(
                key.as_str(),
                Constraint::UnknownField,
                format!("unknown input {}", key),
            ));
        }
    }

    for (key, rule) in fields {
        validate_field(key, object.and_then(|object| object.get(key)), rule)?;
    }

    Ok(())
}

fn validate_field(key: &str, value: Option<&Value>, rule: &FieldRule) -> Result<(), ValidationError> {
    trace!("Validating field: {}", key);

    let Some(value) = value else {
        if rule.optional {
            return Ok(());
        }
        return reject(key, None, rule, Constraint::Required);
    };

    match evaluate(key, value, rule)? {
        None => Ok(()),
        Some(constraint) => reject(key, Some(value), rule, constraint),
    }
}

/// Run the checks of a present field.
///
/// `Ok(Some(_))` names the violated constraint. Failures inside nested
/// schemas come back as `Err` and propagate untouched.
fn evaluate(key: &str, value: &Value, rule: &FieldRule) -> Result<Option<Constraint>, ValidationError> {
    if is_null_like(value) {
        match rule.nullable {
            Some(true) => return Ok(None),
            Some(false) => return Ok(Some(Constraint::Nullable)),
            None => {}
        }
    }

    if let Some((constraint, _)) = CHECKS.iter().find(|(_, check)| !check(value, rule)) {
        return Ok(Some(*constraint));
    }

    if let Some(child) = &rule.child_schema {
        // isJson held, so a string value parses
        let Some(parsed) = parse_structured(value) else {
            return Ok(Some(Constraint::IsJson));
        };
        validate_checked(&parsed, child, &ValidationOptions::nested(key))?;
    }

    if let Some(children) = &rule.children_schema {
        let parsed = parse_structured(value);
        let Some(Value::Array(items)) = parsed.as_deref() else {
            return Ok(Some(Constraint::IsArray));
        };
        let options = ValidationOptions::nested(key);
        for item in items {
            validate_checked(item, children, &options)?;
        }
    }

    Ok(None)
}

/// Turn a violation into the field's failure, or nothing if its callback vetoes.
fn reject(
    key: &str,
    value: Option<&Value>,
    rule: &FieldRule,
    constraint: Constraint,
) -> Result<(), ValidationError> {
    let message = match &rule.error {
        Some(ErrorMessage::Literal(message)) => message.clone(),
        Some(ErrorMessage::Callback(callback)) => match callback(key, value, rule) {
            Some(message) => message,
            None => {
                debug!("Error callback of {} vetoed {} failure", key, constraint);
                return Ok(());
            }
        },
        None => format!("invalid value of {}", key),
    };

    debug!("Field {} failed {} check", key, constraint);
    Err(ValidationError::invalid(key, constraint, message))
}

fn check_type(value: &Value, rule: &FieldRule) -> bool {
    rule.types
        .as_ref()
        .is_none_or(|types| types.accepts(ValueType::of(value)))
}

fn check_regex(value: &Value, rule: &FieldRule) -> bool {
    rule.regex
        .as_ref()
        .is_none_or(|regex| regex.is_match(&coerce_to_string(value)))
}

fn check_empty(value: &Value, rule: &FieldRule) -> bool {
    rule.empty || !coerce_to_string(value).is_empty()
}

fn check_in_values(value: &Value, rule: &FieldRule) -> bool {
    rule.in_values
        .as_ref()
        .is_none_or(|allowed| allowed.iter().any(|candidate| strict_equals(value, candidate)))
}

fn check_is_array(value: &Value, rule: &FieldRule) -> bool {
    !rule.is_array || is_array_like(value)
}

fn check_is_json(value: &Value, rule: &FieldRule) -> bool {
    !rule.is_json || is_json(value)
}

fn check_is_email(value: &Value, rule: &FieldRule) -> bool {
    !rule.is_email || is_email(value)
}
