// Schemas and their JSON form

use crate::{DEFAULT_PARENT_KEY, ErrorMessage, FieldRule, SchemaError, TypeSpec, ValueType};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Rules for an input value.
///
/// Either per-field rules for an object, evaluated in declaration order, or a
/// single direct rule applied to the whole value.
#[derive(Debug, Clone)]
pub enum Schema {
    Fields(Vec<(String, FieldRule)>),
    Direct(Box<FieldRule>),
}

impl Default for Schema {
    fn default() -> Self {
        Schema::Fields(Vec::new())
    }
}

impl Schema {
    /// Create an empty field schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema applying one rule to the whole value
    pub fn direct(rule: FieldRule) -> Self {
        Schema::Direct(Box::new(rule))
    }

    /// Add a field rule.
    ///
    /// Redefining a field replaces its rule in place. On a direct schema the
    /// direct rule is discarded and the schema becomes a field schema.
    pub fn field(self, name: impl Into<String>, rule: FieldRule) -> Self {
        let name = name.into();
        let mut fields = match self {
            Schema::Fields(fields) => fields,
            Schema::Direct(_) => Vec::new(),
        };

        match fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = rule,
            None => fields.push((name, rule)),
        }

        Schema::Fields(fields)
    }

    /// Get the rule of a field
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        match self {
            Schema::Fields(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, rule)| rule),
            Schema::Direct(_) => None,
        }
    }

    /// Iterate field rules in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        let fields: &[(String, FieldRule)] = match self {
            Schema::Fields(fields) => fields,
            Schema::Direct(_) => &[],
        };
        fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Get the number of field rules
    pub fn len(&self) -> usize {
        match self {
            Schema::Fields(fields) => fields.len(),
            Schema::Direct(_) => 1,
        }
    }

    /// Check if there are no rules
    pub fn is_empty(&self) -> bool {
        matches!(self, Schema::Fields(fields) if fields.is_empty())
    }

    /// Check if this is a direct schema
    pub fn is_direct(&self) -> bool {
        matches!(self, Schema::Direct(_))
    }

    /// Check the nested-schema invariants of every rule, recursively.
    ///
    /// A child schema needs `isJson` and a children schema needs `isArray`.
    pub fn check(&self) -> Result<(), SchemaError> {
        match self {
            Schema::Direct(rule) => check_rule(DEFAULT_PARENT_KEY, rule),
            Schema::Fields(fields) => fields
                .iter()
                .try_for_each(|(field, rule)| check_rule(field, rule)),
        }
    }

    /// Parse a schema from its JSON form and check it.
    ///
    /// ```
    /// use serde_json::json;
    /// use vouch_validation::Schema;
    ///
    /// let schema = Schema::from_json(&json!({
    ///     "name": { "type": "string", "empty": false },
    ///     "tags": { "optional": true, "isArray": true, "childrenSchema": { "direct": true, "type": "string" } }
    /// })).unwrap();
    ///
    /// assert_eq!(schema.len(), 2);
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        let schema = parse_schema(value)?;
        schema.check()?;
        Ok(schema)
    }
}

impl TryFrom<&Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Schema::from_json(value)
    }
}

impl TryFrom<Value> for Schema {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Schema::from_json(&value)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Schema::from_json(&value).map_err(serde::de::Error::custom)
    }
}

fn check_rule(field: &str, rule: &FieldRule) -> Result<(), SchemaError> {
    if let Some(child) = &rule.child_schema {
        if !rule.is_json {
            return Err(SchemaError::ChildSchemaRequiresJson {
                field: field.to_string(),
            });
        }
        child.check()?;
    }

    if let Some(children) = &rule.children_schema {
        if !rule.is_array {
            return Err(SchemaError::ChildrenSchemaRequiresArray {
                field: field.to_string(),
            });
        }
        children.check()?;
    }

    Ok(())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_schema(value: &Value) -> Result<Schema, SchemaError> {
    let map = value.as_object().ok_or(SchemaError::NotAnObject {
        found: kind_of(value),
    })?;

    match map.get("direct") {
        Some(Value::Bool(true)) => {
            let rest: Map<String, Value> = map
                .iter()
                .filter(|(attribute, _)| *attribute != "direct")
                .map(|(attribute, value)| (attribute.clone(), value.clone()))
                .collect();
            Ok(Schema::direct(parse_rule(DEFAULT_PARENT_KEY, &rest)?))
        }
        _ => {
            let mut fields = Vec::with_capacity(map.len());
            for (field, rule) in map {
                // `direct: false` is the flag turned off, not a field
                if field == "direct" && rule.is_boolean() {
                    continue;
                }
                let rule = rule
                    .as_object()
                    .ok_or_else(|| SchemaError::RuleNotAnObject {
                        field: field.clone(),
                    })?;
                fields.push((field.clone(), parse_rule(field, rule)?));
            }
            Ok(Schema::Fields(fields))
        }
    }
}

fn parse_rule(field: &str, map: &Map<String, Value>) -> Result<FieldRule, SchemaError> {
    let mut rule = FieldRule::new();

    for (attribute, value) in map {
        match attribute.as_str() {
            "optional" => rule.optional = flag(field, "optional", value)?,
            "nullable" => {
                rule.nullable = match value {
                    Value::Null => None,
                    other => Some(flag(field, "nullable", other)?),
                }
            }
            "type" => rule.types = Some(parse_types(field, value)?),
            "regex" => {
                let pattern = value.as_str().ok_or_else(|| invalid(field, "regex", "a string"))?;
                let regex = Regex::new(pattern).map_err(|e| SchemaError::InvalidRegex {
                    field: field.to_string(),
                    reason: e.to_string(),
                })?;
                rule.regex = Some(regex);
            }
            "empty" => rule.empty = flag(field, "empty", value)?,
            "inValues" => {
                let values = value
                    .as_array()
                    .ok_or_else(|| invalid(field, "inValues", "an array"))?;
                rule.in_values = Some(values.clone());
            }
            "isArray" => rule.is_array = flag(field, "isArray", value)?,
            "isJson" => rule.is_json = flag(field, "isJson", value)?,
            "isEmail" => rule.is_email = flag(field, "isEmail", value)?,
            "childSchema" => {
                if !value.is_object() {
                    return Err(invalid(field, "childSchema", "a schema object"));
                }
                rule.child_schema = Some(Box::new(parse_schema(value)?));
            }
            "childrenSchema" => {
                if !value.is_object() {
                    return Err(invalid(field, "childrenSchema", "a schema object"));
                }
                rule.children_schema = Some(Box::new(parse_schema(value)?));
            }
            "error" => {
                let message = value.as_str().ok_or_else(|| invalid(field, "error", "a string"))?;
                rule.error = Some(ErrorMessage::from(message));
            }
            other => {
                return Err(SchemaError::UnknownAttribute {
                    field: field.to_string(),
                    attribute: other.to_string(),
                });
            }
        }
    }

    Ok(rule)
}

fn parse_types(field: &str, value: &Value) -> Result<TypeSpec, SchemaError> {
    let parse_one = |value: &Value| -> Result<ValueType, SchemaError> {
        let name = value
            .as_str()
            .ok_or_else(|| invalid(field, "type", "a type name or a list of type names"))?;
        name.parse::<ValueType>().map_err(|name| SchemaError::UnknownType {
            field: field.to_string(),
            name,
        })
    };

    match value {
        Value::Array(names) => Ok(TypeSpec::AnyOf(
            names.iter().map(parse_one).collect::<Result<_, _>>()?,
        )),
        other => parse_one(other).map(TypeSpec::One),
    }
}

fn flag(field: &str, attribute: &'static str, value: &Value) -> Result<bool, SchemaError> {
    value
        .as_bool()
        .ok_or_else(|| invalid(field, attribute, "a boolean"))
}

fn invalid(field: &str, attribute: &'static str, expected: &'static str) -> SchemaError {
    SchemaError::InvalidAttribute {
        field: field.to_string(),
        attribute,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let schema = Schema::new()
            .field("zeta", FieldRule::new())
            .field("alpha", FieldRule::new().optional())
            .field("zeta", FieldRule::new().optional());

        let names: Vec<&str> = schema.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(schema.rule("zeta").unwrap().optional);
        assert!(schema.rule("missing").is_none());
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_direct_schema() {
        let schema = Schema::direct(FieldRule::new().of_type(ValueType::String));
        assert!(schema.is_direct());
        assert!(!schema.is_empty());
        assert_eq!(schema.fields().count(), 0);
        assert!(Schema::new().is_empty());
    }

    #[test]
    fn test_check_child_schema_requires_json() {
        let schema = Schema::new().field(
            "foo",
            FieldRule::new().child_schema(Schema::new().field("bar", FieldRule::new())),
        );
        assert_eq!(
            schema.check(),
            Err(SchemaError::ChildSchemaRequiresJson {
                field: "foo".to_string()
            })
        );
    }

    #[test]
    fn test_check_children_schema_requires_array() {
        let inner = Schema::new().field(
            "bar",
            FieldRule::new().children_schema(Schema::direct(FieldRule::new())),
        );
        let schema = Schema::new().field("foo", FieldRule::new().json().child_schema(inner));
        assert_eq!(
            schema.check(),
            Err(SchemaError::ChildrenSchemaRequiresArray {
                field: "bar".to_string()
            })
        );
    }

    #[test]
    fn test_parse_full_rule() {
        let schema = Schema::from_json(&json!({
            "foo": {
                "optional": true,
                "nullable": false,
                "type": ["boolean", "string"],
                "regex": "^a",
                "empty": false,
                "inValues": ["a", "ab"],
                "isEmail": true,
                "error": "bad foo"
            }
        }))
        .unwrap();

        let rule = schema.rule("foo").unwrap();
        assert!(rule.optional);
        assert_eq!(rule.nullable, Some(false));
        assert_eq!(
            rule.types,
            Some(TypeSpec::AnyOf(vec![ValueType::Boolean, ValueType::String]))
        );
        assert!(rule.regex.as_ref().unwrap().is_match("abc"));
        assert!(!rule.empty);
        assert_eq!(rule.in_values, Some(vec![json!("a"), json!("ab")]));
        assert!(rule.is_email);
        assert!(matches!(&rule.error, Some(ErrorMessage::Literal(m)) if m == "bad foo"));
    }

    #[test]
    fn test_parse_nested() {
        let schema = Schema::from_json(&json!({
            "foo": {
                "isArray": true,
                "childrenSchema": {
                    "bar": { "isJson": true, "childSchema": { "baz": { "type": "number" } } }
                }
            },
            "list": { "isArray": true, "childrenSchema": { "direct": true, "type": "string" } }
        }))
        .unwrap();

        let foo = schema.rule("foo").unwrap();
        let children = foo.children_schema.as_ref().unwrap();
        let bar = children.rule("bar").unwrap();
        assert!(bar.child_schema.as_ref().unwrap().rule("baz").is_some());

        let list = schema.rule("list").unwrap();
        assert!(list.children_schema.as_ref().unwrap().is_direct());
    }

    #[test]
    fn test_parse_direct() {
        let schema = Schema::from_json(&json!({ "direct": true, "type": "number" })).unwrap();
        match schema {
            Schema::Direct(rule) => assert_eq!(rule.types, Some(TypeSpec::One(ValueType::Number))),
            other => panic!("expected direct schema, got {:?}", other),
        }

        let schema = Schema::from_json(&json!({ "direct": false, "foo": {} })).unwrap();
        assert_eq!(schema.len(), 1);

        let schema = Schema::from_json(&json!({ "direct": { "optional": true } })).unwrap();
        assert!(schema.rule("direct").unwrap().optional);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Schema::from_json(&json!([])).unwrap_err(),
            SchemaError::NotAnObject { found: "an array" }
        );
        assert_eq!(
            Schema::from_json(&json!({ "foo": true })).unwrap_err(),
            SchemaError::RuleNotAnObject {
                field: "foo".to_string()
            }
        );
        assert_eq!(
            Schema::from_json(&json!({ "foo": { "optinal": true } })).unwrap_err(),
            SchemaError::UnknownAttribute {
                field: "foo".to_string(),
                attribute: "optinal".to_string()
            }
        );
        assert_eq!(
            Schema::from_json(&json!({ "foo": { "isJson": "yes" } })).unwrap_err(),
            SchemaError::InvalidAttribute {
                field: "foo".to_string(),
                attribute: "isJson",
                expected: "a boolean"
            }
        );
        assert_eq!(
            Schema::from_json(&json!({ "foo": { "type": ["string", "symbol"] } })).unwrap_err(),
            SchemaError::UnknownType {
                field: "foo".to_string(),
                name: "symbol".to_string()
            }
        );
        assert!(matches!(
            Schema::from_json(&json!({ "foo": { "regex": "(" } })).unwrap_err(),
            SchemaError::InvalidRegex { field, .. } if field == "foo"
        ));
        assert_eq!(
            Schema::from_json(&json!({ "foo": { "childSchema": { "bar": {} } } })).unwrap_err(),
            SchemaError::ChildSchemaRequiresJson {
                field: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_deserialize() {
        let schema: Schema =
            serde_json::from_str(r#"{ "id": { "type": "number" }, "name": { "optional": true } }"#)
                .unwrap();
        assert_eq!(schema.len(), 2);

        let err = serde_json::from_str::<Schema>(r#"{ "id": { "type": "date" } }"#).unwrap_err();
        assert!(err.to_string().contains("unknown type `date`"));
    }
}
