//! Shape validation for filter objects against a declared field list.
//!
//! The compiler only rejects bad identifiers and unknown operators. A
//! [`QuerySchema`] goes further: it knows which fields exist and what types
//! they hold, and it reports every problem in a filter at once so an API can
//! answer with a complete error list.
//!
//! ```
//! use query_to_pg::validator::{PrimitiveType, QuerySchema};
//! use serde_json::json;
//!
//! let schema = QuerySchema::new()
//!     .with_field("age", PrimitiveType::Integer)
//!     .with_field("name", PrimitiveType::String);
//!
//! assert!(schema.validate(&json!({"age": {"$gte": 18}, "$limit": 5})).valid);
//!
//! let report = schema.validate(&json!({"age": "old", "email": "x"}));
//! assert!(!report.valid);
//! assert_eq!(report.errors.len(), 2);
//! ```

use crate::ast::ComparisonOperator;
use crate::config::{DEFAULT_LIMIT, LIMIT_KEY, OR_KEY, SKIP_KEY, SORT_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl PrimitiveType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PrimitiveType::String => value.is_string(),
            PrimitiveType::Number => value.is_number(),
            PrimitiveType::Integer => as_integer(value).is_some(),
            PrimitiveType::Boolean => value.is_boolean(),
            PrimitiveType::Null => value.is_null(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
        }
    }
}

/// One type or a union of types, written `"string"` or `["string", "null"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    Single(PrimitiveType),
    Union(Vec<PrimitiveType>),
}

impl FieldType {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::Single(ty) => ty.matches(value),
            FieldType::Union(types) => types.iter().any(|ty| ty.matches(value)),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            FieldType::Single(ty) => json!(ty.as_str()),
            FieldType::Union(types) => json!(types.iter().map(|ty| ty.as_str()).collect::<Vec<_>>()),
        }
    }
}

impl From<PrimitiveType> for FieldType {
    fn from(ty: PrimitiveType) -> Self {
        FieldType::Single(ty)
    }
}

impl From<Vec<PrimitiveType>> for FieldType {
    fn from(types: Vec<PrimitiveType>) -> Self {
        FieldType::Union(types)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Single(ty) => f.write_str(ty.as_str()),
            FieldType::Union(types) => {
                let names: Vec<&str> = types.iter().map(|ty| ty.as_str()).collect();
                f.write_str(&names.join(","))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub ty: FieldType,
}

/// Declared field names and their types.
pub type Fields = BTreeMap<String, FieldSpec>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// JSON pointer to the offending value, `""` for the root.
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn from_issues(errors: Vec<ValidationIssue>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuerySchema {
    fields: Fields,
}

impl QuerySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    pub fn with_field(mut self, name: impl Into<String>, ty: impl Into<FieldType>) -> Self {
        self.fields.insert(name.into(), FieldSpec { ty: ty.into() });
        self
    }

    /// Checks `filter` and collects every violation rather than stopping at the first.
    pub fn validate(&self, filter: &Value) -> ValidationReport {
        let mut issues = Vec::new();

        match filter.as_object() {
            None => issues.push(ValidationIssue::new("", "must be object")),
            Some(object) => {
                for (key, value) in object {
                    let path = pointer("", key);
                    match key.as_str() {
                        OR_KEY => self.check_disjunction(&path, value, &mut issues),
                        LIMIT_KEY | SKIP_KEY => check_bound(&path, value, &mut issues),
                        SORT_KEY => check_sort(&path, value, &mut issues),
                        name => match self.fields.get(name) {
                            Some(spec) => check_field(&path, spec, value, &mut issues),
                            None => issues.push(ValidationIssue::new(
                                path,
                                "must NOT have additional properties",
                            )),
                        },
                    }
                }
            }
        }

        if !issues.is_empty() {
            tracing::debug!(issues = issues.len(), "filter failed schema validation");
        }
        ValidationReport::from_issues(issues)
    }

    fn check_disjunction(&self, path: &str, value: &Value, issues: &mut Vec<ValidationIssue>) {
        let Some(items) = value.as_array() else {
            issues.push(ValidationIssue::new(path, "must be array"));
            return;
        };

        for (index, item) in items.iter().enumerate() {
            let item_path = pointer(path, &index.to_string());
            let Some(entry) = item.as_object() else {
                issues.push(ValidationIssue::new(item_path, "must be object"));
                continue;
            };
            if entry.len() > 1 {
                issues.push(ValidationIssue::new(
                    item_path.clone(),
                    "must NOT have more than 1 properties",
                ));
            }
            // $or entries are held to the declared fields, same as the top level
            for (key, value) in entry {
                let field_path = pointer(&item_path, key);
                match self.fields.get(key) {
                    Some(spec) => check_field(&field_path, spec, value, issues),
                    None => issues.push(ValidationIssue::new(
                        field_path,
                        "must NOT have additional properties",
                    )),
                }
            }
        }
    }

    /// Renders the equivalent JSON Schema document.
    pub fn to_json_schema(&self) -> Value {
        let mut properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, spec)| (name.clone(), field_schema(&spec.ty)))
            .collect();

        // Entries are closed like the root object, so `additionalProperties` is false here too.
        let entry_properties = properties.clone();
        properties.insert(
            OR_KEY.to_string(),
            json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "maxProperties": 1,
                    "additionalProperties": false,
                    "properties": entry_properties,
                }
            }),
        );
        properties.insert(
            LIMIT_KEY.to_string(),
            json!({"type": "integer", "nullable": true, "minimum": 0, "default": DEFAULT_LIMIT}),
        );
        properties.insert(
            SKIP_KEY.to_string(),
            json!({"type": "integer", "nullable": true, "minimum": 0, "default": 0}),
        );
        properties.insert(
            SORT_KEY.to_string(),
            json!({
                "type": "object",
                "additionalProperties": {"type": "integer", "enum": [1, -1]},
                "nullable": true
            }),
        );

        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": properties,
        })
    }
}

fn field_schema(ty: &FieldType) -> Value {
    let comparison: Map<String, Value> = ComparisonOperator::ALL
        .iter()
        .map(|op| {
            (
                op.directive().to_string(),
                json!({"type": ty.to_json(), "nullable": true}),
            )
        })
        .collect();

    json!({
        "anyOf": [
            {"type": ty.to_json()},
            {"type": "object", "additionalProperties": false, "properties": comparison}
        ]
    })
}

/// A field takes a value of its declared type, or a comparison object whose
/// operands are of that type or null.
fn check_field(path: &str, spec: &FieldSpec, value: &Value, issues: &mut Vec<ValidationIssue>) {
    if spec.ty.accepts(value) {
        return;
    }

    let Some(directives) = value.as_object() else {
        issues.push(ValidationIssue::new(
            path,
            format!("must be {} or a comparison object", spec.ty),
        ));
        return;
    };

    for (directive, operand) in directives {
        let operand_path = pointer(path, directive);
        if ComparisonOperator::from_directive(directive).is_none() {
            issues.push(ValidationIssue::new(
                operand_path,
                "must NOT have additional properties",
            ));
        } else if !operand.is_null() && !spec.ty.accepts(operand) {
            issues.push(ValidationIssue::new(operand_path, format!("must be {}", spec.ty)));
        }
    }
}

fn check_bound(path: &str, value: &Value, issues: &mut Vec<ValidationIssue>) {
    if value.is_null() {
        return;
    }
    match as_integer(value) {
        Some(n) if n < 0.0 => issues.push(ValidationIssue::new(path, "must be >= 0")),
        Some(_) => {}
        None => issues.push(ValidationIssue::new(path, "must be integer")),
    }
}

fn check_sort(path: &str, value: &Value, issues: &mut Vec<ValidationIssue>) {
    if value.is_null() {
        return;
    }
    let Some(terms) = value.as_object() else {
        issues.push(ValidationIssue::new(path, "must be object"));
        return;
    };

    for (field, direction) in terms {
        let term_path = pointer(path, field);
        match as_integer(direction) {
            Some(n) if n == 1.0 || n == -1.0 => {}
            Some(_) => issues.push(ValidationIssue::new(
                term_path,
                "must be equal to one of the allowed values",
            )),
            None => issues.push(ValidationIssue::new(term_path, "must be integer")),
        }
    }
}

/// Numbers with no fractional part count as integers, `5.0` included.
fn as_integer(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.fract() == 0.0)
}

fn pointer(parent: &str, key: &str) -> String {
    let escaped = key.replace('~', "~0").replace('/', "~1");
    format!("{}/{}", parent, escaped)
}
