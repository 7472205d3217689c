use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Field mapping keyed by dotted path name. `BTreeMap` keeps iteration
/// order deterministic for hashing and rendering.
pub type FieldMap = BTreeMap<String, SchemaField>;

/// Inferred type tag for a single JSON value.
///
/// Exactly one tag per observed value. `Unknown` is the escape hatch for
/// tags read back from older cache files that this build does not produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Datetime,
    Uuid,
    Url,
    Array,
    Object,
    Unknown,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Null => "null",
            FieldType::Boolean => "boolean",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Datetime => "datetime",
            FieldType::Uuid => "uuid",
            FieldType::Url => "url",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inferred field of a schema.
///
/// Created fresh on every analysis pass and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Dotted path from the analyzed object's root, e.g. `user.profile.name`.
    pub name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub nullable: bool,
    /// Self-contained sub-schema, populated only for objects and for
    /// arrays whose first element is an object.
    #[serde(default)]
    pub nested_schema: Option<FieldMap>,
    /// Last observed literal value, truncated for storage.
    #[serde(default)]
    pub example_value: Option<Value>,
    #[serde(default)]
    pub description: String,
}
