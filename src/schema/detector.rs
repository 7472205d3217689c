//! Type inference and recursive structural analysis of JSON payloads.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use uuid::Uuid;

use super::endpoint::truncate_example;
use super::field::{FieldMap, FieldType, SchemaField};

pub const DEFAULT_MAX_DEPTH: usize = 5;
pub const DEFAULT_EXAMPLE_MAX_CHARS: usize = 100;

/// Classify a single JSON value into a [`FieldType`] tag.
///
/// Booleans are a distinct `Value` variant, so they can never be
/// misclassified as numeric. Whole numbers are `integer`, everything
/// else numeric is `number`. Strings are subtyped by pattern; see
/// [`is_iso_datetime`], [`is_uuid`] and [`is_url`] for the precedence.
pub fn detect_type(value: &Value) -> FieldType {
    match value {
        Value::Null => FieldType::Null,
        Value::Bool(_) => FieldType::Boolean,
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                FieldType::Integer
            } else {
                FieldType::Number
            }
        }
        Value::String(s) => {
            if is_iso_datetime(s) {
                FieldType::Datetime
            } else if is_uuid(s) {
                FieldType::Uuid
            } else if is_url(s) {
                FieldType::Url
            } else {
                FieldType::String
            }
        }
        Value::Array(_) => FieldType::Array,
        Value::Object(_) => FieldType::Object,
    }
}

/// ISO-8601 check: full RFC 3339 (trailing `Z` accepted), naive
/// datetime, or date-only.
fn is_iso_datetime(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || value.parse::<NaiveDateTime>().is_ok()
        || value.parse::<NaiveDate>().is_ok()
}

/// Canonical hyphenated 8-4-4-4-12 form only; the hyphenated encoding is
/// exactly 36 characters, which rules out simple/braced/urn variants.
fn is_uuid(value: &str) -> bool {
    value.len() == 36 && Uuid::try_parse(value).is_ok()
}

fn is_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Walks a JSON object and extracts its structural schema.
#[derive(Debug, Clone)]
pub struct SchemaDetector {
    max_depth: usize,
    example_max_chars: usize,
}

impl Default for SchemaDetector {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            example_max_chars: DEFAULT_EXAMPLE_MAX_CHARS,
        }
    }
}

impl SchemaDetector {
    pub fn new(max_depth: usize, example_max_chars: usize) -> Self {
        Self {
            max_depth,
            example_max_chars,
        }
    }

    /// Analyze a JSON response and extract its field mapping.
    ///
    /// Non-object input yields an empty mapping, not an error: upstream
    /// payloads are not under this system's control.
    pub fn analyze_response(&self, data: &Value) -> FieldMap {
        let mut fields = FieldMap::new();
        if let Value::Object(obj) = data {
            self.analyze_object(obj, &mut fields, "", self.max_depth);
        }
        fields
    }

    fn analyze_object(
        &self,
        obj: &serde_json::Map<String, Value>,
        fields: &mut FieldMap,
        prefix: &str,
        remaining_depth: usize,
    ) {
        if remaining_depth == 0 {
            return;
        }

        for (key, value) in obj {
            let field_name = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            let field_type = detect_type(value);

            // Nested schemas are self-contained: the prefix resets so their
            // field names are relative to the nested object, not the root.
            let nested = match value {
                Value::Object(nested_obj) => {
                    let mut nested_fields = FieldMap::new();
                    self.analyze_object(nested_obj, &mut nested_fields, "", remaining_depth - 1);
                    Some(nested_fields)
                }
                Value::Array(items) => match items.first() {
                    Some(Value::Object(first)) => {
                        let mut nested_fields = FieldMap::new();
                        self.analyze_object(first, &mut nested_fields, "", remaining_depth - 1);
                        Some(nested_fields)
                    }
                    _ => None,
                },
                _ => None,
            };

            fields.insert(
                field_name.clone(),
                SchemaField {
                    name: field_name,
                    field_type,
                    nullable: value.is_null(),
                    nested_schema: nested.filter(|n| !n.is_empty()),
                    example_value: Some(truncate_example(value, self.example_max_chars)),
                    description: String::new(),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_primitive_types() {
        assert_eq!(detect_type(&Value::Null), FieldType::Null);
        assert_eq!(detect_type(&json!(true)), FieldType::Boolean);
        assert_eq!(detect_type(&json!(false)), FieldType::Boolean);
        assert_eq!(detect_type(&json!(42)), FieldType::Integer);
        assert_eq!(detect_type(&json!(-7)), FieldType::Integer);
        assert_eq!(detect_type(&json!(3.14)), FieldType::Number);
        assert_eq!(detect_type(&json!([1, 2, 3])), FieldType::Array);
        assert_eq!(detect_type(&json!({"k": "v"})), FieldType::Object);
    }

    #[test]
    fn test_detect_string_subtypes() {
        assert_eq!(
            detect_type(&json!("2024-01-15T12:00:00Z")),
            FieldType::Datetime
        );
        assert_eq!(
            detect_type(&json!("2024-01-15T12:00:00+02:00")),
            FieldType::Datetime
        );
        assert_eq!(detect_type(&json!("2024-01-15")), FieldType::Datetime);
        assert_eq!(
            detect_type(&json!("550e8400-e29b-41d4-a716-446655440000")),
            FieldType::Uuid
        );
        assert_eq!(
            detect_type(&json!("550E8400-E29B-41D4-A716-446655440000")),
            FieldType::Uuid
        );
        assert_eq!(
            detect_type(&json!("https://example.com/path")),
            FieldType::Url
        );
        assert_eq!(detect_type(&json!("http://example.com")), FieldType::Url);
        assert_eq!(detect_type(&json!("hello")), FieldType::String);
        assert_eq!(detect_type(&json!("")), FieldType::String);
    }

    #[test]
    fn test_non_hyphenated_uuid_is_plain_string() {
        assert_eq!(
            detect_type(&json!("550e8400e29b41d4a716446655440000")),
            FieldType::String
        );
    }

    #[test]
    fn test_flat_analysis() {
        let detector = SchemaDetector::default();
        let fields = detector.analyze_response(&json!({
            "id": "123",
            "name": "Test",
            "count": 42,
            "active": true,
        }));

        assert_eq!(fields.len(), 4);
        assert_eq!(fields["id"].field_type, FieldType::String);
        assert_eq!(fields["name"].field_type, FieldType::String);
        assert_eq!(fields["count"].field_type, FieldType::Integer);
        assert_eq!(fields["active"].field_type, FieldType::Boolean);
        assert!(!fields["id"].nullable);
    }

    #[test]
    fn test_nested_analysis() {
        let detector = SchemaDetector::default();
        let fields = detector.analyze_response(&json!({
            "user": {"id": "123", "profile": {"name": "Test"}}
        }));

        let user = &fields["user"];
        assert_eq!(user.field_type, FieldType::Object);
        let nested = user.nested_schema.as_ref().unwrap();
        assert_eq!(nested["id"].field_type, FieldType::String);
        let profile = nested["profile"].nested_schema.as_ref().unwrap();
        assert_eq!(profile["name"].field_type, FieldType::String);
    }

    #[test]
    fn test_array_of_objects_uses_first_element() {
        let detector = SchemaDetector::default();
        let fields = detector.analyze_response(&json!({
            "games": [{"score": 5000}, {"score": "not inspected"}]
        }));

        let games = &fields["games"];
        assert_eq!(games.field_type, FieldType::Array);
        let nested = games.nested_schema.as_ref().unwrap();
        assert_eq!(nested["score"].field_type, FieldType::Integer);
    }

    #[test]
    fn test_array_of_scalars_has_no_nested_schema() {
        let detector = SchemaDetector::default();
        let fields = detector.analyze_response(&json!({"tags": ["a", "b"]}));
        assert_eq!(fields["tags"].field_type, FieldType::Array);
        assert!(fields["tags"].nested_schema.is_none());
    }

    #[test]
    fn test_null_field_is_nullable() {
        let detector = SchemaDetector::default();
        let fields = detector.analyze_response(&json!({"missing": null}));
        assert_eq!(fields["missing"].field_type, FieldType::Null);
        assert!(fields["missing"].nullable);
    }

    #[test]
    fn test_non_object_input_yields_empty_mapping() {
        let detector = SchemaDetector::default();
        assert!(detector.analyze_response(&json!([1, 2, 3])).is_empty());
        assert!(detector.analyze_response(&json!("plain")).is_empty());
        assert!(detector.analyze_response(&Value::Null).is_empty());
    }

    #[test]
    fn test_depth_bound_stops_recursion() {
        let detector = SchemaDetector::new(2, DEFAULT_EXAMPLE_MAX_CHARS);
        let fields = detector.analyze_response(&json!({
            "a": {"b": {"c": {"d": 1}}}
        }));

        let a = fields["a"].nested_schema.as_ref().unwrap();
        // depth 2 covers the root and one nested level; the level below
        // produced nothing so its nested_schema collapses to None
        assert_eq!(a["b"].field_type, FieldType::Object);
        assert!(a["b"].nested_schema.is_none());
    }

    #[test]
    fn test_determinism() {
        let payload = json!({"id": "123", "nested": {"x": 1.5}});
        let detector = SchemaDetector::default();
        assert_eq!(
            detector.analyze_response(&payload),
            detector.analyze_response(&payload)
        );
    }
}
