//! Per-endpoint schema records and storage truncation policies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field::FieldMap;

/// Schema record for one monitored endpoint.
///
/// Replaced wholesale on every successful observation; the
/// unavailable-marking path mutates the existing record in place so a
/// temporarily-down endpoint keeps its last-known field mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSchema {
    pub endpoint: String,
    pub method: String,
    #[serde(default)]
    pub fields: FieldMap,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub schema_hash: String,
    #[serde(default = "default_response_code")]
    pub response_code: u16,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub sample_response: Option<Value>,
}

fn default_response_code() -> u16 {
    200
}

fn default_available() -> bool {
    true
}

impl EndpointSchema {
    /// Minimal placeholder for an endpoint that failed before any schema
    /// could be inferred.
    pub fn unavailable(endpoint: &str, error_message: &str, response_code: u16) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            method: "GET".to_string(),
            fields: FieldMap::new(),
            last_updated: Utc::now(),
            schema_hash: String::new(),
            response_code,
            is_available: false,
            error_message: Some(error_message.to_string()),
            sample_response: None,
        }
    }
}

/// Bounds applied to sample payloads before they are retained for
/// diagnostics. Presentation policy, not correctness-critical.
#[derive(Debug, Clone)]
pub struct SampleLimits {
    pub max_keys: usize,
    pub max_items: usize,
    pub max_chars: usize,
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            max_keys: 20,
            max_items: 3,
            max_chars: 200,
        }
    }
}

/// Recursively truncate a payload copy: at most `max_keys` object keys,
/// `max_items` array elements, and `max_chars` characters per string.
pub fn truncate_sample(data: &Value, limits: &SampleLimits) -> Value {
    match data {
        Value::Object(map) => Value::Object(
            map.iter()
                .take(limits.max_keys)
                .map(|(k, v)| (k.clone(), truncate_sample(v, limits)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .take(limits.max_items)
                .map(|v| truncate_sample(v, limits))
                .collect(),
        ),
        Value::String(s) if s.chars().count() > limits.max_chars => {
            let truncated: String = s.chars().take(limits.max_chars).collect();
            Value::String(truncated + "...")
        }
        other => other.clone(),
    }
}

/// Truncate an example value for storage: primitives are kept verbatim,
/// structural values are stringified and elided past `max_chars`.
pub fn truncate_example(value: &Value, max_chars: usize) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => {
            let rendered = value.to_string();
            if rendered.chars().count() > max_chars {
                let truncated: String = rendered.chars().take(max_chars).collect();
                Value::String(truncated + "...")
            } else {
                value.clone()
            }
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate_sample_caps_keys_and_items() {
        let limits = SampleLimits {
            max_keys: 2,
            max_items: 2,
            max_chars: 200,
        };
        let data = json!({
            "a": [1, 2, 3, 4],
            "b": 2,
            "c": 3,
        });
        let truncated = truncate_sample(&data, &limits);
        let obj = truncated.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["a"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_truncate_sample_elides_long_strings() {
        let limits = SampleLimits {
            max_keys: 20,
            max_items: 3,
            max_chars: 5,
        };
        let truncated = truncate_sample(&json!({"s": "abcdefgh"}), &limits);
        assert_eq!(truncated["s"], json!("abcde..."));
    }

    #[test]
    fn test_truncate_example_keeps_primitives() {
        assert_eq!(truncate_example(&json!(42), 100), json!(42));
        assert_eq!(truncate_example(&json!("short"), 100), json!("short"));
        assert_eq!(truncate_example(&Value::Null, 100), Value::Null);
    }

    #[test]
    fn test_truncate_example_keeps_short_structures() {
        let value = json!({"k": 1});
        assert_eq!(truncate_example(&value, 100), value);
    }

    #[test]
    fn test_truncate_example_stringifies_long_structures() {
        let value = json!({"key": "a very long value that will not fit"});
        let truncated = truncate_example(&value, 10);
        let s = truncated.as_str().unwrap();
        assert!(s.ends_with("..."));
        assert_eq!(s.chars().count(), 13);
    }

    #[test]
    fn test_unavailable_placeholder() {
        let schema = EndpointSchema::unavailable("/v3/profiles", "Server error", 500);
        assert!(!schema.is_available);
        assert_eq!(schema.response_code, 500);
        assert_eq!(schema.error_message.as_deref(), Some("Server error"));
        assert!(schema.fields.is_empty());
        assert!(schema.schema_hash.is_empty());
    }

    #[test]
    fn test_endpoint_schema_roundtrip() {
        let schema = EndpointSchema::unavailable("/v3/profiles", "Request timeout", 0);
        let raw = serde_json::to_string(&schema).unwrap();
        let back: EndpointSchema = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.endpoint, "/v3/profiles");
        assert!(!back.is_available);
        assert_eq!(back.response_code, 0);
    }
}
