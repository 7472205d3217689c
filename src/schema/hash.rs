//! Stable schema digests for cheap change detection.

use sha2::{Digest, Sha256};

use super::field::FieldMap;

/// Digest length in hex characters (first 8 bytes of the SHA-256).
pub const SCHEMA_HASH_LEN: usize = 16;

/// Compute a short stable digest of a field mapping.
///
/// Only the (name, type, nullable) triple of each field enters the hash,
/// sorted by field name (free with `BTreeMap` iteration). Nested schema
/// contents, example values and descriptions are deliberately excluded:
/// a nested-only change does not register as drift at this level.
pub fn compute_schema_hash(fields: &FieldMap) -> String {
    let mut hasher = Sha256::new();
    for (name, field) in fields {
        hasher.update(name.as_bytes());
        hasher.update(b":");
        hasher.update(field.field_type.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(if field.nullable { b"1" } else { b"0" });
        hasher.update(b";");
    }
    let digest = hasher.finalize();
    hex::encode(&digest[..SCHEMA_HASH_LEN / 2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::detector::SchemaDetector;
    use crate::schema::field::{FieldType, SchemaField};
    use serde_json::json;

    fn field(name: &str, field_type: FieldType, nullable: bool) -> SchemaField {
        SchemaField {
            name: name.to_string(),
            field_type,
            nullable,
            nested_schema: None,
            example_value: None,
            description: String::new(),
        }
    }

    #[test]
    fn test_hash_is_stable_across_insertion_order() {
        let mut a = FieldMap::new();
        a.insert("id".into(), field("id", FieldType::String, false));
        a.insert("count".into(), field("count", FieldType::Integer, false));

        let mut b = FieldMap::new();
        b.insert("count".into(), field("count", FieldType::Integer, false));
        b.insert("id".into(), field("id", FieldType::String, false));

        assert_eq!(compute_schema_hash(&a), compute_schema_hash(&b));
    }

    #[test]
    fn test_hash_length_and_charset() {
        let detector = SchemaDetector::default();
        let fields = detector.analyze_response(&json!({"id": "123"}));
        let hash = compute_schema_hash(&fields);
        assert_eq!(hash.len(), SCHEMA_HASH_LEN);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_type_change_changes_hash() {
        let mut a = FieldMap::new();
        a.insert("id".into(), field("id", FieldType::String, false));
        let mut b = FieldMap::new();
        b.insert("id".into(), field("id", FieldType::Integer, false));

        assert_ne!(compute_schema_hash(&a), compute_schema_hash(&b));
    }

    #[test]
    fn test_nullability_change_changes_hash() {
        let mut a = FieldMap::new();
        a.insert("id".into(), field("id", FieldType::String, false));
        let mut b = FieldMap::new();
        b.insert("id".into(), field("id", FieldType::String, true));

        assert_ne!(compute_schema_hash(&a), compute_schema_hash(&b));
    }

    #[test]
    fn test_added_field_changes_hash() {
        let mut a = FieldMap::new();
        a.insert("id".into(), field("id", FieldType::String, false));
        let mut b = a.clone();
        b.insert("extra".into(), field("extra", FieldType::Integer, false));

        assert_ne!(compute_schema_hash(&a), compute_schema_hash(&b));
    }

    #[test]
    fn test_example_values_do_not_affect_hash() {
        let detector = SchemaDetector::default();
        let a = detector.analyze_response(&json!({"id": "abc"}));
        let b = detector.analyze_response(&json!({"id": "completely different"}));
        assert_eq!(compute_schema_hash(&a), compute_schema_hash(&b));
    }

    #[test]
    fn test_nested_only_change_is_not_detected() {
        // Documented limitation: the digest ignores nested schema contents.
        let detector = SchemaDetector::default();
        let a = detector.analyze_response(&json!({"user": {"id": "123"}}));
        let b = detector.analyze_response(&json!({"user": {"renamed": 1}}));
        assert_eq!(compute_schema_hash(&a), compute_schema_hash(&b));
    }
}
