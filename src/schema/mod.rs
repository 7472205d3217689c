//! Dynamic JSON schema detection.
//!
//! This module infers a structural schema from arbitrary JSON payloads and
//! reduces it to a short stable digest for change detection:
//!
//! - [`detect_type`] classifies a single value into a [`FieldType`] tag,
//!   including pattern-based subtyping of strings (datetime, UUID, URL)
//! - [`SchemaDetector`] walks an object recursively up to a depth bound,
//!   producing a flat mapping of dotted field path -> [`SchemaField`]
//! - [`compute_schema_hash`] fingerprints a field mapping over its
//!   (name, type, nullable) triples only
//! - [`EndpointSchema`] is the per-endpoint record folded out of one
//!   analysis pass, carrying health status and a truncated sample payload
//!
//! Everything here is pure: no I/O, no shared state. The stateful side
//! (versioning, persistence) lives in [`crate::registry`].

pub mod detector;
pub mod endpoint;
pub mod field;
pub mod hash;

pub use detector::{SchemaDetector, detect_type};
pub use endpoint::{EndpointSchema, SampleLimits, truncate_sample};
pub use field::{FieldMap, FieldType, SchemaField};
pub use hash::{SCHEMA_HASH_LEN, compute_schema_hash};
