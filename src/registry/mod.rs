//! Versioned schema storage with durable on-disk caching.
//!
//! [`SchemaRegistry`] owns the current [`EndpointSchema`] per endpoint and a
//! bounded change history, and re-persists the whole registry to a cache
//! directory on every mutation. Load is corruption-tolerant: a cache file
//! that fails to parse is discarded rather than crashing startup.
//!
//! [`EndpointSchema`]: crate::schema::EndpointSchema

pub mod describe;
pub mod error;
pub mod store;

pub use describe::{EndpointSummary, SchemaSummary};
pub use error::{RegistryError, Result};
pub use store::{RegistryOptions, SchemaRegistry};
