//! Endpoint availability and schema-drift monitoring.
//!
//! A fixed roster of known upstream endpoints is swept sequentially (with a
//! short delay between requests), and every response is funneled through the
//! schema registry's update path. Failures are classified and recorded as
//! unavailability; individual endpoint errors never abort a sweep.

pub mod client;
pub mod endpoints;
pub mod runner;

pub use client::{ApiClient, ApiResponse, FetchError};
pub use endpoints::{EndpointDefinition, MONITORED_ENDPOINTS};
pub use runner::{EndpointMonitor, MonitoringReport, MonitoringResult};
