//! Periodic endpoint sweeps and monitoring reports.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{MonitorConfig, UpstreamConfig};
use crate::observability::{Metrics, MetricsSnapshot};
use crate::registry::SchemaRegistry;

use super::client::{ApiClient, FetchError};
use super::endpoints::{EndpointDefinition, MONITORED_ENDPOINTS};

/// Result of probing a single endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringResult {
    pub endpoint: String,
    pub is_available: bool,
    pub response_code: u16,
    pub response_time_ms: f64,
    pub schema_changed: bool,
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Monitors API endpoints for availability and schema changes.
///
/// Runs sequential sweeps over the fixed roster, updating the schema
/// registry with every observation. The periodic background task is
/// cooperatively cancellable via [`EndpointMonitor::stop`].
pub struct EndpointMonitor {
    registry: Arc<SchemaRegistry>,
    client: ApiClient,
    config: MonitorConfig,
    metrics: Arc<Metrics>,
    results: Mutex<Vec<MonitoringResult>>,
    running: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl EndpointMonitor {
    pub fn new(
        registry: Arc<SchemaRegistry>,
        upstream: &UpstreamConfig,
        config: MonitorConfig,
        metrics: Arc<Metrics>,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            registry,
            client: ApiClient::new(upstream)?,
            config,
            metrics,
            results: Mutex::new(Vec::new()),
            running: AtomicBool::new(false),
            task: Mutex::new(None),
        })
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Check a single endpoint and feed the outcome to the registry.
    pub async fn check_endpoint(&self, def: &EndpointDefinition) -> MonitoringResult {
        let started = Instant::now();

        match self.client.fetch(def).await {
            Ok(response) => {
                let response_time_ms = elapsed_ms(started);
                let success = response.is_success();
                let super::client::ApiResponse { status, body } = response;
                match (success, body) {
                    (true, Some(Ok(data))) => {
                        let (_, changed) =
                            self.registry
                                .update_schema(def.path, &data, status, def.method);
                        MonitoringResult {
                            endpoint: def.path.to_string(),
                            is_available: true,
                            response_code: status,
                            response_time_ms,
                            schema_changed: changed,
                            error_message: None,
                            timestamp: Utc::now(),
                        }
                    }
                    (true, parse_failure) => {
                        // 2xx with an unparseable body: the endpoint is up,
                        // but there is no schema to record.
                        let message = match parse_failure {
                            Some(Err(text)) => format!("Parse error: {text}"),
                            _ => "Parse error: empty body".to_string(),
                        };
                        warn!(endpoint = def.path, error = %message, "failed to parse response");
                        MonitoringResult {
                            endpoint: def.path.to_string(),
                            is_available: true,
                            response_code: status,
                            response_time_ms,
                            schema_changed: false,
                            error_message: Some(message),
                            timestamp: Utc::now(),
                        }
                    }
                    (false, _) => {
                        let message = format!("HTTP {status}");
                        self.registry.mark_unavailable(def.path, &message, status);
                        MonitoringResult {
                            endpoint: def.path.to_string(),
                            is_available: false,
                            response_code: status,
                            response_time_ms,
                            schema_changed: false,
                            error_message: Some(message),
                            timestamp: Utc::now(),
                        }
                    }
                }
            }
            Err(err) => {
                let message = match &err {
                    FetchError::Timeout => "Request timeout".to_string(),
                    other => other.to_string(),
                };
                self.registry.mark_unavailable(def.path, &message, 0);
                MonitoringResult {
                    endpoint: def.path.to_string(),
                    is_available: false,
                    response_code: 0,
                    response_time_ms: elapsed_ms(started),
                    schema_changed: false,
                    error_message: Some(message),
                    timestamp: Utc::now(),
                }
            }
        }
    }

    /// Run a full sweep over all monitored endpoints.
    ///
    /// Requests are serialized with an inter-request delay; a failing
    /// endpoint is recorded and the sweep continues.
    pub async fn run_full_check(&self) -> Vec<MonitoringResult> {
        if !self.client.has_auth() {
            warn!("no session cookie configured, skipping endpoint sweep");
            return Vec::new();
        }

        let mut results = Vec::with_capacity(MONITORED_ENDPOINTS.len());
        for def in MONITORED_ENDPOINTS {
            let result = self.check_endpoint(def).await;

            self.metrics.endpoint_checked();
            if result.schema_changed {
                self.metrics.schema_change_detected();
            }
            if !result.is_available {
                self.metrics.check_failed();
            }

            info!(
                endpoint = def.path,
                available = result.is_available,
                response_code = result.response_code,
                response_time_ms = result.response_time_ms as u64,
                schema_changed = result.schema_changed,
                "endpoint checked"
            );
            results.push(result);

            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }

        self.metrics.sweep_completed();
        *self.lock_results() = results.clone();
        results
    }

    /// Start the periodic monitoring background task.
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("monitoring already running");
            return;
        }

        let monitor = Arc::clone(&self);
        let handle = tokio::spawn(async move { monitor.monitoring_loop().await });
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        info!(
            interval_hours = self.config.interval_hours,
            "started periodic monitoring"
        );
    }

    /// Stop the periodic monitoring background task.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }
        info!("stopped periodic monitoring");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn monitoring_loop(&self) {
        while self.running.load(Ordering::SeqCst) {
            info!("running scheduled endpoint check");
            self.run_full_check().await;
            tokio::time::sleep(Duration::from_secs(self.config.interval_hours * 3600)).await;
        }
    }

    /// Generate a monitoring report for the most recent sweep.
    pub fn monitoring_report(&self) -> MonitoringReport {
        MonitoringReport::from_results(&self.lock_results())
    }

    fn lock_results(&self) -> std::sync::MutexGuard<'_, Vec<MonitoringResult>> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Ok,
    Degraded,
    NoData,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSummary {
    pub total_endpoints: usize,
    pub available: usize,
    pub unavailable: usize,
    pub schema_changes: usize,
    pub average_response_time_ms: f64,
    pub last_check: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailableEndpointEntry {
    pub endpoint: String,
    pub response_code: u16,
    pub response_time_ms: f64,
    pub schema_changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnavailableEndpointEntry {
    pub endpoint: String,
    pub error: Option<String>,
    pub response_code: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaChangeEntry {
    pub endpoint: String,
    pub timestamp: DateTime<Utc>,
}

/// Aggregated view of the most recent sweep.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringReport {
    pub status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<MonitoringSummary>,
    pub available_endpoints: Vec<AvailableEndpointEntry>,
    pub unavailable_endpoints: Vec<UnavailableEndpointEntry>,
    pub schema_changes: Vec<SchemaChangeEntry>,
}

impl MonitoringReport {
    pub fn from_results(results: &[MonitoringResult]) -> Self {
        if results.is_empty() {
            return Self {
                status: ReportStatus::NoData,
                message: Some("No monitoring data available. Run a check first.".to_string()),
                summary: None,
                available_endpoints: Vec::new(),
                unavailable_endpoints: Vec::new(),
                schema_changes: Vec::new(),
            };
        }

        let available: Vec<&MonitoringResult> = results.iter().filter(|r| r.is_available).collect();
        let unavailable: Vec<&MonitoringResult> =
            results.iter().filter(|r| !r.is_available).collect();
        let changed: Vec<&MonitoringResult> = results.iter().filter(|r| r.schema_changed).collect();

        let average_response_time_ms = if available.is_empty() {
            0.0
        } else {
            let total: f64 = available.iter().map(|r| r.response_time_ms).sum();
            round2(total / available.len() as f64)
        };

        Self {
            status: if unavailable.is_empty() {
                ReportStatus::Ok
            } else {
                ReportStatus::Degraded
            },
            message: None,
            summary: Some(MonitoringSummary {
                total_endpoints: results.len(),
                available: available.len(),
                unavailable: unavailable.len(),
                schema_changes: changed.len(),
                average_response_time_ms,
                last_check: results.first().map(|r| r.timestamp),
            }),
            available_endpoints: available
                .iter()
                .map(|r| AvailableEndpointEntry {
                    endpoint: r.endpoint.clone(),
                    response_code: r.response_code,
                    response_time_ms: round2(r.response_time_ms),
                    schema_changed: r.schema_changed,
                })
                .collect(),
            unavailable_endpoints: unavailable
                .iter()
                .map(|r| UnavailableEndpointEntry {
                    endpoint: r.endpoint.clone(),
                    error: r.error_message.clone(),
                    response_code: r.response_code,
                })
                .collect(),
            schema_changes: changed
                .iter()
                .map(|r| SchemaChangeEntry {
                    endpoint: r.endpoint.clone(),
                    timestamp: r.timestamp,
                })
                .collect(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
