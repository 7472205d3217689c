//! Human-readable schema descriptions and compact summaries.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::schema::EndpointSchema;

/// Compact overview of all registered schemas, sized for presentation
/// to an LLM context rather than completeness.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaSummary {
    pub total_endpoints: usize,
    pub available_endpoints: usize,
    pub endpoints: BTreeMap<String, EndpointSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointSummary {
    pub available: bool,
    pub last_updated: DateTime<Utc>,
    pub field_count: usize,
    /// Field names only, truncated to the configured cap.
    pub fields: Vec<String>,
    pub response_code: u16,
}

pub(crate) fn build_summary(
    schemas: &BTreeMap<String, EndpointSchema>,
    max_fields: usize,
) -> SchemaSummary {
    SchemaSummary {
        total_endpoints: schemas.len(),
        available_endpoints: schemas.values().filter(|s| s.is_available).count(),
        endpoints: schemas
            .iter()
            .map(|(endpoint, schema)| {
                (
                    endpoint.clone(),
                    EndpointSummary {
                        available: schema.is_available,
                        last_updated: schema.last_updated,
                        field_count: schema.fields.len(),
                        fields: schema.fields.keys().take(max_fields).cloned().collect(),
                        response_code: schema.response_code,
                    },
                )
            })
            .collect(),
    }
}

/// Render an endpoint's response format as plain text: identity, health,
/// then a sorted field-by-field listing with nested field names.
pub(crate) fn render_description(endpoint: &str, schema: Option<&EndpointSchema>) -> String {
    let Some(schema) = schema else {
        return format!("No schema information available for {endpoint}");
    };

    if !schema.is_available {
        let reason = schema.error_message.as_deref().unwrap_or("unknown error");
        return format!("Endpoint {endpoint} is currently unavailable: {reason}");
    }

    let mut lines = vec![
        format!("Endpoint: {endpoint}"),
        format!("Method: {}", schema.method),
        format!(
            "Last Updated: {}",
            schema.last_updated.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        "Status: Available".to_string(),
        String::new(),
        "Response Fields:".to_string(),
    ];

    for (name, field) in &schema.fields {
        let nullable = if field.nullable { " (nullable)" } else { "" };
        lines.push(format!("  - {name}: {}{nullable}", field.field_type));
        if let Some(nested) = &field.nested_schema {
            let names: Vec<&str> = nested.keys().map(String::as_str).collect();
            lines.push(format!("    Nested fields: [{}]", names.join(", ")));
        }
    }

    lines.join("\n")
}
