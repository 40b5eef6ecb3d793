//! Activity entry points invoked by the workflow worker.
//!
//! Each activity builds its own client, makes one API call, maps the result
//! and (for the batch activities) hands the documents to the configured
//! [`DocumentStore`]. Nothing is retried here; retry policy belongs to the
//! orchestration engine. Dropping an activity future aborts any request in
//! flight.
//!
//! Input and output records keep the field names the orchestration engine
//! already uses for these activities (`APIKey`, `IncidentID`, `Ref`, ...).

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::client::PagerDutyClient;
use crate::config::ClientConfig;
use crate::document::{incident_to_document, postmortem_documents, Document};
use crate::error::{ActivityError, PagerDutyError};
use crate::storage::{DataRef, DocumentStore};

/// Page size the batch activities request when the input leaves it unset.
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 100;

/// Runtime collaborators shared by all activity invocations.
#[derive(Clone)]
pub struct ActivityContext {
    store: Arc<dyn DocumentStore>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl ActivityContext {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            base_url: None,
            timeout: None,
        }
    }

    /// Point clients at a different API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    fn client(&self, api_key: &str) -> Result<PagerDutyClient, PagerDutyError> {
        PagerDutyClient::new(ClientConfig {
            api_key: api_key.to_string(),
            timeout: self.timeout,
            base_url: self.base_url.clone(),
        })
    }
}

/// Input for [`fetch_incidents`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FetchIncidentsInput {
    #[serde(rename = "APIKey")]
    pub api_key: String,
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub limit: i64,
}

/// Output of [`fetch_incidents`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FetchIncidentsOutput {
    #[serde(rename = "Ref")]
    pub data_ref: DataRef,
    /// Documents stored in this batch.
    pub count: usize,
    /// Incidents available on the server for the query.
    pub total: u32,
}

/// Input for [`fetch_incident`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FetchIncidentInput {
    #[serde(rename = "APIKey")]
    pub api_key: String,
    #[serde(rename = "IncidentID")]
    pub incident_id: String,
}

/// Output of [`fetch_incident`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FetchIncidentOutput {
    pub document: Document,
    /// Always `true` on success; a missing incident surfaces as an error.
    pub found: bool,
}

/// Input for [`fetch_postmortems`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FetchPostmortemsInput {
    #[serde(rename = "APIKey")]
    pub api_key: String,
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub limit: i64,
}

/// Output of [`fetch_postmortems`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FetchPostmortemsOutput {
    #[serde(rename = "Ref")]
    pub data_ref: DataRef,
    pub count: usize,
}

fn activity_limit(limit: i64) -> i64 {
    if limit <= 0 {
        DEFAULT_ACTIVITY_LIMIT
    } else {
        limit
    }
}

/// Fetch a page of incidents and store them as documents.
#[instrument(skip_all, fields(since = ?input.since, until = ?input.until, limit = input.limit))]
pub async fn fetch_incidents(
    ctx: &ActivityContext,
    input: FetchIncidentsInput,
) -> Result<FetchIncidentsOutput, ActivityError> {
    let client = ctx
        .client(&input.api_key)
        .map_err(ActivityError::ListIncidents)?;

    let result = client
        .list_incidents(input.since, input.until, activity_limit(input.limit))
        .await
        .map_err(ActivityError::ListIncidents)?;

    let docs: Vec<Document> = result.incidents.iter().map(incident_to_document).collect();

    let data_ref = ctx
        .store
        .store(&docs)
        .await
        .map_err(ActivityError::StoreDocuments)?;

    info!(
        data_ref = %data_ref,
        count = docs.len(),
        total = result.total,
        "Stored PagerDuty incidents"
    );

    Ok(FetchIncidentsOutput {
        data_ref,
        count: docs.len(),
        total: result.total,
    })
}

/// Fetch a single incident and return it as a document.
#[instrument(skip_all, fields(incident_id = %input.incident_id))]
pub async fn fetch_incident(
    ctx: &ActivityContext,
    input: FetchIncidentInput,
) -> Result<FetchIncidentOutput, ActivityError> {
    let client = ctx
        .client(&input.api_key)
        .map_err(ActivityError::GetIncident)?;

    let incident = client
        .get_incident(&input.incident_id)
        .await
        .map_err(ActivityError::GetIncident)?;

    info!(status = %incident.status, "Fetched PagerDuty incident");

    Ok(FetchIncidentOutput {
        document: incident_to_document(&incident),
        found: true,
    })
}

/// Fetch incidents, keep the resolved ones and store them as postmortem documents.
#[instrument(skip_all, fields(since = ?input.since, limit = input.limit))]
pub async fn fetch_postmortems(
    ctx: &ActivityContext,
    input: FetchPostmortemsInput,
) -> Result<FetchPostmortemsOutput, ActivityError> {
    let client = ctx
        .client(&input.api_key)
        .map_err(ActivityError::ListIncidents)?;

    let result = client
        .list_incidents(input.since, None, activity_limit(input.limit))
        .await
        .map_err(ActivityError::ListIncidents)?;

    let docs = postmortem_documents(&result.incidents);

    let data_ref = ctx
        .store
        .store(&docs)
        .await
        .map_err(ActivityError::StoreDocuments)?;

    info!(
        data_ref = %data_ref,
        count = docs.len(),
        listed = result.incidents.len(),
        "Stored PagerDuty postmortems"
    );

    Ok(FetchPostmortemsOutput {
        data_ref,
        count: docs.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_limit_defaults() {
        assert_eq!(activity_limit(0), 100);
        assert_eq!(activity_limit(-7), 100);
        assert_eq!(activity_limit(10), 10);
    }

    #[test]
    fn test_input_field_names() {
        let input: FetchIncidentsInput = serde_json::from_str(
            r#"{"APIKey":"k","Since":"2024-01-01T00:00:00Z","Limit":5}"#,
        )
        .unwrap();
        assert_eq!(input.api_key, "k");
        assert!(input.since.is_some());
        assert!(input.until.is_none());
        assert_eq!(input.limit, 5);

        let input: FetchIncidentInput =
            serde_json::from_str(r#"{"APIKey":"k","IncidentID":"P1"}"#).unwrap();
        assert_eq!(input.incident_id, "P1");
    }

    #[test]
    fn test_output_field_names() {
        let out = FetchPostmortemsOutput {
            data_ref: DataRef::new("memory://1"),
            count: 2,
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json, serde_json::json!({"Ref": "memory://1", "Count": 2}));
    }
}
