//! `PagerDuty` REST API client.
//!
//! Read-only access to the incidents collection. Every call is a single
//! request/response cycle: no pagination beyond the first page, no retries,
//! no token refresh.
//!
//! # Usage
//!
//! ```no_run
//! use pagerduty::{ClientConfig, PagerDutyClient};
//!
//! # async fn example() -> Result<(), pagerduty::PagerDutyError> {
//! let client = PagerDutyClient::new(ClientConfig::new("u+abcdefg"))?;
//!
//! let page = client.list_incidents(None, None, 50).await?;
//! for incident in &page.incidents {
//!     println!("{} {}", incident.id, incident.status);
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::PagerDutyError;
use crate::models::{Incident, IncidentEnvelope, IncidentListResponse};

/// Page size used when the caller passes a non-positive limit.
pub const DEFAULT_LIST_LIMIT: i64 = 25;

/// `PagerDuty` REST API client.
#[derive(Debug, Clone)]
pub struct PagerDutyClient {
    client: reqwest::Client,
    base_url: String,
}

impl PagerDutyClient {
    /// Create a client with a static API key.
    ///
    /// # Errors
    /// Returns error if the key is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, PagerDutyError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Token token={}", config.api_key))
            .map_err(|_| {
                PagerDutyError::InvalidConfig("API key is not a valid header value".to_string())
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.effective_timeout())
            .build()
            .map_err(|e| PagerDutyError::InvalidConfig(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config
                .effective_base_url()
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// List incidents, optionally bounded by `since`/`until`.
    ///
    /// A `limit` of zero or less is replaced by [`DEFAULT_LIST_LIMIT`]. Only
    /// the first page is fetched; `more` on the response tells the caller
    /// whether the server has further results.
    #[instrument(skip(self))]
    pub async fn list_incidents(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
        limit: i64,
    ) -> Result<IncidentListResponse, PagerDutyError> {
        let limit = if limit <= 0 { DEFAULT_LIST_LIMIT } else { limit };

        let mut query = vec![("limit", limit.to_string())];
        if let Some(since) = since {
            query.push(("since", format_timestamp(since)));
        }
        if let Some(until) = until {
            query.push(("until", format_timestamp(until)));
        }

        let request = self
            .client
            .get(format!("{}/incidents", self.base_url))
            .query(&query);

        let result: IncidentListResponse = self.execute(request).await?;
        debug!(
            count = result.incidents.len(),
            total = result.total,
            more = result.more,
            "Listed PagerDuty incidents"
        );
        Ok(result)
    }

    /// Fetch a single incident by ID.
    #[instrument(skip(self), fields(incident_id = %incident_id))]
    pub async fn get_incident(&self, incident_id: &str) -> Result<Incident, PagerDutyError> {
        let mut url = Url::parse(&format!("{}/incidents", self.base_url))
            .map_err(|e| PagerDutyError::InvalidConfig(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| PagerDutyError::InvalidConfig("base URL cannot have a path".to_string()))?
            .push(incident_id);

        let envelope: IncidentEnvelope = self.execute(self.client.get(url)).await?;
        debug!(status = %envelope.incident.status, "Retrieved PagerDuty incident");
        Ok(envelope.incident)
    }

    /// Send a request and decode a 200 response body.
    async fn execute<R: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<R, PagerDutyError> {
        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = %status,
                body = %body,
                "PagerDuty API request failed"
            );
            return Err(PagerDutyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// RFC 3339 with whole seconds and a `Z` suffix for UTC.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
