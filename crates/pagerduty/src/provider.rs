//! Activity registration table.
//!
//! The orchestration engine finds activities by name. [`Provider::pagerduty`]
//! builds the ordered name-to-handler table once at startup; a worker
//! integration iterates [`Provider::activities`] to register them, or calls
//! [`Provider::invoke`] directly with JSON input.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::activities::{
    fetch_incident, fetch_incidents, fetch_postmortems, ActivityContext, FetchIncidentInput,
    FetchIncidentsInput, FetchPostmortemsInput,
};
use crate::error::ActivityError;

pub const PROVIDER_NAME: &str = "resolute-pagerduty";
pub const PROVIDER_VERSION: &str = "1.0.0";

pub const FETCH_INCIDENTS: &str = "pagerduty.FetchIncidents";
pub const FETCH_INCIDENT: &str = "pagerduty.FetchIncident";
pub const FETCH_POSTMORTEMS: &str = "pagerduty.FetchPostmortems";

/// Future returned by an [`ActivityHandler`].
pub type HandlerFuture = BoxFuture<'static, Result<Value, ActivityError>>;

/// JSON-in, JSON-out activity handler.
pub type ActivityHandler = Arc<dyn Fn(ActivityContext, Value) -> HandlerFuture + Send + Sync>;

/// One named activity.
#[derive(Clone)]
pub struct ActivityRegistration {
    pub name: &'static str,
    pub handler: ActivityHandler,
}

/// A named, versioned set of activities.
#[derive(Clone)]
pub struct Provider {
    name: &'static str,
    version: &'static str,
    activities: Vec<ActivityRegistration>,
}

impl Provider {
    #[must_use]
    pub const fn new(name: &'static str, version: &'static str) -> Self {
        Self {
            name,
            version,
            activities: Vec::new(),
        }
    }

    /// The `PagerDuty` provider with all three activities registered.
    #[must_use]
    pub fn pagerduty() -> Self {
        Self::new(PROVIDER_NAME, PROVIDER_VERSION)
            .add_activity(
                FETCH_INCIDENTS,
                json_handler(|ctx: ActivityContext, input: FetchIncidentsInput| async move {
                    fetch_incidents(&ctx, input).await
                }),
            )
            .add_activity(
                FETCH_INCIDENT,
                json_handler(|ctx: ActivityContext, input: FetchIncidentInput| async move {
                    fetch_incident(&ctx, input).await
                }),
            )
            .add_activity(
                FETCH_POSTMORTEMS,
                json_handler(|ctx: ActivityContext, input: FetchPostmortemsInput| async move {
                    fetch_postmortems(&ctx, input).await
                }),
            )
    }

    #[must_use]
    pub fn add_activity(mut self, name: &'static str, handler: ActivityHandler) -> Self {
        self.activities.push(ActivityRegistration { name, handler });
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn version(&self) -> &'static str {
        self.version
    }

    /// Registrations in the order they were added.
    #[must_use]
    pub fn activities(&self) -> &[ActivityRegistration] {
        &self.activities
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.activities.iter().map(|a| a.name).collect()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ActivityHandler> {
        self.activities
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.handler)
    }

    /// Run the activity registered under `name` with JSON input.
    pub async fn invoke(
        &self,
        name: &str,
        ctx: ActivityContext,
        input: Value,
    ) -> Result<Value, ActivityError> {
        let handler = self
            .get(name)
            .ok_or_else(|| ActivityError::UnknownActivity(name.to_string()))?;
        debug!(provider = self.name, activity = name, "Invoking activity");
        handler(ctx, input).await
    }
}

/// Wrap a typed activity as a JSON handler.
fn json_handler<I, O, F, Fut>(f: F) -> ActivityHandler
where
    I: DeserializeOwned + 'static,
    O: Serialize + Send + 'static,
    F: Fn(ActivityContext, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, ActivityError>> + Send + 'static,
{
    Arc::new(
        move |ctx: ActivityContext, input: Value| -> HandlerFuture {
            let fut = serde_json::from_value::<I>(input)
                .map(|input| f(ctx, input))
                .map_err(ActivityError::InvalidInput);
            Box::pin(async move {
                let output = fut?.await?;
                serde_json::to_value(output).map_err(ActivityError::Output)
            })
        },
    )
}
