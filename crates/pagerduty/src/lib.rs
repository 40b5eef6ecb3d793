//! `PagerDuty` connector activities for workflow workers.
//!
//! This crate provides:
//! - A read-only REST client for `PagerDuty` incidents
//! - Normalization of incidents (and postmortems) into storage-ready documents
//! - Three activities (`pagerduty.FetchIncidents`, `pagerduty.FetchIncident`,
//!   `pagerduty.FetchPostmortems`) and the table that registers them by name
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use pagerduty::{fetch_incidents, ActivityContext, FetchIncidentsInput, MemoryStore};
//!
//! # async fn example() -> Result<(), pagerduty::ActivityError> {
//! let ctx = ActivityContext::new(Arc::new(MemoryStore::new()));
//!
//! let output = fetch_incidents(
//!     &ctx,
//!     FetchIncidentsInput {
//!         api_key: "u+abcdefg".to_string(),
//!         ..Default::default()
//!     },
//! )
//! .await?;
//! println!("stored {} of {} incidents at {}", output.count, output.total, output.data_ref);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Data flows one way: HTTP response -> [`Incident`] -> [`Document`] ->
//! [`DocumentStore`] -> [`DataRef`] returned to the caller. No state is kept
//! between activity invocations.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod activities;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod provider;
pub mod storage;

pub use activities::{
    fetch_incident, fetch_incidents, fetch_postmortems, ActivityContext, FetchIncidentInput,
    FetchIncidentOutput, FetchIncidentsInput, FetchIncidentsOutput, FetchPostmortemsInput,
    FetchPostmortemsOutput,
};
pub use client::PagerDutyClient;
pub use config::{ClientConfig, ConnectorConfig};
pub use document::{incident_to_document, postmortem_documents, postmortem_to_document, Document};
pub use error::{ActivityError, PagerDutyError, StoreError};
pub use models::*;
pub use provider::{ActivityHandler, ActivityRegistration, HandlerFuture, Provider};
pub use storage::{DataRef, DocumentStore, FileStore, MemoryStore};
