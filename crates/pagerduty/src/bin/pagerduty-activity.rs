//! pagerduty-activity - run `PagerDuty` connector activities from the command line.
//!
//! Each subcommand runs one activity, writes any document batch to the
//! configured store directory, and prints the activity output as JSON.
//!
//! # Environment Variables
//!
//! - `PAGERDUTY_API_KEY` - REST API key (required, or pass via --api-key)
//! - `PAGERDUTY_API_URL` - API base URL override
//! - `PAGERDUTY_TIMEOUT_SECS` - request timeout (default: 30)
//! - `PAGERDUTY_STORE_DIR` - where document batches are written
//!
//! # Examples
//!
//! ```bash
//! # Store the last 50 incidents since a point in time
//! pagerduty-activity fetch-incidents --since 2024-05-01T00:00:00Z --limit 50
//!
//! # Fetch one incident as a document
//! pagerduty-activity fetch-incident PT4KHLK
//!
//! # Store resolved incidents as postmortems
//! pagerduty-activity fetch-postmortems --since 2024-05-01T00:00:00Z
//!
//! # Invoke by registered name with raw JSON input
//! pagerduty-activity invoke pagerduty.FetchIncident '{"IncidentID":"PT4KHLK"}'
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use pagerduty::{
    fetch_incident, fetch_incidents, fetch_postmortems, ActivityContext, ConnectorConfig,
    FetchIncidentInput, FetchIncidentsInput, FetchPostmortemsInput, FileStore, Provider,
};

/// Run `PagerDuty` connector activities.
#[derive(Parser)]
#[command(name = "pagerduty-activity")]
#[command(about = "Run PagerDuty incident and postmortem activities")]
#[command(version)]
struct Cli {
    /// `PagerDuty` API key (or set `PAGERDUTY_API_KEY` env var)
    #[arg(long, env = "PAGERDUTY_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List incidents and store them as documents
    FetchIncidents {
        /// Only incidents since this RFC 3339 timestamp
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Only incidents until this RFC 3339 timestamp
        #[arg(long)]
        until: Option<DateTime<Utc>>,

        /// Page size (default: 100)
        #[arg(long, default_value = "0")]
        limit: i64,
    },

    /// Fetch a single incident
    FetchIncident {
        /// Incident ID
        incident_id: String,
    },

    /// Store resolved incidents as postmortem documents
    FetchPostmortems {
        /// Only incidents since this RFC 3339 timestamp
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Page size (default: 100)
        #[arg(long, default_value = "0")]
        limit: i64,
    },

    /// Invoke a registered activity by name with JSON input
    Invoke {
        /// Registered activity name (e.g. pagerduty.FetchIncidents)
        name: String,

        /// Activity input as JSON; `APIKey` is filled in when absent
        #[arg(default_value = "{}")]
        input: String,
    },

    /// List registered activity names
    List,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to encode output")?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pagerduty=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = ConnectorConfig::from_env();

    let mut ctx = ActivityContext::new(Arc::new(FileStore::new(&config.store_dir)))
        .with_timeout(config.timeout);
    if let Some(base_url) = &config.base_url {
        ctx = ctx.with_base_url(base_url.clone());
    }

    let provider = Provider::pagerduty();
    let api_key = || {
        cli.api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .context("PAGERDUTY_API_KEY not set (pass --api-key)")
    };

    match &cli.command {
        Commands::FetchIncidents {
            since,
            until,
            limit,
        } => {
            let output = fetch_incidents(
                &ctx,
                FetchIncidentsInput {
                    api_key: api_key()?,
                    since: *since,
                    until: *until,
                    limit: *limit,
                },
            )
            .await
            .context("pagerduty.FetchIncidents failed")?;
            print_json(&output)?;
        }
        Commands::FetchIncident { incident_id } => {
            let output = fetch_incident(
                &ctx,
                FetchIncidentInput {
                    api_key: api_key()?,
                    incident_id: incident_id.clone(),
                },
            )
            .await
            .context("pagerduty.FetchIncident failed")?;
            print_json(&output)?;
        }
        Commands::FetchPostmortems { since, limit } => {
            let output = fetch_postmortems(
                &ctx,
                FetchPostmortemsInput {
                    api_key: api_key()?,
                    since: *since,
                    limit: *limit,
                },
            )
            .await
            .context("pagerduty.FetchPostmortems failed")?;
            print_json(&output)?;
        }
        Commands::Invoke { name, input } => {
            let mut input: serde_json::Value =
                serde_json::from_str(input).context("Activity input is not valid JSON")?;
            if let Some(obj) = input.as_object_mut() {
                if !obj.contains_key("APIKey") {
                    obj.insert("APIKey".to_string(), api_key()?.into());
                }
            }
            let output = provider
                .invoke(name, ctx, input)
                .await
                .with_context(|| format!("{name} failed"))?;
            print_json(&output)?;
        }
        Commands::List => {
            println!("{} {}", provider.name(), provider.version());
            for name in provider.names() {
                println!("  {name}");
            }
        }
    }

    Ok(())
}
