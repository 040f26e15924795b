// Copyright (c) 2025 - Cowboy AI, Inc.
//! Redfish Endpoint Resolver
//!
//! Reads a `{"RedfishEndpoints": [...]}` document and prints the canonical
//! endpoint descriptors as JSON. Credentials are never printed.
//!
//! Run with: cargo run --bin resolve-endpoints -- endpoints.json
//!
//! With no path argument (or `-`), the document is read from stdin.

use anyhow::{Context, Result};
use redfish_identity::domain::{resolve_endpoints, RawEndpointList};
use std::io::Read;
use tracing::{debug, info};

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
        }
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let path = std::env::args().nth(1);
    let input = read_input(path.as_deref())?;

    let list: RawEndpointList =
        serde_json::from_str(&input).context("Input is not a RedfishEndpoints document")?;
    debug!(count = list.endpoints.len(), "Loaded endpoint document");

    let descriptors = resolve_endpoints(&list.endpoints).context("Endpoint resolution failed")?;
    info!(count = descriptors.len(), "Resolved Redfish endpoints");

    let output = serde_json::json!({ "RedfishEndpoints": descriptors });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize descriptors")?
    );

    Ok(())
}
