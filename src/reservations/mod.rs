// Copyright (c) 2025 - Cowboy AI, Inc.
//! Component Reservations
//!
//! Exclusive, time-limited locks on hardware components, held through a
//! remote lock service and kept alive by a background renewal task.
//!
//! # Architecture
//!
//! ```text
//! ReservationClient ──► dyn ReservationService ──► InMemoryReservationService
//!        │                                     └─► HsmReservationService (feature "hsm")
//!        └── renewal task (every renew_interval, renews leases near expiry)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use redfish_identity::reservations::{
//!     InMemoryReservationService, ReservationClient, ReservationConfig,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = Arc::new(InMemoryReservationService::new());
//!     let client = ReservationClient::new(service, ReservationConfig::default());
//!
//!     client.acquire(&["x0c0s0b0n0", "x0c0s1b0n0"]).await?;
//!     assert!(client.check(&["x0c0s0b0n0"]).await);
//!     client.release(&["x0c0s0b0n0", "x0c0s1b0n0"]).await?;
//!
//!     client.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
#[cfg(feature = "hsm")]
pub mod hsm;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub use client::{CheckOutcome, ReservationClient};
pub use config::{ConfigError, ReservationConfig};
#[cfg(feature = "hsm")]
pub use hsm::HsmReservationService;
pub use memory::InMemoryReservationService;

/// A granted lock on one component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "ReservationKey")]
    pub reservation_key: String,
    #[serde(rename = "DeputyKey", default, skip_serializing_if = "Option::is_none")]
    pub deputy_key: Option<String>,
    #[serde(rename = "ExpirationTime")]
    pub expiration: DateTime<Utc>,
}

/// Per-component refusal reported by the lock service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationFailure {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Reason")]
    pub reason: String,
}

impl ReservationFailure {
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ReservationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.reason)
    }
}

/// Proof of ownership presented on renew and release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationKey {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Key")]
    pub key: String,
}

impl From<&Lease> for ReservationKey {
    fn from(lease: &Lease) -> Self {
        Self {
            id: lease.id.clone(),
            key: lease.reservation_key.clone(),
        }
    }
}

/// How the service treats a batch with some failing members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingModel {
    /// All or nothing
    Rigid,
    /// Apply whatever succeeds
    Flexible,
}

/// Result of a create request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantOutcome {
    pub granted: Vec<Lease>,
    pub failed: Vec<ReservationFailure>,
}

/// Result of a renew or release request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<ReservationFailure>,
}

/// Reservation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReservationError {
    #[error("Components already held by this client: {0:?}")]
    AlreadyHeld(Vec<String>),

    #[error("Components not held by this client: {0:?}")]
    AlreadyReleased(Vec<String>),

    #[error("Reservation refused for {} component(s): {}", .0.len(), join_failures(.0))]
    Rejected(Vec<ReservationFailure>),

    #[error("Reservation service error: {0}")]
    Service(String),
}

fn join_failures(failures: &[ReservationFailure]) -> String {
    failures
        .iter()
        .map(ReservationFailure::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Remote lock service
///
/// Implementations report per-component refusals in the outcome and reserve
/// `Err` for the request as a whole failing.
#[async_trait]
pub trait ReservationService: Send + Sync {
    /// Lock `ids` for `duration`
    async fn create(
        &self,
        ids: &[String],
        model: ProcessingModel,
        duration: Duration,
    ) -> Result<GrantOutcome, ReservationError>;

    /// Extend held locks by `duration` from now
    async fn renew(
        &self,
        keys: &[ReservationKey],
        model: ProcessingModel,
        duration: Duration,
    ) -> Result<KeyOutcome, ReservationError>;

    /// Give up held locks
    async fn release(
        &self,
        keys: &[ReservationKey],
        model: ProcessingModel,
    ) -> Result<KeyOutcome, ReservationError>;
}
