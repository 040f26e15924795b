// Copyright (c) 2025 - Cowboy AI, Inc.
//! Reservation client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration loading error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// Lock service location and lease timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationConfig {
    /// Lock service base URL (e.g., "http://localhost:27779")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the reservations resource under `base_url`
    #[serde(default = "default_path")]
    pub path: String,

    /// Name this client identifies itself with
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// How often the renewal task wakes
    #[serde(default = "default_renew_interval")]
    pub renew_interval_secs: u64,

    /// Leases expiring within this window are renewed
    #[serde(default = "default_renew_margin")]
    pub renew_margin_secs: u64,

    /// Lease length requested on acquire and renew
    #[serde(default = "default_lease_duration")]
    pub lease_duration_secs: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:27779".to_string()
}

fn default_path() -> String {
    "/hsm/v2/locks/service/reservations".to_string()
}

fn default_service_name() -> String {
    "redfish-identity".to_string()
}

fn default_renew_interval() -> u64 {
    10
}

fn default_renew_margin() -> u64 {
    30
}

fn default_lease_duration() -> u64 {
    60
}

fn default_timeout() -> u64 {
    30
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_path(),
            service_name: default_service_name(),
            renew_interval_secs: default_renew_interval(),
            renew_margin_secs: default_renew_margin(),
            lease_duration_secs: default_lease_duration(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ReservationConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let secs = |var: &str, default: u64| -> Result<u64, ConfigError> {
            match lookup(var) {
                Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    var: var.to_string(),
                    value,
                }),
                None => Ok(default),
            }
        };

        Ok(Self {
            base_url: lookup("RESERVATION_URL").unwrap_or(defaults.base_url),
            path: lookup("RESERVATION_PATH").unwrap_or(defaults.path),
            service_name: lookup("RESERVATION_SERVICE").unwrap_or(defaults.service_name),
            renew_interval_secs: secs("RESERVATION_RENEW_INTERVAL", defaults.renew_interval_secs)?,
            renew_margin_secs: secs("RESERVATION_RENEW_MARGIN", defaults.renew_margin_secs)?,
            lease_duration_secs: secs("RESERVATION_LEASE_DURATION", defaults.lease_duration_secs)?,
            timeout_secs: secs("RESERVATION_TIMEOUT", defaults.timeout_secs)?,
        })
    }

    /// Never zero; a zero-period interval cannot tick
    pub fn renew_interval(&self) -> Duration {
        Duration::from_secs(self.renew_interval_secs.max(1))
    }

    pub fn renew_margin(&self) -> Duration {
        Duration::from_secs(self.renew_margin_secs)
    }

    pub fn lease_duration(&self) -> Duration {
        Duration::from_secs(self.lease_duration_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the reservations resource
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }
}
