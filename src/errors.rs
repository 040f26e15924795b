// Copyright (c) 2025 - Cowboy AI, Inc.
//! Crate-level error type

use thiserror::Error;

use crate::domain::{EndpointError, FruIdError, HostnameError, MacError, XnameError};
use crate::reservations::{ConfigError, ReservationError};

/// Any error the identity layer can report
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Hardware address error
    #[error(transparent)]
    Mac(#[from] MacError),

    /// DNS name error
    #[error(transparent)]
    Hostname(#[from] HostnameError),

    /// Location identifier error
    #[error(transparent)]
    Xname(#[from] XnameError),

    /// Endpoint resolution error
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// FRU identifier error
    #[error(transparent)]
    FruId(#[from] FruIdError),

    /// Reservation error
    #[error(transparent)]
    Reservation(#[from] ReservationError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for identity operations
pub type IdentityResult<T> = Result<T, IdentityError>;

impl From<serde_json::Error> for IdentityError {
    fn from(err: serde_json::Error) -> Self {
        IdentityError::Serialization(err.to_string())
    }
}
