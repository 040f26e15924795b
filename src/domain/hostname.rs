// Copyright (c) 2025 - Cowboy AI, Inc.
//! DNS Name Value Object for management endpoint addresses

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// DNS name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostnameError {
    #[error("DNS name is empty")]
    Empty,

    #[error("DNS name exceeds maximum length of 253 characters: {0}")]
    TooLong(usize),

    #[error("Label exceeds maximum length of 63 characters: {0}")]
    LabelTooLong(String),

    #[error("Invalid character {1:?} in DNS name: {0}")]
    InvalidCharacter(String, char),

    #[error("Label cannot start or end with hyphen: {0}")]
    InvalidLabelFormat(String),

    #[error("Top-level label cannot be all numeric: {0}")]
    NumericLabel(String),
}

/// DNS name of a management controller (RFC 1123), stored lower-case
///
/// Used for FQDNs, bare hostnames, and domain suffixes alike.
///
/// # Examples
///
/// ```rust
/// use redfish_identity::domain::Hostname;
///
/// let name = Hostname::new("X0C0S14.Crush.Example.COM").unwrap();
/// assert_eq!(name.short_name(), "x0c0s14");
/// assert_eq!(name.domain(), Some("crush.example.com"));
/// assert!(Hostname::new("-bad").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hostname(String);

impl Hostname {
    /// Maximum total length for FQDN (RFC 1123)
    pub const MAX_LENGTH: usize = 253;

    /// Maximum length for a single label (RFC 1123)
    pub const MAX_LABEL_LENGTH: usize = 63;

    /// Validate and lower-case a DNS name
    ///
    /// A single trailing dot (absolute form) is accepted and dropped.
    pub fn new(name: impl AsRef<str>) -> Result<Self, HostnameError> {
        let name = name.as_ref().trim();
        let name = name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase();

        if name.is_empty() {
            return Err(HostnameError::Empty);
        }
        if name.len() > Self::MAX_LENGTH {
            return Err(HostnameError::TooLong(name.len()));
        }

        for label in name.split('.') {
            Self::validate_label(&name, label)?;
        }

        if let Some(tld) = name.rsplit('.').next() {
            if tld.chars().all(|c| c.is_ascii_digit()) {
                return Err(HostnameError::NumericLabel(tld.to_string()));
            }
        }

        Ok(Self(name))
    }

    fn validate_label(name: &str, label: &str) -> Result<(), HostnameError> {
        if label.is_empty() {
            return Err(HostnameError::Empty);
        }
        if label.len() > Self::MAX_LABEL_LENGTH {
            return Err(HostnameError::LabelTooLong(label.to_string()));
        }
        if let Some(bad) = label.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '-') {
            return Err(HostnameError::InvalidCharacter(name.to_string(), bad));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(HostnameError::InvalidLabelFormat(label.to_string()));
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First label, e.g. `x0c0s14` for `x0c0s14.example.com`
    pub fn short_name(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    /// Everything after the first label
    pub fn domain(&self) -> Option<&str> {
        self.0.split_once('.').map(|(_, domain)| domain)
    }

    /// Whether the name has more than one label
    pub fn is_fqdn(&self) -> bool {
        self.0.contains('.')
    }

    /// Append a domain suffix
    pub fn with_domain(&self, domain: &Hostname) -> Result<Self, HostnameError> {
        Self::new(format!("{}.{}", self.0, domain.0))
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Hostname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Hostname {
    type Error = HostnameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Hostname> for String {
    fn from(name: Hostname) -> Self {
        name.0
    }
}
