// Copyright (c) 2025 - Cowboy AI, Inc.
//! Hardware (MAC) Address Value Object and Codec
//!
//! Parses every textual MAC encoding seen on management networks, renders the
//! canonical lower-case colon form, and supports offset arithmetic over the
//! 48-bit value for deterministic address provisioning.
//!
//! Two rendering paths exist and are kept apart on purpose:
//!
//! - [`normalize_mac`] and friends always emit `aa:bb:cc:dd:ee:ff`.
//! - [`offset_mac`] emits the input's own separator style and hex case class.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// MAC address error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MacError {
    #[error("Invalid MAC address format: {0}")]
    InvalidFormat(String),

    #[error("MAC address {mac} offset by {delta} leaves the 48-bit range")]
    RangeError { mac: String, delta: i64 },
}

/// Textual layout a MAC address was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacFormat {
    /// `aa:bb:cc:dd:ee:ff`
    Colon,
    /// `aa-bb-cc-dd-ee-ff`
    Dash,
    /// `aa.bb.cc.dd.ee.ff`
    DottedOctets,
    /// `aabb.ccdd.eeff`
    DottedQuads,
    /// `aabbccddeeff`
    Bare,
}

impl MacFormat {
    /// Hex digits per separator-delimited group
    fn group_width(self) -> usize {
        match self {
            Self::Colon | Self::Dash | Self::DottedOctets => 2,
            Self::DottedQuads => 4,
            Self::Bare => 12,
        }
    }

    fn render(self, octets: &[u8; 6]) -> String {
        let hex: Vec<String> = octets.iter().map(|o| format!("{:02x}", o)).collect();
        match self {
            Self::Colon | Self::Bare => hex.join(":"),
            Self::Dash => hex.join("-"),
            Self::DottedOctets => hex.join("."),
            Self::DottedQuads => hex.chunks(2).map(|c| c.concat()).collect::<Vec<_>>().join("."),
        }
    }
}

/// MAC Address value object
///
/// Represents a 48-bit MAC address with validation.
/// Invariants:
/// - Valid MAC address format (6 octets)
/// - Canonical representation (lowercase, colon-separated)
///
/// # Examples
///
/// ```rust
/// use redfish_identity::domain::MacAddress;
///
/// let mac = MacAddress::new("A4-BF-01-2E-7F-AA").unwrap();
/// assert_eq!(mac.as_str(), "a4:bf:01:2e:7f:aa");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Largest value representable in 48 bits
    pub const MAX_VALUE: u64 = (1 << 48) - 1;

    /// Parse any supported textual form
    ///
    /// # Invariants
    /// - Exactly 12 hex digits (6 octets)
    /// - One separator style, with uniform group widths
    pub fn new(mac: impl AsRef<str>) -> Result<Self, MacError> {
        parse_with_format(mac.as_ref()).map(|(mac, _)| mac)
    }

    /// Create from raw octets
    pub fn from_octets(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Create from the low 48 bits of an integer
    pub fn from_u64(value: u64) -> Option<Self> {
        if value > Self::MAX_VALUE {
            return None;
        }
        let bytes = value.to_be_bytes();
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&bytes[2..]);
        Some(Self(octets))
    }

    /// Get the octets
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// The address as an unsigned 48-bit integer
    pub fn as_u64(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, &o| (acc << 8) | u64::from(o))
    }

    /// Add a signed delta, `None` if the result leaves the 48-bit range
    pub fn checked_offset(&self, delta: i64) -> Option<Self> {
        let sum = i128::from(self.as_u64()) + i128::from(delta);
        if sum < 0 || sum > i128::from(Self::MAX_VALUE) {
            return None;
        }
        Self::from_u64(sum as u64)
    }

    /// Get as canonical string (lowercase, colon-separated)
    pub fn as_str(&self) -> String {
        MacFormat::Colon.render(&self.0)
    }

    /// Check if this is a broadcast MAC address
    pub fn is_broadcast(&self) -> bool {
        self.0 == [0xff; 6]
    }

    /// Check if this is a multicast MAC address
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// Check if this is a unicast MAC address
    pub fn is_unicast(&self) -> bool {
        !self.is_multicast()
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MacAddress {
    type Err = MacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = MacError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.as_str()
    }
}

/// Parse a MAC and report which layout it was written in
pub fn parse_with_format(mac: &str) -> Result<(MacAddress, MacFormat), MacError> {
    let trimmed = mac.trim();
    let invalid = || MacError::InvalidFormat(mac.to_string());

    let (format, groups): (MacFormat, Vec<&str>) = if trimmed.contains(':') {
        (MacFormat::Colon, trimmed.split(':').collect())
    } else if trimmed.contains('-') {
        (MacFormat::Dash, trimmed.split('-').collect())
    } else if trimmed.contains('.') {
        let groups: Vec<&str> = trimmed.split('.').collect();
        match groups.len() {
            6 => (MacFormat::DottedOctets, groups),
            3 => (MacFormat::DottedQuads, groups),
            _ => return Err(invalid()),
        }
    } else {
        (MacFormat::Bare, vec![trimmed])
    };

    let width = format.group_width();
    if groups.len() * width != 12 {
        return Err(invalid());
    }
    if groups
        .iter()
        .any(|g| g.len() != width || !g.bytes().all(|b| b.is_ascii_hexdigit()))
    {
        return Err(invalid());
    }

    let value = u64::from_str_radix(&groups.concat(), 16).map_err(|_| invalid())?;
    let mac = MacAddress::from_u64(value).ok_or_else(invalid)?;
    Ok((mac, format))
}

/// Canonical form, or `mac` unchanged if it does not parse
pub fn normalize_mac(mac: &str) -> String {
    match MacAddress::new(mac) {
        Ok(parsed) => parsed.as_str(),
        Err(_) => mac.to_string(),
    }
}

/// Canonical form, or an error if `mac` does not parse
pub fn normalize_verify_mac(mac: &str) -> Result<String, MacError> {
    MacAddress::new(mac).map(|parsed| parsed.as_str())
}

/// Canonical form, or an empty string if `mac` does not parse
pub fn normalize_mac_if_valid(mac: &str) -> String {
    MacAddress::new(mac)
        .map(|parsed| parsed.as_str())
        .unwrap_or_default()
}

/// Offset `mac` by `delta`, keeping its separator style and hex case
///
/// Bare 12-digit input comes back colon-separated. Input whose hex letters
/// are all upper-case comes back upper-case; anything else is lower-case.
pub fn offset_mac(mac: &str, delta: i64) -> Result<String, MacError> {
    let (parsed, format) = parse_with_format(mac)?;
    let shifted = parsed.checked_offset(delta).ok_or_else(|| MacError::RangeError {
        mac: mac.to_string(),
        delta,
    })?;

    let rendered = format.render(&shifted.octets());
    if is_upper_case_class(mac) {
        Ok(rendered.to_ascii_uppercase())
    } else {
        Ok(rendered)
    }
}

/// Order two MACs by their 48-bit value
pub fn compare_mac(a: &str, b: &str) -> Result<Ordering, MacError> {
    let a = MacAddress::new(a)?;
    let b = MacAddress::new(b)?;
    Ok(a.as_u64().cmp(&b.as_u64()))
}

fn is_upper_case_class(mac: &str) -> bool {
    let has_upper = mac.bytes().any(|b| b.is_ascii_uppercase());
    let has_lower = mac.bytes().any(|b| b.is_ascii_lowercase());
    has_upper && !has_lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("a4:bf:01:2e:7f:aa", 0, "a4:bf:01:2e:7f:aa")]
    #[test_case("a4-bf-01-2e-7f-aa", 0, "a4-bf-01-2e-7f-aa")]
    #[test_case("14-23-33-55-66-77", 0, "14-23-33-55-66-77")]
    #[test_case("a4:bf:01:2e:7f:aa", -1, "a4:bf:01:2e:7f:a9")]
    #[test_case("a4:bf:01:2e:7f:aa", -11, "a4:bf:01:2e:7f:9f")]
    #[test_case("a4:bf:01:2e:7f:aa", -170, "a4:bf:01:2e:7f:00")]
    #[test_case("a4:bf:01:2e:7f:aa", -171, "a4:bf:01:2e:7e:ff")]
    #[test_case("a4:bf:01:2e:7f:aa", -256, "a4:bf:01:2e:7e:aa")]
    #[test_case("a4:bf:01:2e:7f:aa", -65536, "a4:bf:01:2d:7f:aa")]
    #[test_case("a4:bf:01:2e:7f:aa", 6, "a4:bf:01:2e:7f:b0")]
    #[test_case("a4:bf:01:2e:7f:aa", 85, "a4:bf:01:2e:7f:ff")]
    #[test_case("a4-bf-01-2e-7f-aa", 86, "a4-bf-01-2e-80-00")]
    #[test_case("a4:bf:01:2e:7f:AA", 87, "a4:bf:01:2e:80:01")]
    #[test_case("a4:bf:01:2E:7f:aa", 65536, "a4:bf:01:2f:7f:aa")]
    #[test_case("A4bf012e7faa", 0, "a4:bf:01:2e:7f:aa")]
    #[test_case("a4BF012e7faa", -171, "a4:bf:01:2e:7e:ff")]
    #[test_case("a4bf012e7faa", 256, "a4:bf:01:2e:80:aa")]
    #[test_case("A4:BF:01:2E:7F:AA", 87, "A4:BF:01:2E:80:01")]
    #[test_case("A4BF012E7FAA", -1, "A4:BF:01:2E:7F:A9")]
    #[test_case("a4.bf.01.2e.7f.aa", 1, "a4.bf.01.2e.7f.ab")]
    #[test_case("a4bf.012e.7faa", 86, "a4bf.012e.8000")]
    #[test_case("00:00:00:00:00:00", 0, "00:00:00:00:00:00")]
    #[test_case("ff:ff:ff:ff:ff:ff", 0, "ff:ff:ff:ff:ff:ff")]
    fn test_offset_mac(input: &str, delta: i64, expected: &str) {
        assert_eq!(offset_mac(input, delta).unwrap(), expected);
    }

    #[test_case("a4:bf:01:2e:7f:aaa", -1)]
    #[test_case("a4bf0127faa", 0)]
    #[test_case("0000bf012e7faa", -1)]
    fn test_offset_mac_bad_format(input: &str, delta: i64) {
        assert!(matches!(
            offset_mac(input, delta),
            Err(MacError::InvalidFormat(_))
        ));
    }

    #[test_case("00:00:00:00:00:00", -1)]
    #[test_case("ff:ff:ff:ff:ff:ff", 1)]
    #[test_case("00:00:00:00:00:01", i64::MIN)]
    #[test_case("ff:ff:ff:ff:ff:fe", i64::MAX)]
    fn test_offset_mac_out_of_range(input: &str, delta: i64) {
        assert!(matches!(
            offset_mac(input, delta),
            Err(MacError::RangeError { .. })
        ));
    }

    #[test_case("a4:bf:01:2e:7f:aa", "a4:bf:01:2e:7f:aa")]
    #[test_case("a4-bf-01-2e-7f-aa", "a4:bf:01:2e:7f:aa")]
    #[test_case("a4bf.012e.7faa", "a4:bf:01:2e:7f:aa")]
    #[test_case("a4.bf.01.2e.7f.aa", "a4:bf:01:2e:7f:aa")]
    #[test_case("142333556677", "14:23:33:55:66:77")]
    #[test_case("A4-BF-01-2E-7F-AA", "a4:bf:01:2e:7f:aa")]
    #[test_case("FF:FF:FF:FF:FF:FF", "ff:ff:ff:ff:ff:ff")]
    #[test_case("00-00-00-00-00-00", "00:00:00:00:00:00")]
    fn test_normalize_valid(input: &str, expected: &str) {
        assert_eq!(normalize_mac(input), expected);
        assert_eq!(normalize_mac_if_valid(input), expected);
        assert_eq!(normalize_verify_mac(input).unwrap(), expected);
    }

    #[test_case("1423335566")]
    #[test_case("a4:bf:01:2e:7f:aaa")]
    #[test_case("a4-bf-01-2e-7f-aa-af")]
    #[test_case("a4:bf-01:2e:7f:aa")]
    #[test_case("g4:bf:01:2e:7f:aa")]
    #[test_case("")]
    fn test_normalize_invalid(input: &str) {
        assert_eq!(normalize_mac(input), input);
        assert_eq!(normalize_mac_if_valid(input), "");
        assert!(normalize_verify_mac(input).is_err());
    }

    #[test]
    fn test_compare_mac() {
        let base = "a4:bf:01:2e:7f:aa";
        let mut offset = 1;
        while offset <= 256 {
            let higher = offset_mac(base, offset).unwrap();
            assert_eq!(compare_mac(base, &higher).unwrap(), Ordering::Less);
            assert_eq!(compare_mac(&higher, base).unwrap(), Ordering::Greater);
            offset *= 2;
        }
        assert_eq!(
            compare_mac("A4-BF-01-2E-7F-AA", base).unwrap(),
            Ordering::Equal
        );
        assert!(compare_mac(base, "a4bf0127faa").is_err());
    }

    #[test]
    fn test_mac_address() {
        let mac = MacAddress::new("00:11:22:33:44:55").unwrap();
        assert_eq!(mac.as_str(), "00:11:22:33:44:55");
        assert_eq!(mac.as_u64(), 0x0011_2233_4455);
        assert!(mac.is_unicast());
        assert!(!mac.is_multicast());
        assert_eq!(MacAddress::from_u64(mac.as_u64()), Some(mac));
        assert_eq!(MacAddress::from_u64(1 << 48), None);
    }

    #[test]
    fn test_mac_address_multicast() {
        let multicast = MacAddress::new("01:00:5e:00:00:01").unwrap();
        assert!(multicast.is_multicast());
        assert!(MacAddress::new("ff-ff-ff-ff-ff-ff").unwrap().is_broadcast());
    }

    #[test]
    fn test_mac_serde_uses_canonical_string() {
        let mac: MacAddress = serde_json::from_str("\"A4BF012E7FAA\"").unwrap();
        assert_eq!(serde_json::to_string(&mac).unwrap(), "\"a4:bf:01:2e:7f:aa\"");
        assert!(serde_json::from_str::<MacAddress>("\"nope\"").is_err());
    }
}
