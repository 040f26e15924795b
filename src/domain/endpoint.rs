// Copyright (c) 2025 - Cowboy AI, Inc.
//! Redfish Endpoint Descriptor Resolution
//!
//! Turns a user-supplied endpoint record, where any of ID, FQDN, Hostname,
//! and Domain may be missing, into one coherent address record.
//!
//! # Decision Table
//!
//! | FQDN | Hostname | Domain | Address                                       |
//! |------|----------|--------|-----------------------------------------------|
//! | yes  | any      | any    | FQDN; Hostname/Domain must agree with it      |
//! | no   | yes      | no     | Hostname (IP, or controller xname = ID)       |
//! | no   | yes      | yes    | Hostname.Domain (IP hostnames used as-is)     |
//! | no   | no       | any    | ID, or ID.Domain                              |
//!
//! The ID must be a controller xname. When absent it is taken from the
//! leading FQDN label or from the hostname.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use thiserror::Error;
use tracing::{debug, warn};

use super::hostname::{Hostname, HostnameError};
use super::mac::{normalize_verify_mac, MacError};
use super::sanitize::non_empty;
use super::xname::{HmsType, Xname};

/// Endpoint resolution error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Invalid endpoint ID: {0}")]
    InvalidId(String),

    #[error("Conflicting endpoint address: {0}")]
    ConflictingAddress(String),

    #[error("Invalid endpoint address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid endpoint MAC address: {0}")]
    InvalidMac(#[source] MacError),

    #[error("Endpoint {index} rejected: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<EndpointError>,
    },
}

impl EndpointError {
    fn invalid_address(address: &str, reason: impl fmt::Display) -> Self {
        Self::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<MacError> for EndpointError {
    fn from(err: MacError) -> Self {
        Self::InvalidMac(err)
    }
}

/// Controller login. The password is accepted on input and never rendered.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "User", default)]
    user: String,
    #[serde(rename = "Password", default, skip_serializing)]
    password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Endpoint as supplied by an operator or loader, before resolution
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEndpointSpec {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "FQDN", default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(rename = "Hostname", default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(rename = "Domain", default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(rename = "User", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(rename = "Password", default, skip_serializing)]
    pub password: Option<String>,
    #[serde(rename = "MACAddr", default, skip_serializing_if = "Option::is_none")]
    pub mac_addr: Option<String>,
    #[serde(rename = "IPAddress", default, skip_serializing_if = "Option::is_none")]
    pub ip_addr: Option<String>,
    #[serde(rename = "Enabled", default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl fmt::Debug for RawEndpointSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawEndpointSpec")
            .field("id", &self.id)
            .field("fqdn", &self.fqdn)
            .field("hostname", &self.hostname)
            .field("domain", &self.domain)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("mac_addr", &self.mac_addr)
            .field("ip_addr", &self.ip_addr)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// The `{"RedfishEndpoints": [...]}` document loaders submit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEndpointList {
    #[serde(rename = "RedfishEndpoints", default)]
    pub endpoints: Vec<RawEndpointSpec>,
}

/// Canonical identity and address of a management controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointDescriptor {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Type")]
    hms_type: HmsType,
    #[serde(rename = "FQDN")]
    fqdn: String,
    #[serde(rename = "Hostname")]
    hostname: String,
    #[serde(rename = "Domain")]
    domain: String,
    #[serde(rename = "Port", skip_serializing_if = "Option::is_none")]
    port: Option<u16>,
    #[serde(rename = "MACAddr", skip_serializing_if = "Option::is_none")]
    mac_addr: Option<String>,
    #[serde(rename = "IPAddress", skip_serializing_if = "Option::is_none")]
    ip_addr: Option<String>,
    #[serde(rename = "Enabled")]
    enabled: bool,
    #[serde(flatten)]
    credentials: Credentials,
}

impl EndpointDescriptor {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hms_type(&self) -> HmsType {
        self.hms_type
    }

    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn mac_addr(&self) -> Option<&str> {
        self.mac_addr.as_deref()
    }

    pub fn ip_addr(&self) -> Option<&str> {
        self.ip_addr.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// `fqdn[:port]`, suitable for building a Redfish URL
    pub fn address(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.fqdn, port),
            None => self.fqdn.clone(),
        }
    }
}

impl fmt::Display for EndpointDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) at {}", self.id, self.hms_type, self.address())
    }
}

/// A host component: IP literal or DNS name
#[derive(Debug, Clone, PartialEq, Eq)]
enum Host {
    /// Canonical literal; IPv6 is bracketed
    Ip(String),
    Name(Hostname),
}

impl Host {
    fn parse(host: &str) -> Result<Self, EndpointError> {
        if let Some(ip) = canonical_ip(host) {
            return Ok(Self::Ip(ip));
        }
        Hostname::new(host)
            .map(Self::Name)
            .map_err(|e: HostnameError| EndpointError::invalid_address(host, e))
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Ip(ip) => ip,
            Self::Name(name) => name.as_str(),
        }
    }
}

/// Address fields settled before the ID is known
struct Address {
    fqdn: String,
    hostname: String,
    domain: String,
    port: Option<u16>,
    /// Name the ID may be derived from
    id_hint: Option<String>,
    /// Hostname stands alone, so it must itself be the controller xname
    hostname_is_id: bool,
}

/// Resolve one raw endpoint into its canonical descriptor
pub fn resolve_endpoint(raw: &RawEndpointSpec) -> Result<EndpointDescriptor, EndpointError> {
    let id = non_empty(raw.id.as_deref());
    let fqdn = non_empty(raw.fqdn.as_deref());
    let hostname = non_empty(raw.hostname.as_deref());
    let domain = non_empty(raw.domain.as_deref())
        .map(|d| Hostname::new(d.trim_start_matches('.')).map_err(|e| EndpointError::invalid_address(d, e)))
        .transpose()?;

    let address = match (fqdn, hostname, domain.as_ref()) {
        (Some(fqdn), hostname, domain) => address_from_fqdn(fqdn, hostname, domain)?,
        (None, Some(hostname), None) => address_from_hostname(hostname)?,
        (None, Some(hostname), Some(domain)) => address_from_hostname_and_domain(hostname, domain)?,
        (None, None, _) => {
            let xname = controller_xname(id.ok_or_else(|| {
                EndpointError::InvalidId("no ID, FQDN, or Hostname given".to_string())
            })?)?;
            let hostname = xname.as_str().to_string();
            let fqdn = match &domain {
                Some(domain) => format!("{}.{}", hostname, domain),
                None => hostname.clone(),
            };
            Address {
                fqdn,
                hostname,
                domain: domain.as_ref().map(|d| d.to_string()).unwrap_or_default(),
                port: None,
                id_hint: None,
                hostname_is_id: false,
            }
        }
    };

    let xname = match (id, address.id_hint.as_deref()) {
        (Some(id), _) => controller_xname(id)?,
        (None, Some(hint)) => controller_xname(hint)?,
        (None, None) => {
            return Err(EndpointError::InvalidId(format!(
                "no ID given and none can be derived from {}",
                address.fqdn
            )))
        }
    };

    if address.hostname_is_id {
        let matches = Xname::parse(&address.hostname)
            .map(|h| h == xname)
            .unwrap_or(false);
        if !matches {
            return Err(EndpointError::ConflictingAddress(format!(
                "hostname {} without a domain must be the controller ID {}",
                address.hostname, xname
            )));
        }
    }

    let mac_addr = non_empty(raw.mac_addr.as_deref())
        .map(normalize_verify_mac)
        .transpose()?;
    let ip_addr = non_empty(raw.ip_addr.as_deref())
        .map(|ip| {
            ip.trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<IpAddr>()
                .map(|ip| ip.to_string())
                .map_err(|e| EndpointError::invalid_address(ip, e))
        })
        .transpose()?;

    let descriptor = EndpointDescriptor {
        id: xname.as_str().to_string(),
        hms_type: xname.hms_type(),
        fqdn: address.fqdn,
        hostname: address.hostname,
        domain: address.domain,
        port: address.port,
        mac_addr,
        ip_addr,
        enabled: raw.enabled.unwrap_or(true),
        credentials: Credentials::new(
            raw.user.clone().unwrap_or_default(),
            raw.password.clone().unwrap_or_default(),
        ),
    };

    debug!(id = %descriptor.id, fqdn = %descriptor.fqdn, "Resolved Redfish endpoint");
    Ok(descriptor)
}

/// Resolve a batch; one bad entry rejects the whole batch
pub fn resolve_endpoints(raws: &[RawEndpointSpec]) -> Result<Vec<EndpointDescriptor>, EndpointError> {
    raws.iter()
        .enumerate()
        .map(|(index, raw)| {
            resolve_endpoint(raw).map_err(|e| {
                warn!(index, error = %e, "Rejected Redfish endpoint");
                EndpointError::Batch {
                    index,
                    source: Box::new(e),
                }
            })
        })
        .collect()
}

fn controller_xname(id: &str) -> Result<Xname, EndpointError> {
    let xname = Xname::parse(id).map_err(|e| EndpointError::InvalidId(e.to_string()))?;
    if !xname.is_controller() {
        return Err(EndpointError::InvalidId(format!(
            "{} is a {}, not a controller",
            xname,
            xname.hms_type()
        )));
    }
    Ok(xname)
}

fn address_from_fqdn(
    fqdn: &str,
    hostname: Option<&str>,
    domain: Option<&Hostname>,
) -> Result<Address, EndpointError> {
    let (host, port) = split_host_port(fqdn)
        .ok_or_else(|| EndpointError::invalid_address(fqdn, "malformed host or port"))?;
    let host = Host::parse(host)?;
    let given_hostname = hostname.map(Host::parse).transpose()?;

    match host {
        Host::Ip(ip) => {
            if let Some(given) = given_hostname {
                if given.as_str() != ip {
                    return Err(EndpointError::ConflictingAddress(format!(
                        "hostname {} does not match FQDN {}",
                        given.as_str(),
                        ip
                    )));
                }
            }
            Ok(Address {
                fqdn: ip.clone(),
                hostname: ip,
                domain: domain.map(|d| d.to_string()).unwrap_or_default(),
                port,
                id_hint: None,
                hostname_is_id: false,
            })
        }
        Host::Name(name) => {
            let short = name.short_name().to_string();
            let suffix = name.domain().unwrap_or_default().to_string();

            if let Some(given) = given_hostname {
                let given = given.as_str();
                if given != short && given != name.as_str() {
                    return Err(EndpointError::ConflictingAddress(format!(
                        "hostname {} does not match FQDN {}",
                        given, name
                    )));
                }
            }
            if let Some(domain) = domain {
                if domain.as_str() != suffix {
                    return Err(EndpointError::ConflictingAddress(format!(
                        "domain {} does not match FQDN {}",
                        domain, name
                    )));
                }
            }

            Ok(Address {
                fqdn: name.to_string(),
                hostname: short.clone(),
                domain: suffix,
                port,
                id_hint: Some(short),
                hostname_is_id: false,
            })
        }
    }
}

fn address_from_hostname(hostname: &str) -> Result<Address, EndpointError> {
    match Host::parse(hostname)? {
        Host::Ip(ip) => Ok(Address {
            fqdn: ip.clone(),
            hostname: ip,
            domain: String::new(),
            port: None,
            id_hint: None,
            hostname_is_id: false,
        }),
        Host::Name(name) => Ok(Address {
            fqdn: name.to_string(),
            hostname: name.to_string(),
            domain: String::new(),
            port: None,
            id_hint: Some(name.to_string()),
            hostname_is_id: true,
        }),
    }
}

fn address_from_hostname_and_domain(hostname: &str, domain: &Hostname) -> Result<Address, EndpointError> {
    match Host::parse(hostname)? {
        Host::Ip(ip) => Ok(Address {
            fqdn: ip.clone(),
            hostname: ip,
            domain: domain.to_string(),
            port: None,
            id_hint: None,
            hostname_is_id: false,
        }),
        Host::Name(name) => {
            if name.is_fqdn() {
                return Err(EndpointError::ConflictingAddress(format!(
                    "hostname {} already carries a domain, and domain {} was also given",
                    name, domain
                )));
            }
            let fqdn = name
                .with_domain(domain)
                .map_err(|e| EndpointError::invalid_address(name.as_str(), e))?;
            Ok(Address {
                fqdn: fqdn.to_string(),
                hostname: name.to_string(),
                domain: domain.to_string(),
                port: None,
                id_hint: Some(name.to_string()),
                hostname_is_id: false,
            })
        }
    }
}

/// Split `host[:port]`, `[v6][:port]`, or a bare IPv6 literal
fn split_host_port(addr: &str) -> Option<(&str, Option<u16>)> {
    if let Some(rest) = addr.strip_prefix('[') {
        let (host, tail) = rest.split_once(']')?;
        if tail.is_empty() {
            return Some((host, None));
        }
        let port = tail.strip_prefix(':')?.parse().ok()?;
        return Some((host, Some(port)));
    }
    match addr.matches(':').count() {
        0 => Some((addr, None)),
        1 => {
            let (host, port) = addr.split_once(':')?;
            Some((host, Some(port.parse().ok()?)))
        }
        _ => Some((addr, None)),
    }
}

/// Canonical IP literal for a bare host (no port)
///
/// IPv6 is lower-cased, compressed, and bracketed, keeping any zone.
/// IPv4 with a zone is not an address.
fn canonical_ip(host: &str) -> Option<String> {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let (ip, zone) = match host.split_once('%') {
        Some((ip, zone)) => (ip, Some(zone)),
        None => (host, None),
    };
    match (ip.parse::<IpAddr>().ok()?, zone) {
        (IpAddr::V4(v4), None) => Some(v4.to_string()),
        (IpAddr::V4(_), Some(_)) => None,
        (IpAddr::V6(v6), None) => Some(format!("[{}]", v6)),
        (IpAddr::V6(_), Some("")) => None,
        (IpAddr::V6(v6), Some(zone)) => Some(format!("[{}%{}]", v6, zone)),
    }
}

/// Canonical form of an IP literal with optional port
///
/// Returns `None` for DNS names and malformed input.
///
/// ```rust
/// use redfish_identity::domain::canonical_ip_address;
///
/// assert_eq!(
///     canonical_ip_address("FD40:AAAA:BBBB:1007:0240:A6ff:FE82:F670").as_deref(),
///     Some("[fd40:aaaa:bbbb:1007:240:a6ff:fe82:f670]")
/// );
/// assert_eq!(canonical_ip_address("host.domain.com:9999"), None);
/// ```
pub fn canonical_ip_address(addr: &str) -> Option<String> {
    let (host, port) = split_host_port(addr.trim())?;
    let ip = canonical_ip(host)?;
    Some(match port {
        Some(port) => format!("{}:{}", ip, port),
        None => ip,
    })
}
