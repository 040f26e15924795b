// Copyright (c) 2025 - Cowboy AI, Inc.
//! Hardware Identity Domain Models
//!
//! Pure value objects and functions that turn vendor-reported identity data
//! into canonical form. Nothing here performs I/O.
//!
//! # Value Objects with Invariants
//!
//! - [`MacAddress`] - 48-bit hardware address in canonical colon form
//! - [`Hostname`] - DNS-validated names (RFC 1123)
//! - [`Xname`] - structural location identifiers
//! - [`EndpointDescriptor`] - resolved Redfish management endpoint
//! - [`ResourceId`] - resource name ordered naturally
//! - [`EventMessageId`] - `Registry.Version.Message` event identifiers
//!
//! # Operations
//!
//! - [`offset_mac`] / [`compare_mac`] - arithmetic on hardware addresses
//! - [`resolve_endpoint`] - decision table over ID/FQDN/Hostname/Domain
//! - [`build_fru_id`] - stable field-replaceable-unit identifiers
//! - [`compare_resource_ids`] - natural order of resource names
//! - [`system_arch`] - processor family from board identity

pub mod endpoint;
pub mod fru;
pub mod hostname;
pub mod mac;
pub mod message_id;
pub mod natural;
pub mod sanitize;
pub mod system_arch;
pub mod xname;

pub use endpoint::{
    canonical_ip_address, resolve_endpoint, resolve_endpoints, Credentials, EndpointDescriptor,
    EndpointError, RawEndpointList, RawEndpointSpec,
};
pub use fru::{
    build_fru_id, fallback_fru_id, fru_id_for, fru_id_for_memory, fru_id_or_fallback, FruIdError,
    FruInfo, MemoryFruInfo, MAX_FRU_ID_LENGTH,
};
pub use hostname::{Hostname, HostnameError};
pub use mac::{
    compare_mac, normalize_mac, normalize_mac_if_valid, normalize_verify_mac, offset_mac,
    parse_with_format, MacAddress, MacError, MacFormat,
};
pub use message_id::{parse_message_id, version_fields, EventMessageId};
pub use natural::{compare_resource_ids, sort_resource_ids, ResourceId};
pub use system_arch::{system_arch, SystemArch};
pub use xname::{normalize_xname, HmsType, Xname, XnameError};
