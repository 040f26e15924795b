// Copyright (c) 2025 - Cowboy AI, Inc.
//! Hardware identity normalization for Redfish-discovered inventory
//!
//! Management controllers report identity data in whatever shape their
//! vendor chose. This crate turns it into canonical, comparable form:
//!
//! - [`domain::mac`] - hardware addresses, offsets, and ordering
//! - [`domain::endpoint`] - Redfish endpoint ID/FQDN/Hostname/Domain resolution
//! - [`domain::fru`] - field-replaceable-unit identifiers
//! - [`domain::natural`] - natural ordering of resource names
//! - [`domain::message_id`] - versioned event message identifiers
//! - [`reservations`] - exclusive component locks with automatic renewal
//!
//! Everything under [`domain`] is pure and safe to call from any thread.

pub mod domain;
pub mod errors;
pub mod reservations;

// Re-export commonly used types
pub use domain::{
    build_fru_id, canonical_ip_address, compare_mac, compare_resource_ids, fru_id_for_memory,
    normalize_mac, normalize_mac_if_valid, normalize_verify_mac, offset_mac, parse_message_id,
    resolve_endpoint, resolve_endpoints, EndpointDescriptor, MacAddress, RawEndpointSpec,
};
pub use errors::{IdentityError, IdentityResult};
pub use reservations::{ReservationClient, ReservationConfig, ReservationError, ReservationService};
