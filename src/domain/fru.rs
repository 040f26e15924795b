// Copyright (c) 2025 - Cowboy AI, Inc.
//! Field-Replaceable Unit Identifiers
//!
//! A FRU id names a physical part independently of where it is installed:
//!
//! ```text
//! <Type>.<Manufacturer>.<PartNumber>.<SerialNumber>
//! ```
//!
//! Manufacturer or part number may be omitted (not both); the serial number
//! is mandatory. When an id cannot be built, the error carries a fallback
//! `FRUIDfor<component id>` so callers always have something to record.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::sanitize::alphanumeric;

/// Longest FRU id the inventory accepts
pub const MAX_FRU_ID_LENGTH: usize = 255;

/// FRU id construction error, with the fallback id to use instead
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FruIdError {
    #[error("No serial number for {fallback}")]
    MissingSerial { fallback: String },

    #[error("No manufacturer or part number for {fallback}")]
    MissingIdentity { fallback: String },

    #[error("FRU id is {length} characters, limit is {}; using {fallback}", MAX_FRU_ID_LENGTH)]
    TooLong { length: usize, fallback: String },
}

impl FruIdError {
    /// The deterministic substitute id
    pub fn fallback(&self) -> &str {
        match self {
            Self::MissingSerial { fallback }
            | Self::MissingIdentity { fallback }
            | Self::TooLong { fallback, .. } => fallback,
        }
    }
}

/// FRU fields common to Redfish Chassis, ComputerSystem, Processor, etc.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FruInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

/// FRU fields of a Redfish Memory (DIMM) resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemoryFruInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(rename = "MemoryDeviceType", default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
}

/// Fallback FRU id for a component
pub fn fallback_fru_id(component_id: &str) -> String {
    format!("FRUIDfor{}", component_id)
}

/// Build a FRU id for a component of type `comp_type`
///
/// `component_id` is only used for the fallback.
pub fn build_fru_id(
    comp_type: &str,
    component_id: &str,
    manufacturer: &str,
    part_number: &str,
    serial_number: &str,
) -> Result<String, FruIdError> {
    let fallback = || fallback_fru_id(component_id);

    let serial = alphanumeric(serial_number).ok_or_else(|| FruIdError::MissingSerial {
        fallback: fallback(),
    })?;

    let identity: Vec<String> = [manufacturer, part_number]
        .into_iter()
        .filter_map(alphanumeric)
        .collect();
    if identity.is_empty() {
        return Err(FruIdError::MissingIdentity {
            fallback: fallback(),
        });
    }

    let mut parts = Vec::with_capacity(identity.len() + 2);
    parts.push(comp_type.to_string());
    parts.extend(identity);
    parts.push(serial);
    let fru_id = parts.join(".");

    if fru_id.len() > MAX_FRU_ID_LENGTH {
        return Err(FruIdError::TooLong {
            length: fru_id.len(),
            fallback: fallback(),
        });
    }

    Ok(fru_id)
}

/// Build a FRU id from a decoded Redfish FRU record
pub fn fru_id_for(comp_type: &str, component_id: &str, info: &FruInfo) -> Result<String, FruIdError> {
    build_fru_id(
        comp_type,
        component_id,
        info.manufacturer.as_deref().unwrap_or_default(),
        info.part_number.as_deref().unwrap_or_default(),
        info.serial_number.as_deref().unwrap_or_default(),
    )
}

/// Build a FRU id for a DIMM
pub fn fru_id_for_memory(component_id: &str, info: &MemoryFruInfo) -> Result<String, FruIdError> {
    build_fru_id(
        "Memory",
        component_id,
        info.manufacturer.as_deref().unwrap_or_default(),
        info.part_number.as_deref().unwrap_or_default(),
        info.serial_number.as_deref().unwrap_or_default(),
    )
}

/// The FRU id, or the fallback with a warning logged
pub fn fru_id_or_fallback(result: Result<String, FruIdError>) -> String {
    match result {
        Ok(fru_id) => fru_id,
        Err(e) => {
            warn!("Using fallback FRU id: {}", e);
            e.fallback().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const NODE: &str = "x0c0s0b0n0";

    #[test_case("Intel Corporation", "testPartNumber", "testSerialNumber", "Node.IntelCorporation.testPartNumber.testSerialNumber" ; "all fields")]
    #[test_case("", "testPartNumber", "testSerialNumber", "Node.testPartNumber.testSerialNumber" ; "no manufacturer")]
    #[test_case("Intel Corporation", "", "testSerialNumber", "Node.IntelCorporation.testSerialNumber" ; "no part number")]
    #[test_case("Intel Corporation", "P1", "S1", "Node.IntelCorporation.P1.S1" ; "short fields")]
    #[test_case("  HPE ", "...", "SN-0001", "Node.HPE.SN0001" ; "dots part number")]
    fn test_build_fru_id(manufacturer: &str, part: &str, serial: &str, expected: &str) {
        assert_eq!(build_fru_id("Node", NODE, manufacturer, part, serial).unwrap(), expected);
    }

    #[test]
    fn test_missing_serial() {
        let err = build_fru_id("Node", NODE, "Intel Corporation", "testPartNumber", "").unwrap_err();
        assert!(matches!(err, FruIdError::MissingSerial { .. }));
        assert_eq!(err.fallback(), "FRUIDforx0c0s0b0n0");
    }

    #[test]
    fn test_missing_identity() {
        let err = build_fru_id("Node", NODE, "", "", "testSerialNumber").unwrap_err();
        assert!(matches!(err, FruIdError::MissingIdentity { .. }));
        assert_eq!(err.fallback(), "FRUIDforx0c0s0b0n0");
    }

    #[test]
    fn test_dots_are_empty_fields() {
        let err = build_fru_id(
            "Node",
            NODE,
            "Intel Corporation",
            "..................",
            "..................",
        )
        .unwrap_err();
        assert!(matches!(err, FruIdError::MissingSerial { .. }));
        assert_eq!(err.fallback(), "FRUIDforx0c0s0b0n0");
    }

    #[test]
    fn test_too_long() {
        let err = build_fru_id(
            "Node",
            NODE,
            "Reeeeeeeeeeeeeeeeeally Loooooooooooooong Maaaaaaaaaaaaaaaaaaaaaaaaaaaaaanufacturer Naaaaaaaaaaaaaaaaaaaaaaaaame",
            "WhoUsesPartNumbersThatAreThisLoooooooooooooooooooooooooooooooooooooooooong",
            "WhyIsThisSerialNumberSoooooooooooooooooooooooooooooooooooooooooooooLong",
        )
        .unwrap_err();
        assert_eq!(
            err,
            FruIdError::TooLong {
                length: 260,
                fallback: "FRUIDforx0c0s0b0n0".to_string()
            }
        );
    }

    #[test]
    fn test_memory_fru_ids() {
        let dimm = |m: &str, p: &str, s: &str| MemoryFruInfo {
            manufacturer: Some(m.to_string()),
            part_number: Some(p.to_string()),
            serial_number: Some(s.to_string()),
            device_type: Some("DDR4".to_string()),
        };

        assert_eq!(
            fru_id_for_memory("x0c0s14b0d1", &dimm("test1Manufacturer", "test1PartNumber", "test1SerialNumber")).unwrap(),
            "Memory.test1Manufacturer.test1PartNumber.test1SerialNumber"
        );
        assert_eq!(
            fru_id_for_memory("x0c0s14b0d2", &dimm("", "test2PartNumber", "test2SerialNumber")).unwrap(),
            "Memory.test2PartNumber.test2SerialNumber"
        );
        assert_eq!(
            fru_id_for_memory("x0c0s14b0d3", &dimm("test3Manufacturer", "", "test3SerialNumber")).unwrap(),
            "Memory.test3Manufacturer.test3SerialNumber"
        );
        assert_eq!(
            fru_id_for_memory("x0c0s14b0d4", &dimm("", "", "test4SerialNumber"))
                .unwrap_err()
                .fallback(),
            "FRUIDforx0c0s14b0d4"
        );
        assert_eq!(
            fru_id_for_memory("x0c0s14b0d5", &dimm("test5Manufacturer", "test5PartNumber", "")).unwrap_err(),
            FruIdError::MissingSerial {
                fallback: "FRUIDforx0c0s14b0d5".to_string()
            }
        );
        assert_eq!(
            fru_id_for_memory("x0c0s14b0d6", &MemoryFruInfo::default())
                .unwrap_err()
                .fallback(),
            "FRUIDforx0c0s14b0d6"
        );
    }

    #[test]
    fn test_fru_info_from_redfish_json() {
        let info: FruInfo = serde_json::from_str(
            r#"{"Manufacturer": "Cray Inc.", "Model": "EX425", "PartNumber": "102-0001", "SerialNumber": "HW123"}"#,
        )
        .unwrap();
        assert_eq!(fru_id_for("NodeEnclosure", "x0c0s0e0", &info).unwrap(), "NodeEnclosure.CrayInc.1020001.HW123");
        assert_eq!(fru_id_or_fallback(fru_id_for("Node", NODE, &FruInfo::default())), "FRUIDforx0c0s0b0n0");
    }
}
