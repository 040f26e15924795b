// Copyright (c) 2025 - Cowboy AI, Inc.
//! Endpoint Resolution Integration Tests
//!
//! Resolves a loader-style `RedfishEndpoints` document end to end.

use anyhow::Result;
use pretty_assertions::assert_eq;
use redfish_identity::domain::{
    resolve_endpoints, EndpointError, HmsType, RawEndpointList, RawEndpointSpec,
};

const DOCUMENT: &str = include_str!("fixtures/redfish_endpoints.json");

#[test]
fn test_resolve_document() -> Result<()> {
    let list: RawEndpointList = serde_json::from_str(DOCUMENT)?;
    let resolved = resolve_endpoints(&list.endpoints)?;

    let summary: Vec<(&str, HmsType, String)> = resolved
        .iter()
        .map(|epd| (epd.id(), epd.hms_type(), epd.address()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("x0c0s14b0", HmsType::NodeBMC, "x0c0s14.crush.next.cray.com".to_string()),
            ("x0c0s16b0", HmsType::NodeBMC, "x0c0s16b0.crush.next.cray.com:443".to_string()),
            ("x0c0s18b0", HmsType::NodeBMC, "x0c0s18.crush.next.cray.com".to_string()),
            ("x1c0b0", HmsType::ChassisBMC, "172.30.79.1".to_string()),
            (
                "x0c0s31b0",
                HmsType::NodeBMC,
                "[fd40:aaaa:bbbb:1007:240:a6ff:fe82:f7c2]".to_string()
            ),
            ("x3000m0", HmsType::CabinetPDUController, "x3000m0".to_string()),
        ]
    );

    assert_eq!(resolved[0].mac_addr(), Some("a4:bf:01:2e:7f:aa"));
    assert_eq!(resolved[2].ip_addr(), Some("10.100.16.18"));
    assert!(!resolved[3].enabled());
    assert_eq!(resolved[3].credentials().user(), "admin");
    Ok(())
}

#[test]
fn test_descriptors_serialize_without_passwords() -> Result<()> {
    let list: RawEndpointList = serde_json::from_str(DOCUMENT)?;
    let resolved = resolve_endpoints(&list.endpoints)?;

    let json = serde_json::to_string(&resolved)?;
    for secret in ["calvin", "initial0", "Password"] {
        assert!(!json.contains(secret), "serialized descriptors leak {}", secret);
    }
    let first: serde_json::Value = serde_json::to_value(&resolved[0])?;
    assert_eq!(first["Type"], "NodeBMC");
    assert_eq!(first["Hostname"], "x0c0s14");
    assert_eq!(first["Domain"], "crush.next.cray.com");
    Ok(())
}

#[test]
fn test_one_bad_entry_rejects_batch() -> Result<()> {
    let mut list: RawEndpointList = serde_json::from_str(DOCUMENT)?;
    list.endpoints.insert(
        3,
        RawEndpointSpec {
            id: Some("x0c0s14".to_string()),
            fqdn: Some("x0c0s14.crush.next.cray.com".to_string()),
            ..Default::default()
        },
    );

    let err = resolve_endpoints(&list.endpoints).unwrap_err();
    match err {
        EndpointError::Batch { index, source } => {
            assert_eq!(index, 3);
            assert!(matches!(*source, EndpointError::InvalidId(_)));
        }
        other => panic!("unexpected error: {}", other),
    }
    Ok(())
}

#[test]
fn test_empty_document() -> Result<()> {
    let list: RawEndpointList = serde_json::from_str("{}")?;
    assert!(resolve_endpoints(&list.endpoints)?.is_empty());
    Ok(())
}
