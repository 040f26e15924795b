// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Event MessageIds

use proptest::prelude::*;
use redfish_identity::domain::{parse_message_id, version_fields, EventMessageId};

fn version() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[0-9]{1,3}", 1..5)
}

proptest! {
    /// Property: composing then parsing recovers every part
    #[test]
    fn prop_round_trip(
        registry in "[A-Z][A-Za-z]{0,15}",
        version in version(),
        message in "[A-Z][A-Za-z]{0,20}",
    ) {
        let version = version.join(".");
        let id = format!("{}.{}.{}", registry, version, message);

        let (r, v, m) = parse_message_id(&id);
        prop_assert_eq!(&r, &registry);
        prop_assert_eq!(&v, &version);
        prop_assert_eq!(&m, &message);
        prop_assert_eq!(EventMessageId::parse(&id).to_string(), id);
    }

    /// Property: version_fields never invents fields
    #[test]
    fn prop_version_fields_prefix(parts in version(), n in 0usize..8) {
        let version = parts.join(".");
        let (prefix, used) = version_fields(&version, ".", n);

        prop_assert_eq!(used, n.min(parts.len()));
        prop_assert!(version.starts_with(&prefix));
        prop_assert_eq!(prefix, parts[..used].join("."));
    }
}
