// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Natural Resource Ordering
//!
//! The comparator must be a total order so that sorting is well defined.

use proptest::prelude::*;
use redfish_identity::domain::{compare_resource_ids, sort_resource_ids, ResourceId};
use std::cmp::Ordering;

fn resource_id() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z]{1,6}[0-9]{1,4}",
        "[a-z]{1,3}[0-9]{1,3}[a-z]{1,3}[0-9]{0,3}",
        "[A-Za-z0-9_./-]{0,12}",
        "0{0,3}[0-9]{1,20}",
    ]
}

proptest! {
    /// Property: swapping arguments reverses the result
    #[test]
    fn prop_antisymmetric(a in resource_id(), b in resource_id()) {
        prop_assert_eq!(compare_resource_ids(&a, &b), compare_resource_ids(&b, &a).reverse());
    }

    /// Property: only identical strings compare equal
    #[test]
    fn prop_equal_iff_identical(a in resource_id(), b in resource_id()) {
        prop_assert_eq!(compare_resource_ids(&a, &b) == Ordering::Equal, a == b);
        prop_assert_eq!(compare_resource_ids(&a, &a), Ordering::Equal);
    }

    /// Property: the order is transitive
    #[test]
    fn prop_transitive(a in resource_id(), b in resource_id(), c in resource_id()) {
        let mut ids = vec![a, b, c];
        ids.sort_by(|x, y| compare_resource_ids(x, y));
        prop_assert_ne!(compare_resource_ids(&ids[0], &ids[1]), Ordering::Greater);
        prop_assert_ne!(compare_resource_ids(&ids[1], &ids[2]), Ordering::Greater);
        prop_assert_ne!(compare_resource_ids(&ids[0], &ids[2]), Ordering::Greater);
    }

    /// Property: a trailing number orders by value
    #[test]
    fn prop_numeric_suffix_by_value(prefix in "[A-Za-z]{1,8}", m in 0u32..100_000, n in 0u32..100_000) {
        let a = format!("{}{}", prefix, m);
        let b = format!("{}{}", prefix, n);
        prop_assert_eq!(compare_resource_ids(&a, &b), m.cmp(&n));
    }

    /// Property: sorting strings and sorting ResourceIds agree
    #[test]
    fn prop_sort_matches_resource_id_order(ids in prop::collection::vec(resource_id(), 0..20)) {
        let mut plain = ids.clone();
        sort_resource_ids(&mut plain);

        let mut typed: Vec<ResourceId> = ids.iter().map(|id| ResourceId::new(id.as_str())).collect();
        typed.sort();
        let typed: Vec<String> = typed.iter().map(|id| id.to_string()).collect();

        prop_assert_eq!(plain, typed);
    }
}
