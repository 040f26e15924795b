// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Hardware Addresses
//!
//! Normalization is idempotent across every accepted layout, and offsets
//! behave like integer addition on the 48-bit value.

use proptest::prelude::*;
use redfish_identity::domain::{
    compare_mac, normalize_mac, normalize_verify_mac, offset_mac, MacAddress,
};

// ============================================================================
// Generators
// ============================================================================

fn mac_value() -> impl Strategy<Value = u64> {
    0..=MacAddress::MAX_VALUE
}

/// The same address written in one of the accepted layouts
fn mac_text() -> impl Strategy<Value = (u64, String)> {
    (mac_value(), 0usize..6, any::<bool>()).prop_map(|(value, layout, upper)| {
        let octets = MacAddress::from_u64(value).unwrap().octets();
        let hex: Vec<String> = octets.iter().map(|o| format!("{:02x}", o)).collect();
        let text = match layout {
            0 => hex.join(":"),
            1 => hex.join("-"),
            2 => hex.join("."),
            3 => hex.chunks(2).map(|c| c.concat()).collect::<Vec<_>>().join("."),
            4 => hex.concat(),
            _ => format!("  {}  ", hex.join(":")),
        };
        let text = if upper { text.to_ascii_uppercase() } else { text };
        (value, text)
    })
}

fn canonical(value: u64) -> String {
    MacAddress::from_u64(value).unwrap().as_str()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: normalization is idempotent and layout-independent
    #[test]
    fn prop_normalize_idempotent((value, text) in mac_text()) {
        let once = normalize_mac(&text);
        prop_assert_eq!(&once, &canonical(value));
        prop_assert_eq!(normalize_mac(&once), once.clone());
        prop_assert_eq!(normalize_verify_mac(&text).unwrap(), once);
    }

    /// Property: offset by zero names the same address
    #[test]
    fn prop_offset_zero_is_identity((_, text) in mac_text()) {
        let shifted = offset_mac(text.trim(), 0).unwrap();
        prop_assert_eq!(normalize_mac(&shifted), normalize_mac(&text));
    }

    /// Property: offsets compose additively while in range
    #[test]
    fn prop_offset_additive(
        value in mac_value(),
        a in -1_000_000i64..1_000_000,
        b in -1_000_000i64..1_000_000,
    ) {
        let max = MacAddress::MAX_VALUE as i128;
        let mid = value as i128 + a as i128;
        let end = mid + b as i128;
        prop_assume!((0..=max).contains(&mid) && (0..=max).contains(&end));

        let mac = canonical(value);
        let stepwise = offset_mac(&offset_mac(&mac, a).unwrap(), b).unwrap();
        let direct = offset_mac(&mac, a + b).unwrap();
        prop_assert_eq!(stepwise, direct);
    }

    /// Property: offsets leaving the 48-bit range are errors, never wraps
    #[test]
    fn prop_offset_out_of_range_rejected(value in mac_value(), delta in 1i64..1_000_000) {
        let mac = canonical(value);
        let up = value as i128 + delta as i128;
        let down = value as i128 - delta as i128;
        prop_assert_eq!(offset_mac(&mac, delta).is_ok(), up <= MacAddress::MAX_VALUE as i128);
        prop_assert_eq!(offset_mac(&mac, -delta).is_ok(), down >= 0);
    }

    /// Property: comparison agrees with the sign of the offset
    #[test]
    fn prop_compare_matches_offset(value in mac_value(), delta in -1_000_000i64..1_000_000) {
        let target = value as i128 + delta as i128;
        prop_assume!((0..=MacAddress::MAX_VALUE as i128).contains(&target));

        let mac = canonical(value);
        let shifted = offset_mac(&mac, delta).unwrap();
        prop_assert_eq!(compare_mac(&shifted, &mac).unwrap(), delta.cmp(&0));
    }

    /// Property: upper-case input stays upper-case through an offset
    #[test]
    fn prop_offset_preserves_upper_case(value in 0..MacAddress::MAX_VALUE) {
        let mac = canonical(value).to_ascii_uppercase();
        prop_assume!(mac.bytes().any(|b| b.is_ascii_alphabetic()));
        let shifted = offset_mac(&mac, 1).unwrap();
        prop_assert_eq!(shifted.to_ascii_uppercase(), shifted.clone());
        prop_assert_eq!(normalize_mac(&shifted), canonical(value + 1));
    }
}
