// Copyright (c) 2025 - Cowboy AI, Inc.
//! Natural ordering of resource identifiers
//!
//! Identifiers are compared run by run, where a run is a maximal stretch of
//! ASCII digits or of anything else. Digit runs compare by numeric value, so
//! `OUTLET2` sorts before `OUTLET11`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Opaque identifier of a discovered resource, ordered naturally
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for ResourceId {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_resource_ids(&self.0, &other.0)
    }
}

impl PartialOrd for ResourceId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Split into maximal digit and non-digit runs
fn runs(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(run)
    })
}

fn is_digit_run(run: &str) -> bool {
    run.starts_with(|c: char| c.is_ascii_digit())
}

/// Compare digit runs by value without parsing, so length is unbounded
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Total natural order over resource identifiers
///
/// Distinct strings never compare equal: when every run ties (for example
/// `x01` against `x1`) the plain string order decides.
pub fn compare_resource_ids(a: &str, b: &str) -> Ordering {
    let mut left = runs(a);
    let mut right = runs(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = if is_digit_run(l) && is_digit_run(r) {
                    compare_numeric(l, r)
                } else {
                    l.cmp(r)
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Sort identifiers in place in natural order
pub fn sort_resource_ids<S: AsRef<str>>(ids: &mut [S]) {
    ids.sort_by(|a, b| compare_resource_ids(a.as_ref(), b.as_ref()));
}
