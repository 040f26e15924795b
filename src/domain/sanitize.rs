// Copyright (c) 2025 - Cowboy AI, Inc.
//! Field sanitizers shared by the endpoint resolver and FRU id builder

/// Trim an optional field, treating blank input as absent
pub fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|f| !f.is_empty())
}

/// Keep only ASCII alphanumerics; `None` if nothing survives
///
/// A field of nothing but dots (`"......"`), a placeholder some BMCs report
/// for unprogrammed FRU data, sanitizes to `None`.
pub fn alphanumeric(field: &str) -> Option<String> {
    let kept: String = field.chars().filter(char::is_ascii_alphanumeric).collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}
