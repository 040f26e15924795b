// Copyright (c) 2025 - Cowboy AI, Inc.
//! Processor architecture of a discovered system, inferred from its
//! manufacturer, model, and board description.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction-set family of a system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemArch {
    #[serde(rename = "X86")]
    X86,
    #[serde(rename = "ARM")]
    Arm,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl SystemArch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "X86",
            Self::Arm => "ARM",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for SystemArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const CRAY_X86_MODELS: &[&str] = &["ex235a", "ex420", "ex425", "ex255a", "ex4252"];
const CRAY_ARM_MODELS: &[&str] = &["ex254n"];
const CRAY_X86_BOARDS: &[&str] = &["bardpeaknc", "cnc", "wnc", "parrypeaknc", "antero"];
const CRAY_ARM_BOARDS: &[&str] = &["blancapeaknc"];
const FOXCONN_ARM_MODELS: &[&str] = &["hpe cray supercomputing xd224"];

/// Classify a system; the model wins over the description when both match
pub fn system_arch(manufacturer: &str, model: &str, description: &str) -> SystemArch {
    let manufacturer = manufacturer.trim().to_ascii_lowercase();
    let model = model.trim().to_ascii_lowercase();
    let description = description.trim().to_ascii_lowercase();
    let listed = |table: &[&str], value: &str| table.contains(&value);

    match manufacturer.as_str() {
        "cray" | "hpe" => {
            if listed(CRAY_X86_MODELS, &model) {
                SystemArch::X86
            } else if listed(CRAY_ARM_MODELS, &model) {
                SystemArch::Arm
            } else if listed(CRAY_X86_BOARDS, &description) {
                SystemArch::X86
            } else if listed(CRAY_ARM_BOARDS, &description) {
                SystemArch::Arm
            } else {
                SystemArch::Unknown
            }
        }
        "foxconn" if listed(FOXCONN_ARM_MODELS, &model) => SystemArch::Arm,
        _ => SystemArch::Unknown,
    }
}
