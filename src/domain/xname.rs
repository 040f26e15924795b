// Copyright (c) 2025 - Cowboy AI, Inc.
//! Structural hardware location identifiers ("xnames")
//!
//! An xname spells out where a component sits, one letter+number segment per
//! level of the hierarchy:
//!
//! ```text
//! x3000 c0 s14 b0 n1
//!   │    │   │   │  └─ node
//!   │    │   │   └──── node BMC
//!   │    │   └──────── compute module (slot)
//!   │    └──────────── chassis
//!   └───────────────── cabinet
//! ```
//!
//! Only the shapes the inventory tracks are recognized. Parsing normalizes
//! case and leading zeros, so `X0C0S01B0` and `x0c0s1b0` are the same id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Xname validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum XnameError {
    #[error("Malformed xname: {0}")]
    Malformed(String),

    #[error("Unrecognized component type for xname: {0}")]
    UnknownType(String),
}

/// Component class encoded by an xname
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HmsType {
    Cabinet,
    CabinetBMC,
    CabinetPDUController,
    CabinetPDU,
    CabinetPDUOutlet,
    Chassis,
    ChassisBMC,
    ComputeModule,
    NodeBMC,
    Node,
    Memory,
    Processor,
    NodeEnclosure,
    RouterModule,
    RouterBMC,
    HSNBoard,
}

impl HmsType {
    /// Classify by the sequence of segment letters, e.g. `"xcsb"`
    fn from_shape(shape: &str) -> Option<Self> {
        let hms_type = match shape {
            "x" => Self::Cabinet,
            "xb" => Self::CabinetBMC,
            "xm" => Self::CabinetPDUController,
            "xmp" => Self::CabinetPDU,
            "xmpj" => Self::CabinetPDUOutlet,
            "xc" => Self::Chassis,
            "xcb" => Self::ChassisBMC,
            "xcs" => Self::ComputeModule,
            "xcsb" => Self::NodeBMC,
            "xcsbn" => Self::Node,
            "xcsbnd" => Self::Memory,
            "xcsbnp" => Self::Processor,
            "xcse" => Self::NodeEnclosure,
            "xcr" => Self::RouterModule,
            "xcrb" => Self::RouterBMC,
            "xcre" => Self::HSNBoard,
            _ => return None,
        };
        Some(hms_type)
    }

    /// Whether this component hosts a Redfish management endpoint
    pub fn is_controller(&self) -> bool {
        matches!(
            self,
            Self::CabinetBMC
                | Self::CabinetPDUController
                | Self::ChassisBMC
                | Self::NodeBMC
                | Self::RouterBMC
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cabinet => "Cabinet",
            Self::CabinetBMC => "CabinetBMC",
            Self::CabinetPDUController => "CabinetPDUController",
            Self::CabinetPDU => "CabinetPDU",
            Self::CabinetPDUOutlet => "CabinetPDUOutlet",
            Self::Chassis => "Chassis",
            Self::ChassisBMC => "ChassisBMC",
            Self::ComputeModule => "ComputeModule",
            Self::NodeBMC => "NodeBMC",
            Self::Node => "Node",
            Self::Memory => "Memory",
            Self::Processor => "Processor",
            Self::NodeEnclosure => "NodeEnclosure",
            Self::RouterModule => "RouterModule",
            Self::RouterBMC => "RouterBMC",
            Self::HSNBoard => "HSNBoard",
        }
    }
}

impl fmt::Display for HmsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed, normalized xname
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Xname {
    id: String,
    hms_type: HmsType,
}

impl Xname {
    pub fn parse(xname: &str) -> Result<Self, XnameError> {
        let segments = segments(xname).ok_or_else(|| XnameError::Malformed(xname.to_string()))?;
        let shape: String = segments.iter().map(|(letter, _)| *letter).collect();
        let hms_type =
            HmsType::from_shape(&shape).ok_or_else(|| XnameError::UnknownType(xname.to_string()))?;
        Ok(Self {
            id: render(&segments),
            hms_type,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn hms_type(&self) -> HmsType {
        self.hms_type
    }

    pub fn is_controller(&self) -> bool {
        self.hms_type.is_controller()
    }

    /// The enclosing component, `None` for a cabinet
    pub fn parent(&self) -> Option<Self> {
        let mut segments = segments(&self.id)?;
        segments.pop();
        if segments.is_empty() {
            return None;
        }
        Self::parse(&render(&segments)).ok()
    }
}

/// Split into `(letter, number)` pairs, lower-casing letters
fn segments(xname: &str) -> Option<Vec<(char, u32)>> {
    let lowered = xname.trim().to_ascii_lowercase();
    let mut out = Vec::new();
    let mut chars = lowered.chars().peekable();
    while let Some(letter) = chars.next() {
        if !letter.is_ascii_lowercase() {
            return None;
        }
        let mut digits = String::new();
        while let Some(d) = chars.next_if(char::is_ascii_digit) {
            digits.push(d);
        }
        out.push((letter, digits.parse().ok()?));
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn render(segments: &[(char, u32)]) -> String {
    segments
        .iter()
        .map(|(letter, number)| format!("{}{}", letter, number))
        .collect()
}

/// Normalized form of `xname` if it parses, otherwise `xname` trimmed
pub fn normalize_xname(xname: &str) -> String {
    Xname::parse(xname)
        .map(|x| x.id)
        .unwrap_or_else(|_| xname.trim().to_string())
}

impl fmt::Display for Xname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl FromStr for Xname {
    type Err = XnameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Xname {
    type Error = XnameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Xname> for String {
    fn from(xname: Xname) -> Self {
        xname.id
    }
}
