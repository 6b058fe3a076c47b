//! Revision counter padding strategies
//!
//! A strategy is named by a descriptor string:
//!
//! | Descriptor           | Strategy                         | Counter 7 |
//! |----------------------|----------------------------------|-----------|
//! | `""` / `numerical`   | [`PaddingStrategy::Numerical`]   | `7`       |
//! | `alphabetical`       | `Alphabetical { width: 3 }`      | `007`     |
//! | `alphabetical:<n>`   | `Alphabetical { width: n }`      | padded    |
//!
//! `n` may not exceed [`MAX_ALPHABETICAL_WIDTH`].

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Zero-padding width used when `alphabetical` carries no width
pub const DEFAULT_ALPHABETICAL_WIDTH: usize = 3;

/// Widest zero padding a descriptor may request
pub const MAX_ALPHABETICAL_WIDTH: usize = 255;

/// How the revision counter is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingStrategy {
    /// Natural decimal form, no padding
    #[default]
    Numerical,
    /// Zero-padded to `width` digits so tags sort lexically
    Alphabetical { width: usize },
}

impl PaddingStrategy {
    /// Parse a strategy descriptor
    pub fn parse(descriptor: &str) -> Result<Self> {
        let descriptor = descriptor.trim();
        let (token, param) = match descriptor.split_once(':') {
            Some((token, param)) => (token, Some(param.trim())),
            None => (descriptor, None),
        };

        match (token, param) {
            ("" | "numerical", None) => Ok(Self::Numerical),
            ("alphabetical", None | Some("")) => Ok(Self::Alphabetical {
                width: DEFAULT_ALPHABETICAL_WIDTH,
            }),
            ("alphabetical", Some(width)) => width
                .parse::<usize>()
                .ok()
                .filter(|width| *width <= MAX_ALPHABETICAL_WIDTH)
                .map(|width| Self::Alphabetical { width })
                .ok_or_else(|| Error::invalid_strategy(descriptor)),
            _ => Err(Error::invalid_strategy(descriptor)),
        }
    }

    /// Render a revision counter
    pub fn pad(&self, counter: u64) -> String {
        match self {
            Self::Numerical => counter.to_string(),
            Self::Alphabetical { width } => format!("{:0width$}", counter, width = *width),
        }
    }
}

impl fmt::Display for PaddingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numerical => write!(f, "numerical"),
            Self::Alphabetical { width } => write!(f, "alphabetical:{}", width),
        }
    }
}

impl FromStr for PaddingStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for PaddingStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PaddingStrategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let descriptor = String::deserialize(deserializer)?;
        Self::parse(&descriptor).map_err(serde::de::Error::custom)
    }
}
