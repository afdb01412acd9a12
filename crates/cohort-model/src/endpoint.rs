//! Study endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mortality endpoint with its observation horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Death before the fifth birthday.
    U5,
    /// Death before the first birthday.
    U1,
}

impl Endpoint {
    pub const ALL: [Endpoint; 2] = [Endpoint::U5, Endpoint::U1];

    /// Horizon in months; a death counts as an event when the age is below it.
    pub const fn horizon_months(self) -> i64 {
        match self {
            Self::U5 => 60,
            Self::U1 => 12,
        }
    }

    /// Name of the derived event indicator column.
    pub const fn event_column(self) -> &'static str {
        match self {
            Self::U5 => "censored_u5",
            Self::U1 => "censored_u1",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::U5 => "under-5 mortality",
            Self::U1 => "under-1 mortality",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U5 => f.write_str("u5"),
            Self::U1 => f.write_str("u1"),
        }
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u5" => Ok(Self::U5),
            "u1" => Ok(Self::U1),
            other => Err(format!("unknown endpoint '{other}' (expected u5 or u1)")),
        }
    }
}
