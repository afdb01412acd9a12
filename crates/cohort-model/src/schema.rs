//! Variable schema entries.
//!
//! The schema table lists every variable of the survey extract together with
//! its analysis role and whether a recoded copy (`<name>_recoded`) should be
//! used in place of the raw column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Suffix appended to a variable name when the schema marks it as recoded.
pub const RECODED_SUFFIX: &str = "_recoded";

/// Analysis role of a schema variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    FeatureNumeric,
    FeatureCategorical,
    Response,
    /// Any other role (identifiers, weights, ignored variables).
    /// Carried through parsing but never selected.
    Other(String),
}

impl VariableKind {
    /// Returns true for roles that participate in column selection.
    pub fn is_selected(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Returns true for covariate roles.
    pub fn is_feature(&self) -> bool {
        matches!(self, Self::FeatureNumeric | Self::FeatureCategorical)
    }

    /// Parses a schema `Type` cell; unknown roles become [`VariableKind::Other`].
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "feature_numeric" => Self::FeatureNumeric,
            "feature_categorical" => Self::FeatureCategorical,
            "response" => Self::Response,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::FeatureNumeric => "feature_numeric",
            Self::FeatureCategorical => "feature_categorical",
            Self::Response => "response",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl FromStr for VariableKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the variable schema table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub name: String,
    pub kind: VariableKind,
    pub recoded: bool,
}

impl SchemaEntry {
    pub fn new(name: impl Into<String>, kind: VariableKind, recoded: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            recoded,
        }
    }

    pub fn feature_numeric(name: impl Into<String>) -> Self {
        Self::new(name, VariableKind::FeatureNumeric, false)
    }

    pub fn feature_categorical(name: impl Into<String>) -> Self {
        Self::new(name, VariableKind::FeatureCategorical, false)
    }

    pub fn response(name: impl Into<String>) -> Self {
        Self::new(name, VariableKind::Response, false)
    }

    /// Mark this entry as recoded.
    #[must_use]
    pub fn recoded(mut self) -> Self {
        self.recoded = true;
        self
    }

    /// The column name the analysis reads for this variable.
    pub fn effective_name(&self) -> String {
        if self.recoded {
            format!("{}{RECODED_SUFFIX}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Effective column name for selected roles, `None` for other roles.
    pub fn selected_column(&self) -> Option<String> {
        self.kind.is_selected().then(|| self.effective_name())
    }
}
