//! Diagnostic output of a cohort build.
//!
//! These types are observational: they describe what the pipeline saw and
//! dropped, and play no part in the transformation itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;

/// Pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Input,
    ColumnSelection,
    QualityFlagFilter,
    RawAgeRemoval,
    UnknownAgeFilter,
    VitalStatus,
    AgeDerivation,
    SourceColumnRemoval,
    Censoring,
    FinalProjection,
}

impl PipelineStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::ColumnSelection => "column selection",
            Self::QualityFlagFilter => "quality flag filter",
            Self::RawAgeRemoval => "raw age removal",
            Self::UnknownAgeFilter => "unknown age filter",
            Self::VitalStatus => "vital status",
            Self::AgeDerivation => "age derivation",
            Self::SourceColumnRemoval => "source column removal",
            Self::Censoring => "censoring",
            Self::FinalProjection => "final projection",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Table shape after a pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCount {
    pub stage: PipelineStage,
    pub rows: usize,
    pub columns: usize,
}

/// Number of records carrying one death flag value (`None` = missing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagCount {
    pub value: Option<i64>,
    pub count: usize,
}

/// Frequency table of the death flag over the raw input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagCrosstab {
    pub column: String,
    /// Missing first, then ascending flag values.
    pub counts: Vec<FlagCount>,
}

impl FlagCrosstab {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|entry| entry.count).sum()
    }

    /// Records that pass the quality-flag filter (missing or zero).
    pub fn retained(&self) -> usize {
        self.counts
            .iter()
            .filter(|entry| matches!(entry.value, None | Some(0)))
            .map(|entry| entry.count)
            .sum()
    }

    pub fn dropped(&self) -> usize {
        self.total() - self.retained()
    }
}

/// Distribution summary of one age column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeSummary {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Event counts for one endpoint over the finished cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSummary {
    pub endpoint: Endpoint,
    pub subjects: usize,
    pub events: usize,
    /// Subjects without an event inside the horizon (right-censored).
    pub censored: usize,
}

impl EndpointSummary {
    pub fn event_rate(&self) -> Option<f64> {
        (self.subjects > 0).then(|| self.events as f64 / self.subjects as f64)
    }
}

/// Everything a build observed, for human review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub stages: Vec<StageCount>,
    pub flags: FlagCrosstab,
    pub ages: Vec<AgeSummary>,
    pub endpoints: Vec<EndpointSummary>,
    /// SHA-256 of the cohort's canonical CSV form.
    pub digest: String,
}

impl BuildReport {
    pub fn rows_at(&self, stage: PipelineStage) -> Option<usize> {
        self.stages
            .iter()
            .find(|count| count.stage == stage)
            .map(|count| count.rows)
    }
}
