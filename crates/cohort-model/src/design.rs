//! Survival model design handed to an external estimator.

use serde::{Deserialize, Serialize};

/// Time, event and covariate columns for a Kaplan-Meier or Cox fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurvivalDesign {
    /// Non-negative time-to-event column.
    pub time: String,
    /// Binary event indicator column.
    pub event: String,
    /// Covariates in model order.
    pub covariates: Vec<String>,
}

impl SurvivalDesign {
    pub fn new(time: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            event: event.into(),
            covariates: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_covariates<I, S>(mut self, covariates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.covariates = covariates.into_iter().map(Into::into).collect();
        self
    }

    /// Renders the model in formula notation, e.g. `age ~ v025 + v106`.
    ///
    /// An empty covariate set renders as the intercept-only model `~ 1`,
    /// which is the unstratified Kaplan-Meier estimate.
    pub fn formula(&self) -> String {
        if self.covariates.is_empty() {
            format!("{} ~ 1", self.time)
        } else {
            format!("{} ~ {}", self.time, self.covariates.join(" + "))
        }
    }

    /// All columns the estimator needs, time and event first.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.covariates.len() + 2);
        columns.push(self.time.clone());
        columns.push(self.event.clone());
        columns.extend(self.covariates.iter().cloned());
        columns
    }
}
