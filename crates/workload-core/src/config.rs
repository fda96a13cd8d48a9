//! Engine configuration, passed to [`crate::assessment::Assessment::run`].

use serde::{Deserialize, Serialize};

use crate::{Result, weight::ScoreBands};

/// Tunables for an assessment. Every field has a default, so an empty
/// `[assessment]` table (or none at all) is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
  /// Score breakpoints used to classify the day.
  pub bands: ScoreBands,
}

impl AssessmentConfig {
  pub fn validate(&self) -> Result<()> { self.bands.validate() }
}
