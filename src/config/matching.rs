//! Matching query configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::matching::ScorerConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// Overrides the score normalization reference variance
    pub ceiling_variance: Option<f64>,

    /// Results returned when the caller gives no limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Largest limit a caller may request
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl MatchingConfig {
    /// Scorer calibration, falling back to the built-in default.
    pub fn scorer_config(&self) -> Result<ScorerConfig, ValidationError> {
        match self.ceiling_variance {
            Some(v) => {
                ScorerConfig::with_ceiling_variance(v).map_err(|_| ValidationError::InvalidCeiling)
            }
            None => Ok(ScorerConfig::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.scorer_config()?;
        if self.max_limit == 0 {
            return Err(ValidationError::InvalidLimit);
        }
        if self.default_limit == 0 || self.default_limit > self.max_limit {
            return Err(ValidationError::InvalidLimit);
        }
        Ok(())
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            ceiling_variance: None,
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> usize {
    20
}

fn default_max_limit() -> usize {
    100
}
