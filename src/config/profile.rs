//! Profile write configuration

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    /// Reload-and-reapply attempts after a version conflict
    #[serde(default = "default_max_write_retries")]
    pub max_write_retries: u32,
}

impl ProfileConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=10).contains(&self.max_write_retries) {
            return Err(ValidationError::InvalidRetryBudget);
        }
        Ok(())
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            max_write_retries: default_max_write_retries(),
        }
    }
}

fn default_max_write_retries() -> u32 {
    3
}
