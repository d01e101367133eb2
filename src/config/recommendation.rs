//! Recommendation engine configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::recommendation::RecommendationLimits;

/// Caps applied when ranking candidates
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct RecommendationConfig {
    /// Candidates considered per prioritized domain
    #[serde(default = "default_per_domain_cap")]
    pub per_domain_cap: usize,

    /// Maximum recommendations returned
    #[serde(default = "default_result_cap")]
    pub result_cap: usize,
}

impl RecommendationConfig {
    pub fn limits(&self) -> RecommendationLimits {
        RecommendationLimits {
            per_domain_cap: self.per_domain_cap,
            result_cap: self.result_cap,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.per_domain_cap == 0 {
            return Err(ValidationError::ZeroCap("per_domain_cap"));
        }
        if self.result_cap == 0 {
            return Err(ValidationError::ZeroCap("result_cap"));
        }
        Ok(())
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            per_domain_cap: default_per_domain_cap(),
            result_cap: default_result_cap(),
        }
    }
}

fn default_per_domain_cap() -> usize {
    RecommendationLimits::default().per_domain_cap
}

fn default_result_cap() -> usize {
    RecommendationLimits::default().result_cap
}
