//! StepSettings - global visibility flags for backbone steps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::BackboneStep;

/// Immutable visibility flags keyed by `BackboneStep::setting_key`.
///
/// A key missing from the map means the step is enabled. Loaded once from
/// configuration and handed to whoever builds step lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepSettings(BTreeMap<String, bool>);

impl StepSettings {
    pub fn new(flags: BTreeMap<String, bool>) -> Self {
        Self(flags)
    }

    /// Returns a copy with one flag set.
    pub fn with_flag(mut self, key: impl Into<String>, enabled: bool) -> Self {
        self.0.insert(key.into(), enabled);
        self
    }

    /// Whether the step with this key should be shown.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(true)
    }

    /// Keys that do not name a backbone step.
    pub fn unknown_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|k| BackboneStep::from_setting_key(k).is_none())
            .collect()
    }
}

impl From<BTreeMap<String, bool>> for StepSettings {
    fn from(flags: BTreeMap<String, bool>) -> Self {
        Self(flags)
    }
}
