//! StepRegistry - builds the ordered, filtered, lock-annotated step list.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CustomStepId;
use crate::domain::journey::CustomStep;

use super::{BackboneStep, StepSettings};

/// Journey facts that drive locking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepProgress {
    pub research_complete: bool,
    pub has_research_content: bool,
    /// Custom steps need an organization to attach their outputs to.
    pub has_organization: bool,
}

impl StepProgress {
    /// Backbone steps past research open once research is complete or has
    /// produced content.
    pub fn backbone_unlocked(&self) -> bool {
        self.research_complete || self.has_research_content
    }
}

/// Identifies a step in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum StepKey {
    Backbone(BackboneStep),
    Custom(CustomStepId),
}

impl StepKey {
    pub fn is_research(&self) -> bool {
        matches!(self, StepKey::Backbone(step) if step.is_research())
    }
}

impl Default for StepKey {
    fn default() -> Self {
        StepKey::Backbone(BackboneStep::Research)
    }
}

/// One entry of the rendered step list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub key: StepKey,
    pub title: String,
    pub locked: bool,
}

/// Builds the step list: visible backbone steps in order, then every custom
/// step in insertion order.
pub fn build_steps<'a>(
    progress: StepProgress,
    settings: &StepSettings,
    custom_steps: impl IntoIterator<Item = &'a CustomStep>,
) -> Vec<StepView> {
    let backbone = BackboneStep::all()
        .iter()
        .filter(|step| step.is_research() || settings.is_enabled(step.setting_key()))
        .map(|step| StepView {
            key: StepKey::Backbone(*step),
            title: step.display_name().to_string(),
            locked: !step.is_research() && !progress.backbone_unlocked(),
        });

    let custom = custom_steps.into_iter().map(|step| StepView {
        key: StepKey::Custom(step.id),
        title: step.title.clone(),
        locked: !progress.has_organization,
    });

    backbone.chain(custom).collect()
}

/// Returns the step that becomes current when `requested` is chosen.
///
/// Locked or unlisted steps leave `current` in place; research is always
/// selectable.
pub fn select(steps: &[StepView], current: StepKey, requested: StepKey) -> StepKey {
    match steps.iter().find(|view| view.key == requested) {
        Some(view) if !view.locked || view.key.is_research() => requested,
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::journey::{CustomStepDraft, OutputType};
    use crate::domain::foundation::Timestamp;

    fn custom(title: &str) -> CustomStep {
        CustomStep::from_draft(
            CustomStepDraft::new(title, OutputType::Chat),
            Timestamp::now(),
        )
        .unwrap()
    }

    fn locked_progress() -> StepProgress {
        StepProgress {
            research_complete: false,
            has_research_content: false,
            has_organization: true,
        }
    }

    #[test]
    fn default_settings_show_all_nine_backbone_steps() {
        let steps = build_steps(locked_progress(), &StepSettings::default(), []);
        assert_eq!(steps.len(), 9);
        assert_eq!(steps[0].key, StepKey::Backbone(BackboneStep::Research));
    }

    #[test]
    fn all_non_research_steps_locked_until_research_progress() {
        let steps = build_steps(locked_progress(), &StepSettings::default(), []);

        for view in &steps {
            assert_eq!(view.locked, !view.key.is_research(), "{}", view.title);
        }
    }

    #[test]
    fn research_content_alone_unlocks_backbone() {
        let progress = StepProgress {
            has_research_content: true,
            ..locked_progress()
        };
        let steps = build_steps(progress, &StepSettings::default(), []);
        assert!(steps.iter().all(|s| !s.locked));
    }

    #[test]
    fn research_complete_alone_unlocks_backbone() {
        let progress = StepProgress {
            research_complete: true,
            ..locked_progress()
        };
        let steps = build_steps(progress, &StepSettings::default(), []);
        assert!(steps.iter().all(|s| !s.locked));
    }

    #[test]
    fn disabled_steps_are_hidden_but_research_never_is() {
        let settings = StepSettings::default()
            .with_flag("research", false)
            .with_flag("integration_design", false);
        let steps = build_steps(locked_progress(), &settings, []);

        assert_eq!(steps.len(), 8);
        assert!(steps.iter().any(|s| s.key.is_research()));
        assert!(!steps
            .iter()
            .any(|s| s.key == StepKey::Backbone(BackboneStep::IntegrationDesign)));
    }

    #[test]
    fn custom_steps_follow_backbone_in_insertion_order() {
        let first = custom("Risk Review");
        let second = custom("Vendor Scan");
        let steps = build_steps(locked_progress(), &StepSettings::default(), [&first, &second]);

        assert_eq!(steps.len(), 11);
        assert_eq!(steps[9].key, StepKey::Custom(first.id));
        assert_eq!(steps[10].title, "Vendor Scan");
        assert!(!steps[9].locked);
    }

    #[test]
    fn custom_steps_lock_without_organization() {
        let step = custom("Risk Review");
        let progress = StepProgress {
            has_organization: false,
            research_complete: true,
            ..Default::default()
        };
        let steps = build_steps(progress, &StepSettings::default(), [&step]);
        assert!(steps.last().unwrap().locked);
    }

    #[test]
    fn selecting_locked_step_is_a_noop() {
        let steps = build_steps(locked_progress(), &StepSettings::default(), []);
        let current = StepKey::default();

        let next = select(&steps, current, StepKey::Backbone(BackboneStep::Kickoff));
        assert_eq!(next, current);
    }

    #[test]
    fn selecting_unlocked_step_moves() {
        let progress = StepProgress {
            research_complete: true,
            ..locked_progress()
        };
        let steps = build_steps(progress, &StepSettings::default(), []);
        let target = StepKey::Backbone(BackboneStep::Kickoff);

        assert_eq!(select(&steps, StepKey::default(), target), target);
        assert_eq!(select(&steps, target, StepKey::default()), StepKey::default());
    }

    #[test]
    fn selecting_hidden_step_is_a_noop() {
        let settings = StepSettings::default().with_flag("kickoff", false);
        let progress = StepProgress {
            research_complete: true,
            ..locked_progress()
        };
        let steps = build_steps(progress, &settings, []);

        let next = select(&steps, StepKey::default(), StepKey::Backbone(BackboneStep::Kickoff));
        assert_eq!(next, StepKey::default());
    }
}
