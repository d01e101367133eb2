//! JourneyView - derived, read-only projection of a journey.

use serde::Serialize;

use crate::domain::foundation::{JourneyId, UseCaseId};
use crate::domain::steps::{build_steps, StepProgress, StepSettings, StepView};

use super::{CustomStep, Journey, Meeting, Note, Organization, SelectionPhase};

/// Effective selection of one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub domains: Vec<String>,
    pub use_cases: Vec<UseCaseId>,
    /// True when the phase has no recorded value and shows the
    /// organization defaults.
    pub from_defaults: bool,
}

/// Everything the operator sees for the active journey.
///
/// Always rebuilt from scratch; nothing here outlives a switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyView {
    pub journey_id: JourneyId,
    pub research_complete: bool,
    pub has_research_content: bool,
    pub targeting: SelectionView,
    pub deep_dive: SelectionView,
    pub kickoff_presentation_url: Option<String>,
    pub kickoff_notes: Vec<Note>,
    pub high_level_meetings: Vec<Meeting>,
    pub deep_dive_meetings: Vec<Meeting>,
    pub custom_steps: Vec<CustomStep>,
    pub steps: Vec<StepView>,
}

impl JourneyView {
    pub fn project(journey: &Journey, organization: &Organization, settings: &StepSettings) -> Self {
        let progress = StepProgress {
            research_complete: journey.research_complete,
            has_research_content: organization.has_research_content(),
            has_organization: true,
        };

        Self {
            journey_id: journey.id,
            research_complete: journey.research_complete,
            has_research_content: organization.has_research_content(),
            targeting: Self::selection_view(journey, organization, SelectionPhase::Targeting),
            deep_dive: Self::selection_view(journey, organization, SelectionPhase::DeepDive),
            kickoff_presentation_url: journey.kickoff_presentation_url.clone(),
            kickoff_notes: journey.kickoff_notes.clone(),
            high_level_meetings: journey.high_level_meetings.clone(),
            deep_dive_meetings: journey.deep_dive_meetings.clone(),
            custom_steps: journey.custom_steps.iter().cloned().collect(),
            steps: build_steps(progress, settings, journey.custom_steps.iter()),
        }
    }

    pub fn selection(&self, phase: SelectionPhase) -> &SelectionView {
        match phase {
            SelectionPhase::Targeting => &self.targeting,
            SelectionPhase::DeepDive => &self.deep_dive,
        }
    }

    fn selection_view(journey: &Journey, organization: &Organization, phase: SelectionPhase) -> SelectionView {
        SelectionView {
            domains: journey.effective_domains(phase, organization),
            use_cases: journey.effective_use_cases(phase, organization),
            from_defaults: !journey.has_recorded_selection(phase),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};

    fn org() -> Organization {
        Organization::new("Acme", UserId::new("op").unwrap())
            .unwrap()
            .with_default_selection(vec!["Finance".to_string()], vec![])
    }

    #[test]
    fn projection_falls_back_to_defaults_per_phase() {
        let org = org();
        let mut journey = Journey::new(&org, Timestamp::now());
        journey.targeting_domains = Some(vec!["Sales".to_string()]);

        let view = JourneyView::project(&journey, &org, &StepSettings::default());

        assert_eq!(view.targeting.domains, vec!["Sales".to_string()]);
        assert!(!view.targeting.from_defaults);
        assert_eq!(view.deep_dive.domains, vec!["Finance".to_string()]);
        assert!(view.deep_dive.from_defaults);
    }

    #[test]
    fn projection_locks_steps_until_research_progress() {
        let org = org();
        let mut journey = Journey::new(&org, Timestamp::now());
        let locked = JourneyView::project(&journey, &org, &StepSettings::default());
        assert!(locked.steps.iter().skip(1).all(|s| s.locked));

        journey.mark_research_complete();
        let unlocked = JourneyView::project(&journey, &org, &StepSettings::default());
        assert!(unlocked.steps.iter().all(|s| !s.locked));
    }
}
