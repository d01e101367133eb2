//! JourneyPatch - the set of journey fields one write touches.

use crate::domain::foundation::{Timestamp, UseCaseId};

use super::{CustomSteps, Journey, Meeting, Note};

/// Partial update of a journey record. `None` leaves a field untouched.
///
/// Field values overwrite; nothing is merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JourneyPatch {
    pub research_complete: Option<bool>,
    pub targeting_domains: Option<Vec<String>>,
    pub targeting_use_cases: Option<Vec<UseCaseId>>,
    pub deep_dive_domains: Option<Vec<String>>,
    pub deep_dive_use_cases: Option<Vec<UseCaseId>>,
    pub kickoff_presentation_url: Option<Option<String>>,
    pub kickoff_notes: Option<Vec<Note>>,
    pub high_level_meetings: Option<Vec<Meeting>>,
    pub deep_dive_meetings: Option<Vec<Meeting>>,
    pub custom_steps: Option<CustomSteps>,
    pub updated_at: Option<Timestamp>,
}

fn changed<T: PartialEq + Clone>(before: &T, after: &T) -> Option<T> {
    (before != after).then(|| after.clone())
}

fn changed_selection<T: PartialEq + Clone>(before: &Option<T>, after: &Option<T>) -> Option<T> {
    match after {
        Some(value) if before.as_ref() != Some(value) => Some(value.clone()),
        _ => None,
    }
}

impl JourneyPatch {
    /// Collects every field that differs between two versions of a journey.
    ///
    /// A selection going back to "no value" cannot be expressed and is
    /// ignored; journeys never clear a recorded selection.
    pub fn diff(before: &Journey, after: &Journey) -> Self {
        Self {
            research_complete: changed(&before.research_complete, &after.research_complete),
            targeting_domains: changed_selection(&before.targeting_domains, &after.targeting_domains),
            targeting_use_cases: changed_selection(
                &before.targeting_use_cases,
                &after.targeting_use_cases,
            ),
            deep_dive_domains: changed_selection(&before.deep_dive_domains, &after.deep_dive_domains),
            deep_dive_use_cases: changed_selection(
                &before.deep_dive_use_cases,
                &after.deep_dive_use_cases,
            ),
            kickoff_presentation_url: changed(
                &before.kickoff_presentation_url,
                &after.kickoff_presentation_url,
            ),
            kickoff_notes: changed(&before.kickoff_notes, &after.kickoff_notes),
            high_level_meetings: changed(&before.high_level_meetings, &after.high_level_meetings),
            deep_dive_meetings: changed(&before.deep_dive_meetings, &after.deep_dive_meetings),
            custom_steps: changed(&before.custom_steps, &after.custom_steps),
            updated_at: changed(&before.updated_at, &after.updated_at),
        }
    }

    /// True when the patch carries no field.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Names of the carried fields, for logging.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut push = |present: bool, name: &'static str| {
            if present {
                names.push(name);
            }
        };
        push(self.research_complete.is_some(), "researchComplete");
        push(self.targeting_domains.is_some(), "targetingSelectedDomains");
        push(self.targeting_use_cases.is_some(), "targetingSelectedUseCases");
        push(self.deep_dive_domains.is_some(), "deepDiveSelectedDomains");
        push(self.deep_dive_use_cases.is_some(), "deepDiveSelectedUseCases");
        push(self.kickoff_presentation_url.is_some(), "kickoffPresentationUrl");
        push(self.kickoff_notes.is_some(), "kickoffMeetingNotes");
        push(self.high_level_meetings.is_some(), "functionalHighLevelMeetings");
        push(self.deep_dive_meetings.is_some(), "functionalDeepDiveMeetings");
        push(self.custom_steps.is_some(), "customSteps");
        push(self.updated_at.is_some(), "updatedAt");
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::journey::Organization;

    fn journey() -> Journey {
        let org = Organization::new("Acme", UserId::new("op").unwrap()).unwrap();
        Journey::new(&org, Timestamp::from_unix_secs(1_700_000_000))
    }

    #[test]
    fn identical_journeys_diff_to_empty_patch() {
        let j = journey();
        assert!(JourneyPatch::diff(&j, &j.clone()).is_empty());
    }

    #[test]
    fn diff_carries_only_changed_fields() {
        let before = journey();
        let mut after = before.clone();
        after.research_complete = true;
        after.kickoff_presentation_url = Some("https://slides".to_string());

        let patch = JourneyPatch::diff(&before, &after);

        assert_eq!(patch.research_complete, Some(true));
        assert_eq!(patch.kickoff_presentation_url, Some(Some("https://slides".to_string())));
        assert!(patch.kickoff_notes.is_none());
        assert_eq!(patch.field_names(), vec!["researchComplete", "kickoffPresentationUrl"]);
    }

    #[test]
    fn applying_diff_reproduces_target() {
        let before = journey();
        let mut after = before.clone();
        after.deep_dive_domains = Some(vec!["Finance".to_string()]);
        after.updated_at = Timestamp::from_unix_secs(1_700_000_100);

        let mut replay = before.clone();
        replay.apply_patch(&JourneyPatch::diff(&before, &after));

        assert_eq!(replay, after);
    }
}
