//! Journey aggregate - one pass of an organization through the backbone.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::CandidatePool;
use crate::domain::foundation::{
    CustomStepId, DomainError, ErrorCode, JourneyId, MeetingId, NoteId, OrganizationId, Timestamp,
    UseCaseId, ValidationError,
};

use super::{
    CustomStep, CustomSteps, FunctionalStage, JourneyPatch, Meeting, Note, Organization,
    SelectionPhase,
};

/// Persisted journey record.
///
/// Payload keys are fixed; only values change. Selection payloads are
/// `None` until the phase records a value, and read through the
/// organization defaults until then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub id: JourneyId,
    pub organization_id: OrganizationId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub research_complete: bool,
    #[serde(default, rename = "targetingSelectedDomains")]
    pub targeting_domains: Option<Vec<String>>,
    #[serde(default, rename = "targetingSelectedUseCases")]
    pub targeting_use_cases: Option<Vec<UseCaseId>>,
    #[serde(default, rename = "deepDiveSelectedDomains")]
    pub deep_dive_domains: Option<Vec<String>>,
    #[serde(default, rename = "deepDiveSelectedUseCases")]
    pub deep_dive_use_cases: Option<Vec<UseCaseId>>,
    #[serde(default)]
    pub kickoff_presentation_url: Option<String>,
    #[serde(default, rename = "kickoffMeetingNotes")]
    pub kickoff_notes: Vec<Note>,
    #[serde(default, rename = "functionalHighLevelMeetings")]
    pub high_level_meetings: Vec<Meeting>,
    #[serde(default, rename = "functionalDeepDiveMeetings")]
    pub deep_dive_meetings: Vec<Meeting>,
    #[serde(default)]
    pub custom_steps: CustomSteps,
}

impl Journey {
    /// Starts a journey with its targeting selection seeded from the
    /// organization defaults.
    pub fn new(organization: &Organization, now: Timestamp) -> Self {
        Self {
            id: JourneyId::new(),
            organization_id: organization.id,
            created_at: now,
            updated_at: now,
            research_complete: false,
            targeting_domains: Some(organization.selected_domains.clone()),
            targeting_use_cases: Some(organization.selected_use_cases.clone()),
            deep_dive_domains: None,
            deep_dive_use_cases: None,
            kickoff_presentation_url: None,
            kickoff_notes: Vec::new(),
            high_level_meetings: Vec::new(),
            deep_dive_meetings: Vec::new(),
            custom_steps: CustomSteps::default(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Selections
    // ════════════════════════════════════════════════════════════════════════════

    /// Selected domains of a phase, falling back to the organization defaults.
    pub fn effective_domains(&self, phase: SelectionPhase, organization: &Organization) -> Vec<String> {
        let stored = match phase {
            SelectionPhase::Targeting => &self.targeting_domains,
            SelectionPhase::DeepDive => &self.deep_dive_domains,
        };
        stored
            .clone()
            .unwrap_or_else(|| organization.selected_domains.clone())
    }

    /// Selected use-cases of a phase, falling back to the organization defaults.
    pub fn effective_use_cases(
        &self,
        phase: SelectionPhase,
        organization: &Organization,
    ) -> Vec<UseCaseId> {
        let stored = match phase {
            SelectionPhase::Targeting => &self.targeting_use_cases,
            SelectionPhase::DeepDive => &self.deep_dive_use_cases,
        };
        stored
            .clone()
            .unwrap_or_else(|| organization.selected_use_cases.clone())
    }

    /// Whether the phase has recorded its own selection.
    pub fn has_recorded_selection(&self, phase: SelectionPhase) -> bool {
        match phase {
            SelectionPhase::Targeting => self.targeting_domains.is_some() || self.targeting_use_cases.is_some(),
            SelectionPhase::DeepDive => self.deep_dive_domains.is_some() || self.deep_dive_use_cases.is_some(),
        }
    }

    fn set_selection(&mut self, phase: SelectionPhase, domains: Vec<String>, use_cases: Vec<UseCaseId>) {
        match phase {
            SelectionPhase::Targeting => {
                self.targeting_domains = Some(domains);
                self.targeting_use_cases = Some(use_cases);
            }
            SelectionPhase::DeepDive => {
                self.deep_dive_domains = Some(domains);
                self.deep_dive_use_cases = Some(use_cases);
            }
        }
    }

    /// Adds or removes a domain.
    ///
    /// Removing a domain also drops selected use-cases whose pool domain is
    /// no longer selected. Use-cases the pool does not know are kept.
    pub fn toggle_domain(
        &mut self,
        phase: SelectionPhase,
        domain: &str,
        organization: &Organization,
        pool: &CandidatePool,
    ) -> Result<(), ValidationError> {
        let domain = domain.trim();
        if domain.is_empty() {
            return Err(ValidationError::empty_field("domain"));
        }

        let mut domains = self.effective_domains(phase, organization);
        let mut use_cases = self.effective_use_cases(phase, organization);

        if let Some(pos) = domains.iter().position(|d| d == domain) {
            domains.remove(pos);
            use_cases.retain(|id| match pool.domain_of(id) {
                Some(uc_domain) => domains.iter().any(|d| d == uc_domain),
                None => true,
            });
        } else {
            domains.push(domain.to_string());
        }

        self.set_selection(phase, domains, use_cases);
        Ok(())
    }

    /// Adds or removes a use-case id. Domains are untouched.
    pub fn toggle_use_case(&mut self, phase: SelectionPhase, id: &UseCaseId, organization: &Organization) {
        let domains = self.effective_domains(phase, organization);
        let mut use_cases = self.effective_use_cases(phase, organization);

        if let Some(pos) = use_cases.iter().position(|existing| existing == id) {
            use_cases.remove(pos);
        } else {
            use_cases.push(id.clone());
        }

        self.set_selection(phase, domains, use_cases);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Kickoff and research
    // ════════════════════════════════════════════════════════════════════════════

    /// Stores the kickoff presentation URL. Blank input clears it.
    pub fn set_presentation_url(&mut self, url: &str) {
        let url = url.trim();
        self.kickoff_presentation_url = (!url.is_empty()).then(|| url.to_string());
    }

    pub fn mark_research_complete(&mut self) {
        self.research_complete = true;
    }

    pub fn add_kickoff_notes(&mut self, notes: impl IntoIterator<Item = Note>) {
        self.kickoff_notes.extend(notes);
    }

    pub fn remove_kickoff_note(&mut self, id: &NoteId) -> Result<Note, DomainError> {
        let pos = self
            .kickoff_notes
            .iter()
            .position(|n| n.id == *id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::NoteNotFound, "Kickoff note not found")
                    .with_detail("note_id", id.to_string())
            })?;
        Ok(self.kickoff_notes.remove(pos))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Functional meetings
    // ════════════════════════════════════════════════════════════════════════════

    pub fn meetings(&self, stage: FunctionalStage) -> &[Meeting] {
        match stage {
            FunctionalStage::HighLevel => &self.high_level_meetings,
            FunctionalStage::DeepDive => &self.deep_dive_meetings,
        }
    }

    fn meetings_mut(&mut self, stage: FunctionalStage) -> &mut Vec<Meeting> {
        match stage {
            FunctionalStage::HighLevel => &mut self.high_level_meetings,
            FunctionalStage::DeepDive => &mut self.deep_dive_meetings,
        }
    }

    pub fn add_meeting(&mut self, stage: FunctionalStage, meeting: Meeting) {
        self.meetings_mut(stage).push(meeting);
    }

    pub fn remove_meeting(&mut self, stage: FunctionalStage, id: &MeetingId) -> Result<Meeting, DomainError> {
        let meetings = self.meetings_mut(stage);
        let pos = meetings.iter().position(|m| m.id == *id).ok_or_else(|| {
            DomainError::new(ErrorCode::MeetingNotFound, "Meeting not found")
                .with_detail("meeting_id", id.to_string())
                .with_detail("stage", stage.to_string())
        })?;
        Ok(meetings.remove(pos))
    }

    /// Notes that feed the hypotheses of a stage.
    ///
    /// High-level hypotheses read the kickoff notes; deep-dive hypotheses
    /// read the notes of the high-level functional meetings.
    pub fn hypothesis_notes(&self, stage: FunctionalStage) -> String {
        let texts: Vec<String> = match stage {
            FunctionalStage::HighLevel => self.kickoff_notes.iter().map(|n| n.text.clone()).collect(),
            FunctionalStage::DeepDive => self.high_level_meetings.iter().map(Meeting::text).collect(),
        };
        texts.join("\n\n")
    }

    /// Every note of the journey: kickoff notes, then meeting notes.
    pub fn all_notes(&self) -> impl Iterator<Item = &Note> {
        self.kickoff_notes.iter().chain(
            self.high_level_meetings
                .iter()
                .chain(self.deep_dive_meetings.iter())
                .flat_map(|m| m.notes.iter()),
        )
    }

    fn all_meetings(&self) -> impl Iterator<Item = &Meeting> {
        self.high_level_meetings.iter().chain(self.deep_dive_meetings.iter())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Custom steps
    // ════════════════════════════════════════════════════════════════════════════

    pub fn custom_step(&self, id: &CustomStepId) -> Result<&CustomStep, DomainError> {
        self.custom_steps.get(id).ok_or_else(|| step_not_found(id))
    }

    pub fn custom_step_mut(&mut self, id: &CustomStepId) -> Result<&mut CustomStep, DomainError> {
        self.custom_steps.get_mut(id).ok_or_else(|| step_not_found(id))
    }

    pub fn add_custom_step(&mut self, step: CustomStep) {
        self.custom_steps.insert(step);
    }

    pub fn remove_custom_step(&mut self, id: &CustomStepId) -> Result<CustomStep, DomainError> {
        self.custom_steps.remove(id).ok_or_else(|| step_not_found(id))
    }

    /// File names of the referenced notes. Unknown ids are skipped.
    pub fn document_labels(&self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.all_notes().find(|n| n.id.to_string() == *id))
            .map(|n| n.file_name.clone())
            .collect()
    }

    /// Meeting labels, or note file names, of the referenced transcripts.
    /// Unknown ids are skipped.
    pub fn transcript_labels(&self, ids: &[String]) -> Vec<String> {
        ids.iter()
            .filter_map(|id| {
                self.all_meetings()
                    .find(|m| m.id.to_string() == *id)
                    .map(|m| m.label.clone())
                    .or_else(|| {
                        self.all_notes()
                            .find(|n| n.id.to_string() == *id)
                            .map(|n| n.file_name.clone())
                    })
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Persistence helpers
    // ════════════════════════════════════════════════════════════════════════════

    pub fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }

    /// Overwrites every field the patch carries.
    pub fn apply_patch(&mut self, patch: &JourneyPatch) {
        if let Some(value) = patch.research_complete {
            self.research_complete = value;
        }
        if let Some(value) = &patch.targeting_domains {
            self.targeting_domains = Some(value.clone());
        }
        if let Some(value) = &patch.targeting_use_cases {
            self.targeting_use_cases = Some(value.clone());
        }
        if let Some(value) = &patch.deep_dive_domains {
            self.deep_dive_domains = Some(value.clone());
        }
        if let Some(value) = &patch.deep_dive_use_cases {
            self.deep_dive_use_cases = Some(value.clone());
        }
        if let Some(value) = &patch.kickoff_presentation_url {
            self.kickoff_presentation_url = value.clone();
        }
        if let Some(value) = &patch.kickoff_notes {
            self.kickoff_notes = value.clone();
        }
        if let Some(value) = &patch.high_level_meetings {
            self.high_level_meetings = value.clone();
        }
        if let Some(value) = &patch.deep_dive_meetings {
            self.deep_dive_meetings = value.clone();
        }
        if let Some(value) = &patch.custom_steps {
            self.custom_steps = value.clone();
        }
        if let Some(value) = patch.updated_at {
            self.updated_at = value;
        }
    }
}

fn step_not_found(id: &CustomStepId) -> DomainError {
    DomainError::new(ErrorCode::CustomStepNotFound, "Custom step not found")
        .with_detail("step_id", id.to_string())
}
