//! JourneySession - the operator's view of one organization and its journeys.
//!
//! Every persisted transition goes through [`JourneySession::commit`]:
//!
//! 1. Check ownership and that a journey is active
//! 2. Mutate a copy of the active journey (validation happens here)
//! 3. Swap the copy in and re-project the view
//! 4. Await `save_fields` with the field-level diff
//! 5. On failure restore the snapshot, re-project, surface the error
//!
//! Transitions take `&mut self`, so one session never interleaves two writes.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use crate::domain::catalog::{CandidatePool, UseCase};
use crate::domain::foundation::{
    DomainError, ErrorCode, JourneyId, MeetingId, NoteId, OrganizationId, OwnedByUser,
    SessionPhase, StateMachine, Timestamp, UseCaseId, UserId,
};
use crate::domain::journey::{
    FunctionalStage, HypothesisBuilder, Journey, JourneyPatch, JourneyView, MeetingDraft, Note,
    Organization, SelectionPhase, UploadedFile,
};
use crate::domain::recommendation::{Recommendation, RecommendationEngine};
use crate::domain::steps::{build_steps, select, StepKey, StepProgress, StepSettings, StepView};
use crate::ports::{
    AIProvider, JourneyChange, JourneyStore, NoteSummary, RequestMetadata, TextExtractor,
};

/// Result of ingesting a batch of uploaded files.
///
/// Files that could not be read become warnings; the rest are committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub added: Vec<NoteId>,
    pub warnings: Vec<String>,
}

impl IngestReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Outcome of a note summarization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Ready(NoteSummary),
    Failed(String),
}

/// Interactive session over one organization's journeys.
pub struct JourneySession {
    store: Arc<dyn JourneyStore>,
    extractor: Arc<dyn TextExtractor>,
    ai: Arc<dyn AIProvider>,
    library: Vec<UseCase>,
    pool: CandidatePool,
    engine: RecommendationEngine,
    settings: StepSettings,
    identity: UserId,
    phase: SessionPhase,
    organization: Option<Organization>,
    journeys: Vec<Journey>,
    active: Option<JourneyId>,
    view: Option<JourneyView>,
    current_step: StepKey,
    last_error: Option<DomainError>,
    changes: Option<broadcast::Receiver<JourneyChange>>,
}

impl JourneySession {
    pub fn new(
        identity: UserId,
        store: Arc<dyn JourneyStore>,
        extractor: Arc<dyn TextExtractor>,
        ai: Arc<dyn AIProvider>,
        library: Vec<UseCase>,
    ) -> Self {
        let pool = CandidatePool::merge(library.clone(), Vec::new());
        Self {
            store,
            extractor,
            ai,
            library,
            pool,
            engine: RecommendationEngine::default(),
            settings: StepSettings::default(),
            identity,
            phase: SessionPhase::NoOrganization,
            organization: None,
            journeys: Vec::new(),
            active: None,
            view: None,
            current_step: StepKey::default(),
            last_error: None,
            changes: None,
        }
    }

    pub fn with_engine(mut self, engine: RecommendationEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_settings(mut self, settings: StepSettings) -> Self {
        self.settings = settings;
        self.reproject();
        self
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════════

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn identity(&self) -> &UserId {
        &self.identity
    }

    pub fn organization(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }

    /// Cached journeys of the bound organization.
    pub fn journeys(&self) -> &[Journey] {
        &self.journeys
    }

    pub fn active_journey_id(&self) -> Option<JourneyId> {
        self.active
    }

    pub fn active_journey(&self) -> Option<&Journey> {
        let id = self.active?;
        self.journeys.iter().find(|j| j.id == id)
    }

    /// Projection of the active journey, if any.
    pub fn view(&self) -> Option<&JourneyView> {
        self.view.as_ref()
    }

    /// Library and organization use-cases merged by id.
    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Most recent failure, cleared by the next successful write.
    pub fn last_error(&self) -> Option<&DomainError> {
        self.last_error.as_ref()
    }

    pub fn current_step(&self) -> StepKey {
        self.current_step
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Organization and journey lifecycle
    // ════════════════════════════════════════════════════════════════════════════

    /// Binds the session to an organization the operator owns.
    ///
    /// With stored journeys the most recently updated one becomes active;
    /// without any the session waits in `Researching`.
    pub async fn select_organization(&mut self, organization_id: OrganizationId) -> Result<(), DomainError> {
        const OP: &str = "select_organization";

        let snapshot = match self.store.load(&organization_id).await {
            Ok(snapshot) => snapshot,
            Err(err) => return Err(self.fail(DomainError::from(err).in_operation(OP, organization_id))),
        };
        if let Err(err) = snapshot.organization.check_ownership(&self.identity) {
            return Err(self.fail(err.in_operation(OP, organization_id)));
        }

        let active = snapshot
            .journeys
            .iter()
            .max_by_key(|j| j.updated_at)
            .map(|j| j.id);
        let target = if active.is_some() {
            SessionPhase::Active
        } else {
            SessionPhase::Researching
        };
        let phase = match self.phase.transition_to(target) {
            Ok(phase) => phase,
            Err(err) => return Err(self.fail(transition_error(err).in_operation(OP, organization_id))),
        };

        self.pool = CandidatePool::merge(self.library.clone(), snapshot.organization.use_cases.clone());
        self.changes = Some(self.store.subscribe(&organization_id));
        self.organization = Some(snapshot.organization);
        self.journeys = snapshot.journeys;
        self.active = active;
        self.phase = phase;
        self.current_step = StepKey::default();
        self.last_error = None;
        self.reproject();

        info!(
            organization_id = %organization_id,
            journeys = self.journeys.len(),
            phase = ?self.phase,
            "Organization selected"
        );
        Ok(())
    }

    /// Creates a journey seeded from the organization defaults and activates it.
    pub async fn create_journey(&mut self) -> Result<JourneyId, DomainError> {
        const OP: &str = "create_journey";

        let organization = match self.authorized_organization() {
            Ok(org) => org,
            Err(err) => return Err(self.fail(err.in_operation(OP, "-"))),
        };
        let journey = Journey::new(organization, Timestamp::now());
        let journey_id = journey.id;

        if let Err(err) = self.store.create_journey(&journey).await {
            return Err(self.fail(DomainError::from(err).in_operation(OP, journey_id)));
        }

        self.phase = SessionPhase::Active;
        self.journeys.push(journey);
        self.activate(journey_id);
        self.last_error = None;

        info!(journey_id = %journey_id, "Journey created");
        Ok(journey_id)
    }

    /// Makes another journey of the bound organization active.
    ///
    /// All derived state is rebuilt from the target's stored payload.
    pub async fn switch_journey(&mut self, journey_id: JourneyId) -> Result<(), DomainError> {
        const OP: &str = "switch_journey";

        let organization_id = match self.authorized_organization() {
            Ok(org) => org.id,
            Err(err) => return Err(self.fail(err.in_operation(OP, journey_id))),
        };

        if !self.journeys.iter().any(|j| j.id == journey_id) {
            let journey = match self.store.load_journey(&journey_id).await {
                Ok(journey) => journey,
                Err(err) => return Err(self.fail(DomainError::from(err).in_operation(OP, journey_id))),
            };
            if journey.organization_id != organization_id {
                let err = DomainError::new(ErrorCode::JourneyNotFound, "Journey belongs to another organization")
                    .in_operation(OP, journey_id);
                return Err(self.fail(err));
            }
            self.journeys.push(journey);
        }

        self.phase = SessionPhase::Active;
        self.activate(journey_id);
        self.last_error = None;
        debug!(journey_id = %journey_id, "Journey switched");
        Ok(())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Selections and kickoff
    // ════════════════════════════════════════════════════════════════════════════

    pub async fn toggle_domain(&mut self, phase: SelectionPhase, domain: &str) -> Result<(), DomainError> {
        self.commit("toggle_domain", |journey, organization, pool| {
            journey
                .toggle_domain(phase, domain, organization, pool)
                .map_err(DomainError::from)
        })
        .await
    }

    pub async fn toggle_use_case(&mut self, phase: SelectionPhase, id: &UseCaseId) -> Result<(), DomainError> {
        self.commit("toggle_use_case", |journey, organization, _| {
            journey.toggle_use_case(phase, id, organization);
            Ok(())
        })
        .await
    }

    /// Stores the kickoff presentation URL; blank clears it.
    pub async fn save_output(&mut self, url: &str) -> Result<(), DomainError> {
        self.commit("save_output", |journey, _, _| {
            journey.set_presentation_url(url);
            Ok(())
        })
        .await
    }

    pub async fn mark_research_complete(&mut self) -> Result<(), DomainError> {
        self.commit("mark_research_complete", |journey, _, _| {
            journey.mark_research_complete();
            Ok(())
        })
        .await
    }

    /// Appends a pasted kickoff note.
    pub async fn add_kickoff_note(&mut self, label: &str, text: &str) -> Result<NoteId, DomainError> {
        let note = match Note::new(label, text) {
            Ok(note) => note,
            Err(err) => {
                let err = DomainError::from(err).in_operation("add_kickoff_note", self.target());
                return Err(self.fail(err));
            }
        };
        let note_id = note.id;
        self.commit("add_kickoff_note", move |journey, _, _| {
            journey.add_kickoff_notes([note]);
            Ok(())
        })
        .await?;
        Ok(note_id)
    }

    /// Extracts every file concurrently and appends the readable ones as
    /// kickoff notes, in upload order.
    pub async fn upload_kickoff_notes(&mut self, files: Vec<UploadedFile>) -> Result<IngestReport, DomainError> {
        self.require_active("upload_kickoff_notes")?;
        let (notes, warnings) = self.extract_all(&files).await;
        let report = IngestReport {
            added: notes.iter().map(|n| n.id).collect(),
            warnings,
        };
        if !notes.is_empty() {
            self.commit("upload_kickoff_notes", move |journey, _, _| {
                journey.add_kickoff_notes(notes);
                Ok(())
            })
            .await?;
        }
        Ok(report)
    }

    pub async fn remove_kickoff_note(&mut self, id: NoteId) -> Result<(), DomainError> {
        self.commit("remove_kickoff_note", |journey, _, _| {
            journey.remove_kickoff_note(&id).map(|_| ())
        })
        .await
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Functional meetings
    // ════════════════════════════════════════════════════════════════════════════

    /// Records a functional meeting with pasted notes and uploaded files.
    pub async fn add_meeting(
        &mut self,
        stage: FunctionalStage,
        draft: MeetingDraft,
        files: Vec<UploadedFile>,
    ) -> Result<(MeetingId, IngestReport), DomainError> {
        self.require_active("add_meeting")?;
        let (notes, warnings) = self.extract_all(&files).await;
        let report = IngestReport {
            added: notes.iter().map(|n| n.id).collect(),
            warnings,
        };

        let meeting = match draft.into_meeting(notes) {
            Ok(meeting) => meeting,
            Err(err) => {
                let err = DomainError::from(err).in_operation("add_meeting", self.target());
                return Err(self.fail(err));
            }
        };
        let meeting_id = meeting.id;
        self.commit("add_meeting", move |journey, _, _| {
            journey.add_meeting(stage, meeting);
            Ok(())
        })
        .await?;
        Ok((meeting_id, report))
    }

    pub async fn remove_meeting(&mut self, stage: FunctionalStage, id: MeetingId) -> Result<(), DomainError> {
        self.commit("remove_meeting", |journey, _, _| {
            journey.remove_meeting(stage, &id).map(|_| ())
        })
        .await
    }

    /// Summarizes the notes feeding a stage's hypotheses. Never fails the session.
    pub async fn summarize_notes(&self, stage: FunctionalStage) -> SummaryOutcome {
        let Some(journey) = self.active_journey() else {
            return SummaryOutcome::Failed("No journey is active".to_string());
        };
        let notes = journey.hypothesis_notes(stage);
        let metadata = RequestMetadata::new("summarize_notes").with_journey(journey.id);

        match self.ai.summarize(&notes, metadata).await {
            Ok(summary) => SummaryOutcome::Ready(summary),
            Err(err) => {
                warn!(journey_id = %journey.id, stage = %stage, error = %err, "Note summary failed");
                SummaryOutcome::Failed(err.to_string())
            }
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Derived data
    // ════════════════════════════════════════════════════════════════════════════

    /// Ranked hypotheses for a stage, computed from the committed record.
    pub fn hypotheses(&self, stage: FunctionalStage) -> Result<Vec<Recommendation>, DomainError> {
        let journey = self.active_journey().ok_or_else(no_active_journey)?;
        let organization = self.organization.as_ref().ok_or_else(no_organization)?;
        Ok(HypothesisBuilder::build(journey, organization, &self.pool, &self.engine, stage))
    }

    /// Domains that appear in a stage's hypotheses.
    pub fn recommended_domains(&self, stage: FunctionalStage) -> Result<Vec<String>, DomainError> {
        Ok(HypothesisBuilder::recommended_domains(&self.hypotheses(stage)?))
    }

    /// Visible steps with their lock state.
    pub fn steps(&self) -> Vec<StepView> {
        if let Some(view) = &self.view {
            return view.steps.clone();
        }
        let progress = StepProgress {
            research_complete: false,
            has_research_content: self
                .organization
                .as_ref()
                .is_some_and(Organization::has_research_content),
            has_organization: self.phase.has_organization(),
        };
        build_steps(progress, &self.settings, std::iter::empty())
    }

    /// Moves to another step unless it is locked or hidden.
    pub fn select_step(&mut self, requested: StepKey) -> StepKey {
        self.current_step = select(&self.steps(), self.current_step, requested);
        self.current_step
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Remote updates
    // ════════════════════════════════════════════════════════════════════════════

    /// Overwrites the cached journey with the fields a change carries.
    ///
    /// Returns false when the change does not concern a cached journey of
    /// the bound organization.
    pub fn apply_remote_update(&mut self, change: &JourneyChange) -> bool {
        if self.organization.as_ref().map(|o| o.id) != Some(change.organization_id) {
            return false;
        }
        let Some(journey) = self.journeys.iter_mut().find(|j| j.id == change.journey_id) else {
            return false;
        };
        journey.apply_patch(&change.patch);
        if self.active == Some(change.journey_id) {
            self.reproject();
        }
        debug!(
            journey_id = %change.journey_id,
            fields = ?change.patch.field_names(),
            "Remote update applied"
        );
        true
    }

    /// Drains pending store notifications. Returns how many were applied.
    ///
    /// Journeys created elsewhere are fetched; a lagged receiver reloads
    /// the whole organization.
    pub async fn sync_remote_updates(&mut self) -> Result<usize, DomainError> {
        let mut applied = 0;
        loop {
            let Some(receiver) = self.changes.as_mut() else {
                return Ok(applied);
            };
            match receiver.try_recv() {
                Ok(change) => {
                    if self.apply_remote_update(&change) {
                        applied += 1;
                    } else if self.organization.as_ref().map(|o| o.id) == Some(change.organization_id) {
                        match self.store.load_journey(&change.journey_id).await {
                            Ok(journey) => {
                                self.journeys.push(journey);
                                applied += 1;
                            }
                            Err(err) => {
                                warn!(journey_id = %change.journey_id, error = %err, "Failed to fetch remote journey");
                            }
                        }
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return Ok(applied),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Change feed lagged, reloading organization");
                    self.reload().await?;
                    applied += 1;
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Commit hook
    // ════════════════════════════════════════════════════════════════════════════

    /// Applies `mutate` to the active journey and persists the changed fields.
    ///
    /// The change is visible immediately. If the store rejects it, the
    /// journey and view go back to their prior state and the error is kept
    /// in `last_error`.
    pub(crate) async fn commit<F>(&mut self, operation: &'static str, mutate: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut Journey, &Organization, &CandidatePool) -> Result<(), DomainError>,
    {
        let index = match self.active_index() {
            Ok(index) => index,
            Err(err) => return Err(self.fail(err.in_operation(operation, self.target()))),
        };
        let journey_id = self.journeys[index].id;

        let before = self.journeys[index].clone();
        let mut after = before.clone();
        let mutated = match self.authorized_organization() {
            Ok(organization) => mutate(&mut after, organization, &self.pool),
            Err(err) => Err(err),
        };
        if let Err(err) = mutated {
            return Err(self.fail(err.in_operation(operation, journey_id)));
        }
        if JourneyPatch::diff(&before, &after).is_empty() {
            return Ok(());
        }
        after.touch(Timestamp::now());
        let patch = JourneyPatch::diff(&before, &after);

        self.journeys[index] = after;
        self.reproject();

        match self.store.save_fields(&journey_id, &patch).await {
            Ok(()) => {
                self.last_error = None;
                debug!(
                    journey_id = %journey_id,
                    operation,
                    fields = ?patch.field_names(),
                    "Journey fields saved"
                );
                Ok(())
            }
            Err(err) => {
                if let Some(slot) = self.journeys.iter_mut().find(|j| j.id == journey_id) {
                    *slot = before;
                }
                self.reproject();
                Err(self.fail(DomainError::from(err).in_operation(operation, journey_id)))
            }
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn authorized_organization(&self) -> Result<&Organization, DomainError> {
        let organization = self.organization.as_ref().ok_or_else(no_organization)?;
        organization.check_ownership(&self.identity)?;
        Ok(organization)
    }

    fn active_index(&self) -> Result<usize, DomainError> {
        if self.organization.is_none() {
            return Err(no_organization());
        }
        let id = self.active.ok_or_else(no_active_journey)?;
        self.journeys
            .iter()
            .position(|j| j.id == id)
            .ok_or_else(no_active_journey)
    }

    fn require_active(&mut self, operation: &'static str) -> Result<(), DomainError> {
        match self.active_index() {
            Ok(_) => Ok(()),
            Err(err) => Err(self.fail(err.in_operation(operation, self.target()))),
        }
    }

    fn target(&self) -> String {
        self.active.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
    }

    fn activate(&mut self, journey_id: JourneyId) {
        self.active = Some(journey_id);
        self.current_step = StepKey::default();
        self.reproject();
    }

    fn reproject(&mut self) {
        self.view = match (self.active_journey(), self.organization.as_ref()) {
            (Some(journey), Some(organization)) => {
                Some(JourneyView::project(journey, organization, &self.settings))
            }
            _ => None,
        };
    }

    async fn reload(&mut self) -> Result<(), DomainError> {
        let Some(organization_id) = self.organization.as_ref().map(|o| o.id) else {
            return Ok(());
        };
        let snapshot = match self.store.load(&organization_id).await {
            Ok(snapshot) => snapshot,
            Err(err) => return Err(self.fail(DomainError::from(err).in_operation("reload", organization_id))),
        };
        self.organization = Some(snapshot.organization);
        self.journeys = snapshot.journeys;
        if self.active.is_some_and(|id| !self.journeys.iter().any(|j| j.id == id)) {
            self.active = None;
            self.phase = SessionPhase::Researching;
        }
        self.reproject();
        Ok(())
    }

    async fn extract_all(&self, files: &[UploadedFile]) -> (Vec<Note>, Vec<String>) {
        let results = join_all(files.iter().map(|file| self.extractor.extract(file))).await;

        let mut notes = Vec::new();
        let mut warnings = Vec::new();
        for (file, result) in files.iter().zip(results) {
            match result.map_err(|e| e.to_string()).and_then(|text| {
                Note::new(file.file_name.clone(), text).map_err(|e| e.to_string())
            }) {
                Ok(note) => notes.push(note),
                Err(message) => {
                    warn!(file_name = %file.file_name, error = %message, "File skipped");
                    warnings.push(format!("{}: {}", file.file_name, message));
                }
            }
        }
        (notes, warnings)
    }

    pub(crate) fn fail(&mut self, err: DomainError) -> DomainError {
        if err.code.is_infrastructure() {
            warn!(code = %err.code, details = ?err.details, "{}", err.message);
        } else {
            debug!(code = %err.code, details = ?err.details, "{}", err.message);
        }
        self.last_error = Some(err.clone());
        err
    }
}

fn no_organization() -> DomainError {
    DomainError::new(ErrorCode::NoOrganization, "No organization selected")
}

fn no_active_journey() -> DomainError {
    DomainError::new(ErrorCode::NoActiveJourney, "No journey is active")
}

fn transition_error(err: crate::domain::foundation::ValidationError) -> DomainError {
    DomainError::new(ErrorCode::InvalidStateTransition, err.to_string())
}
