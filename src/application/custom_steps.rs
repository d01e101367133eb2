//! CustomStepManager - operator-defined steps and their outputs.
//!
//! Definitions live on the journey and change through the session's commit
//! hook. Chat transcripts are held here until `persist_transcript` writes
//! them back to the step.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::custom_output::{
    csv_file_name, render_csv, render_outline, ChatContext, StepSources, FALLBACK_REPLY,
};
use crate::domain::foundation::{CustomStepId, DomainError, ErrorCode, Timestamp, ValidationError};
use crate::domain::journey::{
    ChatTurn, CustomStep, CustomStepDraft, OutputType, TemplateAttachment, UploadedFile,
};
use crate::ports::{AIProvider, CompletionRequest, RequestMetadata};

use super::JourneySession;

/// A rendered tabular export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

/// Manages custom steps of the session's active journey.
pub struct CustomStepManager {
    ai: Arc<dyn AIProvider>,
    transcripts: RwLock<HashMap<CustomStepId, Vec<ChatTurn>>>,
    in_flight: Mutex<HashSet<CustomStepId>>,
}

/// Releases a step's in-flight slot when the send finishes or is dropped.
struct InFlightGuard<'a> {
    slots: &'a Mutex<HashSet<CustomStepId>>,
    step_id: CustomStepId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        lock(self.slots).remove(&self.step_id);
    }
}

// Poisoning is ignored: the set is only touched by single insert/remove calls.
fn lock(slots: &Mutex<HashSet<CustomStepId>>) -> MutexGuard<'_, HashSet<CustomStepId>> {
    slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CustomStepManager {
    pub fn new(ai: Arc<dyn AIProvider>) -> Self {
        Self {
            ai,
            transcripts: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Definitions
    // ════════════════════════════════════════════════════════════════════════════

    /// Adds a step to the active journey. Blank titles never reach the store.
    pub async fn create(
        &self,
        session: &mut JourneySession,
        draft: CustomStepDraft,
    ) -> Result<CustomStepId, DomainError> {
        let target = session
            .active_journey_id()
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let step = CustomStep::from_draft(draft, Timestamp::now()).map_err(|err| {
            session.fail(invalid_draft(err).in_operation("create_custom_step", &target))
        })?;
        let step_id = step.id;
        session
            .commit("create_custom_step", move |journey, _, _| {
                journey.add_custom_step(step);
                Ok(())
            })
            .await?;
        debug!(step_id = %step_id, "Custom step created");
        Ok(step_id)
    }

    /// Edits a step through its draft form.
    ///
    /// Changing the output type drops the template and any transcript.
    pub async fn update<F>(
        &self,
        session: &mut JourneySession,
        step_id: CustomStepId,
        mutator: F,
    ) -> Result<(), DomainError>
    where
        F: FnOnce(CustomStepDraft) -> CustomStepDraft,
    {
        let mut type_changed = false;
        session
            .commit("update_custom_step", |journey, _, _| {
                let step = journey.custom_step_mut(&step_id)?;
                let draft = mutator(step.to_draft());
                type_changed = draft.output_type != step.output_type();
                step.apply_draft(draft, Timestamp::now()).map_err(invalid_draft)
            })
            .await?;

        if type_changed {
            self.transcripts.write().await.remove(&step_id);
        }
        Ok(())
    }

    pub async fn remove(&self, session: &mut JourneySession, step_id: CustomStepId) -> Result<(), DomainError> {
        session
            .commit("remove_custom_step", |journey, _, _| {
                journey.remove_custom_step(&step_id).map(|_| ())
            })
            .await?;
        self.transcripts.write().await.remove(&step_id);
        Ok(())
    }

    /// Replaces the template of a tabular step.
    pub async fn attach_template(
        &self,
        session: &mut JourneySession,
        step_id: CustomStepId,
        file: UploadedFile,
    ) -> Result<(), DomainError> {
        session
            .commit("attach_template", |journey, _, _| {
                let now = Timestamp::now();
                let step = journey.custom_step_mut(&step_id)?;
                let attachment = TemplateAttachment {
                    file_name: file.file_name,
                    bytes: file.bytes,
                    attached_at: now,
                };
                if step.attach_template(attachment, now) {
                    Ok(())
                } else {
                    Err(unsupported(step, "attach a template to"))
                }
            })
            .await
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Chat
    // ════════════════════════════════════════════════════════════════════════════

    /// Current transcript: the in-session one, else the persisted one.
    pub async fn transcript(&self, step: &CustomStep) -> Vec<ChatTurn> {
        match self.transcripts.read().await.get(&step.id) {
            Some(turns) => turns.clone(),
            None => step.transcript.clone().unwrap_or_default(),
        }
    }

    /// Sends one operator message and returns the assistant turn.
    ///
    /// A failed completion appends the fallback reply instead; either way
    /// the transcript grows by exactly two turns. A second send for a step
    /// that is still waiting is rejected with `RequestInFlight`.
    pub async fn send_message(
        &self,
        session: &JourneySession,
        step_id: CustomStepId,
        text: &str,
    ) -> Result<ChatTurn, DomainError> {
        const OP: &str = "send_message";

        if text.trim().is_empty() {
            return Err(DomainError::validation("message", "Message cannot be empty").in_operation(OP, step_id));
        }
        let journey = session.active_journey().ok_or_else(|| {
            DomainError::new(ErrorCode::NoActiveJourney, "No journey is active").in_operation(OP, step_id)
        })?;
        let step = journey
            .custom_step(&step_id)
            .map_err(|err| err.in_operation(OP, step_id))?;
        if step.output_type() != OutputType::Chat {
            return Err(unsupported(step, "chat with").in_operation(OP, step_id));
        }

        let _guard = self.claim(step_id).map_err(|err| err.in_operation(OP, step_id))?;

        let turns = {
            let mut transcripts = self.transcripts.write().await;
            let transcript = transcripts
                .entry(step_id)
                .or_insert_with(|| step.transcript.clone().unwrap_or_default());
            transcript.push(ChatTurn::user(text));
            transcript.clone()
        };

        let context = ChatContext::build(step, &StepSources::resolve(journey, step), &turns);
        let request = CompletionRequest::new(
            RequestMetadata::new(OP)
                .with_journey(journey.id)
                .with_step(step_id),
        )
        .with_system_prompt(context.system_prompt)
        .with_model(context.model_id)
        .with_transcript(&context.turns);

        let reply = match self.ai.complete(request).await {
            Ok(response) => ChatTurn::assistant(response.content),
            Err(err) => {
                warn!(journey_id = %journey.id, step_id = %step_id, error = %err, "Chat completion failed");
                ChatTurn::assistant(FALLBACK_REPLY)
            }
        };

        self.transcripts
            .write()
            .await
            .entry(step_id)
            .or_default()
            .push(reply.clone());
        Ok(reply)
    }

    /// Writes the in-session transcript back onto the step.
    pub async fn persist_transcript(
        &self,
        session: &mut JourneySession,
        step_id: CustomStepId,
    ) -> Result<(), DomainError> {
        let turns = self.transcripts.read().await.get(&step_id).cloned();
        let Some(turns) = turns else {
            return Ok(());
        };
        session
            .commit("persist_transcript", move |journey, _, _| {
                journey.custom_step_mut(&step_id)?.transcript = Some(turns);
                Ok(())
            })
            .await
    }

    fn claim(&self, step_id: CustomStepId) -> Result<InFlightGuard<'_>, DomainError> {
        if !lock(&self.in_flight).insert(step_id) {
            return Err(DomainError::new(
                ErrorCode::RequestInFlight,
                "A message for this step is still being answered",
            ));
        }
        Ok(InFlightGuard {
            slots: &self.in_flight,
            step_id,
        })
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Rendered outputs
    // ════════════════════════════════════════════════════════════════════════════

    /// Two-column CSV of a tabular step's definition.
    pub fn export_csv(&self, session: &JourneySession, step_id: CustomStepId) -> Result<CsvExport, DomainError> {
        let (journey, step) = resolve(session, step_id, "export_csv")?;
        if step.output_type() != OutputType::Tabular {
            return Err(unsupported(step, "export CSV for").in_operation("export_csv", step_id));
        }
        let content = render_csv(step, &StepSources::resolve(journey, step))
            .map_err(|err| err.in_operation("export_csv", step_id))?;
        Ok(CsvExport {
            file_name: csv_file_name(step),
            content,
        })
    }

    /// Plain-text outline of a presentation step.
    pub fn render_outline(&self, session: &JourneySession, step_id: CustomStepId) -> Result<String, DomainError> {
        let (journey, step) = resolve(session, step_id, "render_outline")?;
        if step.output_type() != OutputType::Presentation {
            return Err(unsupported(step, "outline").in_operation("render_outline", step_id));
        }
        Ok(render_outline(step, &StepSources::resolve(journey, step)))
    }
}

fn resolve<'a>(
    session: &'a JourneySession,
    step_id: CustomStepId,
    operation: &str,
) -> Result<(&'a crate::domain::journey::Journey, &'a CustomStep), DomainError> {
    let journey = session.active_journey().ok_or_else(|| {
        DomainError::new(ErrorCode::NoActiveJourney, "No journey is active").in_operation(operation, step_id)
    })?;
    let step = journey
        .custom_step(&step_id)
        .map_err(|err| err.in_operation(operation, step_id))?;
    Ok((journey, step))
}

fn invalid_draft(err: ValidationError) -> DomainError {
    let field = match &err {
        ValidationError::EmptyField { field } | ValidationError::InvalidFormat { field, .. } => field.clone(),
    };
    DomainError::validation(field, err.to_string())
}

fn unsupported(step: &CustomStep, action: &str) -> DomainError {
    DomainError::new(
        ErrorCode::UnsupportedOutputType,
        format!("Cannot {} a {} step", action, step.output_type().display_name()),
    )
    .with_detail("output_type", step.output_type().display_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::extraction::PlainTextExtractor;
    use crate::adapters::storage::InMemoryJourneyStore;
    use crate::domain::foundation::UserId;
    use crate::domain::journey::Organization;

    async fn active_session(ai: Arc<MockAIProvider>) -> (JourneySession, InMemoryJourneyStore) {
        let owner = UserId::new("operator-1").unwrap();
        let organization = Organization::new("Acme", owner.clone()).unwrap();
        let organization_id = organization.id;
        let store = InMemoryJourneyStore::new();
        store.put_organization(organization).await;

        let mut session = JourneySession::new(
            owner,
            Arc::new(store.clone()),
            Arc::new(PlainTextExtractor::new()),
            ai,
            Vec::new(),
        );
        session.select_organization(organization_id).await.unwrap();
        session.create_journey().await.unwrap();
        (session, store)
    }

    #[tokio::test]
    async fn blank_title_is_rejected_without_a_write() {
        let ai = Arc::new(MockAIProvider::new());
        let (mut session, store) = active_session(ai.clone()).await;
        let manager = CustomStepManager::new(ai);
        let calls = store.save_calls();

        let err = manager
            .create(&mut session, CustomStepDraft::new("   ", OutputType::Chat))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field"), Some(&"title".to_string()));
        assert_eq!(store.save_calls(), calls);
        assert!(session.view().unwrap().custom_steps.is_empty());
        assert_eq!(session.last_error(), Some(&err));
        assert_eq!(
            err.details.get("operation"),
            Some(&"create_custom_step".to_string())
        );
    }

    #[tokio::test]
    async fn chat_reply_is_appended_to_transcript() {
        let ai = Arc::new(MockAIProvider::new().with_response("Three vendors match."));
        let (mut session, _) = active_session(ai.clone()).await;
        let manager = CustomStepManager::new(ai.clone());
        let step_id = manager
            .create(&mut session, CustomStepDraft::new("Vendor Scan", OutputType::Chat))
            .await
            .unwrap();

        let reply = manager.send_message(&session, step_id, "Who supplies paper?").await.unwrap();

        assert_eq!(reply.content, "Three vendors match.");
        let step = session.active_journey().unwrap().custom_step(&step_id).unwrap();
        assert_eq!(manager.transcript(step).await.len(), 2);
        let calls = ai.get_calls();
        assert!(calls[0].system_prompt.as_deref().unwrap_or("").contains("Vendor Scan"));
    }

    #[tokio::test]
    async fn failed_completion_appends_fallback() {
        let ai = Arc::new(MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        }));
        let (mut session, _) = active_session(ai.clone()).await;
        let manager = CustomStepManager::new(ai);
        let step_id = manager
            .create(&mut session, CustomStepDraft::new("Vendor Scan", OutputType::Chat))
            .await
            .unwrap();

        let reply = manager.send_message(&session, step_id, "Hello").await.unwrap();

        assert_eq!(reply.content, FALLBACK_REPLY);
        let step = session.active_journey().unwrap().custom_step(&step_id).unwrap();
        assert_eq!(manager.transcript(step).await.len(), 2);
    }

    #[tokio::test]
    async fn chat_on_tabular_step_is_unsupported() {
        let ai = Arc::new(MockAIProvider::new());
        let (mut session, _) = active_session(ai.clone()).await;
        let manager = CustomStepManager::new(ai);
        let step_id = manager
            .create(&mut session, CustomStepDraft::new("Risk Review", OutputType::Tabular))
            .await
            .unwrap();

        let err = manager.send_message(&session, step_id, "Hi").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedOutputType);
    }

    #[tokio::test]
    async fn template_only_attaches_to_tabular_steps() {
        let ai = Arc::new(MockAIProvider::new());
        let (mut session, _) = active_session(ai.clone()).await;
        let manager = CustomStepManager::new(ai);
        let tabular = manager
            .create(&mut session, CustomStepDraft::new("Risk Review", OutputType::Tabular))
            .await
            .unwrap();
        let deck = manager
            .create(&mut session, CustomStepDraft::new("Board Deck", OutputType::Presentation))
            .await
            .unwrap();

        manager
            .attach_template(&mut session, tabular, UploadedFile::new("risk.xlsx", vec![1, 2]))
            .await
            .unwrap();
        let err = manager
            .attach_template(&mut session, deck, UploadedFile::new("deck.xlsx", vec![1]))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::UnsupportedOutputType);
        let journey = session.active_journey().unwrap();
        assert_eq!(
            journey.custom_step(&tabular).unwrap().template().map(|t| t.file_name.as_str()),
            Some("risk.xlsx")
        );
    }

    #[tokio::test]
    async fn changing_output_type_drops_template() {
        let ai = Arc::new(MockAIProvider::new());
        let (mut session, _) = active_session(ai.clone()).await;
        let manager = CustomStepManager::new(ai);
        let step_id = manager
            .create(&mut session, CustomStepDraft::new("Risk Review", OutputType::Tabular))
            .await
            .unwrap();
        manager
            .attach_template(&mut session, step_id, UploadedFile::new("risk.xlsx", vec![1]))
            .await
            .unwrap();

        manager
            .update(&mut session, step_id, |draft| CustomStepDraft {
                output_type: OutputType::Presentation,
                ..draft
            })
            .await
            .unwrap();

        let step = session.active_journey().unwrap().custom_step(&step_id).unwrap();
        assert_eq!(step.output_type(), OutputType::Presentation);
        assert!(step.template().is_none());
        assert!(manager.render_outline(&session, step_id).unwrap().contains("## Objective"));
    }

    #[tokio::test]
    async fn persisted_transcript_survives_a_new_manager() {
        let ai = Arc::new(MockAIProvider::new().with_response("Noted."));
        let (mut session, _) = active_session(ai.clone()).await;
        let manager = CustomStepManager::new(ai.clone());
        let step_id = manager
            .create(&mut session, CustomStepDraft::new("Vendor Scan", OutputType::Chat))
            .await
            .unwrap();
        manager.send_message(&session, step_id, "Remember this").await.unwrap();

        manager.persist_transcript(&mut session, step_id).await.unwrap();

        let fresh = CustomStepManager::new(ai);
        let step = session.active_journey().unwrap().custom_step(&step_id).unwrap();
        assert_eq!(fresh.transcript(step).await.len(), 2);
    }
}
