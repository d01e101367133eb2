//! Integration tests for CustomStepManager.
//!
//! Covers the three output contracts end to end: chat sends with
//! single-flight protection, tabular CSV export with resolved source labels,
//! and presentation outlines.

use std::sync::Arc;
use std::time::Duration;

use engagement_journey::adapters::ai::{MockAIProvider, MockError};
use engagement_journey::adapters::extraction::PlainTextExtractor;
use engagement_journey::adapters::storage::InMemoryJourneyStore;
use engagement_journey::application::{CustomStepManager, JourneySession};
use engagement_journey::domain::custom_output::FALLBACK_REPLY;
use engagement_journey::domain::foundation::{ErrorCode, UserId};
use engagement_journey::domain::journey::{
    CustomStepDraft, FunctionalStage, MeetingDraft, Organization, OutputType,
};
use engagement_journey::domain::steps::StepKey;

// =============================================================================
// Test Infrastructure
// =============================================================================

async fn active_session(ai: Arc<MockAIProvider>) -> (JourneySession, InMemoryJourneyStore) {
    let owner = UserId::new("operator-1").unwrap();
    let organization = Organization::new("Acme Manufacturing", owner.clone()).unwrap();
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

// =============================================================================
// Definitions
// =============================================================================

#[tokio::test]
async fn created_steps_follow_the_backbone_and_stay_unlocked() {
    let ai = Arc::new(MockAIProvider::new());
    let (mut session, _) = active_session(ai.clone()).await;
    let manager = CustomStepManager::new(ai);

    let first = manager
        .create(&mut session, CustomStepDraft::new("Vendor Scan", OutputType::Chat))
        .await
        .unwrap();
    let second = manager
        .create(&mut session, CustomStepDraft::new("Risk Review", OutputType::Tabular))
        .await
        .unwrap();

    let steps = session.steps();
    assert_eq!(steps.len(), 11);
    assert_eq!(steps[9].key, StepKey::Custom(first));
    assert_eq!(steps[10].key, StepKey::Custom(second));
    assert!(!steps[10].locked);
    assert_eq!(session.select_step(StepKey::Custom(second)), StepKey::Custom(second));
}

#[tokio::test]
async fn removed_step_disappears_and_failed_removal_restores_it() {
    let ai = Arc::new(MockAIProvider::new());
    let (mut session, store) = active_session(ai.clone()).await;
    let manager = CustomStepManager::new(ai);
    let step_id = manager
        .create(&mut session, CustomStepDraft::new("Vendor Scan", OutputType::Chat))
        .await
        .unwrap();

    store.fail_next_writes(1);
    let err = manager.remove(&mut session, step_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PersistenceFailed);
    assert_eq!(session.view().unwrap().custom_steps.len(), 1);

    manager.remove(&mut session, step_id).await.unwrap();
    assert!(session.view().unwrap().custom_steps.is_empty());

    let err = manager.remove(&mut session, step_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CustomStepNotFound);
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn fallback_reply_keeps_transcript_growing_by_two() {
    let ai = Arc::new(
        MockAIProvider::new()
            .with_response("First answer")
            .with_error(MockError::Timeout { timeout_secs: 1 }),
    );
    let (mut session, _) = active_session(ai.clone()).await;
    let manager = CustomStepManager::new(ai);
    let step_id = manager
        .create(&mut session, CustomStepDraft::new("Vendor Scan", OutputType::Chat))
        .await
        .unwrap();

    manager.send_message(&session, step_id, "Who supplies paper?").await.unwrap();
    let reply = manager.send_message(&session, step_id, "And toner?").await.unwrap();

    assert_eq!(reply.content, FALLBACK_REPLY);
    let step = session.active_journey().unwrap().custom_step(&step_id).unwrap();
    let transcript = manager.transcript(step).await;
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[1].content, "First answer");
    assert_eq!(transcript[3].content, FALLBACK_REPLY);
}

#[tokio::test]
async fn same_step_sends_are_single_flight() {
    let ai = Arc::new(MockAIProvider::new().with_delay(Duration::from_millis(50)));
    let (mut session, _) = active_session(ai.clone()).await;
    let manager = CustomStepManager::new(ai.clone());
    let step_id = manager
        .create(&mut session, CustomStepDraft::new("Vendor Scan", OutputType::Chat))
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        manager.send_message(&session, step_id, "One"),
        manager.send_message(&session, step_id, "Two"),
    );

    assert!(first.is_ok());
    assert_eq!(second.unwrap_err().code, ErrorCode::RequestInFlight);
    assert_eq!(ai.call_count(), 1);

    // The slot is released once the first send completes.
    assert!(manager.send_message(&session, step_id, "Three").await.is_ok());
}

#[tokio::test]
async fn different_steps_send_concurrently() {
    let ai = Arc::new(MockAIProvider::new().with_delay(Duration::from_millis(20)));
    let (mut session, _) = active_session(ai.clone()).await;
    let manager = CustomStepManager::new(ai.clone());
    let a = manager
        .create(&mut session, CustomStepDraft::new("Vendor Scan", OutputType::Chat))
        .await
        .unwrap();
    let b = manager
        .create(&mut session, CustomStepDraft::new("Policy Check", OutputType::Chat))
        .await
        .unwrap();

    let (ra, rb) = tokio::join!(
        manager.send_message(&session, a, "Hello"),
        manager.send_message(&session, b, "Hello"),
    );

    assert!(ra.is_ok());
    assert!(rb.is_ok());
    assert_eq!(ai.call_count(), 2);
}

// =============================================================================
// Tabular and presentation outputs
// =============================================================================

#[tokio::test]
async fn risk_review_csv_resolves_source_labels() {
    let ai = Arc::new(MockAIProvider::new());
    let (mut session, _) = active_session(ai.clone()).await;
    let manager = CustomStepManager::new(ai);

    let note_id = session
        .add_kickoff_note("kickoff.txt", "Risk register is out of date")
        .await
        .unwrap();
    let (meeting_id, _) = session
        .add_meeting(
            FunctionalStage::HighLevel,
            MeetingDraft::new("Risk workshop", "Finance", "Controlling").with_notes("Fraud checks"),
            Vec::new(),
        )
        .await
        .unwrap();

    let step_id = manager
        .create(
            &mut session,
            CustomStepDraft::new("Risk Review", OutputType::Tabular)
                .with_model("model-x")
                .with_prompt("List \"open\" risks")
                .with_documents(vec![note_id.to_string(), "missing".to_string()])
                .with_transcripts(vec![meeting_id.to_string()]),
        )
        .await
        .unwrap();

    let export = manager.export_csv(&session, step_id).unwrap();

    assert_eq!(export.file_name, "risk-review.csv");
    let lines: Vec<&str> = export.content.lines().collect();
    assert_eq!(lines[0], r#""Field","Value""#);
    assert_eq!(lines[1], r#""Title","Risk Review""#);
    assert_eq!(lines[5], r#""Prompt","List ""open"" risks""#);
    assert_eq!(lines[6], r#""Documents","kickoff.txt""#);
    assert_eq!(lines[7], r#""Transcripts","Risk workshop""#);
    assert!(manager.render_outline(&session, step_id).is_err());
}

#[tokio::test]
async fn presentation_outline_lists_sections() {
    let ai = Arc::new(MockAIProvider::new());
    let (mut session, _) = active_session(ai.clone()).await;
    let manager = CustomStepManager::new(ai);
    let step_id = manager
        .create(
            &mut session,
            CustomStepDraft::new("Board Deck", OutputType::Presentation)
                .with_description("Summarize the engagement for the board"),
        )
        .await
        .unwrap();

    let outline = manager.render_outline(&session, step_id).unwrap();

    for section in ["## Objective", "## Prompt", "## Source Documents", "## Source Transcripts", "## Suggested Output"] {
        assert!(outline.contains(section), "missing {}", section);
    }
    assert!(outline.contains("Summarize the engagement for the board"));
    assert_eq!(
        manager.export_csv(&session, step_id).unwrap_err().code,
        ErrorCode::UnsupportedOutputType
    );
}
