//! HypothesisBuilder - stage-specific recommendations for a journey.

use crate::domain::catalog::CandidatePool;
use crate::domain::recommendation::{merge_ranked, Recommendation, RecommendationEngine, Tokenizer};

use super::{FunctionalStage, Journey, Organization, SelectionPhase};

/// Builds hypothesis lists from a journey's notes and selections.
///
/// | Stage     | Notes                      | Domains                      | Pool                         |
/// |-----------|----------------------------|------------------------------|------------------------------|
/// | HighLevel | kickoff notes              | targeting                    | full pool                    |
/// | DeepDive  | high-level meeting notes   | deep dive, else targeting    | targeting use-cases, if any  |
///
/// Selected use-cases of the stage are scored and listed ahead of fresh
/// recommendations before the merge.
pub struct HypothesisBuilder;

impl HypothesisBuilder {
    pub fn build(
        journey: &Journey,
        organization: &Organization,
        pool: &CandidatePool,
        engine: &RecommendationEngine,
        stage: FunctionalStage,
    ) -> Vec<Recommendation> {
        let notes = journey.hypothesis_notes(stage);
        let targeting_domains = journey.effective_domains(SelectionPhase::Targeting, organization);

        let (domains, stage_pool) = match stage {
            FunctionalStage::HighLevel => (targeting_domains, pool.clone()),
            FunctionalStage::DeepDive => {
                let deep_dive = journey.effective_domains(SelectionPhase::DeepDive, organization);
                let domains = if deep_dive.is_empty() {
                    targeting_domains
                } else {
                    deep_dive
                };
                let targeted = journey.effective_use_cases(SelectionPhase::Targeting, organization);
                let restricted = pool.restricted_to(&targeted);
                let stage_pool = if restricted.is_empty() {
                    pool.clone()
                } else {
                    restricted
                };
                (domains, stage_pool)
            }
        };

        let note_tokens = Tokenizer::tokenize(&notes);
        let selected: Vec<Recommendation> = journey
            .effective_use_cases(stage.selection_phase(), organization)
            .iter()
            .filter_map(|id| pool.get(id))
            .map(|uc| RecommendationEngine::score_item(&note_tokens, uc))
            .collect();
        let fresh = engine.recommend(&notes, &domains, stage_pool.items());

        merge_ranked(&[&selected[..], &fresh[..]])
    }

    /// Distinct domains of a hypothesis list in first-seen order.
    pub fn recommended_domains(hypotheses: &[Recommendation]) -> Vec<String> {
        let mut domains: Vec<String> = Vec::new();
        for rec in hypotheses {
            if !domains.contains(&rec.domain) {
                domains.push(rec.domain.clone());
            }
        }
        domains
    }
}
