//! RecommendationEngine - ranks candidate use-cases against note text.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::UseCase;
use crate::domain::foundation::UseCaseId;

use super::{TokenSet, Tokenizer};

/// How many matched tokens an explanation cites at most.
const MAX_CITED_TOKENS: usize = 4;

/// A ranked, explained candidate. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub domain: String,
    pub use_case_id: UseCaseId,
    pub use_case_title: String,
    /// The use-case's process within its domain.
    pub function_name: String,
    pub explanation: String,
    pub score: u32,
}

/// Bucket and result caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationLimits {
    pub per_domain_cap: usize,
    pub result_cap: usize,
}

impl Default for RecommendationLimits {
    fn default() -> Self {
        Self {
            per_domain_cap: 8,
            result_cap: 12,
        }
    }
}

/// Heuristic lexical scorer.
///
/// Every function here is pure: the same notes, domains and pool always
/// produce the same list, so callers recompute freely on every note edit.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    limits: RecommendationLimits,
}

impl RecommendationEngine {
    pub fn new(limits: RecommendationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> RecommendationLimits {
        self.limits
    }

    /// Ranks `pool` against `note_text` using the configured caps.
    pub fn recommend(
        &self,
        note_text: &str,
        prioritized_domains: &[String],
        pool: &[UseCase],
    ) -> Vec<Recommendation> {
        Self::recommend_with(note_text, prioritized_domains, pool, self.limits)
    }

    /// Ranks `pool` against `note_text`.
    ///
    /// # Algorithm
    /// 1. No significant note tokens: empty result.
    /// 2. Domain order is `prioritized_domains`, or the pool's domains in
    ///    first-seen order when none are given.
    /// 3. Each domain contributes up to `per_domain_cap` items in pool order.
    /// 4. score = |tokens(title + process + description) ∩ tokens(notes)|
    /// 5. Stable sort by score descending, truncate to `result_cap`.
    ///
    /// Zero-score items stay in the list with a generic explanation.
    pub fn recommend_with(
        note_text: &str,
        prioritized_domains: &[String],
        pool: &[UseCase],
        limits: RecommendationLimits,
    ) -> Vec<Recommendation> {
        let note_tokens = Tokenizer::tokenize(note_text);
        if note_tokens.is_empty() {
            return Vec::new();
        }

        let mut ranked: Vec<Recommendation> = Self::domain_order(prioritized_domains, pool)
            .iter()
            .flat_map(|domain| {
                pool.iter()
                    .filter(move |uc| uc.domain == *domain)
                    .take(limits.per_domain_cap)
            })
            .map(|uc| Self::score_item(&note_tokens, uc))
            .collect();

        // sort_by is stable: ties keep domain priority, then pool order.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(limits.result_cap);
        ranked
    }

    /// Scores and explains one candidate against tokenized notes.
    pub fn score_item(note_tokens: &TokenSet, use_case: &UseCase) -> Recommendation {
        let matched: Vec<String> = Tokenizer::tokens_in_order(&use_case.searchable_text())
            .into_iter()
            .filter(|token| note_tokens.contains(token))
            .collect();

        let explanation = if matched.is_empty() {
            format!(
                "Aligned with the prioritized {} domain; the notes do not mention it directly yet.",
                use_case.domain
            )
        } else {
            let cited: Vec<&str> = matched
                .iter()
                .take(MAX_CITED_TOKENS)
                .map(String::as_str)
                .collect();
            format!(
                "Notes repeatedly reference {}, which aligns with this item.",
                cited.join(", ")
            )
        };

        Recommendation {
            domain: use_case.domain.clone(),
            use_case_id: use_case.id.clone(),
            use_case_title: use_case.title.clone(),
            function_name: use_case.process.clone(),
            explanation,
            score: matched.len() as u32,
        }
    }

    fn domain_order(prioritized_domains: &[String], pool: &[UseCase]) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        let requested = prioritized_domains
            .iter()
            .map(|d| d.trim())
            .filter(|d| !d.is_empty());
        for domain in requested {
            if !order.iter().any(|d| d == domain) {
                order.push(domain.to_string());
            }
        }
        if !order.is_empty() {
            return order;
        }

        for uc in pool {
            if !order.contains(&uc.domain) {
                order.push(uc.domain.clone());
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn uc(id: &str, title: &str, domain: &str, description: &str) -> UseCase {
        UseCase::new(id, title, domain)
            .unwrap()
            .with_description(description)
    }

    fn sample_pool() -> Vec<UseCase> {
        vec![
            uc("fin-1", "Invoice Processing Automation", "Finance", "Capture invoices"),
            uc("fin-2", "Expense Audit", "Finance", "Flag unusual expenses"),
            uc("sal-1", "Lead Scoring", "Sales", "Rank inbound leads"),
            uc("sal-2", "Quote Generation", "Sales", "Draft quotes from CRM data"),
            uc("hr-1", "Resume Screening", "HR", "Shortlist candidates"),
        ]
    }

    fn domains(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_notes_yield_no_recommendations() {
        let recs = RecommendationEngine::default().recommend("", &domains(&["Finance"]), &sample_pool());
        assert!(recs.is_empty());
    }

    #[test]
    fn stop_word_only_notes_yield_no_recommendations() {
        let recs = RecommendationEngine::default().recommend("the meeting notes", &[], &sample_pool());
        assert!(recs.is_empty());
    }

    #[test]
    fn exact_keyword_hit_scores_and_is_cited() {
        let recs = RecommendationEngine::default().recommend(
            "we discussed invoice automation extensively",
            &[],
            &sample_pool(),
        );

        let top = &recs[0];
        assert_eq!(top.use_case_id.as_str(), "fin-1");
        assert!(top.score > 0);
        assert!(top.explanation.contains("invoice"));
        assert!(top.explanation.contains("automation"));
    }

    #[test]
    fn zero_score_items_are_kept_and_ranked_last() {
        let recs = RecommendationEngine::default().recommend("invoice", &[], &sample_pool());

        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0].use_case_id.as_str(), "fin-1");
        assert!(recs[1..].iter().all(|r| r.score == 0));
        assert!(recs[1].explanation.contains("domain"));
    }

    #[test]
    fn prioritized_domains_filter_and_order_buckets() {
        let recs = RecommendationEngine::default().recommend(
            "pipeline review",
            &domains(&["Sales", "HR"]),
            &sample_pool(),
        );

        let ids: Vec<&str> = recs.iter().map(|r| r.use_case_id.as_str()).collect();
        assert_eq!(ids, vec!["sal-1", "sal-2", "hr-1"]);
    }

    #[test]
    fn duplicate_prioritized_domains_do_not_duplicate_items() {
        let recs = RecommendationEngine::default().recommend(
            "leads",
            &domains(&["Sales", " Sales ", ""]),
            &sample_pool(),
        );
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn derived_domain_order_follows_pool() {
        let recs = RecommendationEngine::default().recommend("unrelated words", &[], &sample_pool());
        let domains: Vec<&str> = recs.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(domains, vec!["Finance", "Finance", "Sales", "Sales", "HR"]);
    }

    #[test]
    fn per_domain_cap_limits_each_bucket() {
        let limits = RecommendationLimits {
            per_domain_cap: 1,
            result_cap: 12,
        };
        let recs = RecommendationEngine::recommend_with("quotes", &[], &sample_pool(), limits);

        // fin-1, sal-1 (quote generation is second in its bucket and dropped), hr-1
        let ids: Vec<&str> = recs.iter().map(|r| r.use_case_id.as_str()).collect();
        assert_eq!(ids, vec!["fin-1", "sal-1", "hr-1"]);
    }

    #[test]
    fn result_cap_truncates_after_sorting() {
        let limits = RecommendationLimits {
            per_domain_cap: 8,
            result_cap: 1,
        };
        let recs = RecommendationEngine::recommend_with("resume candidates", &[], &sample_pool(), limits);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].use_case_id.as_str(), "hr-1");
    }

    #[test]
    fn higher_overlap_ranks_first_within_domain() {
        let pool = vec![
            uc("a", "Payroll", "HR", "monthly payroll"),
            uc("b", "Payroll Compliance Audit", "HR", "payroll compliance audit trail"),
        ];
        let recs = RecommendationEngine::default().recommend("payroll compliance audit", &[], &pool);

        assert_eq!(recs[0].use_case_id.as_str(), "b");
        assert_eq!(recs[0].score, 3);
        assert_eq!(recs[1].score, 1);
    }

    #[test]
    fn explanation_cites_at_most_four_tokens() {
        let pool = vec![uc(
            "x",
            "alpha bravo charlie delta echo foxtrot",
            "Ops",
            "",
        )];
        let recs = RecommendationEngine::default()
            .recommend("alpha bravo charlie delta echo foxtrot", &[], &pool);

        assert_eq!(recs[0].score, 6);
        assert!(recs[0].explanation.contains("alpha, bravo, charlie, delta"));
        assert!(!recs[0].explanation.contains("echo"));
    }

    #[test]
    fn function_name_is_the_process() {
        let pool = vec![UseCase::new("p", "Invoice capture", "Finance")
            .unwrap()
            .with_process("Accounts Payable")];
        let recs = RecommendationEngine::default().recommend("invoice", &[], &pool);
        assert_eq!(recs[0].function_name, "Accounts Payable");
    }

    proptest! {
        #[test]
        fn recommend_is_pure(notes in "[a-z ]{0,80}") {
            let engine = RecommendationEngine::default();
            let pool = sample_pool();
            let first = engine.recommend(&notes, &[], &pool);
            let second = engine.recommend(&notes, &[], &pool);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn scores_never_increase_down_the_list(notes in "[a-z ]{0,80}") {
            let recs = RecommendationEngine::default().recommend(&notes, &[], &sample_pool());
            for pair in recs.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }
}
