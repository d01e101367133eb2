//! Merging of ranked candidate lists.

use std::collections::HashSet;

use crate::domain::foundation::UseCaseId;

use super::Recommendation;

/// An entry that can take part in `merge_ranked`.
pub trait Ranked {
    fn rank_key(&self) -> &UseCaseId;

    /// `None` means the entry was never scored and is discarded on merge.
    fn rank_score(&self) -> Option<u32>;
}

impl Ranked for Recommendation {
    fn rank_key(&self) -> &UseCaseId {
        &self.use_case_id
    }

    fn rank_score(&self) -> Option<u32> {
        Some(self.score)
    }
}

/// Concatenates `passes` in order, drops unscored entries, keeps only the
/// first occurrence of each key, then stable-sorts by score descending.
///
/// Earlier passes win on duplicates, so callers put the operator's
/// selections first and fresh recommendations after them.
pub fn merge_ranked<T: Ranked + Clone>(passes: &[&[T]]) -> Vec<T> {
    let mut seen: HashSet<&UseCaseId> = HashSet::new();
    let mut merged = Vec::new();

    for entry in passes.iter().flat_map(|pass| pass.iter()) {
        if entry.rank_score().is_none() {
            continue;
        }
        if seen.insert(entry.rank_key()) {
            merged.push(entry.clone());
        }
    }
    merged.sort_by(|a, b| b.rank_score().cmp(&a.rank_score()));
    merged
}
