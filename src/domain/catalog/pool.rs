//! CandidatePool - library and organization use-cases merged by id.

use std::collections::HashMap;

use crate::domain::foundation::UseCaseId;

use super::UseCase;

/// Ordered, id-unique collection of candidate use-cases.
///
/// Pool order is significant: the recommendation engine preserves it
/// within each domain bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePool {
    items: Vec<UseCase>,
    index: HashMap<UseCaseId, usize>,
}

impl CandidatePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges library items then organization-authored items.
    ///
    /// An id present in both sources collapses to the first entry seen.
    pub fn merge(library: Vec<UseCase>, authored: Vec<UseCase>) -> Self {
        library.into_iter().chain(authored).collect()
    }

    /// Adds an item unless its id is already present. Returns true if added.
    pub fn insert(&mut self, use_case: UseCase) -> bool {
        if self.index.contains_key(&use_case.id) {
            return false;
        }
        self.index.insert(use_case.id.clone(), self.items.len());
        self.items.push(use_case);
        true
    }

    /// Returns items in pool order.
    pub fn items(&self) -> &[UseCase] {
        &self.items
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &UseCaseId) -> Option<&UseCase> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    /// Returns the domain of a known item.
    pub fn domain_of(&self, id: &UseCaseId) -> Option<&str> {
        self.get(id).map(|uc| uc.domain.as_str())
    }

    /// Distinct domains in first-seen order.
    pub fn domains(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for uc in &self.items {
            if !seen.contains(&uc.domain) {
                seen.push(uc.domain.clone());
            }
        }
        seen
    }

    /// Restricts the pool to the given ids, keeping pool order.
    pub fn restricted_to(&self, ids: &[UseCaseId]) -> CandidatePool {
        self.items
            .iter()
            .filter(|uc| ids.contains(&uc.id))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<UseCase> for CandidatePool {
    fn from_iter<I: IntoIterator<Item = UseCase>>(iter: I) -> Self {
        let mut pool = CandidatePool::new();
        for uc in iter {
            pool.insert(uc);
        }
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uc(id: &str, title: &str, domain: &str) -> UseCase {
        UseCase::new(id, title, domain).unwrap()
    }

    #[test]
    fn merge_collapses_duplicate_ids_keeping_library_entry() {
        let library = vec![uc("uc-1", "Library title", "Finance")];
        let authored = vec![
            uc("uc-1", "Authored title", "Finance").authored(),
            uc("uc-2", "Custom bot", "Sales").authored(),
        ];

        let pool = CandidatePool::merge(library, authored);

        assert_eq!(pool.len(), 2);
        let first = pool.get(&UseCaseId::new("uc-1").unwrap()).unwrap();
        assert_eq!(first.title, "Library title");
    }

    #[test]
    fn domains_preserve_first_seen_order() {
        let pool: CandidatePool = vec![
            uc("a", "A", "Sales"),
            uc("b", "B", "Finance"),
            uc("c", "C", "Sales"),
            uc("d", "D", "HR"),
        ]
        .into_iter()
        .collect();

        assert_eq!(pool.domains(), vec!["Sales", "Finance", "HR"]);
    }

    #[test]
    fn restricted_to_keeps_pool_order() {
        let pool: CandidatePool = vec![
            uc("a", "A", "Sales"),
            uc("b", "B", "Finance"),
            uc("c", "C", "Sales"),
        ]
        .into_iter()
        .collect();
        let ids = vec![UseCaseId::new("c").unwrap(), UseCaseId::new("a").unwrap()];

        let restricted = pool.restricted_to(&ids);
        let order: Vec<&str> = restricted.items().iter().map(|u| u.id.as_str()).collect();

        assert_eq!(order, vec!["a", "c"]);
    }

    #[test]
    fn domain_of_unknown_id_is_none() {
        let pool = CandidatePool::new();
        assert!(pool.domain_of(&UseCaseId::new("ghost").unwrap()).is_none());
    }
}
