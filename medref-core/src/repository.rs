//! In-memory content repositories and their query interface.
//!
//! A [`Repository`] holds the entries of one content domain in authoring
//! order, with an id index for constant-time lookup. It is built once and
//! never mutated, so a `&'static Repository` behind a `LazyLock` can be read
//! from any thread without coordination.

use crate::config::{EmptyQueryPolicy, QueryConfig};
use crate::entry::Entry;
use crate::search::{compare_scored, fold_query, ScoredEntry, Searchable};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors from building a repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Key '{key}' does not match entry id '{id}'")]
    KeyMismatch { key: String, id: String },
}

/// An immutable, insertion-ordered collection of entries keyed by id.
#[derive(Debug, Clone)]
pub struct Repository<E> {
    entries: Vec<E>,
    index: HashMap<String, usize>,
    config: QueryConfig,
}

impl<E: Entry> Repository<E> {
    /// Build a repository from an ordered list, keying each entry by its own id.
    ///
    /// A later entry with an already-seen id replaces the earlier one but
    /// keeps the earlier position.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        let mut repo = Self {
            entries: Vec::new(),
            index: HashMap::new(),
            config: QueryConfig::default(),
        };

        for entry in entries {
            repo.insert(entry);
        }

        tracing::debug!(entries = repo.entries.len(), "built content repository");
        repo
    }

    /// Build a repository from an already-keyed literal.
    ///
    /// Every key must equal the id of the entry stored under it.
    pub fn from_keyed<I, K>(pairs: I) -> Result<Self, RepositoryError>
    where
        I: IntoIterator<Item = (K, E)>,
        K: AsRef<str>,
    {
        let mut entries = Vec::new();
        for (key, entry) in pairs {
            if key.as_ref() != entry.id() {
                return Err(RepositoryError::KeyMismatch {
                    key: key.as_ref().to_string(),
                    id: entry.id().to_string(),
                });
            }
            entries.push(entry);
        }
        Ok(Self::from_entries(entries))
    }

    fn insert(&mut self, entry: E) {
        match self.index.get(entry.id()) {
            Some(&position) => {
                tracing::warn!(id = entry.id(), "duplicate content id, replacing earlier entry");
                self.entries[position] = entry;
            }
            None => {
                self.index.insert(entry.id().to_string(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Set the query configuration.
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the query configuration.
    pub fn config(&self) -> QueryConfig {
        self.config
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&E> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    /// Check whether an id is present.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in repository order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    /// Iterate ids in repository order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.id())
    }

    /// All entries matching a predicate, in repository order.
    pub fn filter<P>(&self, predicate: P) -> Vec<&E>
    where
        P: Fn(&E) -> bool,
    {
        self.entries.iter().filter(|e| predicate(e)).collect()
    }

    /// All entries whose category is one of `categories`, in repository order.
    ///
    /// No categories means no results.
    pub fn filter_by_category(&self, categories: &[E::Category]) -> Vec<&E> {
        let wanted: HashSet<E::Category> = categories.iter().copied().collect();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.filter(|e| wanted.contains(&e.category()))
    }

    /// Distinct categories that have at least one entry, in first-appearance order.
    pub fn categories(&self) -> Vec<E::Category> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|e| e.category())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

impl<E: Entry + Searchable> Repository<E> {
    /// Case-insensitive substring search over every designated field.
    ///
    /// Results are in repository order, not ranked.
    pub fn search(&self, query: &str) -> Vec<&E> {
        self.search_with(self.config, query)
    }

    /// [`search`](Self::search) under `config` instead of the repository's own.
    pub fn search_with(&self, config: QueryConfig, query: &str) -> Vec<&E> {
        if query.is_empty() && config.empty_query == EmptyQueryPolicy::MatchNone {
            return Vec::new();
        }
        let needle = fold_query(query);
        self.filter(|e| e.matches_folded(&needle))
    }

    /// Case-insensitive substring search restricted to one designated field.
    ///
    /// An unknown field name matches nothing.
    pub fn filter_by_field(&self, field: &str, query: &str) -> Vec<&E> {
        self.filter_by_field_with(self.config, field, query)
    }

    pub fn filter_by_field_with(&self, config: QueryConfig, field: &str, query: &str) -> Vec<&E> {
        if query.is_empty() && config.empty_query == EmptyQueryPolicy::MatchNone {
            return Vec::new();
        }
        let needle = fold_query(query);
        self.filter(|e| e.field_matches_folded(field, &needle))
    }

    /// Scored search: entries with a non-zero score, best first.
    ///
    /// Equal scores are ordered by id. An empty query ranks nothing.
    pub fn ranked(&self, query: &str) -> Vec<ScoredEntry<&E>> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = fold_query(query);

        let mut scored: Vec<ScoredEntry<&E>> = self
            .entries
            .iter()
            .map(|entry| ScoredEntry {
                entry,
                score: entry.score_folded(&needle),
            })
            .filter(|s| s.score > 0)
            .collect();

        scored.sort_by(|a, b| compare_scored(a.score, a.entry.id(), b.score, b.entry.id()));
        scored
    }

    /// Scored full-text search returning entries only, best first.
    pub fn full_text_search(&self, query: &str) -> Vec<&E> {
        self.ranked(query).into_iter().map(|s| s.entry).collect()
    }
}

impl<E: Entry> FromIterator<E> for Repository<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<'a, E> IntoIterator for &'a Repository<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_repository, TestEntry, TestKind};

    #[test]
    fn test_get_by_id() {
        let repo = sample_repository();
        let entry = repo.get("beta-one").expect("beta-one should exist");
        assert_eq!(entry.name, "Beta One");
        assert!(repo.get("missing").is_none());
    }

    #[test]
    fn test_keys_match_ids() {
        let repo = sample_repository();
        for id in repo.ids() {
            assert_eq!(repo.get(id).map(|e| e.id()), Some(id));
        }
    }

    #[test]
    fn test_duplicate_replaces_in_place() {
        let repo = Repository::from_entries(vec![
            TestEntry::new("a", "First A", TestKind::Alpha),
            TestEntry::new("b", "B", TestKind::Beta),
            TestEntry::new("a", "Second A", TestKind::Gamma),
        ]);
        assert_eq!(repo.count(), 2);
        let ids: Vec<_> = repo.ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(repo.get("a").map(|e| e.name.as_str()), Some("Second A"));
    }

    #[test]
    fn test_from_keyed_rejects_mismatch() {
        let err = Repository::from_keyed(vec![("wrong", TestEntry::new("right", "R", TestKind::Alpha))])
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::KeyMismatch {
                key: "wrong".to_string(),
                id: "right".to_string()
            }
        );

        let ok = Repository::from_keyed(vec![("right", TestEntry::new("right", "R", TestKind::Alpha))])
            .expect("matching keys build");
        assert!(ok.contains("right"));
    }

    #[test]
    fn test_filter_by_category() {
        let repo = sample_repository();
        let betas: Vec<_> = repo.filter_by_category(&[TestKind::Beta]).iter().map(|e| e.id()).collect();
        assert_eq!(betas, vec!["beta-one", "beta-two"]);
        assert!(repo.filter_by_category(&[]).is_empty());
    }

    #[test]
    fn test_categories_present_only() {
        let repo = Repository::from_entries(vec![
            TestEntry::new("x", "X", TestKind::Gamma),
            TestEntry::new("y", "Y", TestKind::Alpha),
            TestEntry::new("z", "Z", TestKind::Gamma),
        ]);
        assert_eq!(repo.categories(), vec![TestKind::Gamma, TestKind::Alpha]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_ordered() {
        let repo = sample_repository();
        let hits: Vec<_> = repo.search("BETA").iter().map(|e| e.id()).collect();
        assert_eq!(hits, vec!["beta-one", "beta-two"]);
    }

    #[test]
    fn test_empty_query_policy() {
        let repo = sample_repository();
        assert_eq!(repo.search("").len(), repo.count());

        let strict = sample_repository()
            .with_config(QueryConfig::new().with_empty_query(EmptyQueryPolicy::MatchNone));
        assert!(strict.search("").is_empty());
        assert!(strict.filter_by_field("name", "").is_empty());
    }

    #[test]
    fn test_search_with_overrides_config() {
        let repo = sample_repository();
        let none = QueryConfig::new().with_empty_query(EmptyQueryPolicy::MatchNone);
        assert!(repo.search_with(none, "").is_empty());
        assert!(repo.filter_by_field_with(none, "name", "").is_empty());
        assert_eq!(repo.search_with(none, "beta").len(), 2);

        // the repository's own config is untouched
        assert_eq!(repo.config(), QueryConfig::default());
        assert_eq!(repo.search("").len(), repo.count());
    }

    #[test]
    fn test_ranked_orders_by_score_then_id() {
        let repo = sample_repository();
        let ranked = repo.ranked("shared");
        assert!(!ranked.is_empty());
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(pair[0].entry.id() < pair[1].entry.id());
            }
        }
        assert!(repo.ranked("").is_empty());
        assert!(repo.ranked("zzz-no-match").is_empty());
    }

    #[test]
    fn test_filter_by_field_unknown_field() {
        let repo = sample_repository();
        assert!(repo.filter_by_field("no-such-field", "beta").is_empty());
        assert_eq!(repo.filter_by_field("name", "alpha").len(), 1);
    }
}
