//! Designated search fields and relevance scoring.
//!
//! Every content schema declares which of its fields take part in search,
//! usually through `#[derive(Searchable)]`. Repositories scan those fields
//! for case-insensitive substring matches and, for ranked search, sum the
//! weights of the fields that matched.

use serde::Serialize;
use std::cmp::Ordering;

/// Field weights used by the scored full-text search.
///
/// Only the ordering matters: identity and name fields outrank the id,
/// which outranks long-form text, which outranks list elements.
pub mod weights {
    /// Display names (English and localized).
    pub const NAME: u32 = 8;
    /// The entry's own id slug.
    pub const IDENTIFIER: u32 = 6;
    /// Short fields that characterize an entry (category, codes, significance).
    pub const SIGNIFICANCE: u32 = 4;
    /// Long-form prose: descriptions, explanations, summaries.
    pub const DESCRIPTION: u32 = 2;
    /// Any element of a list field.
    pub const LIST: u32 = 1;
}

/// The text held by one designated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(&'a [String]),
    Empty,
}

impl<'a> FieldValue<'a> {
    /// Check whether this field contains an already case-folded needle.
    ///
    /// List fields match when any element contains the needle.
    pub fn contains_folded(&self, needle: &str) -> bool {
        match self {
            FieldValue::Text(text) => text.to_lowercase().contains(needle),
            FieldValue::List(items) => items.iter().any(|item| item.to_lowercase().contains(needle)),
            FieldValue::Empty => false,
        }
    }
}

/// Conversion from a struct field into a searchable value.
pub trait AsFieldValue {
    fn as_field_value(&self) -> FieldValue<'_>;
}

impl AsFieldValue for String {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

impl AsFieldValue for str {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::Text(self)
    }
}

impl AsFieldValue for Vec<String> {
    fn as_field_value(&self) -> FieldValue<'_> {
        FieldValue::List(self)
    }
}

impl<T: AsFieldValue> AsFieldValue for Option<T> {
    fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            Some(inner) => inner.as_field_value(),
            None => FieldValue::Empty,
        }
    }
}

/// One designated field of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchField<'a> {
    /// Field name, used by field-scoped search.
    pub name: &'static str,
    /// Weight added to the relevance score when this field matches.
    pub weight: u32,
    pub value: FieldValue<'a>,
}

impl<'a> SearchField<'a> {
    pub fn new(name: &'static str, weight: u32, value: FieldValue<'a>) -> Self {
        Self { name, weight, value }
    }
}

/// A type whose entries can be searched by substring.
pub trait Searchable {
    /// All designated fields, in declaration order.
    fn search_fields(&self) -> Vec<SearchField<'_>>;

    /// Check whether any designated field contains the case-folded query.
    fn matches_folded(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.value.contains_folded(needle))
    }

    /// Check whether the named field contains the case-folded query.
    fn field_matches_folded(&self, field_name: &str, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .filter(|field| field.name == field_name)
            .any(|field| field.value.contains_folded(needle))
    }

    /// Sum the weights of every designated field containing the case-folded query.
    fn score_folded(&self, needle: &str) -> u32 {
        self.search_fields()
            .iter()
            .filter(|field| field.value.contains_folded(needle))
            .map(|field| field.weight)
            .sum()
    }
}

/// Case-fold a raw query. No trimming or other sanitizing is applied.
pub fn fold_query(query: &str) -> String {
    query.to_lowercase()
}

/// An entry paired with its relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoredEntry<T> {
    pub entry: T,
    pub score: u32,
}

/// Order scored results: score descending, then id ascending.
pub(crate) fn compare_scored(a_score: u32, a_id: &str, b_score: u32, b_id: &str) -> Ordering {
    b_score.cmp(&a_score).then_with(|| a_id.cmp(b_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Searchable;

    #[derive(Searchable)]
    struct Sample {
        #[search(weight = weights::IDENTIFIER)]
        id: String,
        #[search(weight = weights::NAME)]
        name: String,
        #[search(weight = weights::LIST, rename = "symptom")]
        symptoms: Vec<String>,
        #[search]
        note: Option<String>,
        #[search(flatten)]
        nested: Nested,
        #[allow(dead_code)]
        hidden: String,
    }

    #[derive(Searchable)]
    struct Nested {
        #[search(weight = weights::SIGNIFICANCE)]
        code: String,
    }

    fn sample() -> Sample {
        Sample {
            id: "anemia".to_string(),
            name: "Iron Deficiency Anemia".to_string(),
            symptoms: vec!["Fatigue".to_string(), "Pallor".to_string()],
            note: None,
            nested: Nested {
                code: "3A00".to_string(),
            },
            hidden: "secret word".to_string(),
        }
    }

    #[test]
    fn test_derive_generates_fields_in_order() {
        let s = sample();
        let names: Vec<_> = s.search_fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["id", "name", "symptom", "note", "code"]);
    }

    #[test]
    fn test_bare_attribute_uses_description_weight() {
        let s = sample();
        let fields = s.search_fields();
        let note = fields.iter().find(|f| f.name == "note").expect("note field");
        assert_eq!(note.weight, weights::DESCRIPTION);
        assert_eq!(note.value, FieldValue::Empty);
    }

    #[test]
    fn test_undesignated_fields_are_not_searched() {
        let s = sample();
        assert!(!s.matches_folded("secret"));
    }

    #[test]
    fn test_list_field_matches_any_element() {
        let s = sample();
        assert!(s.matches_folded("pallor"));
        assert!(s.field_matches_folded("symptom", "fatig"));
        assert!(!s.field_matches_folded("name", "fatig"));
    }

    #[test]
    fn test_score_sums_matching_weights() {
        let s = sample();
        // "anemia" hits both id and name
        assert_eq!(s.score_folded("anemia"), weights::IDENTIFIER + weights::NAME);
        assert_eq!(s.score_folded("3a00"), weights::SIGNIFICANCE);
        assert_eq!(s.score_folded("nothing"), 0);
    }

    #[test]
    fn test_fold_query_keeps_punctuation_and_spaces() {
        assert_eq!(fold_query("  LeukEmia, ALL "), "  leukemia, all ");
    }

    #[test]
    fn test_compare_scored_breaks_ties_by_id() {
        assert_eq!(compare_scored(5, "b", 3, "a"), Ordering::Less);
        assert_eq!(compare_scored(3, "a", 3, "b"), Ordering::Less);
        assert_eq!(compare_scored(3, "b", 3, "a"), Ordering::Greater);
    }

    #[test]
    fn test_weight_ordering() {
        assert!(weights::NAME > weights::IDENTIFIER);
        assert!(weights::IDENTIFIER > weights::SIGNIFICANCE);
        assert!(weights::SIGNIFICANCE > weights::DESCRIPTION);
        assert!(weights::DESCRIPTION > weights::LIST);
    }
}
