//! QA tests for the oncology repository.
//!
//! These exercise the query interface against the built-in oncology entries:
//! lookup, substring search, category filtering and ranked search.

use medref_core::content::oncology::{
    filter_oncology_by_category, full_text_search_oncology, get_oncology_condition,
    oncology_condition_count, oncology_repository, ranked_oncology, search_oncology,
    OncologyCategory,
};
use medref_core::search::fold_query;
use medref_core::{Entry, Searchable};

const QUERIES: &[&str] = &["leukemia", "LYMPH", "biopsy", "pet/ct", "cáncer", "zzz", "a", "2c"];

fn ids<E: Entry>(entries: &[&E]) -> Vec<String> {
    entries.iter().map(|e| e.id().to_string()).collect()
}

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn test_breast_cancer_lookup() {
    let entry = get_oncology_condition("breast-cancer").expect("breast-cancer should exist");
    assert_eq!(entry.category, OncologyCategory::SolidTumor);
    assert_eq!(entry.category.to_string(), "solid-tumor");
    assert_eq!(entry.icd11, "2C60");
}

#[test]
fn test_missing_id_is_absent() {
    assert!(get_oncology_condition("nonexistent").is_none());
}

#[test]
fn test_mixed_case_search_finds_leukemia() {
    let hits = ids(&search_oncology("LeukEmia"));
    assert!(hits.contains(&"all-leukemia".to_string()));
}

#[test]
fn test_hematologic_filter() {
    let hits = ids(&filter_oncology_by_category(&[OncologyCategory::Hematologic]));
    assert_eq!(hits, vec!["all-leukemia", "nhl-lymphoma"]);
}

#[test]
fn test_breast_ranks_first() {
    let ranked = ranked_oncology("breast");
    assert_eq!(ranked[0].entry.id, "breast-cancer");
    for other in &ranked[1..] {
        assert!(ranked[0].score > other.score);
    }
    let plain = full_text_search_oncology("breast");
    assert_eq!(plain[0].id, "breast-cancer");
}

#[test]
fn test_condition_count() {
    assert_eq!(oncology_condition_count(), 6);
    let ids: Vec<_> = oncology_repository().ids().collect();
    assert_eq!(
        ids,
        vec![
            "breast-cancer",
            "lung-cancer-nsclc",
            "colorectal-cancer",
            "prostate-cancer",
            "all-leukemia",
            "nhl-lymphoma",
        ]
    );
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_lookup_returns_equal_entry() {
    let repo = oncology_repository();
    for entry in repo {
        assert_eq!(repo.get(&entry.id), Some(entry));
        assert_eq!(entry.id(), entry.id);
    }
}

#[test]
fn test_search_is_sound_and_complete() {
    let repo = oncology_repository();
    for query in QUERIES {
        let needle = fold_query(query);
        let hits = ids(&search_oncology(query));

        for entry in repo {
            let matched = entry
                .search_fields()
                .iter()
                .any(|field| field.value.contains_folded(&needle));
            assert_eq!(
                hits.contains(&entry.id),
                matched,
                "query {:?} disagrees with fields of {}",
                query,
                entry.id
            );
        }
    }
}

#[test]
fn test_category_filter_is_exact() {
    let repo = oncology_repository();
    let cases: &[&[OncologyCategory]] = &[
        &[],
        &[OncologyCategory::SolidTumor],
        &[OncologyCategory::Hematologic],
        &[OncologyCategory::Hematologic, OncologyCategory::SolidTumor],
    ];
    for categories in cases {
        let hits = filter_oncology_by_category(categories);
        let expected: Vec<_> = repo.iter().filter(|e| categories.contains(&e.category)).collect();
        assert_eq!(hits, expected);
    }
}

#[test]
fn test_ranked_is_ordered_and_positive() {
    for query in QUERIES {
        let ranked = ranked_oncology(query);
        assert!(ranked.iter().all(|hit| hit.score > 0));
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(pair[0].entry.id < pair[1].entry.id);
            }
        }
        assert_eq!(ranked.len(), search_oncology(query).len());
    }
}

#[test]
fn test_queries_are_idempotent() {
    for query in QUERIES {
        assert_eq!(search_oncology(query), search_oncology(query));
        assert_eq!(ranked_oncology(query), ranked_oncology(query));
    }
}

#[test]
fn test_count_matches_empty_search() {
    assert_eq!(oncology_condition_count(), search_oncology("").len());
    assert!(full_text_search_oncology("").is_empty());
}
