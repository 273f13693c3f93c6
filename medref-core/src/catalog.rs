//! Cross-domain lookup over every content repository.

use crate::content::education::{education_repository, CrossReference, EducationalContent};
use crate::content::labs::{lab_panel_repository, lab_test_repository, LabPanel, LabTest};
use crate::content::oncology::{oncology_repository, OncologyCondition};
use crate::config::{EmptyQueryPolicy, QueryConfig};
use crate::content::regions::{region_repository, RegionContent};
use crate::content_category;
use crate::entry::{Category, Entry};
use crate::repository::Repository;
use crate::search::Searchable;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

content_category! {
    /// A content repository, in catalog lookup order.
    pub enum Domain: "domain" {
        Oncology => "oncology",
        LabTests => "labs",
        LabPanels => "lab-panels",
        Education => "education",
        Regions => "regions",
    }
}

/// An entry from any domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "domain", content = "entry")]
pub enum CatalogEntry<'a> {
    #[serde(rename = "oncology")]
    Oncology(&'a OncologyCondition),
    #[serde(rename = "labs")]
    LabTest(&'a LabTest),
    #[serde(rename = "lab-panels")]
    LabPanel(&'a LabPanel),
    #[serde(rename = "education")]
    Education(&'a EducationalContent),
    #[serde(rename = "regions")]
    Region(&'a RegionContent),
}

impl<'a> CatalogEntry<'a> {
    pub fn domain(&self) -> Domain {
        match self {
            CatalogEntry::Oncology(_) => Domain::Oncology,
            CatalogEntry::LabTest(_) => Domain::LabTests,
            CatalogEntry::LabPanel(_) => Domain::LabPanels,
            CatalogEntry::Education(_) => Domain::Education,
            CatalogEntry::Region(_) => Domain::Regions,
        }
    }

    pub fn id(&self) -> &'a str {
        match *self {
            CatalogEntry::Oncology(e) => e.id(),
            CatalogEntry::LabTest(e) => e.id(),
            CatalogEntry::LabPanel(e) => e.id(),
            CatalogEntry::Education(e) => e.id(),
            CatalogEntry::Region(e) => e.id(),
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            CatalogEntry::Oncology(e) => e.name(),
            CatalogEntry::LabTest(e) => e.name(),
            CatalogEntry::LabPanel(e) => e.name(),
            CatalogEntry::Education(e) => e.name(),
            CatalogEntry::Region(e) => e.name(),
        }
    }

    /// The entry's category as its kebab-case name.
    pub fn category(&self) -> &'static str {
        match *self {
            CatalogEntry::Oncology(e) => e.category().as_str(),
            CatalogEntry::LabTest(e) => e.category().as_str(),
            CatalogEntry::LabPanel(e) => e.category().as_str(),
            CatalogEntry::Education(e) => e.category().as_str(),
            CatalogEntry::Region(e) => e.category().as_str(),
        }
    }
}

/// A search hit tagged with its domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogHit<'a> {
    pub domain: Domain,
    pub id: &'a str,
    pub name: &'a str,
}

impl<'a> From<CatalogEntry<'a>> for CatalogHit<'a> {
    fn from(entry: CatalogEntry<'a>) -> Self {
        Self {
            domain: entry.domain(),
            id: entry.id(),
            name: entry.name(),
        }
    }
}

/// All content repositories behind one lookup surface.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    oncology: &'static Repository<OncologyCondition>,
    lab_tests: &'static Repository<LabTest>,
    lab_panels: &'static Repository<LabPanel>,
    education: &'static Repository<EducationalContent>,
    regions: &'static Repository<RegionContent>,
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    oncology: oncology_repository(),
    lab_tests: lab_test_repository(),
    lab_panels: lab_panel_repository(),
    education: education_repository(),
    regions: region_repository(),
});

impl Catalog {
    /// The catalog over the built-in repositories.
    pub fn global() -> &'static Catalog {
        &CATALOG
    }

    pub fn lookup(&self, domain: Domain, id: &str) -> Option<CatalogEntry<'static>> {
        match domain {
            Domain::Oncology => self.oncology.get(id).map(CatalogEntry::Oncology),
            Domain::LabTests => self.lab_tests.get(id).map(CatalogEntry::LabTest),
            Domain::LabPanels => self.lab_panels.get(id).map(CatalogEntry::LabPanel),
            Domain::Education => self.education.get(id).map(CatalogEntry::Education),
            Domain::Regions => self.regions.get(id).map(CatalogEntry::Region),
        }
    }

    /// The first domain, in [`Domain::ALL`] order, that knows `id`.
    pub fn find(&self, id: &str) -> Option<CatalogEntry<'static>> {
        Domain::ALL.iter().find_map(|domain| self.lookup(*domain, id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Every entry in one domain, in repository order.
    pub fn entries(&self, domain: Domain) -> Vec<CatalogEntry<'static>> {
        match domain {
            Domain::Oncology => self.oncology.iter().map(CatalogEntry::Oncology).collect(),
            Domain::LabTests => self.lab_tests.iter().map(CatalogEntry::LabTest).collect(),
            Domain::LabPanels => self.lab_panels.iter().map(CatalogEntry::LabPanel).collect(),
            Domain::Education => self.education.iter().map(CatalogEntry::Education).collect(),
            Domain::Regions => self.regions.iter().map(CatalogEntry::Region).collect(),
        }
    }

    /// Substring search across every domain.
    ///
    /// Hits are grouped by domain order, then repository order.
    pub fn search_all(&self, query: &str) -> Vec<CatalogHit<'static>> {
        self.search_all_with(QueryConfig::default(), query)
    }

    /// [`search_all`](Self::search_all) under an explicit query configuration.
    pub fn search_all_with(&self, config: QueryConfig, query: &str) -> Vec<CatalogHit<'static>> {
        if query.is_empty() && config.empty_query == EmptyQueryPolicy::MatchNone {
            return Vec::new();
        }
        let mut hits = Vec::new();
        hits.extend(hits_from(self.oncology, config, query, CatalogEntry::Oncology));
        hits.extend(hits_from(self.lab_tests, config, query, CatalogEntry::LabTest));
        hits.extend(hits_from(self.lab_panels, config, query, CatalogEntry::LabPanel));
        hits.extend(hits_from(self.education, config, query, CatalogEntry::Education));
        hits.extend(hits_from(self.regions, config, query, CatalogEntry::Region));
        hits
    }

    pub fn count(&self, domain: Domain) -> usize {
        match domain {
            Domain::Oncology => self.oncology.count(),
            Domain::LabTests => self.lab_tests.count(),
            Domain::LabPanels => self.lab_panels.count(),
            Domain::Education => self.education.count(),
            Domain::Regions => self.regions.count(),
        }
    }

    /// Entry count per domain.
    pub fn counts(&self) -> Vec<(Domain, usize)> {
        Domain::ALL.iter().map(|d| (*d, self.count(*d))).collect()
    }

    /// Every id in every domain.
    pub fn known_ids(&self) -> HashSet<&'static str> {
        Domain::ALL
            .iter()
            .flat_map(|d| self.entries(*d))
            .map(|e| e.id())
            .collect()
    }

    /// Display text for a cross-reference.
    ///
    /// Uses the reference's own label, or the target's name when the label is
    /// blank. `None` when no domain knows the target.
    pub fn resolve_label(&self, reference: &CrossReference) -> Option<String> {
        let target = self.find(&reference.target_id)?;
        if reference.label.trim().is_empty() {
            Some(target.name().to_string())
        } else {
            Some(reference.label.clone())
        }
    }
}

fn hits_from<E, F>(
    repo: &'static Repository<E>,
    config: QueryConfig,
    query: &str,
    wrap: F,
) -> Vec<CatalogHit<'static>>
where
    E: Entry + Searchable,
    F: Fn(&'static E) -> CatalogEntry<'static>,
{
    repo.search_with(config, query).into_iter().map(|e| wrap(e).into()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::education::Relationship;

    #[test]
    fn test_lookup_respects_domain() {
        let catalog = Catalog::global();
        assert!(catalog.lookup(Domain::Oncology, "breast-cancer").is_some());
        assert!(catalog.lookup(Domain::LabTests, "breast-cancer").is_none());
    }

    #[test]
    fn test_find_tags_domain() {
        let entry = Catalog::global().find("glucose").expect("glucose should exist");
        assert_eq!(entry.domain(), Domain::LabTests);
        assert_eq!(entry.name(), "Glucose");
        assert_eq!(entry.category(), "chemistry");
    }

    #[test]
    fn test_search_all_spans_domains() {
        let hits = Catalog::global().search_all("kidney");
        let domains: HashSet<_> = hits.iter().map(|h| h.domain).collect();
        assert!(domains.contains(&Domain::Education));
        assert!(domains.contains(&Domain::Regions));
        // domain order is preserved
        let positions: Vec<_> = hits
            .iter()
            .map(|h| Domain::ALL.iter().position(|d| *d == h.domain).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_search_all_empty_query_policy() {
        let catalog = Catalog::global();
        let total: usize = catalog.counts().iter().map(|(_, n)| n).sum();
        assert_eq!(catalog.search_all("").len(), total);

        let none = QueryConfig::new().with_empty_query(EmptyQueryPolicy::MatchNone);
        assert!(catalog.search_all_with(none, "").is_empty());
        assert_eq!(
            catalog.search_all_with(none, "kidney"),
            catalog.search_all("kidney")
        );
    }

    #[test]
    fn test_counts() {
        let counts = Catalog::global().counts();
        assert_eq!(counts.len(), Domain::ALL.len());
        assert_eq!(counts[0], (Domain::Oncology, 6));
    }

    #[test]
    fn test_resolve_label() {
        let catalog = Catalog::global();
        let mut reference = CrossReference::related("glucose", "lab-test", "");
        assert_eq!(catalog.resolve_label(&reference).as_deref(), Some("Glucose"));

        reference.label = "Blood sugar".to_string();
        assert_eq!(catalog.resolve_label(&reference).as_deref(), Some("Blood sugar"));

        let dangling = CrossReference {
            target_id: "condition-heart-failure".to_string(),
            target_type: "condition".to_string(),
            relationship: Relationship::SeeAlso,
            label: "Heart failure".to_string(),
        };
        assert!(catalog.resolve_label(&dangling).is_none());
    }

    #[test]
    fn test_domain_names() {
        assert_eq!("labs".parse::<Domain>(), Ok(Domain::LabTests));
        assert!("spells".parse::<Domain>().is_err());
    }
}
