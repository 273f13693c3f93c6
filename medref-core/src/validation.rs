//! Content quality checks.
//!
//! Checks never fail: every problem becomes a [`ValidationIssue`] in the
//! returned report, so a whole catalog can be audited in one pass.

use crate::catalog::Catalog;
use crate::content::education::{ComplexityLevel, EducationalContent};
use crate::content::labs::{LabPanel, LabTest};
use crate::content::oncology::OncologyCondition;
use crate::content::regions::RegionContent;
use crate::entry::Entry;
use crate::repository::Repository;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Words that mark unfinished text.
const PLACEHOLDER_MARKERS: &[&str] = &["todo", "fixme", "placeholder", "lorem ipsum"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One problem found in one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub entry_id: String,
    pub severity: Severity,
    /// What part of the entry the issue is about, e.g. `levels`.
    pub area: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "[{}] {} ({}): {}", severity, self.entry_id, self.area, self.message)
    }
}

/// All issues from a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no error-severity issue was found.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn merge(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    fn error(&mut self, entry_id: &str, area: &'static str, message: impl Into<String>) {
        self.push(entry_id, Severity::Error, area, message.into());
    }

    fn warning(&mut self, entry_id: &str, area: &'static str, message: impl Into<String>) {
        self.push(entry_id, Severity::Warning, area, message.into());
    }

    fn push(&mut self, entry_id: &str, severity: Severity, area: &'static str, message: String) {
        self.issues.push(ValidationIssue {
            entry_id: entry_id.to_string(),
            severity,
            area,
            message,
        });
    }

    fn check_text(&mut self, entry_id: &str, area: &'static str, text: &str) {
        if text.trim().is_empty() {
            self.error(entry_id, area, "is empty");
        } else if contains_placeholder(text) {
            self.warning(entry_id, area, "contains placeholder text");
        }
    }
}

/// A schema that knows how to check its own entries.
pub trait Validate {
    /// Check one entry. `known_ids` is used to spot dangling references.
    fn validate(&self, known_ids: &HashSet<&str>) -> ValidationReport;
}

fn contains_placeholder(text: &str) -> bool {
    let lower = text.to_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|marker| {
        lower
            .match_indices(marker)
            .any(|(start, _)| is_word_boundary(&lower, start, start + marker.len()))
    })
}

fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// Check an ICD-11 code: a four-character stem with an optional extension.
///
/// The stem is a digit or letter, a letter, a digit, then a digit or letter,
/// e.g. `2C60`, `BA00`. An extension is a dot and one to four digits or
/// letters, e.g. `2B33.3`.
pub fn validate_icd11(code: &str) -> bool {
    let (stem, extension) = match code.split_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (code, None),
    };

    let stem: Vec<char> = stem.chars().collect();
    let stem_ok = stem.len() == 4
        && is_code_char(stem[0])
        && stem[1].is_ascii_uppercase()
        && stem[2].is_ascii_digit()
        && is_code_char(stem[3]);

    let extension_ok = match extension {
        None => true,
        Some(ext) => (1..=4).contains(&ext.len()) && ext.chars().all(is_code_char),
    };

    stem_ok && extension_ok
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_uppercase()
}

/// Check one educational topic.
pub fn validate_educational_content(
    content: &EducationalContent,
    known_ids: &HashSet<&str>,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let id = content.id.as_str();

    report.check_text(id, "name", &content.name);
    report.check_text(id, "name_es", &content.name_es);

    for level in ComplexityLevel::ALL {
        let Some(view) = content.level(level) else {
            report.error(id, "levels", format!("missing level {}", level));
            continue;
        };

        report.check_text(id, "summary", &view.summary);
        report.check_text(id, "explanation", &view.explanation);

        if view.key_terms.is_empty() {
            report.warning(id, "key-terms", format!("level {} has no key terms", level.number()));
        }
        for term in &view.key_terms {
            if term.term.trim().is_empty() || term.definition.trim().is_empty() {
                report.error(
                    id,
                    "key-terms",
                    format!("level {} has a key term with an empty term or definition", level.number()),
                );
            }
        }
    }

    if content.version < 1 {
        report.error(id, "metadata", "version must be at least 1");
    }
    if content.created_at.trim().is_empty() {
        report.warning(id, "metadata", "missing created_at date");
    }

    for reference in &content.cross_references {
        if reference.target_id.trim().is_empty() {
            report.error(id, "cross-references", "cross-reference has an empty target id");
        } else if !known_ids.contains(reference.target_id.as_str()) {
            report.warning(
                id,
                "cross-references",
                format!("target '{}' is not in the catalog", reference.target_id),
            );
        }
    }

    report
}

impl Validate for EducationalContent {
    fn validate(&self, known_ids: &HashSet<&str>) -> ValidationReport {
        validate_educational_content(self, known_ids)
    }
}

impl Validate for OncologyCondition {
    fn validate(&self, _known_ids: &HashSet<&str>) -> ValidationReport {
        let mut report = ValidationReport::new();
        let id = self.id.as_str();

        report.check_text(id, "name", &self.name);
        report.check_text(id, "name_es", &self.name_es);
        report.check_text(id, "description", &self.description);
        report.check_text(id, "patient_explanation", &self.patient_explanation);

        if !validate_icd11(&self.icd11) {
            report.error(id, "icd11", format!("'{}' is not a valid ICD-11 code", self.icd11));
        }
        if self.clinical_features.is_empty() {
            report.warning(id, "clinical_features", "no clinical features listed");
        }

        report
    }
}

impl Validate for LabTest {
    fn validate(&self, _known_ids: &HashSet<&str>) -> ValidationReport {
        let mut report = ValidationReport::new();
        let id = self.id.as_str();

        report.check_text(id, "name", &self.name);
        report.check_text(id, "what_it_measures", &self.what_it_measures);

        if self.reference_ranges.is_empty() {
            report.warning(id, "reference-ranges", "no reference ranges");
        }
        for range in &self.reference_ranges {
            if range.low > range.high {
                report.error(
                    id,
                    "reference-ranges",
                    format!("low {} is above high {} {}", range.low, range.high, range.unit),
                );
            }
        }
        if let (Some(low), Some(high)) = (self.critical.low, self.critical.high) {
            if low >= high {
                report.error(id, "critical", format!("critical low {} is not below critical high {}", low, high));
            }
        }

        report
    }
}

impl Validate for LabPanel {
    fn validate(&self, known_ids: &HashSet<&str>) -> ValidationReport {
        let mut report = ValidationReport::new();
        let id = self.id.as_str();

        report.check_text(id, "name", &self.name);
        if self.included_tests.is_empty() {
            report.error(id, "included_tests", "panel lists no tests");
        }
        let missing: Vec<&str> = self
            .included_tests
            .iter()
            .map(String::as_str)
            .filter(|test| !known_ids.contains(test))
            .collect();
        if !missing.is_empty() {
            report.warning(id, "included_tests", format!("no entry yet for: {}", missing.join(", ")));
        }

        report
    }
}

impl Validate for RegionContent {
    fn validate(&self, known_ids: &HashSet<&str>) -> ValidationReport {
        let mut report = ValidationReport::new();
        let id = self.region_id.as_str();

        report.check_text(id, "name", &self.name);
        report.check_text(id, "description", &self.description);

        for condition in &self.conditions {
            if let Some(linked) = &condition.linked_id {
                if !known_ids.contains(linked.as_str()) {
                    report.warning(id, "conditions", format!("linked id '{}' is not in the catalog", linked));
                }
            }
        }

        report
    }
}

/// Check every entry of a repository.
pub fn validate_repository<E>(repo: &Repository<E>, known_ids: &HashSet<&str>) -> ValidationReport
where
    E: Entry + Validate,
{
    let mut report = ValidationReport::new();
    for entry in repo {
        report.merge(entry.validate(known_ids));
    }
    tracing::debug!(
        entries = repo.count(),
        issues = report.issues.len(),
        "validated repository"
    );
    report
}

/// Check every built-in repository against the catalog's ids.
pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    use crate::content::{education, labs, oncology, regions};

    let known_ids = catalog.known_ids();
    let mut report = ValidationReport::new();
    report.merge(validate_repository(oncology::oncology_repository(), &known_ids));
    report.merge(validate_repository(labs::lab_test_repository(), &known_ids));
    report.merge(validate_repository(labs::lab_panel_repository(), &known_ids));
    report.merge(validate_repository(education::education_repository(), &known_ids));
    report.merge(validate_repository(regions::region_repository(), &known_ids));
    report
}
