//! Plain-text views of content entries.

use medref_core::content::education::{ComplexityLevel, EducationalContent, LevelContent};
use medref_core::content::labs::{LabPanel, LabTest};
use medref_core::content::oncology::OncologyCondition;
use medref_core::content::regions::RegionContent;
use medref_core::{Catalog, Category, Entry};
use std::fmt::Write;

/// Text rendering for one schema.
pub trait Render: Entry {
    /// One line for result lists.
    fn summary_line(&self) -> String {
        format!("{:<24} {} [{}]", self.id(), self.name(), self.category().as_str())
    }

    /// Full view of the entry.
    fn detail(&self) -> String;
}

fn heading(out: &mut String, title: &str, subtitle: &str) {
    let _ = writeln!(out, "{}", title);
    if !subtitle.is_empty() {
        let _ = writeln!(out, "{}", subtitle);
    }
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count().max(subtitle.chars().count())));
}

fn section(out: &mut String, label: &str, text: &str) {
    if !text.is_empty() {
        let _ = writeln!(out, "\n{}:\n  {}", label, text);
    }
}

fn list(out: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}:", label);
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
}

impl Render for OncologyCondition {
    fn detail(&self) -> String {
        let mut out = String::new();
        heading(&mut out, &self.name, &self.name_es);
        let _ = writeln!(out, "Category: {}  |  ICD-11: {}", self.category, self.icd11);
        section(&mut out, "Description", &self.description);
        section(&mut out, "Pathophysiology", &self.pathophysiology);
        list(&mut out, "Risk factors", &self.risk_factors);
        list(&mut out, "Clinical features", &self.clinical_features);
        section(&mut out, "Staging", &self.staging);
        list(&mut out, "Diagnostic tests", &self.diagnostics.tests);
        list(&mut out, "Imaging", &self.diagnostics.imaging);
        list(&mut out, "Diagnostic criteria", &self.diagnostics.criteria);
        list(&mut out, "Medications", &self.treatment.medications);
        list(&mut out, "Procedures", &self.treatment.procedures);
        list(&mut out, "Lifestyle", &self.treatment.lifestyle);
        section(&mut out, "Prognosis", &self.prognosis);
        section(&mut out, "For patients", &self.patient_explanation);
        out
    }
}

impl Render for LabTest {
    fn detail(&self) -> String {
        let mut out = String::new();
        heading(&mut out, &self.name, &self.name_es);
        let _ = writeln!(
            out,
            "Category: {}  |  Abbreviations: {}",
            self.category,
            self.abbreviations.join(", ")
        );
        section(&mut out, "Measures", &self.what_it_measures);

        if !self.reference_ranges.is_empty() {
            let _ = writeln!(out, "\nReference ranges:");
            for range in &self.reference_ranges {
                let who = match range.sex {
                    Some(sex) => format!("{:?}", sex).to_lowercase(),
                    None => "all".to_string(),
                };
                let _ = write!(out, "  {:<7} {} - {} {}", who, range.low, range.high, range.unit);
                if let Some(note) = &range.note {
                    let _ = write!(out, " ({})", note);
                }
                let _ = writeln!(out);
            }
        }
        if let Some(low) = self.critical.low {
            let _ = writeln!(out, "  critical below {}", low);
        }
        if let Some(high) = self.critical.high {
            let _ = writeln!(out, "  critical above {}", high);
        }

        list(&mut out, "Elevated in", &self.elevated_causes);
        list(&mut out, "Decreased in", &self.decreased_causes);
        list(&mut out, "Follow-up tests", &self.follow_up_tests);
        out
    }
}

impl Render for LabPanel {
    fn detail(&self) -> String {
        let mut out = String::new();
        heading(&mut out, &format!("{} ({})", self.name, self.abbreviation), &self.name_es);
        let _ = writeln!(out, "Category: {}", self.category);
        section(&mut out, "Purpose", &self.purpose);

        let _ = writeln!(out, "\nIncluded tests:");
        let catalog = Catalog::global();
        for test in &self.included_tests {
            match catalog.find(test) {
                Some(entry) => {
                    let _ = writeln!(out, "  - {} ({})", entry.name(), test);
                }
                None => {
                    let _ = writeln!(out, "  - {} (not yet available)", test);
                }
            }
        }
        out
    }
}

impl Render for EducationalContent {
    fn summary_line(&self) -> String {
        format!("{:<28} {} [{}]", self.id, self.name, self.content_type)
    }

    fn detail(&self) -> String {
        let mut out = String::new();
        heading(&mut out, &self.name, &self.name_es);
        let _ = writeln!(out, "Type: {}  |  Version: {}", self.content_type, self.version);
        if !self.alternate_names.is_empty() {
            let _ = writeln!(out, "Also known as: {}", self.alternate_names.join(", "));
        }
        let _ = writeln!(out, "\nLevels:");
        for level in self.available_levels() {
            let summary = self.level(level).map(|l| l.summary.as_str()).unwrap_or_default();
            let _ = writeln!(out, "  {}: {}", level, summary);
        }
        cross_references(&mut out, self);
        out
    }
}

/// One complexity level of a topic, with its cross-references.
pub fn render_level(content: &EducationalContent, level: ComplexityLevel, view: &LevelContent) -> String {
    let mut out = String::new();
    heading(&mut out, &content.name, &content.name_es);
    let _ = writeln!(out, "Level {} for {}", level, level.audience());
    section(&mut out, "Summary", &view.summary);
    section(&mut out, "Explanation", &view.explanation);

    if !view.key_terms.is_empty() {
        let _ = writeln!(out, "\nKey terms:");
        for term in &view.key_terms {
            let _ = writeln!(out, "  {}: {}", term.term, term.definition);
        }
    }
    list(&mut out, "Examples", &view.examples);
    cross_references(&mut out, content);
    out
}

fn cross_references(out: &mut String, content: &EducationalContent) {
    if content.cross_references.is_empty() {
        return;
    }
    let catalog = Catalog::global();
    let _ = writeln!(out, "\nSee also:");
    for reference in &content.cross_references {
        match catalog.resolve_label(reference) {
            Some(label) => {
                let _ = writeln!(out, "  - {} -> {}", label, reference.target_id);
            }
            None => {
                let _ = writeln!(out, "  - {} (not yet available)", reference.label);
            }
        }
    }
}

impl Render for RegionContent {
    fn detail(&self) -> String {
        let mut out = String::new();
        heading(&mut out, &self.name, &self.name_es);
        let _ = writeln!(out, "System: {}", self.system);
        section(&mut out, "Description", &self.description);

        if !self.tissue_types.is_empty() {
            let _ = writeln!(out, "\nTissues:");
            for tissue in &self.tissue_types {
                let _ = writeln!(out, "  {} ({:?}): {}", tissue.name, tissue.class, tissue.description);
            }
        }
        if !self.conditions.is_empty() {
            let _ = writeln!(out, "\nConditions:");
            for condition in &self.conditions {
                let _ = write!(out, "  {} / {}: {}", condition.name, condition.name_es, condition.description);
                if let Some(linked) = &condition.linked_id {
                    let _ = write!(out, " [{}]", linked);
                }
                let _ = writeln!(out);
            }
        }
        if !self.functions.is_empty() {
            let _ = writeln!(out, "\nFunctions:");
            for function in &self.functions {
                let _ = writeln!(out, "  {}: {}", function.name, function.description);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medref_core::content::education::get_educational_content;
    use medref_core::content::labs::get_lab_panel;
    use medref_core::content::oncology::get_oncology_condition;

    #[test]
    fn test_summary_line_shows_category() {
        let entry = get_oncology_condition("nhl-lymphoma").unwrap();
        let line = entry.summary_line();
        assert!(line.starts_with("nhl-lymphoma"));
        assert!(line.ends_with("[hematologic]"));
    }

    #[test]
    fn test_panel_marks_missing_tests() {
        let text = get_lab_panel("cbc").unwrap().detail();
        assert!(text.contains("Hemoglobin (hemoglobin)"));
        assert!(text.contains("hematocrit (not yet available)"));
    }

    #[test]
    fn test_level_view_resolves_cross_references() {
        let content = get_educational_content("condition-hypertension").unwrap();
        let view = content.level(ComplexityLevel::Patient).unwrap();
        let text = render_level(content, ComplexityLevel::Patient, view);
        assert!(text.contains("-> condition-dialysis"));
        assert!(text.contains("(not yet available)"));
    }
}
