//! Lab interpretation database.
//!
//! Patient-oriented descriptions of common laboratory tests, their reference
//! ranges and critical thresholds, and the panels that group them.

use super::strings;
use crate::content_category;
use crate::entry::Entry;
use crate::repository::Repository;
use crate::search::weights;
use crate::Searchable;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

content_category! {
    /// Laboratory section a test or panel belongs to.
    pub enum LabCategory: "lab" {
        Hematology => "hematology",
        Chemistry => "chemistry",
        Endocrine => "endocrine",
        Lipid => "lipid",
    }
}

/// Sample type the test is run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Specimen {
    WholeBlood,
    Serum,
    Plasma,
}

/// Biological sex used to pick a reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Normal interval for an adult population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    /// `None` applies to everyone.
    pub sex: Option<Sex>,
    pub low: f64,
    pub high: f64,
    pub unit: String,
    pub note: Option<String>,
}

impl ReferenceRange {
    fn any(low: f64, high: f64, unit: &str) -> Self {
        Self {
            sex: None,
            low,
            high,
            unit: unit.to_string(),
            note: None,
        }
    }

    fn for_sex(sex: Sex, low: f64, high: f64, unit: &str) -> Self {
        Self {
            sex: Some(sex),
            ..Self::any(low, high, unit)
        }
    }

    fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// Values beyond which a result needs immediate action.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CriticalValues {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// Where a single result falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultFlag {
    CriticalLow,
    Low,
    Normal,
    High,
    CriticalHigh,
}

impl ResultFlag {
    pub fn label(&self) -> &'static str {
        match self {
            ResultFlag::CriticalLow => "critical-low",
            ResultFlag::Low => "low",
            ResultFlag::Normal => "normal",
            ResultFlag::High => "high",
            ResultFlag::CriticalHigh => "critical-high",
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, ResultFlag::CriticalLow | ResultFlag::CriticalHigh)
    }
}

/// One laboratory test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Searchable)]
pub struct LabTest {
    #[search(weight = weights::IDENTIFIER)]
    pub id: String,
    #[search(weight = weights::NAME)]
    pub name: String,
    #[search(weight = weights::NAME)]
    pub name_es: String,
    /// Common short forms such as "Hgb".
    #[search(weight = weights::SIGNIFICANCE)]
    pub abbreviations: Vec<String>,
    #[search(weight = weights::SIGNIFICANCE)]
    pub category: LabCategory,
    pub specimen: Specimen,
    #[search]
    pub what_it_measures: String,
    pub reference_ranges: Vec<ReferenceRange>,
    pub critical: CriticalValues,
    #[search(weight = weights::LIST)]
    pub elevated_causes: Vec<String>,
    #[search(weight = weights::LIST)]
    pub decreased_causes: Vec<String>,
    #[search(weight = weights::LIST)]
    pub follow_up_tests: Vec<String>,
}

impl LabTest {
    /// Pick the reference range for `sex`.
    ///
    /// A sex-specific range wins over a general one.
    pub fn reference_range_for(&self, sex: Sex) -> Option<&ReferenceRange> {
        self.reference_ranges
            .iter()
            .find(|r| r.sex == Some(sex))
            .or_else(|| self.reference_ranges.iter().find(|r| r.sex.is_none()))
    }

    /// Classify a numeric result.
    ///
    /// Critical thresholds are checked before the reference range. A test
    /// with no applicable range only flags critical values. `None` for a
    /// value that is not a finite number.
    pub fn interpret(&self, value: f64, sex: Sex) -> Option<ResultFlag> {
        if !value.is_finite() {
            return None;
        }
        if self.critical.low.is_some_and(|t| value < t) {
            return Some(ResultFlag::CriticalLow);
        }
        if self.critical.high.is_some_and(|t| value > t) {
            return Some(ResultFlag::CriticalHigh);
        }

        let flag = match self.reference_range_for(sex) {
            Some(range) if value < range.low => ResultFlag::Low,
            Some(range) if value > range.high => ResultFlag::High,
            _ => ResultFlag::Normal,
        };
        Some(flag)
    }
}

impl Entry for LabTest {
    type Category = LabCategory;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> LabCategory {
        self.category
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A group of tests ordered together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Searchable)]
pub struct LabPanel {
    #[search(weight = weights::IDENTIFIER)]
    pub id: String,
    #[search(weight = weights::NAME)]
    pub name: String,
    #[search(weight = weights::NAME)]
    pub name_es: String,
    #[search(weight = weights::SIGNIFICANCE)]
    pub abbreviation: String,
    #[search(weight = weights::SIGNIFICANCE)]
    pub category: LabCategory,
    #[search]
    pub purpose: String,
    /// Member test ids. Not every member has an entry yet.
    pub included_tests: Vec<String>,
}

impl Entry for LabPanel {
    type Category = LabCategory;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> LabCategory {
        self.category
    }

    fn name(&self) -> &str {
        &self.name
    }
}

static LAB_TESTS: LazyLock<Repository<LabTest>> = LazyLock::new(build_lab_test_repository);
static LAB_PANELS: LazyLock<Repository<LabPanel>> = LazyLock::new(build_lab_panel_repository);

pub fn lab_test_repository() -> &'static Repository<LabTest> {
    &LAB_TESTS
}

pub fn lab_panel_repository() -> &'static Repository<LabPanel> {
    &LAB_PANELS
}

pub fn get_lab_test(id: &str) -> Option<&'static LabTest> {
    LAB_TESTS.get(id)
}

/// Find a test by exact name or abbreviation, ignoring case.
pub fn get_lab_test_by_name(name: &str) -> Option<&'static LabTest> {
    let lower = name.to_lowercase();
    LAB_TESTS.iter().find(|test| {
        test.name.to_lowercase() == lower
            || test.abbreviations.iter().any(|abbr| abbr.to_lowercase() == lower)
    })
}

pub fn get_lab_panel(id: &str) -> Option<&'static LabPanel> {
    LAB_PANELS.get(id)
}

pub fn lab_tests_by_category(categories: &[LabCategory]) -> Vec<&'static LabTest> {
    LAB_TESTS.filter_by_category(categories)
}

pub fn search_lab_tests(query: &str) -> Vec<&'static LabTest> {
    LAB_TESTS.search(query)
}

pub fn all_lab_tests() -> impl Iterator<Item = &'static LabTest> {
    LAB_TESTS.iter()
}

pub fn all_lab_panels() -> impl Iterator<Item = &'static LabPanel> {
    LAB_PANELS.iter()
}

/// Resolve a panel's member ids, skipping members with no entry.
pub fn panel_tests(panel: &LabPanel) -> Vec<&'static LabTest> {
    panel
        .included_tests
        .iter()
        .filter_map(|id| LAB_TESTS.get(id))
        .collect()
}

fn build_lab_test_repository() -> Repository<LabTest> {
    Repository::from_entries(vec![
        // ====================================================================
        // HEMATOLOGY
        // ====================================================================
        LabTest {
            id: "hemoglobin".to_string(),
            name: "Hemoglobin".to_string(),
            name_es: "Hemoglobina".to_string(),
            abbreviations: strings(&["Hgb", "Hb"]),
            category: LabCategory::Hematology,
            specimen: Specimen::WholeBlood,
            what_it_measures: "The oxygen-carrying protein inside red blood cells.".to_string(),
            reference_ranges: vec![
                ReferenceRange::for_sex(Sex::Male, 13.5, 17.5, "g/dL"),
                ReferenceRange::for_sex(Sex::Female, 12.0, 16.0, "g/dL"),
            ],
            critical: CriticalValues { low: Some(7.0), high: Some(20.0) },
            elevated_causes: strings(&["Dehydration", "Chronic lung disease", "Sleep apnea", "Polycythemia vera"]),
            decreased_causes: strings(&["Iron deficiency anemia", "Anemia of chronic disease", "B12 deficiency", "Chronic kidney disease"]),
            follow_up_tests: strings(&["Reticulocyte count", "Iron studies", "B12 and folate", "Peripheral blood smear"]),
        },
        LabTest {
            id: "wbc".to_string(),
            name: "White Blood Cell Count".to_string(),
            name_es: "Recuento de glóbulos blancos".to_string(),
            abbreviations: strings(&["WBC", "Leukocyte count"]),
            category: LabCategory::Hematology,
            specimen: Specimen::WholeBlood,
            what_it_measures: "How many infection-fighting white cells circulate in the blood.".to_string(),
            reference_ranges: vec![ReferenceRange::any(4.5, 11.0, "K/uL").with_note("Thousand cells per microliter")],
            critical: CriticalValues { low: Some(2.0), high: Some(30.0) },
            elevated_causes: strings(&["Bacterial infection", "Corticosteroids", "Stress response", "Leukemia"]),
            decreased_causes: strings(&["Viral infection", "Chemotherapy", "Bone marrow failure"]),
            follow_up_tests: strings(&["WBC differential", "Peripheral blood smear"]),
        },
        LabTest {
            id: "platelets".to_string(),
            name: "Platelet Count".to_string(),
            name_es: "Recuento de plaquetas".to_string(),
            abbreviations: strings(&["Plt", "Thrombocytes"]),
            category: LabCategory::Hematology,
            specimen: Specimen::WholeBlood,
            what_it_measures: "Cell fragments that plug injured vessels and start clotting.".to_string(),
            reference_ranges: vec![ReferenceRange::any(150.0, 400.0, "K/uL")],
            critical: CriticalValues { low: Some(20.0), high: Some(1000.0) },
            elevated_causes: strings(&["Iron deficiency", "Inflammation", "Essential thrombocythemia"]),
            decreased_causes: strings(&["Immune thrombocytopenia", "Liver disease with splenic sequestration", "Heparin-induced thrombocytopenia"]),
            follow_up_tests: strings(&["Peripheral blood smear", "Coagulation panel"]),
        },
        // ====================================================================
        // CHEMISTRY
        // ====================================================================
        LabTest {
            id: "creatinine".to_string(),
            name: "Creatinine".to_string(),
            name_es: "Creatinina".to_string(),
            abbreviations: strings(&["Cr", "Creat"]),
            category: LabCategory::Chemistry,
            specimen: Specimen::Serum,
            what_it_measures: "A muscle waste product cleared by the kidneys; reflects filtration.".to_string(),
            reference_ranges: vec![
                ReferenceRange::for_sex(Sex::Male, 0.7, 1.3, "mg/dL"),
                ReferenceRange::for_sex(Sex::Female, 0.6, 1.1, "mg/dL"),
            ],
            critical: CriticalValues { low: None, high: Some(10.0) },
            elevated_causes: strings(&["Dehydration", "Acute kidney injury", "Chronic kidney disease", "High muscle mass"]),
            decreased_causes: strings(&["Low muscle mass", "Pregnancy"]),
            follow_up_tests: strings(&["eGFR", "Urinalysis", "Renal ultrasound"]),
        },
        LabTest {
            id: "glucose".to_string(),
            name: "Glucose".to_string(),
            name_es: "Glucosa".to_string(),
            abbreviations: strings(&["Glu", "BG", "FBG"]),
            category: LabCategory::Chemistry,
            specimen: Specimen::Serum,
            what_it_measures: "The main fuel for cells, regulated by insulin and glucagon.".to_string(),
            reference_ranges: vec![ReferenceRange::any(70.0, 100.0, "mg/dL").with_note("Fasting (8+ hours)")],
            critical: CriticalValues { low: Some(50.0), high: Some(500.0) },
            elevated_causes: strings(&["Diabetes mellitus", "Stress hyperglycemia", "Corticosteroids"]),
            decreased_causes: strings(&["Insulin excess", "Fasting or malnutrition", "Adrenal insufficiency"]),
            follow_up_tests: strings(&["Hemoglobin A1c", "Oral glucose tolerance test"]),
        },
        // ====================================================================
        // ENDOCRINE / LIPID
        // ====================================================================
        LabTest {
            id: "tsh".to_string(),
            name: "Thyroid Stimulating Hormone".to_string(),
            name_es: "Hormona estimulante de la tiroides".to_string(),
            abbreviations: strings(&["TSH", "Thyrotropin"]),
            category: LabCategory::Endocrine,
            specimen: Specimen::Serum,
            what_it_measures: "The pituitary signal that tells the thyroid how much hormone to make.".to_string(),
            reference_ranges: vec![ReferenceRange::any(0.4, 4.0, "mIU/L")],
            critical: CriticalValues::default(),
            elevated_causes: strings(&["Primary hypothyroidism", "Hashimoto thyroiditis", "Recovery from illness"]),
            decreased_causes: strings(&["Hyperthyroidism", "Graves disease", "Excess levothyroxine"]),
            follow_up_tests: strings(&["Free T4", "Thyroid antibodies"]),
        },
        LabTest {
            id: "ldl-cholesterol".to_string(),
            name: "LDL Cholesterol".to_string(),
            name_es: "Colesterol LDL".to_string(),
            abbreviations: strings(&["LDL", "LDL-C"]),
            category: LabCategory::Lipid,
            specimen: Specimen::Serum,
            what_it_measures: "Cholesterol carried in low-density lipoprotein particles that build arterial plaque.".to_string(),
            reference_ranges: vec![ReferenceRange::any(0.0, 100.0, "mg/dL").with_note("Optimal for most adults")],
            critical: CriticalValues::default(),
            elevated_causes: strings(&["Familial hypercholesterolemia", "Hypothyroidism", "Diet high in saturated fat"]),
            decreased_causes: strings(&["Statin therapy", "Hyperthyroidism", "Malnutrition"]),
            follow_up_tests: strings(&["Lipid panel", "Lipoprotein(a)"]),
        },
    ])
}

fn build_lab_panel_repository() -> Repository<LabPanel> {
    Repository::from_entries(vec![
        LabPanel {
            id: "cbc".to_string(),
            name: "Complete Blood Count".to_string(),
            name_es: "Hemograma completo".to_string(),
            abbreviation: "CBC".to_string(),
            category: LabCategory::Hematology,
            purpose: "A snapshot of red cells, white cells and platelets that screens for anemia, infection and blood cancers.".to_string(),
            included_tests: strings(&["hemoglobin", "hematocrit", "wbc", "platelets", "mcv", "rdw"]),
        },
        LabPanel {
            id: "bmp".to_string(),
            name: "Basic Metabolic Panel".to_string(),
            name_es: "Panel metabólico básico".to_string(),
            abbreviation: "BMP".to_string(),
            category: LabCategory::Chemistry,
            purpose: "Checks kidney function, blood sugar and electrolytes.".to_string(),
            included_tests: strings(&["glucose", "bun", "creatinine", "sodium", "potassium", "chloride", "bicarbonate", "calcium"]),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_lab_test_by_name() {
        assert_eq!(get_lab_test_by_name("HGB").map(|t| t.id.as_str()), Some("hemoglobin"));
        assert_eq!(get_lab_test_by_name("hemoglobin").map(|t| t.id.as_str()), Some("hemoglobin"));
        // exact match only
        assert!(get_lab_test_by_name("hemo").is_none());
    }

    #[test]
    fn test_reference_range_for_sex() {
        let hgb = get_lab_test("hemoglobin").expect("hemoglobin should exist");
        let male = hgb.reference_range_for(Sex::Male).expect("male range");
        assert_eq!((male.low, male.high), (13.5, 17.5));
        let female = hgb.reference_range_for(Sex::Female).expect("female range");
        assert_eq!((female.low, female.high), (12.0, 16.0));

        let wbc = get_lab_test("wbc").expect("wbc should exist");
        assert_eq!(wbc.reference_range_for(Sex::Female).map(|r| r.high), Some(11.0));
    }

    #[test]
    fn test_interpret() {
        let hgb = get_lab_test("hemoglobin").expect("hemoglobin should exist");
        assert_eq!(hgb.interpret(12.5, Sex::Male), Some(ResultFlag::Low));
        assert_eq!(hgb.interpret(12.5, Sex::Female), Some(ResultFlag::Normal));
        assert_eq!(hgb.interpret(16.5, Sex::Female), Some(ResultFlag::High));
        assert_eq!(hgb.interpret(6.5, Sex::Male), Some(ResultFlag::CriticalLow));
        assert_eq!(hgb.interpret(21.0, Sex::Female), Some(ResultFlag::CriticalHigh));
        assert!(hgb.interpret(21.0, Sex::Female).is_some_and(|f| f.is_critical()));
    }

    #[test]
    fn test_interpret_rejects_non_finite_values() {
        let glucose = get_lab_test("glucose").expect("glucose should exist");
        assert_eq!(glucose.interpret(f64::NAN, Sex::Male), None);
        assert_eq!(glucose.interpret(f64::INFINITY, Sex::Female), None);
        assert_eq!(glucose.interpret(f64::NEG_INFINITY, Sex::Male), None);

        // tsh has no critical limits, so only the finiteness check stops these
        let tsh = get_lab_test("tsh").expect("tsh should exist");
        assert_eq!(tsh.interpret(f64::NAN, Sex::Female), None);
    }

    #[test]
    fn test_interpret_without_critical_limits() {
        let tsh = get_lab_test("tsh").expect("tsh should exist");
        assert_eq!(tsh.interpret(0.01, Sex::Male), Some(ResultFlag::Low));
        assert_eq!(tsh.interpret(50.0, Sex::Male), Some(ResultFlag::High));
    }

    #[test]
    fn test_panel_tests_skip_missing_members() {
        let cbc = get_lab_panel("cbc").expect("cbc should exist");
        let ids: Vec<_> = panel_tests(cbc).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["hemoglobin", "wbc", "platelets"]);
    }

    #[test]
    fn test_lab_tests_by_category() {
        let chem: Vec<_> = lab_tests_by_category(&[LabCategory::Chemistry])
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(chem, vec!["creatinine", "glucose"]);
    }
}
