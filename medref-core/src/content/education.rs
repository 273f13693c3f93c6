//! Leveled educational content.
//!
//! Every topic is written at five complexity levels, from a child's
//! explanation up to physician-level detail. Levels are independent views
//! of the same topic and are read by direct lookup.

use super::strings;
use crate::content_category;
use crate::entry::{Category, Entry};
use crate::repository::Repository;
use crate::search::{weights, FieldValue, ScoredEntry, SearchField, Searchable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Audience tier for an explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ComplexityLevel {
    Child = 1,
    Patient = 2,
    Nursing = 3,
    MedicalStudent = 4,
    Physician = 5,
}

/// A level number outside 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("complexity level must be between 1 and 5, got {0}")]
pub struct InvalidLevel(pub u8);

impl ComplexityLevel {
    pub const ALL: [ComplexityLevel; 5] = [
        ComplexityLevel::Child,
        ComplexityLevel::Patient,
        ComplexityLevel::Nursing,
        ComplexityLevel::MedicalStudent,
        ComplexityLevel::Physician,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            ComplexityLevel::Child => "Child",
            ComplexityLevel::Patient => "Patient",
            ComplexityLevel::Nursing => "Nursing/Allied Health",
            ComplexityLevel::MedicalStudent => "Medical Student",
            ComplexityLevel::Physician => "Physician",
        }
    }

    pub fn audience(&self) -> &'static str {
        match self {
            ComplexityLevel::Child => "Children ages 5-12",
            ComplexityLevel::Patient => "General adult patients and caregivers",
            ComplexityLevel::Nursing => "Nurses, PAs, respiratory therapists, allied health professionals",
            ComplexityLevel::MedicalStudent => "Medical students, PA students, advanced learners",
            ComplexityLevel::Physician => "Attending physicians, specialists, researchers",
        }
    }

    /// Target Flesch-Kincaid grade range, inclusive.
    pub fn readability_grade_range(&self) -> (u8, u8) {
        match self {
            ComplexityLevel::Child => (3, 4),
            ComplexityLevel::Patient => (6, 8),
            ComplexityLevel::Nursing => (10, 12),
            ComplexityLevel::MedicalStudent => (13, 16),
            ComplexityLevel::Physician => (17, 20),
        }
    }
}

impl TryFrom<u8> for ComplexityLevel {
    type Error = InvalidLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ComplexityLevel::Child),
            2 => Ok(ComplexityLevel::Patient),
            3 => Ok(ComplexityLevel::Nursing),
            4 => Ok(ComplexityLevel::MedicalStudent),
            5 => Ok(ComplexityLevel::Physician),
            other => Err(InvalidLevel(other)),
        }
    }
}

impl From<ComplexityLevel> for u8 {
    fn from(level: ComplexityLevel) -> u8 {
        level.number()
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.name())
    }
}

content_category! {
    /// Kind of educational topic.
    pub enum ContentType: "content type" {
        Structure => "structure",
        System => "system",
        Pathway => "pathway",
        Process => "process",
        Condition => "condition",
        Concept => "concept",
        Topic => "topic",
    }
}

/// Editorial state of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Review,
    Published,
}

/// Kind of link a cross-reference represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    Parent,
    Child,
    Sibling,
    Related,
    SeeAlso,
}

/// An unchecked link to an entry in any repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    pub target_id: String,
    pub target_type: String,
    pub relationship: Relationship,
    /// Display text, possibly bilingual.
    pub label: String,
}

impl CrossReference {
    pub fn related(target_id: &str, target_type: &str, label: &str) -> Self {
        Self {
            target_id: target_id.to_string(),
            target_type: target_type.to_string(),
            relationship: Relationship::Related,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTerm {
    pub term: String,
    pub definition: String,
}

/// One level's view of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelContent {
    pub summary: String,
    pub explanation: String,
    pub key_terms: Vec<KeyTerm>,
    pub examples: Vec<String>,
}

impl LevelContent {
    pub fn new(summary: &str, explanation: &str, key_terms: &[(&str, &str)], examples: &[&str]) -> Self {
        Self {
            summary: summary.to_string(),
            explanation: explanation.to_string(),
            key_terms: key_terms
                .iter()
                .map(|(term, definition)| KeyTerm {
                    term: term.to_string(),
                    definition: definition.to_string(),
                })
                .collect(),
            examples: strings(examples),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentTags {
    pub systems: Vec<String>,
    pub topics: Vec<String>,
    pub keywords: Vec<String>,
}

/// A leveled educational topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationalContent {
    pub id: String,
    pub content_type: ContentType,
    pub name: String,
    pub name_es: String,
    pub alternate_names: Vec<String>,
    pub levels: BTreeMap<ComplexityLevel, LevelContent>,
    pub cross_references: Vec<CrossReference>,
    pub tags: ContentTags,
    /// ISO date.
    pub created_at: String,
    pub updated_at: String,
    pub version: u32,
    pub status: ContentStatus,
}

impl EducationalContent {
    pub fn level(&self, level: ComplexityLevel) -> Option<&LevelContent> {
        self.levels.get(&level)
    }

    /// Levels with content, lowest first.
    pub fn available_levels(&self) -> Vec<ComplexityLevel> {
        self.levels.keys().copied().collect()
    }
}

impl Entry for EducationalContent {
    type Category = ContentType;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> ContentType {
        self.content_type
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// Written by hand: level text lives inside a map and key terms are records.
impl Searchable for EducationalContent {
    fn search_fields(&self) -> Vec<SearchField<'_>> {
        let mut fields = vec![
            SearchField::new("id", weights::IDENTIFIER, FieldValue::Text(&self.id)),
            SearchField::new("name", weights::NAME, FieldValue::Text(&self.name)),
            SearchField::new("name_es", weights::NAME, FieldValue::Text(&self.name_es)),
            SearchField::new("alternate_names", weights::SIGNIFICANCE, FieldValue::List(&self.alternate_names)),
            SearchField::new("content_type", weights::SIGNIFICANCE, FieldValue::Text(self.content_type.as_str())),
            SearchField::new("keywords", weights::LIST, FieldValue::List(&self.tags.keywords)),
        ];

        for level in self.levels.values() {
            fields.push(SearchField::new("summary", weights::DESCRIPTION, FieldValue::Text(&level.summary)));
            fields.push(SearchField::new("explanation", weights::DESCRIPTION, FieldValue::Text(&level.explanation)));
            fields.push(SearchField::new("examples", weights::LIST, FieldValue::List(&level.examples)));
            for key_term in &level.key_terms {
                fields.push(SearchField::new("key_terms", weights::LIST, FieldValue::Text(&key_term.term)));
            }
        }

        fields
    }

    // A topic matching in several levels still counts each field once.
    fn score_folded(&self, needle: &str) -> u32 {
        let mut matched: Vec<&'static str> = Vec::new();
        let mut score = 0;
        for field in self.search_fields() {
            if !matched.contains(&field.name) && field.value.contains_folded(needle) {
                matched.push(field.name);
                score += field.weight;
            }
        }
        score
    }
}

static EDUCATION_DATABASE: LazyLock<Repository<EducationalContent>> =
    LazyLock::new(build_education_repository);

pub fn education_repository() -> &'static Repository<EducationalContent> {
    &EDUCATION_DATABASE
}

pub fn get_educational_content(id: &str) -> Option<&'static EducationalContent> {
    EDUCATION_DATABASE.get(id)
}

/// One level of a topic; `None` when either is absent.
pub fn get_level(id: &str, level: ComplexityLevel) -> Option<&'static LevelContent> {
    EDUCATION_DATABASE.get(id).and_then(|content| content.level(level))
}

/// Levels written for a topic; empty when the topic is absent.
pub fn available_levels(id: &str) -> Vec<ComplexityLevel> {
    EDUCATION_DATABASE
        .get(id)
        .map(|content| content.available_levels())
        .unwrap_or_default()
}

pub fn search_education(query: &str) -> Vec<&'static EducationalContent> {
    EDUCATION_DATABASE.search(query)
}

pub fn ranked_education(query: &str) -> Vec<ScoredEntry<&'static EducationalContent>> {
    EDUCATION_DATABASE.ranked(query)
}

pub fn education_by_type(types: &[ContentType]) -> Vec<&'static EducationalContent> {
    EDUCATION_DATABASE.filter_by_category(types)
}

fn levels(items: [LevelContent; 5]) -> BTreeMap<ComplexityLevel, LevelContent> {
    ComplexityLevel::ALL.into_iter().zip(items).collect()
}

fn build_education_repository() -> Repository<EducationalContent> {
    Repository::from_entries(vec![
        EducationalContent {
            id: "condition-dialysis".to_string(),
            content_type: ContentType::Condition,
            name: "Dialysis".to_string(),
            name_es: "Diálisis".to_string(),
            alternate_names: strings(&["Hemodialysis", "Hemodiálisis", "Peritoneal Dialysis", "Renal Replacement Therapy", "RRT"]),
            levels: levels([
                LevelContent::new(
                    "La diálisis limpia la sangre cuando los riñones no pueden. | Dialysis cleans the blood when the kidneys cannot.",
                    "Think of dialysis as an artificial kidney. Like a water filter, it takes out waste and extra water.",
                    &[("dialysis / diálisis", "A treatment that cleans the blood. | Un tratamiento que limpia la sangre.")],
                    &["A grandpa goes to a clinic three times a week so a machine can clean his blood."],
                ),
                LevelContent::new(
                    "Dialysis replaces kidney filtering when kidney function is nearly gone.",
                    "Hemodialysis filters blood through a machine, usually three times a week for 3-4 hours. Peritoneal dialysis uses the lining of the belly as a filter and can be done at home overnight.",
                    &[
                        ("hemodialysis", "Blood is filtered outside the body through a machine."),
                        ("fistula", "A surgical connection between an artery and a vein used for hemodialysis access."),
                    ],
                    &["A working mother chooses peritoneal dialysis so she can treat herself at home overnight."],
                ),
                LevelContent::new(
                    "Renal replacement therapy for end-stage kidney disease or refractory acute kidney injury.",
                    "Assess the access site for thrill and bruit, monitor for intradialytic hypotension, and track interdialytic weight gain and potassium.",
                    &[("ultrafiltration", "Removal of plasma water across the dialyzer membrane.")],
                    &["A patient becomes hypotensive midway through a session with high ultrafiltration goals."],
                ),
                LevelContent::new(
                    "Diffusion and convection across a semipermeable membrane correct uremia, acidosis and hyperkalemia.",
                    "Urgent indications follow AEIOU: acidosis, electrolytes, ingestions, overload, uremia. Kt/V quantifies delivered dose.",
                    &[("Kt/V", "Dimensionless measure of urea clearance per session.")],
                    &["Refractory hyperkalemia with ECG changes in a patient with AKI."],
                ),
                LevelContent::new(
                    "Modality selection, access planning and adequacy targets in chronic dialysis.",
                    "Fistula-first planning, incremental hemodialysis and conservative kidney management are weighed against comorbidity and patient goals.",
                    &[("incremental hemodialysis", "Starting with fewer weekly sessions while residual function persists.")],
                    &["Shared decision-making on conservative management in an elderly patient with multimorbidity."],
                ),
            ]),
            cross_references: vec![
                CrossReference::related("condition-hypertension", "condition", "Hypertension as a cause of kidney failure"),
                CrossReference::related("creatinine", "lab-test", "Creatinina / Creatinine"),
            ],
            tags: ContentTags {
                systems: strings(&["renal"]),
                topics: strings(&["nephrology"]),
                keywords: strings(&["diálisis", "dialysis", "kidney failure", "fistula"]),
            },
            created_at: "2026-02-05".to_string(),
            updated_at: "2026-02-05".to_string(),
            version: 1,
            status: ContentStatus::Published,
        },
        EducationalContent {
            id: "condition-type-2-diabetes".to_string(),
            content_type: ContentType::Condition,
            name: "Type 2 Diabetes".to_string(),
            name_es: "Diabetes tipo 2".to_string(),
            alternate_names: strings(&["T2DM", "Diabetes mellitus tipo 2", "Adult-onset diabetes"]),
            levels: levels([
                LevelContent::new(
                    "Diabetes means there is too much sugar in the blood.",
                    "Insulin is like a key that opens cells so sugar can get in. In type 2 diabetes the lock gets sticky.",
                    &[("insulin", "A helper that moves sugar from blood into the body's cells.")],
                    &["Playing outside and eating vegetables help the key work better."],
                ),
                LevelContent::new(
                    "Type 2 diabetes is a long-term condition where the body does not use insulin well.",
                    "High blood sugar over years can damage the eyes, kidneys, nerves and heart. Healthy eating, activity and medicines keep sugar in a safe range.",
                    &[("A1c", "A blood test showing average blood sugar over about three months.")],
                    &["A patient checks their sugar before breakfast and brings the log to each visit."],
                ),
                LevelContent::new(
                    "Chronic hyperglycemia from insulin resistance and progressive beta-cell dysfunction.",
                    "Monitor fingerstick glucose, screen for hypoglycemia with sulfonylureas or insulin, and reinforce foot care and medication adherence.",
                    &[("hypoglycemia", "Blood glucose below 70 mg/dL, treated with fast-acting carbohydrate.")],
                    &["Teaching the rule of 15 to a patient newly started on basal insulin."],
                ),
                LevelContent::new(
                    "Insulin resistance in muscle, liver and adipose tissue with relative insulin deficiency.",
                    "Diagnosis: A1c of 6.5% or more, fasting glucose of 126 mg/dL or more, or a 2-hour OGTT of 200 mg/dL or more. Metformin remains first-line absent specific comorbidity.",
                    &[("OGTT", "Oral glucose tolerance test measuring glucose two hours after a 75 g load.")],
                    &["Adding an SGLT2 inhibitor for a patient with heart failure and CKD."],
                ),
                LevelContent::new(
                    "Risk-based pharmacotherapy integrating cardiorenal protection and weight management.",
                    "GLP-1 receptor agonists and SGLT2 inhibitors are chosen for established cardiovascular or kidney disease independent of A1c.",
                    &[("GLP-1 receptor agonist", "Incretin-based therapy that lowers glucose and weight with cardiovascular benefit.")],
                    &["Deprescribing sulfonylureas in a frail older adult with recurrent hypoglycemia."],
                ),
            ]),
            cross_references: vec![
                CrossReference::related("glucose", "lab-test", "Glucosa / Glucose"),
                CrossReference::related("condition-dialysis", "condition", "Diabetic kidney disease leading to dialysis"),
            ],
            tags: ContentTags {
                systems: strings(&["endocrine"]),
                topics: strings(&["diabetes"]),
                keywords: strings(&["diabetes", "insulin", "glucose", "A1c"]),
            },
            created_at: "2026-02-10".to_string(),
            updated_at: "2026-03-01".to_string(),
            version: 2,
            status: ContentStatus::Published,
        },
        EducationalContent {
            id: "condition-hypertension".to_string(),
            content_type: ContentType::Condition,
            name: "Hypertension".to_string(),
            name_es: "Hipertensión".to_string(),
            alternate_names: strings(&["High blood pressure", "Presión arterial alta", "HTN"]),
            levels: levels([
                LevelContent::new(
                    "High blood pressure means the blood pushes too hard on the tubes it travels in.",
                    "Your heart is a pump and your blood vessels are hoses. If the pressure is too high for a long time, the hoses get hurt.",
                    &[("blood pressure", "How hard blood pushes on the walls of blood vessels.")],
                    &["A nurse puts a cuff on your arm that squeezes to measure the push."],
                ),
                LevelContent::new(
                    "Hypertension is blood pressure that stays at 130/80 or higher.",
                    "It usually causes no symptoms but raises the risk of stroke, heart attack and kidney disease. Less salt, more activity and medicines bring it down.",
                    &[("systolic", "The top number: pressure when the heart beats.")],
                    &["Checking blood pressure at home twice a day for a week before a visit."],
                ),
                LevelContent::new(
                    "Sustained elevation of arterial pressure requiring lifestyle and pharmacologic management.",
                    "Use correct cuff size and seated technique. Escalate for readings of 180/120 or higher with symptoms of end-organ damage.",
                    &[("hypertensive emergency", "Severe hypertension with acute end-organ injury.")],
                    &["Recognizing headache and confusion with a pressure of 210/130 as an emergency."],
                ),
                LevelContent::new(
                    "Increased systemic vascular resistance and volume expansion drive most primary hypertension.",
                    "Screen for secondary causes in resistant or early-onset disease: primary aldosteronism, renal artery stenosis, sleep apnea.",
                    &[("resistant hypertension", "Uncontrolled pressure on three agents including a diuretic.")],
                    &["Checking an aldosterone-to-renin ratio in hypertension with hypokalemia."],
                ),
                LevelContent::new(
                    "Target-driven therapy informed by cardiovascular risk and current guideline thresholds.",
                    "Single-pill combinations improve adherence; spironolactone is the preferred fourth agent in resistant hypertension.",
                    &[("single-pill combination", "Two or more antihypertensives combined in one tablet.")],
                    &["Intensifying therapy toward a systolic target below 130 in high-risk CKD."],
                ),
            ]),
            cross_references: vec![
                CrossReference::related("condition-dialysis", "condition", "Kidney failure and dialysis"),
                CrossReference {
                    target_id: "condition-heart-failure".to_string(),
                    target_type: "condition".to_string(),
                    relationship: Relationship::SeeAlso,
                    label: "Insuficiencia cardiaca / Heart failure".to_string(),
                },
            ],
            tags: ContentTags {
                systems: strings(&["cardiovascular"]),
                topics: strings(&["cardiology"]),
                keywords: strings(&["blood pressure", "presión arterial", "hypertension"]),
            },
            created_at: "2026-02-12".to_string(),
            updated_at: "2026-02-12".to_string(),
            version: 1,
            status: ContentStatus::Review,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_try_from() {
        assert_eq!(ComplexityLevel::try_from(1), Ok(ComplexityLevel::Child));
        assert_eq!(ComplexityLevel::try_from(5), Ok(ComplexityLevel::Physician));
        assert_eq!(ComplexityLevel::try_from(0), Err(InvalidLevel(0)));
        assert_eq!(ComplexityLevel::try_from(6), Err(InvalidLevel(6)));
    }

    #[test]
    fn test_level_metadata() {
        assert_eq!(ComplexityLevel::Nursing.name(), "Nursing/Allied Health");
        assert_eq!(ComplexityLevel::Patient.readability_grade_range(), (6, 8));
        assert_eq!(ComplexityLevel::Physician.number(), 5);
    }

    #[test]
    fn test_get_level() {
        let level = get_level("condition-dialysis", ComplexityLevel::Child).expect("level 1");
        assert!(level.summary.contains("Dialysis"));
        assert!(get_level("condition-dialysis-missing", ComplexityLevel::Child).is_none());
    }

    #[test]
    fn test_available_levels() {
        assert_eq!(available_levels("condition-hypertension"), ComplexityLevel::ALL.to_vec());
        assert!(available_levels("nope").is_empty());
    }

    #[test]
    fn test_search_reaches_level_text() {
        let hits: Vec<_> = search_education("kt/v").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(hits, vec!["condition-dialysis"]);
    }

    #[test]
    fn test_repeated_field_scores_once() {
        let dialysis = get_educational_content("condition-dialysis").expect("dialysis");
        // "hemodialysis" appears in several level explanations
        let score = dialysis.score_folded("hemodialysis");
        assert_eq!(
            score,
            weights::SIGNIFICANCE + weights::DESCRIPTION + weights::LIST
        );
    }

    #[test]
    fn test_levels_serialize_as_numbers() {
        let json = serde_json::to_value(get_educational_content("condition-hypertension").unwrap()).unwrap();
        assert!(json["levels"]["1"]["summary"].is_string());
        assert_eq!(json["content_type"], "condition");
        assert_eq!(json["status"], "review");
    }
}
