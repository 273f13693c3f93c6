//! Oncology condition database.
//!
//! Bilingual reference entries for solid tumors and hematologic
//! malignancies, with staging, diagnostics and treatment summaries.

use super::strings;
use crate::content_category;
use crate::entry::Entry;
use crate::repository::Repository;
use crate::search::{weights, ScoredEntry};
use crate::Searchable;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

content_category! {
    /// Broad oncology grouping used for filtering.
    pub enum OncologyCategory: "oncology" {
        SolidTumor => "solid-tumor",
        Hematologic => "hematologic",
    }
}

/// Diagnostic workup for a condition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Searchable)]
pub struct Diagnostics {
    /// Laboratory and pathology tests.
    #[search(weight = weights::LIST)]
    pub tests: Vec<String>,
    #[search(weight = weights::LIST)]
    pub imaging: Vec<String>,
    /// Criteria that establish the diagnosis.
    #[search(weight = weights::LIST)]
    pub criteria: Vec<String>,
}

impl Diagnostics {
    pub fn new(tests: &[&str], imaging: &[&str], criteria: &[&str]) -> Self {
        Self {
            tests: strings(tests),
            imaging: strings(imaging),
            criteria: strings(criteria),
        }
    }
}

/// Treatment approach for a condition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Searchable)]
pub struct Treatment {
    #[search(weight = weights::LIST)]
    pub medications: Vec<String>,
    #[search(weight = weights::LIST)]
    pub procedures: Vec<String>,
    #[search(weight = weights::LIST)]
    pub lifestyle: Vec<String>,
}

impl Treatment {
    pub fn new(medications: &[&str], procedures: &[&str], lifestyle: &[&str]) -> Self {
        Self {
            medications: strings(medications),
            procedures: strings(procedures),
            lifestyle: strings(lifestyle),
        }
    }
}

/// One oncology condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Searchable)]
pub struct OncologyCondition {
    #[search(weight = weights::IDENTIFIER)]
    pub id: String,
    #[search(weight = weights::NAME)]
    pub name: String,
    #[search(weight = weights::NAME)]
    pub name_es: String,
    #[search(weight = weights::SIGNIFICANCE)]
    pub category: OncologyCategory,
    /// ICD-11 code.
    #[search(weight = weights::SIGNIFICANCE)]
    pub icd11: String,
    #[search]
    pub description: String,
    #[search]
    pub pathophysiology: String,
    #[search(weight = weights::LIST)]
    pub risk_factors: Vec<String>,
    /// Presenting signs and symptoms.
    #[search(weight = weights::LIST)]
    pub clinical_features: Vec<String>,
    #[search]
    pub staging: String,
    #[search(flatten)]
    pub diagnostics: Diagnostics,
    #[search(flatten)]
    pub treatment: Treatment,
    #[search]
    pub prognosis: String,
    /// Plain-language summary for patients.
    #[search]
    pub patient_explanation: String,
}

impl Entry for OncologyCondition {
    type Category = OncologyCategory;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> OncologyCategory {
        self.category
    }

    fn name(&self) -> &str {
        &self.name
    }
}

static ONCOLOGY_DATABASE: LazyLock<Repository<OncologyCondition>> =
    LazyLock::new(build_oncology_repository);

/// The process-wide oncology repository.
pub fn oncology_repository() -> &'static Repository<OncologyCondition> {
    &ONCOLOGY_DATABASE
}

/// Look up a condition by id.
pub fn get_oncology_condition(id: &str) -> Option<&'static OncologyCondition> {
    ONCOLOGY_DATABASE.get(id)
}

/// Substring search across every designated field.
pub fn search_oncology(query: &str) -> Vec<&'static OncologyCondition> {
    ONCOLOGY_DATABASE.search(query)
}

pub fn filter_oncology_by_category(categories: &[OncologyCategory]) -> Vec<&'static OncologyCondition> {
    ONCOLOGY_DATABASE.filter_by_category(categories)
}

/// Scored search, best match first.
pub fn full_text_search_oncology(query: &str) -> Vec<&'static OncologyCondition> {
    ONCOLOGY_DATABASE.full_text_search(query)
}

pub fn ranked_oncology(query: &str) -> Vec<ScoredEntry<&'static OncologyCondition>> {
    ONCOLOGY_DATABASE.ranked(query)
}

pub fn oncology_condition_count() -> usize {
    ONCOLOGY_DATABASE.count()
}

pub fn oncology_categories() -> Vec<OncologyCategory> {
    ONCOLOGY_DATABASE.categories()
}

/// Conditions with a clinical feature containing `symptom`.
pub fn filter_oncology_by_symptom(symptom: &str) -> Vec<&'static OncologyCondition> {
    ONCOLOGY_DATABASE.filter_by_field("clinical_features", symptom)
}

fn build_oncology_repository() -> Repository<OncologyCondition> {
    Repository::from_entries(vec![
        // ====================================================================
        // SOLID TUMORS
        // ====================================================================
        OncologyCondition {
            id: "breast-cancer".to_string(),
            name: "Breast Cancer".to_string(),
            name_es: "Cáncer de mama".to_string(),
            category: OncologyCategory::SolidTumor,
            icd11: "2C60".to_string(),
            description: "Most common cancer in women; a heterogeneous disease classified by receptor status (ER, PR, HER2).".to_string(),
            pathophysiology: "Malignant transformation of ductal or lobular epithelium driven by hormone signalling, HER2 amplification or loss of DNA repair (BRCA1/2).".to_string(),
            risk_factors: strings(&[
                "Female sex and increasing age",
                "BRCA1/BRCA2 mutations",
                "Family history (first-degree relative)",
                "Early menarche or late menopause",
                "Hormone replacement therapy, obesity, alcohol",
                "Prior chest radiation",
            ]),
            clinical_features: strings(&[
                "Painless breast mass",
                "Nipple discharge or retraction",
                "Skin changes (peau d'orange, dimpling)",
                "Axillary lymphadenopathy",
            ]),
            staging: "TNM (AJCC 8th) plus prognostic staging incorporating grade, ER/PR, HER2 and genomic assays.".to_string(),
            diagnostics: Diagnostics::new(
                &["Core needle biopsy with ER, PR, HER2, Ki-67", "Genomic assays (Oncotype DX, MammaPrint)"],
                &["Diagnostic mammogram", "Ultrasound", "MRI for extent of disease"],
                &["Histologic confirmation of invasive carcinoma"],
            ),
            treatment: Treatment::new(
                &["Tamoxifen or aromatase inhibitor", "Trastuzumab + pertuzumab (HER2+)", "Pembrolizumab (triple-negative)"],
                &["Lumpectomy + radiation", "Mastectomy", "Sentinel lymph node biopsy"],
                &["Limit alcohol", "Regular physical activity"],
            ),
            prognosis: "Overall 5-year survival around 90%; stage IV around 28%. ER-positive disease carries the best long-term outlook.".to_string(),
            patient_explanation: "Treatment is personalized to your tumor's characteristics. Many people are cured with surgery, radiation and medicines tailored to their cancer type.".to_string(),
        },
        OncologyCondition {
            id: "lung-cancer-nsclc".to_string(),
            name: "Non-Small Cell Lung Cancer".to_string(),
            name_es: "Cáncer de pulmón de células no pequeñas".to_string(),
            category: OncologyCategory::SolidTumor,
            icd11: "2C25".to_string(),
            description: "Most common lung cancer type (about 85%), including adenocarcinoma, squamous cell and large cell subtypes.".to_string(),
            pathophysiology: "Carcinogen-induced mutations in bronchial epithelium; driver alterations (EGFR, ALK, ROS1, KRAS G12C) sustain tumor growth.".to_string(),
            risk_factors: strings(&[
                "Tobacco smoking",
                "Radon exposure",
                "Asbestos and occupational carcinogens",
                "Air pollution",
            ]),
            clinical_features: strings(&[
                "Persistent cough",
                "Hemoptysis",
                "Dyspnea and chest pain",
                "Weight loss and fatigue",
                "Hoarseness",
            ]),
            staging: "TNM staging I-IV; PET/CT and brain MRI complete the staging workup.".to_string(),
            diagnostics: Diagnostics::new(
                &["Molecular testing: EGFR, ALK, ROS1, BRAF, PD-L1, KRAS G12C", "Pulmonary function tests"],
                &["CT chest with contrast", "PET/CT", "Brain MRI"],
                &["Tissue biopsy (bronchoscopy, CT-guided or surgical)"],
            ),
            treatment: Treatment::new(
                &["Osimertinib (EGFR+)", "Alectinib (ALK+)", "Pembrolizumab", "Durvalumab consolidation"],
                &["Lobectomy", "Concurrent chemoradiation"],
                &["Smoking cessation"],
            ),
            prognosis: "Stage I 5-year survival 70-90%; stage IV 5-10%, improved by targeted therapy and immunotherapy.".to_string(),
            patient_explanation: "Molecular testing of your tumor can identify targeted treatments that may work better and be easier to tolerate than traditional chemotherapy.".to_string(),
        },
        OncologyCondition {
            id: "colorectal-cancer".to_string(),
            name: "Colorectal Cancer".to_string(),
            name_es: "Cáncer colorrectal".to_string(),
            category: OncologyCategory::SolidTumor,
            icd11: "2B91".to_string(),
            description: "Third most common cancer; arises from adenomatous polyps through the adenoma-carcinoma sequence.".to_string(),
            pathophysiology: "Stepwise accumulation of APC, KRAS and TP53 mutations, or mismatch-repair deficiency in Lynch syndrome.".to_string(),
            risk_factors: strings(&[
                "Age over 45",
                "Adenomatous polyps",
                "Inflammatory bowel disease",
                "Lynch syndrome or FAP",
                "Red and processed meat, low fiber diet",
            ]),
            clinical_features: strings(&[
                "Change in bowel habits",
                "Rectal bleeding",
                "Iron deficiency anemia",
                "Abdominal pain",
                "Weight loss",
            ]),
            staging: "TNM (AJCC 8th): stage III is node-positive, stage IV has distant metastases, commonly liver or lung.".to_string(),
            diagnostics: Diagnostics::new(
                &["CEA level", "MSI/MMR testing", "KRAS/NRAS/BRAF testing"],
                &["CT chest/abdomen/pelvis", "MRI pelvis for rectal cancer"],
                &["Colonoscopy with biopsy"],
            ),
            treatment: Treatment::new(
                &["FOLFOX", "FOLFIRI", "Bevacizumab", "Pembrolizumab (MSI-H)"],
                &["Surgical resection", "Neoadjuvant chemoradiation (rectal)"],
                &["High fiber diet", "Screening colonoscopy for relatives"],
            ),
            prognosis: "Stage I above 90% 5-year survival; stage IV 10-15%, higher when liver metastases are resectable.".to_string(),
            patient_explanation: "Screening colonoscopies can find and remove polyps before they become cancer. Treatment depends on the stage and the tumor's molecular features.".to_string(),
        },
        OncologyCondition {
            id: "prostate-cancer".to_string(),
            name: "Prostate Cancer".to_string(),
            name_es: "Cáncer de próstata".to_string(),
            category: OncologyCategory::SolidTumor,
            icd11: "2C82".to_string(),
            description: "Most common non-skin cancer in men; usually adenocarcinoma with a highly variable natural history.".to_string(),
            pathophysiology: "Androgen-dependent growth of glandular epithelium; castration resistance emerges through androgen receptor pathway alterations.".to_string(),
            risk_factors: strings(&[
                "Age over 50",
                "African ancestry",
                "Family history (BRCA2 mutations)",
                "Obesity",
            ]),
            clinical_features: strings(&[
                "Often asymptomatic (detected by PSA)",
                "Urinary frequency, hesitancy, nocturia",
                "Hematuria",
                "Bone pain in metastatic disease",
            ]),
            staging: "TNM plus Gleason score (Grade Group 1-5) and PSA level define risk groups.".to_string(),
            diagnostics: Diagnostics::new(
                &["PSA", "Germline genetic testing (BRCA2)"],
                &["Multiparametric prostate MRI", "PSMA-PET", "Bone scan"],
                &["Transperineal biopsy with ISUP grading"],
            ),
            treatment: Treatment::new(
                &["Androgen deprivation therapy", "Abiraterone", "Enzalutamide", "Docetaxel"],
                &["Active surveillance", "Radical prostatectomy", "External beam radiation"],
                &["Pelvic floor exercises"],
            ),
            prognosis: "Localized disease above 98% 5-year survival; distant disease around 30% and improving.".to_string(),
            patient_explanation: "Many prostate cancers grow slowly and may only need monitoring. If treatment is needed there are many effective options.".to_string(),
        },
        // ====================================================================
        // HEMATOLOGIC MALIGNANCIES
        // ====================================================================
        OncologyCondition {
            id: "all-leukemia".to_string(),
            name: "Acute Lymphoblastic Leukemia".to_string(),
            name_es: "Leucemia linfoblástica aguda".to_string(),
            category: OncologyCategory::Hematologic,
            icd11: "2B33.3".to_string(),
            description: "Malignant proliferation of lymphoid precursors; the most common childhood cancer.".to_string(),
            pathophysiology: "Clonal lymphoblasts replace normal marrow, causing cytopenias; cytogenetics such as BCR-ABL1 define risk.".to_string(),
            risk_factors: strings(&[
                "Age 2-5 years",
                "Down syndrome",
                "Prior chemotherapy or radiation",
            ]),
            clinical_features: strings(&[
                "Fatigue and pallor",
                "Fever and infections",
                "Easy bruising or bleeding",
                "Bone pain",
                "Lymphadenopathy",
            ]),
            staging: "Risk-stratified rather than staged: age, white count, cytogenetics and minimal residual disease.".to_string(),
            diagnostics: Diagnostics::new(
                &["CBC with peripheral smear", "Flow cytometry", "Cytogenetics (BCR-ABL1)", "Lumbar puncture"],
                &["Chest imaging for mediastinal mass"],
                &["Bone marrow with at least 20% lymphoblasts"],
            ),
            treatment: Treatment::new(
                &["Multi-agent induction chemotherapy", "Imatinib or dasatinib (Ph+)", "Blinatumomab"],
                &["CNS prophylaxis", "Allogeneic stem cell transplant", "CAR-T therapy"],
                &["Infection precautions"],
            ),
            prognosis: "Childhood cure rates near 90%; adults fare worse, improved by targeted and cellular therapy.".to_string(),
            patient_explanation: "This blood cancer is very treatable, especially in children. Treatment happens in phases over about two to three years.".to_string(),
        },
        OncologyCondition {
            id: "nhl-lymphoma".to_string(),
            name: "Non-Hodgkin Lymphoma".to_string(),
            name_es: "Linfoma no Hodgkin".to_string(),
            category: OncologyCategory::Hematologic,
            icd11: "2A81".to_string(),
            description: "Diverse group of lymphoid malignancies; diffuse large B-cell lymphoma is the most common aggressive subtype.".to_string(),
            pathophysiology: "Clonal expansion of B or T lymphocytes within lymph nodes or extranodal tissue.".to_string(),
            risk_factors: strings(&[
                "Immunosuppression",
                "HIV infection",
                "Autoimmune disease",
                "EBV or H. pylori infection",
            ]),
            clinical_features: strings(&[
                "Painless lymphadenopathy",
                "B symptoms: fever, night sweats, weight loss",
                "Fatigue",
                "Abdominal fullness",
            ]),
            staging: "Lugano classification (stage I-IV) with the International Prognostic Index.".to_string(),
            diagnostics: Diagnostics::new(
                &["Excisional lymph node biopsy", "LDH", "Immunohistochemistry"],
                &["PET/CT"],
                &["Histologic subtype per WHO classification"],
            ),
            treatment: Treatment::new(
                &["R-CHOP", "Polatuzumab-based regimens", "Rituximab"],
                &["Involved-site radiation", "CAR-T therapy for relapse"],
                &[],
            ),
            prognosis: "Diffuse large B-cell lymphoma is curable in about 60-70% with first-line R-CHOP.".to_string(),
            patient_explanation: "Lymphoma is a cancer of the immune cells. Many types respond very well to treatment, and some are cured.".to_string(),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_oncology_condition() {
        let breast = get_oncology_condition("breast-cancer").expect("breast-cancer should exist");
        assert_eq!(breast.category, OncologyCategory::SolidTumor);
        assert_eq!(breast.icd11, "2C60");
        assert!(get_oncology_condition("nonexistent").is_none());
    }

    #[test]
    fn test_condition_count() {
        assert_eq!(oncology_condition_count(), 6);
    }

    #[test]
    fn test_filter_by_symptom() {
        let hits: Vec<_> = filter_oncology_by_symptom("BONE PAIN").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(hits, vec!["prostate-cancer", "all-leukemia"]);
    }

    #[test]
    fn test_spanish_name_is_searchable() {
        let hits = search_oncology("próstata");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "prostate-cancer");
    }

    #[test]
    fn test_nested_fields_are_searchable() {
        let hits: Vec<_> = search_oncology("r-chop").iter().map(|c| c.id.as_str()).collect();
        assert_eq!(hits, vec!["nhl-lymphoma"]);
    }

    #[test]
    fn test_categories_in_first_appearance_order() {
        assert_eq!(
            oncology_categories(),
            vec![OncologyCategory::SolidTumor, OncologyCategory::Hematologic]
        );
    }
}
