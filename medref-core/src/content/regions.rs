//! Anatomical region content.
//!
//! A viewer passes a region id and gets back either the region's tissue,
//! condition and function sections or an explicit "in development" marker.

use crate::content_category;
use crate::entry::Entry;
use crate::repository::Repository;
use crate::search::weights;
use crate::Searchable;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Shown in place of a region that has no content yet.
pub const IN_DEVELOPMENT_MESSAGE: &str =
    "Content for this region is being developed. | El contenido de esta región está en desarrollo.";

content_category! {
    /// Organ system a region belongs to.
    pub enum BodySystem: "body system" {
        Cardiovascular => "cardiovascular",
        Respiratory => "respiratory",
        Digestive => "digestive",
        Renal => "renal",
        Nervous => "nervous",
        Musculoskeletal => "musculoskeletal",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TissueClass {
    Epithelial,
    Connective,
    Muscle,
    Nervous,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TissueType {
    pub name: String,
    pub class: TissueClass,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCondition {
    pub name: String,
    pub name_es: String,
    pub description: String,
    /// Id of a fuller entry elsewhere in the catalog, unchecked.
    pub linked_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFunction {
    pub name: String,
    pub description: String,
}

/// Everything shown for one anatomical region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Searchable)]
pub struct RegionContent {
    #[search(weight = weights::IDENTIFIER)]
    pub region_id: String,
    #[search(weight = weights::NAME)]
    pub name: String,
    #[search(weight = weights::NAME)]
    pub name_es: String,
    #[search(weight = weights::SIGNIFICANCE)]
    pub system: BodySystem,
    #[search]
    pub description: String,
    pub tissue_types: Vec<TissueType>,
    pub conditions: Vec<RegionCondition>,
    pub functions: Vec<RegionFunction>,
}

impl Entry for RegionContent {
    type Category = BodySystem;

    fn id(&self) -> &str {
        &self.region_id
    }

    fn category(&self) -> BodySystem {
        self.system
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Result of asking for a region's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ContentAvailability<'a> {
    Available { content: &'a RegionContent },
    InDevelopment { region_id: &'a str },
}

impl<'a> ContentAvailability<'a> {
    pub fn content(&self) -> Option<&'a RegionContent> {
        match self {
            ContentAvailability::Available { content } => Some(content),
            ContentAvailability::InDevelopment { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ContentAvailability::Available { .. })
    }

    /// Bilingual placeholder text, or `None` when content exists.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            ContentAvailability::Available { .. } => None,
            ContentAvailability::InDevelopment { .. } => Some(IN_DEVELOPMENT_MESSAGE),
        }
    }
}

static REGION_DATABASE: LazyLock<Repository<RegionContent>> = LazyLock::new(build_region_repository);

pub fn region_repository() -> &'static Repository<RegionContent> {
    &REGION_DATABASE
}

/// Content for a region, or the in-development marker.
pub fn get_region_content(region_id: &str) -> ContentAvailability<'_> {
    match REGION_DATABASE.get(region_id) {
        Some(content) => ContentAvailability::Available { content },
        None => ContentAvailability::InDevelopment { region_id },
    }
}

pub fn regions_by_system(systems: &[BodySystem]) -> Vec<&'static RegionContent> {
    REGION_DATABASE.filter_by_category(systems)
}

fn tissue(name: &str, class: TissueClass, description: &str) -> TissueType {
    TissueType {
        name: name.to_string(),
        class,
        description: description.to_string(),
    }
}

fn condition(name: &str, name_es: &str, description: &str, linked_id: Option<&str>) -> RegionCondition {
    RegionCondition {
        name: name.to_string(),
        name_es: name_es.to_string(),
        description: description.to_string(),
        linked_id: linked_id.map(str::to_string),
    }
}

fn function(name: &str, description: &str) -> RegionFunction {
    RegionFunction {
        name: name.to_string(),
        description: description.to_string(),
    }
}

fn build_region_repository() -> Repository<RegionContent> {
    Repository::from_entries(vec![
        RegionContent {
            region_id: "heart".to_string(),
            name: "Heart".to_string(),
            name_es: "Corazón".to_string(),
            system: BodySystem::Cardiovascular,
            description: "Four-chambered muscular pump driving the pulmonary and systemic circulations.".to_string(),
            tissue_types: vec![
                tissue("Cardiac muscle", TissueClass::Muscle, "Striated, branched cells joined by intercalated discs."),
                tissue("Endocardium", TissueClass::Epithelial, "Endothelial lining of the chambers and valves."),
            ],
            conditions: vec![
                condition("Hypertensive heart disease", "Cardiopatía hipertensiva", "Left ventricular hypertrophy from chronic pressure overload.", Some("condition-hypertension")),
                condition("Myocardial infarction", "Infarto de miocardio", "Necrosis of heart muscle from coronary occlusion.", None),
            ],
            functions: vec![
                function("Pumping", "Ejects about 5 L of blood per minute at rest."),
                function("Electrical conduction", "SA node impulses spread through the AV node and His-Purkinje system."),
            ],
        },
        RegionContent {
            region_id: "lungs".to_string(),
            name: "Lungs".to_string(),
            name_es: "Pulmones".to_string(),
            system: BodySystem::Respiratory,
            description: "Paired organs where alveolar gas exchange adds oxygen to and removes carbon dioxide from the blood.".to_string(),
            tissue_types: vec![
                tissue("Alveolar epithelium", TissueClass::Epithelial, "Type I cells for diffusion, type II cells secreting surfactant."),
                tissue("Bronchial smooth muscle", TissueClass::Muscle, "Regulates airway diameter."),
            ],
            conditions: vec![
                condition("Lung cancer", "Cáncer de pulmón", "Malignancy of bronchial or alveolar epithelium.", Some("lung-cancer-nsclc")),
                condition("Pneumonia", "Neumonía", "Infection filling alveoli with inflammatory exudate.", None),
            ],
            functions: vec![function("Gas exchange", "Oxygen and carbon dioxide diffuse across the alveolar-capillary membrane.")],
        },
        RegionContent {
            region_id: "kidneys".to_string(),
            name: "Kidneys".to_string(),
            name_es: "Riñones".to_string(),
            system: BodySystem::Renal,
            description: "Retroperitoneal organs that filter plasma and regulate fluid, electrolytes and blood pressure.".to_string(),
            tissue_types: vec![
                tissue("Glomerular endothelium", TissueClass::Epithelial, "Fenestrated filtration barrier."),
                tissue("Renal interstitium", TissueClass::Connective, "Supports tubules and hosts EPO-producing cells."),
            ],
            conditions: vec![
                condition("Kidney failure", "Insuficiencia renal", "Loss of filtration requiring dialysis or transplant.", Some("condition-dialysis")),
            ],
            functions: vec![
                function("Filtration", "About 180 L of plasma filtered each day."),
                function("Hormone production", "Erythropoietin, renin and active vitamin D."),
            ],
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_region() {
        let availability = get_region_content("heart");
        assert!(availability.is_available());
        assert_eq!(availability.content().map(|c| c.name.as_str()), Some("Heart"));
        assert!(availability.placeholder().is_none());
    }

    #[test]
    fn test_missing_region_is_in_development() {
        let availability = get_region_content("spleen");
        assert_eq!(availability, ContentAvailability::InDevelopment { region_id: "spleen" });
        let message = availability.placeholder().expect("placeholder");
        assert!(message.contains("being developed"));
        assert!(message.contains("en desarrollo"));
    }

    #[test]
    fn test_availability_serializes_with_status_tag() {
        let json = serde_json::to_value(get_region_content("spleen")).unwrap();
        assert_eq!(json["status"], "in-development");
        assert_eq!(json["region_id"], "spleen");
    }
}
