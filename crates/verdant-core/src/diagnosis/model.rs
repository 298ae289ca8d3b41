//! Diagnosis result models.
//!
//! Sentinel strings stand in for structured optionals on the model wire:
//! an unidentifiable subject is reported as the plant name `"unknown"`, and
//! a healthy plant as the disease `"No disease detected"`.

use serde::{Deserialize, Serialize};

/// Plant name reported when the model could not identify the subject.
pub const UNKNOWN_PLANT_SENTINEL: &str = "unknown";

/// Disease label reported when no disease is present.
pub const NO_DISEASE_SENTINEL: &str = "No disease detected";

/// Output of the detection stage: one classification per invocation.
///
/// All three fields are always populated; a partially missing response is a
/// model error, never a partial result. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Detected plant name, or the unknown-plant sentinel.
    pub plant_name: String,
    /// Detected disease label, or the no-disease sentinel.
    pub disease: String,
    /// Model-reported confidence scalar.
    pub confidence: f64,
}

impl DetectionResult {
    /// Whether the model failed to identify the plant.
    ///
    /// An empty plant name and the literal sentinel (any case) both count.
    pub fn is_unknown_plant(&self) -> bool {
        self.plant_name.is_empty()
            || self.plant_name.eq_ignore_ascii_case(UNKNOWN_PLANT_SENTINEL)
    }

    /// The disease label with an empty value normalized to the sentinel.
    pub fn disease_label(&self) -> &str {
        if self.disease.is_empty() {
            NO_DISEASE_SENTINEL
        } else {
            &self.disease
        }
    }

    /// Whether this detection reported a healthy plant.
    pub fn is_healthy(&self) -> bool {
        self.disease_label() == NO_DISEASE_SENTINEL
    }

    /// Synthesizes the plant description handed to the remedy stage.
    pub fn plant_description(&self) -> String {
        format!(
            "Plant name: {}, Disease: {}",
            self.plant_name,
            self.disease_label()
        )
    }
}

/// Output of the remedy stage.
///
/// `possible_causes` and `remedies` are always present (possibly empty);
/// `supplements` is only expected for real-disease cases, and only when the
/// model supplies them. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemedyResult {
    pub possible_causes: Vec<String>,
    pub remedies: Vec<String>,
    pub supplements: Option<Vec<String>>,
}
