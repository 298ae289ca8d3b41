//! History entry model.

use crate::diagnosis::{DetectionResult, RemedyResult};
use crate::image::ImagePayload;
use serde::{Deserialize, Serialize};

/// One persisted, immutable history entry.
///
/// A record merges one detection result with its associated remedy result
/// and is created exactly once per completed run. Records are only ever
/// appended at the head of the log (most-recent-first), never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Unique record identifier (UUID format).
    pub id: String,
    /// Timestamp when the record was created (ISO 8601 format).
    pub created_at: String,
    /// Snapshot of the analyzed image, stored in its data-URI wire form.
    pub image: String,
    pub plant_name: String,
    pub disease: String,
    /// Display-smoothed confidence, as shown for this run.
    pub confidence: f64,
    pub causes: Vec<String>,
    pub remedies: Vec<String>,
    pub supplements: Option<Vec<String>>,
}

impl AnalysisRecord {
    /// Builds a record from one completed run.
    pub fn from_run(
        image: &ImagePayload,
        detection: &DetectionResult,
        remedy: &RemedyResult,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            image: image.to_data_uri(),
            plant_name: detection.plant_name.clone(),
            disease: detection.disease.clone(),
            confidence: detection.confidence,
            causes: remedy.possible_causes.clone(),
            remedies: remedy.remedies.clone(),
            supplements: remedy.supplements.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_run_snapshots_all_fields() {
        let image = ImagePayload::from_bytes(vec![1, 2, 3], "image/jpeg").unwrap();
        let detection = DetectionResult {
            plant_name: "Tomato".to_string(),
            disease: "Blight".to_string(),
            confidence: 0.77,
        };
        let remedy = RemedyResult {
            possible_causes: vec!["Fungal infection".to_string()],
            remedies: vec!["Remove affected leaves".to_string()],
            supplements: Some(vec!["Copper fungicide".to_string()]),
        };

        let record = AnalysisRecord::from_run(&image, &detection, &remedy);

        assert!(!record.id.is_empty());
        assert_eq!(record.image, image.to_data_uri());
        assert_eq!(record.plant_name, "Tomato");
        assert_eq!(record.disease, "Blight");
        assert_eq!(record.confidence, 0.77);
        assert_eq!(record.causes, vec!["Fungal infection"]);
        assert_eq!(record.remedies, vec!["Remove affected leaves"]);
        assert_eq!(record.supplements.as_deref(), Some(&["Copper fungicide".to_string()][..]));
    }

    #[test]
    fn records_get_unique_ids() {
        let image = ImagePayload::from_bytes(vec![1], "image/png").unwrap();
        let detection = DetectionResult {
            plant_name: "Rose".to_string(),
            disease: String::new(),
            confidence: 1.0,
        };
        let remedy = RemedyResult {
            possible_causes: vec![],
            remedies: vec![],
            supplements: None,
        };

        let a = AnalysisRecord::from_run(&image, &detection, &remedy);
        let b = AnalysisRecord::from_run(&image, &detection, &remedy);
        assert_ne!(a.id, b.id);
    }
}
