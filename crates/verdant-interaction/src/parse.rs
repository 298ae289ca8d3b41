//! Parsing of model replies into typed stage results.
//!
//! Models occasionally wrap their JSON in markdown fences despite the
//! prompt contract, so the fences are stripped before deserializing. A
//! missing field is a malformed response, never a partial result.

use serde::Deserialize;
use verdant_core::diagnosis::{DetectionResult, ModelError, RemedyResult};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetectionWire {
    plant_name: String,
    disease: String,
    confidence: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemedyWire {
    possible_causes: Vec<String>,
    remedies: Vec<String>,
    #[serde(default)]
    supplements: Option<Vec<String>>,
}

/// Strips a surrounding markdown code fence, if present.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

pub(crate) fn detection_from_text(text: &str) -> Result<DetectionResult, ModelError> {
    let wire: DetectionWire = serde_json::from_str(extract_json(text))
        .map_err(|e| ModelError::Malformed(format!("detection reply: {e}")))?;

    Ok(DetectionResult {
        plant_name: wire.plant_name,
        disease: wire.disease,
        confidence: wire.confidence,
    })
}

pub(crate) fn remedy_from_text(text: &str) -> Result<RemedyResult, ModelError> {
    let wire: RemedyWire = serde_json::from_str(extract_json(text))
        .map_err(|e| ModelError::Malformed(format!("remedy reply: {e}")))?;

    Ok(RemedyResult {
        possible_causes: wire.possible_causes,
        remedies: wire.remedies,
        supplements: wire.supplements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_detection_json() {
        let result = detection_from_text(
            r#"{"plantName": "Tomato", "disease": "Blight", "confidence": 0.77}"#,
        )
        .unwrap();

        assert_eq!(result.plant_name, "Tomato");
        assert_eq!(result.disease, "Blight");
        assert_eq!(result.confidence, 0.77);
    }

    #[test]
    fn parses_fenced_detection_json() {
        let reply = "```json\n{\"plantName\": \"Rose\", \"disease\": \"\", \"confidence\": 1.0}\n```";
        let result = detection_from_text(reply).unwrap();
        assert_eq!(result.plant_name, "Rose");
    }

    #[test]
    fn parses_fence_without_language_tag() {
        let reply = "```\n{\"plantName\": \"Fern\", \"disease\": \"Rust\", \"confidence\": 0.6}\n```";
        assert!(detection_from_text(reply).is_ok());
    }

    #[test]
    fn missing_detection_field_is_malformed() {
        let err = detection_from_text(r#"{"plantName": "Tomato", "confidence": 0.5}"#).unwrap_err();
        assert!(matches!(err, ModelError::Malformed(_)));
    }

    #[test]
    fn integer_confidence_is_accepted() {
        let result =
            detection_from_text(r#"{"plantName": "Oak", "disease": "None", "confidence": 1}"#)
                .unwrap();
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn parses_remedy_with_supplements() {
        let result = remedy_from_text(
            r#"{"possibleCauses": ["Fungal infection"], "remedies": ["Remove affected leaves"], "supplements": ["Copper fungicide"]}"#,
        )
        .unwrap();

        assert_eq!(result.possible_causes, vec!["Fungal infection"]);
        assert_eq!(result.remedies, vec!["Remove affected leaves"]);
        assert_eq!(
            result.supplements,
            Some(vec!["Copper fungicide".to_string()])
        );
    }

    #[test]
    fn remedy_supplements_are_optional() {
        let result = remedy_from_text(
            r#"{"possibleCauses": ["Overwatering"], "remedies": ["Water less often"]}"#,
        )
        .unwrap();

        assert!(result.supplements.is_none());
    }

    #[test]
    fn missing_remedies_field_is_malformed() {
        let err = remedy_from_text(r#"{"possibleCauses": []}"#).unwrap_err();
        assert!(matches!(err, ModelError::Malformed(_)));
    }

    #[test]
    fn prose_reply_is_malformed() {
        assert!(detection_from_text("I think this is a tomato plant.").is_err());
    }
}
