//! Prompt templates for the two pipeline stages.
//!
//! Both prompts end with a strict JSON-only output contract so the replies
//! can be parsed without scraping prose. The remedy template branches on the
//! no-disease sentinel: a healthy plant gets maintenance guidance instead of
//! remedies for a specific ailment, and no supplement suggestions.

use minijinja::{Environment, context};
use verdant_core::diagnosis::{ModelError, NO_DISEASE_SENTINEL};

const DETECTION_PROMPT: &str = r#"You are an expert in plant pathology. Analyze the provided image of the plant and identify the plant, and any potential diseases.

Respond with the detected plant name, detected disease and a confidence score between 0.0 and 1.0.
If the plant cannot be identified, use "unknown" as the plant name.
If no disease is detected, state "No disease detected" as the disease and return a confidence of 1.0.

Output a JSON object with exactly these fields:
{"plantName": "...", "disease": "...", "confidence": 0.0}

IMPORTANT: Output ONLY valid JSON, no markdown formatting or code blocks."#;

const REMEDY_TEMPLATE: &str = r#"You are an expert in plant diseases and remedies.

{% if disease == no_disease %}
Given the following description of the plant and its environment:
{{ plant_description }}

Please suggest possible causes and remedies for how to maintain this plant and keep it healthy.

Output a JSON object with exactly these fields:
{"possibleCauses": ["..."], "remedies": ["..."]}
{% else %}
You have identified that a plant has the following disease: {{ disease }}.

Given the following description of the plant and its environment:
{{ plant_description }}

Please suggest possible causes, remedies, and supplements for this disease.

For each supplement, provide instructions on how to use them for the disease to make the plant healthy.

Output a JSON object with exactly these fields:
{"possibleCauses": ["..."], "remedies": ["..."], "supplements": ["..."]}
{% endif %}
IMPORTANT: Output ONLY valid JSON, no markdown formatting or code blocks."#;

/// The fixed detection-stage prompt sent alongside the image.
pub fn detection_prompt() -> &'static str {
    DETECTION_PROMPT
}

/// Renders the remedy-stage prompt for the given disease label.
pub fn remedy_prompt(disease: &str, plant_description: &str) -> Result<String, ModelError> {
    Environment::new()
        .render_str(
            REMEDY_TEMPLATE,
            context! {
                disease => disease,
                plant_description => plant_description,
                no_disease => NO_DISEASE_SENTINEL,
            },
        )
        .map_err(|e| ModelError::Config(format!("failed to render remedy prompt: {e}")))
}
