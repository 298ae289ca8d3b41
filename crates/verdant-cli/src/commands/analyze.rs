//! The `analyze` command: run the full pipeline against one image file.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use verdant_application::AnalysisService;
use verdant_core::diagnosis::{DetectionResult, RemedyResult};
use verdant_core::pipeline::PipelineState;
use verdant_infrastructure::{JsonHistoryRepository, load_app_config, media};
use verdant_interaction::GeminiApiClient;

pub async fn run(image: &Path, model_override: Option<String>) -> Result<()> {
    let payload = media::load_image_file(image)?;

    let client = GeminiApiClient::try_from_secrets().await?;
    let config = load_app_config()?;
    let client = match model_override.or(config.model_name) {
        Some(name) => client.with_model(name),
        None => client,
    };

    let repository = Arc::new(JsonHistoryRepository::new()?);
    let service = AnalysisService::new(Arc::new(client), repository).await?;

    println!("Analyzing {} ...", image.display());
    let state = service.analyze(payload).await;

    match state {
        PipelineState::Completed {
            detection, remedy, ..
        } => {
            print_report(&detection, &remedy);
            Ok(())
        }
        PipelineState::UnknownPlant { .. } => {
            println!("The plant could not be identified. Try a clearer photo of the leaves.");
            Ok(())
        }
        PipelineState::Failed { failure, .. } => Err(anyhow::anyhow!("{failure}")),
        state => Err(anyhow::anyhow!(
            "pipeline did not reach a terminal state: {state:?}"
        )),
    }
}

fn print_report(detection: &DetectionResult, remedy: &RemedyResult) {
    println!();
    println!("Plant:      {}", detection.plant_name);
    if detection.is_healthy() {
        println!("No disease was detected in the image.");
    } else {
        println!("Disease:    {}", detection.disease);
        println!("Confidence: {:.2}%", detection.confidence * 100.0);
    }

    print_section("Possible causes", &remedy.possible_causes);
    print_section("Remedies", &remedy.remedies);
    if let Some(supplements) = &remedy.supplements {
        print_section("Supplements", supplements);
    }
}

fn print_section(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{title}:");
    for item in items {
        println!("  - {item}");
    }
}
