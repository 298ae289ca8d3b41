//! The `history` command: inspect or clear the persisted analysis log.

use anyhow::Result;
use verdant_core::history::HistoryRepository;
use verdant_infrastructure::JsonHistoryRepository;

pub async fn list() -> Result<()> {
    let repository = JsonHistoryRepository::new()?;
    let records = repository.load().await?;

    if records.is_empty() {
        println!("No analysis history yet.");
        return Ok(());
    }

    for record in records {
        println!(
            "{}  {}  {}  ({:.0}%)",
            record.created_at,
            record.plant_name,
            record.disease,
            record.confidence * 100.0
        );
    }
    Ok(())
}

pub async fn clear() -> Result<()> {
    let repository = JsonHistoryRepository::new()?;
    repository.save(&[]).await?;
    println!("History cleared.");
    Ok(())
}
