//! Analysis history: the append-only log of completed runs.

pub mod model;
pub mod repository;

pub use model::AnalysisRecord;
pub use repository::HistoryRepository;
