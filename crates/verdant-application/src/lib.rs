//! Application services: analysis orchestration and camera capture.

pub mod analysis_service;
pub mod capture;

pub use analysis_service::AnalysisService;
pub use capture::CaptureController;
