//! Filesystem-backed infrastructure for verdant: path resolution, secret
//! loading, the persisted history store, and image acquisition backends.

pub mod app_config;
pub mod history_repository;
pub mod media;
pub mod paths;
pub mod secret_service;
pub mod storage;

pub use app_config::load_app_config;
pub use history_repository::JsonHistoryRepository;
pub use paths::VerdantPaths;
pub use secret_service::SecretServiceImpl;
