// Infrastructure layer modules
pub mod config;
pub mod item_repository;
pub mod logging;

// Re-exports
pub use config::{ItemsTableConfig, ItemsTableConfigError, DEFAULT_TABLE_NAME, TABLE_NAME_ENV};
pub use item_repository::{DynamoItemRepository, ItemRepository, RepositoryError, ScanPage};
pub use logging::init_logging;
