// Domain layer modules
pub mod api_response;
pub mod item;
pub mod route;

// Re-exports
pub use api_response::ApiResponse;
pub use item::{BodyError, Item, UpdateFields, ID_FIELD};
pub use route::Route;
