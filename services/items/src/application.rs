// アプリケーション層モジュール
pub mod items_handler;
pub mod request_parser;

// 再エクスポート
pub use items_handler::{ItemsHandler, ItemsHandlerError};
pub use request_parser::ParsedRequest;
