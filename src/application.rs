// アプリケーション層
// ドメインサービスの調停とイベント発行を担当

pub mod error;
pub mod service;

pub use error::ApplicationError;
