use crate::domain::event::{DomainEvent, StockReserved};
use async_trait::async_trait;

/// イベントハンドラーエラー
#[derive(Debug, Clone, thiserror::Error)]
pub enum HandlerError {
    #[error("Handler processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Transient error (retryable): {0}")]
    TransientError(String),
    #[error("Permanent error (not retryable): {0}")]
    PermanentError(String),
}

/// イベントハンドラートレイト
/// 特定のイベントタイプを処理するハンドラーを定義
#[async_trait]
pub trait EventHandler<E>: Send + Sync {
    async fn handle(&self, event: E) -> Result<(), HandlerError>;
}

/// 型消去されたイベントハンドラー
/// 異なるイベントタイプのハンドラーを統一的に扱うため
#[async_trait]
pub trait DynEventHandler: Send + Sync {
    async fn handle_event(&self, event: &DomainEvent) -> Result<(), HandlerError>;
    fn can_handle(&self, event: &DomainEvent) -> bool;
    fn handler_name(&self) -> &str;
    fn supports_schema_version(&self, version: u32) -> bool;
}

/// StockReserved用のハンドラーラッパー
pub struct StockReservedHandlerWrapper<H>
where
    H: EventHandler<StockReserved>,
{
    handler: H,
    name: String,
}

impl<H> StockReservedHandlerWrapper<H>
where
    H: EventHandler<StockReserved>,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            name: "StockReservedHandler".to_string(),
        }
    }

    pub fn with_name(handler: H, name: String) -> Self {
        Self { handler, name }
    }
}

#[async_trait]
impl<H> DynEventHandler for StockReservedHandlerWrapper<H>
where
    H: EventHandler<StockReserved>,
{
    async fn handle_event(&self, event: &DomainEvent) -> Result<(), HandlerError> {
        match event {
            DomainEvent::StockReserved(e) => self.handler.handle(e.clone()).await,
        }
    }

    fn can_handle(&self, event: &DomainEvent) -> bool {
        matches!(event, DomainEvent::StockReserved(_))
    }

    fn handler_name(&self) -> &str {
        &self.name
    }

    fn supports_schema_version(&self, version: u32) -> bool {
        // StockReserved はバージョン1以上をサポート
        version >= 1
    }
}
