use crate::domain::event::{DomainEvent, StockReserved};
use crate::domain::event_bus::{
    DynEventHandler, EventHandler, HandlerError, StockReservedHandlerWrapper,
};
use crate::domain::port::{EventBus, EventBusError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::{Mutex, RwLock};

/// 失敗したイベント処理の情報
#[derive(Debug, Clone)]
pub struct FailedEventProcessing {
    pub event: DomainEvent,
    pub handler_name: String,
    pub error: String,
    pub attempt_count: u32,
    pub failed_at: SystemTime,
    pub is_retryable: bool,
}

/// デッドレターキューエントリ
#[derive(Debug, Clone)]
pub struct DeadLetterEntry {
    pub failed_processing: FailedEventProcessing,
    pub added_at: SystemTime,
}

/// イベントバス設定
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// 最大リトライ回数
    pub max_retry_attempts: u32,
    /// リトライ間隔
    pub retry_delay: Duration,
    /// デッドレターキューの最大サイズ
    pub dead_letter_queue_max_size: usize,
    /// ハンドラータイムアウト
    pub handler_timeout: Duration,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            max_retry_attempts: 3,
            retry_delay: Duration::from_millis(1000),
            dead_letter_queue_max_size: 1000,
            handler_timeout: Duration::from_secs(30),
        }
    }
}

/// インメモリイベントバス実装
/// ハンドラーのリトライ・タイムアウト・デッドレターキューを備える
#[derive(Clone)]
pub struct InMemoryEventBus {
    handlers: Arc<RwLock<Vec<Box<dyn DynEventHandler>>>>,
    dead_letter_queue: Arc<Mutex<VecDeque<DeadLetterEntry>>>,
    config: EventBusConfig,
}

impl InMemoryEventBus {
    /// 設定を指定してインメモリイベントバスを作成
    pub fn new(config: EventBusConfig) -> Self {
        Self {
            handlers: Arc::new(RwLock::new(Vec::new())),
            dead_letter_queue: Arc::new(Mutex::new(VecDeque::new())),
            config,
        }
    }

    /// StockReservedハンドラーを登録
    pub async fn subscribe_stock_reserved<H>(&self, handler: H) -> Result<(), EventBusError>
    where
        H: EventHandler<StockReserved> + Send + Sync + 'static,
    {
        let wrapped_handler = StockReservedHandlerWrapper::new(handler);
        let mut handlers = self.handlers.write().await;
        handlers.push(Box::new(wrapped_handler));
        Ok(())
    }

    /// デッドレターキューの件数を取得（監視・テスト用）
    pub async fn dead_letter_queue_len(&self) -> usize {
        let dlq = self.dead_letter_queue.lock().await;
        dlq.len()
    }

    /// ハンドラーの実行（エラー処理とリトライ機能付き）
    async fn execute_handler_with_retry(
        &self,
        handler: &dyn DynEventHandler,
        event: &DomainEvent,
    ) -> Result<(), HandlerError> {
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.config.max_retry_attempts {
            attempts += 1;

            // スキーマバージョンの互換性チェック
            let event_version = event.metadata().event_version;
            if !handler.supports_schema_version(event_version) {
                return Err(HandlerError::PermanentError(format!(
                    "Handler {} does not support schema version {}",
                    handler.handler_name(),
                    event_version
                )));
            }

            // タイムアウト付きでハンドラーを実行
            let result =
                tokio::time::timeout(self.config.handler_timeout, handler.handle_event(event))
                    .await;

            match result {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(handler_error)) => {
                    last_error = Some(handler_error.clone());

                    // 永続的エラーの場合はリトライしない
                    if matches!(handler_error, HandlerError::PermanentError(_)) {
                        break;
                    }

                    // 最後の試行でない場合は待機
                    if attempts < self.config.max_retry_attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
                Err(_timeout_error) => {
                    last_error = Some(HandlerError::TransientError(
                        "Handler timeout".to_string(),
                    ));

                    if attempts < self.config.max_retry_attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| HandlerError::ProcessingFailed("Unknown error".to_string())))
    }

    /// 失敗したイベントをデッドレターキューに追加
    async fn add_to_dead_letter_queue(
        &self,
        event: DomainEvent,
        handler_name: String,
        error: &HandlerError,
    ) {
        let mut dlq = self.dead_letter_queue.lock().await;

        // キューサイズの制限チェック
        if dlq.len() >= self.config.dead_letter_queue_max_size {
            dlq.pop_front(); // 古いエントリを削除
        }

        let is_retryable = matches!(error, HandlerError::TransientError(_));
        let now = SystemTime::now();

        dlq.push_back(DeadLetterEntry {
            failed_processing: FailedEventProcessing {
                event,
                handler_name,
                error: error.to_string(),
                attempt_count: self.config.max_retry_attempts,
                failed_at: now,
                is_retryable,
            },
            added_at: now,
        });
    }

    /// 発行前にイベントがシリアライズ可能であることを検証する（往復テスト）
    fn validate_event_serialization(&self, event: &DomainEvent) -> Result<(), EventBusError> {
        let json = serde_json::to_string(event)
            .map_err(|e| EventBusError::PublishingFailed(format!("Serialization error: {}", e)))?;
        serde_json::from_str::<DomainEvent>(&json)
            .map_err(|e| EventBusError::PublishingFailed(format!("Serialization error: {}", e)))?;
        Ok(())
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new(EventBusConfig::default())
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(&self, event: DomainEvent) -> Result<(), EventBusError> {
        // シリアライゼーション検証
        self.validate_event_serialization(&event)?;

        // 各ハンドラーを順次実行し、失敗はデッドレターキューへ送る
        // ハンドラーの失敗は発行者へは伝播しない
        let handlers = self.handlers.read().await;
        for handler in handlers.iter() {
            if !handler.can_handle(&event) {
                continue;
            }

            if let Err(handler_error) =
                self.execute_handler_with_retry(handler.as_ref(), &event).await
            {
                tracing::warn!(
                    "イベントハンドラー {} が失敗しました: {}",
                    handler.handler_name(),
                    handler_error
                );
                self.add_to_dead_letter_queue(
                    event.clone(),
                    handler.handler_name().to_string(),
                    &handler_error,
                )
                .await;
            }
        }

        Ok(())
    }
}
