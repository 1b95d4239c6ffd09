// イベントハンドラー
// 在庫変動イベントを受信して外部コラボレーターへ引き渡す

use crate::domain::event::StockReserved;
use crate::domain::event_bus::{EventHandler, HandlerError};
use async_trait::async_trait;

/// 通知ハンドラー
/// 在庫変動を通知コラボレーターへ引き渡す
/// 注文通知レコードの作成や表示は通知側の責務であり、ここでは関知しない
#[derive(Clone)]
pub struct NotificationHandler;

impl NotificationHandler {
    /// 新しい通知ハンドラーを作成
    pub fn new() -> Self {
        Self
    }

    /// 通知メッセージを送信
    async fn send_notification(&self, message: &str) -> Result<(), HandlerError> {
        // 実際の実装では外部通知サービスを呼び出す
        // ここではログ出力で代用
        tracing::info!(target: "notification", "{}", message);
        Ok(())
    }
}

impl Default for NotificationHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventHandler<StockReserved> for NotificationHandler {
    async fn handle(&self, event: StockReserved) -> Result<(), HandlerError> {
        for movement in &event.movements {
            let message = format!(
                "在庫が変動しました。商品ID: {}, {} -> {}",
                movement.product_id(),
                movement.previous_quantity(),
                movement.new_quantity()
            );
            self.send_notification(&message).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ProductId, StockMovement};

    #[tokio::test]
    async fn test_handle_stock_reserved_event() {
        let handler = NotificationHandler::new();
        let event = StockReserved::new(vec![
            StockMovement::new(ProductId::new(), 10, 6),
            StockMovement::new(ProductId::new(), 5, 0),
        ]);

        let result = handler.handle(event).await;
        assert!(result.is_ok());
    }
}
