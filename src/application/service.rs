use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::event::{DomainEvent, StockReserved};
use crate::domain::model::{ProductId, ReservationRequest, StockMovement};
use crate::domain::port::{EventBus, StockStore};
use crate::domain::service::ReservationLedger;
use std::sync::Arc;

/// 在庫引当アプリケーションサービス
/// 引当の実行と在庫変動イベントの発行を調停する
pub struct ReservationApplicationService<S>
where
    S: StockStore,
{
    ledger: ReservationLedger<S>,
    event_bus: Arc<dyn EventBus>,
}

impl<S> ReservationApplicationService<S>
where
    S: StockStore,
{
    /// 新しいアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `ledger` - 在庫引当台帳
    /// * `event_bus` - イベントバス
    pub fn new(ledger: ReservationLedger<S>, event_bus: Arc<dyn EventBus>) -> Self {
        Self { ledger, event_bus }
    }

    /// 単品の在庫を引き当てる
    /// 成功時に在庫変動イベントを1回発行する
    ///
    /// # Arguments
    /// * `product_id` - 商品ID
    /// * `quantity` - 引当数量
    ///
    /// # Returns
    /// * `Ok(StockMovement)` - 引当成功
    /// * `Err(DomainError)` - 引当失敗
    pub async fn reserve(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<StockMovement, DomainError> {
        let movement = self.ledger.reserve(product_id, quantity).await?;
        self.publish_stock_reserved(vec![movement]).await;
        Ok(movement)
    }

    /// バッチの在庫を引き当てる
    /// 成功時に在庫変動イベントを1回発行する
    ///
    /// # Arguments
    /// * `request` - 引当リクエスト
    ///
    /// # Returns
    /// * `Ok(Vec<StockMovement>)` - 全項目の引当成功
    /// * `Err(DomainError)` - 引当失敗
    pub async fn reserve_all(
        &self,
        request: &ReservationRequest,
    ) -> Result<Vec<StockMovement>, DomainError> {
        let movements = self.ledger.reserve_all(request).await?;
        self.publish_stock_reserved(movements.clone()).await;
        Ok(movements)
    }

    /// 在庫変動イベントを発行する
    /// 配信はベストエフォートであり、失敗しても引当結果には影響しない
    async fn publish_stock_reserved(&self, movements: Vec<StockMovement>) {
        let event = DomainEvent::StockReserved(StockReserved::new(movements));
        if let Err(e) = self.event_bus.publish(event).await {
            tracing::warn!("在庫変動イベントの発行に失敗しました: {}", e);
        }
    }
}

/// 在庫照会結果のDTO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevelView {
    /// 商品ID
    pub product_id: ProductId,
    /// 現在の在庫数
    pub quantity_on_hand: u32,
}

/// 在庫照会サービス
/// 引当とは独立した読み取り専用の照会を提供する
pub struct StockQueryService<S>
where
    S: StockStore,
{
    store: S,
}

impl<S> StockQueryService<S>
where
    S: StockStore,
{
    /// 新しい在庫照会サービスを作成
    ///
    /// # Arguments
    /// * `store` - 在庫ストア
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 商品の現在の在庫数を照会する
    ///
    /// # Arguments
    /// * `product_id` - 商品ID
    ///
    /// # Returns
    /// * `Ok(Some(StockLevelView))` - 在庫レコードが見つかった
    /// * `Ok(None)` - 在庫レコードが見つからなかった
    /// * `Err(ApplicationError)` - 照会失敗
    pub async fn stock_level(
        &self,
        product_id: ProductId,
    ) -> Result<Option<StockLevelView>, ApplicationError> {
        let record = self.store.get(product_id).await?;
        Ok(record.map(|r| StockLevelView {
            product_id: r.product_id(),
            quantity_on_hand: r.quantity_on_hand(),
        }))
    }
}
