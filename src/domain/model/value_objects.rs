use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// 商品の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    /// 新しい一意のProductIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから ProductId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からProductIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

/// 引当明細を表す値オブジェクト
/// 数量は構築時に検証される（0は許容しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationItem {
    product_id: ProductId,
    quantity: u32,
}

impl ReservationItem {
    /// 新しい引当明細を作成
    ///
    /// # Arguments
    /// * `product_id` - 商品ID
    /// * `quantity` - 引当数量（1以上）
    ///
    /// # Returns
    /// * `Ok(ReservationItem)` - 作成成功
    /// * `Err(DomainError::InvalidRequest)` - 数量が0
    pub fn new(product_id: ProductId, quantity: u32) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidRequest(
                "引当数量は1以上である必要があります".to_string(),
            ));
        }
        Ok(Self {
            product_id,
            quantity,
        })
    }

    /// 商品IDを取得
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// 引当数量を取得
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// 引当リクエスト
/// 引当明細の順序付きリスト（空は許容しない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    items: Vec<ReservationItem>,
}

impl ReservationRequest {
    /// 新しい引当リクエストを作成
    ///
    /// # Arguments
    /// * `items` - 引当明細のリスト
    ///
    /// # Returns
    /// * `Ok(ReservationRequest)` - 作成成功
    /// * `Err(DomainError::InvalidRequest)` - 明細が空
    pub fn new(items: Vec<ReservationItem>) -> Result<Self, DomainError> {
        if items.is_empty() {
            return Err(DomainError::InvalidRequest(
                "引当明細が空です".to_string(),
            ));
        }
        Ok(Self { items })
    }

    /// 引当明細を取得
    pub fn items(&self) -> &[ReservationItem] {
        &self.items
    }

    /// 同一商品の明細を合算して正規化する
    /// 商品の初出順を保持する
    ///
    /// # Returns
    /// * `Ok(Vec<ReservationItem>)` - 商品ごとに合算された明細
    /// * `Err(DomainError::InvalidRequest)` - 合算後の数量が上限を超えた
    pub fn merged_demands(&self) -> Result<Vec<ReservationItem>, DomainError> {
        let mut merged: Vec<ReservationItem> = Vec::new();
        for item in &self.items {
            match merged
                .iter_mut()
                .find(|m| m.product_id == item.product_id)
            {
                Some(existing) => {
                    existing.quantity =
                        existing.quantity.checked_add(item.quantity).ok_or_else(|| {
                            DomainError::InvalidRequest(
                                "合算後の引当数量が上限を超えました".to_string(),
                            )
                        })?;
                }
                None => merged.push(*item),
            }
        }
        Ok(merged)
    }
}

/// 在庫変動を表す値オブジェクト
/// 引当成功の結果であり、在庫変動イベントにも載る
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    product_id: ProductId,
    previous_quantity: u32,
    new_quantity: u32,
}

impl StockMovement {
    /// 新しい在庫変動を作成
    pub fn new(product_id: ProductId, previous_quantity: u32, new_quantity: u32) -> Self {
        Self {
            product_id,
            previous_quantity,
            new_quantity,
        }
    }

    /// 商品IDを取得
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// 変動前の在庫数を取得
    pub fn previous_quantity(&self) -> u32 {
        self.previous_quantity
    }

    /// 変動後の在庫数を取得
    pub fn new_quantity(&self) -> u32 {
        self.new_quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_item_creation() {
        let product_id = ProductId::new();
        let item = ReservationItem::new(product_id, 3).unwrap();
        assert_eq!(item.product_id(), product_id);
        assert_eq!(item.quantity(), 3);
    }

    #[test]
    fn test_reservation_item_zero_quantity_rejected() {
        let product_id = ProductId::new();
        let result = ReservationItem::new(product_id, 0);
        assert!(matches!(result, Err(DomainError::InvalidRequest(_))));
    }

    #[test]
    fn test_reservation_request_empty_rejected() {
        let result = ReservationRequest::new(vec![]);
        assert!(matches!(result, Err(DomainError::InvalidRequest(_))));
    }

    #[test]
    fn test_merged_demands_sums_duplicates() {
        let product_id = ProductId::new();
        let other_id = ProductId::new();
        let request = ReservationRequest::new(vec![
            ReservationItem::new(product_id, 3).unwrap(),
            ReservationItem::new(other_id, 1).unwrap(),
            ReservationItem::new(product_id, 4).unwrap(),
        ])
        .unwrap();

        let merged = request.merged_demands().unwrap();
        assert_eq!(merged.len(), 2);
        // 初出順が保持される
        assert_eq!(merged[0].product_id(), product_id);
        assert_eq!(merged[0].quantity(), 7);
        assert_eq!(merged[1].product_id(), other_id);
        assert_eq!(merged[1].quantity(), 1);
    }

    #[test]
    fn test_merged_demands_overflow_rejected() {
        let product_id = ProductId::new();
        let request = ReservationRequest::new(vec![
            ReservationItem::new(product_id, u32::MAX).unwrap(),
            ReservationItem::new(product_id, 1).unwrap(),
        ])
        .unwrap();

        let result = request.merged_demands();
        assert!(matches!(result, Err(DomainError::InvalidRequest(_))));
    }

    #[test]
    fn test_product_id_from_string() {
        let product_id = ProductId::new();
        let parsed = ProductId::from_string(&product_id.to_string()).unwrap();
        assert_eq!(parsed, product_id);
    }
}
