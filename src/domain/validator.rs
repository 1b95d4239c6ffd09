// 引当バリデーター
// 現在の在庫レコードと要求数量から引当の可否を判定する
// I/Oも状態変更も行わない純粋な判定ロジック

use crate::domain::error::RejectReason;
use crate::domain::model::{ReservationItem, StockRecord};

/// 引当可否の判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 引当を許可
    Admit,
    /// 引当を棄却
    Reject(RejectReason),
}

/// 現在の在庫レコードに対して引当明細を検証する
///
/// 要求数量は `ReservationItem` の構築時に1以上であることが保証されている
///
/// # Arguments
/// * `current` - 現在の在庫レコード（存在しない場合は `None`）
/// * `item` - 検証する引当明細
///
/// # Returns
/// * `Decision::Admit` - 在庫数が要求数量以上ある
/// * `Decision::Reject(reason)` - レコード不在または在庫不足
pub fn validate(current: Option<&StockRecord>, item: &ReservationItem) -> Decision {
    match current {
        None => Decision::Reject(RejectReason::NotFound),
        Some(record) => {
            if record.has_available_stock(item.quantity()) {
                Decision::Admit
            } else {
                Decision::Reject(RejectReason::InsufficientStock {
                    available: record.quantity_on_hand(),
                    requested: item.quantity(),
                })
            }
        }
    }
}
