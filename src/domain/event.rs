use crate::domain::model::StockMovement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// イベントメタデータ
/// 配信・追跡のための共通情報
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// イベントの一意識別子
    pub event_id: Uuid,
    /// 関連する処理をまたいで追跡するためのID
    pub correlation_id: Uuid,
    /// イベントスキーマのバージョン
    pub event_version: u32,
    /// イベント発生日時
    pub occurred_at: DateTime<Utc>,
}

impl EventMetadata {
    /// 新しいメタデータを作成
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            correlation_id: Uuid::new_v4(),
            event_version: 1,
            occurred_at: Utc::now(),
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// 在庫引当イベント
/// 引当の確定によって発生した在庫変動を通知する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReserved {
    /// 確定した在庫変動のリスト
    pub movements: Vec<StockMovement>,
    /// イベントメタデータ
    pub metadata: EventMetadata,
}

impl StockReserved {
    /// 新しい在庫引当イベントを作成
    pub fn new(movements: Vec<StockMovement>) -> Self {
        Self {
            movements,
            metadata: EventMetadata::new(),
        }
    }
}

/// ドメインイベント列挙型
/// ビジネス上の重要なイベントを表現する
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainEvent {
    /// 在庫が引き当てられた
    StockReserved(StockReserved),
}

impl DomainEvent {
    /// イベント種別名を取得
    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::StockReserved(_) => "StockReserved",
        }
    }

    /// イベントメタデータを取得
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            DomainEvent::StockReserved(e) => &e.metadata,
        }
    }
}
