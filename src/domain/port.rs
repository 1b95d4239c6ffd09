// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::event::DomainEvent;
use crate::domain::model::{ProductId, StockRecord};
use async_trait::async_trait;

/// ストアエラー型
/// ドキュメントストア操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// 条件付き書き込みがバージョン不一致で拒否された
    VersionConflict,
    /// トランザクションが競合により中断された
    TransactionAborted,
    /// ストア自体の障害（接続断・クエリ失敗など）
    Unavailable(String),
}

impl StoreError {
    /// 楽観的並行制御の競合（リトライ可能）かどうか
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::VersionConflict | StoreError::TransactionAborted
        )
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::VersionConflict => write!(f, "Version conflict detected"),
            StoreError::TransactionAborted => write!(f, "Transaction aborted"),
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// 在庫レコードへの条件付き書き込み
/// 読み取り時のバージョンを条件とし、一致しない場合は拒否される
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockWrite {
    /// 対象の商品ID
    pub product_id: ProductId,
    /// 読み取り時点のバージョン
    pub expected_version: u64,
    /// 書き込む在庫数
    pub new_quantity: u32,
}

/// 在庫ストアトレイト
/// 在庫レコードを保持する外部ドキュメントストアを抽象化する
#[async_trait]
pub trait StockStore: Send + Sync {
    /// 商品IDで在庫レコードを取得する
    ///
    /// # Arguments
    /// * `product_id` - 検索する商品ID
    ///
    /// # Returns
    /// * `Ok(Some(StockRecord))` - 在庫レコードが見つかった
    /// * `Ok(None)` - 在庫レコードが見つからなかった
    /// * `Err(StoreError)` - 取得失敗
    async fn get(&self, product_id: ProductId) -> Result<Option<StockRecord>, StoreError>;

    /// 在庫レコードへ条件付きで書き込む
    /// レコードのバージョンが `expected_version` と一致する場合のみ反映され、
    /// 成功時にバージョンは前進する
    ///
    /// # Arguments
    /// * `write` - 条件付き書き込みの内容
    ///
    /// # Returns
    /// * `Ok(())` - 書き込み成功
    /// * `Err(StoreError::VersionConflict)` - バージョン不一致（レコード削除を含む）
    /// * `Err(StoreError)` - 書き込み失敗
    async fn conditional_write(&self, write: &StockWrite) -> Result<(), StoreError>;

    /// 複数の条件付き書き込みを1つのトランザクションとして実行する
    /// 全件が反映されるか、1件も反映されないかのいずれかになる
    ///
    /// # Arguments
    /// * `writes` - 条件付き書き込みのリスト
    ///
    /// # Returns
    /// * `Ok(())` - 全件の書き込み成功
    /// * `Err(StoreError::TransactionAborted)` - いずれかの条件が不成立で中断
    /// * `Err(StoreError)` - 実行失敗
    async fn run_transaction(&self, writes: &[StockWrite]) -> Result<(), StoreError>;
}

/// イベントバスエラー
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("Event publishing failed: {0}")]
    PublishingFailed(String),
}

/// イベントバストレイト
/// イベントの発行と配信を管理するポート
#[async_trait]
pub trait EventBus: Send + Sync {
    /// イベントを発行し、登録されたハンドラーに配信
    async fn publish(&self, event: DomainEvent) -> Result<(), EventBusError>;
}
