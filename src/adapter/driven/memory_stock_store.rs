use crate::domain::model::{ProductId, StockRecord};
use crate::domain::port::{StockStore, StockWrite, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// インメモリ在庫ストア
/// 開発・テスト用のドキュメントストア実装
/// 書き込みロックがトランザクション分離を兼ねる
#[derive(Clone, Default)]
pub struct InMemoryStockStore {
    records: Arc<RwLock<HashMap<ProductId, StockRecord>>>,
}

impl InMemoryStockStore {
    /// 新しいインメモリ在庫ストアを作成
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 在庫レコードを登録する（セットアップ用）
    ///
    /// # Arguments
    /// * `record` - 登録する在庫レコード
    pub async fn insert(&self, record: StockRecord) {
        let mut records = self.records.write().await;
        records.insert(record.product_id(), record);
    }

    /// 在庫レコードを削除する（商品削除コラボレーターの模倣、テスト用）
    pub async fn remove(&self, product_id: ProductId) {
        let mut records = self.records.write().await;
        records.remove(&product_id);
    }
}

#[async_trait]
impl StockStore for InMemoryStockStore {
    async fn get(&self, product_id: ProductId) -> Result<Option<StockRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&product_id).cloned())
    }

    async fn conditional_write(&self, write: &StockWrite) -> Result<(), StoreError> {
        let mut records = self.records.write().await;

        // レコード不在もバージョン不一致として扱う
        match records.get(&write.product_id) {
            Some(current) if current.version() == write.expected_version => {}
            _ => return Err(StoreError::VersionConflict),
        }

        records.insert(
            write.product_id,
            StockRecord::new(
                write.product_id,
                write.new_quantity,
                write.expected_version + 1,
            ),
        );
        Ok(())
    }

    async fn run_transaction(&self, writes: &[StockWrite]) -> Result<(), StoreError> {
        let mut records = self.records.write().await;

        // 全件のバージョンを検証してから適用する
        for write in writes {
            match records.get(&write.product_id) {
                Some(current) if current.version() == write.expected_version => {}
                _ => return Err(StoreError::TransactionAborted),
            }
        }

        for write in writes {
            records.insert(
                write.product_id,
                StockRecord::new(
                    write.product_id,
                    write.new_quantity,
                    write.expected_version + 1,
                ),
            );
        }

        Ok(())
    }
}
