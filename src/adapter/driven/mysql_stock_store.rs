use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{ProductId, StockRecord};
use crate::domain::port::{StockStore, StockWrite, StoreError};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL在庫ストア
/// MySQLデータベースを使用して在庫レコードを永続化する
/// 条件付き書き込みはバージョン列を条件にしたUPDATEで実現する
#[derive(Clone)]
pub struct MySqlStockStore {
    pool: Pool<MySql>,
}

impl MySqlStockStore {
    /// 新しいMySQL在庫ストアを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// 在庫レコードをUPSERTする（セットアップ用）
    ///
    /// # Arguments
    /// * `record` - 登録する在庫レコード
    pub async fn insert(&self, record: &StockRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO stock_records (product_id, quantity_on_hand, version)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE
                quantity_on_hand = VALUES(quantity_on_hand),
                version = VALUES(version)
            "#,
        )
        .bind(record.product_id().to_string())
        .bind(record.quantity_on_hand())
        .bind(record.version())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫レコードの登録に失敗しました: {}", e)))
        .map_err(StoreError::from)?;

        Ok(())
    }
}

#[async_trait]
impl StockStore for MySqlStockStore {
    async fn get(&self, product_id: ProductId) -> Result<Option<StockRecord>, StoreError> {
        // stock_recordsテーブルから在庫レコードを取得
        let row = sqlx::query(
            "SELECT product_id, quantity_on_hand, version FROM stock_records WHERE product_id = ?",
        )
        .bind(product_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫レコードの取得に失敗しました: {}", e)))
        .map_err(StoreError::from)?;

        match row {
            Some(row) => {
                let product_id = ProductId::from_string(row.get("product_id")).map_err(|e| {
                    StoreError::Unavailable(format!("商品IDの解析に失敗しました: {}", e))
                })?;

                let record = StockRecord::new(
                    product_id,
                    row.get::<u32, _>("quantity_on_hand"),
                    row.get::<u64, _>("version"),
                );
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn conditional_write(&self, write: &StockWrite) -> Result<(), StoreError> {
        // バージョンが一致する場合のみ更新される
        // レコードが削除されていた場合も更新行数0となり競合として扱われる
        let result = sqlx::query(
            r#"
            UPDATE stock_records
            SET quantity_on_hand = ?, version = version + 1
            WHERE product_id = ? AND version = ?
            "#,
        )
        .bind(write.new_quantity)
        .bind(write.product_id.to_string())
        .bind(write.expected_version)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫レコードの更新に失敗しました: {}", e)))
        .map_err(StoreError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::VersionConflict);
        }

        Ok(())
    }

    async fn run_transaction(&self, writes: &[StockWrite]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DatabaseError::ConnectionError(format!(
                "トランザクションの開始に失敗しました: {}",
                e
            ))
        })?;

        for write in writes {
            let result = sqlx::query(
                r#"
                UPDATE stock_records
                SET quantity_on_hand = ?, version = version + 1
                WHERE product_id = ? AND version = ?
                "#,
            )
            .bind(write.new_quantity)
            .bind(write.product_id.to_string())
            .bind(write.expected_version)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("在庫レコードの更新に失敗しました: {}", e))
            })?;

            // 1件でも条件が不成立ならロールバックして中断
            if result.rows_affected() == 0 {
                tx.rollback().await.map_err(|e| {
                    DatabaseError::QueryError(format!(
                        "トランザクションのロールバックに失敗しました: {}",
                        e
                    ))
                })?;
                return Err(StoreError::TransactionAborted);
            }
        }

        tx.commit().await.map_err(|e| {
            DatabaseError::QueryError(format!("トランザクションの確定に失敗しました: {}", e))
        })?;

        Ok(())
    }
}
