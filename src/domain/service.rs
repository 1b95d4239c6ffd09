// ドメインサービス
// 在庫引当の実行プロトコル（読み取り→検証→条件付き確定）を実装

use crate::domain::error::{DomainError, ItemFailure, RejectReason};
use crate::domain::model::{ProductId, ReservationRequest, ReservationItem, StockMovement};
use crate::domain::port::{StockStore, StockWrite, StoreError};
use crate::domain::validator::{validate, Decision};

/// 楽観的並行制御のデフォルトリトライ上限
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// 在庫引当台帳
/// 単品・バッチの在庫引当を楽観的並行制御の下で実行する
/// 自身は共有可変状態を持たず、全ての状態は外部ストアにある
pub struct ReservationLedger<S: StockStore> {
    store: S,
    max_attempts: u32,
}

impl<S: StockStore> ReservationLedger<S> {
    /// 新しい在庫引当台帳を作成
    ///
    /// # Arguments
    /// * `store` - 在庫ストア
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// リトライ上限を指定して作成
    ///
    /// # Arguments
    /// * `store` - 在庫ストア
    /// * `max_attempts` - 競合時のリトライ上限（1以上）
    pub fn with_max_attempts(store: S, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts,
        }
    }

    /// 単品の在庫を引き当てる
    ///
    /// 読み取ったバージョンを条件に書き込み、競合した場合は
    /// 読み取り・検証からやり直す（上限まで）
    /// 検証の棄却はリトライしない
    ///
    /// # Arguments
    /// * `product_id` - 商品ID
    /// * `quantity` - 引当数量（1以上）
    ///
    /// # Returns
    /// * `Ok(StockMovement)` - 引当成功（変動前後の在庫数を含む）
    /// * `Err(DomainError)` - 引当失敗（書き込みは行われない）
    pub async fn reserve(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<StockMovement, DomainError> {
        let item = ReservationItem::new(product_id, quantity)?;

        for attempt in 1..=self.max_attempts {
            // 在庫を取得して検証
            let current = self
                .store
                .get(product_id)
                .await
                .map_err(store_failure)?;
            if let Decision::Reject(reason) = validate(current.as_ref(), &item) {
                return Err(single_item_failure(product_id, reason));
            }
            // Admit は在庫レコードの存在を含意する
            let Some(record) = current else {
                return Err(DomainError::NotFound(product_id));
            };

            // 読み取ったバージョンを条件に減算を書き込む
            let write = StockWrite {
                product_id,
                expected_version: record.version(),
                new_quantity: record.quantity_on_hand() - item.quantity(),
            };
            match self.store.conditional_write(&write).await {
                Ok(()) => {
                    return Ok(StockMovement::new(
                        product_id,
                        record.quantity_on_hand(),
                        write.new_quantity,
                    ));
                }
                Err(e) if e.is_conflict() => {
                    // 他の引当と競合したため読み取りからやり直す
                    tracing::debug!(
                        "条件付き書き込みが競合しました: {} (attempt {}/{})",
                        product_id,
                        attempt,
                        self.max_attempts
                    );
                }
                Err(e) => return Err(store_failure(e)),
            }
        }

        Err(DomainError::Contention)
    }

    /// バッチの在庫を引き当てる
    ///
    /// 重複商品を合算した上で全項目を検証し、1件でも失敗があれば
    /// 書き込みを行わず全失敗を列挙して棄却する
    /// 全項目が通った場合のみ1つのトランザクションで確定し、
    /// 検証と確定の間の競合は検証からやり直す（上限まで）
    ///
    /// # Arguments
    /// * `request` - 引当リクエスト
    ///
    /// # Returns
    /// * `Ok(Vec<StockMovement>)` - 全項目の引当成功
    /// * `Err(DomainError::BatchRejected)` - 検証失敗（全失敗項目を含む）
    /// * `Err(DomainError)` - その他の失敗（部分的な書き込みは残らない）
    pub async fn reserve_all(
        &self,
        request: &ReservationRequest,
    ) -> Result<Vec<StockMovement>, DomainError> {
        // Step 1: 重複商品を合算して正規化
        let demands = request.merged_demands()?;

        for attempt in 1..=self.max_attempts {
            // Step 2: 全項目を検証（最初の失敗で打ち切らず全件収集する）
            let mut failures = Vec::new();
            let mut admitted = Vec::new();
            for item in &demands {
                let current = self
                    .store
                    .get(item.product_id())
                    .await
                    .map_err(store_failure)?;
                match validate(current.as_ref(), item) {
                    Decision::Reject(reason) => {
                        failures.push(ItemFailure::new(item.product_id(), reason));
                    }
                    Decision::Admit => {
                        // Admit は在庫レコードの存在を含意する
                        if let Some(record) = current {
                            admitted.push((*item, record));
                        }
                    }
                }
            }

            // Step 3: 1件でも検証に失敗したら書き込みを行わず棄却する
            if !failures.is_empty() {
                return Err(DomainError::BatchRejected(failures));
            }

            // Step 4: 全項目の減算を1つのトランザクションとして確定
            let writes: Vec<StockWrite> = admitted
                .iter()
                .map(|(item, record)| StockWrite {
                    product_id: item.product_id(),
                    expected_version: record.version(),
                    new_quantity: record.quantity_on_hand() - item.quantity(),
                })
                .collect();

            match self.store.run_transaction(&writes).await {
                Ok(()) => {
                    let movements = admitted
                        .iter()
                        .zip(&writes)
                        .map(|((item, record), write)| {
                            StockMovement::new(
                                item.product_id(),
                                record.quantity_on_hand(),
                                write.new_quantity,
                            )
                        })
                        .collect();
                    return Ok(movements);
                }
                Err(e) if e.is_conflict() => {
                    // 検証と確定の間に競合する書き込みがあったため検証からやり直す
                    tracing::debug!(
                        "引当トランザクションが中断されました (attempt {}/{})",
                        attempt,
                        self.max_attempts
                    );
                }
                Err(e) => return Err(store_failure(e)),
            }
        }

        Err(DomainError::Contention)
    }
}

/// ストア障害をドメインエラーへ写像する
/// 競合はリトライ層で処理されるため、ここに到達するのは障害のみ
fn store_failure(error: StoreError) -> DomainError {
    DomainError::StoreUnavailable(error.to_string())
}

/// 単品引当の検証棄却をドメインエラーへ写像する
fn single_item_failure(product_id: ProductId, reason: RejectReason) -> DomainError {
    match reason {
        RejectReason::NotFound => DomainError::NotFound(product_id),
        RejectReason::InsufficientStock {
            available,
            requested,
        } => DomainError::InsufficientStock {
            available,
            requested,
        },
    }
}
