use crate::domain::model::ProductId;

/// ドメイン層のエラー型
/// 在庫引当におけるビジネスルール違反と実行時失敗を表現する
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 無効なリクエスト（例: 数量が0、明細が空）
    /// 呼び出し側のバグでありリトライ対象ではない
    InvalidRequest(String),
    /// 商品の在庫レコードが存在しない
    NotFound(ProductId),
    /// 在庫不足
    InsufficientStock { available: u32, requested: u32 },
    /// バッチリクエストの棄却
    /// 検証に失敗した全項目の理由を保持する
    BatchRejected(Vec<ItemFailure>),
    /// 楽観的並行制御のリトライ上限超過
    /// 呼び出し側は操作全体を後から再試行してよい
    Contention,
    /// ストア自体の障害（在庫ロジックとは無関係）
    StoreUnavailable(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            DomainError::NotFound(product_id) => {
                write!(f, "Stock record not found: {}", product_id)
            }
            DomainError::InsufficientStock {
                available,
                requested,
            } => write!(
                f,
                "Insufficient stock: available {}, requested {}",
                available, requested
            ),
            DomainError::BatchRejected(failures) => {
                write!(f, "Reservation rejected for {} item(s)", failures.len())
            }
            DomainError::Contention => write!(f, "Reservation contention: retry limit exceeded"),
            DomainError::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

/// 項目単位の検証失敗理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// 在庫レコードが存在しない
    NotFound,
    /// 在庫不足
    InsufficientStock { available: u32, requested: u32 },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NotFound => write!(f, "not found"),
            RejectReason::InsufficientStock {
                available,
                requested,
            } => write!(
                f,
                "insufficient stock (available {}, requested {})",
                available, requested
            ),
        }
    }
}

/// バッチ検証で失敗した1項目分の情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemFailure {
    product_id: ProductId,
    reason: RejectReason,
}

impl ItemFailure {
    /// 新しい項目失敗を作成
    pub fn new(product_id: ProductId, reason: RejectReason) -> Self {
        Self { product_id, reason }
    }

    /// 対象の商品IDを取得
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// 失敗理由を取得
    pub fn reason(&self) -> RejectReason {
        self.reason
    }
}

impl std::fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.product_id, self.reason)
    }
}
