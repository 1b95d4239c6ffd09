use crate::domain::error::DomainError;
use crate::domain::port::StoreError;

/// アプリケーション層のエラー型
/// ドメインエラーとストアエラーをラップする
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// ドメインエラー（検証棄却・競合など）
    DomainError(DomainError),
    /// ストアエラー（永続化の失敗）
    StoreError(StoreError),
}

impl std::fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationError::DomainError(err) => write!(f, "Domain error: {}", err),
            ApplicationError::StoreError(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl std::error::Error for ApplicationError {}

// From実装でエラー変換を簡潔に
impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        ApplicationError::DomainError(err)
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        ApplicationError::StoreError(err)
    }
}
