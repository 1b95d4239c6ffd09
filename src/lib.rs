// 在庫引当台帳
// 注文フルフィルメントにおける在庫整合性を担保するコアコンポーネント
// 在庫の減算は楽観的並行制御（バージョン条件付き書き込み）と
// ストアのトランザクションによって、負の在庫を生まないことを保証する

pub mod adapter;
pub mod application;
pub mod domain;
