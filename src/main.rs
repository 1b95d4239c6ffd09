use inventory_reservation_ledger::adapter::driven::{
    EventBusConfig, InMemoryEventBus, MySqlStockStore,
};
use inventory_reservation_ledger::adapter::{DatabaseConfig, DatabaseMigration};
use inventory_reservation_ledger::application::service::{
    ReservationApplicationService, StockQueryService,
};
use inventory_reservation_ledger::domain::handler::NotificationHandler;
use inventory_reservation_ledger::domain::model::{
    ProductId, ReservationItem, ReservationRequest, StockRecord,
};
use inventory_reservation_ledger::domain::service::ReservationLedger;

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ログ出力の初期化
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== 在庫引当台帳 デモ ===");
    println!();

    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    // データベース設定を読み込む
    let config = DatabaseConfig::from_env()?;
    println!(
        "データベース設定を読み込みました: {}:{}",
        config.host, config.port
    );

    // 接続プールを作成
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;
    println!("データベース接続プールを作成しました");

    // マイグレーションを実行
    let migration = DatabaseMigration::new(pool.clone());
    migration.run().await?;
    println!("データベースマイグレーションを実行しました");

    // MySQL在庫ストアを作成
    let store = MySqlStockStore::new(pool.clone());

    // イベントバスを作成し、通知ハンドラーを登録
    let event_bus = Arc::new(InMemoryEventBus::new(EventBusConfig::default()));
    event_bus
        .subscribe_stock_reserved(NotificationHandler::new())
        .await?;
    println!("イベントハンドラーを登録しました");

    // サービスを作成
    let ledger = ReservationLedger::new(store.clone());
    let reservation_service = ReservationApplicationService::new(ledger, event_bus.clone());
    let query_service = StockQueryService::new(store.clone());

    // デモ用の在庫を投入
    let first_product = ProductId::new();
    let second_product = ProductId::new();
    store
        .insert(&StockRecord::new(first_product, 10, 0))
        .await?;
    store
        .insert(&StockRecord::new(second_product, 5, 0))
        .await?;
    println!();
    println!("デモ用の在庫を投入しました:");
    println!("  {} -> 10", first_product);
    println!("  {} -> 5", second_product);
    println!();

    // 単品引当
    println!("--- 単品引当: {} から 4 ---", first_product);
    match reservation_service.reserve(first_product, 4).await {
        Ok(movement) => println!(
            "引当成功: {} -> {}",
            movement.previous_quantity(),
            movement.new_quantity()
        ),
        Err(e) => println!("引当失敗: {}", e),
    }
    println!();

    // バッチ引当（在庫不足を含むため全体が棄却される）
    println!(
        "--- バッチ引当: {{{}, 2}}, {{{}, 6}} ---",
        first_product, second_product
    );
    let request = ReservationRequest::new(vec![
        ReservationItem::new(first_product, 2)?,
        ReservationItem::new(second_product, 6)?,
    ])?;
    match reservation_service.reserve_all(&request).await {
        Ok(movements) => println!("引当成功: {} 件", movements.len()),
        Err(e) => println!("引当失敗: {}", e),
    }
    println!();

    // バッチ引当（全項目が成功する）
    println!(
        "--- バッチ引当: {{{}, 2}}, {{{}, 5}} ---",
        first_product, second_product
    );
    let request = ReservationRequest::new(vec![
        ReservationItem::new(first_product, 2)?,
        ReservationItem::new(second_product, 5)?,
    ])?;
    match reservation_service.reserve_all(&request).await {
        Ok(movements) => {
            for movement in movements {
                println!(
                    "引当成功: {} {} -> {}",
                    movement.product_id(),
                    movement.previous_quantity(),
                    movement.new_quantity()
                );
            }
        }
        Err(e) => println!("引当失敗: {}", e),
    }
    println!();

    // 最終在庫の照会
    println!("--- 最終在庫 ---");
    for product_id in [first_product, second_product] {
        if let Some(view) = query_service.stock_level(product_id).await? {
            println!("  {} -> {}", view.product_id, view.quantity_on_hand);
        }
    }

    Ok(())
}
