// 駆動される側アダプター（ストア実装・イベントバスなど）

mod event_bus;
mod memory_stock_store;
mod mysql_stock_store;

pub use event_bus::{EventBusConfig, InMemoryEventBus};
pub use memory_stock_store::InMemoryStockStore;
pub use mysql_stock_store::MySqlStockStore;
