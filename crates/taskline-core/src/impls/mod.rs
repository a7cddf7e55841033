//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryDeliveryQueue**: プロセス内の bounded 配送キュー
//! - **SqliteTaskStore**: 本番用の正本
//! - **InMemoryTaskStore**: テスト用の正本（故障注入つき）

pub mod inmem_delivery;
pub mod inmem_store;
pub mod sqlite_store;

// 主要な型を再エクスポート
pub use self::inmem_delivery::InMemoryDeliveryQueue;
pub use self::inmem_store::InMemoryTaskStore;
pub use self::sqlite_store::SqliteTaskStore;
