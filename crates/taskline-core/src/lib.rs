//! taskline-core
//!
//! Core building blocks for the taskline service: tasks are accepted over
//! HTTP, persisted, handed to a single background worker through a bounded
//! queue, and marked completed once processed.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（TaskId, Task, NewTask, TaskStatus, errors）
//! - **ports**: 抽象化レイヤー（TaskStore, DeliveryQueue, Clock）
//! - **impls**: 実装（SqliteTaskStore, InMemoryTaskStore, InMemoryDeliveryQueue）
//! - **app**: アプリケーションロジック（AppBuilder, TaskService, Worker, RetryPolicy）
//! - **api**: HTTP ルーティング（axum）
//! - **config**: 設定値とデフォルト
//! - **observability**: tracing の初期化とワーカーのカウンタ

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;

pub use api::build_router;
pub use app::{App, AppBuilder};
pub use config::Config;
