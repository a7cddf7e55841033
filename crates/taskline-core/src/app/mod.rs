//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: 設定の検証とワイヤリング
//! - **TaskService**: intake（insert→push）と listing
//! - **Worker**: タスク実行ループ（pop→process→update_status）
//! - **TaskProcessor**: 1 件ごとの処理の差し替え口
//! - **RetryPolicy**: status 書き込み失敗時の再試行方針

pub mod builder;
pub mod processor;
pub mod retry;
pub mod service;
pub mod worker_loop;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::processor::{ProcessError, SimulatedDelay, TaskProcessor};
pub use self::retry::RetryPolicy;
pub use self::service::{IntakeError, TaskService};
pub use self::worker_loop::{ProcessOutcome, Worker, WorkerError, WorkerHandle};
