//! Domain - ドメインモデル
//!
//! id・タスク・状態・エラーといった純粋なデータと検証だけを置く。
//! queue / store / clock には触れない。

pub mod errors;
pub mod ids;
pub mod state;
pub mod task;

pub use self::errors::{ParseTaskStatusError, ValidationError};
pub use self::ids::TaskId;
pub use self::state::TaskStatus;
pub use self::task::{NewTask, Task};
