//! Domain identifiers (strongly-typed IDs).
//!
//! # 採番
//! id は store が insert 時に採番する（auto-increment の行 id）。
//! core 側では生成しない。newtype なので他の整数と取り違えない。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned task identity.
///
/// Serialized transparently so the wire format stays a plain JSON integer.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}
