//! flowsync - serial and parallel flow control for async Rust
//!
//! A stable facade ([`Flow`]) over a swappable [`FlowBackend`], plus a small
//! runner that drives shell commands through it.

pub mod cli;
pub mod core;
pub mod flow;

// Re-export commonly used types
pub use core::{task, FlowError, Task};
pub use core::config::{BackendKind, FlowConfig};
pub use flow::{Backend, Flow, FlowBackend, FuturesBackend, Mode, TokioBackend};
pub use flow::{each_parallel, each_series, map_parallel, map_series, parallel, series};
