//! Core types shared by every flow
//!
//! Tasks, the completion error, and the YAML configuration for the library
//! and the command runner.

pub mod config;
pub mod error;
pub mod task;

pub use error::*;
pub use task::*;
