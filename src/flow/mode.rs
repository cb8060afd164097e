//! How a collection of work is driven

use std::fmt;

/// Scheduling mode for a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One at a time, in order
    Series,

    /// Everything at once
    Parallel,

    /// At most N in flight (0 is treated as 1)
    Limited(usize),
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Series
    }
}

impl Mode {
    /// Maximum number of units of work in flight for `total` units
    pub fn concurrency(&self, total: usize) -> usize {
        match self {
            Mode::Series => 1,
            Mode::Parallel => total.max(1),
            Mode::Limited(max) => (*max).max(1).min(total.max(1)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Series => write!(f, "series"),
            Mode::Parallel => write!(f, "parallel"),
            Mode::Limited(max) => write!(f, "limited({})", max),
        }
    }
}
