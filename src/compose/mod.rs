//! Combining computations together
//!
//! This module provides sequential chaining and return-value transformation.

mod chain;
mod map;

pub use chain::{AndThen, and_then};
pub use map::{MapDone, map_done};
