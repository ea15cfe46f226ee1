//! Building computations from scratch
//!
//! This module provides functions and types for creating new computations.

mod func;

pub use func::{FromFn, Once, Ready, from_fn, once, ready};
