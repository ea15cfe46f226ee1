//! Commonly used imports
//!
//! Use `use yielder::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{Coroutine, Step, Yield};

// Constructors
pub use crate::build::{from_fn, once, ready};

// Composition
pub use crate::compose::{and_then, map_done};

// Driving
pub use crate::{Driver, EventLoop, LocalLoop, Promise, Resolver};

// Failures
pub use crate::{DriveError, Error};
