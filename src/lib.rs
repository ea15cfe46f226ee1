//! # Yielder: sequential computations on a promise-based event loop
//!
//! Write a computation as a sequence of steps that suspend on awaitables, hand
//! it to a [`Driver`], and get back one [`Promise`] for its final result.
//!
//! ## Core Types
//!
//! - **[`Coroutine<T, E>`]**: a computation that is started once and then resumed
//!   with the outcome of each value it yields
//! - **[`Yield<T, E>`]**: what a computation suspends on: an awaitable, a nested
//!   computation, a deferred thunk, or a plain value
//! - **[`Driver`]**: drives computations on an [`EventLoop`], one scheduled step
//!   at a time
//! - **[`Promise`]** / **[`Resolver`]**: a settle-once value and its write side
//!
//! ## Example
//!
//! ```
//! use yielder::prelude::*;
//!
//! let event_loop = LocalLoop::new();
//! let driver = Driver::new(event_loop.clone());
//!
//! let (response, resolver) = Promise::<String, Error>::new();
//! event_loop.after(3, Box::new(move || {
//!     resolver.resolve("pong".to_string());
//! }));
//!
//! let mut pending = Some(response);
//! let promise = driver.to_promise(from_fn(move |input: Option<Result<String, Error>>| {
//!     match input {
//!         None => match pending.take() {
//!             Some(response) => Step::Yielded(response.into()),
//!             None => Step::Failed(Error::Rejected("started twice".into())),
//!         },
//!         Some(Ok(body)) => Step::Done(body.to_uppercase()),
//!         Some(Err(e)) => Step::Failed(e),
//!     }
//! }));
//!
//! event_loop.run();
//! assert_eq!(promise.settled(), Some(Ok("PONG".to_string())));
//! ```
//!
//! ## Common Functions
//!
//! **Building computations:**
//! - [`from_fn(f)`] - Closure-backed state machine
//! - [`once(f)`] - Complete with a callback's result, awaiting it first if needed
//! - [`ready(value)`] - Complete without suspending
//! - [`and_then(a, f)`] - Run `a`, then the computation `f` builds from its result
//!
//! **Driving:**
//! - [`Driver::to_promise`] - Drive a computation, return a promise for its result
//! - [`Driver::run`] - Top-level entry for a computation or a plain callback
//! - [`Driver::run_callback`] - `run` with a plain callback

pub mod build;
pub mod compose;
mod coroutine;
mod driver;
mod error;
mod event_loop;
pub mod prelude;
mod promise;
mod step;
mod yielded;

pub use build::{from_fn, once, ready};
pub use compose::{and_then, map_done};
pub use coroutine::*;
pub use driver::*;
pub use error::*;
pub use event_loop::*;
pub use promise::*;
pub use step::*;
pub use yielded::*;
