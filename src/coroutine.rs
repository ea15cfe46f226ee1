//! Core trait for resumable computations.
//!
//! A [`Coroutine<T, E>`] is sequential code cut into steps. The driver starts it
//! once, and after that resumes it with the outcome of whatever it last yielded:
//! `Ok(value)` for a fulfilled await, a finished nested computation or a plain
//! value, `Err(reason)` for a rejection. Each call hands back a [`Step`].
//!
//! ```rust
//! use yielder::prelude::*;
//!
//! let mut doubler = from_fn(|input: Option<Result<u32, ()>>| match input {
//!     None => Step::Yielded(Yield::value(21)),
//!     Some(Ok(n)) => Step::Done(n * 2),
//!     Some(Err(e)) => Step::Failed(e),
//! });
//!
//! assert!(doubler.start().is_yielded());
//! assert_eq!(doubler.resume(Ok(21)).unwrap_done(), 42);
//! ```

use std::{cell::RefCell, rc::Rc};

use crate::{
    compose::{AndThen, MapDone, and_then, map_done},
    step::Step,
    yielded::Yield,
};

/// What one resumption of a [`Coroutine<T, E>`] produces.
pub type CoStep<T, E> = Step<Yield<T, E>, T, E>;

/// Type-erased computation, the form nested computations are yielded in.
pub type BoxCoroutine<T, E> = Box<dyn Coroutine<T, E>>;

/// A computation that suspends on [`Yield`]s and is resumed with their outcome.
///
/// The driver calls [`start`](Coroutine::start) exactly once and then
/// [`resume`](Coroutine::resume) once per `Yielded` step, never after a terminal
/// step.
pub trait Coroutine<T, E> {
    /// Run up to the first suspension point.
    fn start(&mut self) -> CoStep<T, E>;

    /// Continue from the current suspension point with its outcome.
    fn resume(&mut self, input: Result<T, E>) -> CoStep<T, E>;

    fn boxed(self) -> BoxCoroutine<T, E>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }

    /// Continue with a computation built from this one's return value.
    ///
    /// The second computation is started in the same resumption that finished
    /// the first. A failure of the first skips `f` entirely.
    fn and_then<C, F>(self, f: F) -> AndThen<Self, C, F>
    where
        Self: Sized,
        C: Coroutine<T, E>,
        F: FnOnce(T) -> C,
    {
        and_then(self, f)
    }

    /// Transform the return value when completing.
    fn map_done<F>(self, f: F) -> MapDone<Self, F>
    where
        Self: Sized,
        F: FnMut(T) -> T,
    {
        map_done(self, f)
    }
}

impl<T, E> Coroutine<T, E> for BoxCoroutine<T, E> {
    fn start(&mut self) -> CoStep<T, E> {
        (**self).start()
    }

    fn resume(&mut self, input: Result<T, E>) -> CoStep<T, E> {
        (**self).resume(input)
    }
}

impl<T, E, C> Coroutine<T, E> for Rc<RefCell<C>>
where
    C: Coroutine<T, E>,
{
    fn start(&mut self) -> CoStep<T, E> {
        self.borrow_mut().start()
    }

    fn resume(&mut self, input: Result<T, E>) -> CoStep<T, E> {
        self.borrow_mut().resume(input)
    }
}

impl<T, E, L, R> Coroutine<T, E> for either::Either<L, R>
where
    L: Coroutine<T, E>,
    R: Coroutine<T, E>,
{
    fn start(&mut self) -> CoStep<T, E> {
        match self {
            either::Either::Left(l) => l.start(),
            either::Either::Right(r) => r.start(),
        }
    }

    fn resume(&mut self, input: Result<T, E>) -> CoStep<T, E> {
        match self {
            either::Either::Left(l) => l.resume(input),
            either::Either::Right(r) => r.resume(input),
        }
    }
}
