use crate::{
    coroutine::{CoStep, Coroutine},
    step::Step,
    yielded::{Classified, Yield},
};

/// Computation backed by a closure.
///
/// The closure receives `None` when started and `Some(outcome)` on every
/// resumption after that.
pub struct FromFn<F>(F);

/// Create a computation from a closure.
///
/// The closure owns whatever state the computation needs between steps.
///
/// ```rust
/// use yielder::prelude::*;
///
/// let mut seen = Vec::new();
/// let mut stage = from_fn(move |input: Option<Result<i32, ()>>| {
///     if let Some(Ok(n)) = input {
///         seen.push(n);
///     }
///     if seen.len() < 2 {
///         Step::Yielded(Yield::value(seen.len() as i32))
///     } else {
///         Step::Done(seen.iter().sum())
///     }
/// });
///
/// assert!(stage.start().is_yielded());
/// assert!(stage.resume(Ok(10)).is_yielded());
/// assert_eq!(stage.resume(Ok(5)).unwrap_done(), 15);
/// ```
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn(f)
}

impl<T, E, F> Coroutine<T, E> for FromFn<F>
where
    F: FnMut(Option<Result<T, E>>) -> CoStep<T, E>,
{
    fn start(&mut self) -> CoStep<T, E> {
        (self.0)(None)
    }

    fn resume(&mut self, input: Result<T, E>) -> CoStep<T, E> {
        (self.0)(Some(input))
    }
}

/// Calls a function once and completes with what it produced.
///
/// This is how a plain callback takes part in driving. A plain value (after
/// unwrapping thunks) is the return value straight away. An awaitable or a
/// nested computation is yielded, and the outcome it is resumed with becomes
/// the return value.
pub struct Once<F>(Option<F>);

/// Create a one-step computation around `f`.
///
/// ```rust
/// use yielder::prelude::*;
///
/// let mut plain = once(|| Yield::<_, ()>::thunk(|| Yield::value("x")));
/// assert_eq!(plain.start().unwrap_done(), "x");
///
/// let mut awaiting = once(|| Yield::<_, ()>::from(Promise::fulfilled("y")));
/// assert!(awaiting.start().is_yielded());
/// assert_eq!(awaiting.resume(Ok("y")).unwrap_done(), "y");
/// ```
pub fn once<F>(f: F) -> Once<F> {
    Once(Some(f))
}

impl<T, E, F> Coroutine<T, E> for Once<F>
where
    F: FnOnce() -> Yield<T, E>,
{
    /// # Panics
    ///
    /// Panics if started twice.
    fn start(&mut self) -> CoStep<T, E> {
        let f = self.0.take().expect("Once can only be started once");
        match f().classify() {
            Classified::Value(value) => Step::Done(value),
            Classified::Await(awaitable) => Step::Yielded(Yield::Await(awaitable)),
            Classified::Nested(computation) => Step::Yielded(Yield::Nested(computation)),
        }
    }

    fn resume(&mut self, input: Result<T, E>) -> CoStep<T, E> {
        input.into()
    }
}

/// Completes with a value without ever suspending.
pub struct Ready<T>(Option<T>);

/// Create a computation that returns `value` as soon as it is started.
pub fn ready<T>(value: T) -> Ready<T> {
    Ready(Some(value))
}

impl<T, E> Coroutine<T, E> for Ready<T> {
    /// # Panics
    ///
    /// Panics if started twice.
    fn start(&mut self) -> CoStep<T, E> {
        Step::Done(self.0.take().expect("Ready can only be started once"))
    }

    fn resume(&mut self, input: Result<T, E>) -> CoStep<T, E> {
        input.into()
    }
}
