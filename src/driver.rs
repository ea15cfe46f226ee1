//! Driving computations on an event loop.
//!
//! [`Driver::to_promise`] turns a [`Coroutine`] into a [`Promise`] for its
//! result. Driving happens one scheduled task at a time:
//!
//! 1. The computation is started on a later tick, never inside `to_promise`.
//! 2. Each step it hands back is inspected. A terminal step settles the promise.
//!    A yielded value is classified:
//!    - an awaitable is subscribed to, and its settlement is fed back on a later tick;
//!    - a nested computation is driven by its own promise, which is then awaited;
//!    - thunks are called until one of the other variants comes out;
//!    - a plain value is fed straight back.
//! 3. Feeding resumes the computation right away and inspects the step it
//!    returns on the following tick.
//!
//! Per drive, the computation is moved from task to task by value, so at most
//! one task can ever be resuming it. Panics inside the computation are caught at
//! the resume boundary and reject the promise instead of unwinding into the loop.

use std::{
    cell::Cell,
    fmt,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use either::Either;
use tracing::{debug, trace};

use crate::{
    build::once,
    coroutine::{BoxCoroutine, CoStep, Coroutine},
    error::DriveError,
    event_loop::EventLoop,
    promise::{Promise, Resolver, Thenable},
    step::Step,
    yielded::{Classified, Yield},
};

/// Identifies one driven computation in log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DriveId(u64);

impl fmt::Display for DriveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builder for configuring and creating a [`Driver`].
///
/// # Examples
///
/// ```rust
/// use yielder::{Driver, LocalLoop};
///
/// let driver = Driver::builder(LocalLoop::new()).strict(true).build();
/// assert!(driver.is_strict());
/// ```
pub struct DriverBuilder<L> {
    event_loop: L,
    /// Reject plain-value yields instead of feeding them back.
    strict: bool,
}

impl<L> DriverBuilder<L>
where
    L: EventLoop + Clone + 'static,
{
    /// Creates a builder with the default, permissive configuration.
    pub fn new(event_loop: L) -> Self {
        Self {
            event_loop,
            strict: false,
        }
    }

    /// Sets whether a yielded [`Yield::Value`] is an error.
    ///
    /// When strict, such a yield rejects the outer promise with
    /// [`DriveError::UnawaitedValue`] and the computation is not resumed again.
    /// A plain value returned by a [`Driver::run`] callback is still its result.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn build(self) -> Driver<L> {
        Driver {
            event_loop: self.event_loop,
            strict: self.strict,
            next_id: Rc::new(Cell::new(0)),
        }
    }
}

impl<L> Default for DriverBuilder<L>
where
    L: EventLoop + Clone + Default + 'static,
{
    fn default() -> Self {
        Self::new(L::default())
    }
}

/// Converts computations into promises, driving them on an event loop.
///
/// Clones share the event loop and the drive id sequence.
///
/// ```rust
/// use yielder::prelude::*;
///
/// let event_loop = LocalLoop::new();
/// let driver = Driver::new(event_loop.clone());
///
/// let promise = driver.to_promise(from_fn(|input: Option<Result<u32, Error>>| match input {
///     None => Step::Yielded(Yield::from(Promise::fulfilled(20))),
///     Some(Ok(n)) => Step::Done(n + 1),
///     Some(Err(e)) => Step::Failed(e),
/// }));
///
/// assert!(promise.is_pending());
/// event_loop.run();
/// assert_eq!(promise.settled(), Some(Ok(21)));
/// ```
#[derive(Clone)]
pub struct Driver<L> {
    event_loop: L,
    strict: bool,
    next_id: Rc<Cell<u64>>,
}

impl<L> Driver<L>
where
    L: EventLoop + Clone + 'static,
{
    /// A permissive driver on `event_loop`.
    pub fn new(event_loop: L) -> Self {
        DriverBuilder::new(event_loop).build()
    }

    pub fn builder(event_loop: L) -> DriverBuilder<L> {
        DriverBuilder::new(event_loop)
    }

    pub fn event_loop(&self) -> &L {
        &self.event_loop
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Drive `computation` to completion and expose its outcome as a promise.
    ///
    /// The first step is only scheduled here; the promise is always still
    /// pending when this returns.
    pub fn to_promise<T, E, C>(&self, computation: C) -> Promise<T, E>
    where
        T: Clone + 'static,
        E: Clone + From<DriveError> + 'static,
        C: Coroutine<T, E> + 'static,
    {
        self.drive(Box::new(computation))
    }

    /// Top-level entry point.
    ///
    /// `Left` is driven as is. `Right` is a callback, called on the first step.
    /// A plain value it returns is the result, in strict mode too. An awaitable
    /// or nested computation it returns is awaited like any other yield, and the
    /// outcome becomes the result.
    ///
    /// With `run_loop`, runs the event loop until no work is left before
    /// returning. Otherwise the caller runs it, which lets several entries share
    /// one loop.
    ///
    /// Only one side of the `Either` is inferred from the argument, so name the
    /// other. [`run_callback`](Driver::run_callback) covers the `Right` case.
    ///
    /// ```rust
    /// use either::Either;
    /// use yielder::prelude::*;
    ///
    /// let driver = Driver::new(LocalLoop::new());
    /// let entry = Either::<_, fn() -> Yield<u32, Error>>::Left(ready(3));
    /// assert_eq!(driver.run(entry, true).settled(), Some(Ok(3)));
    /// ```
    pub fn run<T, E, C, F>(&self, entry: Either<C, F>, run_loop: bool) -> Promise<T, E>
    where
        T: Clone + 'static,
        E: Clone + From<DriveError> + 'static,
        C: Coroutine<T, E> + 'static,
        F: FnOnce() -> Yield<T, E> + 'static,
    {
        let computation: BoxCoroutine<T, E> = match entry {
            Either::Left(computation) => Box::new(computation),
            Either::Right(callback) => Box::new(once(callback)),
        };
        let promise = self.drive(computation);
        if run_loop {
            self.event_loop.run();
        }
        promise
    }

    /// [`run`](Driver::run) with a callback entry.
    ///
    /// ```rust
    /// use yielder::prelude::*;
    ///
    /// let driver = Driver::new(LocalLoop::new());
    /// let promise = driver.run_callback(|| Yield::<_, Error>::value("done"), true);
    /// assert_eq!(promise.settled(), Some(Ok("done")));
    /// ```
    pub fn run_callback<T, E, F>(&self, callback: F, run_loop: bool) -> Promise<T, E>
    where
        T: Clone + 'static,
        E: Clone + From<DriveError> + 'static,
        F: FnOnce() -> Yield<T, E> + 'static,
    {
        self.run(Either::<BoxCoroutine<T, E>, F>::Right(callback), run_loop)
    }

    fn drive<T, E>(&self, computation: BoxCoroutine<T, E>) -> Promise<T, E>
    where
        T: Clone + 'static,
        E: Clone + From<DriveError> + 'static,
    {
        let id = DriveId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let (promise, resolver) = Promise::new();
        let drive = Drive {
            id,
            computation,
            resolver,
            driver: self.clone(),
        };
        trace!(drive = %id, "scheduling first step");
        self.event_loop.future_tick(Box::new(move || drive.start()));
        promise
    }
}

impl<L: fmt::Debug> fmt::Debug for Driver<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("event_loop", &self.event_loop)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

/// State of one in-flight computation.
struct Drive<L, T, E> {
    id: DriveId,
    computation: BoxCoroutine<T, E>,
    resolver: Resolver<T, E>,
    driver: Driver<L>,
}

impl<L, T, E> Drive<L, T, E>
where
    L: EventLoop + Clone + 'static,
    T: Clone + 'static,
    E: Clone + From<DriveError> + 'static,
{
    fn start(mut self) {
        trace!(drive = %self.id, "start");
        match self.guarded(|computation| computation.start()) {
            Ok(step) => self.inspect(step),
            Err(error) => self.settle(Err(error.into())),
        }
    }

    fn inspect(self, step: CoStep<T, E>) {
        let yielded = match step {
            Step::Done(value) => return self.settle(Ok(value)),
            Step::Failed(reason) => return self.settle(Err(reason)),
            Step::Yielded(yielded) => yielded,
        };

        let kind = yielded.kind();
        let classified = match panic::catch_unwind(AssertUnwindSafe(move || yielded.classify())) {
            Ok(classified) => classified,
            Err(payload) => return self.settle(Err(DriveError::from_panic(payload).into())),
        };
        trace!(drive = %self.id, %kind, resolved = %classified.kind(), "inspect");

        match classified {
            Classified::Await(awaitable) => self.await_on(awaitable),
            Classified::Nested(inner) => {
                trace!(drive = %self.id, "driving nested computation");
                let inner = self.driver.drive(inner);
                self.await_on(Box::new(inner));
            }
            Classified::Value(_) if self.driver.strict => {
                self.settle(Err(DriveError::UnawaitedValue.into()))
            }
            Classified::Value(value) => self.feed(Ok(value)),
        }
    }

    fn await_on(self, awaitable: Box<dyn Thenable<T, E>>) {
        trace!(drive = %self.id, "awaiting");
        let id = self.id;
        let resolver = self.resolver.clone();
        let event_loop = self.driver.event_loop.clone();
        let callback: Box<dyn FnOnce(Result<T, E>)> = Box::new(move |settled| {
            trace!(drive = %self.id, fulfilled = settled.is_ok(), "awaited value settled");
            event_loop.future_tick(Box::new(move || self.feed(settled)));
        });
        // a panicking provider drops the callback, and with it the drive
        let subscribed =
            panic::catch_unwind(AssertUnwindSafe(move || awaitable.on_settle(callback)));
        if let Err(payload) = subscribed {
            debug!(drive = %id, "rejected: awaitable panicked while subscribing");
            resolver.settle(Err(DriveError::from_panic(payload).into()));
        }
    }

    /// Resume with `input` now, inspect the resulting step on the next tick.
    fn feed(mut self, input: Result<T, E>) {
        trace!(drive = %self.id, ok = input.is_ok(), "resume");
        match self.guarded(move |computation| computation.resume(input)) {
            Ok(step) => {
                let event_loop = self.driver.event_loop.clone();
                event_loop.future_tick(Box::new(move || self.inspect(step)));
            }
            Err(error) => self.settle(Err(error.into())),
        }
    }

    fn guarded<R>(
        &mut self,
        f: impl FnOnce(&mut BoxCoroutine<T, E>) -> R,
    ) -> Result<R, DriveError> {
        let computation = &mut self.computation;
        panic::catch_unwind(AssertUnwindSafe(move || f(computation)))
            .map_err(DriveError::from_panic)
    }

    fn settle(self, result: Result<T, E>) {
        match &result {
            Ok(_) => debug!(drive = %self.id, "fulfilled"),
            Err(_) => debug!(drive = %self.id, "rejected"),
        }
        if !self.resolver.settle(result) {
            // only reachable when a provider panicked after calling back
            trace!(drive = %self.id, "already settled, result dropped");
        }
    }
}
