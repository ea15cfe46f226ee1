//! Single-threaded, settle-once promises.
//!
//! A [`Promise`] is the read side of a value that settles exactly once, either
//! fulfilled with a `T` or rejected with an `E`. The matching [`Resolver`] is the
//! write side. Both are cheap handles over the same shared cell.
//!
//! The driver does not depend on this concrete type when awaiting: anything that
//! implements [`Thenable`] can be yielded. `Promise` is the provider the driver
//! uses for its own outer results, and the one tests and demos reach for.
//!
//! ```rust
//! use yielder::Promise;
//!
//! let (promise, resolver) = Promise::<u32, String>::new();
//! assert!(promise.is_pending());
//!
//! assert!(resolver.resolve(7));
//! assert!(!resolver.reject("late".into())); // already settled
//! assert_eq!(promise.settled(), Some(Ok(7)));
//! ```

use std::{cell::RefCell, fmt, rc::Rc};

type Reaction<T, E> = Box<dyn FnOnce(Result<T, E>)>;

enum State<T, E> {
    Pending(Vec<Reaction<T, E>>),
    Settled(Result<T, E>),
}

/// Capability of anything that settles once and can report that settlement.
///
/// This is what [`Yield::Await`](crate::Yield::Await) holds. A provider must
/// invoke `callback` exactly once, with either the fulfillment value (`Ok`) or
/// the rejection reason (`Err`). Invoking it synchronously is allowed; the driver
/// always defers its own reaction to a later tick.
pub trait Thenable<T, E> {
    fn on_settle(self: Box<Self>, callback: Box<dyn FnOnce(Result<T, E>)>);
}

/// Read side of a settle-once value.
pub struct Promise<T, E> {
    state: Rc<RefCell<State<T, E>>>,
}

/// Write side of a [`Promise`].
///
/// Only the first call to [`settle`](Resolver::settle) (or its `resolve` /
/// `reject` shorthands) has any effect.
pub struct Resolver<T, E> {
    state: Rc<RefCell<State<T, E>>>,
}

impl<T, E> Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Create a pending promise together with the resolver that settles it.
    pub fn new() -> (Self, Resolver<T, E>) {
        let state = Rc::new(RefCell::new(State::Pending(Vec::new())));
        (
            Promise {
                state: Rc::clone(&state),
            },
            Resolver { state },
        )
    }

    /// A promise that is already fulfilled with `value`.
    pub fn fulfilled(value: T) -> Self {
        Self::settled_with(Ok(value))
    }

    /// A promise that is already rejected with `reason`.
    pub fn rejected(reason: E) -> Self {
        Self::settled_with(Err(reason))
    }

    fn settled_with(result: Result<T, E>) -> Self {
        Promise {
            state: Rc::new(RefCell::new(State::Settled(result))),
        }
    }

    /// Register `callback` to receive the settlement.
    ///
    /// Runs `callback` right away if the promise has already settled, otherwise
    /// when its resolver settles it.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: FnOnce(Result<T, E>) + 'static,
    {
        let settled = match &mut *self.state.borrow_mut() {
            State::Pending(reactions) => {
                reactions.push(Box::new(callback));
                return;
            }
            State::Settled(result) => result.clone(),
        };
        callback(settled);
    }

    /// Two-continuation form of [`subscribe`](Promise::subscribe).
    pub fn then<F, R>(&self, on_fulfilled: F, on_rejected: R)
    where
        F: FnOnce(T) + 'static,
        R: FnOnce(E) + 'static,
    {
        self.subscribe(move |result| match result {
            Ok(value) => on_fulfilled(value),
            Err(reason) => on_rejected(reason),
        });
    }

    /// The settlement, if there is one yet.
    pub fn settled(&self) -> Option<Result<T, E>> {
        match &*self.state.borrow() {
            State::Pending(_) => None,
            State::Settled(result) => Some(result.clone()),
        }
    }
}

impl<T, E> Promise<T, E> {
    pub fn is_pending(&self) -> bool {
        matches!(&*self.state.borrow(), State::Pending(_))
    }
}

impl<T, E> Resolver<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Settle the promise with `result`.
    ///
    /// Returns `false`, leaving the promise untouched, if it was already settled.
    pub fn settle(&self, result: Result<T, E>) -> bool {
        let reactions = {
            let mut state = self.state.borrow_mut();
            let State::Pending(reactions) = &mut *state else {
                return false;
            };
            let reactions = std::mem::take(reactions);
            *state = State::Settled(result.clone());
            reactions
        };
        // the cell is released before reactions run, so they may touch this promise
        for reaction in reactions {
            reaction(result.clone());
        }
        true
    }

    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    pub fn reject(&self, reason: E) -> bool {
        self.settle(Err(reason))
    }
}

impl<T, E> Thenable<T, E> for Promise<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn on_settle(self: Box<Self>, callback: Box<dyn FnOnce(Result<T, E>)>) {
        self.subscribe(callback);
    }
}

impl<T, E> Clone for Promise<T, E> {
    fn clone(&self) -> Self {
        Promise {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Resolver {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T, E> fmt::Debug for Promise<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.borrow() {
            State::Pending(_) => "pending",
            State::Settled(Ok(_)) => "fulfilled",
            State::Settled(Err(_)) => "rejected",
        };
        f.debug_struct("Promise").field("state", &state).finish()
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}
