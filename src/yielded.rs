//! What a computation can suspend on, and how the driver sorts it.
//!
//! Every suspension point hands the driver a [`Yield`]. The set of variants is
//! closed, so sorting is a `match` rather than a chain of runtime type tests:
//!
//! - [`Yield::Await`]: something already in flight; resume with its settlement.
//! - [`Yield::Nested`]: another computation; drive it fully, resume with its result.
//! - [`Yield::Thunk`]: a deferred step; call it and sort whatever it returns.
//! - [`Yield::Value`]: nothing to wait for; resume with the value itself.
//!
//! [`Yield::classify`] unwraps thunks and leaves one of the three variants the
//! driver acts on.

use std::fmt;

use crate::{
    coroutine::{BoxCoroutine, Coroutine},
    promise::{Promise, Thenable},
};

/// Value produced at a single suspension point.
pub enum Yield<T, E> {
    /// Resume with the settlement of an awaitable.
    Await(Box<dyn Thenable<T, E>>),
    /// Resume with the result of driving another computation.
    Nested(BoxCoroutine<T, E>),
    /// Call this when reached, and handle what it returns instead.
    Thunk(Box<dyn FnOnce() -> Yield<T, E>>),
    /// Resume with this value as is.
    Value(T),
}

/// A [`Yield`] with every thunk already invoked.
pub enum Classified<T, E> {
    /// An awaitable to subscribe to.
    Await(Box<dyn Thenable<T, E>>),
    /// A computation to drive first.
    Nested(BoxCoroutine<T, E>),
    /// A value to hand straight back.
    Value(T),
}

/// Variant tag of a [`Yield`], for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YieldKind {
    /// [`Yield::Await`]
    Await,
    /// [`Yield::Nested`]
    Nested,
    /// [`Yield::Thunk`]
    Thunk,
    /// [`Yield::Value`]
    Value,
}

impl<T, E> Yield<T, E> {
    /// Suspend until `awaitable` settles.
    pub fn awaiting<A>(awaitable: A) -> Self
    where
        A: Thenable<T, E> + 'static,
    {
        Yield::Await(Box::new(awaitable))
    }

    /// Suspend until `computation` has been driven to completion.
    pub fn nested<C>(computation: C) -> Self
    where
        C: Coroutine<T, E> + 'static,
    {
        Yield::Nested(Box::new(computation))
    }

    /// Defer building the next yield until the driver reaches it.
    pub fn thunk<F>(f: F) -> Self
    where
        F: FnOnce() -> Yield<T, E> + 'static,
    {
        Yield::Thunk(Box::new(f))
    }

    /// Resume straight away with `value`.
    pub fn value(value: T) -> Self {
        Yield::Value(value)
    }

    /// The variant tag, without consuming the yield.
    pub fn kind(&self) -> YieldKind {
        match self {
            Yield::Await(_) => YieldKind::Await,
            Yield::Nested(_) => YieldKind::Nested,
            Yield::Thunk(_) => YieldKind::Thunk,
            Yield::Value(_) => YieldKind::Value,
        }
    }

    /// Invoke thunks until a non-thunk variant is reached.
    ///
    /// Each thunk runs exactly once, in the order the chain produces them.
    ///
    /// ```rust
    /// use yielder::{Classified, Yield};
    ///
    /// let chained: Yield<&str, ()> = Yield::thunk(|| Yield::thunk(|| Yield::value("x")));
    /// assert!(matches!(chained.classify(), Classified::Value("x")));
    /// ```
    pub fn classify(self) -> Classified<T, E> {
        let mut current = self;
        loop {
            current = match current {
                Yield::Thunk(f) => f(),
                Yield::Await(awaitable) => return Classified::Await(awaitable),
                Yield::Nested(computation) => return Classified::Nested(computation),
                Yield::Value(value) => return Classified::Value(value),
            };
        }
    }
}

impl<T, E> Classified<T, E> {
    /// The variant tag; never [`YieldKind::Thunk`].
    pub fn kind(&self) -> YieldKind {
        match self {
            Classified::Await(_) => YieldKind::Await,
            Classified::Nested(_) => YieldKind::Nested,
            Classified::Value(_) => YieldKind::Value,
        }
    }
}

impl<T, E> From<Promise<T, E>> for Yield<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn from(promise: Promise<T, E>) -> Self {
        Yield::awaiting(promise)
    }
}

impl fmt::Display for YieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            YieldKind::Await => "await",
            YieldKind::Nested => "nested",
            YieldKind::Thunk => "thunk",
            YieldKind::Value => "value",
        };
        f.write_str(name)
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Yield<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Yield::Value(value) => f.debug_tuple("Value").field(value).finish(),
            other => write!(f, "{:?}(..)", other.kind()),
        }
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Classified<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classified::Value(value) => f.debug_tuple("Value").field(value).finish(),
            other => write!(f, "{:?}(..)", other.kind()),
        }
    }
}
