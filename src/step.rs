/// Outcome of resuming a computation once.
///
/// `Step` is what a [`Coroutine`](crate::Coroutine) hands back every time it is
/// started or resumed: either it suspended on a yielded value and can be resumed
/// again, or it ended with a return value or a failure.
///
/// # Examples
///
/// ```rust
/// use yielder::Step;
///
/// let suspended: Step<&str, i32, String> = Step::Yielded("waiting");
/// let finished: Step<&str, i32, String> = Step::Done(42);
///
/// assert!(suspended.is_yielded());
/// assert_eq!(finished.into_result(), Some(Ok(42)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<Y, T, E> {
    /// The computation suspended on a yielded value.
    Yielded(Y),
    /// The computation returned.
    Done(T),
    /// The computation failed.
    Failed(E),
}

impl<Y, T, E> Step<Y, T, E> {
    /// Returns `true` if the step is `Yielded`.
    #[inline]
    pub const fn is_yielded(&self) -> bool {
        matches!(self, Step::Yielded(_))
    }

    /// Returns `true` if the computation ended, either way.
    ///
    /// ```rust
    /// use yielder::Step;
    ///
    /// let x: Step<(), i32, &str> = Step::Failed("boom");
    /// assert!(x.is_terminal());
    /// ```
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !self.is_yielded()
    }

    /// Maps the yielded value, leaving terminal steps untouched.
    #[inline]
    pub fn map_yielded<Y2, F>(self, f: F) -> Step<Y2, T, E>
    where
        F: FnOnce(Y) -> Y2,
    {
        match self {
            Step::Yielded(y) => Step::Yielded(f(y)),
            Step::Done(t) => Step::Done(t),
            Step::Failed(e) => Step::Failed(e),
        }
    }

    /// Maps the return value of a `Done` step.
    ///
    /// ```rust
    /// use yielder::Step;
    ///
    /// let x: Step<(), i32, &str> = Step::Done(4);
    /// assert_eq!(x.map_done(|v| v * 2), Step::Done(8));
    /// ```
    #[inline]
    pub fn map_done<T2, F>(self, f: F) -> Step<Y, T2, E>
    where
        F: FnOnce(T) -> T2,
    {
        match self {
            Step::Yielded(y) => Step::Yielded(y),
            Step::Done(t) => Step::Done(f(t)),
            Step::Failed(e) => Step::Failed(e),
        }
    }

    /// Converts a terminal step into its result, or `None` if it yielded.
    #[inline]
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            Step::Yielded(_) => None,
            Step::Done(t) => Some(Ok(t)),
            Step::Failed(e) => Some(Err(e)),
        }
    }

    /// Returns the yielded value.
    ///
    /// # Panics
    ///
    /// Panics if the step is terminal.
    #[inline]
    pub fn unwrap_yielded(self) -> Y {
        match self {
            Step::Yielded(y) => y,
            Step::Done(_) => panic!("called `Step::unwrap_yielded()` on a `Done` value"),
            Step::Failed(_) => panic!("called `Step::unwrap_yielded()` on a `Failed` value"),
        }
    }

    /// Returns the return value.
    ///
    /// # Panics
    ///
    /// Panics unless the step is `Done`.
    #[inline]
    pub fn unwrap_done(self) -> T {
        match self {
            Step::Done(t) => t,
            Step::Yielded(_) => panic!("called `Step::unwrap_done()` on a `Yielded` value"),
            Step::Failed(_) => panic!("called `Step::unwrap_done()` on a `Failed` value"),
        }
    }

    /// Returns the failure.
    ///
    /// # Panics
    ///
    /// Panics unless the step is `Failed`.
    #[inline]
    pub fn unwrap_failed(self) -> E {
        match self {
            Step::Failed(e) => e,
            Step::Yielded(_) => panic!("called `Step::unwrap_failed()` on a `Yielded` value"),
            Step::Done(_) => panic!("called `Step::unwrap_failed()` on a `Done` value"),
        }
    }
}

impl<Y, T, E> From<Result<T, E>> for Step<Y, T, E> {
    /// A finished result becomes the matching terminal step.
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(t) => Step::Done(t),
            Err(e) => Step::Failed(e),
        }
    }
}
