use crate::{
    coroutine::{CoStep, Coroutine},
    step::Step,
};

/// Runs one computation, then another built from its return value.
///
/// Created via [`and_then`] or [`Coroutine::and_then`]. The first stage is
/// dropped once it completes.
pub struct AndThen<L, C, F> {
    state: AndThenState<L, C, F>,
}

enum AndThenState<L, C, F> {
    OnFirst(L, Option<F>),
    OnSecond(C),
}

/// Drive `first`, then the computation `f` builds from its return value.
///
/// ```rust
/// use yielder::prelude::*;
///
/// let mut stage = and_then(ready::<u32>(2), |n: u32| {
///     from_fn(move |input: Option<Result<u32, ()>>| match input {
///         None => Step::Yielded(Yield::value(n)),
///         Some(Ok(m)) => Step::Done(n + m),
///         Some(Err(e)) => Step::Failed(e),
///     })
/// });
///
/// // the first stage finishes right away, so the second starts in the same call
/// assert!(matches!(stage.start(), Step::Yielded(Yield::Value(2))));
/// assert_eq!(stage.resume(Ok(40)).unwrap_done(), 42);
/// ```
pub fn and_then<T, E, L, C, F>(first: L, f: F) -> AndThen<L, C, F>
where
    L: Coroutine<T, E>,
    C: Coroutine<T, E>,
    F: FnOnce(T) -> C,
{
    AndThen {
        state: AndThenState::OnFirst(first, Some(f)),
    }
}

impl<L, C, F> AndThen<L, C, F> {
    fn after_first<T, E>(&mut self, step: CoStep<T, E>) -> CoStep<T, E>
    where
        C: Coroutine<T, E>,
        F: FnOnce(T) -> C,
    {
        let value = match step {
            Step::Done(value) => value,
            other => return other,
        };
        let f = match &mut self.state {
            AndThenState::OnFirst(_, f) => f.take(),
            AndThenState::OnSecond(_) => None,
        };
        let mut next = f.expect("AndThen can only be used once")(value);
        let step = next.start();
        self.state = AndThenState::OnSecond(next); // we drop the old stage when it's done
        step
    }
}

impl<T, E, L, C, F> Coroutine<T, E> for AndThen<L, C, F>
where
    L: Coroutine<T, E>,
    C: Coroutine<T, E>,
    F: FnOnce(T) -> C,
{
    fn start(&mut self) -> CoStep<T, E> {
        match &mut self.state {
            AndThenState::OnFirst(first, _) => {
                let step = first.start();
                self.after_first(step)
            }
            AndThenState::OnSecond(second) => second.start(),
        }
    }

    fn resume(&mut self, input: Result<T, E>) -> CoStep<T, E> {
        match &mut self.state {
            AndThenState::OnFirst(first, _) => {
                let step = first.resume(input);
                self.after_first(step)
            }
            AndThenState::OnSecond(second) => second.resume(input),
        }
    }
}
