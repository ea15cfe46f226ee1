//! Transforming return values.

use crate::{
    coroutine::{CoStep, Coroutine},
    step::Step,
};

/// Transforms the return value of the wrapped stage.
///
/// Yields and failures pass through unchanged.
pub struct MapDone<S, F> {
    f: F,
    stage: S,
}

/// Create a computation that transforms the wrapped stage's return value.
///
/// ```rust
/// use yielder::prelude::*;
///
/// let mut stage = map_done(ready::<u32>(20), |n: u32| n + 1);
/// let step: Step<Yield<u32, ()>, u32, ()> = stage.start();
/// assert_eq!(step.unwrap_done(), 21);
/// ```
pub fn map_done<S, F>(stage: S, f: F) -> MapDone<S, F> {
    MapDone { f, stage }
}

impl<T, E, S, F> Coroutine<T, E> for MapDone<S, F>
where
    S: Coroutine<T, E>,
    F: FnMut(T) -> T,
{
    fn start(&mut self) -> CoStep<T, E> {
        let step = self.stage.start();
        self.map(step)
    }

    fn resume(&mut self, input: Result<T, E>) -> CoStep<T, E> {
        let step = self.stage.resume(input);
        self.map(step)
    }
}

impl<S, F> MapDone<S, F> {
    fn map<T, E>(&mut self, step: CoStep<T, E>) -> CoStep<T, E>
    where
        F: FnMut(T) -> T,
    {
        match step {
            Step::Done(value) => Step::Done((self.f)(value)),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build::from_fn, yielded::Yield};

    #[test]
    fn test_map_done_leaves_yields_and_failures_alone() {
        let counter = from_fn(|input: Option<Result<u32, &'static str>>| match input {
            None => Step::Yielded(Yield::value(1)),
            Some(Ok(n)) => Step::Done(n),
            Some(Err(e)) => Step::Failed(e),
        });
        let mut stage = counter.map_done(|n| n * 10);

        assert!(matches!(stage.start(), Step::Yielded(Yield::Value(1))));
        assert_eq!(stage.resume(Ok(4)).unwrap_done(), 40);
    }

    #[test]
    fn test_map_done_passes_failure_through() {
        let failing = from_fn(|_: Option<Result<u32, &'static str>>| Step::Failed("boom"));
        let mut stage = map_done(failing, |n: u32| n + 1);
        assert_eq!(stage.start().unwrap_failed(), "boom");
    }
}
