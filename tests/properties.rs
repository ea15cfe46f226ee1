// Property-based tests for the driver's ordering and passthrough guarantees.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use proptest::prelude::*;
use yielder::prelude::*;

/// Yields everything in `steps`, records each resumption input, and returns
/// how many inputs it saw.
fn recording(
    steps: Vec<Yield<i64, Error>>,
    log: Rc<RefCell<Vec<Result<i64, Error>>>>,
) -> impl Coroutine<i64, Error> {
    let mut steps = VecDeque::from(steps);
    from_fn(move |input: Option<Result<i64, Error>>| {
        if let Some(input) = input {
            log.borrow_mut().push(input);
        }
        match steps.pop_front() {
            Some(next) => Step::Yielded(next),
            None => Step::Done(log.borrow().len() as i64),
        }
    })
}

fn delayed(event_loop: &LocalLoop, delay: usize, value: i64) -> Promise<i64, Error> {
    let (promise, resolver) = Promise::new();
    event_loop.after(
        delay,
        Box::new(move || {
            resolver.resolve(value);
        }),
    );
    promise
}

proptest! {
    /// Property: fed-back values follow yield order, whatever order the awaited values settle in
    #[test]
    fn awaited_values_arrive_in_yield_order(
        entries in prop::collection::vec((any::<i64>(), 0usize..8), 0..12)
    ) {
        let event_loop = LocalLoop::new();
        let driver = Driver::new(event_loop.clone());
        let log = Rc::new(RefCell::new(Vec::new()));

        let steps = entries
            .iter()
            .map(|&(value, delay)| Yield::from(delayed(&event_loop, delay, value)))
            .collect();
        let promise = driver.to_promise(recording(steps, Rc::clone(&log)));
        event_loop.run();

        let expected: Vec<_> = entries.iter().map(|&(value, _)| Ok(value)).collect();
        prop_assert_eq!(&*log.borrow(), &expected);
        prop_assert_eq!(promise.settled(), Some(Ok(entries.len() as i64)));
    }

    /// Property: plain values come back unchanged
    #[test]
    fn plain_values_pass_through(values in prop::collection::vec(any::<i64>(), 0..16)) {
        let event_loop = LocalLoop::new();
        let driver = Driver::new(event_loop.clone());
        let log = Rc::new(RefCell::new(Vec::new()));

        let steps = values.iter().copied().map(Yield::value).collect();
        let promise = driver.to_promise(recording(steps, Rc::clone(&log)));
        event_loop.run();

        let expected: Vec<_> = values.iter().copied().map(Ok).collect();
        prop_assert_eq!(&*log.borrow(), &expected);
        prop_assert_eq!(promise.settled(), Some(Ok(values.len() as i64)));
    }

    /// Property: a thunk behaves exactly like the value it produces
    #[test]
    fn thunked_values_pass_through(values in prop::collection::vec(any::<i64>(), 1..8)) {
        let event_loop = LocalLoop::new();
        let driver = Driver::new(event_loop.clone());
        let log = Rc::new(RefCell::new(Vec::new()));

        let steps = values
            .iter()
            .map(|&value| Yield::thunk(move || Yield::thunk(move || Yield::value(value))))
            .collect();
        let _ = driver.to_promise(recording(steps, Rc::clone(&log)));
        event_loop.run();

        let expected: Vec<_> = values.iter().copied().map(Ok).collect();
        prop_assert_eq!(&*log.borrow(), &expected);
    }
}
