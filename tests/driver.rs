use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use either::Either;
use yielder::prelude::*;
use yielder::Thenable;

type Input<T> = Option<Result<T, Error>>;
type Log<T> = Rc<RefCell<Vec<Result<T, Error>>>>;

/// Yields each of `steps` in turn, recording what it is resumed with, and
/// returns the last value it received. An `Err` is re-raised as a failure.
fn script<T>(steps: Vec<Yield<T, Error>>, log: Log<T>) -> impl Coroutine<T, Error>
where
    T: Clone + Default + 'static,
{
    let mut steps = VecDeque::from(steps);
    let mut last = T::default();
    from_fn(move |input: Input<T>| {
        if let Some(input) = input {
            log.borrow_mut().push(input.clone());
            match input {
                Ok(value) => last = value,
                Err(e) => return Step::Failed(e),
            }
        }
        match steps.pop_front() {
            Some(next) => Step::Yielded(next),
            None => Step::Done(last.clone()),
        }
    })
}

fn new_log<T>() -> Log<T> {
    Rc::new(RefCell::new(Vec::new()))
}

fn setup() -> (LocalLoop, Driver<LocalLoop>) {
    let event_loop = LocalLoop::new();
    let driver = Driver::new(event_loop.clone());
    (event_loop, driver)
}

/// A promise the loop settles after `delay` trips.
fn later<T>(event_loop: &LocalLoop, delay: usize, result: Result<T, Error>) -> Promise<T, Error>
where
    T: Clone + 'static,
{
    let (promise, resolver) = Promise::new();
    event_loop.after(
        delay,
        Box::new(move || {
            resolver.settle(result);
        }),
    );
    promise
}

#[test]
fn test_immediate_return_fulfills() {
    let (event_loop, driver) = setup();

    let promise: Promise<u32, Error> = driver.to_promise(ready(42));
    event_loop.run();

    assert_eq!(promise.settled(), Some(Ok(42)));
}

#[test]
fn test_never_settles_synchronously() {
    let (event_loop, driver) = setup();

    let promise: Promise<u32, Error> = driver.to_promise(ready(42));
    assert!(promise.is_pending());

    assert!(event_loop.run_once());
    assert_eq!(promise.settled(), Some(Ok(42)));
}

#[test]
fn test_prefulfilled_awaitable_value_is_returned() {
    let (event_loop, driver) = setup();
    let log = new_log::<String>();

    let steps = vec![Yield::from(Promise::fulfilled("a".to_string()))];
    let promise = driver.to_promise(script(steps, Rc::clone(&log)));
    event_loop.run();

    assert_eq!(promise.settled(), Some(Ok("a".to_string())));
    assert_eq!(&*log.borrow(), &[Ok("a".to_string())]);
}

#[test]
fn test_unhandled_rejection_rejects_outer_promise() {
    let (event_loop, driver) = setup();
    let log = new_log::<String>();

    let failing = later(&event_loop, 2, Err(Error::Rejected("boom".into())));
    let steps = vec![Yield::from(failing), Yield::value("unreachable".to_string())];
    let promise = driver.to_promise(script(steps, Rc::clone(&log)));
    event_loop.run();

    assert_eq!(promise.settled(), Some(Err(Error::Rejected("boom".into()))));
    // the rejection reason was fed back once, nothing after it
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn test_rejection_is_fed_back_not_raised() {
    let (event_loop, driver) = setup();

    let promise = driver.to_promise(from_fn(|input: Input<String>| match input {
        None => Step::Yielded(Promise::rejected(Error::Rejected("boom".into())).into()),
        Some(Err(Error::Rejected(reason))) => Step::Done(format!("recovered from {reason}")),
        Some(other) => Step::Failed(Error::Rejected(format!("unexpected {other:?}"))),
    }));
    event_loop.run();

    assert_eq!(promise.settled(), Some(Ok("recovered from boom".to_string())));
}

#[test]
fn test_nested_computation_result_is_fed_back() {
    let (event_loop, driver) = setup();
    let inner_log = new_log::<u32>();
    let outer_log = new_log::<u32>();

    let awaited = later(&event_loop, 1, Ok(7));
    let inner = script(vec![Yield::from(awaited)], Rc::clone(&inner_log)).map_done(|n| n + 1);
    let outer = script(vec![Yield::nested(inner)], Rc::clone(&outer_log));
    let promise = driver.to_promise(outer);
    event_loop.run();

    assert_eq!(promise.settled(), Some(Ok(8)));
    assert_eq!(&*inner_log.borrow(), &[Ok(7)]);
    assert_eq!(&*outer_log.borrow(), &[Ok(8)]);
}

#[test]
fn test_nested_failure_arrives_as_rejection_value() {
    let (event_loop, driver) = setup();

    let inner = from_fn(|_: Input<u32>| Step::Failed(Error::Rejected("inner".into())));
    let mut inner = Some(inner);
    let promise = driver.to_promise(from_fn(move |input: Input<u32>| match input {
        None => match inner.take() {
            Some(inner) => Step::Yielded(Yield::nested(inner)),
            None => Step::Failed(Error::Rejected("started twice".into())),
        },
        Some(Err(Error::Rejected(reason))) if reason == "inner" => Step::Done(0),
        Some(other) => Step::Failed(Error::Rejected(format!("unexpected {other:?}"))),
    }));
    event_loop.run();

    assert_eq!(promise.settled(), Some(Ok(0)));
}

#[test]
fn test_thunk_resumes_within_the_same_tick() {
    let (event_loop, driver) = setup();
    let log = new_log::<String>();

    let steps = vec![Yield::thunk(|| Yield::value("x".to_string()))];
    let promise = driver.to_promise(script(steps, Rc::clone(&log)));

    assert!(event_loop.run_once());
    assert_eq!(&*log.borrow(), &[Ok("x".to_string())]);

    event_loop.run();
    assert_eq!(promise.settled(), Some(Ok("x".to_string())));
}

#[test]
fn test_thunk_is_called_once_and_only_when_reached() {
    let (event_loop, driver) = setup();
    let log = new_log::<u32>();
    let calls = Rc::new(Cell::new(0));

    let counter = Rc::clone(&calls);
    let steps = vec![
        Yield::from(later(&event_loop, 3, Ok(1))),
        Yield::thunk(move || {
            counter.set(counter.get() + 1);
            Yield::from(Promise::fulfilled(2))
        }),
    ];
    let promise = driver.to_promise(script(steps, Rc::clone(&log)));

    // run until the first awaitable has been fed back
    loop {
        if !log.borrow().is_empty() {
            break;
        }
        assert!(event_loop.run_once());
    }
    assert_eq!(calls.get(), 0);

    event_loop.run();
    assert_eq!(calls.get(), 1);
    assert_eq!(promise.settled(), Some(Ok(2)));
}

#[test]
fn test_values_are_fed_back_in_yield_order() {
    let (event_loop, driver) = setup();
    let log = new_log::<u32>();

    // settle in reverse of yield order
    let steps = vec![
        Yield::from(later(&event_loop, 6, Ok(1))),
        Yield::from(later(&event_loop, 3, Ok(2))),
        Yield::value(3),
        Yield::from(later(&event_loop, 0, Ok(4))),
    ];
    let promise = driver.to_promise(script(steps, Rc::clone(&log)));
    event_loop.run();

    assert_eq!(&*log.borrow(), &[Ok(1), Ok(2), Ok(3), Ok(4)]);
    assert_eq!(promise.settled(), Some(Ok(4)));
}

#[test]
fn test_failure_stops_resumption() {
    let (event_loop, driver) = setup();
    let resumes = Rc::new(Cell::new(0));

    let count = Rc::clone(&resumes);
    let promise = driver.to_promise(from_fn(move |input: Input<u32>| {
        if input.is_some() {
            count.set(count.get() + 1);
        }
        match count.get() {
            0 | 1 => Step::Yielded(Yield::value(count.get())),
            _ => Step::Failed(Error::Rejected("stop".into())),
        }
    }));
    event_loop.run();

    assert_eq!(promise.settled(), Some(Err(Error::Rejected("stop".into()))));
    assert_eq!(resumes.get(), 2);
    assert_eq!(event_loop.pending(), 0);
}

#[test]
fn test_outer_promise_settles_once() {
    let (event_loop, driver) = setup();
    let notified = Rc::new(Cell::new(0));

    let (awaited, resolver) = Promise::new();
    let second = resolver.clone();
    let steps = vec![Yield::from(awaited)];
    let promise = driver.to_promise(script(steps, new_log::<u32>()));

    let count = Rc::clone(&notified);
    promise.subscribe(move |_| count.set(count.get() + 1));

    event_loop.future_tick(Box::new(move || {
        resolver.resolve(1);
        second.resolve(2);
    }));
    event_loop.run();

    assert_eq!(notified.get(), 1);
    assert_eq!(promise.settled(), Some(Ok(1)));
}

#[test]
fn test_independent_runs_do_not_interfere() {
    let (event_loop, driver) = setup();
    let finished = Rc::new(RefCell::new(Vec::new()));

    let slow = script(vec![Yield::from(later(&event_loop, 8, Ok(10)))], new_log());
    let fast = script(vec![Yield::from(later(&event_loop, 1, Ok(20)))], new_log());

    let first = driver.run(Either::<_, fn() -> Yield<u32, Error>>::Left(slow), false);
    let second = driver.run(Either::<_, fn() -> Yield<u32, Error>>::Left(fast), false);
    for (name, promise) in [("slow", &first), ("fast", &second)] {
        let finished = Rc::clone(&finished);
        promise.subscribe(move |_| finished.borrow_mut().push(name));
    }
    event_loop.run();

    assert_eq!(first.settled(), Some(Ok(10)));
    assert_eq!(second.settled(), Some(Ok(20)));
    assert_eq!(*finished.borrow(), vec!["fast", "slow"]);
}

#[test]
fn test_run_callback_entry_awaits_what_it_returns() {
    let (event_loop, driver) = setup();

    let response = later(&event_loop, 2, Ok("body".to_string()));
    let promise = driver.run_callback(move || Yield::from(response), true);

    assert_eq!(promise.settled(), Some(Ok("body".to_string())));
}

#[test]
fn test_run_callback_entry_with_plain_value() {
    let (_event_loop, driver) = setup();

    let promise = driver.run_callback(|| Yield::<u32, Error>::value(5), true);

    assert_eq!(promise.settled(), Some(Ok(5)));
}

struct TickLater<T> {
    event_loop: LocalLoop,
    value: T,
}

impl<T: 'static> Thenable<T, Error> for TickLater<T> {
    fn on_settle(self: Box<Self>, callback: Box<dyn FnOnce(Result<T, Error>)>) {
        let TickLater { event_loop, value } = *self;
        event_loop.future_tick(Box::new(move || callback(Ok(value))));
    }
}

/// Panics while subscribing, optionally after reporting a value first.
struct FaultyThenable {
    call_back_first: bool,
}

impl Thenable<u32, Error> for FaultyThenable {
    fn on_settle(self: Box<Self>, callback: Box<dyn FnOnce(Result<u32, Error>)>) {
        if self.call_back_first {
            callback(Ok(1));
        }
        panic!("provider bug");
    }
}

#[test]
fn test_panicking_awaitable_rejects_without_unwinding_the_loop() {
    let (event_loop, driver) = setup();
    let resumed = new_log::<u32>();

    let steps = vec![Yield::awaiting(FaultyThenable { call_back_first: false })];
    let promise = driver.to_promise(script(steps, Rc::clone(&resumed)));
    event_loop.run();

    assert_eq!(
        promise.settled(),
        Some(Err(Error::Drive(DriveError::Panicked {
            message: "provider bug".to_string()
        })))
    );
    assert!(resumed.borrow().is_empty());
}

#[test]
fn test_awaitable_panicking_after_callback_settles_once() {
    let (event_loop, driver) = setup();
    let notified = Rc::new(Cell::new(0));

    let steps = vec![Yield::awaiting(FaultyThenable { call_back_first: true })];
    let promise = driver.to_promise(script(steps, new_log()));
    let count = Rc::clone(&notified);
    promise.subscribe(move |_| count.set(count.get() + 1));
    event_loop.run();

    assert_eq!(notified.get(), 1);
    assert!(matches!(
        promise.settled(),
        Some(Err(Error::Drive(DriveError::Panicked { .. })))
    ));
}

#[test]
fn test_any_thenable_can_be_awaited() {
    let (event_loop, driver) = setup();
    let log = new_log::<u32>();

    let steps = vec![Yield::awaiting(TickLater {
        event_loop: event_loop.clone(),
        value: 11,
    })];
    let promise = driver.to_promise(script(steps, Rc::clone(&log)));
    event_loop.run();

    assert_eq!(promise.settled(), Some(Ok(11)));
}

#[test]
fn test_chained_computations_share_one_drive() {
    let (event_loop, driver) = setup();

    let first = script(vec![Yield::from(later(&event_loop, 1, Ok(2_u32)))], new_log());
    let chained = first.and_then(|n: u32| {
        let steps = vec![Yield::from(Promise::fulfilled(n * 10))];
        script(steps, new_log())
    });
    let promise = driver.to_promise(chained);
    event_loop.run();

    assert_eq!(promise.settled(), Some(Ok(20)));
}
