//! The event loop the driver schedules its steps on.
//!
//! The driver only needs two things from a loop: a way to enqueue a callback for
//! a later iteration, and a way to run until nothing is left. [`EventLoop`]
//! names exactly that. [`LocalLoop`] is a deterministic FIFO implementation that
//! can also be stepped by hand, one task at a time.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    fmt,
    rc::Rc,
};

/// A unit of scheduled work.
pub type Task = Box<dyn FnOnce() + 'static>;

/// Single-threaded task queue.
pub trait EventLoop {
    /// Enqueue `task` to run on a future iteration, never inside this call.
    fn future_tick(&self, task: Task);

    /// Run scheduled work until the queue is empty.
    fn run(&self);
}

/// FIFO event loop over a shared queue.
///
/// Clones are handles to the same queue, so a clone can be moved into tasks
/// that schedule follow-up work.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
/// use yielder::{EventLoop, LocalLoop};
///
/// let event_loop = LocalLoop::new();
/// let order = Rc::new(RefCell::new(Vec::new()));
///
/// for n in 1..=3 {
///     let order = Rc::clone(&order);
///     event_loop.future_tick(Box::new(move || order.borrow_mut().push(n)));
/// }
/// event_loop.run();
///
/// assert_eq!(*order.borrow(), vec![1, 2, 3]);
/// ```
#[derive(Clone, Default)]
pub struct LocalLoop {
    queue: Rc<RefCell<VecDeque<Task>>>,
    ticks: Rc<Cell<u64>>,
}

impl LocalLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the oldest scheduled task, if any.
    ///
    /// Returns `false` when the queue was empty.
    pub fn run_once(&self) -> bool {
        // the queue borrow must end before the task runs; tasks schedule more tasks
        let task = self.queue.borrow_mut().pop_front();
        match task {
            Some(task) => {
                self.ticks.set(self.ticks.get() + 1);
                task();
                true
            }
            None => false,
        }
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Number of tasks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.get()
    }

    /// Run `task` after `delay` further trips through the queue.
    ///
    /// Each trip re-enqueues at the back, so work scheduled meanwhile gets to
    /// run first. A `delay` of zero behaves like [`future_tick`](EventLoop::future_tick).
    pub fn after(&self, delay: usize, task: Task) {
        if delay == 0 {
            self.future_tick(task);
            return;
        }
        let this = self.clone();
        self.future_tick(Box::new(move || this.after(delay - 1, task)));
    }
}

impl EventLoop for LocalLoop {
    fn future_tick(&self, task: Task) {
        self.queue.borrow_mut().push_back(task);
    }

    fn run(&self) {
        while self.run_once() {}
    }
}

impl fmt::Debug for LocalLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalLoop")
            .field("pending", &self.pending())
            .field("ticks", &self.ticks())
            .finish()
    }
}
