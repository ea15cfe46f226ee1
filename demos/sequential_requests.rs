//! Three simulated requests awaited one after another by a single computation.
//!
//! Run with `RUST_LOG=yielder=trace` to watch the driver step through it.

use std::collections::VecDeque;

use tracing::info;
use tracing_subscriber::EnvFilter;
use yielder::prelude::*;

/// Pretends to fetch `path`, answering after `latency` loop trips.
fn request(event_loop: &LocalLoop, path: &'static str, latency: usize) -> Promise<String, Error> {
    let (response, resolver) = Promise::new();
    event_loop.after(
        latency,
        Box::new(move || {
            info!(path, "response ready");
            resolver.resolve(format!("<{path}>"));
        }),
    );
    response
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let event_loop = LocalLoop::new();
    let driver = Driver::new(event_loop.clone());

    // the slowest request is issued first; responses still come back in order
    let mut requests = VecDeque::from([
        request(&event_loop, "/users", 6),
        request(&event_loop, "/orders", 2),
        request(&event_loop, "/invoices", 0),
    ]);
    let mut bodies = Vec::new();

    let page = driver.to_promise(from_fn(move |input: Option<Result<String, Error>>| {
        match input {
            Some(Ok(body)) => bodies.push(body),
            Some(Err(e)) => return Step::Failed(e),
            None => {}
        }
        match requests.pop_front() {
            Some(next) => Step::Yielded(next.into()),
            None => Step::Done(bodies.join(" ")),
        }
    }));

    event_loop.run();

    match page.settled() {
        Some(Ok(page)) => info!(%page, ticks = event_loop.ticks(), "rendered"),
        Some(Err(e)) => info!(error = %e, "failed"),
        None => info!("still pending"),
    }
}
