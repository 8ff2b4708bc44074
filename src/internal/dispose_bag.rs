//! Internal bag of release hooks with LIFO execution order.

use std::panic::{catch_unwind, AssertUnwindSafe};

/// Container for release hooks, drained in LIFO order.
///
/// Each hook runs exactly once. A panicking hook does not stop the drain;
/// its payload is captured and reported so disposal is observably complete
/// even when individual hooks misbehave.
#[derive(Default)]
pub(crate) struct DisposeBag {
    hooks: Vec<Box<dyn FnOnce() + Send>>,
}

impl DisposeBag {
    /// Adds a release hook.
    pub(crate) fn push(&mut self, f: Box<dyn FnOnce() + Send>) {
        self.hooks.push(f);
    }

    /// Runs every hook in reverse order, returning the panic messages of
    /// hooks that raised. An empty vec means clean disposal.
    pub(crate) fn drain_reverse(&mut self) -> Vec<String> {
        let mut failures = Vec::new();
        while let Some(f) = self.hooks.pop() {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
                failures.push(panic_message(payload));
            }
        }
        failures
    }

    /// Whether any hooks are still registered.
    pub(crate) fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "release hook panicked".to_string()
    }
}
