//! The exception currently being handled on this thread

use crate::exception::Exception;
use std::cell::RefCell;

thread_local! {
    static HANDLING: RefCell<Vec<Exception>> = const { RefCell::new(Vec::new()) };
}

/// Run `f` with `exception` as the one currently being handled.
///
/// Exceptions built inside `f` take it as their implicit context, and
/// [`current_exception`] returns it. Calls nest; the previous exception is
/// restored when `f` returns or unwinds.
pub fn handling<T>(exception: &Exception, f: impl FnOnce() -> T) -> T {
    let _guard = HandlingGuard::enter(exception.clone());
    f()
}

/// The innermost exception being handled on this thread, if any
#[must_use]
pub fn current_exception() -> Option<Exception> {
    HANDLING.with(|handling| handling.borrow().last().cloned())
}

struct HandlingGuard;

impl HandlingGuard {
    fn enter(exception: Exception) -> Self {
        HANDLING.with(|handling| handling.borrow_mut().push(exception));
        Self
    }
}

impl Drop for HandlingGuard {
    fn drop(&mut self) {
        HANDLING.with(|handling| {
            handling.borrow_mut().pop();
        });
    }
}
