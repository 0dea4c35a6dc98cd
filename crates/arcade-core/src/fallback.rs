//! Ordered fallback chains
//!
//! Some resources can be found in several places (an explicit path, a
//! platform directory, the working directory).
//! Each way is a [`Strategy`]: tried in order, independently failable, and
//! the first success short-circuits the rest.

use crate::Result;

/// A named, fallible way to acquire a `T`.
pub struct Strategy<'a, T> {
    pub name: &'a str,
    attempt: Box<dyn FnOnce() -> Result<T> + 'a>,
}

impl<'a, T> Strategy<'a, T> {
    pub fn new(name: &'a str, attempt: impl FnOnce() -> Result<T> + 'a) -> Self {
        Self {
            name,
            attempt: Box::new(attempt),
        }
    }
}

/// Run strategies in order and return the first success.
///
/// Failures are logged at `debug` and otherwise discarded. Returns `None`
/// when every strategy failed (or the chain was empty).
pub fn first_success<'a, T>(strategies: impl IntoIterator<Item = Strategy<'a, T>>) -> Option<T> {
    for strategy in strategies {
        match (strategy.attempt)() {
            Ok(value) => {
                log::debug!("fallback: '{}' succeeded", strategy.name);
                return Some(value);
            }
            Err(e) => log::debug!("fallback: '{}' failed: {e}", strategy.name),
        }
    }
    None
}
