// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Bounded retry with exponential backoff.
//!
//! The initial call is always made. If it fails and `predicate` matches the
//! error, the call is repeated up to `max_retries` more times, sleeping
//! `backoff_base_ms * 2^attempt` milliseconds in between.

use std::thread;
use std::time::Duration;

use super::*;

/// Base backoff delay in milliseconds used for key generation retries.
pub(crate) const BACKOFF_BASE_MS: u64 = 10;

/// Runs `op` until it succeeds, fails with an error `predicate` rejects, or
/// `max_retries` additional attempts have been used.
pub(crate) fn execute_with_backoff<T>(
    mut op: impl FnMut() -> Result<T, CryptoError>,
    predicate: fn(&CryptoError) -> bool,
    max_retries: u32,
    backoff_base_ms: u64,
) -> Result<T, CryptoError> {
    let mut attempt = 0u32;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_retries && predicate(&err) => {
                let delay = backoff_base_ms.saturating_mul(1u64 << attempt.min(16));
                attempt += 1;
                tracing::debug!(attempt, delay_ms = delay, error = %err, "retrying after transient failure");
                if delay > 0 {
                    thread::sleep(Duration::from_millis(delay));
                }
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests;
