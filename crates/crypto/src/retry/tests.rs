// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::*;

fn transient() -> CryptoError {
    CryptoError::ProviderOperationFailed(ProviderStatus::from_raw(1))
}

fn always(_: &CryptoError) -> bool {
    true
}

fn only_provider_failures(err: &CryptoError) -> bool {
    matches!(err, CryptoError::ProviderOperationFailed(_))
}

#[test]
fn test_first_success_is_not_retried() {
    let mut calls = 0;
    let result = execute_with_backoff(
        || {
            calls += 1;
            Ok::<_, CryptoError>(7)
        },
        always,
        2,
        0,
    );
    assert_eq!(result, Ok(7));
    assert_eq!(calls, 1);
}

#[test]
fn test_succeeds_after_retryable_failures() {
    crate::test_support::init_tracing();

    let mut calls = 0;
    let result = execute_with_backoff(
        || {
            calls += 1;
            if calls < 3 {
                Err(transient())
            } else {
                Ok(calls)
            }
        },
        only_provider_failures,
        2,
        0,
    );
    assert_eq!(result, Ok(3));
}

#[test]
fn test_stops_on_unmatched_error() {
    let mut calls = 0;
    let result: Result<(), _> = execute_with_backoff(
        || {
            calls += 1;
            Err(CryptoError::InvalidKeySize)
        },
        only_provider_failures,
        2,
        0,
    );
    assert_eq!(result, Err(CryptoError::InvalidKeySize));
    assert_eq!(calls, 1);
}

#[test]
fn test_gives_up_after_max_retries() {
    let mut calls = 0;
    let result: Result<(), _> = execute_with_backoff(
        || {
            calls += 1;
            Err(transient())
        },
        always,
        2,
        0,
    );
    assert_eq!(result, Err(transient()));
    assert_eq!(calls, 3);
}

#[test]
fn test_zero_retries_runs_once() {
    let mut calls = 0;
    let result: Result<(), _> = execute_with_backoff(
        || {
            calls += 1;
            Err(transient())
        },
        always,
        0,
        0,
    );
    assert!(result.is_err());
    assert_eq!(calls, 1);
}
