// Copyright (C) Microsoft Corporation. All rights reserved.

use super::*;

#[test]
fn test_decrypt_failures_are_uniform() {
    crate::test_support::init_tracing();

    let a = translate(NativeOp::Decrypt, ProviderStatus::from_raw(0xC000_003E));
    let b = translate(NativeOp::Decrypt, ProviderStatus::from_raw(0xC000_000D));
    assert_eq!(a, CryptoError::DecryptionFailed);
    assert_eq!(a, b);
}

#[test]
fn test_verify_failure_is_distinct() {
    let err = translate(NativeOp::Verify, ProviderStatus::from_raw(0xC000_A000));
    assert_eq!(err, CryptoError::SignatureVerificationFailed);
}

#[test]
fn test_other_failures_keep_status() {
    for op in [
        NativeOp::OpenProvider,
        NativeOp::CreateHash,
        NativeOp::GenerateKey,
        NativeOp::ImportKey,
        NativeOp::Encrypt,
        NativeOp::Sign,
    ] {
        let status = ProviderStatus::from_raw(0x1234);
        assert_eq!(
            translate(op, status),
            CryptoError::ProviderOperationFailed(status)
        );
    }
}

#[test]
fn test_status_display() {
    assert_eq!(
        ProviderStatus::from_raw(0xC000_009A).to_string(),
        "0xc000009a"
    );
    assert_eq!(ProviderStatus::UNSPECIFIED.to_string(), "0x00000000");
}

#[test]
fn test_only_provider_failures_can_be_transient() {
    assert!(!CryptoError::DecryptionFailed.is_transient());
    assert!(!CryptoError::InvalidKeySize.is_transient());
    assert!(!CryptoError::ProviderOperationFailed(ProviderStatus::UNSPECIFIED).is_transient());
}

#[cfg(target_os = "windows")]
#[test]
fn test_resource_exhaustion_is_transient() {
    let status = ProviderStatus::from_raw(0xC000_009A);
    assert!(status.is_transient());
    assert!(CryptoError::ProviderOperationFailed(status).is_transient());
}

#[cfg(target_os = "linux")]
#[test]
fn test_empty_openssl_queue_is_unspecified() {
    // Drain anything a previous test left behind.
    let _ = openssl::error::ErrorStack::get();
    assert_eq!(
        ossl_last(NativeOp::Encrypt),
        CryptoError::ProviderOperationFailed(ProviderStatus::UNSPECIFIED)
    );
}
