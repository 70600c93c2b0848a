// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Tests for RSA operations.

mod key_tests;
mod keygen_tests;

use std::sync::OnceLock;

use super::*;

/// Returns a generated key of `bits` bits, shared across tests.
pub(crate) fn test_key(bits: usize) -> &'static RsaPrivateKey {
    static KEY_2048: OnceLock<RsaPrivateKey> = OnceLock::new();
    static KEY_3072: OnceLock<RsaPrivateKey> = OnceLock::new();

    let cell = match bits {
        2048 => &KEY_2048,
        3072 => &KEY_3072,
        _ => panic!("no shared test key of {bits} bits"),
    };
    cell.get_or_init(|| {
        crate::test_support::init_tracing();
        generate_key_rsa(bits).expect("key generation should succeed")
    })
}

/// Digest of `data` with `algorithm`.
pub(crate) fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    let mut digest = Digest::new(algorithm).expect("digest should be created");
    digest.write(data).expect("write should succeed");
    digest.sum_vec().expect("sum should succeed")
}
