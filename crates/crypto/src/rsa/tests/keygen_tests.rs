// Copyright (C) Microsoft Corporation. All rights reserved.

use num_bigint::BigUint;

use super::*;

fn uint(value: &BigInt) -> BigUint {
    BigUint::from_bytes_be(value.as_be_bytes())
}

#[test]
fn test_generated_key_components_are_consistent() {
    for bits in [2048, 3072] {
        let key = test_key(bits);
        assert_eq!(key.bits(), bits);
        assert_eq!(key.size(), bits / 8);
        assert_eq!(key.e(), &BigInt::from(65537u64));

        let one = BigUint::from(1u32);
        let (n, e, d) = (uint(key.n()), uint(key.e()), uint(key.d()));
        let (p, q) = (uint(key.p()), uint(key.q()));
        let (p1, q1) = (&p - &one, &q - &one);

        assert_eq!(&p * &q, n, "n = p * q");
        assert_eq!(uint(key.dp()), &d % &p1, "dp = d mod (p - 1)");
        assert_eq!(uint(key.dq()), &d % &q1, "dq = d mod (q - 1)");
        assert_eq!((uint(key.qinv()) * &q) % &p, one, "qinv * q = 1 mod p");
        assert_eq!((&e * &d) % &p1, one, "e * d = 1 mod (p - 1)");
        assert_eq!((&e * &d) % &q1, one, "e * d = 1 mod (q - 1)");
    }
}

#[test]
fn test_generated_key_fits_its_blob() {
    let key = test_key(2048);
    let blob = KeyBlob::from_private_key(key).expect("blob should build");
    assert_eq!(blob.kind(), BlobKind::FullPrivate);
    assert_eq!(blob.as_bytes().len(), 24 + 3 + 256 * 2 + 128 * 5);

    let parsed = KeyBlob::from_bytes(blob.as_bytes().to_vec()).expect("blob should parse");
    assert_eq!(&parsed.to_private_key().unwrap(), key);
}

#[test]
fn test_generate_smallest_key() {
    let key = generate_key_rsa(RSA_MIN_KEY_BITS).expect("key generation should succeed");
    assert_eq!(key.bits(), RSA_MIN_KEY_BITS);
}

#[test]
fn test_generate_rejects_unsupported_sizes() {
    for bits in [
        0,
        2,
        RSA_MIN_KEY_BITS - RSA_KEY_BITS_STEP,
        2049,
        2048 + 32,
        RSA_MAX_KEY_BITS + RSA_KEY_BITS_STEP,
    ] {
        assert_eq!(
            generate_key_rsa(bits),
            Err(CryptoError::InvalidKeySize),
            "{bits} bits"
        );
    }
}

#[test]
fn test_private_key_debug_is_redacted() {
    let key = test_key(2048);
    let debug = format!("{key:?}");
    assert!(debug.contains("2048"));
    assert!(!debug.contains(&hex::encode(key.d().as_be_bytes())));
    assert!(!debug.contains("d:"));
}
