// Copyright (C) Microsoft Corporation. All rights reserved.

use super::*;

#[test]
fn test_public_key_from_components() {
    let key = test_key(2048);
    let public =
        new_public_key_rsa(key.n().as_be_bytes(), key.e().as_be_bytes()).expect("valid key");
    assert_eq!(public, key.public_key());
    assert_eq!(public.size(), 256);
    assert_eq!(public.bits(), 2048);
}

#[test]
fn test_public_key_ignores_leading_zeros() {
    let key = test_key(2048);
    let mut n = vec![0, 0];
    n.extend_from_slice(key.n().as_be_bytes());
    let public = new_public_key_rsa(&n, &[0, 1, 0, 1]).expect("valid key");
    assert_eq!(public, key.public_key());
}

#[test]
fn test_public_key_rejects_bad_exponent() {
    let n = test_key(2048).n().as_be_bytes();
    let exponents: [&[u8]; 4] = [&[], &[1], &[2], &[1, 0, 0]];
    for e in exponents {
        assert_eq!(
            new_public_key_rsa(n, e),
            Err(CryptoError::InvalidPublicExponent),
            "e = {e:?}"
        );
    }
    // e must be below n.
    let mut too_large = vec![0xff; n.len() + 1];
    too_large[0] = 1;
    assert_eq!(
        new_public_key_rsa(n, &too_large),
        Err(CryptoError::InvalidPublicExponent)
    );
}

#[test]
fn test_public_key_rejects_bad_modulus_size() {
    let small = [0xc5; 32];
    assert_eq!(
        new_public_key_rsa(&small, &[3]),
        Err(CryptoError::InvalidKeySize)
    );

    let large = vec![0xc5; RSA_MAX_KEY_BITS / 8 + 1];
    assert_eq!(
        new_public_key_rsa(&large, &[3]),
        Err(CryptoError::InvalidKeySize)
    );
}

#[test]
fn test_private_key_from_components() {
    let key = test_key(2048);
    let rebuilt = new_private_key_rsa(
        key.n().as_be_bytes(),
        key.e().as_be_bytes(),
        key.d().as_be_bytes(),
        key.p().as_be_bytes(),
        key.q().as_be_bytes(),
        key.dp().as_be_bytes(),
        key.dq().as_be_bytes(),
        key.qinv().as_be_bytes(),
    )
    .expect("valid key");
    assert_eq!(&rebuilt, key);

    let ciphertext = encrypt_rsa_pkcs1(&key.public_key(), b"hi!").unwrap();
    assert_eq!(decrypt_rsa_pkcs1(&rebuilt, &ciphertext).unwrap(), b"hi!");
}

#[test]
fn test_private_key_rejects_oversized_fields() {
    let key = test_key(2048);
    let wide_prime = vec![0xff; 129];
    let wide_d = vec![0xff; 257];

    let build = |p: &[u8], d: &[u8]| {
        new_private_key_rsa(
            key.n().as_be_bytes(),
            key.e().as_be_bytes(),
            d,
            p,
            key.q().as_be_bytes(),
            key.dp().as_be_bytes(),
            key.dq().as_be_bytes(),
            key.qinv().as_be_bytes(),
        )
    };
    assert_eq!(
        build(&wide_prime, key.d().as_be_bytes()),
        Err(CryptoError::EncodingOverflow)
    );
    assert_eq!(
        build(key.p().as_be_bytes(), &wide_d),
        Err(CryptoError::EncodingOverflow)
    );
    assert_eq!(
        build(key.p().as_be_bytes(), &[0, 0]),
        Err(CryptoError::EncodingOverflow)
    );
}

#[test]
fn test_public_key_of_private_key_matches() {
    let key = test_key(3072);
    let public = key.public_key();
    assert_eq!(public.n(), key.n());
    assert_eq!(public.e(), key.e());
    assert_eq!(public.size(), key.size());
}
