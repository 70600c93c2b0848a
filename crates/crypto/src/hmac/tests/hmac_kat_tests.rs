// Copyright (C) Microsoft Corporation. All rights reserved.

use super::*;

const JEFE_KEY: &[u8] = b"Jefe";
const JEFE_DATA: &[u8] = b"what do ya want for nothing?";

/// RFC 2202 / RFC 4231 "Jefe" test case.
const JEFE_MACS: [(HashAlgorithm, &str); 5] = [
    (HashAlgorithm::Md5, "750c783e6ab0b503eaa86e310a5db738"),
    (HashAlgorithm::Sha1, "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"),
    (
        HashAlgorithm::Sha256,
        "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843",
    ),
    (
        HashAlgorithm::Sha384,
        "af45d2e376484031617f78d2b58a6b1b9c7ef464f5a01b47e42ec3736322445e\
         8e2240ca5e69e2c78b3239ecfab21649",
    ),
    (
        HashAlgorithm::Sha512,
        "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
         9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737",
    ),
];

#[test]
fn test_hmac_jefe_known_answers() {
    for (algorithm, expected) in JEFE_MACS {
        let expected = hex::decode(expected).expect("valid hex");
        assert_eq!(one_shot(algorithm, JEFE_KEY, JEFE_DATA), expected, "{algorithm}");
    }
}

#[test]
fn test_hmac_sha256_rfc4231_case1() {
    let key = [0x0bu8; 20];
    assert_eq!(
        hex::encode(one_shot(HashAlgorithm::Sha256, &key, b"Hi There")),
        "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
    );
}

#[test]
fn test_hmac_empty_key_and_message() {
    let hmac = Hmac::new(HashAlgorithm::Sha256, &[]).expect("empty key is allowed");
    assert_eq!(
        hex::encode(hmac.sum_vec().expect("sum")),
        "b613679a0814d9ec772f95d778c35fc5ff1697c493715653c6c712144292c5ad"
    );
}

#[test]
fn test_hmac_long_key_is_hashed() {
    // Keys longer than the block size are replaced by their digest.
    let long_key = [0xaau8; 131];
    let mut digest = Digest::new(HashAlgorithm::Sha256).expect("digest should be created");
    digest.write(&long_key).expect("write");
    let hashed_key = digest.sum_vec().expect("sum");
    assert_eq!(
        one_shot(HashAlgorithm::Sha256, &long_key, b"msg"),
        one_shot(HashAlgorithm::Sha256, &hashed_key, b"msg")
    );
}

#[test]
fn test_hmac_sizes() {
    for algorithm in HMAC_HASHES {
        let hmac = Hmac::new(algorithm, b"key").expect("hmac should be created");
        assert_eq!(hmac.size(), algorithm.size());
        assert_eq!(hmac.block_size(), algorithm.block_size());
        assert_eq!(hmac.algorithm(), algorithm);
    }
}
