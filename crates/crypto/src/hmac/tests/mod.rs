// Copyright (C) Microsoft Corporation. All rights reserved.

mod hmac_kat_tests;

use super::*;

pub(crate) const HMAC_HASHES: [HashAlgorithm; 5] = [
    HashAlgorithm::Md5,
    HashAlgorithm::Sha1,
    HashAlgorithm::Sha256,
    HashAlgorithm::Sha384,
    HashAlgorithm::Sha512,
];

/// MAC of `data` under `key` computed with a single write.
pub(crate) fn one_shot(algorithm: HashAlgorithm, key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut hmac = Hmac::new(algorithm, key).expect("hmac should be created");
    hmac.write(data).expect("write should succeed");
    hmac.sum_vec().expect("sum should succeed")
}
