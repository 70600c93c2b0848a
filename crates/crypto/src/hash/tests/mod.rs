// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod streaming_tests;

use super::*;

pub(crate) const ALL_HASHES: [HashAlgorithm; 5] = [
    HashAlgorithm::Md5,
    HashAlgorithm::Sha1,
    HashAlgorithm::Sha256,
    HashAlgorithm::Sha384,
    HashAlgorithm::Sha512,
];

/// Digest of `data` computed with a single write.
pub(crate) fn one_shot(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    let mut digest = Digest::new(algorithm).expect("digest should be created");
    digest.write(data).expect("write should succeed");
    digest.sum_vec().expect("sum should succeed")
}
