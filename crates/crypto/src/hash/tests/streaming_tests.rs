// Copyright (C) Microsoft Corporation. All rights reserved.

use std::io::Write;

use proptest::prelude::*;

use super::*;

#[test]
fn test_sum_is_idempotent_and_non_mutating() {
    crate::test_support::init_tracing();

    for algorithm in ALL_HASHES {
        let hello = one_shot(algorithm, b"hello");
        let hello_world = one_shot(algorithm, b"hello world");

        let mut digest = Digest::new(algorithm).expect("digest should be created");
        digest.write(b"hello").expect("write");
        assert_eq!(digest.sum_vec().expect("1st sum"), hello, "{algorithm}");
        assert_eq!(digest.sum_vec().expect("2nd sum"), hello, "{algorithm}");

        digest.write(b" world").expect("write");
        assert_eq!(digest.sum_vec().expect("1st sum"), hello_world, "{algorithm}");
        assert_eq!(digest.sum_vec().expect("2nd sum"), hello_world, "{algorithm}");
    }
}

#[test]
fn test_reset_restores_initial_state() {
    for algorithm in ALL_HASHES {
        let mut digest = Digest::new(algorithm).expect("digest should be created");
        digest.write(b"hello").expect("write");
        let before = digest.sum_vec().expect("sum");

        digest.write(b" world").expect("write");
        digest.reset().expect("reset");
        assert_eq!(digest.bytes_written(), 0);

        digest.write(b"hello").expect("write");
        assert_eq!(digest.sum_vec().expect("sum"), before, "{algorithm}");
    }
}

#[test]
fn test_bytes_written_tracks_input() {
    let mut digest = Digest::new(HashAlgorithm::Sha1).expect("digest should be created");
    assert_eq!(digest.write(b"abc").expect("write"), 3);
    assert_eq!(digest.write(b"").expect("write"), 0);
    assert_eq!(digest.write(&[0u8; 200]).expect("write"), 200);
    assert_eq!(digest.bytes_written(), 203);
}

#[test]
fn test_sum_into_short_buffer() {
    let digest = Digest::new(HashAlgorithm::Sha512).expect("digest should be created");
    let mut out = [0u8; 63];
    assert_eq!(
        digest.sum(Some(&mut out)),
        Err(CryptoError::BufferTooSmall)
    );
}

#[test]
fn test_sum_into_long_buffer_fills_prefix() {
    let digest = Digest::new(HashAlgorithm::Sha256).expect("digest should be created");
    let mut out = [0xaau8; 40];
    assert_eq!(digest.sum(Some(&mut out)).expect("sum"), 32);
    assert_eq!(out[..32], one_shot(HashAlgorithm::Sha256, b"")[..]);
    assert_eq!(out[32..], [0xaa; 8]);
}

#[test]
fn test_io_writer_adapter() {
    let mut digest = Digest::new(HashAlgorithm::Sha256).expect("digest should be created");
    std::io::copy(&mut &b"streamed through io::copy"[..], &mut digest.writer())
        .expect("copy should succeed");
    write!(digest.writer(), "!").expect("write! should succeed");
    assert_eq!(
        digest.sum_vec().expect("sum"),
        one_shot(HashAlgorithm::Sha256, b"streamed through io::copy!")
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_split_writes_match_single_write(
        data in proptest::collection::vec(any::<u8>(), 0..512),
        split in any::<proptest::sample::Index>(),
        which in 0usize..5,
    ) {
        let algorithm = ALL_HASHES[which];
        let at = split.index(data.len() + 1);

        let mut digest = Digest::new(algorithm).expect("digest should be created");
        digest.write(&data[..at]).expect("write");
        digest.write(&data[at..]).expect("write");

        prop_assert_eq!(digest.sum_vec().expect("sum"), one_shot(algorithm, &data));
    }
}
