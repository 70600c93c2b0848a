// Copyright (C) Microsoft Corporation. All rights reserved.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::*;

/// Backend that counts native open/close calls.
#[derive(Default, Clone)]
struct CountingBackend {
    opens: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    fail_rsa: bool,
}

impl ProviderBackend for CountingBackend {
    type Handle = usize;

    fn open(&self, id: AlgorithmId) -> Result<usize, CryptoError> {
        if self.fail_rsa && id == AlgorithmId::Rsa {
            return Err(CryptoError::ProviderOperationFailed(
                ProviderStatus::from_raw(0xC000_0001),
            ));
        }
        Ok(self.opens.fetch_add(1, Ordering::SeqCst) + 100)
    }

    fn close(&self, _id: AlgorithmId, _handle: usize) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

const SHA256: AlgorithmId = AlgorithmId::Digest(HashAlgorithm::Sha256);

#[test]
fn test_provider_opened_once() {
    let backend = CountingBackend::default();
    let registry = ProviderRegistry::new(backend.clone());

    let first = registry.acquire(SHA256).expect("open should succeed");
    let second = registry.acquire(SHA256).expect("cached open should succeed");
    assert_eq!(first.raw(), second.raw());
    assert_eq!(first.id(), SHA256);
    assert_eq!(backend.opens.load(Ordering::SeqCst), 1);
    assert_eq!(registry.ref_count(SHA256), Some(2));

    drop(first);
    assert_eq!(registry.ref_count(SHA256), Some(1));
    drop(second);
    assert_eq!(registry.ref_count(SHA256), Some(0));

    // Still cached after the last guard goes away.
    let _third = registry.acquire(SHA256).expect("cached open should succeed");
    assert_eq!(backend.opens.load(Ordering::SeqCst), 1);
}

#[test]
fn test_distinct_algorithms_get_distinct_handles() {
    let registry = ProviderRegistry::new(CountingBackend::default());
    let digest = registry.acquire(SHA256).expect("open should succeed");
    let hmac = registry
        .acquire(AlgorithmId::Hmac(HashAlgorithm::Sha256))
        .expect("open should succeed");
    assert_ne!(digest.raw(), hmac.raw());
}

#[test]
fn test_purge_skips_held_providers() {
    let backend = CountingBackend::default();
    let registry = ProviderRegistry::new(backend.clone());

    let held = registry.acquire(SHA256).expect("open should succeed");
    drop(registry.acquire(AlgorithmId::Rsa).expect("open should succeed"));

    assert_eq!(registry.purge(), 1);
    assert_eq!(backend.closes.load(Ordering::SeqCst), 1);
    assert_eq!(registry.ref_count(AlgorithmId::Rsa), None);
    assert_eq!(registry.ref_count(SHA256), Some(1));

    drop(held);
    assert_eq!(registry.purge(), 1);
    assert_eq!(backend.closes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_failed_open_is_not_cached() {
    let backend = CountingBackend {
        fail_rsa: true,
        ..Default::default()
    };
    let registry = ProviderRegistry::new(backend.clone());

    let result = registry.acquire(AlgorithmId::Rsa);
    assert!(matches!(
        result,
        Err(CryptoError::ProviderOperationFailed(_))
    ));
    assert_eq!(registry.ref_count(AlgorithmId::Rsa), None);
    assert_eq!(backend.opens.load(Ordering::SeqCst), 0);
}

#[test]
fn test_drop_closes_everything() {
    let backend = CountingBackend::default();
    {
        let registry = ProviderRegistry::new(backend.clone());
        drop(registry.acquire(SHA256).expect("open should succeed"));
        drop(registry.acquire(AlgorithmId::Rsa).expect("open should succeed"));
    }
    assert_eq!(backend.closes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_concurrent_acquire_opens_once() {
    let backend = CountingBackend::default();
    let registry = ProviderRegistry::new(backend.clone());

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..100 {
                    let handle = registry.acquire(SHA256).expect("open should succeed");
                    assert_eq!(handle.raw(), 100);
                }
            });
        }
    });

    assert_eq!(backend.opens.load(Ordering::SeqCst), 1);
    assert_eq!(registry.ref_count(SHA256), Some(0));
}

#[test]
fn test_algorithm_id_display() {
    assert_eq!(SHA256.to_string(), "sha256");
    assert_eq!(AlgorithmId::Hmac(HashAlgorithm::Sha1).to_string(), "hmac-sha1");
    assert_eq!(AlgorithmId::Rsa.to_string(), "rsa");
}

#[test]
fn test_process_registry_hands_out_native_handles() {
    let registry = provider_registry();
    let id = AlgorithmId::Digest(HashAlgorithm::Sha384);
    let handle = registry.acquire(id).expect("native provider should open");
    assert!(registry.ref_count(id).is_some_and(|refs| refs >= 1));
    drop(handle);
}
