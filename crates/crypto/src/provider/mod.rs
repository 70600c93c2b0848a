// Copyright (C) Microsoft Corporation. All rights reserved.

//! Process-wide cache of native algorithm provider handles.
//!
//! Opening an algorithm provider is expensive on every engine this crate
//! supports, and the resulting handle is immutable once open. The registry
//! therefore opens each provider lazily on first use and keeps it for the
//! life of the process. Each acquisition bumps a reference count that is
//! dropped again by the returned [`ProviderHandle`] guard, and
//! [`ProviderRegistry::purge`] only ever closes entries nobody holds.
//!
//! Per-operation native objects (hash objects, key objects) are not cached
//! here; their owners create and destroy them within a single call.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use parking_lot::Mutex;

use super::*;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod provider_ossl;
        pub(crate) use provider_ossl::OsslAlgorithm;
    } else if #[cfg(target_os = "windows")] {
        mod provider_cng;
        pub(crate) use provider_cng::CngAlgHandle;
    } else {
        compile_error!("Unsupported target OS for native algorithm providers");
    }
}

define_type!(pub NativeProviders, provider_ossl::OsslProviders, provider_cng::CngProviders);

/// Handle guard type returned by the process-wide registry.
pub type NativeProviderHandle = ProviderHandle<'static, NativeProviders>;

/// Identifies one native algorithm provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmId {
    /// Plain message digest.
    Digest(HashAlgorithm),
    /// Keyed digest (HMAC) over the given hash.
    Hmac(HashAlgorithm),
    /// RSA public-key operations.
    Rsa,
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmId::Digest(hash) => write!(f, "{hash}"),
            AlgorithmId::Hmac(hash) => write!(f, "hmac-{hash}"),
            AlgorithmId::Rsa => f.write_str("rsa"),
        }
    }
}

/// Native side of the registry: how to open and close one provider.
pub trait ProviderBackend: Send + Sync + 'static {
    /// Raw handle to an open provider. Must be safe to share across threads.
    type Handle: Copy + Send + Sync;

    /// Opens the provider for `id`.
    fn open(&self, id: AlgorithmId) -> Result<Self::Handle, CryptoError>;

    /// Closes a handle previously returned by [`ProviderBackend::open`].
    fn close(&self, id: AlgorithmId, handle: Self::Handle);
}

struct CachedProvider<H> {
    handle: H,
    refs: usize,
}

/// Lazily populated, reference-counted cache of provider handles.
pub struct ProviderRegistry<B: ProviderBackend> {
    backend: B,
    entries: Mutex<HashMap<AlgorithmId, CachedProvider<B::Handle>>>,
}

impl<B: ProviderBackend> ProviderRegistry<B> {
    /// Creates an empty registry over `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the provider for `id`, opening it on first use.
    ///
    /// The returned guard keeps the provider alive until it is dropped.
    ///
    /// # Errors
    ///
    /// Whatever the backend reports when opening fails. A failed open leaves
    /// nothing cached, so a later call tries again.
    pub fn acquire(&self, id: AlgorithmId) -> Result<ProviderHandle<'_, B>, CryptoError> {
        let mut entries = self.entries.lock();
        let cached = match entries.entry(id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let handle = self.backend.open(id)?;
                tracing::debug!(algorithm = %id, "opened algorithm provider");
                entry.insert(CachedProvider { handle, refs: 0 })
            }
        };
        cached.refs += 1;
        Ok(ProviderHandle {
            registry: self,
            id,
            handle: cached.handle,
        })
    }

    /// Number of outstanding guards for `id`, or `None` if it is not open.
    pub fn ref_count(&self, id: AlgorithmId) -> Option<usize> {
        self.entries.lock().get(&id).map(|cached| cached.refs)
    }

    /// Closes every cached provider that no guard currently holds.
    ///
    /// Returns the number of providers closed.
    pub fn purge(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|id, cached| {
            if cached.refs > 0 {
                return true;
            }
            self.backend.close(*id, cached.handle);
            tracing::debug!(algorithm = %id, "closed algorithm provider");
            false
        });
        before - entries.len()
    }

    fn release(&self, id: AlgorithmId) {
        if let Some(cached) = self.entries.lock().get_mut(&id) {
            cached.refs = cached.refs.saturating_sub(1);
        }
    }
}

impl<B: ProviderBackend> Drop for ProviderRegistry<B> {
    fn drop(&mut self) {
        // Guards borrow the registry, so none can be outstanding here.
        for (id, cached) in self.entries.get_mut().drain() {
            self.backend.close(id, cached.handle);
        }
    }
}

/// Scoped reference to a cached provider handle.
pub struct ProviderHandle<'a, B: ProviderBackend> {
    registry: &'a ProviderRegistry<B>,
    id: AlgorithmId,
    handle: B::Handle,
}

impl<B: ProviderBackend> ProviderHandle<'_, B> {
    /// Algorithm this handle refers to.
    pub fn id(&self) -> AlgorithmId {
        self.id
    }

    /// Raw backend handle.
    pub fn raw(&self) -> B::Handle {
        self.handle
    }
}

impl<B: ProviderBackend> Drop for ProviderHandle<'_, B> {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

/// Returns the process-wide registry of native providers.
pub fn provider_registry() -> &'static ProviderRegistry<NativeProviders> {
    static REGISTRY: OnceLock<ProviderRegistry<NativeProviders>> = OnceLock::new();
    REGISTRY.get_or_init(|| ProviderRegistry::new(NativeProviders::default()))
}

#[cfg(test)]
mod tests;
