// Copyright (C) Microsoft Corporation. All rights reserved.

//! Windows CNG algorithm providers.

use windows::Win32::Security::Cryptography::*;

use super::*;

/// Open CNG algorithm provider handle.
#[derive(Clone, Copy)]
pub struct CngAlgHandle(BCRYPT_ALG_HANDLE);

impl CngAlgHandle {
    pub(crate) fn handle(&self) -> BCRYPT_ALG_HANDLE {
        self.0
    }
}

// SAFETY: CNG algorithm handles are immutable once opened and may be used
// from any thread concurrently.
#[allow(unsafe_code)]
unsafe impl Send for CngAlgHandle {}

// SAFETY: See the `Send` impl above.
#[allow(unsafe_code)]
unsafe impl Sync for CngAlgHandle {}

/// Provider backend over `BCryptOpenAlgorithmProvider`.
#[derive(Default)]
pub struct CngProviders;

impl ProviderBackend for CngProviders {
    type Handle = CngAlgHandle;

    #[allow(unsafe_code)]
    fn open(&self, id: AlgorithmId) -> Result<Self::Handle, CryptoError> {
        let (algo_id, flags) = match id {
            AlgorithmId::Digest(hash) => (
                hash.cng_algorithm_id(),
                BCRYPT_OPEN_ALGORITHM_PROVIDER_FLAGS(0),
            ),
            AlgorithmId::Hmac(hash) => (hash.cng_algorithm_id(), BCRYPT_ALG_HANDLE_HMAC_FLAG),
            AlgorithmId::Rsa => (BCRYPT_RSA_ALGORITHM, BCRYPT_OPEN_ALGORITHM_PROVIDER_FLAGS(0)),
        };
        let mut handle = BCRYPT_ALG_HANDLE::default();
        // SAFETY: Calling Windows CNG BCryptOpenAlgorithmProvider.
        // - handle is a valid out pointer on the stack
        // - algo_id is a static, NUL-terminated algorithm name
        // - None selects the default implementation
        let status = unsafe { BCryptOpenAlgorithmProvider(&mut handle, algo_id, None, flags) };
        status::check(NativeOp::OpenProvider, status)?;
        Ok(CngAlgHandle(handle))
    }

    #[allow(unsafe_code)]
    fn close(&self, id: AlgorithmId, handle: Self::Handle) {
        // SAFETY: handle was returned by BCryptOpenAlgorithmProvider and the
        // registry guarantees no guard still refers to it.
        let status = unsafe { BCryptCloseAlgorithmProvider(handle.0, 0) };
        if status.is_err() {
            tracing::error!(algorithm = %id, ?status, "BCryptCloseAlgorithmProvider failed");
        }
    }
}
