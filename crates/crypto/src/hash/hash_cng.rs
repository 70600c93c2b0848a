// Copyright (C) Microsoft Corporation. All rights reserved.

//! Windows CNG (Cryptography Next Generation) streaming digests.
//!
//! Each digest owns one CNG hash object created from a cached algorithm
//! provider. `sum` duplicates the hash object with `BCryptDuplicateHash` and
//! finishes only the duplicate.

use windows::core::PCWSTR;
use windows::Win32::Security::Cryptography::*;

use super::*;

impl HashAlgorithm {
    /// Converts the hash algorithm to the Windows CNG algorithm identifier.
    pub(crate) fn cng_algorithm_id(self) -> PCWSTR {
        match self {
            HashAlgorithm::Md5 => BCRYPT_MD5_ALGORITHM,
            HashAlgorithm::Sha1 => BCRYPT_SHA1_ALGORITHM,
            HashAlgorithm::Sha256 => BCRYPT_SHA256_ALGORITHM,
            HashAlgorithm::Sha384 => BCRYPT_SHA384_ALGORITHM,
            HashAlgorithm::Sha512 => BCRYPT_SHA512_ALGORITHM,
        }
    }
}

/// Streaming digest over a CNG hash object.
pub struct CngDigest {
    algorithm: HashAlgorithm,
    provider: NativeProviderHandle,
    hash: CngHashHandle,
    written: u64,
}

impl CngDigest {
    /// Creates a digest for `algorithm` with no data written.
    ///
    /// # Errors
    ///
    /// * `CryptoError::ProviderOperationFailed` - If the provider or hash object cannot be created
    pub fn new(algorithm: HashAlgorithm) -> Result<Self, CryptoError> {
        let provider = provider_registry().acquire(AlgorithmId::Digest(algorithm))?;
        let hash = CngHashHandle::new(provider.raw().handle(), None)?;
        Ok(Self {
            algorithm,
            provider,
            hash,
            written: 0,
        })
    }

    /// Algorithm this digest computes.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl StreamingDigest for CngDigest {
    fn write(&mut self, data: &[u8]) -> Result<usize, CryptoError> {
        self.hash.update(data)?;
        self.written += data.len() as u64;
        Ok(data.len())
    }

    fn sum(&self, out: Option<&mut [u8]>) -> Result<usize, CryptoError> {
        let len = self.size();
        if let Some(out) = out {
            self.hash.duplicate()?.finish(digest_out(out, len)?)?;
        }
        Ok(len)
    }

    fn reset(&mut self) -> Result<(), CryptoError> {
        self.hash = CngHashHandle::new(self.provider.raw().handle(), None)?;
        self.written = 0;
        Ok(())
    }

    fn size(&self) -> usize {
        self.algorithm.size()
    }

    fn block_size(&self) -> usize {
        self.algorithm.block_size()
    }

    fn bytes_written(&self) -> u64 {
        self.written
    }
}

/// RAII wrapper for Windows CNG hash handles.
///
/// Shared by plain digests and HMAC; the HMAC variant is created with a
/// secret on a provider opened with `BCRYPT_ALG_HANDLE_HMAC_FLAG`.
pub(crate) struct CngHashHandle {
    handle: BCRYPT_HASH_HANDLE,
}

impl CngHashHandle {
    /// Creates a new hash object on `algo`, keyed with `secret` for HMAC.
    #[allow(unsafe_code)]
    pub(crate) fn new(algo: BCRYPT_ALG_HANDLE, secret: Option<&[u8]>) -> Result<Self, CryptoError> {
        let mut handle = BCRYPT_HASH_HANDLE::default();
        // SAFETY: Calling Windows CNG BCryptCreateHash.
        // - algo is an open algorithm handle held by the provider registry
        // - None for the hash object buffer lets CNG allocate it
        // - secret, when present, is valid for reads for the duration of the call
        let status = unsafe { BCryptCreateHash(algo, &mut handle, None, secret, 0) };
        status::check(NativeOp::CreateHash, status)?;
        Ok(Self { handle })
    }

    /// Feeds `data` into the hash object.
    #[allow(unsafe_code)]
    pub(crate) fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        // SAFETY: self.handle is a live hash object owned by this wrapper and
        // data is valid for reads for the duration of the call.
        let status = unsafe { BCryptHashData(self.handle, data, 0) };
        status::check(NativeOp::HashData, status)
    }

    /// Creates an independent copy of the current hash state.
    #[allow(unsafe_code)]
    pub(crate) fn duplicate(&self) -> Result<Self, CryptoError> {
        let mut handle = BCRYPT_HASH_HANDLE::default();
        // SAFETY: self.handle is a live hash object; the duplicate gets its
        // own CNG-allocated object buffer.
        let status = unsafe { BCryptDuplicateHash(self.handle, &mut handle, None, 0) };
        status::check(NativeOp::DuplicateHash, status)?;
        Ok(Self { handle })
    }

    /// Finalizes the hash object into `out`, which must be exactly the digest size.
    ///
    /// Consumes the wrapper because CNG hash objects cannot be reused after finishing.
    #[allow(unsafe_code)]
    pub(crate) fn finish(self, out: &mut [u8]) -> Result<(), CryptoError> {
        // SAFETY: self.handle is a live hash object and out is valid for
        // writes of out.len() bytes.
        let status = unsafe { BCryptFinishHash(self.handle, out, 0) };
        status::check(NativeOp::FinishHash, status)
    }
}

impl Drop for CngHashHandle {
    /// Destroys the CNG hash object.
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        // SAFETY: self.handle was created by BCryptCreateHash or
        // BCryptDuplicateHash and is destroyed exactly once.
        let status = unsafe { BCryptDestroyHash(self.handle) };
        if status.is_err() {
            tracing::error!(?status, "BCryptDestroyHash failed");
        }
    }
}

// SAFETY: a CNG hash object may be used from any thread as long as calls are
// not concurrent; the wrapper is only reachable through `&mut` for mutation.
#[allow(unsafe_code)]
unsafe impl Send for CngHashHandle {}
