// Copyright (C) Microsoft Corporation. All rights reserved.

//! Windows CNG HMAC engine.
//!
//! The keyed hash object is created on a provider opened with
//! `BCRYPT_ALG_HANDLE_HMAC_FLAG`. CNG has no way to rewind a hash object, so
//! the key is retained (zeroized on drop) and `reset` creates a fresh object.

use zeroize::Zeroizing;

use super::*;

/// Streaming HMAC over a CNG keyed hash object.
pub struct CngHmac {
    algorithm: HashAlgorithm,
    provider: NativeProviderHandle,
    key: Zeroizing<Vec<u8>>,
    hash: CngHashHandle,
    written: u64,
}

impl CngHmac {
    /// Creates an HMAC engine for `algorithm` keyed with `key`.
    ///
    /// # Errors
    ///
    /// * `CryptoError::ProviderOperationFailed` - If the provider or hash object cannot be created
    pub fn new(algorithm: HashAlgorithm, key: &[u8]) -> Result<Self, CryptoError> {
        let provider = provider_registry().acquire(AlgorithmId::Hmac(algorithm))?;
        let key = Zeroizing::new(key.to_vec());
        let hash = CngHashHandle::new(provider.raw().handle(), Some(&key))?;
        Ok(Self {
            algorithm,
            provider,
            key,
            hash,
            written: 0,
        })
    }

    /// Hash algorithm underlying this HMAC.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl StreamingDigest for CngHmac {
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
        self.hash = CngHashHandle::new(self.provider.raw().handle(), Some(&self.key))?;
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
