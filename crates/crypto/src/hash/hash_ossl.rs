// Copyright (C) Microsoft Corporation. All rights reserved.

//! OpenSSL-backed streaming digests.
//!
//! The digest state is an `openssl::hash::Hasher`, which wraps an
//! `EVP_MD_CTX`. Cloning a `Hasher` copies the context, which is what makes
//! `sum` non-mutating.

use openssl::hash::Hasher;
use openssl::hash::MessageDigest;
use openssl::md::Md;
use openssl::md::MdRef;

use super::*;

impl HashAlgorithm {
    /// OpenSSL message digest for this algorithm.
    pub(crate) fn message_digest(self) -> MessageDigest {
        match self {
            HashAlgorithm::Md5 => MessageDigest::md5(),
            HashAlgorithm::Sha1 => MessageDigest::sha1(),
            HashAlgorithm::Sha256 => MessageDigest::sha256(),
            HashAlgorithm::Sha384 => MessageDigest::sha384(),
            HashAlgorithm::Sha512 => MessageDigest::sha512(),
        }
    }

    /// OpenSSL `EVP_MD` reference for `PkeyCtx` configuration.
    pub(crate) fn md(self) -> &'static MdRef {
        match self {
            HashAlgorithm::Md5 => Md::md5(),
            HashAlgorithm::Sha1 => Md::sha1(),
            HashAlgorithm::Sha256 => Md::sha256(),
            HashAlgorithm::Sha384 => Md::sha384(),
            HashAlgorithm::Sha512 => Md::sha512(),
        }
    }
}

/// Streaming digest over an OpenSSL `Hasher`.
pub struct OsslDigest {
    algorithm: HashAlgorithm,
    provider: NativeProviderHandle,
    hasher: Hasher,
    written: u64,
}

impl OsslDigest {
    /// Creates a digest for `algorithm` with no data written.
    ///
    /// # Errors
    ///
    /// * `CryptoError::ProviderOperationFailed` - If OpenSSL cannot create the context
    pub fn new(algorithm: HashAlgorithm) -> Result<Self, CryptoError> {
        let provider = provider_registry().acquire(AlgorithmId::Digest(algorithm))?;
        let hasher = Self::fresh_hasher(&provider)?;
        Ok(Self {
            algorithm,
            provider,
            hasher,
            written: 0,
        })
    }

    /// Algorithm this digest computes.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    fn fresh_hasher(provider: &NativeProviderHandle) -> Result<Hasher, CryptoError> {
        let md = provider.raw().message_digest()?;
        Hasher::new(md).map_err(status::ossl(NativeOp::CreateHash))
    }
}

impl StreamingDigest for OsslDigest {
    fn write(&mut self, data: &[u8]) -> Result<usize, CryptoError> {
        self.hasher
            .update(data)
            .map_err(status::ossl(NativeOp::HashData))?;
        self.written += data.len() as u64;
        Ok(data.len())
    }

    fn sum(&self, out: Option<&mut [u8]>) -> Result<usize, CryptoError> {
        let len = self.size();
        if let Some(out) = out {
            let out = digest_out(out, len)?;
            let digest = self
                .hasher
                .clone()
                .finish()
                .map_err(status::ossl(NativeOp::FinishHash))?;
            out.copy_from_slice(&digest);
        }
        Ok(len)
    }

    fn reset(&mut self) -> Result<(), CryptoError> {
        self.hasher = Self::fresh_hasher(&self.provider)?;
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
