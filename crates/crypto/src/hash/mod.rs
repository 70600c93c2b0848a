// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Streaming message digests.
//!
//! This module provides a single streaming contract, [`StreamingDigest`],
//! shared by every digest algorithm and by HMAC. The platform backend is
//! selected at compile time; [`Digest`] names the backend type for the
//! current platform.
//!
//! # Supported Hash Functions
//!
//! - **MD5**: 128-bit hash (broken, provided for compatibility only)
//! - **SHA-1**: 160-bit hash (deprecated for signatures, provided for compatibility)
//! - **SHA-256**: 256-bit hash from the SHA-2 family
//! - **SHA-384**: 384-bit hash from the SHA-2 family
//! - **SHA-512**: 512-bit hash from the SHA-2 family
//!
//! # State Machine
//!
//! A digest starts with zero bytes written. `write` appends to the native
//! state, `sum` finalizes a duplicate of that state and leaves the original
//! untouched, and `reset` returns to the initial state with the same
//! algorithm (and, for HMAC, the same key).
//!
//! # Platform Support
//!
//! - **Linux**: OpenSSL `EVP_MD` contexts, duplicated with `EVP_MD_CTX_copy`
//! - **Windows**: CNG hash objects, duplicated with `BCryptDuplicateHash`

use std::fmt;
use std::io;
use std::str::FromStr;

use super::*;

#[cfg(target_os = "linux")]
mod hash_ossl;

#[cfg(target_os = "windows")]
mod hash_cng;

#[cfg(target_os = "windows")]
pub(crate) use hash_cng::CngHashHandle;

define_type!(pub Digest, hash_ossl::OsslDigest, hash_cng::CngDigest);

/// Digest algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// MD5
    Md5,
    /// SHA-1
    Sha1,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlgorithm {
    /// Digest output size in bytes.
    pub const fn size(self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha1 => 20,
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }

    /// Internal block size in bytes.
    pub const fn block_size(self) -> usize {
        match self {
            HashAlgorithm::Md5 | HashAlgorithm::Sha1 | HashAlgorithm::Sha256 => 64,
            HashAlgorithm::Sha384 | HashAlgorithm::Sha512 => 128,
        }
    }

    /// Lower-case algorithm name.
    pub const fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "").as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(CryptoError::UnsupportedAlgorithm),
        }
    }
}

/// Incremental digest with a non-mutating finalize.
///
/// Implementations are not internally synchronized; concurrent use of one
/// instance needs external locking.
pub trait StreamingDigest {
    /// Appends `data` to the digest state.
    ///
    /// # Returns
    ///
    /// The number of bytes consumed, which is always `data.len()`.
    fn write(&mut self, data: &[u8]) -> Result<usize, CryptoError>;

    /// Computes the digest of everything written so far.
    ///
    /// The live state is duplicated and only the duplicate is finalized, so
    /// repeated calls return the same value and later writes continue from
    /// where they left off.
    ///
    /// # Arguments
    ///
    /// * `out` - Buffer for the digest. If `None`, only the size is returned.
    ///
    /// # Returns
    ///
    /// The digest size in bytes.
    ///
    /// # Errors
    ///
    /// * `CryptoError::BufferTooSmall` - If `out` is shorter than [`StreamingDigest::size`]
    fn sum(&self, out: Option<&mut [u8]>) -> Result<usize, CryptoError>;

    /// Returns the digest of everything written so far as a vector.
    fn sum_vec(&self) -> Result<Vec<u8>, CryptoError> {
        let mut out = vec![0u8; self.sum(None)?];
        self.sum(Some(&mut out))?;
        Ok(out)
    }

    /// Discards all written data, keeping the algorithm and key.
    fn reset(&mut self) -> Result<(), CryptoError>;

    /// Digest output size in bytes.
    fn size(&self) -> usize;

    /// Internal block size in bytes.
    fn block_size(&self) -> usize;

    /// Number of bytes written since construction or the last reset.
    fn bytes_written(&self) -> u64;

    /// Adapts the digest to [`std::io::Write`].
    fn writer(&mut self) -> DigestWriter<'_, Self>
    where
        Self: Sized,
    {
        DigestWriter { digest: self }
    }
}

/// [`std::io::Write`] adapter over a [`StreamingDigest`].
pub struct DigestWriter<'a, D: StreamingDigest> {
    digest: &'a mut D,
}

impl<D: StreamingDigest> io::Write for DigestWriter<'_, D> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.digest.write(buf).map_err(io::Error::other)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Checks a caller buffer for a digest of `len` bytes.
pub(crate) fn digest_out(out: &mut [u8], len: usize) -> Result<&mut [u8], CryptoError> {
    out.get_mut(..len).ok_or(CryptoError::BufferTooSmall)
}

#[cfg(test)]
mod tests;
