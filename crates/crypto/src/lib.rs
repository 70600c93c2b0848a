// Copyright (C) Microsoft Corporation. All rights reserved.

//! Digest, HMAC and RSA operations over the platform's native crypto engine.
//!
//! The crate never implements a primitive itself. Every hash compression,
//! prime search and modular exponentiation is delegated to the native engine,
//! reached only through opaque handles. What lives here is the adapter logic:
//!
//! - **Digest / HMAC**: a uniform streaming contract ([`StreamingDigest`]) with
//!   a non-mutating `sum` and a `reset` that keeps the original key
//! - **RSA**: key generation, PKCS#1 v1.5 / OAEP / raw encryption and
//!   PKCS#1 v1.5 / PSS signatures over caller-supplied big integers
//! - **Key blobs**: the fixed-layout key encoding exchanged with the engine
//! - **Providers**: a process-wide, reference-counted cache of algorithm handles
//!
//! # Platform Support
//!
//! - Linux: OpenSSL-based implementations
//! - Windows: Native Windows cryptography APIs (CNG)

mod bigint;
mod hash;
mod hmac;
mod provider;
mod retry;
mod rsa;
mod status;

#[cfg(test)]
mod test_support;

pub use bigint::*;
pub use hash::*;
pub use hmac::*;
pub use provider::*;
pub use rsa::*;
pub use status::ProviderStatus;
use status::NativeOp;
use thiserror::Error;

/// Error type for all operations exposed by this crate.
///
/// Input-shape problems are reported before any native call is made. Native
/// failures are translated exactly once, at the call boundary; raw engine
/// status codes only surface wrapped in [`ProviderStatus`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CryptoError {
    /// Requested or supplied RSA modulus size is not supported.
    #[error("invalid RSA key size")]
    InvalidKeySize,

    /// Input length does not match the length the operation requires.
    #[error("buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferLengthMismatch {
        /// Length the operation requires.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// Decryption failed.
    ///
    /// Bad padding, a mismatched OAEP label, the wrong key and corrupted
    /// ciphertext all produce this same error.
    #[error("decryption failed")]
    DecryptionFailed,

    /// Signature did not verify.
    #[error("signature verification failed")]
    SignatureVerificationFailed,

    /// Native engine reported a failure with no more specific classification.
    #[error("native provider operation failed with status {0}")]
    ProviderOperationFailed(ProviderStatus),

    /// A value does not fit the fixed field width of a key blob.
    #[error("value does not fit its encoding field")]
    EncodingOverflow,

    /// Message is longer than the padding scheme allows for this key.
    #[error("message too long for RSA key size")]
    MessageTooLong,

    /// RSA public exponent is even or out of range.
    #[error("invalid RSA public exponent")]
    InvalidPublicExponent,

    /// PSS salt length is larger than the key and digest allow.
    #[error("invalid PSS salt length")]
    InvalidSaltLength,

    /// Output buffer is too small for the result.
    #[error("output buffer too small")]
    BufferTooSmall,

    /// Algorithm is not supported by this backend.
    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,
}

impl CryptoError {
    /// Returns `true` when the native engine reported a condition that may
    /// clear on its own, such as resource exhaustion.
    pub fn is_transient(&self) -> bool {
        matches!(self, CryptoError::ProviderOperationFailed(status) if status.is_transient())
    }
}

/// Defines a type alias that resolves to the backend type of the current platform.
macro_rules! define_type {
    ($vis:vis $name: ident, $linux_type: ty, $windows_type: ty) => {
        /// Backend type for the current platform
        #[cfg(target_os = "linux")]
        $vis type $name = $linux_type;

        /// Backend type for the current platform
        #[cfg(target_os = "windows")]
        $vis type $name = $windows_type;
    };
    ($vis:vis $name: ident<$lt:lifetime>, $linux_type: ty, $windows_type: ty) => {
        /// Backend type for the current platform
        #[cfg(target_os = "linux")]
        $vis type $name<$lt> = $linux_type;

        /// Backend type for the current platform
        #[cfg(target_os = "windows")]
        $vis type $name<$lt> = $windows_type;
    };
}

pub(crate) use define_type;
