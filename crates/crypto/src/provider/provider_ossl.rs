// Copyright (C) Microsoft Corporation. All rights reserved.

//! OpenSSL algorithm providers.
//!
//! OpenSSL's built-in digest tables are static for the life of the process,
//! so opening a provider resolves the `EVP_MD` and closing it is a no-op.

use openssl::hash::MessageDigest;

use super::*;

/// Resolved OpenSSL algorithm.
#[derive(Clone, Copy)]
pub enum OsslAlgorithm {
    /// Digest used directly or as the HMAC hash.
    Digest(MessageDigest),
    /// RSA; keys are built per call so there is nothing to resolve.
    Rsa,
}

impl OsslAlgorithm {
    /// Returns the message digest behind a digest or HMAC provider.
    pub(crate) fn message_digest(&self) -> Result<MessageDigest, CryptoError> {
        match self {
            OsslAlgorithm::Digest(md) => Ok(*md),
            OsslAlgorithm::Rsa => Err(CryptoError::UnsupportedAlgorithm),
        }
    }
}

/// Provider backend over OpenSSL.
#[derive(Default)]
pub struct OsslProviders;

impl ProviderBackend for OsslProviders {
    type Handle = OsslAlgorithm;

    fn open(&self, id: AlgorithmId) -> Result<Self::Handle, CryptoError> {
        match id {
            AlgorithmId::Digest(hash) | AlgorithmId::Hmac(hash) => {
                Ok(OsslAlgorithm::Digest(hash.message_digest()))
            }
            AlgorithmId::Rsa => Ok(OsslAlgorithm::Rsa),
        }
    }

    fn close(&self, _id: AlgorithmId, _handle: Self::Handle) {}
}
