// Copyright (C) Microsoft Corporation. All rights reserved.

//! RSA (Rivest-Shamir-Adleman) cryptographic operations.
//!
//! Keys are held as big integers. Every operation encodes the key into a
//! native key blob, imports it into a native key object scoped to that single
//! call, runs the operation, and destroys the key object again. No native key
//! object outlives the call that created it.
//!
//! # Supported Operations
//!
//! - **Key Generation**: exponent 65537, with bounded retry on transient engine failures
//! - **Encryption/Decryption**: PKCS#1 v1.5, OAEP (with label) and raw (no padding)
//! - **Digital Signatures**: PKCS#1 v1.5 (hashed or unhashed) and PSS over caller-computed digests
//!
//! # Key Sizes
//!
//! Moduli from [`RSA_MIN_KEY_BITS`] to [`RSA_MAX_KEY_BITS`] bits are accepted.
//! Key generation additionally requires a multiple of [`RSA_KEY_BITS_STEP`].
//!
//! # Length Checks
//!
//! Message and digest lengths are checked before any native call:
//!
//! - PKCS#1 v1.5 encryption: at most `k - 11` bytes
//! - OAEP encryption: at most `k - 2 * hLen - 2` bytes
//! - Raw encryption and decryption: exactly `k` bytes
//! - Hashed signing: exactly the digest size
//!
//! # Platform Support
//!
//! - **Linux**: Uses OpenSSL implementations via `key_ossl`, `rsa_enc_ossl`, `rsa_sign_ossl` modules
//! - **Windows**: Uses Windows CNG via `key_cng`, `rsa_enc_cng`, `rsa_sign_cng` modules

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod key_ossl;
        mod rsa_enc_ossl;
        mod rsa_sign_ossl;
    } else if #[cfg(target_os = "windows")] {
        mod key_cng;
        mod rsa_enc_cng;
        mod rsa_sign_cng;
    } else {
        compile_error!("Unsupported target OS for RSA implementation");
    }
}

// Blob parsing is only needed to read back keys generated by CNG.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
mod blob;
mod key;
mod ops;

use blob::*;
pub use key::*;
pub use ops::*;

use super::*;

/// Smallest supported modulus size in bits.
pub const RSA_MIN_KEY_BITS: usize = 512;

/// Largest supported modulus size in bits.
pub const RSA_MAX_KEY_BITS: usize = 16384;

/// Granularity of generated modulus sizes in bits.
pub const RSA_KEY_BITS_STEP: usize = 64;

/// Additional key generation attempts made after a transient engine failure.
pub const KEYGEN_MAX_RETRIES: u32 = 2;

/// Minimum PKCS#1 v1.5 encryption padding overhead in bytes.
pub const PKCS1_ENCRYPTION_OVERHEAD: usize = 11;

/// PSS salt length that selects the default, which is the digest length.
pub const PSS_SALT_LENGTH_AUTO: usize = 0;

define_type!(
    pub(crate) RsaPublicKeyObject,
    key_ossl::OsslRsaPublicKeyObject,
    key_cng::CngRsaKeyObject
);
define_type!(
    pub(crate) RsaPrivateKeyObject,
    key_ossl::OsslRsaPrivateKeyObject,
    key_cng::CngRsaKeyObject
);
define_type!(
    pub(crate) RsaEncryptAlgo<'a>,
    rsa_enc_ossl::OsslRsaEncryptAlgo<'a>,
    rsa_enc_cng::CngRsaEncryptAlgo<'a>
);
define_type!(
    pub(crate) RsaSignAlgo,
    rsa_sign_ossl::OsslRsaSignAlgo,
    rsa_sign_cng::CngRsaSignAlgo
);

/// Encryption and decryption with a configured padding scheme.
pub(crate) trait RsaEncryptOp {
    /// Encrypts `input` with the public key object.
    fn encrypt(&self, key: &RsaPublicKeyObject, input: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypts `input` with the private key object.
    ///
    /// Any failure is reported as `CryptoError::DecryptionFailed` and no
    /// partial plaintext is returned.
    fn decrypt(&self, key: &RsaPrivateKeyObject, input: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// Signing and verification with a configured padding scheme.
pub(crate) trait RsaSignOp {
    /// Signs a caller-computed digest (or raw data for unhashed PKCS#1 v1.5).
    fn sign(&self, key: &RsaPrivateKeyObject, hashed: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Verifies `signature` over `hashed`.
    ///
    /// Returns `CryptoError::SignatureVerificationFailed` on any mismatch.
    fn verify(
        &self,
        key: &RsaPublicKeyObject,
        hashed: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError>;
}

#[cfg(test)]
mod tests;
