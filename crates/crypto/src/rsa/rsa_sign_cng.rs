// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CNG signing backend.
//!
//! Inputs are digests computed by the caller. The digest algorithm is passed
//! to CNG through the padding info so it can build the `DigestInfo` (PKCS#1)
//! or the encoded message (PSS). PKCS#1 v1.5 with a null algorithm identifier
//! signs the input bytes as given.

use windows::core::PCWSTR;
use windows::Win32::Security::Cryptography::*;

use super::*;

enum Padding {
    Pkcs1,
    Pss,
}

enum PaddingInfo {
    Pkcs1(BCRYPT_PKCS1_PADDING_INFO),
    Pss(BCRYPT_PSS_PADDING_INFO),
}

/// Signature scheme for one CNG sign or verify call.
pub struct CngRsaSignAlgo {
    padding: Padding,
    hash: Option<HashAlgorithm>,
    // Already resolved; unused for PKCS#1.
    salt_len: usize,
}

impl RsaSignOp for CngRsaSignAlgo {
    #[allow(unsafe_code)]
    fn sign(&self, key: &RsaPrivateKeyObject, hashed: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (pad, flags) = self.padding_info()?;
        let pad_ptr = pad_ptr(&pad);

        let mut len = 0u32;
        // SAFETY: Calling Windows CNG BCryptSignHash to query the signature size.
        // - key.handle() is a valid BCRYPT_KEY_HANDLE from an imported private key
        // - pad_ptr points to padding info on the stack that outlives the call
        // - hashed is valid for reads for the duration of the call
        // - None for the signature buffer queries the size into len
        let status = unsafe { BCryptSignHash(key.handle(), pad_ptr, hashed, None, &mut len, flags) };
        status::check(NativeOp::Sign, status)?;

        let mut signature = vec![0u8; len as usize];
        // SAFETY: Calling Windows CNG BCryptSignHash.
        // - key.handle() is a valid BCRYPT_KEY_HANDLE from an imported private key
        // - pad_ptr points to padding info on the stack that outlives the call
        // - signature is sized from the query above; BCrypt will not write past it
        let status = unsafe {
            BCryptSignHash(
                key.handle(),
                pad_ptr,
                hashed,
                Some(&mut signature),
                &mut len,
                flags,
            )
        };
        status::check(NativeOp::Sign, status)?;
        signature.truncate(len as usize);
        Ok(signature)
    }

    #[allow(unsafe_code)]
    fn verify(
        &self,
        key: &RsaPublicKeyObject,
        hashed: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        let (pad, flags) = self.padding_info()?;
        let pad_ptr = pad_ptr(&pad);
        // SAFETY: BCryptVerifySignature only reads its inputs.
        // - key.handle() is a valid BCRYPT_KEY_HANDLE from an imported public key
        // - pad_ptr points to padding info on the stack that remains valid for the call
        // - hashed and signature slices are valid for reads for the duration of the call
        let status =
            unsafe { BCryptVerifySignature(key.handle(), pad_ptr, hashed, signature, flags) };
        status::check(NativeOp::Verify, status)
    }
}

impl CngRsaSignAlgo {
    /// PKCS#1 v1.5 signatures.
    ///
    /// # Arguments
    ///
    /// * `hash` - Digest the input was computed with, or `None` to sign the input as is
    pub fn with_pkcs1_padding(hash: Option<HashAlgorithm>) -> Self {
        Self {
            padding: Padding::Pkcs1,
            hash,
            salt_len: 0,
        }
    }

    /// PSS signatures with an explicit salt length.
    ///
    /// # Arguments
    ///
    /// * `hash` - Digest for the message hash and MGF1
    /// * `salt_len` - Salt length in bytes, already resolved from any default
    pub fn with_pss_padding(hash: HashAlgorithm, salt_len: usize) -> Self {
        Self {
            padding: Padding::Pss,
            hash: Some(hash),
            salt_len,
        }
    }

    fn padding_info(&self) -> Result<(PaddingInfo, BCRYPT_FLAGS), CryptoError> {
        let alg_id = self
            .hash
            .map_or(PCWSTR::null(), HashAlgorithm::cng_algorithm_id);
        match self.padding {
            Padding::Pkcs1 => Ok((
                PaddingInfo::Pkcs1(BCRYPT_PKCS1_PADDING_INFO { pszAlgId: alg_id }),
                BCRYPT_PAD_PKCS1,
            )),
            Padding::Pss => Ok((
                PaddingInfo::Pss(BCRYPT_PSS_PADDING_INFO {
                    pszAlgId: alg_id,
                    cbSalt: u32::try_from(self.salt_len)
                        .map_err(|_| CryptoError::InvalidSaltLength)?,
                }),
                BCRYPT_PAD_PSS,
            )),
        }
    }
}

/// Borrows the padding info as the untyped pointer BCrypt expects.
fn pad_ptr(pad: &PaddingInfo) -> Option<*const std::ffi::c_void> {
    match pad {
        PaddingInfo::Pkcs1(info) => Some(info as *const _ as *const std::ffi::c_void),
        PaddingInfo::Pss(info) => Some(info as *const _ as *const std::ffi::c_void),
    }
}
