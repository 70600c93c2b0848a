// Copyright (C) Microsoft Corporation. All rights reserved.

//! CNG encryption backend.
//!
//! Raw and PKCS#1 v1.5 need only a flag. OAEP also passes a
//! `BCRYPT_OAEP_PADDING_INFO` naming the digest and borrowing the label.

use windows::Win32::Security::Cryptography::*;
use zeroize::Zeroize;

use super::*;

#[derive(Clone, Copy)]
enum Padding {
    None,
    Pkcs1,
    Oaep,
}

/// Padding configuration for CNG encryption, borrowing the OAEP label for `'a`.
pub struct CngRsaEncryptAlgo<'a> {
    pad: Padding,
    label: &'a [u8],
    hash: Option<HashAlgorithm>,
}

impl RsaEncryptOp for CngRsaEncryptAlgo<'_> {
    #[allow(unsafe_code)]
    fn encrypt(&self, key: &RsaPublicKeyObject, input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (flags, pad) = self.pad_info()?;
        let pad_ptr = pad
            .as_ref()
            .map(|info| info as *const _ as *const std::ffi::c_void);

        let mut len = 0u32;
        // SAFETY: size query; no output buffer is passed.
        // - the imported key outlives the call
        // - pad_ptr is None or borrows `pad`, which is still in scope
        let status = unsafe {
            BCryptEncrypt(key.handle(), Some(input), pad_ptr, None, None, &mut len, flags)
        };
        status::check(NativeOp::Encrypt, status)?;

        let mut output = vec![0u8; len as usize];
        // SAFETY: as above; `output` has the length CNG asked for and the OAEP
        // label pointer borrows self.label.
        let status = unsafe {
            BCryptEncrypt(
                key.handle(),
                Some(input),
                pad_ptr,
                None,
                Some(&mut output),
                &mut len,
                flags,
            )
        };
        status::check(NativeOp::Encrypt, status)?;
        output.truncate(len as usize);
        Ok(output)
    }

    #[allow(unsafe_code)]
    fn decrypt(&self, key: &RsaPrivateKeyObject, input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let (flags, pad) = self.pad_info()?;
        let pad_ptr = pad
            .as_ref()
            .map(|info| info as *const _ as *const std::ffi::c_void);

        let mut len = 0u32;
        // SAFETY: size query on the imported private key; `pad` is in scope.
        let status = unsafe {
            BCryptDecrypt(key.handle(), Some(input), pad_ptr, None, None, &mut len, flags)
        };
        status::check(NativeOp::Decrypt, status)?;

        let mut output = vec![0u8; len as usize];
        // SAFETY: `output` has the length CNG asked for; the key and `pad`
        // outlive the call.
        let status = unsafe {
            BCryptDecrypt(
                key.handle(),
                Some(input),
                pad_ptr,
                None,
                Some(&mut output),
                &mut len,
                flags,
            )
        };
        if let Err(err) = status::check(NativeOp::Decrypt, status) {
            output.zeroize();
            return Err(err);
        }
        output.truncate(len as usize);
        Ok(output)
    }
}

impl<'a> CngRsaEncryptAlgo<'a> {
    /// Raw RSA; input must be exactly one modulus-length block.
    pub fn with_no_padding() -> Self {
        Self {
            pad: Padding::None,
            label: &[],
            hash: None,
        }
    }

    /// PKCS#1 v1.5 encryption padding.
    pub fn with_pkcs1_padding() -> Self {
        Self {
            pad: Padding::Pkcs1,
            label: &[],
            hash: None,
        }
    }

    /// OAEP with `hash` for the label digest and MGF1.
    pub fn with_oaep_padding(hash: HashAlgorithm, label: &'a [u8]) -> Self {
        Self {
            pad: Padding::Oaep,
            label,
            hash: Some(hash),
        }
    }

    fn pad_info(&self) -> Result<(BCRYPT_FLAGS, Option<BCRYPT_OAEP_PADDING_INFO>), CryptoError> {
        match self.pad {
            Padding::Oaep => {
                let hash = self.hash.ok_or(CryptoError::UnsupportedAlgorithm)?;
                let mut pad_info = BCRYPT_OAEP_PADDING_INFO {
                    pszAlgId: hash.cng_algorithm_id(),
                    ..Default::default()
                };

                if !self.label.is_empty() {
                    // CNG only reads the label.
                    pad_info.pbLabel = self.label.as_ptr().cast_mut();
                    pad_info.cbLabel =
                        u32::try_from(self.label.len()).map_err(|_| CryptoError::EncodingOverflow)?;
                }

                Ok((BCRYPT_PAD_OAEP, Some(pad_info)))
            }
            Padding::Pkcs1 => Ok((BCRYPT_PAD_PKCS1, None)),
            Padding::None => Ok((BCRYPT_PAD_NONE, None)),
        }
    }
}
