// Copyright (C) Microsoft Corporation. All rights reserved.

//! OpenSSL encryption backend over `Encrypter` / `Decrypter`.
//!
//! - **OAEP**: digest and MGF1 digest are the same algorithm; the label is optional
//! - **PKCS#1 v1.5**: encryption block type 2
//! - **None**: raw modular exponentiation over a full modulus-length block

use openssl::encrypt::Decrypter;
use openssl::encrypt::Encrypter;
use openssl::rsa::*;
use zeroize::Zeroize;

use super::*;

/// Padding configuration for OpenSSL encryption, borrowing the OAEP label for `'a`.
pub struct OsslRsaEncryptAlgo<'a> {
    padding: Padding,
    // Set for OAEP only.
    hash: Option<HashAlgorithm>,
    label: &'a [u8],
}

impl RsaEncryptOp for OsslRsaEncryptAlgo<'_> {
    fn encrypt(&self, key: &RsaPublicKeyObject, input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut encrypter =
            Encrypter::new(key.pkey()).map_err(status::ossl(NativeOp::Encrypt))?;
        self.configure_encrypter(&mut encrypter)?;
        let len = encrypter
            .encrypt_len(input)
            .map_err(status::ossl(NativeOp::Encrypt))?;
        let mut output = vec![0u8; len];
        let len = encrypter
            .encrypt(input, &mut output)
            .map_err(status::ossl(NativeOp::Encrypt))?;
        output.truncate(len);
        Ok(output)
    }

    fn decrypt(&self, key: &RsaPrivateKeyObject, input: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut decrypter =
            Decrypter::new(key.pkey()).map_err(status::ossl(NativeOp::Decrypt))?;
        self.configure_decrypter(&mut decrypter)?;
        let len = decrypter
            .decrypt_len(input)
            .map_err(status::ossl(NativeOp::Decrypt))?;
        let mut output = vec![0u8; len];
        match decrypter.decrypt(input, &mut output) {
            Ok(len) => {
                output.truncate(len);
                Ok(output)
            }
            Err(err) => {
                output.zeroize();
                Err(status::ossl(NativeOp::Decrypt)(err))
            }
        }
    }
}

impl<'a> OsslRsaEncryptAlgo<'a> {
    /// Creates an RSA encryption context without padding.
    pub fn with_no_padding() -> Self {
        Self {
            padding: Padding::NONE,
            hash: None,
            label: &[],
        }
    }

    /// Creates an RSA encryption context with PKCS#1 v1.5 padding.
    pub fn with_pkcs1_padding() -> Self {
        Self {
            padding: Padding::PKCS1,
            hash: None,
            label: &[],
        }
    }

    /// Creates an RSA encryption context with OAEP padding.
    ///
    /// # Arguments
    ///
    /// * `hash` - Digest for both the label hash and MGF1
    /// * `label` - OAEP label; empty for none
    pub fn with_oaep_padding(hash: HashAlgorithm, label: &'a [u8]) -> Self {
        Self {
            padding: Padding::PKCS1_OAEP,
            hash: Some(hash),
            label,
        }
    }

    fn configure_encrypter(&self, encrypter: &mut Encrypter<'_>) -> Result<(), CryptoError> {
        // Padding must be set before any OAEP parameter.
        encrypter
            .set_rsa_padding(self.padding)
            .map_err(status::ossl(NativeOp::Encrypt))?;

        if self.padding == Padding::PKCS1_OAEP {
            if let Some(hash) = self.hash {
                encrypter
                    .set_rsa_oaep_md(hash.message_digest())
                    .map_err(status::ossl(NativeOp::Encrypt))?;
                encrypter
                    .set_rsa_mgf1_md(hash.message_digest())
                    .map_err(status::ossl(NativeOp::Encrypt))?;
            }
            if !self.label.is_empty() {
                encrypter
                    .set_rsa_oaep_label(self.label)
                    .map_err(status::ossl(NativeOp::Encrypt))?;
            }
        }
        Ok(())
    }

    fn configure_decrypter(&self, decrypter: &mut Decrypter<'_>) -> Result<(), CryptoError> {
        decrypter
            .set_rsa_padding(self.padding)
            .map_err(status::ossl(NativeOp::Decrypt))?;

        if self.padding == Padding::PKCS1_OAEP {
            if let Some(hash) = self.hash {
                decrypter
                    .set_rsa_oaep_md(hash.message_digest())
                    .map_err(status::ossl(NativeOp::Decrypt))?;
                decrypter
                    .set_rsa_mgf1_md(hash.message_digest())
                    .map_err(status::ossl(NativeOp::Decrypt))?;
            }
            if !self.label.is_empty() {
                decrypter
                    .set_rsa_oaep_label(self.label)
                    .map_err(status::ossl(NativeOp::Decrypt))?;
            }
        }
        Ok(())
    }
}
