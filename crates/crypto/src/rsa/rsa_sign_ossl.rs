// Copyright (C) Microsoft Corporation. All rights reserved.

//! OpenSSL signing backend over `EVP_PKEY_sign` / `EVP_PKEY_verify`.
//!
//! The input is a digest the caller already computed; `set_signature_md` only
//! tells OpenSSL which `DigestInfo` (PKCS#1) or hash (PSS) to encode. PKCS#1
//! v1.5 without a digest algorithm signs the input bytes as given.

use openssl::pkey_ctx::*;
use openssl::rsa::*;
use openssl::sign::RsaPssSaltlen;

use super::*;

/// Signature scheme for one OpenSSL sign or verify call.
pub struct OsslRsaSignAlgo {
    padding: Padding,
    hash: Option<HashAlgorithm>,
    // Already resolved; unused for PKCS#1.
    salt_len: usize,
}

impl RsaSignOp for OsslRsaSignAlgo {
    fn sign(&self, key: &RsaPrivateKeyObject, hashed: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut pkey_ctx = PkeyCtx::new(key.pkey()).map_err(status::ossl(NativeOp::Sign))?;
        pkey_ctx
            .sign_init()
            .map_err(status::ossl(NativeOp::Sign))?;
        self.configure_pkey_ctx(&mut pkey_ctx, NativeOp::Sign)?;
        let len = pkey_ctx
            .sign(hashed, None)
            .map_err(status::ossl(NativeOp::Sign))?;
        let mut signature = vec![0u8; len];
        let len = pkey_ctx
            .sign(hashed, Some(&mut signature))
            .map_err(status::ossl(NativeOp::Sign))?;
        signature.truncate(len);
        Ok(signature)
    }

    fn verify(
        &self,
        key: &RsaPublicKeyObject,
        hashed: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        let mut pkey_ctx = PkeyCtx::new(key.pkey()).map_err(status::ossl(NativeOp::Verify))?;
        pkey_ctx
            .verify_init()
            .map_err(status::ossl(NativeOp::Verify))?;
        self.configure_pkey_ctx(&mut pkey_ctx, NativeOp::Verify)?;
        match pkey_ctx.verify(hashed, signature) {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::debug!("RSA signature mismatch");
                Err(CryptoError::SignatureVerificationFailed)
            }
            Err(err) => Err(status::ossl(NativeOp::Verify)(err)),
        }
    }
}

impl OsslRsaSignAlgo {
    /// PKCS#1 v1.5 signatures.
    ///
    /// # Arguments
    ///
    /// * `hash` - Digest the input was computed with, or `None` to sign the input as is
    pub fn with_pkcs1_padding(hash: Option<HashAlgorithm>) -> Self {
        Self {
            padding: Padding::PKCS1,
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
            padding: Padding::PKCS1_PSS,
            hash: Some(hash),
            salt_len,
        }
    }

    /// Configures the OpenSSL context with the padding and digest parameters.
    fn configure_pkey_ctx<T>(
        &self,
        pkey_ctx: &mut PkeyCtx<T>,
        op: NativeOp,
    ) -> Result<(), CryptoError> {
        pkey_ctx
            .set_rsa_padding(self.padding)
            .map_err(status::ossl(op))?;

        if let Some(hash) = self.hash {
            pkey_ctx
                .set_signature_md(hash.md())
                .map_err(status::ossl(op))?;

            if self.padding == Padding::PKCS1_PSS {
                let salt_len =
                    i32::try_from(self.salt_len).map_err(|_| CryptoError::InvalidSaltLength)?;
                pkey_ctx
                    .set_rsa_pss_saltlen(RsaPssSaltlen::custom(salt_len))
                    .map_err(status::ossl(op))?;
                pkey_ctx
                    .set_rsa_mgf1_md(hash.md())
                    .map_err(status::ossl(op))?;
            }
        }

        Ok(())
    }
}
