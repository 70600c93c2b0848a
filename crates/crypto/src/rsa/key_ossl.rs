// Copyright (C) Microsoft Corporation. All rights reserved.

//! OpenSSL-based RSA key objects.
//!
//! A key object wraps an `EVP_PKEY` built from the fields of a key blob. It
//! lives only for the operation it was imported for.

use openssl::bn::*;
use openssl::pkey::*;
use openssl::rsa::*;
use zeroize::Zeroizing;

use super::*;

/// Public exponent used for key generation. CNG uses the same value by default.
const RSA_PUBLIC_EXPONENT: u32 = 65537;

/// OpenSSL RSA public key object.
pub struct OsslRsaPublicKeyObject {
    key: PKey<Public>,
}

/// OpenSSL RSA private key object.
pub struct OsslRsaPrivateKeyObject {
    key: PKey<Private>,
}

impl OsslRsaPublicKeyObject {
    /// Imports the public part of `blob`.
    ///
    /// # Errors
    ///
    /// * `CryptoError::ProviderOperationFailed` - If OpenSSL rejects the key
    pub(crate) fn import(
        _provider: &NativeProviderHandle,
        blob: &KeyBlob,
    ) -> Result<Self, CryptoError> {
        let fields = blob.fields();
        let rsa = Rsa::from_public_components(bn(fields.n)?, bn(fields.e)?)
            .map_err(status::ossl(NativeOp::ImportKey))?;
        let key = PKey::from_rsa(rsa).map_err(status::ossl(NativeOp::ImportKey))?;
        Ok(Self { key })
    }

    pub(crate) fn pkey(&self) -> &PKeyRef<Public> {
        &self.key
    }
}

impl OsslRsaPrivateKeyObject {
    /// Imports a full-private blob.
    ///
    /// # Errors
    ///
    /// * `CryptoError::EncodingOverflow` - If `blob` is a public blob
    /// * `CryptoError::ProviderOperationFailed` - If OpenSSL rejects the key
    pub(crate) fn import(
        _provider: &NativeProviderHandle,
        blob: &KeyBlob,
    ) -> Result<Self, CryptoError> {
        let fields = blob.fields();
        let private = fields.private.ok_or(CryptoError::EncodingOverflow)?;
        let rsa = RsaPrivateKeyBuilder::new(bn(fields.n)?, bn(fields.e)?, bn(private.d)?)
            .map_err(status::ossl(NativeOp::ImportKey))?
            .set_factors(bn(private.p)?, bn(private.q)?)
            .map_err(status::ossl(NativeOp::ImportKey))?
            .set_crt_params(bn(private.dp)?, bn(private.dq)?, bn(private.qinv)?)
            .map_err(status::ossl(NativeOp::ImportKey))?
            .build();
        let key = PKey::from_rsa(rsa).map_err(status::ossl(NativeOp::ImportKey))?;
        Ok(Self { key })
    }

    /// Generates a key pair of `bits` bits and reads its components back.
    ///
    /// # Errors
    ///
    /// * `CryptoError::ProviderOperationFailed` - If generation fails or the
    ///   generated key lacks CRT parameters
    pub(crate) fn generate(
        _provider: &NativeProviderHandle,
        bits: usize,
    ) -> Result<RsaPrivateKey, CryptoError> {
        let bits = u32::try_from(bits).map_err(|_| CryptoError::InvalidKeySize)?;
        let exponent = BigNum::from_u32(RSA_PUBLIC_EXPONENT)
            .map_err(status::ossl(NativeOp::GenerateKey))?;
        let rsa =
            Rsa::generate_with_e(bits, &exponent).map_err(status::ossl(NativeOp::GenerateKey))?;

        let missing = || status::translate(NativeOp::ExportKey, ProviderStatus::UNSPECIFIED);
        let public = RsaPublicKey::from_parts(to_bigint(rsa.n()), to_bigint(rsa.e()));
        Ok(RsaPrivateKey::from_parts(
            public,
            to_bigint(rsa.d()),
            to_bigint(rsa.p().ok_or_else(missing)?),
            to_bigint(rsa.q().ok_or_else(missing)?),
            to_bigint(rsa.dmp1().ok_or_else(missing)?),
            to_bigint(rsa.dmq1().ok_or_else(missing)?),
            to_bigint(rsa.iqmp().ok_or_else(missing)?),
        ))
    }

    pub(crate) fn pkey(&self) -> &PKeyRef<Private> {
        &self.key
    }
}

fn bn(bytes: &[u8]) -> Result<BigNum, CryptoError> {
    BigNum::from_slice(bytes).map_err(status::ossl(NativeOp::ImportKey))
}

fn to_bigint(bn: &BigNumRef) -> BigInt {
    let bytes = Zeroizing::new(bn.to_vec());
    BigInt::from_be_bytes(&bytes)
}
