// Copyright (C) Microsoft Corporation. All rights reserved.

//! RSA key values.
//!
//! Keys are plain collections of big integers. They carry no native handle;
//! a native key object is created from the key's blob for the duration of a
//! single operation and destroyed afterwards.

use std::fmt;

use super::*;

/// Checks that a modulus bit length lies within the supported range.
pub(crate) fn check_key_range(bits: usize) -> Result<(), CryptoError> {
    if (RSA_MIN_KEY_BITS..=RSA_MAX_KEY_BITS).contains(&bits) {
        Ok(())
    } else {
        tracing::debug!(bits, "RSA modulus size out of range");
        Err(CryptoError::InvalidKeySize)
    }
}

/// Checks that `bits` is a size the native engine can generate.
pub(crate) fn check_key_bits(bits: usize) -> Result<(), CryptoError> {
    check_key_range(bits)?;
    if bits % RSA_KEY_BITS_STEP != 0 {
        tracing::debug!(bits, "RSA modulus size is not a multiple of the key size step");
        return Err(CryptoError::InvalidKeySize);
    }
    Ok(())
}

/// RSA public key `(n, e)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    n: BigInt,
    e: BigInt,
}

impl RsaPublicKey {
    /// Creates a public key from its modulus and public exponent.
    ///
    /// # Errors
    ///
    /// * `CryptoError::InvalidKeySize` - If the modulus bit length is out of range
    /// * `CryptoError::InvalidPublicExponent` - If `e` is even or not in `(1, n)`
    pub fn new(n: BigInt, e: BigInt) -> Result<Self, CryptoError> {
        check_key_range(n.bit_len())?;
        if !e.is_odd() || e <= BigInt::from(1u64) || e >= n {
            return Err(CryptoError::InvalidPublicExponent);
        }
        Ok(Self { n, e })
    }

    pub(crate) fn from_parts(n: BigInt, e: BigInt) -> Self {
        Self { n, e }
    }

    /// Modulus.
    pub fn n(&self) -> &BigInt {
        &self.n
    }

    /// Public exponent.
    pub fn e(&self) -> &BigInt {
        &self.e
    }

    /// Modulus length in bytes, which is also the ciphertext and signature length.
    pub fn size(&self) -> usize {
        self.n.byte_len()
    }

    /// Modulus length in bits.
    pub fn bits(&self) -> usize {
        self.n.bit_len()
    }
}

/// RSA private key with CRT parameters.
///
/// Components are stored as given. Construction checks that every field fits
/// its blob slot but performs no arithmetic consistency checks; a key whose
/// components disagree is rejected by the native engine on first use.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    public: RsaPublicKey,
    d: BigInt,
    p: BigInt,
    q: BigInt,
    dp: BigInt,
    dq: BigInt,
    qinv: BigInt,
}

impl RsaPrivateKey {
    /// Creates a private key from its components.
    ///
    /// # Errors
    ///
    /// * `CryptoError::InvalidKeySize` - If the modulus bit length is out of range
    /// * `CryptoError::InvalidPublicExponent` - If `e` is even or not in `(1, n)`
    /// * `CryptoError::EncodingOverflow` - If a component is zero where it must not be,
    ///   or does not fit its field width
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        n: BigInt,
        e: BigInt,
        d: BigInt,
        p: BigInt,
        q: BigInt,
        dp: BigInt,
        dq: BigInt,
        qinv: BigInt,
    ) -> Result<Self, CryptoError> {
        let public = RsaPublicKey::new(n, e)?;
        let modulus_len = public.size();
        let prime_len = modulus_len.div_ceil(2);

        if p.is_zero() || q.is_zero() || d.is_zero() {
            return Err(CryptoError::EncodingOverflow);
        }
        let prime_fields = [&p, &q, &dp, &dq, &qinv];
        if prime_fields.iter().any(|v| v.byte_len() > prime_len) || d.byte_len() > modulus_len {
            return Err(CryptoError::EncodingOverflow);
        }

        Ok(Self::from_parts(public, d, p, q, dp, dq, qinv))
    }

    pub(crate) fn from_parts(
        public: RsaPublicKey,
        d: BigInt,
        p: BigInt,
        q: BigInt,
        dp: BigInt,
        dq: BigInt,
        qinv: BigInt,
    ) -> Self {
        Self {
            public,
            d,
            p,
            q,
            dp,
            dq,
            qinv,
        }
    }

    /// Modulus.
    pub fn n(&self) -> &BigInt {
        self.public.n()
    }

    /// Public exponent.
    pub fn e(&self) -> &BigInt {
        self.public.e()
    }

    /// Private exponent.
    pub fn d(&self) -> &BigInt {
        &self.d
    }

    /// First prime factor.
    pub fn p(&self) -> &BigInt {
        &self.p
    }

    /// Second prime factor.
    pub fn q(&self) -> &BigInt {
        &self.q
    }

    /// `d mod (p - 1)`.
    pub fn dp(&self) -> &BigInt {
        &self.dp
    }

    /// `d mod (q - 1)`.
    pub fn dq(&self) -> &BigInt {
        &self.dq
    }

    /// `q^-1 mod p`.
    pub fn qinv(&self) -> &BigInt {
        &self.qinv
    }

    /// Matching public key.
    pub fn public_key(&self) -> RsaPublicKey {
        self.public.clone()
    }

    /// Modulus length in bytes.
    pub fn size(&self) -> usize {
        self.public.size()
    }

    /// Modulus length in bits.
    pub fn bits(&self) -> usize {
        self.public.bits()
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}
