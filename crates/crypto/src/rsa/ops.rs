// Copyright (C) Microsoft Corporation. All rights reserved.

//! RSA entry points.
//!
//! Each function validates its inputs, acquires the cached RSA provider,
//! imports a native key object from the key's blob, runs one native
//! operation and drops the key object before returning.

use super::*;

/// Generates an RSA key pair with public exponent 65537.
///
/// Transient engine failures are retried up to [`KEYGEN_MAX_RETRIES`] more
/// times with exponential backoff.
///
/// # Errors
///
/// * `CryptoError::InvalidKeySize` - If `bits` is out of range or not a multiple of
///   [`RSA_KEY_BITS_STEP`], or the engine produced a modulus of another size
/// * `CryptoError::ProviderOperationFailed` - If generation keeps failing
#[tracing::instrument(skip_all, fields(bits = bits))]
pub fn generate_key_rsa(bits: usize) -> Result<RsaPrivateKey, CryptoError> {
    check_key_bits(bits)?;
    let provider = provider_registry().acquire(AlgorithmId::Rsa)?;
    let key = retry::execute_with_backoff(
        || {
            tracing::debug!("generating RSA key pair");
            RsaPrivateKeyObject::generate(&provider, bits)
        },
        CryptoError::is_transient,
        KEYGEN_MAX_RETRIES,
        retry::BACKOFF_BASE_MS,
    )?;
    if key.bits() != bits {
        tracing::error!(generated = key.bits(), "generated RSA modulus has the wrong size");
        return Err(CryptoError::InvalidKeySize);
    }
    Ok(key)
}

/// Builds a public key from big-endian `n` and `e`.
///
/// # Errors
///
/// * `CryptoError::InvalidKeySize` - If the modulus bit length is out of range
/// * `CryptoError::InvalidPublicExponent` - If `e` is even or not in `(1, n)`
pub fn new_public_key_rsa(n: &[u8], e: &[u8]) -> Result<RsaPublicKey, CryptoError> {
    RsaPublicKey::new(BigInt::from_be_bytes(n), BigInt::from_be_bytes(e))
}

/// Builds a private key from big-endian components.
///
/// # Errors
///
/// See [`RsaPrivateKey::new`].
#[allow(clippy::too_many_arguments)]
pub fn new_private_key_rsa(
    n: &[u8],
    e: &[u8],
    d: &[u8],
    p: &[u8],
    q: &[u8],
    dp: &[u8],
    dq: &[u8],
    qinv: &[u8],
) -> Result<RsaPrivateKey, CryptoError> {
    RsaPrivateKey::new(
        BigInt::from_be_bytes(n),
        BigInt::from_be_bytes(e),
        BigInt::from_be_bytes(d),
        BigInt::from_be_bytes(p),
        BigInt::from_be_bytes(q),
        BigInt::from_be_bytes(dp),
        BigInt::from_be_bytes(dq),
        BigInt::from_be_bytes(qinv),
    )
}

/// Encrypts `msg` with PKCS#1 v1.5 padding.
///
/// # Errors
///
/// * `CryptoError::MessageTooLong` - If `msg` is longer than `k - 11` bytes
pub fn encrypt_rsa_pkcs1(key: &RsaPublicKey, msg: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_message_len(key, msg, PKCS1_ENCRYPTION_OVERHEAD)?;
    encrypt(key, &RsaEncryptAlgo::with_pkcs1_padding(), msg)
}

/// Decrypts a PKCS#1 v1.5 ciphertext.
///
/// # Errors
///
/// * `CryptoError::DecryptionFailed` - On any failure
pub fn decrypt_rsa_pkcs1(key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    decrypt(key, &RsaEncryptAlgo::with_pkcs1_padding(), ciphertext)
}

/// Encrypts `msg` with OAEP padding using `hash` for both the label hash and MGF1.
///
/// # Errors
///
/// * `CryptoError::MessageTooLong` - If `msg` is longer than `k - 2 * hLen - 2` bytes
pub fn encrypt_rsa_oaep(
    hash: HashAlgorithm,
    key: &RsaPublicKey,
    msg: &[u8],
    label: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_message_len(key, msg, 2 * hash.size() + 2)?;
    encrypt(key, &RsaEncryptAlgo::with_oaep_padding(hash, label), msg)
}

/// Decrypts an OAEP ciphertext.
///
/// # Errors
///
/// * `CryptoError::DecryptionFailed` - On any failure, including a label mismatch
pub fn decrypt_rsa_oaep(
    hash: HashAlgorithm,
    key: &RsaPrivateKey,
    ciphertext: &[u8],
    label: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    decrypt(key, &RsaEncryptAlgo::with_oaep_padding(hash, label), ciphertext)
}

/// Applies the raw public-key operation to a modulus-length block.
///
/// # Errors
///
/// * `CryptoError::BufferLengthMismatch` - If `msg` is not exactly `k` bytes
pub fn encrypt_rsa_no_padding(key: &RsaPublicKey, msg: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_block_len(key.size(), msg)?;
    encrypt(key, &RsaEncryptAlgo::with_no_padding(), msg)
}

/// Applies the raw private-key operation to a modulus-length block.
///
/// # Errors
///
/// * `CryptoError::BufferLengthMismatch` - If `ciphertext` is not exactly `k` bytes
/// * `CryptoError::DecryptionFailed` - On any engine failure
pub fn decrypt_rsa_no_padding(
    key: &RsaPrivateKey,
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    check_block_len(key.size(), ciphertext)?;
    decrypt(key, &RsaEncryptAlgo::with_no_padding(), ciphertext)
}

/// Signs with PKCS#1 v1.5 padding.
///
/// With `Some(hash)`, `hashed` must be a digest of that algorithm and is
/// wrapped in its `DigestInfo`. With `None`, `hashed` is signed as given.
///
/// # Errors
///
/// * `CryptoError::BufferLengthMismatch` - If `hashed` is not the digest size
pub fn sign_rsa_pkcs1v15(
    key: &RsaPrivateKey,
    hash: Option<HashAlgorithm>,
    hashed: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if let Some(hash) = hash {
        check_digest_len(hash, hashed)?;
    }
    sign(key, &RsaSignAlgo::with_pkcs1_padding(hash), hashed)
}

/// Verifies a PKCS#1 v1.5 signature.
///
/// # Errors
///
/// * `CryptoError::SignatureVerificationFailed` - On any mismatch
pub fn verify_rsa_pkcs1v15(
    key: &RsaPublicKey,
    hash: Option<HashAlgorithm>,
    hashed: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    if hash.is_some_and(|hash| hashed.len() != hash.size()) {
        return Err(CryptoError::SignatureVerificationFailed);
    }
    verify(key, &RsaSignAlgo::with_pkcs1_padding(hash), hashed, signature)
}

/// Signs a digest with PSS padding.
///
/// A `salt_len` of [`PSS_SALT_LENGTH_AUTO`] uses a salt as long as the digest.
///
/// # Errors
///
/// * `CryptoError::BufferLengthMismatch` - If `hashed` is not the digest size
/// * `CryptoError::InvalidSaltLength` - If the salt does not fit the key
pub fn sign_rsa_pss(
    key: &RsaPrivateKey,
    hash: HashAlgorithm,
    hashed: &[u8],
    salt_len: usize,
) -> Result<Vec<u8>, CryptoError> {
    check_digest_len(hash, hashed)?;
    let salt_len = pss_salt_len(key.bits(), hash, salt_len)?;
    sign(key, &RsaSignAlgo::with_pss_padding(hash, salt_len), hashed)
}

/// Verifies a PSS signature.
///
/// `salt_len` is resolved the same way as in [`sign_rsa_pss`].
///
/// # Errors
///
/// * `CryptoError::InvalidSaltLength` - If the salt does not fit the key
/// * `CryptoError::SignatureVerificationFailed` - On any mismatch
pub fn verify_rsa_pss(
    key: &RsaPublicKey,
    hash: HashAlgorithm,
    hashed: &[u8],
    signature: &[u8],
    salt_len: usize,
) -> Result<(), CryptoError> {
    let salt_len = pss_salt_len(key.bits(), hash, salt_len)?;
    if hashed.len() != hash.size() {
        return Err(CryptoError::SignatureVerificationFailed);
    }
    verify(key, &RsaSignAlgo::with_pss_padding(hash, salt_len), hashed, signature)
}

fn encrypt(
    key: &RsaPublicKey,
    algo: &RsaEncryptAlgo<'_>,
    msg: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let provider = provider_registry().acquire(AlgorithmId::Rsa)?;
    let blob = KeyBlob::from_public_key(key)?;
    let object = RsaPublicKeyObject::import(&provider, &blob)?;
    algo.encrypt(&object, msg)
}

fn decrypt(
    key: &RsaPrivateKey,
    algo: &RsaEncryptAlgo<'_>,
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let provider = provider_registry().acquire(AlgorithmId::Rsa)?;
    let blob = KeyBlob::from_private_key(key)?;
    let object = RsaPrivateKeyObject::import(&provider, &blob)?;
    algo.decrypt(&object, ciphertext)
}

fn sign(key: &RsaPrivateKey, algo: &RsaSignAlgo, hashed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let provider = provider_registry().acquire(AlgorithmId::Rsa)?;
    let blob = KeyBlob::from_private_key(key)?;
    let object = RsaPrivateKeyObject::import(&provider, &blob)?;
    algo.sign(&object, hashed)
}

fn verify(
    key: &RsaPublicKey,
    algo: &RsaSignAlgo,
    hashed: &[u8],
    signature: &[u8],
) -> Result<(), CryptoError> {
    if signature.len() != key.size() {
        tracing::debug!(
            expected = key.size(),
            actual = signature.len(),
            "RSA signature has the wrong length"
        );
        return Err(CryptoError::SignatureVerificationFailed);
    }
    let provider = provider_registry().acquire(AlgorithmId::Rsa)?;
    let blob = KeyBlob::from_public_key(key)?;
    let object = RsaPublicKeyObject::import(&provider, &blob)?;
    algo.verify(&object, hashed, signature)
}

fn check_message_len(key: &RsaPublicKey, msg: &[u8], overhead: usize) -> Result<(), CryptoError> {
    match key.size().checked_sub(overhead) {
        Some(max) if msg.len() <= max => Ok(()),
        _ => Err(CryptoError::MessageTooLong),
    }
}

fn check_block_len(expected: usize, input: &[u8]) -> Result<(), CryptoError> {
    if input.len() == expected {
        Ok(())
    } else {
        Err(CryptoError::BufferLengthMismatch {
            expected,
            actual: input.len(),
        })
    }
}

fn check_digest_len(hash: HashAlgorithm, hashed: &[u8]) -> Result<(), CryptoError> {
    check_block_len(hash.size(), hashed)
}

/// Resolves a requested PSS salt length against the key and digest.
///
/// The largest salt that fits is `emLen - hLen - 2`, where
/// `emLen = ceil((modBits - 1) / 8)`.
pub(crate) fn pss_salt_len(
    key_bits: usize,
    hash: HashAlgorithm,
    salt_len: usize,
) -> Result<usize, CryptoError> {
    let em_len = key_bits.saturating_sub(1).div_ceil(8);
    let max = em_len
        .checked_sub(hash.size() + 2)
        .ok_or(CryptoError::InvalidSaltLength)?;
    let salt_len = if salt_len == PSS_SALT_LENGTH_AUTO {
        hash.size()
    } else {
        salt_len
    };
    if salt_len > max {
        return Err(CryptoError::InvalidSaltLength);
    }
    Ok(salt_len)
}
