// Copyright (C) Microsoft Corporation. All rights reserved.

//! OpenSSL-backed HMAC engine.
//!
//! The safe `openssl` wrappers expose HMAC only as a one-shot `Signer`, which
//! cannot be duplicated mid-stream. This backend therefore drives an
//! `HMAC_CTX` directly through `openssl-sys`, using `HMAC_CTX_copy` for the
//! non-mutating `sum` and `HMAC_Init_ex` with a null key for `reset`.

use std::ffi::c_int;
use std::ffi::c_uint;
use std::ffi::c_void;
use std::ptr;

use openssl::hash::MessageDigest;
use openssl_sys as ffi;

use super::*;

/// Streaming HMAC over an OpenSSL `HMAC_CTX`.
pub struct OsslHmac {
    algorithm: HashAlgorithm,
    _provider: NativeProviderHandle,
    ctx: HmacCtx,
    written: u64,
}

impl OsslHmac {
    /// Creates an HMAC engine for `algorithm` keyed with `key`.
    ///
    /// # Errors
    ///
    /// * `CryptoError::ProviderOperationFailed` - If OpenSSL cannot create or key the context
    pub fn new(algorithm: HashAlgorithm, key: &[u8]) -> Result<Self, CryptoError> {
        let provider = provider_registry().acquire(AlgorithmId::Hmac(algorithm))?;
        let md = provider.raw().message_digest()?;
        let mut ctx = HmacCtx::new()?;
        ctx.init(Some(key), Some(md))?;
        Ok(Self {
            algorithm,
            _provider: provider,
            ctx,
            written: 0,
        })
    }

    /// Hash algorithm underlying this HMAC.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

impl StreamingDigest for OsslHmac {
    fn write(&mut self, data: &[u8]) -> Result<usize, CryptoError> {
        self.ctx.update(data)?;
        self.written += data.len() as u64;
        Ok(data.len())
    }

    fn sum(&self, out: Option<&mut [u8]>) -> Result<usize, CryptoError> {
        let len = self.size();
        if let Some(out) = out {
            let out = digest_out(out, len)?;
            let mut copy = self.ctx.try_clone()?;
            copy.finish(out)?;
        }
        Ok(len)
    }

    fn reset(&mut self) -> Result<(), CryptoError> {
        // A null key and digest re-initialize with the ones already set.
        self.ctx.init(None, None)?;
        self.written = 0;
        Ok(())
    }

    fn size(&self) -> usize {
        self.algorithm.size()
    }

    fn block_size(&self) -> usize {
        self.algorithm.block_size()
    }

    fn bytes_written(&self) -> u64 {
        self.written
    }
}

/// Owned `HMAC_CTX`.
///
/// OpenSSL copies the key into the context, so no key material needs to be
/// kept on the Rust side. `HMAC_CTX_free` cleanses it.
struct HmacCtx(*mut ffi::HMAC_CTX);

// SAFETY: the context is exclusively owned and only mutated through `&mut self`.
#[allow(unsafe_code)]
unsafe impl Send for HmacCtx {}

impl HmacCtx {
    #[allow(unsafe_code)]
    fn new() -> Result<Self, CryptoError> {
        ffi::init();
        // SAFETY: HMAC_CTX_new has no preconditions; a null return is handled below.
        let ctx = unsafe { ffi::HMAC_CTX_new() };
        if ctx.is_null() {
            return Err(status::ossl_last(NativeOp::CreateHash));
        }
        Ok(Self(ctx))
    }

    /// Keys the context. `None` for either argument reuses the current value.
    #[allow(unsafe_code)]
    fn init(&mut self, key: Option<&[u8]>, md: Option<MessageDigest>) -> Result<(), CryptoError> {
        let (key_ptr, key_len) = match key {
            Some(key) => (
                key.as_ptr() as *const c_void,
                c_int::try_from(key.len()).map_err(|_| CryptoError::EncodingOverflow)?,
            ),
            None => (ptr::null(), 0),
        };
        let md_ptr = md.map_or(ptr::null(), |md| md.as_ptr());
        // SAFETY: self.0 is a live context; key_ptr is null or valid for key_len
        // bytes; md_ptr is null or a static EVP_MD; no engine is used.
        let rc = unsafe { ffi::HMAC_Init_ex(self.0, key_ptr, key_len, md_ptr, ptr::null_mut()) };
        if rc != 1 {
            return Err(status::ossl_last(NativeOp::CreateHash));
        }
        Ok(())
    }

    #[allow(unsafe_code)]
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        // SAFETY: self.0 is a live, keyed context and data is valid for reads.
        let rc = unsafe { ffi::HMAC_Update(self.0, data.as_ptr(), data.len()) };
        if rc != 1 {
            return Err(status::ossl_last(NativeOp::HashData));
        }
        Ok(())
    }

    #[allow(unsafe_code)]
    fn try_clone(&self) -> Result<Self, CryptoError> {
        let copy = Self::new()?;
        // SAFETY: both contexts are live; the source is only read.
        let rc = unsafe { ffi::HMAC_CTX_copy(copy.0, self.0) };
        if rc != 1 {
            return Err(status::ossl_last(NativeOp::DuplicateHash));
        }
        Ok(copy)
    }

    /// Writes the MAC into `out`, which must be exactly the digest size.
    #[allow(unsafe_code)]
    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        let mut len: c_uint = 0;
        // SAFETY: self.0 is a live context and out holds EVP_MD_size bytes,
        // the most HMAC_Final writes.
        let rc = unsafe { ffi::HMAC_Final(self.0, out.as_mut_ptr(), &mut len) };
        if rc != 1 || len as usize != out.len() {
            return Err(status::ossl_last(NativeOp::FinishHash));
        }
        Ok(())
    }
}

impl Drop for HmacCtx {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        // SAFETY: self.0 was returned by HMAC_CTX_new and is freed exactly once.
        unsafe { ffi::HMAC_CTX_free(self.0) };
    }
}
