// Copyright (C) Microsoft Corporation. All rights reserved.

//! Windows CNG RSA key objects.
//!
//! The native key object is a `BCRYPT_KEY_HANDLE` imported from a key blob on
//! the cached RSA provider. Public and private key objects share one type; the
//! blob kind decides which operations CNG allows on it.

use windows::core::PCWSTR;
use windows::Win32::Security::Cryptography::*;

use super::*;

/// RAII wrapper for a Windows CNG RSA key handle.
///
/// The handle is destroyed when the wrapper is dropped.
pub struct CngRsaKeyObject {
    handle: BCRYPT_KEY_HANDLE,
}

impl CngRsaKeyObject {
    /// Imports `blob` on the provider's algorithm handle.
    ///
    /// # Errors
    ///
    /// * `CryptoError::ProviderOperationFailed` - If CNG rejects the blob
    #[allow(unsafe_code)]
    pub(crate) fn import(provider: &NativeProviderHandle, blob: &KeyBlob) -> Result<Self, CryptoError> {
        let mut handle = BCRYPT_KEY_HANDLE::default();
        // SAFETY: BCryptImportKeyPair on the RSA provider.
        // - the provider guard keeps the algorithm handle open
        // - blob_type agrees with the magic in the blob header
        // - the blob is only read and outlives the call
        let status = unsafe {
            BCryptImportKeyPair(
                provider.raw().handle(),
                None,
                blob_type(blob.kind()),
                &mut handle,
                blob.as_bytes(),
                0,
            )
        };
        status::check(NativeOp::ImportKey, status)?;
        Ok(Self { handle })
    }

    /// Generates a key pair of `bits` bits and reads its components back
    /// through a full-private blob export.
    ///
    /// # Errors
    ///
    /// * `CryptoError::ProviderOperationFailed` - If generation or export fails
    /// * `CryptoError::EncodingOverflow` - If the exported blob is malformed
    #[allow(unsafe_code)]
    pub(crate) fn generate(
        provider: &NativeProviderHandle,
        bits: usize,
    ) -> Result<RsaPrivateKey, CryptoError> {
        let bits = u32::try_from(bits).map_err(|_| CryptoError::InvalidKeySize)?;
        let mut handle = BCRYPT_KEY_HANDLE::default();
        // SAFETY: the provider guard keeps the algorithm handle open and
        // `handle` is a local out parameter.
        let status =
            unsafe { BCryptGenerateKeyPair(provider.raw().handle(), &mut handle, bits, 0) };
        status::check(NativeOp::GenerateKey, status)?;
        let key = Self { handle };

        // SAFETY: key.handle came from the successful BCryptGenerateKeyPair above.
        let status = unsafe { BCryptFinalizeKeyPair(key.handle, 0) };
        status::check(NativeOp::GenerateKey, status)?;

        key.export()?.to_private_key()
    }

    /// Exports the key as a full-private blob.
    #[allow(unsafe_code)]
    fn export(&self) -> Result<KeyBlob, CryptoError> {
        let blob_type = blob_type(BlobKind::FullPrivate);

        let mut len = 0u32;
        // SAFETY: size query on a live key handle; no output buffer is passed.
        let status = unsafe { BCryptExportKey(self.handle, None, blob_type, None, &mut len, 0) };
        status::check(NativeOp::ExportKey, status)?;

        let mut data = vec![0u8; len as usize];
        // SAFETY: `data` has the length CNG reported for this blob type.
        let status = unsafe {
            BCryptExportKey(self.handle, None, blob_type, Some(&mut data), &mut len, 0)
        };
        data.truncate(len as usize);
        // Wrap before checking so the buffer is zeroized on every path.
        let blob = KeyBlob::from_bytes(data);
        status::check(NativeOp::ExportKey, status)?;
        blob
    }

    /// Raw key handle, valid while `self` lives.
    pub(crate) fn handle(&self) -> BCRYPT_KEY_HANDLE {
        self.handle
    }
}

impl Drop for CngRsaKeyObject {
    /// Destroys the Windows CNG key handle.
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        // SAFETY: the handle is owned by this object and destroyed only here.
        let status = unsafe { BCryptDestroyKey(self.handle) };
        if status.is_err() {
            tracing::error!(?status, "BCryptDestroyKey failed");
        }
    }
}

fn blob_type(kind: BlobKind) -> PCWSTR {
    match kind {
        BlobKind::Public => BCRYPT_RSAPUBLIC_BLOB,
        BlobKind::FullPrivate => BCRYPT_RSAFULLPRIVATE_BLOB,
    }
}
