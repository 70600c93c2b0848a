// Copyright (C) Microsoft Corporation. All rights reserved.

//! Translation of native engine failures into [`CryptoError`].
//!
//! Every failing native call is funneled through [`translate`], which picks
//! the error variant from the kind of operation that failed rather than from
//! the raw status. This keeps decryption failures uniform (no padding oracle)
//! and keeps verification failures distinct from everything else.

use std::fmt;

use super::*;

/// Raw status code reported by the native engine.
///
/// On Windows this is the `NTSTATUS` returned by CNG. On Linux it is the
/// packed OpenSSL error code of the first entry on the thread's error queue,
/// or zero when the queue was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ProviderStatus(u64);

impl ProviderStatus {
    /// Status used when the engine failed without reporting a code.
    pub const UNSPECIFIED: ProviderStatus = ProviderStatus(0);

    /// Wraps a raw native status code.
    pub const fn from_raw(code: u64) -> Self {
        Self(code)
    }

    /// Returns the raw native status code.
    pub const fn code(&self) -> u64 {
        self.0
    }

    /// Returns `true` for statuses that signal a temporary lack of resources.
    #[cfg(target_os = "windows")]
    pub fn is_transient(&self) -> bool {
        use windows::Win32::Foundation::STATUS_INSUFFICIENT_RESOURCES;
        use windows::Win32::Foundation::STATUS_NO_MEMORY;

        [STATUS_INSUFFICIENT_RESOURCES, STATUS_NO_MEMORY]
            .iter()
            .any(|status| status.0 as u32 as u64 == self.0)
    }

    /// Returns `true` for statuses that signal a temporary lack of resources.
    ///
    /// OpenSSL does not report any failure as transient.
    #[cfg(not(target_os = "windows"))]
    pub fn is_transient(&self) -> bool {
        false
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Native call that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NativeOp {
    OpenProvider,
    CreateHash,
    HashData,
    FinishHash,
    DuplicateHash,
    GenerateKey,
    ImportKey,
    ExportKey,
    Encrypt,
    Decrypt,
    Sign,
    Verify,
}

impl NativeOp {
    fn name(self) -> &'static str {
        match self {
            NativeOp::OpenProvider => "open_provider",
            NativeOp::CreateHash => "create_hash",
            NativeOp::HashData => "hash_data",
            NativeOp::FinishHash => "finish_hash",
            NativeOp::DuplicateHash => "duplicate_hash",
            NativeOp::GenerateKey => "generate_key",
            NativeOp::ImportKey => "import_key",
            NativeOp::ExportKey => "export_key",
            NativeOp::Encrypt => "encrypt",
            NativeOp::Decrypt => "decrypt",
            NativeOp::Sign => "sign",
            NativeOp::Verify => "verify",
        }
    }
}

/// Maps a native failure to the crate's error taxonomy.
pub(crate) fn translate(op: NativeOp, status: ProviderStatus) -> CryptoError {
    match op {
        NativeOp::Decrypt => {
            tracing::error!(op = op.name(), %status, "native decryption failed");
            CryptoError::DecryptionFailed
        }
        NativeOp::Verify => {
            tracing::debug!(op = op.name(), %status, "native signature verification failed");
            CryptoError::SignatureVerificationFailed
        }
        _ => {
            tracing::error!(op = op.name(), %status, "native operation failed");
            CryptoError::ProviderOperationFailed(status)
        }
    }
}

#[cfg(target_os = "linux")]
impl From<&openssl::error::ErrorStack> for ProviderStatus {
    fn from(stack: &openssl::error::ErrorStack) -> Self {
        stack
            .errors()
            .first()
            .map_or(ProviderStatus::UNSPECIFIED, |error| {
                ProviderStatus(error.code() as u64)
            })
    }
}

/// Returns a `map_err` adapter translating an OpenSSL error stack for `op`.
#[cfg(target_os = "linux")]
pub(crate) fn ossl(op: NativeOp) -> impl FnOnce(openssl::error::ErrorStack) -> CryptoError {
    move |openssl_error_stack| {
        tracing::debug!(?openssl_error_stack);
        translate(op, ProviderStatus::from(&openssl_error_stack))
    }
}

/// Translates whatever is on the thread's OpenSSL error queue for `op`.
///
/// Used after raw `openssl-sys` calls, which report failure through their
/// return value and leave the details on the queue.
#[cfg(target_os = "linux")]
pub(crate) fn ossl_last(op: NativeOp) -> CryptoError {
    ossl(op)(openssl::error::ErrorStack::get())
}

#[cfg(target_os = "windows")]
impl From<windows::Win32::Foundation::NTSTATUS> for ProviderStatus {
    fn from(status: windows::Win32::Foundation::NTSTATUS) -> Self {
        ProviderStatus(status.0 as u32 as u64)
    }
}

/// Converts a CNG status into `Ok(())` or the translated error for `op`.
#[cfg(target_os = "windows")]
pub(crate) fn check(
    op: NativeOp,
    status: windows::Win32::Foundation::NTSTATUS,
) -> Result<(), CryptoError> {
    if status.is_ok() {
        Ok(())
    } else {
        Err(translate(op, status.into()))
    }
}

#[cfg(test)]
mod tests;
