// Copyright (C) Microsoft Corporation. All rights reserved.

//! HMAC (Hash-based Message Authentication Code) engine.
//!
//! HMAC satisfies the same [`StreamingDigest`] contract as a plain digest:
//! incremental writes, a non-mutating `sum` and a `reset` that keeps the
//! key supplied at construction. [`Hmac`] names the backend type for the
//! current platform.
//!
//! # Supported Hash Functions
//!
//! Every [`HashAlgorithm`]. SHA-256 or stronger is recommended.
//!
//! # Platform Support
//!
//! - **Linux**: OpenSSL `HMAC_CTX`, duplicated with `HMAC_CTX_copy`
//! - **Windows**: CNG keyed hash objects, duplicated with `BCryptDuplicateHash`
//!
//! # Security Considerations
//!
//! - Key material retained for `reset` is zeroized when the engine is dropped
//! - An empty key is accepted, as RFC 2104 allows

use super::*;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        mod hmac_ossl;
    } else if #[cfg(target_os = "windows")] {
        mod hmac_cng;
    } else {
        compile_error!("Unsupported target OS for HMAC implementation");
    }
}

define_type!(pub Hmac, hmac_ossl::OsslHmac, hmac_cng::CngHmac);

#[cfg(test)]
mod tests;
