// Copyright (C) Microsoft Corporation. All rights reserved.

//! Unsigned big integers in minimal big-endian form.
//!
//! All integers crossing the public API are exchanged as big-endian byte
//! strings with no leading zero bytes. Key blobs need the same values as
//! fixed-width, left-zero-padded fields; [`BigInt::write_fixed_be`] performs
//! that widening and fails with [`CryptoError::EncodingOverflow`] when a value
//! is wider than its field.

use std::cmp::Ordering;
use std::fmt;

use zeroize::Zeroize;

use super::*;

/// Arbitrary-precision unsigned integer stored as minimal big-endian bytes.
///
/// Zero is represented by an empty byte string. The backing buffer is
/// zeroized on drop since these values carry private key material.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BigInt {
    bytes: Vec<u8>,
}

impl BigInt {
    /// Decodes a big-endian byte string, ignoring leading zero bytes.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        Self {
            bytes: bytes[start..].to_vec(),
        }
    }

    /// Returns the minimal big-endian encoding. Empty for zero.
    pub fn as_be_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the minimal big-endian encoding as an owned vector.
    pub fn to_be_vec(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Returns `true` if the value is zero.
    pub fn is_zero(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns `true` if the value is odd.
    pub fn is_odd(&self) -> bool {
        self.bytes.last().is_some_and(|b| b & 1 == 1)
    }

    /// Number of bytes in the minimal encoding.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Number of significant bits.
    pub fn bit_len(&self) -> usize {
        match self.bytes.first() {
            Some(&top) => self.bytes.len() * 8 - top.leading_zeros() as usize,
            None => 0,
        }
    }

    /// Encodes the value left-padded with zeros to exactly `width` bytes.
    pub fn to_fixed_be(&self, width: usize) -> Result<Vec<u8>, CryptoError> {
        let mut out = vec![0u8; width];
        self.write_fixed_be(&mut out)?;
        Ok(out)
    }

    /// Writes the value into `out`, left-padded with zeros to `out.len()` bytes.
    ///
    /// # Errors
    ///
    /// * `CryptoError::EncodingOverflow` - If the value needs more than `out.len()` bytes
    pub fn write_fixed_be(&self, out: &mut [u8]) -> Result<(), CryptoError> {
        let pad = out
            .len()
            .checked_sub(self.bytes.len())
            .ok_or(CryptoError::EncodingOverflow)?;
        out[..pad].fill(0);
        out[pad..].copy_from_slice(&self.bytes);
        Ok(())
    }
}

impl Drop for BigInt {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl From<u64> for BigInt {
    fn from(value: u64) -> Self {
        Self::from_be_bytes(&value.to_be_bytes())
    }
}

impl Ord for BigInt {
    fn cmp(&self, other: &Self) -> Ordering {
        // Minimal encodings: a longer one is always the larger value.
        self.bytes
            .len()
            .cmp(&other.bytes.len())
            .then_with(|| self.bytes.cmp(&other.bytes))
    }
}

impl PartialOrd for BigInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInt({} bits)", self.bit_len())
    }
}

#[cfg(feature = "num-bigint")]
impl From<&num_bigint::BigUint> for BigInt {
    fn from(value: &num_bigint::BigUint) -> Self {
        Self::from_be_bytes(&value.to_bytes_be())
    }
}

#[cfg(feature = "num-bigint")]
impl From<num_bigint::BigUint> for BigInt {
    fn from(value: num_bigint::BigUint) -> Self {
        Self::from(&value)
    }
}

#[cfg(feature = "num-bigint")]
impl From<&BigInt> for num_bigint::BigUint {
    fn from(value: &BigInt) -> Self {
        num_bigint::BigUint::from_bytes_be(value.as_be_bytes())
    }
}
