// Copyright (C) Microsoft Corporation. All rights reserved.

//! RSA key blob codec.
//!
//! The blob is the fixed-layout key encoding handed to the native engine. It
//! follows the `BCRYPT_RSAKEY_BLOB` format: six little-endian `u32` header
//! words (`Magic`, `BitLength`, `cbPublicExp`, `cbModulus`, `cbPrime1`,
//! `cbPrime2`) followed by big-endian fields, each left-padded with zeros to
//! the width recorded in the header.
//!
//! | Kind         | Magic  | Fields                                   |
//! |--------------|--------|------------------------------------------|
//! | Public       | `RSA1` | e, n                                     |
//! | Full private | `RSA3` | e, n, p, q, dp, dq, qinv, d              |
//!
//! Prime-sized fields (`p`, `dp`, `qinv` and `q`, `dq`) are
//! `ceil(cbModulus / 2)` bytes wide. `d` is `cbModulus` bytes wide.
//!
//! The buffer is zeroized when the blob is dropped.

use std::ops::Range;

use zeroize::Zeroize;

use super::*;

/// `BCRYPT_RSAPUBLIC_MAGIC` ("RSA1").
pub(crate) const RSA_PUBLIC_MAGIC: u32 = 0x3141_5352;

/// `BCRYPT_RSAFULLPRIVATE_MAGIC` ("RSA3").
pub(crate) const RSA_FULL_PRIVATE_MAGIC: u32 = 0x3341_5352;

const HEADER_LEN: usize = 6 * std::mem::size_of::<u32>();

/// Which key material a blob carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlobKind {
    Public,
    FullPrivate,
}

impl BlobKind {
    fn magic(self) -> u32 {
        match self {
            BlobKind::Public => RSA_PUBLIC_MAGIC,
            BlobKind::FullPrivate => RSA_FULL_PRIVATE_MAGIC,
        }
    }

    fn from_magic(magic: u32) -> Option<Self> {
        match magic {
            RSA_PUBLIC_MAGIC => Some(BlobKind::Public),
            RSA_FULL_PRIVATE_MAGIC => Some(BlobKind::FullPrivate),
            _ => None,
        }
    }
}

/// Decoded blob header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlobHeader {
    magic: u32,
    bit_len: u32,
    public_exp_len: u32,
    modulus_len: u32,
    prime1_len: u32,
    prime2_len: u32,
}

impl BlobHeader {
    fn for_key(kind: BlobKind, n: &BigInt, e: &BigInt) -> Result<Self, CryptoError> {
        let modulus_len = n.byte_len();
        let prime_len = match kind {
            BlobKind::Public => 0,
            BlobKind::FullPrivate => modulus_len.div_ceil(2),
        };
        Ok(Self {
            magic: kind.magic(),
            bit_len: to_u32(n.bit_len())?,
            public_exp_len: to_u32(e.byte_len())?,
            modulus_len: to_u32(modulus_len)?,
            prime1_len: to_u32(prime_len)?,
            prime2_len: to_u32(prime_len)?,
        })
    }

    fn read(blob: &[u8]) -> Result<Self, CryptoError> {
        let header = blob.get(..HEADER_LEN).ok_or(CryptoError::EncodingOverflow)?;
        let mut words = header
            .chunks_exact(4)
            .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]));
        let mut next = || words.next().ok_or(CryptoError::EncodingOverflow);
        Ok(Self {
            magic: next()?,
            bit_len: next()?,
            public_exp_len: next()?,
            modulus_len: next()?,
            prime1_len: next()?,
            prime2_len: next()?,
        })
    }

    fn write(&self, out: &mut [u8]) {
        let words = [
            self.magic,
            self.bit_len,
            self.public_exp_len,
            self.modulus_len,
            self.prime1_len,
            self.prime2_len,
        ];
        for (chunk, word) in out.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
    }

    /// Field widths in blob order.
    fn field_widths(&self, kind: BlobKind) -> Vec<usize> {
        let e = self.public_exp_len as usize;
        let n = self.modulus_len as usize;
        let p1 = self.prime1_len as usize;
        let p2 = self.prime2_len as usize;
        match kind {
            BlobKind::Public => vec![e, n],
            BlobKind::FullPrivate => vec![e, n, p1, p2, p1, p2, p1, n],
        }
    }

    /// Byte ranges of each field in blob order, starting after the header.
    fn field_ranges(&self, kind: BlobKind) -> Vec<Range<usize>> {
        let mut offset = HEADER_LEN;
        self.field_widths(kind)
            .into_iter()
            .map(|width| {
                let range = offset..offset + width;
                offset += width;
                range
            })
            .collect()
    }
}

fn to_u32(value: usize) -> Result<u32, CryptoError> {
    u32::try_from(value).map_err(|_| CryptoError::EncodingOverflow)
}

/// Serialized RSA key in the native blob layout.
pub(crate) struct KeyBlob {
    kind: BlobKind,
    bytes: Vec<u8>,
    fields: Vec<Range<usize>>,
}

/// Borrowed view of the fields of a full-private blob.
pub(crate) struct PrivateFields<'a> {
    pub(crate) p: &'a [u8],
    pub(crate) q: &'a [u8],
    pub(crate) dp: &'a [u8],
    pub(crate) dq: &'a [u8],
    pub(crate) qinv: &'a [u8],
    pub(crate) d: &'a [u8],
}

/// Borrowed view of the fields of a blob.
///
/// Fields keep their fixed-width padding.
pub(crate) struct BlobFields<'a> {
    pub(crate) e: &'a [u8],
    pub(crate) n: &'a [u8],
    pub(crate) private: Option<PrivateFields<'a>>,
}

impl KeyBlob {
    /// Encodes a public key as an `RSA1` blob.
    pub(crate) fn from_public_key(key: &RsaPublicKey) -> Result<Self, CryptoError> {
        Self::build(BlobKind::Public, key.n(), key.e(), None)
    }

    /// Encodes a private key as an `RSA3` blob.
    pub(crate) fn from_private_key(key: &RsaPrivateKey) -> Result<Self, CryptoError> {
        Self::build(BlobKind::FullPrivate, key.n(), key.e(), Some(key))
    }

    fn build(
        kind: BlobKind,
        n: &BigInt,
        e: &BigInt,
        private: Option<&RsaPrivateKey>,
    ) -> Result<Self, CryptoError> {
        let header = BlobHeader::for_key(kind, n, e)?;
        let fields = header.field_ranges(kind);
        let total = fields.last().map_or(HEADER_LEN, |last| last.end);

        // Construct first so the buffer is zeroized even if a field overflows.
        let mut blob = Self {
            kind,
            bytes: vec![0u8; total],
            fields,
        };
        header.write(&mut blob.bytes[..HEADER_LEN]);

        let mut values = vec![e, n];
        if let Some(key) = private {
            values.extend([key.p(), key.q(), key.dp(), key.dq(), key.qinv(), key.d()]);
        }
        for (value, range) in values.into_iter().zip(blob.fields.clone()) {
            value.write_fixed_be(&mut blob.bytes[range])?;
        }
        Ok(blob)
    }

    /// Parses and validates a blob produced by the native engine.
    ///
    /// # Errors
    ///
    /// * `CryptoError::EncodingOverflow` - If the magic is unknown, the buffer is
    ///   shorter or longer than the header says, or the bit length exceeds the
    ///   modulus width
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Result<Self, CryptoError> {
        let mut blob = Self {
            kind: BlobKind::Public,
            bytes,
            fields: Vec::new(),
        };
        let header = BlobHeader::read(&blob.bytes)?;
        blob.kind = BlobKind::from_magic(header.magic).ok_or(CryptoError::EncodingOverflow)?;
        if header.bit_len as usize > header.modulus_len as usize * 8 {
            return Err(CryptoError::EncodingOverflow);
        }

        blob.fields = header.field_ranges(blob.kind);
        let total = blob.fields.last().map_or(HEADER_LEN, |last| last.end);
        if blob.bytes.len() != total {
            tracing::debug!(
                expected = total,
                actual = blob.bytes.len(),
                "RSA key blob length does not match its header"
            );
            return Err(CryptoError::EncodingOverflow);
        }
        Ok(blob)
    }

    pub(crate) fn kind(&self) -> BlobKind {
        self.kind
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the blob's fields in their padded form.
    pub(crate) fn fields(&self) -> BlobFields<'_> {
        let field = |i: usize| {
            self.fields
                .get(i)
                .map_or(&[][..], |range| &self.bytes[range.clone()])
        };
        let private = match self.kind {
            BlobKind::Public => None,
            BlobKind::FullPrivate => Some(PrivateFields {
                p: field(2),
                q: field(3),
                dp: field(4),
                dq: field(5),
                qinv: field(6),
                d: field(7),
            }),
        };
        BlobFields {
            e: field(0),
            n: field(1),
            private,
        }
    }

    /// Decodes the public part of the blob. Works for either kind.
    pub(crate) fn to_public_key(&self) -> RsaPublicKey {
        let fields = self.fields();
        RsaPublicKey::from_parts(BigInt::from_be_bytes(fields.n), BigInt::from_be_bytes(fields.e))
    }

    /// Decodes a full-private blob into a private key.
    ///
    /// # Errors
    ///
    /// * `CryptoError::EncodingOverflow` - If the blob is a public blob
    pub(crate) fn to_private_key(&self) -> Result<RsaPrivateKey, CryptoError> {
        let fields = self.fields();
        let private = fields.private.ok_or(CryptoError::EncodingOverflow)?;
        Ok(RsaPrivateKey::from_parts(
            self.to_public_key(),
            BigInt::from_be_bytes(private.d),
            BigInt::from_be_bytes(private.p),
            BigInt::from_be_bytes(private.q),
            BigInt::from_be_bytes(private.dp),
            BigInt::from_be_bytes(private.dq),
            BigInt::from_be_bytes(private.qinv),
        ))
    }
}

impl Drop for KeyBlob {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}
