//! Authentication tag derivation and verification
//!
//! The full tag block is S = E(K, J0) xor GHASH. A tag of `t` bytes is the
//! leading `t` bytes of S; verification compares those bytes in constant time.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::block_cipher::BlockCipher;
use crate::config::{TagLength, BLOCK_SIZE, MAX_TAG_SIZE};

/// An authentication tag of 8 to 16 bytes
#[derive(Clone, Copy, Eq)]
pub struct Tag {
    bytes: [u8; MAX_TAG_SIZE],
    len: TagLength,
}

impl Tag {
    /// Truncate a full tag block to `len` bytes
    pub fn from_block(block: &[u8; BLOCK_SIZE], len: TagLength) -> Self {
        let mut bytes = [0u8; MAX_TAG_SIZE];
        bytes[..len.bytes()].copy_from_slice(&block[..len.bytes()]);
        Self { bytes, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len.bytes()]
    }

    pub fn len(&self) -> usize {
        self.len.bytes()
    }

    pub fn tag_length(&self) -> TagLength {
        self.len
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Constant-time comparison against a received tag
    ///
    /// A length mismatch is reported as a mismatch without inspecting the bytes.
    pub fn verify(&self, received: &[u8]) -> bool {
        if received.len() != self.len() {
            return false;
        }
        bool::from(self.as_bytes().ct_eq(received))
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.verify(other.as_bytes())
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag(")?;
        for byte in self.as_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

/// S = E(K, J0) xor GHASH
pub fn compute_tag_block<C: BlockCipher + ?Sized>(
    cipher: &C,
    j0: &[u8; BLOCK_SIZE],
    ghash_value: &[u8; BLOCK_SIZE],
) -> [u8; BLOCK_SIZE] {
    let mut mask = cipher.encrypt_block(j0);
    let mut s = [0u8; BLOCK_SIZE];
    for (out, (m, g)) in s.iter_mut().zip(mask.iter().zip(ghash_value.iter())) {
        *out = m ^ g;
    }
    mask.zeroize();
    s
}

/// Compare the leading bytes of a full tag block against a received tag
///
/// The received length must already be validated as a legal tag length.
pub fn verify_tag(expected: &[u8; BLOCK_SIZE], received: &[u8]) -> bool {
    if received.is_empty() || received.len() > BLOCK_SIZE {
        return false;
    }
    bool::from(expected[..received.len()].ct_eq(received))
}
