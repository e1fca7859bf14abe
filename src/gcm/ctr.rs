//! Counter-mode keystream generation for GCM
//!
//! The pre-counter block J0 is derived from the IV and reserved for masking
//! the tag. Data blocks use inc32(J0), inc32(inc32(J0)), ... where only the
//! low 32 bits of the block take part in the increment.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::ghash::ghash;
use crate::block_cipher::BlockCipher;
use crate::config::{GhashBackend, BLOCK_SIZE, STANDARD_IV_SIZE};

/// Derive J0 from an IV
///
/// A 96-bit IV becomes IV || 0^31 || 1. Any other length is hashed:
/// J0 = GHASH_H(IV || 0-pad || 0^64 || [len(IV)]_64).
pub fn derive_j0(h: &[u8; BLOCK_SIZE], backend: GhashBackend, iv: &[u8]) -> [u8; BLOCK_SIZE] {
    if iv.len() == STANDARD_IV_SIZE {
        let mut j0 = [0u8; BLOCK_SIZE];
        j0[..STANDARD_IV_SIZE].copy_from_slice(iv);
        j0[BLOCK_SIZE - 1] = 1;
        j0
    } else {
        ghash(h, backend, iv, 0, (iv.len() as u64) * 8)
    }
}

/// Increment the low 32 bits of a counter block, modulo 2^32
#[inline]
pub fn inc32(block: &mut [u8; BLOCK_SIZE]) {
    let mut low = [0u8; 4];
    low.copy_from_slice(&block[12..]);
    let next = u32::from_be_bytes(low).wrapping_add(1);
    block[12..].copy_from_slice(&next.to_be_bytes());
}

/// Current counter block of a message
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Counter {
    block: [u8; BLOCK_SIZE],
}

impl Counter {
    /// First data counter for a message: inc32(J0)
    pub fn new(j0: &[u8; BLOCK_SIZE]) -> Self {
        let mut block = *j0;
        inc32(&mut block);
        Self { block }
    }

    pub fn block(&self) -> &[u8; BLOCK_SIZE] {
        &self.block
    }

    /// Encrypt the current counter and advance to the next one
    pub fn next_keystream<C: BlockCipher + ?Sized>(&mut self, cipher: &C) -> [u8; BLOCK_SIZE] {
        let keystream = cipher.encrypt_block(&self.block);
        inc32(&mut self.block);
        keystream
    }
}

impl std::fmt::Debug for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Counter([REDACTED])")
    }
}

/// XOR `keystream` into `data`, byte for byte
#[inline]
pub fn xor_in_place(data: &mut [u8], keystream: &[u8]) {
    for (byte, key) in data.iter_mut().zip(keystream) {
        *byte ^= key;
    }
}
