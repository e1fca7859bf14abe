//! GHASH: the GF(2^128) polynomial hash of GCM
//!
//! Field elements are 16-byte blocks read as big-endian `u128` values. Bit 127
//! of the integer is the coefficient of x^0 and bit 0 the coefficient of
//! x^127, so multiplying by x is a right shift and the reduction polynomial
//! x^128 + x^7 + x^2 + x + 1 folds back in as `0xE1 << 120`.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{GhashBackend, BLOCK_SIZE};

/// x^128 + x^7 + x^2 + x + 1 without the x^128 term, in GCM bit order
const R: u128 = 0xE1 << 120;

/// Multiply a field element by x
#[inline(always)]
fn mul_x(v: u128) -> u128 {
    let carry = 0u128.wrapping_sub(v & 1);
    (v >> 1) ^ (R & carry)
}

/// Bit-by-bit multiplication in GF(2^128)
///
/// Branch-free: every iteration does the same work whatever the operand bits.
pub fn gf128_mul(x: u128, y: u128) -> u128 {
    let mut z = 0u128;
    let mut v = y;

    for i in 0..128 {
        let bit = (x >> (127 - i)) & 1;
        z ^= v & 0u128.wrapping_sub(bit);
        v = mul_x(v);
    }

    z
}

/// Multiples of H for every 4-bit polynomial
///
/// `entries[n]` holds p(n)·H where the nibble `n` is read most significant bit
/// first, matching the way nibbles are cut out of a field element.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Gf128Table {
    entries: [u128; 16],
}

impl Gf128Table {
    pub fn new(h: u128) -> Self {
        // h·x^0 .. h·x^3
        let mut powers = [0u128; 4];
        powers[0] = h;
        for b in 1..4 {
            powers[b] = mul_x(powers[b - 1]);
        }

        let mut entries = [0u128; 16];
        for (n, entry) in entries.iter_mut().enumerate() {
            for (b, power) in powers.iter().enumerate() {
                if (n >> (3 - b)) & 1 == 1 {
                    *entry ^= *power;
                }
            }
        }
        powers.zeroize();

        Self { entries }
    }

    /// x·H using Horner's rule over the 32 nibbles of x, highest degree first
    pub fn mul(&self, x: u128) -> u128 {
        let mut z = 0u128;
        for j in (0..32).rev() {
            for _ in 0..4 {
                z = mul_x(z);
            }
            let nibble = ((x >> (124 - 4 * j)) & 0xF) as usize;
            z ^= self.entries[nibble];
        }
        z
    }
}

impl std::fmt::Debug for Gf128Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Gf128Table([REDACTED])")
    }
}

#[derive(Clone, PartialEq, Eq)]
enum Multiplier {
    Bitwise { h: u128 },
    Table(Gf128Table),
}

impl Multiplier {
    fn new(h: u128, backend: GhashBackend) -> Self {
        match backend {
            GhashBackend::Bitwise => Multiplier::Bitwise { h },
            GhashBackend::Table => Multiplier::Table(Gf128Table::new(h)),
        }
    }

    #[inline]
    fn mul(&self, x: u128) -> u128 {
        match self {
            Multiplier::Bitwise { h } => gf128_mul(x, *h),
            Multiplier::Table(table) => table.mul(x),
        }
    }
}

impl Zeroize for Multiplier {
    fn zeroize(&mut self) {
        match self {
            Multiplier::Bitwise { h } => h.zeroize(),
            Multiplier::Table(table) => table.zeroize(),
        }
    }
}

/// Running GHASH accumulator keyed by the hash subkey H
#[derive(Clone, PartialEq, Eq)]
pub struct Ghash {
    multiplier: Multiplier,
    acc: u128,
}

impl Ghash {
    /// Start a hash under subkey `h`
    pub fn new(h: &[u8; BLOCK_SIZE], backend: GhashBackend) -> Self {
        Self {
            multiplier: Multiplier::new(u128::from_be_bytes(*h), backend),
            acc: 0,
        }
    }

    /// A <- (A xor block)·H
    #[inline]
    pub fn absorb_block(&mut self, block: &[u8; BLOCK_SIZE]) {
        self.acc = self.multiplier.mul(self.acc ^ u128::from_be_bytes(*block));
    }

    /// Absorb `data`, zero-padding a trailing partial block
    pub fn absorb_padded(&mut self, data: &[u8]) {
        let mut chunks = data.chunks_exact(BLOCK_SIZE);
        for chunk in &mut chunks {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            self.absorb_block(&block);
        }

        let tail = chunks.remainder();
        if !tail.is_empty() {
            let mut block = [0u8; BLOCK_SIZE];
            block[..tail.len()].copy_from_slice(tail);
            self.absorb_block(&block);
            block.zeroize();
        }
    }

    /// Absorb the length block [len(A)]_64 || [len(C)]_64, lengths in bits
    pub fn absorb_lengths(&mut self, aad_bits: u64, text_bits: u64) {
        let mut block = [0u8; BLOCK_SIZE];
        block[..8].copy_from_slice(&aad_bits.to_be_bytes());
        block[8..].copy_from_slice(&text_bits.to_be_bytes());
        self.absorb_block(&block);
    }

    /// Current accumulator value
    pub fn value(&self) -> [u8; BLOCK_SIZE] {
        self.acc.to_be_bytes()
    }
}

impl Zeroize for Ghash {
    fn zeroize(&mut self) {
        self.multiplier.zeroize();
        self.acc.zeroize();
    }
}

impl Drop for Ghash {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for Ghash {}

impl std::fmt::Debug for Ghash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match self.multiplier {
            Multiplier::Bitwise { .. } => GhashBackend::Bitwise,
            Multiplier::Table(_) => GhashBackend::Table,
        };
        f.debug_struct("Ghash")
            .field("backend", &backend)
            .field("state", &"[REDACTED]")
            .finish()
    }
}

/// One-shot GHASH over `data` as consecutive zero-padded segments
///
/// Used for the J0 derivation of IVs that are not 96 bits long.
pub fn ghash(
    h: &[u8; BLOCK_SIZE],
    backend: GhashBackend,
    data: &[u8],
    aad_bits: u64,
    text_bits: u64,
) -> [u8; BLOCK_SIZE] {
    let mut state = Ghash::new(h, backend);
    state.absorb_padded(data);
    state.absorb_lengths(aad_bits, text_bits);
    state.value()
}
