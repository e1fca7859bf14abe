/*!
 * Block-cipher gateway
 *
 * GCM only ever runs the underlying cipher in the forward direction, so the
 * gateway is a single "encrypt one block" operation. AES from the `aes`
 * crate is wired in; any other 128-bit block cipher can implement the trait.
 */

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};

use crate::config::BLOCK_SIZE;
use crate::error::{error_codes, GcmError, GcmResult};

/// Encrypt one 16-byte block under an already expanded key
///
/// Implementations must be deterministic and must not keep per-call state:
/// one key schedule may back any number of contexts at the same time.
pub trait BlockCipher {
    fn encrypt_block(&self, block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE];
}

impl<T: BlockCipher + ?Sized> BlockCipher for &T {
    fn encrypt_block(&self, block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
        (**self).encrypt_block(block)
    }
}

macro_rules! impl_block_cipher_for_aes {
    ($($aes:ty),+ $(,)?) => {
        $(
            impl BlockCipher for $aes {
                fn encrypt_block(&self, block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
                    let mut buf = GenericArray::clone_from_slice(block);
                    BlockEncrypt::encrypt_block(self, &mut buf);
                    let mut out = [0u8; BLOCK_SIZE];
                    out.copy_from_slice(&buf);
                    out
                }
            }
        )+
    };
}

impl_block_cipher_for_aes!(Aes128, Aes192, Aes256);

/// AES key schedule for any of the three standard key sizes
///
/// The expanded round keys are wiped on drop by the `aes` crate.
#[derive(Clone)]
pub enum AesKeySchedule {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl AesKeySchedule {
    /// Expand a 16, 24 or 32 byte AES key
    pub fn new(key: &[u8]) -> GcmResult<Self> {
        let invalid = || {
            GcmError::invalid_parameter(
                "key",
                "16, 24 or 32 bytes",
                &format!("{} bytes", key.len()),
                error_codes::INVALID_KEY_SIZE,
            )
        };

        match key.len() {
            16 => Aes128::new_from_slice(key).map(AesKeySchedule::Aes128).map_err(|_| invalid()),
            24 => Aes192::new_from_slice(key).map(AesKeySchedule::Aes192).map_err(|_| invalid()),
            32 => Aes256::new_from_slice(key).map(AesKeySchedule::Aes256).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    /// Key size in bytes
    pub fn key_size(&self) -> usize {
        match self {
            AesKeySchedule::Aes128(_) => 16,
            AesKeySchedule::Aes192(_) => 24,
            AesKeySchedule::Aes256(_) => 32,
        }
    }
}

impl BlockCipher for AesKeySchedule {
    fn encrypt_block(&self, block: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
        match self {
            AesKeySchedule::Aes128(cipher) => BlockCipher::encrypt_block(cipher, block),
            AesKeySchedule::Aes192(cipher) => BlockCipher::encrypt_block(cipher, block),
            AesKeySchedule::Aes256(cipher) => BlockCipher::encrypt_block(cipher, block),
        }
    }
}

impl std::fmt::Debug for AesKeySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesKeySchedule")
            .field("key_bits", &(self.key_size() * 8))
            .field("round_keys", &"[REDACTED]")
            .finish()
    }
}
