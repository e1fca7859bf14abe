//! Galois/Counter Mode
//!
//! This module layers GCM (NIST SP 800-38D) on top of any [`BlockCipher`]:
//! counter-mode encryption for confidentiality and GHASH over the associated
//! data and ciphertext for authenticity.
//!
//! [`GcmContext`] exposes the streaming init / update / finalize protocol;
//! [`Gcm`] and the free [`encrypt`]/[`decrypt`] functions handle whole
//! messages.
//!
//! [`BlockCipher`]: crate::block_cipher::BlockCipher

pub mod ghash;
pub mod ctr;
mod context;
mod tag;
mod aead;

pub use context::{Direction, GcmContext, Phase};
pub use tag::{compute_tag_block, verify_tag, Tag};
pub use aead::{decrypt, encrypt, Gcm};
