//! One-shot GCM encryption and decryption
//!
//! `Gcm` owns a key schedule and a configuration and runs whole messages
//! through a [`GcmContext`]. Combined ciphertexts carry the tag at the end.

use zeroize::Zeroizing;

use super::context::GcmContext;
use super::tag::Tag;
use crate::block_cipher::{AesKeySchedule, BlockCipher};
use crate::config::GcmConfig;
use crate::error::{error_codes, GcmError, GcmResult};

/// GCM keyed with an owned block cipher
#[derive(Debug, Clone)]
pub struct Gcm<C: BlockCipher> {
    key_schedule: C,
    config: GcmConfig,
}

impl<C: BlockCipher> Gcm<C> {
    pub fn new(key_schedule: C) -> Self {
        Self::with_config(key_schedule, GcmConfig::default())
    }

    pub fn with_config(key_schedule: C, config: GcmConfig) -> Self {
        Self { key_schedule, config }
    }

    pub fn key_schedule(&self) -> &C {
        &self.key_schedule
    }

    pub fn config(&self) -> &GcmConfig {
        &self.config
    }

    /// A context already initialised for encrypting one message
    pub fn encryptor(&self, iv: &[u8], aad: &[u8]) -> GcmResult<GcmContext<'_, C>> {
        let mut context = GcmContext::with_config(&self.key_schedule, self.config);
        context.init_encryption(iv, aad)?;
        Ok(context)
    }

    /// A context already initialised for decrypting one message
    pub fn decryptor(&self, iv: &[u8], aad: &[u8]) -> GcmResult<GcmContext<'_, C>> {
        let mut context = GcmContext::with_config(&self.key_schedule, self.config);
        context.init_decryption(iv, aad)?;
        Ok(context)
    }

    /// Encrypt `plaintext`, returning the ciphertext and the tag separately
    pub fn encrypt_detached(
        &self,
        iv: &[u8],
        aad: &[u8],
        plaintext: &[u8],
    ) -> GcmResult<(Vec<u8>, Tag)> {
        let mut context = self.encryptor(iv, aad)?;
        let mut ciphertext = plaintext.to_vec();
        if !ciphertext.is_empty() {
            context.update_in_place(&mut ciphertext)?;
        }
        let tag = context.finalize_encryption()?;
        Ok((ciphertext, tag))
    }

    /// Encrypt `plaintext`, returning ciphertext || tag
    pub fn encrypt(&self, iv: &[u8], aad: &[u8], plaintext: &[u8]) -> GcmResult<Vec<u8>> {
        let (mut ciphertext, tag) = self.encrypt_detached(iv, aad, plaintext)?;
        ciphertext.extend_from_slice(tag.as_bytes());
        Ok(ciphertext)
    }

    /// Decrypt `ciphertext` and check it against `tag`
    ///
    /// Plaintext is only released once the tag verifies; on failure the
    /// buffered plaintext is wiped.
    pub fn decrypt_detached(
        &self,
        iv: &[u8],
        aad: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
    ) -> GcmResult<Vec<u8>> {
        let mut context = self.decryptor(iv, aad)?;
        let mut plaintext = Zeroizing::new(ciphertext.to_vec());
        if !plaintext.is_empty() {
            context.update_in_place(&mut plaintext)?;
        }
        context.finalize_decryption(tag)?;
        Ok(std::mem::take(&mut *plaintext))
    }

    /// Decrypt ciphertext || tag
    pub fn decrypt(&self, iv: &[u8], aad: &[u8], ciphertext_and_tag: &[u8]) -> GcmResult<Vec<u8>> {
        let tag_len = self.config.tag_length.bytes();
        if ciphertext_and_tag.len() < tag_len {
            return Err(GcmError::invalid_parameter(
                "ciphertext",
                &format!("at least {} bytes", tag_len),
                &format!("{} bytes", ciphertext_and_tag.len()),
                error_codes::INVALID_TAG_LENGTH,
            ));
        }
        let (ciphertext, tag) = ciphertext_and_tag.split_at(ciphertext_and_tag.len() - tag_len);
        self.decrypt_detached(iv, aad, ciphertext, tag)
    }
}

impl Gcm<AesKeySchedule> {
    /// AES-GCM from a 16, 24 or 32 byte key
    pub fn new_aes(key: &[u8]) -> GcmResult<Self> {
        Ok(Self::new(AesKeySchedule::new(key)?))
    }
}

/// AES-GCM encrypt with the default configuration, returning ciphertext || tag
pub fn encrypt(key: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> GcmResult<Vec<u8>> {
    Gcm::new_aes(key)?.encrypt(iv, aad, plaintext)
}

/// AES-GCM decrypt with the default configuration
pub fn decrypt(key: &[u8], iv: &[u8], aad: &[u8], ciphertext_and_tag: &[u8]) -> GcmResult<Vec<u8>> {
    Gcm::new_aes(key)?.decrypt(iv, aad, ciphertext_and_tag)
}
