//! Streaming GCM context
//!
//! A context processes exactly one message at a time through the protocol
//!
//! ```text
//! init_encryption / init_decryption   Init | Finalized | Failed -> AadAbsorbed
//! update (any number of times)        AadAbsorbed | Streaming   -> Streaming
//! finalize_encryption / _decryption   AadAbsorbed | Streaming   -> Finalized | Failed
//! ```
//!
//! Every argument and phase check runs before any state is touched, so a
//! rejected call leaves the context exactly as it was. Only a tag mismatch
//! moves the context to `Failed`. Calling init again starts a new message and
//! derives H, J0 and the counter from scratch.

use std::fmt;

use log::{debug, trace, warn};
use zeroize::Zeroize;

use super::ctr::{derive_j0, xor_in_place, Counter};
use super::ghash::Ghash;
use super::tag::{compute_tag_block, verify_tag, Tag};
use crate::block_cipher::BlockCipher;
use crate::config::{GcmConfig, TagLength, BLOCK_SIZE};
use crate::error::{error_codes, GcmError, GcmResult};

/// Lifecycle phase of a [`GcmContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No message in progress
    Init,
    /// IV and AAD absorbed, no data processed yet
    AadAbsorbed,
    /// At least one update call processed data
    Streaming,
    /// The last message completed successfully
    Finalized,
    /// The last message failed tag verification
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "Init",
            Phase::AadAbsorbed => "AadAbsorbed",
            Phase::Streaming => "Streaming",
            Phase::Finalized => "Finalized",
            Phase::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Direction of the message being processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => f.write_str("encryption"),
            Direction::Decrypt => f.write_str("decryption"),
        }
    }
}

/// Key-derived state of one message, wiped on drop
#[derive(Clone, PartialEq, Eq)]
struct Session {
    ghash: Ghash,
    j0: [u8; BLOCK_SIZE],
    counter: Counter,
    /// Keystream block backing the bytes in `leftover`
    keystream: [u8; BLOCK_SIZE],
    /// Ciphertext bytes of the current partial block
    leftover: [u8; BLOCK_SIZE],
    leftover_len: usize,
    aad_len: u64,
    text_len: u64,
}

impl Session {
    /// Run `data` through the keystream in place, hashing the ciphertext side
    fn process<C: BlockCipher + ?Sized>(&mut self, cipher: &C, direction: Direction, data: &mut [u8]) {
        let mut pos = 0;

        if self.leftover_len > 0 {
            let take = (BLOCK_SIZE - self.leftover_len).min(data.len());
            self.xor_partial(direction, &mut data[..take]);
            pos = take;
            if self.leftover_len == BLOCK_SIZE {
                self.ghash.absorb_block(&self.leftover);
                self.leftover_len = 0;
            }
        }

        while data.len() - pos >= BLOCK_SIZE {
            let mut keystream = self.counter.next_keystream(cipher);
            let chunk = &mut data[pos..pos + BLOCK_SIZE];
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);

            if direction == Direction::Decrypt {
                self.ghash.absorb_block(&block);
            }
            xor_in_place(&mut block, &keystream);
            if direction == Direction::Encrypt {
                self.ghash.absorb_block(&block);
            }

            chunk.copy_from_slice(&block);
            block.zeroize();
            keystream.zeroize();
            pos += BLOCK_SIZE;
        }

        if pos < data.len() {
            self.keystream = self.counter.next_keystream(cipher);
            self.xor_partial(direction, &mut data[pos..]);
        }

        self.text_len += data.len() as u64;
    }

    /// XOR bytes that fit in the current partial block
    fn xor_partial(&mut self, direction: Direction, data: &mut [u8]) {
        for byte in data.iter_mut() {
            let input = *byte;
            let output = input ^ self.keystream[self.leftover_len];
            *byte = output;
            self.leftover[self.leftover_len] = match direction {
                Direction::Encrypt => output,
                Direction::Decrypt => input,
            };
            self.leftover_len += 1;
        }
    }

    /// Flush the partial block, absorb the lengths and return S
    fn tag_block<C: BlockCipher + ?Sized>(&mut self, cipher: &C) -> [u8; BLOCK_SIZE] {
        let tail = self.leftover_len;
        self.ghash.absorb_padded(&self.leftover[..tail]);
        self.leftover_len = 0;
        self.ghash.absorb_lengths(self.aad_len * 8, self.text_len * 8);
        compute_tag_block(cipher, &self.j0, &self.ghash.value())
    }
}

impl Zeroize for Session {
    fn zeroize(&mut self) {
        self.ghash.zeroize();
        self.j0.zeroize();
        self.counter.zeroize();
        self.keystream.zeroize();
        self.leftover.zeroize();
        self.leftover_len = 0;
        self.aad_len = 0;
        self.text_len = 0;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// GCM context borrowing an expanded key
///
/// The key schedule is only read, so one schedule can back any number of
/// contexts. A context itself is driven by a single caller, one message at a
/// time.
///
/// Reusing an IV under the same key is not detected: a context has no memory
/// of earlier messages, and keeping IVs unique is the caller's obligation.
pub struct GcmContext<'k, C: BlockCipher + ?Sized> {
    key_schedule: &'k C,
    config: GcmConfig,
    phase: Phase,
    direction: Option<Direction>,
    session: Option<Session>,
}

impl<'k, C: BlockCipher + ?Sized> GcmContext<'k, C> {
    /// Create a context with the default configuration
    pub fn new(key_schedule: &'k C) -> Self {
        Self::with_config(key_schedule, GcmConfig::default())
    }

    /// Create a context with a custom configuration
    pub fn with_config(key_schedule: &'k C, config: GcmConfig) -> Self {
        Self {
            key_schedule,
            config,
            phase: Phase::Init,
            direction: None,
            session: None,
        }
    }

    /// Start encrypting a message
    ///
    /// # Arguments
    ///
    /// * `iv` - Initialization vector. 12 bytes is the fast path; other
    ///   non-empty lengths are hashed into J0 unless the IV policy forbids it.
    /// * `aad` - Associated data, authenticated but not encrypted. Must be
    ///   non-empty unless the AAD policy is `Optional`.
    ///
    /// # Security Considerations
    ///
    /// The (key, IV) pair must never repeat. Reuse leaks the XOR of the two
    /// plaintexts and allows tag forgeries.
    pub fn init_encryption(&mut self, iv: &[u8], aad: &[u8]) -> GcmResult<()> {
        self.init(Direction::Encrypt, iv, aad)
    }

    /// Start decrypting a message
    ///
    /// Plaintext returned by `update` must not be used until
    /// [`finalize_decryption`](Self::finalize_decryption) succeeds.
    pub fn init_decryption(&mut self, iv: &[u8], aad: &[u8]) -> GcmResult<()> {
        self.init(Direction::Decrypt, iv, aad)
    }

    fn init(&mut self, direction: Direction, iv: &[u8], aad: &[u8]) -> GcmResult<()> {
        self.config.validate_iv(iv)?;
        self.config.validate_aad(aad)?;

        let backend = self.config.ghash_backend;
        let mut h = self.key_schedule.encrypt_block(&[0u8; BLOCK_SIZE]);
        let mut ghash = Ghash::new(&h, backend);
        let j0 = derive_j0(&h, backend, iv);
        h.zeroize();

        ghash.absorb_padded(aad);

        self.session = Some(Session {
            ghash,
            j0,
            counter: Counter::new(&j0),
            keystream: [0u8; BLOCK_SIZE],
            leftover: [0u8; BLOCK_SIZE],
            leftover_len: 0,
            aad_len: aad.len() as u64,
            text_len: 0,
        });
        self.direction = Some(direction);
        self.phase = Phase::AadAbsorbed;

        debug!(
            "GCM {} initialised: iv={} bytes, aad={} bytes, tag={} bits",
            direction,
            iv.len(),
            aad.len(),
            self.config.tag_length.bits()
        );
        Ok(())
    }

    /// Process the next chunk of the message
    ///
    /// Writes `input.len()` bytes to the front of `output` and returns that
    /// count. Chunks may have any size; the output of a message does not
    /// depend on how it was split.
    pub fn update(&mut self, input: &[u8], output: &mut [u8]) -> GcmResult<usize> {
        if output.len() < input.len() {
            return Err(GcmError::invalid_parameter(
                "output",
                &format!("at least {} bytes", input.len()),
                &format!("{} bytes", output.len()),
                error_codes::OUTPUT_TOO_SMALL,
            ));
        }
        self.check_update(input.len())?;

        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        self.process(out);
        Ok(input.len())
    }

    /// Process the next chunk of the message in place
    pub fn update_in_place(&mut self, buffer: &mut [u8]) -> GcmResult<()> {
        self.check_update(buffer.len())?;
        self.process(buffer);
        Ok(())
    }

    fn check_update(&self, len: usize) -> GcmResult<()> {
        if !matches!(self.phase, Phase::AadAbsorbed | Phase::Streaming) {
            return Err(GcmError::invalid_state("update", self.phase, error_codes::INVALID_PHASE));
        }
        if len == 0 {
            return Err(GcmError::zero_length("input"));
        }
        self.config.validate_text_len(self.processed_len(), len)
    }

    fn process(&mut self, data: &mut [u8]) {
        let (Some(session), Some(direction)) = (self.session.as_mut(), self.direction) else {
            return;
        };
        session.process(self.key_schedule, direction, data);
        self.phase = Phase::Streaming;
        trace!("GCM {} update: {} bytes, {} total", direction, data.len(), session.text_len);
    }

    /// Complete an encryption and return its tag
    pub fn finalize_encryption(&mut self) -> GcmResult<Tag> {
        self.check_finalize("finalize_encryption", Direction::Encrypt)?;
        let Some(mut session) = self.session.take() else {
            return Err(GcmError::invalid_state(
                "finalize_encryption",
                self.phase,
                error_codes::INVALID_PHASE,
            ));
        };

        let mut s = session.tag_block(self.key_schedule);
        let tag = Tag::from_block(&s, self.config.tag_length);
        s.zeroize();
        self.phase = Phase::Finalized;

        debug!(
            "GCM encryption finalised: aad={} bytes, text={} bytes",
            session.aad_len, session.text_len
        );
        Ok(tag)
    }

    /// Complete a decryption by checking `tag`
    ///
    /// The tag length must equal the configured tag length. On a mismatch the
    /// context moves to `Failed` and every byte produced by `update` for this
    /// message must be discarded.
    pub fn finalize_decryption(&mut self, tag: &[u8]) -> GcmResult<()> {
        self.check_finalize("finalize_decryption", Direction::Decrypt)?;
        let received = TagLength::try_from(tag.len())?;
        if received != self.config.tag_length {
            return Err(GcmError::invalid_parameter(
                "tag",
                &format!("{} bytes", self.config.tag_length.bytes()),
                &format!("{} bytes", tag.len()),
                error_codes::INVALID_TAG_LENGTH,
            ));
        }
        let Some(mut session) = self.session.take() else {
            return Err(GcmError::invalid_state(
                "finalize_decryption",
                self.phase,
                error_codes::INVALID_PHASE,
            ));
        };

        let mut s = session.tag_block(self.key_schedule);
        let valid = verify_tag(&s, tag);
        s.zeroize();

        if valid {
            self.phase = Phase::Finalized;
            debug!(
                "GCM decryption finalised: aad={} bytes, text={} bytes",
                session.aad_len, session.text_len
            );
            Ok(())
        } else {
            self.phase = Phase::Failed;
            warn!("GCM tag verification failed after {} bytes", session.text_len);
            Err(GcmError::authentication_failed("finalize_decryption", "tag mismatch"))
        }
    }

    fn check_finalize(&self, operation: &str, expected: Direction) -> GcmResult<()> {
        if !matches!(self.phase, Phase::AadAbsorbed | Phase::Streaming) {
            return Err(GcmError::invalid_state(operation, self.phase, error_codes::INVALID_PHASE));
        }
        if self.direction != Some(expected) {
            let actual = self.direction.map_or("none".to_string(), |d| d.to_string());
            return Err(GcmError::invalid_state(
                operation,
                format!("{} ({})", self.phase, actual),
                error_codes::DIRECTION_MISMATCH,
            ));
        }
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn config(&self) -> &GcmConfig {
        &self.config
    }

    pub fn key_schedule(&self) -> &'k C {
        self.key_schedule
    }

    /// Bytes of AAD absorbed for the current message
    pub fn aad_len(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.aad_len)
    }

    /// Bytes of text processed for the current message
    pub fn processed_len(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.text_len)
    }
}

impl<C: BlockCipher + ?Sized> Clone for GcmContext<'_, C> {
    fn clone(&self) -> Self {
        Self {
            key_schedule: self.key_schedule,
            config: self.config,
            phase: self.phase,
            direction: self.direction,
            session: self.session.clone(),
        }
    }
}

/// Two contexts are equal when they borrow the same key schedule and hold
/// identical state
impl<C: BlockCipher + ?Sized> PartialEq for GcmContext<'_, C> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.key_schedule, other.key_schedule)
            && self.config == other.config
            && self.phase == other.phase
            && self.direction == other.direction
            && self.session == other.session
    }
}

impl<C: BlockCipher + ?Sized> fmt::Debug for GcmContext<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcmContext")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("direction", &self.direction)
            .field("aad_len", &self.aad_len())
            .field("processed_len", &self.processed_len())
            .field("state", &"[REDACTED]")
            .finish()
    }
}
