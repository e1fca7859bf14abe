/*!
 * GCM Configuration
 *
 * Per-context parameters: tag length, size ceilings, AAD and IV policies and
 * the GHASH multiplication strategy. The default configuration follows the
 * documented contract (mandatory AAD, full 128-bit tags) with the general
 * SP 800-38D size limits.
 */

use serde::{Deserialize, Serialize};

use crate::error::{error_codes, GcmError, GcmResult};

/// Size of a GCM block in bytes
pub const BLOCK_SIZE: usize = 16;

/// Size of the recommended 96-bit IV in bytes
pub const STANDARD_IV_SIZE: usize = 12;

/// Largest tag GCM can produce
pub const MAX_TAG_SIZE: usize = 16;

/// Smallest tag accepted (64 bits)
pub const MIN_TAG_SIZE: usize = 8;

/// Tags shorter than this are accepted but logged as weak (96 bits)
pub const RECOMMENDED_MIN_TAG_SIZE: usize = 12;

/// Per-buffer ceiling of the compact profile (an 8-bit length field)
pub const COMPACT_LENGTH_LIMIT: u64 = u8::MAX as u64;

/// Authentication tag length in bytes, validated to 8..=16
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct TagLength(usize);

impl TagLength {
    /// Full 128-bit tag
    pub const FULL: TagLength = TagLength(MAX_TAG_SIZE);

    /// Create a tag length from a byte count
    pub fn new(bytes: usize) -> GcmResult<Self> {
        if !(MIN_TAG_SIZE..=MAX_TAG_SIZE).contains(&bytes) {
            return Err(GcmError::invalid_parameter(
                "tag_length",
                &format!("{} to {} bytes", MIN_TAG_SIZE, MAX_TAG_SIZE),
                &format!("{} bytes", bytes),
                error_codes::INVALID_TAG_LENGTH,
            ));
        }
        if bytes < RECOMMENDED_MIN_TAG_SIZE {
            log::warn!(
                "GCM tag truncated to {} bits; at least {} bits are recommended",
                bytes * 8,
                RECOMMENDED_MIN_TAG_SIZE * 8
            );
        }
        Ok(Self(bytes))
    }

    pub fn bytes(self) -> usize {
        self.0
    }

    pub fn bits(self) -> usize {
        self.0 * 8
    }
}

impl Default for TagLength {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<usize> for TagLength {
    type Error = GcmError;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl From<TagLength> for usize {
    fn from(len: TagLength) -> Self {
        len.0
    }
}

/// Size ceilings applied to AAD and message lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthLimit {
    /// SP 800-38D maxima: 2^36 - 32 bytes of text, 2^61 - 1 bytes of AAD
    #[default]
    Standard,
    /// Embedded profile: at most 255 bytes of AAD, 255 bytes per update
    /// call and 255 bytes per message
    Compact,
}

impl LengthLimit {
    pub fn max_aad_len(self) -> u64 {
        match self {
            LengthLimit::Standard => (1u64 << 61) - 1,
            LengthLimit::Compact => COMPACT_LENGTH_LIMIT,
        }
    }

    pub fn max_message_len(self) -> u64 {
        match self {
            LengthLimit::Standard => (1u64 << 36) - 32,
            LengthLimit::Compact => COMPACT_LENGTH_LIMIT,
        }
    }

    pub fn max_update_len(self) -> u64 {
        match self {
            LengthLimit::Standard => self.max_message_len(),
            LengthLimit::Compact => COMPACT_LENGTH_LIMIT,
        }
    }
}

/// Whether init accepts empty associated data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AadPolicy {
    /// Empty AAD is an argument error
    #[default]
    Required,
    /// Empty AAD is treated as "no AAD"
    Optional,
}

/// Which IV lengths init accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IvPolicy {
    /// Any non-empty IV; lengths other than 96 bits are folded through GHASH
    #[default]
    Any,
    /// Only 96-bit IVs
    Standard96Only,
}

/// GF(2^128) multiplication strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhashBackend {
    /// Branch-free shift-and-reduce, one bit per step
    Bitwise,
    /// 16-entry table of multiples of H, four bits per step. Table lookups
    /// are indexed by data and are not cache-timing safe.
    Table,
}

impl Default for GhashBackend {
    fn default() -> Self {
        if cfg!(feature = "table-ghash") {
            GhashBackend::Table
        } else {
            GhashBackend::Bitwise
        }
    }
}

/// Configuration of a GCM context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GcmConfig {
    pub tag_length: TagLength,
    pub length_limit: LengthLimit,
    pub aad_policy: AadPolicy,
    pub iv_policy: IvPolicy,
    pub ghash_backend: GhashBackend,
}

impl GcmConfig {
    /// The embedded profile with 8-bit length fields
    pub fn compact() -> Self {
        Self {
            length_limit: LengthLimit::Compact,
            ..Self::default()
        }
    }

    pub fn with_tag_length(mut self, tag_length: TagLength) -> Self {
        self.tag_length = tag_length;
        self
    }

    pub fn with_length_limit(mut self, length_limit: LengthLimit) -> Self {
        self.length_limit = length_limit;
        self
    }

    pub fn with_aad_policy(mut self, aad_policy: AadPolicy) -> Self {
        self.aad_policy = aad_policy;
        self
    }

    pub fn with_iv_policy(mut self, iv_policy: IvPolicy) -> Self {
        self.iv_policy = iv_policy;
        self
    }

    pub fn with_ghash_backend(mut self, ghash_backend: GhashBackend) -> Self {
        self.ghash_backend = ghash_backend;
        self
    }

    /// Check an IV against the IV policy
    pub fn validate_iv(&self, iv: &[u8]) -> GcmResult<()> {
        if iv.is_empty() {
            return Err(GcmError::zero_length("iv"));
        }
        if self.iv_policy == IvPolicy::Standard96Only && iv.len() != STANDARD_IV_SIZE {
            return Err(GcmError::invalid_parameter(
                "iv",
                &format!("{} bytes", STANDARD_IV_SIZE),
                &format!("{} bytes", iv.len()),
                error_codes::INVALID_IV_LENGTH,
            ));
        }
        // len(IV) must fit the 64-bit length block
        if iv.len() as u64 > u64::MAX / 8 {
            return Err(GcmError::invalid_parameter(
                "iv",
                "at most 2^61 - 1 bytes",
                &format!("{} bytes", iv.len()),
                error_codes::INVALID_IV_LENGTH,
            ));
        }
        Ok(())
    }

    /// Check AAD against the AAD policy and length limit
    pub fn validate_aad(&self, aad: &[u8]) -> GcmResult<()> {
        if aad.is_empty() && self.aad_policy == AadPolicy::Required {
            return Err(GcmError::zero_length("aad"));
        }
        let max = self.length_limit.max_aad_len();
        if aad.len() as u64 > max {
            return Err(GcmError::invalid_parameter(
                "aad",
                &format!("at most {} bytes", max),
                &format!("{} bytes", aad.len()),
                error_codes::LENGTH_LIMIT_EXCEEDED,
            ));
        }
        Ok(())
    }

    /// Check that `additional` more bytes of text fit after `processed`
    pub fn validate_text_len(&self, processed: u64, additional: usize) -> GcmResult<()> {
        let additional = additional as u64;
        let per_call = self.length_limit.max_update_len();
        if additional > per_call {
            return Err(GcmError::invalid_parameter(
                "input",
                &format!("at most {} bytes per call", per_call),
                &format!("{} bytes", additional),
                error_codes::LENGTH_LIMIT_EXCEEDED,
            ));
        }
        let max = self.length_limit.max_message_len();
        match processed.checked_add(additional) {
            Some(total) if total <= max => Ok(()),
            _ => Err(GcmError::invalid_parameter(
                "input",
                &format!("at most {} bytes per message", max),
                &format!("{} + {} bytes", processed, additional),
                error_codes::LENGTH_LIMIT_EXCEEDED,
            )),
        }
    }
}
