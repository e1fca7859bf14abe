/*!
 * tinygcm
 *
 * Galois/Counter Mode (NIST SP 800-38D) authenticated encryption over an
 * opaque "encrypt one 16-byte block" primitive.
 *
 * - Counter mode provides confidentiality
 * - GHASH over the associated data and ciphertext provides integrity
 *
 * The block cipher itself is not implemented here. AES comes from the `aes`
 * crate; any other 128-bit block cipher can be plugged in through the
 * [`BlockCipher`] trait.
 *
 * Messages can be processed in one call through [`Gcm`] or streamed through
 * a [`GcmContext`] with the init / update / finalize protocol. A C interface
 * over the streaming API lives in [`ffi`].
 */

/// Single-block encryption gateway and its AES bindings
pub mod block_cipher;

/// Context configuration: tag length, size limits and policies
pub mod config;

/// Common error types
pub mod error;

/// GHASH, counter mode, the streaming context and one-shot helpers
pub mod gcm;

/// Foreign Function Interface (FFI) for C callers
pub mod ffi;

pub use block_cipher::{AesKeySchedule, BlockCipher};
pub use config::{AadPolicy, GcmConfig, GhashBackend, IvPolicy, LengthLimit, TagLength};
pub use error::{ErrorCategory, GcmError, GcmResult};
pub use gcm::{decrypt, encrypt, Direction, Gcm, GcmContext, Phase, Tag};

/// Initialize the library.
///
/// Runs a known-answer test (AES-128, zero key and IV, one zero block of
/// plaintext) through both GHASH backends. Callers that need a power-on self
/// test should call this once before processing traffic.
///
/// # Example
///
/// ```
/// use tinygcm::prelude::*;
///
/// fn main() -> Result<(), GcmError> {
///     init()?;
///
///     let key = [0x42u8; 16];
///     let iv = [0x24u8; 12];
///     let sealed = encrypt(&key, &iv, b"header", b"secret")?;
///     assert_eq!(decrypt(&key, &iv, b"header", &sealed)?, b"secret");
///     Ok(())
/// }
/// ```
pub fn init() -> GcmResult<()> {
    const EXPECTED_CIPHERTEXT: [u8; 16] = [
        0x03, 0x88, 0xda, 0xce, 0x60, 0xb6, 0xa3, 0x92,
        0xf3, 0x28, 0xc2, 0xb9, 0x71, 0xb2, 0xfe, 0x78,
    ];
    const EXPECTED_TAG: [u8; 16] = [
        0xab, 0x6e, 0x47, 0xd4, 0x2c, 0xec, 0x13, 0xbd,
        0xf5, 0x3a, 0x67, 0xb2, 0x12, 0x57, 0xbd, 0xdf,
    ];

    for backend in [GhashBackend::Bitwise, GhashBackend::Table] {
        let config = GcmConfig::default()
            .with_aad_policy(AadPolicy::Optional)
            .with_ghash_backend(backend);
        let gcm = Gcm::with_config(AesKeySchedule::new(&[0u8; 16])?, config);
        let (ciphertext, tag) = gcm.encrypt_detached(&[0u8; 12], &[], &[0u8; 16])?;

        if ciphertext != EXPECTED_CIPHERTEXT || !tag.verify(&EXPECTED_TAG) {
            log::error!("GCM self test failed for the {:?} GHASH backend", backend);
            return Err(GcmError::authentication_failed("init", "known-answer test mismatch"));
        }
    }

    log::debug!("GCM self test passed");
    Ok(())
}

/// The most commonly used types and functions
pub mod prelude {
    pub use crate::block_cipher::{AesKeySchedule, BlockCipher};
    pub use crate::config::{AadPolicy, GcmConfig, GhashBackend, IvPolicy, LengthLimit, TagLength};
    pub use crate::error::{ErrorCategory, GcmError, GcmResult};
    pub use crate::gcm::{decrypt, encrypt, Direction, Gcm, GcmContext, Phase, Tag};
    pub use crate::init;
}
