/*!
 * C interface for streaming AES-GCM
 *
 * Key schedules and contexts are opaque heap handles. Every function returns
 * `TINYGCM_SUCCESS` (1) on success, `TINYGCM_FAIL` (0) for a null pointer, a
 * zero length or any other rejected argument, and `TINYGCM_AUTH_FAIL` (-1)
 * when a decryption tag does not verify. A failed call leaves the context
 * as it was, except that a tag mismatch ends the message.
 */

use std::slice;

use libc::{c_int, size_t};
use log::debug;

use crate::block_cipher::AesKeySchedule;
use crate::config::{GcmConfig, TagLength};
use crate::error::{error_codes, GcmError, GcmResult};
use crate::gcm::{Direction, GcmContext};

pub const TINYGCM_SUCCESS: c_int = 1;
pub const TINYGCM_FAIL: c_int = 0;
pub const TINYGCM_AUTH_FAIL: c_int = -1;

/// Expanded AES key, shared read-only by any number of contexts
pub struct TinyGcmKeySchedule {
    schedule: AesKeySchedule,
}

/// One GCM context bound to a key schedule handle
pub struct TinyGcmContext {
    context: GcmContext<'static, AesKeySchedule>,
}

fn status<T>(operation: &str, result: GcmResult<T>) -> c_int {
    match result {
        Ok(_) => TINYGCM_SUCCESS,
        Err(err) if err.is_authentication_failure() => TINYGCM_AUTH_FAIL,
        Err(err) => {
            debug!("{} rejected (code {}): {}", operation, err.error_code(), err);
            TINYGCM_FAIL
        }
    }
}

fn null_pointer(parameter: &str) -> GcmError {
    GcmError::invalid_parameter(parameter, "a non-null pointer", "null", error_codes::NULL_POINTER)
}

/// Borrow a caller buffer, rejecting null pointers and empty lengths
unsafe fn input<'a>(parameter: &str, ptr: *const u8, len: size_t) -> GcmResult<&'a [u8]> {
    if ptr.is_null() {
        return Err(null_pointer(parameter));
    }
    if len == 0 {
        return Err(GcmError::zero_length(parameter));
    }
    Ok(slice::from_raw_parts(ptr, len))
}

/// Expand a 16, 24 or 32 byte AES key
///
/// Returns null on a null pointer or an unsupported key length.
///
/// # Safety
///
/// `key` must point to `key_len` readable bytes. The returned handle must be
/// released with `tinygcm_key_schedule_free`.
#[no_mangle]
pub unsafe extern "C" fn tinygcm_key_schedule_new(
    key: *const u8,
    key_len: size_t,
) -> *mut TinyGcmKeySchedule {
    let schedule = input("key", key, key_len).and_then(AesKeySchedule::new);
    match schedule {
        Ok(schedule) => Box::into_raw(Box::new(TinyGcmKeySchedule { schedule })),
        Err(err) => {
            debug!("tinygcm_key_schedule_new rejected: {}", err);
            std::ptr::null_mut()
        }
    }
}

/// Release a key schedule
///
/// # Safety
///
/// `schedule` must be null or a handle from `tinygcm_key_schedule_new` that
/// has not been freed, and no context created from it may still be alive.
#[no_mangle]
pub unsafe extern "C" fn tinygcm_key_schedule_free(schedule: *mut TinyGcmKeySchedule) {
    if !schedule.is_null() {
        drop(Box::from_raw(schedule));
    }
}

/// Create a context producing and expecting tags of `tag_len` bytes
///
/// Returns null on a null schedule or a tag length outside 8..=16.
///
/// # Safety
///
/// `schedule` must be a live handle that outlives the returned context.
#[no_mangle]
pub unsafe extern "C" fn tinygcm_context_new(
    schedule: *const TinyGcmKeySchedule,
    tag_len: size_t,
) -> *mut TinyGcmContext {
    if schedule.is_null() {
        debug!("tinygcm_context_new rejected: null key schedule");
        return std::ptr::null_mut();
    }
    let tag_length = match TagLength::new(tag_len) {
        Ok(tag_length) => tag_length,
        Err(err) => {
            debug!("tinygcm_context_new rejected: {}", err);
            return std::ptr::null_mut();
        }
    };

    let schedule: &'static AesKeySchedule = &(*schedule).schedule;
    let config = GcmConfig::default().with_tag_length(tag_length);
    Box::into_raw(Box::new(TinyGcmContext {
        context: GcmContext::with_config(schedule, config),
    }))
}

/// Release a context, wiping its state
///
/// # Safety
///
/// `ctx` must be null or a handle from `tinygcm_context_new` that has not
/// been freed.
#[no_mangle]
pub unsafe extern "C" fn tinygcm_context_free(ctx: *mut TinyGcmContext) {
    if !ctx.is_null() {
        drop(Box::from_raw(ctx));
    }
}

unsafe fn init(
    operation: &str,
    direction: Direction,
    ctx: *mut TinyGcmContext,
    iv: *const u8,
    iv_len: size_t,
    aad: *const u8,
    aad_len: size_t,
) -> c_int {
    let result = (|| -> GcmResult<()> {
        let ctx = ctx.as_mut().ok_or_else(|| null_pointer("ctx"))?;
        let iv = input("iv", iv, iv_len)?;
        let aad = input("aad", aad, aad_len)?;
        match direction {
            Direction::Encrypt => ctx.context.init_encryption(iv, aad),
            Direction::Decrypt => ctx.context.init_decryption(iv, aad),
        }
    })();
    status(operation, result)
}

unsafe fn update(
    operation: &str,
    direction: Direction,
    ctx: *mut TinyGcmContext,
    out: *mut u8,
    out_len: size_t,
    data: *const u8,
    data_len: size_t,
) -> c_int {
    let result = (|| -> GcmResult<()> {
        let ctx = ctx.as_mut().ok_or_else(|| null_pointer("ctx"))?;
        if out.is_null() {
            return Err(null_pointer("out"));
        }
        if ctx.context.direction() != Some(direction) {
            return Err(GcmError::invalid_state(
                operation,
                ctx.context.phase(),
                error_codes::DIRECTION_MISMATCH,
            ));
        }

        if std::ptr::eq(out as *const u8, data) {
            if data_len == 0 {
                return Err(GcmError::zero_length("in"));
            }
            if out_len < data_len {
                return Err(GcmError::invalid_parameter(
                    "out",
                    &format!("at least {} bytes", data_len),
                    &format!("{} bytes", out_len),
                    error_codes::OUTPUT_TOO_SMALL,
                ));
            }
            return ctx.context.update_in_place(slice::from_raw_parts_mut(out, data_len));
        }

        let data = input("in", data, data_len)?;
        let out = slice::from_raw_parts_mut(out, out_len);
        ctx.context.update(data, out).map(|_| ())
    })();
    status(operation, result)
}

/// Start encrypting a message
///
/// # Safety
///
/// `ctx` must be a live context; `iv` and `aad` must point to `iv_len` and
/// `aad_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn tinygcm_encryption_init(
    ctx: *mut TinyGcmContext,
    iv: *const u8,
    iv_len: size_t,
    aad: *const u8,
    aad_len: size_t,
) -> c_int {
    init("tinygcm_encryption_init", Direction::Encrypt, ctx, iv, iv_len, aad, aad_len)
}

/// Encrypt the next chunk of plaintext into `out`
///
/// `out` may be the same pointer as `in` for in-place operation.
///
/// # Safety
///
/// `in` must point to `in_len` readable bytes and `out` to `out_len`
/// writable bytes. The buffers must either be identical or not overlap.
#[no_mangle]
pub unsafe extern "C" fn tinygcm_encryption_update(
    ctx: *mut TinyGcmContext,
    out: *mut u8,
    out_len: size_t,
    r#in: *const u8,
    in_len: size_t,
) -> c_int {
    update("tinygcm_encryption_update", Direction::Encrypt, ctx, out, out_len, r#in, in_len)
}

/// Finish the message and write the tag to `tag`
///
/// `tag_len` must equal the tag length the context was created with.
///
/// # Safety
///
/// `tag` must point to `tag_len` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn tinygcm_encryption_final(
    ctx: *mut TinyGcmContext,
    tag: *mut u8,
    tag_len: size_t,
) -> c_int {
    let result = (|| -> GcmResult<()> {
        let ctx = ctx.as_mut().ok_or_else(|| null_pointer("ctx"))?;
        if tag.is_null() {
            return Err(null_pointer("tag"));
        }
        let expected = ctx.context.config().tag_length.bytes();
        if tag_len != expected {
            return Err(GcmError::invalid_parameter(
                "tag_len",
                &format!("{} bytes", expected),
                &format!("{} bytes", tag_len),
                error_codes::INVALID_TAG_LENGTH,
            ));
        }
        let computed = ctx.context.finalize_encryption()?;
        slice::from_raw_parts_mut(tag, tag_len).copy_from_slice(computed.as_bytes());
        Ok(())
    })();
    status("tinygcm_encryption_final", result)
}

/// Start decrypting a message
///
/// # Safety
///
/// Same contract as `tinygcm_encryption_init`.
#[no_mangle]
pub unsafe extern "C" fn tinygcm_decryption_init(
    ctx: *mut TinyGcmContext,
    iv: *const u8,
    iv_len: size_t,
    aad: *const u8,
    aad_len: size_t,
) -> c_int {
    init("tinygcm_decryption_init", Direction::Decrypt, ctx, iv, iv_len, aad, aad_len)
}

/// Decrypt the next chunk of ciphertext into `out`
///
/// Plaintext written here must not be used before `tinygcm_decryption_final`
/// returns `TINYGCM_SUCCESS`.
///
/// # Safety
///
/// Same contract as `tinygcm_encryption_update`.
#[no_mangle]
pub unsafe extern "C" fn tinygcm_decryption_update(
    ctx: *mut TinyGcmContext,
    out: *mut u8,
    out_len: size_t,
    r#in: *const u8,
    in_len: size_t,
) -> c_int {
    update("tinygcm_decryption_update", Direction::Decrypt, ctx, out, out_len, r#in, in_len)
}

/// Finish the message by checking `tag`
///
/// Returns `TINYGCM_AUTH_FAIL` on a mismatch, in which case all plaintext
/// produced for the message must be discarded.
///
/// # Safety
///
/// `tag` must point to `tag_len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn tinygcm_decryption_final(
    ctx: *mut TinyGcmContext,
    tag: *const u8,
    tag_len: size_t,
) -> c_int {
    let result = (|| -> GcmResult<()> {
        let ctx = ctx.as_mut().ok_or_else(|| null_pointer("ctx"))?;
        let tag = input("tag", tag, tag_len)?;
        ctx.context.finalize_decryption(tag)
    })();
    status("tinygcm_decryption_final", result)
}
