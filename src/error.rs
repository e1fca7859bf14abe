/*!
 * Error Handling for the GCM Module
 *
 * Every failure is classified as either a caller mistake (bad argument, wrong
 * phase) or an authentication failure. Each variant carries a numeric error
 * code so that the C ABI and log output can refer to it.
 */

use thiserror::Error;

/// Error type for all GCM operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GcmError {
    #[error("Invalid parameter: {parameter} - expected {expected} - got {actual}")]
    InvalidParameter {
        parameter: String,
        expected: String,
        actual: String,
        error_code: u32,
    },

    #[error("Invalid state: {operation} is not permitted in the {phase} phase")]
    InvalidState {
        operation: String,
        phase: String,
        error_code: u32,
    },

    #[error("Authentication failed: {operation} - {cause}")]
    AuthenticationFailed {
        operation: String,
        cause: String,
        error_code: u32,
    },
}

/// Broad classification of a [`GcmError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller violated a precondition. Not retryable without fixing the call.
    InvalidArgument,
    /// The tag did not match. Any plaintext produced for this message must be discarded.
    AuthenticationFailure,
}

/// Error code constants for different error categories
pub mod error_codes {
    // Argument errors: 1000-1999
    pub const NULL_POINTER: u32 = 1001;
    pub const ZERO_LENGTH: u32 = 1002;
    pub const INVALID_TAG_LENGTH: u32 = 1003;
    pub const INVALID_IV_LENGTH: u32 = 1004;
    pub const LENGTH_LIMIT_EXCEEDED: u32 = 1005;
    pub const OUTPUT_TOO_SMALL: u32 = 1006;
    pub const INVALID_KEY_SIZE: u32 = 1007;

    // State machine errors: 2000-2999
    pub const INVALID_PHASE: u32 = 2001;
    pub const DIRECTION_MISMATCH: u32 = 2002;

    // Authentication errors: 3000-3999
    pub const TAG_MISMATCH: u32 = 3001;
}

impl GcmError {
    /// Get the numeric error code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            GcmError::InvalidParameter { error_code, .. } => *error_code,
            GcmError::InvalidState { error_code, .. } => *error_code,
            GcmError::AuthenticationFailed { error_code, .. } => *error_code,
        }
    }

    /// Classify the error as a caller mistake or an authentication failure
    pub fn category(&self) -> ErrorCategory {
        match self {
            GcmError::InvalidParameter { .. } | GcmError::InvalidState { .. } => {
                ErrorCategory::InvalidArgument
            }
            GcmError::AuthenticationFailed { .. } => ErrorCategory::AuthenticationFailure,
        }
    }

    /// Whether the error reports a tag mismatch
    pub fn is_authentication_failure(&self) -> bool {
        self.category() == ErrorCategory::AuthenticationFailure
    }

    /// Get a user-friendly error message
    pub fn user_friendly_message(&self) -> String {
        match self {
            GcmError::InvalidParameter { parameter, expected, .. } => {
                format!(
                    "Invalid parameter '{}'. Expected {}.",
                    parameter, expected
                )
            }
            GcmError::InvalidState { operation, phase, .. } => {
                format!(
                    "Operation '{}' cannot be performed while the context is in the '{}' phase.",
                    operation, phase
                )
            }
            GcmError::AuthenticationFailed { .. } => {
                "Message authentication failed. The data may have been tampered with and must be discarded."
                    .to_string()
            }
        }
    }

    /// Get suggested remediation steps
    pub fn suggested_remediation(&self) -> Option<String> {
        match self.error_code() {
            error_codes::INVALID_TAG_LENGTH => Some(
                "Use a tag of 12 to 16 bytes. Tags shorter than 8 bytes are never accepted."
                    .to_string(),
            ),
            error_codes::INVALID_IV_LENGTH => Some(
                "Use a 12-byte IV. Other lengths are only accepted with IvPolicy::Any.".to_string(),
            ),
            error_codes::LENGTH_LIMIT_EXCEEDED => Some(
                "Split the message or switch the configuration to LengthLimit::Standard."
                    .to_string(),
            ),
            error_codes::INVALID_PHASE | error_codes::DIRECTION_MISMATCH => Some(
                "Call init, then update any number of times, then the matching finalize."
                    .to_string(),
            ),
            error_codes::TAG_MISMATCH => Some(
                "Discard all plaintext produced for this message. Check key, IV and AAD.".to_string(),
            ),
            _ => None,
        }
    }

    /// Get the error category/type as a string
    pub fn error_type(&self) -> &'static str {
        match self {
            GcmError::InvalidParameter { .. } => "InvalidParameter",
            GcmError::InvalidState { .. } => "InvalidState",
            GcmError::AuthenticationFailed { .. } => "AuthenticationFailed",
        }
    }
}

/// Convenience constructors for common error types
impl GcmError {
    pub fn invalid_parameter(parameter: &str, expected: &str, actual: &str, error_code: u32) -> Self {
        GcmError::InvalidParameter {
            parameter: parameter.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            error_code,
        }
    }

    pub fn zero_length(parameter: &str) -> Self {
        Self::invalid_parameter(parameter, "a non-empty buffer", "0 bytes", error_codes::ZERO_LENGTH)
    }

    pub fn invalid_state(operation: &str, phase: impl std::fmt::Display, error_code: u32) -> Self {
        GcmError::InvalidState {
            operation: operation.to_string(),
            phase: phase.to_string(),
            error_code,
        }
    }

    pub fn authentication_failed(operation: &str, cause: &str) -> Self {
        GcmError::AuthenticationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
            error_code: error_codes::TAG_MISMATCH,
        }
    }
}

/// Result type alias for GCM operations
pub type GcmResult<T> = Result<T, GcmError>;
