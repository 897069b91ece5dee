//! Test fixtures for shared error codes and envelopes.

use kuma_find_shared::{ErrorCode, ErrorEnvelope};

/// Return a list of common error codes used in tests.
pub fn common_error_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::invalid_input(),
        ErrorCode::not_found(),
        ErrorCode::permission_denied(),
        ErrorCode::not_a_directory(),
        ErrorCode::io(),
        ErrorCode::internal(),
    ]
}

/// An invalid input error fixture.
pub fn invalid_input_error() -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::invalid_input(), "invalid input")
}

/// A permission error fixture, as produced by an unreadable directory.
pub fn permission_denied_error() -> ErrorEnvelope {
    ErrorEnvelope::unexpected(ErrorCode::permission_denied(), "permission denied")
        .with_metadata("path", "/fleet/private")
}
