//! AWS error classification
//!
//! Turns SDK errors into a small typed enum using the error code from
//! `ProvideErrorMetadata` rather than matching on Debug output.

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata};
use thiserror::Error;

/// AWS error categories surfaced in sweep reports
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AwsError {
    /// Resource was not found (e.g. the image was deregistered concurrently)
    #[error("resource not found: {message}")]
    NotFound { message: String },

    /// Rate limit exceeded
    #[error("rate limit exceeded: {message}")]
    Throttled { message: String },

    /// Credentials lack permission, or the region is not enabled for the account
    #[error("access denied: {message}")]
    AccessDenied { message: String },

    /// Any other SDK error, with its code when the service returned one
    #[error("{}", format_sdk(code.as_deref(), message))]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

fn format_sdk(code: Option<&str>, message: &str) -> String {
    match code {
        Some(code) => format!("AWS error {code}: {message}"),
        None => format!("AWS error: {message}"),
    }
}

impl AwsError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AwsError::NotFound { .. })
    }

    /// Build an error from any SDK operation error.
    pub fn from_sdk<E>(err: &E) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
    {
        let message = err
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| DisplayErrorContext(err).to_string());
        classify_aws_error(err.code(), Some(&message))
    }
}

/// Known AWS error codes for "not found" conditions
const NOT_FOUND_CODES: &[&str] = &[
    "InvalidAMIID.NotFound",
    "InvalidAMIID.Unavailable",
    "InvalidInstanceID.NotFound",
    "NoSuchEntity",
];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

/// Known AWS error codes for permission and opt-in problems
const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "UnauthorizedOperation",
    "AuthFailure",
    "OptInRequired",
];

/// Classify an AWS SDK error using the error code.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound { message },
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled { message },
        Some(c) if ACCESS_DENIED_CODES.contains(&c) => AwsError::AccessDenied { message },
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_codes() {
        for code in NOT_FOUND_CODES {
            let err = classify_aws_error(Some(code), Some("some message"));
            assert!(err.is_not_found(), "Expected NotFound for code: {code}");
        }
    }

    #[test]
    fn throttling_codes() {
        for code in THROTTLING_CODES {
            let err = classify_aws_error(Some(code), Some("msg"));
            assert!(
                matches!(err, AwsError::Throttled { .. }),
                "Expected Throttled for code: {code}"
            );
        }
    }

    #[test]
    fn access_denied_codes() {
        for code in ACCESS_DENIED_CODES {
            let err = classify_aws_error(Some(code), Some("msg"));
            assert!(
                matches!(err, AwsError::AccessDenied { .. }),
                "Expected AccessDenied for code: {code}"
            );
        }
    }

    #[test]
    fn unknown_and_missing_codes() {
        let err = classify_aws_error(Some("SomeNewError"), Some("details"));
        assert_eq!(
            err,
            AwsError::Sdk {
                code: Some("SomeNewError".to_string()),
                message: "details".to_string()
            }
        );

        let err2 = classify_aws_error(None, None);
        assert!(matches!(err2, AwsError::Sdk { code: None, .. }));
        assert_eq!(err2.to_string(), "AWS error: Unknown error");
    }

    #[test]
    fn display_includes_code() {
        let err = classify_aws_error(Some("InvalidParameterValue"), Some("bad filter"));
        assert_eq!(err.to_string(), "AWS error InvalidParameterValue: bad filter");
    }
}
