//! HTTP status classification.
//!
//! Maps a failed response's status code to a [`FetchError`]. The mapping is
//! total: every status produces an error with a stable message.
//!
//! | Status | Error | Retryable | Memoized |
//! |--------|-------|-----------|----------|
//! | 401 | `Unauthorized` | no | yes |
//! | 402 | `PaymentRequired` | no | yes |
//! | 403 | `Forbidden` | no | yes |
//! | 404 | `NotFound` | no | yes |
//! | 5xx | `Server` | yes | no |
//! | other 4xx | `Client` | no | no |
//! | anything else | `Http` | no | no |

use crate::error::FetchError;

/// Classifies a non-success HTTP status into a typed error.
///
/// `status_text` is the reason phrase or the API's own message; when empty, a
/// generic description of the status is used instead.
#[must_use]
pub fn classify_status(status: u16, status_text: &str) -> FetchError {
    let message = if status_text.trim().is_empty() {
        default_reason(status).to_string()
    } else {
        status_text.trim().to_string()
    };

    match status {
        401 => FetchError::Unauthorized { message },
        402 => FetchError::PaymentRequired { message },
        403 => FetchError::Forbidden { message },
        404 => FetchError::NotFound { message },
        500..=599 => FetchError::Server { status, message },
        400..=499 => FetchError::Client { status, message },
        _ => FetchError::Http { status, message },
    }
}

fn default_reason(status: u16) -> &'static str {
    match status {
        401 => "Invalid API credentials",
        402 => "API plan or quota limit reached",
        403 => "Access forbidden",
        404 => "Symbol not found",
        500..=599 => "Server error",
        400..=499 => "Client error",
        _ => "Unexpected status",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_status_table() {
        let cases = [
            (401, ErrorKind::Unauthorized, false, true),
            (402, ErrorKind::PaymentRequired, false, true),
            (403, ErrorKind::Forbidden, false, true),
            (404, ErrorKind::NotFound, false, true),
            (500, ErrorKind::Server, true, false),
            (503, ErrorKind::Server, true, false),
            (599, ErrorKind::Server, true, false),
            (400, ErrorKind::Client, false, false),
            (429, ErrorKind::Client, false, false),
            (418, ErrorKind::Client, false, false),
            (302, ErrorKind::Http, false, false),
        ];

        for (status, kind, retryable, memoizable) in cases {
            let err = classify_status(status, "reason");
            assert_eq!(err.kind(), kind, "status {status}");
            assert_eq!(err.is_retryable(), retryable, "status {status}");
            assert_eq!(err.is_memoizable(), memoizable, "status {status}");
            assert_eq!(err.status(), Some(status));
        }
    }

    #[test]
    fn test_empty_reason_falls_back_to_default() {
        let err = classify_status(402, "");
        assert_eq!(err.to_string(), "Payment required: API plan or quota limit reached");

        let err = classify_status(599, "  ");
        assert_eq!(err.to_string(), "Server error 599: Server error");
    }

    #[test]
    fn test_reason_is_kept() {
        let err = classify_status(404, "Not Found");
        assert_eq!(err.to_string(), "Not found: Not Found");
        assert_eq!(err.name(), "NotFoundError");
    }
}
