use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// All errors generated while talking to the market-data service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("JSON parse failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Error payload returned by Binance alongside a non-2xx status.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

impl ClientError {
    /// Build a [`ClientError::Status`] from a failed response body, preferring the exchange's
    /// own `{code, msg}` payload over the raw text.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(api) => format!("{} (code {})", api.msg, api.code),
            Err(_) if body.is_empty() => status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
            Err(_) => body.chars().take(200).collect(),
        };

        Self::Status { status, message }
    }

    /// Determine if the error was produced by the exchange rejecting the request, rather than by
    /// the transport or by an unreadable payload.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if status.is_client_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_message() {
        struct TestCase {
            status: StatusCode,
            body: &'static str,
            expected: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: Binance error payload is decoded
                status: StatusCode::BAD_REQUEST,
                body: r#"{"code":-1121,"msg":"Invalid symbol."}"#,
                expected: "Invalid symbol. (code -1121)",
            },
            TestCase {
                // TC1: empty body falls back to the canonical reason
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "",
                expected: "Service Unavailable",
            },
            TestCase {
                // TC2: non-JSON body is passed through
                status: StatusCode::BAD_GATEWAY,
                body: "upstream timeout",
                expected: "upstream timeout",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            match ClientError::from_status(test.status, test.body) {
                ClientError::Status { status, message } => {
                    assert_eq!(status, test.status, "TC{} failed", index);
                    assert_eq!(message, test.expected, "TC{} failed", index);
                }
                other => panic!("TC{} failed: unexpected {:?}", index, other),
            }
        }
    }

    #[test]
    fn test_is_rejection() {
        let rejected = ClientError::from_status(StatusCode::BAD_REQUEST, "");
        let unavailable = ClientError::from_status(StatusCode::SERVICE_UNAVAILABLE, "");

        assert!(rejected.is_rejection());
        assert!(!unavailable.is_rejection());
    }
}
