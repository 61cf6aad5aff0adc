use thiserror::Error;

use crate::response::response_model::FailureReason;

/// A request that could not produce a response at all.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("more than {limit} redirects, last to {url}")]
    TooManyRedirects { url: String, limit: usize },

    /// Connection-level failure reported by a non-reqwest transport.
    #[error("connection failed: {0}")]
    Connection(String),
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Required fields were empty; no request was sent.
    #[error("missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    /// The triggering control already has a request in flight.
    #[error("control '{0}' is busy")]
    ControlBusy(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("server responded with status {status}")]
    ServerFailure { status: u16 },

    #[error("unrecognized response from server")]
    UnrecognizedResponse,

    #[error("network error: {0}")]
    Network(String),

    #[error("could not decode cart response: {0}")]
    CartPayload(#[from] serde_json::Error),

    #[error("unknown payment field '{0}' (expected card_number, expiry_date or cvv)")]
    UnknownField(String),

    #[error("unknown checkout trigger '{0}' (expected normal or quick)")]
    UnknownTrigger(String),

    #[error("config error ({path}): {message}")]
    Config { path: String, message: String },
}

impl From<&FailureReason> for CheckoutError {
    fn from(reason: &FailureReason) -> Self {
        match reason {
            FailureReason::NonSuccessStatus(status) => {
                CheckoutError::ServerFailure { status: *status }
            }
            FailureReason::UnrecognizedResponse => CheckoutError::UnrecognizedResponse,
            FailureReason::NetworkError(msg) => CheckoutError::Network(msg.clone()),
        }
    }
}
