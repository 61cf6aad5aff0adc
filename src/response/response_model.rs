use std::fmt;

use serde::{Deserialize, Serialize};

/// What the transport observed for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// The transport followed at least one redirect before producing this response.
    pub redirected: bool,
    /// Final URL after any redirects.
    pub url: String,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(url: &str, body: &str) -> Self {
        Self {
            status: 200,
            redirected: false,
            url: url.to_string(),
            body: body.to_string(),
        }
    }

    pub fn redirect(final_url: &str) -> Self {
        Self {
            status: 200,
            redirected: true,
            url: final_url.to_string(),
            body: String::new(),
        }
    }

    pub fn with_status(url: &str, status: u16, body: &str) -> Self {
        Self {
            status,
            redirected: false,
            url: url.to_string(),
            body: body.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    NonSuccessStatus(u16),
    /// Ok status, but the body carried neither a completion marker nor a flash message.
    UnrecognizedResponse,
    NetworkError(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NonSuccessStatus(status) => {
                write!(f, "non-success status ({})", status)
            }
            FailureReason::UnrecognizedResponse => write!(f, "unrecognized response"),
            FailureReason::NetworkError(msg) => write!(f, "network error: {}", msg),
        }
    }
}

/// The next UI action implied by a server response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResponseOutcome {
    Redirected { target_url: String },
    /// The server reports the purchase completed.
    SuccessSignal,
    /// A full page carrying a user-facing flash message.
    RenderableDocument { html: String },
    Failure { reason: FailureReason },
}

impl ResponseOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ResponseOutcome::Redirected { .. } => "redirected",
            ResponseOutcome::SuccessSignal => "success_signal",
            ResponseOutcome::RenderableDocument { .. } => "renderable_document",
            ResponseOutcome::Failure { .. } => "failure",
        }
    }
}

/// Literal phrases the server embeds in a body once a purchase completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMarkers {
    #[serde(default = "default_checkout_marker")]
    pub checkout: String,
    #[serde(default = "default_quick_purchase_marker")]
    pub quick_purchase: String,
}

impl CompletionMarkers {
    pub fn found_in(&self, body: &str) -> bool {
        [&self.checkout, &self.quick_purchase]
            .iter()
            .any(|marker| !marker.is_empty() && body.contains(marker.as_str()))
    }
}

impl Default for CompletionMarkers {
    fn default() -> Self {
        Self {
            checkout: default_checkout_marker(),
            quick_purchase: default_quick_purchase_marker(),
        }
    }
}

fn default_checkout_marker() -> String { "Checkout completed successfully".to_string() }
fn default_quick_purchase_marker() -> String { "Quick purchase completed successfully".to_string() }
