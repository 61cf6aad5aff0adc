//! Decision logic for a submission, free of page and network effects.

use serde::Serialize;

use crate::checkout::context::SubmissionContext;
use crate::checkout::settings::CheckoutSettings;
use crate::response::classifier::Classification;
use crate::response::response_model::{FailureReason, ResponseOutcome};
use crate::transport::http::HttpRequest;

/// `{endpoint}/{id}` when an id is known, otherwise the bare endpoint.
pub fn request_target(endpoint: &str, product_id: Option<&str>) -> String {
    match product_id {
        Some(id) => format!("{}/{}", endpoint.trim_end_matches('/'), id),
        None => endpoint.to_string(),
    }
}

/// The form POST a submission context turns into.
pub fn build_request(context: SubmissionContext, settings: &CheckoutSettings) -> HttpRequest {
    let url = request_target(&settings.endpoints.checkout, context.product_id());
    HttpRequest::form(url, context.into_payload())
}

/// What the page must do once a response has been classified.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PageAction {
    Navigate { url: String },
    /// Swap in a server-rendered document. The triggering control goes with
    /// the old body, so it is not reset.
    ReplaceBody { html: String },
    /// Put the control back to Idle and tell the user what went wrong.
    RestoreControl { notice: String, reason: FailureReason },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionPlan {
    /// Alert shown before the action runs.
    pub notice: Option<String>,
    pub action: PageAction,
}

pub fn plan_resolution(classification: &Classification, settings: &CheckoutSettings) -> ResolutionPlan {
    let notice = classification
        .error_notice
        .then(|| settings.notices.error_in_response.clone());

    let action = match &classification.outcome {
        ResponseOutcome::Redirected { target_url } => PageAction::Navigate {
            url: target_url.clone(),
        },
        ResponseOutcome::SuccessSignal => PageAction::Navigate {
            url: settings.endpoints.home.clone(),
        },
        ResponseOutcome::RenderableDocument { html } => PageAction::ReplaceBody { html: html.clone() },
        ResponseOutcome::Failure { reason } => PageAction::RestoreControl {
            notice: failure_notice(reason, settings),
            reason: reason.clone(),
        },
    };

    ResolutionPlan { notice, action }
}

fn failure_notice(reason: &FailureReason, settings: &CheckoutSettings) -> String {
    match reason {
        FailureReason::NetworkError(_) => settings.notices.network_failed.clone(),
        FailureReason::NonSuccessStatus(_) | FailureReason::UnrecognizedResponse => {
            settings.notices.checkout_failed.clone()
        }
    }
}
