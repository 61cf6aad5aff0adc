use crate::checkout::context::Trigger;
use crate::error::TransportError;
use crate::response::flash::{has_flash_message, mentions_error};
use crate::response::response_model::{
    CompletionMarkers, FailureReason, HttpResponse, ResponseOutcome,
};

/// Primary outcome plus the independent error-mention check.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub outcome: ResponseOutcome,
    /// Quick purchase only: the body mentions an error even though the
    /// outcome may be a success. The user gets an alert on top of the outcome.
    pub error_notice: bool,
}

impl Classification {
    fn plain(outcome: ResponseOutcome) -> Self {
        Self {
            outcome,
            error_notice: false,
        }
    }
}

/// Decide what the page should do with a server response.
///
/// Order matters: a followed redirect wins over everything and the body is
/// not looked at; then status; then completion markers; then flash messages.
/// An ok body with neither is a success for quick purchases and a failure for
/// the standard form.
pub fn classify_response(
    response: &HttpResponse,
    markers: &CompletionMarkers,
    trigger: Trigger,
) -> Classification {
    if response.redirected {
        return Classification::plain(ResponseOutcome::Redirected {
            target_url: response.url.clone(),
        });
    }

    if !response.is_success() {
        return Classification::plain(ResponseOutcome::Failure {
            reason: FailureReason::NonSuccessStatus(response.status),
        });
    }

    let body = response.body.as_str();

    let outcome = if markers.found_in(body) {
        ResponseOutcome::SuccessSignal
    } else if has_flash_message(body) {
        ResponseOutcome::RenderableDocument {
            html: body.to_string(),
        }
    } else {
        match trigger {
            Trigger::QuickPurchase => ResponseOutcome::SuccessSignal,
            Trigger::StandardForm => ResponseOutcome::Failure {
                reason: FailureReason::UnrecognizedResponse,
            },
        }
    };

    let error_notice = trigger == Trigger::QuickPurchase
        && outcome == ResponseOutcome::SuccessSignal
        && mentions_error(body);

    Classification {
        outcome,
        error_notice,
    }
}

/// A request that never produced a response.
pub fn classify_transport_error(error: &TransportError) -> Classification {
    Classification::plain(ResponseOutcome::Failure {
        reason: FailureReason::NetworkError(error.to_string()),
    })
}
