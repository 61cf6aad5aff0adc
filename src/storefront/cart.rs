use serde::Deserialize;

use crate::checkout::orchestrator::Orchestrator;
use crate::checkout::plan::request_target;
use crate::control::control_model::{ControlState, TransitionOutcome};
use crate::error::CheckoutError;
use crate::page::page_model::{CART_COUNT, HIDDEN_CLASS, Page};
use crate::schedule::timer::DeferredTask;
use crate::trace::trace::TraceEvent;
use crate::transport::http::{HttpRequest, Transport};

pub const PRODUCT_ID_ATTRIBUTE: &str = "data-product-id";
pub const PRODUCT_NAME_ATTRIBUTE: &str = "data-product-name";

/// JSON body returned by the add-to-cart endpoint, whatever the status code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartResponse {
    pub success: bool,
    #[serde(default)]
    pub cart_count: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
}

impl CartResponse {
    pub fn parse(body: &str) -> Result<Self, CheckoutError> {
        Ok(serde_json::from_str(body)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartOutcome {
    Added { cart_count: Option<u64> },
    /// The server wants the user to log in first.
    LoginPrompted { redirect: String, accepted: bool },
    Refused { message: String },
    /// Transport or decoding failure; the user saw a generic notice.
    Failed { reason: String },
}

impl<P: Page, T: Transport> Orchestrator<P, T> {
    /// Click on an `add-to-cart` button.
    pub fn add_to_cart(&mut self, control_id: &str) -> Result<CartOutcome, CheckoutError> {
        let id = self.next_id();
        let product_id = self.page.attribute(control_id, PRODUCT_ID_ATTRIBUTE);
        let url = request_target(&self.settings.endpoints.add_to_cart, product_id.as_deref());

        let busy_label = self.settings.labels.adding.clone();
        let transition = self.buttons.transition(
            control_id,
            self.page.control(control_id),
            ControlState::Busy,
            Some(&busy_label),
        );
        if transition == TransitionOutcome::Rejected {
            return Err(CheckoutError::ControlBusy(control_id.to_string()));
        }
        self.tracer.log(
            &TraceEvent::now(id, "cart_request")
                .with_control(control_id, self.buttons.state(control_id))
                .with_request_url(&url),
        );

        let parsed = self
            .transport
            .post(&HttpRequest::json(url))
            .map_err(CheckoutError::from)
            .and_then(|response| CartResponse::parse(&response.body));

        let outcome = match parsed {
            Ok(cart) if cart.success => {
                if let Some(count) = cart.cart_count {
                    self.page.set_text(CART_COUNT, &count.to_string());
                    self.page.remove_class(CART_COUNT, HIDDEN_CLASS);
                }

                let added = self.settings.labels.added.clone();
                self.buttons.transition(
                    control_id,
                    self.page.control(control_id),
                    ControlState::Success,
                    Some(&added),
                );
                let delay = self.settings.delays.success_reset();
                self.timers.schedule(
                    delay,
                    DeferredTask::ResetControl {
                        control_id: control_id.to_string(),
                    },
                );
                CartOutcome::Added {
                    cart_count: cart.cart_count,
                }
            }
            Ok(cart) => {
                let message = cart.message.unwrap_or_default();
                let outcome = match cart.redirect {
                    Some(redirect) => {
                        let accepted = self
                            .page
                            .confirm(&format!("{}. Would you like to log in now?", message));
                        CartOutcome::LoginPrompted { redirect, accepted }
                    }
                    None => {
                        self.page.alert(&format!("Error: {}", message));
                        CartOutcome::Refused { message }
                    }
                };
                self.reset_control(control_id);
                if let CartOutcome::LoginPrompted {
                    redirect,
                    accepted: true,
                } = &outcome
                {
                    self.leave_page(redirect);
                }
                outcome
            }
            Err(e) => {
                let notice = self.settings.notices.network_failed.clone();
                self.page.alert(&notice);
                self.reset_control(control_id);
                CartOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        self.tracer.log(
            &TraceEvent::now(id, "cart_outcome")
                .with_control(control_id, self.buttons.state(control_id))
                .with_outcome(format!("{:?}", outcome)),
        );

        Ok(outcome)
    }

    fn reset_control(&mut self, control_id: &str) {
        self.buttons.transition(
            control_id,
            self.page.control(control_id),
            ControlState::Idle,
            None,
        );
    }
}
