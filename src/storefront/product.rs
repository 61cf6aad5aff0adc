use crate::checkout::orchestrator::Orchestrator;
use crate::checkout::plan::request_target;
use crate::control::control_model::{BUSY_OPACITY, ControlState, TransitionOutcome};
use crate::error::CheckoutError;
use crate::page::page_model::{ADD_TO_CART_CLASS, BUY_NOW_CLASS, LOGIN_REQUIRED_CLASS, Page};
use crate::schedule::timer::DeferredTask;
use crate::storefront::cart::{CartOutcome, PRODUCT_ID_ATTRIBUTE, PRODUCT_NAME_ATTRIBUTE};
use crate::trace::trace::TraceEvent;
use crate::transport::http::Transport;

/// What a click on a storefront control led to.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Cart(CartOutcome),
    /// Navigation to this checkout URL is queued.
    BuyNow { url: String },
    /// The login prompt is queued.
    LoginPrompt,
    /// The control carries none of the storefront classes.
    Ignored,
}

impl<P: Page, T: Transport> Orchestrator<P, T> {
    /// Route a click by the control's class. `login-required` wins over
    /// `add-to-cart` since anonymous visitors get both.
    pub fn click(&mut self, control_id: &str) -> Result<ClickOutcome, CheckoutError> {
        let has_class = |page: &P, class: &str| {
            page.controls_with_class(class)
                .iter()
                .any(|id| id == control_id)
        };

        if has_class(&self.page, LOGIN_REQUIRED_CLASS) {
            self.login_required(control_id);
            Ok(ClickOutcome::LoginPrompt)
        } else if has_class(&self.page, BUY_NOW_CLASS) {
            let url = self.buy_now(control_id)?;
            Ok(ClickOutcome::BuyNow { url })
        } else if has_class(&self.page, ADD_TO_CART_CLASS) {
            Ok(ClickOutcome::Cart(self.add_to_cart(control_id)?))
        } else {
            Ok(ClickOutcome::Ignored)
        }
    }

    /// Click on a `buy-now` button: show the busy label, then leave for the
    /// product's checkout page once the buy-now delay has elapsed.
    pub fn buy_now(&mut self, control_id: &str) -> Result<String, CheckoutError> {
        let product_id = self.page.attribute(control_id, PRODUCT_ID_ATTRIBUTE);
        let url = request_target(&self.settings.endpoints.checkout, product_id.as_deref());

        let label = self.settings.labels.processing.clone();
        let transition = self.buttons.transition(
            control_id,
            self.page.control(control_id),
            ControlState::Busy,
            Some(&label),
        );
        if transition == TransitionOutcome::Rejected {
            return Err(CheckoutError::ControlBusy(control_id.to_string()));
        }

        let delay = self.settings.delays.buy_now();
        self.timers.schedule(delay, DeferredTask::Navigate { url: url.clone() });
        Ok(url)
    }

    /// Click on a `login-required` button (anonymous visitor): dim it briefly,
    /// then ask whether to go to the login page.
    pub fn login_required(&mut self, control_id: &str) {
        if let Some(control) = self.page.control(control_id) {
            control.set_opacity(BUSY_OPACITY);
        }
        let delay = self.settings.delays.login_prompt();
        self.timers.schedule(
            delay,
            DeferredTask::PromptLogin {
                control_id: control_id.to_string(),
            },
        );
    }

    pub(crate) fn prompt_login(&mut self, control_id: &str) {
        self.restore_opacity(control_id);

        let product_name = self
            .page
            .attribute(control_id, PRODUCT_NAME_ATTRIBUTE)
            .unwrap_or_default();
        let question = format!(
            "Please log in to add \"{}\" to your cart. Would you like to log in now?",
            product_name
        );

        let accepted = self.page.confirm(&question);
        self.tracer.log(
            &TraceEvent::now(0, "login_prompt")
                .with_outcome(if accepted { "accepted" } else { "declined" })
                .with_detail(control_id),
        );

        if accepted {
            let login = self.settings.endpoints.login.clone();
            self.leave_page(&login);
        }
    }
}
