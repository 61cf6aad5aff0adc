use std::time::Duration;

use crate::checkout::context::{SubmissionContext, Trigger};
use crate::checkout::plan::{PageAction, build_request, plan_resolution};
use crate::checkout::settings::CheckoutSettings;
use crate::control::button::ButtonStateMachine;
use crate::control::control_model::{ControlState, FULL_OPACITY, TransitionOutcome};
use crate::error::{CheckoutError, TransportError};
use crate::format::formatter::PaymentField;
use crate::page::page_model::{
    CHECKOUT_FORM_IDS, ITEM_SKELETON, PRODUCT_ID, Page, QUICK_PURCHASE_BUTTON, REAL_ITEM_DETAILS,
};
use crate::response::classifier::{classify_response, classify_transport_error};
use crate::response::response_model::HttpResponse;
use crate::schedule::timer::{DeferredTask, TimerQueue};
use crate::trace::{logger::TraceLogger, trace::TraceEvent};
use crate::transport::http::{HttpRequest, Transport};

/// A request that has been issued but not yet resolved.
///
/// Produced by [`Orchestrator::begin`] and consumed by
/// [`Orchestrator::resolve`]; the network call happens in between.
#[derive(Debug)]
pub struct PendingSubmission {
    id: u64,
    trigger: Trigger,
    control_id: Option<String>,
    request: HttpRequest,
}

impl PendingSubmission {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn control_id(&self) -> Option<&str> {
        self.control_id.as_deref()
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }
}

/// Terminal state of one submission.
#[derive(Debug)]
pub enum SubmissionEnd {
    Navigated { url: String },
    /// The document body was replaced with a server-rendered page.
    Rendered,
    /// The control is back to Idle and the user has been told why.
    Restored { error: CheckoutError },
}

/// Drives checkout submissions against an injected page and transport.
pub struct Orchestrator<P: Page, T: Transport> {
    pub(crate) page: P,
    pub(crate) transport: T,
    pub(crate) settings: CheckoutSettings,
    pub(crate) buttons: ButtonStateMachine,
    pub(crate) timers: TimerQueue,
    pub(crate) tracer: TraceLogger,
    next_submission: u64,
}

impl<P: Page, T: Transport> Orchestrator<P, T> {
    pub fn new(page: P, transport: T, settings: CheckoutSettings) -> Self {
        Self {
            page,
            transport,
            settings,
            buttons: ButtonStateMachine::new(),
            timers: TimerQueue::new(),
            tracer: TraceLogger::disabled(),
            next_submission: 1,
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    pub fn buttons(&self) -> &ButtonStateMachine {
        &self.buttons
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn tracer(&self) -> &TraceLogger {
        &self.tracer
    }

    pub(crate) fn next_id(&mut self) -> u64 {
        let id = self.next_submission;
        self.next_submission += 1;
        id
    }

    // ---------------------------------------------------------------------
    // Page lifecycle and keystrokes
    // ---------------------------------------------------------------------

    /// Page finished loading: queue the skeleton → details swap.
    pub fn on_ready(&mut self) {
        let delay = self.settings.delays.reveal();
        self.timers.schedule(delay, DeferredTask::RevealItemDetails);
    }

    /// Reformat a payment field after a keystroke and write it back.
    /// Returns the new value, or `None` for fields that are not reformatted.
    pub fn handle_input(&mut self, element_id: &str, raw: &str) -> Option<String> {
        let field = PaymentField::from_element_id(element_id)?;
        let formatted = field.format(raw);
        self.page.set_value(element_id, &formatted);
        Some(formatted)
    }

    // ---------------------------------------------------------------------
    // Submission
    // ---------------------------------------------------------------------

    /// Issue a submission and apply its result to the page.
    pub fn submit(&mut self, trigger: Trigger) -> Result<SubmissionEnd, CheckoutError> {
        let pending = self.begin(trigger)?;
        let result = self.transport.post(pending.request());
        Ok(self.resolve(pending, result))
    }

    /// First half of a submission: validate, build the request and put the
    /// triggering control into Busy.
    ///
    /// Returns `ControlBusy` without touching the page when that control
    /// already has a request in flight. A validation failure alerts the user
    /// and leaves the control Idle.
    pub fn begin(&mut self, trigger: Trigger) -> Result<PendingSubmission, CheckoutError> {
        let id = self.next_id();
        let form_id = self.checkout_form_id();
        let control_id = match trigger {
            Trigger::StandardForm => form_id
                .as_deref()
                .and_then(|form| self.page.submit_control(form)),
            Trigger::QuickPurchase => Some(QUICK_PURCHASE_BUTTON.to_string()),
        };

        if let Some(control) = control_id.as_deref() {
            if self.buttons.is_busy(control) {
                self.tracer.log(
                    &TraceEvent::now(id, "rejected")
                        .with_trigger(trigger)
                        .with_control(control, ControlState::Busy),
                );
                return Err(CheckoutError::ControlBusy(control.to_string()));
            }
        }

        let context = match self.build_context(trigger, form_id.as_deref()) {
            Ok(context) => context,
            Err(e) => {
                let notice = self.settings.notices.missing_fields.clone();
                self.page.alert(&notice);
                self.tracer.log(
                    &TraceEvent::now(id, "validation_failed")
                        .with_trigger(trigger)
                        .with_detail(&e),
                );
                return Err(e);
            }
        };

        let request = build_request(context, &self.settings);

        if let Some(control) = control_id.as_deref() {
            let busy_label = self.busy_label(trigger);
            let outcome = self.buttons.transition(
                control,
                self.page.control(control),
                ControlState::Busy,
                Some(&busy_label),
            );
            if outcome == TransitionOutcome::Rejected {
                return Err(CheckoutError::ControlBusy(control.to_string()));
            }
        }

        let mut event = TraceEvent::now(id, "request")
            .with_trigger(trigger)
            .with_request_url(&request.url);
        if let Some(control) = control_id.as_deref() {
            event = event.with_control(control, self.buttons.state(control));
        }
        self.tracer.log(&event);

        Ok(PendingSubmission {
            id,
            trigger,
            control_id,
            request,
        })
    }

    /// Second half of a submission: classify what the transport produced and
    /// reconcile the page with it.
    pub fn resolve(
        &mut self,
        pending: PendingSubmission,
        result: Result<HttpResponse, TransportError>,
    ) -> SubmissionEnd {
        let classification = match &result {
            Ok(response) => classify_response(response, &self.settings.markers, pending.trigger),
            Err(e) => classify_transport_error(e),
        };

        self.tracer.log(
            &TraceEvent::now(pending.id, "outcome")
                .with_trigger(pending.trigger)
                .with_outcome(classification.outcome.label()),
        );

        let plan = plan_resolution(&classification, &self.settings);

        if let Some(notice) = &plan.notice {
            self.page.alert(notice);
        }

        match plan.action {
            PageAction::Navigate { url } => {
                self.leave_page(&url);
                self.trace_action(pending.id, "navigate", &url);
                SubmissionEnd::Navigated { url }
            }
            PageAction::ReplaceBody { html } => {
                self.page.replace_body(&html);
                self.buttons.clear();
                self.trace_action(pending.id, "replace_body", html.len());
                SubmissionEnd::Rendered
            }
            PageAction::RestoreControl { notice, reason } => {
                self.page.alert(&notice);
                if let Some(control) = pending.control_id.as_deref() {
                    self.buttons.transition(
                        control,
                        self.page.control(control),
                        ControlState::Idle,
                        None,
                    );
                }
                self.trace_action(pending.id, "restore", &reason);
                SubmissionEnd::Restored {
                    error: CheckoutError::from(&reason),
                }
            }
        }
    }

    fn build_context(
        &self,
        trigger: Trigger,
        form_id: Option<&str>,
    ) -> Result<SubmissionContext, CheckoutError> {
        let product_id = self.page.attribute(PRODUCT_ID, "value");
        match trigger {
            Trigger::StandardForm => {
                let fields = form_id
                    .and_then(|form| self.page.form_fields(form))
                    .unwrap_or_default();
                SubmissionContext::standard(product_id, fields)
            }
            Trigger::QuickPurchase => Ok(SubmissionContext::quick(product_id)),
        }
    }

    fn checkout_form_id(&self) -> Option<String> {
        CHECKOUT_FORM_IDS
            .iter()
            .find(|id| self.page.form_fields(id).is_some())
            .map(|id| id.to_string())
    }

    fn busy_label(&self, trigger: Trigger) -> String {
        match trigger {
            Trigger::StandardForm => self.settings.labels.processing_checkout.clone(),
            Trigger::QuickPurchase => self.settings.labels.processing.clone(),
        }
    }

    fn trace_action(&self, id: u64, action: &str, detail: impl ToString) {
        self.tracer.log(
            &TraceEvent::now(id, "page_action")
                .with_outcome(action)
                .with_detail(detail),
        );
    }

    // ---------------------------------------------------------------------
    // Deferred work
    // ---------------------------------------------------------------------

    /// Advance the virtual clock and run every task that became due.
    /// Returns how many tasks ran. Due tasks left over once a task has
    /// navigated away are dropped.
    pub fn advance(&mut self, by: Duration) -> usize {
        let due = self.timers.advance(by);
        let epoch = self.timers.epoch();
        let mut count = 0;
        for task in due {
            if self.timers.epoch() != epoch {
                break;
            }
            self.run_deferred(task);
            count += 1;
        }
        count
    }

    /// Run every queued task regardless of its deadline.
    pub fn flush_timers(&mut self) -> usize {
        let mut ran = 0;
        while let Some(wait) = self.timers.next_deadline() {
            ran += self.advance(wait);
        }
        ran
    }

    pub fn run_deferred(&mut self, task: DeferredTask) {
        self.tracer.log(
            &TraceEvent::now(0, "deferred").with_detail(format!("{:?}", task)),
        );

        match task {
            DeferredTask::ResetControl { control_id } => {
                self.buttons.transition(
                    &control_id,
                    self.page.control(&control_id),
                    ControlState::Idle,
                    None,
                );
            }
            DeferredTask::RevealItemDetails => {
                if self.page.has_element(ITEM_SKELETON) && self.page.has_element(REAL_ITEM_DETAILS) {
                    self.page.set_visible(ITEM_SKELETON, false);
                    self.page.set_visible(REAL_ITEM_DETAILS, true);
                }
            }
            DeferredTask::Navigate { url } => self.leave_page(&url),
            DeferredTask::PromptLogin { control_id } => {
                self.prompt_login(&control_id);
            }
        }
    }

    /// Navigate away. Controls and queued tasks belong to the old document.
    pub(crate) fn leave_page(&mut self, url: &str) {
        self.page.navigate(url);
        self.buttons.clear();
        self.timers.clear();
    }

    pub(crate) fn restore_opacity(&mut self, control_id: &str) {
        if let Some(control) = self.page.control(control_id) {
            control.set_opacity(FULL_OPACITY);
        }
    }
}
