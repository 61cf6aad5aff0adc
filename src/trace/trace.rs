use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::checkout::context::Trigger;
use crate::control::control_model::ControlState;

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub submission: u64,

    pub event: String,

    pub control: Option<String>,
    pub control_state: Option<ControlState>,
    pub trigger: Option<Trigger>,

    pub request_url: Option<String>,
    pub outcome: Option<String>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(submission: u64, event: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            submission,
            event: event.to_string(),
            control: None,
            control_state: None,
            trigger: None,
            request_url: None,
            outcome: None,
            detail: None,
        }
    }

    pub fn with_control(mut self, control_id: &str, state: ControlState) -> Self {
        self.control = Some(control_id.to_string());
        self.control_state = Some(state);
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_request_url(mut self, url: &str) -> Self {
        self.request_url = Some(url.to_string());
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
