use std::collections::HashMap;

use crate::control::control_model::{
    BUSY_OPACITY, Control, ControlPresentation, ControlState, FULL_OPACITY, TransitionOutcome,
};

/// Tracks the idle/busy/success/error presentation of every control it has seen.
///
/// The machine does not know which action drove a control busy, and it never
/// schedules its own follow-up transitions: a caller that shows a transient
/// Success label is responsible for moving the control back to Idle.
#[derive(Debug, Default)]
pub struct ButtonStateMachine {
    presentations: HashMap<String, ControlPresentation>,
}

impl ButtonStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn presentation(&self, control_id: &str) -> Option<&ControlPresentation> {
        self.presentations.get(control_id)
    }

    /// Current state; controls never transitioned are Idle.
    pub fn state(&self, control_id: &str) -> ControlState {
        self.presentations
            .get(control_id)
            .map(|p| p.state)
            .unwrap_or(ControlState::Idle)
    }

    pub fn is_busy(&self, control_id: &str) -> bool {
        self.state(control_id) == ControlState::Busy
    }

    pub fn busy_count(&self) -> usize {
        self.presentations.values().filter(|p| p.is_busy()).count()
    }

    /// Move `control` to `target`.
    ///
    /// `label` is the busy label for Busy, and an optional override for the
    /// other states (which otherwise restore the remembered idle label).
    pub fn transition(
        &mut self,
        control_id: &str,
        control: Option<&mut dyn Control>,
        target: ControlState,
        label: Option<&str>,
    ) -> TransitionOutcome {
        let Some(control) = control else {
            return TransitionOutcome::Absent;
        };

        // The idle label is captured the first time a control is seen, before
        // any transient label can overwrite it.
        let presentation = self
            .presentations
            .entry(control_id.to_string())
            .or_insert_with(|| ControlPresentation::new(read_label(control)));

        match target {
            ControlState::Busy => {
                if presentation.is_busy() {
                    return TransitionOutcome::Rejected;
                }
                let busy_label = label
                    .map(str::to_string)
                    .unwrap_or_else(|| read_label(control));

                control.set_disabled(true);
                control.set_opacity(BUSY_OPACITY);
                write_label(control, &busy_label);

                presentation.busy_label = busy_label;
            }

            ControlState::Idle | ControlState::Success | ControlState::Error => {
                let shown = label.unwrap_or(presentation.idle_label.as_str()).to_string();

                control.set_disabled(false);
                control.set_opacity(FULL_OPACITY);
                write_label(control, &shown);
            }
        }

        presentation.state = target;
        TransitionOutcome::Applied
    }

    /// Drop bookkeeping for a control that left the page.
    pub fn forget(&mut self, control_id: &str) -> Option<ControlPresentation> {
        self.presentations.remove(control_id)
    }

    /// Drop every presentation, e.g. when the document is replaced or left.
    pub fn clear(&mut self) {
        self.presentations.clear();
    }
}

fn read_label(control: &dyn Control) -> String {
    control.nested_label().unwrap_or_else(|| control.own_text())
}

fn write_label(control: &mut dyn Control, text: &str) {
    if control.nested_label().is_some() {
        control.set_nested_label(text);
    } else {
        control.set_own_text(text);
    }
}
