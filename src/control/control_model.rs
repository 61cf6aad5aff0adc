use serde::{Deserialize, Serialize};

/// Opacity applied to a control while a request is in flight.
pub const BUSY_OPACITY: f32 = 0.7;
pub const FULL_OPACITY: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlState {
    Idle,
    Busy,
    Success,
    Error,
}

/// Presentation bookkeeping for one interactive control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlPresentation {
    pub state: ControlState,
    /// Label shown when the control is idle; restored after Busy/Success/Error.
    pub idle_label: String,
    /// Label shown while busy. Empty until the first Busy transition.
    pub busy_label: String,
}

impl ControlPresentation {
    pub fn new(idle_label: impl Into<String>) -> Self {
        Self {
            state: ControlState::Idle,
            idle_label: idle_label.into(),
            busy_label: String::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state == ControlState::Busy
    }
}

/// Result of asking the state machine to move a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    /// Busy requested while the control was already busy.
    Rejected,
    /// No control was present on the page.
    Absent,
}

/// DOM boundary for a clickable control.
///
/// A control's visible label either lives in a nested element (an inner
/// `<span>`) or is the control's own text. Implementors report which one
/// exists through [`Control::nested_label`].
pub trait Control {
    fn set_disabled(&mut self, disabled: bool);

    fn set_opacity(&mut self, opacity: f32);

    /// Text of the nested label element, or `None` if the control has none.
    fn nested_label(&self) -> Option<String>;

    fn set_nested_label(&mut self, text: &str);

    fn own_text(&self) -> String;

    fn set_own_text(&mut self, text: &str);

    fn attribute(&self, _name: &str) -> Option<String> {
        None
    }
}

/// In-memory control element. Backs the console page and test fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementControl {
    pub id: String,
    pub disabled: bool,
    pub opacity: f32,
    pub text: String,
    pub label_span: Option<String>,
    pub attributes: Vec<(String, String)>,
}

impl Default for ElementControl {
    fn default() -> Self {
        Self {
            id: String::new(),
            disabled: false,
            opacity: FULL_OPACITY,
            text: String::new(),
            label_span: None,
            attributes: Vec::new(),
        }
    }
}

impl ElementControl {
    /// A control whose label lives in an inner span.
    pub fn with_span(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label_span: Some(label.to_string()),
            ..Default::default()
        }
    }

    /// A control whose label is its own text.
    pub fn with_text(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            text: label.to_string(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|value| value.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Whatever label the user currently sees.
    pub fn visible_label(&self) -> &str {
        self.label_span.as_deref().unwrap_or(&self.text)
    }
}

impl Control for ElementControl {
    fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    fn nested_label(&self) -> Option<String> {
        self.label_span.clone()
    }

    fn set_nested_label(&mut self, text: &str) {
        if let Some(span) = self.label_span.as_mut() {
            *span = text.to_string();
        }
    }

    fn own_text(&self) -> String {
        self.text.clone()
    }

    fn set_own_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}
