use serde::{Deserialize, Serialize};

use crate::control::control_model::{Control, ElementControl};
use crate::page::page_model::Page;

/// A non-interactive element (skeleton, detail panel, cart badge, hidden input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageElement {
    pub id: String,
    pub text: String,
    pub visible: bool,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

impl Default for PageElement {
    fn default() -> Self {
        Self {
            id: String::new(),
            text: String::new(),
            visible: true,
            classes: Vec::new(),
            attributes: Vec::new(),
        }
    }
}

impl PageElement {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageForm {
    pub id: String,
    pub fields: Vec<(String, String)>,
    pub submit_control: Option<String>,
}

/// A page held entirely in memory.
///
/// Dialogs, navigations and body replacements are recorded rather than
/// performed, so a caller can inspect what the controller did. Confirm
/// dialogs answer with `confirm_answer`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryPage {
    pub controls: Vec<ElementControl>,
    pub elements: Vec<PageElement>,
    pub forms: Vec<PageForm>,
    pub confirm_answer: bool,

    #[serde(skip)]
    pub alerts: Vec<String>,
    #[serde(skip)]
    pub confirms: Vec<String>,
    #[serde(skip)]
    pub navigations: Vec<String>,
    #[serde(skip)]
    pub body: Option<String>,
    /// Controls that were on the page when its body was replaced.
    #[serde(skip)]
    pub discarded_controls: Vec<ElementControl>,
}

impl InMemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_control(mut self, control: ElementControl) -> Self {
        self.controls.push(control);
        self
    }

    pub fn with_element(mut self, element: PageElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_form(mut self, form: PageForm) -> Self {
        self.forms.push(form);
        self
    }

    pub fn answering_confirm(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    pub fn control_ref(&self, id: &str) -> Option<&ElementControl> {
        self.controls.iter().find(|c| c.id == id)
    }

    pub fn element(&self, id: &str) -> Option<&PageElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut PageElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.forms
            .iter()
            .flat_map(|f| f.fields.iter())
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn last_navigation(&self) -> Option<&str> {
        self.navigations.last().map(String::as_str)
    }
}

impl Page for InMemoryPage {
    fn control(&mut self, id: &str) -> Option<&mut dyn Control> {
        self.controls
            .iter_mut()
            .find(|c| c.id == id)
            .map(|c| c as &mut dyn Control)
    }

    fn controls_with_class(&self, class: &str) -> Vec<String> {
        self.controls
            .iter()
            .filter(|c| c.has_class(class))
            .map(|c| c.id.clone())
            .collect()
    }

    fn form_fields(&self, form_id: &str) -> Option<Vec<(String, String)>> {
        self.forms
            .iter()
            .find(|f| f.id == form_id)
            .map(|f| f.fields.clone())
    }

    fn submit_control(&self, form_id: &str) -> Option<String> {
        self.forms
            .iter()
            .find(|f| f.id == form_id)
            .and_then(|f| f.submit_control.clone())
    }

    fn has_element(&self, id: &str) -> bool {
        self.elements.iter().any(|e| e.id == id) || self.controls.iter().any(|c| c.id == id)
    }

    fn attribute(&self, element_id: &str, name: &str) -> Option<String> {
        if let Some(control) = self.control_ref(element_id) {
            return control.attribute(name);
        }
        self.element(element_id).and_then(|e| {
            e.attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        })
    }

    fn set_value(&mut self, element_id: &str, value: &str) {
        for form in self.forms.iter_mut() {
            for (name, current) in form.fields.iter_mut() {
                if name == element_id {
                    *current = value.to_string();
                }
            }
        }
    }

    fn set_text(&mut self, element_id: &str, text: &str) {
        if let Some(element) = self.element_mut(element_id) {
            element.text = text.to_string();
        }
    }

    fn set_visible(&mut self, element_id: &str, visible: bool) {
        if let Some(element) = self.element_mut(element_id) {
            element.visible = visible;
        }
    }

    fn remove_class(&mut self, element_id: &str, class: &str) {
        if let Some(element) = self.element_mut(element_id) {
            element.classes.retain(|c| c != class);
        }
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.confirm_answer
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }

    fn replace_body(&mut self, html: &str) {
        self.discarded_controls.append(&mut self.controls);
        self.elements.clear();
        self.forms.clear();
        self.body = Some(html.to_string());
    }
}
