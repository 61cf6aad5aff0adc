use crate::control::control_model::Control;
use crate::page::memory::InMemoryPage;
use crate::page::page_model::Page;

/// Terminal-backed page for the CLI.
///
/// Element state lives in an [`InMemoryPage`]; dialogs and navigation are
/// printed so the user can follow what a browser would have shown.
pub struct ConsolePage {
    inner: InMemoryPage,
    verbose: u8,
}

impl ConsolePage {
    pub fn new(inner: InMemoryPage, verbose: u8) -> Self {
        Self { inner, verbose }
    }
}

impl Page for ConsolePage {
    fn control(&mut self, id: &str) -> Option<&mut dyn Control> {
        self.inner.control(id)
    }

    fn controls_with_class(&self, class: &str) -> Vec<String> {
        self.inner.controls_with_class(class)
    }

    fn form_fields(&self, form_id: &str) -> Option<Vec<(String, String)>> {
        self.inner.form_fields(form_id)
    }

    fn submit_control(&self, form_id: &str) -> Option<String> {
        self.inner.submit_control(form_id)
    }

    fn has_element(&self, id: &str) -> bool {
        self.inner.has_element(id)
    }

    fn attribute(&self, element_id: &str, name: &str) -> Option<String> {
        self.inner.attribute(element_id, name)
    }

    fn set_value(&mut self, element_id: &str, value: &str) {
        if self.verbose > 1 {
            eprintln!("[page] {} = {:?}", element_id, value);
        }
        self.inner.set_value(element_id, value);
    }

    fn set_text(&mut self, element_id: &str, text: &str) {
        if self.verbose > 0 {
            eprintln!("[page] #{} text -> {:?}", element_id, text);
        }
        self.inner.set_text(element_id, text);
    }

    fn set_visible(&mut self, element_id: &str, visible: bool) {
        if self.verbose > 1 {
            eprintln!("[page] #{} visible -> {}", element_id, visible);
        }
        self.inner.set_visible(element_id, visible);
    }

    fn remove_class(&mut self, element_id: &str, class: &str) {
        self.inner.remove_class(element_id, class);
    }

    fn alert(&mut self, message: &str) {
        eprintln!("[alert] {}", message);
        self.inner.alert(message);
    }

    fn confirm(&mut self, message: &str) -> bool {
        let answer = self.inner.confirm(message);
        eprintln!("[confirm] {} -> {}", message, if answer { "yes" } else { "no" });
        answer
    }

    fn navigate(&mut self, url: &str) {
        println!("navigate: {}", url);
        self.inner.navigate(url);
    }

    fn replace_body(&mut self, html: &str) {
        println!("--- document body replaced ---\n{}", html);
        self.inner.replace_body(html);
    }
}
