use crate::control::control_model::Control;

// Element ids and classes the controller reads from or writes to.
pub const CHECKOUT_FORM: &str = "checkout-form";
pub const NORMAL_CHECKOUT_FORM: &str = "normal-checkout-form";
pub const QUICK_PURCHASE_BUTTON: &str = "quick-purchase-btn";
pub const ITEM_SKELETON: &str = "item-skeleton";
pub const REAL_ITEM_DETAILS: &str = "real-item-details";
pub const PRODUCT_ID: &str = "product-id";
pub const CART_COUNT: &str = "cart-count";

pub const ADD_TO_CART_CLASS: &str = "add-to-cart";
pub const BUY_NOW_CLASS: &str = "buy-now";
pub const LOGIN_REQUIRED_CLASS: &str = "login-required";
pub const HIDDEN_CLASS: &str = "hidden";

/// Form ids searched, in order, for the standard checkout form.
pub const CHECKOUT_FORM_IDS: [&str; 2] = [CHECKOUT_FORM, NORMAL_CHECKOUT_FORM];

/// The document the controller is attached to.
///
/// Everything the controller knows about the page arrives through this trait,
/// so the orchestration logic runs against any implementation: a browser
/// binding, the console page used by the CLI, or a test fixture.
pub trait Page {
    fn control(&mut self, id: &str) -> Option<&mut dyn Control>;

    /// Ids of controls carrying `class`, in document order.
    fn controls_with_class(&self, class: &str) -> Vec<String>;

    /// Current `(name, value)` pairs of a form, or `None` if the form is absent.
    fn form_fields(&self, form_id: &str) -> Option<Vec<(String, String)>>;

    /// Id of the form's submit control.
    fn submit_control(&self, form_id: &str) -> Option<String>;

    fn has_element(&self, id: &str) -> bool;

    fn attribute(&self, element_id: &str, name: &str) -> Option<String>;

    /// Write back into an input (and its form) after reformatting.
    fn set_value(&mut self, element_id: &str, value: &str);

    fn set_text(&mut self, element_id: &str, text: &str);

    fn set_visible(&mut self, element_id: &str, visible: bool);

    fn remove_class(&mut self, element_id: &str, class: &str);

    /// Blocking notice dialog.
    fn alert(&mut self, message: &str);

    /// Blocking yes/no dialog.
    fn confirm(&mut self, message: &str) -> bool;

    fn navigate(&mut self, url: &str);

    /// Replace the whole body, discarding the current subtree and its listeners.
    fn replace_body(&mut self, html: &str);
}
