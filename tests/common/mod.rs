#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use checkout_controller::checkout::orchestrator::Orchestrator;
use checkout_controller::checkout::settings::CheckoutSettings;
use checkout_controller::control::control_model::ElementControl;
use checkout_controller::error::TransportError;
use checkout_controller::page::memory::{InMemoryPage, PageElement, PageForm};
use checkout_controller::page::page_model::{
    CART_COUNT, CHECKOUT_FORM, HIDDEN_CLASS, ITEM_SKELETON, PRODUCT_ID, QUICK_PURCHASE_BUTTON,
    REAL_ITEM_DETAILS,
};
use checkout_controller::response::response_model::HttpResponse;
use checkout_controller::transport::http::{HttpRequest, Transport};

pub const SUBMIT_BUTTON: &str = "checkout-submit";
pub const SUBMIT_LABEL: &str = "Complete Checkout";
pub const QUICK_LABEL: &str = "Quick Purchase";

/// Transport that replays queued results and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replying(response: HttpResponse) -> Self {
        let transport = Self::new();
        transport.push(Ok(response));
        transport
    }

    pub fn failing(message: &str) -> Self {
        let transport = Self::new();
        transport.push(Err(TransportError::Connection(message.to_string())));
        transport
    }

    pub fn push(&self, result: Result<HttpResponse, TransportError>) {
        self.responses.borrow_mut().push_back(result);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn post(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no scripted response".into())))
    }
}

pub fn form_fields(values: &[(&str, &str)]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn filled_fields() -> Vec<(String, String)> {
    form_fields(&[
        ("name", "Jane Doe"),
        ("address", "1 Main St"),
        ("card_number", "4111 1111 1111 1111"),
        ("expiry_date", "12/30"),
        ("cvv", "123"),
    ])
}

/// Buy-now checkout page with the given form values and optional product id.
pub fn checkout_page(fields: Vec<(String, String)>, product_id: Option<&str>) -> InMemoryPage {
    let mut page = InMemoryPage::new()
        .with_form(PageForm {
            id: CHECKOUT_FORM.into(),
            fields,
            submit_control: Some(SUBMIT_BUTTON.into()),
        })
        .with_control(ElementControl::with_span(SUBMIT_BUTTON, SUBMIT_LABEL))
        .with_control(ElementControl::with_span(QUICK_PURCHASE_BUTTON, QUICK_LABEL))
        .with_element(PageElement::new(ITEM_SKELETON))
        .with_element(PageElement::new(REAL_ITEM_DETAILS).hidden());

    if let Some(id) = product_id {
        page = page.with_element(PageElement::new(PRODUCT_ID).hidden().with_attribute("value", id));
    }
    page
}

/// Product listing with one add-to-cart button and a hidden cart badge.
pub fn listing_page(button_id: &str, product_id: &str) -> InMemoryPage {
    InMemoryPage::new()
        .with_control(
            ElementControl::with_span(button_id, "Add to Cart")
                .with_attribute("class", "btn add-to-cart")
                .with_attribute("data-product-id", product_id)
                .with_attribute("data-product-name", "Desk Lamp"),
        )
        .with_element(PageElement::new(CART_COUNT).with_class(HIDDEN_CLASS))
}

pub fn orchestrator(
    page: InMemoryPage,
    transport: ScriptedTransport,
) -> Orchestrator<InMemoryPage, ScriptedTransport> {
    Orchestrator::new(page, transport, CheckoutSettings::default())
}
