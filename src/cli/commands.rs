use std::thread;

use crate::checkout::context::Trigger;
use crate::checkout::orchestrator::{Orchestrator, SubmissionEnd};
use crate::cli::config::AppConfig;
use crate::control::control_model::ElementControl;
use crate::error::CheckoutError;
use crate::format::formatter::PaymentField;
use crate::page::console::ConsolePage;
use crate::page::memory::{InMemoryPage, PageElement, PageForm};
use crate::page::page_model::{
    ADD_TO_CART_CLASS, CART_COUNT, CHECKOUT_FORM, HIDDEN_CLASS, ITEM_SKELETON, PRODUCT_ID, Page,
    QUICK_PURCHASE_BUTTON, REAL_ITEM_DETAILS,
};
use crate::storefront::cart::{CartOutcome, PRODUCT_ID_ATTRIBUTE};
use crate::trace::logger::TraceLogger;
use crate::transport::http::{ReqwestTransport, Transport};

pub const CHECKOUT_SUBMIT_BUTTON: &str = "checkout-submit";

/// Values typed into the checkout form, before formatting.
#[derive(Debug, Clone, Default)]
pub struct CheckoutInput {
    pub name: String,
    pub address: String,
    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
}

// ============================================================================
// format subcommand
// ============================================================================

pub fn cmd_format(field: &str, value: &str) -> Result<String, CheckoutError> {
    let field =
        PaymentField::from_element_id(field).ok_or_else(|| CheckoutError::UnknownField(field.to_string()))?;
    Ok(field.format(value))
}

// ============================================================================
// submit subcommand
// ============================================================================

/// Run one checkout submission. Returns whether the page moved on
/// (navigated or re-rendered) rather than being restored.
pub fn cmd_submit(
    config: &AppConfig,
    trigger: &str,
    product_id: Option<&str>,
    input: &CheckoutInput,
    page_fixture: Option<&str>,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let trigger =
        Trigger::from_discriminator(trigger).ok_or_else(|| CheckoutError::UnknownTrigger(trigger.to_string()))?;

    let page = match page_fixture {
        Some(path) => load_page_fixture(path)?,
        None => checkout_page(product_id),
    }
    .answering_confirm(config.page.confirm);

    let mut orchestrator = build_orchestrator(config, page, verbose)?;
    orchestrator.on_ready();

    // Type each payment field the way a user would, one keystroke at a time.
    for (field, value) in [
        ("name", &input.name),
        ("address", &input.address),
        ("card_number", &input.card_number),
        ("expiry_date", &input.expiry_date),
        ("cvv", &input.cvv),
    ] {
        if PaymentField::from_element_id(field).is_some() {
            let mut typed = String::new();
            for c in value.chars() {
                typed.push(c);
                if let Some(formatted) = orchestrator.handle_input(field, &typed) {
                    typed = formatted;
                }
            }
        } else {
            orchestrator.page_mut().set_value(field, value);
        }
    }

    if verbose > 0 {
        eprintln!(
            "Submitting {} checkout to {}...",
            trigger.discriminator(),
            config.base_url
        );
    }

    let moved_on = match orchestrator.submit(trigger) {
        Ok(SubmissionEnd::Navigated { url }) => {
            println!("Checkout finished: navigated to {}", url);
            true
        }
        Ok(SubmissionEnd::Rendered) => {
            println!("Checkout finished: server page rendered");
            true
        }
        Ok(SubmissionEnd::Restored { error }) => {
            println!("Checkout failed: {}", error);
            false
        }
        Err(e) => {
            println!("Checkout not submitted: {}", e);
            false
        }
    };

    run_timers(&mut orchestrator, verbose);
    Ok(moved_on)
}

// ============================================================================
// add-to-cart subcommand
// ============================================================================

pub fn cmd_add_to_cart(
    config: &AppConfig,
    product_id: &str,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let button_id = format!("add-to-cart-{}", product_id);
    let page = InMemoryPage::new()
        .with_control(
            ElementControl::with_span(&button_id, "Add to Cart")
                .with_attribute("class", ADD_TO_CART_CLASS)
                .with_attribute(PRODUCT_ID_ATTRIBUTE, product_id),
        )
        .with_element(PageElement::new(CART_COUNT).with_class(HIDDEN_CLASS))
        .answering_confirm(config.page.confirm);

    let mut orchestrator = build_orchestrator(config, page, verbose)?;
    let outcome = orchestrator.add_to_cart(&button_id)?;

    let added = match &outcome {
        CartOutcome::Added { cart_count } => {
            match cart_count {
                Some(count) => println!("Added to cart ({} items)", count),
                None => println!("Added to cart"),
            }
            true
        }
        CartOutcome::LoginPrompted { redirect, accepted } => {
            println!(
                "Login required ({}){}",
                redirect,
                if *accepted { ", navigating" } else { "" }
            );
            false
        }
        CartOutcome::Refused { message } => {
            println!("Not added: {}", message);
            false
        }
        CartOutcome::Failed { reason } => {
            println!("Add to cart failed: {}", reason);
            false
        }
    };

    run_timers(&mut orchestrator, verbose);
    Ok(added)
}

// ============================================================================
// Helpers
// ============================================================================

fn build_orchestrator(
    config: &AppConfig,
    page: InMemoryPage,
    verbose: u8,
) -> Result<Orchestrator<ConsolePage, ReqwestTransport>, CheckoutError> {
    let transport = ReqwestTransport::new(&config.base_url)?;
    let tracer = match config.trace.as_deref() {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    if verbose > 0 && tracer.is_enabled() {
        eprintln!("Tracing to {}", config.trace.as_deref().unwrap_or_default());
    }

    Ok(
        Orchestrator::new(ConsolePage::new(page, verbose), transport, config.checkout.clone())
            .with_tracer(tracer),
    )
}

/// The buy-now checkout page: the standard form, a quick purchase button,
/// the hidden product id and the loading skeleton.
pub fn checkout_page(product_id: Option<&str>) -> InMemoryPage {
    let mut page = InMemoryPage::new()
        .with_form(PageForm {
            id: CHECKOUT_FORM.to_string(),
            fields: ["name", "address", "card_number", "expiry_date", "cvv"]
                .iter()
                .map(|name| (name.to_string(), String::new()))
                .collect(),
            submit_control: Some(CHECKOUT_SUBMIT_BUTTON.to_string()),
        })
        .with_control(ElementControl::with_span(CHECKOUT_SUBMIT_BUTTON, "Complete Checkout"))
        .with_control(ElementControl::with_span(QUICK_PURCHASE_BUTTON, "Quick Purchase"))
        .with_element(PageElement::new(ITEM_SKELETON))
        .with_element(PageElement::new(REAL_ITEM_DETAILS).hidden());

    if let Some(id) = product_id {
        page = page.with_element(PageElement::new(PRODUCT_ID).hidden().with_attribute("value", id));
    }
    page
}

pub fn load_page_fixture(path: &str) -> Result<InMemoryPage, CheckoutError> {
    let content = std::fs::read_to_string(path).map_err(|e| CheckoutError::Config {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    serde_yaml::from_str(&content).map_err(|e| CheckoutError::Config {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Sleep through the queued display delays so their effects are visible.
fn run_timers<P: Page, T: Transport>(orchestrator: &mut Orchestrator<P, T>, verbose: u8) {
    while let Some(wait) = orchestrator.timers().next_deadline() {
        thread::sleep(wait);
        let ran = orchestrator.advance(wait);
        if verbose > 1 {
            eprintln!("[timers] ran {} deferred task(s)", ran);
        }
    }
}
