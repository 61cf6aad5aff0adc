use std::time::Duration;

use checkout_controller::checkout::context::{CHECKOUT_TYPE_FIELD, SubmissionContext, Trigger};
use checkout_controller::checkout::orchestrator::SubmissionEnd;
use checkout_controller::checkout::plan::{PageAction, plan_resolution, request_target};
use checkout_controller::checkout::settings::CheckoutSettings;
use checkout_controller::control::control_model::ControlState;
use checkout_controller::error::CheckoutError;
use checkout_controller::page::page_model::{ITEM_SKELETON, QUICK_PURCHASE_BUTTON, REAL_ITEM_DETAILS};
use checkout_controller::response::classifier::classify_response;
use checkout_controller::response::response_model::{FailureReason, HttpResponse};
use checkout_controller::trace::logger::TraceLogger;

use crate::common::{
    QUICK_LABEL, SUBMIT_BUTTON, SUBMIT_LABEL, ScriptedTransport, checkout_page, filled_fields,
    form_fields, orchestrator,
};

mod common;

const FLASH_PAGE: &str = r#"<html><body><div class="flash-message">Invalid card number</div></body></html>"#;

// =========================================================================
// Validation
// =========================================================================

#[test]
fn blank_required_field_never_hits_the_network() {
    let blanks = [
        ("name", ""),
        ("address", "   "),
        ("card_number", "\t"),
        ("expiry_date", ""),
        ("cvv", " "),
    ];

    for (blank_field, blank_value) in blanks {
        let fields: Vec<(String, String)> = filled_fields()
            .into_iter()
            .map(|(k, v)| {
                if k == blank_field {
                    (k, blank_value.to_string())
                } else {
                    (k, v)
                }
            })
            .collect();

        let mut orch = orchestrator(checkout_page(fields, Some("7")), ScriptedTransport::new());
        let result = orch.submit(Trigger::StandardForm);

        match result {
            Err(CheckoutError::Validation { missing }) => assert_eq!(missing, vec![blank_field]),
            other => panic!("Expected validation error for {}, got {:?}", blank_field, other),
        }
        assert_eq!(orch.transport().request_count(), 0);
        assert_eq!(orch.buttons().state(SUBMIT_BUTTON), ControlState::Idle);
        assert_eq!(orch.page().alerts, vec!["Please fill in all required fields"]);
        assert_eq!(
            orch.page().control_ref(SUBMIT_BUTTON).unwrap().visible_label(),
            SUBMIT_LABEL
        );
    }
}

#[test]
fn partial_form_reports_every_missing_field() {
    let mut orch = orchestrator(
        checkout_page(form_fields(&[("name", "Jane")]), None),
        ScriptedTransport::new(),
    );

    let err = orch.submit(Trigger::StandardForm).unwrap_err();
    match err {
        CheckoutError::Validation { missing } => {
            assert_eq!(missing, vec!["address", "card_number", "expiry_date", "cvv"])
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
}

#[test]
fn submission_context_values_are_forwarded_untrimmed() {
    let fields = form_fields(&[
        ("name", " Jane "),
        ("address", "1 Main St"),
        ("card_number", "4111 1111 1111 1111"),
        ("expiry_date", "12/30"),
        ("cvv", "123"),
        (CHECKOUT_TYPE_FIELD, "quick"),
    ]);
    let context = SubmissionContext::standard(Some(" 42 ".into()), fields).unwrap();

    assert_eq!(context.product_id(), Some("42"));
    let payload = context.into_payload();
    assert!(payload.contains(&("name".to_string(), " Jane ".to_string())));
    assert_eq!(
        payload.iter().filter(|(k, _)| k == CHECKOUT_TYPE_FIELD).count(),
        1,
        "Form-supplied discriminator is replaced"
    );
    assert_eq!(payload.last().unwrap(), &(CHECKOUT_TYPE_FIELD.to_string(), "normal".to_string()));
}

// =========================================================================
// Request shape
// =========================================================================

#[test]
fn request_target_appends_product_id() {
    assert_eq!(request_target("/buy_now_checkout", Some("7")), "/buy_now_checkout/7");
    assert_eq!(request_target("/buy_now_checkout/", Some("7")), "/buy_now_checkout/7");
    assert_eq!(request_target("/buy_now_checkout", None), "/buy_now_checkout");
}

#[test]
fn standard_submission_posts_form_with_discriminator() {
    let transport = ScriptedTransport::replying(HttpResponse::redirect("http://shop/"));
    let mut orch = orchestrator(checkout_page(filled_fields(), Some("7")), transport);

    orch.submit(Trigger::StandardForm).unwrap();

    let requests = orch.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "/buy_now_checkout/7");
    assert_eq!(requests[0].field("checkout_type"), Some("normal"));
    assert_eq!(requests[0].field("card_number"), Some("4111 1111 1111 1111"));
    assert_eq!(requests[0].field("cvv"), Some("123"));
}

#[test]
fn quick_submission_posts_minimal_payload_to_bare_endpoint() {
    // Quick purchase skips validation entirely, even with an empty form.
    let transport = ScriptedTransport::replying(HttpResponse::redirect("http://shop/"));
    let mut orch = orchestrator(checkout_page(vec![], None), transport);

    orch.submit(Trigger::QuickPurchase).unwrap();

    let requests = orch.transport().requests();
    assert_eq!(requests[0].url, "/buy_now_checkout");
    assert_eq!(requests[0].field("checkout_type"), Some("quick"));
    assert_eq!(requests[0].field("name"), None);
}

// =========================================================================
// Outcome handling
// =========================================================================

#[test]
fn redirect_navigates_to_final_url_regardless_of_body() {
    let mut response = HttpResponse::redirect("https://site/");
    response.body = FLASH_PAGE.into();
    let mut orch = orchestrator(
        checkout_page(filled_fields(), Some("7")),
        ScriptedTransport::replying(response),
    );

    let end = orch.submit(Trigger::StandardForm).unwrap();

    assert!(matches!(end, SubmissionEnd::Navigated { ref url } if url == "https://site/"));
    assert_eq!(orch.page().navigations, vec!["https://site/"]);
    assert!(orch.page().body.is_none());
    assert!(orch.page().alerts.is_empty());
}

#[test]
fn completion_marker_navigates_home() {
    let response = HttpResponse::ok("http://shop/buy_now_checkout", "Checkout completed successfully! Lamp x1");
    let mut orch = orchestrator(
        checkout_page(filled_fields(), None),
        ScriptedTransport::replying(response),
    );

    orch.submit(Trigger::StandardForm).unwrap();

    assert_eq!(orch.page().last_navigation(), Some("/"));
}

#[test]
fn flash_page_replaces_body_without_resetting_control() {
    let response = HttpResponse::ok("http://shop/buy_now_checkout", FLASH_PAGE);
    let mut orch = orchestrator(
        checkout_page(filled_fields(), Some("7")),
        ScriptedTransport::replying(response),
    );

    let end = orch.submit(Trigger::StandardForm).unwrap();

    assert!(matches!(end, SubmissionEnd::Rendered));
    let page = orch.page();
    assert_eq!(page.body.as_deref(), Some(FLASH_PAGE));
    assert!(page.navigations.is_empty());
    assert!(page.alerts.is_empty());
    assert!(page.control_ref(SUBMIT_BUTTON).is_none(), "Old subtree is gone");

    let discarded = page
        .discarded_controls
        .iter()
        .find(|c| c.id == SUBMIT_BUTTON)
        .unwrap();
    assert!(discarded.disabled, "Control left busy with the discarded body");
    assert_eq!(discarded.visible_label(), "Processing Checkout...");
}

#[test]
fn server_error_restores_control_and_alerts() {
    let response = HttpResponse::with_status("http://shop/buy_now_checkout", 500, "boom");
    let mut orch = orchestrator(
        checkout_page(filled_fields(), Some("7")),
        ScriptedTransport::replying(response),
    );

    let end = orch.submit(Trigger::StandardForm).unwrap();

    assert!(matches!(
        end,
        SubmissionEnd::Restored {
            error: CheckoutError::ServerFailure { status: 500 }
        }
    ));
    let page = orch.page();
    let button = page.control_ref(SUBMIT_BUTTON).unwrap();
    assert!(!button.disabled);
    assert_eq!(button.opacity, 1.0);
    assert_eq!(button.visible_label(), SUBMIT_LABEL);
    assert_eq!(page.alerts, vec!["An error occurred during checkout. Please try again."]);
    assert!(page.navigations.is_empty());
    assert_eq!(orch.buttons().state(SUBMIT_BUTTON), ControlState::Idle);
}

#[test]
fn network_error_restores_control_with_generic_notice() {
    let mut orch = orchestrator(
        checkout_page(filled_fields(), None),
        ScriptedTransport::failing("connection refused"),
    );

    let end = orch.submit(Trigger::StandardForm).unwrap();

    assert!(matches!(end, SubmissionEnd::Restored { error: CheckoutError::Network(_) }));
    assert_eq!(orch.page().alerts, vec!["An error occurred. Please try again."]);
    assert_eq!(
        orch.page().control_ref(SUBMIT_BUTTON).unwrap().visible_label(),
        SUBMIT_LABEL
    );
}

#[test]
fn unmarked_standard_response_restores_control() {
    let response = HttpResponse::ok("http://shop/buy_now_checkout", "<html><body>ok?</body></html>");
    let mut orch = orchestrator(
        checkout_page(filled_fields(), None),
        ScriptedTransport::replying(response),
    );

    let end = orch.submit(Trigger::StandardForm).unwrap();

    assert!(matches!(end, SubmissionEnd::Restored { error: CheckoutError::UnrecognizedResponse }));
    assert!(orch.page().navigations.is_empty());
}

#[test]
fn unmarked_quick_response_navigates_home() {
    // Current lenient behavior: an unrecognized page is taken as a completed
    // quick purchase, even when it is really a server error page.
    let response = HttpResponse::ok(
        "http://shop/buy_now_checkout",
        "<html><body><h1>Service unavailable</h1></body></html>",
    );
    let mut orch = orchestrator(checkout_page(vec![], None), ScriptedTransport::replying(response));

    let end = orch.submit(Trigger::QuickPurchase).unwrap();

    assert!(matches!(end, SubmissionEnd::Navigated { ref url } if url == "/"));
    assert!(orch.page().alerts.is_empty());
}

#[test]
fn quick_response_mentioning_error_alerts_then_navigates() {
    let response = HttpResponse::ok("http://shop/buy_now_checkout", "<p>Error: stock sync delayed</p>");
    let mut orch = orchestrator(checkout_page(vec![], None), ScriptedTransport::replying(response));

    orch.submit(Trigger::QuickPurchase).unwrap();

    assert_eq!(orch.page().alerts.len(), 1);
    assert_eq!(orch.page().last_navigation(), Some("/"));
}

// =========================================================================
// Re-entrancy
// =========================================================================

#[test]
fn second_submit_while_busy_issues_no_request() {
    let transport = ScriptedTransport::new();
    let mut orch = orchestrator(checkout_page(filled_fields(), Some("7")), transport);

    let pending = orch.begin(Trigger::StandardForm).unwrap();
    assert!(orch.buttons().is_busy(SUBMIT_BUTTON));
    assert_eq!(
        orch.page().control_ref(SUBMIT_BUTTON).unwrap().visible_label(),
        "Processing Checkout..."
    );

    let again = orch.submit(Trigger::StandardForm);
    assert!(matches!(again, Err(CheckoutError::ControlBusy(ref id)) if id == SUBMIT_BUTTON));
    assert_eq!(orch.transport().request_count(), 0);
    assert!(orch.page().alerts.is_empty());

    let end = orch.resolve(pending, Ok(HttpResponse::with_status("/", 502, "")));
    assert!(matches!(end, SubmissionEnd::Restored { .. }));
    assert!(!orch.buttons().is_busy(SUBMIT_BUTTON));
}

#[test]
fn other_control_can_race_a_pending_submission() {
    let transport = ScriptedTransport::replying(HttpResponse::redirect("http://shop/"));
    let mut orch = orchestrator(checkout_page(filled_fields(), None), transport);

    let pending = orch.begin(Trigger::StandardForm).unwrap();
    let quick = orch.submit(Trigger::QuickPurchase);

    assert!(quick.is_ok(), "Quick purchase button is a different control");
    assert_eq!(orch.transport().request_count(), 1);
    assert_eq!(pending.control_id(), Some(SUBMIT_BUTTON));
}

#[test]
fn quick_purchase_uses_its_own_busy_label() {
    let mut orch = orchestrator(checkout_page(vec![], None), ScriptedTransport::new());

    let pending = orch.begin(Trigger::QuickPurchase).unwrap();
    let button = orch.page().control_ref(QUICK_PURCHASE_BUTTON).unwrap();
    assert_eq!(button.visible_label(), "Processing...");

    orch.resolve(pending, Ok(HttpResponse::with_status("/", 500, "")));
    assert_eq!(
        orch.page().control_ref(QUICK_PURCHASE_BUTTON).unwrap().visible_label(),
        QUICK_LABEL
    );
}

// =========================================================================
// Keystrokes, page ready, tracing
// =========================================================================

#[test]
fn handle_input_writes_formatted_value_back() {
    let mut orch = orchestrator(checkout_page(filled_fields(), None), ScriptedTransport::new());

    assert_eq!(orch.handle_input("card_number", "4111-2222"), Some("4111 2222".into()));
    assert_eq!(orch.handle_input("expiry_date", "0931"), Some("09/31".into()));
    assert_eq!(orch.handle_input("cvv", "1x2"), Some("12".into()));
    assert_eq!(orch.handle_input("name", "Jane"), None);

    assert_eq!(orch.page().field_value("card_number"), Some("4111 2222"));
    assert_eq!(orch.page().field_value("expiry_date"), Some("09/31"));
    assert_eq!(orch.page().field_value("cvv"), Some("12"));
    assert_eq!(orch.page().field_value("name"), Some("Jane Doe"));
}

#[test]
fn item_details_are_revealed_after_delay() {
    let mut orch = orchestrator(checkout_page(vec![], None), ScriptedTransport::new());
    orch.on_ready();

    assert_eq!(orch.advance(Duration::from_millis(499)), 0);
    assert!(orch.page().element(ITEM_SKELETON).unwrap().visible);

    assert_eq!(orch.advance(Duration::from_millis(1)), 1);
    assert!(!orch.page().element(ITEM_SKELETON).unwrap().visible);
    assert!(orch.page().element(REAL_ITEM_DETAILS).unwrap().visible);
}

#[test]
fn navigating_away_drops_queued_tasks() {
    let response = HttpResponse::ok("http://shop/", "Quick purchase completed successfully!");
    let mut orch = orchestrator(checkout_page(vec![], None), ScriptedTransport::replying(response));
    orch.on_ready();
    assert_eq!(orch.timers().pending(), 1);

    orch.submit(Trigger::QuickPurchase).unwrap();

    assert!(orch.timers().is_empty());
    assert_eq!(orch.advance(Duration::from_millis(500)), 0);
    assert!(orch.page().element(ITEM_SKELETON).unwrap().visible);
}

#[test]
fn submissions_are_traced() {
    let transport = ScriptedTransport::replying(HttpResponse::redirect("http://shop/"));
    let mut orch = orchestrator(checkout_page(filled_fields(), None), transport)
        .with_tracer(TraceLogger::in_memory());

    orch.submit(Trigger::StandardForm).unwrap();

    let events: Vec<serde_json::Value> = orch
        .tracer()
        .captured()
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let names: Vec<&str> = events.iter().map(|e| e["event"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["request", "outcome", "page_action"]);
    assert_eq!(events[0]["control_state"], "Busy");
    assert_eq!(events[1]["outcome"], "redirected");
}

#[test]
fn resolution_plan_is_pure() {
    let settings = CheckoutSettings::default();
    let classification = classify_response(
        &HttpResponse::with_status("/", 404, ""),
        &settings.markers,
        Trigger::StandardForm,
    );

    let plan = plan_resolution(&classification, &settings);

    assert_eq!(plan.notice, None);
    assert_eq!(
        plan.action,
        PageAction::RestoreControl {
            notice: settings.notices.checkout_failed.clone(),
            reason: FailureReason::NonSuccessStatus(404),
        }
    );
}
