use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::response::response_model::CompletionMarkers;

/// Server paths the controller talks to. Relative paths resolve against the
/// transport's base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_checkout")]
    pub checkout: String,
    #[serde(default = "default_add_to_cart")]
    pub add_to_cart: String,
    #[serde(default = "default_home")]
    pub home: String,
    #[serde(default = "default_login")]
    pub login: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            checkout: default_checkout(),
            add_to_cart: default_add_to_cart(),
            home: default_home(),
            login: default_login(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default = "default_processing_checkout")]
    pub processing_checkout: String,
    #[serde(default = "default_processing")]
    pub processing: String,
    #[serde(default = "default_adding")]
    pub adding: String,
    #[serde(default = "default_added")]
    pub added: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            processing_checkout: default_processing_checkout(),
            processing: default_processing(),
            adding: default_adding(),
            added: default_added(),
        }
    }
}

/// Text of the blocking dialogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notices {
    #[serde(default = "default_missing_fields")]
    pub missing_fields: String,
    #[serde(default = "default_checkout_failed")]
    pub checkout_failed: String,
    #[serde(default = "default_network_failed")]
    pub network_failed: String,
    #[serde(default = "default_error_in_response")]
    pub error_in_response: String,
}

impl Default for Notices {
    fn default() -> Self {
        Self {
            missing_fields: default_missing_fields(),
            checkout_failed: default_checkout_failed(),
            network_failed: default_network_failed(),
            error_in_response: default_error_in_response(),
        }
    }
}

/// Fixed display delays, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delays {
    #[serde(default = "default_success_reset_ms")]
    pub success_reset_ms: u64,
    #[serde(default = "default_reveal_ms")]
    pub reveal_ms: u64,
    #[serde(default = "default_buy_now_ms")]
    pub buy_now_ms: u64,
    #[serde(default = "default_login_prompt_ms")]
    pub login_prompt_ms: u64,
}

impl Delays {
    pub fn success_reset(&self) -> Duration {
        Duration::from_millis(self.success_reset_ms)
    }

    pub fn reveal(&self) -> Duration {
        Duration::from_millis(self.reveal_ms)
    }

    pub fn buy_now(&self) -> Duration {
        Duration::from_millis(self.buy_now_ms)
    }

    pub fn login_prompt(&self) -> Duration {
        Duration::from_millis(self.login_prompt_ms)
    }
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            success_reset_ms: default_success_reset_ms(),
            reveal_ms: default_reveal_ms(),
            buy_now_ms: default_buy_now_ms(),
            login_prompt_ms: default_login_prompt_ms(),
        }
    }
}

/// Everything the orchestrator needs besides its page and transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub markers: CompletionMarkers,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub notices: Notices,
    #[serde(default)]
    pub delays: Delays,
}

// Serde default helpers
fn default_checkout() -> String { "/buy_now_checkout".to_string() }
fn default_add_to_cart() -> String { "/add_to_cart".to_string() }
fn default_home() -> String { "/".to_string() }
fn default_login() -> String { "/login".to_string() }
fn default_processing_checkout() -> String { "Processing Checkout...".to_string() }
fn default_processing() -> String { "Processing...".to_string() }
fn default_adding() -> String { "Adding...".to_string() }
fn default_added() -> String { "\u{2713} Added".to_string() }
fn default_missing_fields() -> String { "Please fill in all required fields".to_string() }
fn default_checkout_failed() -> String { "An error occurred during checkout. Please try again.".to_string() }
fn default_network_failed() -> String { "An error occurred. Please try again.".to_string() }
fn default_error_in_response() -> String { "The server reported an error while processing your purchase.".to_string() }
fn default_success_reset_ms() -> u64 { 800 }
fn default_reveal_ms() -> u64 { 500 }
fn default_buy_now_ms() -> u64 { 500 }
fn default_login_prompt_ms() -> u64 { 200 }
