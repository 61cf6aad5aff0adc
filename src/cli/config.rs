use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::checkout::settings::CheckoutSettings;
use crate::error::CheckoutError;

pub const DEFAULT_CONFIG_PATH: &str = "checkout-controller.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "checkout-controller",
    version,
    about = "Drive checkout submissions and payment-field formatting from the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Base URL of the shop server (relative endpoints resolve against it)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to config file (default: checkout-controller.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append JSONL trace events to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format a payment field value as it would be while typing
    Format {
        /// Field id: card_number, expiry_date or cvv
        #[arg(long)]
        field: String,

        /// Raw input
        #[arg(long)]
        value: String,
    },

    /// Submit a checkout, either the full form or a quick purchase
    Submit {
        /// Submission path: normal or quick
        #[arg(long, default_value = "normal")]
        trigger: String,

        /// Product identifier appended to the checkout endpoint
        #[arg(long)]
        product_id: Option<String>,

        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        address: String,

        #[arg(long, default_value = "")]
        card_number: String,

        #[arg(long, default_value = "")]
        expiry_date: String,

        #[arg(long, default_value = "")]
        cvv: String,

        /// YAML page fixture to load instead of the built-in checkout page
        #[arg(long)]
        page: Option<String>,
    },

    /// Add a product to the cart
    AddToCart {
        #[arg(long)]
        product_id: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `checkout-controller.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Trace file; tracing is off when unset.
    #[serde(default)]
    pub trace: Option<String>,

    #[serde(default)]
    pub page: PageConfig,

    #[serde(default, flatten)]
    pub checkout: CheckoutSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            trace: None,
            page: PageConfig::default(),
            checkout: CheckoutSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageConfig {
    /// Answer given to confirm dialogs (there is nobody to click them).
    #[serde(default)]
    pub confirm: bool,
}

fn default_base_url() -> String { "http://127.0.0.1:5000".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Read and parse a config file.
pub fn try_load_config(path: &str) -> Result<AppConfig, CheckoutError> {
    let content = std::fs::read_to_string(path).map_err(|e| CheckoutError::Config {
        path: path.to_string(),
        message: e.to_string(),
    })?;
    parse_config(path, &content)
}

pub fn parse_config(path: &str, content: &str) -> Result<AppConfig, CheckoutError> {
    serde_yaml::from_str(content).map_err(|e| CheckoutError::Config {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Load config from a YAML file. Returns defaults if the file is missing;
/// a malformed file also falls back to defaults, with a warning.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    if !std::path::Path::new(config_path).exists() {
        return AppConfig::default();
    }
    match try_load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {}; using defaults", e);
            AppConfig::default()
        }
    }
}
