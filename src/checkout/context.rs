use serde::{Deserialize, Serialize};

use crate::error::CheckoutError;

/// Fields the standard checkout form must carry, non-blank, before submitting.
pub const REQUIRED_FIELDS: [&str; 5] = ["name", "address", "card_number", "expiry_date", "cvv"];

/// Form field telling the server which submission path fired.
pub const CHECKOUT_TYPE_FIELD: &str = "checkout_type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// The full checkout form was submitted.
    StandardForm,
    /// One-click purchase button; no form data.
    QuickPurchase,
}

impl Trigger {
    /// Value sent in the `checkout_type` field.
    pub fn discriminator(&self) -> &'static str {
        match self {
            Trigger::StandardForm => "normal",
            Trigger::QuickPurchase => "quick",
        }
    }

    pub fn from_discriminator(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Trigger::StandardForm),
            "quick" => Some(Trigger::QuickPurchase),
            _ => None,
        }
    }
}

/// Everything one user action contributes to a request.
///
/// Built at the moment of interaction and consumed by a single submission.
/// A retry is a new user action and gets a new context.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionContext {
    trigger: Trigger,
    product_id: Option<String>,
    form_fields: Vec<(String, String)>,
}

impl SubmissionContext {
    /// Context for the standard form. Fails when a required field is blank.
    ///
    /// Values are forwarded exactly as typed; trimming only decides blankness.
    pub fn standard(
        product_id: Option<String>,
        form_fields: Vec<(String, String)>,
    ) -> Result<Self, CheckoutError> {
        let missing = missing_required_fields(&form_fields);
        if !missing.is_empty() {
            return Err(CheckoutError::Validation { missing });
        }

        Ok(Self {
            trigger: Trigger::StandardForm,
            product_id: normalize_product_id(product_id),
            form_fields,
        })
    }

    /// Context for the quick purchase button: a fixed, empty payload.
    pub fn quick(product_id: Option<String>) -> Self {
        Self {
            trigger: Trigger::QuickPurchase,
            product_id: normalize_product_id(product_id),
            form_fields: Vec::new(),
        }
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    pub fn form_fields(&self) -> &[(String, String)] {
        &self.form_fields
    }

    /// Form payload with the path discriminator appended.
    /// A `checkout_type` already present in the form is replaced.
    pub fn into_payload(self) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = self
            .form_fields
            .into_iter()
            .filter(|(name, _)| name != CHECKOUT_TYPE_FIELD)
            .collect();
        fields.push((
            CHECKOUT_TYPE_FIELD.to_string(),
            self.trigger.discriminator().to_string(),
        ));
        fields
    }
}

/// Required fields that are absent or whitespace-only, in declaration order.
pub fn missing_required_fields(fields: &[(String, String)]) -> Vec<String> {
    REQUIRED_FIELDS
        .iter()
        .filter(|required| {
            !fields
                .iter()
                .any(|(name, value)| name == *required && !value.trim().is_empty())
        })
        .map(|required| required.to_string())
        .collect()
}

fn normalize_product_id(product_id: Option<String>) -> Option<String> {
    product_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}
