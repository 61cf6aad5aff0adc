/// Maximum length of a formatted card number: 16 digits plus 3 separators.
pub const CARD_NUMBER_MAX_LEN: usize = 19;

const CARD_GROUP: usize = 4;

/// The three payment inputs that are reformatted on every keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentField {
    CardNumber,
    ExpiryDate,
    Cvv,
}

impl PaymentField {
    /// Map a page element id to the field it formats, if any.
    pub fn from_element_id(id: &str) -> Option<Self> {
        match id {
            "card_number" => Some(PaymentField::CardNumber),
            "expiry_date" => Some(PaymentField::ExpiryDate),
            "cvv" => Some(PaymentField::Cvv),
            _ => None,
        }
    }

    pub fn element_id(&self) -> &'static str {
        match self {
            PaymentField::CardNumber => "card_number",
            PaymentField::ExpiryDate => "expiry_date",
            PaymentField::Cvv => "cvv",
        }
    }

    pub fn format(&self, raw: &str) -> String {
        match self {
            PaymentField::CardNumber => format_card_number(raw),
            PaymentField::ExpiryDate => format_expiry(raw),
            PaymentField::Cvv => format_cvv(raw),
        }
    }
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Group digits in blocks of four, e.g. `"4111111111111111"` → `"4111 1111 1111 1111"`.
///
/// Output is capped at [`CARD_NUMBER_MAX_LEN`] characters; extra digits are dropped.
pub fn format_card_number(raw: &str) -> String {
    let digits = digits_only(raw);

    let mut formatted = String::with_capacity(CARD_NUMBER_MAX_LEN);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % CARD_GROUP == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }

    // Only ASCII digits and spaces remain, so byte truncation is char-safe.
    formatted.truncate(CARD_NUMBER_MAX_LEN);
    formatted
}

/// Shape an expiry date as `MM/YY`. Fewer than two digits pass through unchanged.
pub fn format_expiry(raw: &str) -> String {
    let digits = digits_only(raw);

    if digits.len() < 2 {
        return digits;
    }

    let year_end = digits.len().min(4);
    format!("{}/{}", &digits[..2], &digits[2..year_end])
}

pub fn format_cvv(raw: &str) -> String {
    digits_only(raw)
}
