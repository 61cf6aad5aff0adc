use std::sync::LazyLock;

use regex::Regex;

// Start tags with a class attribute (not `data-class` and the like); value may be
// double-, single- or unquoted.
static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<[a-z][a-z0-9-]*\b[^>]*?\sclass\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("class attribute pattern is valid")
});

const FLASH_KEYWORDS: [&str; 2] = ["message", "flash"];

/// Class attribute values of every start tag in `html`, in document order.
pub fn class_attributes(html: &str) -> Vec<&str> {
    CLASS_ATTR
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str())
        .collect()
}

/// A class name marks a flash notice when it contains "message" or "flash",
/// case-insensitively ("flash-message", "alert-Message", "flashes", ...).
pub fn is_flash_class(class_name: &str) -> bool {
    let lower = class_name.to_lowercase();
    FLASH_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Number of elements in `html` carrying a flash-message class.
pub fn count_flash_elements(html: &str) -> usize {
    class_attributes(html)
        .into_iter()
        .filter(|value| value.split_whitespace().any(is_flash_class))
        .count()
}

pub fn has_flash_message(html: &str) -> bool {
    count_flash_elements(html) > 0
}

/// Loose check for an error mention anywhere in a body ("error" or "Error").
pub fn mentions_error(body: &str) -> bool {
    body.contains("error") || body.contains("Error")
}
