//! Literal-key translation lookup
//!
//! UI copy goes through `translate` so display strings live in one catalog.
//! Unknown keys fall back to the key itself, which doubles as the default
//! English string.

use std::collections::HashMap;
use std::sync::LazyLock;

static CATALOG: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("Unknown", "Unknown"),
        ("Sign Up & Follow", "Sign Up & Follow"),
        ("Sign Up & View", "Sign Up & View"),
        ("Sign Up & Join", "Sign Up & Join"),
        ("Follow by email subscription only.", "Follow by email subscription only."),
        ("Loading options…", "Loading options…"),
        ("Export in progress…", "Export in progress…"),
        ("Setting up your plan", "Setting up your plan"),
        ("Your plan includes the following plugins:", "Your plan includes the following plugins:"),
        ("Installing…", "Installing…"),
        ("All plugins installed", "All plugins installed"),
        ("Installation cancelled", "Installation cancelled"),
    ])
});

/// Look up the localized string for a literal key.
///
/// Falls back to the key when no catalog entry exists, so callers never
/// need to handle a missing translation.
pub fn translate(key: &str) -> String {
    CATALOG.get(key).copied().unwrap_or(key).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_key() {
        assert_eq!(translate("Unknown"), "Unknown");
    }

    #[test]
    fn test_translate_falls_back_to_key() {
        assert_eq!(translate("Not In Catalog"), "Not In Catalog");
    }
}
