//! Currencies offered for selection.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub flag: &'static str,
}

pub const SUPPORTED_CURRENCIES: [Currency; 9] = [
    Currency { code: "EUR", flag: "🇪🇺" },
    Currency { code: "USD", flag: "🇺🇸" },
    Currency { code: "GBP", flag: "🇬🇧" },
    Currency { code: "JPY", flag: "🇯🇵" },
    Currency { code: "AUD", flag: "🇦🇺" },
    Currency { code: "CAD", flag: "🇨🇦" },
    Currency { code: "CHF", flag: "🇨🇭" },
    Currency { code: "CNY", flag: "🇨🇳" },
    Currency { code: "INR", flag: "🇮🇳" },
];

pub const DEFAULT_FROM: &str = "EUR";
pub const DEFAULT_TO: &str = "USD";

/// Flag emoji for a supported currency code.
pub fn flag_for(code: &str) -> Option<&'static str> {
    SUPPORTED_CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code))
        .map(|c| c.flag)
}

/// Canonical form of a user-entered currency code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
