/// System currency used when no settings are supplied
pub const DEFAULT_SYSTEM_CURRENCY: &str = "EUR";

/// Decimal places of a monetary amount unless the currency says otherwise
pub const MONEY_SCALE: u32 = 2;

/// Decimal precision for exchange rates
pub const RATE_PRECISION: u32 = 6;

/// Decimal precision for percentage displays
pub const PERCENT_PRECISION: u32 = 2;

/// Minimum number of cost allocation rows a position with a non-zero net amount keeps
pub const MIN_ALLOCATION_ROWS: usize = 1;

/// Currencies without minor units
pub const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

/// Currencies with three minor-unit digits
pub const THREE_DECIMAL_CURRENCIES: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// Returns the number of decimal places used for amounts in `currency`.
pub fn currency_scale(currency: &str) -> u32 {
    if ZERO_DECIMAL_CURRENCIES.contains(&currency) {
        0
    } else if THREE_DECIMAL_CURRENCIES.contains(&currency) {
        3
    } else {
        MONEY_SCALE
    }
}
