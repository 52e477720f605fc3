pub mod components;
pub mod pages;
pub mod shell;
pub mod theme;

/// Money formatting for tables and totals, always two decimals.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}
