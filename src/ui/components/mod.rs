pub mod cart_table;
pub mod confirm_dialog;
pub mod kpi_card;
pub mod order_table;
pub mod pricing_table;
pub mod status_badge;
pub mod toast;
pub mod upload_dialog;
