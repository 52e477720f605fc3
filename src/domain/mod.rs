//! Business rules for the ordering portal live here, free of any I/O.

pub mod app_state;
pub mod cart;
pub mod entities;
pub mod pricing;
pub mod roles;
pub mod tax;
pub mod workflow;

#[allow(unused_imports)]
pub use app_state::{AppState, CacheResource, CacheTimestamps, PersistedState, StoreSettings};
#[allow(unused_imports)]
pub use cart::{adjust_line, cart_totals, checkout_items, set_quantity, CartLine, CartMutation};
#[allow(unused_imports)]
pub use entities::{
    AddressSnapshot, Branch, Customer, CustomerId, CustomerProductPricing, DocumentKind,
    ExpiryStatus, Order, OrderDocument, OrderId, OrderItem, PricingStrategy, Product, ProductId,
    ProductReadiness,
};
#[allow(unused_imports)]
pub use pricing::{
    canonical_cost, cost_preview, display_price, effective_cost, live_margin_price,
    normalize_for_save, parse_price_input, readiness, requires_confirmation,
    resolve_selling_price, round2, storefront_catalog, CatalogEntry,
};
#[allow(unused_imports)]
pub use roles::{Capability, Role};
#[allow(unused_imports)]
pub use tax::{order_totals, tax_breakdown, tax_line, TaxBreakdown, TaxLine, TaxRateSource, TaxableLine};
#[allow(unused_imports)]
pub use workflow::{
    check_advance, required_document, status_change_event, AdvanceDecision, OrderStatus,
    PendingTransition, StatusChangeEvent,
};
