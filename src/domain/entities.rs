#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::workflow::OrderStatus;

pub type ProductId = String;
pub type CustomerId = String;
pub type OrderId = String;

/// How complete a product record is for storefront publication.
///
/// Wire codes: 0 = incomplete, 1 = unpublishable, 2 = publishable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductReadiness {
    Incomplete,
    Unpublishable,
    Publishable,
}

impl ProductReadiness {
    pub fn code(&self) -> u8 {
        match self {
            ProductReadiness::Incomplete => 0,
            ProductReadiness::Unpublishable => 1,
            ProductReadiness::Publishable => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductReadiness::Incomplete => "Incomplete",
            ProductReadiness::Unpublishable => "Unpublishable",
            ProductReadiness::Publishable => "Publishable",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub base_price: f64,
    /// Freight charged on top of the base price, percent.
    pub base_freight_pct: f64,
    /// Product-configured GST rate, percent. Only consulted when the store
    /// computes taxes per item rather than with the flat split.
    pub gst_pct: f64,
    /// Canonical landed cost, maintained server-side from base price,
    /// base freight and the store operation-cost percentage.
    pub cost_price: Option<f64>,
    pub currency: String,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub hsn_code: Option<String>,
    pub technical_sheet: Option<String>,
}

impl Product {
    /// Cost basis for margin pricing: the canonical landed cost when the
    /// backend has computed one, else the raw base price.
    pub fn cost_basis(&self) -> f64 {
        self.cost_price.unwrap_or(self.base_price)
    }
}

/// Which input is authoritative for a customer's price on a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    Fixed,
    ProfitMargin,
}

/// Server-derived freshness flag for a pricing agreement. The warning and
/// critical window lengths live on the backend; the client only renders
/// whichever flag arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryStatus {
    ExpiringSoon,
    ExpiringCritical,
}

/// A customer's price agreement for one product.
///
/// `price_override` is the fixed-strategy input; `resolved_price` is the
/// denormalized result of the last save. Under `ProfitMargin` the override
/// is ignored and the cache is recomputed from the margin; legacy records
/// that predate the cache recompute it for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CustomerProductPricing {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub strategy: PricingStrategy,
    pub price_override: Option<f64>,
    pub resolved_price: Option<f64>,
    pub profit_margin_pct: Option<f64>,
    /// The only disable path: hidden records stay on file, they just stop
    /// appearing in storefront catalog queries.
    pub visible: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub effective_to: Option<OffsetDateTime>,
    #[serde(default)]
    pub expiry_status: Option<ExpiryStatus>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub gstin: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub payment_terms_days: u16,
    pub delivery_time_days: u16,
    /// When set, the shipping branch selection mirrors the billing branch.
    pub bill_to_same_as_ship_to: bool,
    /// When set, delivery cost is treated as baked into the price and this
    /// rate replaces the product freight in cost previews.
    pub inclusive_freight_rate: Option<f64>,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

/// Compliance document types accepted by the upload endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Invoice,
    Challan,
    Grn,
}

impl DocumentKind {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "Invoice",
            DocumentKind::Challan => "Challan",
            DocumentKind::Grn => "GRN",
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Challan => "challan",
            DocumentKind::Grn => "grn",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderDocument {
    pub id: String,
    pub kind: DocumentKind,
    pub file_name: String,
    pub reference: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

/// One order line, snapshotted at checkout so later price or rate edits
/// never alter historical orders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_at_time: f64,
    pub gst_rate_at_time: f64,
    pub gst_amount_at_time: f64,
}

/// Billing/shipping details frozen onto the order at checkout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressSnapshot {
    pub name: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub gstin: Option<String>,
}

impl From<&Branch> for AddressSnapshot {
    fn from(branch: &Branch) -> Self {
        Self {
            name: branch.name.clone(),
            address_line: branch.address_line.clone(),
            city: branch.city.clone(),
            state: branch.state.clone(),
            pincode: branch.pincode.clone(),
            gstin: branch.gstin.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub total_gst_amount: f64,
    pub final_amount: f64,
    pub billing_address: AddressSnapshot,
    pub shipping_address: AddressSnapshot,
    pub customer_po_number: Option<String>,
    /// Challan/GRN documents attached during fulfilment.
    #[serde(default)]
    pub receivings: Vec<OrderDocument>,
    #[serde(default)]
    pub invoices: Vec<OrderDocument>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Order {
    pub fn has_receiving(&self, kind: DocumentKind) -> bool {
        self.receivings.iter().any(|doc| doc.kind == kind)
    }
}
