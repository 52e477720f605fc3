//! Local cart state for the storefront.
//!
//! Cart mutation is purely client-held until checkout submission; nothing
//! here talks to the backend. Lines snapshot the catalog price at the time
//! they were added, and checkout freezes those snapshots into order items.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::OrderItem;
use super::pricing::{round2, CatalogEntry};
use super::tax::{tax_breakdown, tax_line, TaxBreakdown, TaxRateSource, TaxableLine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub currency: String,
    pub unit_price: f64,
    pub gst_pct: f64,
    pub quantity: u32,
}

impl CartLine {
    fn from_entry(entry: &CatalogEntry, quantity: u32) -> Self {
        Self {
            id: format!("line-{}", Uuid::new_v4()),
            product_id: entry.product_id.clone(),
            name: entry.name.clone(),
            sku: entry.sku.clone(),
            currency: entry.currency.clone(),
            unit_price: entry.unit_price,
            gst_pct: entry.gst_pct,
            quantity,
        }
    }

    fn as_taxable(&self) -> TaxableLine {
        TaxableLine {
            unit_price: self.unit_price,
            quantity: self.quantity,
            gst_pct: self.gst_pct,
        }
    }
}

/// What a quantity adjustment did to the cart.
#[derive(Clone, Debug, PartialEq)]
pub enum CartMutation {
    Added(String),
    Updated(String, u32),
    Removed,
    /// Subtracting from a product that is not in the cart.
    Rejected,
}

/// Apply a signed quantity delta for a catalog entry: extends an existing
/// line, adds a new one, or removes the line once it would hit zero.
pub fn adjust_line(lines: &mut Vec<CartLine>, entry: &CatalogEntry, delta: i64) -> CartMutation {
    if let Some(index) = lines
        .iter()
        .position(|line| line.product_id == entry.product_id)
    {
        let new_total = lines[index].quantity as i64 + delta;
        if new_total <= 0 {
            lines.remove(index);
            CartMutation::Removed
        } else {
            lines[index].quantity = new_total as u32;
            CartMutation::Updated(lines[index].id.clone(), new_total as u32)
        }
    } else if delta > 0 {
        let line = CartLine::from_entry(entry, delta as u32);
        let id = line.id.clone();
        lines.push(line);
        CartMutation::Added(id)
    } else {
        CartMutation::Rejected
    }
}

/// Set an exact quantity for a line; zero removes it.
pub fn set_quantity(lines: &mut Vec<CartLine>, line_id: &str, quantity: u32) {
    if quantity == 0 {
        lines.retain(|line| line.id != line_id);
        return;
    }
    if let Some(line) = lines.iter_mut().find(|line| line.id == line_id) {
        line.quantity = quantity;
    }
}

pub fn cart_totals(lines: &[CartLine], source: &TaxRateSource) -> TaxBreakdown {
    let taxable: Vec<TaxableLine> = lines.iter().map(CartLine::as_taxable).collect();
    tax_breakdown(&taxable, source)
}

/// Freeze the cart into order-item snapshots for checkout submission.
/// Unit price and the rate in force are recorded per line so later price
/// edits never reach back into the order.
pub fn checkout_items(lines: &[CartLine], source: &TaxRateSource) -> Vec<OrderItem> {
    lines
        .iter()
        .map(|line| {
            let amounts = tax_line(&line.as_taxable(), source);
            OrderItem {
                product_id: line.product_id.clone(),
                product_name: line.name.clone(),
                quantity: line.quantity,
                unit_price_at_time: round2(line.unit_price),
                gst_rate_at_time: source.combined_pct(line.gst_pct),
                gst_amount_at_time: round2(amounts.cgst + amounts.sgst),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tax::order_totals;

    fn entry(product_id: &str, unit_price: f64) -> CatalogEntry {
        CatalogEntry {
            product_id: product_id.to_string(),
            name: "Hex bolt M8".to_string(),
            sku: "SKU-1".to_string(),
            currency: "INR".to_string(),
            unit_price,
            gst_pct: 18.0,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn adjust_adds_updates_and_removes() {
        let mut lines = Vec::new();
        let entry = entry("prod-1", 200.0);

        assert!(matches!(
            adjust_line(&mut lines, &entry, 3),
            CartMutation::Added(_)
        ));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);

        assert!(matches!(
            adjust_line(&mut lines, &entry, 2),
            CartMutation::Updated(_, 5)
        ));

        assert_eq!(adjust_line(&mut lines, &entry, -5), CartMutation::Removed);
        assert!(lines.is_empty());

        assert_eq!(adjust_line(&mut lines, &entry, -1), CartMutation::Rejected);
    }

    #[test]
    fn set_quantity_zero_removes_the_line() {
        let mut lines = Vec::new();
        adjust_line(&mut lines, &entry("prod-1", 200.0), 3);
        let id = lines[0].id.clone();

        set_quantity(&mut lines, &id, 7);
        assert_eq!(lines[0].quantity, 7);

        set_quantity(&mut lines, &id, 0);
        assert!(lines.is_empty());
    }

    #[test]
    fn cart_totals_use_the_flat_split() {
        let mut lines = Vec::new();
        adjust_line(&mut lines, &entry("prod-1", 200.0), 3);

        let totals = cart_totals(&lines, &TaxRateSource::default());
        assert_close(totals.base_total, 600.0);
        assert_close(totals.cgst_total, 54.0);
        assert_close(totals.sgst_total, 54.0);
        assert_close(totals.grand_total(), 708.0);
    }

    #[test]
    fn checkout_snapshots_reproduce_header_totals() {
        let mut lines = Vec::new();
        adjust_line(&mut lines, &entry("prod-1", 200.0), 3);
        adjust_line(&mut lines, &entry("prod-2", 49.5), 2);

        let source = TaxRateSource::default();
        let items = checkout_items(&lines, &source);
        assert_eq!(items[0].gst_rate_at_time, 18.0);
        assert_close(items[0].gst_amount_at_time, 108.0);

        let totals = cart_totals(&lines, &source);
        let (total, gst, grand) = order_totals(&items);
        assert_close(total, totals.base_total);
        assert_close(gst, totals.gst_total());
        assert_close(grand, totals.grand_total());
    }
}
