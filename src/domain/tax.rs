//! GST totals for carts and order summaries.
//!
//! India GST splits into equal CGST and SGST halves. Where the halves come
//! from is configurable per store: a flat split applied uniformly (the
//! default, 9% + 9%), or each line's own GST rate halved.

use serde::{Deserialize, Serialize};

use super::entities::OrderItem;
use super::pricing::round2;

/// Where line tax rates come from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaxRateSource {
    /// One store-wide CGST/SGST pair applied to every line.
    FlatSplit { cgst_pct: f64, sgst_pct: f64 },
    /// Each line's own GST rate, split evenly between CGST and SGST.
    PerItem,
}

impl Default for TaxRateSource {
    fn default() -> Self {
        TaxRateSource::FlatSplit {
            cgst_pct: 9.0,
            sgst_pct: 9.0,
        }
    }
}

impl TaxRateSource {
    /// Combined GST percentage applied to a line with the given own rate.
    pub fn combined_pct(&self, line_gst_pct: f64) -> f64 {
        match self {
            TaxRateSource::FlatSplit { cgst_pct, sgst_pct } => cgst_pct + sgst_pct,
            TaxRateSource::PerItem => line_gst_pct,
        }
    }
}

/// Minimal view of a line for tax purposes; carts and order snapshots both
/// reduce to this.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaxableLine {
    pub unit_price: f64,
    pub quantity: u32,
    /// The line's own GST rate, consulted only under `PerItem`.
    pub gst_pct: f64,
}

/// Per-line amounts, each rounded to two decimals.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TaxLine {
    pub base: f64,
    pub cgst: f64,
    pub sgst: f64,
}

impl TaxLine {
    pub fn total(&self) -> f64 {
        round2(self.base + self.cgst + self.sgst)
    }
}

pub fn tax_line(line: &TaxableLine, source: &TaxRateSource) -> TaxLine {
    let base = round2(line.unit_price * line.quantity as f64);
    let (cgst_pct, sgst_pct) = match source {
        TaxRateSource::FlatSplit { cgst_pct, sgst_pct } => (*cgst_pct, *sgst_pct),
        TaxRateSource::PerItem => (line.gst_pct / 2.0, line.gst_pct / 2.0),
    };

    TaxLine {
        base,
        cgst: round2(base * cgst_pct / 100.0),
        sgst: round2(base * sgst_pct / 100.0),
    }
}

/// Summed totals for a cart or order view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TaxBreakdown {
    pub base_total: f64,
    pub cgst_total: f64,
    pub sgst_total: f64,
}

impl TaxBreakdown {
    pub fn gst_total(&self) -> f64 {
        round2(self.cgst_total + self.sgst_total)
    }

    pub fn grand_total(&self) -> f64 {
        round2(self.base_total + self.cgst_total + self.sgst_total)
    }
}

pub fn tax_breakdown(lines: &[TaxableLine], source: &TaxRateSource) -> TaxBreakdown {
    let mut breakdown = TaxBreakdown::default();
    for line in lines {
        let amounts = tax_line(line, source);
        breakdown.base_total = round2(breakdown.base_total + amounts.base);
        breakdown.cgst_total = round2(breakdown.cgst_total + amounts.cgst);
        breakdown.sgst_total = round2(breakdown.sgst_total + amounts.sgst);
    }
    breakdown
}

/// Recompute an order's header totals from its snapshotted items. Returns
/// `(total_amount, total_gst_amount, final_amount)`; holds the invariant
/// `final == total + gst`.
pub fn order_totals(items: &[OrderItem]) -> (f64, f64, f64) {
    let mut total = 0.0;
    let mut gst = 0.0;
    for item in items {
        total = round2(total + round2(item.unit_price_at_time * item.quantity as f64));
        gst = round2(gst + item.gst_amount_at_time);
    }
    (total, gst, round2(total + gst))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn flat_split_matches_cart_preview() {
        let line = TaxableLine {
            unit_price: 200.0,
            quantity: 3,
            gst_pct: 18.0,
        };
        let amounts = tax_line(&line, &TaxRateSource::default());

        assert_close(amounts.base, 600.0);
        assert_close(amounts.cgst, 54.0);
        assert_close(amounts.sgst, 54.0);
        assert_close(amounts.total(), 708.0);
    }

    #[test]
    fn per_item_halves_the_line_rate() {
        let line = TaxableLine {
            unit_price: 100.0,
            quantity: 1,
            gst_pct: 12.0,
        };
        let amounts = tax_line(&line, &TaxRateSource::PerItem);

        assert_close(amounts.cgst, 6.0);
        assert_close(amounts.sgst, 6.0);
        assert_close(amounts.total(), 112.0);
    }

    #[test]
    fn breakdown_sums_and_grand_total_identity() {
        let lines = vec![
            TaxableLine {
                unit_price: 200.0,
                quantity: 3,
                gst_pct: 18.0,
            },
            TaxableLine {
                unit_price: 49.5,
                quantity: 2,
                gst_pct: 18.0,
            },
        ];
        let breakdown = tax_breakdown(&lines, &TaxRateSource::default());

        assert_close(breakdown.base_total, 699.0);
        assert_close(breakdown.cgst_total, 62.91);
        assert_close(breakdown.sgst_total, 62.91);
        assert_close(
            breakdown.grand_total(),
            breakdown.base_total + breakdown.gst_total(),
        );
    }

    #[test]
    fn order_header_totals_rebuild_from_snapshots() {
        let items = vec![
            OrderItem {
                product_id: "prod-1".to_string(),
                product_name: "Hex bolt M8".to_string(),
                quantity: 3,
                unit_price_at_time: 200.0,
                gst_rate_at_time: 18.0,
                gst_amount_at_time: 108.0,
            },
            OrderItem {
                product_id: "prod-2".to_string(),
                product_name: "Washer M8".to_string(),
                quantity: 10,
                unit_price_at_time: 4.5,
                gst_rate_at_time: 18.0,
                gst_amount_at_time: 8.1,
            },
        ];

        let (total, gst, grand) = order_totals(&items);
        assert_close(total, 645.0);
        assert_close(gst, 116.1);
        assert_close(grand, total + gst);
    }
}
