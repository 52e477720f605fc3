//! Customer-specific price resolution.
//!
//! The store maintains one cost basis per product; each customer record
//! then either pins a fixed price or applies a profit margin on top of the
//! effective cost. Everything here is arithmetic over already-fetched
//! records, so the whole module stays I/O free.

use super::entities::{
    Customer, CustomerProductPricing, PricingStrategy, Product, ProductId, ProductReadiness,
};
use time::OffsetDateTime;

/// Round to two decimal places, the precision every persisted price uses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Landed cost for a product:
/// `base_cost * (1 + (freight_pct + operation_cost_pct) / 100)`.
pub fn effective_cost(base_cost: f64, freight_pct: f64, operation_cost_pct: f64) -> f64 {
    round2(base_cost * (1.0 + (freight_pct + operation_cost_pct) / 100.0))
}

/// The canonical cost the store persists on the product. Always uses the
/// product's own freight rate, never a customer-specific one.
pub fn canonical_cost(product: &Product, operation_cost_pct: f64) -> f64 {
    effective_cost(
        product.cost_basis(),
        product.base_freight_pct,
        operation_cost_pct,
    )
}

/// Cost preview shown while editing a customer's pricing. A customer with
/// an inclusive freight rate sees that rate in place of the product
/// freight; the canonical `cost_price` on the product is unaffected.
pub fn cost_preview(product: &Product, customer: &Customer, operation_cost_pct: f64) -> f64 {
    let freight_pct = customer
        .inclusive_freight_rate
        .unwrap_or(product.base_freight_pct);
    effective_cost(product.cost_basis(), freight_pct, operation_cost_pct)
}

/// Selling price from a margin percentage over the effective cost.
pub fn margin_price(effective_cost: f64, margin_pct: f64) -> f64 {
    round2(effective_cost * (1.0 + margin_pct / 100.0))
}

/// Resolve the authoritative selling price for a pricing record.
///
/// Fixed strategy: the stored override, falling back to the product base
/// price when no override was ever entered. Margin strategy: recomputed
/// from the margin; a record that somehow lost its margin falls back to
/// the cached value and finally to zero rather than failing.
pub fn resolve_selling_price(
    pricing: &CustomerProductPricing,
    product: &Product,
    effective_cost: f64,
) -> f64 {
    match pricing.strategy {
        PricingStrategy::Fixed => pricing.price_override.unwrap_or(product.base_price),
        PricingStrategy::ProfitMargin => match pricing.profit_margin_pct {
            Some(margin_pct) => margin_price(effective_cost, margin_pct),
            None => pricing.resolved_price.unwrap_or(0.0),
        },
    }
}

/// Price to show in lists: the cached `resolved_price` when the record has
/// one, otherwise the same recomputation legacy records get.
pub fn display_price(
    pricing: &CustomerProductPricing,
    product: &Product,
    effective_cost: f64,
) -> f64 {
    pricing
        .resolved_price
        .unwrap_or_else(|| resolve_selling_price(pricing, product, effective_cost))
}

/// Live recomputation while the margin field is being typed in. A raw
/// string that does not parse keeps the previous valid price so half-typed
/// input never zeroes the preview; the caller keeps the raw text in the
/// field untouched.
pub fn live_margin_price(raw_margin: &str, effective_cost: f64, previous: f64) -> f64 {
    match raw_margin.trim().parse::<f64>() {
        Ok(margin_pct) if margin_pct.is_finite() => margin_price(effective_cost, margin_pct),
        _ => previous,
    }
}

/// Lenient numeric parse for price inputs: blank or malformed text shows
/// as zero instead of an error.
pub fn parse_price_input(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Editing a record whose `effective_to` is still ahead of `now` touches a
/// currently-binding agreement and needs an explicit confirmation first.
pub fn requires_confirmation(pricing: &CustomerProductPricing, now: OffsetDateTime) -> bool {
    pricing
        .effective_to
        .map(|effective_to| effective_to > now)
        .unwrap_or(false)
}

/// Normalize a record before saving so exactly one strategy stays
/// authoritative: fixed pricing clears the margin, margin pricing refreshes
/// the cached price.
pub fn normalize_for_save(
    mut pricing: CustomerProductPricing,
    product: &Product,
    effective_cost: f64,
) -> CustomerProductPricing {
    match pricing.strategy {
        PricingStrategy::Fixed => {
            pricing.profit_margin_pct = None;
            pricing.resolved_price =
                Some(pricing.price_override.unwrap_or(product.base_price));
        }
        PricingStrategy::ProfitMargin => {
            pricing.resolved_price = Some(resolve_selling_price(&pricing, product, effective_cost));
        }
    }
    pricing
}

/// Publication readiness, derived from field completeness: identity fields
/// gate everything, commercial/compliance fields gate publication.
pub fn readiness(product: &Product) -> ProductReadiness {
    let has_identity =
        !product.name.trim().is_empty() && !product.sku.trim().is_empty() && product.base_price > 0.0;
    if !has_identity {
        return ProductReadiness::Incomplete;
    }

    let has_compliance = product
        .description
        .as_deref()
        .map(|text| !text.trim().is_empty())
        .unwrap_or(false)
        && product
            .hsn_code
            .as_deref()
            .map(|code| !code.trim().is_empty())
            .unwrap_or(false)
        && product.technical_sheet.is_some();

    if has_compliance {
        ProductReadiness::Publishable
    } else {
        ProductReadiness::Unpublishable
    }
}

/// One storefront catalog row: a visible pricing record joined to its
/// product.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    pub product_id: ProductId,
    pub name: String,
    pub sku: String,
    pub currency: String,
    pub unit_price: f64,
    pub gst_pct: f64,
}

/// Build the customer-facing catalog: hidden records drop out, everything
/// else resolves to a display price. Ordering follows the product list.
pub fn storefront_catalog(
    products: &[Product],
    pricing: &[CustomerProductPricing],
    operation_cost_pct: f64,
) -> Vec<CatalogEntry> {
    products
        .iter()
        .filter_map(|product| {
            let record = pricing
                .iter()
                .find(|record| record.product_id == product.id && record.visible)?;
            let cost = canonical_cost(product, operation_cost_pct);
            Some(CatalogEntry {
                product_id: product.id.clone(),
                name: product.name.clone(),
                sku: product.sku.clone(),
                currency: product.currency.clone(),
                unit_price: display_price(record, product, cost),
                gst_pct: product.gst_pct,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(base_price: f64, base_freight_pct: f64) -> Product {
        Product {
            id: "prod-1".to_string(),
            sku: "SKU-1".to_string(),
            name: "Hex bolt M8".to_string(),
            base_price,
            base_freight_pct,
            gst_pct: 18.0,
            cost_price: None,
            currency: "INR".to_string(),
            description: Some("Zinc plated".to_string()),
            images: Vec::new(),
            hsn_code: Some("7318".to_string()),
            technical_sheet: Some("bolt-m8.pdf".to_string()),
        }
    }

    fn margin_record(margin_pct: f64) -> CustomerProductPricing {
        CustomerProductPricing {
            customer_id: "cust-1".to_string(),
            product_id: "prod-1".to_string(),
            strategy: PricingStrategy::ProfitMargin,
            price_override: None,
            resolved_price: None,
            profit_margin_pct: Some(margin_pct),
            visible: true,
            effective_to: None,
            expiry_status: None,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn effective_cost_adds_freight_and_operations() {
        assert_close(effective_cost(100.0, 10.0, 5.0), 115.0);
    }

    #[test]
    fn margin_price_on_effective_cost() {
        let product = product(100.0, 10.0);
        let cost = canonical_cost(&product, 5.0);
        assert_close(cost, 115.0);

        let record = margin_record(20.0);
        assert_close(resolve_selling_price(&record, &product, cost), 138.0);
    }

    #[test]
    fn resolved_price_cache_matches_recomputation() {
        let product = product(347.5, 8.0);
        let cost = canonical_cost(&product, 4.5);
        let saved = normalize_for_save(margin_record(17.25), &product, cost);

        let cached = saved.resolved_price.unwrap();
        assert_close(cached, resolve_selling_price(&saved, &product, cost));
        assert_close(cached, round2(cached));
    }

    #[test]
    fn fixed_strategy_uses_override_then_base_price() {
        let product = product(250.0, 0.0);
        let mut record = margin_record(0.0);
        record.strategy = PricingStrategy::Fixed;
        record.profit_margin_pct = None;

        record.price_override = Some(199.99);
        assert_close(resolve_selling_price(&record, &product, 0.0), 199.99);

        record.price_override = None;
        assert_close(resolve_selling_price(&record, &product, 0.0), 250.0);
    }

    #[test]
    fn fixed_save_clears_margin() {
        let product = product(250.0, 0.0);
        let mut record = margin_record(12.0);
        record.strategy = PricingStrategy::Fixed;
        record.price_override = Some(300.0);

        let saved = normalize_for_save(record, &product, 260.0);
        assert_eq!(saved.profit_margin_pct, None);
        assert_close(saved.resolved_price.unwrap(), 300.0);
    }

    #[test]
    fn legacy_record_without_cache_recomputes_for_display() {
        let product = product(100.0, 10.0);
        let cost = canonical_cost(&product, 5.0);
        let record = margin_record(20.0);

        assert_eq!(record.resolved_price, None);
        assert_close(display_price(&record, &product, cost), 138.0);
    }

    #[test]
    fn inclusive_freight_overrides_product_freight_in_preview() {
        let product = product(100.0, 10.0);
        let customer = Customer {
            id: "cust-1".to_string(),
            name: "Acme Fabrication".to_string(),
            payment_terms_days: 30,
            delivery_time_days: 7,
            bill_to_same_as_ship_to: true,
            inclusive_freight_rate: Some(2.0),
            branches: Vec::new(),
        };

        assert_close(cost_preview(&product, &customer, 5.0), 107.0);
        // Canonical cost keeps the product's own freight.
        assert_close(canonical_cost(&product, 5.0), 115.0);
    }

    #[test]
    fn unparsable_margin_keeps_previous_price() {
        assert_close(live_margin_price("20", 115.0, 99.0), 138.0);
        assert_close(live_margin_price("20.", 115.0, 138.0), 138.0);
        assert_close(live_margin_price("", 115.0, 138.0), 138.0);
        assert_close(live_margin_price("abc", 115.0, 138.0), 138.0);
    }

    #[test]
    fn price_inputs_never_panic() {
        assert_close(parse_price_input(""), 0.0);
        assert_close(parse_price_input("  12.5 "), 12.5);
        assert_close(parse_price_input("NaN"), 0.0);
        assert_close(parse_price_input("twelve"), 0.0);
    }

    #[test]
    fn future_effective_to_requires_confirmation() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let mut record = margin_record(10.0);

        record.effective_to = None;
        assert!(!requires_confirmation(&record, now));

        record.effective_to = Some(now - time::Duration::days(1));
        assert!(!requires_confirmation(&record, now));

        record.effective_to = Some(now + time::Duration::days(30));
        assert!(requires_confirmation(&record, now));
    }

    #[test]
    fn readiness_tracks_field_completeness() {
        let mut item = product(100.0, 0.0);
        assert_eq!(readiness(&item), ProductReadiness::Publishable);

        item.hsn_code = None;
        assert_eq!(readiness(&item), ProductReadiness::Unpublishable);

        item.sku = String::new();
        assert_eq!(readiness(&item), ProductReadiness::Incomplete);

        item.sku = "SKU-1".to_string();
        item.base_price = 0.0;
        assert_eq!(readiness(&item), ProductReadiness::Incomplete);
    }

    #[test]
    fn hidden_records_leave_the_catalog() {
        let first = product(100.0, 10.0);
        let mut second = product(80.0, 10.0);
        second.id = "prod-2".to_string();
        second.sku = "SKU-2".to_string();

        let visible = margin_record(20.0);
        let mut hidden = margin_record(20.0);
        hidden.product_id = "prod-2".to_string();
        hidden.visible = false;

        let products = vec![first, second];
        let records = vec![visible.clone(), hidden.clone()];

        let catalog = storefront_catalog(&products, &records, 5.0);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].product_id, "prod-1");
        assert_close(catalog[0].unit_price, 138.0);

        // The hidden record itself is untouched.
        assert_eq!(records[1], hidden);
        assert_eq!(records[0], visible);
    }
}
