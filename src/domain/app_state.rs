use std::{
    collections::HashMap,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use super::entities::{Customer, CustomerId, CustomerProductPricing, Order, Product};
use super::pricing::{storefront_catalog, CatalogEntry};
use super::roles::Role;
use super::tax::TaxRateSource;

/// Store-level knobs that feed the pricing and tax rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Overhead applied on top of freight when computing landed cost, percent.
    pub operation_cost_pct: f64,
    pub tax_source: TaxRateSource,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            operation_cost_pct: 5.0,
            tax_source: TaxRateSource::default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Workspace role for the session; `None` until the entry screen picks one.
    pub role: Option<Role>,
    /// The storefront customer this session acts as, when in customer mode.
    pub active_customer: Option<CustomerId>,
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub pricing: HashMap<CustomerId, Vec<CustomerProductPricing>>,
    pub orders: Vec<Order>,
    pub cart_lines: Vec<CartLine>,
    pub settings: StoreSettings,
    pub cache: CacheTimestamps,
}

impl AppState {
    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.cache.is_stale(resource, ttl)
    }

    pub fn order(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == order_id)
    }

    /// Replace or insert a freshly fetched order.
    pub fn upsert_order(&mut self, order: Order) {
        match self.orders.iter_mut().find(|existing| existing.id == order.id) {
            Some(existing) => *existing = order,
            None => self.orders.push(order),
        }
    }

    pub fn pricing_for(&self, customer_id: &str) -> &[CustomerProductPricing] {
        self.pricing
            .get(customer_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Storefront catalog for a customer: visible pricing records joined to
    /// products, resolved to display prices.
    pub fn catalog_for(&self, customer_id: &str) -> Vec<CatalogEntry> {
        storefront_catalog(
            &self.products,
            self.pricing_for(customer_id),
            self.settings.operation_cost_pct,
        )
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.role = persisted.role;
        self.active_customer = persisted.active_customer;
        self.cart_lines = persisted.cart_lines;
        self.settings = persisted.settings;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            role: self.role,
            active_customer: self.active_customer.clone(),
            cart_lines: self.cart_lines.clone(),
            settings: self.settings.clone(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CacheTimestamps {
    entries: HashMap<CacheResource, SystemTime>,
}

impl CacheTimestamps {
    pub fn record_fetch(&mut self, resource: CacheResource, fetched_at: SystemTime) {
        self.entries.insert(resource, fetched_at);
    }

    pub fn fetched_at(&self, resource: &CacheResource) -> Option<SystemTime> {
        self.entries.get(resource).copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheResource, &SystemTime)> {
        self.entries.iter()
    }

    pub fn is_stale(&self, resource: &CacheResource, ttl: Duration) -> bool {
        self.fetched_at(resource)
            .map(|time| time.elapsed().map(|elapsed| elapsed > ttl).unwrap_or(true))
            .unwrap_or(true)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheResource {
    Products,
    Customers,
    Orders,
    Pricing(CustomerId),
}

/// Snapshot written to disk between sessions: workspace choice, local cart
/// and store settings. Server-owned data is always refetched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub active_customer: Option<CustomerId>,
    #[serde(default)]
    pub cart_lines: Vec<CartLine>,
    #[serde(default)]
    pub settings: StoreSettings,
}
