//! Thin asynchronous client for the ordering backend.
//!
//! - Typed accessors for products, customers, pricing, orders and uploads.
//! - Every call carries the session bearer; a 401 refreshes the token once
//!   and retries before surfacing the failure.
//! - The product catalog keeps a short in-memory cache with stale fallback
//!   when the backend is unreachable.

use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::{
    Customer, CustomerProductPricing, DocumentKind, Order, OrderStatus, PricingStrategy, Product,
    StatusChangeEvent,
};
use crate::infra::session::SessionContext;

const DEFAULT_BASE_URL: &str = "https://api.orderdesk.example/v1/";
const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);
const USER_AGENT: &str = "orderdesk/0.3.0";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

#[derive(Default)]
struct CatalogCache {
    products: Option<Cached<Vec<Product>>>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: SessionContext,
    cache: Arc<Mutex<CatalogCache>>,
    ttl: Duration,
}

impl ApiClient {
    pub fn new(session: SessionContext) -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL, session)
    }

    pub fn with_base_url(base: &str, session: SessionContext) -> Result<Self, ApiError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            session,
            cache: Arc::new(Mutex::new(CatalogCache::default())),
            ttl: DEFAULT_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Product catalog with TTL cache and stale fallback on fetch failure.
    pub async fn get_products(&self) -> Result<CachedPayload<Vec<Product>>, ApiError> {
        if let Some(payload) = self.cached_products().await {
            return Ok(payload);
        }

        let url = self.url("products")?;
        let fetched: Result<Vec<Product>, ApiError> = self
            .execute_json(move |http, bearer| http.get(url.clone()).bearer_auth(bearer))
            .await;
        match fetched {
            Ok(data) => Ok(self.store_products(data).await),
            Err(error) => {
                if let Some(stale) = self.cached_products_stale().await {
                    warn!(%error, "serving stale product catalog after fetch failure");
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    pub async fn update_product(&self, product_id: &str, patch: &ProductPatch) -> Result<Product, ApiError> {
        let url = self.url(&format!("products/{product_id}"))?;
        let body = patch.clone();
        let product: Product = self
            .execute_json(move |http, bearer| {
                http.patch(url.clone()).bearer_auth(bearer).json(&body)
            })
            .await?;
        self.invalidate_products().await;
        Ok(product)
    }

    pub async fn get_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let store_id = self.session.store_id().await;
        let url = self.url(&format!("stores/{store_id}/customers"))?;
        self.execute_json(move |http, bearer| http.get(url.clone()).bearer_auth(bearer))
            .await
    }

    pub async fn get_customer_pricing(
        &self,
        customer_id: &str,
    ) -> Result<Vec<CustomerProductPricing>, ApiError> {
        let store_id = self.session.store_id().await;
        let url = self.url(&format!(
            "stores/{store_id}/customer-product-pricings/customers/{customer_id}"
        ))?;
        let records: Vec<PricingDto> = self
            .execute_json(move |http, bearer| http.get(url.clone()).bearer_auth(bearer))
            .await?;
        Ok(records.into_iter().map(CustomerProductPricing::from).collect())
    }

    pub async fn save_customer_pricing(
        &self,
        customer_id: &str,
        product_id: &str,
        update: &PricingUpdate,
    ) -> Result<CustomerProductPricing, ApiError> {
        let store_id = self.session.store_id().await;
        let url = self.url(&format!(
            "stores/{store_id}/customer-product-pricings/customers/{customer_id}/products/{product_id}"
        ))?;
        let body = update.clone();
        let record: PricingDto = self
            .execute_json(move |http, bearer| {
                http.patch(url.clone()).bearer_auth(bearer).json(&body)
            })
            .await?;
        Ok(record.into())
    }

    pub async fn get_orders(&self) -> Result<Vec<Order>, ApiError> {
        let store_id = self.session.store_id().await;
        let url = self.url(&format!("stores/{store_id}/orders"))?;
        self.execute_json(move |http, bearer| http.get(url.clone()).bearer_auth(bearer))
            .await
    }

    pub async fn submit_order(
        &self,
        customer_id: &str,
        draft: &NewOrderRequest,
    ) -> Result<Order, ApiError> {
        let store_id = self.session.store_id().await;
        let url = self.url(&format!("stores/{store_id}/customers/{customer_id}/orders"))?;
        let body = draft.clone();
        self.execute_json(move |http, bearer| {
            http.post(url.clone()).bearer_auth(bearer).json(&body)
        })
        .await
    }

    pub async fn advance_order_status(
        &self,
        order_id: &str,
        target: OrderStatus,
    ) -> Result<Order, ApiError> {
        let store_id = self.session.store_id().await;
        let url = self.url(&format!("stores/{store_id}/orders/{order_id}/status"))?;
        let body = StatusPatch {
            status: target.code(),
        };
        self.execute_json(move |http, bearer| {
            http.patch(url.clone()).bearer_auth(bearer).json(&body)
        })
        .await
    }

    /// Upload a typed compliance document; the backend returns the order
    /// with the document attached.
    pub async fn upload_document(
        &self,
        order_id: &str,
        kind: DocumentKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Order, ApiError> {
        let store_id = self.session.store_id().await;
        let url = self.url(&format!("stores/{store_id}/orders/{order_id}/documents"))?;
        let file_name = file_name.to_string();
        self.execute_json(move |http, bearer| {
            let part = reqwest::multipart::Part::bytes(bytes.clone())
                .file_name(file_name.clone());
            let form = reqwest::multipart::Form::new()
                .text("kind", kind.wire_name())
                .part("file", part);
            http.post(url.clone()).bearer_auth(bearer).multipart(form)
        })
        .await
    }

    /// Fire-and-forget analytics; failures are logged, never surfaced.
    pub async fn record_event(&self, event: &StatusChangeEvent) {
        let Ok(url) = self.url("events") else {
            return;
        };
        let body = event.clone();
        if let Err(error) = self
            .execute_empty(move |http, bearer| {
                http.post(url.clone()).bearer_auth(bearer).json(&body)
            })
            .await
        {
            debug!(%error, "dropping analytics event");
        }
    }

    pub async fn invalidate_products(&self) {
        self.cache.lock().await.products = None;
    }

    async fn cached_products(&self) -> Option<CachedPayload<Vec<Product>>> {
        let cache = self.cache.lock().await;
        cache
            .products
            .as_ref()
            .and_then(|entry| entry.if_fresh(self.ttl))
    }

    async fn cached_products_stale(&self) -> Option<CachedPayload<Vec<Product>>> {
        let cache = self.cache.lock().await;
        cache.products.as_ref().map(Cached::stale)
    }

    async fn store_products(&self, data: Vec<Product>) -> CachedPayload<Vec<Product>> {
        let fetched_at = SystemTime::now();
        let payload = CachedPayload::new(data.clone(), fetched_at, CacheStatus::Fresh);
        self.cache.lock().await.products = Some(Cached::new(data, fetched_at));
        payload
    }

    /// Issue a request, refreshing the bearer once on 401. The builder
    /// closure runs again for the retry so bodies are rebuilt, not reused.
    async fn execute<F>(&self, make: F) -> Result<reqwest::Response, ApiError>
    where
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        let bearer = self.session.access_token().await;
        let response = make(&self.http, &bearer).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!("bearer rejected, refreshing session token");
        self.refresh_session().await?;
        let bearer = self.session.access_token().await;
        Ok(make(&self.http, &bearer).send().await?)
    }

    async fn execute_json<T>(&self, make: impl Fn(&Client, &str) -> RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(make).await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn execute_empty(
        &self,
        make: impl Fn(&Client, &str) -> RequestBuilder,
    ) -> Result<(), ApiError> {
        let response = self.execute(make).await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Map non-success responses to an error carrying the backend message
    /// when the body has one, else the HTTP status text.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let fallback = status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
        let message = match response.text().await {
            Ok(body) => extract_error_message(&body).unwrap_or(fallback),
            Err(_) => fallback,
        };

        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn refresh_session(&self) -> Result<(), ApiError> {
        let url = self.url("auth/refresh")?;
        let body = RefreshRequest {
            refresh_token: self.session.refresh_token().await,
        };

        let response = self.http.post(url).json(&body).send().await?;
        let response = Self::check_status(response).await?;
        let tokens: RefreshResponse = response.json().await?;
        self.session
            .install_tokens(tokens.access_token, tokens.refresh_token)
            .await;
        Ok(())
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(|field| field.as_str())
        .map(str::to_string)
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(false)
        {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

#[derive(Clone, Debug, Serialize)]
struct RefreshRequest {
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    refresh_token: String,
}

#[derive(Clone, Debug, Serialize)]
struct StatusPatch {
    status: u8,
}

/// Partial product update; only set fields reach the wire.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_freight_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsn_code: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PricingUpdate {
    pub strategy: PricingStrategy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_override: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_margin_pct: Option<f64>,
    pub resolved_price: f64,
    pub visible: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewOrderRequest {
    pub customer_po_number: Option<String>,
    pub billing_branch_id: String,
    pub shipping_branch_id: String,
    pub items: Vec<NewOrderItem>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price_at_time: f64,
    pub gst_rate_at_time: f64,
    pub gst_amount_at_time: f64,
}

/// Wire shape for pricing records. Older backends still send the combined
/// `selling_price` field; it maps onto the resolved-price cache when the
/// split field is absent.
#[derive(Debug, Deserialize)]
struct PricingDto {
    customer_id: String,
    product_id: String,
    strategy: PricingStrategy,
    #[serde(default)]
    price_override: Option<f64>,
    #[serde(default)]
    resolved_price: Option<f64>,
    #[serde(default, alias = "selling_price", alias = "sellingPrice")]
    legacy_selling_price: Option<f64>,
    #[serde(default)]
    profit_margin_pct: Option<f64>,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    effective_to: Option<time::OffsetDateTime>,
    #[serde(default)]
    expiry_status: Option<crate::domain::ExpiryStatus>,
}

fn default_visible() -> bool {
    true
}

impl From<PricingDto> for CustomerProductPricing {
    fn from(dto: PricingDto) -> Self {
        Self {
            customer_id: dto.customer_id,
            product_id: dto.product_id,
            strategy: dto.strategy,
            price_override: dto.price_override,
            resolved_price: dto.resolved_price.or(dto.legacy_selling_price),
            profit_margin_pct: dto.profit_margin_pct,
            visible: dto.visible,
            effective_to: dto.effective_to,
            expiry_status: dto.expiry_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::session::Session;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> SessionContext {
        SessionContext::new(Session {
            store_id: "store-1".to_string(),
            access_token: "token-a".to_string(),
            refresh_token: "refresh-a".to_string(),
        })
    }

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::with_base_url(&format!("{}/", server.uri()), session())
            .expect("client builds against mock server")
    }

    fn product_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "sku": "SKU-1",
            "name": "Hex bolt M8",
            "base_price": 100.0,
            "base_freight_pct": 10.0,
            "gst_pct": 18.0,
            "cost_price": 115.0,
            "currency": "INR",
            "description": "Zinc plated",
            "images": [],
            "hsn_code": "7318",
            "technical_sheet": "bolt-m8.pdf"
        })
    }

    fn order_json(id: &str, status: u8) -> serde_json::Value {
        json!({
            "id": id,
            "order_number": "PO-2024-0001",
            "customer_id": "cust-1",
            "customer_name": "Acme Fabrication",
            "status": status,
            "items": [],
            "total_amount": 600.0,
            "total_gst_amount": 108.0,
            "final_amount": 708.0,
            "billing_address": {
                "name": "Acme HQ",
                "address_line": "1 Industrial Estate",
                "city": "Pune",
                "state": "MH",
                "pincode": "411001",
                "gstin": null
            },
            "shipping_address": {
                "name": "Acme HQ",
                "address_line": "1 Industrial Estate",
                "city": "Pune",
                "state": "MH",
                "pincode": "411001",
                "gstin": null
            },
            "customer_po_number": "ACME-77",
            "receivings": [],
            "invoices": [],
            "created_at": "2024-01-15T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn products_are_served_from_cache_within_ttl() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json("prod-1")])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let first = client.get_products().await.expect("first fetch succeeds");
        assert_eq!(first.status, CacheStatus::Fresh);
        assert_eq!(first.data.len(), 1);

        let second = client.get_products().await.expect("cache hit succeeds");
        assert_eq!(second.status, CacheStatus::Cached);
        assert_eq!(second.data, first.data);
    }

    #[tokio::test]
    async fn stale_catalog_survives_backend_outage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json("prod-1")])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
            .mount(&server)
            .await;

        // Zero TTL forces a refetch, which now fails.
        let client = client(&server).with_ttl(Duration::ZERO);
        client.get_products().await.expect("initial fetch succeeds");

        let fallback = client.get_products().await.expect("stale fallback kicks in");
        assert_eq!(fallback.status, CacheStatus::Stale);
        assert_eq!(fallback.data.len(), 1);
    }

    #[tokio::test]
    async fn error_message_comes_from_the_response_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stores/store-1/customers"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(json!({"message": "customer list unavailable"})),
            )
            .mount(&server)
            .await;

        let error = client(&server).get_customers().await.unwrap_err();
        match error {
            ApiError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "customer list unavailable");
            }
            other => panic!("expected ApiError::Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unauthorized_refreshes_once_and_retries() {
        let server = MockServer::start().await;

        // First attempt with the original bearer is rejected.
        Mock::given(method("GET"))
            .and(path("/stores/store-1/orders"))
            .and(header("authorization", "Bearer token-a"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(json!({"refresh_token": "refresh-a"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "token-b",
                "refresh_token": "refresh-b"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/stores/store-1/orders"))
            .and(header("authorization", "Bearer token-b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([order_json("ord-1", 2)])))
            .expect(1)
            .mount(&server)
            .await;

        let session = session();
        let client = ApiClient::with_base_url(&format!("{}/", server.uri()), session.clone())
            .expect("client builds against mock server");

        let orders = client.get_orders().await.expect("retry after refresh succeeds");
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, OrderStatus::Processing);
        assert_eq!(session.access_token().await, "token-b");
        assert_eq!(session.refresh_token().await, "refresh-b");
    }

    #[tokio::test]
    async fn status_patch_sends_the_numeric_code() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/stores/store-1/orders/ord-1/status"))
            .and(body_json(json!({"status": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(order_json("ord-1", 3)))
            .expect(1)
            .mount(&server)
            .await;

        let order = client(&server)
            .advance_order_status("ord-1", OrderStatus::Shipped)
            .await
            .expect("status advance succeeds");
        assert_eq!(order.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn legacy_selling_price_maps_onto_the_cache_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/stores/store-1/customer-product-pricings/customers/cust-1",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "customer_id": "cust-1",
                "product_id": "prod-1",
                "strategy": "profit_margin",
                "profit_margin_pct": 20.0,
                "sellingPrice": 138.0,
                "visible": true
            }])))
            .mount(&server)
            .await;

        let records = client(&server)
            .get_customer_pricing("cust-1")
            .await
            .expect("pricing fetch succeeds");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].resolved_price, Some(138.0));
        assert_eq!(records[0].strategy, PricingStrategy::ProfitMargin);
    }
}
