use std::{
    sync::OnceLock,
    time::{Duration, SystemTime},
};

use dioxus::{prelude::*, signals::Signal};
use tracing::error;

use crate::{
    domain::{AppState, CacheResource},
    infra::{
        api::{ApiClient, CacheStatus},
        session::{Session, SessionContext},
    },
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{CartPage, CatalogPage, OrdersPage, PricingPage, ProductsPage, SettingsPage},
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

/// Shared TTL for fetched data before a refresh is triggered.
pub const CACHE_TTL: Duration = Duration::from_secs(10 * 60);

static API_CLIENT: OnceLock<Option<ApiClient>> = OnceLock::new();

/// One client per process so the catalog cache and the refreshed token pair
/// are shared by every call site.
pub fn api_client() -> Option<ApiClient> {
    API_CLIENT
        .get_or_init(|| {
            let session = SessionContext::new(Session {
                store_id: env_or("ORDERDESK_STORE_ID", "store-demo"),
                access_token: env_or("ORDERDESK_ACCESS_TOKEN", "dev-access-token"),
                refresh_token: env_or("ORDERDESK_REFRESH_TOKEN", "dev-refresh-token"),
            });

            let client = match std::env::var("ORDERDESK_API_URL") {
                Ok(base) => ApiClient::with_base_url(&base, session),
                Err(_) => ApiClient::new(session),
            };

            match client {
                Ok(client) => Some(client.with_ttl(CACHE_TTL)),
                Err(err) => {
                    error!(%err, "failed to initialise the backend client");
                    None
                }
            }
        })
        .clone()
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    #[route("/orders")]
    Orders {},
    #[route("/products")]
    Products {},
    #[route("/pricing")]
    Pricing {},
    #[route("/catalog")]
    Catalog {},
    #[route("/cart")]
    Cart {},
    #[route("/settings")]
    Settings {},
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    use_hook({
        let mut state = state.clone();
        move || {
            if let Some(saved) = load_persisted_state() {
                state.with_mut(|st| st.apply_persisted(saved));
            }
        }
    });
    use_context_provider(|| state.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts.clone());

    // Pricing fetch trigger shared across routes: set it to a customer id
    // and the watcher below performs the request.
    let pricing_request = use_signal(|| None::<String>);
    use_context_provider(|| pricing_request.clone());

    let _bootstrap = use_resource({
        let state = state.clone();
        let toasts = toasts.clone();
        move || async move { fetch_bootstrap(state.clone(), toasts.clone()).await }
    });

    let _pricing = use_resource({
        let state = state.clone();
        let toasts = toasts.clone();
        let pricing_request = pricing_request.clone();
        move || async move {
            fetch_pricing(state.clone(), toasts.clone(), pricing_request.clone()).await
        }
    });

    rsx! {
        document::Style { "{assets::main_css()}" }
        document::Style { "{assets::tailwind_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        error!(%err, "failed to persist local state");
    }
}

/// Initial load: products, customers and orders fetched together; each
/// result lands independently so one failing call doesn't blank the rest.
async fn fetch_bootstrap(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
) -> Option<CacheStatus> {
    let Some(api) = api_client() else {
        push_toast(
            toasts.clone(),
            ToastKind::Error,
            "Failed to initialise the backend client.",
        );
        return None;
    };

    let (products, customers, orders) =
        tokio::join!(api.get_products(), api.get_customers(), api.get_orders());

    let mut catalog_status = None;
    match products {
        Ok(payload) => {
            state.with_mut(|st| {
                st.products = payload.data.clone();
                st.cache
                    .record_fetch(CacheResource::Products, payload.fetched_at);
            });
            if payload.status == CacheStatus::Stale {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    "Loaded cached products; data might be stale.",
                );
            }
            catalog_status = Some(payload.status);
        }
        Err(err) => {
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Failed to load products: {err}"),
            );
        }
    }

    match customers {
        Ok(list) => {
            state.with_mut(|st| {
                st.customers = list;
                st.cache
                    .record_fetch(CacheResource::Customers, SystemTime::now());
            });
        }
        Err(err) => {
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Failed to load customers: {err}"),
            );
        }
    }

    match orders {
        Ok(list) => {
            state.with_mut(|st| {
                st.orders = list;
                st.cache
                    .record_fetch(CacheResource::Orders, SystemTime::now());
            });
        }
        Err(err) => {
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Failed to load orders: {err}"),
            );
        }
    }

    catalog_status
}

async fn fetch_pricing(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    mut pricing_request: Signal<Option<String>>,
) -> Option<String> {
    let Some(customer_id) = pricing_request() else {
        return None;
    };

    let Some(api) = api_client() else {
        push_toast(
            toasts.clone(),
            ToastKind::Error,
            "Failed to initialise the backend client.",
        );
        return None;
    };

    match api.get_customer_pricing(&customer_id).await {
        Ok(records) => {
            pricing_request.set(None);
            state.with_mut(|st| {
                st.pricing.insert(customer_id.clone(), records);
                st.cache.record_fetch(
                    CacheResource::Pricing(customer_id.clone()),
                    SystemTime::now(),
                );
            });
            Some(customer_id)
        }
        Err(err) => {
            pricing_request.set(None);
            push_toast(
                toasts.clone(),
                ToastKind::Error,
                format!("Failed to load pricing: {err}"),
            );
            None
        }
    }
}

#[component]
pub fn Orders() -> Element {
    rsx! { Shell { OrdersPage {} } }
}

#[component]
pub fn Products() -> Element {
    rsx! { Shell { ProductsPage {} } }
}

#[component]
pub fn Pricing() -> Element {
    rsx! { Shell { PricingPage {} } }
}

#[component]
pub fn Catalog() -> Element {
    rsx! { Shell { CatalogPage {} } }
}

#[component]
pub fn Cart() -> Element {
    rsx! { Shell { CartPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
