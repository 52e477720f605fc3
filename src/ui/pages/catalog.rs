use dioxus::prelude::*;

use crate::{
    app::persist_user_state,
    domain::{adjust_line, AppState, CartMutation, CatalogEntry},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        format_amount, theme,
    },
};

use super::pricing::request_pricing_fetch;

#[component]
pub fn CatalogPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let pricing_request = use_context::<Signal<Option<String>>>();

    let customers = state.with(|st| st.customers.clone());
    let active_customer = state.with(|st| st.active_customer.clone());

    // A persisted account choice still needs its pricing fetched once.
    use_hook({
        let state = state.clone();
        let pricing_request = pricing_request.clone();
        let active_customer = active_customer.clone();
        move || {
            if let Some(id) = active_customer {
                request_pricing_fetch(state, pricing_request, &id);
            }
        }
    });
    let customer_name = active_customer
        .as_ref()
        .and_then(|id| customers.iter().find(|c| &c.id == id))
        .map(|c| c.name.clone());

    let entries: Vec<CatalogEntry> = active_customer
        .as_ref()
        .map(|id| state.with(|st| st.catalog_for(id)))
        .unwrap_or_default();
    let count = entries.len();

    let on_pick_customer = {
        let state = state.clone();
        let pricing_request = pricing_request.clone();
        move |evt: FormEvent| {
            let id = evt.value().to_string();
            if id.is_empty() {
                return;
            }
            let mut state = state;
            state.with_mut(|st| st.active_customer = Some(id.clone()));
            persist_user_state(&state);
            request_pricing_fetch(state, pricing_request.clone(), &id);
        }
    };

    let on_add = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |(entry, quantity): (CatalogEntry, i64)| {
            let mut state = state;
            let mutation =
                state.with_mut(|st| adjust_line(&mut st.cart_lines, &entry, quantity));
            match mutation {
                CartMutation::Added(_) => {
                    push_toast(
                        toasts.clone(),
                        ToastKind::Success,
                        format!("Added {} × {} to the cart.", quantity, entry.name),
                    );
                }
                CartMutation::Updated(_, total) => {
                    push_toast(
                        toasts.clone(),
                        ToastKind::Success,
                        format!("{} now at {} in the cart.", entry.name, total),
                    );
                }
                CartMutation::Removed => {
                    push_toast(toasts.clone(), ToastKind::Info, "Removed from the cart.");
                }
                CartMutation::Rejected => {
                    push_toast(
                        toasts.clone(),
                        ToastKind::Warning,
                        "That product is not in the cart.",
                    );
                    return;
                }
            }
            persist_user_state(&state);
        }
    };

    // No customer context yet: the storefront needs to know who is shopping.
    if active_customer.is_none() {
        return rsx! {
            div { class: "mx-auto max-w-md space-y-4 py-16 text-center",
                h1 { class: "text-2xl font-semibold text-slate-100", "Storefront" }
                p { class: "text-sm text-slate-400", "Choose your account to browse your catalog and prices." }
                select {
                    class: "{theme::field_input()}",
                    onchange: on_pick_customer,
                    option { value: "", selected: true, "Select account" }
                    for customer in customers.iter() {
                        option { value: customer.id.clone(), "{customer.name}" }
                    }
                }
            }
        };
    }

    rsx! {
        div { class: "space-y-6",
            header {
                class: "flex flex-wrap items-end justify-between gap-4",
                div {
                    h1 { class: "text-2xl font-semibold text-slate-100", "Catalog" }
                    if let Some(name) = customer_name {
                        p { class: "text-sm text-slate-400", "Your negotiated prices, {name}." }
                    }
                }
                span { class: "text-xs text-slate-500", "{count} products" }
            }

            if entries.is_empty() {
                div {
                    class: "{theme::panel()} p-10 text-center",
                    p { class: "text-sm text-slate-500",
                        "No products are visible for this account yet. Ask the store to publish pricing."
                    }
                }
            } else {
                section {
                    class: "grid gap-4 sm:grid-cols-2 lg:grid-cols-3",
                    for entry in entries {
                        CatalogCard { entry: entry.clone(), on_add: on_add.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn CatalogCard(entry: CatalogEntry, on_add: EventHandler<(CatalogEntry, i64)>) -> Element {
    let mut quantity_input = use_signal(|| "1".to_string());
    let card_entry = entry.clone();

    let on_submit = move |_| {
        let quantity = quantity_input().trim().parse::<i64>().unwrap_or(0);
        if quantity == 0 {
            return;
        }
        on_add.call((card_entry.clone(), quantity));
    };

    rsx! {
        div {
            class: "{theme::panel()} flex flex-col gap-3 p-4",
            div {
                h2 { class: "text-sm font-semibold text-slate-100", "{entry.name}" }
                p { class: "text-xs text-slate-500", "{entry.sku}" }
            }
            p { class: "text-lg font-semibold text-emerald-300",
                "{format_amount(entry.unit_price)} {entry.currency}"
            }
            div { class: "mt-auto flex items-center gap-2",
                input {
                    class: "w-20 rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-emerald-500 focus:outline-none",
                    inputmode: "numeric",
                    value: quantity_input(),
                    oninput: move |evt| quantity_input.set(evt.value().to_string()),
                }
                button {
                    class: "flex-1 rounded-lg bg-emerald-500 px-3 py-2 text-sm font-semibold text-white hover:bg-emerald-400",
                    onclick: on_submit,
                    "Add to Cart"
                }
            }
        }
    }
}
