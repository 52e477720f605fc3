use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::{
    app::{api_client, CACHE_TTL},
    domain::{
        cost_preview, display_price, live_margin_price, normalize_for_save, parse_price_input,
        readiness, requires_confirmation, AppState, CacheResource, Customer,
        CustomerProductPricing, PricingStrategy, Product, ProductReadiness,
    },
    infra::api::PricingUpdate,
    ui::{
        components::{
            confirm_dialog::ConfirmDialog,
            pricing_table::{PricingRow, PricingTable},
            toast::{push_toast, ToastKind, ToastMessage},
        },
        format_amount, theme,
    },
};

use super::orders::format_date;

#[component]
pub fn PricingPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let pricing_request = use_context::<Signal<Option<String>>>();

    let selected_customer = use_signal(|| None::<String>);
    let selected_product = use_signal(|| None::<String>);
    let strategy_input = use_signal(|| PricingStrategy::ProfitMargin);
    let override_input = use_signal(String::new);
    let margin_input = use_signal(String::new);
    let pending_save = use_signal(|| None::<SaveIntent>);
    let busy = use_signal(|| false);

    let customers = state.with(|st| st.customers.clone());
    let operation_cost_pct = state.with(|st| st.settings.operation_cost_pct);

    let customer_id = selected_customer();
    let customer = customer_id
        .as_ref()
        .and_then(|id| customers.iter().find(|c| &c.id == id).cloned());

    let records: Vec<CustomerProductPricing> = customer_id
        .as_ref()
        .map(|id| state.with(|st| st.pricing_for(id).to_vec()))
        .unwrap_or_default();
    let products = state.with(|st| st.products.clone());

    let rows: Vec<PricingRow> = records
        .iter()
        .filter_map(|record| {
            let product = products.iter().find(|p| p.id == record.product_id)?;
            let cost = customer
                .as_ref()
                .map(|c| cost_preview(product, c, operation_cost_pct))
                .unwrap_or(0.0);
            Some(PricingRow {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                sku: product.sku.clone(),
                strategy: record.strategy,
                margin_pct: record.profit_margin_pct,
                display_price: display_price(record, product, cost),
                visible: record.visible,
                effective_to_label: record.effective_to.map(format_date),
                expiry_status: record.expiry_status,
            })
        })
        .collect();

    let product_id = selected_product();
    let editing = product_id.as_ref().and_then(|id| {
        let record = records.iter().find(|r| &r.product_id == id)?.clone();
        let product = products.iter().find(|p| &p.id == id)?.clone();
        Some((record, product))
    });

    let on_pick_customer = {
        let state = state.clone();
        let pricing_request = pricing_request.clone();
        let mut selected_customer = selected_customer.clone();
        let mut selected_product = selected_product.clone();
        move |evt: FormEvent| {
            let id = evt.value().to_string();
            if id.is_empty() {
                selected_customer.set(None);
                return;
            }
            selected_product.set(None);
            selected_customer.set(Some(id.clone()));
            request_pricing_fetch(state.clone(), pricing_request.clone(), &id);
        }
    };

    let on_select_product = {
        let records = records.clone();
        let mut selected_product = selected_product.clone();
        let mut strategy_input = strategy_input.clone();
        let mut override_input = override_input.clone();
        let mut margin_input = margin_input.clone();
        move |id: String| {
            if let Some(record) = records.iter().find(|r| r.product_id == id) {
                strategy_input.set(record.strategy);
                override_input.set(
                    record
                        .price_override
                        .map(|value| format!("{value:.2}"))
                        .unwrap_or_default(),
                );
                margin_input.set(
                    record
                        .profit_margin_pct
                        .map(|value| format!("{value}"))
                        .unwrap_or_default(),
                );
            }
            selected_product.set(Some(id));
        }
    };

    let on_toggle_visible = {
        let state = state.clone();
        let toasts = toasts.clone();
        let records = records.clone();
        let customer_id = customer_id.clone();
        let mut pending_save = pending_save.clone();
        let busy = busy.clone();
        move |product_id: String| {
            let Some(customer_id) = customer_id.clone() else {
                return;
            };
            let Some(record) = records.iter().find(|r| r.product_id == product_id) else {
                return;
            };

            let mut flipped = record.clone();
            flipped.visible = !flipped.visible;
            let update = to_update(&flipped);
            let intent = SaveIntent {
                customer_id,
                product_id,
                record: flipped.clone(),
                update,
            };

            if requires_confirmation(record, OffsetDateTime::now_utc()) {
                pending_save.set(Some(intent));
            } else {
                run_save(state.clone(), toasts.clone(), busy.clone(), intent);
            }
        }
    };

    let on_save = {
        let state = state.clone();
        let toasts = toasts.clone();
        let records = records.clone();
        let products = products.clone();
        let customer = customer.clone();
        let customer_id = customer_id.clone();
        let strategy_input = strategy_input.clone();
        let override_input = override_input.clone();
        let margin_input = margin_input.clone();
        let selected_product = selected_product.clone();
        let mut pending_save = pending_save.clone();
        let busy = busy.clone();
        move |_| {
            let (Some(customer_id), Some(product_id)) = (customer_id.clone(), selected_product())
            else {
                push_toast(toasts.clone(), ToastKind::Warning, "Pick a product first.");
                return;
            };
            let Some(record) = records.iter().find(|r| r.product_id == product_id) else {
                return;
            };
            let Some(product) = products.iter().find(|p| p.id == product_id) else {
                return;
            };

            let mut edited = record.clone();
            edited.strategy = strategy_input();
            match edited.strategy {
                PricingStrategy::Fixed => {
                    let raw = override_input();
                    let trimmed = raw.trim();
                    edited.price_override = if trimmed.is_empty() {
                        None
                    } else {
                        Some(parse_price_input(trimmed))
                    };
                }
                PricingStrategy::ProfitMargin => {
                    let raw = margin_input();
                    match raw.trim().parse::<f64>() {
                        Ok(margin) if margin.is_finite() => {
                            edited.profit_margin_pct = Some(margin);
                        }
                        _ => {
                            push_toast(
                                toasts.clone(),
                                ToastKind::Error,
                                "Profit margin must be a number.",
                            );
                            return;
                        }
                    }
                }
            }

            let cost = customer
                .as_ref()
                .map(|c| cost_preview(product, c, operation_cost_pct))
                .unwrap_or(0.0);
            let normalized = normalize_for_save(edited, product, cost);
            let update = to_update(&normalized);
            let intent = SaveIntent {
                customer_id,
                product_id,
                record: normalized,
                update,
            };

            // Edits to an agreement that is still binding need an explicit
            // confirmation before anything is written.
            if requires_confirmation(record, OffsetDateTime::now_utc()) {
                pending_save.set(Some(intent));
            } else {
                run_save(state.clone(), toasts.clone(), busy.clone(), intent);
            }
        }
    };

    let on_confirm_save = {
        let state = state.clone();
        let toasts = toasts.clone();
        let mut pending_save = pending_save.clone();
        let busy = busy.clone();
        move |_| {
            if let Some(intent) = pending_save() {
                pending_save.set(None);
                run_save(state.clone(), toasts.clone(), busy.clone(), intent);
            }
        }
    };

    let on_cancel_save = {
        let mut pending_save = pending_save.clone();
        move |_| pending_save.set(None)
    };

    rsx! {
        div { class: "space-y-8",
            header {
                class: "flex flex-wrap items-end justify-between gap-4",
                div {
                    h1 { class: "text-2xl font-semibold text-slate-100", "Customer Pricing" }
                    p { class: "text-sm text-slate-400",
                        "Fixed overrides and margin-based prices per customer, with validity windows."
                    }
                }
                div { class: "w-64",
                    label { class: "{theme::field_label()}", "Customer" }
                    select {
                        class: "{theme::field_input()}",
                        onchange: on_pick_customer,
                        option { value: "", selected: customer_id.is_none(), "Select a customer" }
                        for entry in customers.iter() {
                            option {
                                value: entry.id.clone(),
                                selected: customer_id.as_deref() == Some(entry.id.as_str()),
                                "{entry.name}"
                            }
                        }
                    }
                }
            }

            if customer_id.is_none() {
                div {
                    class: "{theme::panel()} p-10 text-center",
                    p { class: "text-sm text-slate-500", "Select a customer to manage their prices." }
                }
            } else {
                section {
                    class: "grid gap-6 lg:grid-cols-[3fr,2fr]",
                    PricingTable {
                        rows,
                        selected_id: product_id.clone(),
                        on_select: on_select_product,
                        on_toggle_visible,
                    }

                    if let Some((record, product)) = editing {
                        PricingEditor {
                            record: record.clone(),
                            product: product.clone(),
                            customer: customer.clone(),
                            operation_cost_pct,
                            strategy_input,
                            override_input,
                            margin_input,
                            busy: busy(),
                            on_save,
                        }
                    } else {
                        div {
                            class: "{theme::panel()} flex items-center justify-center p-10",
                            p { class: "text-sm text-slate-500", "Select a product to edit its pricing." }
                        }
                    }
                }
            }
        }

        if pending_save().is_some() {
            ConfirmDialog {
                title: "Edit a binding agreement?".to_string(),
                body: "This price is still in effect for the customer. Saving will change a currently-binding agreement.".to_string(),
                confirm_label: "Save anyway".to_string(),
                on_confirm: on_confirm_save,
                on_cancel: on_cancel_save,
            }
        }
    }
}

#[derive(Clone)]
struct SaveIntent {
    customer_id: String,
    product_id: String,
    record: CustomerProductPricing,
    update: PricingUpdate,
}

fn to_update(record: &CustomerProductPricing) -> PricingUpdate {
    PricingUpdate {
        strategy: record.strategy,
        price_override: record.price_override,
        profit_margin_pct: record.profit_margin_pct,
        resolved_price: record.resolved_price.unwrap_or(0.0),
        visible: record.visible,
    }
}

fn run_save(
    state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    busy: Signal<bool>,
    intent: SaveIntent,
) {
    let mut busy = busy;
    busy.set(true);
    spawn(async move {
        save_pricing(state, toasts, intent).await;
        busy.set(false);
    });
}

async fn save_pricing(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    intent: SaveIntent,
) {
    let Some(api) = api_client() else {
        push_toast(toasts, ToastKind::Error, "Backend client unavailable.");
        return;
    };

    match api
        .save_customer_pricing(&intent.customer_id, &intent.product_id, &intent.update)
        .await
    {
        Ok(saved) => {
            state.with_mut(|st| {
                let records = st.pricing.entry(intent.customer_id.clone()).or_default();
                match records
                    .iter_mut()
                    .find(|r| r.product_id == intent.product_id)
                {
                    Some(existing) => *existing = saved.clone(),
                    None => records.push(saved.clone()),
                }
            });
            push_toast(toasts, ToastKind::Success, "Pricing saved.");
        }
        Err(error) => {
            // Local state stays as fetched; the editor keeps the user's input.
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Failed to save pricing: {error}"),
            );
        }
    }
}

#[component]
fn PricingEditor(
    record: CustomerProductPricing,
    product: Product,
    customer: Option<Customer>,
    operation_cost_pct: f64,
    strategy_input: Signal<PricingStrategy>,
    override_input: Signal<String>,
    margin_input: Signal<String>,
    busy: bool,
    on_save: EventHandler<()>,
) -> Element {
    let cost = customer
        .as_ref()
        .map(|c| cost_preview(&product, c, operation_cost_pct))
        .unwrap_or(0.0);
    let previous_price = display_price(&record, &product, cost);

    let strategy = strategy_input();
    let live_price = match strategy {
        PricingStrategy::Fixed => {
            let raw = override_input();
            if raw.trim().is_empty() {
                product.base_price
            } else {
                parse_price_input(&raw)
            }
        }
        PricingStrategy::ProfitMargin => live_margin_price(&margin_input(), cost, previous_price),
    };

    let inclusive_note = customer
        .as_ref()
        .and_then(|c| c.inclusive_freight_rate)
        .map(|rate| format!("includes customer freight at {rate}%"));
    let product_ready = readiness(&product);
    let save_label = if busy { "Saving..." } else { "Save Pricing" };

    let mut strategy_fixed = strategy_input.clone();
    let mut strategy_margin = strategy_input.clone();
    let mut override_signal = override_input.clone();
    let mut margin_signal = margin_input.clone();

    rsx! {
        div {
            class: "{theme::panel()} space-y-5 p-5",
            header {
                h2 { class: "text-lg font-semibold text-slate-100", "{product.name}" }
                p { class: "text-xs text-slate-500", "{product.sku} · base {format_amount(product.base_price)} {product.currency}" }
                if product_ready != ProductReadiness::Publishable {
                    p { class: "mt-1 text-xs text-amber-300",
                        "This product is not publishable yet; finish its record before assigning prices."
                    }
                }
            }

            div {
                label { class: "{theme::field_label()}", "Strategy" }
                div { class: "mt-1 flex gap-2",
                    button {
                        class: if strategy == PricingStrategy::Fixed {
                            "rounded-md border border-indigo-500/60 bg-indigo-500/15 px-3 py-1.5 text-xs font-semibold text-indigo-100"
                        } else {
                            "rounded-md border border-slate-700 px-3 py-1.5 text-xs text-slate-400 hover:border-slate-500"
                        },
                        onclick: move |_| strategy_fixed.set(PricingStrategy::Fixed),
                        "Fixed Price"
                    }
                    button {
                        class: if strategy == PricingStrategy::ProfitMargin {
                            "rounded-md border border-indigo-500/60 bg-indigo-500/15 px-3 py-1.5 text-xs font-semibold text-indigo-100"
                        } else {
                            "rounded-md border border-slate-700 px-3 py-1.5 text-xs text-slate-400 hover:border-slate-500"
                        },
                        onclick: move |_| strategy_margin.set(PricingStrategy::ProfitMargin),
                        "Profit Margin"
                    }
                }
            }

            if strategy == PricingStrategy::Fixed {
                div {
                    label { class: "{theme::field_label()}", "Fixed selling price" }
                    input {
                        class: "{theme::field_input()}",
                        inputmode: "decimal",
                        value: override_input(),
                        oninput: move |evt| override_signal.set(evt.value().to_string()),
                        placeholder: "{product.base_price}",
                    }
                    p { class: "mt-1 text-xs text-slate-500", "Blank falls back to the base price." }
                }
            } else {
                div {
                    label { class: "{theme::field_label()}", "Profit margin %" }
                    input {
                        class: "{theme::field_input()}",
                        inputmode: "decimal",
                        value: margin_input(),
                        oninput: move |evt| margin_signal.set(evt.value().to_string()),
                        placeholder: "20",
                    }
                    p { class: "mt-1 text-xs text-slate-500",
                        "Applied on the effective cost of {format_amount(cost)}."
                        if let Some(ref note) = inclusive_note {
                            " ({note})"
                        }
                    }
                }
            }

            div { class: "rounded-lg border border-slate-800/60 bg-slate-950/80 p-3",
                p { class: "text-[10px] font-semibold uppercase tracking-wide text-slate-500", "Selling Price" }
                p { class: "text-lg font-semibold text-slate-100", "{format_amount(live_price)} {product.currency}" }
                if let Some(effective_to) = record.effective_to {
                    p { class: "text-xs text-slate-500", "agreement runs until {format_date(effective_to)}" }
                }
            }

            button {
                class: "{theme::btn_primary(None)}",
                disabled: busy,
                onclick: move |_| on_save.call(()),
                "{save_label}"
            }
        }
    }
}

/// Queue a pricing fetch for a customer unless the cache is still fresh.
pub fn request_pricing_fetch(
    state: Signal<AppState>,
    mut pricing_request: Signal<Option<String>>,
    customer_id: &str,
) {
    let resource = CacheResource::Pricing(customer_id.to_string());
    let needs_fetch = state.with(|st| {
        st.is_stale(&resource, CACHE_TTL) || !st.pricing.contains_key(customer_id)
    });

    if needs_fetch {
        pricing_request.set(Some(customer_id.to_string()));
    }
}
