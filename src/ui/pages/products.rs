use dioxus::prelude::*;

use crate::{
    app::api_client,
    domain::{
        canonical_cost, effective_cost, parse_price_input, readiness, AppState, Product,
    },
    infra::api::ProductPatch,
    ui::{
        components::{
            status_badge::ReadinessBadge,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        format_amount, theme,
    },
};

#[component]
pub fn ProductsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let selected_product = use_signal(|| None::<String>);
    let name_input = use_signal(String::new);
    let description_input = use_signal(String::new);
    let price_input = use_signal(String::new);
    let freight_input = use_signal(String::new);
    let gst_input = use_signal(String::new);
    let hsn_input = use_signal(String::new);
    let busy = use_signal(|| false);

    let products = state.with(|st| st.products.clone());
    let operation_cost_pct = state.with(|st| st.settings.operation_cost_pct);
    let count = products.len();

    let product_id = selected_product();
    let editing = product_id
        .as_ref()
        .and_then(|id| products.iter().find(|p| &p.id == id).cloned());

    let on_select = {
        let products = products.clone();
        let mut selected_product = selected_product.clone();
        let mut name_input = name_input.clone();
        let mut description_input = description_input.clone();
        let mut price_input = price_input.clone();
        let mut freight_input = freight_input.clone();
        let mut gst_input = gst_input.clone();
        let mut hsn_input = hsn_input.clone();
        move |id: String| {
            if let Some(product) = products.iter().find(|p| p.id == id) {
                name_input.set(product.name.clone());
                description_input.set(product.description.clone().unwrap_or_default());
                price_input.set(format!("{:.2}", product.base_price));
                freight_input.set(format!("{}", product.base_freight_pct));
                gst_input.set(format!("{}", product.gst_pct));
                hsn_input.set(product.hsn_code.clone().unwrap_or_default());
            }
            selected_product.set(Some(id));
        }
    };

    let on_save = {
        let state = state.clone();
        let toasts = toasts.clone();
        let selected_product = selected_product.clone();
        let name_input = name_input.clone();
        let description_input = description_input.clone();
        let price_input = price_input.clone();
        let freight_input = freight_input.clone();
        let gst_input = gst_input.clone();
        let hsn_input = hsn_input.clone();
        let busy = busy.clone();
        move |_| {
            let Some(product_id) = selected_product() else {
                return;
            };

            let base_price = match price_input().trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => value,
                _ => {
                    push_toast(toasts.clone(), ToastKind::Error, "Base price must be a number.");
                    return;
                }
            };
            let base_freight_pct = match freight_input().trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => value,
                _ => {
                    push_toast(toasts.clone(), ToastKind::Error, "Freight % must be a number.");
                    return;
                }
            };
            let gst_pct = match gst_input().trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => value,
                _ => {
                    push_toast(toasts.clone(), ToastKind::Error, "GST % must be a number.");
                    return;
                }
            };

            let hsn = hsn_input().trim().to_string();
            let patch = ProductPatch {
                name: Some(name_input().trim().to_string()),
                description: Some(description_input().trim().to_string()),
                base_price: Some(base_price),
                base_freight_pct: Some(base_freight_pct),
                gst_pct: Some(gst_pct),
                hsn_code: if hsn.is_empty() { None } else { Some(hsn) },
            };

            let state = state.clone();
            let toasts = toasts.clone();
            let mut busy = busy.clone();
            busy.set(true);
            spawn(async move {
                save_product(state, toasts, product_id, patch).await;
                busy.set(false);
            });
        }
    };

    rsx! {
        div { class: "space-y-8",
            header {
                div {
                    h1 { class: "text-2xl font-semibold text-slate-100", "Products" }
                    p { class: "text-sm text-slate-400",
                        "Cost price follows base price, freight and the store operation cost."
                    }
                }
            }

            section {
                class: "grid gap-6 lg:grid-cols-[3fr,2fr]",
                div {
                    class: "{theme::panel()}",
                    header {
                        class: "flex items-center justify-between border-b border-slate-800 px-4 py-3",
                        h3 { class: "text-sm font-semibold text-slate-200", "Catalog" }
                        span { class: "text-xs text-slate-500", "{count} products" }
                    }
                    if products.is_empty() {
                        p { class: "px-4 py-6 text-sm text-slate-500", "No products loaded yet." }
                    } else {
                        table {
                            class: "min-w-full divide-y divide-slate-800 text-sm",
                            thead {
                                class: "{theme::table_head()}",
                                tr {
                                    th { class: "px-4 py-3 font-medium", "Product" }
                                    th { class: "px-4 py-3 font-medium text-right", "Base" }
                                    th { class: "px-4 py-3 font-medium text-right", "Cost" }
                                    th { class: "px-4 py-3 font-medium text-right", "GST %" }
                                    th { class: "px-4 py-3 font-medium", "Readiness" }
                                }
                            }
                            tbody {
                                class: "divide-y divide-slate-800",
                                for product in products.iter() {
                                    ProductRow {
                                        product: product.clone(),
                                        cost: canonical_cost(product, operation_cost_pct),
                                        selected: product_id.as_deref() == Some(product.id.as_str()),
                                        on_select: on_select.clone(),
                                    }
                                }
                            }
                        }
                    }
                }

                if let Some(product) = editing {
                    ProductEditor {
                        product,
                        operation_cost_pct,
                        name_input,
                        description_input,
                        price_input,
                        freight_input,
                        gst_input,
                        hsn_input,
                        busy: busy(),
                        on_save,
                    }
                } else {
                    div {
                        class: "{theme::panel()} flex items-center justify-center p-10",
                        p { class: "text-sm text-slate-500", "Select a product to edit it." }
                    }
                }
            }
        }
    }
}

#[component]
fn ProductRow(
    product: Product,
    cost: f64,
    selected: bool,
    on_select: EventHandler<String>,
) -> Element {
    let row_class = if selected {
        "cursor-pointer bg-indigo-500/10"
    } else {
        "cursor-pointer hover:bg-slate-800/40"
    };
    let row_id = product.id.clone();
    let ready = readiness(&product);

    rsx! {
        tr {
            class: "{row_class}",
            onclick: move |_| on_select.call(row_id.clone()),
            td {
                class: "px-4 py-3",
                div { class: "font-medium text-slate-100", "{product.name}" }
                div { class: "text-xs text-slate-500", "{product.sku}" }
            }
            td { class: "px-4 py-3 text-right text-slate-300", "{format_amount(product.base_price)}" }
            td { class: "px-4 py-3 text-right text-slate-300", "{format_amount(cost)}" }
            td { class: "px-4 py-3 text-right text-slate-400", "{product.gst_pct}" }
            td { class: "px-4 py-3", ReadinessBadge { readiness: ready } }
        }
    }
}

#[component]
fn ProductEditor(
    product: Product,
    operation_cost_pct: f64,
    name_input: Signal<String>,
    description_input: Signal<String>,
    price_input: Signal<String>,
    freight_input: Signal<String>,
    gst_input: Signal<String>,
    hsn_input: Signal<String>,
    busy: bool,
    on_save: EventHandler<()>,
) -> Element {
    // Live landed-cost preview from whatever is currently typed in.
    let preview_price = parse_price_input(&price_input());
    let preview_freight = parse_price_input(&freight_input());
    let preview_cost = effective_cost(preview_price, preview_freight, operation_cost_pct);
    let ready = readiness(&product);
    let save_label = if busy { "Saving..." } else { "Save Product" };

    let mut name_signal = name_input.clone();
    let mut description_signal = description_input.clone();
    let mut price_signal = price_input.clone();
    let mut freight_signal = freight_input.clone();
    let mut gst_signal = gst_input.clone();
    let mut hsn_signal = hsn_input.clone();

    rsx! {
        div {
            class: "{theme::panel()} space-y-4 p-5",
            header {
                class: "flex items-start justify-between gap-3",
                div {
                    h2 { class: "text-lg font-semibold text-slate-100", "{product.sku}" }
                    p { class: "text-xs text-slate-500", "{product.currency} · HSN {product.hsn_code.clone().unwrap_or_default()}" }
                }
                ReadinessBadge { readiness: ready }
            }

            div {
                label { class: "{theme::field_label()}", "Name" }
                input {
                    class: "{theme::field_input()}",
                    value: name_input(),
                    oninput: move |evt| name_signal.set(evt.value().to_string()),
                }
            }

            div {
                label { class: "{theme::field_label()}", "Description" }
                input {
                    class: "{theme::field_input()}",
                    value: description_input(),
                    oninput: move |evt| description_signal.set(evt.value().to_string()),
                    placeholder: "Shown on the storefront",
                }
            }

            div { class: "grid gap-3 sm:grid-cols-3",
                div {
                    label { class: "{theme::field_label()}", "Base price" }
                    input {
                        class: "{theme::field_input()}",
                        inputmode: "decimal",
                        value: price_input(),
                        oninput: move |evt| price_signal.set(evt.value().to_string()),
                    }
                }
                div {
                    label { class: "{theme::field_label()}", "Freight %" }
                    input {
                        class: "{theme::field_input()}",
                        inputmode: "decimal",
                        value: freight_input(),
                        oninput: move |evt| freight_signal.set(evt.value().to_string()),
                    }
                }
                div {
                    label { class: "{theme::field_label()}", "GST %" }
                    input {
                        class: "{theme::field_input()}",
                        inputmode: "decimal",
                        value: gst_input(),
                        oninput: move |evt| gst_signal.set(evt.value().to_string()),
                    }
                }
            }

            div {
                label { class: "{theme::field_label()}", "HSN code" }
                input {
                    class: "{theme::field_input()}",
                    value: hsn_input(),
                    oninput: move |evt| hsn_signal.set(evt.value().to_string()),
                    placeholder: "e.g. 7318",
                }
            }

            div { class: "rounded-lg border border-slate-800/60 bg-slate-950/80 p-3",
                p { class: "text-[10px] font-semibold uppercase tracking-wide text-slate-500", "Cost Price Preview" }
                p { class: "text-lg font-semibold text-slate-100", "{format_amount(preview_cost)} {product.currency}" }
                p { class: "text-xs text-slate-500",
                    "base × (1 + (freight + operations {operation_cost_pct}%) / 100)"
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

async fn save_product(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    product_id: String,
    patch: ProductPatch,
) {
    let Some(api) = api_client() else {
        push_toast(toasts, ToastKind::Error, "Backend client unavailable.");
        return;
    };

    match api.update_product(&product_id, &patch).await {
        Ok(updated) => {
            state.with_mut(|st| {
                if let Some(existing) = st.products.iter_mut().find(|p| p.id == product_id) {
                    *existing = updated;
                }
            });
            push_toast(toasts, ToastKind::Success, "Product saved.");
        }
        Err(error) => {
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Failed to save product: {error}"),
            );
        }
    }
}
