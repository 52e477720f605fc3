use dioxus::prelude::*;

use crate::{
    app::{api_client, persist_user_state, Route},
    domain::{cart_totals, checkout_items, set_quantity, AppState, Customer},
    infra::api::{NewOrderItem, NewOrderRequest},
    ui::{
        components::{
            cart_table::CartTable,
            toast::{push_toast, ToastKind, ToastMessage},
        },
        format_amount, theme,
    },
};

#[component]
pub fn CartPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let nav = use_navigator();

    let po_input = use_signal(String::new);
    let billing_branch = use_signal(|| None::<String>);
    let shipping_branch = use_signal(|| None::<String>);
    let busy = use_signal(|| false);

    let lines = state.with(|st| st.cart_lines.clone());
    let tax_source = state.with(|st| st.settings.tax_source);
    let totals = cart_totals(&lines, &tax_source);

    let customers = state.with(|st| st.customers.clone());
    let active_customer = state.with(|st| st.active_customer.clone());
    let customer: Option<Customer> = active_customer
        .as_ref()
        .and_then(|id| customers.iter().find(|c| &c.id == id).cloned());
    let mirror_shipping = customer
        .as_ref()
        .map(|c| c.bill_to_same_as_ship_to)
        .unwrap_or(false);

    // Billing drives shipping when the account mirrors addresses.
    let effective_shipping = if mirror_shipping {
        billing_branch()
    } else {
        shipping_branch()
    };

    let on_set_quantity = {
        let state = state.clone();
        move |(line_id, quantity): (String, u32)| {
            let mut state = state;
            state.with_mut(|st| set_quantity(&mut st.cart_lines, &line_id, quantity));
            persist_user_state(&state);
        }
    };

    let on_remove = {
        let state = state.clone();
        let toasts = toasts.clone();
        move |line_id: String| {
            let mut state = state;
            state.with_mut(|st| set_quantity(&mut st.cart_lines, &line_id, 0));
            persist_user_state(&state);
            push_toast(toasts.clone(), ToastKind::Info, "Removed from the cart.");
        }
    };

    let on_checkout = {
        let state = state.clone();
        let toasts = toasts.clone();
        let lines = lines.clone();
        let po_input = po_input.clone();
        let billing_branch = billing_branch.clone();
        let active_customer = active_customer.clone();
        let effective_shipping = effective_shipping.clone();
        let busy = busy.clone();
        move |_| {
            let Some(customer_id) = active_customer.clone() else {
                push_toast(toasts.clone(), ToastKind::Warning, "Choose your account first.");
                return;
            };
            if lines.is_empty() {
                push_toast(toasts.clone(), ToastKind::Warning, "Your cart is empty.");
                return;
            }
            let Some(billing_id) = billing_branch() else {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    "Select a billing branch before submitting.",
                );
                return;
            };
            let Some(shipping_id) = effective_shipping.clone() else {
                push_toast(
                    toasts.clone(),
                    ToastKind::Warning,
                    "Select a shipping branch before submitting.",
                );
                return;
            };

            let po = po_input().trim().to_string();
            let items: Vec<NewOrderItem> = checkout_items(&lines, &tax_source)
                .into_iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    unit_price_at_time: item.unit_price_at_time,
                    gst_rate_at_time: item.gst_rate_at_time,
                    gst_amount_at_time: item.gst_amount_at_time,
                })
                .collect();
            let draft = NewOrderRequest {
                customer_po_number: if po.is_empty() { None } else { Some(po) },
                billing_branch_id: billing_id,
                shipping_branch_id: shipping_id,
                items,
            };

            let state = state.clone();
            let toasts = toasts.clone();
            let mut busy = busy.clone();
            busy.set(true);
            spawn(async move {
                if submit_order(state, toasts, customer_id, draft).await {
                    nav.push(Route::Orders {});
                }
                busy.set(false);
            });
        }
    };

    let submit_label = if busy() { "Submitting..." } else { "Submit Purchase Order" };

    rsx! {
        div { class: "space-y-8",
            header {
                h1 { class: "text-2xl font-semibold text-slate-100", "Cart" }
                p { class: "text-sm text-slate-400",
                    "Quantities live on this device until the purchase order is submitted."
                }
            }

            section {
                class: "grid gap-6 lg:grid-cols-[3fr,2fr]",
                CartTable {
                    lines: lines.clone(),
                    on_set_quantity,
                    on_remove,
                }

                div { class: "space-y-6",
                    div {
                        class: "{theme::panel()} space-y-1 p-5 text-sm",
                        h3 { class: "text-xs font-semibold uppercase tracking-wide text-slate-500", "Totals" }
                        div { class: "flex justify-between text-slate-400",
                            span { "Subtotal" }
                            span { "{format_amount(totals.base_total)}" }
                        }
                        div { class: "flex justify-between text-slate-400",
                            span { "CGST" }
                            span { "{format_amount(totals.cgst_total)}" }
                        }
                        div { class: "flex justify-between text-slate-400",
                            span { "SGST" }
                            span { "{format_amount(totals.sgst_total)}" }
                        }
                        div { class: "mt-2 flex justify-between border-t border-slate-800 pt-2 font-semibold text-slate-100",
                            span { "Grand Total" }
                            span { "{format_amount(totals.grand_total())}" }
                        }
                    }

                    if let Some(customer) = customer {
                        CheckoutForm {
                            customer,
                            po_input,
                            billing_branch,
                            shipping_branch,
                            mirror_shipping,
                            busy: busy(),
                            submit_label: submit_label.to_string(),
                            on_checkout,
                        }
                    } else {
                        div {
                            class: "{theme::panel()} p-6 text-center",
                            p { class: "text-sm text-slate-500", "Pick your account on the catalog page to check out." }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CheckoutForm(
    customer: Customer,
    po_input: Signal<String>,
    billing_branch: Signal<Option<String>>,
    shipping_branch: Signal<Option<String>>,
    mirror_shipping: bool,
    busy: bool,
    submit_label: String,
    on_checkout: EventHandler<()>,
) -> Element {
    let branches = customer.branches.clone();
    let billing = billing_branch();
    let shipping = if mirror_shipping {
        billing.clone()
    } else {
        shipping_branch()
    };

    let mut po_signal = po_input.clone();
    let mut billing_signal = billing_branch.clone();
    let mut shipping_signal = shipping_branch.clone();

    rsx! {
        div {
            class: "{theme::panel()} space-y-4 p-5",
            h3 { class: "text-xs font-semibold uppercase tracking-wide text-slate-500", "Checkout" }

            div {
                label { class: "{theme::field_label()}", "Your PO number" }
                input {
                    class: "{theme::field_input()}",
                    value: po_input(),
                    oninput: move |evt| po_signal.set(evt.value().to_string()),
                    placeholder: "e.g. ACME-2024-77",
                }
            }

            div {
                label { class: "{theme::field_label()}", "Billing branch" }
                select {
                    class: "{theme::field_input()}",
                    onchange: move |evt: FormEvent| {
                        let id = evt.value().to_string();
                        billing_signal.set(if id.is_empty() { None } else { Some(id) });
                    },
                    option { value: "", selected: billing.is_none(), "Select branch" }
                    for branch in branches.iter() {
                        option {
                            value: branch.id.clone(),
                            selected: billing.as_deref() == Some(branch.id.as_str()),
                            "{branch.name} · {branch.city}"
                        }
                    }
                }
            }

            div {
                label { class: "{theme::field_label()}", "Shipping branch" }
                select {
                    class: "{theme::field_input()}",
                    disabled: mirror_shipping,
                    onchange: move |evt: FormEvent| {
                        let id = evt.value().to_string();
                        shipping_signal.set(if id.is_empty() { None } else { Some(id) });
                    },
                    option { value: "", selected: shipping.is_none(), "Select branch" }
                    for branch in branches.iter() {
                        option {
                            value: branch.id.clone(),
                            selected: shipping.as_deref() == Some(branch.id.as_str()),
                            "{branch.name} · {branch.city}"
                        }
                    }
                }
                if mirror_shipping {
                    p { class: "mt-1 text-xs text-slate-500",
                        "This account ships to its billing branch."
                    }
                }
            }

            p { class: "text-xs text-slate-500",
                "Payment terms {customer.payment_terms_days} days · delivery in ~{customer.delivery_time_days} days"
            }

            button {
                class: "w-full rounded-lg bg-emerald-500 px-4 py-2 text-sm font-semibold text-white hover:bg-emerald-400 disabled:cursor-not-allowed disabled:opacity-50",
                disabled: busy,
                onclick: move |_| on_checkout.call(()),
                "{submit_label}"
            }
        }
    }
}

/// POST the purchase order; returns whether the backend accepted it.
async fn submit_order(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    customer_id: String,
    draft: NewOrderRequest,
) -> bool {
    let Some(api) = api_client() else {
        push_toast(toasts, ToastKind::Error, "Backend client unavailable.");
        return false;
    };

    match api.submit_order(&customer_id, &draft).await {
        Ok(order) => {
            let number = order.order_number.clone();
            state.with_mut(|st| {
                st.upsert_order(order);
                // The cart only clears once the backend accepted the PO.
                st.cart_lines.clear();
            });
            persist_user_state(&state);
            push_toast(
                toasts,
                ToastKind::Success,
                format!("Purchase order {number} submitted."),
            );
            true
        }
        Err(error) => {
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Checkout failed: {error}"),
            );
            false
        }
    }
}
