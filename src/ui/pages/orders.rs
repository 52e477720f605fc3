use std::time::SystemTime;

use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::{
    app::api_client,
    domain::{
        check_advance, required_document, status_change_event, AdvanceDecision, AppState,
        Capability, DocumentKind, Order, OrderStatus, PendingTransition, Role,
    },
    ui::{
        components::{
            kpi_card::KpiCard,
            order_table::{OrderRow, OrderTable},
            status_badge::OrderStatusBadge,
            toast::{push_toast, ToastKind, ToastMessage},
            upload_dialog::UploadDialog,
        },
        format_amount, theme,
    },
};

#[component]
pub fn OrdersPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let selected_order = use_signal(|| None::<String>);
    let pending_transition = use_signal(|| None::<PendingTransition>);
    let upload_armed = use_signal(|| None::<DocumentKind>);
    let busy = use_signal(|| false);

    let role = state.with(|s| s.role).unwrap_or(Role::Owner);
    let can_manage = role.can(Capability::ManageOrders);
    let active_customer = state.with(|s| s.active_customer.clone());

    let orders: Vec<Order> = state.with(|st| {
        st.orders
            .iter()
            .filter(|order| {
                // Storefront sessions only see their own orders.
                can_manage
                    || active_customer
                        .as_deref()
                        .map(|id| order.customer_id == id)
                        .unwrap_or(false)
            })
            .cloned()
            .collect()
    });

    let open_count = orders
        .iter()
        .filter(|order| !order.status.is_terminal())
        .count();
    let blocked_count = orders
        .iter()
        .filter(|order| matches!(check_advance(order), AdvanceDecision::NeedsDocument { .. }))
        .count();
    let completed_count = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Completed)
        .count();

    let rows: Vec<OrderRow> = orders
        .iter()
        .map(|order| OrderRow {
            id: order.id.clone(),
            order_number: order.order_number.clone(),
            customer_name: order.customer_name.clone(),
            status: order.status,
            final_amount: order.final_amount,
            po_number: order.customer_po_number.clone(),
            receivings: order.receivings.len(),
            created_label: format_date(order.created_at),
            created_sort_key: order.created_at.unix_timestamp(),
        })
        .collect();

    let selected_id = selected_order();
    let detail = selected_id
        .as_ref()
        .and_then(|id| orders.iter().find(|order| &order.id == id).cloned());
    let upload_dialog_target = upload_armed().and_then(|armed| {
        detail
            .as_ref()
            .map(|order| (armed, order.order_number.clone()))
    });

    let on_select = {
        let mut selected_order = selected_order.clone();
        move |id: String| selected_order.set(Some(id))
    };

    let on_advance = {
        let state = state.clone();
        let toasts = toasts.clone();
        let mut pending_transition = pending_transition.clone();
        let mut upload_armed = upload_armed.clone();
        let busy = busy.clone();
        move |order: Order| {
            match check_advance(&order) {
                AdvanceDecision::Terminal => {
                    push_toast(
                        toasts.clone(),
                        ToastKind::Info,
                        format!("{} is final; nothing to advance.", order.status.label()),
                    );
                }
                AdvanceDecision::NeedsDocument { required, .. } => {
                    // Capture the intent, arm the upload view, and wait for
                    // a matching document before re-issuing the advance.
                    pending_transition.set(PendingTransition::for_order(&order));
                    upload_armed.set(Some(required));
                    push_toast(
                        toasts.clone(),
                        ToastKind::Warning,
                        format!(
                            "A {} must be attached before this order can move forward.",
                            required.label()
                        ),
                    );
                }
                AdvanceDecision::Advance(target) => {
                    issue_advance(state.clone(), toasts.clone(), busy.clone(), order.id, target);
                }
            }
        }
    };

    let on_attach = {
        let mut upload_armed = upload_armed.clone();
        move |order: Order| {
            // Manual attach: pre-arm with whatever the next transition will
            // need, defaulting to an invoice.
            let armed = order
                .status
                .next()
                .and_then(required_document)
                .unwrap_or(DocumentKind::Invoice);
            upload_armed.set(Some(armed));
        }
    };

    let on_upload = {
        let state = state.clone();
        let toasts = toasts.clone();
        let mut pending_transition = pending_transition.clone();
        let mut upload_armed = upload_armed.clone();
        let busy = busy.clone();
        let selected_order = selected_order.clone();
        move |(kind, path): (DocumentKind, String)| {
            let Some(order_id) = selected_order() else {
                return;
            };

            // Read the scan before touching any captured intent so a bad
            // path leaves the dialog and the pending transition in place.
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    push_toast(
                        toasts.clone(),
                        ToastKind::Error,
                        format!("Could not read {path}: {err}"),
                    );
                    return;
                }
            };
            let file_name = std::path::Path::new(&path)
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.clone());

            let pending = pending_transition();
            pending_transition.set(None);
            upload_armed.set(None);

            let state = state.clone();
            let toasts = toasts.clone();
            let mut busy = busy.clone();
            busy.set(true);
            spawn(async move {
                upload_and_resume(state, toasts, order_id, kind, file_name, bytes, pending).await;
                busy.set(false);
            });
        }
    };

    let on_dismiss_upload = {
        let mut pending_transition = pending_transition.clone();
        let mut upload_armed = upload_armed.clone();
        move |_| {
            // Abandoning the dialog discards the captured transition; the
            // order stays exactly where it was.
            pending_transition.set(None);
            upload_armed.set(None);
        }
    };

    rsx! {
        div { class: "space-y-8",
            section {
                class: "grid gap-4 sm:grid-cols-3",
                KpiCard {
                    title: "Open Orders".to_string(),
                    value: open_count.to_string(),
                    description: Some("Not yet completed or cancelled".to_string()),
                }
                KpiCard {
                    title: "Awaiting Documents".to_string(),
                    value: blocked_count.to_string(),
                    description: Some("Blocked on a challan or GRN".to_string()),
                }
                KpiCard {
                    title: "Completed".to_string(),
                    value: completed_count.to_string(),
                    description: None,
                }
            }

            section {
                class: "grid gap-6 lg:grid-cols-[3fr,2fr]",
                OrderTable {
                    rows,
                    selected_id: selected_id.clone(),
                    on_select,
                }

                if let Some(order) = detail {
                    OrderDetail {
                        order,
                        can_manage,
                        busy: busy(),
                        on_advance,
                        on_attach,
                    }
                } else {
                    div {
                        class: "{theme::panel()} flex items-center justify-center p-10",
                        p { class: "text-sm text-slate-500", "Select an order to see its details." }
                    }
                }
            }
        }

        if let Some((armed, order_number)) = upload_dialog_target {
            UploadDialog {
                order_number,
                required: armed,
                busy: busy(),
                on_upload,
                on_dismiss: on_dismiss_upload,
            }
        }
    }
}

#[component]
fn OrderDetail(
    order: Order,
    can_manage: bool,
    busy: bool,
    on_advance: EventHandler<Order>,
    on_attach: EventHandler<Order>,
) -> Element {
    let next_label = order.status.next().map(|next| next.label());
    let advance_label = match next_label {
        Some(label) => format!("Move to {label}"),
        None => "Final".to_string(),
    };
    let advance_order = order.clone();
    let attach_order = order.clone();
    let gate_hint = match check_advance(&order) {
        AdvanceDecision::NeedsDocument { required, .. } => Some(format!(
            "Needs a {} before it can move to {}.",
            required.label(),
            order.status.next().map(|s| s.label()).unwrap_or("-"),
        )),
        _ => None,
    };

    rsx! {
        div {
            class: "{theme::panel()} space-y-5 p-5",
            header {
                class: "flex items-start justify-between gap-3",
                div {
                    h2 { class: "text-lg font-semibold text-slate-100", "{order.order_number}" }
                    p { class: "text-xs text-slate-500", "{order.customer_name} · placed {format_date(order.created_at)}" }
                }
                OrderStatusBadge { status: order.status }
            }

            if let Some(hint) = gate_hint {
                p { class: "rounded-lg border border-amber-500/30 bg-amber-500/10 px-3 py-2 text-xs text-amber-200",
                    "{hint}"
                }
            }

            div {
                class: "overflow-hidden rounded-lg border border-slate-800",
                table {
                    class: "min-w-full divide-y divide-slate-800 text-sm",
                    thead {
                        class: "{theme::table_head()}",
                        tr {
                            th { class: "px-3 py-2 font-medium", "Item" }
                            th { class: "px-3 py-2 font-medium text-right", "Qty" }
                            th { class: "px-3 py-2 font-medium text-right", "Unit" }
                            th { class: "px-3 py-2 font-medium text-right", "GST" }
                        }
                    }
                    tbody {
                        class: "divide-y divide-slate-800",
                        for item in order.items.iter() {
                            tr {
                                td { class: "px-3 py-2 text-slate-200", "{item.product_name}" }
                                td { class: "px-3 py-2 text-right text-slate-300", "{item.quantity}" }
                                td { class: "px-3 py-2 text-right text-slate-300", "{format_amount(item.unit_price_at_time)}" }
                                td { class: "px-3 py-2 text-right text-slate-400", "{format_amount(item.gst_amount_at_time)}" }
                            }
                        }
                    }
                }
            }

            div { class: "space-y-1 text-sm",
                div { class: "flex justify-between text-slate-400",
                    span { "Subtotal" }
                    span { "{format_amount(order.total_amount)}" }
                }
                div { class: "flex justify-between text-slate-400",
                    span { "GST" }
                    span { "{format_amount(order.total_gst_amount)}" }
                }
                div { class: "flex justify-between font-semibold text-slate-100",
                    span { "Total" }
                    span { "{format_amount(order.final_amount)}" }
                }
            }

            div {
                h3 { class: "text-xs font-semibold uppercase tracking-wide text-slate-500", "Documents" }
                if order.receivings.is_empty() && order.invoices.is_empty() {
                    p { class: "mt-1 text-xs text-slate-500", "Nothing attached yet." }
                } else {
                    ul { class: "mt-1 space-y-1 text-xs text-slate-300",
                        for doc in order.receivings.iter().chain(order.invoices.iter()) {
                            li {
                                span { class: "font-semibold text-slate-200", "{doc.kind.label()}" }
                                " · {doc.file_name}"
                                if let Some(reference) = doc.reference.clone() {
                                    " · {reference}"
                                }
                            }
                        }
                    }
                }
            }

            div { class: "grid gap-3 text-xs text-slate-400 sm:grid-cols-2",
                div {
                    h3 { class: "font-semibold uppercase tracking-wide text-slate-500", "Bill To" }
                    p { "{order.billing_address.name}" }
                    p { "{order.billing_address.address_line}, {order.billing_address.city}" }
                }
                div {
                    h3 { class: "font-semibold uppercase tracking-wide text-slate-500", "Ship To" }
                    p { "{order.shipping_address.name}" }
                    p { "{order.shipping_address.address_line}, {order.shipping_address.city}" }
                }
            }

            if can_manage {
                div { class: "flex gap-3 border-t border-slate-800 pt-4",
                    button {
                        class: "{theme::btn_primary(None)}",
                        disabled: busy || next_label.is_none(),
                        onclick: move |_| on_advance.call(advance_order.clone()),
                        "{advance_label}"
                    }
                    button {
                        class: "{theme::btn_secondary()}",
                        disabled: busy,
                        onclick: move |_| on_attach.call(attach_order.clone()),
                        "Attach Document"
                    }
                }
            }
        }
    }
}

fn issue_advance(
    state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    busy: Signal<bool>,
    order_id: String,
    target: OrderStatus,
) {
    let mut busy = busy;
    busy.set(true);
    spawn(async move {
        advance_order(state, toasts, order_id, target).await;
        busy.set(false);
    });
}

/// PATCH the status and, on success, emit the analytics event for the
/// transition. Failures leave local state untouched.
async fn advance_order(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    order_id: String,
    target: OrderStatus,
) {
    let Some(api) = api_client() else {
        push_toast(toasts, ToastKind::Error, "Backend client unavailable.");
        return;
    };
    let Some(from) = state.with(|st| st.order(&order_id).map(|order| order.status)) else {
        return;
    };

    match api.advance_order_status(&order_id, target).await {
        Ok(order) => {
            let event = status_change_event(&order, from, order.status, OffsetDateTime::now_utc());
            let label = order.status.label();
            state.with_mut(|st| st.upsert_order(order));
            push_toast(
                toasts,
                ToastKind::Success,
                format!("Order moved to {label}."),
            );
            api.record_event(&event).await;
        }
        Err(error) => {
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Failed to update status: {error}"),
            );
        }
    }
}

/// Upload a document and, when it satisfies a captured transition,
/// re-issue the advance exactly once. A non-matching kind just attaches
/// and drops the pending intent.
async fn upload_and_resume(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    order_id: String,
    kind: DocumentKind,
    file_name: String,
    bytes: Vec<u8>,
    pending: Option<PendingTransition>,
) {
    let Some(api) = api_client() else {
        push_toast(toasts, ToastKind::Error, "Backend client unavailable.");
        return;
    };

    match api.upload_document(&order_id, kind, &file_name, bytes).await {
        Ok(order) => {
            state.with_mut(|st| st.upsert_order(order));
            push_toast(
                toasts,
                ToastKind::Success,
                format!("{} attached.", kind.label()),
            );

            match pending {
                Some(pending) if pending.satisfied_by(kind) => {
                    advance_order(state, toasts, order_id, pending.target).await;
                }
                Some(pending) => {
                    push_toast(
                        toasts,
                        ToastKind::Info,
                        format!(
                            "Still waiting on a {}; the status was not changed.",
                            pending.required.label()
                        ),
                    );
                }
                None => {}
            }
        }
        Err(error) => {
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Upload failed: {error}"),
            );
        }
    }
}

pub fn format_date(moment: OffsetDateTime) -> String {
    let format = time::macros::format_description!("[day] [month repr:short] [year]");
    moment
        .format(&format)
        .unwrap_or_else(|_| moment.date().to_string())
}

pub fn humanize_age(timestamp: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(timestamp)
        .unwrap_or_default()
        .as_secs();
    if age < 60 {
        format!("{age}s ago")
    } else if age < 3_600 {
        format!("{}m ago", age / 60)
    } else if age < 86_400 {
        format!("{}h ago", age / 3_600)
    } else {
        format!("{}d ago", age / 86_400)
    }
}
