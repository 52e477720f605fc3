use std::cmp::Ordering;

use dioxus::prelude::*;

use crate::domain::OrderStatus;
use crate::ui::components::status_badge::OrderStatusBadge;
use crate::ui::{format_amount, theme};

#[derive(Clone, PartialEq)]
pub struct OrderRow {
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    pub status: OrderStatus,
    pub final_amount: f64,
    pub po_number: Option<String>,
    pub receivings: usize,
    pub created_label: String,
    /// Unix seconds, kept for sorting only.
    pub created_sort_key: i64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SortMode {
    Newest,
    Amount,
    Status,
}

#[component]
pub fn OrderTable(
    rows: Vec<OrderRow>,
    selected_id: Option<String>,
    on_select: EventHandler<String>,
) -> Element {
    let sort_mode = use_signal(|| SortMode::Newest);
    let current_sort = sort_mode();
    let count = rows.len();
    let is_empty = rows.is_empty();

    let mut rendered_rows = rows;
    sort_rows(&mut rendered_rows, current_sort);

    rsx! {
        div {
            class: "{theme::panel()}",
            header {
                class: "flex flex-wrap items-center justify-between gap-2 border-b border-slate-800 px-4 py-3",
                h3 { class: "text-sm font-semibold text-slate-200", "Purchase Orders" }
                span { class: "text-xs text-slate-500", "{count} orders" }
            }
            if !is_empty {
                div {
                    class: "flex flex-wrap items-center gap-2 border-b border-slate-800 bg-slate-950/40 px-4 py-2 text-xs uppercase tracking-wide text-slate-400",
                    span { "Sort:" }
                    SortButton { label: "Newest", active: current_sort == SortMode::Newest, onclick: {
                        let mut sort_mode = sort_mode.clone();
                        move |_| sort_mode.set(SortMode::Newest)
                    }}
                    SortButton { label: "Amount", active: current_sort == SortMode::Amount, onclick: {
                        let mut sort_mode = sort_mode.clone();
                        move |_| sort_mode.set(SortMode::Amount)
                    }}
                    SortButton { label: "Status", active: current_sort == SortMode::Status, onclick: {
                        let mut sort_mode = sort_mode.clone();
                        move |_| sort_mode.set(SortMode::Status)
                    }}
                }
            }
            if is_empty {
                p { class: "px-4 py-6 text-sm text-slate-500", "No orders yet." }
            } else {
                table {
                    class: "min-w-full divide-y divide-slate-800 text-sm",
                    thead {
                        class: "{theme::table_head()}",
                        tr {
                            th { class: "px-4 py-3 font-medium", "Order" }
                            th { class: "px-4 py-3 font-medium", "Customer" }
                            th { class: "px-4 py-3 font-medium", "Status" }
                            th { class: "px-4 py-3 font-medium text-right", "Total" }
                            th { class: "px-4 py-3 font-medium text-right", "Docs" }
                            th { class: "px-4 py-3 font-medium", "Placed" }
                        }
                    }
                    tbody {
                        class: "divide-y divide-slate-800",
                        for row in rendered_rows {
                            OrderTableRow {
                                row: row.clone(),
                                selected: selected_id.as_deref() == Some(row.id.as_str()),
                                on_select: on_select.clone(),
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn OrderTableRow(row: OrderRow, selected: bool, on_select: EventHandler<String>) -> Element {
    let row_class = if selected {
        "cursor-pointer bg-indigo-500/10"
    } else {
        "cursor-pointer hover:bg-slate-800/40"
    };
    let row_id = row.id.clone();

    rsx! {
        tr {
            class: "{row_class}",
            onclick: move |_| on_select.call(row_id.clone()),
            td {
                class: "px-4 py-3",
                div { class: "font-medium text-slate-100", "{row.order_number}" }
                if let Some(po) = row.po_number.clone() {
                    div { class: "text-xs text-slate-500", "PO {po}" }
                }
            }
            td { class: "px-4 py-3 text-slate-300", "{row.customer_name}" }
            td { class: "px-4 py-3", OrderStatusBadge { status: row.status } }
            td { class: "px-4 py-3 text-right text-slate-300", "{format_amount(row.final_amount)}" }
            td { class: "px-4 py-3 text-right text-slate-400", "{row.receivings}" }
            td { class: "px-4 py-3 text-slate-400", "{row.created_label}" }
        }
    }
}

#[component]
fn SortButton(label: &'static str, active: bool, onclick: EventHandler<()>) -> Element {
    let class = if active {
        "rounded-md border border-indigo-500/60 bg-indigo-500/15 px-2 py-1 text-[11px] font-semibold text-indigo-100"
    } else {
        "rounded-md border border-slate-800 px-2 py-1 text-[11px] text-slate-400 transition hover:border-slate-600 hover:text-slate-200"
    };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}

fn sort_rows(rows: &mut [OrderRow], mode: SortMode) {
    match mode {
        SortMode::Newest => rows.sort_by(|a, b| b.created_sort_key.cmp(&a.created_sort_key)),
        SortMode::Amount => rows.sort_by(|a, b| {
            b.final_amount
                .partial_cmp(&a.final_amount)
                .unwrap_or(Ordering::Equal)
        }),
        SortMode::Status => rows.sort_by(|a, b| a.status.code().cmp(&b.status.code())),
    }
}
