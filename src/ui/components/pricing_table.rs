use dioxus::prelude::*;

use crate::domain::{ExpiryStatus, PricingStrategy};
use crate::ui::components::status_badge::ExpiryBadge;
use crate::ui::{format_amount, theme};

#[derive(Clone, PartialEq)]
pub struct PricingRow {
    pub product_id: String,
    pub product_name: String,
    pub sku: String,
    pub strategy: PricingStrategy,
    pub margin_pct: Option<f64>,
    pub display_price: f64,
    pub visible: bool,
    pub effective_to_label: Option<String>,
    pub expiry_status: Option<ExpiryStatus>,
}

#[component]
pub fn PricingTable(
    rows: Vec<PricingRow>,
    selected_id: Option<String>,
    on_select: EventHandler<String>,
    on_toggle_visible: EventHandler<String>,
) -> Element {
    let count = rows.len();

    if rows.is_empty() {
        return rsx! {
            div {
                class: "{theme::panel()}",
                p { class: "px-4 py-6 text-sm text-slate-500",
                    "No products assigned to this customer yet."
                }
            }
        };
    }

    rsx! {
        div {
            class: "{theme::panel()}",
            header {
                class: "flex flex-wrap items-center justify-between gap-2 border-b border-slate-800 px-4 py-3",
                h3 { class: "text-sm font-semibold text-slate-200", "Customer Pricing" }
                span { class: "text-xs text-slate-500", "{count} products" }
            }
            table {
                class: "min-w-full divide-y divide-slate-800 text-sm",
                thead {
                    class: "{theme::table_head()}",
                    tr {
                        th { class: "px-4 py-3 font-medium", "Product" }
                        th { class: "px-4 py-3 font-medium", "Strategy" }
                        th { class: "px-4 py-3 font-medium text-right", "Price" }
                        th { class: "px-4 py-3 font-medium", "Validity" }
                        th { class: "px-4 py-3 font-medium text-right", "Storefront" }
                    }
                }
                tbody {
                    class: "divide-y divide-slate-800",
                    for row in rows {
                        PricingTableRow {
                            row: row.clone(),
                            selected: selected_id.as_deref() == Some(row.product_id.as_str()),
                            on_select: on_select.clone(),
                            on_toggle_visible: on_toggle_visible.clone(),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn PricingTableRow(
    row: PricingRow,
    selected: bool,
    on_select: EventHandler<String>,
    on_toggle_visible: EventHandler<String>,
) -> Element {
    let row_class = if selected {
        "cursor-pointer bg-indigo-500/10"
    } else {
        "cursor-pointer hover:bg-slate-800/40"
    };
    let strategy_label = match row.strategy {
        PricingStrategy::Fixed => "Fixed".to_string(),
        PricingStrategy::ProfitMargin => match row.margin_pct {
            Some(margin) => format!("Margin {margin:.1}%"),
            None => "Margin".to_string(),
        },
    };
    let toggle_label = if row.visible { "Visible" } else { "Hidden" };
    let toggle_class = if row.visible {
        "rounded-md border border-emerald-500/40 px-2 py-1 text-[11px] font-semibold text-emerald-300 hover:bg-emerald-500/10"
    } else {
        "rounded-md border border-slate-700 px-2 py-1 text-[11px] text-slate-500 hover:border-slate-500 hover:text-slate-300"
    };
    let select_id = row.product_id.clone();
    let toggle_id = row.product_id.clone();

    rsx! {
        tr {
            class: "{row_class}",
            onclick: move |_| on_select.call(select_id.clone()),
            td {
                class: "px-4 py-3",
                div { class: "font-medium text-slate-100", "{row.product_name}" }
                div { class: "text-xs text-slate-500", "{row.sku}" }
            }
            td { class: "px-4 py-3 text-slate-300", "{strategy_label}" }
            td { class: "px-4 py-3 text-right font-medium text-slate-100", "{format_amount(row.display_price)}" }
            td {
                class: "px-4 py-3",
                div { class: "flex items-center gap-2",
                    if let Some(label) = row.effective_to_label.clone() {
                        span { class: "text-xs text-slate-400", "until {label}" }
                    } else {
                        span { class: "text-xs text-slate-500", "open-ended" }
                    }
                    ExpiryBadge { status: row.expiry_status }
                }
            }
            td {
                class: "px-4 py-3 text-right",
                button {
                    class: "{toggle_class}",
                    // Stop the row click so toggling never changes the selection.
                    onclick: move |evt: MouseEvent| {
                        evt.stop_propagation();
                        on_toggle_visible.call(toggle_id.clone());
                    },
                    "{toggle_label}"
                }
            }
        }
    }
}
