use dioxus::prelude::*;

use crate::domain::CartLine;
use crate::ui::{format_amount, theme};

#[component]
pub fn CartTable(
    lines: Vec<CartLine>,
    on_set_quantity: EventHandler<(String, u32)>,
    on_remove: EventHandler<String>,
) -> Element {
    if lines.is_empty() {
        return rsx! {
            div {
                class: "{theme::panel()}",
                p { class: "px-4 py-6 text-sm text-slate-500", "Your cart is empty." }
            }
        };
    }

    rsx! {
        div {
            class: "{theme::panel()}",
            table {
                class: "min-w-full divide-y divide-slate-800 text-sm",
                thead {
                    class: "{theme::table_head()}",
                    tr {
                        th { class: "px-4 py-3 font-medium", "Product" }
                        th { class: "px-4 py-3 font-medium text-right", "Unit Price" }
                        th { class: "px-4 py-3 font-medium text-center", "Qty" }
                        th { class: "px-4 py-3 font-medium text-right", "Line Total" }
                        th { class: "px-4 py-3" }
                    }
                }
                tbody {
                    class: "divide-y divide-slate-800",
                    for line in lines {
                        CartTableRow {
                            line: line.clone(),
                            on_set_quantity: on_set_quantity.clone(),
                            on_remove: on_remove.clone(),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CartTableRow(
    line: CartLine,
    on_set_quantity: EventHandler<(String, u32)>,
    on_remove: EventHandler<String>,
) -> Element {
    let line_total = line.unit_price * line.quantity as f64;
    let dec_id = line.id.clone();
    let inc_id = line.id.clone();
    let remove_id = line.id.clone();
    let quantity = line.quantity;

    rsx! {
        tr {
            class: "hover:bg-slate-800/40",
            td {
                class: "px-4 py-3",
                div { class: "font-medium text-slate-100", "{line.name}" }
                div { class: "text-xs text-slate-500", "{line.sku}" }
            }
            td { class: "px-4 py-3 text-right text-slate-300", "{format_amount(line.unit_price)}" }
            td {
                class: "px-4 py-3",
                div { class: "flex items-center justify-center gap-2",
                    button {
                        class: "h-7 w-7 rounded-md border border-slate-700 text-slate-300 hover:border-slate-500",
                        onclick: move |_| on_set_quantity.call((dec_id.clone(), quantity.saturating_sub(1))),
                        "−"
                    }
                    span { class: "min-w-[2rem] text-center text-slate-100", "{line.quantity}" }
                    button {
                        class: "h-7 w-7 rounded-md border border-slate-700 text-slate-300 hover:border-slate-500",
                        onclick: move |_| on_set_quantity.call((inc_id.clone(), quantity + 1)),
                        "+"
                    }
                }
            }
            td { class: "px-4 py-3 text-right font-medium text-slate-100", "{format_amount(line_total)}" }
            td {
                class: "px-4 py-3 text-right",
                button {
                    class: "text-xs uppercase tracking-wide text-rose-300 hover:text-rose-100",
                    onclick: move |_| on_remove.call(remove_id.clone()),
                    "Remove"
                }
            }
        }
    }
}
