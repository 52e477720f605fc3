use dioxus::prelude::*;

use crate::{
    app::persist_user_state,
    domain::{AppState, CacheResource, Capability, StoreSettings, TaxRateSource},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
};

use super::orders::humanize_age;

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let settings = state.with(|st| st.settings.clone());
    let role = state.with(|st| st.role);

    let mut operation_cost_input = use_signal(|| format!("{}", settings.operation_cost_pct));
    let per_item_initial = matches!(settings.tax_source, TaxRateSource::PerItem);
    let (cgst_initial, sgst_initial) = match settings.tax_source {
        TaxRateSource::FlatSplit { cgst_pct, sgst_pct } => (cgst_pct, sgst_pct),
        TaxRateSource::PerItem => (9.0, 9.0),
    };
    let mut per_item_input = use_signal(|| per_item_initial);
    let mut cgst_input = use_signal(|| format!("{cgst_initial}"));
    let mut sgst_input = use_signal(|| format!("{sgst_initial}"));

    let cache_entries = state.with(|st| {
        st.cache
            .iter()
            .map(|(resource, time)| (cache_label(resource), humanize_age(*time)))
            .collect::<Vec<_>>()
    });

    let allowed = role
        .map(|role| role.can(Capability::ManageSettings))
        .unwrap_or(false);
    if !allowed {
        return rsx! {
            div {
                class: "{theme::panel()} p-10 text-center",
                p { class: "text-sm text-slate-500", "Only the store owner can change settings." }
            }
        };
    }

    let on_apply = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let parsed = parse_settings(
                operation_cost_input(),
                per_item_input(),
                cgst_input(),
                sgst_input(),
            );

            match parsed {
                Ok(settings) => {
                    state.with_mut(|st| st.settings = settings);
                    persist_user_state(&state);
                    push_toast(
                        toasts.clone(),
                        ToastKind::Success,
                        "Store settings updated. Cost prices recompute from here on.",
                    );
                }
                Err(message) => {
                    push_toast(toasts.clone(), ToastKind::Error, message);
                }
            }
        }
    };

    let on_reset = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            let defaults = StoreSettings::default();
            operation_cost_input.set(format!("{}", defaults.operation_cost_pct));
            per_item_input.set(false);
            cgst_input.set("9".to_string());
            sgst_input.set("9".to_string());
            state.with_mut(|st| st.settings = defaults);
            persist_user_state(&state);
            push_toast(toasts.clone(), ToastKind::Info, "Restored default settings.");
        }
    };

    let on_clear_cache = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        move |_| {
            state.with_mut(|st| st.cache.clear());
            push_toast(
                toasts.clone(),
                ToastKind::Info,
                "Cleared cached timestamps. Data will refresh on next fetch.",
            );
        }
    };

    let per_item = per_item_input();

    rsx! {
        div { class: "space-y-8",
            header {
                h1 { class: "text-2xl font-semibold text-slate-100", "Store Settings" }
                p { class: "text-sm text-slate-400",
                    "Cost overhead and how GST is split across cart lines."
                }
            }

            section {
                class: "grid gap-6 lg:grid-cols-2",
                div {
                    class: "{theme::panel_padded()} space-y-4",
                    h2 { class: "text-sm font-semibold text-slate-200", "Costing" }
                    div {
                        label { class: "{theme::field_label()}", "Operation cost %" }
                        input {
                            class: "{theme::field_input()}",
                            inputmode: "decimal",
                            value: operation_cost_input(),
                            oninput: move |evt| operation_cost_input.set(evt.value().to_string()),
                        }
                        p { class: "mt-1 text-xs text-slate-500",
                            "Added on top of freight when deriving each product's cost price."
                        }
                    }

                    h2 { class: "pt-2 text-sm font-semibold text-slate-200", "Tax Source" }
                    div { class: "flex gap-2",
                        button {
                            class: if !per_item {
                                "rounded-md border border-indigo-500/60 bg-indigo-500/15 px-3 py-1.5 text-xs font-semibold text-indigo-100"
                            } else {
                                "rounded-md border border-slate-700 px-3 py-1.5 text-xs text-slate-400 hover:border-slate-500"
                            },
                            onclick: move |_| per_item_input.set(false),
                            "Flat CGST/SGST split"
                        }
                        button {
                            class: if per_item {
                                "rounded-md border border-indigo-500/60 bg-indigo-500/15 px-3 py-1.5 text-xs font-semibold text-indigo-100"
                            } else {
                                "rounded-md border border-slate-700 px-3 py-1.5 text-xs text-slate-400 hover:border-slate-500"
                            },
                            onclick: move |_| per_item_input.set(true),
                            "Per-item GST rate"
                        }
                    }
                    if !per_item {
                        div { class: "grid gap-3 sm:grid-cols-2",
                            div {
                                label { class: "{theme::field_label()}", "CGST %" }
                                input {
                                    class: "{theme::field_input()}",
                                    inputmode: "decimal",
                                    value: cgst_input(),
                                    oninput: move |evt| cgst_input.set(evt.value().to_string()),
                                }
                            }
                            div {
                                label { class: "{theme::field_label()}", "SGST %" }
                                input {
                                    class: "{theme::field_input()}",
                                    inputmode: "decimal",
                                    value: sgst_input(),
                                    oninput: move |evt| sgst_input.set(evt.value().to_string()),
                                }
                            }
                        }
                    } else {
                        p { class: "text-xs text-slate-500",
                            "Each line uses its product's GST rate, split evenly into CGST and SGST."
                        }
                    }

                    div { class: "flex gap-3 pt-2",
                        button { class: "{theme::btn_primary(None)}", onclick: on_apply, "Apply" }
                        button { class: "{theme::btn_secondary()}", onclick: on_reset, "Reset" }
                    }
                }

                div {
                    class: "{theme::panel_padded()} space-y-4",
                    h2 { class: "text-sm font-semibold text-slate-200", "Cached Data" }
                    if cache_entries.is_empty() {
                        p { class: "text-sm text-slate-500", "Nothing fetched yet this session." }
                    } else {
                        ul { class: "space-y-2 text-sm",
                            for (label, age) in cache_entries {
                                li {
                                    class: "flex justify-between text-slate-300",
                                    span { "{label}" }
                                    span { class: "text-slate-500", "{age}" }
                                }
                            }
                        }
                    }
                    button { class: "{theme::btn_secondary()}", onclick: on_clear_cache, "Clear Cache" }
                }
            }
        }
    }
}

fn parse_settings(
    operation_cost: String,
    per_item: bool,
    cgst: String,
    sgst: String,
) -> Result<StoreSettings, String> {
    let operation_cost_pct = operation_cost
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
        .ok_or_else(|| "Operation cost must be a non-negative number.".to_string())?;

    let tax_source = if per_item {
        TaxRateSource::PerItem
    } else {
        let cgst_pct = cgst
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| "CGST must be a non-negative number.".to_string())?;
        let sgst_pct = sgst
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| "SGST must be a non-negative number.".to_string())?;
        TaxRateSource::FlatSplit { cgst_pct, sgst_pct }
    };

    Ok(StoreSettings {
        operation_cost_pct,
        tax_source,
    })
}

fn cache_label(resource: &CacheResource) -> String {
    match resource {
        CacheResource::Products => "Products".to_string(),
        CacheResource::Customers => "Customers".to_string(),
        CacheResource::Orders => "Orders".to_string(),
        CacheResource::Pricing(customer_id) => format!("Pricing · {customer_id}"),
    }
}
