use dioxus::prelude::*;

use crate::app::{persist_user_state, Route};
use crate::domain::{AppState, Capability, Role};
use crate::ui::pages::WorkspaceSelectPage;
use crate::ui::theme;

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let role = state.with(|s| s.role);

    // No workspace chosen yet: show the entry screen instead of any page.
    let Some(role) = role else {
        return rsx! {
            div { class: "min-h-screen bg-slate-950 text-slate-100 font-sans",
                WorkspaceSelectPage {}
            }
        };
    };

    let current_route = use_route::<Route>();
    let nav = use_navigator();
    let cart_count: u32 = state.with(|s| s.cart_lines.iter().map(|line| line.quantity).sum());

    let mut state_for_switch = state;
    let switch_to = move |next: Role| {
        state_for_switch.with_mut(|s| s.role = Some(next));
        persist_user_state(&state_for_switch);
    };
    let mut switch_dashboard = switch_to.clone();
    let mut switch_storefront = switch_to.clone();

    rsx! {
        div { class: "min-h-screen bg-slate-950 text-slate-100 font-sans",
            header {
                class: "border-b border-slate-900/60 bg-slate-950/80 backdrop-blur px-6 py-4",
                div { class: "mx-auto grid max-w-6xl grid-cols-[1fr_auto_1fr] items-center gap-4",
                    div { class: "flex items-center gap-3",
                        span { class: "text-2xl", "🗂️" }
                        div {
                            h1 { class: "text-xl font-semibold tracking-tight", "OrderDesk" }
                            p { class: "text-xs text-slate-500", "{role.name()}" }
                        }
                    }

                    // Workspace switcher
                    div { class: "flex gap-1 justify-center",
                        button {
                            class: if role.is_store_side() {
                                "min-w-[6rem] rounded-lg px-3 py-1.5 text-sm font-semibold bg-indigo-500/20 text-indigo-300 border border-indigo-500/40"
                            } else {
                                "min-w-[6rem] rounded-lg px-3 py-1.5 text-sm text-slate-500 border border-slate-800 hover:border-indigo-600 hover:text-indigo-400 transition"
                            },
                            onclick: move |_| switch_dashboard(Role::Owner),
                            "🏪 Dashboard"
                        }
                        button {
                            class: if role == Role::Customer {
                                "min-w-[6rem] rounded-lg px-3 py-1.5 text-sm font-semibold bg-emerald-500/20 text-emerald-300 border border-emerald-500/40"
                            } else {
                                "min-w-[6rem] rounded-lg px-3 py-1.5 text-sm text-slate-500 border border-slate-800 hover:border-emerald-600 hover:text-emerald-400 transition"
                            },
                            onclick: move |_| switch_storefront(Role::Customer),
                            "🛒 Storefront"
                        }
                    }

                    // Nav entries come from the capability table.
                    nav { class: "flex gap-2 text-sm justify-end",
                        if role.can(Capability::ManageOrders) {
                            NavButton { active: matches!(current_route, Route::Orders {}), onclick: move |_| { nav.push(Route::Orders {}); }, label: "Orders".to_string(), role }
                        }
                        if role.can(Capability::ManageProducts) {
                            NavButton { active: matches!(current_route, Route::Products {}), onclick: move |_| { nav.push(Route::Products {}); }, label: "Products".to_string(), role }
                        }
                        if role.can(Capability::ManagePricing) {
                            NavButton { active: matches!(current_route, Route::Pricing {}), onclick: move |_| { nav.push(Route::Pricing {}); }, label: "Pricing".to_string(), role }
                        }
                        if role.can(Capability::BrowseCatalog) {
                            NavButton { active: matches!(current_route, Route::Catalog {}), onclick: move |_| { nav.push(Route::Catalog {}); }, label: "Catalog".to_string(), role }
                        }
                        if role.can(Capability::Checkout) {
                            NavButton {
                                active: matches!(current_route, Route::Cart {}),
                                onclick: move |_| { nav.push(Route::Cart {}); },
                                label: if cart_count > 0 { format!("Cart ({cart_count})") } else { "Cart".to_string() },
                                role,
                            }
                            NavButton { active: matches!(current_route, Route::Orders {}), onclick: move |_| { nav.push(Route::Orders {}); }, label: "My Orders".to_string(), role }
                        }
                        if role.can(Capability::ManageSettings) {
                            NavButton { active: matches!(current_route, Route::Settings {}), onclick: move |_| { nav.push(Route::Settings {}); }, label: "⚙️".to_string(), role }
                        }
                    }
                }
            }
            main { class: "mx-auto max-w-6xl px-6 py-10",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: String, role: Role) -> Element {
    let class = if active {
        theme::nav_active(Some(role))
    } else {
        theme::nav_inactive()
    };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
