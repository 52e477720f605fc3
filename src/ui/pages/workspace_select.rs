use dioxus::prelude::*;

use crate::app::persist_user_state;
use crate::domain::{AppState, Role};

/// Entry screen shown until the session picks a workspace. The selection
/// persists across restarts alongside the cart.
#[component]
pub fn WorkspaceSelectPage() -> Element {
    let state = use_context::<Signal<AppState>>();

    let choose = move |role: Role| {
        let mut state = state;
        state.with_mut(|s| s.role = Some(role));
        persist_user_state(&state);
    };
    let mut choose_owner = choose.clone();
    let mut choose_staff = choose.clone();
    let mut choose_customer = choose.clone();

    rsx! {
        div { class: "flex min-h-screen items-center justify-center px-6",
            div { class: "w-full max-w-2xl text-center",
                span { class: "text-5xl", "🗂️" }
                h1 { class: "mt-4 text-3xl font-semibold tracking-tight", "OrderDesk" }
                p { class: "mt-2 text-sm text-slate-400",
                    "Pick a workspace to continue."
                }
                div { class: "mt-10 grid gap-4 sm:grid-cols-3",
                    WorkspaceCard {
                        emoji: "🏪",
                        title: "Store Owner",
                        blurb: "Orders, products, pricing and settings.",
                        onclick: move |_| choose_owner(Role::Owner),
                    }
                    WorkspaceCard {
                        emoji: "🧾",
                        title: "Store Staff",
                        blurb: "Work the order queue and pricing.",
                        onclick: move |_| choose_staff(Role::Staff),
                    }
                    WorkspaceCard {
                        emoji: "🛒",
                        title: "Customer",
                        blurb: "Browse the catalog and place purchase orders.",
                        onclick: move |_| choose_customer(Role::Customer),
                    }
                }
            }
        }
    }
}

#[component]
fn WorkspaceCard(
    emoji: &'static str,
    title: &'static str,
    blurb: &'static str,
    onclick: EventHandler<()>,
) -> Element {
    rsx! {
        button {
            class: "rounded-xl border border-slate-800 bg-slate-900/40 p-6 text-left transition hover:border-indigo-500/60 hover:bg-slate-900",
            onclick: move |_| onclick.call(()),
            span { class: "text-3xl", "{emoji}" }
            h2 { class: "mt-3 text-lg font-semibold text-slate-100", "{title}" }
            p { class: "mt-1 text-xs text-slate-500", "{blurb}" }
        }
    }
}
