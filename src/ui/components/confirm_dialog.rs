use dioxus::prelude::*;

use crate::ui::theme;

/// Blocking confirmation step for edits that touch a currently-binding
/// agreement. Nothing is written until the user confirms.
#[component]
pub fn ConfirmDialog(
    title: String,
    body: String,
    confirm_label: String,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            div {
                class: "w-full max-w-md rounded-xl border border-slate-700 bg-slate-900 p-6 shadow-xl",
                h2 { class: "text-lg font-semibold text-slate-100", "{title}" }
                p { class: "mt-2 text-sm text-slate-400", "{body}" }
                div { class: "mt-6 flex justify-end gap-3",
                    button {
                        class: "{theme::btn_secondary()}",
                        onclick: move |_| on_cancel.call(()),
                        "Keep as is"
                    }
                    button {
                        class: "{theme::btn_danger()}",
                        onclick: move |_| on_confirm.call(()),
                        "{confirm_label}"
                    }
                }
            }
        }
    }
}
