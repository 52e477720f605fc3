use dioxus::prelude::*;

use crate::domain::DocumentKind;
use crate::ui::theme;

const DOCUMENT_KINDS: [DocumentKind; 3] = [
    DocumentKind::Challan,
    DocumentKind::Grn,
    DocumentKind::Invoice,
];

/// Typed document upload, pre-armed with the kind a refused status advance
/// is waiting on. The caller decides what a successful upload releases;
/// dismissing hands back control without uploading anything.
#[component]
pub fn UploadDialog(
    order_number: String,
    required: DocumentKind,
    busy: bool,
    on_upload: EventHandler<(DocumentKind, String)>,
    on_dismiss: EventHandler<()>,
) -> Element {
    let mut selected_kind = use_signal(|| required);
    let mut path_input = use_signal(String::new);

    let current_kind = selected_kind();
    let can_submit = !path_input().trim().is_empty() && !busy;
    let required_label = required.label();
    let submit_label = if busy { "Uploading..." } else { "Upload" };

    let on_submit = {
        let path_input = path_input.clone();
        let selected_kind = selected_kind.clone();
        move |_| {
            let path = path_input().trim().to_string();
            if !path.is_empty() {
                on_upload.call((selected_kind(), path));
            }
        }
    };

    rsx! {
        div {
            class: "modal-overlay",
            div {
                class: "w-full max-w-md rounded-xl border border-slate-700 bg-slate-900 p-6 shadow-xl",
                h2 { class: "text-lg font-semibold text-slate-100", "Attach document" }
                p { class: "mt-1 text-sm text-slate-400",
                    "Order {order_number} needs a {required_label} before it can move forward."
                }

                div { class: "mt-4",
                    label { class: "{theme::field_label()}", "Document type" }
                    div { class: "mt-1 flex gap-2",
                        for kind in DOCUMENT_KINDS {
                            button {
                                class: if kind == current_kind {
                                    "rounded-md border border-indigo-500/60 bg-indigo-500/15 px-3 py-1.5 text-xs font-semibold text-indigo-100"
                                } else {
                                    "rounded-md border border-slate-700 px-3 py-1.5 text-xs text-slate-400 hover:border-slate-500 hover:text-slate-200"
                                },
                                onclick: move |_| selected_kind.set(kind),
                                "{kind.label()}"
                            }
                        }
                    }
                    if current_kind != required {
                        p { class: "mt-1 text-xs text-amber-300",
                            "A {current_kind.label()} will be attached but won't unblock this transition."
                        }
                    }
                }

                div { class: "mt-4",
                    label { class: "{theme::field_label()}", "Scanned document" }
                    input {
                        class: "{theme::field_input()}",
                        value: path_input(),
                        oninput: move |evt| path_input.set(evt.value().to_string()),
                        placeholder: "/path/to/challan-scan.pdf",
                    }
                    p { class: "mt-1 text-xs text-slate-500",
                        "Full path to the file on this machine."
                    }
                }

                div { class: "mt-6 flex justify-end gap-3",
                    button {
                        class: "{theme::btn_secondary()}",
                        onclick: move |_| on_dismiss.call(()),
                        "Cancel"
                    }
                    button {
                        class: "{theme::btn_primary(None)}",
                        disabled: !can_submit,
                        onclick: on_submit,
                        "{submit_label}"
                    }
                }
            }
        }
    }
}
