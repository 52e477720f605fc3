use dioxus::prelude::*;

use crate::domain::{ExpiryStatus, OrderStatus, ProductReadiness};

#[component]
pub fn OrderStatusBadge(status: OrderStatus) -> Element {
    let color = match status {
        OrderStatus::Requested => "bg-slate-700/40 text-slate-300 border-slate-600/60",
        OrderStatus::Pending => "bg-sky-500/10 text-sky-300 border-sky-500/40",
        OrderStatus::Processing => "bg-indigo-500/10 text-indigo-300 border-indigo-500/40",
        OrderStatus::Shipped => "bg-violet-500/10 text-violet-300 border-violet-500/40",
        OrderStatus::PendingInvoice => "bg-amber-500/10 text-amber-300 border-amber-500/40",
        OrderStatus::Completed => "bg-emerald-500/10 text-emerald-300 border-emerald-500/40",
        OrderStatus::Cancelled => "bg-rose-500/10 text-rose-300 border-rose-500/40",
    };

    rsx! {
        span {
            class: "inline-flex items-center rounded-full border px-2 py-0.5 text-xs font-medium {color}",
            "{status.label()}"
        }
    }
}

/// Renders the server-derived expiry flag on a pricing agreement; records
/// without a flag render nothing.
#[component]
pub fn ExpiryBadge(status: Option<ExpiryStatus>) -> Element {
    let Some(status) = status else {
        return rsx! { Fragment {} };
    };

    let (label, color) = match status {
        ExpiryStatus::ExpiringSoon => (
            "Expiring soon",
            "bg-amber-500/10 text-amber-300 border-amber-500/40",
        ),
        ExpiryStatus::ExpiringCritical => (
            "Expiring",
            "bg-rose-500/10 text-rose-300 border-rose-500/40",
        ),
    };

    rsx! {
        span {
            class: "inline-flex items-center rounded-full border px-2 py-0.5 text-xs font-medium {color}",
            "{label}"
        }
    }
}

#[component]
pub fn ReadinessBadge(readiness: ProductReadiness) -> Element {
    let color = match readiness {
        ProductReadiness::Publishable => "bg-emerald-500/10 text-emerald-300 border-emerald-500/40",
        ProductReadiness::Unpublishable => "bg-amber-500/10 text-amber-300 border-amber-500/40",
        ProductReadiness::Incomplete => "bg-rose-500/10 text-rose-300 border-rose-500/40",
    };

    rsx! {
        span {
            class: "inline-flex items-center rounded-full border px-2 py-0.5 text-xs font-medium {color}",
            "{readiness.label()}"
        }
    }
}
