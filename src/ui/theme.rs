//! Workspace-specific style helpers so pages stay consistent.
//!
//! The dashboard renders in indigo, the storefront in emerald; everything
//! else keys off the neutral slate palette.

use crate::domain::Role;

pub fn btn_primary(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Customer) => {
            "rounded-lg bg-emerald-500 px-4 py-2 text-sm font-semibold text-white hover:bg-emerald-400 disabled:cursor-not-allowed disabled:opacity-50"
        }
        _ => {
            "rounded-lg bg-indigo-500 px-4 py-2 text-sm font-semibold text-white hover:bg-indigo-400 disabled:cursor-not-allowed disabled:opacity-50"
        }
    }
}

pub fn btn_secondary() -> &'static str {
    "rounded-lg border border-slate-700 px-4 py-2 text-sm text-slate-300 transition hover:border-slate-500 hover:text-slate-100"
}

pub fn btn_danger() -> &'static str {
    "rounded-lg border border-rose-500/40 px-4 py-2 text-sm font-semibold text-rose-300 transition hover:bg-rose-500/10"
}

pub fn panel() -> &'static str {
    "rounded-xl border border-slate-800 bg-slate-900/40"
}

pub fn panel_padded() -> &'static str {
    "rounded-xl border border-slate-800 bg-slate-900/40 px-4 py-4"
}

pub fn field_label() -> &'static str {
    "block text-xs font-semibold uppercase text-slate-500"
}

pub fn field_input() -> &'static str {
    "mt-1 w-full rounded-lg border border-slate-700 bg-slate-950 px-3 py-2 text-sm text-slate-100 focus:border-indigo-500 focus:outline-none"
}

pub fn table_head() -> &'static str {
    "sticky top-0 z-10 bg-slate-900 text-left text-xs uppercase tracking-wide text-slate-500"
}

pub fn nav_active(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Customer) => {
            "min-w-[5.5rem] rounded-lg border border-emerald-500/60 bg-emerald-500/15 px-4 py-2 font-semibold text-emerald-300"
        }
        _ => {
            "min-w-[5.5rem] rounded-lg border border-indigo-500/60 bg-indigo-500/15 px-4 py-2 font-semibold text-indigo-300"
        }
    }
}

pub fn nav_inactive() -> &'static str {
    "min-w-[5.5rem] rounded-lg border border-transparent px-4 py-2 text-slate-400 transition hover:border-slate-700 hover:bg-slate-900/80 hover:text-slate-200"
}
