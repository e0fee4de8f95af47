//! Enforcement pack: custom lints for identity-gate invariants.
//!
//! ## Implemented Lints
//!
//! - `NO_PRINTLN`: Forbids the `print!` family and `dbg!` in library code.
//!   Decision diagnostics go through `tracing` (via `DecisionLog`), where
//!   tokens are kept out by `Secret` and every event carries the request id.

#![feature(rustc_private)]
#![warn(unused_extern_crates)]

extern crate rustc_ast;
extern crate rustc_lint;
extern crate rustc_session;
extern crate rustc_span;

use rustc_ast::{Expr, ExprKind, MacCall};
use rustc_lint::{EarlyContext, EarlyLintPass, LintContext};
use rustc_session::{declare_lint_pass, declare_tool_lint};

declare_tool_lint! {
    /// **What it does:** Forbids `println!`, `print!`, `eprintln!`, `eprint!`
    /// and `dbg!` in library code.
    ///
    /// **Why is this bad?** Output written straight to stdout/stderr has no
    /// request id, cannot be filtered by level, and `dbg!` prints the full
    /// `Debug` form of request state, which is where bearer tokens live.
    ///
    /// **Example:**
    /// ```rust,ignore
    /// // Bad
    /// eprintln!("delegation rejected for {}", subject);
    ///
    /// // Good
    /// log.warn(format_args!("delegation rejected for caller {subject}"));
    /// ```
    pub enforcement_pack::NO_PRINTLN,
    Deny,
    "use of a print macro or dbg!; log through tracing instead"
}

declare_lint_pass!(NoPrintln => [NO_PRINTLN]);

impl EarlyLintPass for NoPrintln {
    fn check_expr(&mut self, cx: &EarlyContext<'_>, expr: &Expr) {
        if let ExprKind::MacCall(mac) = &expr.kind {
            check_macro(cx, mac, expr.span);
        }
    }
}

/// Suggested replacement for each forbidden macro.
fn replacement(macro_name: &str) -> Option<&'static str> {
    match macro_name {
        "println" | "print" => Some("tracing::info!"),
        "eprintln" | "eprint" => Some("tracing::error!"),
        "dbg" => Some("tracing::debug!"),
        _ => None,
    }
}

fn check_macro(cx: &EarlyContext<'_>, mac: &MacCall, span: rustc_span::Span) {
    let path = &mac.path;
    if path.segments.len() != 1 {
        return;
    }

    let macro_name = path.segments[0].ident.name.as_str();
    let Some(suggestion) = replacement(macro_name) else {
        return;
    };

    cx.span_lint(NO_PRINTLN, span, |diag| {
        diag.help(format!("use `{suggestion}` or `DecisionLog` for structured logging"));
        diag.note(format!("`{macro_name}!` bypasses request-scoped logging and may print tokens"));
    });
}

#[unsafe(no_mangle)]
#[allow(unsafe_code)]
pub extern "C" fn register_lints(
    _sess: &rustc_session::Session,
    lint_store: &mut rustc_lint::LintStore,
) {
    lint_store.register_lints(&[&NO_PRINTLN]);
    lint_store.register_early_pass(|| Box::new(NoPrintln));
}

#[unsafe(no_mangle)]
pub fn dylint_version() -> *mut std::os::raw::c_char {
    std::ffi::CString::new(dylint_linting::DYLINT_VERSION)
        .expect("version string contains null byte")
        .into_raw()
}
