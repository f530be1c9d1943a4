#![warn(missing_docs)]
//! `edit-engine-analysis` - Off-path document analysis for `edit-engine`.
//!
//! This crate derives editor state that does not belong on the keystroke
//! path:
//!
//! - [`analyze`]: a pure pass over the token stream producing diagnostics
//!   (unexpected characters, unterminated strings, TODO/FIXME markers)
//! - [`scan_fold_regions`]: discovers foldable regions (multi-line brace
//!   blocks and block comments) from the token stream
//! - [`AnalysisScheduler`]: debounces rapid edits and makes supersession
//!   explicit, so a stale result is never applied over a newer request
//!
//! The host wires the pieces: after an edit it re-tokenizes, calls
//! [`AnalysisScheduler::request`], and on each idle tick polls the scheduler;
//! when a ticket is issued it runs [`analyze`] / [`scan_fold_regions`] and
//! applies the results only if the ticket is still current.

mod diagnose;
mod fold_scan;
mod schedule;

pub use diagnose::analyze;
pub use fold_scan::scan_fold_regions;
pub use schedule::{AnalysisScheduler, AnalysisTicket, DEBOUNCE_MS};
