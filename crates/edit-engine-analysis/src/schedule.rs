//! Debounced, cancelable analysis scheduling.
//!
//! Analysis runs off the edit-critical path: rapid edits coalesce into one
//! request, and a newer request supersedes any older one. The scheduler is a
//! pull-driven state machine — the host calls [`AnalysisScheduler::request`]
//! after each edit and [`AnalysisScheduler::poll`] on idle ticks; a ticket is
//! issued once the document has been quiet for the debounce window, and
//! results are applied only while the ticket is still current.

use edit_engine::{MonotonicClock, TimeSource};
use log::debug;

/// Quiescence window before an analysis request is released.
pub const DEBOUNCE_MS: u64 = 150;

/// Proof that an analysis run was started for a specific request generation.
///
/// Check [`AnalysisScheduler::is_current`] before applying the run's results:
/// a ticket from a superseded generation must be discarded, never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
}

impl AnalysisTicket {
    /// The request generation this ticket belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

struct Pending {
    generation: u64,
    requested_at: u64,
}

/// Coalesces analysis requests and gates stale results.
pub struct AnalysisScheduler<C: TimeSource = MonotonicClock> {
    clock: C,
    debounce_ms: u64,
    latest_generation: u64,
    pending: Option<Pending>,
}

impl AnalysisScheduler<MonotonicClock> {
    /// Create a scheduler driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for AnalysisScheduler<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TimeSource> AnalysisScheduler<C> {
    /// Create a scheduler driven by `clock` with the default debounce
    /// window.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            debounce_ms: DEBOUNCE_MS,
            latest_generation: 0,
            pending: None,
        }
    }

    /// Override the debounce window (milliseconds).
    pub fn with_debounce(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Record that the document changed and analysis is wanted.
    ///
    /// Supersedes any pending request and restarts the quiescence window.
    /// Returns the new request generation.
    pub fn request(&mut self) -> u64 {
        self.latest_generation += 1;
        let generation = self.latest_generation;
        if let Some(old) = &self.pending {
            debug!(
                "analysis request {} superseded by {}",
                old.generation, generation
            );
        }
        self.pending = Some(Pending {
            generation,
            requested_at: self.clock.now_millis(),
        });
        generation
    }

    /// Release the pending request once the document has been quiet for the
    /// debounce window. Returns `None` while still waiting (or when nothing
    /// is pending).
    pub fn poll(&mut self) -> Option<AnalysisTicket> {
        let pending = self.pending.as_ref()?;
        let elapsed = self.clock.now_millis().saturating_sub(pending.requested_at);
        if elapsed < self.debounce_ms {
            return None;
        }
        let generation = pending.generation;
        self.pending = None;
        Some(AnalysisTicket { generation })
    }

    /// Returns `true` while no newer request has been issued since this
    /// ticket's generation. Stale tickets must have their results dropped.
    pub fn is_current(&self, ticket: AnalysisTicket) -> bool {
        ticket.generation == self.latest_generation
    }
}
