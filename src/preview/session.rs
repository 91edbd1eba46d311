//! Debounced, last-edit-wins preview state machine.
//!
//! The session never reads a clock; callers pass `Instant`s. A typical loop calls
//! [`PreviewSession::edit`] on every keystroke, sleeps until [`PreviewSession::deadline`], calls
//! [`PreviewSession::poll`] to get the request to send, and feeds responses to
//! [`PreviewSession::accept`].

use std::time::{Duration, Instant};

use crate::compile::compiler::CompileInput;
use crate::compile::fingerprint::{Fingerprint, request_fingerprint};
use crate::config::PreviewConfig;
use crate::wire::response::PreviewResponse;

#[derive(Clone, Debug)]
struct PendingEdit {
    input: CompileInput,
    fingerprint: Fingerprint,
    last_edit_at: Instant,
}

/// A request the caller should send now.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch {
    pub input: CompileInput,
    pub fingerprint: Fingerprint,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseDisposition {
    /// Computed for the latest edit; apply it.
    Accepted,
    /// Computed for an older edit; drop it.
    Stale,
}

#[derive(Debug)]
pub struct PreviewSession {
    debounce: Duration,
    pending: Option<PendingEdit>,
    current: Option<Fingerprint>,
    in_flight: Option<Fingerprint>,
    applied: Option<Fingerprint>,
}

impl PreviewSession {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
            current: None,
            in_flight: None,
            applied: None,
        }
    }

    pub fn from_config(config: &PreviewConfig) -> Self {
        Self::new(Duration::from_millis(config.debounce_ms))
    }

    /// Record an edit. Restarts the debounce window and makes this edit the current one.
    pub fn edit(&mut self, input: CompileInput, now: Instant) -> Fingerprint {
        let fingerprint = request_fingerprint(&input);
        self.current = Some(fingerprint);

        // already showing or computing exactly this layout
        if self.applied == Some(fingerprint) || self.in_flight == Some(fingerprint) {
            self.pending = None;
            return fingerprint;
        }

        self.pending = Some(PendingEdit {
            input,
            fingerprint,
            last_edit_at: now,
        });
        fingerprint
    }

    /// When the pending edit becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.last_edit_at + self.debounce)
    }

    /// Release the pending edit once its debounce window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Dispatch> {
        let due = self.deadline().is_some_and(|d| now >= d);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        if let Some(previous) = self.in_flight
            && previous != pending.fingerprint
        {
            tracing::debug!(%previous, next = %pending.fingerprint, "superseding in-flight preview");
        }
        self.in_flight = Some(pending.fingerprint);
        Some(Dispatch {
            input: pending.input,
            fingerprint: pending.fingerprint,
        })
    }

    /// Decide what to do with a response. Only the current edit's response is accepted.
    pub fn accept(&mut self, response: &PreviewResponse) -> ResponseDisposition {
        if self.in_flight == Some(response.fingerprint) {
            self.in_flight = None;
        }
        if self.current == Some(response.fingerprint) {
            self.applied = Some(response.fingerprint);
            ResponseDisposition::Accepted
        } else {
            tracing::debug!(fingerprint = %response.fingerprint, "discarding stale preview response");
            ResponseDisposition::Stale
        }
    }

    /// Forget an in-flight request that failed, so the same edit can be retried.
    pub fn fail(&mut self, fingerprint: Fingerprint) {
        if self.in_flight == Some(fingerprint) {
            self.in_flight = None;
        }
    }

    pub fn current_fingerprint(&self) -> Option<Fingerprint> {
        self.current
    }

    pub fn in_flight(&self) -> Option<Fingerprint> {
        self.in_flight
    }

    pub fn applied(&self) -> Option<Fingerprint> {
        self.applied
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/session.rs"]
mod tests;
