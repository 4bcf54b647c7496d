//! Full-screen interstitial gate.
//!
//! The gate is a countdown state machine:
//!
//! ```text
//! Counting(remaining) -> Closable
//! ```
//!
//! The hidden state is represented by the scheduler holding no gate at all;
//! dropping the gate cancels the countdown structurally. `Counting ->
//! Closable` is a one-way latch: once the close control is enabled it never
//! re-disables for the lifetime of the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::Creative;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatePhase {
    Counting,
    Closable,
}

/// Rendered state of the open gate, for snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterstitialStatus {
    pub phase: GatePhase,
    pub remaining_secs: u32,
    pub can_close: bool,
    pub creative: Creative,
}

/// One open interstitial session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterstitialGate {
    creative: Creative,
    opened_at: DateTime<Utc>,
    countdown_secs: u32,
    phase: GatePhase,
}

impl InterstitialGate {
    pub fn new(creative: Creative, countdown_secs: u32, now: DateTime<Utc>) -> Self {
        let phase = if countdown_secs == 0 {
            GatePhase::Closable
        } else {
            GatePhase::Counting
        };
        Self {
            creative,
            opened_at: now,
            countdown_secs,
            phase,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    pub fn creative(&self) -> &Creative {
        &self.creative
    }

    /// Seconds left on the countdown as of `now`.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u32 {
        let elapsed = (now - self.opened_at).num_seconds().max(0) as u64;
        (self.countdown_secs as u64).saturating_sub(elapsed) as u32
    }

    /// The close control is enabled only after the countdown exhausted.
    pub fn can_close(&self) -> bool {
        self.phase == GatePhase::Closable
    }

    pub fn status(&self, now: DateTime<Utc>) -> InterstitialStatus {
        InterstitialStatus {
            phase: self.phase,
            remaining_secs: self.remaining_secs(now),
            can_close: self.can_close(),
            creative: self.creative.clone(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Call periodically. Returns `Some(Event::InterstitialClosable)` on the
    /// tick that exhausts the countdown.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.phase == GatePhase::Counting && self.remaining_secs(now) == 0 {
            self.phase = GatePhase::Closable;
            return Some(Event::InterstitialClosable { at: now });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::ads::catalog::interstitial_creatives;

    fn gate(now: DateTime<Utc>) -> InterstitialGate {
        let creative = interstitial_creatives().remove(0);
        InterstitialGate::new(creative, 5, now)
    }

    #[test]
    fn cannot_close_during_countdown() {
        let t0 = Utc::now();
        let mut g = gate(t0);

        for secs in 0..5 {
            g.tick(t0 + Duration::seconds(secs));
            assert!(!g.can_close(), "closable at second {secs}");
        }
    }

    #[test]
    fn closable_after_countdown_exhausts() {
        let t0 = Utc::now();
        let mut g = gate(t0);

        let event = g.tick(t0 + Duration::seconds(5));
        assert!(matches!(event, Some(Event::InterstitialClosable { .. })));
        assert!(g.can_close());
        assert_eq!(g.remaining_secs(t0 + Duration::seconds(5)), 0);
    }

    #[test]
    fn closable_event_fires_once() {
        let t0 = Utc::now();
        let mut g = gate(t0);

        assert!(g.tick(t0 + Duration::seconds(5)).is_some());
        assert!(g.tick(t0 + Duration::seconds(6)).is_none());
    }

    #[test]
    fn remaining_counts_down() {
        let t0 = Utc::now();
        let g = gate(t0);
        assert_eq!(g.remaining_secs(t0), 5);
        assert_eq!(g.remaining_secs(t0 + Duration::seconds(2)), 3);
        assert_eq!(g.remaining_secs(t0 + Duration::seconds(60)), 0);
    }

    #[test]
    fn zero_countdown_opens_closable() {
        let creative = interstitial_creatives().remove(0);
        let g = InterstitialGate::new(creative, 0, Utc::now());
        assert!(g.can_close());
    }
}
