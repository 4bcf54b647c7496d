//! Timed banner rotation per slot.
//!
//! A rotator is a wall-clock machine: the active creative index is derived
//! from the mount anchor, so rotation keeps running while the slot is
//! dismissed. The caller is responsible for calling `tick()` periodically.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::Creative;
use crate::error::ValidationError;
use crate::events::Event;

/// Where a banner slot is anchored in the dashboard shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerSlot {
    Left,
    Right,
    Bottom,
}

impl BannerSlot {
    /// Creative dimensions in CSS pixels (width, height).
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            BannerSlot::Left | BannerSlot::Right => (160, 600),
            BannerSlot::Bottom => (728, 90),
        }
    }
}

impl std::fmt::Display for BannerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BannerSlot::Left => "left",
            BannerSlot::Right => "right",
            BannerSlot::Bottom => "bottom",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for BannerSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(BannerSlot::Left),
            "right" => Ok(BannerSlot::Right),
            "bottom" => Ok(BannerSlot::Bottom),
            other => Err(format!("unknown banner slot: {other}")),
        }
    }
}

/// Rendered state of one mounted slot, for snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerStatus {
    pub slot: BannerSlot,
    pub visible: bool,
    pub active_index: usize,
    pub creative: Creative,
    pub dismissed_until: Option<DateTime<Utc>>,
}

/// One mounted banner slot cycling a fixed creative catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerRotator {
    slot: BannerSlot,
    catalog: Vec<Creative>,
    rotation_interval_ms: u64,
    reshow_delay_secs: u64,
    mounted_at: DateTime<Utc>,
    active_index: usize,
    /// Pending re-show deadline while dismissed; None means visible.
    dismissed_until: Option<DateTime<Utc>>,
}

impl BannerRotator {
    /// Mount a slot. The catalog must be non-empty.
    pub fn new(
        slot: BannerSlot,
        catalog: Vec<Creative>,
        rotation_interval_ms: u64,
        reshow_delay_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if catalog.is_empty() {
            return Err(ValidationError::EmptyCollection(format!(
                "banner catalog for slot '{slot}'"
            )));
        }
        Ok(Self {
            slot,
            catalog,
            rotation_interval_ms: rotation_interval_ms.max(1),
            reshow_delay_secs,
            mounted_at: now,
            active_index: 0,
            dismissed_until: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn slot(&self) -> BannerSlot {
        self.slot
    }

    pub fn is_visible(&self) -> bool {
        self.dismissed_until.is_none()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_creative(&self) -> &Creative {
        &self.catalog[self.active_index % self.catalog.len()]
    }

    pub fn status(&self) -> BannerStatus {
        BannerStatus {
            slot: self.slot,
            visible: self.is_visible(),
            active_index: self.active_index,
            creative: self.active_creative().clone(),
            dismissed_until: self.dismissed_until,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Call periodically. Advances rotation and restores a dismissed slot
    /// once its re-show deadline passes.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();

        let elapsed_ms = (now - self.mounted_at).num_milliseconds().max(0) as u64;
        let expected = (elapsed_ms / self.rotation_interval_ms) as usize % self.catalog.len();
        if expected != self.active_index {
            self.active_index = expected;
            events.push(Event::BannerRotated {
                slot: self.slot,
                index: expected,
                at: now,
            });
        }

        if let Some(until) = self.dismissed_until {
            if now >= until {
                self.dismissed_until = None;
                events.push(Event::BannerRestored {
                    slot: self.slot,
                    at: now,
                });
            }
        }

        events
    }

    /// Hide the slot and schedule the one-shot re-show. Dismissing an
    /// already-dismissed slot is a no-op and does not reset the pending
    /// re-show deadline.
    pub fn dismiss(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.dismissed_until.is_some() {
            return None;
        }
        let reshow_at = now + Duration::seconds(self.reshow_delay_secs as i64);
        self.dismissed_until = Some(reshow_at);
        Some(Event::BannerDismissed {
            slot: self.slot,
            reshow_at,
            at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::catalog::banner_creatives;

    fn rotator(now: DateTime<Utc>) -> BannerRotator {
        BannerRotator::new(BannerSlot::Bottom, banner_creatives(), 30_000, 10, now).unwrap()
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = BannerRotator::new(BannerSlot::Left, vec![], 30_000, 10, Utc::now());
        assert!(err.is_err());
    }

    #[test]
    fn rotation_advances_per_interval() {
        let t0 = Utc::now();
        let mut b = rotator(t0);
        assert_eq!(b.active_index(), 0);

        b.tick(t0 + Duration::milliseconds(30_000));
        assert_eq!(b.active_index(), 1);

        b.tick(t0 + Duration::milliseconds(90_000));
        assert_eq!(b.active_index(), 3);
    }

    #[test]
    fn full_cycle_returns_to_start() {
        let t0 = Utc::now();
        let mut b = rotator(t0);
        b.tick(t0 + Duration::milliseconds(6 * 30_000));
        assert_eq!(b.active_index(), 0);
    }

    #[test]
    fn dismiss_hides_then_reshows_after_delay() {
        let t0 = Utc::now();
        let mut b = rotator(t0);

        assert!(b.dismiss(t0).is_some());
        assert!(!b.is_visible());

        let events = b.tick(t0 + Duration::seconds(9));
        assert!(!b.is_visible());
        assert!(events.is_empty());

        let events = b.tick(t0 + Duration::seconds(10));
        assert!(b.is_visible());
        assert!(matches!(events[0], Event::BannerRestored { .. }));
    }

    #[test]
    fn double_dismiss_does_not_extend_reshow() {
        let t0 = Utc::now();
        let mut b = rotator(t0);

        b.dismiss(t0);
        // Second dismiss 5s later must not push the deadline to t0+15s.
        assert!(b.dismiss(t0 + Duration::seconds(5)).is_none());

        b.tick(t0 + Duration::seconds(10));
        assert!(b.is_visible());
    }

    #[test]
    fn rotation_keeps_running_while_dismissed() {
        let t0 = Utc::now();
        let mut b = rotator(t0);
        b.dismiss(t0);

        b.tick(t0 + Duration::seconds(10));
        assert!(b.is_visible());
        // 10s < 30s interval: still on the first creative.
        assert_eq!(b.active_index(), 0);

        let mut b = rotator(t0);
        b.dismiss(t0 + Duration::seconds(25));
        b.tick(t0 + Duration::seconds(35));
        assert!(b.is_visible());
        assert_eq!(b.active_index(), 1);
    }

    #[test]
    fn slot_dimensions() {
        assert_eq!(BannerSlot::Left.dimensions(), (160, 600));
        assert_eq!(BannerSlot::Bottom.dimensions(), (728, 90));
    }
}
