//! Rewarded-video flow.
//!
//! ```text
//! Offer -> Watching(progress) -> Earned -> (claim) -> Offer
//!            \-> (skip at >= 75%) -> Offer        (no reward)
//! ```
//!
//! Watch progress is wall-clock derived from the watch anchor; the caller
//! drives it with `tick()`. The reward budget persists for the component
//! lifetime and only decreases on claim; at zero the offer is permanently
//! unavailable and every start/claim attempt is a silent no-op.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::RewardDescriptor;
use crate::error::ValidationError;
use crate::events::Event;

/// Watch progress at which the skip control becomes available.
const SKIP_THRESHOLD_PCT: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardedPhase {
    Offer,
    Watching,
    Earned,
}

/// Rendered state of the flow, for snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardedStatus {
    pub phase: RewardedPhase,
    pub progress_pct: f64,
    pub budget: u32,
    pub can_skip: bool,
    pub exhausted: bool,
    pub offer: RewardDescriptor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardedVideoFlow {
    catalog: Vec<RewardDescriptor>,
    /// Currently offered reward; re-selected on each watch start.
    offer: RewardDescriptor,
    phase: RewardedPhase,
    /// Watch anchor; Some only while Watching.
    started_at: Option<DateTime<Utc>>,
    progress_pct: f64,
    budget: u32,
}

impl RewardedVideoFlow {
    /// The catalog must be non-empty.
    pub fn new<R: Rng>(
        catalog: Vec<RewardDescriptor>,
        budget: u32,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        if catalog.is_empty() {
            return Err(ValidationError::EmptyCollection("reward catalog".into()));
        }
        let offer = catalog[rng.gen_range(0..catalog.len())].clone();
        Ok(Self {
            catalog,
            offer,
            phase: RewardedPhase::Offer,
            started_at: None,
            progress_pct: 0.0,
            budget,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> RewardedPhase {
        self.phase
    }

    pub fn offer(&self) -> &RewardDescriptor {
        &self.offer
    }

    pub fn progress_pct(&self) -> f64 {
        self.progress_pct
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn is_exhausted(&self) -> bool {
        self.budget == 0
    }

    /// The close control appears once the skip threshold is reached and
    /// stays available through `Earned` (closing there forfeits the claim).
    pub fn can_skip(&self) -> bool {
        match self.phase {
            RewardedPhase::Watching => self.progress_pct >= SKIP_THRESHOLD_PCT,
            RewardedPhase::Earned => true,
            RewardedPhase::Offer => false,
        }
    }

    pub fn status(&self) -> RewardedStatus {
        RewardedStatus {
            phase: self.phase,
            progress_pct: self.progress_pct,
            budget: self.budget,
            can_skip: self.can_skip(),
            exhausted: self.is_exhausted(),
            offer: self.offer.clone(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin watching. Re-selects the offered reward, resets progress and
    /// anchors the watch at `now`. No-op unless in `Offer` with budget left.
    pub fn start<R: Rng>(&mut self, now: DateTime<Utc>, rng: &mut R) -> Option<Event> {
        if self.phase != RewardedPhase::Offer || self.is_exhausted() {
            return None;
        }
        self.offer = self.catalog[rng.gen_range(0..self.catalog.len())].clone();
        self.phase = RewardedPhase::Watching;
        self.started_at = Some(now);
        self.progress_pct = 0.0;
        Some(Event::RewardedWatchStarted {
            reward: self.offer.clone(),
            at: now,
        })
    }

    /// Call periodically. Returns `Some(Event::RewardEarned)` on the tick
    /// that completes the watch.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.phase != RewardedPhase::Watching {
            return None;
        }
        let started = self.started_at?;
        let elapsed_secs = (now - started).num_seconds().max(0) as f64;
        let duration = self.offer.duration_secs.max(1) as f64;
        self.progress_pct = (elapsed_secs * 100.0 / duration).min(100.0);

        if self.progress_pct >= 100.0 {
            self.progress_pct = 100.0;
            self.phase = RewardedPhase::Earned;
            self.started_at = None;
            return Some(Event::RewardEarned {
                reward: self.offer.clone(),
                at: now,
            });
        }
        None
    }

    /// Abandon the watch without claiming. Only available past the skip
    /// threshold; leaves the budget untouched.
    pub fn skip(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.can_skip() {
            return None;
        }
        let progress = self.progress_pct;
        self.phase = RewardedPhase::Offer;
        self.started_at = None;
        self.progress_pct = 0.0;
        Some(Event::RewardedSkipped {
            progress_pct: progress,
            at: now,
        })
    }

    /// Claim the earned reward. Decrements the budget by exactly one and
    /// returns to `Offer`; emits `RewardedExhausted` when the budget hits
    /// zero. No-op unless in `Earned`.
    pub fn claim(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.phase != RewardedPhase::Earned {
            return Vec::new();
        }
        self.budget = self.budget.saturating_sub(1);
        self.phase = RewardedPhase::Offer;
        self.progress_pct = 0.0;

        let mut events = vec![Event::RewardClaimed {
            reward: self.offer.clone(),
            remaining_budget: self.budget,
            at: now,
        }];
        if self.budget == 0 {
            events.push(Event::RewardedExhausted { at: now });
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    use crate::ads::catalog::reward_catalog;

    fn flow(budget: u32) -> (RewardedVideoFlow, Mcg128Xsl64) {
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        let flow = RewardedVideoFlow::new(reward_catalog(), budget, &mut rng).unwrap();
        (flow, rng)
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        assert!(RewardedVideoFlow::new(vec![], 3, &mut rng).is_err());
    }

    #[test]
    fn watch_to_completion_earns_reward() {
        let t0 = Utc::now();
        let (mut flow, mut rng) = flow(3);

        assert!(flow.start(t0, &mut rng).is_some());
        assert_eq!(flow.phase(), RewardedPhase::Watching);

        for secs in 1..30 {
            flow.tick(t0 + Duration::seconds(secs));
            assert_eq!(flow.phase(), RewardedPhase::Watching);
        }

        let event = flow.tick(t0 + Duration::seconds(30));
        assert!(matches!(event, Some(Event::RewardEarned { .. })));
        assert_eq!(flow.phase(), RewardedPhase::Earned);
        assert_eq!(flow.progress_pct(), 100.0);
    }

    #[test]
    fn skip_control_gated_at_75_percent() {
        let t0 = Utc::now();
        let (mut flow, mut rng) = flow(3);
        flow.start(t0, &mut rng);

        flow.tick(t0 + Duration::seconds(22));
        assert!(!flow.can_skip());

        flow.tick(t0 + Duration::seconds(23));
        assert!(flow.can_skip());
    }

    #[test]
    fn skip_before_earned_applies_no_reward() {
        let t0 = Utc::now();
        let (mut flow, mut rng) = flow(3);
        flow.start(t0, &mut rng);

        // Too early: rejected.
        flow.tick(t0 + Duration::seconds(10));
        assert!(flow.skip(t0 + Duration::seconds(10)).is_none());

        flow.tick(t0 + Duration::seconds(25));
        let event = flow.skip(t0 + Duration::seconds(25));
        assert!(matches!(event, Some(Event::RewardedSkipped { .. })));
        assert_eq!(flow.phase(), RewardedPhase::Offer);
        assert_eq!(flow.budget(), 3);
        assert_eq!(flow.progress_pct(), 0.0);
    }

    #[test]
    fn claim_decrements_budget_and_resets() {
        let t0 = Utc::now();
        let (mut flow, mut rng) = flow(3);
        flow.start(t0, &mut rng);
        flow.tick(t0 + Duration::seconds(30));

        let events = flow.claim(t0 + Duration::seconds(31));
        assert!(matches!(
            events[0],
            Event::RewardClaimed { remaining_budget: 2, .. }
        ));
        assert_eq!(flow.budget(), 2);
        assert_eq!(flow.phase(), RewardedPhase::Offer);
        assert_eq!(flow.progress_pct(), 0.0);
    }

    #[test]
    fn claim_before_earned_is_noop() {
        let t0 = Utc::now();
        let (mut flow, mut rng) = flow(3);
        flow.start(t0, &mut rng);
        flow.tick(t0 + Duration::seconds(10));

        assert!(flow.claim(t0 + Duration::seconds(10)).is_empty());
        assert_eq!(flow.budget(), 3);
    }

    #[test]
    fn last_claim_exhausts_offer_permanently() {
        let t0 = Utc::now();
        let (mut flow, mut rng) = flow(1);
        flow.start(t0, &mut rng);
        flow.tick(t0 + Duration::seconds(30));

        let events = flow.claim(t0 + Duration::seconds(30));
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], Event::RewardedExhausted { .. }));
        assert!(flow.is_exhausted());

        // Disabled offer: start and claim are no-ops.
        assert!(flow.start(t0 + Duration::seconds(31), &mut rng).is_none());
        assert!(flow.claim(t0 + Duration::seconds(31)).is_empty());
        assert_eq!(flow.budget(), 0);
    }

    #[test]
    fn earned_state_latches_until_claim_or_skip() {
        let t0 = Utc::now();
        let (mut flow, mut rng) = flow(3);
        flow.start(t0, &mut rng);
        flow.tick(t0 + Duration::seconds(30));

        // Further ticks keep the earned state and full progress.
        flow.tick(t0 + Duration::seconds(60));
        assert_eq!(flow.phase(), RewardedPhase::Earned);
        assert_eq!(flow.progress_pct(), 100.0);

        // Closing from Earned forfeits the claim but costs no budget.
        assert!(flow.skip(t0 + Duration::seconds(61)).is_some());
        assert_eq!(flow.budget(), 3);
        assert_eq!(flow.phase(), RewardedPhase::Offer);
    }

    #[test]
    fn progress_clamps_at_100() {
        let t0 = Utc::now();
        let (mut flow, mut rng) = flow(3);
        flow.start(t0, &mut rng);
        flow.tick(t0 + Duration::seconds(500));
        assert_eq!(flow.progress_pct(), 100.0);
    }
}
