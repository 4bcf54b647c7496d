//! Ad scheduling engine.
//!
//! `AdEngine` owns the single interaction counter and decides, per the
//! configured thresholds, when the interstitial opens, which banner slots are
//! mounted, and whether the rewarded offer is eligible. Every tracked user
//! action flows through one increment path, so no action can double-count.
//!
//! The interstitial latch is the live gate session itself: an increment that
//! lands on a frequency multiple opens a gate only if none is open, and the
//! visibility flag holds until the gate's close transition completes --
//! edge-triggered, not level-triggered.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::banner::{BannerRotator, BannerSlot, BannerStatus};
use super::catalog;
use super::interstitial::{InterstitialGate, InterstitialStatus};
use super::rewarded::{RewardedStatus, RewardedVideoFlow};
use crate::error::ValidationError;
use crate::events::Event;

/// The tracked user actions that feed the interaction counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionSource {
    ViewSwitch,
    BannerClick,
    BannerDismiss,
    InterstitialClick,
    InterstitialClose,
    RewardedStart,
    RewardedSkip,
    RewardClaim,
}

impl std::fmt::Display for InteractionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InteractionSource::ViewSwitch => "view_switch",
            InteractionSource::BannerClick => "banner_click",
            InteractionSource::BannerDismiss => "banner_dismiss",
            InteractionSource::InterstitialClick => "interstitial_click",
            InteractionSource::InterstitialClose => "interstitial_close",
            InteractionSource::RewardedStart => "rewarded_start",
            InteractionSource::RewardedSkip => "rewarded_skip",
            InteractionSource::RewardClaim => "reward_claim",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for InteractionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view_switch" => Ok(InteractionSource::ViewSwitch),
            "banner_click" => Ok(InteractionSource::BannerClick),
            "banner_dismiss" => Ok(InteractionSource::BannerDismiss),
            "interstitial_click" => Ok(InteractionSource::InterstitialClick),
            "interstitial_close" => Ok(InteractionSource::InterstitialClose),
            "rewarded_start" => Ok(InteractionSource::RewardedStart),
            "rewarded_skip" => Ok(InteractionSource::RewardedSkip),
            "reward_claim" => Ok(InteractionSource::RewardClaim),
            other => Err(format!("unknown interaction source: {other}")),
        }
    }
}

/// Where an ad click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdPlacement {
    Banner(BannerSlot),
    Interstitial,
    Rewarded,
}

impl std::fmt::Display for AdPlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdPlacement::Banner(slot) => write!(f, "banner:{slot}"),
            AdPlacement::Interstitial => f.write_str("interstitial"),
            AdPlacement::Rewarded => f.write_str("rewarded"),
        }
    }
}

/// Monotonically non-decreasing count of tracked user actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionCounter {
    count: u64,
}

impl InteractionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one action; returns the new count.
    pub fn increment(&mut self) -> u64 {
        self.count += 1;
        self.count
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Threshold constants gating ad visibility and eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdPolicy {
    /// Interstitial opens on every Nth interaction.
    pub interstitial_frequency: u64,
    pub side_banner_threshold: u64,
    pub bottom_banner_threshold: u64,
    pub rewarded_threshold: u64,
    pub rewarded_enabled: bool,
}

impl Default for AdPolicy {
    fn default() -> Self {
        Self {
            interstitial_frequency: 7,
            side_banner_threshold: 2,
            bottom_banner_threshold: 1,
            rewarded_threshold: 5,
            rewarded_enabled: true,
        }
    }
}

impl AdPolicy {
    /// Pure derivation of the visibility flags from the interaction count.
    /// The interstitial flag is the one piece of hidden memory and is passed
    /// in as the explicit latch rather than reconstructed from the count.
    pub fn visibility(&self, count: u64, interstitial_open: bool) -> AdVisibility {
        AdVisibility {
            interstitial: interstitial_open,
            side_banners: count > self.side_banner_threshold,
            bottom_banner: count > self.bottom_banner_threshold,
            rewarded_eligible: self.rewarded_enabled && count > self.rewarded_threshold,
        }
    }

    fn interstitial_due(&self, count: u64) -> bool {
        self.interstitial_frequency > 0 && count > 0 && count % self.interstitial_frequency == 0
    }
}

/// Derived visibility flags the view layer reads each render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdVisibility {
    pub interstitial: bool,
    pub side_banners: bool,
    pub bottom_banner: bool,
    pub rewarded_eligible: bool,
}

/// Engine configuration: thresholds plus the fixed machine timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdEngineConfig {
    pub policy: AdPolicy,
    pub banner_rotation_ms: u64,
    pub banner_reshow_secs: u64,
    pub interstitial_countdown_secs: u32,
    pub reward_budget: u32,
}

impl Default for AdEngineConfig {
    fn default() -> Self {
        Self {
            policy: AdPolicy::default(),
            banner_rotation_ms: 30_000,
            banner_reshow_secs: 10,
            interstitial_countdown_secs: 5,
            reward_budget: 3,
        }
    }
}

/// Composition root for the ad placements.
///
/// Wall-clock based like the rest of the machines: the caller ticks it.
/// Every public action begins with a tick so countdowns and progress are
/// consistent with the supplied `now` before the action applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdEngine {
    config: AdEngineConfig,
    counter: InteractionCounter,
    /// Live interstitial session; `Some` is the edge-trigger latch.
    interstitial: Option<InterstitialGate>,
    rewarded: RewardedVideoFlow,
    /// Banner slots mount lazily once their threshold is crossed and stay
    /// mounted (the counter never decreases).
    banners: Vec<BannerRotator>,
}

impl AdEngine {
    pub fn new<R: Rng>(config: AdEngineConfig, rng: &mut R) -> Result<Self, ValidationError> {
        let rewarded = RewardedVideoFlow::new(catalog::reward_catalog(), config.reward_budget, rng)?;
        Ok(Self {
            config,
            counter: InteractionCounter::new(),
            interstitial: None,
            rewarded,
            banners: Vec::new(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn interactions(&self) -> u64 {
        self.counter.count()
    }

    pub fn policy(&self) -> &AdPolicy {
        &self.config.policy
    }

    pub fn visibility(&self) -> AdVisibility {
        self.config
            .policy
            .visibility(self.counter.count(), self.interstitial.is_some())
    }

    pub fn interstitial(&self) -> Option<&InterstitialGate> {
        self.interstitial.as_ref()
    }

    pub fn interstitial_status(&self, now: DateTime<Utc>) -> Option<InterstitialStatus> {
        self.interstitial.as_ref().map(|g| g.status(now))
    }

    pub fn rewarded(&self) -> &RewardedVideoFlow {
        &self.rewarded
    }

    pub fn rewarded_status(&self) -> RewardedStatus {
        self.rewarded.status()
    }

    pub fn banner(&self, slot: BannerSlot) -> Option<&BannerRotator> {
        self.banners.iter().find(|b| b.slot() == slot)
    }

    pub fn banner_statuses(&self) -> Vec<BannerStatus> {
        self.banners.iter().map(|b| b.status()).collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Advance every mounted machine to `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(gate) = self.interstitial.as_mut() {
            if let Some(event) = gate.tick(now) {
                events.push(event);
            }
        }
        for banner in self.banners.iter_mut() {
            events.extend(banner.tick(now));
        }
        if let Some(event) = self.rewarded.tick(now) {
            events.push(event);
        }
        events
    }

    /// Record one tracked user action from the view layer.
    pub fn interact<R: Rng>(
        &mut self,
        source: InteractionSource,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<Event> {
        let mut events = self.tick(now);
        let before = self.visibility();
        events.extend(self.apply_interaction(source, now, rng));
        events.extend(self.visibility_delta(before, now));
        events
    }

    /// Click the open interstitial's body: tracked interaction, simulated
    /// navigation, no gate state change. No-op while hidden.
    pub fn click_interstitial<R: Rng>(&mut self, now: DateTime<Utc>, rng: &mut R) -> Vec<Event> {
        let mut events = self.tick(now);
        let title = match &self.interstitial {
            Some(gate) => gate.creative().title.clone(),
            None => return events,
        };
        let before = self.visibility();
        events.push(Event::AdClicked {
            placement: AdPlacement::Interstitial,
            title,
            at: now,
        });
        events.extend(self.apply_interaction(InteractionSource::InterstitialClick, now, rng));
        events.extend(self.visibility_delta(before, now));
        events
    }

    /// Close the interstitial. Rejected (silent no-op) until the countdown
    /// exhausted; the close itself is a tracked interaction, applied after
    /// the gate is gone.
    pub fn close_interstitial<R: Rng>(&mut self, now: DateTime<Utc>, rng: &mut R) -> Vec<Event> {
        let mut events = self.tick(now);
        let can_close = self.interstitial.as_ref().is_some_and(|g| g.can_close());
        if !can_close {
            return events;
        }
        let before = self.visibility();
        self.interstitial = None;
        events.push(Event::InterstitialClosed { at: now });
        events.extend(self.apply_interaction(InteractionSource::InterstitialClose, now, rng));
        events.extend(self.visibility_delta(before, now));
        events
    }

    /// Click the active creative of a mounted, visible banner slot.
    pub fn click_banner<R: Rng>(
        &mut self,
        slot: BannerSlot,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<Event> {
        let mut events = self.tick(now);
        let title = match self.banner(slot) {
            Some(b) if b.is_visible() => b.active_creative().title.clone(),
            _ => return events,
        };
        let before = self.visibility();
        events.push(Event::AdClicked {
            placement: AdPlacement::Banner(slot),
            title,
            at: now,
        });
        events.extend(self.apply_interaction(InteractionSource::BannerClick, now, rng));
        events.extend(self.visibility_delta(before, now));
        events
    }

    /// Temporarily dismiss a mounted banner slot. Dismissing an already
    /// dismissed slot is a no-op and is not counted as an interaction.
    pub fn dismiss_banner<R: Rng>(
        &mut self,
        slot: BannerSlot,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<Event> {
        let mut events = self.tick(now);
        let before = self.visibility();
        let dismissed = self
            .banners
            .iter_mut()
            .find(|b| b.slot() == slot)
            .and_then(|b| b.dismiss(now));
        let Some(event) = dismissed else {
            return events;
        };
        events.push(event);
        events.extend(self.apply_interaction(InteractionSource::BannerDismiss, now, rng));
        events.extend(self.visibility_delta(before, now));
        events
    }

    /// Start the rewarded watch. No-op unless the offer is eligible, in
    /// `Offer`, and budget remains.
    pub fn start_rewarded<R: Rng>(&mut self, now: DateTime<Utc>, rng: &mut R) -> Vec<Event> {
        let mut events = self.tick(now);
        if !self.visibility().rewarded_eligible {
            return events;
        }
        let before = self.visibility();
        let Some(event) = self.rewarded.start(now, rng) else {
            return events;
        };
        events.push(event);
        events.extend(self.apply_interaction(InteractionSource::RewardedStart, now, rng));
        events.extend(self.visibility_delta(before, now));
        events
    }

    /// Abandon the rewarded watch past the skip threshold.
    pub fn skip_rewarded<R: Rng>(&mut self, now: DateTime<Utc>, rng: &mut R) -> Vec<Event> {
        let mut events = self.tick(now);
        let before = self.visibility();
        let Some(event) = self.rewarded.skip(now) else {
            return events;
        };
        events.push(event);
        events.extend(self.apply_interaction(InteractionSource::RewardedSkip, now, rng));
        events.extend(self.visibility_delta(before, now));
        events
    }

    /// Claim the earned reward.
    pub fn claim_reward<R: Rng>(&mut self, now: DateTime<Utc>, rng: &mut R) -> Vec<Event> {
        let mut events = self.tick(now);
        let before = self.visibility();
        let claimed = self.rewarded.claim(now);
        if claimed.is_empty() {
            return events;
        }
        events.extend(claimed);
        events.extend(self.apply_interaction(InteractionSource::RewardClaim, now, rng));
        events.extend(self.visibility_delta(before, now));
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The single increment path: bump the counter, open the interstitial
    /// if this increment lands on a due count with no gate open, and mount
    /// newly eligible banner slots.
    fn apply_interaction<R: Rng>(
        &mut self,
        source: InteractionSource,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<Event> {
        let count = self.counter.increment();
        let mut events = vec![Event::InteractionRecorded {
            count,
            source,
            at: now,
        }];

        if self.config.policy.interstitial_due(count) && self.interstitial.is_none() {
            let creatives = catalog::interstitial_creatives();
            let creative = creatives[rng.gen_range(0..creatives.len())].clone();
            events.push(Event::InterstitialOpened {
                creative: creative.clone(),
                at: now,
            });
            self.interstitial = Some(InterstitialGate::new(
                creative,
                self.config.interstitial_countdown_secs,
                now,
            ));
        }

        events.extend(self.mount_due_banners(now));
        events
    }

    fn mount_due_banners(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let visibility = self.visibility();
        let mut due = Vec::new();
        if visibility.side_banners {
            due.push(BannerSlot::Left);
            due.push(BannerSlot::Right);
        }
        if visibility.bottom_banner {
            due.push(BannerSlot::Bottom);
        }

        let mut events = Vec::new();
        for slot in due {
            if self.banner(slot).is_some() {
                continue;
            }
            if let Ok(rotator) = BannerRotator::new(
                slot,
                catalog::banner_creatives(),
                self.config.banner_rotation_ms,
                self.config.banner_reshow_secs,
                now,
            ) {
                self.banners.push(rotator);
                events.push(Event::BannerMounted { slot, at: now });
            }
        }
        events
    }

    fn visibility_delta(&self, before: AdVisibility, now: DateTime<Utc>) -> Option<Event> {
        let after = self.visibility();
        (after != before).then_some(Event::VisibilityChanged {
            visibility: after,
            at: now,
        })
    }
}
