use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ads::{
    AdPlacement, AdVisibility, BannerSlot, BannerStatus, InteractionSource, InterstitialStatus,
    RewardedStatus,
};
use crate::ads::catalog::{Creative, RewardDescriptor};
use crate::dashboard::DashboardView;

/// Every state change in the system produces an Event.
/// The CLI prints events as JSON; the stats log records the ad-related ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A tracked user action incremented the interaction counter.
    InteractionRecorded {
        count: u64,
        source: InteractionSource,
        at: DateTime<Utc>,
    },
    /// The derived visibility flags changed as a result of an increment
    /// or an interstitial close.
    VisibilityChanged {
        visibility: AdVisibility,
        at: DateTime<Utc>,
    },
    ViewChanged {
        view: DashboardView,
        at: DateTime<Utc>,
    },
    InterstitialOpened {
        creative: Creative,
        at: DateTime<Utc>,
    },
    /// Countdown exhausted; the close control is now enabled.
    InterstitialClosable {
        at: DateTime<Utc>,
    },
    InterstitialClosed {
        at: DateTime<Utc>,
    },
    BannerMounted {
        slot: BannerSlot,
        at: DateTime<Utc>,
    },
    BannerRotated {
        slot: BannerSlot,
        index: usize,
        at: DateTime<Utc>,
    },
    BannerDismissed {
        slot: BannerSlot,
        reshow_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// A dismissed banner slot came back after its re-show delay.
    BannerRestored {
        slot: BannerSlot,
        at: DateTime<Utc>,
    },
    /// Simulated external navigation; terminal, non-retryable.
    AdClicked {
        placement: AdPlacement,
        title: String,
        at: DateTime<Utc>,
    },
    RewardedWatchStarted {
        reward: RewardDescriptor,
        at: DateTime<Utc>,
    },
    RewardEarned {
        reward: RewardDescriptor,
        at: DateTime<Utc>,
    },
    RewardClaimed {
        reward: RewardDescriptor,
        remaining_budget: u32,
        at: DateTime<Utc>,
    },
    /// Watch abandoned past the skip threshold; no reward applied.
    RewardedSkipped {
        progress_pct: f64,
        at: DateTime<Utc>,
    },
    /// Reward budget hit zero; the offer is disabled for the session.
    RewardedExhausted {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        session_id: Uuid,
        view: DashboardView,
        theme: String,
        interactions: u64,
        visibility: AdVisibility,
        interstitial: Option<InterstitialStatus>,
        rewarded: RewardedStatus,
        banners: Vec<BannerStatus>,
        at: DateTime<Utc>,
    },
}
