//! Dashboard session state.
//!
//! `Dashboard` composes the current view, the timer/stopwatch machines and
//! the ad engine into one serializable session. The CLI persists a session
//! between invocations and discards it on reset; nothing survives a reset.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ads::{AdEngine, AdEngineConfig, InteractionSource};
use crate::error::ValidationError;
use crate::events::Event;
use crate::views::{themes, CountdownTimer, Stopwatch};

/// The finite set of dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardView {
    Clock,
    Weather,
    Timer,
    Stopwatch,
    WorldClock,
    Focus,
}

impl DashboardView {
    pub fn all() -> [DashboardView; 6] {
        [
            DashboardView::Clock,
            DashboardView::Weather,
            DashboardView::Timer,
            DashboardView::Stopwatch,
            DashboardView::WorldClock,
            DashboardView::Focus,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            DashboardView::Clock => "🕐 Clock",
            DashboardView::Weather => "🌤️ Weather",
            DashboardView::Timer => "⏲️ Timer",
            DashboardView::Stopwatch => "⏱️ Stopwatch",
            DashboardView::WorldClock => "🌍 World",
            DashboardView::Focus => "🎯 Focus",
        }
    }
}

impl std::fmt::Display for DashboardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DashboardView::Clock => "clock",
            DashboardView::Weather => "weather",
            DashboardView::Timer => "timer",
            DashboardView::Stopwatch => "stopwatch",
            DashboardView::WorldClock => "worldclock",
            DashboardView::Focus => "focus",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for DashboardView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clock" => Ok(DashboardView::Clock),
            "weather" => Ok(DashboardView::Weather),
            "timer" => Ok(DashboardView::Timer),
            "stopwatch" => Ok(DashboardView::Stopwatch),
            "worldclock" => Ok(DashboardView::WorldClock),
            "focus" => Ok(DashboardView::Focus),
            other => Err(format!("unknown view: {other}")),
        }
    }
}

/// One dashboard session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    session_id: Uuid,
    view: DashboardView,
    theme: String,
    timer: CountdownTimer,
    stopwatch: Stopwatch,
    ads: AdEngine,
}

impl Dashboard {
    pub fn new<R: Rng>(
        ad_config: AdEngineConfig,
        theme: String,
        rng: &mut R,
    ) -> Result<Self, ValidationError> {
        // Unknown theme ids fall back to the default rather than erroring.
        let theme = themes()
            .into_iter()
            .find(|t| t.id == theme)
            .map(|t| t.id)
            .unwrap_or_else(|| "cosmic".to_string());
        Ok(Self {
            session_id: Uuid::new_v4(),
            view: DashboardView::Clock,
            theme,
            timer: CountdownTimer::default(),
            stopwatch: Stopwatch::new(),
            ads: AdEngine::new(ad_config, rng)?,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn view(&self) -> DashboardView {
        self.view
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn ads(&self) -> &AdEngine {
        &self.ads
    }

    pub fn ads_mut(&mut self) -> &mut AdEngine {
        &mut self.ads
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut CountdownTimer {
        &mut self.timer
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn stopwatch_mut(&mut self) -> &mut Stopwatch {
        &mut self.stopwatch
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            session_id: self.session_id,
            view: self.view,
            theme: self.theme.clone(),
            interactions: self.ads.interactions(),
            visibility: self.ads.visibility(),
            interstitial: self.ads.interstitial_status(now),
            rewarded: self.ads.rewarded_status(),
            banners: self.ads.banner_statuses(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch the active view. Always a tracked interaction, even when the
    /// target equals the current view (the nav control counts regardless).
    pub fn switch_view<R: Rng>(
        &mut self,
        view: DashboardView,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<Event> {
        self.view = view;
        let mut events = vec![Event::ViewChanged { view, at: now }];
        events.extend(self.ads.interact(InteractionSource::ViewSwitch, now, rng));
        events
    }

    /// Advance every machine to `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        self.timer.tick(now);
        self.ads.tick(now)
    }
}
