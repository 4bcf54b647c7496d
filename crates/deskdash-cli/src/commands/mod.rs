pub mod banner;
pub mod config;
pub mod interstitial;
pub mod rewarded;
pub mod session;
pub mod stats;
pub mod view;

use deskdash_core::storage::{AdEventKind, Database};
use deskdash_core::{Config, Dashboard, Event};

pub(crate) const DASHBOARD_KEY: &str = "dashboard";

/// Load the persisted dashboard session, or start a fresh one from config.
pub(crate) fn load_dashboard(
    db: &Database,
    config: &Config,
) -> Result<Dashboard, Box<dyn std::error::Error>> {
    if let Ok(Some(json)) = db.kv_get(DASHBOARD_KEY) {
        if let Ok(dash) = serde_json::from_str::<Dashboard>(&json) {
            return Ok(dash);
        }
    }
    let mut rng = rand::thread_rng();
    let dash = Dashboard::new(config.ad_engine_config(), config.ui.theme.clone(), &mut rng)?;
    Ok(dash)
}

pub(crate) fn save_dashboard(
    db: &Database,
    dash: &Dashboard,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(dash)?;
    db.kv_set(DASHBOARD_KEY, &json)?;
    Ok(())
}

/// Print events as pretty JSON, one document per event.
pub(crate) fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}

/// Mirror the ad-related events into the delivery log for `stats`.
pub(crate) fn record_ad_events(db: &Database, dash: &Dashboard, events: &[Event]) {
    let session = dash.session_id();
    for event in events {
        let recorded = match event {
            Event::InterstitialOpened { creative, at } => Some(db.record_ad_event(
                session,
                "interstitial",
                AdEventKind::Impression,
                &creative.title,
                *at,
            )),
            Event::BannerMounted { slot, at } => Some(db.record_ad_event(
                session,
                &format!("banner:{slot}"),
                AdEventKind::Impression,
                "",
                *at,
            )),
            Event::RewardedWatchStarted { reward, at } => Some(db.record_ad_event(
                session,
                "rewarded",
                AdEventKind::Impression,
                &reward.title,
                *at,
            )),
            Event::AdClicked {
                placement,
                title,
                at,
            } => Some(db.record_ad_event(
                session,
                &placement.to_string(),
                AdEventKind::Click,
                title,
                *at,
            )),
            Event::RewardClaimed { reward, at, .. } => Some(db.record_ad_event(
                session,
                "rewarded",
                AdEventKind::Claim,
                &reward.title,
                *at,
            )),
            Event::BannerDismissed { slot, at, .. } => Some(db.record_ad_event(
                session,
                &format!("banner:{slot}"),
                AdEventKind::Dismiss,
                "",
                *at,
            )),
            _ => None,
        };
        if let Some(Err(e)) = recorded {
            eprintln!("warning: failed to record ad event: {e}");
        }
    }
}
