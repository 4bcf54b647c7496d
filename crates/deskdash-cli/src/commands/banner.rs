use chrono::Utc;
use clap::Subcommand;

use deskdash_core::storage::Database;
use deskdash_core::{BannerSlot, Config};

#[derive(Subcommand)]
pub enum BannerAction {
    /// Mounted banner slots and their active creatives
    Status,
    /// Click the active creative in a slot: left, right, bottom
    Click { slot: String },
    /// Temporarily dismiss a slot (auto re-shows after the configured delay)
    Dismiss { slot: String },
}

pub fn run(action: BannerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut dash = super::load_dashboard(&db, &config)?;
    let now = Utc::now();
    let mut rng = rand::thread_rng();

    match action {
        BannerAction::Status => {
            let events = dash.tick(now);
            super::record_ad_events(&db, &dash, &events);
            println!(
                "{}",
                serde_json::to_string_pretty(&dash.ads().banner_statuses())?
            );
        }
        BannerAction::Click { slot } => {
            let slot: BannerSlot = slot.parse()?;
            let events = dash.ads_mut().click_banner(slot, now, &mut rng);
            super::record_ad_events(&db, &dash, &events);
            super::print_events(&events)?;
        }
        BannerAction::Dismiss { slot } => {
            let slot: BannerSlot = slot.parse()?;
            let events = dash.ads_mut().dismiss_banner(slot, now, &mut rng);
            super::record_ad_events(&db, &dash, &events);
            super::print_events(&events)?;
        }
    }

    super::save_dashboard(&db, &dash)?;
    Ok(())
}
