use chrono::Utc;
use clap::Subcommand;

use deskdash_core::storage::Database;
use deskdash_core::Config;

#[derive(Subcommand)]
pub enum InterstitialAction {
    /// Current gate state, or null when hidden
    Status,
    /// Click the open ad's body (tracked, no state change)
    Click,
    /// Close the ad; rejected until the countdown exhausts
    Close,
}

pub fn run(action: InterstitialAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut dash = super::load_dashboard(&db, &config)?;
    let now = Utc::now();
    let mut rng = rand::thread_rng();

    match action {
        InterstitialAction::Status => {
            let events = dash.tick(now);
            super::record_ad_events(&db, &dash, &events);
            println!(
                "{}",
                serde_json::to_string_pretty(&dash.ads().interstitial_status(now))?
            );
        }
        InterstitialAction::Click => {
            let events = dash.ads_mut().click_interstitial(now, &mut rng);
            super::record_ad_events(&db, &dash, &events);
            super::print_events(&events)?;
        }
        InterstitialAction::Close => {
            let events = dash.ads_mut().close_interstitial(now, &mut rng);
            super::record_ad_events(&db, &dash, &events);
            super::print_events(&events)?;
        }
    }

    super::save_dashboard(&db, &dash)?;
    Ok(())
}
