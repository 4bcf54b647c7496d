use chrono::Utc;
use clap::Subcommand;

use deskdash_core::storage::Database;
use deskdash_core::Config;

#[derive(Subcommand)]
pub enum RewardedAction {
    /// Current flow state: phase, progress, budget
    Status,
    /// Start watching (requires eligibility and remaining budget)
    Watch,
    /// Abandon the watch once the skip control is available
    Skip,
    /// Claim the earned reward
    Claim,
}

pub fn run(action: RewardedAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut dash = super::load_dashboard(&db, &config)?;
    let now = Utc::now();
    let mut rng = rand::thread_rng();

    match action {
        RewardedAction::Status => {
            let events = dash.tick(now);
            super::record_ad_events(&db, &dash, &events);
            println!(
                "{}",
                serde_json::to_string_pretty(&dash.ads().rewarded_status())?
            );
        }
        RewardedAction::Watch => {
            let events = dash.ads_mut().start_rewarded(now, &mut rng);
            super::record_ad_events(&db, &dash, &events);
            super::print_events(&events)?;
        }
        RewardedAction::Skip => {
            let events = dash.ads_mut().skip_rewarded(now, &mut rng);
            super::record_ad_events(&db, &dash, &events);
            super::print_events(&events)?;
        }
        RewardedAction::Claim => {
            let events = dash.ads_mut().claim_reward(now, &mut rng);
            super::record_ad_events(&db, &dash, &events);
            super::print_events(&events)?;
        }
    }

    super::save_dashboard(&db, &dash)?;
    Ok(())
}
