use chrono::Utc;
use clap::Subcommand;
use deskdash_core::storage::Database;
use deskdash_core::{Config, InteractionSource};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Print the current session snapshot as JSON
    Status,
    /// Record one tracked interaction
    Interact {
        /// Interaction source (e.g. "view_switch", "banner_click")
        #[arg(long, default_value = "view_switch")]
        source: String,
    },
    /// Discard the persisted session and start fresh
    Reset,
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let now = Utc::now();

    match action {
        SessionAction::Status => {
            let mut dash = super::load_dashboard(&db, &config)?;
            let events = dash.tick(now);
            super::record_ad_events(&db, &dash, &events);
            println!("{}", serde_json::to_string_pretty(&dash.snapshot(now))?);
            super::save_dashboard(&db, &dash)?;
        }
        SessionAction::Interact { source } => {
            let source: InteractionSource = source.parse()?;
            let mut dash = super::load_dashboard(&db, &config)?;
            let mut rng = rand::thread_rng();
            let events = dash.ads_mut().interact(source, now, &mut rng);
            super::record_ad_events(&db, &dash, &events);
            super::print_events(&events)?;
            super::save_dashboard(&db, &dash)?;
        }
        SessionAction::Reset => {
            db.kv_delete(super::DASHBOARD_KEY)?;
            println!("session reset");
        }
    }
    Ok(())
}
