use clap::Subcommand;
use deskdash_core::storage::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's ad delivery stats
    Today,
    /// All-time ad delivery stats
    All,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Today => {
            let stats = db.stats_today()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::All => {
            let stats = db.stats_all()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
