use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "deskdash", version, about = "Deskdash CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dashboard session control
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// View switching and per-view state
    View {
        #[command(subcommand)]
        action: commands::view::ViewAction,
    },
    /// Banner slot control
    Banner {
        #[command(subcommand)]
        action: commands::banner::BannerAction,
    },
    /// Interstitial ad control
    Interstitial {
        #[command(subcommand)]
        action: commands::interstitial::InterstitialAction,
    },
    /// Rewarded video control
    Rewarded {
        #[command(subcommand)]
        action: commands::rewarded::RewardedAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Ad delivery statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::View { action } => commands::view::run(action),
        Commands::Banner { action } => commands::banner::run(action),
        Commands::Interstitial { action } => commands::interstitial::run(action),
        Commands::Rewarded { action } => commands::rewarded::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
