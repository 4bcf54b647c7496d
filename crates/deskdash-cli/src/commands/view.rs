use chrono::{Offset, Utc};
use clap::Subcommand;
use serde_json::json;

use deskdash_core::storage::Database;
use deskdash_core::views::{
    format_clock, format_countdown, format_stopwatch, world_clocks, Location, TimerPreset,
    WeatherReport,
};
use deskdash_core::{Config, DashboardView};

#[derive(Subcommand)]
pub enum ViewAction {
    /// Switch the active view (counts as a tracked interaction)
    Switch {
        /// Target view: clock, weather, timer, stopwatch, worldclock, focus
        view: String,
    },
    /// Render the active view as JSON
    Show,
    /// List the available views
    List,
    /// Countdown timer control (timer and focus views)
    Timer {
        #[command(subcommand)]
        action: TimerAction,
    },
    /// Stopwatch control
    Stopwatch {
        #[command(subcommand)]
        action: StopwatchAction,
    },
}

#[derive(Subcommand)]
pub enum TimerAction {
    Start,
    Pause,
    /// Reset to a preset: pomodoro, short_break, long_break, deep_work
    Reset {
        #[arg(long, default_value = "pomodoro")]
        preset: String,
    },
    Status,
}

#[derive(Subcommand)]
pub enum StopwatchAction {
    Start,
    Pause,
    Reset,
    Status,
}

pub fn run(action: ViewAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut dash = super::load_dashboard(&db, &config)?;
    let now = Utc::now();

    match action {
        ViewAction::Switch { view } => {
            let view: DashboardView = view.parse()?;
            let mut rng = rand::thread_rng();
            let events = dash.switch_view(view, now, &mut rng);
            super::record_ad_events(&db, &dash, &events);
            super::print_events(&events)?;
        }
        ViewAction::Show => {
            dash.tick(now);
            let rendered = match dash.view() {
                DashboardView::Clock => json!({
                    "time": format_clock(now, Utc.fix()),
                    "date": now.format("%A, %B %-d, %Y").to_string(),
                    "weather_summary": "☀️ 22°C • Partly Cloudy",
                    "theme": dash.theme(),
                }),
                DashboardView::Weather => {
                    let report = WeatherReport::simulated(location(&config));
                    serde_json::to_value(&report)?
                }
                DashboardView::Timer | DashboardView::Focus => json!({
                    "remaining": format_countdown(dash.timer().remaining_ms()),
                    "running": dash.timer().is_running(),
                }),
                DashboardView::Stopwatch => json!({
                    "elapsed": format_stopwatch(dash.stopwatch().elapsed_centis(now)),
                    "running": dash.stopwatch().is_running(),
                }),
                DashboardView::WorldClock => {
                    let rows: Vec<_> = world_clocks()
                        .iter()
                        .map(|c| {
                            json!({
                                "city": c.city,
                                "flag": c.flag,
                                "time": c.local_time(now),
                            })
                        })
                        .collect();
                    json!({ "clocks": rows })
                }
            };
            println!("{}", serde_json::to_string_pretty(&rendered)?);
        }
        ViewAction::List => {
            let rows: Vec<_> = DashboardView::all()
                .iter()
                .map(|v| json!({ "id": v.to_string(), "label": v.label() }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        ViewAction::Timer { action } => {
            match action {
                TimerAction::Start => dash.timer_mut().start(now),
                TimerAction::Pause => dash.timer_mut().pause(now),
                TimerAction::Reset { preset } => {
                    let preset: TimerPreset = preset.parse()?;
                    dash.timer_mut().reset(preset);
                }
                TimerAction::Status => {
                    dash.timer_mut().tick(now);
                }
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "remaining": format_countdown(dash.timer().remaining_ms()),
                    "running": dash.timer().is_running(),
                }))?
            );
        }
        ViewAction::Stopwatch { action } => {
            match action {
                StopwatchAction::Start => dash.stopwatch_mut().start(now),
                StopwatchAction::Pause => dash.stopwatch_mut().pause(now),
                StopwatchAction::Reset => dash.stopwatch_mut().reset(),
                StopwatchAction::Status => {}
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "elapsed": format_stopwatch(dash.stopwatch().elapsed_centis(now)),
                    "running": dash.stopwatch().is_running(),
                }))?
            );
        }
    }

    super::save_dashboard(&db, &dash)?;
    Ok(())
}

/// Environment-provided location would land here; fall back to config.
fn location(config: &Config) -> Location {
    config.fallback_location()
}
