//! Clock, countdown timer, stopwatch and world-clock utilities.
//!
//! Pure formatting plus two small wall-clock machines. Like the ad machines,
//! neither runs an internal thread: the caller passes `now` explicitly.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Format a timestamp as 24-hour `HH:MM:SS` in the given offset.
pub fn format_clock(now: DateTime<Utc>, offset: FixedOffset) -> String {
    now.with_timezone(&offset).format("%H:%M:%S").to_string()
}

/// Format centiseconds as `MM:SS.CC`.
pub fn format_stopwatch(centiseconds: u64) -> String {
    let minutes = centiseconds / 6000;
    let seconds = (centiseconds % 6000) / 100;
    let cs = centiseconds % 100;
    format!("{minutes:02}:{seconds:02}.{cs:02}")
}

/// Format remaining milliseconds as `MM:SS`.
pub fn format_countdown(remaining_ms: u64) -> String {
    let total_secs = remaining_ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Countdown timer presets offered by the timer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPreset {
    Pomodoro,
    ShortBreak,
    LongBreak,
    DeepWork,
}

impl TimerPreset {
    pub fn minutes(self) -> u64 {
        match self {
            TimerPreset::Pomodoro => 25,
            TimerPreset::ShortBreak => 5,
            TimerPreset::LongBreak => 15,
            TimerPreset::DeepWork => 60,
        }
    }
}

impl std::str::FromStr for TimerPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pomodoro" => Ok(TimerPreset::Pomodoro),
            "short_break" => Ok(TimerPreset::ShortBreak),
            "long_break" => Ok(TimerPreset::LongBreak),
            "deep_work" => Ok(TimerPreset::DeepWork),
            other => Err(format!("unknown timer preset: {other}")),
        }
    }
}

/// Simple countdown timer for the timer and focus views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownTimer {
    remaining_ms: u64,
    running: bool,
    #[serde(default)]
    last_tick: Option<DateTime<Utc>>,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::preset(TimerPreset::Pomodoro)
    }
}

impl CountdownTimer {
    pub fn preset(preset: TimerPreset) -> Self {
        Self {
            remaining_ms: preset.minutes() * 60 * 1000,
            running: false,
            last_tick: None,
        }
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        if !self.running && self.remaining_ms > 0 {
            self.running = true;
            self.last_tick = Some(now);
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.running {
            self.tick(now);
            self.running = false;
            self.last_tick = None;
        }
    }

    pub fn reset(&mut self, preset: TimerPreset) {
        *self = Self::preset(preset);
    }

    /// Flush elapsed wall-clock time. Returns true on the tick that reaches
    /// zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if !self.running {
            return false;
        }
        if let Some(last) = self.last_tick {
            let elapsed = (now - last).num_milliseconds().max(0) as u64;
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick = Some(now);
        }
        if self.remaining_ms == 0 {
            self.running = false;
            self.last_tick = None;
            return true;
        }
        false
    }
}

/// Centisecond-resolution stopwatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stopwatch {
    accumulated_ms: u64,
    running: bool,
    #[serde(default)]
    last_resumed: Option<DateTime<Utc>>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        if !self.running {
            self.running = true;
            self.last_resumed = Some(now);
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        if self.running {
            if let Some(resumed) = self.last_resumed.take() {
                self.accumulated_ms += (now - resumed).num_milliseconds().max(0) as u64;
            }
            self.running = false;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed_centis(&self, now: DateTime<Utc>) -> u64 {
        let live = match (self.running, self.last_resumed) {
            (true, Some(resumed)) => (now - resumed).num_milliseconds().max(0) as u64,
            _ => 0,
        };
        (self.accumulated_ms + live) / 10
    }
}

/// One world-clock row. Offsets are fixed standard-time offsets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldClock {
    pub city: String,
    pub flag: String,
    pub utc_offset_hours: i32,
}

impl WorldClock {
    pub fn local_time(&self, now: DateTime<Utc>) -> String {
        let offset = FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
        now.with_timezone(&offset).format("%H:%M").to_string()
    }
}

/// The built-in world-clock table.
pub fn world_clocks() -> Vec<WorldClock> {
    let row = |city: &str, flag: &str, utc_offset_hours: i32| WorldClock {
        city: city.into(),
        flag: flag.into(),
        utc_offset_hours,
    };
    vec![
        row("New York", "🇺🇸", -5),
        row("London", "🇬🇧", 0),
        row("Tokyo", "🇯🇵", 9),
        row("Sydney", "🇦🇺", 10),
    ]
}

/// A selectable dashboard theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub colors: [String; 2],
}

/// The built-in theme catalog; `cosmic` is the default.
pub fn themes() -> Vec<Theme> {
    let theme = |id: &str, name: &str, a: &str, b: &str| Theme {
        id: id.into(),
        name: name.into(),
        colors: [a.into(), b.into()],
    };
    vec![
        theme("cosmic", "🌌 Cosmic", "#667eea", "#764ba2"),
        theme("neon", "💫 Neon", "#ff006e", "#8338ec"),
        theme("sunset", "🌅 Sunset", "#ff9a9e", "#fecfef"),
        theme("forest", "🌲 Forest", "#134e5e", "#71b280"),
        theme("minimal", "⚫ Minimal", "#2c3e50", "#34495e"),
        theme("matrix", "🔋 Matrix", "#0f3460", "#16213e"),
        theme("cyberpunk", "🤖 Cyberpunk", "#ff006e", "#3a0ca3"),
        theme("aurora", "🌈 Aurora", "#00c9ff", "#92fe9d"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn stopwatch_formatting() {
        assert_eq!(format_stopwatch(0), "00:00.00");
        assert_eq!(format_stopwatch(6123), "01:01.23");
        assert_eq!(format_stopwatch(5999), "00:59.99");
    }

    #[test]
    fn countdown_formatting() {
        assert_eq!(format_countdown(25 * 60 * 1000), "25:00");
        assert_eq!(format_countdown(61_000), "01:01");
        assert_eq!(format_countdown(0), "00:00");
    }

    #[test]
    fn countdown_timer_runs_to_zero() {
        let t0 = Utc::now();
        let mut timer = CountdownTimer::preset(TimerPreset::ShortBreak);
        timer.start(t0);

        assert!(!timer.tick(t0 + Duration::minutes(4)));
        assert!(timer.tick(t0 + Duration::minutes(5)));
        assert_eq!(timer.remaining_ms(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn countdown_timer_pause_freezes_remaining() {
        let t0 = Utc::now();
        let mut timer = CountdownTimer::preset(TimerPreset::Pomodoro);
        timer.start(t0);
        timer.pause(t0 + Duration::minutes(10));

        let frozen = timer.remaining_ms();
        timer.tick(t0 + Duration::minutes(20));
        assert_eq!(timer.remaining_ms(), frozen);
        assert_eq!(frozen, 15 * 60 * 1000);
    }

    #[test]
    fn stopwatch_accumulates_across_pauses() {
        let t0 = Utc::now();
        let mut sw = Stopwatch::new();
        sw.start(t0);
        sw.pause(t0 + Duration::seconds(3));
        sw.start(t0 + Duration::seconds(10));

        assert_eq!(sw.elapsed_centis(t0 + Duration::seconds(12)), 500);
    }

    #[test]
    fn stopwatch_reset_clears_state() {
        let t0 = Utc::now();
        let mut sw = Stopwatch::new();
        sw.start(t0);
        sw.reset();
        assert!(!sw.is_running());
        assert_eq!(sw.elapsed_centis(t0 + Duration::seconds(5)), 0);
    }

    #[test]
    fn world_clock_offsets() {
        let clocks = world_clocks();
        assert_eq!(clocks.len(), 4);
        let noon = DateTime::parse_from_rfc3339("2024-01-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let tokyo = clocks.iter().find(|c| c.city == "Tokyo").unwrap();
        assert_eq!(tokyo.local_time(noon), "21:00");
    }

    #[test]
    fn theme_catalog_has_default() {
        assert!(themes().iter().any(|t| t.id == "cosmic"));
        assert_eq!(themes().len(), 8);
    }
}
