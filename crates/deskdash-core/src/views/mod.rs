pub mod clock;
pub mod weather;

pub use clock::{
    format_clock, format_countdown, format_stopwatch, themes, world_clocks, CountdownTimer,
    Stopwatch, Theme, TimerPreset, WorldClock,
};
pub use weather::{Location, WeatherReport};
