//! # Deskdash Core Library
//!
//! This library provides the core logic for Deskdash, a multi-view personal
//! dashboard that interleaves simulated advertisement placements. It
//! implements a CLI-first philosophy where all operations are available via
//! a standalone CLI binary, with any GUI shell being a thin layer over the
//! same core library.
//!
//! ## Architecture
//!
//! - **Ad Engine**: wall-clock-based state machines (interstitial gate,
//!   rewarded-video flow, banner rotators) coordinated by an interaction
//!   counter; the caller periodically invokes `tick()` for progress updates
//! - **Dashboard**: the serializable session state -- active view, timer,
//!   stopwatch, ad engine
//! - **Views**: clock/timer/stopwatch formatting and the simulated weather
//!   payloads
//! - **Storage**: SQLite ad-event log and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`AdEngine`]: ad scheduling composition root
//! - [`Dashboard`]: one persisted dashboard session
//! - [`Database`]: ad event log and kv persistence
//! - [`Config`]: application configuration management

pub mod ads;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod storage;
pub mod views;

pub use ads::{
    AdEngine, AdEngineConfig, AdPlacement, AdPolicy, AdVisibility, BannerRotator, BannerSlot,
    InteractionCounter, InteractionSource, InterstitialGate, RewardedPhase, RewardedVideoFlow,
};
pub use dashboard::{Dashboard, DashboardView};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use storage::{Config, Database};
