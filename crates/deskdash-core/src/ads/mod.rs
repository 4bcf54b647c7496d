pub mod catalog;

mod banner;
mod interstitial;
mod rewarded;
mod scheduler;

pub use banner::{BannerRotator, BannerSlot, BannerStatus};
pub use interstitial::{GatePhase, InterstitialGate, InterstitialStatus};
pub use rewarded::{RewardedPhase, RewardedStatus, RewardedVideoFlow};
pub use scheduler::{
    AdEngine, AdEngineConfig, AdPlacement, AdPolicy, AdVisibility, InteractionCounter,
    InteractionSource,
};
