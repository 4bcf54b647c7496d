//! Built-in ad creative and reward catalogs.
//!
//! Catalogs are static, immutable, ordered sequences. Banner slots walk them
//! by rotation index; the interstitial gate and the rewarded flow pick
//! uniformly at random.

use serde::{Deserialize, Serialize};

/// A single ad's display payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creative {
    pub title: String,
    /// Secondary line (tagline or description).
    pub body: String,
    /// Call-to-action label.
    pub cta: String,
    pub icon: String,
    /// CSS background the shell renders behind the creative.
    pub background: String,
}

impl Creative {
    fn new(title: &str, body: &str, cta: &str, icon: &str, background: &str) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            cta: cta.into(),
            icon: icon.into(),
            background: background.into(),
        }
    }
}

/// What a completed rewarded watch unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    PremiumFeatures,
    AdFree,
    Themes,
    Widgets,
}

/// A claimable reward offer paired with its simulated video length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardDescriptor {
    pub kind: RewardKind,
    pub title: String,
    pub description: String,
    pub icon: String,
    /// Simulated video length in seconds; watch progress runs over this.
    pub duration_secs: u64,
}

impl RewardDescriptor {
    fn new(kind: RewardKind, title: &str, description: &str, icon: &str, duration_secs: u64) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            duration_secs,
        }
    }
}

/// The built-in banner creative rotation.
pub fn banner_creatives() -> Vec<Creative> {
    vec![
        Creative::new(
            "Weather Pro",
            "Advanced Forecasts",
            "Upgrade",
            "🌟",
            "linear-gradient(90deg, #667eea 0%, #764ba2 100%)",
        ),
        Creative::new(
            "Food Delivery",
            "Order Now - 20% Off",
            "Order",
            "🍕",
            "linear-gradient(90deg, #f093fb 0%, #f5576c 100%)",
        ),
        Creative::new(
            "Fitness App",
            "Track Your Health",
            "Download",
            "💪",
            "linear-gradient(90deg, #4facfe 0%, #00f2fe 100%)",
        ),
        Creative::new(
            "Shopping Sale",
            "Up to 50% Off",
            "Shop",
            "🛍️",
            "linear-gradient(90deg, #fa709a 0%, #fee140 100%)",
        ),
        Creative::new(
            "Game Zone",
            "Play & Win Prizes",
            "Play",
            "🎮",
            "linear-gradient(90deg, #43e97b 0%, #38f9d7 100%)",
        ),
        Creative::new(
            "Travel Deals",
            "Book Your Trip",
            "Book",
            "✈️",
            "linear-gradient(90deg, #a8edea 0%, #fed6e3 100%)",
        ),
    ]
}

/// The built-in full-screen interstitial creatives.
pub fn interstitial_creatives() -> Vec<Creative> {
    vec![
        Creative::new(
            "Premium Weather Pro",
            "Get advanced weather features with no ads!",
            "Upgrade Now",
            "🌟",
            "linear-gradient(135deg, #667eea 0%, #764ba2 100%)",
        ),
        Creative::new(
            "Local Restaurant Deals",
            "Save 20% on your next meal delivery",
            "Order Now",
            "🍕",
            "linear-gradient(135deg, #f093fb 0%, #f5576c 100%)",
        ),
        Creative::new(
            "Download Fitness Tracker",
            "Track your workouts and stay healthy",
            "Install Free",
            "💪",
            "linear-gradient(135deg, #4facfe 0%, #00f2fe 100%)",
        ),
        Creative::new(
            "Play Puzzle Master",
            "Challenge your brain with fun puzzles",
            "Play Now",
            "🧩",
            "linear-gradient(135deg, #43e97b 0%, #38f9d7 100%)",
        ),
        Creative::new(
            "Flash Sale - 50% Off",
            "Limited time offer on electronics",
            "Shop Now",
            "🛍️",
            "linear-gradient(135deg, #fa709a 0%, #fee140 100%)",
        ),
    ]
}

/// The built-in rewarded-video offers.
pub fn reward_catalog() -> Vec<RewardDescriptor> {
    vec![
        RewardDescriptor::new(
            RewardKind::PremiumFeatures,
            "Premium Features",
            "Unlock advanced weather radar for 24 hours",
            "🌟",
            30,
        ),
        RewardDescriptor::new(
            RewardKind::AdFree,
            "Ad-Free Experience",
            "Remove banner ads for 1 hour",
            "🚫",
            30,
        ),
        RewardDescriptor::new(
            RewardKind::Themes,
            "Exclusive Themes",
            "Unlock 3 premium weather themes",
            "🎨",
            30,
        ),
        RewardDescriptor::new(
            RewardKind::Widgets,
            "Weather Widgets",
            "Add custom weather widgets",
            "📱",
            30,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalogs_are_non_empty() {
        assert_eq!(banner_creatives().len(), 6);
        assert_eq!(interstitial_creatives().len(), 5);
        assert_eq!(reward_catalog().len(), 4);
    }

    #[test]
    fn reward_durations_are_positive() {
        assert!(reward_catalog().iter().all(|r| r.duration_secs > 0));
    }
}
