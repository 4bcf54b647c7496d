//! End-to-end tests for the ad scheduling engine driven through a
//! dashboard session, plus property tests for the threshold derivation.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

use deskdash_core::ads::{AdEngineConfig, AdPolicy, BannerSlot, GatePhase, RewardedPhase};
use deskdash_core::{Dashboard, DashboardView, Event};

fn dashboard() -> (Dashboard, Mcg128Xsl64) {
    let mut rng = Mcg128Xsl64::seed_from_u64(1234);
    let dash = Dashboard::new(AdEngineConfig::default(), "cosmic".into(), &mut rng).unwrap();
    (dash, rng)
}

fn switch_n(dash: &mut Dashboard, rng: &mut Mcg128Xsl64, now: DateTime<Utc>, n: u64) {
    for _ in 0..n {
        dash.switch_view(DashboardView::Weather, now, rng);
    }
}

#[test]
fn banner_slots_appear_as_interactions_accumulate() {
    let (mut dash, mut rng) = dashboard();
    let t0 = Utc::now();

    switch_n(&mut dash, &mut rng, t0, 1);
    let vis = dash.ads().visibility();
    assert!(!vis.bottom_banner);
    assert!(!vis.side_banners);

    switch_n(&mut dash, &mut rng, t0, 1);
    assert!(dash.ads().visibility().bottom_banner);
    assert!(!dash.ads().visibility().side_banners);

    switch_n(&mut dash, &mut rng, t0, 1);
    let vis = dash.ads().visibility();
    assert!(vis.bottom_banner && vis.side_banners);
    assert!(!vis.rewarded_eligible);

    switch_n(&mut dash, &mut rng, t0, 3);
    assert!(dash.ads().visibility().rewarded_eligible);
}

#[test]
fn seventh_interaction_opens_interstitial_and_close_is_gated() {
    let (mut dash, mut rng) = dashboard();
    let t0 = Utc::now();

    switch_n(&mut dash, &mut rng, t0, 7);
    let gate = dash.ads().interstitial().expect("gate should be open");
    assert_eq!(gate.phase(), GatePhase::Counting);
    assert_eq!(gate.remaining_secs(t0), 5);

    // Close attempts during the countdown are silent no-ops.
    for secs in 0..5 {
        dash.ads_mut()
            .close_interstitial(t0 + Duration::seconds(secs), &mut rng);
        assert!(dash.ads().visibility().interstitial, "closed at {secs}s");
    }

    let events = dash
        .ads_mut()
        .close_interstitial(t0 + Duration::seconds(5), &mut rng);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::InterstitialClosed { .. })));
    assert!(!dash.ads().visibility().interstitial);
}

#[test]
fn interstitial_latch_spans_a_full_frequency_cycle() {
    let (mut dash, mut rng) = dashboard();
    let t0 = Utc::now();

    switch_n(&mut dash, &mut rng, t0, 7);
    // Keep clicking while the ad is open: counts accumulate, no re-trigger.
    switch_n(&mut dash, &mut rng, t0, 8); // counter now 15, past 14
    assert!(dash.ads().visibility().interstitial);

    dash.ads_mut()
        .close_interstitial(t0 + Duration::seconds(5), &mut rng); // counter 16
    assert!(!dash.ads().visibility().interstitial);

    // Next trigger lands on the next multiple of 7 only.
    switch_n(&mut dash, &mut rng, t0, 4); // 17..=20
    assert!(dash.ads().interstitial().is_none());
    switch_n(&mut dash, &mut rng, t0, 1); // 21
    assert!(dash.ads().interstitial().is_some());
}

#[test]
fn close_landing_on_a_multiple_retriggers_immediately() {
    let (mut dash, mut rng) = dashboard();
    let t0 = Utc::now();

    switch_n(&mut dash, &mut rng, t0, 7);
    switch_n(&mut dash, &mut rng, t0, 6); // counter 13
    let events = dash
        .ads_mut()
        .close_interstitial(t0 + Duration::seconds(5), &mut rng); // close is interaction 14
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::InterstitialOpened { .. })));
    assert!(dash.ads().visibility().interstitial);
}

#[test]
fn rewarded_flow_runs_to_exhaustion() {
    let mut rng = Mcg128Xsl64::seed_from_u64(99);
    let config = AdEngineConfig {
        reward_budget: 2,
        policy: AdPolicy {
            // Keep the interstitial out of the way of this scenario.
            interstitial_frequency: 1000,
            ..AdPolicy::default()
        },
        ..AdEngineConfig::default()
    };
    let mut dash = Dashboard::new(config, "cosmic".into(), &mut rng).unwrap();
    let t0 = Utc::now();

    switch_n(&mut dash, &mut rng, t0, 6);
    assert!(dash.ads().visibility().rewarded_eligible);

    for expected_budget in [1u32, 0u32] {
        let start = t0 + Duration::minutes((2 - expected_budget) as i64);
        let events = dash.ads_mut().start_rewarded(start, &mut rng);
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::RewardedWatchStarted { .. })));

        dash.tick(start + Duration::seconds(30));
        assert_eq!(dash.ads().rewarded().phase(), RewardedPhase::Earned);

        let events = dash
            .ads_mut()
            .claim_reward(start + Duration::seconds(31), &mut rng);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::RewardClaimed { remaining_budget, .. } if *remaining_budget == expected_budget
        )));
    }

    assert!(dash.ads().rewarded().is_exhausted());
    let events = dash
        .ads_mut()
        .start_rewarded(t0 + Duration::minutes(10), &mut rng);
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::RewardedWatchStarted { .. })));
}

#[test]
fn rewarded_skip_midway_costs_nothing() {
    let (mut dash, mut rng) = dashboard();
    let t0 = Utc::now();

    switch_n(&mut dash, &mut rng, t0, 6);
    dash.ads_mut().start_rewarded(t0, &mut rng);

    // Before the skip threshold nothing happens.
    dash.ads_mut()
        .skip_rewarded(t0 + Duration::seconds(10), &mut rng);
    assert_eq!(dash.ads().rewarded().phase(), RewardedPhase::Watching);

    let events = dash
        .ads_mut()
        .skip_rewarded(t0 + Duration::seconds(25), &mut rng);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::RewardedSkipped { .. })));
    assert_eq!(dash.ads().rewarded().phase(), RewardedPhase::Offer);
    assert_eq!(dash.ads().rewarded().budget(), 3);
}

#[test]
fn banner_rotation_and_dismissal_cycle() {
    let (mut dash, mut rng) = dashboard();
    let t0 = Utc::now();

    switch_n(&mut dash, &mut rng, t0, 2);
    let bottom = dash.ads().banner(BannerSlot::Bottom).expect("mounted");
    assert!(bottom.is_visible());
    assert_eq!(bottom.active_index(), 0);

    // A full catalog cycle lands back on the first creative.
    dash.tick(t0 + Duration::milliseconds(6 * 30_000));
    assert_eq!(
        dash.ads().banner(BannerSlot::Bottom).unwrap().active_index(),
        0
    );

    let dismiss_at = t0 + Duration::milliseconds(6 * 30_000);
    dash.ads_mut()
        .dismiss_banner(BannerSlot::Bottom, dismiss_at, &mut rng);
    assert!(!dash.ads().banner(BannerSlot::Bottom).unwrap().is_visible());

    // Dismissal is a tracked interaction.
    assert_eq!(dash.ads().interactions(), 3);

    dash.tick(dismiss_at + Duration::seconds(10));
    assert!(dash.ads().banner(BannerSlot::Bottom).unwrap().is_visible());
}

#[test]
fn banner_click_is_counted_and_attributed() {
    let (mut dash, mut rng) = dashboard();
    let t0 = Utc::now();

    switch_n(&mut dash, &mut rng, t0, 2);
    let events = dash.ads_mut().click_banner(BannerSlot::Bottom, t0, &mut rng);

    assert!(events
        .iter()
        .any(|e| matches!(e, Event::AdClicked { title, .. } if title == "Weather Pro")));
    assert_eq!(dash.ads().interactions(), 3);
}

proptest! {
    #[test]
    fn visibility_thresholds_hold_for_all_counts(c in 0u64..10_000) {
        let policy = AdPolicy::default();
        let vis = policy.visibility(c, false);
        prop_assert_eq!(vis.side_banners, c > 2);
        prop_assert_eq!(vis.bottom_banner, c > 1);
        prop_assert_eq!(vis.rewarded_eligible, c > 5);
        prop_assert!(!vis.interstitial);
    }

    #[test]
    fn visibility_latch_passes_through(c in 0u64..10_000, open in any::<bool>()) {
        let policy = AdPolicy::default();
        prop_assert_eq!(policy.visibility(c, open).interstitial, open);
    }

    #[test]
    fn visibility_is_monotone_in_count(c in 0u64..10_000) {
        let policy = AdPolicy::default();
        let before = policy.visibility(c, false);
        let after = policy.visibility(c + 1, false);
        prop_assert!(!before.side_banners || after.side_banners);
        prop_assert!(!before.bottom_banner || after.bottom_banner);
        prop_assert!(!before.rewarded_eligible || after.rewarded_eligible);
    }
}
