#![allow(non_snake_case)]
use dice_client::{
    GameMode,
    PlayerStats,
    risk::{
        self,
        RiskLabel,
    },
    types::units_to_micro,
};
use proptest::prelude::*;

fn stats(
    games: u64,
    wagered_units: u64,
    won_units: u64,
    win_streak: u64,
) -> PlayerStats {
    PlayerStats {
        total_games: games,
        total_wagered_micro: units_to_micro(wagered_units as f64),
        total_won_micro: units_to_micro(won_units as f64),
        win_streak,
        max_streak: win_streak,
        vip_tier: 0,
        achievements: Vec::new(),
    }
}

#[test]
fn overall_risk__no_history_scores_zero_with_no_factors() {
    let assessment = risk::overall_risk(&PlayerStats::default());

    assert_eq!(assessment.score, 0);
    assert_eq!(assessment.label, RiskLabel::Low);
    assert!(assessment.factors.is_empty());
}

#[test]
fn overall_risk__heavy_sustained_losses_max_out_the_score() {
    // given
    // 35 games, 200 units wagered, 50 back: every factor fires at its
    // top weight (35 + 30 + 20 + 15 clamps to 100)
    let stats = stats(35, 200, 50, 0);

    // when
    let assessment = risk::overall_risk(&stats);

    // then
    assert_eq!(assessment.score, 100);
    assert_eq!(assessment.label, RiskLabel::High);
    assert_eq!(assessment.factors.len(), 4);
}

#[test]
fn overall_risk__profitable_player_scores_low() {
    // 150 units back on 100 wagered
    let stats = stats(10, 100, 150, 3);

    let assessment = risk::overall_risk(&stats);

    assert_eq!(assessment.score, 0);
    assert_eq!(assessment.label, RiskLabel::Low);
    // still explains itself
    assert!(assessment.factors.iter().any(|f| f.contains("Profitable")));
}

#[test]
fn overall_risk__near_break_even_player_scores_low() {
    // 96 back on 100: only the near-break-even ROI factor fires
    let stats = stats(10, 100, 96, 2);

    let assessment = risk::overall_risk(&stats);

    assert_eq!(assessment.score, 5 + 3);
    assert_eq!(assessment.label, RiskLabel::Low);
}

#[test]
fn overall_risk__cold_streak_needs_some_history_to_count() {
    // three games is not enough for the cold-streak factor
    let few = risk::overall_risk(&stats(3, 10, 9, 0));
    let many = risk::overall_risk(&stats(10, 10, 9, 0));

    assert!(many.score > few.score);
    assert!(many.factors.iter().any(|f| f.contains("cold streak")));
}

#[test]
fn bet_risk__oversized_longshot_for_a_struggling_player_scores_high() {
    // given
    // average bet is 2 units; a 5 unit Classic bet is >2x average and a
    // ~17% shot
    let stats = stats(5, 10, 10, 2);

    // when
    let bet = risk::bet_risk(units_to_micro(5.0), GameMode::Classic, &stats).unwrap();

    // then
    assert_eq!(bet.assessment.score, 30 + 30);
    assert_eq!(bet.assessment.label, RiskLabel::High);
    assert!(
        bet.assessment
            .factors
            .contains(&"Very low win chance (16.7%)".to_string())
    );
    assert!((bet.win_probability - 16.67).abs() < f64::EPSILON);
    assert_eq!(bet.potential_win_units, 25.0);
    assert_eq!(bet.potential_loss_units, 5.0);
}

#[test]
fn bet_risk__nothing_to_assess_without_history_or_amount() {
    let fresh = PlayerStats::default();

    assert!(risk::bet_risk(units_to_micro(5.0), GameMode::Classic, &fresh).is_none());
    assert!(risk::bet_risk(0, GameMode::Classic, &stats(5, 10, 10, 2)).is_none());
}

#[test]
fn bet_risk__hot_streak_discounts_the_score() {
    // given
    // a modest HighLow bet (no size factor, +10 for the coin-flip odds)
    // on a 6-win streak
    let stats = stats(10, 100, 120, 6);

    // when
    let bet = risk::bet_risk(units_to_micro(5.0), GameMode::HighLow, &stats).unwrap();

    // then
    assert_eq!(bet.assessment.score, 10 - 5);
    assert_eq!(bet.assessment.label, RiskLabel::Low);
    assert!(
        bet.assessment
            .factors
            .iter()
            .any(|f| f.contains("6-win hot streak"))
    );
}

#[test]
fn bet_risk__labels_follow_the_score_bands() {
    let base = stats(5, 10, 10, 2);

    // avg 2 units: 1 unit on HighLow scores 10 (Low), 7 units on
    // Classic's long odds scores 40 + 30 (Very High)
    let low = risk::bet_risk(units_to_micro(1.0), GameMode::HighLow, &base).unwrap();
    let moderate = risk::bet_risk(units_to_micro(1.0), GameMode::Range, &base).unwrap();
    let very_high = risk::bet_risk(units_to_micro(7.0), GameMode::Classic, &base).unwrap();

    assert_eq!(low.assessment.label, RiskLabel::Low);
    // the factor texts quote the odds the way the meter displays them
    assert!(
        low.assessment
            .factors
            .contains(&"Good win chance (50%)".to_string())
    );
    assert!(
        moderate
            .assessment
            .factors
            .contains(&"Moderate win chance (33.3%)".to_string())
    );
    assert_eq!(very_high.assessment.score, 70);
    assert_eq!(very_high.assessment.label, RiskLabel::VeryHigh);
}

proptest! {
    #[test]
    fn overall_risk__score_is_always_clamped(
        games in 0u64..1000,
        wagered in 0u64..10_000,
        won in 0u64..10_000,
        streak in 0u64..20,
    ) {
        let assessment = risk::overall_risk(&stats(games, wagered, won, streak));
        prop_assert!(assessment.score <= 100);
    }

    #[test]
    fn bet_risk__raising_the_stake_never_lowers_the_score(
        amount in 1u64..200,
        streak in 0u64..20,
    ) {
        // fixed history; a strictly larger bet must not look safer
        let history = stats(10, 50, 40, streak);
        let smaller = risk::bet_risk(
            units_to_micro(amount as f64),
            GameMode::Classic,
            &history,
        ).unwrap();
        let larger = risk::bet_risk(
            units_to_micro((amount + 1) as f64),
            GameMode::Classic,
            &history,
        ).unwrap();
        prop_assert!(larger.assessment.score >= smaller.assessment.score);
    }
}
