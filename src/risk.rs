//! Advisory risk scoring. Pure functions of player aggregates and the
//! in-flight candidate bet; never used to block a bet.

use crate::types::{
    GameMode,
    PlayerStats,
    micro_to_units,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    LowModerate,
    Moderate,
    High,
    VeryHigh,
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLabel::Low => "Low",
            RiskLabel::LowModerate => "Low-Moderate",
            RiskLabel::Moderate => "Moderate",
            RiskLabel::High => "High",
            RiskLabel::VeryHigh => "Very High",
        };
        f.write_str(s)
    }
}

/// Bounded, explainable risk score. Ephemeral; recomputed on every
/// relevant state change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u32,
    pub label: RiskLabel,
    pub factors: Vec<String>,
}

/// Per-bet assessment with the display extras shown next to the meter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetRisk {
    pub assessment: RiskAssessment,
    pub win_probability: f64,
    pub potential_win_units: f64,
    pub potential_loss_units: f64,
}

fn overall_label(score: u32) -> RiskLabel {
    if score < 30 {
        RiskLabel::Low
    } else if score < 70 {
        RiskLabel::Moderate
    } else {
        RiskLabel::High
    }
}

fn bet_label(score: u32) -> RiskLabel {
    if score >= 70 {
        RiskLabel::VeryHigh
    } else if score >= 50 {
        RiskLabel::High
    } else if score >= 30 {
        RiskLabel::Moderate
    } else if score >= 15 {
        RiskLabel::LowModerate
    } else {
        RiskLabel::Low
    }
}

/// Overall performance risk from aggregate player stats.
///
/// Four independently weighted factors (ROI 35, net loss 30, cold streak
/// 20, volume-vs-performance 15) accumulate into a score clamped to
/// [0, 100]. No games played means no assessment (score 0).
pub fn overall_risk(stats: &PlayerStats) -> RiskAssessment {
    if stats.total_games == 0 {
        return RiskAssessment {
            score: 0,
            label: RiskLabel::Low,
            factors: Vec::new(),
        };
    }

    let roi = stats.roi();
    let net_units = stats.net_profit_units();
    let mut score: u32 = 0;
    let mut factors = Vec::new();

    // ROI below 100% means losing money overall.
    if roi < 50.0 {
        score += 35;
        factors.push(format!("Very low ROI ({roi:.1}% - losing >50%)"));
    } else if roi < 70.0 {
        score += 28;
        factors.push(format!("Low ROI ({roi:.1}% - losing 30-50%)"));
    } else if roi < 85.0 {
        score += 20;
        factors.push(format!("Below average ROI ({roi:.1}%)"));
    } else if roi < 95.0 {
        score += 12;
        factors.push(format!("Slight losses (ROI: {roi:.1}%)"));
    } else if roi < 100.0 {
        score += 5;
        factors.push(format!("Near break-even (ROI: {roi:.1}%)"));
    } else {
        factors.push(format!("Profitable! ROI: {roi:.1}%"));
    }

    // Large absolute losses are risky regardless of ROI.
    if net_units < -100.0 {
        score += 30;
        factors.push(format!("Heavy losses ({net_units:.2} units)"));
    } else if net_units < -50.0 {
        score += 25;
        factors.push(format!("Significant losses ({net_units:.2} units)"));
    } else if net_units < -20.0 {
        score += 18;
        factors.push(format!("Moderate losses ({net_units:.2} units)"));
    } else if net_units < -10.0 {
        score += 12;
        factors.push(format!("Small losses ({net_units:.2} units)"));
    } else if net_units < -5.0 {
        score += 8;
        factors.push(format!("Minor losses ({net_units:.2} units)"));
    } else if net_units < 0.0 {
        score += 3;
        factors.push(format!("Tiny losses ({net_units:.2} units)"));
    } else if net_units > 0.0 {
        factors.push(format!("In profit: +{net_units:.2} units"));
    }

    if stats.win_streak == 0 && stats.total_games > 3 {
        score += 20;
        factors.push("Currently on a cold streak (0 win streak)".to_string());
    } else if stats.win_streak == 1 && stats.total_games > 5 {
        score += 8;
        factors.push("Just broke losing streak".to_string());
    } else if stats.win_streak > 3 {
        factors.push(format!("On a hot streak ({} wins)", stats.win_streak));
    }

    // Many games with poor performance; first matching tier wins.
    if stats.total_games > 30 && roi < 80.0 {
        score += 15;
        factors.push(format!(
            "High volume with poor returns ({} games)",
            stats.total_games
        ));
    } else if stats.total_games > 20 && roi < 70.0 {
        score += 12;
        factors.push(format!(
            "Consistent losses over time ({} games)",
            stats.total_games
        ));
    } else if stats.total_games > 10 && roi < 60.0 {
        score += 10;
        factors.push(format!(
            "Losing pattern emerging ({} games)",
            stats.total_games
        ));
    }

    let score = score.min(100);
    RiskAssessment {
        score,
        label: overall_label(score),
        factors,
    }
}

/// Risk of a single candidate bet against the player's history.
///
/// Returns `None` when there is nothing to assess: a zero amount, or a
/// player with no games (no average bet to compare against).
pub fn bet_risk(
    amount_micro: u64,
    mode: GameMode,
    stats: &PlayerStats,
) -> Option<BetRisk> {
    if amount_micro == 0 || stats.total_games == 0 {
        return None;
    }

    let amount_units = micro_to_units(amount_micro);
    let average_units = stats.average_bet_units();
    let win_probability = mode.win_probability();
    let roi = stats.roi();
    let mut score: i64 = 0;
    let mut factors = Vec::new();

    if amount_units > average_units * 3.0 {
        score += 40;
        factors.push("Bet 3x larger than average".to_string());
    } else if amount_units > average_units * 2.0 {
        score += 30;
        factors.push("Bet 2x larger than average".to_string());
    } else if amount_units > average_units * 1.5 {
        score += 20;
        factors.push("Above average bet size".to_string());
    } else if amount_units > average_units {
        score += 10;
        factors.push("Slightly above average".to_string());
    }

    if win_probability < 20.0 {
        score += 30;
        factors.push("Very low win chance (16.7%)".to_string());
    } else if win_probability < 40.0 {
        score += 20;
        factors.push("Moderate win chance (33.3%)".to_string());
    } else if win_probability < 60.0 {
        score += 10;
        factors.push("Good win chance (50%)".to_string());
    }

    if stats.win_streak == 0 && stats.total_games > 3 {
        score += 20;
        factors.push("Currently on a losing streak".to_string());
    } else if stats.win_streak == 1 && stats.total_games > 5 {
        score += 10;
        factors.push("Just broke a losing streak".to_string());
    } else if stats.win_streak > 5 {
        // Hot streak earns a small discount, floored at zero.
        score = (score - 5).max(0);
        factors.push(format!("On {}-win hot streak!", stats.win_streak));
    }

    if roi < 50.0 && stats.total_games > 5 {
        score += 10;
        factors.push("Poor overall performance (losing 50%+)".to_string());
    } else if roi < 80.0 && stats.total_games > 10 {
        score += 5;
        factors.push("Below average performance".to_string());
    }

    let score = score.clamp(0, 100) as u32;
    Some(BetRisk {
        assessment: RiskAssessment {
            score,
            label: bet_label(score),
            factors,
        },
        win_probability,
        potential_win_units: amount_units * mode.payout_multiplier() as f64,
        potential_loss_units: amount_units,
    })
}
