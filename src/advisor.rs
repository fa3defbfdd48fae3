//! Personalized betting suggestions derived from player aggregates.
//! Advisory only, like the risk meter.

use crate::types::{
    GameMode,
    PlayerStats,
};
use serde::{
    Deserialize,
    Serialize,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SuggestionKind {
    Warning,
    Strategy,
    Mode,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SuggestedAction {
    ReduceBet,
    AdjustBet,
    SwitchMode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: String,
    pub action: SuggestedAction,
}

/// Game mode with the best odds for a player who is currently behind.
fn recommend_mode(stats: &PlayerStats) -> GameMode {
    if stats.roi() < 100.0 {
        GameMode::HighLow
    } else {
        GameMode::Classic
    }
}

pub fn smart_suggestions(stats: &PlayerStats, current_mode: GameMode) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if stats.win_streak > 5 {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Warning,
            message: "Consider taking a break - hot streaks don't last forever!"
                .to_string(),
            action: SuggestedAction::ReduceBet,
        });
    }

    if stats.total_games > 0 {
        let optimal = stats.average_bet_units();
        suggestions.push(Suggestion {
            kind: SuggestionKind::Strategy,
            message: format!("Optimal bet size based on your history: {optimal:.2} units"),
            action: SuggestedAction::AdjustBet,
        });
    }

    let best_mode = recommend_mode(stats);
    if best_mode != current_mode {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Mode,
            message: format!("Try {best_mode} mode for better odds"),
            action: SuggestedAction::SwitchMode,
        });
    }

    suggestions
}
