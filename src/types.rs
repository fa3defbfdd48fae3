use crate::error::Error;
use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;

/// Smallest on-chain denomination: 1 display unit = 1,000,000 micro-units.
pub const MICRO_PER_UNIT: u64 = 1_000_000;

/// Bet bounds enforced by the contract (1 to 100 display units).
pub const MIN_BET_MICRO: u64 = 1_000_000;
pub const MAX_BET_MICRO: u64 = 100_000_000;

/// Blocks that must elapse between bet placement and resolution.
pub const CONFIRMATION_BLOCKS: u64 = 2;

/// The contract funds the per-mode jackpot with 1% of every bet.
pub const JACKPOT_CONTRIBUTION_DIVISOR: u64 = 100;

/// Contract error codes surfaced in aborted transaction results.
pub const ERR_INVALID_BET: u32 = 101;
pub const ERR_GAME_NOT_FOUND: u32 = 102;
pub const ERR_ALREADY_RESOLVED: u32 = 103;

pub type Address = String;

/// Identifier of a submitted chain transaction.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TxId(pub String);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn micro_to_units(micro: u64) -> f64 {
    micro as f64 / MICRO_PER_UNIT as f64
}

pub fn units_to_micro(units: f64) -> u64 {
    (units * MICRO_PER_UNIT as f64).floor() as u64
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Classic,
    HighLow,
    Range,
}

impl GameMode {
    pub fn code(self) -> u32 {
        match self {
            GameMode::Classic => 0,
            GameMode::HighLow => 1,
            GameMode::Range => 2,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(GameMode::Classic),
            1 => Some(GameMode::HighLow),
            2 => Some(GameMode::Range),
            _ => None,
        }
    }

    /// Valid bet targets for this mode. Classic picks a face, HighLow picks
    /// low (1) or high (2), Range picks one of three two-face bands.
    pub fn target_range(self) -> std::ops::RangeInclusive<u32> {
        match self {
            GameMode::Classic => 1..=6,
            GameMode::HighLow => 1..=2,
            GameMode::Range => 1..=3,
        }
    }

    /// Win probability in percent.
    pub fn win_probability(self) -> f64 {
        match self {
            GameMode::Classic => 16.67,
            GameMode::HighLow => 50.0,
            GameMode::Range => 33.33,
        }
    }

    /// Payout multiplier applied to the stake on a win.
    pub fn payout_multiplier(self) -> u64 {
        match self {
            GameMode::Classic => 5,
            GameMode::HighLow => 2,
            GameMode::Range => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::HighLow => "High/Low",
            GameMode::Range => "Range",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bet as entered by the player, validated before any chain call is made.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BetRequest {
    pub target: u32,
    pub game_mode: GameMode,
    pub amount_micro: u64,
    pub player: Address,
}

impl BetRequest {
    pub fn validate(&self) -> Result<(), Error> {
        if self.amount_micro < MIN_BET_MICRO || self.amount_micro > MAX_BET_MICRO {
            return Err(Error::Validation {
                reason: format!(
                    "bet amount must be between {} and {} micro-units, got {}",
                    MIN_BET_MICRO, MAX_BET_MICRO, self.amount_micro
                ),
            });
        }
        let range = self.game_mode.target_range();
        if !range.contains(&self.target) {
            return Err(Error::Validation {
                reason: format!(
                    "{} mode requires a target between {} and {}, got {}",
                    self.game_mode,
                    range.start(),
                    range.end(),
                    self.target
                ),
            });
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GameStatus {
    Pending,
    Resolved,
}

/// On-chain game record as normalized by the boundary decoder. Created
/// Pending at bet placement, filled in at resolution.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: u64,
    pub status: GameStatus,
    pub result: Option<u8>,
    pub payout_micro: u64,
    pub bet_amount_micro: u64,
    pub target: u32,
    pub game_mode: GameMode,
}

/// Aggregate per-player counters maintained by the contract. All counters
/// are monotonically non-decreasing except `win_streak`, which resets to
/// zero on a loss.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_games: u64,
    pub total_wagered_micro: u64,
    pub total_won_micro: u64,
    pub win_streak: u64,
    pub max_streak: u64,
    pub vip_tier: u8,
    pub achievements: Vec<u64>,
}

impl PlayerStats {
    /// Return on investment in percent; 0 when nothing has been wagered.
    pub fn roi(&self) -> f64 {
        if self.total_wagered_micro == 0 {
            return 0.0;
        }
        self.total_won_micro as f64 / self.total_wagered_micro as f64 * 100.0
    }

    /// Net profit in display units (negative when losing).
    pub fn net_profit_units(&self) -> f64 {
        let net = self.total_won_micro as i128 - self.total_wagered_micro as i128;
        net as f64 / MICRO_PER_UNIT as f64
    }

    /// Average bet size in display units; 0 when no games were played.
    pub fn average_bet_units(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        micro_to_units(self.total_wagered_micro) / self.total_games as f64
    }

    pub fn vip_tier_name(&self) -> &'static str {
        match self.vip_tier {
            0 => "Bronze",
            1 => "Silver",
            2 => "Gold",
            3 => "Platinum",
            _ => "Diamond",
        }
    }
}

/// Per-mode jackpot pool, funded by a fixed cut of each bet.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct JackpotInfo {
    pub amount_micro: u64,
    pub last_winner: Option<Address>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct HouseStats {
    pub balance_micro: u64,
    pub total_games: u64,
    pub total_volume_micro: u64,
}

/// Final output of a bet lifecycle traversal.
///
/// `is_winner` is always derived from the payout: a payout of exactly zero
/// is a loss regardless of any other field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub game_id: u64,
    pub dice_result: u8,
    pub payout_micro: u64,
    pub bet_amount_micro: u64,
    pub target: u32,
    pub game_mode: GameMode,
    pub is_winner: bool,
    pub timestamp: DateTime<Utc>,
}

impl GameOutcome {
    /// Build an outcome from a settled record. The record must already be
    /// resolved with its result filled in.
    pub fn from_settled(record: &GameRecord) -> Result<Self, Error> {
        if record.status != GameStatus::Resolved {
            return Err(Error::NotFound {
                what: format!("settled record for game {}", record.game_id),
            });
        }
        let dice_result = record.result.ok_or(Error::Extraction)?;
        Ok(GameOutcome {
            game_id: record.game_id,
            dice_result,
            payout_micro: record.payout_micro,
            bet_amount_micro: record.bet_amount_micro,
            target: record.target,
            game_mode: record.game_mode,
            is_winner: record.payout_micro > 0,
            timestamp: Utc::now(),
        })
    }
}
