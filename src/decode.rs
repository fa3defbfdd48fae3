//! Typed decoder at the chain-client boundary.
//!
//! The chain API wraps every value in nested `{type, value}` envelopes and
//! encodes results as reprs like `(ok u7)`. Everything is normalized here,
//! once; wrapped values never leak past this module.

use crate::{
    chain::{
        TransactionRecord,
        TransactionStatus,
    },
    error::ChainError,
    types::{
        ERR_ALREADY_RESOLVED,
        ERR_GAME_NOT_FOUND,
        ERR_INVALID_BET,
        GameMode,
        GameRecord,
        GameStatus,
        JackpotInfo,
        PlayerStats,
    },
};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct TransactionDto {
    tx_status: String,
    tx_result: Option<TxResultDto>,
}

#[derive(Debug, Deserialize)]
struct TxResultDto {
    repr: Option<String>,
}

/// Normalize a raw transaction payload from the chain REST API.
pub fn decode_transaction(payload: &Value) -> Result<TransactionRecord, ChainError> {
    let dto: TransactionDto = serde_json::from_value(payload.clone())
        .map_err(|e| ChainError::Decode(format!("transaction payload: {e}")))?;
    let repr = dto.tx_result.and_then(|r| r.repr);
    let record = match dto.tx_status.as_str() {
        "success" => TransactionRecord {
            status: TransactionStatus::Success,
            result: repr,
            detail: None,
        },
        status if status.starts_with("abort") => TransactionRecord {
            status: TransactionStatus::Aborted,
            result: repr.clone(),
            detail: Some(format!(
                "{status} - {}",
                repr.as_deref().unwrap_or("unknown error")
            )),
        },
        _ => TransactionRecord {
            status: TransactionStatus::Pending,
            result: repr,
            detail: None,
        },
    };
    Ok(record)
}

/// Extract the game id from a bet placement result repr of the form
/// `(ok u<digits>)`.
pub fn extract_game_id(repr: &str) -> Option<u64> {
    let rest = repr.trim().strip_prefix("(ok u")?;
    let digits: &str = &rest[..rest.find(')')?];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Extract the contract error code from an abort detail or result repr
/// containing `(err u<digits>)`.
pub fn extract_error_code(repr: &str) -> Option<u32> {
    let (_, rest) = repr.split_once("(err u")?;
    let digits = &rest[..rest.find(')')?];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Human-readable description of a contract error code.
pub fn contract_error_detail(code: u32) -> Option<&'static str> {
    match code {
        ERR_INVALID_BET => Some("invalid bet parameters"),
        ERR_GAME_NOT_FOUND => Some("game not found"),
        ERR_ALREADY_RESOLVED => Some("game already resolved"),
        _ => None,
    }
}

/// Strip nested `{type, value}` envelopes down to the innermost value.
fn unwrap_value(value: &Value) -> &Value {
    let mut current = value;
    while let Some(inner) = current.as_object().and_then(|o| o.get("value")) {
        current = inner;
    }
    current
}

fn tuple_field<'a>(tuple: &'a Value, key: &str) -> Result<&'a Value, ChainError> {
    unwrap_value(tuple)
        .get(key)
        .ok_or_else(|| ChainError::Decode(format!("missing field `{key}`")))
}

fn decode_u64(value: &Value) -> Result<u64, ChainError> {
    let inner = unwrap_value(value);
    match inner {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ChainError::Decode(format!("not an unsigned integer: {n}"))),
        Value::String(s) => s
            .parse()
            .map_err(|_| ChainError::Decode(format!("not an unsigned integer: {s}"))),
        other => Err(ChainError::Decode(format!("unexpected value: {other}"))),
    }
}

fn decode_u64_field(tuple: &Value, key: &str) -> Result<u64, ChainError> {
    decode_u64(tuple_field(tuple, key)?)
}

fn decode_optional_u64_field(
    tuple: &Value,
    key: &str,
) -> Result<Option<u64>, ChainError> {
    let field = tuple_field(tuple, key)?;
    if unwrap_value(field).is_null() {
        return Ok(None);
    }
    decode_u64(field).map(Some)
}

/// Decode a `get-game` read into a normalized [`GameRecord`].
pub fn decode_game(game_id: u64, payload: &Value) -> Result<GameRecord, ChainError> {
    let status = match decode_u64_field(payload, "status")? {
        0 => GameStatus::Pending,
        1 => GameStatus::Resolved,
        other => {
            return Err(ChainError::Decode(format!("unknown game status {other}")));
        }
    };
    let mode_code = decode_u64_field(payload, "game-mode")? as u32;
    let game_mode = GameMode::from_code(mode_code)
        .ok_or_else(|| ChainError::Decode(format!("unknown game mode {mode_code}")))?;
    Ok(GameRecord {
        game_id,
        status,
        result: decode_optional_u64_field(payload, "result")?.map(|v| v as u8),
        payout_micro: decode_u64_field(payload, "payout")?,
        bet_amount_micro: decode_u64_field(payload, "bet-amount")?,
        target: decode_u64_field(payload, "target")? as u32,
        game_mode,
    })
}

/// Decode a `get-player-stats` read into normalized [`PlayerStats`].
pub fn decode_player_stats(payload: &Value) -> Result<PlayerStats, ChainError> {
    let achievements = match unwrap_value(tuple_field(payload, "achievements")?) {
        Value::Array(entries) => entries
            .iter()
            .map(decode_u64)
            .collect::<Result<Vec<_>, _>>()?,
        Value::Null => Vec::new(),
        other => {
            return Err(ChainError::Decode(format!("achievements not a list: {other}")));
        }
    };
    Ok(PlayerStats {
        total_games: decode_u64_field(payload, "total-games")?,
        total_wagered_micro: decode_u64_field(payload, "total-wagered")?,
        total_won_micro: decode_u64_field(payload, "total-won")?,
        win_streak: decode_u64_field(payload, "win-streak")?,
        max_streak: decode_u64_field(payload, "max-streak")?,
        vip_tier: decode_u64_field(payload, "vip-tier")? as u8,
        achievements,
    })
}

/// Decode a `get-jackpot` read into normalized [`JackpotInfo`].
pub fn decode_jackpot(payload: &Value) -> Result<JackpotInfo, ChainError> {
    let winner_field = tuple_field(payload, "last-winner")?;
    let last_winner = match unwrap_value(winner_field) {
        Value::Null => None,
        Value::String(addr) => Some(addr.clone()),
        other => {
            return Err(ChainError::Decode(format!("last-winner not an address: {other}")));
        }
    };
    Ok(JackpotInfo {
        amount_micro: decode_u64_field(payload, "amount")?,
        last_winner,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_game_id__parses_ok_uint_repr() {
        assert_eq!(extract_game_id("(ok u7)"), Some(7));
        assert_eq!(extract_game_id(" (ok u123456) "), Some(123456));
    }

    #[test]
    fn extract_game_id__rejects_malformed_reprs() {
        assert_eq!(extract_game_id("(ok true)"), None);
        assert_eq!(extract_game_id("(err u101)"), None);
        assert_eq!(extract_game_id("(ok u)"), None);
        assert_eq!(extract_game_id("(ok u12"), None);
    }

    #[test]
    fn extract_error_code__reads_code_out_of_abort_detail() {
        assert_eq!(extract_error_code("abort_by_response - (err u103)"), Some(103));
        assert_eq!(extract_error_code("(err u101)"), Some(101));
        assert_eq!(extract_error_code("(ok u7)"), None);
    }

    #[test]
    fn decode_game__unwraps_nested_value_envelopes() {
        let payload = json!({
            "type": "(tuple ...)",
            "value": {
                "status": { "type": "uint", "value": "1" },
                "result": { "type": "(optional uint)", "value": { "type": "uint", "value": "4" } },
                "payout": { "type": "uint", "value": "10000000" },
                "bet-amount": { "type": "uint", "value": "5000000" },
                "target": { "type": "uint", "value": "4" },
                "game-mode": { "type": "uint", "value": "0" },
            },
        });
        let record = decode_game(3, &payload).unwrap();
        assert_eq!(record.status, GameStatus::Resolved);
        assert_eq!(record.result, Some(4));
        assert_eq!(record.payout_micro, 10_000_000);
        assert_eq!(record.game_mode, GameMode::Classic);
    }

    #[test]
    fn decode_transaction__maps_abort_status_with_detail() {
        let payload = json!({
            "tx_status": "abort_by_response",
            "tx_result": { "repr": "(err u103)" },
        });
        let record = decode_transaction(&payload).unwrap();
        assert_eq!(record.status, TransactionStatus::Aborted);
        assert_eq!(
            record.detail.as_deref(),
            Some("abort_by_response - (err u103)")
        );
    }

    #[test]
    fn decode_transaction__unknown_status_stays_pending() {
        let payload = json!({ "tx_status": "in_mempool" });
        let record = decode_transaction(&payload).unwrap();
        assert_eq!(record.status, TransactionStatus::Pending);
    }
}
