//! In-process simulation of the dice contract's public interface, used by
//! the demo binary and the contract-interface tests.
//!
//! Behavior follows what the contract's own test suite pins down: bet
//! validation (error 101), sequential game ids from 1, 1% jackpot
//! contribution per mode, player stat accumulation with win-streak
//! tracking, VIP tier upgrades by wagered volume, and resolution errors
//! 102/103. Like a simnet, calls apply their effects immediately; one
//! block is minted per poll to stand in for real block production.

use crate::{
    chain::{
        ChainClient,
        Submission,
        TransactionRecord,
        TransactionStatus,
    },
    error::ChainError,
    types::{
        Address,
        BetRequest,
        ERR_ALREADY_RESOLVED,
        ERR_GAME_NOT_FOUND,
        ERR_INVALID_BET,
        GameMode,
        GameRecord,
        GameStatus,
        HouseStats,
        JACKPOT_CONTRIBUTION_DIVISOR,
        JackpotInfo,
        MICRO_PER_UNIT,
        PlayerStats,
        TxId,
    },
};
use rand::{
    Rng,
    SeedableRng,
    rngs::StdRng,
};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
    },
};

struct StoredTx {
    result: String,
    aborted: bool,
    polls_remaining: u32,
}

struct Inner {
    next_game_id: u64,
    next_tx: u64,
    height: u64,
    games: HashMap<u64, GameRecord>,
    game_players: HashMap<u64, Address>,
    players: HashMap<Address, PlayerStats>,
    jackpots: HashMap<GameMode, JackpotInfo>,
    house: HouseStats,
    transactions: HashMap<String, StoredTx>,
    rng: StdRng,
    forced_roll: Option<u8>,
    confirm_after: u32,
}

#[derive(Clone)]
pub struct LocalChain {
    inner: Arc<Mutex<Inner>>,
}

impl LocalChain {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_game_id: 1,
                next_tx: 1,
                height: 1,
                games: HashMap::new(),
                game_players: HashMap::new(),
                players: HashMap::new(),
                jackpots: HashMap::new(),
                house: HouseStats::default(),
                transactions: HashMap::new(),
                rng,
                forced_roll: None,
                confirm_after: 1,
            })),
        }
    }

    /// Pin the next dice rolls to a fixed face, for deterministic tests.
    pub fn force_roll(&self, face: u8) {
        self.inner.lock().unwrap().forced_roll = Some(face);
    }

    /// Number of polls a transaction stays pending before confirming.
    pub fn set_confirmation_latency(&self, polls: u32) {
        self.inner.lock().unwrap().confirm_after = polls;
    }
}

impl Default for LocalChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn record_tx(&mut self, result: String, aborted: bool) -> TxId {
        let id = format!("0xlocal{:08x}", self.next_tx);
        self.next_tx += 1;
        self.transactions.insert(
            id.clone(),
            StoredTx {
                result,
                aborted,
                polls_remaining: self.confirm_after,
            },
        );
        TxId(id)
    }

    fn abort_tx(&mut self, code: u32) -> TxId {
        self.record_tx(format!("(err u{code})"), true)
    }

    fn vip_tier_for(wagered_micro: u64) -> u8 {
        let units = wagered_micro / MICRO_PER_UNIT;
        match units {
            u if u >= 10_000 => 4,
            u if u >= 2_500 => 3,
            u if u >= 500 => 2,
            u if u >= 100 => 1,
            _ => 0,
        }
    }

    fn roll_die(&mut self) -> u8 {
        match self.forced_roll {
            Some(face) => face,
            None => self.rng.random_range(1..=6),
        }
    }
}

fn is_win(mode: GameMode, target: u32, result: u8) -> bool {
    match mode {
        GameMode::Classic => u32::from(result) == target,
        GameMode::HighLow => match target {
            1 => result <= 3,
            _ => result >= 4,
        },
        GameMode::Range => match target {
            1 => (1..=2).contains(&result),
            2 => (3..=4).contains(&result),
            _ => (5..=6).contains(&result),
        },
    }
}

impl ChainClient for LocalChain {
    async fn submit_bet(&self, request: &BetRequest) -> Result<Submission, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        if request.validate().is_err() {
            let tx = inner.abort_tx(ERR_INVALID_BET);
            return Ok(Submission::Submitted(tx));
        }

        let game_id = inner.next_game_id;
        inner.next_game_id += 1;
        inner.games.insert(
            game_id,
            GameRecord {
                game_id,
                status: GameStatus::Pending,
                result: None,
                payout_micro: 0,
                bet_amount_micro: request.amount_micro,
                target: request.target,
                game_mode: request.game_mode,
            },
        );

        inner.game_players.insert(game_id, request.player.clone());
        let stats = inner.players.entry(request.player.clone()).or_default();
        stats.total_games += 1;
        stats.total_wagered_micro += request.amount_micro;
        stats.vip_tier = Inner::vip_tier_for(stats.total_wagered_micro);

        let contribution = request.amount_micro / JACKPOT_CONTRIBUTION_DIVISOR;
        inner
            .jackpots
            .entry(request.game_mode)
            .or_default()
            .amount_micro += contribution;

        inner.house.total_games += 1;
        inner.house.total_volume_micro += request.amount_micro;
        inner.house.balance_micro += request.amount_micro;

        let tx = inner.record_tx(format!("(ok u{game_id})"), false);
        Ok(Submission::Submitted(tx))
    }

    async fn submit_resolve(&self, game_id: u64) -> Result<Submission, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(game) = inner.games.get(&game_id).cloned() else {
            let tx = inner.abort_tx(ERR_GAME_NOT_FOUND);
            return Ok(Submission::Submitted(tx));
        };
        if game.status == GameStatus::Resolved {
            let tx = inner.abort_tx(ERR_ALREADY_RESOLVED);
            return Ok(Submission::Submitted(tx));
        }

        let result = inner.roll_die();
        let won = is_win(game.game_mode, game.target, result);
        let payout_micro = if won {
            game.bet_amount_micro * game.game_mode.payout_multiplier()
        } else {
            0
        };

        if let Some(stored) = inner.games.get_mut(&game_id) {
            stored.status = GameStatus::Resolved;
            stored.result = Some(result);
            stored.payout_micro = payout_micro;
        }

        let player = inner.game_players.get(&game_id).cloned();
        if let Some(stats) = player.and_then(|p| inner.players.get_mut(&p)) {
            stats.total_won_micro += payout_micro;
            if won {
                stats.win_streak += 1;
                stats.max_streak = stats.max_streak.max(stats.win_streak);
            } else {
                stats.win_streak = 0;
            }
        }
        inner.house.balance_micro = inner.house.balance_micro.saturating_sub(payout_micro);

        let tx = inner.record_tx(format!("(ok u{result})"), false);
        Ok(Submission::Submitted(tx))
    }

    async fn get_transaction(&self, tx: &TxId) -> Result<TransactionRecord, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        inner.height += 1;
        let Some(stored) = inner.transactions.get_mut(&tx.0) else {
            return Err(ChainError::Transport(format!("unknown transaction {tx}")));
        };
        if stored.polls_remaining > 0 {
            stored.polls_remaining -= 1;
            return Ok(TransactionRecord {
                status: TransactionStatus::Pending,
                result: None,
                detail: None,
            });
        }
        if stored.aborted {
            return Ok(TransactionRecord {
                status: TransactionStatus::Aborted,
                result: Some(stored.result.clone()),
                detail: Some(format!("abort_by_response - {}", stored.result)),
            });
        }
        Ok(TransactionRecord {
            status: TransactionStatus::Success,
            result: Some(stored.result.clone()),
            detail: None,
        })
    }

    async fn read_game(&self, game_id: u64) -> Result<Option<GameRecord>, ChainError> {
        Ok(self.inner.lock().unwrap().games.get(&game_id).cloned())
    }

    async fn read_player_stats(
        &self,
        player: &Address,
    ) -> Result<Option<PlayerStats>, ChainError> {
        Ok(self.inner.lock().unwrap().players.get(player).cloned())
    }

    async fn read_jackpot(&self, mode: GameMode) -> Result<JackpotInfo, ChainError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .jackpots
            .get(&mode)
            .cloned()
            .unwrap_or_default())
    }

    async fn read_house_stats(&self) -> Result<HouseStats, ChainError> {
        Ok(self.inner.lock().unwrap().house.clone())
    }

    async fn block_height(&self) -> Result<Option<u64>, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        inner.height += 1;
        Ok(Some(inner.height))
    }
}
