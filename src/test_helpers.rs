//! Scriptable fake chain client for exercising the coordinator's failure
//! paths: declined approvals, pending transactions, chain aborts, and
//! transport errors.

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
        GameMode,
        GameRecord,
        GameStatus,
        HouseStats,
        JackpotInfo,
        PlayerStats,
        TxId,
    },
};
use std::{
    collections::{
        HashMap,
        VecDeque,
    },
    sync::{
        Arc,
        Mutex,
    },
};

struct FakeInner {
    decline_bet: bool,
    decline_resolve: bool,
    poll_script: VecDeque<Result<TransactionRecord, ChainError>>,
    games: HashMap<u64, GameRecord>,
    stats: HashMap<Address, PlayerStats>,
    heights: VecDeque<u64>,
    last_height: Option<u64>,
    resolve_fills: Option<(u8, u64)>,
    bet_submissions: u32,
    resolve_submissions: Vec<u64>,
    next_tx: u64,
}

/// A chain client whose every response is scripted up front.
///
/// `get_transaction` pops from the poll script; once the script is empty
/// it reports `Pending` forever, which is what a never-confirming chain
/// looks like to the coordinator.
#[derive(Clone)]
pub struct FakeChain {
    inner: Arc<Mutex<FakeInner>>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeInner {
                decline_bet: false,
                decline_resolve: false,
                poll_script: VecDeque::new(),
                games: HashMap::new(),
                stats: HashMap::new(),
                heights: VecDeque::new(),
                last_height: None,
                resolve_fills: None,
                bet_submissions: 0,
                resolve_submissions: Vec::new(),
                next_tx: 1,
            })),
        }
    }

    pub fn decline_bet_approval(self) -> Self {
        self.inner.lock().unwrap().decline_bet = true;
        self
    }

    pub fn decline_resolve_approval(self) -> Self {
        self.inner.lock().unwrap().decline_resolve = true;
        self
    }

    pub fn push_poll(self, step: Result<TransactionRecord, ChainError>) -> Self {
        self.inner.lock().unwrap().poll_script.push_back(step);
        self
    }

    pub fn push_success(self, result: &str) -> Self {
        self.push_poll(Ok(TransactionRecord {
            status: TransactionStatus::Success,
            result: Some(result.to_string()),
            detail: None,
        }))
    }

    pub fn push_abort(self, detail: &str) -> Self {
        self.push_poll(Ok(TransactionRecord {
            status: TransactionStatus::Aborted,
            result: None,
            detail: Some(detail.to_string()),
        }))
    }

    pub fn push_pending(self) -> Self {
        self.push_poll(Ok(TransactionRecord {
            status: TransactionStatus::Pending,
            result: None,
            detail: None,
        }))
    }

    pub fn with_game(self, record: GameRecord) -> Self {
        self.inner
            .lock()
            .unwrap()
            .games
            .insert(record.game_id, record);
        self
    }

    pub fn with_stats(self, player: &str, stats: PlayerStats) -> Self {
        self.inner
            .lock()
            .unwrap()
            .stats
            .insert(player.to_string(), stats);
        self
    }

    /// Script the block heights returned by successive `block_height`
    /// calls; the last one repeats. With no heights scripted, height is
    /// reported as unavailable and the coordinator falls back to the
    /// fixed dwell.
    pub fn with_heights(self, heights: &[u64]) -> Self {
        self.inner.lock().unwrap().heights = heights.iter().copied().collect();
        self
    }

    /// When a resolution is submitted, flip the game to resolved with
    /// this dice result and payout.
    pub fn resolve_fills(self, result: u8, payout_micro: u64) -> Self {
        self.inner.lock().unwrap().resolve_fills = Some((result, payout_micro));
        self
    }

    pub fn bet_submission_count(&self) -> u32 {
        self.inner.lock().unwrap().bet_submissions
    }

    pub fn resolve_submission_count(&self) -> usize {
        self.inner.lock().unwrap().resolve_submissions.len()
    }
}

impl Default for FakeChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainClient for FakeChain {
    async fn submit_bet(&self, _request: &BetRequest) -> Result<Submission, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        inner.bet_submissions += 1;
        if inner.decline_bet {
            return Ok(Submission::Declined);
        }
        let tx = TxId(format!("0xfake{:04x}", inner.next_tx));
        inner.next_tx += 1;
        Ok(Submission::Submitted(tx))
    }

    async fn submit_resolve(&self, game_id: u64) -> Result<Submission, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        inner.resolve_submissions.push(game_id);
        if inner.decline_resolve {
            return Ok(Submission::Declined);
        }
        if let Some((result, payout)) = inner.resolve_fills
            && let Some(game) = inner.games.get_mut(&game_id)
        {
            game.status = GameStatus::Resolved;
            game.result = Some(result);
            game.payout_micro = payout;
        }
        let tx = TxId(format!("0xfake{:04x}", inner.next_tx));
        inner.next_tx += 1;
        Ok(Submission::Submitted(tx))
    }

    async fn get_transaction(&self, _tx: &TxId) -> Result<TransactionRecord, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        inner.poll_script.pop_front().unwrap_or(Ok(TransactionRecord {
            status: TransactionStatus::Pending,
            result: None,
            detail: None,
        }))
    }

    async fn read_game(&self, game_id: u64) -> Result<Option<GameRecord>, ChainError> {
        Ok(self.inner.lock().unwrap().games.get(&game_id).cloned())
    }

    async fn read_player_stats(
        &self,
        player: &Address,
    ) -> Result<Option<PlayerStats>, ChainError> {
        Ok(self.inner.lock().unwrap().stats.get(player).cloned())
    }

    async fn read_jackpot(&self, _mode: GameMode) -> Result<JackpotInfo, ChainError> {
        Ok(JackpotInfo::default())
    }

    async fn read_house_stats(&self) -> Result<HouseStats, ChainError> {
        Ok(HouseStats::default())
    }

    async fn block_height(&self) -> Result<Option<u64>, ChainError> {
        let mut inner = self.inner.lock().unwrap();
        let next = match inner.heights.pop_front() {
            Some(h) => {
                inner.last_height = Some(h);
                Some(h)
            }
            None => inner.last_height,
        };
        Ok(next)
    }
}

/// A valid classic-mode bet used as a starting point across tests.
pub fn sample_bet() -> BetRequest {
    BetRequest {
        target: 3,
        game_mode: GameMode::Classic,
        amount_micro: 5_000_000,
        player: "ST3Y2767DSNTBTP7Q86GRQ4NBG69C6SD1AKC3P4SK".to_string(),
    }
}

/// A pending on-chain record matching [`sample_bet`].
pub fn pending_game(game_id: u64) -> GameRecord {
    GameRecord {
        game_id,
        status: GameStatus::Pending,
        result: None,
        payout_micro: 0,
        bet_amount_micro: 5_000_000,
        target: 3,
        game_mode: GameMode::Classic,
    }
}
