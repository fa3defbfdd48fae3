use crate::{
    error::ChainError,
    types::{
        Address,
        BetRequest,
        GameMode,
        GameRecord,
        HouseStats,
        JackpotInfo,
        PlayerStats,
        TxId,
    },
};
use serde::{
    Deserialize,
    Serialize,
};

/// Outcome of handing a transaction to the wallet for approval. The wallet
/// popup itself is external; the client only sees approve/decline.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Submission {
    Submitted(TxId),
    Declined,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Success,
    Pending,
    Aborted,
}

/// One observation of a submitted transaction. `result` is the structured
/// result repr (e.g. `(ok u7)`); `detail` is the raw abort detail when the
/// chain rejected the transaction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub status: TransactionStatus,
    pub result: Option<String>,
    pub detail: Option<String>,
}

/// Interface to the blockchain smart contract, consumed but not
/// implemented by this crate (the wallet/signing side is an external
/// library). The coordinator is generic over this trait so tests can
/// substitute [`crate::test_helpers::FakeChain`] or run against
/// [`crate::local::LocalChain`].
pub trait ChainClient {
    /// Submit a bet for wallet approval and broadcast.
    fn submit_bet(
        &self,
        request: &BetRequest,
    ) -> impl Future<Output = Result<Submission, ChainError>>;

    /// Submit a resolution for the given game.
    fn submit_resolve(
        &self,
        game_id: u64,
    ) -> impl Future<Output = Result<Submission, ChainError>>;

    /// One poll of a submitted transaction's status.
    fn get_transaction(
        &self,
        tx: &TxId,
    ) -> impl Future<Output = Result<TransactionRecord, ChainError>>;

    fn read_game(
        &self,
        game_id: u64,
    ) -> impl Future<Output = Result<Option<GameRecord>, ChainError>>;

    fn read_player_stats(
        &self,
        player: &Address,
    ) -> impl Future<Output = Result<Option<PlayerStats>, ChainError>>;

    fn read_jackpot(
        &self,
        mode: GameMode,
    ) -> impl Future<Output = Result<JackpotInfo, ChainError>>;

    fn read_house_stats(&self) -> impl Future<Output = Result<HouseStats, ChainError>>;

    /// Current block height, or `None` when the backing API does not
    /// expose it. With a height the coordinator waits out the resolution
    /// window by observing real blocks instead of a fixed dwell.
    fn block_height(&self) -> impl Future<Output = Result<Option<u64>, ChainError>>;
}
