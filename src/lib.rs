//! Client-side workflow library for the bitcoin-dice betting contract.
//!
//! The contract itself (bet validation, RNG, payout math, jackpot
//! bookkeeping, VIP tiers) lives on chain and is consumed through the
//! [`chain::ChainClient`] trait. This crate owns everything around it:
//! the bet lifecycle state machine ([`coordinator`]), the typed decoder
//! at the chain boundary ([`decode`]), and the advisory risk scoring
//! ([`risk`]).

pub mod advisor;

pub mod api_client;

pub mod chain;

pub mod coordinator;

pub mod decode;

pub mod error;

pub mod local;

pub mod risk;

pub mod test_helpers;

pub mod types;

pub use chain::{
    ChainClient,
    Submission,
};
pub use coordinator::{
    BetLifecycle,
    Phase,
    PollPolicy,
};
pub use error::{
    CancelPoint,
    ChainError,
    Error,
};
pub use types::{
    BetRequest,
    GameMode,
    GameOutcome,
    GameRecord,
    GameStatus,
    PlayerStats,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;
