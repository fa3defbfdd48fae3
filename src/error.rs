use thiserror::Error;

/// Which wallet prompt the player declined. A bet-approval decline leaves
/// nothing on chain; a resolution-approval decline leaves a placed,
/// unresolved bet behind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CancelPoint {
    Bet,
    Resolution,
}

/// Failures at the chain-client boundary. Transport errors during
/// transaction polling are transient and retried by the coordinator;
/// anywhere else they terminate the lifecycle.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("chain transport error: {0}")]
    Transport(String),
    #[error("malformed chain payload: {0}")]
    Decode(String),
}

/// Terminal outcomes of a bet lifecycle. Every variant returns the
/// coordinator to an idle, re-bettable state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Pre-flight validation failure; the chain is never called.
    #[error("invalid bet: {reason}")]
    Validation { reason: String },

    /// The player declined a wallet approval prompt.
    #[error("approval declined in wallet")]
    UserCancelled { point: CancelPoint },

    /// The chain reported an abort. `detail` carries the raw
    /// chain-reported string verbatim.
    #[error("transaction rejected by chain: {detail}")]
    ChainRejected { detail: String },

    /// A confirmed transaction carried a malformed or missing result.
    #[error("could not extract game id from transaction result")]
    Extraction,

    /// Polling exhausted its attempt budget without a terminal status.
    #[error("timed out waiting for transaction confirmation")]
    Timeout,

    /// A read returned absent for a record that should exist.
    #[error("{what} not found on chain")]
    NotFound { what: String },

    /// Chain I/O failure outside the retried polling path.
    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl Error {
    /// Human-readable message for display. Rejections after the stake has
    /// been transferred also state that the stake is held by the contract,
    /// not lost.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { reason } => format!("Bet not placed: {reason}."),
            Error::UserCancelled { point: CancelPoint::Bet } => {
                "Cancelled in wallet. Nothing was submitted.".into()
            }
            Error::UserCancelled { point: CancelPoint::Resolution } => {
                "Resolution cancelled in wallet. Your bet is placed and your \
                 stake is held by the contract; resolve the game to settle it."
                    .into()
            }
            Error::ChainRejected { detail } => format!(
                "The chain rejected the transaction: {detail}. Your stake is \
                 held by the contract and is not lost; try resolving again \
                 in a moment."
            ),
            Error::Extraction => {
                "Bet confirmed but the transaction result was unreadable. \
                 Check the transaction on an explorer."
                    .into()
            }
            Error::Timeout => {
                "Timed out waiting for confirmation. The transaction may \
                 still confirm; check an explorer before retrying."
                    .into()
            }
            Error::NotFound { what } => format!("Could not find {what} on chain."),
            Error::Chain(e) => format!("Chain request failed: {e}."),
        }
    }
}
