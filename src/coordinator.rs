//! Bet lifecycle coordinator: drives a bet from submission through
//! confirmation, the resolution window, resolution, and result extraction.
//!
//! The chain sets the pace; every chain operation is a suspend point. One
//! lifecycle runs at a time, the chain is the single source of truth, and
//! the coordinator always re-reads after confirmation instead of trusting
//! pre-confirmation state.

use crate::{
    chain::{
        ChainClient,
        Submission,
        TransactionRecord,
        TransactionStatus,
    },
    decode,
    error::{
        CancelPoint,
        Error,
    },
    types::{
        BetRequest,
        CONFIRMATION_BLOCKS,
        GameOutcome,
        GameStatus,
        TxId,
    },
};
use std::time::Duration;
use tokio::{
    sync::watch,
    time,
};
use tracing::{
    info,
    warn,
};

/// Polling policy for "wait for transaction" steps: fixed interval, capped
/// attempts. Transient poll failures count against the same cap and are
/// only terminal on the last attempt.
#[derive(Copy, Clone, Debug)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        // ~60s budget at the default interval.
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

/// How long to wait between bet confirmation and resolution. The contract
/// requires [`CONFIRMATION_BLOCKS`] blocks to elapse; when the client
/// exposes block height we observe real blocks, otherwise we fall back to
/// a fixed wall-clock dwell, which is an approximation, not a guarantee.
#[derive(Copy, Clone, Debug)]
pub struct ResolutionWait {
    pub blocks: u64,
    pub fallback_dwell: Duration,
}

impl Default for ResolutionWait {
    fn default() -> Self {
        Self {
            blocks: CONFIRMATION_BLOCKS,
            fallback_dwell: Duration::from_secs(20),
        }
    }
}

/// User-visible lifecycle state. Terminal phases stick until the next
/// `play` call resets to `Idle`.
#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Idle,
    AwaitingApproval,
    AwaitingBetConfirmation,
    AwaitingResolutionDelay,
    AwaitingResolutionApproval,
    AwaitingResolutionConfirmation,
    Resolved(GameOutcome),
    Aborted(Error),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingApproval => "awaiting approval",
            Phase::AwaitingBetConfirmation => "awaiting bet confirmation",
            Phase::AwaitingResolutionDelay => "awaiting resolution delay",
            Phase::AwaitingResolutionApproval => "awaiting resolution approval",
            Phase::AwaitingResolutionConfirmation => "awaiting resolution confirmation",
            Phase::Resolved(_) => "resolved",
            Phase::Aborted(_) => "aborted",
        }
    }
}

pub struct BetLifecycle<C> {
    chain: C,
    poll: PollPolicy,
    wait: ResolutionWait,
    phase_tx: watch::Sender<Phase>,
}

impl<C> BetLifecycle<C> {
    pub fn new(chain: C) -> Self {
        let (phase_tx, _) = watch::channel(Phase::Idle);
        Self {
            chain,
            poll: PollPolicy::default(),
            wait: ResolutionWait::default(),
            phase_tx,
        }
    }

    pub fn with_policy(mut self, poll: PollPolicy, wait: ResolutionWait) -> Self {
        self.poll = poll;
        self.wait = wait;
        self
    }

    /// Subscribe to phase-change notifications.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase_tx.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.phase_tx.borrow().clone()
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    fn set_phase(&self, phase: Phase) {
        info!(phase = phase.name(), "bet lifecycle transition");
        self.phase_tx.send_replace(phase);
    }
}

impl<C: ChainClient> BetLifecycle<C> {
    /// Run one bet from request to settled outcome.
    ///
    /// Exactly one bet submission happens per traversal and at most one
    /// resolution submission; a game found already resolved is never
    /// re-submitted.
    pub async fn play(&mut self, request: BetRequest) -> Result<GameOutcome, Error> {
        self.set_phase(Phase::Idle);
        match self.drive(request).await {
            Ok(outcome) => {
                self.set_phase(Phase::Resolved(outcome.clone()));
                Ok(outcome)
            }
            Err(e) => {
                warn!(error = %e, "bet lifecycle aborted");
                self.set_phase(Phase::Aborted(e.clone()));
                Err(e)
            }
        }
    }

    async fn drive(&self, request: BetRequest) -> Result<GameOutcome, Error> {
        // Static validation happens before any chain call.
        request.validate()?;

        self.set_phase(Phase::AwaitingApproval);
        let tx = match self.chain.submit_bet(&request).await? {
            Submission::Submitted(tx) => tx,
            Submission::Declined => {
                return Err(Error::UserCancelled {
                    point: CancelPoint::Bet,
                });
            }
        };

        self.set_phase(Phase::AwaitingBetConfirmation);
        let confirmed = self.await_confirmation(&tx).await?;
        let game_id = confirmed
            .result
            .as_deref()
            .and_then(decode::extract_game_id)
            .ok_or(Error::Extraction)?;
        info!(%game_id, %tx, "bet confirmed");

        self.set_phase(Phase::AwaitingResolutionDelay);
        self.wait_resolution_window().await?;

        self.set_phase(Phase::AwaitingResolutionApproval);
        let game = self
            .chain
            .read_game(game_id)
            .await?
            .ok_or_else(|| Error::NotFound {
                what: format!("game {game_id}"),
            })?;
        if game.status == GameStatus::Resolved {
            // Settled by another actor while we waited; never submit a
            // duplicate resolution.
            info!(%game_id, "game already resolved, skipping resolution submission");
            return GameOutcome::from_settled(&game);
        }

        let tx = match self.chain.submit_resolve(game_id).await? {
            Submission::Submitted(tx) => tx,
            Submission::Declined => {
                return Err(Error::UserCancelled {
                    point: CancelPoint::Resolution,
                });
            }
        };

        self.set_phase(Phase::AwaitingResolutionConfirmation);
        self.await_confirmation(&tx).await?;

        // Reads before confirmation may be stale; re-read the settled record.
        let settled = self
            .chain
            .read_game(game_id)
            .await?
            .ok_or_else(|| Error::NotFound {
                what: format!("game {game_id}"),
            })?;
        GameOutcome::from_settled(&settled)
    }

    /// Poll a transaction until it reaches a terminal status or the
    /// attempt budget runs out.
    async fn await_confirmation(&self, tx: &TxId) -> Result<TransactionRecord, Error> {
        for attempt in 1..=self.poll.max_attempts {
            match self.chain.get_transaction(tx).await {
                Ok(record) => match record.status {
                    TransactionStatus::Success => return Ok(record),
                    TransactionStatus::Aborted => {
                        let detail = record
                            .detail
                            .or(record.result)
                            .unwrap_or_else(|| "unknown abort".to_string());
                        return Err(Error::ChainRejected { detail });
                    }
                    TransactionStatus::Pending => {}
                },
                Err(e) => {
                    warn!(%tx, attempt, error = %e, "transaction poll failed");
                    if attempt == self.poll.max_attempts {
                        return Err(e.into());
                    }
                }
            }
            if attempt < self.poll.max_attempts {
                time::sleep(self.poll.interval).await;
            }
        }
        Err(Error::Timeout)
    }

    /// Wait out the contract's resolution window. Prefers observing real
    /// block height; falls back to the fixed dwell when the client cannot
    /// report height.
    async fn wait_resolution_window(&self) -> Result<(), Error> {
        let start = match self.chain.block_height().await {
            Ok(Some(height)) => height,
            _ => {
                time::sleep(self.wait.fallback_dwell).await;
                return Ok(());
            }
        };
        let target = start + self.wait.blocks;
        for _ in 0..self.poll.max_attempts {
            time::sleep(self.poll.interval).await;
            if let Ok(Some(height)) = self.chain.block_height().await
                && height >= target
            {
                return Ok(());
            }
        }
        Err(Error::Timeout)
    }
}
