#![allow(non_snake_case)]
use dice_client::{
    BetLifecycle,
    CancelPoint,
    ChainError,
    Error,
    GameMode,
    GameStatus,
    PollPolicy,
    test_helpers::{
        FakeChain,
        pending_game,
        sample_bet,
    },
    types::GameRecord,
};
use std::time::Duration;

fn resolved_game(game_id: u64, result: u8, payout_micro: u64) -> GameRecord {
    let mut record = pending_game(game_id);
    record.status = GameStatus::Resolved;
    record.result = Some(result);
    record.payout_micro = payout_micro;
    record
}

#[tokio::test(start_paused = true)]
async fn resolve_game__already_resolved_game_is_never_resubmitted() {
    // given
    // the bet confirms as game 7, which someone else resolved while we
    // waited out the resolution window
    let chain = FakeChain::new()
        .push_success("(ok u7)")
        .with_game(resolved_game(7, 3, 25_000_000));
    let mut lifecycle = BetLifecycle::new(chain.clone());

    // when
    let outcome = lifecycle.play(sample_bet()).await.unwrap();

    // then
    assert_eq!(chain.resolve_submission_count(), 0);
    assert!(outcome.is_winner);
    assert_eq!(outcome.game_id, 7);
    assert_eq!(outcome.dice_result, 3);
}

#[tokio::test(start_paused = true)]
async fn resolve_game__pending_game_gets_exactly_one_resolution_submission() {
    let chain = FakeChain::new()
        .push_success("(ok u1)")
        .push_success("(ok u4)")
        .with_game(pending_game(1))
        .resolve_fills(4, 0);
    let mut lifecycle = BetLifecycle::new(chain.clone());

    // when
    let outcome = lifecycle.play(sample_bet()).await.unwrap();

    // then
    assert_eq!(chain.resolve_submission_count(), 1);
    assert!(!outcome.is_winner);
    assert_eq!(outcome.dice_result, 4);
}

#[tokio::test(start_paused = true)]
async fn resolve_game__chain_abort_detail_is_preserved_verbatim() {
    // given
    let detail = "abort_by_response - (err u103)";
    let chain = FakeChain::new().push_abort(detail);
    let mut lifecycle = BetLifecycle::new(chain);

    // when
    let result = lifecycle.play(sample_bet()).await;

    // then
    let err = result.unwrap_err();
    assert_eq!(
        err,
        Error::ChainRejected {
            detail: detail.to_string()
        }
    );
    // a rejection after the stake moved must say the stake is recoverable
    assert!(err.user_message().contains("held by the contract"));
}

#[tokio::test(start_paused = true)]
async fn resolve_game__forever_pending_transaction_times_out() {
    // given
    // an empty poll script reports Pending on every attempt
    let chain = FakeChain::new();
    let mut lifecycle = BetLifecycle::new(chain.clone());

    // when
    let result = lifecycle.play(sample_bet()).await;

    // then
    assert_eq!(result, Err(Error::Timeout));
    assert_eq!(chain.resolve_submission_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn resolve_game__timeout_does_not_sleep_after_the_last_attempt() {
    let chain = FakeChain::new();
    let poll = PollPolicy {
        interval: Duration::from_secs(2),
        max_attempts: 3,
    };
    let mut lifecycle = BetLifecycle::new(chain).with_policy(poll, Default::default());

    let before = tokio::time::Instant::now();

    // when
    let result = lifecycle.play(sample_bet()).await;

    // then
    // three attempts separated by two sleeps, nothing trailing
    assert_eq!(result, Err(Error::Timeout));
    assert_eq!(before.elapsed(), Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn resolve_game__transient_poll_failures_are_retried() {
    // given
    // two transport errors before the bet confirmation comes through
    let chain = FakeChain::new()
        .push_poll(Err(ChainError::Transport("connection reset".into())))
        .push_poll(Err(ChainError::Transport("connection reset".into())))
        .push_success("(ok u1)")
        .push_success("(ok u2)")
        .with_game(pending_game(1))
        .resolve_fills(2, 0);
    let mut lifecycle = BetLifecycle::new(chain);

    // when
    let outcome = lifecycle.play(sample_bet()).await.unwrap();

    // then
    assert_eq!(outcome.dice_result, 2);
}

#[tokio::test(start_paused = true)]
async fn resolve_game__poll_failure_on_the_last_attempt_is_terminal() {
    let chain = FakeChain::new()
        .push_poll(Err(ChainError::Transport("down".into())))
        .push_poll(Err(ChainError::Transport("down".into())))
        .push_poll(Err(ChainError::Transport("down".into())));
    let poll = PollPolicy {
        interval: Duration::from_secs(2),
        max_attempts: 3,
    };
    let mut lifecycle = BetLifecycle::new(chain).with_policy(poll, Default::default());

    // when
    let result = lifecycle.play(sample_bet()).await;

    // then
    assert_eq!(
        result,
        Err(Error::Chain(ChainError::Transport("down".into())))
    );
}

#[tokio::test(start_paused = true)]
async fn resolve_game__confirmed_game_missing_from_chain_is_not_found() {
    // given
    // the bet confirms as game 3 but no record is readable
    let chain = FakeChain::new().push_success("(ok u3)");
    let mut lifecycle = BetLifecycle::new(chain);

    // when
    let result = lifecycle.play(sample_bet()).await;

    // then
    assert_eq!(
        result,
        Err(Error::NotFound {
            what: "game 3".to_string()
        })
    );
}

#[tokio::test(start_paused = true)]
async fn resolve_game__resolution_window_waits_for_real_blocks() {
    // given
    // heights 100, 100, 101, 102: the window opens two blocks after the
    // first observation
    let chain = FakeChain::new()
        .push_success("(ok u1)")
        .push_success("(ok u5)")
        .with_game(pending_game(1))
        .resolve_fills(5, 0)
        .with_heights(&[100, 100, 101, 102]);
    let mut lifecycle = BetLifecycle::new(chain);

    let before = tokio::time::Instant::now();

    // when
    let outcome = lifecycle.play(sample_bet()).await.unwrap();

    // then
    assert_eq!(outcome.dice_result, 5);
    // three 2s polls of the height, not the 20s wall-clock fallback
    let waited = before.elapsed();
    assert!(waited < Duration::from_secs(20), "waited {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn resolve_game__stalled_block_height_times_out() {
    // given
    // the chain reports a height but never mints another block
    let chain = FakeChain::new()
        .push_success("(ok u1)")
        .with_game(pending_game(1))
        .with_heights(&[100]);
    let poll = PollPolicy {
        interval: Duration::from_secs(2),
        max_attempts: 5,
    };
    let mut lifecycle = BetLifecycle::new(chain.clone()).with_policy(poll, Default::default());

    // when
    let result = lifecycle.play(sample_bet()).await;

    // then
    assert_eq!(result, Err(Error::Timeout));
    assert_eq!(chain.resolve_submission_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn resolve_game__declined_resolution_approval_cancels() {
    let chain = FakeChain::new()
        .push_success("(ok u1)")
        .with_game(pending_game(1))
        .decline_resolve_approval();
    let mut lifecycle = BetLifecycle::new(chain.clone());

    // when
    let result = lifecycle.play(sample_bet()).await;

    // then
    assert_eq!(
        result,
        Err(Error::UserCancelled {
            point: CancelPoint::Resolution
        })
    );
    assert_eq!(chain.resolve_submission_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn resolve_game__declining_resolution_does_not_claim_nothing_was_submitted() {
    // given
    // the bet is already confirmed on chain when the resolution prompt
    // is declined
    let chain = FakeChain::new()
        .push_success("(ok u1)")
        .with_game(pending_game(1))
        .decline_resolve_approval();
    let mut lifecycle = BetLifecycle::new(chain);

    // when
    let err = lifecycle.play(sample_bet()).await.unwrap_err();

    // then
    // the stake moved, so the message must say the bet is placed, not
    // that nothing happened
    let message = err.user_message();
    assert!(message.contains("bet is placed"), "got: {message}");
    assert!(message.contains("held by the contract"), "got: {message}");
    assert!(!message.contains("Nothing was submitted"), "got: {message}");
}

#[test]
fn resolve_game__mode_is_named_in_user_facing_output() {
    // spot check the display names the demo prints
    assert_eq!(GameMode::Classic.to_string(), "Classic");
    assert_eq!(GameMode::HighLow.to_string(), "High/Low");
    assert_eq!(GameMode::Range.to_string(), "Range");
}
