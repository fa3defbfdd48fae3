use color_eyre::eyre::{
    Result,
    eyre,
};
use dice_client::{
    BetLifecycle,
    BetRequest,
    ChainClient,
    Error,
    GameMode,
    PollPolicy,
    advisor,
    decode,
    local::LocalChain,
    risk,
    types::{
        micro_to_units,
        units_to_micro,
    },
};
use std::time::Duration;
use tracing_appender::rolling;
use tracing_subscriber::{
    EnvFilter,
    fmt,
};

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: dice-client [--amount <units>] [--mode classic|highlow|range] [--target <n>]\n\
         [--player <address>] [--seed <n>]\n\
         \n\
         Flags:\n\
           --amount <units>    Bet size in whole units (default 5)\n\
           --mode <mode>       Game mode: classic, highlow, or range (default classic)\n\
           --target <n>        Prediction target for the chosen mode (default 3)\n\
           --player <address>  Player address (default a demo address)\n\
           --seed <n>          Seed the simulated chain's dice for a repeatable run"
    );
    std::process::exit(0);
}

struct CliArgs {
    amount_units: u64,
    mode: GameMode,
    target: u32,
    player: String,
    seed: Option<u64>,
}

fn parse_cli_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut amount_units: Option<u64> = None;
    let mut mode: Option<GameMode> = None;
    let mut target: Option<u32> = None;
    let mut player: Option<String> = None;
    let mut seed: Option<u64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--amount" => {
                let value = args
                    .next()
                    .ok_or_else(|| eyre!("--amount requires a whole-unit value"))?;
                if amount_units.is_some() {
                    return Err(eyre!("--amount may only be specified once"));
                }
                amount_units = Some(value.parse()?);
            }
            "--mode" => {
                let value = args
                    .next()
                    .ok_or_else(|| eyre!("--mode requires classic, highlow, or range"))?;
                if mode.is_some() {
                    return Err(eyre!("--mode may only be specified once"));
                }
                mode = Some(match value.as_str() {
                    "classic" => GameMode::Classic,
                    "highlow" => GameMode::HighLow,
                    "range" => GameMode::Range,
                    other => return Err(eyre!("Unknown game mode: {other}")),
                });
            }
            "--target" => {
                let value = args
                    .next()
                    .ok_or_else(|| eyre!("--target requires a number"))?;
                if target.is_some() {
                    return Err(eyre!("--target may only be specified once"));
                }
                target = Some(value.parse()?);
            }
            "--player" => {
                let value = args
                    .next()
                    .ok_or_else(|| eyre!("--player requires an address"))?;
                if player.is_some() {
                    return Err(eyre!("--player may only be specified once"));
                }
                player = Some(value);
            }
            "--seed" => {
                let value = args.next().ok_or_else(|| eyre!("--seed requires a number"))?;
                if seed.is_some() {
                    return Err(eyre!("--seed may only be specified once"));
                }
                seed = Some(value.parse()?);
            }
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    Ok(CliArgs {
        amount_units: amount_units.unwrap_or(5),
        mode: mode.unwrap_or(GameMode::Classic),
        target: target.unwrap_or(3),
        player: player
            .unwrap_or_else(|| "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM".to_string()),
        seed,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let file_appender = rolling::daily("logs", "dice-client.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let args = parse_cli_args()?;
    let chain = match args.seed {
        Some(seed) => LocalChain::with_seed(seed),
        None => LocalChain::new(),
    };

    let request = BetRequest {
        target: args.target,
        game_mode: args.mode,
        amount_micro: units_to_micro(args.amount_units as f64),
        player: args.player.clone(),
    };

    // The simulated chain confirms on the second poll, so a tight
    // interval keeps the demo snappy.
    let poll = PollPolicy {
        interval: Duration::from_millis(200),
        max_attempts: 30,
    };
    let mut lifecycle = BetLifecycle::new(chain).with_policy(poll, Default::default());

    println!(
        "Placing {} unit(s) on {} (target {})...",
        args.amount_units, args.mode, args.target
    );
    match lifecycle.play(request).await {
        Ok(outcome) => {
            if outcome.is_winner {
                println!(
                    "Rolled {} - you won {:.2} units!",
                    outcome.dice_result,
                    micro_to_units(outcome.payout_micro)
                );
            } else {
                println!("Rolled {} - no win this time.", outcome.dice_result);
            }
        }
        Err(e) => {
            println!("{}", e.user_message());
            if let Error::ChainRejected { detail } = &e
                && let Some(reason) = decode::extract_error_code(detail)
                    .and_then(decode::contract_error_detail)
            {
                println!("Contract said: {reason}.");
            }
        }
    }

    if let Ok(Some(stats)) = lifecycle.chain().read_player_stats(&args.player).await {
        let assessment = risk::overall_risk(&stats);
        println!(
            "\nRisk: {} ({}/100), VIP tier: {}",
            assessment.label,
            assessment.score,
            stats.vip_tier_name()
        );
        for factor in &assessment.factors {
            println!("  - {factor}");
        }
        for suggestion in advisor::smart_suggestions(&stats, args.mode) {
            println!("  tip: {}", suggestion.message);
        }
    }
    if let Ok(jackpot) = lifecycle.chain().read_jackpot(args.mode).await {
        println!(
            "Jackpot pool ({}): {:.2} units",
            args.mode,
            micro_to_units(jackpot.amount_micro)
        );
    }

    Ok(())
}
