use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use wheelhouse_execution::{PhysicsConfig, SpinSimulator, WheelPhysics};
use wheelhouse_simulator::Session;
use wheelhouse_types::{BetSlip, Selector};

fn init_tracing(level: tracing::Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse a `SELECTOR=STAKE` pair such as `red=10` or `1-12=5`.
fn parse_bet(value: &str) -> Result<(Selector, u64), String> {
    let (selector, stake) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SELECTOR=STAKE, got {value:?}"))?;
    let selector = selector.parse::<Selector>().map_err(|err| err.to_string())?;
    let stake = stake
        .trim()
        .parse::<u64>()
        .map_err(|err| format!("invalid stake {stake:?}: {err}"))?;
    Ok((selector, stake))
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of spins to run.
    #[arg(short, long, default_value_t = 1_000)]
    spins: u64,

    /// Physics YAML file (defaults apply to omitted fields).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bet placed on every spin, as SELECTOR=STAKE (repeatable; stakes accumulate).
    #[arg(short, long = "bet", value_parser = parse_bet)]
    bets: Vec<(Selector, u64)>,

    /// Seed for a reproducible session (entropy when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Tick length in microseconds (defaults to one physics frame, must be > 0 when set).
    #[arg(long)]
    tick_micros: Option<u64>,

    /// Print the report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Validate the physics config and bets, print them and exit.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

fn load_physics(path: Option<&Path>) -> Result<WheelPhysics> {
    let config = match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config file {}", path.display()))?;
            serde_yaml::from_str::<PhysicsConfig>(&contents)
                .context("Could not parse config file")?
        }
        None => PhysicsConfig::default(),
    };
    config.validate().context("Invalid physics config")
}

fn build_slip(bets: &[(Selector, u64)]) -> Result<BetSlip> {
    let mut slip = BetSlip::new();
    for &(selector, stake) in bets {
        slip.place(selector, stake)
            .with_context(|| format!("Invalid bet {selector}={stake}"))?;
    }
    Ok(slip)
}

fn tick_length(args: &Args, physics: &WheelPhysics) -> Result<Duration> {
    match args.tick_micros {
        Some(0) => anyhow::bail!("tick_micros must be > 0"),
        Some(micros) => Ok(Duration::from_micros(micros)),
        None => Ok(physics.frame),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level);

    let physics = load_physics(args.config.as_deref())?;
    let slip = build_slip(&args.bets)?;
    let tick = tick_length(&args, &physics)?;

    if args.dry_run {
        println!("{physics:#?}");
        for bet in slip.iter() {
            println!("{}={}", bet.selector, bet.stake_total);
        }
        return Ok(());
    }

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(
        spins = args.spins,
        seed = ?args.seed,
        bets = slip.len(),
        tick_micros = tick.as_micros() as u64,
        "starting session"
    );
    let mut session = Session::new(SpinSimulator::with_rng(physics, rng), slip, tick)?;
    let report = session.run(args.spins)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Could not serialize report")?
        );
    } else {
        println!("{report}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wheelhouse_types::Dozen;

    #[test]
    fn parses_bets_and_defaults() {
        let args = Args::parse_from([
            "wheelhouse-simulator",
            "--bet",
            "red=10",
            "--bet",
            "1-12=5",
            "-b",
            "red=2",
            "--seed",
            "7",
        ]);
        assert_eq!(args.spins, 1_000);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.log_level, tracing::Level::WARN);
        assert!(!args.json);

        let slip = build_slip(&args.bets).expect("bets should build");
        assert_eq!(slip.stake(&Selector::Red), Some(12));
        assert_eq!(slip.stake(&Selector::Dozen(Dozen::First)), Some(5));
    }

    #[test]
    fn rejects_malformed_bets() {
        assert!(Args::try_parse_from(["wheelhouse-simulator", "--bet", "red"]).is_err());
        assert!(Args::try_parse_from(["wheelhouse-simulator", "--bet", "purple=5"]).is_err());
        assert!(Args::try_parse_from(["wheelhouse-simulator", "--bet", "37=5"]).is_err());
        assert!(Args::try_parse_from(["wheelhouse-simulator", "--bet", "red=ten"]).is_err());

        let args = Args::parse_from(["wheelhouse-simulator", "--bet", "odd=0"]);
        let err = build_slip(&args.bets).unwrap_err();
        assert!(err.to_string().contains("odd=0"), "unexpected error: {err}");
    }

    #[test]
    fn rejects_zero_tick() {
        let args = Args::parse_from(["wheelhouse-simulator", "--tick-micros", "0"]);
        let physics = load_physics(None).expect("default physics");
        let err = tick_length(&args, &physics).unwrap_err();
        assert!(
            err.to_string().contains("tick_micros"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn tick_defaults_to_frame() {
        let args = Args::parse_from(["wheelhouse-simulator", "--tick-micros", "8000"]);
        let physics = load_physics(None).expect("default physics");
        assert_eq!(tick_length(&args, &physics).unwrap(), Duration::from_millis(8));

        let args = Args::parse_from(["wheelhouse-simulator"]);
        assert_eq!(tick_length(&args, &physics).unwrap(), physics.frame);
    }

    #[test]
    fn parses_flags() {
        let args = Args::parse_from([
            "wheelhouse-simulator",
            "--spins",
            "10",
            "--json",
            "--log-level",
            "debug",
            "--config",
            "wheel.yaml",
        ]);
        assert_eq!(args.spins, 10);
        assert!(args.json);
        assert_eq!(args.log_level, tracing::Level::DEBUG);
        assert_eq!(args.config, Some(PathBuf::from("wheel.yaml")));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let err = load_physics(Some(Path::new("/nonexistent/wheel.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Could not read config file"));
    }
}
