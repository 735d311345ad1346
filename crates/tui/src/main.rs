mod app;
mod block_font;
mod listing;
mod terminal;

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

use hilo_core::{
    card::Card,
    config::{self, AppConfig},
    deck::{Deck, DeckFactory},
    session::{CountingSession, ExhaustionPolicy},
};

use crate::{app::CountingApp, listing::DeckListing};

#[derive(Debug, Parser)]
#[command(name = "hilo", version, about = "Practice the Hi-Lo running count")]
struct Cli {
    /// Read settings from this file instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Deal cards one at a time and keep the count (default).
    Count(CountArgs),
    /// Print a shuffled deck with Hi-Lo values and the running count.
    Deck(DeckArgs),
}

#[derive(Debug, Default, Args)]
struct CountArgs {
    /// Shuffle seed for a reproducible deck.
    #[arg(long)]
    seed: Option<u64>,
    /// Shuffle a fresh deck instead of stopping when the deck runs out.
    #[arg(long)]
    reshuffle: bool,
    /// Cards to put on top of the first deck, e.g. `5h,kd,7c`.
    #[arg(long, value_delimiter = ',')]
    stack: Vec<Card>,
}

#[derive(Debug, Args)]
struct DeckArgs {
    /// Shuffle seed for a reproducible deck.
    #[arg(long)]
    seed: Option<u64>,
    /// Cards to put on top of the deck, e.g. `as,10d`.
    #[arg(long, value_delimiter = ',')]
    stack: Vec<Card>,
    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_path) = load_config(cli.config)?;
    init_logging(&config.log_dir)?;
    info!(path = %config_path.display(), "configuration loaded");

    match cli.command.unwrap_or_else(|| Command::Count(CountArgs::default())) {
        Command::Count(args) => run_count(config, args).await,
        Command::Deck(args) => print_deck(config, args),
    }
}

/// Settings plus the file they came from. Runs before logging is set up, so
/// the caller logs the path.
fn load_config(explicit: Option<PathBuf>) -> Result<(AppConfig, PathBuf)> {
    match explicit {
        Some(path) => Ok((AppConfig::load_from(&path)?, path)),
        None => {
            let path = config::ensure_default_config()?;
            Ok((AppConfig::load()?, path))
        }
    }
}

async fn run_count(config: AppConfig, args: CountArgs) -> Result<()> {
    let keymap = config.keymap()?;
    let seed = args.seed.or(config.seed);
    let policy = if args.reshuffle {
        ExhaustionPolicy::Reshuffle
    } else {
        config.exhaustion
    };

    let mut factory = DeckFactory::new(seed);
    let session = if args.stack.is_empty() {
        CountingSession::new(factory, policy)
    } else {
        let deck = first_deck(&mut factory, &args.stack)?;
        info!(stacked = args.stack.len(), "stacked top of first deck");
        CountingSession::with_deck(factory, policy, deck)
    };
    let mut app = CountingApp::new(session, keymap, seed, config.show_controls);
    app.run().await
}

fn print_deck(config: AppConfig, args: DeckArgs) -> Result<()> {
    let seed = args.seed.or(config.seed);
    let deck = first_deck(&mut DeckFactory::new(seed), &args.stack)?;
    let listing = DeckListing::new(&deck, seed);
    info!(?seed, json = args.json, "printing deck");
    if args.json {
        println!("{}", listing.to_json()?);
    } else {
        print!("{}", listing.to_text());
    }
    Ok(())
}

/// Shuffle a deck and move any `--stack` cards to the top.
fn first_deck(factory: &mut DeckFactory, stack: &[Card]) -> Result<Deck> {
    let deck = factory.new_deck();
    if stack.is_empty() {
        return Ok(deck);
    }
    deck.with_top(stack).context("invalid --stack")
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("hilo.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::parse_from(["hilo"]);
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["hilo", "count", "--seed", "7", "--reshuffle"]);
        match cli.command {
            Some(Command::Count(args)) => {
                assert_eq!(args.seed, Some(7));
                assert!(args.reshuffle);
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::parse_from(["hilo", "deck", "--json", "--config", "alt.json"]);
        assert!(matches!(cli.command, Some(Command::Deck(DeckArgs { json: true, .. }))));
        assert_eq!(cli.config, Some(PathBuf::from("alt.json")));
    }

    #[test]
    fn explicit_config_path_is_reported() -> Result<()> {
        let path = std::env::temp_dir().join("hilo-absent-config.json");
        let (config, reported) = load_config(Some(path.clone()))?;
        assert_eq!(reported, path);
        assert!(!path.exists());
        assert_eq!(config.keys, AppConfig::default().keys);
        Ok(())
    }

    #[test]
    fn stack_option_parses_cards() {
        let cli = Cli::parse_from(["hilo", "count", "--stack", "5h,K♦,7c"]);
        let Some(Command::Count(args)) = cli.command else {
            panic!("expected count");
        };
        let expected: Vec<Card> = ["5h", "kd", "7c"]
            .iter()
            .map(|text| text.parse().expect("valid card"))
            .collect();
        assert_eq!(args.stack, expected);

        assert!(Cli::try_parse_from(["hilo", "count", "--stack", "5x"]).is_err());
    }

    #[test]
    fn stacked_cards_lead_the_first_deck() -> Result<()> {
        let stack: Vec<Card> = vec!["5h".parse()?, "kd".parse()?, "7c".parse()?];
        let mut factory = DeckFactory::seeded(4);
        let deck = first_deck(&mut factory, &stack)?;
        assert_eq!(&deck.cards()[..3], stack.as_slice());

        let mut session = CountingSession::with_deck(factory, ExhaustionPolicy::Finish, deck);
        for _ in 0..3 {
            session.deal_next();
        }
        assert_eq!(session.running_count(), 0);

        let repeated = [stack[0], stack[0]];
        assert!(first_deck(&mut DeckFactory::seeded(4), &repeated).is_err());
        Ok(())
    }
}
