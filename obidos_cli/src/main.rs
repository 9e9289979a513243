use std::path::PathBuf;

use clap::{Parser, Subcommand};
use obidos::{ConsoleRenderer, TileId};
use obidos_cli::{Config, Game, GameResult, PlayerConfig, PlayerKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info", global = true)]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    /// Play a game in the terminal
    Play(PlayArgs),
    /// Print every tile of the base game
    PrintDeck {
        /// Cells along each side of a tile, best odd and at least 3
        #[arg(short, long, default_value_t = 9)]
        scale: usize,
    },
}

#[derive(clap::Args)]
struct PlayArgs {
    /// Add a player of this kind, can be repeated
    #[arg(short, long = "player", value_enum)]
    players: Vec<PlayerKind>,

    /// Path to a JSON file with a list of players
    #[arg(long)]
    players_config: Option<PathBuf>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Cells along each side of a tile, best odd and at least 3
    #[arg(long, default_value_t = 7)]
    scale: usize,

    /// Width of the terminal in columns
    #[arg(long, default_value_t = 80)]
    width: usize,
}

fn play(args: PlayArgs) -> anyhow::Result<()> {
    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut config = Config {
        rng: StdRng::seed_from_u64(seed),
        renderer: ConsoleRenderer::new(args.scale),
        terminal_width: args.width,
    };

    let mut player_configs = match &args.players_config {
        Some(path) => PlayerConfig::load(path)?,
        None => Vec::new(),
    };
    let offset = player_configs.len();
    player_configs.extend(args.players.iter().enumerate().map(|(idx, &kind)| PlayerConfig {
        nick: format!("Player {}", offset + idx + 1),
        kind,
        seed: None,
    }));
    if player_configs.is_empty() {
        player_configs.push(PlayerConfig {
            nick: String::from("Player 1"),
            kind: PlayerKind::Cli,
            seed: None,
        });
    }

    let players = player_configs
        .iter()
        .map(|player_config| player_config.make_player(&mut config))
        .collect();
    let mut game = Game::new(players, &mut config.rng);
    let result = game.play()?;

    for line in config.renderer.render_board(game.board(), &[]) {
        println!("{}", line);
    }
    match result {
        GameResult::Finished(summary) => println!(
            "Game over: {} tiles placed, {} discarded in {} turns",
            summary.tiles_placed, summary.tiles_discarded, summary.turns
        ),
        GameResult::IllegalMoveByPlayer { player_idx, err } => {
            warn!(
                player = &player_configs[player_idx].nick,
                "Illegal move by player"
            );
            let mut err_dyn = &err as &dyn std::error::Error;
            while let Some(src_err) = err_dyn.source() {
                warn!("{}", err_dyn);
                err_dyn = src_err;
            }
            warn!("{}", err_dyn);
        }
    }
    Ok(())
}

fn print_deck(scale: usize) {
    let renderer = ConsoleRenderer::new(scale);
    for id in TileId::ALL {
        let label = id.to_string();
        for line in renderer.render_tile_with_label(id.tile(), &label) {
            println!("{}", line);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    match args.command {
        Command::Play(play_args) => play(play_args),
        Command::PrintDeck { scale } => {
            print_deck(scale);
            Ok(())
        }
    }
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    // Logs go to stderr, stdout is for the board
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
