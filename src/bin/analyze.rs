use chess_phase_engine::{DispatchResult, EngineConfig, PhaseDispatcher, Position, StrategyKind};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyChoice {
    /// Let the phase dispatcher decide
    Auto,
    AlphaBeta,
    Lookahead,
    Frontier,
}

impl StrategyChoice {
    fn kind(self) -> Option<StrategyKind> {
        match self {
            StrategyChoice::Auto => None,
            StrategyChoice::AlphaBeta => Some(StrategyKind::AlphaBeta),
            StrategyChoice::Lookahead => Some(StrategyKind::Lookahead),
            StrategyChoice::Frontier => Some(StrategyKind::FrontierMeeting),
        }
    }
}

/// Chess Phase Engine - position analyzer
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Position to analyze
    #[arg(long, default_value = START_FEN)]
    fen: String,

    /// Search strategy
    #[arg(long, value_enum, default_value_t = StrategyChoice::Auto)]
    strategy: StrategyChoice,

    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the alpha-beta search depth
    #[arg(long)]
    depth: Option<u32>,

    /// Play this many plies against itself from the position
    #[arg(long, default_value_t = 1)]
    plies: u32,

    /// Print every evaluation term of the position
    #[arg(long)]
    breakdown: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> chess_phase_engine::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(depth) = args.depth {
        config.alpha_beta.depth = depth;
    }
    config.validate()?;
    Ok(config)
}

fn print_breakdown(dispatcher: &PhaseDispatcher, position: &Position) {
    let breakdown = dispatcher.evaluator().breakdown(position);
    println!("Evaluation breakdown (raw terms, Black-positive):");
    println!("  material:       {:>10.2}", breakdown.material);
    println!("  center control: {:>10.2}", breakdown.center_control);
    println!("  pawn structure: {:>10.2}", breakdown.pawn_structure);
    println!("  king safety:    {:>10.2}", breakdown.king_safety);
    println!("  activity:       {:>10.2}", breakdown.piece_activity);
    println!("  threats:        {:>10.2}", breakdown.threats);
    println!("  side to move:   {:>10.0}", breakdown.multiplier);
    println!("  total:          {:>10.2}", breakdown.total);
}

fn run(args: Args) -> chess_phase_engine::Result<()> {
    let config = load_config(&args)?;
    let mut position = Position::from_fen(&args.fen)?;
    let mut dispatcher = PhaseDispatcher::new(&config);

    println!("Chess Phase Engine - Position Analyzer");
    println!("======================================");
    println!("Position: {}", position.fen());
    println!("Side to move: {:?}", position.side_to_move());

    if args.breakdown {
        print_breakdown(&dispatcher, &position);
    }

    for ply in 0..args.plies {
        if let Some(termination) = position.outcome() {
            println!("Game over: {:?}", termination);
            break;
        }

        let DispatchResult {
            strategy: kind,
            result,
        } = dispatcher.search_with(&position, args.strategy.kind());

        let Some(best) = result.best_move else {
            println!("No legal moves");
            break;
        };

        let score = result
            .score
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}. {:<6} strategy: {:<24} score: {:>10} nodes: {:>8} time: {:?}",
            ply + 1,
            best.to_string(),
            kind.name(),
            score,
            result.nodes_explored,
            result.time_elapsed
        );

        position.try_push(best)?;
    }

    if args.plies > 1 {
        println!("Final position: {}", position.fen());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
