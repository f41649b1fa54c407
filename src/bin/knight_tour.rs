//! Knight's Tour solver
//!
//! Runs the MCTS search from (0, 0) on an n×n board and writes the results
//! to text files in the output directory.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use flexi_logger::Logger;
use knight_tour::core::{Board, TourRng};
use knight_tour::mcts::{DepthRatio, KnightSearch, Outcome, SearchConfig, SearchError, TimeBudget};
use knight_tour::report::{self, BoardGrid, MemoryReport, MovesLog, TourPath};

#[derive(Parser, Debug)]
#[command(name = "knight-tour")]
#[command(about = "Search for an open knight's tour with Monte Carlo Tree Search")]
struct Args {
    /// Board size n (prompted for if omitted)
    #[arg(short, long)]
    size: Option<i64>,

    /// Time budget in minutes (prompted for if omitted)
    #[arg(short, long)]
    minutes: Option<i64>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of tree nodes before giving up
    #[arg(long, default_value_t = SearchConfig::default().max_nodes)]
    max_nodes: usize,

    /// UCT exploration constant
    #[arg(long, default_value_t = std::f64::consts::SQRT_2)]
    exploration: f64,

    /// Directory for moves.txt, path.txt, board.txt and OutOfMem.txt
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn prompt(label: &str) -> Result<i64> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        bail!("no value given for {}", label);
    }
    line.trim()
        .parse()
        .with_context(|| format!("invalid {}: {:?}", label, line.trim()))
}

fn main() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let args = Args::parse();

    let size = match args.size {
        Some(size) => size,
        None => prompt("Enter the size of the board")?,
    };
    let board = Board::new(size)?;

    let minutes = match args.minutes {
        Some(minutes) => minutes,
        None => prompt("Enter the time limit in minutes")?,
    };

    let config = SearchConfig::default()
        .with_time_budget(TimeBudget::from_minutes(minutes))
        .with_max_nodes(args.max_nodes)
        .with_exploration(args.exploration);

    let rng = match args.seed {
        Some(seed) => TourRng::new(seed),
        None => TourRng::from_entropy(),
    };
    log::info!(
        "Searching {}x{} board for {} minute(s), seed {}",
        size,
        size,
        minutes,
        rng.seed()
    );

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;
    let mut moves = MovesLog::create(args.output_dir.join(report::MOVES_FILE))?;

    let start = Instant::now();
    let mut search = KnightSearch::new(board, config, DepthRatio, rng);
    let result = search.run(&mut moves);
    let elapsed = start.elapsed();
    moves.into_inner()?;

    match result {
        Ok(Outcome::Solved(node)) => {
            let path = TourPath::from_tree(search.tree(), node);
            path.validate(&board)?;
            let grid = BoardGrid::from_path(&board, &path);
            report::write_solution(&args.output_dir, &path, &grid)?;
            println!("Solution found.");
            print!("{}", grid);
        }
        Ok(Outcome::NoSolution) => {
            println!("No solution found.");
        }
        Err(SearchError::OutOfMemory { stats, .. }) => {
            let report = MemoryReport::new(stats);
            report::write_memory_report(&args.output_dir, &report)?;
            eprint!("{}", report);
        }
        Err(err) => return Err(err.into()),
    }

    println!("Time spent: {:.3} seconds", elapsed.as_secs_f64());
    println!("Iterations: {}", search.stats().iterations);
    log::info!("{}", search.stats());

    Ok(())
}
