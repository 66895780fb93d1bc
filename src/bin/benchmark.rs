use clap::Parser;
use colored::Colorize;
use flexi_logger::Logger;
use mcts::games::nim::NimState;
use mcts::runner::printing_observer;
use mcts::{GameRunner, MctsAgent, MctsOptions, Player, RandomPlayer};
use std::error::Error;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of games to play (default: 10)
    #[arg(long, default_value_t = 10)]
    num_games: usize,

    /// Stones on the heap at the start of each game (default: 21)
    #[arg(long, default_value_t = 21)]
    heap: u32,

    /// Most stones a single move may take (default: 3)
    #[arg(long, default_value_t = 3)]
    max_take: u32,

    /// MCTS iterations per move (default: 10,000)
    #[arg(long, default_value_t = 10_000)]
    iterations: usize,

    /// Random rollouts per iteration (default: 1)
    #[arg(long, default_value_t = 1)]
    rollouts: usize,

    /// Worker threads per search. Use 0 for one per CPU core.
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// UCB1 exploration constant (default: 1.4)
    #[arg(long, default_value_t = 1.4)]
    exploration: f64,

    /// Random number seed. Seeds from the OS when absent.
    #[arg(long)]
    seed: Option<u64>,

    /// Print every move and the resulting heap.
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    print_moves: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let _logger = Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let threads = if args.threads == 0 {
        num_cpus::get()
    } else {
        args.threads
    };

    println!("Parallel MCTS Agent - Benchmark Tool");
    println!("====================================");
    println!("Game: Nim (heap {}, take up to {})", args.heap, args.max_take);
    println!("Games: {}", args.num_games);
    println!("Iterations: {}", args.iterations);
    println!("Rollouts per iteration: {}", args.rollouts);
    println!("Threads: {}", threads);
    println!("------------------------------------");

    #[cfg(debug_assertions)]
    println!("WARNING: Running in debug mode. Performance will be significantly lower.\nUse --release for accurate benchmarks.\n");

    let mut mcts_wins = 0;
    let mut total_time = Duration::ZERO;
    for game in 0..args.num_games {
        // Alternate seats so the agent plays both sides.
        let mcts_player = if game % 2 == 0 { 1 } else { -1 };
        let mut options = MctsOptions::default()
            .with_exploration_constant(args.exploration)
            .with_iterations(args.iterations)
            .with_rollouts_per_iteration(args.rollouts)
            .with_threads(threads);
        if let Some(seed) = args.seed {
            options = options.with_seed(seed.wrapping_add(game as u64));
        }

        let agent: Box<dyn Player<NimState>> = Box::new(MctsAgent::<NimState>::new(mcts_player, options)?);
        let random: Box<dyn Player<NimState>> = Box::new(match args.seed {
            Some(seed) => RandomPlayer::with_seed(seed.wrapping_mul(31).wrapping_add(game as u64)),
            None => RandomPlayer::new(),
        });
        let mut runner = if mcts_player == 1 {
            GameRunner::new(agent, random)
        } else {
            GameRunner::new(random, agent)
        };
        if args.print_moves {
            runner.add_observer(printing_observer());
        }

        let start = Instant::now();
        let outcome = runner.play(NimState::new(args.heap, args.max_take))?;
        let duration = start.elapsed();
        total_time += duration;

        let result = if outcome.winner == mcts_player {
            mcts_wins += 1;
            "MCTS".green()
        } else {
            "Random".red()
        };
        println!(
            "Game {:>3}: {} wins after {} moves ({:.3}s)",
            game + 1,
            result,
            outcome.moves,
            duration.as_secs_f64()
        );
    }

    print_summary(mcts_wins, args.num_games, total_time);
    Ok(())
}

fn print_summary(mcts_wins: usize, games: usize, total_time: Duration) {
    let per_game = if games > 0 {
        total_time.as_secs_f64() / games as f64
    } else {
        0.0
    };
    println!("------------------------------------");
    println!("Results:");
    println!("  MCTS wins: {}/{}", mcts_wins, games);
    println!("  Total time: {:.3}s", total_time.as_secs_f64());
    println!("  Time per game: {:.3}s", per_game);
}
