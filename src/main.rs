//! `shuffle` - shuffle decks from the command line.
//!
//! Runs the in-memory service, so counters, streaks and unlocks accumulate
//! across the `--count` shuffles of one invocation.

use card_shuffle_engine::client_adapter::to_client_view;
use card_shuffle_engine::config::ServiceConfig;
use card_shuffle_engine::service::{
    FixedIdentity, InMemoryStore, ShuffleOutcome, ShuffleService, SystemClock,
};
use card_shuffle_engine::telemetry::init_tracing;
use card_shuffle_engine::ShuffleRequest;
use clap::Parser;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "shuffle")]
#[command(about = "Shuffle a 52-card deck and report patterns and achievements")]
struct Args {
    /// Seed for the first shuffle; later shuffles use seed + 1, seed + 2, ...
    #[arg(long)]
    seed: Option<u64>,

    /// Number of shuffles to run
    #[arg(short, long, default_value = "1")]
    count: u32,

    /// Print each shuffle as client JSON instead of text
    #[arg(long)]
    json: bool,

    /// User to shuffle as; anonymous when omitted
    #[arg(short, long)]
    user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn print_text(n: u32, outcome: &ShuffleOutcome) {
    let result = &outcome.result;
    println!("#{n}  {}", result.shuffle_id);
    for row in result.deck.cards().chunks(13) {
        let codes: Vec<String> = row.iter().map(|c| format!("{:>3}", c.to_string())).collect();
        println!("  {}", codes.join(" "));
    }
    if result.patterns.is_empty() {
        println!("  no patterns");
    }
    for p in &result.patterns {
        match &p.indices {
            Some(ix) => println!("  * {} {:?}", p.name, ix),
            None     => println!("  * {}", p.name),
        }
    }
    for a in &outcome.new_achievements {
        println!("  + {} - {}", a.name, a.description);
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    init_tracing(filter, false);

    let mut config = ServiceConfig::from_env()?;
    // One local caller: never throttle the shuffles it asked for.
    config.rate_limit = config.rate_limit.max(args.count);
    debug!(?config, "loaded config");

    let identity = match args.user {
        Some(ref id) => FixedIdentity::user(id.clone()),
        None         => FixedIdentity::anonymous(),
    };
    let service = ShuffleService::new(InMemoryStore::new(), identity, SystemClock, config);

    for n in 1..=args.count {
        let request = match args.seed {
            Some(seed) => ShuffleRequest::seeded(seed.wrapping_add(u64::from(n - 1))),
            None       => ShuffleRequest::new(),
        };
        let outcome = service.shuffle(request)?;

        if args.json {
            let board = service.achievement_board()?;
            println!("{}", serde_json::to_string_pretty(&to_client_view(&outcome.result, &board))?);
        } else {
            print_text(n, &outcome);
        }
    }

    if args.user.is_some() {
        let stats = service.stats()?;
        info!(total = stats.total_shuffles, achievements = stats.achievements_count, "done");
        if !args.json {
            println!(
                "shuffles: {}  streak: {}  achievements: {}",
                stats.total_shuffles, stats.shuffle_streak, stats.achievements_count
            );
        }
    }
    Ok(())
}
