//! Double-dummy solver CLI: solve deals read from a file, or randomly
//! generated ones, and print their results.
//!
//! `file <path> [-c]` reads one deal per line, each line
//! `<trumps> <lead_seat> <hands>` with `hands` in the notation `notation`
//! module accepts. `random --seed S --hands N --deal D [-c]` generates N
//! deals of D cards per hand with a random trump and lead seat, mirroring
//! the original `Random::random_game`.

use bridge_solver::{
    get_node_count, notation, CutoffCache, Hands, PatternCache, Seat, Solver, Suit, CLUB, DIAMOND,
    EAST, HEART, NORTH, NOTRUMP, NUM_RANKS, NUM_SEATS, NUM_SUITS, SOUTH, SPADE, WEST,
};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "solver-diag")]
#[command(about = "Double-dummy solver for batches of deals")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve hands read from a file.
    File {
        /// File containing hands to solve
        path: String,
        /// Compact columnar output
        #[arg(short = 'c', long = "compact")]
        compact: bool,
    },
    /// Solve randomly generated hands.
    Random {
        /// Initial random number generator seed
        #[arg(short = 's', long = "seed", default_value_t = 1)]
        seed: u64,
        /// Number of hands to generate
        #[arg(short = 'n', long = "hands", default_value_t = 10)]
        hands: usize,
        /// Number of cards per hand in each deal
        #[arg(short = 'd', long = "deal", default_value_t = 8)]
        deal: usize,
        /// Compact columnar output
        #[arg(short = 'c', long = "compact")]
        compact: bool,
    },
}

/// One deal to solve: the hands, the trump suit, and who leads.
struct Game {
    trumps: Suit,
    next_seat: Seat,
    hands: Hands,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::File { path, compact } => run_file(&path, compact),
        Command::Random {
            seed,
            hands,
            deal,
            compact,
        } => run_random(seed, hands, deal, compact),
    };

    if let Err(message) = result {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

fn run_file(path: &str, compact: bool) -> Result<(), String> {
    let file = File::open(path).map_err(|e| format!("failed to open file: {e}"))?;
    let lines: Vec<String> = BufReader::new(file)
        .lines()
        .collect::<Result<_, _>>()
        .map_err(|e| format!("failed to read file: {e}"))?;

    let games = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_line(line))
        .collect::<Result<Vec<_>, _>>()?;

    let show_totals = compact && games.len() > 1;
    solve_games(games.into_iter(), compact, show_totals);
    Ok(())
}

fn run_random(seed: u64, num_hands: usize, deal_size: usize, compact: bool) -> Result<(), String> {
    if deal_size > NUM_RANKS {
        return Err(format!("deal size {deal_size} exceeds a hand's 13 cards"));
    }
    let games = (0..num_hands).map(move |i| random_game(seed.wrapping_add(i as u64), deal_size));
    solve_games(games, compact, compact);
    Ok(())
}

fn parse_line(line: &str) -> Result<Game, String> {
    let mut parts = line.split_whitespace();
    let trumps_str = parts
        .next()
        .ok_or_else(|| "empty line, expected '<trumps> <seat> <hands>'".to_string())?;
    let seat_str = parts
        .next()
        .ok_or_else(|| format!("malformed line: {line}"))?;
    let hands_str = parts
        .next()
        .ok_or_else(|| format!("malformed line: {line}"))?;

    let trumps = parse_trump(
        trumps_str
            .chars()
            .next()
            .ok_or_else(|| format!("missing trump suit in line: {line}"))?,
    )?;
    let next_seat = parse_seat(
        seat_str
            .chars()
            .next()
            .ok_or_else(|| format!("missing lead seat in line: {line}"))?,
    )?;
    let hands =
        notation::parse_hands(hands_str).map_err(|e| format!("invalid hands in line {line}: {e}"))?;

    Ok(Game {
        trumps,
        next_seat,
        hands,
    })
}

fn parse_trump(c: char) -> Result<Suit, String> {
    match c.to_ascii_uppercase() {
        'N' => Ok(NOTRUMP),
        'S' => Ok(SPADE),
        'H' => Ok(HEART),
        'D' => Ok(DIAMOND),
        'C' => Ok(CLUB),
        other => Err(format!("invalid trump suit '{other}'")),
    }
}

fn parse_seat(c: char) -> Result<Seat, String> {
    match c.to_ascii_uppercase() {
        'W' => Ok(WEST),
        'N' => Ok(NORTH),
        'E' => Ok(EAST),
        'S' => Ok(SOUTH),
        other => Err(format!("invalid seat '{other}'")),
    }
}

fn trump_to_char(trump: Suit) -> char {
    match trump {
        NOTRUMP => 'N',
        SPADE => 'S',
        HEART => 'H',
        DIAMOND => 'D',
        CLUB => 'C',
        _ => '?',
    }
}

fn seat_to_char(seat: Seat) -> char {
    match seat {
        WEST => 'W',
        NORTH => 'N',
        EAST => 'E',
        SOUTH => 'S',
        _ => '?',
    }
}

/// Deal `cards_per_hand` cards to each seat from a freshly shuffled deck,
/// then pick a random trump and lead seat, matching
/// `Random::random_game`/`Random::random_deal`.
fn random_game(seed: u64, cards_per_hand: usize) -> Game {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut deck: Vec<usize> = (0..NUM_SUITS * NUM_RANKS).collect();
    deck.shuffle(&mut rng);

    let mut hands = Hands::new();
    for seat in 0..NUM_SEATS {
        let base = seat * NUM_RANKS;
        for &card in &deck[base..base + cards_per_hand] {
            hands.hand_mut(seat).add(card);
        }
    }

    let trumps = rng.gen_range(0..=NUM_SUITS);
    let next_seat = rng.gen_range(0..NUM_SEATS);

    Game {
        trumps,
        next_seat,
        hands,
    }
}

fn solve_games(games: impl Iterator<Item = Game>, compact: bool, show_totals: bool) {
    if compact {
        println!(
            "{:<10}{:<10}{:<10}{:<10}{}",
            "trumps", "seat", "tricks", "elapsed", "hands"
        );
    }

    let mut total_ms: u128 = 0;
    let mut num_hands: u64 = 0;
    for game in games {
        total_ms += solve_game(&game, compact);
        num_hands += 1;
    }

    if !show_totals || num_hands == 0 {
        return;
    }
    let avg_ms = total_ms / num_hands as u128;
    println!();
    println!("total_elapsed_ms   {total_ms}");
    println!("avg_elapsed_ms     {avg_ms}");
}

fn solve_game(game: &Game, compact: bool) -> u128 {
    let mut cutoff_cache = CutoffCache::new(16);
    let mut pattern_cache = PatternCache::new(16);

    let solver = Solver::new(game.hands, game.trumps, game.next_seat);
    let start = Instant::now();
    let tricks_by_ns = solver.solve_with_caches(&mut cutoff_cache, &mut pattern_cache);
    let elapsed = start.elapsed();
    let elapsed_ms = elapsed.as_millis();

    let num_tricks = game.hands.num_tricks() as u8;
    let tricks_by_ew = num_tricks - tricks_by_ns;

    if compact {
        println!(
            "{:<10}{:<10}{:<10}{:<10}{}",
            trump_to_char(game.trumps),
            seat_to_char(game.next_seat),
            tricks_by_ns,
            elapsed_ms,
            notation::hands_to_string(&game.hands)
        );
    } else {
        // cutoff_cache (move-ordering hints) isn't the TPN table; its stats
        // aren't part of this labeled contract, only pattern_cache's are.
        let tpn_stats = pattern_cache.stats();
        println!("hands              {}", notation::hands_to_string(&game.hands));
        println!("trump_suit         {}", trump_to_char(game.trumps));
        println!("next_seat          {}", seat_to_char(game.next_seat));
        println!("best_tricks_by_ns  {tricks_by_ns}");
        println!("best_tricks_by_ew  {tricks_by_ew}");
        println!("nodes_explored     {}", get_node_count());
        println!("tpn_buckets        {}", tpn_stats.buckets);
        println!("tpn_entries        {}", tpn_stats.entries);
        println!("tpn_lookup_hits    {}", tpn_stats.lookup_hits);
        println!("tpn_lookup_misses  {}", tpn_stats.lookup_misses);
        println!("tpn_insert_hits    {}", tpn_stats.insert_hits);
        println!("tpn_insert_misses  {}", tpn_stats.insert_misses);
        println!("tpn_insert_reads   {}", tpn_stats.insert_reads);
        println!("elapsed_ms         {elapsed_ms}");
        println!();
    }

    elapsed_ms
}
