//! Count legal move tree leaves from the starting position
//!
//! ```console
//! $ cargo run --features perft-cli --bin perft -- 4
//! ```

use clap::Parser;

use mailbox::GameState;

#[derive(Debug, Parser)]
struct Args {
    /// How many plies deep to search
    #[arg(default_value_t = 4)]
    depth: u32,
}

fn main() {
    let args = Args::parse();
    let mut state = GameState::new_game();
    for depth in 1..=args.depth {
        let start = std::time::Instant::now();
        let nodes = mailbox::perft(&mut state, depth);
        println!(
            "perft({depth}) = {nodes} ({:.2?})",
            start.elapsed()
        );
    }
}
