// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
//
// Hand rank frequencies over every k-card hand, run with:
//
// ```bash
// $ cargo r --release --example ranks -- --size 5
// ...
// Straight Flush 0.00001539
//          Quads 0.00024010
//     Full House 0.00144058
//          Flush 0.00196540
//       Straight 0.00392465
//          Trips 0.02112845
//       Two Pair 0.04753902
//           Pair 0.42256903
//      High Card 0.50117739
// ```
use clap::Parser;
use std::time::Instant;

use showdown_eval::{Combinations, Deck, HandRank, hand_strength};

#[derive(Debug, Parser)]
struct Args {
    /// Hand size, 5 to 7 cards.
    #[clap(long, short, default_value_t = 5)]
    size: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let now = Instant::now();
    let deck = Deck::default();
    let mut counts = [0u64; 10];

    for hand in Combinations::new(deck.cards(), args.size)? {
        counts[hand_strength(&hand).rank() as usize] += 1;
    }

    let total = counts.iter().sum::<u64>();
    let elapsed = now.elapsed().as_secs_f64();
    println!("Total hands    {total}");
    println!("Elapsed:       {elapsed:.3}s");
    println!("Hands/sec:     {:.0}\n", total as f64 / elapsed);

    for rank in HandRank::descending() {
        let hits = counts[rank as usize];
        println!("{:>14} {:.8}", rank.to_string(), hits as f64 / total as f64);
    }

    Ok(())
}
