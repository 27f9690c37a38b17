// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker equity calculator.
//!
//! Computes win, tie, and loss odds for two or more partially known
//! hands, enumerating every completion of the unknown cards or sampling
//! them until the odds converge:
//!
//! ```bash
//! $ showdown-cli --board 7D2C ASAH KDKC
//! Game - Texas Hold'em
//! Board - 7D2C
//! Player  1 - win:  91.71%  tie:   0.28%  lose:   8.01%  ASAH
//! Player  2 - win:   8.01%  tie:   0.28%  lose:  91.71%  KDKC
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::{Context, Result};
use clap::Parser;
use rand::{SeedableRng, rngs::SmallRng};

use showdown_cards::{Card, parse_cards};
use showdown_eval::{Equity, GameKind, StrengthCache, Tally};

#[derive(Debug, Parser)]
struct Cli {
    /// The game to evaluate: holdem, omaha, omahahl, stud7, stud7hl,
    /// stud5, or razz.
    #[clap(long, short, default_value = "holdem")]
    game: GameKind,
    /// The known community cards, e.g. "AS7D2C".
    #[clap(long, short, default_value = "")]
    board: String,
    /// Approximate the odds with converging Monte Carlo sampling.
    #[clap(long)]
    approx: bool,
    /// Each player's known hole cards, one run of cards per player.
    #[clap(required = true, num_args = 2..)]
    hands: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let game = cli.game.game();
    let board = parse_cards(&cli.board).context("invalid board")?;
    let hands = cli
        .hands
        .iter()
        .map(|h| parse_cards(h).with_context(|| format!("invalid hand \"{h}\"")))
        .collect::<Result<Vec<_>>>()?;

    let equity = Equity::new(cli.game, board.clone(), hands.clone())?;
    let mut cache = StrengthCache::new();

    let (tally, samples) = if cli.approx {
        let mut rng = SmallRng::from_os_rng();
        let (tally, samples) = equity.approximate(&mut cache, &mut rng);
        (tally, Some(samples))
    } else {
        log::info!("enumerating {} deals", equity.total_deals());
        (equity.exact(&mut cache), None)
    };

    println!("Game - {}", game.name);
    if !board.is_empty() {
        println!("Board - {}", cards_text(&board));
    }
    if let Some(samples) = samples {
        println!("Samples - {samples}");
    }

    for (player, tally) in tally.iter().enumerate() {
        print_player(player, tally, &hands[player], game.is_hi_lo());
    }

    Ok(())
}

fn cards_text(cards: &[Card]) -> String {
    cards.iter().map(|c| c.to_string()).collect()
}

fn print_player(player: usize, tally: &Tally, hand: &[Card], hi_lo: bool) {
    println!(
        "Player {:2} - win: {:6.2}%  tie: {:6.2}%  lose: {:6.2}%  {}",
        player + 1,
        tally.win_odds(),
        tally.tie_odds(),
        tally.loss_odds(),
        cards_text(hand)
    );

    if hi_lo {
        println!(
            "            scoops: {}  hi win/tie: {}/{}  lo win/tie: {}/{}",
            tally.scoops, tally.hi_wins, tally.hi_ties, tally.lo_wins, tally.lo_ties
        );
    }
}
