// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker hand strength and equity evaluation.
//!
//! The crate classifies 5 to 7 card hands into totally ordered
//! [strengths](HandStrength) under high and ace-to-five low rules, and
//! computes win, tie, and loss odds for competing partially known hands
//! by enumerating or sampling the unknown cards.
//!
//! To compare two hands evaluate them:
//!
//! ```
//! use showdown_eval::{HandRank, hand_strength};
//! use showdown_cards::parse_cards;
//!
//! let trips = hand_strength(&parse_cards("7C7D7H2SKC").unwrap());
//! let flush = hand_strength(&parse_cards("2H5H9HJHKH").unwrap());
//! assert_eq!(trips.rank(), HandRank::Trips);
//! assert!(flush > trips);
//! ```
//!
//! to compute equity set up a run from the known cards and pick exact
//! enumeration or converging sampling:
//!
//! ```
//! use showdown_eval::{Equity, GameKind, StrengthCache};
//! use showdown_cards::parse_cards;
//!
//! let board = parse_cards("2C7D9HTS").unwrap();
//! let hands = vec![
//!     parse_cards("ASAH").unwrap(),
//!     parse_cards("KDKC").unwrap(),
//! ];
//!
//! let equity = Equity::new(GameKind::Holdem, board, hands).unwrap();
//! let mut cache = StrengthCache::new();
//!
//! let tally = equity.exact(&mut cache);
//! assert!(tally[0].win_odds() > tally[1].win_odds());
//! ```
//!
//! The **`parallel`** feature adds [Equity::par_exact] which partitions
//! the enumeration across worker threads and merges their tallies.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod cache;
pub mod combo;
pub mod equity;
pub mod game;
pub mod strength;

pub use cache::StrengthCache;
pub use combo::{Combinations, MultiCombinations};
pub use equity::{Equity, Tally};
pub use game::{Game, GameKind, StrengthFn};
pub use strength::{CardStrength, HandRank, HandStrength, hand_strength, low_hand_strength};

// Reexport cards types.
pub use showdown_cards::{Card, Deck, Rank, Suit};
