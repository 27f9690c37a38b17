// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker cards types.
//!
//! This crate defines types to create cards:
//!
//! ```
//! # use showdown_cards::{Card, Rank, Suit};
//! let ah = Card::new(Rank::Ace, Suit::Hearts);
//! let kd = Card::new(Rank::King, Suit::Diamonds);
//! ```
//!
//! to parse them from text, two characters per card with no separators:
//!
//! ```
//! # use showdown_cards::{parse_cards, Card, Rank, Suit};
//! let cards = parse_cards("AhKD7♠").unwrap();
//! assert_eq!(cards[0], Card::new(Rank::Ace, Suit::Hearts));
//! assert_eq!(cards[1], Card::new(Rank::King, Suit::Diamonds));
//! assert_eq!(cards[2], Card::new(Rank::Seven, Suit::Spades));
//! ```
//!
//! and a [Deck] type for building single or multi deck card pools,
//! shuffling, and removing known cards before an enumeration:
//!
//! ```
//! # use showdown_cards::{parse_cards, Deck};
//! let mut deck = Deck::default();
//! for c in parse_cards("ASAH").unwrap() {
//!     deck.remove(c);
//! }
//! assert_eq!(deck.count(), 50);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod deck;
pub use deck::{Card, Deck, Rank, Suit, parse_cards};
