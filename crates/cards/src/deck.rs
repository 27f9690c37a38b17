// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker cards definitions.
use anyhow::{Result, anyhow, bail};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Card rank.
///
/// Ranks are ordinal with the ace at zero, the order required by
/// ace-to-five low evaluation. High-hand evaluation maps ranks to a
/// strength scale where the ace moves above the king, so this ordering
/// carries no "ace is weak" meaning by itself.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Ace
    #[default]
    Ace = 0,
    /// Deuce
    Deuce,
    /// Trey
    Trey,
    /// Four
    Four,
    /// Five
    Five,
    /// Six
    Six,
    /// Seven
    Seven,
    /// Eight
    Eight,
    /// Nine
    Nine,
    /// Ten
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
}

impl Rank {
    /// Returns all ranks in ordinal order.
    pub fn ranks() -> impl DoubleEndedIterator<Item = Rank> {
        use Rank::*;
        [
            Ace, Deuce, Trey, Four, Five, Six, Seven, Eight, Nine, Ten, Jack, Queen, King,
        ]
        .into_iter()
    }

    /// This rank position in a 13-bit rank set.
    #[inline]
    pub fn mask(&self) -> u16 {
        1 << (*self as u16)
    }

    /// Parses a rank character.
    pub fn from_char(c: char) -> Result<Rank> {
        let rank = match c {
            'a' | 'A' => Rank::Ace,
            '2' => Rank::Deuce,
            '3' => Rank::Trey,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            't' | 'T' => Rank::Ten,
            'j' | 'J' => Rank::Jack,
            'q' | 'Q' => Rank::Queen,
            'k' | 'K' => Rank::King,
            _ => bail!("unknown rank '{c}'"),
        };

        Ok(rank)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self {
            Rank::Ace => 'A',
            Rank::Deuce => '2',
            Rank::Trey => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        };

        write!(f, "{rank}")
    }
}

/// Card suit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit.
    #[default]
    Clubs = 0,
    /// Diamonds suit.
    Diamonds,
    /// Hearts suit.
    Hearts,
    /// Spades suit.
    Spades,
}

impl Suit {
    /// Returns all suits.
    pub fn suits() -> impl DoubleEndedIterator<Item = Suit> {
        [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades].into_iter()
    }

    /// This suit position in a 4-bit suit set.
    #[inline]
    pub fn mask(&self) -> u8 {
        1 << (*self as u8)
    }

    /// Parses a suit character, letters or symbols.
    pub fn from_char(c: char) -> Result<Suit> {
        let suit = match c {
            'c' | 'C' | '♣' => Suit::Clubs,
            'd' | 'D' | '♦' => Suit::Diamonds,
            'h' | 'H' | '♥' => Suit::Hearts,
            's' | 'S' | '♠' => Suit::Spades,
            _ => bail!("unknown suit '{c}'"),
        };

        Ok(suit)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suit = match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        };

        write!(f, "{suit}")
    }
}

/// A Poker card.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    /// Creates a card given a rank and suit.
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    /// Returns the card rank.
    #[inline]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Returns the card suit.
    #[inline]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// This card position in a 52-bit deck set.
    ///
    /// The same card from different decks maps to the same bit, so a set
    /// of masks identifies a card multiset independently of order.
    #[inline]
    pub fn mask(&self) -> u64 {
        1 << (self.suit as u64 * 13 + self.rank as u64)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let rank = chars.next().ok_or_else(|| anyhow!("empty card text"))?;
        let suit = chars
            .next()
            .ok_or_else(|| anyhow!("missing suit in '{s}'"))?;
        if chars.next().is_some() {
            bail!("trailing text in card '{s}'");
        }

        Ok(Card::new(Rank::from_char(rank)?, Suit::from_char(suit)?))
    }
}

/// Parses a run of cards, one rank character and one suit character per
/// card with no separators, e.g. `"ASKD7c"`.
pub fn parse_cards(s: &str) -> Result<Vec<Card>> {
    let mut cards = Vec::new();
    let mut chars = s.chars();

    while let Some(r) = chars.next() {
        let rank = Rank::from_char(r)?;
        let suit = match chars.next() {
            Some(c) => Suit::from_char(c)?,
            None => bail!("missing suit for rank '{r}' in \"{s}\""),
        };
        cards.push(Card::new(rank, suit));
    }

    Ok(cards)
}

/// A cards deck.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The number of cards in a single deck.
    pub const SIZE: usize = 52;

    /// Creates a pool of `decks` stacked decks.
    pub fn with_decks(decks: usize) -> Self {
        let mut cards = Vec::with_capacity(Self::SIZE * decks);
        for _ in 0..decks {
            cards.extend(Deck::default());
        }
        Self { cards }
    }

    /// Creates a new shuffled deck.
    pub fn new_and_shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.shuffle(rng);
        deck
    }

    /// Shuffles the deck with a uniform random permutation.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Deals a card from the deck.
    pub fn deal(&mut self) -> Card {
        self.cards.pop().unwrap()
    }

    /// Checks if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards in the deck.
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    /// Removes the first card equal to `card`, keeping the deck order.
    ///
    /// A multi deck pool holds each card more than once, only one copy
    /// is removed per call. Removing a card that is not in the deck is
    /// a no-op.
    pub fn remove(&mut self, card: Card) {
        if let Some(pos) = self.cards.iter().position(|c| c == &card) {
            self.cards.remove(pos);
        }
    }

    /// The remaining cards in deck order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Consumes the deck returning its cards.
    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        let cards = Suit::suits()
            .flat_map(|s| Rank::ranks().map(move |r| Card::new(r, s)))
            .collect::<Vec<_>>();
        Self { cards }
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}
