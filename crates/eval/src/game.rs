// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Game variant descriptors.
//!
//! A [Game] tells the equity engine how many cards a hand and the board
//! take and how a player's strength is computed once every card is
//! dealt. Variants with a low strength function split the pot between
//! the best high and the best qualifying low hand.
use anyhow::bail;
use std::{fmt, str::FromStr};

use showdown_cards::Card;

use crate::{
    cache::StrengthCache,
    combo::Combinations,
    strength::{HandRank, HandStrength, low_hand_strength},
};

/// Computes a player's strength from a full board and a full hand.
pub type StrengthFn = fn(&mut StrengthCache, board: &[Card], hand: &[Card]) -> HandStrength;

/// Static description of a poker variant.
#[derive(Debug, Clone, Copy)]
pub struct Game {
    /// The variant display name.
    pub name: &'static str,
    /// Cards in a full hand.
    pub hand_size: usize,
    /// Cards on a full board.
    pub board_size: usize,
    /// The high strength function, if the variant plays a high hand.
    pub hi: Option<StrengthFn>,
    /// The low strength function, if the variant plays a low hand.
    pub lo: Option<StrengthFn>,
}

impl Game {
    /// Checks if this variant splits the pot between high and low.
    pub fn is_hi_lo(&self) -> bool {
        self.hi.is_some() && self.lo.is_some()
    }
}

/// A selectable game variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    /// Texas Hold'em.
    Holdem = 0,
    /// Omaha.
    Omaha,
    /// Omaha Hi/Lo, eight-or-better low.
    OmahaHiLo,
    /// 7-card Stud.
    Stud7,
    /// 7-card Stud Hi/Lo, eight-or-better low.
    Stud7HiLo,
    /// 5-card Stud.
    Stud5,
    /// Razz, ace-to-five low only.
    Razz,
}

impl GameKind {
    /// Returns all game kinds.
    pub fn kinds() -> impl Iterator<Item = GameKind> {
        use GameKind::*;
        [Holdem, Omaha, OmahaHiLo, Stud7, Stud7HiLo, Stud5, Razz].into_iter()
    }

    /// This kind's descriptor.
    pub fn game(self) -> &'static Game {
        &GAMES[self as usize]
    }

    /// The tag that selects this kind in text form.
    pub fn tag(self) -> &'static str {
        match self {
            GameKind::Holdem => "holdem",
            GameKind::Omaha => "omaha",
            GameKind::OmahaHiLo => "omahahl",
            GameKind::Stud7 => "stud7",
            GameKind::Stud7HiLo => "stud7hl",
            GameKind::Stud5 => "stud5",
            GameKind::Razz => "razz",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for GameKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match GameKind::kinds().find(|k| k.tag() == s) {
            Some(kind) => Ok(kind),
            None => bail!("unknown game '{s}'"),
        }
    }
}

static GAMES: [Game; 7] = [
    Game {
        name: "Texas Hold'em",
        hand_size: 2,
        board_size: 5,
        hi: Some(holdem_hi),
        lo: None,
    },
    Game {
        name: "Omaha",
        hand_size: 4,
        board_size: 5,
        hi: Some(omaha_hi),
        lo: None,
    },
    Game {
        name: "Omaha Hi/Lo",
        hand_size: 4,
        board_size: 5,
        hi: Some(omaha_hi),
        lo: Some(omaha_lo),
    },
    Game {
        name: "7-card Stud",
        hand_size: 7,
        board_size: 0,
        hi: Some(stud_hi),
        lo: None,
    },
    Game {
        name: "7-card Stud Hi/Lo",
        hand_size: 7,
        board_size: 0,
        hi: Some(stud_hi),
        lo: Some(stud_lo),
    },
    Game {
        name: "5-card Stud",
        hand_size: 5,
        board_size: 0,
        hi: Some(stud_hi),
        lo: None,
    },
    Game {
        name: "Razz",
        hand_size: 7,
        board_size: 0,
        hi: None,
        lo: Some(razz_lo),
    },
];

fn holdem_hi(cache: &mut StrengthCache, board: &[Card], hand: &[Card]) -> HandStrength {
    let mut cards = [Card::default(); 7];
    cards[..2].copy_from_slice(hand);
    cards[2..].copy_from_slice(board);
    cache.strength(&cards)
}

/// The best strength over the C(4,2) two card pocket picks.
fn omaha_hi(cache: &mut StrengthCache, board: &[Card], hand: &[Card]) -> HandStrength {
    let mut pairs = Combinations::new(hand, 2).expect("omaha hand holds four cards");
    let mut best = HandStrength::NO_HAND;

    while pairs.has_next() {
        let mut cards = [Card::default(); 7];
        cards[..2].copy_from_slice(&pairs.next_combo());
        cards[2..].copy_from_slice(board);
        best = best.max(cache.strength(&cards));
    }

    best
}

/// The best qualifying low over the two card pocket picks.
fn omaha_lo(_cache: &mut StrengthCache, board: &[Card], hand: &[Card]) -> HandStrength {
    let pairs = Combinations::new(hand, 2).expect("omaha hand holds four cards");
    let mut best: Option<HandStrength> = None;

    for pair in pairs {
        let mut cards = [Card::default(); 7];
        cards[..2].copy_from_slice(&pair);
        cards[2..].copy_from_slice(board);

        let strength = low_hand_strength(&cards, true);
        if strength.rank() != HandRank::NoHand {
            best = Some(best.map_or(strength, |b| b.min(strength)));
        }
    }

    best.unwrap_or(HandStrength::NO_HAND)
}

fn stud_hi(cache: &mut StrengthCache, _board: &[Card], hand: &[Card]) -> HandStrength {
    cache.strength(hand)
}

fn stud_lo(_cache: &mut StrengthCache, _board: &[Card], hand: &[Card]) -> HandStrength {
    low_hand_strength(hand, true)
}

fn razz_lo(_cache: &mut StrengthCache, _board: &[Card], hand: &[Card]) -> HandStrength {
    low_hand_strength(hand, false)
}
