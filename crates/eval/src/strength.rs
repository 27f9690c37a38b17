// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand strength evaluation.
//!
//! [hand_strength] classifies 5 to 7 cards under high rules,
//! [low_hand_strength] under ace-to-five low rules with an optional
//! eight-or-better qualifier. Both return a [HandStrength], a packed
//! integer that compares like the hand it encodes: bigger is a better
//! high hand, smaller is a better low hand.
use serde::{Deserialize, Serialize};
use std::fmt;

use showdown_cards::{Card, Rank};

/// The category of a poker hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// No classified hand, a failed low qualifier.
    NoHand = 0,
    /// High card.
    HighCard,
    /// One pair.
    Pair,
    /// Two pair.
    TwoPair,
    /// Three of a kind.
    Trips,
    /// Straight.
    Straight,
    /// Flush.
    Flush,
    /// Full house.
    FullHouse,
    /// Four of a kind.
    Quads,
    /// Straight flush.
    StraightFlush,
}

impl HandRank {
    /// Returns the playable categories from the strongest down.
    pub fn descending() -> impl Iterator<Item = HandRank> {
        use HandRank::*;
        [
            StraightFlush,
            Quads,
            FullHouse,
            Flush,
            Straight,
            Trips,
            TwoPair,
            Pair,
            HighCard,
        ]
        .into_iter()
    }

    fn from_bits(bits: u32) -> HandRank {
        use HandRank::*;
        match bits {
            0 => NoHand,
            1 => HighCard,
            2 => Pair,
            3 => TwoPair,
            4 => Trips,
            5 => Straight,
            6 => Flush,
            7 => FullHouse,
            8 => Quads,
            9 => StraightFlush,
            _ => panic!("invalid hand rank {bits}"),
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandRank::NoHand => "No Hand",
            HandRank::HighCard => "High Card",
            HandRank::Pair => "Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::Trips => "Trips",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::Quads => "Quads",
            HandRank::StraightFlush => "Straight Flush",
        };

        write!(f, "{name}")
    }
}

/// A rank on the 14 step tiebreak scale.
///
/// The scale extends the 13 rank ordinals with a high ace at the top:
/// 0 is the low ace, 1 the deuce, 12 the king, 13 the high ace. High
/// evaluation scans it from the top, low evaluation from the bottom, so
/// the ace can serve both ends without special cases.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardStrength(u8);

impl CardStrength {
    /// The ace counted low.
    pub const ACE_LOW: CardStrength = CardStrength(0);

    /// The ace counted high.
    pub const ACE_HIGH: CardStrength = CardStrength(13);

    /// Creates a strength from its scale value.
    pub fn new(value: u8) -> Self {
        assert!(value <= 13, "card strength {value} out of scale");
        Self(value)
    }

    /// This strength position in a 14-bit set.
    #[inline]
    pub fn mask(self) -> u16 {
        1 << self.0
    }

    /// The rank this strength stands for.
    #[inline]
    pub fn rank_index(self) -> usize {
        (self.0 % 13) as usize
    }

    /// The rank position in a 13-bit rank set.
    #[inline]
    pub fn rank_mask(self) -> u16 {
        1 << (self.0 % 13)
    }
}

impl From<Rank> for CardStrength {
    fn from(rank: Rank) -> Self {
        CardStrength(rank as u8)
    }
}

/// A totally ordered poker hand strength.
///
/// Packs the hand category and its tiebreaks in one integer:
///
/// ```text
///   +--------+--------+--------+--------+
///   |xxxxrrrr|aaaabbbb|kkkkkkkk|kkkkkkkk|
///   +--------+--------+--------+--------+
///   r = hand category
///   a = first card strength (e.g. the trips rank of a full house)
///   b = second card strength (e.g. the pair rank of a full house)
///   k = kicker strength set
/// ```
///
/// Two high strengths compare by plain integer order. Low strengths use
/// the same layout with the scan direction inverted, so the smaller
/// value is the better low hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandStrength(u32);

impl HandStrength {
    /// The strength of an unclassified hand, below every real one.
    pub const NO_HAND: HandStrength = HandStrength(0);

    /// Creates a strength from category, tiebreak strengths, and kickers.
    pub fn new(rank: HandRank, first: CardStrength, second: CardStrength, kickers: u16) -> Self {
        pack(rank, first.0, second.0, kickers)
    }

    /// Returns the hand category.
    pub fn rank(self) -> HandRank {
        HandRank::from_bits(self.0 >> 24)
    }

    /// The first tiebreak strength.
    pub fn first(self) -> CardStrength {
        CardStrength(((self.0 >> 20) & 0xf) as u8)
    }

    /// The second tiebreak strength.
    pub fn second(self) -> CardStrength {
        CardStrength(((self.0 >> 16) & 0xf) as u8)
    }

    /// The kicker strength set.
    pub fn kickers(self) -> u16 {
        self.0 as u16
    }
}

#[inline]
fn pack(rank: HandRank, first: u8, second: u8, kickers: u16) -> HandStrength {
    HandStrength((rank as u32) << 24 | (first as u32) << 20 | (second as u32) << 16 | kickers as u32)
}

/// Classifies 5 to 7 cards into a high hand strength.
///
/// The cards must hold no duplicates, duplicate handling belongs to the
/// deck the cards came from.
pub fn hand_strength(cards: &[Card]) -> HandStrength {
    use HandRank::*;

    let mut rank_set = 0u16;
    let mut suit_sets = [0u16; 4];
    let mut rank_count = [0u8; 13];
    let mut suit_count = [0u8; 4];

    for card in cards {
        rank_count[card.rank() as usize] += 1;
        suit_count[card.suit() as usize] += 1;
        suit_sets[card.suit() as usize] |= card.rank().mask();
        rank_set |= card.rank().mask();
    }

    // straight flush
    let best = suit_sets.iter().filter_map(|&set| find_straight(set)).max();
    if let Some(strength) = best {
        return pack(StraightFlush, strength, 0, 0);
    }

    // quads
    for s in (1..=13u8).rev() {
        let cs = CardStrength(s);
        if rank_count[cs.rank_index()] >= 4 {
            let kickers = high_kickers(rank_set & !cs.rank_mask(), 1);
            return pack(Quads, s, 0, kickers);
        }
    }

    // full house
    for hi in (1..=13u8).rev() {
        if rank_count[CardStrength(hi).rank_index()] >= 3 {
            for lo in (1..=13u8).rev() {
                if lo != hi && rank_count[CardStrength(lo).rank_index()] >= 2 {
                    return pack(FullHouse, hi, lo, 0);
                }
            }
        }
    }

    // flush, at most one suit can hold five of up to seven cards
    for (suit, &count) in suit_count.iter().enumerate() {
        if count >= 5 {
            return pack(Flush, 0, 0, high_kickers(suit_sets[suit], 5));
        }
    }

    // straight
    if let Some(strength) = find_straight(rank_set) {
        return pack(Straight, strength, 0, 0);
    }

    // trips
    for s in (1..=13u8).rev() {
        let cs = CardStrength(s);
        if rank_count[cs.rank_index()] >= 3 {
            let kickers = high_kickers(rank_set & !cs.rank_mask(), 2);
            return pack(Trips, s, 0, kickers);
        }
    }

    // two pair / pair
    for hi in (1..=13u8).rev() {
        let hi_cs = CardStrength(hi);
        if rank_count[hi_cs.rank_index()] >= 2 {
            for lo in (1..hi).rev() {
                let lo_cs = CardStrength(lo);
                if rank_count[lo_cs.rank_index()] >= 2 {
                    let masks = hi_cs.rank_mask() | lo_cs.rank_mask();
                    let kickers = high_kickers(rank_set & !masks, 1);
                    return pack(TwoPair, hi, lo, kickers);
                }
            }
            let kickers = high_kickers(rank_set & !hi_cs.rank_mask(), 3);
            return pack(Pair, hi, 0, kickers);
        }
    }

    // high card
    pack(HighCard, 0, 0, high_kickers(rank_set, 5))
}

/// Classifies 5 to 7 cards into an ace-to-five low hand strength.
///
/// The ace always counts low, straights and flushes count nothing. With
/// `eight_or_better` the hand only qualifies when its five lowest
/// distinct ranks are all eight or below, otherwise
/// [HandStrength::NO_HAND] comes back and loses every low comparison.
pub fn low_hand_strength(cards: &[Card], eight_or_better: bool) -> HandStrength {
    use HandRank::*;

    let mut rank_set = 0u16;
    let mut rank_count = [0u8; 13];

    for card in cards {
        rank_count[card.rank() as usize] += 1;
        rank_set |= card.rank().mask();
    }

    // high card
    let (kickers, found) = low_kickers(rank_set, 5);
    if (found == 5 || found == cards.len()) && (!eight_or_better || kickers < Rank::Nine.mask()) {
        return pack(HighCard, 0, 0, kickers);
    }

    if eight_or_better {
        return HandStrength::NO_HAND;
    }

    // pair / two pair
    for lo in 0..13u8 {
        if rank_count[lo as usize] >= 2 {
            let (kickers, found) = low_kickers(rank_set & !(1 << lo), 3);
            if found == 3 || found == cards.len() - 2 {
                return pack(Pair, lo, 0, kickers);
            }
            for hi in (lo + 1)..13u8 {
                if rank_count[hi as usize] >= 2 {
                    let masks = (1u16 << lo) | (1u16 << hi);
                    let (kickers, found) = low_kickers(rank_set & !masks, 1);
                    if found == 1 || cards.len() == 4 {
                        return pack(TwoPair, hi, lo, kickers);
                    }
                }
            }
        }
    }

    // trips / full house
    for hi in 0..13u8 {
        if rank_count[hi as usize] >= 3 {
            let (kickers, found) = low_kickers(rank_set & !(1 << hi), 2);
            if found == 2 || found == cards.len() - 3 {
                return pack(Trips, hi, 0, kickers);
            }
            for lo in 0..13u8 {
                if lo != hi && rank_count[lo as usize] >= 2 {
                    return pack(FullHouse, hi, lo, 0);
                }
            }
        }
    }

    // quads
    for s in 0..13u8 {
        if rank_count[s as usize] >= 4 {
            let (kickers, _) = low_kickers(rank_set & !(1 << s), 1);
            return pack(Quads, s, 0, kickers);
        }
    }

    panic!("low hand with no category, duplicate or malformed cards upstream");
}

/// Looks for the highest five card straight window in a rank set.
fn find_straight(rank_set: u16) -> Option<u8> {
    // ace high straight - 0001 1110 0000 0001
    let mask = 0x1E01u16;
    if rank_set & mask == mask {
        return Some(CardStrength::ACE_HIGH.0);
    }

    // king high down to the five high wheel, the ace at bit zero serves
    // as the wheel's low end
    for s in (4..=12u8).rev() {
        let mask = 0x001Fu16 << (s - 4);
        if rank_set & mask == mask {
            return Some(s);
        }
    }

    None
}

/// Collects up to `max` kickers from a rank set, highest first.
fn high_kickers(rank_set: u16, max: usize) -> u16 {
    let mut kickers = 0u16;
    let mut found = 0;

    for s in (1..=13u8).rev() {
        let cs = CardStrength(s);
        if rank_set & cs.rank_mask() != 0 {
            kickers |= cs.mask();
            found += 1;
            if found == max {
                break;
            }
        }
    }

    kickers
}

/// Collects up to `max` kickers from a rank set, lowest first, returning
/// the kicker set and how many distinct ranks it holds.
fn low_kickers(rank_set: u16, max: usize) -> (u16, usize) {
    let mut kickers = 0u16;
    let mut found = 0;

    for s in 0..13u8 {
        let cs = CardStrength(s);
        if rank_set & cs.rank_mask() != 0 {
            kickers |= cs.mask();
            found += 1;
            if found == max {
                break;
            }
        }
    }

    (kickers, found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use showdown_cards::parse_cards;

    fn high(s: &str) -> HandStrength {
        hand_strength(&parse_cards(s).unwrap())
    }

    fn low(s: &str, eight_or_better: bool) -> HandStrength {
        low_hand_strength(&parse_cards(s).unwrap(), eight_or_better)
    }

    /// Kicker set on the strength scale, the ace counted high.
    fn high_kick(ranks: &[Rank]) -> u16 {
        ranks
            .iter()
            .map(|r| match r {
                Rank::Ace => CardStrength::ACE_HIGH.mask(),
                _ => CardStrength::from(*r).mask(),
            })
            .fold(0, |acc, m| acc | m)
    }

    /// Kicker set on the strength scale, the ace counted low.
    fn low_kick(ranks: &[Rank]) -> u16 {
        ranks
            .iter()
            .map(|r| CardStrength::from(*r).mask())
            .fold(0, |acc, m| acc | m)
    }

    #[test]
    fn full_house() {
        let hs = high("5C5D8S5S8C");
        assert_eq!(hs.rank(), HandRank::FullHouse);
        assert_eq!(
            hs,
            HandStrength::new(
                HandRank::FullHouse,
                CardStrength::from(Rank::Five),
                CardStrength::from(Rank::Eight),
                0
            )
        );

        // Eights full beats fives full.
        assert!(high("8S8C5C5D8D") > hs);
    }

    #[test]
    fn flush_kickers() {
        let hs = high("2H3HTH4HJH");
        assert_eq!(hs.rank(), HandRank::Flush);
        assert_eq!(
            hs.kickers(),
            high_kick(&[Rank::Jack, Rank::Ten, Rank::Four, Rank::Trey, Rank::Deuce])
        );

        // Seven cards, the flush takes the five highest of the suit.
        let hs = high("2H3HTH4HJH9H8H");
        assert_eq!(hs.rank(), HandRank::Flush);
        assert_eq!(
            hs.kickers(),
            high_kick(&[Rank::Jack, Rank::Ten, Rank::Nine, Rank::Eight, Rank::Four])
        );
    }

    #[test]
    fn straights() {
        // Wheel straight flush, the ace counts low.
        let wheel = high("AC2C3C4C5C");
        assert_eq!(wheel.rank(), HandRank::StraightFlush);
        assert_eq!(wheel.first(), CardStrength::from(Rank::Five));

        let royal = high("ASKSQSJSTS");
        assert_eq!(royal.rank(), HandRank::StraightFlush);
        assert_eq!(royal.first(), CardStrength::ACE_HIGH);
        assert!(royal > wheel);

        // Suit agnostic straights.
        let wheel = high("AC2D3H4S5C");
        assert_eq!(wheel.rank(), HandRank::Straight);
        assert_eq!(wheel.first(), CardStrength::from(Rank::Five));

        let broadway = high("ACKDQHJSTC");
        assert_eq!(broadway.rank(), HandRank::Straight);
        assert_eq!(broadway.first(), CardStrength::ACE_HIGH);

        let nine_high = high("9C8D7H6S5C");
        assert_eq!(nine_high.rank(), HandRank::Straight);
        assert_eq!(nine_high.first(), CardStrength::from(Rank::Nine));

        assert!(broadway > nine_high && nine_high > wheel);
    }

    #[test]
    fn pairs_and_kickers() {
        let hs = high("AHKH7DAC2H");
        assert_eq!(hs.rank(), HandRank::Pair);
        assert_eq!(hs.first(), CardStrength::ACE_HIGH);
        assert_eq!(
            hs.kickers(),
            high_kick(&[Rank::King, Rank::Seven, Rank::Deuce])
        );

        // Seven cards, three kickers from the five remaining ranks.
        let hs = high("AHKH7DAC2H3C4S");
        assert_eq!(hs.rank(), HandRank::Pair);
        assert_eq!(
            hs.kickers(),
            high_kick(&[Rank::King, Rank::Seven, Rank::Four])
        );

        let hs = high("AHKH7DAC2H2C4S");
        assert_eq!(hs.rank(), HandRank::TwoPair);
        assert_eq!(hs.first(), CardStrength::ACE_HIGH);
        assert_eq!(hs.second(), CardStrength::from(Rank::Deuce));
        assert_eq!(hs.kickers(), high_kick(&[Rank::King]));
    }

    #[test]
    fn category_order() {
        let hands = [
            high("AHKHQHJD9D"), // high card
            high("2C2D4H5S7D"), // pair
            high("2C2D4H4S7D"), // two pair
            high("2C2D2H4S7D"), // trips
            high("AC2D3H4S5C"), // straight
            high("2H3HTH4HJH"), // flush
            high("5C5D8S5S8C"), // full house
            high("7C7D7H7S2C"), // quads
            high("AC2C3C4C5C"), // straight flush
        ];

        for pair in hands.windows(2) {
            assert!(pair[0] < pair[1], "{:?} < {:?}", pair[0], pair[1]);
        }

        // Any pair beats the best no-pair hand.
        assert!(high("2C2D3H4S7D") > high("AHKHQHJD9D"));
    }

    #[test]
    fn low_qualifier() {
        // The best high hand is no low hand at all.
        assert_eq!(low("ASKSQSJSTS", true), HandStrength::NO_HAND);

        let hs = low("ASKSQSJSTS", false);
        assert_eq!(hs.rank(), HandRank::HighCard);
        assert_eq!(
            hs.kickers(),
            low_kick(&[Rank::Ace, Rank::Ten, Rank::Jack, Rank::Queen, Rank::King])
        );

        // A nine breaks the eight-or-better qualifier, an eight does not.
        assert_eq!(low("AC2D3H4S9C", true), HandStrength::NO_HAND);
        let hs = low("AC2D3H4S8C", true);
        assert_eq!(hs.rank(), HandRank::HighCard);

        // A paired five card hand cannot make five distinct low ranks.
        assert_eq!(low("ACAD2H3S4C", true), HandStrength::NO_HAND);
    }

    #[test]
    fn low_ordering() {
        let wheel = low("AC2D3H4S5C", true);
        assert_eq!(wheel.rank(), HandRank::HighCard);
        assert_eq!(
            wheel.kickers(),
            low_kick(&[Rank::Ace, Rank::Deuce, Rank::Trey, Rank::Four, Rank::Five])
        );

        // Lower value is the better low hand.
        let six_low = low("2C3D4H5S6C", true);
        assert!(wheel < six_low);

        // Any qualifying high card low beats a paired low.
        let paired = low("ACAD2H3S4C", false);
        assert_eq!(paired.rank(), HandRank::Pair);
        assert!(six_low < paired);
    }

    #[test]
    fn low_seven_cards() {
        // Pairs drop away when five distinct low ranks are in the hand.
        let hs = low("ACAD2H2S3C4D5H", false);
        assert_eq!(hs, low("AC2D3H4S5C", false));

        // All paired up, the lowest pair with the lowest kickers plays.
        let hs = low("ACAD2H2S3C3D4H", false);
        assert_eq!(hs.rank(), HandRank::Pair);
        assert_eq!(hs.first(), CardStrength::ACE_LOW);
        assert_eq!(
            hs.kickers(),
            low_kick(&[Rank::Deuce, Rank::Trey, Rank::Four])
        );
    }

    // This takes a while in debug mode as it goes through 2.6M hands.
    #[test]
    #[ignore]
    fn five_card_census() {
        use crate::combo::Combinations;
        use showdown_cards::Deck;

        let deck = Deck::default();
        let mut counts = [0u64; 10];

        for hand in Combinations::new(deck.cards(), 5).unwrap() {
            counts[hand_strength(&hand).rank() as usize] += 1;
        }

        assert_eq!(counts[HandRank::NoHand as usize], 0);
        assert_eq!(counts[HandRank::HighCard as usize], 1_302_540);
        assert_eq!(counts[HandRank::Pair as usize], 1_098_240);
        assert_eq!(counts[HandRank::TwoPair as usize], 123_552);
        assert_eq!(counts[HandRank::Trips as usize], 54_912);
        assert_eq!(counts[HandRank::Straight as usize], 10_200);
        assert_eq!(counts[HandRank::Flush as usize], 5_108);
        assert_eq!(counts[HandRank::FullHouse as usize], 3_744);
        assert_eq!(counts[HandRank::Quads as usize], 624);
        assert_eq!(counts[HandRank::StraightFlush as usize], 40);
        assert_eq!(counts.iter().sum::<u64>(), 2_598_960);
    }

    #[test]
    fn low_degenerate_hands() {
        let hs = low("ACADAHAS2C", false);
        assert_eq!(hs.rank(), HandRank::Quads);
        assert_eq!(hs.first(), CardStrength::ACE_LOW);
        assert_eq!(hs.kickers(), low_kick(&[Rank::Deuce]));

        let hs = low("ACADAH2S2C", false);
        assert_eq!(hs.rank(), HandRank::FullHouse);
        assert_eq!(hs.first(), CardStrength::ACE_LOW);
        assert_eq!(hs.second(), CardStrength::from(Rank::Deuce));
    }
}
