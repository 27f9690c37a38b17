// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Equity computation over competing hands.
//!
//! [Equity] drives the combination iterators and the strength
//! evaluators together: exact mode enumerates every completion of the
//! unknown cards, approximate mode samples completions until each
//! player's win odds settle.
use anyhow::{Result, ensure};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use showdown_cards::{Card, Deck};

use crate::{
    cache::StrengthCache,
    combo::{Combinations, MultiCombinations, nck},
    game::{Game, GameKind},
    strength::HandStrength,
};

/// Sampled deals per convergence check batch.
const SAMPLE_BATCH: u64 = 100;

/// Approximate mode stops once the mean absolute change in win odds
/// drops below this many percentage points.
const SAMPLE_DELTA: f64 = 0.001;

/// Per player outcome counters for one equity run.
///
/// `wins` counts deals taking the whole pot, `ties` deals taking a
/// partial share, `losses` deals taking nothing; the three always add
/// up to `total`. Hi/lo games also book the detail counters: a scoop is
/// a whole pot from winning both halves outright, and the hi/lo win and
/// tie counters track each half independently of the other.
///
/// Addition is commutative and associative, tallies from partitioned
/// runs merge by summing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Deals taking the whole pot.
    pub wins: u64,
    /// Deals taking a partial share of the pot.
    pub ties: u64,
    /// Deals taking nothing.
    pub losses: u64,
    /// Whole pots from winning both halves of a hi/lo deal.
    pub scoops: u64,
    /// Deals holding the sole best high hand.
    pub hi_wins: u64,
    /// Deals sharing the best high hand.
    pub hi_ties: u64,
    /// Deals holding the sole best qualifying low hand.
    pub lo_wins: u64,
    /// Deals sharing the best qualifying low hand.
    pub lo_ties: u64,
    /// Deals evaluated.
    pub total: u64,
}

impl Tally {
    /// Percentage of deals taking the whole pot.
    pub fn win_odds(&self) -> f64 {
        self.pct(self.wins)
    }

    /// Percentage of deals taking a partial share.
    pub fn tie_odds(&self) -> f64 {
        self.pct(self.ties)
    }

    /// Percentage of deals taking nothing.
    pub fn loss_odds(&self) -> f64 {
        self.pct(self.losses)
    }

    fn pct(&self, count: u64) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.total as f64
        }
    }
}

impl std::ops::AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.wins += rhs.wins;
        self.ties += rhs.ties;
        self.losses += rhs.losses;
        self.scoops += rhs.scoops;
        self.hi_wins += rhs.hi_wins;
        self.hi_ties += rhs.hi_ties;
        self.lo_wins += rhs.lo_wins;
        self.lo_ties += rhs.lo_ties;
        self.total += rhs.total;
    }
}

impl std::ops::Add for Tally {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

/// Reusable per deal buffers, the engine evaluates millions of deals.
struct Scratch {
    board: Vec<Card>,
    hands: Vec<Vec<Card>>,
    hi: Vec<HandStrength>,
    lo: Vec<HandStrength>,
}

impl Scratch {
    fn new(game: &Game, hands: &[Vec<Card>]) -> Self {
        Self {
            board: Vec::with_capacity(game.board_size),
            hands: hands
                .iter()
                .map(|_| Vec::with_capacity(game.hand_size))
                .collect(),
            hi: vec![HandStrength::NO_HAND; hands.len()],
            lo: vec![HandStrength::NO_HAND; hands.len()],
        }
    }
}

/// An equity run over a board and two or more partially known hands.
#[derive(Debug)]
pub struct Equity {
    kind: GameKind,
    game: &'static Game,
    board: Vec<Card>,
    hands: Vec<Vec<Card>>,
    deck: Vec<Card>,
    choose: Vec<usize>,
    deal_size: usize,
}

impl Equity {
    /// Sets up a run for the given game, known board, and known hands.
    ///
    /// Fails before any enumeration when fewer than two hands compete,
    /// a hand or the board exceeds the game sizes, or the deck cannot
    /// cover the unknown cards.
    pub fn new(kind: GameKind, board: Vec<Card>, hands: Vec<Vec<Card>>) -> Result<Self> {
        let game = kind.game();

        ensure!(hands.len() >= 2, "specify at least 2 hands");
        ensure!(
            board.len() <= game.board_size,
            "{} has a maximum of {} community cards",
            game.name,
            game.board_size
        );
        for hand in &hands {
            ensure!(
                hand.len() <= game.hand_size,
                "{} has a maximum hand size of {}",
                game.name,
                game.hand_size
            );
        }

        let mut deck = Deck::default();
        for &card in board.iter().chain(hands.iter().flatten()) {
            deck.remove(card);
        }
        let deck = deck.into_cards();

        let mut choose = Vec::with_capacity(hands.len() + 1);
        choose.push(game.board_size - board.len());
        choose.extend(hands.iter().map(|h| game.hand_size - h.len()));

        let deal_size = choose.iter().sum::<usize>();
        ensure!(
            deal_size <= deck.len(),
            "{deal_size} cards to deal but only {} left in the deck",
            deck.len()
        );

        Ok(Self {
            kind,
            game,
            board,
            hands,
            deck,
            choose,
            deal_size,
        })
    }

    /// The game this run evaluates.
    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// Number of competing hands.
    pub fn players(&self) -> usize {
        self.hands.len()
    }

    /// Number of deals the exact mode evaluates, saturating on the
    /// configurations too large to ever enumerate.
    pub fn total_deals(&self) -> u64 {
        let mut total = nck(self.deck.len(), self.deal_size);
        let mut left = self.deal_size;

        for &k in &self.choose {
            total = total.saturating_mul(nck(left, k));
            left -= k;
        }

        total
    }

    /// Tallies every possible completion of the unknown cards.
    pub fn exact(&self, cache: &mut StrengthCache) -> Vec<Tally> {
        let mut tally = vec![Tally::default(); self.hands.len()];
        let mut scratch = Scratch::new(self.game, &self.hands);

        let deals =
            Combinations::new(&self.deck, self.deal_size).expect("deal size checked at setup");
        for deal in deals {
            self.tally_deal(&deal, cache, &mut scratch, &mut tally);
        }

        tally
    }

    /// Tallies sampled completions until win odds converge, returning
    /// the tallies and the number of samples taken.
    ///
    /// Convergence compares cumulative win odds between batches and has
    /// no iteration cap, callers needing bounded latency must impose
    /// their own.
    pub fn approximate<R: Rng + ?Sized>(
        &self,
        cache: &mut StrengthCache,
        rng: &mut R,
    ) -> (Vec<Tally>, u64) {
        let mut tally = vec![Tally::default(); self.hands.len()];
        let mut scratch = Scratch::new(self.game, &self.hands);
        let mut deck = self.deck.clone();
        let mut samples = 0u64;

        loop {
            let last = tally.clone();

            for _ in 0..SAMPLE_BATCH {
                let (deal, _) = deck.partial_shuffle(rng, self.deal_size);
                self.tally_deal(deal, cache, &mut scratch, &mut tally);
                samples += 1;
            }

            if samples > SAMPLE_BATCH {
                let delta = win_odds_delta(&tally, &last);
                log::debug!("{samples} samples, win odds delta {delta:.5}");
                if delta < SAMPLE_DELTA {
                    break;
                }
            }
        }

        (tally, samples)
    }

    /// Tallies every completion partitioning the enumeration across
    /// `num_tasks` workers, each with its own cache, and merging the
    /// per worker tallies.
    #[cfg(feature = "parallel")]
    pub fn par_exact(&self, num_tasks: usize) -> Vec<Tally> {
        use crate::combo::for_each_ksubset;
        use std::thread;

        assert!(num_tasks > 0);

        let n = self.deck.len();
        let k = self.deal_size;
        let total = nck(n, k);
        let num_tasks = num_tasks.min(total as usize);
        let per_task = total.div_ceil(num_tasks as u64);

        log::debug!("partitioning {total} deals across {num_tasks} tasks");

        let mut tallies = thread::scope(|s| {
            let workers = (0..num_tasks)
                .map(|task| {
                    s.spawn(move || {
                        let mut cache = StrengthCache::new();
                        let mut scratch = Scratch::new(self.game, &self.hands);
                        let mut tally = vec![Tally::default(); self.hands.len()];
                        let mut deal = vec![Card::default(); k];

                        // The rounded up chunking can push the last
                        // starting points past the index space.
                        let start = task as u64 * per_task;
                        let count = per_task.min(total.saturating_sub(start));

                        for_each_ksubset(n, k, start, count, |positions| {
                            for (i, &pos) in positions.iter().enumerate() {
                                deal[i] = self.deck[pos];
                            }
                            self.tally_deal(&deal, &mut cache, &mut scratch, &mut tally);
                        });

                        tally
                    })
                })
                .collect::<Vec<_>>();

            workers
                .into_iter()
                .map(|w| w.join().expect("equity worker panicked"))
                .collect::<Vec<_>>()
        });

        let mut merged = tallies.pop().expect("at least one worker");
        for tally in tallies {
            for (m, t) in merged.iter_mut().zip(tally) {
                *m += t;
            }
        }

        merged
    }

    /// Partitions one drawn deal across board and hands in every
    /// possible way, evaluating and settling each partition as a deal.
    fn tally_deal(
        &self,
        deal: &[Card],
        cache: &mut StrengthCache,
        scratch: &mut Scratch,
        tally: &mut [Tally],
    ) {
        let mut deals =
            MultiCombinations::new(deal, &self.choose).expect("deal matches the group sizes");

        while deals.has_next() {
            let groups = deals.next_groups();

            scratch.board.clear();
            scratch.board.extend_from_slice(&self.board);
            scratch.board.extend_from_slice(&groups[0]);

            for (i, hand) in self.hands.iter().enumerate() {
                scratch.hands[i].clear();
                scratch.hands[i].extend_from_slice(hand);
                scratch.hands[i].extend_from_slice(&groups[i + 1]);
            }

            if let Some(hi) = self.game.hi {
                for i in 0..self.hands.len() {
                    scratch.hi[i] = hi(cache, &scratch.board, &scratch.hands[i]);
                }
            }
            if let Some(lo) = self.game.lo {
                for i in 0..self.hands.len() {
                    scratch.lo[i] = lo(cache, &scratch.board, &scratch.hands[i]);
                }
            }

            match (self.game.hi.is_some(), self.game.lo.is_some()) {
                (true, true) => settle_hi_lo(&scratch.hi, &scratch.lo, tally),
                (true, false) => {
                    let best = *scratch.hi.iter().max().expect("at least 2 hands");
                    settle_single(&scratch.hi, best, tally);
                }
                (false, true) => {
                    // Low only game, the minimum strength is the best hand.
                    let best = *scratch.lo.iter().min().expect("at least 2 hands");
                    settle_single(&scratch.lo, best, tally);
                }
                (false, false) => unreachable!("game without strength functions"),
            }
        }
    }
}

/// Books a deal where `best` takes the whole pot, shared on equal
/// strengths.
fn settle_single(strengths: &[HandStrength], best: HandStrength, tally: &mut [Tally]) {
    let winners = strengths.iter().filter(|&&s| s == best).count();

    for (i, &strength) in strengths.iter().enumerate() {
        let t = &mut tally[i];
        t.total += 1;

        if strength != best {
            t.losses += 1;
        } else if winners > 1 {
            t.ties += 1;
        } else {
            t.wins += 1;
        }
    }
}

/// Books a hi/lo deal: the high and qualifying low halves settle
/// independently, a sole winner of both scoops, and with no qualifying
/// low the high hand takes the whole pot.
fn settle_hi_lo(hi: &[HandStrength], lo: &[HandStrength], tally: &mut [Tally]) {
    let best_hi = *hi.iter().max().expect("at least 2 hands");
    let hi_winners = hi.iter().filter(|&&s| s == best_hi).count();

    let best_lo = lo
        .iter()
        .copied()
        .filter(|&s| s != HandStrength::NO_HAND)
        .min();
    let lo_winners = best_lo
        .map(|best| lo.iter().filter(|&&s| s == best).count())
        .unwrap_or(0);

    for i in 0..hi.len() {
        let t = &mut tally[i];
        t.total += 1;

        let hi_share = hi[i] == best_hi;
        let lo_share = best_lo.is_some_and(|best| lo[i] == best);

        if hi_share {
            if hi_winners > 1 {
                t.hi_ties += 1;
            } else {
                t.hi_wins += 1;
            }
        }
        if lo_share {
            if lo_winners > 1 {
                t.lo_ties += 1;
            } else {
                t.lo_wins += 1;
            }
        }

        if best_lo.is_none() {
            // No qualifying low, the pot plays high only.
            if !hi_share {
                t.losses += 1;
            } else if hi_winners > 1 {
                t.ties += 1;
            } else {
                t.wins += 1;
            }
        } else if hi_share && hi_winners == 1 && lo_share && lo_winners == 1 {
            t.wins += 1;
            t.scoops += 1;
        } else if hi_share || lo_share {
            t.ties += 1;
        } else {
            t.losses += 1;
        }
    }
}

/// Mean absolute difference in per player win odds between two tallies.
fn win_odds_delta(tally: &[Tally], last: &[Tally]) -> f64 {
    let deltas = tally
        .iter()
        .zip(last)
        .map(|(t, l)| (t.win_odds() - l.win_odds()).abs())
        .sum::<f64>();

    deltas / tally.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use showdown_cards::parse_cards;

    fn hands(texts: &[&str]) -> Vec<Vec<Card>> {
        texts.iter().map(|s| parse_cards(s).unwrap()).collect()
    }

    #[test]
    fn setup_errors() {
        // Fewer than two hands.
        assert!(Equity::new(GameKind::Holdem, vec![], hands(&["ASAH"])).is_err());

        // Oversized hand and board.
        assert!(Equity::new(GameKind::Holdem, vec![], hands(&["ASAHKD", "KCQD"])).is_err());
        let board = parse_cards("2C3C4C5C6C7C").unwrap();
        assert!(Equity::new(GameKind::Holdem, board, hands(&["ASAH", "KCKD"])).is_err());

        // Eight unknown stud hands cannot come out of one deck.
        let unknown = vec![Vec::new(); 8];
        assert!(Equity::new(GameKind::Stud7, vec![], unknown).is_err());
    }

    #[test]
    fn single_deal_showdown() {
        let board = parse_cards("2C7D9HTSJS").unwrap();
        let equity = Equity::new(GameKind::Holdem, board, hands(&["ASAH", "KDKC"])).unwrap();
        assert_eq!(equity.total_deals(), 1);

        let mut cache = StrengthCache::new();
        let tally = equity.exact(&mut cache);

        assert_eq!(tally[0].wins, 1);
        assert_eq!(tally[0].total, 1);
        assert_eq!(tally[1].losses, 1);
        assert_eq!(tally[1].total, 1);
    }

    #[test]
    fn single_deal_tie() {
        // Both pairs play the six high straight on the board.
        let board = parse_cards("2C3C4D5D6H").unwrap();
        let equity = Equity::new(GameKind::Holdem, board, hands(&["ASAH", "KDKC"])).unwrap();

        let mut cache = StrengthCache::new();
        let tally = equity.exact(&mut cache);

        for t in &tally {
            assert_eq!(t.ties, 1);
            assert_eq!(t.wins + t.losses, 0);
            assert_eq!(t.total, 1);
        }
    }

    #[test]
    fn exact_aces_vs_kings() {
        let equity = Equity::new(GameKind::Holdem, vec![], hands(&["ASAH", "KDKC"])).unwrap();
        assert_eq!(equity.total_deals(), nck(48, 5));

        let mut cache = StrengthCache::new();
        let tally = equity.exact(&mut cache);
        let (aces, kings) = (tally[0], tally[1]);

        // Every deal books exactly one outcome per player.
        for t in [aces, kings] {
            assert_eq!(t.total, nck(48, 5));
            assert_eq!(t.wins + t.ties + t.losses, t.total);
        }

        // A tied deal ties both players, a won deal loses the other.
        assert_eq!(aces.ties, kings.ties);
        assert_eq!(aces.wins + kings.wins + aces.ties, aces.total);
        assert_eq!(aces.wins, kings.losses);

        // The overpair dominates.
        assert!(aces.win_odds() > 80.0);
        assert!(kings.win_odds() < 20.0);
    }

    #[test]
    fn exact_partial_board() {
        // One card to come for each player on a known four card board.
        let board = parse_cards("2C7D9HTS").unwrap();
        let equity = Equity::new(GameKind::Holdem, board, hands(&["ASAH", "KDKC"])).unwrap();
        assert_eq!(equity.total_deals(), 44);

        let mut cache = StrengthCache::new();
        let tally = equity.exact(&mut cache);

        assert_eq!(tally[0].total, 44);
        // Only the two remaining kings beat the aces.
        assert_eq!(tally[0].wins, 42);
        assert_eq!(tally[1].wins, 2);
    }

    #[test]
    fn razz_lowest_hand_wins() {
        let equity = Equity::new(
            GameKind::Razz,
            vec![],
            hands(&["AC2D3H4S5C6D8H", "2C3D4H5S7C9DKH"]),
        )
        .unwrap();

        let mut cache = StrengthCache::new();
        let tally = equity.exact(&mut cache);

        // The wheel beats the seven low.
        assert_eq!(tally[0].wins, 1);
        assert_eq!(tally[1].losses, 1);
    }

    #[test]
    fn hi_lo_scoop() {
        let equity = Equity::new(
            GameKind::Stud7HiLo,
            vec![],
            hands(&["AC2C3C4C5C6C7C", "KDKHKSQDQHJSTS"]),
        )
        .unwrap();

        let mut cache = StrengthCache::new();
        let tally = equity.exact(&mut cache);

        // Straight flush high and wheel low against a kings full house
        // with no low, both halves go one way.
        assert_eq!(tally[0].wins, 1);
        assert_eq!(tally[0].scoops, 1);
        assert_eq!(tally[0].hi_wins, 1);
        assert_eq!(tally[0].lo_wins, 1);
        assert_eq!(tally[1].losses, 1);
        assert_eq!(tally[1].total, 1);
    }

    #[test]
    fn hi_lo_split() {
        let equity = Equity::new(
            GameKind::Stud7HiLo,
            vec![],
            hands(&["ASKSQSJSTS2D2H", "AC2C3D4D5H6H8C"]),
        )
        .unwrap();

        let mut cache = StrengthCache::new();
        let tally = equity.exact(&mut cache);

        // The royal flush takes the high half, the wheel the low half.
        assert_eq!(tally[0].hi_wins, 1);
        assert_eq!(tally[0].ties, 1);
        assert_eq!(tally[0].scoops, 0);
        assert_eq!(tally[1].lo_wins, 1);
        assert_eq!(tally[1].ties, 1);
        assert_eq!(tally[1].scoops, 0);
    }

    #[test]
    fn hi_lo_no_qualifier() {
        let equity = Equity::new(
            GameKind::Stud7HiLo,
            vec![],
            hands(&["ASKSQSJSTS9C9D", "KDKHKCQDQHJDTD"]),
        )
        .unwrap();

        let mut cache = StrengthCache::new();
        let tally = equity.exact(&mut cache);

        // Neither hand makes a low, the high hand takes the whole pot.
        assert_eq!(tally[0].wins, 1);
        assert_eq!(tally[0].scoops, 0);
        assert_eq!(tally[0].hi_wins, 1);
        assert_eq!(tally[0].lo_wins + tally[0].lo_ties, 0);
        assert_eq!(tally[1].losses, 1);
    }

    #[test]
    fn approximate_converges() {
        let equity = Equity::new(GameKind::Holdem, vec![], hands(&["ASAH", "KDKC"])).unwrap();

        let mut cache = StrengthCache::new();
        let mut rng = SmallRng::seed_from_u64(42);
        let (tally, samples) = equity.approximate(&mut cache, &mut rng);

        assert!(samples > SAMPLE_BATCH);
        for t in &tally {
            assert_eq!(t.total, samples);
            assert_eq!(t.wins + t.ties + t.losses, t.total);
        }

        // Close to the exact 81.9% within sampling error.
        assert!((tally[0].win_odds() - 81.9).abs() < 4.0);
        assert!(tally[1].win_odds() < 20.0);
    }

    #[test]
    fn tally_merge() {
        let a = Tally {
            wins: 2,
            ties: 1,
            losses: 3,
            total: 6,
            ..Tally::default()
        };
        let b = Tally {
            wins: 1,
            ties: 0,
            losses: 2,
            total: 3,
            ..Tally::default()
        };

        assert_eq!(a + b, b + a);
        assert_eq!((a + b).total, 9);
        assert_eq!((a + b).win_odds(), 100.0 * 3.0 / 9.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_exact() {
        let board = parse_cards("2C7D9H").unwrap();
        let equity = Equity::new(GameKind::Holdem, board, hands(&["ASAH", "KDKC"])).unwrap();

        let mut cache = StrengthCache::new();
        let exact = equity.exact(&mut cache);
        let parallel = equity.par_exact(4);

        assert_eq!(exact, parallel);
    }
}
