// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Lazy enumeration of card combinations.
//!
//! [Combinations] produces the k-subsets of a card pool one at a time in
//! lexicographic order, [MultiCombinations] deals a pool across several
//! groups of fixed sizes without repeating a card. Both keep O(k) state,
//! the total number of combinations can be in the millions.
use anyhow::{Result, ensure};

use showdown_cards::Card;

/// Creates a table for nck(n, k) for n <= 52.
const fn make_nck() -> [[u64; 53]; 53] {
    let mut t = [[0u64; 53]; 53];
    let mut n = 0;

    while n <= 52 {
        // base case nck(n, 0) = 1
        t[n][0] = 1;

        let mut k = 1;
        while k <= n {
            // nck(n, k) = nck(n-1, k-1) + nck(n-1, k)
            t[n][k] = t[n - 1][k - 1] + t[n - 1][k];
            k += 1;
        }

        n += 1;
    }

    t
}

const NCKS: [[u64; 53]; 53] = make_nck();

/// Returns the binomial coefficient for n choose k.
#[inline]
pub fn nck(n: usize, k: usize) -> u64 {
    assert!(n <= 52, "n={n} must be 0 <= n <= 52");
    if k > n { 0 } else { NCKS[n][k] }
}

/// Uses the combinatorial number system to convert `nth` to a
/// k-subset of positions (see Theorem L pg. 260 Knuth 4a).
///
/// Parallel drivers use this to seed workers at disjoint points of the
/// combination index space.
pub fn nth_ksubset(nth: u64, k: usize) -> Vec<usize> {
    let mut out = vec![0; k];
    let mut n = nth;

    for j in (0..k).rev() {
        let mut c = j;
        while nck(c, j + 1) <= n {
            c += 1;
        }

        c -= 1;
        out[j] = c;
        n -= nck(c, j + 1);
    }

    out
}

/// Calls the given closure for `count` k-subsets of n positions starting
/// from the `nth` subset, in lexicographic order.
pub fn for_each_ksubset<F>(n: usize, k: usize, nth: u64, count: u64, mut f: F)
where
    F: FnMut(&[usize]),
{
    if count == 0 {
        return;
    } else if k == 0 {
        f(&[]);
        return;
    }

    // Algorithm L from TAOCP 4a.
    let mut c = vec![0usize; k + 3];

    let ks = nth_ksubset(nth, k);
    for i in 0..k {
        c[i + 1] = ks[i];
    }

    c[k + 1] = n;

    let mut counter = 1;
    loop {
        f(&c[1..=k]);

        counter += 1;
        if counter > count {
            break;
        }

        let mut j = 1;
        while c[j] + 1 == c[j + 1] {
            c[j] = j - 1;
            j += 1;
        }

        if j > k {
            break;
        }

        c[j] += 1;
    }
}

/// A pull iterator over the k-subsets of a card pool.
///
/// Subsets come out in lexicographic order of their position tuples and
/// preserve the pool's relative card order. The iterator is single pass,
/// once exhausted it cannot be restarted.
#[derive(Debug)]
pub struct Combinations {
    pool: Vec<Card>,
    choose: usize,
    index: Vec<usize>,
    done: bool,
}

impl Combinations {
    /// Creates an iterator over the `choose`-subsets of `pool`.
    ///
    /// Fails if `choose` is larger than the pool.
    pub fn new(pool: &[Card], choose: usize) -> Result<Self> {
        ensure!(
            choose <= pool.len(),
            "cannot choose {choose} cards from a pool of {}",
            pool.len()
        );
        Ok(Self::start(pool.to_vec(), choose))
    }

    /// Builds and primes an iterator, `choose <= pool.len()` checked by
    /// the caller.
    fn start(pool: Vec<Card>, choose: usize) -> Self {
        let mut itr = Self {
            pool,
            choose,
            index: vec![0; choose],
            done: false,
        };
        itr.prime();
        itr
    }

    /// Checks if there are combinations left.
    pub fn has_next(&self) -> bool {
        !self.done
    }

    /// Returns the next combination.
    ///
    /// Panics if the iterator is exhausted.
    pub fn next_combo(&mut self) -> Vec<Card> {
        assert!(!self.done, "next_combo on exhausted combinations");

        let combo = self.index.iter().map(|&i| self.pool[i]).collect();
        self.advance();
        combo
    }

    /// Forces each position after the first to follow its predecessor.
    fn prime(&mut self) {
        for i in 1..self.choose {
            if self.index[i] <= self.index[i - 1] {
                self.index[i] = self.index[i - 1] + 1;
            }
        }
    }

    /// Increments the rightmost position, carrying left on overflow and
    /// repriming everything to the right of the carry point.
    fn advance(&mut self) {
        let mut inc = self.choose as isize - 1;
        let mut reprime = false;

        while inc >= 0 {
            let i = inc as usize;
            let max_index = self.pool.len() - (self.choose - i - 1);
            self.index[i] = (self.index[i] + 1) % max_index;
            if self.index[i] == 0 {
                inc -= 1;
                reprime = true;
            } else {
                break;
            }
        }

        if inc < 0 {
            self.done = true;
        } else if reprime {
            self.prime();
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<Card>;

    fn next(&mut self) -> Option<Self::Item> {
        self.has_next().then(|| self.next_combo())
    }
}

/// A pull iterator that deals a shared pool across several groups.
///
/// Given group sizes `[k0, .., km]` it produces every way to pick `k0`
/// cards for the first group, `k1` for the second from the cards the
/// first left behind, and so on. Groups are distinguishable and never
/// share a card within one produced deal.
///
/// Advancing works like an odometer: the last group's iterator moves
/// first, and when a group exhausts, its pool and iterator are rebuilt
/// from the new state of the groups before it.
#[derive(Debug)]
pub struct MultiCombinations {
    pools: Vec<Vec<Card>>,
    choose: Vec<usize>,
    iters: Vec<Combinations>,
    current: Vec<Vec<Card>>,
    done: bool,
}

impl MultiCombinations {
    /// Creates an iterator dealing `pool` into groups of the given sizes.
    ///
    /// Fails if the group sizes add up to more than the pool.
    pub fn new(pool: &[Card], choose: &[usize]) -> Result<Self> {
        let total = choose.iter().sum::<usize>();
        ensure!(
            total <= pool.len(),
            "cannot deal {total} cards from a pool of {}",
            pool.len()
        );

        let mut pools = vec![Vec::new(); choose.len()];
        if let Some(first) = pools.first_mut() {
            *first = pool.to_vec();
        }

        let mut itr = Self {
            pools,
            choose: choose.to_vec(),
            iters: Vec::with_capacity(choose.len()),
            current: Vec::with_capacity(choose.len()),
            done: false,
        };
        itr.prime();
        Ok(itr)
    }

    /// Checks if there are deals left.
    pub fn has_next(&self) -> bool {
        !self.done
    }

    /// Returns the next deal, one card group per configured size.
    ///
    /// Panics if the iterator is exhausted.
    pub fn next_groups(&mut self) -> Vec<Vec<Card>> {
        assert!(!self.done, "next_groups on exhausted combinations");

        let next = self.current.clone();
        self.advance();
        next
    }

    /// Rebuilds pools, iterators, and first picks for every group after
    /// the last one still holding a valid pick.
    fn prime(&mut self) {
        for i in self.current.len()..self.choose.len() {
            if i > 0 {
                let mut pool = self.pools[i - 1].clone();
                for card in &self.current[i - 1] {
                    if let Some(pos) = pool.iter().position(|c| c == card) {
                        pool.remove(pos);
                    }
                }
                self.pools[i] = pool;
            }

            let mut itr = Combinations::start(self.pools[i].clone(), self.choose[i]);
            self.current.push(itr.next_combo());
            self.iters.push(itr);
        }
    }

    fn advance(&mut self) {
        let mut inc = self.choose.len() as isize - 1;

        while inc >= 0 {
            let i = inc as usize;
            if self.iters[i].has_next() {
                self.current[i] = self.iters[i].next_combo();
                break;
            } else {
                self.current.truncate(i);
                self.iters.truncate(i);
                inc -= 1;
            }
        }

        if inc < 0 {
            self.done = true;
        } else {
            self.prime();
        }
    }
}

impl Iterator for MultiCombinations {
    type Item = Vec<Vec<Card>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.has_next().then(|| self.next_groups())
    }
}
