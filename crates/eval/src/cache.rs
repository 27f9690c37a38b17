// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Memoized hand strength lookups.
use ahash::AHashMap;

use showdown_cards::Card;

use crate::strength::{HandStrength, hand_strength};

/// Index marking the end of the recency list.
const NIL: u32 = u32::MAX;

#[derive(Debug)]
struct Entry {
    key: u64,
    strength: HandStrength,
    prev: u32,
    next: u32,
}

/// A bounded memo of hand strengths keyed by card set identity.
///
/// The key is the 52-bit deck mask of the cards, so lookups ignore card
/// order. Strength is a pure function of the cards and entries never
/// invalidate; the capacity bound with least recently used eviction only
/// caps memory on runs that touch more sets than the default capacity.
///
/// The cache serves one caller at a time, concurrent users either keep a
/// cache each or serialize access around `get_or_compute`.
#[derive(Debug)]
pub struct StrengthCache {
    map: AHashMap<u64, u32>,
    entries: Vec<Entry>,
    head: u32,
    tail: u32,
    capacity: usize,
}

impl StrengthCache {
    /// The default capacity, enough to hold every distinct five card hand.
    pub const DEFAULT_CAPACITY: usize = 2_598_960;

    /// Creates a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a cache bounded to `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");
        Self {
            map: AHashMap::default(),
            entries: Vec::new(),
            head: NIL,
            tail: NIL,
            capacity,
        }
    }

    /// The canonical identity of a card set, independent of card order.
    #[inline]
    pub fn key(cards: &[Card]) -> u64 {
        cards.iter().fold(0, |acc, c| acc | c.mask())
    }

    /// Returns the cached high strength of `cards`, evaluating on a miss.
    #[inline]
    pub fn strength(&mut self, cards: &[Card]) -> HandStrength {
        self.get_or_compute(Self::key(cards), || hand_strength(cards))
    }

    /// Returns the strength stored under `key`, computing and storing it
    /// on a miss.
    pub fn get_or_compute<F>(&mut self, key: u64, compute: F) -> HandStrength
    where
        F: FnOnce() -> HandStrength,
    {
        if let Some(&idx) = self.map.get(&key) {
            self.touch(idx);
            return self.entries[idx as usize].strength;
        }

        let strength = compute();
        self.insert(key, strength);
        strength
    }

    /// Number of cached strengths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: u64, strength: HandStrength) {
        let idx = if self.entries.len() >= self.capacity {
            // Reuse the least recently used slot.
            let idx = self.tail;
            self.unlink(idx);

            let entry = &mut self.entries[idx as usize];
            self.map.remove(&entry.key);
            entry.key = key;
            entry.strength = strength;
            idx
        } else {
            let idx = self.entries.len() as u32;
            self.entries.push(Entry {
                key,
                strength,
                prev: NIL,
                next: NIL,
            });
            idx
        };

        self.map.insert(key, idx);
        self.push_front(idx);
    }

    fn touch(&mut self, idx: u32) {
        if self.head != idx {
            self.unlink(idx);
            self.push_front(idx);
        }
    }

    fn unlink(&mut self, idx: u32) {
        let (prev, next) = {
            let entry = &self.entries[idx as usize];
            (entry.prev, entry.next)
        };

        if prev != NIL {
            self.entries[prev as usize].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.entries[next as usize].prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn push_front(&mut self, idx: u32) {
        let old = self.head;
        let entry = &mut self.entries[idx as usize];
        entry.prev = NIL;
        entry.next = old;

        if old != NIL {
            self.entries[old as usize].prev = idx;
        } else {
            self.tail = idx;
        }

        self.head = idx;
    }
}

impl Default for StrengthCache {
    fn default() -> Self {
        Self::new()
    }
}
