//! Session-scoped store of fetched round data.
//!
//! The cache is an explicit object handed to whoever needs it instead of a
//! process-wide singleton, keyed by `(game address, round index)`. Entries
//! are only ever filled from authoritative chain reads and are marked
//! stale (not dropped) on invalidation, so a refetch can tell "never seen"
//! from "needs refresh". Staleness is tracked per field: refilling the bet
//! list of an invalidated entry must not revive its outdated `Round`.
//! Single-threaded cooperative scheduling serializes all mutation.

use crate::error::LuckyRoundError;
use crate::state::{Address, Bet, Round, WinnerInfo};
use borsh::{BorshDeserialize, BorshSerialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize)]
pub struct CacheKey {
    pub game: Address,
    pub round: u64,
}

impl CacheKey {
    pub fn new(game: Address, round: u64) -> Self {
        CacheKey { game, round }
    }
}

/// Everything known about one round of one game.
#[derive(Clone, Debug, Default, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct RoundEntry {
    pub round: Option<Round>,
    pub bets: Option<Vec<Bet>>,
    pub winner: Option<WinnerInfo>,
    /// Set once a calculation request for this round was confirmed, so the
    /// caller stops offering to start it again.
    pub calculation_requested: bool,
    stale_round: bool,
    stale_bets: bool,
    stale_winner: bool,
}

impl RoundEntry {
    fn mark_stale(&mut self) {
        self.stale_round = true;
        self.stale_bets = true;
        self.stale_winner = true;
    }
}

#[derive(Debug, Default)]
pub struct RoundCache {
    entries: HashMap<CacheKey, RoundEntry>,
}

impl RoundCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self, key: &CacheKey) -> Option<&Round> {
        let entry = self.entries.get(key)?;
        if entry.stale_round {
            return None;
        }
        entry.round.as_ref()
    }

    pub fn bets(&self, key: &CacheKey) -> Option<&[Bet]> {
        let entry = self.entries.get(key)?;
        if entry.stale_bets {
            return None;
        }
        entry.bets.as_deref()
    }

    pub fn winner(&self, key: &CacheKey) -> Option<&WinnerInfo> {
        let entry = self.entries.get(key)?;
        if entry.stale_winner {
            return None;
        }
        entry.winner.as_ref()
    }

    pub fn is_requested(&self, key: &CacheKey) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.calculation_requested)
    }

    /// A refill freshens only the field it carries; the entry's other
    /// fields stay stale until their own authoritative refetch.
    pub fn put_round(&mut self, key: CacheKey, round: Round) {
        let entry = self.entries.entry(key).or_default();
        entry.round = Some(round);
        entry.stale_round = false;
    }

    pub fn put_bets(&mut self, key: CacheKey, bets: Vec<Bet>) {
        let entry = self.entries.entry(key).or_default();
        entry.bets = Some(bets);
        entry.stale_bets = false;
    }

    pub fn put_winner(&mut self, key: CacheKey, winner: WinnerInfo) {
        let entry = self.entries.entry(key).or_default();
        entry.winner = Some(winner);
        entry.stale_winner = false;
    }

    pub fn mark_requested(&mut self, key: CacheKey) {
        self.entries.entry(key).or_default().calculation_requested = true;
    }

    /// Marks every field of one round stale; reads return nothing until
    /// the respective field is refilled.
    pub fn invalidate(&mut self, key: &CacheKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.mark_stale();
        }
    }

    /// Marks every round of a game stale (jump-to-current, session resync).
    pub fn invalidate_game(&mut self, game: Address) {
        for (key, entry) in self.entries.iter_mut() {
            if key.game == game {
                entry.mark_stale();
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serializes the entries for a session handoff. Keys are emitted in
    /// sorted order so equal caches produce equal snapshots.
    pub fn snapshot(&self) -> Result<Vec<u8>, LuckyRoundError> {
        let mut entries: Vec<(&CacheKey, &RoundEntry)> = self.entries.iter().collect();
        entries.sort_by_key(|(key, _)| **key);
        borsh::to_vec(&entries).map_err(|_| LuckyRoundError::Snapshot)
    }

    pub fn restore(bytes: &[u8]) -> Result<Self, LuckyRoundError> {
        let entries: Vec<(CacheKey, RoundEntry)> =
            borsh::from_slice(bytes).map_err(|_| LuckyRoundError::Snapshot)?;
        Ok(RoundCache {
            entries: entries.into_iter().collect(),
        })
    }
}
