//! Pure round arithmetic: bet aggregation, the weighted winner draw and
//! the bonus distribution.
//!
//! Everything here is re-derived from the ordered bet list of a round;
//! nothing is cached or mutated. Amounts are whole token units (`u64` per
//! bet, `u128` for pool-level sums and products).

use crate::state::{Address, Bet};

/// Winner payout share of the pool: 91.4%.
pub const WIN_NUMERATOR: u128 = 914;
pub const WIN_DENOMINATOR: u128 = 1000;

/// Bonus pool share of the pool: 5%.
pub const BONUS_NUMERATOR: u128 = 5;
pub const BONUS_DENOMINATOR: u128 = 100;

/// Staking share of the pool: 3.6%.
pub const STAKING_NUMERATOR: u128 = 360;
pub const STAKING_DENOMINATOR: u128 = 10_000;

pub fn win_amount(volume: u128) -> u128 {
    volume * WIN_NUMERATOR / WIN_DENOMINATOR
}

pub fn bonus_pool(volume: u128) -> u128 {
    volume * BONUS_NUMERATOR / BONUS_DENOMINATOR
}

pub fn staking_share(volume: u128) -> u128 {
    volume * STAKING_NUMERATOR / STAKING_DENOMINATOR
}

/// Per-player aggregate over the bets of a round, in first-seen order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerAggregate {
    pub player: Address,
    pub total_amount: u128,
    pub bet_count: u64,
}

/// Groups bets by player, preserving the order in which players first
/// appear. Quadratic in the number of distinct players, which stays in the
/// low hundreds per round.
pub fn aggregate_by_player(bets: &[Bet]) -> Vec<PlayerAggregate> {
    let mut authors: Vec<PlayerAggregate> = Vec::new();
    for bet in bets {
        match authors.iter_mut().find(|a| a.player == bet.player) {
            Some(author) => {
                author.total_amount += u128::from(bet.amount);
                author.bet_count += 1;
            }
            None => authors.push(PlayerAggregate {
                player: bet.player,
                total_amount: u128::from(bet.amount),
                bet_count: 1,
            }),
        }
    }
    authors
}

pub fn total_volume(bets: &[Bet]) -> u128 {
    bets.iter().map(|bet| u128::from(bet.amount)).sum()
}

/// Headline numbers for the round currently accepting bets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CurrentRoundInfo {
    pub bets_count: usize,
    pub players_count: usize,
    pub volume: u128,
}

pub fn current_round_info(bets: &[Bet]) -> CurrentRoundInfo {
    CurrentRoundInfo {
        bets_count: bets.len(),
        players_count: aggregate_by_player(bets).len(),
        volume: total_volume(bets),
    }
}

/// The winning bet together with the offset that selected it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WinningBet {
    pub bet: Bet,
    pub offset: u128,
}

/// Selects the winner by cumulative-volume bucketing: walking the bets in
/// submission order, the first bet whose bucket `[acc, acc + amount)`
/// contains `offset` wins. Each bet's chance is proportional to its stake,
/// provided the externally drawn `offset` is uniform over
/// `[0, total_volume)`.
///
/// Returns `None` while the offset is unset (zero) or malformed (at or
/// beyond the total volume); callers treat that as "pending".
pub fn select_winner(bets: &[Bet], offset: u128) -> Option<WinningBet> {
    if offset == 0 {
        return None;
    }
    let mut acc: u128 = 0;
    for bet in bets {
        if acc + u128::from(bet.amount) > offset {
            return Some(WinningBet { bet: *bet, offset });
        }
        acc += u128::from(bet.amount);
    }
    None
}

/// Position-and-size weight of bet `index` out of `count`: earlier and
/// larger bets weigh more, decaying linearly to a multiplier of one for
/// the last bet.
fn bet_weight(bet: &Bet, index: usize, count: usize) -> u128 {
    u128::from(bet.amount) * (count - index) as u128
}

/// Sum of all bet weights for a round. The contract exposes the same value
/// as the bonus-share denominator; this local form exists so callers can
/// cross-check the chain read.
pub fn bonus_weight_total(bets: &[Bet]) -> u128 {
    let count = bets.len();
    bets.iter()
        .enumerate()
        .map(|(index, bet)| bet_weight(bet, index, count))
        .sum()
}

/// A bet's share of the round bonus pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BetBonus {
    pub bet: Bet,
    pub bonus: u128,
}

/// Distributes the bonus pool (5% of `volume`) across the bets, floored
/// per bet. `bonus_share_denominator` must equal [`bonus_weight_total`] of
/// the same bet list; it is taken as a parameter because the contract is
/// the authority on it. A zero denominator yields all-zero bonuses.
pub fn compute_bonuses(bets: &[Bet], volume: u128, bonus_share_denominator: u128) -> Vec<BetBonus> {
    let pool = bonus_pool(volume);
    let count = bets.len();
    bets.iter()
        .enumerate()
        .map(|(index, bet)| {
            let bonus = if bonus_share_denominator == 0 {
                0
            } else {
                pool * bet_weight(bet, index, count) / bonus_share_denominator
            };
            BetBonus { bet: *bet, bonus }
        })
        .collect()
}

/// One row of the round result table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerRow {
    pub player: Address,
    pub count: u64,
    pub volume: u128,
    /// Winner payout (91.4% of the pool) if this player won, zero otherwise.
    pub win: u128,
    /// Summed bonus over the player's bets.
    pub bonus: u128,
}

/// Builds the per-player round table: volume, bet count, summed bonus and
/// the winner payout. Rows are ordered for display emphasis only: the
/// viewer's own row first, then the winner's, then descending by volume.
pub fn aggregate_round_table(
    bets: &[Bet],
    winner: Address,
    volume: u128,
    bonus_share_denominator: u128,
    viewer: Address,
) -> Vec<PlayerRow> {
    let mut rows: Vec<PlayerRow> = Vec::new();
    for entry in compute_bonuses(bets, volume, bonus_share_denominator) {
        match rows.iter_mut().find(|row| row.player == entry.bet.player) {
            Some(row) => {
                row.volume += u128::from(entry.bet.amount);
                row.count += 1;
                row.bonus += entry.bonus;
            }
            None => rows.push(PlayerRow {
                player: entry.bet.player,
                count: 1,
                volume: u128::from(entry.bet.amount),
                win: if entry.bet.player == winner {
                    win_amount(volume)
                } else {
                    0
                },
                bonus: entry.bonus,
            }),
        }
    }
    rows.sort_by(|a, b| {
        use std::cmp::Ordering;
        if a.player == viewer {
            return Ordering::Less;
        }
        if b.player == viewer {
            return Ordering::Greater;
        }
        if a.player == winner {
            return Ordering::Less;
        }
        if b.player == winner {
            return Ordering::Greater;
        }
        b.volume.cmp(&a.volume)
    });
    rows
}
