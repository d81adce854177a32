//! The asynchronous chain boundary.
//!
//! The engine never talks wire formats or ABI encodings; it consumes the
//! typed surface below, implemented elsewhere by an RPC client. Reads are
//! retried by that implementation's own policy — a failed read is simply
//! "not yet available" here. Writes resolve to a transaction hash whose
//! receipt reports confirmation or revert through the `Result` channel,
//! never by panicking.

use crate::error::LuckyRoundError;
use crate::state::{Address, Bet, RoundStatus, TxHash, WinnerInfo};
use crate::timing::RoundInterval;

pub type ChainResult<T> = Result<T, LuckyRoundError>;

/// Outcome of a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxStatus {
    Confirmed,
    Reverted,
}

/// Log events observed from the game contract, filterable by round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainEvent {
    /// A winner calculation was requested for the round.
    CalculationRequested { round: u64 },
    /// The randomness oracle answered and the winner is fixed.
    WinnerCalculated {
        round: u64,
        winner_offset: u128,
        bet: Address,
    },
    /// A bet joined the round's pool.
    BetCreated { round: u64, player: Address },
}

impl ChainEvent {
    pub fn round(&self) -> u64 {
        match self {
            ChainEvent::CalculationRequested { round }
            | ChainEvent::WinnerCalculated { round, .. }
            | ChainEvent::BetCreated { round, .. } => *round,
        }
    }
}

/// Which deployed game contract serves which cadence. Resolved once at
/// startup and passed explicitly from then on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub daily: Address,
    pub five_minute: Address,
}

impl GameConfig {
    pub fn game_for(&self, interval: RoundInterval) -> Address {
        match interval {
            RoundInterval::OneDay => self.daily,
            RoundInterval::FiveMinutes => self.five_minute,
        }
    }
}

/// Read surface of the game contract and the token it stakes.
#[allow(async_fn_in_trait)]
pub trait ChainReader {
    /// Total staked volume of a round.
    async fn round_bank(&self, game: Address, round: u64) -> ChainResult<u128>;
    /// Number of bets in a round.
    async fn bets_count(&self, game: Address, round: u64) -> ChainResult<u64>;
    /// The `index`-th bet record of a round, in submission order.
    async fn round_bet(&self, game: Address, round: u64, index: u64) -> ChainResult<Bet>;
    async fn round_status(&self, game: Address, round: u64) -> ChainResult<RoundStatus>;
    /// Sum of position-and-size bet weights, the bonus denominator.
    async fn bonus_shares(&self, game: Address, round: u64) -> ChainResult<u128>;
    /// Winner offset of a round; zero while undetermined.
    async fn winner_offset(&self, game: Address, round: u64) -> ChainResult<u128>;
    async fn player_volume(&self, game: Address, round: u64, player: Address) -> ChainResult<u128>;
    async fn player_bets_count(&self, game: Address, round: u64, player: Address)
        -> ChainResult<u64>;
    /// Bonus the player can claim across finished rounds.
    async fn claimable_bonus(&self, game: Address, player: Address) -> ChainResult<u128>;
    /// Whether the bonus pool of a round has been distributed.
    async fn distribution_done(&self, game: Address, round: u64) -> ChainResult<bool>;
    /// Lifetime number of bets placed on a game.
    async fn lifetime_bets_count(&self, game: Address) -> ChainResult<u64>;
    /// Lifetime staked volume of a game.
    async fn lifetime_volume(&self, game: Address) -> ChainResult<u128>;
    /// Token balance of a player.
    async fn balance(&self, player: Address) -> ChainResult<u64>;
    /// Spending allowance the player granted the game.
    async fn allowance(&self, player: Address) -> ChainResult<u64>;
}

/// Write surface: each call submits a transaction and resolves to its hash.
#[allow(async_fn_in_trait)]
pub trait ChainWriter {
    async fn place_bet(
        &self,
        game: Address,
        player: Address,
        amount: u64,
        round: u64,
    ) -> ChainResult<TxHash>;
    async fn request_calculation(&self, game: Address, round: u64) -> ChainResult<TxHash>;
    async fn claim_bonus(&self, game: Address, player: Address) -> ChainResult<TxHash>;
    async fn distribute_bonus(&self, game: Address, round: u64) -> ChainResult<TxHash>;
    /// Waits for the transaction to be mined.
    async fn receipt(&self, tx: TxHash) -> ChainResult<TxStatus>;
}

/// Read-only search over historical events, served by an indexer.
#[allow(async_fn_in_trait)]
pub trait HistoryReader {
    /// Rounds of a game that saw any activity.
    async fn game_rounds(&self, game: Address) -> ChainResult<Vec<u64>>;
    /// Rounds in which the player placed at least one bet.
    async fn player_rounds(&self, game: Address, player: Address) -> ChainResult<Vec<u64>>;
    /// All winner records of a game, oldest first.
    async fn winners(&self, game: Address) -> ChainResult<Vec<WinnerInfo>>;
    /// Winner record of a single round, if the round is finished.
    async fn winner(&self, game: Address, round: u64) -> ChainResult<Option<WinnerInfo>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_resolves_one_game_per_interval() {
        let config = GameConfig {
            daily: Address([1; 20]),
            five_minute: Address([2; 20]),
        };
        assert_eq!(config.game_for(RoundInterval::OneDay), Address([1; 20]));
        assert_eq!(config.game_for(RoundInterval::FiveMinutes), Address([2; 20]));
    }

    #[test]
    fn every_event_names_its_round() {
        let events = [
            ChainEvent::CalculationRequested { round: 4 },
            ChainEvent::WinnerCalculated {
                round: 4,
                winner_offset: 9,
                bet: Address::ZERO,
            },
            ChainEvent::BetCreated {
                round: 4,
                player: Address::ZERO,
            },
        ];
        for event in events {
            assert_eq!(event.round(), 4);
        }
    }
}
