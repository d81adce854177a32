use crate::state::TxHash;
use thiserror::Error;

/// Errors that may be surfaced by the Lucky Round engine.
///
/// Stale events for a non-observed round and a not-yet-determined winner
/// are *not* errors; both are silently treated as "pending".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LuckyRoundError {
    /// Bet amount could not be parsed or is zero
    #[error("Bet amount is not a valid stake")]
    InvalidAmount,

    /// Bet amount is below the minimum stake
    #[error("Bet amount {amount} is below the minimum stake of {minimum}")]
    BelowMinimumStake { amount: u64, minimum: u64 },

    /// The player's spending allowance does not cover the stake; the caller
    /// is expected to obtain authorization and retry
    #[error("Allowance {allowance} does not cover the required {required}")]
    AllowanceRequired { required: u64, allowance: u64 },

    /// The player's balance does not cover the stake
    #[error("Insufficient funds for operation")]
    InsufficientFunds,

    /// A submitted write reverted on-chain
    #[error("Transaction {0} reverted")]
    TransactionReverted(TxHash),

    /// The chain collaborator failed to answer a read or accept a write
    #[error("Chain request failed: {0}")]
    Rpc(String),

    /// A cache snapshot could not be decoded
    #[error("Cache snapshot is corrupted")]
    Snapshot,
}
