use borsh::{BorshDeserialize, BorshSerialize};
use std::convert::TryFrom;
use std::fmt;

/// Minimum stake for a single bet, in whole token units.
pub const MIN_STAKE: u64 = 1_000;

/// An EVM-shaped account address. The game, the players and the individual
/// bet records are all addressed this way; the crate treats the bytes as an
/// opaque identifier.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Hash of a submitted transaction, used as the proof reference for
/// winner records and failure notifications.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct TxHash(pub [u8; 32]);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// One wager placed by one player within one round.
///
/// Each bet is deployed as its own minimal on-chain record, so the bet is
/// identified by that record's address. Ordering among the bets of a round
/// is the order of on-chain submission and is significant for winner
/// selection and bonus weighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Bet {
    /// Address of the on-chain record identifying this bet.
    pub id: Address,
    /// The player who placed the bet.
    pub player: Address,
    /// Stake in whole token units.
    pub amount: u64,
}

/// Status of a round as reported by the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum RoundStatus {
    /// Round is open for bets (or has ended and awaits a calculation request).
    Pending,
    /// A winner calculation has been requested, randomness is pending.
    Spinning,
    /// Winner has been determined.
    Finished,
}

impl TryFrom<u8> for RoundStatus {
    type Error = &'static str;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(RoundStatus::Pending),
            1 => Ok(RoundStatus::Spinning),
            2 => Ok(RoundStatus::Finished),
            _ => Err("Invalid round status"),
        }
    }
}

impl From<RoundStatus> for u8 {
    fn from(status: RoundStatus) -> Self {
        match status {
            RoundStatus::Pending => 0,
            RoundStatus::Spinning => 1,
            RoundStatus::Finished => 2,
        }
    }
}

/// Pool-wide totals of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct RoundTotals {
    /// Total staked volume.
    pub volume: u128,
    /// Number of bets placed.
    pub bets: u64,
    /// Bonus pool (5% of volume).
    pub bonus: u128,
    /// Staking share (3.6% of volume).
    pub staking: u128,
}

/// The viewing player's slice of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PlayerTotals {
    /// The player's staked volume.
    pub volume: u128,
    /// Number of bets the player placed.
    pub bets: u64,
    /// The player's bonus share estimate (5% of own volume).
    pub bonus: u128,
}

/// One betting period, identified by an index derived from wall-clock time.
///
/// A round exists implicitly from the first observed bet and is always
/// re-derived from authoritative chain state; only `status` and
/// `winner_offset` advance, driven by observed events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Round {
    /// Round index (see `timing`).
    pub index: u64,
    pub total: RoundTotals,
    pub player: PlayerTotals,
    pub status: RoundStatus,
    /// Randomness-derived winner offset, `None` while undetermined.
    pub winner_offset: Option<u128>,
}

/// Winner record of a finished round, built from the observed
/// winner-calculation event. Immutable once created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct WinnerInfo {
    pub player: Address,
    /// Address of the winning bet record.
    pub bet: Address,
    /// The offset the randomness oracle supplied for the draw.
    pub offset: u128,
    pub round: u64,
    /// Transaction carrying the proof of randomness.
    pub tx: TxHash,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_u8() {
        for status in [RoundStatus::Pending, RoundStatus::Spinning, RoundStatus::Finished] {
            assert_eq!(RoundStatus::try_from(u8::from(status)), Ok(status));
        }
        assert!(RoundStatus::try_from(3).is_err());
    }

    #[test]
    fn address_displays_as_hex() {
        let mut bytes = [0u8; 20];
        bytes[0] = 0xab;
        bytes[19] = 0x01;
        assert_eq!(
            Address(bytes).to_string(),
            "0xab00000000000000000000000000000000000001"
        );
        assert!(Address::ZERO.is_zero());
    }
}
