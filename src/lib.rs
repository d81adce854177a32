// Lucky Round lottery engine
//
// The contract draws one weighted-random winner per timed round; this
// crate is the client-side core that tracks a round through its life,
// derives winners and bonus shares from the on-chain bet list, and keeps
// the session cache honest while events and timers race each other.

pub mod cache;
pub mod chain;
pub mod engine;
pub mod error;
pub mod payout;
pub mod state;
pub mod timing;
pub mod wheel;

pub use cache::{CacheKey, RoundCache};
pub use chain::{ChainEvent, ChainReader, ChainWriter, GameConfig, HistoryReader, TxStatus};
pub use engine::RoundEngine;
pub use error::LuckyRoundError;
pub use state::{Address, Bet, Round, RoundStatus, TxHash, WinnerInfo, MIN_STAKE};
pub use timing::{RoundInterval, RoundWindow};
pub use wheel::{WheelEvent, WheelState};
