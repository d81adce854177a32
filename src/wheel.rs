//! Presentation state machine of the round wheel.
//!
//! The wheel only ever moves forward: `Standby → WaitingForCalculation →
//! Spinning → Landed → Stopped`, plus the external reset back to `Standby`
//! when a new round becomes current. Chain events carry authoritative
//! state and may fast-forward past intermediate phases, but re-applying a
//! phase already reached is a no-op and nothing moves backward. Events for
//! a round other than the observed one never change state.

use crate::state::Address;

/// Client-local wheel phase; not persisted past a session.
#[derive(Clone, Debug, PartialEq)]
pub enum WheelState {
    /// Idle display, round still accepting bets.
    Standby,
    /// Round ended with a non-empty pool; calculation not yet observed.
    WaitingForCalculation,
    /// Calculation request observed on-chain; spin until resolved.
    Spinning,
    /// Winner determined on-chain; decelerate toward the winning bucket.
    Landed {
        round: u64,
        winner_offset: u128,
        bet: Address,
    },
    /// Animation finished; the result is displayable.
    Stopped { result_angle: f64, bet: Address },
}

impl WheelState {
    fn phase(&self) -> u8 {
        match self {
            WheelState::Standby => 0,
            WheelState::WaitingForCalculation => 1,
            WheelState::Spinning => 2,
            WheelState::Landed { .. } => 3,
            WheelState::Stopped { .. } => 4,
        }
    }
}

/// Inputs that drive the wheel. Chain events carry the round they refer
/// to; the elapsed-time and animation inputs are scoped to the observed
/// round by construction.
#[derive(Clone, Debug, PartialEq)]
pub enum WheelEvent {
    /// `CalculationRequested` log observed.
    CalculationRequested { round: u64 },
    /// `WinnerCalculated` log observed.
    WinnerCalculated {
        round: u64,
        winner_offset: u128,
        bet: Address,
    },
    /// Poll tick found the observed round past its end with a non-empty pool.
    RoundEnded,
    /// The deceleration animation for a landed wheel has completed.
    AnimationFinished { result_angle: f64 },
    /// Jump to the current round.
    Reset,
}

/// Pure transition function. Inapplicable events return the state
/// unchanged, which makes duplicate and racing deliveries harmless.
pub fn advance(state: &WheelState, observed_round: u64, event: &WheelEvent) -> WheelState {
    match event {
        WheelEvent::CalculationRequested { round } => {
            if *round == observed_round && state.phase() < 2 {
                WheelState::Spinning
            } else {
                state.clone()
            }
        }
        WheelEvent::WinnerCalculated {
            round,
            winner_offset,
            bet,
        } => {
            if *round == observed_round && state.phase() < 3 {
                WheelState::Landed {
                    round: *round,
                    winner_offset: *winner_offset,
                    bet: *bet,
                }
            } else {
                state.clone()
            }
        }
        WheelEvent::RoundEnded => {
            if matches!(state, WheelState::Standby) {
                WheelState::WaitingForCalculation
            } else {
                state.clone()
            }
        }
        WheelEvent::AnimationFinished { result_angle } => {
            if let WheelState::Landed { bet, .. } = state {
                WheelState::Stopped {
                    result_angle: *result_angle,
                    bet: *bet,
                }
            } else {
                state.clone()
            }
        }
        WheelEvent::Reset => WheelState::Standby,
    }
}

/// Angle (degrees) the wheel should settle at for a given winner offset.
pub fn landing_angle(winner_offset: u128, volume: u128) -> f64 {
    if volume == 0 {
        return 0.0;
    }
    winner_offset as f64 * 360.0 / volume as f64
}
