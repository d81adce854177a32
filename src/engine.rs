//! The round engine: one observed game/round, its wheel state and cache.
//!
//! The engine is the single writer of the session state. Chain events,
//! poll ticks and animation callbacks all funnel through it, get filtered
//! by round index, and land in the pure `wheel` reducer; reads go through
//! the injected [`RoundCache`]. Execution is single-threaded and
//! cooperative, so no locking is needed; duplicate or racing inputs are
//! absorbed by the reducer's idempotency.

use crate::cache::{CacheKey, RoundCache};
use crate::chain::{
    ChainEvent, ChainReader, ChainResult, ChainWriter, GameConfig, HistoryReader, TxStatus,
};
use crate::error::LuckyRoundError;
use crate::payout::{self, PlayerRow, WinningBet};
use crate::state::{Address, Bet, PlayerTotals, Round, RoundTotals, TxHash, WinnerInfo, MIN_STAKE};
use crate::timing::RoundInterval;
use crate::wheel::{self, WheelEvent, WheelState};
use log::{debug, info, warn};

pub struct RoundEngine<C> {
    client: C,
    game: Address,
    interval: RoundInterval,
    /// The player this session renders for.
    viewer: Address,
    observed_round: u64,
    wheel: WheelState,
    cache: RoundCache,
}

impl<C> RoundEngine<C> {
    pub fn new(
        client: C,
        config: GameConfig,
        interval: RoundInterval,
        viewer: Address,
        now_ms: i64,
    ) -> Self {
        RoundEngine {
            client,
            game: config.game_for(interval),
            interval,
            viewer,
            observed_round: interval.round_for(now_ms),
            wheel: WheelState::Standby,
            cache: RoundCache::new(),
        }
    }

    pub fn game(&self) -> Address {
        self.game
    }

    pub fn interval(&self) -> RoundInterval {
        self.interval
    }

    pub fn observed_round(&self) -> u64 {
        self.observed_round
    }

    pub fn wheel(&self) -> &WheelState {
        &self.wheel
    }

    pub fn cache(&self) -> &RoundCache {
        &self.cache
    }

    pub fn is_round_requested(&self, round: u64) -> bool {
        self.cache.is_requested(&self.key(round))
    }

    /// Switching the viewed player invalidates every cached round: the
    /// player slice of a `Round` depends on who is asking.
    pub fn set_viewer(&mut self, viewer: Address) {
        if self.viewer != viewer {
            self.viewer = viewer;
            self.cache.invalidate_game(self.game);
        }
    }

    pub fn cache_snapshot(&self) -> Result<Vec<u8>, LuckyRoundError> {
        self.cache.snapshot()
    }

    pub fn restore_cache(&mut self, bytes: &[u8]) -> Result<(), LuckyRoundError> {
        self.cache = RoundCache::restore(bytes)?;
        Ok(())
    }

    fn key(&self, round: u64) -> CacheKey {
        CacheKey::new(self.game, round)
    }

    /// Applies an observed contract event. Events for rounds other than
    /// the observed one never touch the wheel, but they still mark the
    /// referenced round's cache stale so the next read refetches.
    pub fn handle_event(&mut self, event: &ChainEvent) {
        debug!("chain event {:?} (observing round {})", event, self.observed_round);
        match event {
            ChainEvent::CalculationRequested { round } => {
                // The round's status moved to Spinning on-chain; the cached
                // view is outdated. The requested flag itself survives the
                // invalidation.
                self.cache.mark_requested(self.key(*round));
                self.cache.invalidate(&self.key(*round));
                self.advance_wheel(&WheelEvent::CalculationRequested { round: *round });
            }
            ChainEvent::WinnerCalculated {
                round,
                winner_offset,
                bet,
            } => {
                self.cache.invalidate(&self.key(*round));
                self.advance_wheel(&WheelEvent::WinnerCalculated {
                    round: *round,
                    winner_offset: *winner_offset,
                    bet: *bet,
                });
            }
            ChainEvent::BetCreated { round, player } => {
                debug!("bet created by {player} in round {round}");
                self.cache.invalidate(&self.key(*round));
            }
        }
    }

    /// Periodic elapsed-time check (the caller polls, e.g. every 500ms).
    /// Once the observed round is over: an empty pool silently advances to
    /// the current round, a funded pool puts an idle wheel into
    /// `WaitingForCalculation`.
    pub async fn tick(&mut self, now_ms: i64) -> ChainResult<()>
    where
        C: ChainReader,
    {
        if !self.interval.bounds(self.observed_round).has_ended(now_ms) {
            return Ok(());
        }
        let pool = match self.cache.round(&self.key(self.observed_round)) {
            Some(round) => round.total.volume,
            None => self.client.round_bank(self.game, self.observed_round).await?,
        };
        if pool == 0 {
            info!("round {} ended empty, advancing", self.observed_round);
            self.jump_to_current(now_ms);
        } else {
            self.advance_wheel(&WheelEvent::RoundEnded);
        }
        Ok(())
    }

    /// Callback for the finished deceleration animation.
    pub fn animation_finished(&mut self, result_angle: f64) {
        self.advance_wheel(&WheelEvent::AnimationFinished { result_angle });
        if matches!(self.wheel, WheelState::Stopped { .. }) {
            // The finished round and the winner list are displayed next;
            // force both onto fresh data.
            self.cache.invalidate(&self.key(self.observed_round));
        }
    }

    /// Moves the session to the round containing `now_ms` and resets the
    /// wheel. All cached data for the game is marked stale.
    pub fn jump_to_current(&mut self, now_ms: i64) {
        self.observed_round = self.interval.round_for(now_ms);
        self.advance_wheel(&WheelEvent::Reset);
        self.cache.invalidate_game(self.game);
    }

    fn advance_wheel(&mut self, event: &WheelEvent) {
        let next = wheel::advance(&self.wheel, self.observed_round, event);
        if next != self.wheel {
            info!("wheel {:?} -> {:?}", self.wheel, next);
            self.wheel = next;
        }
    }
}

impl<C: ChainReader + ChainWriter + HistoryReader> RoundEngine<C> {
    /// Validates and submits a bet on the observed round.
    ///
    /// Nothing is applied optimistically: until the receipt confirms, no
    /// local state changes, so a rejection or revert leaves the session
    /// exactly as it was. On confirmation the round's cache is marked
    /// stale so the new pool is refetched.
    pub async fn place_bet(&mut self, amount: u64) -> ChainResult<TxHash> {
        if amount == 0 {
            return Err(LuckyRoundError::InvalidAmount);
        }
        if amount < MIN_STAKE {
            return Err(LuckyRoundError::BelowMinimumStake {
                amount,
                minimum: MIN_STAKE,
            });
        }
        let balance = self.client.balance(self.viewer).await?;
        if balance < amount {
            return Err(LuckyRoundError::InsufficientFunds);
        }
        let allowance = self.client.allowance(self.viewer).await?;
        if allowance < amount {
            return Err(LuckyRoundError::AllowanceRequired {
                required: amount,
                allowance,
            });
        }

        let round = self.observed_round;
        info!("placing bet of {amount} on round {round}");
        let tx = self
            .client
            .place_bet(self.game, self.viewer, amount, round)
            .await?;
        self.confirm(tx).await?;
        self.cache.invalidate(&self.key(round));
        Ok(tx)
    }

    /// Submits the winner-calculation request for the observed round.
    pub async fn start_round(&mut self) -> ChainResult<TxHash> {
        let round = self.observed_round;
        info!("requesting calculation for round {round}");
        let tx = self.client.request_calculation(self.game, round).await?;
        self.confirm(tx).await?;
        self.cache.mark_requested(self.key(round));
        Ok(tx)
    }

    pub async fn claim_bonus(&self) -> ChainResult<TxHash> {
        let tx = self.client.claim_bonus(self.game, self.viewer).await?;
        self.confirm(tx).await
    }

    pub async fn distribute_bonus(&self, round: u64) -> ChainResult<TxHash> {
        let tx = self.client.distribute_bonus(self.game, round).await?;
        self.confirm(tx).await
    }

    async fn confirm(&self, tx: TxHash) -> ChainResult<TxHash> {
        match self.client.receipt(tx).await? {
            TxStatus::Confirmed => Ok(tx),
            TxStatus::Reverted => {
                warn!("transaction {tx} reverted");
                Err(LuckyRoundError::TransactionReverted(tx))
            }
        }
    }

    /// Assembles the full view of a round from chain reads, cached until
    /// invalidated. Any index is accepted, including rounds the session
    /// skipped because they were empty.
    pub async fn round(&mut self, round: u64) -> ChainResult<Round> {
        let key = self.key(round);
        if let Some(cached) = self.cache.round(&key) {
            return Ok(*cached);
        }
        debug!("fetching round {round}");
        let volume = self.client.round_bank(self.game, round).await?;
        let bets = self.client.bets_count(self.game, round).await?;
        let status = self.client.round_status(self.game, round).await?;
        let offset = self.client.winner_offset(self.game, round).await?;
        let player_volume = self
            .client
            .player_volume(self.game, round, self.viewer)
            .await?;
        let player_bets = self
            .client
            .player_bets_count(self.game, round, self.viewer)
            .await?;

        let assembled = Round {
            index: round,
            total: RoundTotals {
                volume,
                bets,
                bonus: payout::bonus_pool(volume),
                staking: payout::staking_share(volume),
            },
            player: PlayerTotals {
                volume: player_volume,
                bets: player_bets,
                bonus: payout::bonus_pool(player_volume),
            },
            status,
            winner_offset: if offset == 0 { None } else { Some(offset) },
        };
        self.cache.put_round(key, assembled);
        Ok(assembled)
    }

    /// The ordered bet list of a round, cached until invalidated.
    pub async fn round_bets(&mut self, round: u64) -> ChainResult<Vec<Bet>> {
        let key = self.key(round);
        if let Some(cached) = self.cache.bets(&key) {
            return Ok(cached.to_vec());
        }
        debug!("fetching bets of round {round}");
        let count = self.client.bets_count(self.game, round).await?;
        let mut bets = Vec::with_capacity(count as usize);
        for index in 0..count {
            bets.push(self.client.round_bet(self.game, round, index).await?);
        }
        self.cache.put_bets(key, bets.clone());
        Ok(bets)
    }

    /// Derives the winning bet of a round from its bet list and winner
    /// offset. `None` while the offset is unset or out of range.
    pub async fn round_winner(&mut self, round: u64) -> ChainResult<Option<WinningBet>> {
        let bets = self.round_bets(round).await?;
        let offset = match self.round(round).await?.winner_offset {
            Some(offset) => offset,
            None => return Ok(None),
        };
        Ok(payout::select_winner(&bets, offset))
    }

    /// The per-player result table of a round, ordered for display.
    pub async fn round_table(&mut self, round: u64) -> ChainResult<Vec<PlayerRow>> {
        let bets = self.round_bets(round).await?;
        let volume = self.round(round).await?.total.volume;
        let denominator = self.client.bonus_shares(self.game, round).await?;
        let winner = self
            .round_winner(round)
            .await?
            .map(|winning| winning.bet.player)
            .unwrap_or(Address::ZERO);
        Ok(payout::aggregate_round_table(
            &bets,
            winner,
            volume,
            denominator,
            self.viewer,
        ))
    }

    /// Winner record of a finished round, served from the indexer and
    /// cached.
    pub async fn winner(&mut self, round: u64) -> ChainResult<Option<WinnerInfo>> {
        let key = self.key(round);
        if let Some(cached) = self.cache.winner(&key) {
            return Ok(Some(*cached));
        }
        let record = self.client.winner(self.game, round).await?;
        if let Some(winner) = record {
            self.cache.put_winner(key, winner);
        }
        Ok(record)
    }

    pub async fn winners(&self) -> ChainResult<Vec<WinnerInfo>> {
        self.client.winners(self.game).await
    }

    /// Rounds of this game with any activity.
    pub async fn rounds(&self) -> ChainResult<Vec<u64>> {
        self.client.game_rounds(self.game).await
    }

    /// Rounds the viewer participated in.
    pub async fn player_rounds(&self) -> ChainResult<Vec<u64>> {
        self.client.player_rounds(self.game, self.viewer).await
    }

    pub async fn claimable_bonus(&self) -> ChainResult<u128> {
        self.client.claimable_bonus(self.game, self.viewer).await
    }

    pub async fn distribution_done(&self, round: u64) -> ChainResult<bool> {
        self.client.distribution_done(self.game, round).await
    }

    pub async fn lifetime_bets_count(&self) -> ChainResult<u64> {
        self.client.lifetime_bets_count(self.game).await
    }

    pub async fn lifetime_volume(&self) -> ChainResult<u128> {
        self.client.lifetime_volume(self.game).await
    }
}
