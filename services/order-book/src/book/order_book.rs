//! Per-instrument order book
//!
//! Pairs one bid side with one ask side and owns the cross-resolution policy
//! chosen at setup. Every snapshot or diff batch ends with a resolution pass,
//! so readers always see `best bid < best ask` (or an empty side).
//!
//! The book is single-writer: the host serializes all mutation and any read
//! that needs a consistent top of book.

use rust_decimal::Decimal;
use tracing::{debug, info, trace};
use types::errors::BookError;
use types::ids::{Side, TradingPair};
use types::numeric::{BookNumber, Shared};

use super::price_level::PriceLevelEntry;
use super::side::OrderBookSide;
use crate::config::BookConfig;
use crate::crossing::{can_match, resolve_crossed, CrossPolicy, CrossResolution};
use crate::events::{BookUpdate, DepthSnapshot, DiffOutcome, TradeEvent};

/// Result of walking one side of the book for a target volume
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeQuery<N = Decimal> {
    /// Volume asked for (quote units for quote-volume queries)
    pub query_volume: N,
    /// `None` when the side cannot supply the answer
    pub result_price: Option<N>,
    /// Volume covered, capped at `query_volume`
    pub result_volume: N,
}

/// Two-sided book for a single instrument
#[derive(Debug, Clone)]
pub struct OrderBook<N = Decimal> {
    trading_pair: TradingPair,
    policy: CrossPolicy,
    max_snapshot_depth: usize,
    bids: OrderBookSide<N>,
    asks: OrderBookSide<N>,
    /// Update id of the last full snapshot
    snapshot_uid: Option<u64>,
    /// Update id of the last applied snapshot or diff batch
    last_diff_uid: Option<u64>,
    last_trade_price: Option<Shared<N>>,
    /// Unix nanos of the last applied trade
    last_trade_timestamp: Option<i64>,
}

impl<N: BookNumber> OrderBook<N> {
    pub fn new(trading_pair: TradingPair, config: &BookConfig) -> Self {
        let policy = config.policy();
        info!(
            trading_pair = %trading_pair,
            venue = ?config.venue,
            ?policy,
            "OrderBook initialized"
        );

        Self {
            trading_pair,
            policy,
            max_snapshot_depth: config.max_snapshot_depth,
            bids: OrderBookSide::bids(),
            asks: OrderBookSide::asks(),
            snapshot_uid: None,
            last_diff_uid: None,
            last_trade_price: None,
            last_trade_timestamp: None,
        }
    }

    /// Apply a single level update as a one-update diff batch
    ///
    /// Goes through the same stale check, watermark and resolution pass as
    /// [`OrderBook::apply_diffs`].
    pub fn apply_update(
        &mut self,
        side: Side,
        update: BookUpdate<N>,
    ) -> Result<DiffOutcome<N>, BookError> {
        let update_id = update.update_id;
        match side {
            Side::BUY => self.apply_diffs(vec![update], Vec::new(), update_id),
            Side::SELL => self.apply_diffs(Vec::new(), vec![update], update_id),
        }
    }

    /// Record a public trade as the last traded price
    pub fn apply_trade(&mut self, trade: &TradeEvent<N>) {
        trace!(
            trading_pair = %self.trading_pair,
            price = ?trade.price,
            amount = ?trade.amount,
            side = ?trade.side,
            "Trade applied"
        );
        self.last_trade_price = Some(trade.price.clone());
        self.last_trade_timestamp = Some(trade.timestamp);
    }

    /// Replace both sides with a full snapshot
    ///
    /// The batch is validated before anything is cleared, so a rejected
    /// snapshot leaves the book untouched.
    pub fn apply_snapshot(
        &mut self,
        bids: Vec<BookUpdate<N>>,
        asks: Vec<BookUpdate<N>>,
        update_id: u64,
    ) -> Result<CrossResolution<N>, BookError> {
        bids.iter().chain(asks.iter()).try_for_each(validate_update)?;

        self.bids.clear();
        self.asks.clear();
        self.load(bids, asks);
        self.snapshot_uid = Some(update_id);
        self.last_diff_uid = Some(update_id);

        debug!(
            trading_pair = %self.trading_pair,
            update_id,
            bid_levels = self.bids.level_count(),
            ask_levels = self.asks.level_count(),
            "Snapshot applied"
        );

        Ok(self.resolve_crossed())
    }

    /// Apply an incremental batch, then resolve crosses
    ///
    /// Batches at or below the current snapshot's update id are ignored.
    pub fn apply_diffs(
        &mut self,
        bids: Vec<BookUpdate<N>>,
        asks: Vec<BookUpdate<N>>,
        update_id: u64,
    ) -> Result<DiffOutcome<N>, BookError> {
        if let Some(snapshot_uid) = self.snapshot_uid {
            if update_id <= snapshot_uid {
                trace!(
                    trading_pair = %self.trading_pair,
                    update_id,
                    snapshot_uid,
                    "Ignoring stale diff batch"
                );
                return Ok(DiffOutcome::Stale {
                    update_id,
                    snapshot_uid,
                });
            }
        }

        bids.iter().chain(asks.iter()).try_for_each(validate_update)?;

        self.load(bids, asks);
        self.last_diff_uid = Some(update_id);

        Ok(DiffOutcome::Applied(self.resolve_crossed()))
    }

    /// Run the configured cross-resolution policy over both sides
    pub fn resolve_crossed(&mut self) -> CrossResolution<N> {
        let resolution = resolve_crossed(&mut self.bids, &mut self.asks, self.policy);
        if !resolution.is_empty() {
            debug!(
                trading_pair = %self.trading_pair,
                removed_bids = resolution.removed_bids.len(),
                removed_asks = resolution.removed_asks.len(),
                "Resolved crossed book"
            );
        }
        resolution
    }

    fn load(&mut self, bids: Vec<BookUpdate<N>>, asks: Vec<BookUpdate<N>>) {
        for update in bids {
            self.bids.insert_entry(update.into_entry());
        }
        for update in asks {
            self.asks.insert_entry(update.into_entry());
        }
    }

    pub fn trading_pair(&self) -> &TradingPair {
        &self.trading_pair
    }

    pub fn policy(&self) -> CrossPolicy {
        self.policy
    }

    pub fn bids(&self) -> &OrderBookSide<N> {
        &self.bids
    }

    pub fn asks(&self) -> &OrderBookSide<N> {
        &self.asks
    }

    pub fn snapshot_uid(&self) -> Option<u64> {
        self.snapshot_uid
    }

    pub fn last_diff_uid(&self) -> Option<u64> {
        self.last_diff_uid
    }

    pub fn last_trade_price(&self) -> Option<&Shared<N>> {
        self.last_trade_price.as_ref()
    }

    pub fn last_trade_timestamp(&self) -> Option<i64> {
        self.last_trade_timestamp
    }

    pub fn best_bid(&self) -> Option<&PriceLevelEntry<N>> {
        self.bids.best()
    }

    pub fn best_ask(&self) -> Option<&PriceLevelEntry<N>> {
        self.asks.best()
    }

    /// Get the spread between best ask and best bid
    ///
    /// `None` when a side is empty or the top of book is crossed.
    pub fn spread(&self) -> Option<N> {
        let bid = self.bids.best_price()?;
        let ask = self.asks.best_price()?;
        if can_match(bid, ask) {
            return None;
        }
        Some(ask.value() - bid.value())
    }

    /// Best-first levels per side, capped at the configured maximum depth
    pub fn depth_snapshot(&self, depth: usize) -> DepthSnapshot<N> {
        let depth = depth.min(self.max_snapshot_depth);
        DepthSnapshot {
            trading_pair: self.trading_pair.clone(),
            bids: self.bids.depth_snapshot(depth),
            asks: self.asks.depth_snapshot(depth),
            snapshot_uid: self.snapshot_uid,
            last_diff_uid: self.last_diff_uid,
        }
    }

    /// Side a taker walks: buying lifts the asks, selling hits the bids
    fn taker_side(&self, is_buy: bool) -> &OrderBookSide<N> {
        if is_buy {
            &self.asks
        } else {
            &self.bids
        }
    }

    /// Price of the deepest level a taker reaches to fill `volume`
    ///
    /// `result_price` is `None` when the side holds less than `volume`; the
    /// available amount is still reported in `result_volume`.
    pub fn price_for_volume(&self, is_buy: bool, volume: &N) -> VolumeQuery<N> {
        let mut cumulative = N::zero();
        for level in self.taker_side(is_buy).iter_best_first() {
            // A sum past N's range is past any representable target
            let reached = match cumulative.checked_add(level.amount()) {
                Some(sum) => {
                    cumulative = sum;
                    cumulative >= *volume
                }
                None => true,
            };
            if reached {
                return VolumeQuery {
                    query_volume: volume.clone(),
                    result_price: Some(level.price().value()),
                    result_volume: volume.clone(),
                };
            }
        }
        VolumeQuery {
            query_volume: volume.clone(),
            result_price: None,
            result_volume: cumulative,
        }
    }

    /// Price of the deepest level a taker reaches to spend `quote_volume`
    ///
    /// Levels count `price × amount` toward the target; otherwise behaves
    /// like [`OrderBook::price_for_volume`].
    pub fn price_for_quote_volume(&self, is_buy: bool, quote_volume: &N) -> VolumeQuery<N> {
        let mut cumulative = N::zero();
        for level in self.taker_side(is_buy).iter_best_first() {
            let sum = level
                .checked_notional()
                .and_then(|notional| cumulative.checked_add(&notional));
            let reached = match sum {
                Some(sum) => {
                    cumulative = sum;
                    cumulative >= *quote_volume
                }
                None => true,
            };
            if reached {
                return VolumeQuery {
                    query_volume: quote_volume.clone(),
                    result_price: Some(level.price().value()),
                    result_volume: quote_volume.clone(),
                };
            }
        }
        VolumeQuery {
            query_volume: quote_volume.clone(),
            result_price: None,
            result_volume: cumulative,
        }
    }

    /// Volume-weighted average price a taker pays to fill `volume`
    ///
    /// Takes each level best-first, the last one partially. On a thin side
    /// the average covers only what is available and `result_volume` says
    /// how much that was. `result_price` is `None` for an empty side or when
    /// the running cost overflows `N`.
    pub fn vwap_for_volume(&self, is_buy: bool, volume: &N) -> VolumeQuery<N> {
        let mut total_cost = N::zero();
        let mut filled = N::zero();
        let mut overflowed = false;

        for level in self.taker_side(is_buy).iter_best_first() {
            if filled >= *volume {
                break;
            }
            let take = std::cmp::min(level.amount().value(), volume.clone() - filled.clone());
            match level
                .price()
                .checked_mul(&take)
                .and_then(|cost| total_cost.checked_add(&cost))
            {
                Some(cost) => total_cost = cost,
                None => {
                    overflowed = true;
                    break;
                }
            }
            filled = filled + take;
        }

        let result_price = if overflowed || filled.is_zero() {
            None
        } else {
            Some(total_cost / filled.clone())
        };
        VolumeQuery {
            query_volume: volume.clone(),
            result_price,
            result_volume: filled,
        }
    }
}

impl OrderBook<Decimal> {
    /// Get the mid-market price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<Decimal> {
        let bid = self.bids.best_price()?;
        let ask = self.asks.best_price()?;
        Some((bid.as_decimal() + ask.as_decimal()) / Decimal::from(2))
    }
}

fn validate_update<N: BookNumber>(update: &BookUpdate<N>) -> Result<(), BookError> {
    if update.amount.is_negative() {
        return Err(BookError::NegativeAmount {
            price: format!("{:?}", update.price),
            amount: format!("{:?}", update.amount),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::numeric::{Price, Quantity};

    fn make_book(config: BookConfig) -> OrderBook {
        OrderBook::new(TradingPair::new("BTC-USDT"), &config)
    }

    fn update(price: &str, amount: &str, update_id: u64) -> BookUpdate {
        BookUpdate::new(
            Price::from_str(price).unwrap(),
            Quantity::from_str(amount).unwrap(),
            update_id,
        )
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn test_empty_book() {
        let book = make_book(BookConfig::default());
        assert!(book.best_bid().is_none());
        assert!(book.best_ask().is_none());
        assert!(book.mid_price().is_none());
        assert!(book.spread().is_none());
        assert_eq!(book.snapshot_uid(), None);
    }

    #[test]
    fn test_apply_snapshot_replaces_levels() {
        let mut book = make_book(BookConfig::default());
        book.apply_snapshot(vec![update("99", "1", 1)], vec![update("101", "1", 1)], 1)
            .unwrap();
        book.apply_snapshot(vec![update("98", "2", 5)], vec![update("102", "2", 5)], 5)
            .unwrap();

        assert_eq!(book.bids().level_count(), 1);
        assert_eq!(book.best_bid().unwrap().price(), &Price::from_u64(98));
        assert_eq!(book.best_ask().unwrap().price(), &Price::from_u64(102));
        assert_eq!(book.snapshot_uid(), Some(5));
        assert_eq!(book.last_diff_uid(), Some(5));
    }

    #[test]
    fn test_snapshot_skips_zero_levels() {
        let mut book = make_book(BookConfig::default());
        book.apply_snapshot(vec![update("99", "0", 1), update("98", "1", 1)], vec![], 1)
            .unwrap();
        assert_eq!(book.bids().level_count(), 1);
    }

    #[test]
    fn test_rejected_snapshot_leaves_book_untouched() {
        let mut book = make_book(BookConfig::default());
        book.apply_snapshot(vec![update("99", "1", 1)], vec![], 1).unwrap();

        let err = book
            .apply_snapshot(vec![update("98", "-1", 2)], vec![], 2)
            .unwrap_err();

        assert!(matches!(err, BookError::NegativeAmount { .. }));
        assert_eq!(book.best_bid().unwrap().price(), &Price::from_u64(99));
        assert_eq!(book.snapshot_uid(), Some(1));
    }

    #[test]
    fn test_stale_diffs_ignored() {
        let mut book = make_book(BookConfig::default());
        book.apply_snapshot(vec![update("99", "1", 10)], vec![], 10).unwrap();

        let outcome = book.apply_diffs(vec![update("100", "1", 9)], vec![], 9).unwrap();

        assert!(outcome.is_stale());
        assert_eq!(book.best_bid().unwrap().price(), &Price::from_u64(99));
        assert_eq!(book.last_diff_uid(), Some(10));
    }

    #[test]
    fn test_diffs_before_any_snapshot_apply() {
        let mut book = make_book(BookConfig::default());
        let outcome = book.apply_diffs(vec![update("99", "1", 1)], vec![], 1).unwrap();

        assert!(!outcome.is_stale());
        assert_eq!(book.bids().level_count(), 1);
        assert_eq!(book.last_diff_uid(), Some(1));
    }

    #[test]
    fn test_diffs_resolve_cross_by_recency() {
        let mut book = make_book(BookConfig::centralized());
        book.apply_snapshot(vec![update("100", "1", 1)], vec![update("101", "1", 1)], 1)
            .unwrap();

        // Newer ask crosses the older bid
        let outcome = book.apply_diffs(vec![], vec![update("99.5", "1", 2)], 2).unwrap();

        match outcome {
            DiffOutcome::Applied(resolution) => {
                assert_eq!(resolution.removed_bids.len(), 1);
                assert!(resolution.removed_asks.is_empty());
            }
            DiffOutcome::Stale { .. } => panic!("Expected Applied outcome"),
        }
        assert!(book.best_bid().is_none());
        assert_eq!(book.best_ask().unwrap().price(), &Price::from_str("99.5").unwrap());
    }

    #[test]
    fn test_diffs_resolve_cross_by_notional() {
        let mut book = make_book(BookConfig::decentralized());
        book.apply_snapshot(vec![update("100", "10", 1)], vec![update("101", "1", 1)], 1)
            .unwrap();

        book.apply_diffs(vec![], vec![update("99", "1", 2)], 2).unwrap();

        // Bid notional 1000 beats ask notional 99
        assert_eq!(book.best_bid().unwrap().price(), &Price::from_u64(100));
        assert_eq!(book.best_ask().unwrap().price(), &Price::from_u64(101));
    }

    #[test]
    fn test_apply_update_rejects_negative_amount() {
        let mut book = make_book(BookConfig::default());
        let result = book.apply_update(Side::BUY, update("100", "-0.5", 1));
        assert!(result.is_err());
        assert!(book.bids().is_empty());

        book.apply_update(Side::SELL, update("101", "0.5", 1).with_order_count(3))
            .unwrap();
        assert_eq!(book.best_ask().unwrap().order_count(), 3);
    }

    #[test]
    fn test_mid_price_and_spread() {
        let mut book = make_book(BookConfig::default());
        book.apply_snapshot(
            vec![update("50000", "1", 1), update("49000", "1", 1)],
            vec![update("51000", "1", 1), update("52000", "1", 1)],
            1,
        )
        .unwrap();

        assert_eq!(book.spread(), Some(Decimal::from(1000)));
        assert_eq!(book.mid_price(), Some(Decimal::from(50500)));
    }

    #[test]
    fn test_depth_snapshot_capped_by_config() {
        let mut book = make_book(BookConfig::default().with_max_snapshot_depth(2));
        let bids = (1..=5).map(|i| update(&(100 - i).to_string(), "1", 1)).collect();
        let asks = (1..=5).map(|i| update(&(100 + i).to_string(), "1", 1)).collect();
        book.apply_snapshot(bids, asks, 7).unwrap();

        let snapshot = book.depth_snapshot(10);
        assert_eq!(snapshot.bids.len(), 2);
        assert_eq!(snapshot.asks.len(), 2);
        assert!(snapshot.bids[0].price() > snapshot.bids[1].price());
        assert!(snapshot.asks[0].price() < snapshot.asks[1].price());
        assert_eq!(snapshot.snapshot_uid, Some(7));
    }

    fn depth_book() -> OrderBook {
        let mut book = make_book(BookConfig::default());
        book.apply_snapshot(
            vec![update("99", "1", 1), update("98", "2", 1)],
            vec![update("101", "1", 1), update("102", "2", 1), update("103", "5", 1)],
            1,
        )
        .unwrap();
        book
    }

    #[test]
    fn test_price_for_volume() {
        let book = depth_book();

        let buy = book.price_for_volume(true, &dec("2.5"));
        assert_eq!(buy.result_price, Some(dec("102")));
        assert_eq!(buy.result_volume, dec("2.5"));
        assert_eq!(buy.query_volume, dec("2.5"));

        let partial = book.price_for_volume(true, &dec("0.5"));
        assert_eq!(partial.result_price, Some(dec("101")));
        assert_eq!(partial.result_volume, dec("0.5"));

        let sell = book.price_for_volume(false, &dec("1"));
        assert_eq!(sell.result_price, Some(dec("99")));
    }

    #[test]
    fn test_price_for_volume_thin_book() {
        let book = depth_book();

        let thin = book.price_for_volume(false, &dec("10"));
        assert_eq!(thin.result_price, None);
        assert_eq!(thin.result_volume, dec("3"));

        let thin = book.price_for_volume(true, &dec("100"));
        assert_eq!(thin.result_price, None);
        assert_eq!(thin.result_volume, dec("8"));
    }

    #[test]
    fn test_price_for_volume_empty_side() {
        let book = make_book(BookConfig::default());
        let query = book.price_for_volume(true, &dec("1"));
        assert_eq!(query.result_price, None);
        assert!(query.result_volume.is_zero());
    }

    #[test]
    fn test_price_for_quote_volume() {
        let book = depth_book();

        // 101 + 204 = 305 quote covers 250
        let buy = book.price_for_quote_volume(true, &dec("250"));
        assert_eq!(buy.result_price, Some(dec("102")));
        assert_eq!(buy.result_volume, dec("250"));

        let sell = book.price_for_quote_volume(false, &dec("99"));
        assert_eq!(sell.result_price, Some(dec("99")));

        // Bids hold 99 + 196 = 295 quote
        let thin = book.price_for_quote_volume(false, &dec("1000"));
        assert_eq!(thin.result_price, None);
        assert_eq!(thin.result_volume, dec("295"));
    }

    #[test]
    fn test_vwap_for_volume() {
        let book = depth_book();

        // 1 @ 101 + 1 @ 102
        let buy = book.vwap_for_volume(true, &dec("2"));
        assert_eq!(buy.result_price, Some(dec("101.5")));
        assert_eq!(buy.result_volume, dec("2"));

        // 1 @ 99 + 1 @ 98
        let sell = book.vwap_for_volume(false, &dec("2"));
        assert_eq!(sell.result_price, Some(dec("98.5")));

        // Thin side averages what exists: (99 + 196) / 3
        let thin = book.vwap_for_volume(false, &dec("6"));
        assert_eq!(thin.result_volume, dec("3"));
        assert_eq!(thin.result_price, Some(dec("295") / dec("3")));

        let empty = make_book(BookConfig::default()).vwap_for_volume(true, &dec("1"));
        assert_eq!(empty.result_price, None);
    }

    #[test]
    fn test_apply_trade_records_last_price() {
        let mut book = make_book(BookConfig::default());
        assert!(book.last_trade_price().is_none());

        book.apply_trade(&TradeEvent::new(
            Price::from_str("100.5").unwrap(),
            Quantity::from_str("0.2").unwrap(),
            Side::BUY,
            1_700_000_000_000_000_000,
        ));
        book.apply_trade(&TradeEvent::new(
            Price::from_u64(101),
            Quantity::from_u64(1),
            Side::SELL,
            1_700_000_001_000_000_000,
        ));

        assert_eq!(book.last_trade_price(), Some(&Price::from_u64(101)));
        assert_eq!(book.last_trade_timestamp(), Some(1_700_000_001_000_000_000));
        // Trades leave resting levels alone
        assert!(book.best_bid().is_none());
    }

    #[test]
    fn test_apply_update_resolves_cross() {
        let mut book: OrderBook<u64> =
            OrderBook::new(TradingPair::new("BTC-USDT"), &BookConfig::centralized());

        book.apply_update(Side::BUY, BookUpdate::new(Shared::new(105), Shared::new(1), 1))
            .unwrap();
        let outcome = book
            .apply_update(Side::SELL, BookUpdate::new(Shared::new(100), Shared::new(1), 2))
            .unwrap();

        match outcome {
            DiffOutcome::Applied(resolution) => assert_eq!(resolution.removed_bids.len(), 1),
            DiffOutcome::Stale { .. } => panic!("Expected Applied outcome"),
        }
        assert!(book.best_bid().is_none());
        assert_eq!(book.spread(), None);
        assert_eq!(book.last_diff_uid(), Some(2));
    }

    #[test]
    fn test_apply_update_stale_after_snapshot() {
        let mut book = make_book(BookConfig::default());
        book.apply_snapshot(vec![update("99", "1", 10)], vec![], 10).unwrap();

        let outcome = book.apply_update(Side::BUY, update("100", "1", 10)).unwrap();

        assert!(outcome.is_stale());
        assert_eq!(book.best_bid().unwrap().price(), &Price::from_u64(99));
    }

    #[test]
    fn test_spread_with_integer_prices() {
        let mut book: OrderBook<u64> =
            OrderBook::new(TradingPair::new("BTC-USDT"), &BookConfig::decentralized());
        book.apply_snapshot(
            vec![BookUpdate::new(Shared::new(99), Shared::new(1), 1)],
            vec![BookUpdate::new(Shared::new(101), Shared::new(1), 1)],
            1,
        )
        .unwrap();
        assert_eq!(book.spread(), Some(2));
    }
}
