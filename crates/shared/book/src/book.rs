//! Order book maintenance and crossing
//!
//! Core rules:
//! - every incoming Add/Cancel price is rounded to the tick grid
//! - marketable limit orders execute immediately against the opposite side
//! - market orders consume the opposite side from the best level outward
//! - a best price only moves when its level is fully depleted

use lobsim_core::{Event, EventKind, Side};
use std::collections::BTreeMap;

/// Fallback tick size when construction receives a non-positive or
/// non-finite value.
const DEFAULT_TICK_SIZE: f64 = 0.1;

/// Best resting price and quantity on one side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub price: f64,
    pub quantity: u64,
}

/// Best level on each side; `None` where the side is empty
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TopOfBook {
    pub bid: Option<Level>,
    pub ask: Option<Level>,
}

/// Derived top-of-book metrics; every field absent when either side is empty
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BookMetrics {
    /// Arithmetic mean of best bid and best ask
    pub mid: Option<f64>,
    /// Best ask minus best bid
    pub spread: Option<f64>,
    /// (best bid qty - best ask qty) / (best bid qty + best ask qty)
    pub imbalance_top1: Option<f64>,
}

/// Level-aggregated limit order book
///
/// Ladders are keyed by signed tick index (`round(price / tick)`), so every
/// price entering the book lands on the same grid point that a later cancel
/// referencing the same nominal price resolves to. Quantities at rest are
/// always strictly positive; depleted levels are removed immediately.
#[derive(Debug, Clone)]
pub struct OrderBook {
    tick_size: f64,
    bids: BTreeMap<i64, u64>,
    asks: BTreeMap<i64, u64>,
}

impl OrderBook {
    /// Create an empty book with the given tick size.
    ///
    /// A non-positive or non-finite tick size falls back to 0.1.
    pub fn new(tick_size: f64) -> Self {
        let tick_size = if tick_size.is_finite() && tick_size > 0.0 {
            tick_size
        } else {
            DEFAULT_TICK_SIZE
        };
        Self {
            tick_size,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
        }
    }

    pub fn tick_size(&self) -> f64 {
        self.tick_size
    }

    /// Round a price to the nearest tick-grid point (half away from zero)
    pub fn round_to_tick(&self, price: f64) -> f64 {
        (price / self.tick_size).round() * self.tick_size
    }

    fn tick_index(&self, price: f64) -> i64 {
        (price / self.tick_size).round() as i64
    }

    fn price_at(&self, index: i64) -> f64 {
        index as f64 * self.tick_size
    }

    /// Apply an event to the book.
    ///
    /// Returns `false` without mutation when the event is invalid
    /// (non-finite timestamp, zero quantity, or a non-finite/non-positive
    /// price on an Add/Cancel). Otherwise the event is applied in full:
    /// a marketable Add executes instead of resting, a Cancel floors at
    /// level removal, a Market consumes the opposite side. Canceling a
    /// price with nothing resting is a no-op that still succeeds.
    pub fn apply(&mut self, event: &Event) -> bool {
        if !event.time.is_finite() || event.quantity == 0 {
            return false;
        }
        let quantity = u64::from(event.quantity);

        match event.kind {
            EventKind::Add => {
                if !event.price.is_finite() || event.price <= 0.0 {
                    return false;
                }
                let index = self.tick_index(event.price);

                match event.side {
                    Side::Bid => {
                        // Marketable limit buy: price >= best ask executes
                        // immediately and rests nothing.
                        let crosses = self
                            .asks
                            .first_key_value()
                            .is_some_and(|(&best, _)| index >= best);
                        if crosses {
                            self.consume_asks(quantity);
                        } else {
                            *self.bids.entry(index).or_insert(0) += quantity;
                        }
                    }
                    Side::Ask => {
                        let crosses = self
                            .bids
                            .last_key_value()
                            .is_some_and(|(&best, _)| index <= best);
                        if crosses {
                            self.consume_bids(quantity);
                        } else {
                            *self.asks.entry(index).or_insert(0) += quantity;
                        }
                    }
                }
                true
            }
            EventKind::Cancel => {
                if !event.price.is_finite() || event.price <= 0.0 {
                    return false;
                }
                let index = self.tick_index(event.price);
                let ladder = match event.side {
                    Side::Bid => &mut self.bids,
                    Side::Ask => &mut self.asks,
                };
                if let Some(resting) = ladder.get_mut(&index) {
                    if *resting <= quantity {
                        ladder.remove(&index);
                    } else {
                        *resting -= quantity;
                    }
                }
                true
            }
            EventKind::Market => {
                // Side is the aggressor: a buy consumes asks, a sell bids.
                // The price field is ignored.
                match event.side {
                    Side::Bid => self.consume_asks(quantity),
                    Side::Ask => self.consume_bids(quantity),
                }
                true
            }
        }
    }

    fn consume_asks(&mut self, mut quantity: u64) {
        while quantity > 0 {
            // Lowest ask = best ask
            let Some(mut best) = self.asks.first_entry() else {
                break;
            };
            let available = *best.get();
            if available > quantity {
                *best.get_mut() = available - quantity;
                break;
            }
            quantity -= available;
            best.remove();
        }
    }

    fn consume_bids(&mut self, mut quantity: u64) {
        while quantity > 0 {
            // Highest bid = best bid
            let Some(mut best) = self.bids.last_entry() else {
                break;
            };
            let available = *best.get();
            if available > quantity {
                *best.get_mut() = available - quantity;
                break;
            }
            quantity -= available;
            best.remove();
        }
    }

    /// Best level on each side
    pub fn top(&self) -> TopOfBook {
        TopOfBook {
            bid: self.bids.last_key_value().map(|(&index, &quantity)| Level {
                price: self.price_at(index),
                quantity,
            }),
            ask: self.asks.first_key_value().map(|(&index, &quantity)| Level {
                price: self.price_at(index),
                quantity,
            }),
        }
    }

    /// Derived top-of-book metrics, recomputed on demand
    pub fn metrics(&self) -> BookMetrics {
        let top = self.top();
        let (Some(bid), Some(ask)) = (top.bid, top.ask) else {
            return BookMetrics::default();
        };

        let quantity_bid = bid.quantity as f64;
        let quantity_ask = ask.quantity as f64;
        let denom = quantity_bid + quantity_ask;
        let imbalance_top1 = if denom > 0.0 {
            Some((quantity_bid - quantity_ask) / denom)
        } else {
            None
        };

        BookMetrics {
            mid: Some(0.5 * (bid.price + ask.price)),
            spread: Some(ask.price - bid.price),
            imbalance_top1,
        }
    }

    /// Number of resting bid price levels
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Number of resting ask price levels
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Resting quantity at a price level, zero when nothing rests there
    pub fn quantity_at(&self, side: Side, price: f64) -> u64 {
        let index = self.tick_index(price);
        let ladder = match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        };
        ladder.get(&index).copied().unwrap_or(0)
    }
}
