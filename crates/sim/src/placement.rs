//! Concrete price assignment for generated events
//!
//! Generators that cannot see the book leave the price at the 0.0 sentinel;
//! this policy turns such an Add into an improve/join/lay-behind quote
//! relative to the current touch, and points a Cancel at the best level on
//! its own side. Market orders keep the sentinel since their price is
//! ignored on application.

use lobsim_book::OrderBook;
use lobsim_core::{Event, EventKind, Side};
use rand::distributions::{Distribution, Uniform};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Improve probability once the spread reaches `wide_spread_ticks`
    pub improve_prob_wide: f64,
    /// Improve probability on a tighter spread
    pub improve_prob_tight: f64,
    pub join_prob: f64,
    pub wide_spread_ticks: f64,
    /// Lay-behind depth is uniform in 1..=max_depth_ticks
    pub max_depth_ticks: u32,
    /// Seed for the policy-owned generator
    pub seed: u64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            improve_prob_wide: 0.45,
            improve_prob_tight: 0.20,
            join_prob: 0.50,
            wide_spread_ticks: 3.0,
            max_depth_ticks: 5,
            seed: 42,
        }
    }
}

/// Improve/join/lay-behind quote placement with its own seeded generator
pub struct PlacementPolicy {
    config: PlacementConfig,
    roll: Uniform<u32>,
    depth: Uniform<u32>,
    rng: StdRng,
}

impl PlacementPolicy {
    pub fn new(config: PlacementConfig) -> Self {
        let max_depth = config.max_depth_ticks.max(1);
        Self {
            roll: Uniform::new(0, 100),
            depth: Uniform::new_inclusive(1, max_depth),
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    /// Assign a concrete price to the event from live book state.
    ///
    /// Needs both sides quoted for an Add; if either is missing the sentinel
    /// price stays and the book will reject the event.
    pub fn assign_price(&mut self, event: &mut Event, book: &OrderBook) {
        match event.kind {
            EventKind::Market => {
                event.price = 0.0;
            }
            EventKind::Cancel => {
                let top = book.top();
                let best = match event.side {
                    Side::Bid => top.bid,
                    Side::Ask => top.ask,
                };
                if let Some(level) = best {
                    event.price = level.price;
                }
            }
            EventKind::Add => {
                let top = book.top();
                let (Some(bid), Some(ask)) = (top.bid, top.ask) else {
                    return;
                };
                let tick = book.tick_size();
                let spread_ticks = (ask.price - bid.price) / tick;

                let improve_prob = if spread_ticks >= self.config.wide_spread_ticks {
                    self.config.improve_prob_wide
                } else {
                    self.config.improve_prob_tight
                };
                let improve_cutoff = (improve_prob * 100.0) as u32;
                let join_cutoff = ((improve_prob + self.config.join_prob) * 100.0) as u32;

                // Improving by one tick must leave a gap to the other side,
                // judged on the tick grid rather than raw float arithmetic
                let can_improve = spread_ticks.round() as i64 >= 2;
                let roll = self.roll.sample(&mut self.rng);

                event.price = match event.side {
                    Side::Bid => {
                        if roll < improve_cutoff && can_improve {
                            bid.price + tick
                        } else if roll < join_cutoff {
                            bid.price
                        } else {
                            let depth = self.depth.sample(&mut self.rng);
                            bid.price - f64::from(depth) * tick
                        }
                    }
                    Side::Ask => {
                        if roll < improve_cutoff && can_improve {
                            ask.price - tick
                        } else if roll < join_cutoff {
                            ask.price
                        } else {
                            let depth = self.depth.sample(&mut self.rng);
                            ask.price + f64::from(depth) * tick
                        }
                    }
                };
            }
        }
    }
}
