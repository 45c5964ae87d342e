//! State-dependent process weighting
//!
//! Maps live book conditions onto a per-dimension weight vector for the
//! six-dimensional generator: a wide spread favors liquidity provision, a
//! tight spread favors aggression, heavy resting quantity favors cancels,
//! and top-of-book imbalance pushes market orders with the pressure.

use lobsim_book::OrderBook;
use lobsim_core::Dimension;
use serde::{Deserialize, Serialize};

/// Clamp range applied to every derived weight.
///
/// The range is a calibration choice of the driver, not a property of the
/// generator's weight contract, so it stays configurable here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    pub min: f64,
    pub max: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            min: 0.05,
            max: 50.0,
        }
    }
}

/// Derive the six-dimension weight vector from current book conditions.
/// Returns neutral weights while the book is one-sided.
pub fn derive_weights(book: &OrderBook, config: &WeightConfig) -> [f64; Dimension::COUNT] {
    let mut weights = [1.0; Dimension::COUNT];

    let top = book.top();
    let (Some(bid), Some(ask)) = (top.bid, top.ask) else {
        return weights;
    };

    let tick = book.tick_size();
    let spread = ask.price - bid.price;
    let spread_ticks = if tick > 0.0 { spread / tick } else { 1.0 };

    let quantity_bid = bid.quantity as f64;
    let quantity_ask = ask.quantity as f64;
    let denom = quantity_bid + quantity_ask;
    let imbalance = if denom > 0.0 {
        (quantity_bid - quantity_ask) / denom
    } else {
        0.0
    };

    // Wide spread invites quotes into the gap; tight spread invites taking
    let wide = 1.0 + 0.8 * spread_ticks;
    let tight = 1.0 + 2.5 / (1.0 + spread_ticks);

    weights[Dimension::BidAdd.index()] = wide;
    weights[Dimension::AskAdd.index()] = wide;
    weights[Dimension::BidCancel.index()] = 1.0 + 0.01 * quantity_bid;
    weights[Dimension::AskCancel.index()] = 1.0 + 0.01 * quantity_ask;
    weights[Dimension::MarketBuy.index()] = tight * (1.0 + 1.5 * imbalance.max(0.0));
    weights[Dimension::MarketSell.index()] = tight * (1.0 + 1.5 * (-imbalance).max(0.0));

    for weight in &mut weights {
        *weight = if weight.is_finite() {
            weight.clamp(config.min, config.max)
        } else {
            config.min
        };
    }
    weights
}
