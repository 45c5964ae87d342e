//! Order-book event value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the book the event originates from.
///
/// For `Market` events this is the aggressor side: a `Bid` market order
/// consumes asks, an `Ask` market order consumes bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

/// What kind of instruction the event carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Limit order add (passive liquidity; marketable prices cross instead)
    Add,
    /// Cancel own-side resting liquidity
    Cancel,
    /// Aggressive order consuming the opposite best
    Market,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Add => write!(f, "add"),
            EventKind::Cancel => write!(f, "cancel"),
            EventKind::Market => write!(f, "market"),
        }
    }
}

/// A single order-book event
///
/// Events are produced by a generator process, optionally repriced by the
/// driver before application, and immutable once applied. `price` is only
/// meaningful for `Add`/`Cancel`; generators that cannot know the book state
/// leave it at the `0.0` sentinel for the driver to fill in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event time in seconds from run start
    pub time: f64,
    pub kind: EventKind,
    pub side: Side,
    /// Price level (used by Add/Cancel only)
    pub price: f64,
    /// Order size; must be strictly positive to be applicable
    pub quantity: u32,
}

impl Event {
    /// Passive or marketable limit order
    pub fn add(time: f64, side: Side, price: f64, quantity: u32) -> Self {
        Self {
            time,
            kind: EventKind::Add,
            side,
            price,
            quantity,
        }
    }

    /// Cancel of resting quantity at a price level
    pub fn cancel(time: f64, side: Side, price: f64, quantity: u32) -> Self {
        Self {
            time,
            kind: EventKind::Cancel,
            side,
            price,
            quantity,
        }
    }

    /// Market order; the price field is ignored on application
    pub fn market(time: f64, side: Side, quantity: u32) -> Self {
        Self {
            time,
            kind: EventKind::Market,
            side,
            price: 0.0,
            quantity,
        }
    }

    /// Whether this event kind reads its price field
    pub fn uses_price(&self) -> bool {
        matches!(self.kind, EventKind::Add | EventKind::Cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_side() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
    }

    #[test]
    fn test_market_ignores_price() {
        let e = Event::market(1.0, Side::Bid, 10);
        assert!(!e.uses_price());
        assert_eq!(e.price, 0.0);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(EventKind::Add.to_string(), "add");
        assert_eq!(EventKind::Market.to_string(), "market");
        assert_eq!(Side::Ask.to_string(), "ask");
    }

    #[test]
    fn test_serde_round_trip() {
        let e = Event::add(0.5, Side::Ask, 100.1, 40);
        let json = serde_json::to_string(&e).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
