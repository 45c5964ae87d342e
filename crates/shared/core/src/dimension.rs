//! The six-dimensional (side, kind) event taxonomy
//!
//! The multivariate generator models one intensity per (side, kind)
//! combination. The dimension order is part of the wire/parameter contract:
//! baseline vectors and excitation/decay matrices are indexed by it.

use crate::event::{EventKind, Side};
use serde::{Deserialize, Serialize};

/// One coordinate of the six-dimensional event taxonomy.
///
/// Market orders record the aggressor: `MarketBuy` consumes asks and carries
/// `Side::Bid`, `MarketSell` consumes bids and carries `Side::Ask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    BidAdd,
    AskAdd,
    BidCancel,
    AskCancel,
    MarketBuy,
    MarketSell,
}

impl Dimension {
    /// Number of dimensions; baseline vectors and matrices must match it
    pub const COUNT: usize = 6;

    /// All dimensions in index order
    pub const ALL: [Dimension; Dimension::COUNT] = [
        Dimension::BidAdd,
        Dimension::AskAdd,
        Dimension::BidCancel,
        Dimension::AskCancel,
        Dimension::MarketBuy,
        Dimension::MarketSell,
    ];

    /// Position of this dimension in vectors/matrices
    pub fn index(self) -> usize {
        match self {
            Dimension::BidAdd => 0,
            Dimension::AskAdd => 1,
            Dimension::BidCancel => 2,
            Dimension::AskCancel => 3,
            Dimension::MarketBuy => 4,
            Dimension::MarketSell => 5,
        }
    }

    /// Inverse of [`Dimension::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Dimension::ALL.get(index).copied()
    }

    pub fn kind(self) -> EventKind {
        match self {
            Dimension::BidAdd | Dimension::AskAdd => EventKind::Add,
            Dimension::BidCancel | Dimension::AskCancel => EventKind::Cancel,
            Dimension::MarketBuy | Dimension::MarketSell => EventKind::Market,
        }
    }

    pub fn side(self) -> Side {
        match self {
            Dimension::BidAdd | Dimension::BidCancel | Dimension::MarketBuy => Side::Bid,
            Dimension::AskAdd | Dimension::AskCancel | Dimension::MarketSell => Side::Ask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for dim in Dimension::ALL {
            assert_eq!(Dimension::from_index(dim.index()), Some(dim));
        }
        assert_eq!(Dimension::from_index(Dimension::COUNT), None);
    }

    #[test]
    fn test_all_is_index_ordered() {
        for (i, dim) in Dimension::ALL.iter().enumerate() {
            assert_eq!(dim.index(), i);
        }
    }

    #[test]
    fn test_market_aggressor_sides() {
        assert_eq!(Dimension::MarketBuy.side(), Side::Bid);
        assert_eq!(Dimension::MarketBuy.kind(), EventKind::Market);
        assert_eq!(Dimension::MarketSell.side(), Side::Ask);
    }

    #[test]
    fn test_taxonomy_covers_every_combination() {
        let mut seen = std::collections::HashSet::new();
        for dim in Dimension::ALL {
            assert!(seen.insert((dim.side(), dim.kind())));
        }
        assert_eq!(seen.len(), Dimension::COUNT);
    }
}
