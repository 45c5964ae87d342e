//! Shared event-body sampling
//!
//! The arrival-time models only decide *when* something happens. The side,
//! kind, quantity, and naive price of the resulting event are independent
//! draws shared by the Poisson and univariate Hawkes generators.

use crate::error::{ProcessError, Result};
use lobsim_core::{Event, EventKind, Side};
use rand::distributions::{Distribution, Uniform};
use rand::prelude::*;

/// Probability that a generated passive event is an Add rather than a Cancel
const ADD_PROBABILITY: f64 = 0.8;

/// Generated quotes sit 1..=5 ticks away from the configured center
const MAX_CENTER_OFFSET_TICKS: u32 = 5;

/// Draws the non-temporal parts of an event: side by fair coin, kind with a
/// fixed Add bias, quantity uniform in the configured bounds, price offset
/// 1..=5 ticks from the center on the event's own side.
#[derive(Debug, Clone)]
pub(crate) struct MarkSampler {
    price_center: f64,
    tick_size: f64,
    quantity: Uniform<u32>,
}

impl MarkSampler {
    pub(crate) fn new(
        price_center: f64,
        tick_size: f64,
        qty_min: u32,
        qty_max: u32,
    ) -> Result<Self> {
        if !price_center.is_finite() || price_center <= 0.0 {
            return Err(ProcessError::InvalidParameter(format!(
                "price_center must be finite and positive, got {price_center}"
            )));
        }
        if !tick_size.is_finite() || tick_size <= 0.0 {
            return Err(ProcessError::InvalidParameter(format!(
                "tick_size must be finite and positive, got {tick_size}"
            )));
        }
        validate_quantity_bounds(qty_min, qty_max)?;

        Ok(Self {
            price_center,
            tick_size,
            quantity: Uniform::new_inclusive(qty_min, qty_max),
        })
    }

    pub(crate) fn sample(&self, time: f64, rng: &mut StdRng) -> Event {
        let side = if rng.r#gen::<bool>() {
            Side::Bid
        } else {
            Side::Ask
        };
        let kind = if rng.gen_bool(ADD_PROBABILITY) {
            EventKind::Add
        } else {
            EventKind::Cancel
        };
        let quantity = self.quantity.sample(rng);

        // Never quote the center itself; a zero offset would collapse the spread
        let offset = 1 + self.quantity.sample(rng) % MAX_CENTER_OFFSET_TICKS;
        let price = match side {
            Side::Bid => self.price_center - f64::from(offset) * self.tick_size,
            Side::Ask => self.price_center + f64::from(offset) * self.tick_size,
        };

        Event {
            time,
            kind,
            side,
            price,
            quantity,
        }
    }
}

pub(crate) fn validate_quantity_bounds(qty_min: u32, qty_max: u32) -> Result<()> {
    if qty_min == 0 || qty_min > qty_max {
        return Err(ProcessError::InvalidParameter(format!(
            "quantity bounds must satisfy 1 <= min <= max, got [{qty_min}, {qty_max}]"
        )));
    }
    Ok(())
}

/// Exponential draw by inversion. The uniform is mapped into (0, 1] so the
/// logarithm stays finite.
pub(crate) fn exp_draw(rng: &mut StdRng, rate: f64) -> f64 {
    let u: f64 = rng.r#gen();
    -(1.0 - u).ln() / rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_bounds() {
        assert!(validate_quantity_bounds(0, 10).is_err());
        assert!(validate_quantity_bounds(10, 5).is_err());
        assert!(validate_quantity_bounds(1, 1).is_ok());
    }

    #[test]
    fn test_rejects_bad_center_and_tick() {
        assert!(MarkSampler::new(0.0, 0.1, 1, 10).is_err());
        assert!(MarkSampler::new(f64::NAN, 0.1, 1, 10).is_err());
        assert!(MarkSampler::new(100.0, -0.1, 1, 10).is_err());
    }

    #[test]
    fn test_samples_stay_in_bounds() {
        let sampler = MarkSampler::new(100.0, 0.1, 5, 50).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let event = sampler.sample(1.0, &mut rng);
            assert!((5..=50).contains(&event.quantity));
            let offset_ticks = ((event.price - 100.0).abs() / 0.1).round() as u32;
            assert!((1..=5).contains(&offset_ticks));
            match event.side {
                Side::Bid => assert!(event.price < 100.0),
                Side::Ask => assert!(event.price > 100.0),
            }
        }
    }

    #[test]
    fn test_exp_draw_is_positive_and_finite() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let draw = exp_draw(&mut rng, 2.5);
            assert!(draw.is_finite());
            assert!(draw >= 0.0);
        }
    }
}
