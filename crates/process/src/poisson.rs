//! Memoryless baseline generator
//!
//! I.i.d. exponential inter-arrivals with independent event bodies. No path
//! dependence; this is the calibration/sanity baseline, not a realistic
//! order-flow model.

use crate::EventProcess;
use crate::error::{ProcessError, Result};
use crate::marks::{MarkSampler, exp_draw};
use lobsim_core::Event;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the Poisson generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoissonConfig {
    /// Arrival rate (events per unit time)
    pub rate: f64,
    /// Center price the naive quote offsets hang off
    pub price_center: f64,
    /// Tick size used for the quote offsets
    pub tick_size: f64,
    /// Inclusive quantity bounds
    pub qty_min: u32,
    pub qty_max: u32,
    /// Seed for the process-owned generator
    pub seed: u64,
}

impl Default for PoissonConfig {
    fn default() -> Self {
        Self {
            rate: 5.0,
            price_center: 100.0,
            tick_size: 0.1,
            qty_min: 5,
            qty_max: 50,
            seed: 42,
        }
    }
}

/// Fixed-rate Poisson event generator
pub struct PoissonProcess {
    rate: f64,
    marks: MarkSampler,
    rng: StdRng,
}

impl PoissonProcess {
    pub fn new(config: &PoissonConfig) -> Result<Self> {
        if !config.rate.is_finite() || config.rate <= 0.0 {
            return Err(ProcessError::InvalidParameter(format!(
                "rate must be finite and positive, got {}",
                config.rate
            )));
        }
        Ok(Self {
            rate: config.rate,
            marks: MarkSampler::new(
                config.price_center,
                config.tick_size,
                config.qty_min,
                config.qty_max,
            )?,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl EventProcess for PoissonProcess {
    fn next(&mut self, now: f64) -> Event {
        let wait = exp_draw(&mut self.rng, self.rate);
        self.marks.sample(now + wait, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_rate() {
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = PoissonConfig {
                rate,
                ..Default::default()
            };
            assert!(PoissonProcess::new(&config).is_err(), "rate {rate}");
        }
    }

    #[test]
    fn test_time_advances_monotonically() {
        let mut process = PoissonProcess::new(&PoissonConfig::default()).unwrap();
        let mut clock = 0.0;
        for _ in 0..500 {
            let event = process.next(clock);
            assert!(event.time > clock);
            clock = event.time;
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let config = PoissonConfig::default();
        let mut a = PoissonProcess::new(&config).unwrap();
        let mut b = PoissonProcess::new(&config).unwrap();

        let mut clock_a = 0.0;
        let mut clock_b = 0.0;
        for _ in 0..200 {
            let event_a = a.next(clock_a);
            let event_b = b.next(clock_b);
            assert_eq!(event_a, event_b);
            clock_a = event_a.time;
            clock_b = event_b.time;
        }
    }

    #[test]
    fn test_usable_as_trait_object() {
        let mut process: Box<dyn EventProcess> =
            Box::new(PoissonProcess::new(&PoissonConfig::default()).unwrap());
        let event = process.next(1.0);
        assert!(event.time > 1.0);
        assert!(event.quantity > 0);
    }
}
