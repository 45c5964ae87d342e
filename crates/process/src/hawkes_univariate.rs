//! Univariate self-exciting generator
//!
//! Intensity λ(t) = μ + α·s(t) with an exponential memory kernel: s(t) is
//! the decayed sum of exp(-β·(t - tᵢ)) over past accepted events, carried as
//! a single running statistic instead of the full event history. Arrival
//! times come from Ogata's thinning: between jumps the intensity only
//! decays, so its value at the interval start majorizes the whole interval.

use crate::EventProcess;
use crate::error::{ProcessError, Result};
use crate::marks::{MarkSampler, exp_draw};
use lobsim_core::Event;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for the univariate Hawkes generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HawkesConfig {
    /// Baseline intensity μ (> 0)
    pub mu: f64,
    /// Excitation jump α per event (>= 0)
    pub alpha: f64,
    /// Exponential decay rate β (> 0)
    pub beta: f64,
    pub price_center: f64,
    pub tick_size: f64,
    pub qty_min: u32,
    pub qty_max: u32,
    pub seed: u64,
}

impl Default for HawkesConfig {
    fn default() -> Self {
        Self {
            mu: 1.2,
            alpha: 0.6,
            beta: 1.5,
            price_center: 100.0,
            tick_size: 0.1,
            qty_min: 5,
            qty_max: 50,
            seed: 42,
        }
    }
}

/// Exponential-kernel Hawkes event generator
pub struct HawkesUnivariateProcess {
    mu: f64,
    alpha: f64,
    beta: f64,
    /// Decayed cumulative excitation since the last update
    excitation: f64,
    last_time: f64,
    marks: MarkSampler,
    rng: StdRng,
}

impl HawkesUnivariateProcess {
    pub fn new(config: &HawkesConfig) -> Result<Self> {
        if !config.mu.is_finite() || config.mu <= 0.0 {
            return Err(ProcessError::InvalidParameter(format!(
                "mu must be finite and positive, got {}",
                config.mu
            )));
        }
        if !config.alpha.is_finite() || config.alpha < 0.0 {
            return Err(ProcessError::InvalidParameter(format!(
                "alpha must be finite and non-negative, got {}",
                config.alpha
            )));
        }
        if !config.beta.is_finite() || config.beta <= 0.0 {
            return Err(ProcessError::InvalidParameter(format!(
                "beta must be finite and positive, got {}",
                config.beta
            )));
        }

        Ok(Self {
            mu: config.mu,
            alpha: config.alpha,
            beta: config.beta,
            excitation: 0.0,
            last_time: 0.0,
            marks: MarkSampler::new(
                config.price_center,
                config.tick_size,
                config.qty_min,
                config.qty_max,
            )?,
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    /// Intensity at the internally tracked time
    pub fn intensity(&self) -> f64 {
        self.mu + self.alpha * self.excitation
    }

    /// Intensity the process would have at `time`, without advancing state
    pub fn intensity_at(&self, time: f64) -> f64 {
        if time <= self.last_time {
            return self.intensity();
        }
        let decayed = self.excitation * (-self.beta * (time - self.last_time)).exp();
        self.mu + self.alpha * decayed
    }

    fn decay_to(&mut self, time: f64) {
        if time < self.last_time {
            // Simulation time only moves forward; a rewind drops the memory
            self.last_time = time;
            self.excitation = 0.0;
            return;
        }
        let dt = time - self.last_time;
        if dt > 0.0 {
            self.excitation *= (-self.beta * dt).exp();
            self.last_time = time;
        }
    }
}

impl EventProcess for HawkesUnivariateProcess {
    fn next(&mut self, now: f64) -> Event {
        self.decay_to(now);
        let mut current = now;

        loop {
            let mut bound = self.intensity();
            if !bound.is_finite() || bound <= 0.0 {
                // Accumulated floating-point error; restart from the baseline
                self.excitation = 0.0;
                self.last_time = current;
                bound = self.intensity();
            }

            let wait = exp_draw(&mut self.rng, bound);
            let candidate = current + wait;

            // Would-be statistic at the candidate time, not yet committed
            let decayed = self.excitation * (-self.beta * (candidate - self.last_time)).exp();
            let candidate_intensity = self.mu + self.alpha * decayed;

            let accept: f64 = self.rng.r#gen();
            self.decay_to(candidate);

            if accept <= candidate_intensity / bound {
                // The new event's own contribution is exp(0) = 1
                self.excitation += 1.0;
                return self.marks.sample(candidate, &mut self.rng);
            }
            // Rejected: time advances, no jump
            current = candidate;
        }
    }
}
