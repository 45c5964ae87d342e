//! Run configuration
//!
//! A single serde-backed struct describes a whole simulation run. Defaults
//! reproduce the stock six-dimensional Hawkes scenario; a JSON file can
//! override any subset of fields.

use crate::error::Result;
use crate::placement::PlacementConfig;
use crate::weights::WeightConfig;
use lobsim_process::MultivariateHawkesConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which generator drives the run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessSelection {
    /// Memoryless baseline at a fixed rate
    Poisson { rate: f64 },
    /// Univariate self-exciting arrivals
    Hawkes { mu: f64, alpha: f64, beta: f64 },
    /// Six-dimensional self-exciting order flow with book-state weighting
    Hawkes6 {
        baseline: Vec<f64>,
        excitation: Vec<Vec<f64>>,
        decay: Vec<Vec<f64>>,
    },
}

impl Default for ProcessSelection {
    fn default() -> Self {
        let stock = MultivariateHawkesConfig::default();
        ProcessSelection::Hawkes6 {
            baseline: stock.baseline,
            excitation: stock.excitation,
            decay: stock.decay,
        }
    }
}

/// Configuration for a bounded simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Instrument label used in logs and summaries
    pub symbol: String,
    /// Number of events to generate
    pub num_events: u64,
    /// Center price the book is seeded around
    pub price_center: f64,
    pub tick_size: f64,
    /// Inclusive quantity bounds for generated events
    pub qty_min: u32,
    pub qty_max: u32,
    /// Seed for the event process
    pub seed: u64,
    /// Levels per side seeded before the run starts
    pub seed_levels: u32,
    /// Quantity resting at each seeded level
    pub seed_level_qty: u32,
    /// Quantity quoted by the safety net when a side empties
    pub refill_qty: u32,
    pub process: ProcessSelection,
    pub placement: PlacementConfig,
    pub weights: WeightConfig,
    /// Optional CSV record output path
    pub output: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            symbol: "SIM-100".to_string(),
            num_events: 800,
            price_center: 100.0,
            tick_size: 0.1,
            qty_min: 5,
            qty_max: 50,
            seed: 42,
            seed_levels: 10,
            seed_level_qty: 60,
            refill_qty: 50,
            process: ProcessSelection::default(),
            placement: PlacementConfig::default(),
            weights: WeightConfig::default(),
            output: None,
        }
    }
}

impl SimulationConfig {
    /// Load a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selects_six_dimensional_process() {
        let config = SimulationConfig::default();
        assert!(matches!(config.process, ProcessSelection::Hawkes6 { .. }));
        assert_eq!(config.num_events, 800);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.num_events, config.num_events);
        assert_eq!(back.symbol, config.symbol);
        assert_eq!(back.tick_size, config.tick_size);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"num_events": 50, "seed": 7}"#).unwrap();
        assert_eq!(config.num_events, 50);
        assert_eq!(config.seed, 7);
        assert_eq!(config.price_center, 100.0);
        assert!(matches!(config.process, ProcessSelection::Hawkes6 { .. }));
    }

    #[test]
    fn test_process_selection_json_shape() {
        let selection: ProcessSelection =
            serde_json::from_str(r#"{"kind": "poisson", "rate": 3.5}"#).unwrap();
        assert!(matches!(selection, ProcessSelection::Poisson { rate } if rate == 3.5));

        let selection: ProcessSelection =
            serde_json::from_str(r#"{"kind": "hawkes", "mu": 1.0, "alpha": 0.4, "beta": 2.0}"#)
                .unwrap();
        assert!(matches!(selection, ProcessSelection::Hawkes { .. }));
    }
}
