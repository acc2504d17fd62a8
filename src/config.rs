// src/config.rs
use crate::error::{validation::*, PricingError, PricingResult};
use serde::{Deserialize, Serialize};

/// Newton-Raphson settings for the implied-volatility search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpliedVolConfig {
    /// Starting volatility σ₀
    pub initial_guess: f64,
    pub max_iterations: usize,
    /// Absolute pricing error accepted as converged
    pub tolerance: f64,
    /// Vega below which the search stops as stalled
    pub min_vega: f64,
    /// Replacement for non-positive volatility updates
    pub vol_floor: f64,
}

impl Default for ImpliedVolConfig {
    fn default() -> Self {
        ImpliedVolConfig {
            initial_guess: 0.2,
            max_iterations: 1000,
            tolerance: 1e-6,
            min_vega: 1e-8,
            vol_floor: 1e-6,
        }
    }
}

impl ImpliedVolConfig {
    /// Validate the solver configuration
    pub fn validate(&self) -> PricingResult<()> {
        validate_positive("initial_guess", self.initial_guess)?;
        validate_positive("tolerance", self.tolerance)?;
        validate_positive("min_vega", self.min_vega)?;
        validate_positive("vol_floor", self.vol_floor)?;
        if self.max_iterations == 0 {
            return Err(PricingError::InvalidConfiguration {
                field: "max_iterations".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_solver_constants() {
        let cfg = ImpliedVolConfig::default();
        assert_eq!(cfg.initial_guess, 0.2);
        assert_eq!(cfg.max_iterations, 1000);
        assert_eq!(cfg.tolerance, 1e-6);
        assert_eq!(cfg.min_vega, 1e-8);
        assert_eq!(cfg.vol_floor, 1e-6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let cfg: ImpliedVolConfig =
            serde_json::from_str(r#"{ "max_iterations": 50, "tolerance": 1e-9 }"#).unwrap();
        assert_eq!(cfg.max_iterations, 50);
        assert_eq!(cfg.tolerance, 1e-9);
        assert_eq!(cfg.initial_guess, 0.2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = ImpliedVolConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ImpliedVolConfig {
            tolerance: -1.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
