// src/error.rs
use thiserror::Error;

/// Error types for the options-pricer library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Maturity token not of the form `<digits>mo`
    #[error("Invalid maturity '{token}': {reason}")]
    InvalidMaturity { token: String, reason: String },

    /// Model bound to an option whose exercise style it cannot price
    #[error("{model} model cannot price {style} options")]
    StyleMismatch { model: String, style: String },

    /// Lattice sensitivity requested outside the interior nodes
    #[error("Invalid indices ({step}, {node}) for {greek} on a {steps}-step lattice")]
    IndexOutOfRange {
        greek: String,
        step: usize,
        node: usize,
        steps: usize,
    },

    /// Root search exhausted or stalled
    #[error("{method} did not converge after {iterations} iterations: {reason}")]
    ConvergenceFailure {
        method: String,
        iterations: usize,
        reason: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Non-finite or otherwise unusable numerical result
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },
}

/// Result type alias for options-pricer operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResult};

    /// Validate that a parameter is finite and strictly positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResult<()> {
        if !value.is_finite() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate Monte Carlo sample count
    pub fn validate_paths(paths: usize) -> PricingResult<()> {
        if paths == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if paths > 1_000_000_000 {
            Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "exceeds maximum allowed (1 billion)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate lattice step count
    pub fn validate_steps(steps: usize) -> PricingResult<()> {
        if steps == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if steps > 100_000 {
            Err(PricingError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "exceeds maximum allowed (100,000)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
