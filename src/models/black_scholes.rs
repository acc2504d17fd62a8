// src/models/black_scholes.rs
//! Closed-form Black-Scholes model bound to a European contract
//!
//! Prices, Greeks and implied volatility read the bound contract's current
//! terms on every call; nothing is cached beyond the contract handle.
//!
//! # Implied Volatility
//!
//! Newton-Raphson on σ:
//! ```text
//! σ_{n+1} = σ_n - (V(σ_n) - V_market) / ν(σ_n)
//! ```
//! Each iterate is written into the shared contract for the duration of the
//! search and the original volatility is restored on every exit path.

use super::model::{ensure_european, PricingModel};
use crate::analytics::bs_analytic;
use crate::config::ImpliedVolConfig;
use crate::error::{validation::*, PricingError, PricingResult};
use crate::greeks::{Greeks, GreeksConfig};
use crate::option::SharedOption;
use tracing::{debug, trace};

const MODEL_NAME: &str = "Black-Scholes";

#[derive(Debug, Clone)]
pub struct BlackScholesModel {
    option: SharedOption,
}

impl BlackScholesModel {
    /// Fails with `StyleMismatch` for American contracts
    pub fn new(option: SharedOption) -> PricingResult<Self> {
        ensure_european(MODEL_NAME, &option)?;
        debug!(
            option_type = %option.option_type(),
            spot = option.spot_price(),
            strike = option.strike_price(),
            "black-scholes model bound"
        );
        Ok(Self { option })
    }

    pub fn option(&self) -> &SharedOption {
        &self.option
    }

    /// Rebind to another contract; the exercise style is re-validated and
    /// the previous binding is kept on failure.
    pub fn set_option(&mut self, option: SharedOption) -> PricingResult<()> {
        ensure_european(MODEL_NAME, &option)?;
        self.option = option;
        Ok(())
    }

    pub fn calculate_price(&self) -> f64 {
        let o = self.option.terms();
        bs_analytic::bs_price(
            o.option_type,
            o.spot_price,
            o.strike_price,
            o.interest_rate,
            o.volatility,
            o.maturity,
            o.carry,
        )
    }

    pub fn calculate_delta(&self) -> f64 {
        let o = self.option.terms();
        bs_analytic::bs_delta(
            o.option_type,
            o.spot_price,
            o.strike_price,
            o.interest_rate,
            o.volatility,
            o.maturity,
            o.carry,
        )
    }

    pub fn calculate_gamma(&self) -> f64 {
        let o = self.option.terms();
        bs_analytic::bs_gamma(
            o.spot_price,
            o.strike_price,
            o.interest_rate,
            o.volatility,
            o.maturity,
            o.carry,
        )
    }

    pub fn calculate_vega(&self) -> f64 {
        let o = self.option.terms();
        bs_analytic::bs_vega(
            o.spot_price,
            o.strike_price,
            o.interest_rate,
            o.volatility,
            o.maturity,
            o.carry,
        )
    }

    pub fn calculate_theta(&self) -> f64 {
        let o = self.option.terms();
        bs_analytic::bs_theta(
            o.option_type,
            o.spot_price,
            o.strike_price,
            o.interest_rate,
            o.volatility,
            o.maturity,
            o.carry,
        )
    }

    pub fn calculate_rho(&self) -> f64 {
        let o = self.option.terms();
        bs_analytic::bs_rho(
            o.option_type,
            o.spot_price,
            o.strike_price,
            o.interest_rate,
            o.volatility,
            o.maturity,
            o.carry,
        )
    }

    /// Compute the selected Greeks in one call
    pub fn greeks(&self, selection: GreeksConfig) -> Greeks {
        Greeks {
            delta: selection
                .contains(GreeksConfig::DELTA)
                .then(|| self.calculate_delta()),
            gamma: selection
                .contains(GreeksConfig::GAMMA)
                .then(|| self.calculate_gamma()),
            vega: selection
                .contains(GreeksConfig::VEGA)
                .then(|| self.calculate_vega()),
            theta: selection
                .contains(GreeksConfig::THETA)
                .then(|| self.calculate_theta()),
            rho: selection.contains(GreeksConfig::RHO).then(|| self.calculate_rho()),
        }
    }

    /// Implied volatility with the default solver settings
    /// (σ₀ = 0.2, 1000 iterations, tolerance 1e-6)
    pub fn calculate_iv(&self, market_price: f64) -> PricingResult<f64> {
        self.calculate_iv_with(market_price, &ImpliedVolConfig::default())
    }

    /// Implied volatility via Newton-Raphson
    ///
    /// # Errors
    ///
    /// - `ConvergenceFailure` when vega falls below `min_vega` or the
    ///   iteration budget runs out
    /// - `InvalidParameters` / `InvalidConfiguration` for a non-finite
    ///   market price or an invalid solver configuration
    ///
    /// The bound contract's volatility is unchanged when this returns.
    pub fn calculate_iv_with(
        &self,
        market_price: f64,
        config: &ImpliedVolConfig,
    ) -> PricingResult<f64> {
        config.validate()?;
        validate_finite("market_price", market_price)?;

        let guard = self.option.volatility_guard();
        let mut sigma = config.initial_guess;

        for iteration in 0..config.max_iterations {
            guard.set(sigma);
            let theoretical_price = self.calculate_price();
            let diff = theoretical_price - market_price;
            trace!(iteration, sigma, diff, "implied vol iteration");

            if diff.abs() < config.tolerance {
                debug!(iterations = iteration + 1, sigma, "implied vol converged");
                return Ok(sigma);
            }

            let vega = self.calculate_vega();
            if vega.is_nan() || vega < config.min_vega {
                debug!(iteration, vega, "implied vol stalled on vega");
                return Err(PricingError::ConvergenceFailure {
                    method: "Implied volatility".to_string(),
                    iterations: iteration + 1,
                    reason: format!("vega {:.3e} below {:.1e}", vega, config.min_vega),
                });
            }

            sigma -= diff / vega;
            if sigma <= 0.0 {
                sigma = config.vol_floor;
            }
        }

        debug!(max_iterations = config.max_iterations, "implied vol budget exhausted");
        Err(PricingError::ConvergenceFailure {
            method: "Implied volatility".to_string(),
            iterations: config.max_iterations,
            reason: "iteration budget exhausted".to_string(),
        })
    }
}

impl PricingModel for BlackScholesModel {
    fn name(&self) -> &'static str {
        MODEL_NAME
    }

    fn option(&self) -> &SharedOption {
        &self.option
    }

    fn price(&self) -> PricingResult<f64> {
        Ok(self.calculate_price())
    }

    fn rebind(&mut self, option: SharedOption) -> PricingResult<()> {
        self.set_option(option)
    }
}
