// src/models/binomial.rs
//! Cox-Ross-Rubinstein binomial lattice
//!
//! # Mathematical Framework
//!
//! With `N` steps of length `Δt = T/N`:
//! ```text
//! u = e^(σ√Δt),  d = 1/u
//! p = (e^((r - q)Δt) - d) / (u - d)
//! S(step, i) = S₀ * u^i * d^(step - i)
//! ```
//!
//! Backward induction from the terminal payoffs:
//! ```text
//! V(step, i) = e^(-rΔt) * [p * V(step+1, i+1) + (1-p) * V(step+1, i)]
//! ```
//! American contracts take `max(max(V, 0), intrinsic(S(step, i)))` at every
//! node.
//!
//! `u`, `d` and `p` are derived once per contract binding. The induced value
//! vector is rebuilt on every query, so each price or Greek costs O(N²).

use super::model::{ensure_finite, PricingModel};
use crate::error::{validation::*, PricingError, PricingResult};
use crate::greeks::{Greeks, GreeksConfig};
use crate::option::{ExerciseStyle, OptionTerms, SharedOption};
use tracing::{debug, warn};

const MODEL_NAME: &str = "Binomial";
const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone)]
pub struct BinomialModel {
    option: SharedOption,
    steps: usize,
    uptick: f64,
    downtick: f64,
    probability: f64,
}

/// Derive `(u, d, p)` for `steps` steps over the contract's maturity
fn lattice_parameters(option: &SharedOption, steps: usize) -> (f64, f64, f64) {
    let t = option.maturity();
    if t <= 0.0 {
        // Degenerate lattice: every node sits at spot
        return (1.0, 1.0, 0.5);
    }

    let dt = t / steps as f64;
    let uptick = (option.volatility() * dt.sqrt()).exp();
    let downtick = 1.0 / uptick;
    let probability =
        (((option.interest_rate() - option.carry()) * dt).exp() - downtick) / (uptick - downtick);

    if !(0.0..=1.0).contains(&probability) {
        warn!(
            probability,
            steps, "risk-neutral probability outside [0, 1]; lattice admits arbitrage"
        );
    }

    (uptick, downtick, probability)
}

impl BinomialModel {
    /// Fails with `InvalidConfiguration` when `steps` is zero
    pub fn new(option: SharedOption, steps: usize) -> PricingResult<Self> {
        validate_steps(steps)?;
        let (uptick, downtick, probability) = lattice_parameters(&option, steps);
        debug!(steps, uptick, downtick, probability, "binomial lattice derived");
        Ok(Self {
            option,
            steps,
            uptick,
            downtick,
            probability,
        })
    }

    pub fn option(&self) -> &SharedOption {
        &self.option
    }

    /// Rebind and re-derive `u`, `d`, `p` for the new contract
    pub fn set_option(&mut self, option: SharedOption) {
        let (uptick, downtick, probability) = lattice_parameters(&option, self.steps);
        debug!(uptick, downtick, probability, "binomial lattice re-derived");
        self.option = option;
        self.uptick = uptick;
        self.downtick = downtick;
        self.probability = probability;
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn up_factor(&self) -> f64 {
        self.uptick
    }

    pub fn down_factor(&self) -> f64 {
        self.downtick
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Spot after `ups` up-moves and `downs` down-moves
    #[inline]
    fn node_spot(&self, spot: f64, ups: i32, downs: i32) -> f64 {
        spot * self.uptick.powi(ups) * self.downtick.powi(downs)
    }

    /// Node values after backward induction down to step `stop`.
    ///
    /// Entries `0..=stop` hold the values at step `stop`; the remaining
    /// entries keep whatever the last induction pass left there.
    fn induced_values(&self, terms: &OptionTerms, stop: usize) -> Vec<f64> {
        let n = self.steps;
        let spot = terms.spot_price;
        let strike = terms.strike_price;
        let option_type = terms.option_type;
        let discount = (-terms.interest_rate * terms.maturity / n as f64).exp();
        let p = self.probability;

        let mut values: Vec<f64> = (0..=n)
            .map(|i| {
                let st = self.node_spot(spot, i as i32, (n - i) as i32);
                option_type.intrinsic(st, strike)
            })
            .collect();

        for step in (stop..n).rev() {
            for index in 0..=step {
                let continuation =
                    discount * (p * values[index + 1] + (1.0 - p) * values[index]);
                values[index] = match terms.style {
                    ExerciseStyle::American => {
                        let st = self.node_spot(spot, index as i32, (step - index) as i32);
                        continuation.max(0.0).max(option_type.intrinsic(st, strike))
                    }
                    ExerciseStyle::European => continuation,
                };
            }
        }

        values
    }

    /// Fails with `NumericalInstability` when node spots overflow
    pub fn calculate_price(&self) -> PricingResult<f64> {
        let terms = self.option.terms();
        ensure_finite(MODEL_NAME, self.induced_values(&terms, 0)[0])
    }

    fn check_node(&self, greek: &str, i: usize, j: usize, max_step: usize) -> PricingResult<()> {
        if i >= max_step || j > i {
            return Err(PricingError::IndexOutOfRange {
                greek: greek.to_string(),
                step: i,
                node: j,
                steps: self.steps,
            });
        }
        if self.option.maturity() <= 0.0 {
            return Err(PricingError::InvalidParameters {
                parameter: "maturity".to_string(),
                value: self.option.maturity(),
                constraint: "must be positive for lattice sensitivities".to_string(),
            });
        }
        Ok(())
    }

    /// Spots of nodes `j + 1` and `j` at step `i`
    fn spot_spread(&self, spot: f64, i: usize, j: usize) -> (f64, f64) {
        let (i, j) = (i as i32, j as i32);
        let s_up = self.node_spot(spot, j + 1, i - j - 1);
        let s_down = self.node_spot(spot, j, i - j);
        (s_up, s_down)
    }

    /// Lattice delta at node `(i, j)`, `0 ≤ i < steps`, `0 ≤ j ≤ i`
    ///
    /// ```text
    /// Δ = (V(i+1, j+1) - V(i+1, j)) / (S_up - S_down)
    /// ```
    pub fn calculate_delta(&self, i: usize, j: usize) -> PricingResult<f64> {
        self.check_node("delta", i, j, self.steps)?;
        let terms = self.option.terms();
        let values = self.induced_values(&terms, i + 1);
        let (c_up, c_down) = (values[j + 1], values[j]);
        let (s_up, s_down) = self.spot_spread(terms.spot_price, i, j);
        ensure_finite("Binomial delta", (c_up - c_down) / (s_up - s_down))
    }

    /// Lattice gamma at node `(i, j)`, `0 ≤ i < steps - 1`, `0 ≤ j ≤ i`
    ///
    /// Second difference of delta across the two children at step `i + 1`.
    pub fn calculate_gamma(&self, i: usize, j: usize) -> PricingResult<f64> {
        self.check_node("gamma", i, j, self.steps - 1)?;
        let delta_up = self.calculate_delta(i + 1, j + 1)?;
        let delta_down = self.calculate_delta(i + 1, j)?;
        let (s_up, s_down) = self.spot_spread(self.option.spot_price(), i, j);
        ensure_finite("Binomial gamma", (delta_up - delta_down) / (s_up - s_down))
    }

    /// Lattice theta at node `(i, j)`, `0 ≤ i < steps - 1`, `0 ≤ j ≤ i`,
    /// as value change per calendar day
    pub fn calculate_theta(&self, i: usize, j: usize) -> PricingResult<f64> {
        self.check_node("theta", i, j, self.steps - 1)?;
        let terms = self.option.terms();
        let values = self.induced_values(&terms, i);
        let day_fraction = DAYS_PER_YEAR * terms.maturity / self.steps as f64;
        ensure_finite("Binomial theta", (values[j] - values[j + 1]) / day_fraction)
    }

    /// Lattice Greeks at node `(i, j)`; vega and rho are not defined on the
    /// lattice and are left empty.
    pub fn greeks_at(&self, i: usize, j: usize, selection: GreeksConfig) -> PricingResult<Greeks> {
        let mut greeks = Greeks::default();
        if selection.contains(GreeksConfig::DELTA) {
            greeks.delta = Some(self.calculate_delta(i, j)?);
        }
        if selection.contains(GreeksConfig::GAMMA) {
            greeks.gamma = Some(self.calculate_gamma(i, j)?);
        }
        if selection.contains(GreeksConfig::THETA) {
            greeks.theta = Some(self.calculate_theta(i, j)?);
        }
        Ok(greeks)
    }
}

impl PricingModel for BinomialModel {
    fn name(&self) -> &'static str {
        MODEL_NAME
    }

    fn option(&self) -> &SharedOption {
        &self.option
    }

    fn price(&self) -> PricingResult<f64> {
        self.calculate_price()
    }

    fn rebind(&mut self, option: SharedOption) -> PricingResult<()> {
        self.set_option(option);
        Ok(())
    }
}
