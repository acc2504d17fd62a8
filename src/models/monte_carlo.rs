// src/models/monte_carlo.rs
//! Monte Carlo pricing of European options under risk-neutral GBM
//!
//! # Math Framework
//!
//! Terminal prices are sampled from the exact GBM solution with carry `q`:
//! ```text
//! S_T = S₀ * exp((r - q - σ²/2)T + σ√T * Z),   Z ~ N(0,1)
//! ```
//! and the price is the discounted sample mean of the payoff:
//! ```text
//! V ≈ e^(-rT) * (1/N) Σ payoff(S_T⁽ⁱ⁾)
//! ```
//! The estimator is unbiased with variance O(1/N). No variance reduction is
//! applied.
//!
//! # Greeks
//!
//! - Delta, Vega, Rho: pathwise derivatives of the discounted payoff
//! - Gamma: central difference of pathwise delta in spot, common random numbers
//! - Theta: central difference of the price in maturity, common random numbers
//!
//! Every call draws a fresh sample set (entropy-seeded) unless a fixed seed
//! was set with [`MonteCarloModel::with_seed`].

use super::model::{ensure_european, ensure_finite, PricingModel};
use crate::error::{validation::*, PricingResult};
use crate::greeks::{Greeks, GreeksConfig};
use crate::math_utils::{generate_samples, generate_samples_seeded};
use crate::option::{OptionTerms, OptionType, SharedOption};
use crate::rng::{self, RngFactory};
use rayon::prelude::*;
use tracing::debug;

const MODEL_NAME: &str = "Monte Carlo";
/// Samples per rayon task in [`MonteCarloModel::calculate_price_parallel`]
const PARALLEL_CHUNK: usize = 16_384;
/// Relative spot bump for finite-difference gamma
const GAMMA_BUMP: f64 = 1e-2;
/// Relative maturity bump for finite-difference theta
const THETA_BUMP: f64 = 1e-2;

#[derive(Debug, Clone)]
pub struct MonteCarloModel {
    option: SharedOption,
    n: usize,
    seed: Option<u64>,
}

/// Terminal price for draw `z` at maturity `t`
#[inline]
fn terminal_price(terms: &OptionTerms, spot: f64, t: f64, z: f64) -> f64 {
    let sigma = terms.volatility;
    spot * ((terms.interest_rate - terms.carry - 0.5 * sigma * sigma) * t + sigma * t.sqrt() * z)
        .exp()
}

/// ∂payoff/∂S_T: +1 in the money for calls, -1 in the money for puts
#[inline]
fn payoff_slope(option_type: OptionType, st: f64, k: f64) -> f64 {
    match option_type {
        OptionType::Call if st > k => 1.0,
        OptionType::Put if st < k => -1.0,
        _ => 0.0,
    }
}

fn mean(sum: f64, n: usize) -> f64 {
    sum / n as f64
}

fn discounted_mean_payoff(terms: &OptionTerms, t: f64, samples: &[f64]) -> f64 {
    let sum: f64 = samples
        .iter()
        .map(|&z| {
            let st = terminal_price(terms, terms.spot_price, t, z);
            terms.option_type.intrinsic(st, terms.strike_price)
        })
        .sum();
    (-terms.interest_rate * t).exp() * mean(sum, samples.len())
}

/// Pathwise delta: e^(-rT) * E[slope * S_T / S₀]
fn pathwise_delta(terms: &OptionTerms, spot: f64, samples: &[f64]) -> f64 {
    let t = terms.maturity;
    let sum: f64 = samples
        .iter()
        .map(|&z| {
            let st = terminal_price(terms, spot, t, z);
            payoff_slope(terms.option_type, st, terms.strike_price) * st / spot
        })
        .sum();
    (-terms.interest_rate * t).exp() * mean(sum, samples.len())
}

/// Pathwise vega: e^(-rT) * E[slope * S_T * (-σT + √T Z)]
fn pathwise_vega(terms: &OptionTerms, samples: &[f64]) -> f64 {
    let t = terms.maturity;
    let sum: f64 = samples
        .iter()
        .map(|&z| {
            let st = terminal_price(terms, terms.spot_price, t, z);
            let ds_dsigma = st * (-terms.volatility * t + t.sqrt() * z);
            payoff_slope(terms.option_type, st, terms.strike_price) * ds_dsigma
        })
        .sum();
    (-terms.interest_rate * t).exp() * mean(sum, samples.len())
}

/// Pathwise rho: e^(-rT) * E[-T * payoff + slope * S_T * T]
fn pathwise_rho(terms: &OptionTerms, samples: &[f64]) -> f64 {
    let t = terms.maturity;
    let k = terms.strike_price;
    let sum: f64 = samples
        .iter()
        .map(|&z| {
            let st = terminal_price(terms, terms.spot_price, t, z);
            let payoff = terms.option_type.intrinsic(st, k);
            -t * payoff + payoff_slope(terms.option_type, st, k) * st * t
        })
        .sum();
    (-terms.interest_rate * t).exp() * mean(sum, samples.len())
}

/// Γ ≈ [Δ(S₀ + ε) - Δ(S₀ - ε)] / (2ε) on the same draws
fn finite_difference_gamma(terms: &OptionTerms, samples: &[f64]) -> f64 {
    let epsilon = GAMMA_BUMP * terms.spot_price;
    let delta_up = pathwise_delta(terms, terms.spot_price + epsilon, samples);
    let delta_down = pathwise_delta(terms, terms.spot_price - epsilon, samples);
    (delta_up - delta_down) / (2.0 * epsilon)
}

/// Θ = -∂V/∂T on the same draws; one-sided at expiry
fn finite_difference_theta(terms: &OptionTerms, samples: &[f64]) -> f64 {
    let t = terms.maturity;
    if t > 0.0 {
        let h = THETA_BUMP * t;
        let longer = discounted_mean_payoff(terms, t + h, samples);
        let shorter = discounted_mean_payoff(terms, t - h, samples);
        -(longer - shorter) / (2.0 * h)
    } else {
        let h = 1.0 / 365.0;
        let longer = discounted_mean_payoff(terms, h, samples);
        let now = discounted_mean_payoff(terms, 0.0, samples);
        -(longer - now) / h
    }
}

impl MonteCarloModel {
    /// Fails with `InvalidConfiguration` for zero samples and `StyleMismatch`
    /// for American contracts
    pub fn new(option: SharedOption, n: usize) -> PricingResult<Self> {
        validate_paths(n)?;
        ensure_european(MODEL_NAME, &option)?;
        debug!(samples = n, "monte carlo model bound");
        Ok(Self {
            option,
            n,
            seed: None,
        })
    }

    /// Draw every sample set from a generator seeded with `seed`
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn num_samples(&self) -> usize {
        self.n
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

    fn draw_samples(&self) -> Vec<f64> {
        match self.seed {
            Some(seed) => generate_samples_seeded(self.n, seed),
            None => generate_samples(self.n),
        }
    }

    pub fn calculate_price(&self) -> PricingResult<f64> {
        self.calculate_price_with_stderr().map(|(price, _)| price)
    }

    /// Returns `(price, standard_error)`
    pub fn calculate_price_with_stderr(&self) -> PricingResult<(f64, f64)> {
        let terms = self.option.terms();
        let t = terms.maturity;
        let k = terms.strike_price;
        let samples = self.draw_samples();

        let (sum, sum_sq) = samples.iter().fold((0.0, 0.0), |(sum, sum_sq), &z| {
            let st = terminal_price(&terms, terms.spot_price, t, z);
            let payoff = terms.option_type.intrinsic(st, k);
            (sum + payoff, sum_sq + payoff * payoff)
        });

        let n = self.n as f64;
        let discount = (-terms.interest_rate * t).exp();
        let mean_payoff = sum / n;
        let price = discount * mean_payoff;
        let stderr = if self.n > 1 {
            let variance = ((sum_sq - n * mean_payoff * mean_payoff) / (n - 1.0)).max(0.0);
            discount * (variance / n).sqrt()
        } else {
            0.0
        };

        debug!(samples = self.n, price, stderr, "monte carlo price");
        Ok((ensure_finite(MODEL_NAME, price)?, stderr))
    }

    /// Same estimator as [`calculate_price`](Self::calculate_price), with the
    /// samples split into chunks priced on the rayon pool. Each chunk draws
    /// from its own stream of one [`RngFactory`], so a seeded model gives the
    /// same answer regardless of thread count.
    pub fn calculate_price_parallel(&self) -> PricingResult<f64> {
        let terms = self.option.terms();
        let t = terms.maturity;
        let k = terms.strike_price;
        let n = self.n;
        let factory = match self.seed {
            Some(seed) => RngFactory::new(seed),
            None => RngFactory::from_entropy(),
        };

        let chunks = (n + PARALLEL_CHUNK - 1) / PARALLEL_CHUNK;
        // Chunk sums are collected in order so the reduction does not depend
        // on work stealing
        let chunk_sums: Vec<f64> = (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let len = PARALLEL_CHUNK.min(n - chunk * PARALLEL_CHUNK);
                let mut stream = factory.create_std_rng(chunk as u64);
                (0..len)
                    .map(|_| {
                        let z = rng::get_normal_draw(&mut stream);
                        let st = terminal_price(&terms, terms.spot_price, t, z);
                        terms.option_type.intrinsic(st, k)
                    })
                    .sum::<f64>()
            })
            .collect();
        let sum: f64 = chunk_sums.iter().sum();

        let price = (-terms.interest_rate * t).exp() * mean(sum, n);
        debug!(samples = n, chunks, price, "parallel monte carlo price");
        ensure_finite(MODEL_NAME, price)
    }

    pub fn calculate_delta(&self) -> PricingResult<f64> {
        let terms = self.option.terms();
        ensure_finite("Monte Carlo delta", pathwise_delta(&terms, terms.spot_price, &self.draw_samples()))
    }

    pub fn calculate_gamma(&self) -> PricingResult<f64> {
        let terms = self.option.terms();
        ensure_finite("Monte Carlo gamma", finite_difference_gamma(&terms, &self.draw_samples()))
    }

    pub fn calculate_vega(&self) -> PricingResult<f64> {
        let terms = self.option.terms();
        ensure_finite("Monte Carlo vega", pathwise_vega(&terms, &self.draw_samples()))
    }

    pub fn calculate_theta(&self) -> PricingResult<f64> {
        let terms = self.option.terms();
        ensure_finite("Monte Carlo theta", finite_difference_theta(&terms, &self.draw_samples()))
    }

    pub fn calculate_rho(&self) -> PricingResult<f64> {
        let terms = self.option.terms();
        ensure_finite("Monte Carlo rho", pathwise_rho(&terms, &self.draw_samples()))
    }

    /// Selected Greeks estimated from one shared sample set
    pub fn greeks(&self, selection: GreeksConfig) -> PricingResult<Greeks> {
        let terms = self.option.terms();
        let samples = self.draw_samples();
        let mut greeks = Greeks::default();

        if selection.contains(GreeksConfig::DELTA) {
            let delta = pathwise_delta(&terms, terms.spot_price, &samples);
            greeks.delta = Some(ensure_finite("Monte Carlo delta", delta)?);
        }
        if selection.contains(GreeksConfig::GAMMA) {
            let gamma = finite_difference_gamma(&terms, &samples);
            greeks.gamma = Some(ensure_finite("Monte Carlo gamma", gamma)?);
        }
        if selection.contains(GreeksConfig::VEGA) {
            let vega = pathwise_vega(&terms, &samples);
            greeks.vega = Some(ensure_finite("Monte Carlo vega", vega)?);
        }
        if selection.contains(GreeksConfig::THETA) {
            let theta = finite_difference_theta(&terms, &samples);
            greeks.theta = Some(ensure_finite("Monte Carlo theta", theta)?);
        }
        if selection.contains(GreeksConfig::RHO) {
            let rho = pathwise_rho(&terms, &samples);
            greeks.rho = Some(ensure_finite("Monte Carlo rho", rho)?);
        }

        Ok(greeks)
    }
}

impl PricingModel for MonteCarloModel {
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
        self.set_option(option)
    }
}
