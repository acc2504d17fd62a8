// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes formulas for European options and Greeks
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model with continuous carry `q` (dividend yield,
//! convenience yield or foreign rate), the underlying follows:
//! ```text
//! dS_t = (r - q) S_t dt + σ S_t dW_t
//! ```
//!
//! The risk-neutral pricing formula gives:
//! ```text
//! V(S,t) = e^(-r(T-t)) * E^Q[payoff(S_T) | S_t = S]
//! ```
//!
//! For European options, this has closed-form solutions involving
//! the cumulative normal distribution function Φ(x).
//!
//! At zero time to expiry every function returns the expiry limit
//! (intrinsic value, exercise indicator for delta, zero otherwise).

use crate::math_utils::{d1, d2, norm_cdf, norm_pdf};
use crate::option::OptionType;

/// Black-Scholes European option price
///
/// # Formula
/// ```text
/// C = S*e^(-qT)*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// P = K*e^(-rT)*Φ(-d₂) - S*e^(-qT)*Φ(-d₁)
/// ```
///
/// Where:
/// ```text
/// d₁ = [ln(S/K) + (r - q + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
pub fn bs_price(option_type: OptionType, s: f64, k: f64, r: f64, sigma: f64, t: f64, q: f64) -> f64 {
    if t <= 0.0 {
        return option_type.intrinsic(s, k);
    }
    let d1 = d1(s, k, r, sigma, t, q);
    let d2 = d2(d1, sigma, t);
    match option_type {
        OptionType::Call => s * norm_cdf(d1) * (-q * t).exp() - k * (-r * t).exp() * norm_cdf(d2),
        OptionType::Put => k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1) * (-q * t).exp(),
    }
}

/// Black-Scholes Delta (∂V/∂S)
///
/// # Formula
/// ```text
/// Δ_call = e^(-qT) * Φ(d₁)
/// Δ_put  = e^(-qT) * (Φ(d₁) - 1)
/// ```
pub fn bs_delta(option_type: OptionType, s: f64, k: f64, r: f64, sigma: f64, t: f64, q: f64) -> f64 {
    if t <= 0.0 {
        return match option_type {
            OptionType::Call if s > k => 1.0,
            OptionType::Put if s < k => -1.0,
            _ => 0.0,
        };
    }
    let d1 = d1(s, k, r, sigma, t, q);
    match option_type {
        OptionType::Call => norm_cdf(d1) * (-q * t).exp(),
        OptionType::Put => (norm_cdf(d1) - 1.0) * (-q * t).exp(),
    }
}

/// Black-Scholes Gamma (∂²V/∂S²), identical for calls and puts
///
/// # Formula
/// ```text
/// Γ = e^(-qT) * φ(d₁) / (S * σ * √T)
/// ```
pub fn bs_gamma(s: f64, k: f64, r: f64, sigma: f64, t: f64, q: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let d1 = d1(s, k, r, sigma, t, q);
    (-q * t).exp() * norm_pdf(d1) / (s * sigma * t.sqrt())
}

/// Black-Scholes Vega (∂V/∂σ), identical for calls and puts
///
/// # Formula
/// ```text
/// ν = e^(-qT) * φ(d₁) * S * √T
/// ```
///
/// Units: price change per unit (not per 1%) volatility change.
pub fn bs_vega(s: f64, k: f64, r: f64, sigma: f64, t: f64, q: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let d1 = d1(s, k, r, sigma, t, q);
    (-q * t).exp() * norm_pdf(d1) * s * t.sqrt()
}

/// Black-Scholes Theta (∂V/∂t), per year
///
/// # Formula
/// ```text
/// Θ_call = -S*e^(-qT)*φ(d₁)*σ/(2√T) + q*S*e^(-qT)*Φ(d₁)  - r*K*e^(-qT)*Φ(d₂)
/// Θ_put  = -S*e^(-qT)*φ(d₁)*σ/(2√T) - q*S*e^(-qT)*Φ(-d₁) + r*K*e^(-qT)*Φ(-d₂)
/// ```
///
/// The strike term carries the `e^(-qT)` factor.
pub fn bs_theta(option_type: OptionType, s: f64, k: f64, r: f64, sigma: f64, t: f64, q: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let d1 = d1(s, k, r, sigma, t, q);
    let d2 = d2(d1, sigma, t);
    let carry_df = (-q * t).exp();
    let decay = -s * carry_df * norm_pdf(d1) * sigma / (2.0 * t.sqrt());
    match option_type {
        OptionType::Call => {
            decay + q * s * carry_df * norm_cdf(d1) - r * k * carry_df * norm_cdf(d2)
        }
        OptionType::Put => {
            decay - q * s * carry_df * norm_cdf(-d1) + r * k * carry_df * norm_cdf(-d2)
        }
    }
}

/// Black-Scholes Rho (∂V/∂r)
///
/// # Formula
/// ```text
/// ρ_call =  T * K * e^(-qT) * Φ(d₂)
/// ρ_put  = -T * K * e^(-qT) * Φ(-d₂)
/// ```
pub fn bs_rho(option_type: OptionType, s: f64, k: f64, r: f64, sigma: f64, t: f64, q: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let d1 = d1(s, k, r, sigma, t, q);
    let d2 = d2(d1, sigma, t);
    match option_type {
        OptionType::Call => t * k * (-q * t).exp() * norm_cdf(d2),
        OptionType::Put => -t * k * (-q * t).exp() * norm_cdf(-d2),
    }
}
