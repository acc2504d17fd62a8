// src/option.rs
//! Option contract descriptor
//!
//! An [`OptionContract`] holds validated contract terms. It is immutable after
//! construction except for volatility, which the implied-volatility solver
//! overrides transiently through a [`VolatilityGuard`] that restores the
//! original value when dropped.
//!
//! Models hold the contract through a [`SharedOption`] (`Arc`), so several
//! models bound to the same contract observe the same terms.

use crate::error::{validation::*, PricingError, PricingResult};
use portable_atomic::{AtomicF64, Ordering};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Reference-counted handle shared by every model bound to a contract
pub type SharedOption = Arc<OptionContract>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff at exercise for spot `s` and strike `k`
    #[inline]
    pub fn intrinsic(self, s: f64, k: f64) -> f64 {
        match self {
            OptionType::Call => (s - k).max(0.0),
            OptionType::Put => (k - s).max(0.0),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseStyle {
    European,
    American,
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseStyle::European => write!(f, "European"),
            ExerciseStyle::American => write!(f, "American"),
        }
    }
}

/// Time to expiry written as whole months, e.g. `"24mo"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Maturity {
    months: u32,
}

impl Maturity {
    pub fn from_months(months: u32) -> Self {
        Self { months }
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    /// Years to expiry (months / 12)
    pub fn years(&self) -> f64 {
        f64::from(self.months) / 12.0
    }
}

impl FromStr for Maturity {
    type Err = PricingError;

    fn from_str(token: &str) -> PricingResult<Self> {
        let invalid = |reason: &str| PricingError::InvalidMaturity {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        let digits = token
            .strip_suffix("mo")
            .ok_or_else(|| invalid("expected the suffix 'mo'"))?;
        if digits.is_empty() {
            return Err(invalid("missing month count before 'mo'"));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("month count must be a non-negative integer"));
        }
        let months = digits
            .parse::<u32>()
            .map_err(|_| invalid("month count is too large"))?;

        Ok(Self { months })
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mo", self.months)
    }
}

/// Plain snapshot of a contract's current terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionTerms {
    pub spot_price: f64,
    pub strike_price: f64,
    pub interest_rate: f64,
    pub maturity: f64,
    pub volatility: f64,
    pub carry: f64,
    pub option_type: OptionType,
    pub style: ExerciseStyle,
}

/// Vanilla option contract
#[derive(Debug)]
pub struct OptionContract {
    spot_price: f64,
    strike_price: f64,
    interest_rate: f64,
    maturity: Maturity,
    volatility: AtomicF64,
    carry: f64,
    option_type: OptionType,
    style: ExerciseStyle,
}

impl OptionContract {
    /// Contract with zero carry
    pub fn new(
        spot_price: f64,
        strike_price: f64,
        interest_rate: f64,
        maturity: &str,
        volatility: f64,
        option_type: OptionType,
        style: ExerciseStyle,
    ) -> PricingResult<Self> {
        Self::with_carry(
            spot_price,
            strike_price,
            interest_rate,
            maturity,
            volatility,
            option_type,
            style,
            0.0,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_carry(
        spot_price: f64,
        strike_price: f64,
        interest_rate: f64,
        maturity: &str,
        volatility: f64,
        option_type: OptionType,
        style: ExerciseStyle,
        carry: f64,
    ) -> PricingResult<Self> {
        validate_positive("spot_price", spot_price)?;
        validate_positive("strike_price", strike_price)?;
        validate_positive("volatility", volatility)?;
        validate_finite("interest_rate", interest_rate)?;
        validate_finite("carry", carry)?;
        let maturity = maturity.parse::<Maturity>()?;

        Ok(Self {
            spot_price,
            strike_price,
            interest_rate,
            maturity,
            volatility: AtomicF64::new(volatility),
            carry,
            option_type,
            style,
        })
    }

    pub fn into_shared(self) -> SharedOption {
        Arc::new(self)
    }

    pub fn spot_price(&self) -> f64 {
        self.spot_price
    }

    pub fn strike_price(&self) -> f64 {
        self.strike_price
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    /// Years to expiry
    pub fn maturity(&self) -> f64 {
        self.maturity.years()
    }

    pub fn maturity_months(&self) -> u32 {
        self.maturity.months()
    }

    pub fn volatility(&self) -> f64 {
        self.volatility.load(Ordering::Relaxed)
    }

    pub fn carry(&self) -> f64 {
        self.carry
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn style(&self) -> ExerciseStyle {
        self.style
    }

    pub fn terms(&self) -> OptionTerms {
        OptionTerms {
            spot_price: self.spot_price,
            strike_price: self.strike_price,
            interest_rate: self.interest_rate,
            maturity: self.maturity(),
            volatility: self.volatility(),
            carry: self.carry,
            option_type: self.option_type,
            style: self.style,
        }
    }

    /// Overrides volatility until the returned guard is dropped
    pub(crate) fn volatility_guard(&self) -> VolatilityGuard<'_> {
        VolatilityGuard {
            option: self,
            original: self.volatility(),
        }
    }
}

impl Clone for OptionContract {
    fn clone(&self) -> Self {
        Self {
            spot_price: self.spot_price,
            strike_price: self.strike_price,
            interest_rate: self.interest_rate,
            maturity: self.maturity,
            volatility: AtomicF64::new(self.volatility()),
            carry: self.carry,
            option_type: self.option_type,
            style: self.style,
        }
    }
}

/// Scoped volatility override; the original value is written back on drop
pub(crate) struct VolatilityGuard<'a> {
    option: &'a OptionContract,
    original: f64,
}

impl VolatilityGuard<'_> {
    pub(crate) fn set(&self, volatility: f64) {
        self.option.volatility.store(volatility, Ordering::Relaxed);
    }
}

impl Drop for VolatilityGuard<'_> {
    fn drop(&mut self) {
        self.option.volatility.store(self.original, Ordering::Relaxed);
    }
}
