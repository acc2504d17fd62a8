// src/models/model.rs
use crate::error::{PricingError, PricingResult};
use crate::option::{ExerciseStyle, SharedOption};

/// Capability shared by every pricing model: price the bound contract and
/// rebind to another one.
pub trait PricingModel {
    fn name(&self) -> &'static str;

    /// The contract this model is currently bound to
    fn option(&self) -> &SharedOption;

    fn price(&self) -> PricingResult<f64>;

    /// Bind to `option`, recomputing any cached parameters. On error the
    /// model keeps its previous binding.
    fn rebind(&mut self, option: SharedOption) -> PricingResult<()>;
}

/// Reject contracts a European-only model cannot price
pub(crate) fn ensure_european(model: &str, option: &SharedOption) -> PricingResult<()> {
    match option.style() {
        ExerciseStyle::European => Ok(()),
        style => Err(PricingError::StyleMismatch {
            model: model.to_string(),
            style: style.to_string(),
        }),
    }
}

/// Surface overflowed or undefined estimates as `NumericalInstability`
pub(crate) fn ensure_finite(method: &str, value: f64) -> PricingResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::NumericalInstability {
            method: method.to_string(),
            reason: format!("estimate is not finite: {}", value),
        })
    }
}
