// src/greeks.rs
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Selects which sensitivities a `greeks` call computes
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GreeksConfig: u32 {
        const NONE  = 0;
        const DELTA = 1 << 0;
        const VEGA  = 1 << 1;
        const RHO   = 1 << 2;
        const GAMMA = 1 << 3;
        const THETA = 1 << 4;
    }
}

/// Sensitivity report; unselected or undefined entries stay `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub vega: Option<f64>,
    pub theta: Option<f64>,
    pub rho: Option<f64>,
}
