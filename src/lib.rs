//! # options-pricer: European and American Option Pricing
//!
//! A Rust library for pricing vanilla options under Black-Scholes dynamics,
//! with three interchangeable models bound to a shared option contract.
//!
//! ## Key Features
//!
//! - **Closed Form**: Black-Scholes price, Greeks and Newton-Raphson implied volatility
//! - **Lattice**: Cox-Ross-Rubinstein binomial tree for European and American exercise
//! - **Simulation**: Monte Carlo pricing with optional rayon parallelism and fixed seeds
//! - **Greeks**: closed-form, lattice-node and pathwise / finite-difference estimates
//! - **Validation**: every contract and model configuration is checked up front
//!
//! ## Quick Start
//!
//! ```rust
//! use options_pricer::{BlackScholesModel, ExerciseStyle, OptionContract, OptionType};
//!
//! let option = OptionContract::new(
//!     100.0,   // Spot price
//!     100.0,   // Strike price
//!     0.05,    // Risk-free rate
//!     "12mo",  // Maturity
//!     0.2,     // Volatility
//!     OptionType::Call,
//!     ExerciseStyle::European,
//! )
//! .expect("Valid contract")
//! .into_shared();
//!
//! let model = BlackScholesModel::new(option).expect("European contract");
//! println!("Call price: {:.4}", model.calculate_price());
//! ```
//!
//! ## Shared Contracts
//!
//! Models hold a [`SharedOption`] handle, so one contract can back several
//! models at once. Implied-volatility search temporarily overwrites the
//! contract's volatility and always restores it before returning.

// Module declarations
pub mod analytics;
pub mod config;
pub mod error;
pub mod greeks;
pub mod math_utils;
pub mod models;
pub mod option;
pub mod rng;

// Re-export commonly used types for convenience
pub use config::ImpliedVolConfig;
pub use error::{PricingError, PricingResult};
pub use greeks::{Greeks, GreeksConfig};
pub use models::{AnyModel, BinomialModel, BlackScholesModel, MonteCarloModel, PricingModel};
pub use option::{ExerciseStyle, Maturity, OptionContract, OptionTerms, OptionType, SharedOption};
