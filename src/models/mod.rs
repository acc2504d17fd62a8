// src/models/mod.rs
pub mod binomial;
pub mod black_scholes;
pub mod model;
pub mod monte_carlo;

pub use binomial::BinomialModel;
pub use black_scholes::BlackScholesModel;
pub use model::PricingModel;
pub use monte_carlo::MonteCarloModel;

use crate::error::PricingResult;
use crate::option::SharedOption;

/// Closed set of pricing models, for callers that pick a model at runtime
#[derive(Debug, Clone)]
pub enum AnyModel {
    BlackScholes(BlackScholesModel),
    Binomial(BinomialModel),
    MonteCarlo(MonteCarloModel),
}

impl AnyModel {
    fn inner(&self) -> &dyn PricingModel {
        match self {
            AnyModel::BlackScholes(model) => model,
            AnyModel::Binomial(model) => model,
            AnyModel::MonteCarlo(model) => model,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn PricingModel {
        match self {
            AnyModel::BlackScholes(model) => model,
            AnyModel::Binomial(model) => model,
            AnyModel::MonteCarlo(model) => model,
        }
    }
}

impl PricingModel for AnyModel {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn option(&self) -> &SharedOption {
        self.inner().option()
    }

    fn price(&self) -> PricingResult<f64> {
        self.inner().price()
    }

    fn rebind(&mut self, option: SharedOption) -> PricingResult<()> {
        self.inner_mut().rebind(option)
    }
}

impl From<BlackScholesModel> for AnyModel {
    fn from(model: BlackScholesModel) -> Self {
        AnyModel::BlackScholes(model)
    }
}

impl From<BinomialModel> for AnyModel {
    fn from(model: BinomialModel) -> Self {
        AnyModel::Binomial(model)
    }
}

impl From<MonteCarloModel> for AnyModel {
    fn from(model: MonteCarloModel) -> Self {
        AnyModel::MonteCarlo(model)
    }
}
