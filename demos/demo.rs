// demos/demo.rs
use options_pricer::{
    BinomialModel, BlackScholesModel, ExerciseStyle, GreeksConfig, MonteCarloModel,
    OptionContract, OptionType, PricingResult,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(e) = run() {
        eprintln!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> PricingResult<()> {
    println!("Running options-pricer Demo\n");

    let call = OptionContract::new(
        100.0,
        100.0,
        0.05,
        "12mo",
        0.2,
        OptionType::Call,
        ExerciseStyle::European,
    )?
    .into_shared();
    let put = OptionContract::new(
        50.0,
        52.0,
        0.05,
        "24mo",
        0.3,
        OptionType::Put,
        ExerciseStyle::European,
    )?
    .into_shared();
    let american_put = OptionContract::new(
        50.0,
        52.0,
        0.05,
        "24mo",
        0.3,
        OptionType::Put,
        ExerciseStyle::American,
    )?
    .into_shared();

    println!("--- Black-Scholes ---");
    let bs_call = BlackScholesModel::new(call.clone())?;
    let bs_put = BlackScholesModel::new(put.clone())?;
    println!("ATM call (S=100, K=100, T=1):  {:.6}", bs_call.calculate_price());
    println!("Put (S=50, K=52, T=2):         {:.6}", bs_put.calculate_price());

    let greeks = bs_call.greeks(GreeksConfig::all());
    println!("Call Greeks:");
    println!("  Delta: {:.6}", greeks.delta.unwrap_or_default());
    println!("  Gamma: {:.6}", greeks.gamma.unwrap_or_default());
    println!("  Vega:  {:.6}", greeks.vega.unwrap_or_default());
    println!("  Theta: {:.6}", greeks.theta.unwrap_or_default());
    println!("  Rho:   {:.6}", greeks.rho.unwrap_or_default());

    let quote = 12.0;
    let iv = bs_call.calculate_iv(quote)?;
    println!("Implied vol for a {:.2} quote: {:.6}", quote, iv);
    println!("Contract volatility afterwards: {:.2}\n", call.volatility());

    println!("--- Binomial (500 steps) ---");
    let european = BinomialModel::new(put.clone(), 500)?;
    let american = BinomialModel::new(american_put, 500)?;
    let european_price = european.calculate_price()?;
    let american_price = american.calculate_price()?;
    println!("European put: {:.6}", european_price);
    println!("American put: {:.6}", american_price);
    println!("Early exercise premium: {:.6}", american_price - european_price);
    println!("American put delta(0,0): {:.6}", american.calculate_delta(0, 0)?);
    println!("American put gamma(0,0): {:.6}", american.calculate_gamma(0, 0)?);
    println!("American put theta(0,0): {:.6} per day\n", american.calculate_theta(0, 0)?);

    println!("--- Monte Carlo ---");
    for samples in [10_000, 100_000, 1_000_000] {
        let mc = MonteCarloModel::new(call.clone(), samples)?.with_seed(12345);
        let (price, stderr) = mc.calculate_price_with_stderr()?;
        println!("{:>9} samples: {:.6} ± {:.6}", samples, price, stderr);
    }
    let mc = MonteCarloModel::new(call, 1_000_000)?.with_seed(12345);
    println!("Parallel, 1M samples: {:.6}", mc.calculate_price_parallel()?);

    let mc_greeks = mc.greeks(GreeksConfig::DELTA | GreeksConfig::VEGA | GreeksConfig::GAMMA)?;
    println!(
        "MC Delta {:.6} (BS {:.6}), Vega {:.6} (BS {:.6}), Gamma {:.6} (BS {:.6})",
        mc_greeks.delta.unwrap_or_default(),
        greeks.delta.unwrap_or_default(),
        mc_greeks.vega.unwrap_or_default(),
        greeks.vega.unwrap_or_default(),
        mc_greeks.gamma.unwrap_or_default(),
        greeks.gamma.unwrap_or_default(),
    );

    Ok(())
}
