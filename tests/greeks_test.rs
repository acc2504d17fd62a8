// tests/greeks_test.rs
use options_pricer::analytics::bs_analytic;
use options_pricer::{
    BinomialModel, BlackScholesModel, ExerciseStyle, GreeksConfig, MonteCarloModel,
    OptionContract, OptionType, PricingError, SharedOption,
};

fn atm(option_type: OptionType, style: ExerciseStyle) -> SharedOption {
    OptionContract::new(100.0, 100.0, 0.05, "12mo", 0.2, option_type, style)
        .expect("Valid contract")
        .into_shared()
}

fn atm_bs(option_type: OptionType) -> BlackScholesModel {
    BlackScholesModel::new(atm(option_type, ExerciseStyle::European)).expect("European contract")
}

#[test]
fn test_bs_call_delta_analytic() {
    let delta = atm_bs(OptionType::Call).calculate_delta();
    let expected_delta = 0.636_830_651_175_619;

    let abs_error = (delta - expected_delta).abs();
    println!("\nAnalytic Delta: {}", delta);
    println!("Expected Delta: {}", expected_delta);

    assert!(abs_error < 1e-9, "Delta differs from reference: {}", abs_error);
}

#[test]
fn test_bs_gamma_analytic() {
    let gamma = atm_bs(OptionType::Call).calculate_gamma();
    let expected_gamma = 0.018762017345847;

    let rel_error = (gamma - expected_gamma).abs() / expected_gamma;
    println!("\nAnalytic Gamma: {}", gamma);
    println!("Expected Gamma: {}", expected_gamma);
    println!("Relative Error (Gamma): {}", rel_error);

    assert!(rel_error < 1e-9, "Relative error for Gamma exceeds tolerance: {}", rel_error);
    assert_eq!(gamma, atm_bs(OptionType::Put).calculate_gamma());
}

#[test]
fn test_bs_vega_analytic() {
    let vega = atm_bs(OptionType::Call).calculate_vega();
    let expected_vega = 37.524034691693792;

    let rel_error = (vega - expected_vega).abs() / expected_vega;
    println!("\nAnalytic Vega: {}", vega);
    println!("Expected Vega: {}", expected_vega);
    println!("Relative Error (Vega): {}", rel_error);

    assert!(rel_error < 1e-9, "Relative error for Vega exceeds tolerance: {}", rel_error);
}

#[test]
fn test_bs_theta_and_rho_carry_discount() {
    let call = atm_bs(OptionType::Call);
    let put = atm_bs(OptionType::Put);

    // Strike terms carry e^(-qT), which is 1 here
    let call_theta = call.calculate_theta();
    let call_rho = call.calculate_rho();
    println!("\nCall Theta: {}", call_theta);
    println!("Call Rho: {}", call_rho);

    assert!((call_theta - (-6.5505)).abs() < 1e-3, "theta = {}", call_theta);
    assert!((call_rho - 55.9618).abs() < 1e-3, "rho = {}", call_rho);

    // Decay terms cancel: Θc - Θp = -rK; ρc - ρp = TK
    assert!((call_theta - put.calculate_theta() + 0.05 * 100.0).abs() < 1e-9);
    assert!((call_rho - put.calculate_rho() - 100.0).abs() < 1e-9);
}

#[test]
fn test_bs_greeks_with_carry() {
    let option = OptionContract::with_carry(
        100.0,
        95.0,
        0.04,
        "6mo",
        0.25,
        OptionType::Put,
        ExerciseStyle::European,
        0.02,
    )
    .expect("Valid contract")
    .into_shared();
    let model = BlackScholesModel::new(option).expect("European contract");
    let greeks = model.greeks(GreeksConfig::all());

    // Delta against a bump-and-reprice of the closed form
    let h = 1e-4;
    let bumped = |s: f64| bs_analytic::bs_price(OptionType::Put, s, 95.0, 0.04, 0.25, 0.5, 0.02);
    let fd_delta = (bumped(100.0 + h) - bumped(100.0 - h)) / (2.0 * h);
    let fd_gamma = (bumped(100.0 + h) - 2.0 * bumped(100.0) + bumped(100.0 - h)) / (h * h);

    println!("\nDelta: {:?} (FD {})", greeks.delta, fd_delta);
    println!("Gamma: {:?} (FD {})", greeks.gamma, fd_gamma);

    assert!((greeks.delta.unwrap() - fd_delta).abs() < 1e-6);
    assert!((greeks.gamma.unwrap() - fd_gamma).abs() < 1e-4);
    assert!(greeks.vega.unwrap() > 0.0);
}

#[test]
fn test_binomial_delta_gamma_near_analytic() {
    let lattice = BinomialModel::new(atm(OptionType::Call, ExerciseStyle::European), 500)
        .expect("Valid lattice");
    let bs = atm_bs(OptionType::Call);

    let delta = lattice.calculate_delta(0, 0).expect("Node in range");
    let gamma = lattice.calculate_gamma(0, 0).expect("Node in range");

    println!("\nLattice Delta: {} vs BS {}", delta, bs.calculate_delta());
    println!("Lattice Gamma: {} vs BS {}", gamma, bs.calculate_gamma());

    assert!((delta - 0.631_096_831).abs() < 1e-6);
    assert!((delta - bs.calculate_delta()).abs() < 1e-2);
    assert!((gamma - bs.calculate_gamma()).abs() < 1e-3);

    let put = BinomialModel::new(atm(OptionType::Put, ExerciseStyle::European), 500)
        .expect("Valid lattice");
    let put_delta = put.calculate_delta(0, 0).expect("Node in range");
    assert!((put_delta - (-0.359_998_778)).abs() < 1e-6, "put delta = {}", put_delta);
}

#[test]
fn test_binomial_theta_per_day() {
    let lattice = BinomialModel::new(atm(OptionType::Call, ExerciseStyle::European), 500)
        .expect("Valid lattice");

    let theta_root = lattice.calculate_theta(0, 0).expect("Node in range");
    let theta_inner = lattice.calculate_theta(2, 1).expect("Node in range");
    println!("\nTheta(0,0): {}", theta_root);
    println!("Theta(2,1): {}", theta_inner);

    assert!((theta_root - (-0.776_401_354_7)).abs() < 1e-6);
    assert!((theta_inner - (-1.615_342_196_9)).abs() < 1e-6);
}

#[test]
fn test_binomial_node_bounds() {
    let lattice = BinomialModel::new(atm(OptionType::Put, ExerciseStyle::American), 10)
        .expect("Valid lattice");

    // Delta: i < steps, j <= i
    assert!(lattice.calculate_delta(9, 9).is_ok());
    for (i, j) in [(10, 0), (3, 4), (42, 42)] {
        let err = lattice.calculate_delta(i, j).unwrap_err();
        assert!(matches!(err, PricingError::IndexOutOfRange { .. }), "({}, {})", i, j);
    }

    // Gamma and theta: i < steps - 1
    assert!(lattice.calculate_gamma(8, 8).is_ok());
    assert!(lattice.calculate_theta(8, 0).is_ok());
    assert!(lattice.calculate_gamma(9, 0).is_err());
    assert!(lattice.calculate_theta(9, 0).is_err());
    assert!(lattice.calculate_theta(2, 3).is_err());

    let err = lattice.calculate_gamma(9, 2).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid indices (9, 2) for gamma on a 10-step lattice"
    );
}

#[test]
fn test_american_put_delta_steeper() {
    let american = BinomialModel::new(atm(OptionType::Put, ExerciseStyle::American), 500)
        .expect("Valid lattice");
    let european = BinomialModel::new(atm(OptionType::Put, ExerciseStyle::European), 500)
        .expect("Valid lattice");

    let am_delta = american.calculate_delta(0, 0).expect("Node in range");
    let eu_delta = european.calculate_delta(0, 0).expect("Node in range");
    println!("\nAmerican put delta: {}, European: {}", am_delta, eu_delta);

    assert!(am_delta < eu_delta);
    assert!(am_delta > -1.0);
}

#[test]
fn test_mc_delta_pathwise_vs_analytic() {
    let model = MonteCarloModel::new(atm(OptionType::Call, ExerciseStyle::European), 200_000)
        .expect("Valid configuration")
        .with_seed(42);

    let mc_delta = model.calculate_delta().expect("Finite estimate");
    let analytic_delta = atm_bs(OptionType::Call).calculate_delta();
    let rel_error = (mc_delta - analytic_delta).abs() / analytic_delta;

    println!("\nMC Delta (Pathwise): {}", mc_delta);
    println!("Analytic Delta: {}", analytic_delta);
    println!("Relative Error: {}", rel_error);

    assert!(rel_error < 0.01, "Relative error for Delta exceeds 1%: {}", rel_error);
}

#[test]
fn test_mc_put_delta_pathwise_vs_analytic() {
    let model = MonteCarloModel::new(atm(OptionType::Put, ExerciseStyle::European), 200_000)
        .expect("Valid configuration")
        .with_seed(7);

    let mc_delta = model.calculate_delta().expect("Finite estimate");
    let analytic_delta = atm_bs(OptionType::Put).calculate_delta();
    println!("\nMC Put Delta: {} vs {}", mc_delta, analytic_delta);

    assert!((mc_delta - analytic_delta).abs() < 0.01);
}

#[test]
fn test_mc_vega_pathwise_vs_analytic() {
    let model = MonteCarloModel::new(atm(OptionType::Call, ExerciseStyle::European), 200_000)
        .expect("Valid configuration")
        .with_seed(42);

    let mc_vega = model.calculate_vega().expect("Finite estimate");
    let analytic_vega = atm_bs(OptionType::Call).calculate_vega();
    let rel_error = (mc_vega - analytic_vega).abs() / analytic_vega;

    println!("\nMC Vega (Pathwise): {}", mc_vega);
    println!("Analytic Vega: {}", analytic_vega);
    println!("Relative Error: {}", rel_error);

    assert!(rel_error < 0.02, "Relative error for Vega exceeds 2%: {}", rel_error);
}

#[test]
fn test_mc_rho_and_theta_vs_finite_difference() {
    let model = MonteCarloModel::new(atm(OptionType::Call, ExerciseStyle::European), 200_000)
        .expect("Valid configuration")
        .with_seed(42);
    let greeks = model
        .greeks(GreeksConfig::RHO | GreeksConfig::THETA)
        .expect("Finite estimates");

    // True sensitivities of the closed form, discount factor on the strike
    let h = 1e-5;
    let price = |r: f64, t: f64| bs_analytic::bs_price(OptionType::Call, 100.0, 100.0, r, 0.2, t, 0.0);
    let fd_rho = (price(0.05 + h, 1.0) - price(0.05 - h, 1.0)) / (2.0 * h);
    let fd_theta = -(price(0.05, 1.0 + h) - price(0.05, 1.0 - h)) / (2.0 * h);

    let mc_rho = greeks.rho.expect("Selected");
    let mc_theta = greeks.theta.expect("Selected");
    println!("\nMC Rho: {} vs FD {}", mc_rho, fd_rho);
    println!("MC Theta: {} vs FD {}", mc_theta, fd_theta);

    assert!((mc_rho - fd_rho).abs() / fd_rho < 0.03);
    assert!((mc_theta - fd_theta).abs() / fd_theta.abs() < 0.05);
    assert!(greeks.delta.is_none() && greeks.gamma.is_none() && greeks.vega.is_none());
}

#[test]
fn test_mc_gamma_finite_diff_vs_analytic() {
    let model = MonteCarloModel::new(atm(OptionType::Call, ExerciseStyle::European), 500_000)
        .expect("Valid configuration")
        .with_seed(42);

    let mc_gamma = model.calculate_gamma().expect("Finite estimate");
    let analytic_gamma = atm_bs(OptionType::Call).calculate_gamma();
    let rel_error = (mc_gamma - analytic_gamma).abs() / analytic_gamma;

    println!("\nMC Gamma (Finite Diff): {}", mc_gamma);
    println!("Analytic Gamma: {}", analytic_gamma);
    println!("Relative Error: {}", rel_error);

    assert!(rel_error < 0.05, "Relative error for Gamma exceeds 5%: {}", rel_error);
}

#[test]
#[ignore]
fn test_mc_greeks_convergence_sweep() {
    let analytic = atm_bs(OptionType::Call);
    println!("\n{:>10} {:>12} {:>12} {:>12}", "Samples", "Delta Err", "Vega Err", "Gamma Err");

    for &n in &[10_000usize, 100_000, 1_000_000, 5_000_000] {
        let model = MonteCarloModel::new(atm(OptionType::Call, ExerciseStyle::European), n)
            .expect("Valid configuration")
            .with_seed(2024);
        let greeks = model
            .greeks(GreeksConfig::DELTA | GreeksConfig::VEGA | GreeksConfig::GAMMA)
            .expect("Finite estimates");

        let delta_err = (greeks.delta.unwrap() - analytic.calculate_delta()).abs();
        let vega_err = (greeks.vega.unwrap() - analytic.calculate_vega()).abs();
        let gamma_err = (greeks.gamma.unwrap() - analytic.calculate_gamma()).abs();
        println!("{:>10} {:>12.6} {:>12.6} {:>12.6}", n, delta_err, vega_err, gamma_err);
    }
}
