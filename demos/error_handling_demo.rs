// demos/error_handling_demo.rs
use options_pricer::{
    BinomialModel, BlackScholesModel, ExerciseStyle, ImpliedVolConfig, MonteCarloModel,
    OptionContract, OptionType,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    println!("Error Handling Demo for options-pricer");
    println!("======================================\n");

    // Test 1: Malformed maturity tokens
    println!("1. Testing malformed maturities...");
    for token in ["2months", "-3mo", "mo"] {
        match OptionContract::new(
            100.0,
            100.0,
            0.05,
            token,
            0.2,
            OptionType::Call,
            ExerciseStyle::European,
        ) {
            Ok(_) => println!("   Unexpected: {:?} should have failed!", token),
            Err(e) => println!("   ✓ Caught error: {}", e),
        }
    }

    // Test 2: Non-positive inputs
    println!("\n2. Testing negative spot price...");
    match OptionContract::new(
        -100.0,
        100.0,
        0.05,
        "12mo",
        0.2,
        OptionType::Call,
        ExerciseStyle::European,
    ) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    let american = match OptionContract::new(
        100.0,
        100.0,
        0.05,
        "12mo",
        0.2,
        OptionType::Put,
        ExerciseStyle::American,
    ) {
        Ok(option) => option.into_shared(),
        Err(e) => {
            println!("   Unexpected: {}", e);
            return;
        }
    };

    // Test 3: American contracts on European-only models
    println!("\n3. Testing American contract on European-only models...");
    match BlackScholesModel::new(american.clone()) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }
    match MonteCarloModel::new(american.clone(), 10_000) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 4: Invalid model configuration
    println!("\n4. Testing zero steps and zero samples...");
    match BinomialModel::new(american.clone(), 0) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }
    match MonteCarloModel::new(american.clone(), 0) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 5: Lattice indices out of range
    println!("\n5. Testing out-of-range lattice nodes...");
    match BinomialModel::new(american, 10) {
        Ok(lattice) => {
            for (i, j) in [(10, 0), (3, 5)] {
                match lattice.calculate_delta(i, j) {
                    Ok(delta) => println!("   Unexpected delta {} at ({}, {})", delta, i, j),
                    Err(e) => println!("   ✓ Caught error: {}", e),
                }
            }
            match lattice.calculate_gamma(9, 0) {
                Ok(_) => println!("   Unexpected: Should have failed!"),
                Err(e) => println!("   ✓ Caught error: {}", e),
            }
        }
        Err(e) => println!("   Unexpected: {}", e),
    }

    // Test 6: Implied volatility without a solution
    println!("\n6. Testing implied volatility for an unreachable quote...");
    let call = match OptionContract::new(
        100.0,
        100.0,
        0.05,
        "12mo",
        0.2,
        OptionType::Call,
        ExerciseStyle::European,
    ) {
        Ok(option) => option.into_shared(),
        Err(e) => {
            println!("   Unexpected: {}", e);
            return;
        }
    };
    if let Ok(model) = BlackScholesModel::new(call.clone()) {
        match model.calculate_iv(150.0) {
            Ok(iv) => println!("   Unexpected: converged to {}", iv),
            Err(e) => println!("   ✓ Caught error: {}", e),
        }
        println!("   Volatility after failed search: {}", call.volatility());

        let config = ImpliedVolConfig {
            max_iterations: 0,
            ..Default::default()
        };
        match model.calculate_iv_with(10.0, &config) {
            Ok(_) => println!("   Unexpected: Should have failed!"),
            Err(e) => println!("   ✓ Caught error: {}", e),
        }
    }

    println!("\nError handling demo complete!");
}
