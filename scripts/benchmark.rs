// scripts/benchmark.rs
use chrono::Local;
use options_pricer::math_utils::Timer;
use options_pricer::{
    BinomialModel, BlackScholesModel, ExerciseStyle, MonteCarloModel, OptionContract, OptionType,
    PricingResult, SharedOption,
};
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::cpu_model(),
            cpu_cores: num_cpus::get(),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn cpu_model() -> String {
        #[cfg(target_os = "linux")]
        {
            fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|content| {
                    content
                        .lines()
                        .find(|line| line.starts_with("model name"))
                        .and_then(|line| line.split(':').nth(1))
                        .map(|s| s.trim().to_string())
                })
                .unwrap_or_else(|| "Unknown CPU".to_string())
        }

        #[cfg(not(target_os = "linux"))]
        {
            "Unknown CPU".to_string()
        }
    }
}

#[derive(Debug)]
struct BenchRow {
    model: &'static str,
    variant: String,
    size: usize,
    price: f64,
    elapsed_ms: f64,
}

impl BenchRow {
    fn throughput(&self) -> f64 {
        if self.elapsed_ms > 0.0 {
            self.size as f64 / (self.elapsed_ms / 1000.0)
        } else {
            f64::INFINITY
        }
    }
}

/// Run `f` once and record its wall time
fn timed<F>(model: &'static str, variant: &str, size: usize, f: F) -> PricingResult<BenchRow>
where
    F: FnOnce() -> PricingResult<f64>,
{
    let mut timer = Timer::new();
    timer.start();
    let price = f()?;
    let elapsed_ms = timer.elapsed_ms();
    info!(model, variant, size, price, elapsed_ms, "benchmark run");
    Ok(BenchRow {
        model,
        variant: variant.to_string(),
        size,
        price,
        elapsed_ms,
    })
}

fn contract(style: ExerciseStyle, option_type: OptionType) -> PricingResult<SharedOption> {
    Ok(OptionContract::new(100.0, 100.0, 0.05, "12mo", 0.2, option_type, style)?.into_shared())
}

fn run_suite() -> PricingResult<Vec<BenchRow>> {
    let mut rows = Vec::new();
    let european_call = contract(ExerciseStyle::European, OptionType::Call)?;
    let american_put = contract(ExerciseStyle::American, OptionType::Put)?;

    let bs = BlackScholesModel::new(european_call.clone())?;
    rows.push(timed("black_scholes", "price", 1, || Ok(bs.calculate_price()))?);
    let market = bs.calculate_price();
    rows.push(timed("black_scholes", "implied_vol", 1, || bs.calculate_iv(market))?);

    for steps in [100, 500, 2_000] {
        let european = BinomialModel::new(european_call.clone(), steps)?;
        rows.push(timed("binomial", "european_call", steps, || european.calculate_price())?);
        let american = BinomialModel::new(american_put.clone(), steps)?;
        rows.push(timed("binomial", "american_put", steps, || american.calculate_price())?);
    }

    for samples in [100_000, 1_000_000, 10_000_000] {
        let mc = MonteCarloModel::new(european_call.clone(), samples)?.with_seed(42);
        rows.push(timed("monte_carlo", "serial", samples, || mc.calculate_price())?);
        rows.push(timed("monte_carlo", "parallel", samples, || mc.calculate_price_parallel())?);
    }

    Ok(rows)
}

fn write_csv(rows: &[BenchRow], system: &SystemInfo) -> std::io::Result<PathBuf> {
    let dir = env::current_dir()?.join("results");
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("benchmark_{}.csv", Local::now().format("%Y%m%d_%H%M%S")));

    let mut file = File::create(&path)?;
    writeln!(file, "# os={} cpu={} cores={} rayon_threads={}", system.os, system.cpu_model, system.cpu_cores, system.rayon_threads)?;
    writeln!(file, "model,variant,size,price,elapsed_ms,units_per_sec")?;
    for row in rows {
        writeln!(
            file,
            "{},{},{},{:.8},{:.3},{:.1}",
            row.model,
            row.variant,
            row.size,
            row.price,
            row.elapsed_ms,
            row.throughput()
        )?;
    }
    Ok(path)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let system = SystemInfo::gather();
    println!("options-pricer benchmark");
    println!("========================");
    println!("OS: {}", system.os);
    println!("CPU: {} ({} cores)", system.cpu_model, system.cpu_cores);
    println!("Rayon threads: {}\n", system.rayon_threads);

    let rows = match run_suite() {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Benchmark failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("{:<14} {:<14} {:>10} {:>14} {:>12}", "Model", "Variant", "Size", "Price", "Time (ms)");
    for row in &rows {
        println!(
            "{:<14} {:<14} {:>10} {:>14.6} {:>12.3}",
            row.model, row.variant, row.size, row.price, row.elapsed_ms
        );
    }

    match write_csv(&rows, &system) {
        Ok(path) => println!("\nResults written to {}", path.display()),
        Err(e) => warn!(error = %e, "could not write benchmark csv"),
    }
}
