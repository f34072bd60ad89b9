use std::fs::File;
use std::io::{BufWriter, Write};

use stormlab::analysis;
use stormlab::config::{
    self, DEFAULT_EXCEEDANCE_THRESHOLD, DEFAULT_VAR_LEVEL, DEFAULT_WIND_EXPONENT,
};
use stormlab::portfolio::Portfolio;
use stormlab::simulation::{RunHooks, Simulation, SimulationResult};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut params = config::canonical_params();
    let mut portfolio_path: Option<String> = None;
    let mut scenario_label: Option<String> = None;
    let mut wind_exponent = DEFAULT_WIND_EXPONENT;
    let mut threshold = DEFAULT_EXCEEDANCE_THRESHOLD;
    let mut csv_path: Option<String> = None;
    let mut curve_path: Option<String> = None;
    let mut serial = false;
    let mut quiet = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                params.seed = args[i].parse().expect("--seed requires a u64");
            }
            "--years" => {
                i += 1;
                params.years = args[i].parse().expect("--years requires a positive integer");
            }
            "--lambda" => {
                i += 1;
                params.lambda = args[i].parse().expect("--lambda requires a float");
            }
            "--wind-mean" => {
                i += 1;
                params.wind_mean_mph = args[i].parse().expect("--wind-mean requires a float");
            }
            "--wind-std" => {
                i += 1;
                params.wind_std_mph = args[i].parse().expect("--wind-std requires a float");
            }
            "--wind-exponent" => {
                i += 1;
                wind_exponent = args[i].parse().expect("--wind-exponent requires a float");
            }
            "--scenario" => {
                i += 1;
                scenario_label = Some(args[i].clone());
            }
            "--portfolio" => {
                i += 1;
                portfolio_path = Some(args[i].clone());
            }
            "--threshold" => {
                i += 1;
                threshold = args[i].parse().expect("--threshold requires a float");
            }
            "--csv" => {
                i += 1;
                csv_path = Some(args[i].clone());
            }
            "--curve" => {
                i += 1;
                curve_path = Some(args[i].clone());
            }
            "--serial" => serial = true,
            "--quiet" => quiet = true,
            other => {
                eprintln!("Unknown flag: {other}");
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let scenario = match scenario_label.as_deref() {
        Some(label) => match config::climate_scenario(label) {
            Some(s) => s,
            None => {
                eprintln!("Unknown scenario `{label}` (try today, 2030, 2050, 2100)");
                std::process::exit(2);
            }
        },
        None => config::climate_scenario("today").expect("identity scenario exists"),
    };
    let params = params.with_climate(scenario.factor, wind_exponent);

    let portfolio = match &portfolio_path {
        Some(path) => match Portfolio::from_csv_path(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error loading {path}: {e}");
                std::process::exit(1);
            }
        },
        None => config::demo_portfolio(),
    };

    if !quiet {
        println!(
            "Simulating {} years (λ={:.3}, wind μ={:.1} σ={:.1}, scenario {} ×{:.2}, {} properties, seed {})",
            params.years,
            params.lambda,
            params.wind_mean_mph,
            params.wind_std_mph,
            scenario.label,
            scenario.factor,
            portfolio.len(),
            params.seed,
        );
    }

    let sim = match Simulation::new(params, portfolio) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let milestone = (sim.params().years / 10).max(1);
    let progress = move |done: usize, total: usize| {
        if done % milestone == 0 || done == total {
            eprintln!("  {done}/{total} years");
        }
    };
    let hooks = RunHooks {
        progress: if quiet { None } else { Some(&progress) },
        cancel: None,
    };

    let result = match sim.run_with_hooks(!serial, &hooks) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = &csv_path {
        write_losses_csv(&result, path);
        if !quiet {
            println!("Annual losses → {path}");
        }
    }

    if let Some(path) = &curve_path {
        write_curve_ndjson(&result, path);
        if !quiet {
            println!("Exceedance curve → {path}");
        }
    }

    if !quiet {
        print_summary(&result, threshold);
        print_return_periods(&result);
    }
}

fn print_summary(result: &SimulationResult, threshold: f64) {
    let summary = result.summary();
    println!("\n=== Annual loss distribution ({} years) ===", summary.n);
    println!("  Expected annual loss:  ${:>15.0}", summary.mean);
    println!("  Median:                ${:>15.0}", summary.p50);
    println!(
        "  {:.0}% VaR:               ${:>15.0}",
        DEFAULT_VAR_LEVEL * 100.0,
        result.value_at_risk(DEFAULT_VAR_LEVEL)
    );
    println!("  Worst year:            ${:>15.0}", summary.max);
    println!("  Std deviation:         ${:>15.0}", summary.std_dev);
    println!(
        "  P(loss > ${:.0}M):      {:>15.2}%",
        threshold / 1_000_000.0,
        result.prob_exceeding(threshold) * 100.0
    );
}

fn print_return_periods(result: &SimulationResult) {
    let years = result.years as f64;
    println!("\n=== Return periods ===");
    println!("{:>12} | {:>15}", "1-in-N years", "Loss ($)");
    println!("{}", "-".repeat(31));
    for period in [10.0, 25.0, 50.0, 100.0, 250.0, 1_000.0, 10_000.0] {
        if period > years {
            continue;
        }
        if let Some(loss) = analysis::return_period_loss(result.annual_losses(), period) {
            println!("{:>12.0} | {:>15.0}", period, loss);
        }
    }
}

fn write_losses_csv(result: &SimulationResult, path: &str) {
    let file = File::create(path).unwrap_or_else(|e| panic!("failed to create {path}: {e}"));
    let mut w = BufWriter::new(file);
    writeln!(w, "year,loss").expect("write");
    for (year, loss) in result.annual_losses().iter().enumerate() {
        writeln!(w, "{year},{loss:.2}").expect("write");
    }
}

fn write_curve_ndjson(result: &SimulationResult, path: &str) {
    let file = File::create(path).unwrap_or_else(|e| panic!("failed to create {path}: {e}"));
    let mut w = BufWriter::new(file);
    for point in result.exceedance_curve() {
        serde_json::to_writer(&mut w, &point).expect("serialize curve point");
        writeln!(w).expect("newline");
    }
}
