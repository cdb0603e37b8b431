//! Shift report tool
//!
//! Simulates batches of shifts and prints the averaged dispatch report the
//! shop uses to compare rule settings. By default each invocation draws a
//! fresh seed; pass `--seed` to make the whole batch reproducible.

use std::env;
use std::error::Error;
use std::str::FromStr;

use log::info;

use coffee_sim_core::{drink_breakdown, metrics, run_many, Order, SimulationConfig};

/// Parsed command line
#[derive(Debug)]
struct CliOptions {
    /// Shifts to simulate and average
    runs: usize,

    /// Emit the report as JSON instead of text
    json: bool,

    /// Shift parameters, defaults overridden per flag
    config: SimulationConfig,
}

fn print_usage() {
    println!("Usage: coffee-sim [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --runs N      Shifts to simulate and average (default: 100)");
    println!("  --shift N     Shift length in minutes (default: 180)");
    println!("  --baristas N  Baristas on shift (default: 3)");
    println!("  --rate R      Customer arrivals per minute (default: 1.4)");
    println!("  --loyalty P   Probability an arrival is a loyalty member (default: 0.3)");
    println!("  --seed S      Base RNG seed; omit for a fresh seed per invocation");
    println!("  --json        Emit the averaged report as JSON");
    println!("  --help        Show this help");
}

/// Parse the command line; `Ok(None)` means help was requested
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<CliOptions>, String> {
    let mut options = CliOptions {
        runs: 100,
        json: false,
        config: SimulationConfig::default(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--runs" => options.runs = parse_value(&arg, args.next())?,
            "--shift" => options.config.shift_minutes = parse_value(&arg, args.next())?,
            "--baristas" => options.config.baristas = parse_value(&arg, args.next())?,
            "--rate" => options.config.arrivals.rate_per_minute = parse_value(&arg, args.next())?,
            "--loyalty" => {
                options.config.arrivals.loyalty_probability = parse_value(&arg, args.next())?
            }
            "--seed" => options.config.rng_seed = Some(parse_value(&arg, args.next())?),
            "--json" => options.json = true,
            "--help" | "-h" => return Ok(None),
            _ => return Err(format!("unknown option '{}'", arg)),
        }
    }

    Ok(Some(options))
}

fn parse_value<T: FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let raw = value.ok_or_else(|| format!("missing value for {}", flag))?;
    raw.parse()
        .map_err(|_| format!("invalid value '{}' for {}", raw, flag))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(message) => {
            print_usage();
            return Err(message.into());
        }
    };

    info!("simulating {} shifts", options.runs);
    let results = run_many(&options.config, options.runs)?;
    let evaluation = metrics::evaluate(&results);

    let total_revenue_cents: i64 = results
        .iter()
        .flat_map(|result| result.completed_orders.iter())
        .map(Order::total_price_cents)
        .sum();
    let average_revenue = total_revenue_cents as f64 / results.len().max(1) as f64 / 100.0;

    if options.json {
        let drink_totals: serde_json::Map<String, serde_json::Value> = drink_breakdown(&results)
            .into_iter()
            .map(|(kind, count)| (kind.name().to_string(), serde_json::Value::from(count as u64)))
            .collect();
        let payload = serde_json::json!({
            "evaluation": evaluation,
            "drink_totals": drink_totals,
            "average_revenue_dollars": average_revenue,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Coffee Shop Dispatch Report");
    println!("===========================");
    println!("Shifts simulated : {}", evaluation.runs);
    println!("Shift length     : {} minutes", options.config.shift_minutes);
    println!("Baristas         : {}", options.config.baristas);
    println!(
        "Arrival rate     : {:.2} customers/minute",
        options.config.arrivals.rate_per_minute
    );
    match options.config.rng_seed {
        Some(seed) => println!("Base seed        : {}", seed),
        None => println!("Base seed        : drawn from the system clock"),
    }
    println!();
    println!("Averages per shift");
    println!("------------------");
    println!(
        "Average wait            : {:.2} minutes",
        evaluation.average_wait_minutes
    );
    println!(
        "Timeout rate            : {:.2}%",
        evaluation.timeout_rate_percent
    );
    println!(
        "Fairness violation rate : {:.2}%",
        evaluation.fairness_violation_rate_percent
    );
    println!(
        "Workload balance stddev : {:.2} minutes",
        evaluation.workload_balance_stddev
    );
    println!(
        "Completed orders        : {:.1}",
        evaluation.average_completed_orders
    );
    println!(
        "Walkouts                : {:.1}",
        evaluation.average_abandoned_orders
    );
    println!("Revenue                 : ${:.2}", average_revenue);
    println!();
    println!("Drinks served across all shifts");
    println!("-------------------------------");
    for (kind, count) in drink_breakdown(&results) {
        println!("{:<12} {:>8}", kind.name(), count);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<CliOptions>, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults_match_the_standard_shop() {
        let options = parse(&[]).unwrap().unwrap();
        assert_eq!(options.runs, 100);
        assert!(!options.json);
        assert_eq!(options.config.shift_minutes, 180);
        assert_eq!(options.config.baristas, 3);
        assert_eq!(options.config.rng_seed, None);
    }

    #[test]
    fn test_flags_override_defaults() {
        let options = parse(&["--runs", "5", "--seed", "42", "--baristas", "2", "--json"])
            .unwrap()
            .unwrap();
        assert_eq!(options.runs, 5);
        assert_eq!(options.config.rng_seed, Some(42));
        assert_eq!(options.config.baristas, 2);
        assert!(options.json);
    }

    #[test]
    fn test_help_short_circuits() {
        assert!(parse(&["--help"]).unwrap().is_none());
        assert!(parse(&["-h"]).unwrap().is_none());
    }

    #[test]
    fn test_rejects_unknown_and_malformed_flags() {
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["--runs"]).is_err());
        assert!(parse(&["--runs", "lots"]).is_err());
    }
}
