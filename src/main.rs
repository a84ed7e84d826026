//! `zonetour`: read an instance, anneal until the deadline, print the route.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use u_zonetour::anneal::{AnnealConfig, TravellingSalesmanProblem};
use u_zonetour::io::{parse_instance, render_route};
use u_zonetour::model::Instance;

#[derive(Debug, Parser)]
#[command(name = "zonetour", version, about = "Optimizes day-dependent zone tours")]
struct Cli {
    /// Instance file; standard input when omitted
    input: Option<PathBuf>,

    /// Wall-clock budget measured from process start, e.g. `500ms`, `3s`, `2m`
    #[arg(long, value_parser = parse_duration)]
    duration: Option<Duration>,

    /// Log calibration and run statistics
    #[arg(long)]
    debug: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads; all available cores when omitted
    #[arg(long)]
    workers: Option<usize>,
}

fn parse_duration(text: &str) -> Result<Duration> {
    let text = text.trim();
    let split = text
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(text.len());
    let (value, unit) = text.split_at(split);
    let value: f64 = value
        .parse()
        .with_context(|| format!("invalid duration `{text}`"))?;
    let secs = match unit {
        "ms" => value / 1000.0,
        "s" | "" => value,
        "m" => value * 60.0,
        other => bail!("unknown duration unit `{other}`"),
    };
    Duration::try_from_secs_f64(secs).with_context(|| format!("duration `{text}` out of range"))
}

/// Time budget used when none is given, scaled by instance size.
fn default_duration(instance: &Instance) -> Duration {
    let visits = instance.required_visits;
    let regions = instance.total_regions;
    let millis = if visits <= 20 && regions < 50 {
        1300
    } else if visits <= 100 && regions < 200 {
        4800
    } else {
        14_700
    };
    Duration::from_millis(millis)
}

fn read_instance(path: Option<&PathBuf>) -> Result<Instance> {
    let instance = match path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            parse_instance(BufReader::new(file))
        }
        None => parse_instance(io::stdin().lock()),
    };
    instance.context("failed to read instance")
}

fn main() -> Result<()> {
    let started = Instant::now();
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    );

    let instance = read_instance(cli.input.as_ref())?;
    let budget = cli.duration.unwrap_or_else(|| default_duration(&instance));
    let deadline = started + budget;
    log::debug!(
        "{} visits over {} regions, budget {:?}",
        instance.required_visits,
        instance.total_regions,
        budget
    );

    let mut config = AnnealConfig::default();
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers);
    }
    let steps = config.calibration_steps;

    let mut tsp = TravellingSalesmanProblem::from_instance(&instance, deadline, config)
        .context("invalid annealing configuration")?;

    let calibrating = Instant::now();
    match tsp.auto(steps) {
        Ok(calibration) => log::debug!(
            "Tmax {:.3}, Tmin {:.3} after {} trials in {:?}",
            calibration.temperatures.t_max,
            calibration.temperatures.t_min,
            calibration.trials,
            calibrating.elapsed()
        ),
        Err(err) => log::warn!("{err}; annealing with default temperatures"),
    }

    let result = tsp.resolve().context("annealing failed")?;
    log::debug!(
        "{} steps on {} workers in {:?}, best energy {}",
        result.iterations,
        result.workers,
        result.elapsed,
        result.best_cost
    );

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    render_route(tsp.state().regions(), &instance.costs, &instance.regions, &mut out)
        .context("failed to write route")?;
    out.flush()?;
    log::debug!("total time {:?}", started.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1.5").unwrap(), Duration::from_millis(1500));
        assert!(parse_duration("3h").is_err());
        assert!(parse_duration("fast").is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "zonetour",
            "--duration",
            "200ms",
            "--debug",
            "--seed",
            "9",
            "--workers",
            "2",
            "input.txt",
        ])
        .unwrap();
        assert_eq!(cli.duration, Some(Duration::from_millis(200)));
        assert!(cli.debug);
        assert_eq!(cli.seed, Some(9));
        assert_eq!(cli.workers, Some(2));
        assert_eq!(cli.input, Some(PathBuf::from("input.txt")));
    }

    #[test]
    fn test_default_duration_tiers() {
        let text = "1 A\nhome\nA B\nA B 1 5\n";
        let instance = parse_instance(text.as_bytes()).unwrap();
        assert_eq!(default_duration(&instance), Duration::from_millis(1300));
    }
}
