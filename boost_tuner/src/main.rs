//! # Boost Tuner Binary
//!
//! Tunes boost converter controllers against a simulated plant.
//!
//! # Usage
//!
//! ```bash
//! # Optimize a job, print the result as JSON
//! boost_tuner optimize config/dual_loop_boost.toml
//!
//! # Override algorithm and seed, write the result to a file
//! boost_tuner optimize config/dual_loop_boost.toml --algorithm ga --seed 7 -o result.json
//!
//! # Single run at the job's initial point
//! boost_tuner simulate config/linear_pid.toml
//!
//! # Registered plants and algorithms
//! boost_tuner list
//! ```

use boost_common::config::{ConfigError, LogLevel};
use boost_common::evaluation::EvaluationMetrics;
use boost_plant::PlantRegistry;
use boost_tuner::config::{TuningJob, load_job};
use boost_tuner::optimize::{OptimizerRegistry, ProgressLogger, StopFlag};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

/// Boost Tuner - controller tuning by simulation-based optimization
#[derive(Parser, Debug)]
#[command(name = "boost_tuner")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Tune boost converter controllers with PSO or GA over a simulated plant")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the configured optimizer and emit the result as JSON.
    Optimize {
        /// Tuning job TOML.
        job: PathBuf,

        /// Write the result here instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Override `optimizer.seed`.
        #[arg(long)]
        seed: Option<u64>,

        /// Override `optimizer.algorithm`.
        #[arg(long, value_name = "NAME")]
        algorithm: Option<String>,
    },
    /// Simulate and evaluate the job's initial point once.
    Simulate {
        /// Tuning job TOML.
        job: PathBuf,

        /// Write the report here instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// List registered plants and algorithms.
    List,
}

impl Command {
    fn job(&self) -> Option<&Path> {
        match self {
            Self::Optimize { job, .. } | Self::Simulate { job, .. } => Some(job.as_path()),
            Self::List => None,
        }
    }
}

fn main() {
    let args = Args::parse();
    // Loaded before tracing: the job's [shared] log level applies unless
    // --verbose is given.
    let job = args.command.job().map(load_job).transpose();
    setup_tracing(&args, job_log_level(&job));

    let outcome = match job {
        Ok(job) => run(&args, job),
        Err(e) => Err(e.into()),
    };
    if let Err(e) = outcome {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, job: Option<TuningJob>) -> Result<(), Box<dyn std::error::Error>> {
    let plants = PlantRegistry::with_builtin();
    let optimizers = OptimizerRegistry::with_builtin();

    match &args.command {
        Command::Optimize {
            output,
            seed,
            algorithm,
            ..
        } => {
            let mut job = loaded(job)?;
            if let Some(seed) = seed {
                job.optimizer.seed = Some(*seed);
            }
            if let Some(algorithm) = algorithm {
                job.optimizer.algorithm = algorithm.clone();
            }

            let objective = job.objective(&plants)?;
            let mut optimizer = optimizers.create(&job.optimizer)?;

            // Ctrl-C stops the run before the next candidate evaluation.
            let stop = StopFlag::new();
            let flag = stop.clone();
            ctrlc::set_handler(move || {
                info!("Received interrupt, stopping after the current evaluation");
                flag.cancel();
            })?;

            info!(
                job = %job.shared.service_name,
                plant = objective.plant().model(),
                tuned = ?objective.tuned_keys(),
                algorithm = optimizer.name(),
                "Optimization starting"
            );
            let mut observer = ProgressLogger::new(stop);
            let result = optimizer.optimize(
                &objective,
                &job.search.bounds,
                &job.search.initial,
                &mut observer,
            )?;
            info!(
                best_score = result.best_score,
                evaluations = result.evaluations,
                diagnostics = ?result.best_diagnostics.as_ref().map(EvaluationMetrics::to_map),
                "Optimization complete"
            );
            emit(&result, output.as_deref())
        }
        Command::Simulate { output, .. } => {
            let job = loaded(job)?;
            let objective = job.objective(&plants)?;
            let run = objective.run(&job.search.initial)?;
            info!(
                samples = run.trajectory.len(),
                metrics = ?run.metrics.to_map(),
                "Simulation complete"
            );
            emit(&run, output.as_deref())
        }
        Command::List => {
            println!("plants:     {}", plants.list_plants().join(", "));
            println!("algorithms: {}", optimizers.list_algorithms().join(", "));
            Ok(())
        }
    }
}

/// `[shared] log_level` of a successfully loaded job.
fn job_log_level(job: &Result<Option<TuningJob>, ConfigError>) -> Option<LogLevel> {
    job.as_ref()
        .ok()
        .and_then(Option::as_ref)
        .map(|job| job.shared.log_level)
}

fn loaded(job: Option<TuningJob>) -> Result<TuningJob, Box<dyn std::error::Error>> {
    let job = job.ok_or("no tuning job given")?;
    info!("Job '{}' loaded", job.shared.service_name);
    Ok(job)
}

fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            info!("Result written to {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn setup_tracing(args: &Args, job_level: Option<LogLevel>) {
    let directive: Directive = if args.verbose {
        Level::DEBUG.into()
    } else {
        job_level
            .and_then(|l| l.as_directive().parse().ok())
            .unwrap_or_else(|| Level::INFO.into())
    };

    let filter = EnvFilter::from_default_env().add_directive(directive);

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const JOB: &str = include_str!("../config/linear_pid.toml");

    fn job_file(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn job_path_taken_from_subcommand() {
        let args = Args::try_parse_from(["boost_tuner", "simulate", "job.toml", "-v"]).unwrap();
        assert_eq!(args.command.job(), Some(Path::new("job.toml")));
        assert!(args.verbose);
        let args = Args::try_parse_from(["boost_tuner", "list"]).unwrap();
        assert_eq!(args.command.job(), None);
    }

    #[test]
    fn log_level_comes_from_the_loaded_job() {
        let text = JOB.replacen("[shared]\n", "[shared]\nlog_level = \"debug\"\n", 1);
        let file = job_file(&text);
        let job = Some(file.path()).map(load_job).transpose();
        assert_eq!(job_log_level(&job), Some(LogLevel::Debug));

        // The same load feeds the subcommand.
        let job = job.unwrap().unwrap();
        assert_eq!(loaded(Some(job)).unwrap().shared.service_name, "linear-first-order");
    }

    #[test]
    fn no_level_without_a_valid_job() {
        assert_eq!(job_log_level(&Ok(None)), None);
        let file = job_file("[shared]\nlog_level = \"debug\"\n");
        let job = Some(file.path()).map(load_job).transpose();
        assert!(job.is_err());
        assert_eq!(job_log_level(&job), None);
        assert!(loaded(None).is_err());
    }
}
