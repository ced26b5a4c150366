//! Offline trainer: fits a scaler and linear SVM per disease domain and saves both.
//!
//! Every domain is attempted; a missing or broken dataset is logged and skipped.
//! The exit code only reflects argument and configuration errors.

use std::path::PathBuf;

use healthpredict::config;
use healthpredict::logging;
use healthpredict::trainer::{TrainJob, TrainOptions, TrainOutcome, train_all};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Clone)]
struct CliOptions {
    root: PathBuf,
    config: Option<PathBuf>,
    seed: Option<u64>,
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init("healthpredict") {
        eprintln!("File logging disabled: {err}");
    }

    let mut app_config = config::load_or_default(&options.root, options.config.as_deref())
        .map_err(|err| err.to_string())?;
    if let Some(seed) = options.seed {
        app_config.training.seed = seed;
    }
    let train_options = TrainOptions::from(&app_config.training);
    let jobs: Vec<TrainJob> = app_config
        .domains
        .iter()
        .map(|spec| TrainJob::from_spec(spec, &options.root))
        .collect();

    let results = train_all(&jobs, &train_options);
    let trained = results.iter().filter(|(_, outcome)| outcome.is_trained()).count();
    for (name, outcome) in &results {
        let status = match outcome {
            TrainOutcome::Trained(summary) => format!(
                "trained ({} train / {} holdout rows, holdout accuracy {:.3})",
                summary.train_rows, summary.holdout.rows, summary.holdout.accuracy
            ),
            TrainOutcome::DatasetMissing => "skipped: dataset not found".to_string(),
            TrainOutcome::Failed(err) => format!("failed: {err}"),
        };
        println!("{name:<14} {status}");
    }
    tracing::info!("Finished: {trained}/{} domains trained", results.len());
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Option<CliOptions>, String> {
    let mut root = PathBuf::from(".");
    let mut config: Option<PathBuf> = None;
    let mut seed: Option<u64> = None;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--root" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--root requires a value".to_string())?;
                root = PathBuf::from(value);
            }
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                config = Some(PathBuf::from(value));
            }
            "--seed" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--seed requires a value".to_string())?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    Ok(Some(CliOptions { root, config, seed }))
}

fn help_text() -> String {
    [
        "healthpredict",
        "",
        "Trains the diabetes, heart disease and Parkinson's classifiers from CSV datasets.",
        "",
        "Usage:",
        "  healthpredict [--root <dir>] [--config <file>] [--seed <u64>]",
        "",
        "Options:",
        "  --root <dir>      Project root holding datasets/ and models/ (default: .).",
        "  --config <file>   TOML config (default: <root>/healthpredict.toml if present).",
        "  --seed <u64>      Split and solver seed (default: 2).",
    ]
    .join("\n")
}
