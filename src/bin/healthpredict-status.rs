//! Developer utility to check which disease domains have a loadable model pair.

use std::path::PathBuf;

use healthpredict::{config, logging};
use healthpredict::presenter::{ModelAvailability, ModelRegistry, form_fields};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some((root, config_path)) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init("healthpredict-status") {
        eprintln!("File logging disabled: {err}");
    }
    let app_config =
        config::load_or_default(&root, config_path.as_deref()).map_err(|err| err.to_string())?;
    let registry = ModelRegistry::load(&app_config.domains, &root);

    println!("Root: {}", root.display());
    for (domain, availability) in registry.iter() {
        let fields = form_fields(domain).len();
        match availability {
            ModelAvailability::Available(models) => {
                let accuracy = models
                    .classifier
                    .metrics
                    .as_ref()
                    .map(|m| format!("{:.3}", m.accuracy))
                    .unwrap_or_else(|| "n/a".to_string());
                println!(
                    "{:<14} available  features={}  form_fields={}  holdout_accuracy={}",
                    domain.display_name(),
                    models.classifier.feature_len,
                    fields,
                    accuracy
                );
            }
            ModelAvailability::Unavailable { reason } => {
                println!(
                    "{:<14} unavailable  form_fields={}  ({reason})",
                    domain.display_name(),
                    fields
                );
            }
        }
    }
    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<Option<(PathBuf, Option<PathBuf>)>, String> {
    let mut root = PathBuf::from(".");
    let mut config_path = None;
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
                config_path = Some(PathBuf::from(value));
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    Ok(Some((root, config_path)))
}

fn help_text() -> String {
    [
        "healthpredict-status",
        "",
        "Reports which domains have a loadable scaler/classifier pair.",
        "",
        "Usage:",
        "  healthpredict-status [--root <dir>] [--config <file>]",
    ]
    .join("\n")
}
