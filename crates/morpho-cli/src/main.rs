use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use morpho_pipeline::{Dataset, Method, SuperimpositionConfig, SuperimpositionReport, run};

/// Landmark superimposition driver.
#[derive(Debug, Parser)]
#[command(author, version, about = "Superimpose landmark configurations")]
struct Args {
    /// Path to JSON file containing a Dataset.
    #[arg(long)]
    input: String,

    /// Optional path to JSON SuperimpositionConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<String>,

    /// Override the method named in the config.
    #[arg(long, value_parser = parse_method)]
    method: Option<Method>,

    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<String>,
}

fn parse_method(s: &str) -> Result<Method, String> {
    serde_json::from_value(serde_json::Value::String(s.to_owned()))
        .map_err(|_| format!("unknown method '{s}' (procrustes, resistant_fit, bookstein, baseline)"))
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
}

fn write_report_json(report: &SuperimpositionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn run_from_files(
    input_path: &str,
    config_path: Option<&str>,
    method: Option<Method>,
) -> Result<String> {
    let dataset: Dataset = load_json_file(Path::new(input_path))?;

    let mut config = if let Some(cfg_path) = config_path {
        load_json_file::<SuperimpositionConfig>(Path::new(cfg_path))?
    } else {
        SuperimpositionConfig::default()
    };
    if let Some(method) = method {
        config.method = method;
    }

    let report = run(&dataset, &config)
        .with_context(|| format!("{:?} failed on '{}'", config.method, dataset.name))?;
    info!(
        "{} shapes superimposed in {} passes",
        report.shapes.len(),
        report.iterations
    );
    write_report_json(&report)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let json = run_from_files(&args.input, args.config.as_deref(), args.method)?;
    match args.output {
        Some(path) => fs::write(&path, json).with_context(|| format!("writing {path}"))?,
        None => println!("{json}"),
    }
    Ok(())
}
