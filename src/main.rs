//! Wafer Sampler CLI
//!
//! Usage:
//!   wafer-sampler sample <request-file>     Select sampling points
//!   wafer-sampler score <request-file>      Score a sampling output
//!   wafer-sampler translate <request-file>  Generate a tool recipe
//!   wafer-sampler strategies                List registered strategies
//!
//! Request files are JSON by default; files ending in `.toml` are parsed as
//! TOML. Results print as JSON on stdout; structured errors (code, category,
//! message) go to stderr with exit status 1.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

use wafer_sampler::model::{RecipeRequest, SamplingRequest, ScoreRequest};
use wafer_sampler::{SamplingError, StrategyRegistry};

#[derive(Parser)]
#[command(name = "wafer-sampler")]
#[command(about = "Deterministic wafer sampling point selection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Select sampling points for a request
    Sample {
        /// Request file (JSON, or TOML with a .toml extension)
        input: PathBuf,
    },
    /// Score an existing sampling output
    Score {
        /// Score request file
        input: PathBuf,
    },
    /// Translate a sampling output into a tool recipe
    Translate {
        /// Recipe request file
        input: PathBuf,
    },
    /// List registered strategy identifiers
    Strategies,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Sample { input } => {
            let request: SamplingRequest = read_request(&input);
            match wafer_sampler::sample(&request) {
                Ok(output) => print_json(&output),
                Err(e) => exit_with_sampling_error(e),
            }
        }
        Command::Score { input } => {
            let request: ScoreRequest = read_request(&input);
            print_json(&wafer_sampler::score(&request));
        }
        Command::Translate { input } => {
            let request: RecipeRequest = read_request(&input);
            print_json(&wafer_sampler::translate(&request));
        }
        Command::Strategies => {
            let registry = StrategyRegistry::new();
            for id in registry.list_ids() {
                println!("{id}");
            }
        }
    }
}

fn read_request<T: DeserializeOwned>(path: &Path) -> T {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    let parsed = if is_toml {
        toml::from_str(&content).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    };

    match parsed {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Error parsing request '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing result: {e}");
            std::process::exit(1);
        }
    }
}

fn exit_with_sampling_error(error: SamplingError) -> ! {
    eprintln!(
        "{} [{}]: {}",
        error.code().as_str(),
        error.category().as_str(),
        error
    );
    std::process::exit(1);
}
