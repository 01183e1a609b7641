//! coating-fit CLI
//!
//! Two subcommands over the library pipeline:
//!
//! - `fit`: catalog + recipes (+ optional JSON config) → diagnostic report
//!   as JSON on stdout or in `--output`, with a short summary on stderr.
//! - `predict`: catalog + `A,B,C` + mould references → predicted coating
//!   weight for that configuration.
//!
//! Logging goes through `env_logger`; set `RUST_LOG=info` (or `debug`) to
//! see fit results, the landscape summary and per-recipe features.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand};
use log::info;

use coating_fit::{
    catalog::MouldCatalog,
    coating::{CoatingParams, ModelSpec, RecipeSet, predict_configuration},
    config::AnalysisConfig,
    report::{AnalysisOptions, run_analysis},
};

/// Coating-weight model fitting for confectionery moulds.
#[derive(Parser, Debug)]
#[command(name = "coating-fit")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit both objectives, scan the loss landscape and write the report
    Fit {
        /// Mould catalog (JSON array of moulds)
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        /// Recorded recipes (JSON array of recipes)
        #[arg(long, value_name = "FILE")]
        recipes: PathBuf,

        /// Optional analysis configuration; defaults apply to missing fields
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Predict the coating weight for a mould configuration
    Predict {
        /// Mould catalog (JSON array of moulds)
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        /// Model parameters as `A,B,C`
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true, required = true)]
        params: Vec<f64>,

        /// Scale applied to C
        #[arg(long, default_value_t = coating_fit::coating::DEFAULT_OFFSET_SCALE)]
        offset_scale: f64,

        /// Mould names or model codes; repeat a mould to use it twice
        #[arg(value_name = "MOULD", required = true)]
        moulds: Vec<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Fit { catalog, recipes, config, output } => {
            fit(&catalog, &recipes, config.as_deref(), output.as_deref())
        }
        Command::Predict { catalog, params, offset_scale, moulds } => {
            predict(&catalog, &params, offset_scale, &moulds)
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn load_catalog(path: &Path) -> Result<MouldCatalog> {
    let catalog = MouldCatalog::from_reader(open(path)?)
        .with_context(|| format!("failed to load mould catalog {}", path.display()))?;
    info!("loaded {} moulds from {}", catalog.len(), path.display());
    Ok(catalog)
}

fn fit(catalog: &Path, recipes: &Path, config: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let recipes = RecipeSet::from_reader(open(recipes)?)
        .with_context(|| format!("failed to load recipes {}", recipes.display()))?;

    let opts = match config {
        Some(path) => AnalysisConfig::from_reader(open(path)?)
            .and_then(AnalysisConfig::into_options)
            .with_context(|| format!("invalid configuration {}", path.display()))?,
        None => AnalysisOptions::default(),
    };

    let report = run_analysis(&catalog, &recipes, &opts).context("analysis failed")?;

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writeln!(writer)?;
        }
    }
    eprintln!("{report}");
    Ok(())
}

fn predict(catalog: &Path, params: &[f64], offset_scale: f64, moulds: &[String]) -> Result<()> {
    ensure!(params.len() == 3, "--params expects exactly three values A,B,C, got {}", params.len());
    let catalog = load_catalog(catalog)?;
    let params = CoatingParams::new(params[0], params[1], params[2]);
    let spec = ModelSpec { offset_scale, ..ModelSpec::default() };
    spec.validate().context("invalid offset scale")?;

    let weight = predict_configuration(&catalog, moulds, &params, &spec)
        .context("prediction failed")?;
    println!("{weight:.2}");
    Ok(())
}
