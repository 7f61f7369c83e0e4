// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// `clap`, wires concrete adapters into the use cases and prints
// their results. No pipeline logic lives here.
//
//   prepare  — fetch + clean, print a summary
//   train    — the full training pipeline
//   evaluate — score a model on held-out data
//   serve    — HTTP chat API over a trained model

pub mod commands;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, EvaluateArgs, PrepareArgs, ServeArgs, TrainArgs};

use crate::data::loader::HttpDatasetLoader;
use crate::infra::config::{ConfigSource, Configuration};
use crate::ml::{model::ArtifactModelLoader, trainer::CommandTrainer};

#[derive(Parser, Debug)]
#[command(
    name = "chatbot-pipeline",
    version,
    about = "Prepare conversation data, train a chatbot model and serve it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the selected subcommand
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args)  => run_prepare(args),
            Commands::Train(args)    => run_train(args),
            Commands::Evaluate(args) => run_evaluate(args),
            Commands::Serve(args)    => run_serve(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    crate::init_tracing(false)?;

    let use_case = PrepareUseCase::new(Box::new(HttpDatasetLoader::with_default_client()?));
    let prepared = use_case.run(&args.config.config)?;

    if let Some(path) = &args.output {
        std::fs::write(path, prepared.data.to_json_string()?)
            .with_context(|| format!("cannot write '{}'", path.display()))?;
        tracing::info!("Wrote cleaned records to '{}'", path.display());
    }

    println!("Loaded {} training records", prepared.summary.records);
    println!("{}", serde_json::to_string_pretty(&prepared.summary)?);
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    crate::init_tracing(false)?;

    let use_case = TrainUseCase::new(
        Box::new(HttpDatasetLoader::with_default_client()?),
        Box::new(CommandTrainer::new()),
    );
    let run = use_case.run(&args.config.config)?;

    println!("Training complete. Model saved to: {}", run.artifact.display());
    if let Some(held_out) = &run.held_out {
        println!("Held-out data: {}", held_out.display());
    }
    println!("{}", serde_json::to_string_pretty(&run)?);
    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    use crate::application::evaluate_use_case::EvaluateUseCase;

    crate::init_tracing(false)?;

    let config    = ConfigSource::load(&args.config.config, Some(Configuration::default()))?;
    let model     = args.model.unwrap_or_else(|| config.deployment.model_path.clone());
    let test_data = args.test_data.unwrap_or_else(|| config.training.test_dir.clone());
    let loader    = Arc::new(ArtifactModelLoader::new(config.deployment.nlu_url.clone()));

    let report = EvaluateUseCase::new(config, loader).evaluate(&model, &test_data)?;

    println!(
        "Accuracy: {:.4} ({} / {} correct, {} skipped)",
        report.accuracy, report.correct, report.total, report.skipped
    );
    Ok(())
}

// `serve` reads its log level from the config, so logging starts after it loads
fn run_serve(args: ServeArgs) -> Result<()> {
    let config = ConfigSource::load(&args.config.config, None)?;
    crate::init_tracing(config.deployment.debug)?;

    let loader = Arc::new(ArtifactModelLoader::new(config.deployment.nlu_url.clone()));
    let runtime = tokio::runtime::Runtime::new().context("cannot start async runtime")?;
    runtime.block_on(crate::server::run(config, loader))?;
    Ok(())
}
