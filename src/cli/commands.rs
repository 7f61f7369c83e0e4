// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and their flags. Everything tunable
// about a run lives in config.yaml; the flags here only say which
// config to read and, for `evaluate`, what to score.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and clean the dataset without training
    Prepare(PrepareArgs),

    /// Fetch, clean, materialize and hand the data to the trainer
    Train(TrainArgs),

    /// Score a trained model on held-out data
    Evaluate(EvaluateArgs),

    /// Serve a trained model over HTTP
    Serve(ServeArgs),
}

/// Flag shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct ConfigArg {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Also write the cleaned records to this JSON file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub config: ConfigArg,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Model artifact to score (default: deployment.model_path)
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Test data file or directory of *.json (default: training.test_dir)
    #[arg(long)]
    pub test_data: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArg,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_config_defaults_to_config_yaml() {
        let cli = Cli::try_parse_from(["chatbot-pipeline", "train"]).unwrap();
        match cli.command {
            Commands::Train(args) => assert_eq!(args.config.config, PathBuf::from("config.yaml")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_flags() {
        let cli = Cli::try_parse_from([
            "chatbot-pipeline",
            "evaluate",
            "--config",
            "prod.yaml",
            "--model",
            "models/m.tar.gz",
            "--test-data",
            "data/test",
        ])
        .unwrap();

        let Commands::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        assert_eq!(args.config.config, PathBuf::from("prod.yaml"));
        assert_eq!(args.model, Some(PathBuf::from("models/m.tar.gz")));
        assert_eq!(args.test_data, Some(PathBuf::from("data/test")));
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["chatbot-pipeline", "ask"]).is_err());
    }
}
