// ============================================================
// Layer 2 — TrainUseCase (training orchestration)
// ============================================================
// Runs the full pipeline in order:
//
//   Step 1: Load config.yaml           (Layer 6 - infra, strict)
//           and check its directory layout
//   Step 2: Fetch the raw dataset      (Layer 4 - data)
//   Step 3: Clean it                   (Layer 4 - data)
//   Step 4: Hold out an eval split     (Layer 4 - data, optional)
//   Step 5: Materialize for training   (Layer 6 - infra)
//   Step 6: Invoke external trainer    (Layer 5 - ml)
//
// Fail fast: the first failing step ends the run and its error is
// returned unchanged. The trainer never runs on a partial pipeline.

use std::path::Path;

use crate::data::{loader::DatasetSource, preprocessor::Preprocessor, splitter::split_holdout};
use crate::domain::error::PipelineError;
use crate::domain::traits::Trainer;
use crate::domain::training_run::{TrainRequest, TrainingRun};
use crate::infra::config::{ConfigSource, Configuration};
use crate::infra::dataset_store::DatasetStore;

pub struct TrainUseCase {
    source:  Box<dyn DatasetSource>,
    trainer: Box<dyn Trainer>,
}

impl TrainUseCase {
    pub fn new(source: Box<dyn DatasetSource>, trainer: Box<dyn Trainer>) -> Self {
        Self { source, trainer }
    }

    /// Load the config at `config_path` (no fallback) and run the pipeline
    pub fn run(&self, config_path: impl AsRef<Path>) -> Result<TrainingRun, PipelineError> {
        let config = ConfigSource::load(config_path, None)?;
        self.execute(&config)
    }

    /// Run the pipeline against an already loaded configuration
    pub fn execute(&self, cfg: &Configuration) -> Result<TrainingRun, PipelineError> {
        let name = cfg.dataset.name.as_str();
        let t    = &cfg.training;

        t.check_directories()?;

        // ── Step 2: Fetch ─────────────────────────────────────────────────────
        tracing::info!("Preparing training data...");
        let raw = self.source.load(cfg)?;
        tracing::info!("Loaded {} raw records", raw.len());

        // ── Step 3: Clean ─────────────────────────────────────────────────────
        let clean = Preprocessor::new().clean(&raw);
        tracing::info!(
            "Preprocessing kept {} of {} records",
            clean.len(),
            raw.len()
        );
        if clean.is_empty() {
            tracing::warn!("No records left after preprocessing");
        }

        // ── Step 4: Hold-out split ────────────────────────────────────────────
        let (train, held_out) = if t.holdout_fraction > 0.0 {
            let (train, held_out) = split_holdout(&clean, t.holdout_fraction, t.seed);
            if held_out.is_empty() {
                tracing::warn!("Hold-out fraction {} selected no records", t.holdout_fraction);
                (train, None)
            } else {
                (train, Some(held_out))
            }
        } else {
            (clean, None)
        };

        // ── Step 5: Materialize ───────────────────────────────────────────────
        let store         = DatasetStore::new(&t.training_dir, &t.test_dir);
        let training_data = store.save_training(name, &train)?;
        let held_out_path = held_out
            .as_ref()
            .map(|ds| store.save_held_out(name, ds))
            .transpose()?;

        // ── Step 6: Train ─────────────────────────────────────────────────────
        let request = TrainRequest {
            command:         t.command.clone(),
            domain_file:     t.domain_file.clone(),
            config_file:     t.config_file.clone(),
            training_dir:    store.training_dir().to_path_buf(),
            output_dir:      t.output_dir.clone(),
            hyperparameters: t.hyperparameters(),
        };
        let artifact = self.trainer.train(&request)?;

        Ok(TrainingRun {
            dataset:         name.to_string(),
            records:         train.len(),
            columns:         train.column_names(),
            hyperparameters: request.hyperparameters,
            training_data,
            held_out:        held_out_path,
            artifact,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Dataset;
    use crate::domain::training_run::Hyperparameters;
    use crate::infra::dataset_store::DatasetStore;
    use std::{
        cell::{Cell, RefCell},
        fs,
        path::PathBuf,
        rc::Rc,
    };
    use tempfile::TempDir;

    const SCENARIO: &str = r#"[{"text":"Hello"},{"text":"HELLO"},{"text":null},{"text":"Bye"}]"#;

    struct StubSource {
        result: fn() -> Result<Dataset, PipelineError>,
        calls:  Rc<Cell<usize>>,
    }

    impl DatasetSource for StubSource {
        fn load(&self, _config: &Configuration) -> Result<Dataset, PipelineError> {
            self.calls.set(self.calls.get() + 1);
            (self.result)()
        }
    }

    #[derive(Default)]
    struct StubTrainer {
        requests: Rc<RefCell<Vec<TrainRequest>>>,
        fail:     bool,
    }

    impl Trainer for StubTrainer {
        fn train(&self, request: &TrainRequest) -> Result<PathBuf, PipelineError> {
            self.requests.borrow_mut().push(request.clone());
            if self.fail {
                return Err(PipelineError::Training("framework crashed".into()));
            }
            Ok(request.output_dir.join("model.tar.gz"))
        }
    }

    struct Fixture {
        dir:      TempDir,
        config:   PathBuf,
        loads:    Rc<Cell<usize>>,
        requests: Rc<RefCell<Vec<TrainRequest>>>,
    }

    impl Fixture {
        fn new(extra_training: &str) -> Self {
            let dir    = TempDir::new().unwrap();
            let root   = dir.path().display().to_string();
            let config = dir.path().join("config.yaml");
            fs::write(
                &config,
                format!(
                    "dataset:\n  name: convos\n  url: http://data.test/d.json\n\
                     training:\n  command: sh scripts/train.sh\n  epochs: 7\n  batch_size: 4\n  training_dir: {root}/data\n  \
                     test_dir: {root}/test_data\n  output_dir: {root}/models\n{extra_training}"
                ),
            )
            .unwrap();

            Self { dir, config, loads: Rc::default(), requests: Rc::default() }
        }

        fn use_case(&self, result: fn() -> Result<Dataset, PipelineError>, fail: bool) -> TrainUseCase {
            TrainUseCase::new(
                Box::new(StubSource { result, calls: self.loads.clone() }),
                Box::new(StubTrainer { requests: self.requests.clone(), fail }),
            )
        }
    }

    fn scenario() -> Result<Dataset, PipelineError> {
        Dataset::from_json_str(SCENARIO)
    }

    #[test]
    fn test_full_run() {
        let fx  = Fixture::new("");
        let run = fx.use_case(scenario, false).run(&fx.config).unwrap();

        assert_eq!(run.dataset, "convos");
        assert_eq!(run.records, 2);
        assert_eq!(run.columns, vec!["text"]);
        assert_eq!(run.hyperparameters, Hyperparameters { epochs: 7, batch_size: 4 });
        assert_eq!(run.artifact, fx.dir.path().join("models/model.tar.gz"));
        assert!(run.held_out.is_none());

        // The trainer saw the cleaned data on disk
        let written = DatasetStore::read(&run.training_data).unwrap();
        assert_eq!(
            written.column("text").unwrap(),
            &[serde_json::json!("hello"), serde_json::json!("bye")]
        );

        let requests = fx.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].hyperparameters.epochs, 7);
        assert_eq!(requests[0].domain_file, PathBuf::from("rasa/domain.yml"));
        assert_eq!(requests[0].command, "sh scripts/train.sh");
    }

    #[test]
    fn test_loader_failure_propagates_unchanged() {
        fn failing() -> Result<Dataset, PipelineError> {
            Err(PipelineError::DatasetFetch {
                url:    "http://data.test/d.json".into(),
                status: Some(503),
                reason: "unavailable".into(),
            })
        }

        let fx  = Fixture::new("");
        let err = fx.use_case(failing, false).run(&fx.config).unwrap_err();

        assert!(matches!(err, PipelineError::DatasetFetch { status: Some(503), .. }));
        assert!(fx.requests.borrow().is_empty());
        assert!(!fx.dir.path().join("data/convos.json").exists());
    }

    #[test]
    fn test_missing_config_stops_before_loading() {
        let fx  = Fixture::new("");
        let err = fx
            .use_case(scenario, false)
            .run(fx.dir.path().join("missing.yaml"))
            .unwrap_err();

        assert!(matches!(err, PipelineError::ConfigNotFound(_)));
        assert_eq!(fx.loads.get(), 0);
    }

    #[test]
    fn test_held_out_dir_inside_training_dir_stops_before_loading() {
        let mut config = Configuration::default();
        config.dataset.url               = Some("http://data.test/d.json".into());
        config.training.holdout_fraction = 0.3;
        config.training.training_dir     = PathBuf::from("data/");
        config.training.test_dir         = PathBuf::from("data/test/");

        let fx  = Fixture::new("");
        let err = fx.use_case(scenario, false).execute(&config).unwrap_err();

        assert!(matches!(err, PipelineError::InvalidConfig(_)));
        assert_eq!(fx.loads.get(), 0);
        assert!(fx.requests.borrow().is_empty());
    }

    #[test]
    fn test_trainer_failure_propagates() {
        let fx  = Fixture::new("");
        let err = fx.use_case(scenario, true).run(&fx.config).unwrap_err();
        assert!(matches!(err, PipelineError::Training(msg) if msg == "framework crashed"));
    }

    #[test]
    fn test_holdout_split_is_written() {
        fn ten_rows() -> Result<Dataset, PipelineError> {
            let body: Vec<String> = (0..10).map(|i| format!(r#"{{"text":"row {i}"}}"#)).collect();
            Dataset::from_json_str(&format!("[{}]", body.join(",")))
        }

        let fx  = Fixture::new("  holdout_fraction: 0.3\n");
        let run = fx.use_case(ten_rows, false).run(&fx.config).unwrap();

        assert_eq!(run.records, 7);
        let held_out = run.held_out.expect("held-out file");
        assert_eq!(held_out, fx.dir.path().join("test_data/convos.json"));
        assert!(!held_out.starts_with(fx.dir.path().join("data")));
        assert_eq!(DatasetStore::read(&held_out).unwrap().len(), 3);
    }
}
