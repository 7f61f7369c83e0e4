// ============================================================
// Layer 5 — External Trainer
// ============================================================
// Training itself belongs to the conversational-AI framework. This
// module only invokes the configured training wrapper and reports
// where the artifact went:
//
//   <command> train --domain rasa/domain.yml --config rasa/config.yml
//                   --data data/ --out models/
//                   --epochs 100 --batch-size 32
//
// The command comes from the request (`training.command`) and may
// carry leading arguments (e.g. "sh scripts/train.sh"); it is split
// on whitespace. See infra/config.rs for the wrapper contract.
//
// The wrapper's stdout and stderr are captured. Output is logged at
// debug level line by line, and a failed run reports the tail of
// stderr (or of stdout when stderr is empty).
//
// Artifact discovery: the newest entry the run added to the output
// directory. A framework that skips retraining (nothing changed)
// adds nothing, in which case the newest existing entry is used.

use std::{
    collections::HashSet,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    time::SystemTime,
};

use crate::domain::error::PipelineError;
use crate::domain::traits::Trainer;
use crate::domain::training_run::TrainRequest;

/// Last part of the wrapper's output kept in the error message
const OUTPUT_TAIL: usize = 2000;

#[derive(Debug, Default, Clone, Copy)]
pub struct CommandTrainer;

impl CommandTrainer {
    pub fn new() -> Self {
        Self
    }
}

/// Program and full argument list for one training request
fn command_line(req: &TrainRequest) -> Result<(String, Vec<OsString>), PipelineError> {
    let mut parts = req.command.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(PipelineError::Training("training.command not set".into()));
    };

    let mut args: Vec<OsString> = parts.map(OsString::from).collect();
    args.push("train".into());
    args.push("--domain".into());
    args.push(req.domain_file.clone().into_os_string());
    args.push("--config".into());
    args.push(req.config_file.clone().into_os_string());
    args.push("--data".into());
    args.push(req.training_dir.clone().into_os_string());
    args.push("--out".into());
    args.push(req.output_dir.clone().into_os_string());
    args.push("--epochs".into());
    args.push(req.hyperparameters.epochs.to_string().into());
    args.push("--batch-size".into());
    args.push(req.hyperparameters.batch_size.to_string().into());

    Ok((program.to_string(), args))
}

impl Trainer for CommandTrainer {
    fn train(&self, req: &TrainRequest) -> Result<PathBuf, PipelineError> {
        let (program, args) = command_line(req)?;

        fs::create_dir_all(&req.output_dir)?;
        let before = entries(&req.output_dir)?;

        tracing::info!(
            "Starting model training: {} (epochs={}, batch_size={})",
            program,
            req.hyperparameters.epochs,
            req.hyperparameters.batch_size,
        );

        let output = Command::new(&program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| PipelineError::Training(format!("cannot start '{program}': {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stdout.lines().chain(stderr.lines()) {
            tracing::debug!("[{program}] {line}");
        }

        if !output.status.success() {
            let detail = if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() };
            return Err(PipelineError::Training(format!(
                "'{}' exited with {}: {}",
                program,
                output.status,
                tail(detail, OUTPUT_TAIL),
            )));
        }

        let artifact = locate_artifact(&req.output_dir, &before)?;
        tracing::info!("Model trained successfully: {}", artifact.display());
        Ok(artifact)
    }
}

fn entries(dir: &Path) -> Result<HashSet<PathBuf>, PipelineError> {
    Ok(fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .collect())
}

fn locate_artifact(dir: &Path, before: &HashSet<PathBuf>) -> Result<PathBuf, PipelineError> {
    let mut all: Vec<(SystemTime, PathBuf)> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let modified = e.metadata().and_then(|m| m.modified()).ok()?;
            Some((modified, e.path()))
        })
        .collect();
    all.sort();

    if let Some((_, path)) = all.iter().rev().find(|(_, p)| !before.contains(p)) {
        return Ok(path.clone());
    }

    match all.pop() {
        Some((_, path)) => {
            tracing::warn!(
                "Trainer produced no new artifact, using latest: {}",
                path.display()
            );
            Ok(path)
        }
        None => Err(PipelineError::Training(format!(
            "no artifact found in '{}'",
            dir.display()
        ))),
    }
}

fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::domain::training_run::Hyperparameters;
    use tempfile::TempDir;

    fn request(dir: &TempDir, command: &str) -> TrainRequest {
        TrainRequest {
            command:      command.to_string(),
            domain_file:  "rasa/domain.yml".into(),
            config_file:  "rasa/config.yml".into(),
            training_dir: dir.path().join("data"),
            output_dir:   dir.path().join("models"),
            hyperparameters: Hyperparameters { epochs: 3, batch_size: 8 },
        }
    }

    fn script(dir: &TempDir, body: &str) -> String {
        let path = dir.path().join("train.sh");
        fs::write(&path, body).unwrap();
        format!("sh {}", path.display())
    }

    #[test]
    fn test_arguments_forward_request() {
        let dir = TempDir::new().unwrap();
        let (program, args) = command_line(&request(&dir, "sh scripts/train.sh")).unwrap();
        let args: Vec<String> = args.into_iter().map(|a| a.to_string_lossy().into_owned()).collect();

        assert_eq!(program, "sh");
        assert_eq!(&args[..2], &["scripts/train.sh", "train"]);
        assert!(args.windows(2).any(|w| w == ["--epochs", "3"]));
        assert!(args.windows(2).any(|w| w == ["--batch-size", "8"]));
    }

    #[test]
    fn test_unset_command_is_error() {
        let dir = TempDir::new().unwrap();
        for command in ["", "   "] {
            let err = CommandTrainer::new().train(&request(&dir, command)).unwrap_err();
            assert!(matches!(err, PipelineError::Training(msg) if msg == "training.command not set"));
        }
        assert!(!dir.path().join("models").exists());
    }

    #[test]
    fn test_new_artifact_is_reported() {
        let dir = TempDir::new().unwrap();
        // $9 is the value following --out
        let command = script(&dir, "touch \"$9/20240101-model.tar.gz\"\n");

        let req = request(&dir, &command);
        fs::create_dir_all(&req.output_dir).unwrap();
        fs::write(req.output_dir.join("old-model.tar.gz"), b"old").unwrap();

        let artifact = CommandTrainer::new().train(&req).unwrap();
        assert_eq!(artifact, req.output_dir.join("20240101-model.tar.gz"));
    }

    #[test]
    fn test_falls_back_to_existing_artifact() {
        let dir = TempDir::new().unwrap();
        let req = request(&dir, "true");
        fs::create_dir_all(&req.output_dir).unwrap();
        fs::write(req.output_dir.join("model.tar.gz"), b"x").unwrap();

        let artifact = CommandTrainer::new().train(&req).unwrap();
        assert_eq!(artifact, req.output_dir.join("model.tar.gz"));
    }

    #[test]
    fn test_no_artifact_is_error() {
        let dir = TempDir::new().unwrap();
        let err = CommandTrainer::new().train(&request(&dir, "true")).unwrap_err();
        assert!(matches!(err, PipelineError::Training(msg) if msg.contains("no artifact")));
    }

    #[test]
    fn test_failure_reports_stderr_tail() {
        let dir     = TempDir::new().unwrap();
        let command = script(&dir, "echo progress\necho 'unrecognized arguments: --epochs' >&2\nexit 2\n");

        let err = CommandTrainer::new().train(&request(&dir, &command)).unwrap_err();
        let PipelineError::Training(msg) = err else { panic!("expected Training error") };
        assert!(msg.contains("exited with"));
        assert!(msg.contains("unrecognized arguments"));
        assert!(!msg.contains("progress"));
    }

    #[test]
    fn test_stdout_is_captured_not_inherited() {
        let dir     = TempDir::new().unwrap();
        let command = script(&dir, "echo 'epoch 1/3 loss=0.4'\nexit 1\n");

        // Only a captured stdout can end up in the error message
        let err = CommandTrainer::new().train(&request(&dir, &command)).unwrap_err();
        assert!(matches!(err, PipelineError::Training(msg) if msg.contains("epoch 1/3")));
    }

    #[test]
    fn test_missing_program_is_error() {
        let dir = TempDir::new().unwrap();
        let err = CommandTrainer::new()
            .train(&request(&dir, "definitely-not-a-real-trainer-binary"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Training(msg) if msg.contains("cannot start")));
    }

    #[test]
    fn test_tail_respects_char_boundaries() {
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("ab", 3), "ab");
        assert_eq!(tail("aé", 1), "");
    }
}
