use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{EvalError, Result};
use crate::model::dataset::Dataset;
use crate::model::record::EvaluationRecord;

const RESULT_PREFIX: &str = "human_eval_";

/// What to do with a result file that exists but does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckpointPolicy {
    /// Start the pair over, keeping a `.corrupt` copy of the unreadable file.
    #[default]
    Recover,
    /// Stop the run.
    Strict,
}

pub fn result_path(results_dir: &Path, dataset: &Dataset, language: &str) -> PathBuf {
    results_dir.join(format!("{RESULT_PREFIX}{}_{language}.json", dataset.stem()))
}

/// Records already collected for one (dataset, language) pair.
pub fn load_existing_results(path: &Path, policy: CheckpointPolicy) -> Result<Vec<EvaluationRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let data = fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;

    match serde_json::from_str::<Vec<EvaluationRecord>>(&data) {
        Ok(records) => {
            debug!(path = %path.display(), count = records.len(), "checkpoint loaded");
            Ok(records)
        }
        Err(source) => match policy {
            CheckpointPolicy::Strict => Err(EvalError::CorruptCheckpoint {
                path: path.to_path_buf(),
                source,
            }),
            CheckpointPolicy::Recover => {
                let backup = free_backup_path(path);
                fs::copy(path, &backup).map_err(|e| EvalError::io(&backup, e))?;
                warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %source,
                    "unreadable checkpoint, starting this pair from the beginning"
                );
                Ok(Vec::new())
            }
        },
    }
}

/// Rewrites the whole result file with `records`.
pub fn save_results(path: &Path, records: &[EvaluationRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    write_atomic(path, json.as_bytes())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = sidecar_path(path, "tmp");

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent).map_err(|e| EvalError::io(parent, e))?;
    }

    fs::write(&tmp, bytes).map_err(|e| EvalError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| EvalError::io(path, e))?;

    Ok(())
}

/// `<file>.corrupt`, then `<file>.corrupt-1`, `-2`, ... so earlier backups survive.
fn free_backup_path(path: &Path) -> PathBuf {
    let first = sidecar_path(path, "corrupt");
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| sidecar_path(path, &format!("corrupt-{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "results".to_string(),
    };
    p.set_file_name(format!("{file_name}.{suffix}"));
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::{Evaluation, Quality, Verdict};

    fn record(n: usize, translated: &str) -> EvaluationRecord {
        EvaluationRecord {
            prompt_number: n,
            source_prompt: format!("prompt {n}"),
            translated_prompt: translated.to_string(),
            evaluation: Evaluation {
                faithfulness: Verdict::Yes,
                package_existence: Verdict::No,
                missing_packages: Some("pandas,numpy".into()),
                quality: Quality::Average,
            },
        }
    }

    #[test]
    fn result_path_combines_prefix_stem_and_language() {
        let path = result_path(Path::new("results"), &Dataset::new("HumanEval.json"), "Java");
        assert_eq!(path, Path::new("results").join("human_eval_HumanEval_Java.json"));
    }

    #[test]
    fn absent_file_means_no_progress() {
        let dir = tempfile::tempdir().unwrap();
        let records =
            load_existing_results(&dir.path().join("none.json"), CheckpointPolicy::Strict).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn save_then_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let records = vec![record(1, "a"), record(2, "b"), record(3, "c")];

        save_results(&path, &records).unwrap();
        let loaded = load_existing_results(&path, CheckpointPolicy::Recover).unwrap();

        assert_eq!(loaded, records);
        assert!(!sidecar_path(&path, "tmp").exists());
    }

    #[test]
    fn saving_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let records = vec![record(1, "a"), record(2, "b")];

        save_results(&path, &records).unwrap();
        let first = fs::read(&path).unwrap();
        save_results(&path, &records).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn output_is_indented_and_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        save_results(&path, &[record(1, "Écrire une fonction — 関数")]).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("[\n  {\n    \"prompt_number\": 1,"));
        assert!(text.contains("Écrire une fonction — 関数"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn corrupt_file_is_recovered_with_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "[{\"prompt_number\": 1,").unwrap();

        let records = load_existing_results(&path, CheckpointPolicy::Recover).unwrap();

        assert!(records.is_empty());
        let backup = dir.path().join("out.json.corrupt");
        assert_eq!(fs::read_to_string(backup).unwrap(), "[{\"prompt_number\": 1,");
    }

    #[test]
    fn repeated_corruption_keeps_every_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        fs::write(&path, "first broken").unwrap();
        load_existing_results(&path, CheckpointPolicy::Recover).unwrap();
        fs::write(&path, "second broken").unwrap();
        load_existing_results(&path, CheckpointPolicy::Recover).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("out.json.corrupt")).unwrap(),
            "first broken"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("out.json.corrupt-1")).unwrap(),
            "second broken"
        );
    }

    #[test]
    fn corrupt_file_fails_in_strict_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        fs::write(&path, "not json").unwrap();

        let err = load_existing_results(&path, CheckpointPolicy::Strict).unwrap_err();
        assert!(matches!(err, EvalError::CorruptCheckpoint { .. }));
    }
}
