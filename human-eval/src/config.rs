use std::path::PathBuf;

use crate::model::dataset::{REFERENCE_LANGUAGE, TARGET_LANGUAGES};
use crate::services::checkpoint::CheckpointPolicy;

/// Pairs evaluated per dataset in restricted sampling mode.
pub const DEFAULT_SAMPLE_LIMIT: usize = 2;

/// Everything the session driver needs, fixed before the first question.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub data_dir: PathBuf,
    pub results_dir: PathBuf,
    pub reference_language: String,
    pub target_languages: Vec<String>,
    /// `Some(n)` caps every dataset at `n` pairs.
    pub sample_limit: Option<usize>,
    pub checkpoint_policy: CheckpointPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("Data"),
            results_dir: PathBuf::from("results"),
            reference_language: REFERENCE_LANGUAGE.to_string(),
            target_languages: TARGET_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            sample_limit: None,
            checkpoint_policy: CheckpointPolicy::Recover,
        }
    }
}

impl SessionConfig {
    /// Target languages in evaluation order, never including the reference.
    pub fn languages_to_evaluate(&self) -> impl Iterator<Item = &str> {
        self.target_languages
            .iter()
            .map(String::as_str)
            .filter(move |lang| *lang != self.reference_language)
    }
}
