use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::dataset::Dataset;
use crate::services::encoding;

/// Datasets available for evaluation, taken from the reference language folder.
///
/// A missing folder is not an error here: the session simply has nothing to do.
pub fn list_datasets(data_dir: &Path, reference_language: &str) -> Vec<Dataset> {
    let dir = data_dir.join(reference_language);

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list datasets");
            return Vec::new();
        }
    };

    let mut datasets: Vec<Dataset> = entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter(|entry| Dataset::is_dataset_file(&entry.path()))
        .filter_map(|entry| entry.file_name().to_str().map(Dataset::new))
        .collect();

    datasets.sort();
    debug!(dir = %dir.display(), count = datasets.len(), "datasets found");
    datasets
}

/// Reads the prompt fragments of one dataset in one language.
///
/// The file is treated as lines of text rather than JSON: each non-blank line
/// is trimmed, then stripped of surrounding commas and quotes. Array brackets
/// survive as their own fragments, which keeps indices stable across languages.
pub fn load_prompts(data_dir: &Path, dataset: &Dataset, language: &str) -> Result<Vec<String>> {
    let path = data_dir.join(language).join(&dataset.file_name);
    let text = encoding::decode_file(&path)?;
    Ok(split_prompts(&text))
}

pub fn split_prompts(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.trim_matches(',').trim_matches('"').to_string())
        .collect()
}

fn repeated_spaces() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" {2,}").unwrap())
}

/// Display form of a stored prompt. Never written back to disk.
pub fn clean_prompt(text: &str) -> String {
    let unescaped = text.replace("\\n", "\n").replace("\\\"", "\"").replace('"', "");
    repeated_spaces()
        .replace_all(&unescaped, " ")
        .trim()
        .to_string()
}
