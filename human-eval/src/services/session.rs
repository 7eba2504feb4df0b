use std::fs;
use std::io::{BufRead, Write};

use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::{EvalError, Result};
use crate::model::record::EvaluationRecord;
use crate::services::prompter::Prompter;
use crate::services::{checkpoint, dataset};

/// Translated files carry one extra leading line compared to the reference
/// file, so translated line `i + 1` pairs with reference prompt `i`.
pub const TRANSLATION_LINE_OFFSET: usize = 1;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub languages: usize,
    pub datasets: usize,
    /// Records collected during this run, excluding resumed ones.
    pub collected: usize,
}

/// Number of pairs that can be asked for one dataset.
pub fn evaluable_pairs(reference_len: usize, translated_len: usize, sample_limit: Option<usize>) -> usize {
    let total = reference_len.min(translated_len.saturating_sub(TRANSLATION_LINE_OFFSET));
    match sample_limit {
        Some(limit) => total.min(limit),
        None => total,
    }
}

pub fn pair_at<'a>(
    reference: &'a [String],
    translated: &'a [String],
    index: usize,
) -> Option<(&'a str, &'a str)> {
    let source = reference.get(index)?;
    let target = translated.get(index + TRANSLATION_LINE_OFFSET)?;
    Some((source.as_str(), target.as_str()))
}

/// Walks every target language and dataset, asking each pair not yet on disk.
///
/// The result file is rewritten after every answered pair, so an interrupted
/// run resumes at the first unanswered index.
pub fn run<R: BufRead, W: Write>(
    config: &SessionConfig,
    prompter: &mut Prompter<R, W>,
) -> Result<SessionSummary> {
    fs::create_dir_all(&config.results_dir).map_err(|e| EvalError::io(&config.results_dir, e))?;

    let datasets = dataset::list_datasets(&config.data_dir, &config.reference_language);
    let dataset_total = datasets.len();
    let mut summary = SessionSummary {
        datasets: dataset_total,
        ..SessionSummary::default()
    };

    for lang in config.languages_to_evaluate() {
        summary.languages += 1;
        writeln!(prompter.output(), "\n=== Evaluating all datasets for language: {lang} ===")?;

        for (dataset_idx, ds) in datasets.iter().enumerate() {
            let dataset_idx = dataset_idx + 1;
            writeln!(
                prompter.output(),
                "\n=== Evaluating dataset: {} ({dataset_idx}/{dataset_total}) ===",
                ds.file_name
            )?;

            let reference = dataset::load_prompts(&config.data_dir, ds, &config.reference_language)?;
            let translated = dataset::load_prompts(&config.data_dir, ds, lang)?;

            let out_path = checkpoint::result_path(&config.results_dir, ds, lang);
            let mut records = checkpoint::load_existing_results(&out_path, config.checkpoint_policy)?;
            let start = records.len();
            let total = evaluable_pairs(reference.len(), translated.len(), config.sample_limit);

            debug!(
                dataset = %ds.file_name,
                language = lang,
                reference = reference.len(),
                translated = translated.len(),
                start,
                total,
                "dataset ready"
            );

            writeln!(prompter.output(), "\n[Language: {lang}] Already completed: {start}/{total}")?;

            for idx in start..total {
                let Some((source, target)) = pair_at(&reference, &translated, idx) else {
                    break;
                };
                let prompt_number = idx + 1;

                writeln!(prompter.output(), "\n{}", "=".repeat(60))?;
                writeln!(
                    prompter.output(),
                    "Dataset {dataset_idx}/{dataset_total} — Prompt {prompt_number}/{total}"
                )?;

                let evaluation =
                    prompter.evaluate(source, target, &config.reference_language, lang)?;
                writeln!(prompter.output(), "{}", "=".repeat(60))?;

                records.push(EvaluationRecord {
                    prompt_number,
                    source_prompt: source.to_string(),
                    translated_prompt: target.to_string(),
                    evaluation,
                });
                checkpoint::save_results(&out_path, &records)?;
                summary.collected += 1;

                writeln!(
                    prompter.output(),
                    "[Saved progress for {lang} — prompt {prompt_number}/{total}]"
                )?;
            }

            writeln!(prompter.output(), "Results saved to {}", out_path.display())?;
        }
    }

    info!(
        languages = summary.languages,
        datasets = summary.datasets,
        collected = summary.collected,
        "evaluation session finished"
    );

    Ok(summary)
}
