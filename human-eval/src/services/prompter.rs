use std::io::{BufRead, Write};
use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use crate::error::{EvalError, Result};
use crate::model::record::{Evaluation, Quality, Verdict};
use crate::services::dataset::clean_prompt;

const FAITHFULNESS_QUESTION: &str = "Faithfulness to the original prompt (✅ Yes / ❌ No):\nYour answer: ";
const PACKAGE_QUESTION: &str = "Package existence (✅ Yes / ❌ No):\nYour answer: ";
const MISSING_PACKAGES_QUESTION: &str = "Which packages are missing? (comma-separated): ";
const QUALITY_QUESTION: &str = "Overall quality (⭐⭐⭐ Good / ⭐⭐ Average / ⭐ Poor):\nYour answer: ";

pub const YES_NO_HINT: &str = "Please enter 'yes' or 'no'.";
pub const QUALITY_HINT: &str = "Please enter 'good', 'average', or 'poor'.";
pub const SEPARATOR_HINT: &str =
    "Please use only commas to separate package names (e.g. package1,package2). No spaces or semicolons.";
pub const EMPTY_PACKAGES_HINT: &str = "Please enter at least one package name.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageListError {
    Empty,
    BadSeparator,
}

impl PackageListError {
    fn hint(self) -> &'static str {
        match self {
            PackageListError::Empty => EMPTY_PACKAGES_HINT,
            PackageListError::BadSeparator => SEPARATOR_HINT,
        }
    }
}

fn forbidden_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ :;]").unwrap())
}

/// Checks a comma-separated list of package names as typed by the evaluator.
pub fn validate_missing_packages(input: &str) -> std::result::Result<String, PackageListError> {
    let list = input.trim();
    if forbidden_separator().is_match(list) {
        return Err(PackageListError::BadSeparator);
    }
    if list.is_empty() {
        return Err(PackageListError::Empty);
    }
    Ok(list.to_string())
}

/// Asks the evaluator the fixed questions over a line-oriented terminal.
///
/// Every question loops until a valid answer arrives; each rejected line is
/// answered with exactly one hint.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Shows the prompt pair and collects the three answers.
    pub fn evaluate(
        &mut self,
        source: &str,
        translated: &str,
        reference_language: &str,
        language: &str,
    ) -> Result<Evaluation> {
        writeln!(self.output, "--- Original {reference_language} prompt ---")?;
        writeln!(self.output, "{}", clean_prompt(source))?;
        writeln!(self.output, "\n--- Translation in {language} ---")?;
        writeln!(self.output, "{}", clean_prompt(translated))?;
        writeln!(self.output, "{}", "-".repeat(40))?;

        let faithfulness = self.ask_faithfulness()?;
        let (package_existence, missing_packages) = self.ask_package_existence()?;
        let quality = self.ask_quality()?;

        writeln!(self.output, "{}", "-".repeat(40))?;

        Ok(Evaluation {
            faithfulness,
            package_existence,
            missing_packages,
            quality,
        })
    }

    pub fn ask_faithfulness(&mut self) -> Result<Verdict> {
        self.ask_until(FAITHFULNESS_QUESTION, |line| Verdict::parse(line).ok_or(YES_NO_HINT))
    }

    /// `no` is followed by a request for the missing package names.
    pub fn ask_package_existence(&mut self) -> Result<(Verdict, Option<String>)> {
        match self.ask_until(PACKAGE_QUESTION, |line| Verdict::parse(line).ok_or(YES_NO_HINT))? {
            Verdict::Yes => Ok((Verdict::Yes, None)),
            Verdict::No => {
                let missing = self.ask_until(MISSING_PACKAGES_QUESTION, |line| {
                    validate_missing_packages(line).map_err(PackageListError::hint)
                })?;
                Ok((Verdict::No, Some(missing)))
            }
        }
    }

    pub fn ask_quality(&mut self) -> Result<Quality> {
        self.ask_until(QUALITY_QUESTION, |line| Quality::parse(line).ok_or(QUALITY_HINT))
    }

    /// Reads lines until `parse` accepts one; its error is the hint to print.
    fn ask_until<T, P>(&mut self, question: &str, parse: P) -> Result<T>
    where
        P: Fn(&str) -> std::result::Result<T, &'static str>,
    {
        loop {
            let line = self.read_answer(question)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(hint) => {
                    trace!(answer = %line, "rejected answer");
                    writeln!(self.output, "{hint}")?;
                }
            }
        }
    }

    fn read_answer(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        // Raw bytes: a line that is not UTF-8 is an invalid answer, not an i/o failure.
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Err(EvalError::InputClosed);
        }
        Ok(String::from_utf8_lossy(&buf).trim().to_string())
    }
}
