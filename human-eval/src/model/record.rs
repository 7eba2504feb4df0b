use serde::{Deserialize, Serialize};

/// One completed judgment for a (reference prompt, translated prompt) pair.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EvaluationRecord {
    /// 1-based position of the pair inside its dataset.
    pub prompt_number: usize,

    #[serde(alias = "python_prompt")]
    pub source_prompt: String,

    #[serde(alias = "translation")]
    pub translated_prompt: String,

    pub evaluation: Evaluation,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub faithfulness: Verdict,

    pub package_existence: Verdict,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_packages: Option<String>,

    pub quality: Quality,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Yes,
    No,
}

impl Verdict {
    /// Accepts `yes`/`no` in any case, ignoring surrounding whitespace.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "yes" => Some(Verdict::Yes),
            "no" => Some(Verdict::No),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Good,
    Average,
    Poor,
}

impl Quality {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "good" => Some(Quality::Good),
            "average" => Some(Quality::Average),
            "poor" => Some(Quality::Poor),
            _ => None,
        }
    }
}
