use std::path::Path;

/// Language whose files every translation is compared against.
pub const REFERENCE_LANGUAGE: &str = "Python";

/// Languages that ship a translated copy of every dataset.
pub const TARGET_LANGUAGES: [&str; 3] = ["JavaScript", "Java", "Php"];

/// A dataset is identified by its file name, shared across language folders.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Dataset {
    pub file_name: String,
}

impl Dataset {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// File name with a trailing `.json` removed, used to name result files.
    pub fn stem(&self) -> &str {
        self.file_name
            .strip_suffix(".json")
            .unwrap_or(&self.file_name)
    }

    pub fn is_dataset_file(path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("json")
    }
}
