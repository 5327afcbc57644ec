use crate::prompt::PromptTemplate;
use std::path::PathBuf;

/// Directory used when no output directory is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Settings for writing extraction artifacts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Root directory; each client gets its own subdirectory
    pub output_dir: PathBuf,
    /// When set, a prompt file is written next to the record
    pub prompt_template: Option<PromptTemplate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            prompt_template: None,
        }
    }
}

impl Config {
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, output_dir: P) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_prompt_template(mut self, template: PromptTemplate) -> Self {
        self.prompt_template = Some(template);
        self
    }
}
