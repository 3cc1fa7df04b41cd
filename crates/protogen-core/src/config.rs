//! Generation configuration

use crate::error::{GenerateError, GenerateResult};
use crate::path::GroupingPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Parent directory of the generated tree
    #[serde(default = "default_protocol_path")]
    pub protocol_path: PathBuf,

    /// Directory created under `protocol_path`; wiped at the start of every run
    #[serde(default = "default_output_dir_name")]
    pub output_dir_name: String,

    /// Placement of message artifacts below the output root
    #[serde(default)]
    pub grouping: GroupingPolicy,

    /// Deepest composite nesting a field may declare
    ///
    /// Emission recurses once per level, so this bounds stack use.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,

    /// Directory with `ProtocolTemplate.js` / `ProtocolManagerTemplate.js`
    /// overriding the embedded templates
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

fn default_protocol_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_dir_name() -> String {
    "jsProtocol".to_string()
}

fn default_max_nesting_depth() -> usize {
    32
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            protocol_path: default_protocol_path(),
            output_dir_name: default_output_dir_name(),
            grouping: GroupingPolicy::default(),
            max_nesting_depth: default_max_nesting_depth(),
            template_dir: None,
        }
    }
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration writing to `protocol_path/jsProtocol`
    pub fn with_protocol_path(protocol_path: impl Into<PathBuf>) -> Self {
        Self {
            protocol_path: protocol_path.into(),
            ..Self::default()
        }
    }

    /// Create configuration from JSON bytes (empty input yields the defaults)
    pub fn from_json(bytes: &[u8]) -> GenerateResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Create configuration from TOML text
    pub fn from_toml(text: &str) -> GenerateResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Directory every artifact is written under
    pub fn output_root(&self) -> PathBuf {
        self.protocol_path.join(&self.output_dir_name)
    }

    /// Validate the configuration
    ///
    /// The output root is deleted at the start of every run, so it must be a
    /// dedicated child directory rather than `protocol_path` itself.
    pub fn validate(&self) -> GenerateResult<()> {
        let name = self.output_dir_name.trim();
        if name.is_empty() || name == "." || name == ".." {
            return Err(GenerateError::Config(format!(
                "output_dir_name '{}' must name a dedicated directory",
                self.output_dir_name
            )));
        }
        if name.contains(['/', '\\']) {
            return Err(GenerateError::Config(format!(
                "output_dir_name '{}' must be a single path segment",
                self.output_dir_name
            )));
        }
        if self.max_nesting_depth == 0 {
            return Err(GenerateError::Config(
                "max_nesting_depth must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
