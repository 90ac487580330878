//! Export configuration: command line folders plus an optional `export.yaml`.

use crate::frontmatter::FrontmatterRenderer;
use crate::page::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional settings file inside the logseq folder
pub const CONFIG_FILENAME: &str = "export.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Settings read from `export.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    /// Attributes rendered without quotes (e.g. dates, booleans)
    #[serde(default)]
    pub unquoted_properties: Vec<String>,

    /// Attributes rendered as lists, split on ", "
    #[serde(default)]
    pub list_properties: Vec<String>,

    /// Asset folder, relative to the output folder
    #[serde(default = "default_assets_relative_path")]
    pub assets_relative_path: PathBuf,

    /// Page folder, relative to the output folder
    #[serde(default = "default_pages_relative_path")]
    pub pages_relative_path: PathBuf,

    /// URL prefix written into rewritten asset references
    #[serde(default = "default_web_assets_path_prefix")]
    pub web_assets_path_prefix: String,

    /// URL prefix for links between exported pages
    #[serde(default)]
    pub page_url_prefix: String,

    /// Text marking a page as publishable
    #[serde(default = "default_public_marker")]
    pub public_marker: String,

    #[serde(default)]
    pub decode_file_name_titles: bool,
}

fn default_assets_relative_path() -> PathBuf {
    PathBuf::from("logseq-assets")
}

fn default_pages_relative_path() -> PathBuf {
    PathBuf::from("logseq-pages")
}

fn default_web_assets_path_prefix() -> String {
    String::from("/logseq-assets")
}

fn default_public_marker() -> String {
    String::from("public::")
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            unquoted_properties: Vec::new(),
            list_properties: Vec::new(),
            assets_relative_path: default_assets_relative_path(),
            pages_relative_path: default_pages_relative_path(),
            web_assets_path_prefix: default_web_assets_path_prefix(),
            page_url_prefix: String::new(),
            public_marker: default_public_marker(),
            decode_file_name_titles: false,
        }
    }
}

impl ExportSettings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}

/// Complete configuration of an export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub logseq_folder: PathBuf,
    pub output_folder: PathBuf,
    pub settings: ExportSettings,
}

impl ExportConfig {
    /// Build the config from the two mandatory folders, merging
    /// `<logseq_folder>/export.yaml` when it exists
    pub fn load(logseq_folder: &Path, output_folder: &Path) -> Result<Self, ConfigError> {
        let mut config = Self {
            logseq_folder: logseq_folder.to_path_buf(),
            output_folder: output_folder.to_path_buf(),
            settings: ExportSettings::default(),
        };
        config.validate()?;

        let settings_path = logseq_folder.join(CONFIG_FILENAME);
        if settings_path.is_file() {
            tracing::debug!("Loading settings from {:?}", settings_path);
            config.settings = ExportSettings::from_file(&settings_path)?;
        } else {
            tracing::warn!(
                "Failed to read config file {:?}. Using default config.",
                settings_path
            );
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logseq_folder.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("logseqFolder".to_string()));
        }
        if self.output_folder.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("outputFolder".to_string()));
        }
        Ok(())
    }

    /// Folder receiving rendered pages
    pub fn pages_dir(&self) -> PathBuf {
        self.output_folder.join(&self.settings.pages_relative_path)
    }

    /// Folder receiving copied assets
    pub fn assets_dir(&self) -> PathBuf {
        self.output_folder.join(&self.settings.assets_relative_path)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            asset_url_prefix: self.settings.web_assets_path_prefix.clone(),
            decode_titles: self.settings.decode_file_name_titles,
        }
    }

    pub fn renderer(&self) -> FrontmatterRenderer {
        FrontmatterRenderer::new(
            self.settings.unquoted_properties.iter().cloned(),
            self.settings.list_properties.iter().cloned(),
        )
    }
}
