use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const WNALIGN_DIR_NAME: &str = ".wnalign";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_MAX_PATHS_PER_SYNSET: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "invalid report format '{other}', expected one of: text, json"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WnalignConfig {
    #[serde(default)]
    pub resources: ResourcesConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResourcesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// 0 means one worker per available core.
    #[serde(default)]
    pub workers: usize,
    /// 0 disables the limit.
    #[serde(default = "default_max_paths_per_synset")]
    pub max_paths_per_synset: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy_root: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            max_paths_per_synset: default_max_paths_per_synset(),
            hierarchy_root: None,
        }
    }
}

impl AnalysisConfig {
    pub fn path_limit(&self) -> Option<usize> {
        (self.max_paths_per_synset > 0).then_some(self.max_paths_per_synset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: ReportFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_concepts: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub fn wnalign_dir(workspace_root: impl AsRef<Path>) -> PathBuf {
    workspace_root.as_ref().join(WNALIGN_DIR_NAME)
}

pub fn config_path(workspace_root: impl AsRef<Path>) -> PathBuf {
    wnalign_dir(workspace_root).join(CONFIG_FILE_NAME)
}

pub fn load_workspace_config(
    workspace_root: impl AsRef<Path>,
) -> Result<WnalignConfig, ConfigError> {
    let path = config_path(workspace_root);
    if !path.exists() {
        return Ok(WnalignConfig::default());
    }

    let raw = fs::read_to_string(path)?;
    let parsed: WnalignConfig = toml::from_str(&raw)?;
    Ok(normalize_config(parsed))
}

pub fn ensure_workspace_config(
    workspace_root: impl AsRef<Path>,
) -> Result<WnalignConfig, ConfigError> {
    let workspace_root = workspace_root.as_ref();
    fs::create_dir_all(wnalign_dir(workspace_root))?;

    let path = config_path(workspace_root);
    if path.exists() {
        return load_workspace_config(workspace_root);
    }

    let config = WnalignConfig::default();
    let content = toml::to_string_pretty(&config)?;
    fs::write(path, content)?;

    Ok(config)
}

/// Relative paths in the config are taken relative to the workspace root.
pub fn resolve_path(workspace_root: impl AsRef<Path>, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_root.as_ref().join(path)
    }
}

pub fn validate_config(config: &WnalignConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.resources.focus.is_none() {
        warnings.push(ConfigWarning {
            code: "missing_focus_resource",
            message: "resources.focus is not set; pass --focus".to_owned(),
        });
    }
    if config.resources.reference.is_none() {
        warnings.push(ConfigWarning {
            code: "missing_reference_resource",
            message: "resources.reference is not set; pass --reference".to_owned(),
        });
    }
    if let (Some(focus), Some(reference)) = (&config.resources.focus, &config.resources.reference) {
        if focus == reference {
            warnings.push(ConfigWarning {
                code: "same_resource_twice",
                message: format!(
                    "focus and reference both point at {}; no divergence can be found",
                    focus.display()
                ),
            });
        }
    }
    if config.analysis.max_paths_per_synset == 0 {
        warnings.push(ConfigWarning {
            code: "path_limit_disabled",
            message: "analysis.max_paths_per_synset = 0 disables the root-path limit".to_owned(),
        });
    }
    if config.output.extra_concepts.is_some() && config.output.format == ReportFormat::Json {
        warnings.push(ConfigWarning {
            code: "extra_concepts_with_json",
            message: "output.extra_concepts is written as text even with format = \"json\""
                .to_owned(),
        });
    }

    warnings
}

fn default_max_paths_per_synset() -> usize {
    DEFAULT_MAX_PATHS_PER_SYNSET
}

fn normalize_optional(input: Option<String>) -> Option<String> {
    input
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn normalize_path(input: Option<PathBuf>) -> Option<PathBuf> {
    input.filter(|path| !path.as_os_str().is_empty())
}

fn normalize_config(mut config: WnalignConfig) -> WnalignConfig {
    config.resources.focus = normalize_path(config.resources.focus.take());
    config.resources.reference = normalize_path(config.resources.reference.take());
    config.analysis.hierarchy_root = normalize_optional(config.analysis.hierarchy_root.take());
    config.output.report = normalize_path(config.output.report.take());
    config.output.extra_concepts = normalize_path(config.output.extra_concepts.take());
    config
}
