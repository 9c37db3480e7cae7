use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use clap::Parser;
use wnalign_config::{ReportFormat, WnalignConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Json => "json",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "invalid log format '{other}', expected one of: human, json"
            )),
        }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Compare the hypernym hierarchies of two wordnets through their shared ILI anchors"
)]
pub struct Cli {
    #[arg(
        long,
        default_value = ".",
        help = "Workspace root holding .wnalign/config.toml"
    )]
    pub workspace: PathBuf,

    #[arg(long, help = "Focus wordnet (WN-LMF XML), the resource under evaluation")]
    pub focus: Option<PathBuf>,

    #[arg(long, help = "Reference wordnet (WN-LMF XML), the baseline")]
    pub reference: Option<PathBuf>,

    #[arg(long, help = "Write the report to this file instead of stdout")]
    pub report: Option<PathBuf>,

    #[arg(
        long,
        help = "Write extra concepts that exist in the focus wordnet to this file"
    )]
    pub extra_concepts: Option<PathBuf>,

    #[arg(
        long,
        value_parser = parse_report_format,
        help = "Report format: text or json"
    )]
    pub format: Option<ReportFormat>,

    #[arg(long, help = "Worker threads (0 = one per available core)")]
    pub workers: Option<usize>,

    #[arg(
        long,
        help = "Fail when a synset has more root paths than this (0 = no limit)"
    )]
    pub max_paths: Option<usize>,

    #[arg(long, help = "Focus synset id used as level 1 when printing hierarchy levels")]
    pub hierarchy_root: Option<String>,

    #[arg(
        long,
        help = "Create .wnalign/config.toml with defaults when it does not exist"
    )]
    pub write_config: bool,

    #[arg(
        long,
        default_value = "human",
        value_parser = parse_log_format,
        help = "Log format: human or json"
    )]
    pub log_format: LogFormat,
}

impl Cli {
    /// Flags win over the config file. Flag paths are taken relative to the
    /// current directory, so they are made absolute here.
    pub fn apply_overrides(&self, config: &mut WnalignConfig) -> std::io::Result<()> {
        if let Some(path) = &self.focus {
            config.resources.focus = Some(absolute(path)?);
        }
        if let Some(path) = &self.reference {
            config.resources.reference = Some(absolute(path)?);
        }
        if let Some(path) = &self.report {
            config.output.report = Some(absolute(path)?);
        }
        if let Some(path) = &self.extra_concepts {
            config.output.extra_concepts = Some(absolute(path)?);
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(workers) = self.workers {
            config.analysis.workers = workers;
        }
        if let Some(max_paths) = self.max_paths {
            config.analysis.max_paths_per_synset = max_paths;
        }
        if let Some(root) = self
            .hierarchy_root
            .as_deref()
            .map(str::trim)
            .filter(|root| !root.is_empty())
        {
            config.analysis.hierarchy_root = Some(root.to_owned());
        }
        Ok(())
    }
}

pub fn parse_cli() -> Cli {
    let mut args: Vec<_> = std::env::args_os().collect();
    if args.get(1).is_some_and(|arg| arg == OsStr::new("--")) {
        args.remove(1);
    }

    Cli::parse_from(args)
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    std::path::absolute(path)
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse()
}

fn parse_report_format(value: &str) -> Result<ReportFormat, String> {
    value.parse()
}
