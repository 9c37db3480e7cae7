use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use wnalign::cli::{Cli, parse_cli};
use wnalign::logging::init_tracing;
use wnalign::report::{
    RenderState, select_divergences, write_extra_concepts, write_json_report, write_text_report,
};
use wnalign_analysis::AlignmentAnalyzer;
use wnalign_config::{
    ReportFormat, config_path, ensure_workspace_config, load_workspace_config, resolve_path,
    validate_config,
};

fn main() -> Result<()> {
    let cli = parse_cli();
    init_tracing(cli.log_format)?;
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let workspace = cli.workspace.canonicalize().with_context(|| {
        format!(
            "failed to resolve workspace path {}",
            cli.workspace.display()
        )
    })?;

    let mut config = if cli.write_config {
        ensure_workspace_config(&workspace)
    } else {
        load_workspace_config(&workspace)
    }
    .with_context(|| {
        format!(
            "failed to load workspace config at {}",
            config_path(&workspace).display()
        )
    })?;
    cli.apply_overrides(&mut config)
        .context("failed to resolve command-line paths")?;

    for warning in validate_config(&config) {
        tracing::warn!(code = warning.code, "{}", warning.message);
    }

    let focus = required_path(&workspace, config.resources.focus.as_deref(), "focus")?;
    let reference = required_path(
        &workspace,
        config.resources.reference.as_deref(),
        "reference",
    )?;

    let analyzer = AlignmentAnalyzer::new(&config.analysis);
    let outcome = analyzer.run(&focus, &reference)?;
    let stats = &outcome.stats;
    tracing::info!(
        focus_synsets = stats.focus_synsets,
        reference_synsets = stats.reference_synsets,
        focus_anchors = stats.focus_anchors,
        reference_anchors = stats.reference_anchors,
        units = stats.units,
        candidates = stats.candidates,
        divergences = stats.divergences,
        "alignment finished"
    );

    let mut state = RenderState::default();
    let rendered = select_divergences(&outcome.divergences, &outcome.focus.index, &mut state);
    tracing::info!(
        rendered = state.rendered(),
        not_actionable = state.skipped_not_actionable(),
        duplicate_segments = state.skipped_duplicate(),
        "report selection done"
    );

    let mut report = Vec::new();
    match config.output.format {
        ReportFormat::Text => write_text_report(&mut report, &outcome, &rendered)?,
        ReportFormat::Json => write_json_report(&mut report, &outcome, &rendered)?,
    }

    match config.output.report.as_deref() {
        Some(path) => {
            let path = resolve_path(&workspace, path);
            fs::write(&path, &report)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&report)?;
            stdout.flush()?;
        }
    }

    if let Some(path) = config.output.extra_concepts.as_deref() {
        let path = resolve_path(&workspace, path);
        let mut extras = Vec::new();
        write_extra_concepts(&mut extras, &rendered)?;
        fs::write(&path, extras)
            .with_context(|| format!("failed to write extra concepts to {}", path.display()))?;
        tracing::info!(path = %path.display(), "extra concepts written");
    }

    Ok(())
}

fn required_path(workspace: &Path, path: Option<&Path>, role: &str) -> Result<PathBuf> {
    path.map(|path| resolve_path(workspace, path))
        .ok_or_else(|| anyhow!("no {role} resource configured; pass --{role}"))
}
