use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wnalign_config::AnalysisConfig;
use wnalign_core::{AnchorIndex, LexicalGraph, PathError, ResourceInfo};
use wnalign_lmf::{LmfError, load_resource};

use crate::detector::DetectionContext;
use crate::divergence::Divergence;
use crate::executor::run_units;
use crate::hierarchy::{HierarchyLevels, hypernym_cycles};
use crate::merger::merge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceRole {
    Focus,
    Reference,
}

impl ResourceRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for ResourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to load {role} resource: {source}")]
    Load {
        role: ResourceRole,
        #[source]
        source: LmfError,
    },
    #[error("path enumeration failed: {0}")]
    Path(#[from] PathError),
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A resource after construction: its graph, anchor index and metadata.
#[derive(Debug, Clone)]
pub struct LoadedResource {
    pub info: ResourceInfo,
    pub graph: LexicalGraph,
    pub index: AnchorIndex,
}

impl LoadedResource {
    pub fn from_graph(graph: LexicalGraph, info: ResourceInfo) -> Self {
        let index = AnchorIndex::build(&graph);
        Self { info, graph, index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AlignmentStats {
    pub focus_synsets: usize,
    pub reference_synsets: usize,
    pub focus_anchors: usize,
    pub reference_anchors: usize,
    pub units: usize,
    pub candidates: usize,
    pub divergences: usize,
}

#[derive(Debug, Clone)]
pub struct AlignmentOutcome {
    pub focus: LoadedResource,
    pub reference: LoadedResource,
    pub levels: HierarchyLevels,
    pub divergences: Vec<Divergence>,
    pub stats: AlignmentStats,
}

#[derive(Debug, Clone, Default)]
pub struct AlignmentAnalyzer {
    workers: usize,
    path_limit: Option<usize>,
    hierarchy_root: Option<String>,
}

impl AlignmentAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            workers: config.workers,
            path_limit: config.path_limit(),
            hierarchy_root: config.hierarchy_root.clone(),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn path_limit(&self) -> Option<usize> {
        self.path_limit
    }

    pub fn load(&self, role: ResourceRole, path: &Path) -> Result<LoadedResource, AnalysisError> {
        tracing::info!(role = role.as_str(), path = %path.display(), "loading resource");
        let raw = load_resource(path).map_err(|source| AnalysisError::Load { role, source })?;
        let graph = LexicalGraph::build(&raw);
        let loaded = LoadedResource::from_graph(graph, raw.info);

        tracing::info!(
            role = role.as_str(),
            synsets = loaded.graph.len(),
            anchors = loaded.index.len(),
            undeclared = loaded.graph.undeclared_count(),
            "resource loaded"
        );
        report_diagnostics(role, &loaded);
        Ok(loaded)
    }

    /// Loads both resources, one after the other, then compares them.
    pub fn run(&self, focus: &Path, reference: &Path) -> Result<AlignmentOutcome, AnalysisError> {
        let focus = self.load(ResourceRole::Focus, focus)?;
        let reference = self.load(ResourceRole::Reference, reference)?;
        self.compare(focus, reference)
    }

    pub fn compare(
        &self,
        focus: LoadedResource,
        reference: LoadedResource,
    ) -> Result<AlignmentOutcome, AnalysisError> {
        let ctx = DetectionContext {
            focus: &focus.graph,
            reference: &reference.graph,
            focus_index: &focus.index,
            reference_index: &reference.index,
            path_limit: self.path_limit,
        };
        let units = run_units(&ctx, self.workers)?;
        let unit_count = units.len();
        let candidates = units.iter().map(Vec::len).sum();
        let divergences = merge(units);
        tracing::info!(divergences = divergences.len(), "comparison completed");

        let levels = match self.hierarchy_root.as_deref() {
            Some(root) => {
                let levels = HierarchyLevels::compute(&focus.graph, root);
                if levels.is_empty() {
                    tracing::warn!(root, "hierarchy root not found in focus resource");
                }
                levels
            }
            None => HierarchyLevels::default(),
        };

        let stats = AlignmentStats {
            focus_synsets: focus.graph.len(),
            reference_synsets: reference.graph.len(),
            focus_anchors: focus.index.len(),
            reference_anchors: reference.index.len(),
            units: unit_count,
            candidates,
            divergences: divergences.len(),
        };

        Ok(AlignmentOutcome {
            focus,
            reference,
            levels,
            divergences,
            stats,
        })
    }
}

fn report_diagnostics(role: ResourceRole, loaded: &LoadedResource) {
    for ambiguous in loaded.index.ambiguous() {
        tracing::warn!(
            role = role.as_str(),
            anchor = %ambiguous.anchor,
            synsets = ?ambiguous.synsets,
            "anchor is shared by several synsets"
        );
    }
    for cycle in hypernym_cycles(&loaded.graph) {
        tracing::warn!(
            role = role.as_str(),
            synsets = ?cycle,
            "hypernym cycle"
        );
    }
}

#[cfg(test)]
mod tests {
    use wnalign_core::{LexicalGraphBuilder, SynsetRecord};

    use super::*;

    fn loaded(name: &str, chain: &[(&str, &str)]) -> LoadedResource {
        let mut builder = LexicalGraphBuilder::new(name);
        for (id, anchor) in chain {
            builder.declare_synset(SynsetRecord {
                id: (*id).to_owned(),
                anchor: Some((*anchor).to_owned()),
                ..SynsetRecord::default()
            });
        }
        for pair in chain.windows(2) {
            builder.add_hypernym(pair[0].0, pair[1].0);
        }
        LoadedResource::from_graph(builder.build(), ResourceInfo::default())
    }

    #[test]
    fn compare_reports_stats_and_levels() {
        let analyzer = AlignmentAnalyzer::new(&AnalysisConfig {
            workers: 2,
            max_paths_per_synset: 0,
            hierarchy_root: Some("r".to_owned()),
        });
        assert_eq!(analyzer.path_limit(), None);

        let outcome = analyzer
            .compare(
                loaded("focus", &[("a", "c1"), ("r", "c0")]),
                loaded("reference", &[("a2", "c1"), ("m2", "c3"), ("r2", "c0")]),
            )
            .expect("compare");

        assert_eq!(outcome.divergences.len(), 1);
        assert_eq!(outcome.stats.units, 2);
        assert_eq!(outcome.stats.candidates, 1);
        assert_eq!(outcome.stats.reference_anchors, 3);
        assert_eq!(outcome.levels.level("a"), Some(2));
    }

    #[test]
    fn load_failure_names_the_resource_role() {
        let analyzer = AlignmentAnalyzer::default();
        let err = analyzer
            .run(Path::new("/nonexistent/focus.xml"), Path::new("/nonexistent/ref.xml"))
            .expect_err("missing files must fail");

        assert!(matches!(
            err,
            AnalysisError::Load {
                role: ResourceRole::Focus,
                ..
            }
        ));
        assert!(err.to_string().starts_with("failed to load focus resource"));
    }
}
