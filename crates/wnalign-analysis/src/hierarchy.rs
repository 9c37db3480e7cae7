use std::collections::HashMap;

use wnalign_core::{LexicalGraph, SynsetId};
use wnalign_graph_algo::IdGraph;

/// Hierarchy level per synset below one root: the root is level 1, every
/// synset it reaches through hyponym edges is one deeper than its shortest
/// route. Computed on demand, never stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HierarchyLevels {
    root: Option<SynsetId>,
    levels: HashMap<SynsetId, u32>,
}

impl HierarchyLevels {
    pub fn compute(graph: &LexicalGraph, root: &str) -> Self {
        if !graph.contains(root) {
            return Self::default();
        }

        let hyponym_graph = IdGraph::from_edges(
            graph.iter().map(|synset| synset.id.as_str()),
            graph.hypernym_edges().map(|(child, parent)| (parent, child)),
        );
        let levels = hyponym_graph
            .shortest_depths(root)
            .into_iter()
            .map(|(id, depth)| (id, depth + 1))
            .collect();

        Self {
            root: Some(root.to_owned()),
            levels,
        }
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn level(&self, id: &str) -> Option<u32> {
        self.levels.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Groups of synsets that reach each other through hypernym edges.
pub fn hypernym_cycles(graph: &LexicalGraph) -> Vec<Vec<SynsetId>> {
    IdGraph::from_edges(
        graph.iter().map(|synset| synset.id.as_str()),
        graph.hypernym_edges(),
    )
    .cycles()
}

#[cfg(test)]
mod tests {
    use wnalign_core::LexicalGraphBuilder;

    use super::*;

    fn sample() -> LexicalGraph {
        let mut builder = LexicalGraphBuilder::new("test");
        builder
            .add_hypernym("a", "root")
            .add_hypernym("b", "a")
            .add_hypernym("b", "root")
            .add_hypernym("c", "b")
            .add_hypernym("island", "island-root");
        builder.build()
    }

    #[test]
    fn levels_follow_the_shortest_route_from_the_root() {
        let levels = HierarchyLevels::compute(&sample(), "root");

        assert_eq!(levels.root(), Some("root"));
        assert_eq!(levels.level("root"), Some(1));
        assert_eq!(levels.level("a"), Some(2));
        assert_eq!(levels.level("b"), Some(2));
        assert_eq!(levels.level("c"), Some(3));
        assert_eq!(levels.level("island"), None);
        assert_eq!(levels.len(), 4);
    }

    #[test]
    fn unknown_root_gives_no_levels() {
        let levels = HierarchyLevels::compute(&sample(), "nowhere");
        assert!(levels.is_empty());
        assert_eq!(levels.root(), None);
    }

    #[test]
    fn cycles_are_listed_once_per_component() {
        let mut builder = LexicalGraphBuilder::new("cyclic");
        builder
            .add_hypernym("a", "b")
            .add_hypernym("b", "a")
            .add_hypernym("c", "a");
        let graph = builder.build();

        assert_eq!(
            hypernym_cycles(&graph),
            vec![vec!["a".to_owned(), "b".to_owned()]]
        );
        assert!(hypernym_cycles(&sample()).is_empty());
    }
}
