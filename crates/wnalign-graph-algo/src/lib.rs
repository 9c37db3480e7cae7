use std::collections::HashMap;

use petgraph::algo::{dijkstra, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};

/// Directed graph over string ids, built once and queried read-only.
#[derive(Debug, Clone, Default)]
pub struct IdGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl IdGraph {
    pub fn from_edges<'a, N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = &'a str>,
        E: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut out = Self::default();
        for node in nodes {
            out.node(node);
        }
        for (from, to) in edges {
            let from = out.node(from);
            let to = out.node(to);
            out.graph.update_edge(from, to, ());
        }
        out
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Number of edges on the shortest route from `source` to every node it
    /// reaches, `source` itself included at 0.
    pub fn shortest_depths(&self, source: &str) -> HashMap<String, u32> {
        let Some(&start) = self.index.get(source) else {
            return HashMap::new();
        };

        dijkstra(&self.graph, start, None, |_| 1u32)
            .into_iter()
            .map(|(node, depth)| (self.graph[node].clone(), depth))
            .collect()
    }

    /// Strongly connected components that contain a cycle, each sorted, the
    /// list sorted by first member.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.find_edge(*single, *single).is_some(),
                _ => true,
            })
            .map(|component| {
                let mut ids: Vec<String> = component
                    .into_iter()
                    .map(|node| self.graph[node].clone())
                    .collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }

    fn node(&mut self, id: &str) -> NodeIndex {
        if let Some(&existing) = self.index.get(id) {
            return existing;
        }
        let created = self.graph.add_node(id.to_owned());
        self.index.insert(id.to_owned(), created);
        created
    }
}
