use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{LexicalGraph, SynsetId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathStep {
    pub synset: SynsetId,
    pub anchor: Option<String>,
}

/// Steps from a start synset up to a root, both ends included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynsetPath {
    steps: Vec<PathStep>,
}

impl SynsetPath {
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|step| step.synset.as_str())
    }

    pub fn anchor_sequence(&self) -> AnchorSequence<'_> {
        let entries = self
            .steps
            .iter()
            .enumerate()
            .filter_map(|(index, step)| step.anchor.as_deref().map(|anchor| (anchor, index)))
            .collect();
        AnchorSequence { entries }
    }
}

/// The anchors met along a path, in path order, each remembering the path
/// position it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSequence<'p> {
    entries: Vec<(&'p str, usize)>,
}

impl<'p> AnchorSequence<'p> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn anchor(&self, index: usize) -> Option<&'p str> {
        self.entries.get(index).map(|(anchor, _)| *anchor)
    }

    pub fn path_index(&self, index: usize) -> Option<usize> {
        self.entries.get(index).map(|(_, position)| *position)
    }

    /// Index of the first occurrence of `anchor`.
    pub fn position(&self, anchor: &str) -> Option<usize> {
        self.entries.iter().position(|(candidate, _)| *candidate == anchor)
    }

    pub fn anchors(&self) -> impl Iterator<Item = &'p str> + '_ {
        self.entries.iter().map(|(anchor, _)| *anchor)
    }

    pub fn slice(&self, start: usize, end: usize) -> Vec<String> {
        self.entries
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|(anchor, _)| (*anchor).to_owned())
            .collect()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("synset {start} has more than {limit} paths to its roots")]
    LimitExceeded { start: SynsetId, limit: usize },
}

/// Every hypernym route from `start` to a root. A hypernym that is already on
/// the current route ends that route (the repeated node is kept as last step).
pub fn paths_from(graph: &LexicalGraph, start: &str) -> Vec<SynsetPath> {
    let mut walker = PathWalker::new(graph, None);
    walker.walk(start);
    walker.paths
}

pub fn paths_from_bounded(
    graph: &LexicalGraph,
    start: &str,
    limit: usize,
) -> Result<Vec<SynsetPath>, PathError> {
    let mut walker = PathWalker::new(graph, Some(limit));
    if !walker.walk(start) {
        return Err(PathError::LimitExceeded {
            start: start.to_owned(),
            limit,
        });
    }
    Ok(walker.paths)
}

/// Hypernyms of one synset on the current route, and the next one to visit.
struct Frame {
    parents: Vec<SynsetId>,
    next: usize,
}

enum Visit {
    Descend(Frame),
    Emitted(bool),
}

/// Depth-first walk over an explicit frame stack, so hierarchy depth is
/// bounded by memory rather than by the thread's call stack.
struct PathWalker<'g> {
    graph: &'g LexicalGraph,
    limit: Option<usize>,
    current: Vec<PathStep>,
    on_path: HashSet<SynsetId>,
    paths: Vec<SynsetPath>,
}

impl<'g> PathWalker<'g> {
    fn new(graph: &'g LexicalGraph, limit: Option<usize>) -> Self {
        Self {
            graph,
            limit,
            current: Vec::new(),
            on_path: HashSet::new(),
            paths: Vec::new(),
        }
    }

    /// Returns false once the path limit is hit; the walk stops there.
    fn walk(&mut self, start: &str) -> bool {
        let mut frames = match self.enter(start) {
            Visit::Descend(frame) => vec![frame],
            Visit::Emitted(keep_going) => return keep_going,
        };

        while let Some(frame) = frames.last_mut() {
            let Some(parent) = frame.parents.get(frame.next).cloned() else {
                frames.pop();
                self.leave();
                continue;
            };
            frame.next += 1;

            match self.enter(&parent) {
                Visit::Descend(frame) => frames.push(frame),
                Visit::Emitted(true) => {}
                Visit::Emitted(false) => return false,
            }
        }
        true
    }

    /// Appends `id` to the current route. Roots and re-entered synsets end
    /// the route right away; anything else becomes a new frame.
    fn enter(&mut self, id: &str) -> Visit {
        let graph = self.graph;
        let synset = graph.synset_or_dangling(id);
        self.current.push(PathStep {
            synset: id.to_owned(),
            anchor: synset.anchor.clone(),
        });

        if self.on_path.contains(id) || synset.is_root() {
            let keep_going = self.emit();
            self.current.pop();
            return Visit::Emitted(keep_going);
        }

        self.on_path.insert(id.to_owned());
        Visit::Descend(Frame {
            parents: synset.hypernyms.iter().cloned().collect(),
            next: 0,
        })
    }

    fn leave(&mut self) {
        if let Some(step) = self.current.pop() {
            self.on_path.remove(&step.synset);
        }
    }

    fn emit(&mut self) -> bool {
        if self.limit.is_some_and(|limit| self.paths.len() >= limit) {
            return false;
        }
        self.paths.push(SynsetPath::new(self.current.clone()));
        true
    }
}
