use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use wnalign_core::{SynsetId, SynsetPath};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FocusCorrespondent {
    pub synset: SynsetId,
    pub lexical_forms: BTreeSet<String>,
}

/// A reference-path step, cross-referenced to the focus synset that carries
/// the same anchor, if any.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnnotatedStep {
    pub synset: SynsetId,
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<FocusCorrespondent>,
}

/// Inclusive range of path positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentRange {
    pub start: usize,
    pub end: usize,
}

impl SegmentRange {
    pub fn contains_endpoint(&self, position: usize) -> bool {
        position == self.start || position == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divergence {
    pub focus_synset: SynsetId,
    pub reference_synset: SynsetId,
    pub focus_path: SynsetPath,
    pub reference_path: Vec<AnnotatedStep>,
    pub focus_segment: SegmentRange,
    pub reference_segment: SegmentRange,
    /// Anchors strictly inside the reference segment, in path order.
    pub extra_concepts: Vec<String>,
}

impl Divergence {
    pub fn pair_key(&self) -> (&str, &str) {
        (&self.focus_synset, &self.reference_synset)
    }

    pub fn combined_path_len(&self) -> usize {
        self.focus_path.len() + self.reference_path.len()
    }

    pub fn reference_segment_steps(&self) -> &[AnnotatedStep] {
        let start = self.reference_segment.start.min(self.reference_segment.end);
        let end = self.reference_segment.start.max(self.reference_segment.end);
        self.reference_path
            .get(start..=end)
            .unwrap_or_default()
    }
}
