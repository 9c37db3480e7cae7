use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{LexicalGraph, SynsetId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorEntry {
    pub synset: SynsetId,
    pub lexical_forms: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousAnchor {
    pub anchor: String,
    pub synsets: Vec<SynsetId>,
}

/// Anchor id to owning synset(s) for one graph.
///
/// Every owner is kept. Single-owner lookups through [`AnchorIndex::get`]
/// resolve to the last owner in synset id order when an anchor is shared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnchorIndex {
    owners: BTreeMap<String, Vec<AnchorEntry>>,
}

impl AnchorIndex {
    pub fn build(graph: &LexicalGraph) -> Self {
        let mut owners = BTreeMap::<String, Vec<AnchorEntry>>::new();
        for synset in graph.anchored() {
            let Some(anchor) = synset.anchor.as_ref() else {
                continue;
            };
            owners.entry(anchor.clone()).or_default().push(AnchorEntry {
                synset: synset.id.clone(),
                lexical_forms: synset.lexical_forms.clone(),
            });
        }
        Self { owners }
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn contains(&self, anchor: &str) -> bool {
        self.owners.contains_key(anchor)
    }

    pub fn get(&self, anchor: &str) -> Option<&AnchorEntry> {
        self.owners.get(anchor).and_then(|entries| entries.last())
    }

    pub fn owners(&self, anchor: &str) -> &[AnchorEntry] {
        self.owners
            .get(anchor)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn ambiguous(&self) -> Vec<AmbiguousAnchor> {
        self.owners
            .iter()
            .filter(|(_, entries)| entries.len() > 1)
            .map(|(anchor, entries)| AmbiguousAnchor {
                anchor: anchor.clone(),
                synsets: entries.iter().map(|entry| entry.synset.clone()).collect(),
            })
            .collect()
    }
}
