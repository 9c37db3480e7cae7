use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

mod anchor;
mod graph;
mod paths;

pub use anchor::{AmbiguousAnchor, AnchorEntry, AnchorIndex};
pub use graph::{LexicalGraph, LexicalGraphBuilder, Synset, form_from_sense_id};
pub use paths::{
    AnchorSequence, PathError, PathStep, SynsetPath, paths_from, paths_from_bounded,
};

pub type SynsetId = String;

/// A synset as declared by a resource, before relations are inverted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SynsetRecord {
    pub id: SynsetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default)]
    pub hypernyms: BTreeSet<SynsetId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseLink {
    pub synset: SynsetId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sense_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LexicalEntryRecord {
    #[serde(default)]
    pub lemma_forms: BTreeSet<String>,
    #[serde(default)]
    pub senses: Vec<SenseLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResourceInfo {
    pub id: Option<String>,
    pub label: Option<String>,
    pub language: Option<String>,
    pub version: Option<String>,
}

/// Everything a format adapter hands over for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawResource {
    pub origin: String,
    #[serde(default)]
    pub info: ResourceInfo,
    #[serde(default)]
    pub synsets: Vec<SynsetRecord>,
    #[serde(default)]
    pub entries: Vec<LexicalEntryRecord>,
}

impl RawResource {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }
}

pub fn join_forms(forms: &BTreeSet<String>) -> String {
    forms.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
