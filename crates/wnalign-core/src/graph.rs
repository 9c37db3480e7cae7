use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{LexicalEntryRecord, RawResource, SynsetId, SynsetRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Synset {
    pub id: SynsetId,
    pub lexical_forms: BTreeSet<String>,
    pub anchor: Option<String>,
    pub definition: Option<String>,
    pub hypernyms: BTreeSet<SynsetId>,
    pub hyponyms: BTreeSet<SynsetId>,
    /// False when the synset only exists because something points at it.
    pub declared: bool,
}

impl Synset {
    /// Stand-in for an id that is referenced but never declared: no forms,
    /// no anchor, no parents.
    pub fn dangling(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            ..Self::default()
        }
    }

    pub fn is_root(&self) -> bool {
        self.hypernyms.is_empty()
    }

    pub fn forms_label(&self) -> String {
        crate::join_forms(&self.lexical_forms)
    }
}

/// One resource's synsets keyed by id. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LexicalGraph {
    name: String,
    synsets: BTreeMap<SynsetId, Synset>,
}

impl LexicalGraph {
    pub fn build(resource: &RawResource) -> Self {
        let mut builder = LexicalGraphBuilder::new(resource.origin.clone());
        for record in &resource.synsets {
            builder.declare_synset(record.clone());
        }
        for entry in &resource.entries {
            builder.add_lexical_entry(entry);
        }
        builder.build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.synsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.synsets.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Synset> {
        self.synsets.get(id)
    }

    /// Lookup that never fails: unknown ids resolve to [`Synset::dangling`].
    pub fn synset_or_dangling(&self, id: &str) -> Cow<'_, Synset> {
        match self.synsets.get(id) {
            Some(synset) => Cow::Borrowed(synset),
            None => Cow::Owned(Synset::dangling(id)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Synset> {
        self.synsets.values()
    }

    pub fn anchored(&self) -> impl Iterator<Item = &Synset> {
        self.synsets.values().filter(|synset| synset.anchor.is_some())
    }

    pub fn roots(&self) -> impl Iterator<Item = &Synset> {
        self.synsets.values().filter(|synset| synset.is_root())
    }

    /// `(child, parent)` pairs.
    pub fn hypernym_edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.synsets.values().flat_map(|synset| {
            synset
                .hypernyms
                .iter()
                .map(move |parent| (synset.id.as_str(), parent.as_str()))
        })
    }

    pub fn undeclared_count(&self) -> usize {
        self.synsets.values().filter(|synset| !synset.declared).count()
    }
}

#[derive(Debug, Default)]
pub struct LexicalGraphBuilder {
    name: String,
    synsets: BTreeMap<SynsetId, Synset>,
}

impl LexicalGraphBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            synsets: BTreeMap::new(),
        }
    }

    pub fn declare_synset(&mut self, record: SynsetRecord) -> &mut Self {
        let SynsetRecord {
            id,
            anchor,
            definition,
            hypernyms,
        } = record;

        let synset = self.slot(&id);
        synset.declared = true;
        if let Some(anchor) = normalize_optional(anchor) {
            synset.anchor = Some(anchor);
        }
        if let Some(definition) = normalize_optional(definition) {
            synset.definition = Some(definition);
        }

        for parent in &hypernyms {
            self.add_hypernym(&id, parent);
        }
        self
    }

    /// Inserts both directions of the edge so the two sets stay inverse.
    pub fn add_hypernym(&mut self, child: &str, parent: &str) -> &mut Self {
        self.slot(child).hypernyms.insert(parent.to_owned());
        self.slot(parent).hyponyms.insert(child.to_owned());
        self
    }

    pub fn add_lexical_entry(&mut self, entry: &LexicalEntryRecord) -> &mut Self {
        for sense in &entry.senses {
            let synset = self.slot(&sense.synset);
            synset.lexical_forms.extend(
                entry
                    .lemma_forms
                    .iter()
                    .map(|form| form.trim())
                    .filter(|form| !form.is_empty())
                    .map(str::to_owned),
            );

            if synset.lexical_forms.is_empty() {
                let fallback = sense
                    .sense_id
                    .as_deref()
                    .map(form_from_sense_id)
                    .filter(|form| !form.is_empty());
                if let Some(form) = fallback {
                    synset.lexical_forms.insert(form);
                }
            }
        }
        self
    }

    pub fn build(self) -> LexicalGraph {
        LexicalGraph {
            name: self.name,
            synsets: self.synsets,
        }
    }

    fn slot(&mut self, id: &str) -> &mut Synset {
        self.synsets
            .entry(id.to_owned())
            .or_insert_with(|| Synset::dangling(id))
    }
}

/// Best-effort lexical form for a sense that has no lemma: drops the prefix up
/// to the first `-` and the suffix from the last `-`.
pub fn form_from_sense_id(sense_id: &str) -> String {
    let tail = sense_id
        .split_once('-')
        .map_or(sense_id, |(_, rest)| rest);
    let head = tail.rsplit_once('-').map_or(tail, |(head, _)| head);
    head.to_owned()
}

fn normalize_optional(input: Option<String>) -> Option<String> {
    input
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
