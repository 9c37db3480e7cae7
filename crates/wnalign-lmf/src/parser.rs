use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node, ParsingOptions};
use thiserror::Error;
use wnalign_core::{
    LexicalEntryRecord, RawResource, ResourceInfo, SenseLink, SynsetRecord,
};

const HYPERNYM_REL_TYPE: &str = "hypernym";
/// WN-LMF placeholder for a concept proposed for, but not yet in, the ILI.
const NEW_ILI_MARKER: &str = "in";

#[derive(Debug, Error)]
pub enum LmfError {
    #[error("resource not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {origin} as WN-LMF XML: {source}")]
    Xml {
        origin: String,
        #[source]
        source: roxmltree::Error,
    },
}

pub fn load_resource(path: impl AsRef<Path>) -> Result<RawResource, LmfError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LmfError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let text = fs::read_to_string(path).map_err(|source| LmfError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let origin = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_resource(&text, &origin)
}

pub fn parse_resource(text: &str, origin: &str) -> Result<RawResource, LmfError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document =
        Document::parse_with_options(text, options).map_err(|source| LmfError::Xml {
            origin: origin.to_owned(),
            source,
        })?;

    let mut resource = RawResource::new(origin);
    let mut skipped = 0usize;
    for node in document.descendants().filter(Node::is_element) {
        match node.tag_name().name() {
            "Lexicon" if resource.info == ResourceInfo::default() => {
                resource.info = read_lexicon_info(node);
            }
            "Synset" => match read_synset(node) {
                Some(record) => resource.synsets.push(record),
                None => skipped += 1,
            },
            "LexicalEntry" => resource.entries.push(read_lexical_entry(node)),
            _ => {}
        }
    }

    if skipped > 0 {
        tracing::debug!(origin, skipped, "skipped synsets without an id");
    }
    Ok(resource)
}

fn read_lexicon_info(node: Node<'_, '_>) -> ResourceInfo {
    ResourceInfo {
        id: attribute(node, "id"),
        label: attribute(node, "label"),
        language: attribute(node, "language"),
        version: attribute(node, "version"),
    }
}

fn read_synset(node: Node<'_, '_>) -> Option<SynsetRecord> {
    let id = attribute(node, "id")?;
    let anchor = attribute(node, "ili").filter(|ili| ili != NEW_ILI_MARKER);

    let mut definition = None;
    let mut hypernyms = BTreeSet::new();
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "Definition" if definition.is_none() => {
                definition = child
                    .text()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(str::to_owned);
            }
            "SynsetRelation" if child.attribute("relType") == Some(HYPERNYM_REL_TYPE) => {
                if let Some(target) = attribute(child, "target") {
                    hypernyms.insert(target);
                }
            }
            _ => {}
        }
    }

    Some(SynsetRecord {
        id,
        anchor,
        definition,
        hypernyms,
    })
}

fn read_lexical_entry(node: Node<'_, '_>) -> LexicalEntryRecord {
    let mut entry = LexicalEntryRecord::default();
    for child in node.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "Lemma" => {
                if let Some(form) = attribute(child, "writtenForm") {
                    entry.lemma_forms.insert(form);
                }
            }
            "Sense" => {
                if let Some(synset) = attribute(child, "synset") {
                    entry.senses.push(SenseLink {
                        synset,
                        sense_id: attribute(child, "id"),
                    });
                }
            }
            _ => {}
        }
    }
    entry
}

fn attribute(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE LexicalResource SYSTEM "http://globalwordnet.github.io/schemas/WN-LMF-1.1.dtd">
<LexicalResource xmlns:dc="https://globalwordnet.github.io/schemas/dc/">
  <Lexicon id="estwn-et" label="Estonian Wordnet" language="et" version="2.6.0">
    <LexicalEntry id="estwn-et-koer-n">
      <Lemma writtenForm="koer" partOfSpeech="n"/>
      <Sense id="estwn-et-koer-n-1" synset="estwn-et-2-n"/>
    </LexicalEntry>
    <LexicalEntry id="estwn-et-x-n">
      <Sense id="estwn-et-loom-n-1" synset="estwn-et-1-n"/>
    </LexicalEntry>
    <Synset id="estwn-et-1-n" ili="i35545" partOfSpeech="n">
      <Definition>elusolend</Definition>
    </Synset>
    <Synset id="estwn-et-2-n" ili="i46360" partOfSpeech="n">
      <Definition>koduloom</Definition>
      <Definition>second definition</Definition>
      <SynsetRelation relType="hypernym" target="estwn-et-1-n"/>
      <SynsetRelation relType="similar" target="estwn-et-3-n"/>
    </Synset>
    <Synset id="estwn-et-3-n" ili="in" partOfSpeech="n"/>
    <Synset id="estwn-et-4-n" ili="" partOfSpeech="n"/>
  </Lexicon>
</LexicalResource>
"#;

    #[test]
    fn parses_synsets_relations_and_entries() {
        let resource = parse_resource(SAMPLE, "estwn.xml").expect("parse sample");

        assert_eq!(resource.origin, "estwn.xml");
        assert_eq!(resource.info.id.as_deref(), Some("estwn-et"));
        assert_eq!(resource.info.version.as_deref(), Some("2.6.0"));
        assert_eq!(resource.synsets.len(), 4);
        assert_eq!(resource.entries.len(), 2);

        let dog = &resource.synsets[1];
        assert_eq!(dog.id, "estwn-et-2-n");
        assert_eq!(dog.anchor.as_deref(), Some("i46360"));
        assert_eq!(dog.definition.as_deref(), Some("koduloom"));
        assert_eq!(
            dog.hypernyms.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["estwn-et-1-n"]
        );

        let entry = &resource.entries[0];
        assert!(entry.lemma_forms.contains("koer"));
        assert_eq!(entry.senses[0].synset, "estwn-et-2-n");
        assert_eq!(entry.senses[0].sense_id.as_deref(), Some("estwn-et-koer-n-1"));
        assert!(resource.entries[1].lemma_forms.is_empty());
    }

    #[test]
    fn empty_and_placeholder_ili_values_are_not_anchors() {
        let resource = parse_resource(SAMPLE, "estwn.xml").expect("parse sample");
        assert_eq!(resource.synsets[2].anchor, None);
        assert_eq!(resource.synsets[3].anchor, None);
    }

    #[test]
    fn malformed_xml_reports_origin() {
        let err = parse_resource("<LexicalResource><Synset>", "broken.xml")
            .expect_err("malformed xml must fail");
        assert!(matches!(err, LmfError::Xml { .. }));
        assert!(err.to_string().contains("broken.xml"));
    }
}
