use std::collections::{BTreeSet, HashSet};
use std::io::{self, Write};

use serde::Serialize;
use wnalign_analysis::{AlignmentOutcome, AnnotatedStep, Divergence, HierarchyLevels, LoadedResource};
use wnalign_core::{AnchorIndex, LexicalGraph, join_forms};

/// An extra reference concept whose anchor also exists in the focus resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtraConcept {
    pub anchor: String,
    pub focus_synset: String,
    pub lexical_forms: BTreeSet<String>,
}

#[derive(Debug, Clone)]
pub struct RenderedDivergence<'a> {
    pub number: usize,
    pub divergence: &'a Divergence,
    pub extra_concepts: Vec<ExtraConcept>,
}

/// What has been rendered so far. Reference segments already shown are not
/// shown again, even for a different synset pair.
#[derive(Debug, Default)]
pub struct RenderState {
    seen_segments: HashSet<Vec<(String, Option<String>)>>,
    rendered: usize,
    skipped_not_actionable: usize,
    skipped_duplicate: usize,
}

impl RenderState {
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    pub fn skipped_not_actionable(&self) -> usize {
        self.skipped_not_actionable
    }

    pub fn skipped_duplicate(&self) -> usize {
        self.skipped_duplicate
    }
}

/// Keeps divergences that have at least one extra concept known to the focus
/// resource and whose reference segment has not been rendered yet.
pub fn select_divergences<'a>(
    divergences: &'a [Divergence],
    focus_index: &AnchorIndex,
    state: &mut RenderState,
) -> Vec<RenderedDivergence<'a>> {
    let mut selected = Vec::new();
    for divergence in divergences {
        let extra_concepts: Vec<ExtraConcept> = divergence
            .extra_concepts
            .iter()
            .filter_map(|anchor| {
                focus_index.get(anchor).map(|entry| ExtraConcept {
                    anchor: anchor.clone(),
                    focus_synset: entry.synset.clone(),
                    lexical_forms: entry.lexical_forms.clone(),
                })
            })
            .collect();
        if extra_concepts.is_empty() {
            tracing::debug!(
                focus = %divergence.focus_synset,
                reference = %divergence.reference_synset,
                extra_concepts = ?divergence.extra_concepts,
                "skipping divergence: no extra concept exists in the focus resource"
            );
            state.skipped_not_actionable += 1;
            continue;
        }

        let segment = segment_key(divergence.reference_segment_steps());
        if !state.seen_segments.insert(segment) {
            tracing::debug!(
                focus = %divergence.focus_synset,
                reference = %divergence.reference_synset,
                "skipping divergence: reference segment already rendered"
            );
            state.skipped_duplicate += 1;
            continue;
        }

        state.rendered += 1;
        selected.push(RenderedDivergence {
            number: state.rendered,
            divergence,
            extra_concepts,
        });
    }
    selected
}

fn segment_key(steps: &[AnnotatedStep]) -> Vec<(String, Option<String>)> {
    steps
        .iter()
        .map(|step| (step.synset.clone(), step.anchor.clone()))
        .collect()
}

pub fn resource_name(resource: &LoadedResource) -> &str {
    resource
        .info
        .label
        .as_deref()
        .unwrap_or_else(|| resource.graph.name())
}

pub fn write_text_report<W: Write>(
    out: &mut W,
    outcome: &AlignmentOutcome,
    rendered: &[RenderedDivergence<'_>],
) -> io::Result<()> {
    writeln!(out, "Focus wordnet: {}", resource_name(&outcome.focus))?;
    writeln!(out, "Reference wordnet: {}", resource_name(&outcome.reference))?;
    writeln!(
        out,
        "Divergences: {} found, {} shown",
        outcome.divergences.len(),
        rendered.len()
    )?;

    for item in rendered {
        let divergence = item.divergence;
        writeln!(out)?;
        writeln!(out, "#{}", item.number)?;
        writeln!(
            out,
            "Focus synset: {}",
            labelled(&outcome.focus.graph, &divergence.focus_synset)
        )?;
        writeln!(
            out,
            "Reference synset: {}",
            labelled(&outcome.reference.graph, &divergence.reference_synset)
        )?;

        writeln!(out, "Focus path:")?;
        for (position, step) in divergence.focus_path.steps().iter().enumerate() {
            let mut line = format!(
                "{} {}",
                marker(divergence.focus_segment.contains_endpoint(position)),
                labelled(&outcome.focus.graph, &step.synset)
            );
            push_level(&mut line, &outcome.levels, &step.synset);
            push_anchor(&mut line, step.anchor.as_deref());
            writeln!(out, "{line}")?;
        }

        writeln!(out, "Reference path:")?;
        for (position, step) in divergence.reference_path.iter().enumerate() {
            let mut line = format!(
                "{} {}",
                marker(divergence.reference_segment.contains_endpoint(position)),
                labelled(&outcome.reference.graph, &step.synset)
            );
            push_anchor(&mut line, step.anchor.as_deref());
            if let Some(focus) = &step.focus {
                line.push_str(&format!(
                    " [focus: {}]",
                    with_forms(&focus.synset, &focus.lexical_forms)
                ));
            }
            writeln!(out, "{line}")?;
        }

        writeln!(
            out,
            "Extra concepts: {}",
            divergence.extra_concepts.join(", ")
        )?;
    }
    Ok(())
}

pub fn write_extra_concepts<W: Write>(
    out: &mut W,
    rendered: &[RenderedDivergence<'_>],
) -> io::Result<()> {
    for item in rendered {
        for extra in &item.extra_concepts {
            writeln!(
                out,
                "ILI: {} [focus: {}]",
                extra.anchor,
                with_forms(&extra.focus_synset, &extra.lexical_forms)
            )?;
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    focus: &'a str,
    reference: &'a str,
    divergences_found: usize,
    divergences: Vec<JsonDivergence<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonDivergence<'a> {
    number: usize,
    #[serde(flatten)]
    divergence: &'a Divergence,
    focus_extra_concepts: &'a [ExtraConcept],
}

pub fn write_json_report<W: Write>(
    out: &mut W,
    outcome: &AlignmentOutcome,
    rendered: &[RenderedDivergence<'_>],
) -> io::Result<()> {
    let report = JsonReport {
        focus: resource_name(&outcome.focus),
        reference: resource_name(&outcome.reference),
        divergences_found: outcome.divergences.len(),
        divergences: rendered
            .iter()
            .map(|item| JsonDivergence {
                number: item.number,
                divergence: item.divergence,
                focus_extra_concepts: &item.extra_concepts,
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}

fn marker(is_segment_end: bool) -> &'static str {
    if is_segment_end { "->" } else { "  " }
}

fn labelled(graph: &LexicalGraph, id: &str) -> String {
    match graph.get(id) {
        Some(synset) => with_forms(id, &synset.lexical_forms),
        None => id.to_owned(),
    }
}

fn with_forms(id: &str, forms: &BTreeSet<String>) -> String {
    if forms.is_empty() {
        id.to_owned()
    } else {
        format!("{id} ({})", join_forms(forms))
    }
}

fn push_level(line: &mut String, levels: &HierarchyLevels, id: &str) {
    if let Some(level) = levels.level(id) {
        line.push_str(&format!(" level {level}"));
    }
}

fn push_anchor(line: &mut String, anchor: Option<&str>) {
    if let Some(anchor) = anchor {
        line.push_str(&format!(" ILI {anchor}"));
    }
}
