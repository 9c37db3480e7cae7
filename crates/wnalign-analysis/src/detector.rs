use wnalign_core::{
    AnchorIndex, LexicalGraph, PathError, SynsetPath, paths_from, paths_from_bounded,
};

use crate::divergence::{AnnotatedStep, Divergence, FocusCorrespondent, SegmentRange};

/// Read-only inputs shared by every detection unit.
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    pub focus: &'a LexicalGraph,
    pub reference: &'a LexicalGraph,
    pub focus_index: &'a AnchorIndex,
    pub reference_index: &'a AnchorIndex,
    pub path_limit: Option<usize>,
}

impl DetectionContext<'_> {
    fn root_paths(&self, graph: &LexicalGraph, start: &str) -> Result<Vec<SynsetPath>, PathError> {
        match self.path_limit {
            Some(limit) => paths_from_bounded(graph, start, limit),
            None => Ok(paths_from(graph, start)),
        }
    }

    fn annotate(&self, path: &SynsetPath) -> Vec<AnnotatedStep> {
        path.steps()
            .iter()
            .map(|step| AnnotatedStep {
                synset: step.synset.clone(),
                anchor: step.anchor.clone(),
                focus: step
                    .anchor
                    .as_deref()
                    .and_then(|anchor| self.focus_index.get(anchor))
                    .map(|entry| FocusCorrespondent {
                        synset: entry.synset.clone(),
                        lexical_forms: entry.lexical_forms.clone(),
                    }),
            })
            .collect()
    }
}

/// All divergences for one focus synset, across every focus path, every
/// reference synset sharing its anchor and every reference path. Nothing is
/// deduplicated here.
pub fn detect(ctx: &DetectionContext<'_>, focus_id: &str) -> Result<Vec<Divergence>, PathError> {
    let focus = ctx.focus.synset_or_dangling(focus_id);
    let Some(anchor) = focus.anchor.as_deref() else {
        return Ok(Vec::new());
    };
    let counterparts = ctx.reference_index.owners(anchor);
    if counterparts.is_empty() {
        return Ok(Vec::new());
    }

    let focus_paths = ctx.root_paths(ctx.focus, focus_id)?;
    let reference_paths = counterparts
        .iter()
        .map(|entry| {
            ctx.root_paths(ctx.reference, &entry.synset)
                .map(|paths| (entry.synset.as_str(), paths))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut found = Vec::new();
    for focus_path in &focus_paths {
        let focus_anchors = focus_path.anchor_sequence();
        if focus_anchors.len() < 2 {
            continue;
        }

        for (reference_id, paths) in &reference_paths {
            for reference_path in paths {
                let reference_anchors = reference_path.anchor_sequence();
                let mut annotated: Option<Vec<AnnotatedStep>> = None;

                for lower in 0..focus_anchors.len() - 1 {
                    let (Some(lower_anchor), Some(upper_anchor)) =
                        (focus_anchors.anchor(lower), focus_anchors.anchor(lower + 1))
                    else {
                        continue;
                    };
                    let (Some(ref_lower), Some(ref_upper)) = (
                        reference_anchors.position(lower_anchor),
                        reference_anchors.position(upper_anchor),
                    ) else {
                        continue;
                    };
                    // Adjacent or reversed in the reference: no extra concept.
                    if ref_upper <= ref_lower + 1 {
                        continue;
                    }

                    let (
                        Some(focus_start),
                        Some(focus_end),
                        Some(reference_start),
                        Some(reference_end),
                    ) = (
                        focus_anchors.path_index(lower),
                        focus_anchors.path_index(lower + 1),
                        reference_anchors.path_index(ref_lower),
                        reference_anchors.path_index(ref_upper),
                    )
                    else {
                        continue;
                    };

                    let reference_steps = annotated
                        .get_or_insert_with(|| ctx.annotate(reference_path))
                        .clone();
                    found.push(Divergence {
                        focus_synset: focus_id.to_owned(),
                        reference_synset: (*reference_id).to_owned(),
                        focus_path: focus_path.clone(),
                        reference_path: reference_steps,
                        focus_segment: SegmentRange {
                            start: focus_start,
                            end: focus_end,
                        },
                        reference_segment: SegmentRange {
                            start: reference_start,
                            end: reference_end,
                        },
                        extra_concepts: reference_anchors.slice(ref_lower + 1, ref_upper),
                    });
                }
            }
        }
    }

    Ok(found)
}
