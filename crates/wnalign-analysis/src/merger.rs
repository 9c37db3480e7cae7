use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use wnalign_core::SynsetId;

use crate::divergence::Divergence;

/// Reduces every unit's candidates to one divergence per
/// `(focus synset, reference synset)` pair, ordered by that pair.
///
/// The candidate with the smallest combined path length wins. Equal lengths
/// fall back to comparing the paths and segments themselves, so the outcome
/// does not depend on the order units finished in.
pub fn merge<I>(units: I) -> Vec<Divergence>
where
    I: IntoIterator<Item = Vec<Divergence>>,
{
    let mut best = BTreeMap::<(SynsetId, SynsetId), Divergence>::new();
    for candidate in units.into_iter().flatten() {
        let key = (
            candidate.focus_synset.clone(),
            candidate.reference_synset.clone(),
        );
        match best.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                if canonical_order(&candidate, slot.get()) == Ordering::Less {
                    slot.insert(candidate);
                }
            }
        }
    }

    tracing::debug!(pairs = best.len(), "merged divergence candidates");
    best.into_values().collect()
}

fn canonical_order(left: &Divergence, right: &Divergence) -> Ordering {
    left.combined_path_len()
        .cmp(&right.combined_path_len())
        .then_with(|| left.focus_path.cmp(&right.focus_path))
        .then_with(|| left.reference_path.cmp(&right.reference_path))
        .then_with(|| left.focus_segment.cmp(&right.focus_segment))
        .then_with(|| left.reference_segment.cmp(&right.reference_segment))
        .then_with(|| left.extra_concepts.cmp(&right.extra_concepts))
}

#[cfg(test)]
mod tests {
    use wnalign_core::{PathStep, SynsetPath};

    use super::*;
    use crate::divergence::{AnnotatedStep, SegmentRange};

    fn candidate(focus: &str, reference: &str, reference_ids: &[&str]) -> Divergence {
        let focus_path = SynsetPath::new(vec![
            PathStep {
                synset: focus.to_owned(),
                anchor: Some("B".to_owned()),
            },
            PathStep {
                synset: "a".to_owned(),
                anchor: Some("A".to_owned()),
            },
        ]);
        let reference_path: Vec<AnnotatedStep> = reference_ids
            .iter()
            .map(|id| AnnotatedStep {
                synset: (*id).to_owned(),
                anchor: Some(id.to_uppercase()),
                focus: None,
            })
            .collect();
        let end = reference_path.len() - 1;
        Divergence {
            focus_synset: focus.to_owned(),
            reference_synset: reference.to_owned(),
            focus_path,
            extra_concepts: reference_path[1..end]
                .iter()
                .filter_map(|step| step.anchor.clone())
                .collect(),
            reference_path,
            focus_segment: SegmentRange { start: 0, end: 1 },
            reference_segment: SegmentRange { start: 0, end },
        }
    }

    #[test]
    fn keeps_the_shortest_candidate_per_pair() {
        let long = candidate("b", "b2", &["b2", "x", "y", "a2"]);
        let short = candidate("b", "b2", &["b2", "x", "a2"]);

        let merged = merge(vec![vec![long], vec![short.clone()]]);

        assert_eq!(merged, vec![short]);
        assert_eq!(merged[0].extra_concepts, vec!["X".to_owned()]);
    }

    #[test]
    fn emits_one_divergence_per_pair_in_pair_order() {
        let merged = merge(vec![
            vec![
                candidate("d", "d2", &["d2", "x", "a2"]),
                candidate("b", "b3", &["b3", "x", "a2"]),
            ],
            vec![
                candidate("b", "b2", &["b2", "x", "a2"]),
                candidate("b", "b2", &["b2", "y", "a2"]),
                candidate("b", "b2", &["b2", "x", "y", "a2"]),
            ],
        ]);

        let keys: Vec<(&str, &str)> = merged.iter().map(Divergence::pair_key).collect();
        assert_eq!(keys, vec![("b", "b2"), ("b", "b3"), ("d", "d2")]);
    }

    #[test]
    fn equal_length_ties_resolve_the_same_in_any_order() {
        let via_x = candidate("b", "b2", &["b2", "x", "a2"]);
        let via_y = candidate("b", "b2", &["b2", "y", "a2"]);

        let forward = merge(vec![vec![via_x.clone(), via_y.clone()]]);
        let backward = merge(vec![vec![via_y], vec![via_x.clone()]]);

        assert_eq!(forward, backward);
        assert_eq!(forward, vec![via_x]);
    }

    #[test]
    fn empty_input_merges_to_nothing() {
        assert!(merge(Vec::<Vec<Divergence>>::new()).is_empty());
    }
}
