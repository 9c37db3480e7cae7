use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::analyzer::AnalysisError;
use crate::detector::{DetectionContext, detect};
use crate::divergence::Divergence;

/// One detection unit per anchored focus synset, fanned out over a fixed-size
/// pool. `workers == 0` sizes the pool to the available parallelism.
///
/// Units share only read-only borrows of the context. The first failing unit
/// fails the whole run.
pub fn run_units(
    ctx: &DetectionContext<'_>,
    workers: usize,
) -> Result<Vec<Vec<Divergence>>, AnalysisError> {
    let units: Vec<&str> = ctx
        .focus
        .anchored()
        .map(|synset| synset.id.as_str())
        .collect();

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("wnalign-unit-{index}"))
        .build()?;

    tracing::info!(
        units = units.len(),
        workers = pool.current_num_threads(),
        "running divergence detection"
    );

    let results = pool.install(|| {
        units
            .par_iter()
            .map(|focus_id| detect(ctx, focus_id))
            .collect::<Result<Vec<_>, _>>()
    })?;

    tracing::info!(
        candidates = results.iter().map(Vec::len).sum::<usize>(),
        "divergence detection finished"
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use wnalign_core::{AnchorIndex, LexicalGraph, LexicalGraphBuilder, SynsetRecord};

    use super::*;
    use crate::merger::merge;

    fn declare(builder: &mut LexicalGraphBuilder, id: &str, anchor: &str) {
        builder.declare_synset(SynsetRecord {
            id: id.to_owned(),
            anchor: Some(anchor.to_owned()),
            ..SynsetRecord::default()
        });
    }

    fn graphs() -> (LexicalGraph, LexicalGraph) {
        let mut focus = LexicalGraphBuilder::new("focus");
        for (id, anchor) in [("r", "c0"), ("a", "c1"), ("b", "c2"), ("d", "c4")] {
            declare(&mut focus, id, anchor);
        }
        focus
            .add_hypernym("a", "r")
            .add_hypernym("b", "a")
            .add_hypernym("d", "a");

        let mut reference = LexicalGraphBuilder::new("reference");
        for (id, anchor) in [("r2", "c0"), ("m2", "c3"), ("a2", "c1"), ("b2", "c2"), ("d2", "c4")] {
            declare(&mut reference, id, anchor);
        }
        reference
            .add_hypernym("m2", "r2")
            .add_hypernym("a2", "m2")
            .add_hypernym("b2", "a2")
            .add_hypernym("d2", "a2");

        (focus.build(), reference.build())
    }

    #[test]
    fn result_is_independent_of_worker_count() {
        let (focus, reference) = graphs();
        let focus_index = AnchorIndex::build(&focus);
        let reference_index = AnchorIndex::build(&reference);
        let ctx = DetectionContext {
            focus: &focus,
            reference: &reference,
            focus_index: &focus_index,
            reference_index: &reference_index,
            path_limit: None,
        };

        let serial = merge(run_units(&ctx, 1).expect("serial run"));
        for workers in [2, 4, 0] {
            let parallel = merge(run_units(&ctx, workers).expect("parallel run"));
            assert_eq!(parallel, serial);
        }
        assert_eq!(serial.len(), 3);
    }

    #[test]
    fn a_failing_unit_fails_the_run() {
        let (focus, reference) = graphs();
        let focus_index = AnchorIndex::build(&focus);
        let reference_index = AnchorIndex::build(&reference);
        let ctx = DetectionContext {
            focus: &focus,
            reference: &reference,
            focus_index: &focus_index,
            reference_index: &reference_index,
            path_limit: Some(0),
        };

        let err = run_units(&ctx, 2).expect_err("limit of zero paths must fail");
        assert!(matches!(err, AnalysisError::Path(_)));
    }

    #[test]
    fn deep_hierarchies_run_on_worker_threads() {
        const DEPTH: usize = 50_000;
        let chain = |name: &str| {
            let mut builder = LexicalGraphBuilder::new(name);
            declare(&mut builder, "s0", "c0");
            for level in 0..DEPTH - 1 {
                builder.add_hypernym(&format!("s{level}"), &format!("s{}", level + 1));
            }
            builder.build()
        };
        let focus = chain("focus");
        let reference = chain("reference");
        let focus_index = AnchorIndex::build(&focus);
        let reference_index = AnchorIndex::build(&reference);
        let ctx = DetectionContext {
            focus: &focus,
            reference: &reference,
            focus_index: &focus_index,
            reference_index: &reference_index,
            path_limit: Some(10),
        };

        let units = run_units(&ctx, 2).expect("deep chains enumerate");
        assert_eq!(units.len(), 1);
        assert!(units[0].is_empty());
    }
}
