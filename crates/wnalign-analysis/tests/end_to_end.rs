use std::collections::BTreeSet;
use std::error::Error;
use std::path::PathBuf;

use wnalign_analysis::{AlignmentAnalyzer, AnalysisError, ResourceRole};
use wnalign_config::AnalysisConfig;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn inserted_reference_concept_is_found_between_adjacent_focus_anchors()
-> Result<(), Box<dyn Error>> {
    let analyzer = AlignmentAnalyzer::new(&AnalysisConfig {
        workers: 2,
        hierarchy_root: Some("focus-R".to_owned()),
        ..AnalysisConfig::default()
    });

    let outcome = analyzer.run(&fixture("focus.xml"), &fixture("reference.xml"))?;

    assert_eq!(outcome.focus.info.label.as_deref(), Some("Focus"));
    assert_eq!(outcome.reference.graph.len(), 4);

    // Focus A and B both climb through the (c1, c0) adjacency.
    let pairs: Vec<(&str, &str)> = outcome
        .divergences
        .iter()
        .map(|divergence| divergence.pair_key())
        .collect();
    assert_eq!(pairs, vec![("focus-A", "ref-A"), ("focus-B", "ref-B")]);

    for divergence in &outcome.divergences {
        assert_eq!(divergence.extra_concepts, vec!["c3".to_owned()]);
        let upper = &divergence.focus_path.steps()[divergence.focus_segment.end];
        assert_eq!(upper.anchor.as_deref(), Some("c0"));
    }

    let segments: BTreeSet<Vec<(String, Option<String>)>> = outcome
        .divergences
        .iter()
        .map(|divergence| {
            divergence
                .reference_segment_steps()
                .iter()
                .map(|step| (step.synset.clone(), step.anchor.clone()))
                .collect()
        })
        .collect();
    assert_eq!(segments.len(), 1);

    assert_eq!(outcome.levels.level("focus-B"), Some(3));
    assert_eq!(outcome.stats.units, 3);
    assert_eq!(outcome.stats.divergences, 2);
    Ok(())
}

#[test]
fn identical_resources_agree_everywhere() -> Result<(), Box<dyn Error>> {
    let analyzer = AlignmentAnalyzer::new(&AnalysisConfig::default());
    let outcome = analyzer.run(&fixture("reference.xml"), &fixture("reference.xml"))?;
    assert!(outcome.divergences.is_empty());
    Ok(())
}

#[test]
fn missing_reference_aborts_before_comparison() {
    let analyzer = AlignmentAnalyzer::new(&AnalysisConfig::default());
    let err = analyzer
        .run(&fixture("focus.xml"), &fixture("does-not-exist.xml"))
        .expect_err("missing reference must fail");

    match err {
        AnalysisError::Load { role, source } => {
            assert_eq!(role, ResourceRole::Reference);
            assert!(source.to_string().contains("does-not-exist.xml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
