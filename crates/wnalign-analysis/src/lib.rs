mod analyzer;
mod detector;
mod divergence;
mod executor;
mod hierarchy;
mod merger;

pub use analyzer::{
    AlignmentAnalyzer, AlignmentOutcome, AlignmentStats, AnalysisError, LoadedResource,
    ResourceRole,
};
pub use detector::{DetectionContext, detect};
pub use divergence::{AnnotatedStep, Divergence, FocusCorrespondent, SegmentRange};
pub use executor::run_units;
pub use hierarchy::{HierarchyLevels, hypernym_cycles};
pub use merger::merge;
