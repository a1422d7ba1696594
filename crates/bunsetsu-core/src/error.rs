use crate::codec::CodecError;
use crate::depgraph::GraphError;
use crate::dict::DictError;
use crate::feature::FeatureError;
use crate::learning::LearningError;
use crate::matrix::MatrixError;
use crate::settings::SettingsError;

/// Any failure the engine can surface to its caller.
///
/// Lookup misses never end up here; only initialization and persistence
/// problems do.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Dict(#[from] DictError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Learning(#[from] LearningError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("segment {index} out of range ({count} segments)")]
    SegmentOutOfRange { index: usize, count: usize },

    #[error("candidate {index} out of range for segment {segment} ({count} candidates)")]
    CandidateOutOfRange {
        segment: usize,
        index: usize,
        count: usize,
    },

    #[error("cannot resize segment {index} by {delta}")]
    InvalidResize { index: usize, delta: i32 },
}
