//! Error types for the frame solver

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or solving a [`FrameModel`](super::FrameModel)
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeaError {
    #[error("Node '{0}' not found in model")]
    NodeNotFound(String),

    #[error("Member '{0}' not found in model")]
    MemberNotFound(String),

    #[error("Material '{0}' not found in model")]
    MaterialNotFound(String),

    #[error("Section '{0}' not found in model")]
    SectionNotFound(String),

    #[error("Load combination '{0}' not found in model")]
    LoadCombinationNotFound(String),

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("Model is unstable: {0}")]
    Unstable(String),

    #[error("Singular stiffness matrix - model may be unstable or have insufficient supports")]
    SingularMatrix,

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Model not analyzed - run analyze_linear() first")]
    NotAnalyzed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for solver operations
pub type FeaResult<T> = Result<T, FeaError>;
