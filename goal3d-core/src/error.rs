//! Scene construction errors

use thiserror::Error;

/// Errors raised while building or realizing the goal scene
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Rotation axis other than x, y or z
    #[error("invalid rotation axis '{0}', expected one of x, y, z")]
    InvalidAxis(String),

    /// Non-finite, negative or zero geometry dimension
    #[error("invalid {what}: {value}")]
    InvalidDimension { what: &'static str, value: f32 },

    /// Tessellation segment count below the primitive's minimum
    #[error("invalid {what} segment count: {value}")]
    InvalidSegments { what: &'static str, value: u32 },

    /// Polygon path that cannot be filled
    #[error("degenerate shape: {0}")]
    DegenerateShape(String),

    /// Node record refers to a parent that is not (yet) in the scene
    #[error("node '{node}' refers to unknown parent #{parent}")]
    UnknownParent { node: String, parent: usize },

    /// Node other than the root without a parent
    #[error("node '{0}' has no parent, only the root may be detached")]
    DetachedNode(String),

    /// Mesh node refers to a material the scene does not define
    #[error("node '{node}' refers to unknown material #{material}")]
    UnknownMaterial { node: String, material: usize },

    /// Two nodes share a name
    #[error("duplicate node name '{0}'")]
    DuplicateName(String),

    /// Lookup of a node the assembler should have produced
    #[error("scene has no node named '{0}'")]
    MissingNode(String),
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
