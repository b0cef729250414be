/// goal3d core library - soccer goal scene construction and animation
///
/// This library holds everything that does not need a terminal: transform
/// builders, the primitive catalog, the scene graph, the goal assembler and the
/// keyboard-driven animation reducer, plus camera projection math.

pub mod animation;
pub mod assembly;
pub mod config;
pub mod error;
pub mod geometry;
pub mod material;
pub mod primitives;
pub mod projection;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use animation::{animate, AnimationState, Command, FrameInput, Key};
pub use assembly::{goal_description, GoalScene};
pub use config::{GoalConfig, GoalDimensions};
pub use error::{Result, SceneError};
pub use geometry::{Mesh, Triangle, Vertex};
pub use material::{Material, MaterialId, Rgb};
pub use primitives::Primitive;
pub use projection::{Camera, ProjectionMode};
pub use scene::{NodeId, SceneBuilder, SceneDescription, SceneGraph};
pub use transform::{Axis, Transform};
