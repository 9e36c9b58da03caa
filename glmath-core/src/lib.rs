/// glmath Core Library - 3D transform math for column-major pipelines
///
/// This library provides the stateless kernel shared by the renderers:
/// vectors, 4x4 matrices, transform and camera builders, hierarchical scene
/// transforms, and the shading helpers the demos evaluate per vertex.
///
/// Matrices are stored column-major and act on column vectors, so a
/// model-view-projection matrix reads `projection * view * model`.

pub mod error;
pub mod geometry;
pub mod input;
pub mod lighting;
pub mod matrix;
pub mod projection;
pub mod scene;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use error::{Error, Result};
pub use geometry::{Mesh, Triangle, Vertex};
pub use input::{canvas_to_ndc, ClickRecorder, DragRotation, Quadrant};
pub use lighting::{DirectionalLight, Fog, PointLight};
pub use matrix::Mat4;
pub use projection::{project_to_screen, Camera, ProjectionMode};
pub use scene::{NodeId, SceneGraph};
pub use transform::{RotationState, Transform};
pub use vector::{Vec3, Vec4};
