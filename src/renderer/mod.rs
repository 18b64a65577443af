//! WebGPU rendering module
//!
//! Geometry is generated on the CPU as screen-space triangles; the GPU side
//! is a single alpha-blended pass.

pub mod fish;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use scene::{Layer, Scene};
pub use vertex::Vertex;
