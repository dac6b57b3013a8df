//! Rendering
//!
//! Games describe each frame as a list of draw commands. The commands are
//! tessellated into triangles and drawn with a single WebGPU pipeline; text
//! is handed back to the host to place in the DOM.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use frame::{Color, DrawCmd, Frame, TextAlign};
pub use pipeline::{RenderState, letterbox, viewport_to_playfield};
pub use shapes::{Mesh, tessellate};
pub use vertex::{Vertex, colors};
