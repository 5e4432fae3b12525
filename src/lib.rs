//! ocean-ngin
//!
//! An underwater reef renderer built on wgpu. Every frame renders the scene three times:
//! once from a camera mirrored about the water plane into a reflection target, once into a
//! refraction target with everything above the surface clipped away, and once to the screen,
//! where the water surface blends the two targets.
//!
//! High-level modules
//! - `clip`: per-pass clip planes
//! - `camera`: mirrorable camera, projection and navigation controller
//! - `animation`: procedural motion of props, computed from the frame time
//! - `scene`: renderable groups, props, the seafloor height field and the reef layout
//! - `render`: per-draw uniforms, the backend interface and the shared render context
//! - `compositor`: traversal of the enabled groups for one pass
//! - `orchestrator`: the reflection, refraction and main pass sequence of a frame
//! - `context`, `backend`, `framebuffer`, `pipelines`: the wgpu implementation
//! - `resources`: geometry and asset loading
//! - `flow`: the winit event loop
//!

pub mod animation;
pub mod backend;
pub mod camera;
pub mod clip;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod framebuffer;
pub mod orchestrator;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use config::Config;
pub use flow::run;
