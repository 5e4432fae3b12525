//! Engine data structures: base poses and GPU textures.
//!
//! - `instance` holds the persistent position, rotation and scale of props
//! - `texture` contains the GPU texture wrapper for depth buffers and offscreen targets

pub mod instance;
pub mod texture;
