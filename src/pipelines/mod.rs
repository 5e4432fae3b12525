//! Render pipelines for the four renderable groups.
//!
//! - `basic` builds a single render pipeline from a WGSL module
//! - `groups` owns the per-group pipelines and the shared per-draw uniform layout

pub mod basic;
pub mod groups;
