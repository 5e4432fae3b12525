use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::resources::mesh::Geometry;

/**
 * This module contains all logic for loading shaders and models from the asset directory.
 */
pub mod mesh;

pub fn asset_path(asset_dir: &str, file_name: &str) -> PathBuf {
    Path::new("./").join(asset_dir).join(file_name)
}

pub fn load_string(asset_dir: &str, file_name: &str) -> anyhow::Result<String> {
    let path = asset_path(asset_dir, file_name);
    std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

pub fn load_obj(asset_dir: &str, file_name: &str) -> anyhow::Result<Geometry> {
    let path = asset_path(asset_dir, file_name);
    let (models, _materials) = tobj::load_obj(&path, &tobj::GPU_LOAD_OPTIONS)
        .with_context(|| format!("loading model {}", path.display()))?;
    let geometry = Geometry::from_obj_models(&models);
    if geometry.is_empty() {
        anyhow::bail!("model {} contains no triangles", path.display());
    }
    Ok(geometry)
}

/// Load a prop model, falling back to a small cube so a missing file never stops the scene.
pub fn load_prop_geometry(asset_dir: &str, file_name: &str) -> Geometry {
    match load_obj(asset_dir, file_name) {
        Ok(geometry) => geometry,
        Err(e) => {
            log::warn!("{:#}; using a placeholder cube", e);
            Geometry::cube(0.5)
        }
    }
}
