//! Export configuration
//!
//! Mirrors the option set offered by the host editor's export dialog.
//! Every toggle defaults to enabled; the document's `selected` flags only
//! matter when `only_selected` is set.

use serde::{Deserialize, Serialize};

/// Options controlling which objects and vertex channels are exported
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Export only objects flagged as selected in the scene document
    pub only_selected: bool,
    /// Export empty (transform-only) objects
    pub export_empties: bool,
    /// Export mesh objects
    pub export_meshes: bool,
    /// Include per-vertex normals
    pub export_normals: bool,
    /// Include per-vertex color layers
    pub export_colors: bool,
    /// Include per-vertex texture coordinate layers
    pub export_texcoords: bool,
    /// Generate and include tangents and bitangents
    pub export_tangents: bool,
    /// Maximum bone influences kept per vertex
    pub max_bone_influences: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            only_selected: false,
            export_empties: true,
            export_meshes: true,
            export_normals: true,
            export_colors: true,
            export_texcoords: true,
            export_tangents: true,
            max_bone_influences: 4,
        }
    }
}
