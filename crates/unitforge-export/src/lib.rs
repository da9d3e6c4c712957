//! Unitforge export pipeline
//!
//! Serializes a built scene graph into the engine's intermediate format:
//! - one unit file describing the node hierarchy
//! - one mesh file per mesh node, under a directory named after the unit
//!
//! The whole export is a single synchronous pass with no shared state;
//! each invocation owns its scene graph exclusively.

pub mod mesh;
pub mod unit;

use std::path::Path;

use unitforge_core::{ExportOptions, Result};
use unitforge_scene::{build_graph, SceneDocument};

pub use unit::write_unit;

/// Convert a scene document straight to unit and mesh files on disk.
///
/// This is the whole pipeline: scene-graph construction, mesh attribute
/// merging, tangent generation, and serialization. Any structural error
/// in the scene or filesystem failure aborts the export; files already
/// flushed stay on disk (no rollback).
pub fn build_and_serialize(
    document: &SceneDocument,
    options: &ExportOptions,
    unit_path: impl AsRef<Path>,
) -> Result<()> {
    let graph = build_graph(document, options)?;
    write_unit(&graph, unit_path.as_ref())
}
