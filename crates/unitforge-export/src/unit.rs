//! Unit file serialization
//!
//! The unit file is the top-level artifact: a `nodes = [ ... ]` block
//! listing every exported node in id order. Ids are assigned here, fresh
//! on every export, as positions in a depth-ordered traversal. A parent
//! is always written (and numbered) before any of its children, so
//! `parent` references are always backwards.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use unitforge_core::Result;
use unitforge_scene::{NodeKind, SceneGraph};

use crate::mesh;

/// Write the unit file and all per-mesh files for a built scene graph.
///
/// Mesh files land under `<unit path without extension>/`, mirroring each
/// mesh node's dotted path as nested directories. Stale `.mesh` files from
/// a previous export of the same unit are removed best-effort first.
pub fn write_unit(graph: &SceneGraph, unit_path: &Path) -> Result<()> {
    let order = graph.serialization_order();

    // id of every node index under this traversal
    let mut ids = vec![0usize; graph.len()];
    for (id, &index) in order.iter().enumerate() {
        ids[index] = id;
    }

    let mesh_dir = unit_path.with_extension("");
    remove_stale_meshes(&mesh_dir);

    let file = File::create(unit_path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "nodes = [")?;
    for &index in &order {
        let node = graph.node(index);
        let parent_id = match node.parent {
            Some(parent) => ids[parent] as i64,
            None => -1,
        };

        writeln!(out, "  {{")?;
        writeln!(out, "    type = \"{}\"", node.kind.tag())?;
        writeln!(out, "    name = \"{}\"", node.name)?;
        writeln!(out, "    fully_qualified_name = \"{}\"", node.path)?;
        writeln!(out, "    parent = {}", parent_id)?;
        writeln!(out, "    pose = {{")?;
        writeln!(
            out,
            "      position = [ {} {} {} ]",
            node.position.x, node.position.y, node.position.z
        )?;
        // Scalar-first quaternion: w x y z.
        writeln!(
            out,
            "      rotation = [ {} {} {} {} ]",
            node.rotation.w, node.rotation.x, node.rotation.y, node.rotation.z
        )?;
        writeln!(
            out,
            "      scale = [ {} {} {} ]",
            node.scale.x, node.scale.y, node.scale.z
        )?;
        writeln!(out, "    }}")?;
        writeln!(out, "  }}")?;
    }
    writeln!(out, "]")?;
    out.flush()?;

    let mut meshes = 0usize;
    for &index in &order {
        let node = graph.node(index);
        if let NodeKind::Mesh(data) = &node.kind {
            mesh::write_mesh_file(&mesh::mesh_file_path(unit_path, &node.path), data)?;
            meshes += 1;
        }
    }

    info!(
        unit = %unit_path.display(),
        nodes = graph.len(),
        meshes,
        "unit exported"
    );
    Ok(())
}

/// Remove leftover `.mesh` files from a previous export of this unit.
/// Best-effort: enumeration and removal failures are swallowed.
fn remove_stale_meshes(dir: &Path) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            remove_stale_meshes(&path);
        } else if path.extension().is_some_and(|ext| ext == "mesh") {
            if std::fs::remove_file(&path).is_err() {
                debug!(path = %path.display(), "could not remove stale mesh file");
            }
        }
    }
}
