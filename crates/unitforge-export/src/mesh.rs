//! Mesh file serialization
//!
//! One text file per mesh node, in fixed field order: material count,
//! vertex declaration (channel count + names), vertex count, index count,
//! material records, per-vertex channel values in declaration order, then
//! one triangle per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use unitforge_core::Result;
use unitforge_scene::{Channel, MeshData, Vertex};

/// On-disk location of a mesh node's file: the unit path minus its
/// extension becomes a directory, and the node's dotted path maps to
/// nested subdirectories.
pub fn mesh_file_path(unit_path: &Path, node_path: &str) -> PathBuf {
    let mut path = unit_path.with_extension("");
    for segment in node_path.split('.') {
        path.push(segment);
    }
    path.set_extension("mesh");
    path
}

/// Serialize one mesh to its file, creating parent directories as needed.
/// A pre-existing directory is fine; any other filesystem failure aborts.
pub fn write_mesh_file(path: &Path, mesh: &MeshData) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    debug!(path = %path.display(), "writing mesh file");

    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_mesh(&mut out, mesh)?;
    out.flush()?;
    Ok(())
}

/// Write a mesh to any sink; split out from the file wrapper for tests.
pub fn write_mesh(out: &mut impl Write, mesh: &MeshData) -> Result<()> {
    let declaration = mesh.attributes.channels();

    writeln!(out, "{}", mesh.materials.len())?;

    writeln!(out, "{}", declaration.len())?;
    for channel in &declaration {
        writeln!(out, "{}", channel)?;
    }

    writeln!(out, "{}", mesh.vertex_count())?;
    writeln!(out, "{}", mesh.indices.len())?;

    for material in &mesh.materials {
        writeln!(out, "{}", material.name)?;
        writeln!(out, "{}", material.shader)?;
        writeln!(out, "{}", material.textures.len())?;
        for texture in &material.textures {
            writeln!(out, "{}", texture)?;
        }
    }

    for vertex in &mesh.vertices {
        for channel in &declaration {
            write_channel(out, vertex, *channel)?;
        }
    }

    for triangle in mesh.indices.chunks_exact(3) {
        writeln!(out, "{} {} {}", triangle[0], triangle[1], triangle[2])?;
    }

    Ok(())
}

fn write_channel(out: &mut impl Write, vertex: &Vertex, channel: Channel) -> Result<()> {
    match channel {
        Channel::Position => {
            let p = vertex.position;
            writeln!(out, "{} {} {}", p.x, p.y, p.z)?;
        }
        Channel::Color(layer) => {
            let c = vertex.color[layer];
            writeln!(out, "{} {} {}", c.x, c.y, c.z)?;
        }
        Channel::Texcoord(slot) => {
            let uv = vertex.texcoord[slot];
            writeln!(out, "{} {}", uv.x, uv.y)?;
        }
        Channel::Normal => {
            let n = vertex.normal;
            writeln!(out, "{} {} {}", n.x, n.y, n.z)?;
        }
        Channel::Tangent => {
            let t = vertex.tangent;
            writeln!(out, "{} {} {}", t.x, t.y, t.z)?;
        }
        Channel::Bitangent => {
            // Reconstructed from the stored handedness sign.
            let b = vertex.bitangent();
            writeln!(out, "{} {} {}", b.x, b.y, b.z)?;
        }
    }
    Ok(())
}
