//! Scene graph construction
//!
//! Builds the exportable node hierarchy from the document's flat object
//! list. Objects are visited parents-first (sorted by link depth), so a
//! child's parent node always exists when the child is inserted. Node ids
//! are not assigned here; the serializer derives them from a fresh
//! depth-ordered traversal.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use tracing::{debug, info};

use unitforge_core::{Error, ExportOptions, Result};

use crate::builder::build_mesh;
use crate::document::{ObjectKind, SceneDocument, SceneObject};
use crate::mesh::MeshData;

/// What a node is
#[derive(Debug, Clone)]
pub enum NodeKind {
    Empty,
    Mesh(MeshData),
}

impl NodeKind {
    /// Type tag used in the unit file
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Empty => "EMPTY",
            NodeKind::Mesh(_) => "MESH",
        }
    }
}

/// A positioned entity in the exported hierarchy
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Local name; only the fully-qualified path is unique
    pub name: String,
    /// Dotted path of names from the root; unique within a graph
    pub path: String,
    /// Index of the parent node within the graph, if any
    pub parent: Option<usize>,
    /// Parent depth + 1, or 0 at a root
    pub depth: u32,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

/// All exportable nodes, keyed by fully-qualified path
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    by_path: HashMap<String, usize>,
}

impl SceneGraph {
    /// Insert a node, enforcing path uniqueness.
    ///
    /// A duplicate fully-qualified path means the host scene has two
    /// objects resolving to the same hierarchical location; the export
    /// cannot continue.
    pub fn insert(&mut self, node: Node) -> Result<usize> {
        if self.by_path.contains_key(&node.path) {
            return Err(Error::DuplicateNodePath {
                path: node.path.clone(),
            });
        }
        let index = self.nodes.len();
        self.by_path.insert(node.path.clone(), index);
        self.nodes.push(node);
        Ok(index)
    }

    /// Look up a node index by fully-qualified path
    pub fn index_of(&self, path: &str) -> Option<usize> {
        self.by_path.get(path).copied()
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Traversal order for serialization: node indices stably sorted by
    /// depth, so a parent is always visited (and assigned an id) before
    /// any of its children.
    pub fn serialization_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.nodes.len()).collect();
        order.sort_by_key(|&i| self.nodes[i].depth);
        order
    }
}

/// Build a scene graph from a document.
///
/// Filters objects by export scope, walks them parents-first, and
/// dispatches on kind: meshes through the mesh builder (downgrading
/// zero-face meshes to empties), empties directly, anything else skipped.
pub fn build_graph(document: &SceneDocument, options: &ExportOptions) -> Result<SceneGraph> {
    let by_name: HashMap<&str, &SceneObject> = document
        .objects
        .iter()
        .map(|o| (o.name.as_str(), o))
        .collect();
    if by_name.len() != document.objects.len() {
        return Err(Error::invalid_scene("object names are not unique"));
    }

    let mut candidates: Vec<&SceneObject> = document
        .objects
        .iter()
        .filter(|o| in_scope(o, options))
        .collect();
    let depths = object_depths(&candidates, &by_name, document.objects.len())?;
    candidates.sort_by_key(|o| depths[o.name.as_str()]);

    let mut graph = SceneGraph::default();
    // Exported node path for each source object name, so children can
    // resolve their nearest exported ancestor.
    let mut exported: HashMap<&str, String> = HashMap::new();

    for object in candidates {
        let kind = match object.kind {
            ObjectKind::Mesh => match object.geometry.as_ref().and_then(|g| build_mesh(g, options)) {
                Some(mesh) => NodeKind::Mesh(mesh),
                // Zero tessellated faces: graceful downgrade.
                None => NodeKind::Empty,
            },
            ObjectKind::Empty => NodeKind::Empty,
            ObjectKind::Unsupported => {
                debug!(object = %object.name, "skipping unsupported object kind");
                continue;
            }
        };

        let parent_path = nearest_exported_ancestor(object, &by_name, &exported);
        let (path, parent, depth) = match parent_path {
            Some(parent_path) => {
                // Present by construction: parents sort before children.
                let parent_index = graph
                    .index_of(&parent_path)
                    .ok_or_else(|| Error::MissingParent {
                        child: object.name.clone(),
                        parent: parent_path.clone(),
                    })?;
                (
                    format!("{}.{}", parent_path, object.name),
                    Some(parent_index),
                    graph.node(parent_index).depth + 1,
                )
            }
            None => (object.name.clone(), None, 0),
        };

        let index = graph.insert(Node {
            kind,
            name: object.name.clone(),
            path,
            parent,
            depth,
            position: Vec3::from_array(object.transform.position),
            rotation: node_rotation(object.transform.rotation),
            scale: Vec3::from_array(object.transform.scale),
        })?;
        exported.insert(object.name.as_str(), graph.node(index).path.clone());
    }

    info!(nodes = graph.len(), "scene graph built");
    Ok(graph)
}

/// Unit rotation from the document's scalar-first quaternion array.
/// A near-zero quaternion cannot be normalized; it falls back to
/// identity instead of leaking NaN into the unit file.
fn node_rotation(rotation: [f32; 4]) -> Quat {
    let [w, x, y, z] = rotation;
    let quat = Quat::from_xyzw(x, y, z, w);
    if quat.length_squared() > 1e-12 {
        quat.normalize()
    } else {
        Quat::IDENTITY
    }
}

fn in_scope(object: &SceneObject, options: &ExportOptions) -> bool {
    if options.only_selected && !object.selected {
        return false;
    }
    match object.kind {
        ObjectKind::Empty => options.export_empties,
        ObjectKind::Mesh => options.export_meshes,
        ObjectKind::Unsupported => false,
    }
}

/// Link depth of every exportable object, validating parent references
/// and rejecting cycles.
///
/// Only objects in export scope are walked. A dangling parent or a cycle
/// on an object that will never be exported does not abort the export;
/// such objects are skipped without being looked at.
fn object_depths<'a>(
    candidates: &[&'a SceneObject],
    by_name: &HashMap<&'a str, &'a SceneObject>,
    object_count: usize,
) -> Result<HashMap<&'a str, u32>> {
    let mut depths = HashMap::new();
    for &object in candidates {
        let mut depth = 0u32;
        let mut current = object;
        while let Some(parent_name) = current.parent.as_deref() {
            current = by_name
                .get(parent_name)
                .copied()
                .ok_or_else(|| Error::MissingParent {
                    child: current.name.clone(),
                    parent: parent_name.to_string(),
                })?;
            depth += 1;
            if depth as usize > object_count {
                return Err(Error::invalid_scene(format!(
                    "parent cycle involving object '{}'",
                    object.name
                )));
            }
        }
        depths.insert(object.name.as_str(), depth);
    }
    Ok(depths)
}

/// Walk the source parent chain until an exported node is found.
///
/// When scope filtering drops an intermediate object, its exported
/// descendants re-parent to the nearest exported ancestor; with none
/// left, they become roots.
fn nearest_exported_ancestor(
    object: &SceneObject,
    by_name: &HashMap<&str, &SceneObject>,
    exported: &HashMap<&str, String>,
) -> Option<String> {
    let mut current = object.parent.as_deref();
    while let Some(name) = current {
        if let Some(path) = exported.get(name) {
            return Some(path.clone());
        }
        current = by_name.get(name).and_then(|o| o.parent.as_deref());
    }
    None
}
