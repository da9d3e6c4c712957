//! Unitforge scene pipeline
//!
//! Turns a host-editor scene document into a serializable scene graph:
//! - `document`: the serde input boundary (objects, faces, corner layers)
//! - `mesh`: per-vertex data model and the vertex declaration
//! - `weights`: bone-weight cap and renormalization
//! - `builder`: per-face to per-vertex attribute merge and triangulation
//! - `tangent`: tangent-space derivation from UVs and normals
//! - `graph`: node hierarchy with depth ordering and unique paths

pub mod builder;
pub mod document;
pub mod graph;
pub mod mesh;
pub mod tangent;
pub mod weights;

pub use document::{SceneDocument, SceneObject};
pub use graph::{build_graph, Node, NodeKind, SceneGraph};
pub use mesh::{AttributeSet, Channel, Material, MeshData, Vertex};
pub use weights::BoneInfluences;
