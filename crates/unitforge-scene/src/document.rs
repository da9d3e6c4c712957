//! Scene document: the input boundary
//!
//! The host editor's extraction layer hands us a JSON document with a flat
//! object list. Geometry arrives per-face: each face is an ordered corner
//! list plus optional per-corner color layers and render-slot-keyed UV
//! layers. Tessellation (to triangles and quads) already happened on the
//! host side; we never split polygons beyond the quad case.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use unitforge_core::Result;

/// A complete scene handed over by the host editor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Flat object list; parent linkage is by object name
    pub objects: Vec<SceneObject>,
}

impl SceneDocument {
    /// Deserialize a scene document from a JSON reader
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a scene document from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Look up an object by its (document-unique) name
    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }
}

/// A single host scene object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object name; unique within the document
    pub name: String,
    /// What kind of entity this is; unknown kinds are skipped on export
    pub kind: ObjectKind,
    /// Name of the parent object, if any
    #[serde(default)]
    pub parent: Option<String>,
    /// Whether the object is selected in the host editor
    #[serde(default)]
    pub selected: bool,
    /// Local transform relative to the parent
    #[serde(default)]
    pub transform: Transform,
    /// Mesh geometry; present only for mesh objects
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// Host object type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Empty,
    Mesh,
    /// Any kind this exporter does not handle (cameras, lights, ...)
    #[serde(other)]
    Unsupported,
}

/// Local transform; rotation is a scalar-first quaternion (w, x, y, z)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [1.0, 0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

/// Raw mesh geometry as extracted from the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Geometry {
    /// Vertex positions; indices in faces refer into this array
    pub positions: Vec<[f32; 3]>,
    /// Tessellated faces (triangles and quads)
    #[serde(default)]
    pub faces: Vec<Face>,
    /// Materials referenced by the mesh, in slot order
    #[serde(default)]
    pub materials: Vec<MaterialDef>,
    /// Optional per-vertex bone influences, parallel to `positions`
    #[serde(default)]
    pub weights: Vec<WeightDef>,
}

/// One polygonal face: an ordered corner list plus per-corner layers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Face {
    /// Vertex indices, one per corner, in winding order
    pub corners: Vec<u32>,
    /// Color layers; each layer carries one RGB value per corner
    #[serde(default)]
    pub colors: Vec<Vec<[f32; 3]>>,
    /// UV layers keyed by the host's render slot
    #[serde(default)]
    pub uvs: Vec<UvLayer>,
}

/// A per-corner UV layer bound to a render slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UvLayer {
    /// Render-slot index this layer is bound to
    pub slot: usize,
    /// One UV pair per corner
    pub corners: Vec<[f32; 2]>,
}

/// Material definition from the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialDef {
    pub name: String,
    /// Shader override; falls back to the engine default when absent
    #[serde(default)]
    pub shader: Option<String>,
    /// Enabled texture slots, in slot order
    #[serde(default)]
    pub textures: Vec<String>,
}

/// Bone influences attached to one vertex by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightDef {
    pub bones: Vec<u32>,
    pub weights: Vec<f32>,
}
