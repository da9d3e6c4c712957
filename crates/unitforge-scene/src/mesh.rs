//! Normalized mesh data model
//!
//! A `MeshData` is the fully merged, per-vertex form of the host's
//! per-face geometry. Channel presence is tracked mesh-globally in an
//! `AttributeSet`: once any face writes a channel, every vertex reports it,
//! with untouched vertices holding the channel default.

use glam::{Vec2, Vec3};

use crate::weights::BoneInfluences;

/// Number of color and texcoord layers the format supports
pub const MAX_LAYERS: usize = 8;

/// Shader assigned to materials that carry no override
pub const DEFAULT_SHADER: &str = "shaders/mesh";

/// A vertex-declaration channel, in serialization order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Position,
    Color(usize),
    Texcoord(usize),
    Normal,
    Tangent,
    Bitangent,
}

impl Channel {
    /// Number of float components this channel serializes
    pub fn components(&self) -> usize {
        match self {
            Channel::Texcoord(_) => 2,
            _ => 3,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Position => write!(f, "POSITION"),
            Channel::Color(n) => write!(f, "COLOR{}", n),
            Channel::Texcoord(n) => write!(f, "TEXCOORD{}", n),
            Channel::Normal => write!(f, "NORMAL"),
            Channel::Tangent => write!(f, "TANGENT"),
            Channel::Bitangent => write!(f, "BITANGENT"),
        }
    }
}

/// Which optional per-vertex channels a mesh carries
///
/// Computed once while faces are merged, never mutated after
/// serialization begins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    pub position: bool,
    pub color: [bool; MAX_LAYERS],
    pub texcoord: [bool; MAX_LAYERS],
    pub normal: bool,
    pub tangent: bool,
    pub bitangent: bool,
}

impl AttributeSet {
    /// Channels present on this mesh, in the fixed declaration order:
    /// position, color0..7, texcoord0..7, normal, tangent, bitangent.
    pub fn channels(&self) -> Vec<Channel> {
        let mut declaration = Vec::new();
        if self.position {
            declaration.push(Channel::Position);
        }
        for (layer, &present) in self.color.iter().enumerate() {
            if present {
                declaration.push(Channel::Color(layer));
            }
        }
        for (slot, &present) in self.texcoord.iter().enumerate() {
            if present {
                declaration.push(Channel::Texcoord(slot));
            }
        }
        if self.normal {
            declaration.push(Channel::Normal);
        }
        if self.tangent {
            declaration.push(Channel::Tangent);
        }
        if self.bitangent {
            declaration.push(Channel::Bitangent);
        }
        declaration
    }

    /// Whether any texcoord layer is populated
    pub fn has_texcoords(&self) -> bool {
        self.texcoord.iter().any(|&present| present)
    }
}

/// A single vertex after attribute merging
///
/// All channel slots exist on every vertex; the owning mesh's
/// `AttributeSet` decides which of them are meaningful.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub position: Vec3,
    pub color: [Vec3; MAX_LAYERS],
    pub texcoord: [Vec2; MAX_LAYERS],
    pub normal: Vec3,
    pub tangent: Vec3,
    /// Handedness of the tangent space: +1 or -1. The bitangent vector is
    /// reconstructed as `bitangent_sign * normal.cross(tangent)`.
    pub bitangent_sign: f32,
    pub bones: Option<BoneInfluences>,
}

impl Vertex {
    /// Create a vertex with just a position
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            color: [Vec3::ZERO; MAX_LAYERS],
            texcoord: [Vec2::ZERO; MAX_LAYERS],
            normal: Vec3::ZERO,
            tangent: Vec3::ZERO,
            bitangent_sign: 1.0,
            bones: None,
        }
    }

    /// Reconstruct the bitangent vector from the stored handedness sign
    pub fn bitangent(&self) -> Vec3 {
        self.normal.cross(self.tangent) * self.bitangent_sign
    }
}

/// A material slot on a mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// Unique within the owning mesh
    pub name: String,
    pub shader: String,
    /// Enabled texture slots, in host slot order
    pub textures: Vec<String>,
}

/// Fully merged mesh geometry, ready for serialization
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Materials in slot order; the ordering is the implicit slot index
    pub materials: Vec<Material>,
    /// Dense vertex array; index is identity
    pub vertices: Vec<Vertex>,
    /// Flat triangle list; length is always a multiple of 3
    pub indices: Vec<u32>,
    pub attributes: AttributeSet,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
