//! Placement metadata for one mesh.

use std::collections::BTreeMap;

use config::constants::{DEFAULT_COLOR, DEFAULT_ELEMENT_TYPE};
use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RGBA color, 0..=255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        let [r, g, b, a] = DEFAULT_COLOR;
        Self::new(r, g, b, a)
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Places one mesh in the scene.
///
/// Meshes are already in frame coordinates, so the placement is the
/// identity: zero translation and the unit quaternion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Id of the mesh this element instantiates
    pub mesh_id: u32,
    /// Random v4 identifier
    pub guid: Uuid,
    /// Translation
    pub vector: DVec3,
    /// Rotation
    pub rotation: DQuat,
    /// Element category
    #[serde(rename = "type")]
    pub element_type: String,
    /// Display color
    pub color: Color,
    /// Free-form string metadata
    pub info: BTreeMap<String, String>,
}

impl Element {
    /// Creates an identity-placed element with a fresh guid.
    pub fn new(mesh_id: u32) -> Self {
        Self {
            mesh_id,
            guid: Uuid::new_v4(),
            vector: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            element_type: DEFAULT_ELEMENT_TYPE.to_string(),
            color: Color::default(),
            info: BTreeMap::new(),
        }
    }
}
