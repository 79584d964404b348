//! # Mesh/Element Assembly
//!
//! Sequential reduce that turns extruded solids into ordered, paired
//! [`Mesh`]/[`Element`] records. Ids come from the accumulator itself, so
//! they stay dense and deterministic whatever was skipped upstream.

use std::collections::BTreeMap;

use config::constants::{
    AUTHOR_INFO_KEY, CONTAINER_VERSION, DEFAULT_AUTHOR, DEFAULT_ELEMENT_TYPE,
    DEFAULT_NAME_PREFIX, NAME_INFO_KEY,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::element::{Color, Element};
use crate::extrude::SolidMesh;
use crate::footprint::Footprint;
use crate::mesh::Mesh;

/// Constant metadata stamped onto every element.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyOptions {
    /// Element category
    pub element_type: String,
    /// Element color
    pub color: Color,
    /// Prefix of the `Name` info entry, followed by `-{mesh_id}`
    pub name_prefix: String,
    /// Copy scalar footprint attributes into element info
    pub carry_attributes: bool,
    /// Batch author
    pub author: String,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            element_type: DEFAULT_ELEMENT_TYPE.to_string(),
            color: Color::default(),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            carry_attributes: false,
            author: DEFAULT_AUTHOR.to_string(),
        }
    }
}

/// Batch-level metadata for the export container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchInfo {
    /// Container schema version
    pub version: String,
    /// Free-form metadata, at least the author
    pub info: BTreeMap<String, String>,
}

impl BatchInfo {
    fn new(author: &str) -> Self {
        Self {
            version: CONTAINER_VERSION.to_string(),
            info: BTreeMap::from([(AUTHOR_INFO_KEY.to_string(), author.to_string())]),
        }
    }
}

/// Ordered mesh/element pairs of one batch.
///
/// `meshes[i]` and `elements[i]` always belong together and both carry
/// `mesh_id == i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Meshes in emission order
    pub meshes: Vec<Mesh>,
    /// Elements in emission order
    pub elements: Vec<Element>,
    /// Container metadata
    pub info: BatchInfo,
}

impl Batch {
    /// Number of emitted pairs.
    #[inline]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Returns true if nothing was emitted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Iterates over mesh/element pairs in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&Mesh, &Element)> {
        self.meshes.iter().zip(&self.elements)
    }

    /// Keyed view: element guid to mesh.
    pub fn by_guid(&self) -> BTreeMap<Uuid, &Mesh> {
        self.pairs().map(|(mesh, element)| (element.guid, mesh)).collect()
    }
}

/// Accumulates solids into a [`Batch`].
#[derive(Debug, Clone)]
pub struct Assembler {
    options: AssemblyOptions,
    meshes: Vec<Mesh>,
    elements: Vec<Element>,
}

impl Assembler {
    /// Creates an empty accumulator.
    pub fn new(options: AssemblyOptions) -> Self {
        Self {
            options,
            meshes: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Number of pairs accumulated so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Returns true if nothing was pushed yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Appends one solid and its element; returns the assigned mesh id.
    pub fn push(&mut self, solid: SolidMesh, footprint: &Footprint) -> u32 {
        let mesh_id = self.meshes.len() as u32;

        let mut element = Element::new(mesh_id);
        element.element_type = self.options.element_type.clone();
        element.color = self.options.color;
        if self.options.carry_attributes {
            for (key, value) in &footprint.attributes {
                if let Some(text) = scalar_text(value) {
                    element.info.insert(key.clone(), text);
                }
            }
        }
        element.info.insert(
            NAME_INFO_KEY.to_string(),
            format!("{}-{mesh_id}", self.options.name_prefix),
        );

        self.meshes.push(Mesh::from_solid(mesh_id, solid));
        self.elements.push(element);
        mesh_id
    }

    /// Finishes the batch.
    pub fn finish(self) -> Batch {
        Batch {
            meshes: self.meshes,
            elements: self.elements,
            info: BatchInfo::new(&self.options.author),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
