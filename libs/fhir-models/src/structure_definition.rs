//! FHIR StructureDefinition model
//!
//! Carries the identity and classification fields the engine reads when
//! indexing and matching profiles. Snapshot/differential element trees are
//! kept as raw values — element-level processing belongs to the validator
//! feeding on `all_structure_definitions`, not to this crate.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StructureDefinition {
    /// Resource type - always "StructureDefinition"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Canonical identifier
    pub url: String,

    /// Business version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Name (computer friendly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Name (human friendly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Publication status (draft | active | retired | unknown)
    pub status: String,

    /// primitive-type | complex-type | resource | logical
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Whether the structure is abstract
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,

    /// Type constrained by this structure
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub constrained_type: Option<String>,

    /// Definition this structure is constrained from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_definition: Option<String>,

    /// specialization | constraint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derivation: Option<String>,

    /// Snapshot element tree, unprocessed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Value>,

    /// Differential element tree, unprocessed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differential: Option<Value>,

    /// Additional content
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

fn default_resource_type() -> String {
    "StructureDefinition".to_string()
}

impl StructureDefinition {
    /// Declared business version, if it parses as a comparable version.
    pub fn profile_version(&self) -> Option<crate::ProfileVersion> {
        self.version
            .as_deref()
            .and_then(crate::ProfileVersion::parse)
    }
}
