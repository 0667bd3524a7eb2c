//! FHIR NamingSystem model
//!
//! NamingSystem carries no canonical `url` element; it is identified by the
//! value of its first declared unique-id, which is also the key the
//! terminology store indexes it under.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamingSystem {
    /// Resource type - always "NamingSystem"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name (computer friendly)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Publication status
    pub status: String,

    /// codesystem | identifier | root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Unique identifiers for the system
    #[serde(default)]
    pub unique_id: Vec<NamingSystemUniqueId>,

    /// Additional content
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

fn default_resource_type() -> String {
    "NamingSystem".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamingSystemUniqueId {
    /// oid | uuid | uri | other
    #[serde(rename = "type")]
    pub id_type: String,

    /// The unique identifier itself
    pub value: String,

    /// Whether this is the preferred identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred: Option<bool>,
}

impl NamingSystem {
    /// Value of the first declared unique-id, the store's index key.
    pub fn primary_unique_id(&self) -> Option<&str> {
        self.unique_id.first().map(|uid| uid.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_unique_id_wins() {
        let ns: NamingSystem = serde_json::from_value(json!({
            "resourceType": "NamingSystem",
            "name": "KVID",
            "status": "active",
            "kind": "identifier",
            "uniqueId": [
                {"type": "uri", "value": "http://fhir.de/sid/gkv/kvid-10", "preferred": true},
                {"type": "oid", "value": "1.2.276.0.76.4.8"}
            ]
        }))
        .unwrap();

        assert_eq!(ns.primary_unique_id(), Some("http://fhir.de/sid/gkv/kvid-10"));
    }

    #[test]
    fn missing_unique_id_yields_none() {
        let ns: NamingSystem = serde_json::from_value(json!({
            "resourceType": "NamingSystem",
            "status": "draft"
        }))
        .unwrap();

        assert_eq!(ns.primary_unique_id(), None);
    }
}
