//! FHIR CodeSystem model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declares the existence of and describes a code system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeSystem {
    /// Resource type - always "CodeSystem"
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

    /// Publication status
    pub status: String,

    /// If code comparison is case sensitive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,

    /// Content type (not-present | example | fragment | complete | supplement)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Concepts in the code system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<Vec<CodeSystemConcept>>,

    /// Additional content
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

fn default_resource_type() -> String {
    "CodeSystem".to_string()
}

/// Concept in the code system
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodeSystemConcept {
    /// Code that identifies the concept
    pub code: String,

    /// Text to display to the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// Formal definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,

    /// Child concepts (nested hierarchy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<Vec<CodeSystemConcept>>,
}

impl CodeSystem {
    /// Depth-first lookup of a concept by code.
    pub fn find_concept(&self, code: &str) -> Option<&CodeSystemConcept> {
        fn walk<'a>(concepts: &'a [CodeSystemConcept], code: &str) -> Option<&'a CodeSystemConcept> {
            for concept in concepts {
                if concept.code == code {
                    return Some(concept);
                }
                if let Some(children) = &concept.concept {
                    if let Some(found) = walk(children, code) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(self.concept.as_deref().unwrap_or(&[]), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_nested_concept() {
        let cs: CodeSystem = serde_json::from_value(json!({
            "resourceType": "CodeSystem",
            "url": "https://example.org/fhir/CodeSystem/flowtype",
            "status": "active",
            "content": "complete",
            "concept": [
                {"code": "160", "display": "Muster 16 (Apothekenpflichtige Arzneimittel)"},
                {"code": "200", "concept": [{"code": "209", "display": "nested"}]}
            ]
        }))
        .unwrap();

        assert!(cs.find_concept("160").is_some());
        assert_eq!(cs.find_concept("209").unwrap().display.as_deref(), Some("nested"));
        assert!(cs.find_concept("999").is_none());
    }
}
