//! The store proper: load, classify, fetch.

use crate::error::{Result, StoreError};
use crate::index::parse_index;
use flate2::read::GzDecoder;
use kapsel_codec::{EncodingKind, FhirCodec};
use kapsel_models::{split_canonical, CodeSystem, NamingSystem, StructureDefinition, ValueSet};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use tar::Archive;

/// Index file location inside a packaged profile archive.
const ARCHIVE_INDEX: &str = "package/profiles.index";
const ARCHIVE_ROOT: &str = "package/";

/// The four conformance artifact kinds the store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    StructureDefinition,
    CodeSystem,
    ValueSet,
    NamingSystem,
}

/// Borrowed view of one stored artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArtifactRef<'a> {
    StructureDefinition(&'a StructureDefinition),
    CodeSystem(&'a CodeSystem),
    ValueSet(&'a ValueSet),
    NamingSystem(&'a NamingSystem),
}

/// Immutable artifact store keyed by canonical URL (NamingSystem by its
/// first declared unique-id value).
#[derive(Debug, Default)]
pub struct TerminologyStore {
    structure_definitions: HashMap<String, StructureDefinition>,
    code_systems: HashMap<String, CodeSystem>,
    value_sets: HashMap<String, ValueSet>,
    naming_systems: HashMap<String, NamingSystem>,
}

impl TerminologyStore {
    /// Build from an index file next to the artifacts it lists.
    pub fn from_index_file(base_dir: &Path, index_path: &Path) -> Result<Self> {
        let index_text = fs::read_to_string(index_path)
            .map_err(|_| StoreError::MissingArtifact(index_path.display().to_string()))?;
        Self::from_index_str(base_dir, &index_text)
    }

    /// Build from index text, resolving each listed path under `base_dir`.
    pub fn from_index_str(base_dir: &Path, index_text: &str) -> Result<Self> {
        let codec = FhirCodec::new();
        let mut store = Self::default();

        for path in parse_index(index_text) {
            let file = base_dir.join(&path);
            let bytes = fs::read(&file).map_err(|_| StoreError::MissingArtifact(path.clone()))?;
            store.load_artifact(&codec, &path, &bytes)?;
        }

        store.log_summary();
        Ok(store)
    }

    /// Build from a gzipped tar archive with the index at
    /// `package/profiles.index` and artifacts below `package/`.
    pub fn from_archive(bytes: &[u8]) -> Result<Self> {
        let mut decompressed = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut decompressed)
            .map_err(|err| StoreError::Archive(err.to_string()))?;

        let mut files: HashMap<String, Vec<u8>> = HashMap::new();
        let mut archive = Archive::new(std::io::Cursor::new(decompressed));
        for entry in archive.entries().map_err(|err| StoreError::Archive(err.to_string()))? {
            let mut entry = entry.map_err(|err| StoreError::Archive(err.to_string()))?;
            let path = entry
                .path()
                .map_err(|err| StoreError::Archive(err.to_string()))?
                .to_string_lossy()
                .replace('\\', "/");
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents)?;
            files.insert(path, contents);
        }

        let index_text = files
            .get(ARCHIVE_INDEX)
            .ok_or_else(|| StoreError::MissingArtifact(ARCHIVE_INDEX.to_string()))
            .and_then(|bytes| clean_text(ARCHIVE_INDEX, bytes))?;

        let codec = FhirCodec::new();
        let mut store = Self::default();
        for path in parse_index(&index_text) {
            let bytes = files
                .get(&format!("{ARCHIVE_ROOT}{path}"))
                .ok_or_else(|| StoreError::MissingArtifact(path.clone()))?;
            store.load_artifact(&codec, &path, bytes)?;
        }

        store.log_summary();
        Ok(store)
    }

    fn load_artifact(&mut self, codec: &FhirCodec, path: &str, bytes: &[u8]) -> Result<()> {
        tracing::trace!(path, "loading profile artifact");
        let encoding = EncodingKind::from_path(path).map_err(|source| StoreError::Codec {
            path: path.to_string(),
            source,
        })?;
        let text = clean_text(path, bytes)?;
        let resource = codec
            .decode_with(&text, None, Some(encoding))
            .map_err(|source| StoreError::Codec {
                path: path.to_string(),
                source,
            })?;
        self.classify_and_insert(path, resource)
    }

    fn classify_and_insert(&mut self, path: &str, resource: Value) -> Result<()> {
        let resource_type = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match resource_type.as_str() {
            "StructureDefinition" => {
                let sd: StructureDefinition = parse_artifact(path, resource)?;
                insert_keyed(&mut self.structure_definitions, sd.url.clone(), sd, path);
            }
            "CodeSystem" => {
                let cs: CodeSystem = parse_artifact(path, resource)?;
                insert_keyed(&mut self.code_systems, cs.url.clone(), cs, path);
            }
            "ValueSet" => {
                let vs: ValueSet = parse_artifact(path, resource)?;
                insert_keyed(&mut self.value_sets, vs.url.clone(), vs, path);
            }
            "NamingSystem" => {
                let ns: NamingSystem = parse_artifact(path, resource)?;
                let key = ns
                    .primary_unique_id()
                    .ok_or_else(|| StoreError::InvalidArtifact {
                        path: path.to_string(),
                        reason: "NamingSystem declares no uniqueId".to_string(),
                    })?
                    .to_string();
                insert_keyed(&mut self.naming_systems, key, ns, path);
            }
            other => {
                return Err(StoreError::UnknownArtifactKind {
                    path: path.to_string(),
                    resource_type: other.to_string(),
                })
            }
        }
        Ok(())
    }

    fn log_summary(&self) {
        tracing::debug!(
            structure_definitions = self.structure_definitions.len(),
            code_systems = self.code_systems.len(),
            value_sets = self.value_sets.len(),
            naming_systems = self.naming_systems.len(),
            "terminology store built"
        );
    }

    /// Fetch by kind and canonical URL. A `|version` suffix on the URL is
    /// ignored: the store indexes bare URLs only.
    pub fn fetch(&self, kind: ArtifactKind, url: &str) -> Option<ArtifactRef<'_>> {
        match kind {
            ArtifactKind::StructureDefinition => self
                .structure_definition(url)
                .map(ArtifactRef::StructureDefinition),
            ArtifactKind::CodeSystem => self.code_system(url).map(ArtifactRef::CodeSystem),
            ArtifactKind::ValueSet => self.value_set(url).map(ArtifactRef::ValueSet),
            ArtifactKind::NamingSystem => self.naming_system(url).map(ArtifactRef::NamingSystem),
        }
    }

    pub fn structure_definition(&self, url: &str) -> Option<&StructureDefinition> {
        self.structure_definitions.get(split_canonical(url).0)
    }

    pub fn code_system(&self, url: &str) -> Option<&CodeSystem> {
        self.code_systems.get(split_canonical(url).0)
    }

    pub fn value_set(&self, url: &str) -> Option<&ValueSet> {
        self.value_sets.get(split_canonical(url).0)
    }

    pub fn naming_system(&self, unique_id: &str) -> Option<&NamingSystem> {
        self.naming_systems.get(split_canonical(unique_id).0)
    }

    /// The full loaded profile set, for validators that need all of it.
    pub fn all_structure_definitions(&self) -> impl Iterator<Item = &StructureDefinition> {
        self.structure_definitions.values()
    }

    pub fn artifact_count(&self) -> usize {
        self.structure_definitions.len()
            + self.code_systems.len()
            + self.value_sets.len()
            + self.naming_systems.len()
    }
}

fn parse_artifact<T: serde::de::DeserializeOwned>(path: &str, resource: Value) -> Result<T> {
    serde_json::from_value(resource).map_err(|err| StoreError::InvalidArtifact {
        path: path.to_string(),
        reason: err.to_string(),
    })
}

fn insert_keyed<T>(map: &mut HashMap<String, T>, key: String, artifact: T, path: &str) {
    if map.contains_key(&key) {
        // single-version store: the later index entry wins
        tracing::warn!(key = %key, path, "replacing previously loaded artifact");
    }
    tracing::trace!(key = %key, path, "stored artifact");
    map.insert(key, artifact);
}

/// Strip a UTF-8 BOM and non-whitespace control characters before parsing.
fn clean_text(path: &str, bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let content = std::str::from_utf8(bytes).map_err(|err| StoreError::InvalidArtifact {
        path: path.to_string(),
        reason: format!("invalid UTF-8: {err}"),
    })?;

    Ok(content
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\x7F'))
        .collect::<String>()
        .trim()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_bom_and_control_chars() {
        let bytes = b"\xEF\xBB\xBF{\"a\":\x01 1}\n";
        assert_eq!(clean_text("x.json", bytes).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn unknown_resource_type_is_rejected() {
        let mut store = TerminologyStore::default();
        let err = store
            .classify_and_insert(
                "profiles/patient.json",
                serde_json::json!({"resourceType": "Patient", "id": "p1"}),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownArtifactKind { .. }));
    }

    #[test]
    fn naming_system_without_unique_id_is_rejected() {
        let mut store = TerminologyStore::default();
        let err = store
            .classify_and_insert(
                "naming/kvid.json",
                serde_json::json!({"resourceType": "NamingSystem", "status": "active"}),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidArtifact { .. }));
    }
}
