use flate2::write::GzEncoder;
use flate2::Compression;
use kapsel_context::{ArtifactKind, StoreError, TerminologyStore};
use std::fs;
use std::path::Path;

const TASK_SD_JSON: &str = r#"{
    "resourceType": "StructureDefinition",
    "id": "PrescriptionTask",
    "url": "https://example.org/fhir/StructureDefinition/PrescriptionTask",
    "version": "1.2.0",
    "name": "PrescriptionTask",
    "status": "active",
    "kind": "resource",
    "abstract": false,
    "type": "Task",
    "derivation": "constraint"
}"#;

const FLOWTYPE_CS_XML: &str = r#"<CodeSystem xmlns="http://hl7.org/fhir">
    <url value="https://example.org/fhir/CodeSystem/flowtype"/>
    <status value="active"/>
    <content value="complete"/>
    <concept><code value="160"/><display value="Muster 16"/></concept>
    <concept><code value="200"/><display value="Direktzuweisung"/></concept>
</CodeSystem>"#;

const PERFORMER_VS_JSON: &str = r#"{
    "resourceType": "ValueSet",
    "url": "https://example.org/fhir/ValueSet/performer-type",
    "status": "active",
    "compose": {"include": [{"system": "https://example.org/fhir/CodeSystem/flowtype"}]}
}"#;

const KVID_NS_JSON: &str = r#"{
    "resourceType": "NamingSystem",
    "name": "KVID",
    "status": "active",
    "kind": "identifier",
    "uniqueId": [{"type": "uri", "value": "http://fhir.de/sid/gkv/kvid-10", "preferred": true}]
}"#;

const INDEX: &str = "\
// structure definitions
profiles/task.json
// terminology
vocab/flowtype.xml
vocab/performer-type.json
naming/kvid.json
";

fn write_fixture_tree(base: &Path) {
    for (path, content) in fixture_files() {
        let file = base.join(path);
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(file, content).unwrap();
    }
}

fn fixture_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("profiles/task.json", TASK_SD_JSON),
        ("vocab/flowtype.xml", FLOWTYPE_CS_XML),
        ("vocab/performer-type.json", PERFORMER_VS_JSON),
        ("naming/kvid.json", KVID_NS_JSON),
    ]
}

#[test]
fn loads_all_artifact_kinds_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_tree(dir.path());

    let store = TerminologyStore::from_index_str(dir.path(), INDEX).unwrap();
    assert_eq!(store.artifact_count(), 4);

    let sd = store
        .structure_definition("https://example.org/fhir/StructureDefinition/PrescriptionTask")
        .unwrap();
    assert_eq!(sd.constrained_type.as_deref(), Some("Task"));

    let cs = store
        .code_system("https://example.org/fhir/CodeSystem/flowtype")
        .unwrap();
    assert!(cs.find_concept("160").is_some());

    assert!(store
        .value_set("https://example.org/fhir/ValueSet/performer-type")
        .is_some());
    assert!(store.naming_system("http://fhir.de/sid/gkv/kvid-10").is_some());
}

#[test]
fn version_suffix_is_ignored_on_fetch() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_tree(dir.path());
    let store = TerminologyStore::from_index_str(dir.path(), INDEX).unwrap();

    let url = "https://example.org/fhir/StructureDefinition/PrescriptionTask";
    let bare = store.fetch(ArtifactKind::StructureDefinition, url);
    let suffixed = store.fetch(
        ArtifactKind::StructureDefinition,
        &format!("{url}|9.9.9"),
    );
    assert!(bare.is_some());
    assert_eq!(bare, suffixed);
}

#[test]
fn backslash_index_entries_load_the_same_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_tree(dir.path());

    let forward = TerminologyStore::from_index_str(dir.path(), "profiles/task.json").unwrap();
    let backward = TerminologyStore::from_index_str(dir.path(), "profiles\\task.json").unwrap();

    let url = "https://example.org/fhir/StructureDefinition/PrescriptionTask";
    assert_eq!(
        forward.structure_definition(url),
        backward.structure_definition(url)
    );
}

#[test]
fn missing_indexed_artifact_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_tree(dir.path());

    let index_with_ghost = format!("{INDEX}profiles/retired.json\n");
    let err = TerminologyStore::from_index_str(dir.path(), &index_with_ghost).unwrap_err();
    assert!(matches!(err, StoreError::MissingArtifact(path) if path == "profiles/retired.json"));
}

#[test]
fn unknown_extension_in_index_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "not a profile").unwrap();

    let err = TerminologyStore::from_index_str(dir.path(), "notes.txt").unwrap_err();
    assert!(matches!(err, StoreError::Codec { .. }));
}

#[test]
fn archive_yields_the_same_store_as_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture_tree(dir.path());
    let from_dir = TerminologyStore::from_index_str(dir.path(), INDEX).unwrap();

    let archive = build_archive();
    let from_archive = TerminologyStore::from_archive(&archive).unwrap();

    assert_eq!(from_dir.artifact_count(), from_archive.artifact_count());
    let url = "https://example.org/fhir/StructureDefinition/PrescriptionTask";
    assert_eq!(
        from_dir.structure_definition(url),
        from_archive.structure_definition(url)
    );
}

#[test]
fn archive_without_index_is_fatal() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    {
        let mut builder = tar::Builder::new(&mut encoder);
        append_entry(&mut builder, "package/profiles/task.json", TASK_SD_JSON);
        builder.finish().unwrap();
    }
    let bytes = encoder.finish().unwrap();

    let err = TerminologyStore::from_archive(&bytes).unwrap_err();
    assert!(matches!(err, StoreError::MissingArtifact(_)));
}

fn build_archive() -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    {
        let mut builder = tar::Builder::new(&mut encoder);
        append_entry(&mut builder, "package/profiles.index", INDEX);
        for (path, content) in fixture_files() {
            append_entry(&mut builder, &format!("package/{path}"), content);
        }
        builder.finish().unwrap();
    }
    encoder.finish().unwrap()
}

fn append_entry<W: std::io::Write>(builder: &mut tar::Builder<W>, path: &str, content: &str) {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, path, content.as_bytes())
        .unwrap();
}
