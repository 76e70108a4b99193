use idl_ref::error::IndexError;
use idl_ref::resolver::{Anchor, DocumentIndex, Resolver, ScopeId};
use std::io::Write;

const INDEX_YAML: &str = r#"
scopes:
  - structural: true
  - parent: 1
    structural: false
definitions:
  - text: " Request "
    type: interface
  - text: signal
    type: attribute
variables:
  - text: request
    type: Request
    scope: 2
  - text: init
    scope: 1
"#;

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[test]
fn test_load_yaml_index() {
    let file = write_temp(".yaml", INDEX_YAML);
    let index = DocumentIndex::load(file.path()).unwrap();

    assert_eq!(index.lookup_declared_type("Request"), Some("interface".to_string()));
    assert_eq!(index.lookup_declared_type("signal"), Some("attribute".to_string()));
    assert_eq!(
        index.lookup_contextual_variable_type("request", Some(Anchor(ScopeId(2)))),
        Some("Request".to_string())
    );
    // Declared without a type: the first match decides, so no type.
    assert_eq!(
        index.lookup_contextual_variable_type("init", Some(Anchor(ScopeId(1)))),
        None
    );
}

#[test]
fn test_load_json_index() {
    let file = write_temp(
        ".json",
        r#"{ "definitions": [{ "text": "Foo", "type": "interface" }] }"#,
    );
    let index = DocumentIndex::load(file.path()).unwrap();
    assert_eq!(index.lookup_declared_type("Foo"), Some("interface".to_string()));
}

#[test]
fn test_load_unsupported_extension() {
    let file = write_temp(".toml", "");
    assert!(matches!(
        DocumentIndex::load(file.path()),
        Err(IndexError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_load_missing_file() {
    assert!(matches!(
        DocumentIndex::load("/definitely/not/here.json"),
        Err(IndexError::Io { .. })
    ));
}

#[test]
fn test_malformed_yaml() {
    assert!(matches!(
        DocumentIndex::from_yaml_str("scopes: [oops"),
        Err(IndexError::Yaml(_))
    ));
}

#[test]
fn test_case_sensitive_lookup() {
    let index = DocumentIndex::from_yaml_str(INDEX_YAML).unwrap();
    assert_eq!(index.lookup_declared_type("request"), None);
    assert_eq!(index.lookup_contextual_variable_type("Request", None), None);
}
