use blast_radius::core::{AnalysisError, CodebaseAnalyzer};
use blast_radius::formatters::JsonFormatter;
use serde_json::{json, Value};
use std::fs;

#[test]
fn json_formatter_emits_impact_payload_shape() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("pkg")).unwrap();
    fs::write(dir.path().join("pkg/a.py"), "import pkg.b\n").unwrap();
    fs::write(dir.path().join("pkg/b.py"), "VALUE = 1\n").unwrap();

    let result = CodebaseAnalyzer::new()
        .analyze(dir.path(), "change pkg.b")
        .unwrap();
    let s = JsonFormatter::new().format(&result).unwrap();
    let v: Value = serde_json::from_str(&s).unwrap();

    let expected = json!({
        "intent": "change pkg.b",
        "seeds": ["pkg.b"],
        "impacts": [
            {
                "id": "pkg.a",
                "label": "pkg.a",
                "type": "module",
                "is_direct": false,
                "category": "General",
                "explanation": "Triggered indirect dependency recalculation for 'pkg.a'."
            },
            {
                "id": "pkg.b",
                "label": "pkg.b",
                "type": "module",
                "is_direct": true,
                "category": "General",
                "explanation": "Directly modified component as per change intent."
            }
        ],
        "graph": {
            "nodes": [
                {"id": "pkg.a", "label": "pkg.a", "type": "module", "highlighted": true},
                {"id": "pkg.b", "label": "pkg.b", "type": "module", "highlighted": true}
            ],
            "edges": [
                {"id": "pkg.a-pkg.b-imports", "source": "pkg.a", "target": "pkg.b", "label": "imports"}
            ]
        }
    });
    assert_eq!(v, expected);
}

#[test]
fn json_formatter_writes_pretty_output_to_file() {
    let result = CodebaseAnalyzer::new()
        .analyze(
            &std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_apps/python_app"),
            "Change fetch_user",
        )
        .unwrap();

    let tmp = tempfile::NamedTempFile::new().unwrap();
    let path = tmp.path().with_extension("json");
    JsonFormatter::new()
        .with_pretty(true)
        .format_to_file(&result, &path)
        .unwrap();

    let data = fs::read_to_string(&path).unwrap();
    assert!(data.contains('\n'));
    let v: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(v["seeds"][0], "db_connector.DatabaseConnector.fetch_user");
    assert!(v["impacts"].is_array());
    assert!(v["graph"]["nodes"].is_array());
    assert!(v["graph"]["edges"].is_array());
}

#[test]
fn json_formatter_renders_failures_as_error_objects() {
    let s = JsonFormatter::new()
        .format_error(&AnalysisError::NoStartingPoint)
        .unwrap();
    let v: Value = serde_json::from_str(&s).unwrap();
    assert_eq!(
        v,
        json!({"error": "could not identify starting node from intent"})
    );
}
