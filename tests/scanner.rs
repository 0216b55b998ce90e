use blast_radius::core::scanner::{FileScanner, ScanOptions, SourceScanner};
use std::fs;
use std::path::Path;

fn touch<P: AsRef<Path>>(p: P, content: &str) {
    fs::write(p, content).unwrap();
}

#[test]
fn scanner_filters_by_extension_and_orders_files_before_subdirectories() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::create_dir_all(root.join("b")).unwrap();

    touch(root.join("zeta.py"), "");
    touch(root.join("a/main.py"), "");
    touch(root.join("a/lib.rs"), "");
    touch(root.join("b/app.py"), "");
    touch(root.join("b/readme.txt"), "");

    let files = FileScanner::new()
        .scan_directory(root, &ScanOptions::default())
        .unwrap();

    let modules: Vec<_> = files.iter().map(|f| f.module_id.as_str()).collect();
    assert_eq!(modules, vec!["zeta", "a.main", "b.app"]);
    assert!(files.iter().all(|f| f.language == "python"));
}

#[test]
fn scanner_honors_extra_extensions() {
    let dir = tempfile::TempDir::new().unwrap();
    touch(dir.path().join("stubs.pyi"), "");
    touch(dir.path().join("mod.py"), "");

    let options = ScanOptions::default().with_extensions(vec!["py".into(), "pyi".into()]);
    let files = FileScanner::new().scan_directory(dir.path(), &options).unwrap();

    let modules: Vec<_> = files.iter().map(|f| f.module_id.as_str()).collect();
    assert_eq!(modules, vec!["mod", "stubs.pyi"]);
}

#[test]
fn stub_files_keep_a_module_id_apart_from_their_source() {
    let dir = tempfile::TempDir::new().unwrap();
    touch(dir.path().join("mod.py"), "def run():\n    pass\n");
    touch(dir.path().join("mod.pyi"), "def run() -> None: ...\n");

    let options = ScanOptions::default().with_extensions(vec!["py".into(), "pyi".into()]);
    let parsed = SourceScanner::with_options(options).scan(dir.path()).unwrap();

    let modules: Vec<_> = parsed.modules.keys().map(String::as_str).collect();
    assert_eq!(modules, vec!["mod", "mod.pyi"]);
    let functions: Vec<_> = parsed.functions.keys().map(String::as_str).collect();
    assert_eq!(functions, vec!["mod.run", "mod.pyi.run"]);
    assert!(parsed.failures.is_empty());
}

#[test]
fn scanner_rejects_non_directory_root() {
    let dir = tempfile::TempDir::new().unwrap();
    let file = dir.path().join("single.py");
    touch(&file, "x = 1\n");

    assert!(SourceScanner::new().scan(&file).is_err());
}

#[test]
fn source_scanner_folds_files_in_walk_order() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("pkg")).unwrap();
    touch(root.join("main.py"), "from pkg.util import run\n\nrun()\n");
    touch(root.join("pkg/util.py"), "def run():\n    pass\n");
    touch(root.join("pkg/broken.py"), "class (:\n");

    let parsed = SourceScanner::new().scan(root).unwrap();

    let modules: Vec<_> = parsed.modules.keys().map(String::as_str).collect();
    assert_eq!(modules, vec!["main", "pkg.util"]);
    assert_eq!(
        parsed.modules["pkg.util"].file_path,
        Path::new("pkg").join("util.py")
    );
    assert_eq!(parsed.functions.len(), 1);
    assert!(parsed.functions.contains_key("pkg.util.run"));
    assert_eq!(parsed.imports.len(), 1);
    assert_eq!(parsed.imports[0].target_module, "pkg.util");
    assert_eq!(parsed.calls.len(), 1);
    assert_eq!(parsed.calls[0].caller, "main");

    assert_eq!(parsed.failures.len(), 1);
    assert_eq!(parsed.failures[0].path, Path::new("pkg").join("broken.py"));
}

#[test]
fn source_scanner_is_deterministic() {
    let dir = tempfile::TempDir::new().unwrap();
    for i in 0..12 {
        touch(
            dir.path().join(format!("m{i}.py")),
            &format!("def f{i}():\n    helper()\n\ndef helper():\n    pass\n"),
        );
    }

    let scanner = SourceScanner::new();
    assert_eq!(scanner.scan(dir.path()).unwrap(), scanner.scan(dir.path()).unwrap());
}
