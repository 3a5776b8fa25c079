use std::fs;
use std::path::{Path, PathBuf};

fn rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

fn rel(path: &Path) -> String {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let rel = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();
    rel.replace('\\', "/")
}

#[test]
fn system_layer_is_ui_free() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/system");
    let mut violations = Vec::new();

    for file in rs_files(&root) {
        let content = fs::read_to_string(&file).unwrap_or_default();
        for forbidden in ["crate::ui", "crate::app", "ratatui", "crossterm"] {
            if content.contains(forbidden) {
                violations.push(format!(
                    "{} imports forbidden dependency `{}`",
                    rel(&file),
                    forbidden
                ));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "System layering violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn procfs_parsers_stay_pure() {
    // All filesystem access belongs to ProcReader; the parsers work on
    // strings so they stay testable without fixtures.
    let parser = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/system/procfs/parser.rs");
    let content = fs::read_to_string(&parser).expect("parser.rs readable");

    for forbidden in ["std::fs", "std::io", "PathBuf"] {
        assert!(
            !content.contains(forbidden),
            "src/system/procfs/parser.rs uses `{forbidden}`; file access belongs in ProcReader"
        );
    }
}

#[test]
fn format_module_has_no_upward_imports() {
    let format = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/format.rs");
    let content = fs::read_to_string(&format).expect("format.rs readable");

    for forbidden in ["crate::system", "crate::ui", "crate::app"] {
        assert!(
            !content.contains(forbidden),
            "src/format.rs imports `{forbidden}`"
        );
    }
}
