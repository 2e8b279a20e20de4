//! Integration tests for the invoiceme-erd binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn erd_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_invoiceme-erd"))
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    erd_bin().current_dir(dir).args(args).output().unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Stand-in for Graphviz `dot`: answers `-V` and writes a fake image for `-o`.
#[cfg(unix)]
fn fake_dot(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-dot");
    fs::write(
        &path,
        r#"#!/bin/sh
if [ "$1" = "-V" ]; then
  echo "dot - graphviz version 0.0.0-test" >&2
  exit 0
fi
out=""
src=""
while [ $# -gt 0 ]; do
  case "$1" in
    -o) out="$2"; shift ;;
    -T*) ;;
    *) src="$1" ;;
  esac
  shift
done
grep -q "digraph" "$src" || exit 3
printf 'FAKE-IMAGE' > "$out"
"#,
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Graphviz stand-in that always fails to render
#[cfg(unix)]
fn broken_dot(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("broken-dot");
    fs::write(
        &path,
        "#!/bin/sh\nif [ \"$1\" = \"-V\" ]; then exit 0; fi\necho 'Error: syntax error' >&2\nexit 1\n",
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

const DANGLING_CATALOG: &str = r#"
tables:
  - name: users
    columns: ["id (PK)"]
relationships:
  - parent: accounts
    child: users
    column: account_id
    on_delete: CASCADE
"#;

#[test]
fn test_missing_graphviz_exits_without_output() {
    let work = TempDir::new().unwrap();

    let output = run_in(work.path(), &["--dot", "/nonexistent/bin/dot"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Graphviz not installed"));
    assert!(stderr.contains("brew install graphviz"));
    assert!(stderr.contains("sudo apt-get install graphviz"));
    assert!(file_names(work.path()).is_empty());
}

#[cfg(unix)]
#[test]
fn test_render_writes_image_and_source() {
    let bin = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let dot = fake_dot(bin.path());

    let output = run_in(work.path(), &["--dot", dot.to_str().unwrap()]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "ERD diagram generated: erd.png\nERD source file: erd.gv\n"
    );

    assert_eq!(file_names(work.path()), ["erd.gv", "erd.png"]);
    assert_eq!(
        fs::read_to_string(work.path().join("erd.png")).unwrap(),
        "FAKE-IMAGE"
    );

    let source = fs::read_to_string(work.path().join("erd.gv")).unwrap();
    assert!(source.starts_with("// InvoiceMe Database Schema\ndigraph {"));
    assert_eq!(source.matches("arrowhead=crow").count(), 11);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SET_NULL_NOT_NULLABLE"));
    assert!(stderr.contains("ERD: 9 tables, 100 columns, 11 relationships"));
}

#[cfg(unix)]
#[test]
fn test_render_twice_overwrites_same_files() {
    let bin = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let dot = fake_dot(bin.path());

    let first = run_in(work.path(), &["--dot", dot.to_str().unwrap()]);
    let source_before = fs::read(work.path().join("erd.gv")).unwrap();
    let second = run_in(work.path(), &["--dot", dot.to_str().unwrap()]);

    assert!(first.status.success() && second.status.success());
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(file_names(work.path()), ["erd.gv", "erd.png"]);
    assert_eq!(fs::read(work.path().join("erd.gv")).unwrap(), source_before);
}

#[cfg(unix)]
#[test]
fn test_failed_render_leaves_no_files() {
    let bin = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let dot = broken_dot(bin.path());

    let output = run_in(work.path(), &["--dot", dot.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("syntax error"));
    assert!(file_names(work.path()).is_empty());
}

#[cfg(unix)]
#[test]
fn test_render_svg_with_custom_base() {
    let bin = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let dot = fake_dot(bin.path());

    let output = run_in(
        work.path(),
        &[
            "--dot",
            dot.to_str().unwrap(),
            "-o",
            "schema",
            "-f",
            "svg",
            "--json",
        ],
    );

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["image"], "schema.svg");
    assert_eq!(json["source"], "schema.gv");
    assert_eq!(json["format"], "svg");
    assert_eq!(json["graphviz_version"], "dot - graphviz version 0.0.0-test");
    assert_eq!(json["stats"]["table_count"], 9);
    assert_eq!(file_names(work.path()), ["schema.gv", "schema.svg"]);
}

#[test]
fn test_no_render_needs_no_graphviz() {
    let work = TempDir::new().unwrap();

    let output = run_in(
        work.path(),
        &["--no-render", "--dot", "/nonexistent/bin/dot", "--layout", "lr"],
    );

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "ERD source file: erd.gv\n"
    );
    assert_eq!(file_names(work.path()), ["erd.gv"]);

    let source = fs::read_to_string(work.path().join("erd.gv")).unwrap();
    assert!(source.contains("rankdir=LR"));
}

#[test]
fn test_dangling_catalog_fails_before_writing() {
    let work = TempDir::new().unwrap();
    let catalog = work.path().join("catalog.yaml");
    fs::write(&catalog, DANGLING_CATALOG).unwrap();

    let output = run_in(
        work.path(),
        &["--no-render", "--catalog", catalog.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("DANGLING_PARENT"));
    assert_eq!(file_names(work.path()), ["catalog.yaml"]);
}

#[test]
fn test_mismatched_table_case_fails_before_writing() {
    let work = TempDir::new().unwrap();
    let catalog = work.path().join("catalog.yaml");
    fs::write(
        &catalog,
        r#"
tables:
  - name: users
    columns: ["id (PK)"]
  - name: orders
    columns: ["id (PK)", "user_id (FK)"]
relationships:
  - parent: Users
    child: orders
    column: user_id
    on_delete: CASCADE
"#,
    )
    .unwrap();

    let output = run_in(
        work.path(),
        &["--no-render", "--catalog", catalog.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DANGLING_PARENT"));
    assert!(stderr.contains("did you mean 'users'?"));
    assert_eq!(file_names(work.path()), ["catalog.yaml"]);
}

#[test]
fn test_export_rejects_bad_dpi() {
    let work = TempDir::new().unwrap();
    let output = run_in(work.path(), &["export", "--dpi", "0"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("DPI must be between 1 and 2400"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_format_rejected() {
    let work = TempDir::new().unwrap();
    let output = run_in(work.path(), &["--no-render", "-f", "bmp"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown image format"));
    assert!(file_names(work.path()).is_empty());
}

#[test]
fn test_export_dot_to_stdout() {
    let work = TempDir::new().unwrap();
    let output = run_in(work.path(), &["export"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("digraph {"));
    assert!(stdout.contains("users -> activity_feed [label=\"user_id\\n1:N\\nSET NULL\""));
    assert!(file_names(work.path()).is_empty());
}

#[test]
fn test_export_mermaid_by_extension() {
    let work = TempDir::new().unwrap();
    let output = run_in(work.path(), &["export", "-o", "schema.mmd", "--tables", "invoice*,line_items"]);

    assert!(output.status.success());
    let content = fs::read_to_string(work.path().join("schema.mmd")).unwrap();
    assert!(content.contains("erDiagram"));
    assert!(content.contains("invoices ||--o{ line_items"));
    assert!(!content.contains("customers {"));
}

#[test]
fn test_check_builtin() {
    let work = TempDir::new().unwrap();

    let output = run_in(work.path(), &["check", "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["table_count"], 9);
    assert_eq!(json["relationship_count"], 11);
    assert_eq!(json["error_count"], 0);
    assert_eq!(json["warning_count"], 1);

    let strict = run_in(work.path(), &["check", "--strict"]);
    assert_eq!(strict.status.code(), Some(1));
}

#[test]
fn test_check_dangling_catalog() {
    let work = TempDir::new().unwrap();
    let catalog = work.path().join("catalog.yaml");
    fs::write(&catalog, DANGLING_CATALOG).unwrap();

    let output = run_in(work.path(), &["check", "-c", catalog.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR [DANGLING_PARENT]"));
    assert!(stderr.contains("ERROR [MISSING_FK_COLUMN]"));
}

#[test]
fn test_completions() {
    let work = TempDir::new().unwrap();
    let output = run_in(work.path(), &["completions", "bash"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("invoiceme-erd"));
}
