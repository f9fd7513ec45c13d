use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn kommstat_bin() -> &'static str {
    env!("CARGO_BIN_EXE_kommstat")
}

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).expect("failed to write test file");
}

fn run_in(dir: &Path) -> String {
    let output = Command::new(kommstat_bin())
        .current_dir(dir)
        .output()
        .expect("failed to execute kommstat");
    assert!(
        output.status.success(),
        "expected success, got status {:?}, stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn cli_sums_counts_across_nested_directories() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let src_dir = temp_dir.path().join("src");
    let nested = src_dir.join("components").join("nav");
    fs::create_dir_all(&nested).expect("failed to create nested directories");

    write_file(
        &src_dir.join("a.js"),
        "// header\nfunction f() {\n  return 1;\n}\n",
    );
    write_file(&nested.join("b.jsx"), "/**\n * doc\n */\n");
    // Non-matching files must be ignored without affecting the totals.
    write_file(&src_dir.join("types.ts"), "const x: number = 1;\n");
    write_file(&src_dir.join("notes.md"), "# notes\n");

    let stdout = run_in(temp_dir.path());
    assert!(
        stdout.contains("Gesamtanzahl Zeilen:  7"),
        "unexpected total: {stdout}"
    );
    assert!(
        stdout.contains("Codezeilen:  3 (42.86%)"),
        "unexpected code totals: {stdout}"
    );
    assert!(
        stdout.contains("Kommentarzeilen:  4 (57.14%)"),
        "unexpected comment totals: {stdout}"
    );
    assert!(
        stdout.contains("Dokumentationszeilen:  0 (0.00%)"),
        "unexpected doc totals: {stdout}"
    );
}

#[test]
fn cli_counts_doc_lines_outside_blocks() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let src_dir = temp_dir.path().join("src");
    fs::create_dir(&src_dir).expect("failed to create src directory");
    write_file(
        &src_dir.join("doc.js"),
        "* @returns the answer\nexport default f;\n",
    );

    let stdout = run_in(temp_dir.path());
    assert!(
        stdout.contains("Gesamtanzahl Zeilen:  2"),
        "unexpected total: {stdout}"
    );
    assert!(
        stdout.contains("Dokumentationszeilen:  1 (50.00%)"),
        "unexpected doc totals: {stdout}"
    );
    assert!(
        stdout.contains("Codezeilen:  1 (50.00%)"),
        "unexpected code totals: {stdout}"
    );
}

#[test]
fn cli_skips_blank_lines_entirely() {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let src_dir = temp_dir.path().join("src");
    fs::create_dir(&src_dir).expect("failed to create src directory");
    write_file(&src_dir.join("sparse.js"), "\n\nlet a = 1;\n\n\n// done\n\n");

    let stdout = run_in(temp_dir.path());
    assert!(
        stdout.contains("Gesamtanzahl Zeilen:  2"),
        "blank lines must not be counted: {stdout}"
    );
    assert!(
        stdout.contains("Codezeilen:  1 (50.00%)"),
        "unexpected code totals: {stdout}"
    );
    assert!(
        stdout.contains("Kommentarzeilen:  1 (50.00%)"),
        "unexpected comment totals: {stdout}"
    );
}
