use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn cmd() -> Command {
    Command::cargo_bin("dir-manifest").expect("binary built")
}

fn make_tree(root: &Path, entries: &[(&str, &str)]) {
    for (rel, body) in entries {
        let p = root.join(rel);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, body).unwrap();
    }
}

fn load_manifest(root: &Path, name: &str) -> serde_json::Value {
    let data = fs::read_to_string(root.join(name)).expect("manifest written");
    serde_json::from_str(&data).expect("valid JSON manifest")
}

#[test]
fn writes_manifest_and_prints_summary() {
    let td = tempfile::tempdir().unwrap();
    make_tree(
        td.path(),
        &[
            ("DATA/input.csv", "a,b\n1,2\n"),
            ("run.py", "open(\"DATA/input.csv\").read()\n"),
        ],
    );

    cmd()
        .arg(td.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Directory Manifest Summary"))
        .stdout(predicate::str::contains("run.py"))
        .stdout(predicate::str::contains("DATA/input.csv"));

    let manifest = load_manifest(td.path(), "directory_manifest.json");
    let scripts = manifest["scripts"].as_array().unwrap();
    assert_eq!(scripts.len(), 1);
    assert_eq!(scripts[0]["path"], "run.py");
    assert_eq!(scripts[0]["reads"], serde_json::json!(["DATA/input.csv"]));
}

#[test]
fn quiet_suppresses_summary_but_still_writes() {
    let td = tempfile::tempdir().unwrap();
    make_tree(td.path(), &[("run.py", "open(\"x.txt\", \"w\")\n")]);

    cmd().arg(td.path()).arg("--quiet").assert().success().stdout(predicate::str::is_empty());
    assert!(td.path().join("directory_manifest.json").is_file());
}

#[test]
fn no_weak_edges_removes_mentions_from_json() {
    let td = tempfile::tempdir().unwrap();
    make_tree(
        td.path(),
        &[
            ("notes.txt", "hello\n"),
            // A bare literal with no call: only a weak mention.
            ("run.py", "p = \"notes.txt\"\n"),
        ],
    );

    cmd().arg(td.path()).arg("--quiet").arg("--no-weak-edges").assert().success();

    let manifest = load_manifest(td.path(), "directory_manifest.json");
    for script in manifest["scripts"].as_array().unwrap() {
        assert_eq!(script["related_files"], serde_json::json!([]));
    }
    for file in manifest["files"].as_array().unwrap() {
        assert_eq!(file["mentioned_by"], serde_json::json!([]));
    }
}

#[test]
fn filter_unused_drops_orphan_files() {
    let td = tempfile::tempdir().unwrap();
    make_tree(
        td.path(),
        &[
            ("used.csv", "x\n"),
            ("orphan.bin", "y\n"),
            ("run.py", "open(\"used.csv\")\n"),
        ],
    );

    cmd().arg(td.path()).arg("--quiet").arg("--filter-unused").assert().success();

    let manifest = load_manifest(td.path(), "directory_manifest.json");
    let paths: Vec<&str> = manifest["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"used.csv"));
    assert!(!paths.contains(&"orphan.bin"));
}

#[test]
fn output_flag_renames_the_manifest() {
    let td = tempfile::tempdir().unwrap();
    make_tree(td.path(), &[("run.py", "pass\n")]);

    cmd().arg(td.path()).arg("--quiet").arg("--output").arg("custom.json").assert().success();
    assert!(td.path().join("custom.json").is_file());
    assert!(!td.path().join("directory_manifest.json").exists());
}

#[test]
fn config_file_extends_skip_dirs() {
    let td = tempfile::tempdir().unwrap();
    make_tree(
        td.path(),
        &[
            ("ignored/secret.py", "open(\"a.txt\")\n"),
            ("run.py", "pass\n"),
            ("dir-manifest.toml", "skip_dirs = [\"ignored\"]\n"),
        ],
    );

    cmd().arg(td.path()).arg("--quiet").assert().success();

    let manifest = load_manifest(td.path(), "directory_manifest.json");
    let scripts: Vec<&str> = manifest["scripts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["path"].as_str().unwrap())
        .collect();
    assert_eq!(scripts, vec!["run.py"]);
}

#[test]
fn missing_directory_fails_with_message() {
    cmd()
        .arg("/definitely/not/a/real/dir")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}
