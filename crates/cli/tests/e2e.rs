use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn bin() -> Command {
    Command::cargo_bin("tpu-compat").expect("binary exists")
}

fn demo_graph(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let crate_dir = PathBuf::from(manifest_dir);
    let ws_root = crate_dir.parent().and_then(|p| p.parent()).expect("ws root");
    ws_root.join("demos/graphs").join(name)
}

#[test]
fn list_ops_runs() {
    let mut cmd = bin();
    cmd.arg("list-ops");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("MatMul"))
        .stdout(predicate::str::contains("CrossReplicaSum"));
}

#[test]
fn check_simple_json_reports_incompatible() {
    let mut cmd = bin();
    cmd.arg("check").arg("--input").arg(demo_graph("simple.json"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "check ok: name=mnist-train nodes=5 visited=7 compatible=5 incompatible=2",
        ))
        .stdout(predicate::str::contains("incompatible: metrics/custom op=LegacyCounter"))
        .stdout(predicate::str::contains("incompatible: dense/relu/summary op=ScalarSummary"));
}

#[test]
fn check_yaml_all_compatible() {
    let mut cmd = bin();
    cmd.arg("check")
        .arg("--input")
        .arg(demo_graph("all_compatible.yaml"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "check ok: name=inference nodes=4 visited=4 compatible=4 incompatible=0",
        ));
}

#[test]
fn check_missing_input_fails_gracefully() {
    let mut cmd = bin();
    cmd.arg("check").arg("--input").arg("no/such/graph.json");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn annotate_writes_flags_and_summary() {
    let _ = std::fs::create_dir_all("target");
    let out = PathBuf::from("target/test-annotated.json");
    let _ = std::fs::remove_file(&out);

    let mut cmd = bin();
    cmd.arg("annotate")
        .arg("--input")
        .arg(demo_graph("simple.json"))
        .arg("--output")
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("annotate completed"));

    let data = std::fs::read_to_string(&out).expect("annotated graph written");
    let v: serde_json::Value = serde_json::from_str(&data).expect("valid json");
    assert_eq!(
        v.pointer("/nodes/dense~1matmul/compatible").and_then(|x| x.as_bool()),
        Some(true)
    );
    assert_eq!(
        v.pointer("/nodes/metrics~1custom/compatible").and_then(|x| x.as_bool()),
        Some(false)
    );
    let meta = v.pointer("/attributes/compatibility").expect("summary attribute");
    assert_eq!(meta.get("visited").and_then(|x| x.as_u64()), Some(7));
    assert_eq!(meta.get("incompatible").and_then(|x| x.as_u64()), Some(2));
}

#[test]
fn annotate_with_dumps() {
    let _ = std::fs::create_dir_all("target");
    let mut cmd = bin();
    cmd.args([
        "annotate",
        "--input",
        demo_graph("simple.json").to_str().expect("path"),
        "--pipeline",
        "validate,compat",
        "--dump-dir",
        "target/test-dumps",
        "--dump-format",
        "json,yaml",
        "--output",
        "target/test-annotated-dumps.json",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("annotate completed"));

    assert!(std::fs::metadata("target/test-dumps/01_compat.json").is_ok());
    assert!(std::fs::metadata("target/test-dumps/01_compat.yaml").is_ok());
}

#[test]
fn annotate_unknown_pass_errors() {
    let mut cmd = bin();
    cmd.args([
        "annotate",
        "--input",
        demo_graph("simple.json").to_str().expect("path"),
        "--pipeline",
        "frobnicate",
    ]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("unknown pass 'frobnicate'"));
}

#[test]
fn annotate_stdout_when_no_output() {
    let mut cmd = bin();
    cmd.arg("annotate")
        .arg("--input")
        .arg(demo_graph("all_compatible.yaml"))
        .arg("--format")
        .arg("yaml");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("compatible: true"));
}
