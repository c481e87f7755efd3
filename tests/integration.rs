use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_hdrscan")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// -- scan mode --

#[test]
fn scans_header_to_stdout() {
    let assert = cmd().arg(fixture_path("log.h")).assert().success();
    let json = stdout_json(assert.get_output());
    let log = &json["log"];

    assert_eq!(log["name"], "log");
    let class = &log["types"]["ta_log"];
    assert_eq!(class["cname"], "ta_log_t");
    assert_eq!(
        class["description"],
        "Logging domain. Messages below the domain level are dropped."
    );
    assert_eq!(class["constructor"]["cname"], "ta_log_new");
    assert_eq!(class["constructor"]["rtype"], "ta_log_t *");
    assert_eq!(class["destructor"]["cname"], "ta_log_free");

    // set_handler is reserved and never listed
    let methods = class["methods"].as_array().unwrap();
    assert_eq!(methods.len(), 1);
    assert_eq!(methods[0]["name"]["name"], "info");
    assert_eq!(methods[0]["name"]["class"], "ta_log");
    assert_eq!(methods[0]["since"], "0.2");

    let params = methods[0]["params"].as_array().unwrap();
    assert_eq!(params.len(), 3);
    assert_eq!(params[1]["name"], "fmt");
    assert_eq!(params[1]["type"], "const char *");
    assert_eq!(params[1]["modifiers"][0], "format");
    assert_eq!(params[2]["variadic"], true);
}

#[test]
fn enums_functions_and_delegates() {
    let assert = cmd().arg(fixture_path("log.h")).assert().success();
    let json = stdout_json(assert.get_output());
    let log = &json["log"];

    let level = &log["enums"][0];
    assert_eq!(level["name"], "ta_log_level_t");
    assert_eq!(level["isflags"], true);
    assert_eq!(
        level["entries"],
        serde_json::json!(["TA_LOG_DEBUG", "TA_LOG_INFO", "TA_LOG_ERROR"])
    );

    let functions = log["functions"].as_array().unwrap();
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0]["cname"], "ta_log_default");
    assert_eq!(functions[0]["return"]["type"], "ta_log");
    assert!(functions[0]["params"].as_array().unwrap().is_empty());

    let handler = &log["delegates"]["ta_log_handler"];
    assert_eq!(handler["cname"], "ta_log_handler_t");
    assert_eq!(handler["rtype"], "void");
    assert_eq!(handler["params"][2]["doc"], "Formatted message");
}

#[test]
fn compact_output_by_default() {
    let assert = cmd().arg(fixture_path("iri.h")).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.ends_with('\n'));
}

#[test]
fn indent_option_pretty_prints() {
    cmd()
        .args(["-i", "2"])
        .arg(fixture_path("iri.h"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{\n  \"iri\": {\n    \"name\": \"iri\""));
}

#[test]
fn output_option_writes_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("api.json");

    cmd()
        .arg("-o")
        .arg(&out)
        .arg(fixture_path("iri.h"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["iri"]["types"]["ta_iri"]["cname"], "ta_iri_t");
}

#[test]
fn lib_prefix_shortens_type_keys() {
    let assert = cmd()
        .args(["--lib-prefix", "ta_"])
        .arg(fixture_path("iri.h"))
        .assert()
        .success();
    let json = stdout_json(assert.get_output());
    let iri = &json["iri"]["types"]["iri"];

    assert_eq!(iri["cname"], "ta_iri_t");
    assert_eq!(iri["constructor"]["cname"], "ta_iri_new");
    assert_eq!(iri["destructor"]["cname"], "ta_iri_free");
    assert_eq!(iri["methods"][0]["raise"][0], "TA_IRI_PARSING_ERROR");
    assert_eq!(iri["methods"][0]["return"]["type"], "bool");
}

#[test]
fn modules_keep_input_order() {
    let assert = cmd()
        .args([fixture_path("log.h"), fixture_path("iri.h")])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let log = stdout.find("\"log\":").unwrap();
    let iri = stdout.find("\"iri\":").unwrap();
    assert!(log < iri);
}

#[test]
fn glob_patterns_expand() {
    let dir = TempDir::new().unwrap();
    for name in ["iri.h", "log.h"] {
        std::fs::copy(fixture_path(name), dir.path().join(name)).unwrap();
    }
    let pattern = format!("{}/*.h", dir.path().display());

    let assert = cmd().arg(&pattern).assert().success();
    let json = stdout_json(assert.get_output());
    let names: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(names, vec!["iri", "log"]);
}

// -- failures --

#[test]
fn failed_file_is_skipped_and_reported() {
    let assert = cmd()
        .args([fixture_path("broken.h"), fixture_path("iri.h")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such class ta_missing"));
    let json = stdout_json(assert.get_output());
    assert!(json.get("broken").is_none());
    assert_eq!(json["iri"]["name"], "iri");
}

#[test]
fn undocumented_function_warns_but_succeeds() {
    let dir = TempDir::new().unwrap();
    let header = dir.path().join("util.h");
    std::fs::write(&header, "int ta_util_count (void);\n").unwrap();

    let assert = cmd()
        .arg(header.to_str().unwrap())
        .assert()
        .success()
        .stderr(predicate::str::contains("ta_util_count"));
    let json = stdout_json(assert.get_output());
    assert!(json["util"]["functions"].as_array().unwrap().is_empty());
}

#[test]
fn quiet_hides_warnings() {
    let dir = TempDir::new().unwrap();
    let header = dir.path().join("util.h");
    std::fs::write(&header, "int ta_util_count (void);\n").unwrap();

    cmd()
        .args(["-q", header.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn no_input_files_is_an_error() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input files given"));
}

#[test]
fn unmatched_pattern_yields_empty_model() {
    cmd()
        .arg("/nonexistent/dir/nothing.h")
        .assert()
        .success()
        .stdout("{}\n")
        .stderr(predicate::str::contains("no files matched"));
}

// -- self-test mode --

#[test]
fn run_tests_passes() {
    cmd()
        .arg("--run-tests")
        .assert()
        .success()
        .stdout(predicate::str::contains("ok").and(predicate::str::contains("FAILED").not()));
}
