use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const ORDER: &str = "Cub Scout Pack 361 - Adventure Loop Order\n\
Qty SKU Item Scouts Price\n\
2 619938 Air of the Wolf Adventure Blaine R, Charlie R $3.98\n\
1 660252 Bobcat (Bear) Adventure Ethan Y $1.99\n";

fn loopsheet() -> Command {
    Command::cargo_bin("loopsheet").unwrap()
}

#[test]
fn classify_prints_den() {
    loopsheet()
        .args(["classify", "660252", "123456"])
        .assert()
        .success()
        .stdout(predicate::str::contains("660252 Bear"))
        .stdout(predicate::str::contains("123456 Cub Scout"));
}

#[test]
fn classify_json() {
    loopsheet()
        .args(["classify", "--json", "619938"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""619938": "Wolf""#));
}

#[test]
fn parse_text_file_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("order.txt");
    fs::write(&input, ORDER).unwrap();

    loopsheet()
        .arg("parse")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""pack_number": "361""#))
        .stdout(predicate::str::contains("619938"))
        .stdout(predicate::str::contains("Charlie R"));
}

#[test]
fn parse_uses_pack_override_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("order.txt");
    fs::write(&input, "1 619939 Code of the Wolf Blaine R $1.99\n").unwrap();

    loopsheet()
        .args(["parse", "--format", "csv", "--pack", "42"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("42,Blaine R,619939,Code of the Wolf,Wolf"))
        .stderr(predicate::str::contains("No pack number found"));
}

#[test]
fn parse_rejects_unsupported_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("order.docx");
    fs::write(&input, ORDER).unwrap();

    loopsheet()
        .arg("parse")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn parse_rejects_fake_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("order.pdf");
    fs::write(&input, ORDER).unwrap();

    loopsheet()
        .arg("parse")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a PDF"));
}

#[test]
fn generate_writes_both_documents() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("order.txt");
    fs::write(&input, ORDER).unwrap();
    let out = dir.path().join("out");

    loopsheet()
        .args(["generate", "--no-images", "--template", "8163", "--output-dir"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pack 361: 3 scouts, 3 loops"));

    for name in ["Pack_361_Shopping_Guide.pdf", "Pack_361_Labels_8163.pdf"] {
        let bytes = fs::read(out.join(name)).unwrap();
        assert!(bytes.starts_with(b"%PDF-"), "{} is not a PDF", name);
    }
}

#[test]
fn generate_rejects_unknown_template() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("order.txt");
    fs::write(&input, ORDER).unwrap();

    loopsheet()
        .args(["generate", "--what", "labels", "--template", "1234", "--output-dir"])
        .arg(dir.path())
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown label template: 1234"));
}

#[test]
fn config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");

    loopsheet()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    loopsheet()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "labels.template", "8164"])
        .assert()
        .success();

    loopsheet()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "labels.template"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""8164""#));

    loopsheet()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "labels.nope", "1"])
        .assert()
        .failure();
}

#[test]
fn generate_rejects_pack_number_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("order.txt");
    fs::write(&input, "1 619939 Code of the Wolf Blaine R $1.99\n").unwrap();
    let out = dir.path().join("out");

    loopsheet()
        .args(["generate", "--no-images", "--pack", "../escape", "--output-dir"])
        .arg(&out)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used in a file name"));

    assert!(!dir.path().join("escape_Shopping_Guide.pdf").exists());
    assert!(!out.exists());
}
