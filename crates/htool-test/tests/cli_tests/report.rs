//! JUnit report and harness config tests.

use super::{WELL_BEHAVED_TOOL, Workspace, htool_test};
use predicates::prelude::*;
use std::time::Duration;

#[test]
fn test_report_written_to_default_path() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[("macho-test_no-file", "", "htoolv3-tests/missing.macho")]);
    let tool = ws.tool(WELL_BEHAVED_TOOL);

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("report: test.xml"));

    let xml = ws.read("test.xml");
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<testsuite name=\"macho-tests\""));
    assert!(xml.contains("classname=\"macho-tests.macho-test_no-file\""));
    assert!(xml.contains("name=\"File does not exist\""));
    assert!(!xml.contains("<failure"));
}

#[test]
fn test_report_records_failures() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[("macho-test_no-file", "", "htoolv3-tests/missing.macho")]);
    let tool = ws.tool("#!/bin/sh\necho \"[Error] libhelper: bad magic\"\n");

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(1);

    let xml = ws.read("test.xml");
    assert!(xml.contains("message=\"Failed to detect nonexistent file\""));
    assert!(xml.contains("0: libhelper: bad magic"));
}

#[test]
fn test_report_output_override() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[("macho-test_no-file", "", "htoolv3-tests/missing.macho")]);
    let tool = ws.tool(WELL_BEHAVED_TOOL);

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .args(["--output", "reports/junit.xml"])
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0);

    assert!(ws.path().join("reports/junit.xml").exists());
    assert!(!ws.path().join("test.xml").exists());
}

#[test]
fn test_harness_config_file_is_applied() {
    let ws = Workspace::new();
    fs_rename_fixtures(&ws, "fixtures");
    ws.write(
        "htool-test.config.yaml",
        "fixtures-dir: fixtures\nreport-path: out/results.xml\n",
    );
    let manifest = ws.manifest(&[("macho-test_no-file", "", "fixtures/missing.macho")]);
    let tool = ws.tool(WELL_BEHAVED_TOOL);

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0);

    assert!(ws.path().join("out/results.xml").exists());
}

#[test]
fn test_harness_config_unknown_key_is_config_error() {
    let ws = Workspace::new();
    ws.write("htool-test.config.yaml", "parallel: 4\n");
    let manifest = ws.manifest(&[("macho-test_no-file", "", "htoolv3-tests/missing.macho")]);

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .args(["-b", "/bin/true"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load harness config"));
}

fn fs_rename_fixtures(ws: &Workspace, to: &str) {
    std::fs::rename(ws.path().join(super::FIXTURES_DIR), ws.path().join(to)).unwrap();
}
