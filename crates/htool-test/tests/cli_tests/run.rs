//! Suite execution tests.

use super::{WELL_BEHAVED_TOOL, Workspace, htool_test};
use predicates::prelude::*;
use std::time::Duration;

#[test]
fn test_run_all_cases_pass() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[
        (
            "macho-test_valid-macho-file",
            "",
            "htoolv3-tests/valid.macho",
        ),
        ("macho-test_invalid-macho", "", "htoolv3-tests/invalid.macho"),
        ("macho-test_no-file", "", "htoolv3-tests/missing.macho"),
    ]);
    let tool = ws.tool(WELL_BEHAVED_TOOL);

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("running 3 test cases for macho-tests"))
        .stdout(predicate::str::contains(
            "test result: ok. 15 passed; 0 failed; 0 skipped",
        ));
}

#[test]
fn test_run_missing_marker_fails() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[(
        "macho-test_valid-macho-file",
        "",
        "htoolv3-tests/valid.macho",
    )]);
    let tool = ws.tool("#!/bin/sh\necho \"[TEST_CI] File successfully loaded\"\n");

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed to print Mach-O Header"))
        .stdout(predicate::str::contains("3 failed"));
}

#[test]
fn test_run_tool_error_fails() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[("macho-test_no-file", "", "htoolv3-tests/missing.macho")]);
    let tool = ws.tool(
        "#!/bin/sh\necho \"[TEST_CI] File does not exist\"\nprintf '\\033[31m[*Error*] could not open file\\033[0m\\n' >&2\n",
    );

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("tool-errors ... FAILED"))
        .stdout(predicate::str::contains("0: could not open file"));
}

#[test]
fn test_run_warnings_are_skipped() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[("macho-test_no-file", "", "htoolv3-tests/missing.macho")]);
    let tool = ws.tool(
        "#!/bin/sh\necho \"[TEST_CI] File does not exist\"\necho \"[Warning] unusual header\"\n",
    );

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("warnings ... skipped"))
        .stdout(predicate::str::contains("1 skipped"));
}

#[test]
fn test_run_flags_reach_the_tool() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[(
        "macho-test_valid-fat-with-arch",
        "--arch=arm64e",
        "htoolv3-tests/fat.macho",
    )]);
    let tool = ws.tool(
        r#"#!/bin/sh
[ "$1" = "--arch=arm64e" ] || exit 9
echo "[TEST_CI] File successfully loaded"
echo "[TEST_CI] Printed Mach-O Header"
echo "[TEST_CI] Printed Mach-O Segment Commands"
echo "[TEST_CI] Printed Mach-O Load Commands"
echo "  CPU: arm64e (ARMv8.5-A, MTE)"
"#,
    );

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("8 passed; 0 failed"));
}

#[test]
fn test_run_arch_override() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[(
        "macho-test_valid-fat-with-arch",
        "",
        "htoolv3-tests/fat.macho",
    )]);
    let tool = ws.tool(
        r#"#!/bin/sh
echo "[TEST_CI] File successfully loaded"
echo "[TEST_CI] Printed Mach-O Header"
echo "[TEST_CI] Printed Mach-O Segment Commands"
echo "[TEST_CI] Printed Mach-O Load Commands"
echo "CPU: x86_64"
"#,
    );

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("CPU: x86_64"));

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .args(["--arch", "x86_64"])
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0);
}

#[test]
fn test_run_segfault_line_fails() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[("macho-test_no-file", "", "htoolv3-tests/missing.macho")]);
    let tool = ws.tool(
        "#!/bin/sh\necho \"[TEST_CI] File does not exist\"\necho \"zsh: segmentation fault  htool\"\n",
    );

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("macho-tests.segfault::segfault"));
}

#[test]
fn test_run_exit_status_check_is_opt_in() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[(
        "macho-test_valid-macho-file",
        "",
        "htoolv3-tests/valid.macho",
    )]);
    let tool = ws.tool(&WELL_BEHAVED_TOOL.replace("Load Commands\"", "Load Commands\"; exit 4"));

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0);

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .arg("--check-exit-status")
        .timeout(Duration::from_secs(60))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Process exited with status 4"));
}

#[test]
fn test_run_unknown_case_is_reported_not_run() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[
        ("macho-test_bogus", "", "htoolv3-tests/bogus.macho"),
        ("macho-test_no-file", "", "htoolv3-tests/missing.macho"),
    ]);
    let tool = ws.tool(WELL_BEHAVED_TOOL);

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0)
        .stderr(predicate::str::contains("unknown test case: macho-test_bogus"))
        .stdout(predicate::str::contains("4 passed; 0 failed"));
}

#[test]
fn test_run_unknown_suite_is_reported() {
    let ws = Workspace::new();
    let manifest = ws.manifest_for(
        "kernel-tests",
        "https://example.invalid/htoolv3-tests.git",
        &[("macho-test_no-file", "", "htoolv3-tests/missing.macho")],
    );
    let tool = ws.tool(WELL_BEHAVED_TOOL);

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0)
        .stderr(predicate::str::contains("unknown test suite: kernel-tests"));
}

#[test]
fn test_run_timeout_fails_case_and_continues() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[
        ("macho-test_valid-macho-file", "", "htoolv3-tests/slow.macho"),
        ("macho-test_no-file", "", "htoolv3-tests/missing.macho"),
    ]);
    let tool = ws.tool(
        r#"#!/bin/sh
for last; do :; done
case "$last" in
  *slow.macho) sleep 5 ;;
  *) echo "[TEST_CI] File does not exist" ;;
esac
"#,
    );

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .args(["--timeout", "300"])
        .timeout(Duration::from_secs(60))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Execution timed out after 300ms"))
        .stdout(predicate::str::contains("case macho-test_no-file ... ok"));
}

#[test]
fn test_run_missing_manifest_is_config_error() {
    let ws = Workspace::new();
    htool_test(&ws)
        .args(["-c", "does-not-exist.yaml", "-b", "/bin/true"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load config file"));
}

#[test]
fn test_run_malformed_manifest_is_config_error() {
    let ws = Workspace::new();
    ws.write("tests.yaml", "TestSuite: [not, a, suite\n");
    htool_test(&ws)
        .args(["-c", "tests.yaml", "-b", "/bin/true"])
        .assert()
        .code(2);
}

#[test]
fn test_run_clone_failure_is_execution_error() {
    let ws = Workspace::without_fixtures();
    let remote = ws.path().join("no-such-repo");
    let manifest = ws.manifest_for(
        "macho-tests",
        &remote.display().to_string(),
        &[("macho-test_no-file", "", "htoolv3-tests/missing.macho")],
    );

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .args(["-b", "/bin/true"])
        .timeout(Duration::from_secs(60))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to acquire tests repository"));
    assert!(!ws.path().join("htoolv3-tests").exists());
}

#[test]
fn test_run_verbose_prints_case_table() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[("macho-test_no-file", "", "htoolv3-tests/missing.macho")]);
    let tool = ws.tool(WELL_BEHAVED_TOOL);

    htool_test(&ws)
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .arg("-v")
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("=== Test Cases ==="))
        .stdout(predicate::str::contains("File does not exist ... ok"));
}

#[test]
fn test_run_no_color_keeps_stderr_plain() {
    let ws = Workspace::new();
    let manifest = ws.manifest(&[
        ("macho-test_bogus", "", "htoolv3-tests/bogus.macho"),
        ("macho-test_no-file", "", "htoolv3-tests/missing.macho"),
    ]);
    let tool = ws.tool(WELL_BEHAVED_TOOL);

    // Unknown cases are logged at warn level, so stderr carries tracing output
    htool_test(&ws)
        .env("RUST_LOG", "htool_test_core=debug")
        .arg("-c")
        .arg(&manifest)
        .arg("-b")
        .arg(&tool)
        .timeout(Duration::from_secs(60))
        .assert()
        .code(0)
        .stderr(predicate::str::contains("unknown test case"))
        .stderr(predicate::str::contains("\x1b[").not())
        .stdout(predicate::str::contains("\x1b[").not());
}
