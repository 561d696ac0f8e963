// rewrite/tests/cli_integration_tests.rs
//! Command-line integration tests for the `rewrite` binary.
//!
//! Each test writes a YAML configuration to a temporary file, runs the binary
//! through `assert_cmd` and checks stdout, stderr and the exit code.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const CONFIG: &str = r##"
maps:
  people:
    alice: bob
contexts:
  - name: default
    rules:
      - pattern: "^(.+),dc=example,dc=com$"
        replacement: "%1,dc=example,dc=org"
  - name: bindDN
    rules:
      - pattern: "^cn=Manager,"
        replacement: "%0"
        flags: "#"
      - pattern: "^cn=guest,"
        replacement: "%0"
        flags: ":U{49}"
      - pattern: "^uid=([^,]+),(.+)$"
        replacement: "uid=%{people(%1)},%2"
        flags: ":"
  - name: searchBase
    alias: default
"##;

fn write_config(text: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(text.as_bytes())?;
    Ok(file)
}

fn rewrite_cmd() -> Command {
    let mut cmd = Command::cargo_bin("rewrite").unwrap();
    cmd.env_remove("REWRITE_CONFIG");
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_apply_positional_inputs() -> Result<()> {
    let config = write_config(CONFIG)?;
    rewrite_cmd()
        .args(["apply", "--config"])
        .arg(config.path())
        .args(["--context", "searchBase", "uid=alice,dc=example,dc=com", "o=untouched"])
        .assert()
        .success()
        .stdout("uid=alice,dc=example,dc=org\no=untouched\n");
    Ok(())
}

#[test]
fn test_apply_reads_stdin_lines() -> Result<()> {
    let config = write_config(CONFIG)?;
    rewrite_cmd()
        .args(["-q", "apply", "--config"])
        .arg(config.path())
        .write_stdin("ou=a,dc=example,dc=com\nou=b,dc=example,dc=com\n")
        .assert()
        .success()
        .stdout("ou=a,dc=example,dc=org\nou=b,dc=example,dc=org\n")
        .stderr(predicate::str::is_empty());
    Ok(())
}

#[test]
fn test_apply_skips_invalid_utf8_stdin_lines() -> Result<()> {
    let config = write_config(CONFIG)?;
    let mut input = b"ou=a,dc=example,dc=com\n".to_vec();
    input.extend_from_slice(b"\xff\xfe\n");
    input.extend_from_slice(b"ou=b,dc=example,dc=com\r\n");
    rewrite_cmd()
        .args(["apply", "--config"])
        .arg(config.path())
        .write_stdin(input)
        .assert()
        .code(1)
        .stdout("ou=a,dc=example,dc=org\nou=b,dc=example,dc=org\n")
        .stderr(predicate::str::contains("Skipping stdin line 2: invalid UTF-8"));
    Ok(())
}

#[test]
fn test_apply_unknown_context_falls_back_to_default() -> Result<()> {
    let config = write_config(CONFIG)?;
    rewrite_cmd()
        .args(["apply", "--config"])
        .arg(config.path())
        .args(["--context", "nope", "cn=x,dc=example,dc=com"])
        .assert()
        .success()
        .stdout("cn=x,dc=example,dc=org\n")
        .stderr(predicate::str::contains("Context 'nope' not found, using 'default'"));
    Ok(())
}

#[test]
fn test_apply_unwilling_exit_code() -> Result<()> {
    let config = write_config(CONFIG)?;
    rewrite_cmd()
        .args(["apply", "--config"])
        .arg(config.path())
        .args(["--context", "bindDN", "cn=Manager,dc=example,dc=com"])
        .assert()
        .code(53)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unwilling to perform"));
    Ok(())
}

#[test]
fn test_apply_user_code_exit_code() -> Result<()> {
    let config = write_config(CONFIG)?;
    rewrite_cmd()
        .args(["apply", "--config"])
        .arg(config.path())
        .args(["--context", "bindDN", "uid=alice,ou=people", "cn=guest,o=x"])
        .assert()
        .code(49)
        .stdout("uid=bob,ou=people\n");
    Ok(())
}

#[test]
fn test_apply_json_output() -> Result<()> {
    let config = write_config(CONFIG)?;
    let assert = rewrite_cmd()
        .args(["apply", "--json", "--config"])
        .arg(config.path())
        .args(["--context", "bindDN", "uid=alice,ou=people", "uid=carol,ou=people", "cn=Manager,o=x"])
        .assert()
        .code(1);

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["output"], "uid=bob,ou=people");
    assert_eq!(lines[0]["outcome"]["status"], "rewritten");
    assert_eq!(lines[0]["context"], "bindDN");

    assert!(lines[1]["error"].as_str().unwrap().contains("carol"));
    assert!(lines[1].get("outcome").is_none());

    assert_eq!(lines[2]["outcome"]["status"], "unwilling");
    assert!(lines[2].get("output").is_none());
    Ok(())
}

#[test]
fn test_apply_rejects_broken_config() -> Result<()> {
    let config = write_config(
        r#"
contexts:
  - name: default
    rules:
      - pattern: "(unclosed"
        replacement: "x"
"#,
    )?;
    rewrite_cmd()
        .args(["apply", "--config"])
        .arg(config.path())
        .arg("x")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to compile 1 rewrite rule(s)"));
    Ok(())
}

#[test]
fn test_apply_missing_config_file() {
    rewrite_cmd()
        .args(["apply", "--config", "/nonexistent/rewrite.yaml", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_check_lists_contexts() -> Result<()> {
    let config = write_config(CONFIG)?;
    rewrite_cmd()
        .args(["check", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("default\t1 rule(s)"))
        .stdout(predicate::str::contains("bindDN\t3 rule(s)"))
        .stdout(predicate::str::contains("searchBase\t-> default"))
        .stderr(predicate::str::contains("Configuration OK: 2 context(s), 1 alias(es), 4 rule(s)."));
    Ok(())
}

#[test]
fn test_check_reports_invalid_flags() -> Result<()> {
    let config = write_config(
        r#"
contexts:
  - name: default
    rules:
      - pattern: "a"
        replacement: "b"
        flags: "U{0}"
"#,
    )?;
    rewrite_cmd()
        .args(["check", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("rule 0"));
    Ok(())
}

#[test]
fn test_no_arguments_prints_help() {
    rewrite_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
