use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tempfile::{tempdir, TempDir};

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sealog"))
}

/// Command isolated from the caller's environment and config.
fn sealog(home: &TempDir) -> Command {
    let mut cmd = Command::new(bin());
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path())
        .env_remove("SEALOG_LOG_KEY")
        .env_remove("SEALOG_FILE_PATH")
        .env_remove("SEALOG_CONFIG")
        .env_remove("SEALOG_LOG");
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &[u8]) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn sealog");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input)
        .expect("write stdin");
    child.wait_with_output().expect("wait for sealog")
}

fn ingest(home: &TempDir, out: &Path, extra: &[&str], input: &[u8]) -> Output {
    let mut cmd = sealog(home);
    cmd.arg("--file-path").arg(out).args(extra);
    run_with_stdin(cmd, input)
}

fn replay(home: &TempDir, out: &Path, extra: &[&str]) -> Output {
    let mut cmd = sealog(home);
    cmd.arg("--debug").arg("--file-path").arg(out).args(extra);
    cmd.stdin(Stdio::null());
    cmd.output().expect("run sealog --debug")
}

#[test]
fn test_plaintext_lines_written_verbatim() {
    let home = tempdir().expect("tempdir");
    let out = home.path().join("plain.log");

    let output = ingest(&home, &out, &[], b"first line\nsecond line\n");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        std::fs::read_to_string(&out).expect("read output"),
        "first line\nsecond line\n"
    );
}

#[test]
fn test_encrypted_lines_replay() {
    let home = tempdir().expect("tempdir");
    let out = home.path().join("sealed.log");

    let output = ingest(
        &home,
        &out,
        &["--log-key", "secret"],
        b"hello\nPLAINTEXT_MARKER_123\n",
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let on_disk = std::fs::read_to_string(&out).expect("read output");
    assert!(!on_disk.contains("hello"));
    assert!(!on_disk.contains("PLAINTEXT_MARKER_123"));
    for record in on_disk.lines() {
        let blob = STANDARD.decode(record).expect("record is base64");
        assert!(blob.len() >= 12 + 16);
    }

    let shown = replay(&home, &out, &["--log-key", "secret"]);
    assert!(shown.status.success());
    let stdout = String::from_utf8_lossy(&shown.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "hello");
    assert_eq!(lines[2], "---");
    assert_eq!(lines[4], "PLAINTEXT_MARKER_123");
}

#[test]
fn test_replay_wrong_key_reports_every_record() {
    let home = tempdir().expect("tempdir");
    let out = home.path().join("sealed.log");

    let output = ingest(&home, &out, &["--log-key", "secret"], b"one\ntwo\n");
    assert!(output.status.success());

    let shown = replay(&home, &out, &["--log-key", "not-the-key", "--format", "json"]);
    assert_eq!(shown.status.code(), Some(5));

    let stdout = String::from_utf8_lossy(&shown.stdout);
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(records.len(), 2);
    for record in &records {
        assert!(record["decoded"].is_null());
        assert_eq!(record["error"], "Record failed authentication");
    }
}

#[test]
fn test_flow_speed_drops_excess_lines() {
    let home = tempdir().expect("tempdir");
    let out = home.path().join("throttled.log");

    let output = ingest(&home, &out, &["--flow-speed", "2"], b"1\n2\n3\n4\n5\n");

    assert!(output.status.success());
    assert_eq!(std::fs::read_to_string(&out).expect("read output"), "1\n2\n");
}

#[test]
fn test_short_passphrase_rejected() {
    let home = tempdir().expect("tempdir");
    let out = home.path().join("never.log");

    let output = ingest(&home, &out, &["--log-key", "abc"], b"");

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least 4 characters"));
    assert!(!out.exists());
}

#[test]
fn test_missing_path_rejected() {
    let home = tempdir().expect("tempdir");

    let output = run_with_stdin(sealog(&home), b"");

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("No output path"));
}

#[test]
fn test_config_file_supplies_settings() {
    let home = tempdir().expect("tempdir");
    let out = home.path().join("configured.log");
    let config_dir = home.path().join("sealog");
    std::fs::create_dir_all(&config_dir).expect("create config dir");
    std::fs::write(
        config_dir.join("config.toml"),
        format!(
            "[output]\npath = \"{}\"\n\n[throttle]\nevents_per_second = 1\n",
            out.display()
        ),
    )
    .expect("write config");

    let output = run_with_stdin(sealog(&home), b"a\nb\nc\n");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(std::fs::read_to_string(&out).expect("read output"), "a\n");
}

#[cfg(unix)]
#[test]
fn test_non_utf8_passphrase_round_trips() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let home = tempdir().expect("tempdir");
    let out = home.path().join("raw-key.log");
    let key = OsStr::from_bytes(b"k\xffey\xfe");

    let mut cmd = sealog(&home);
    cmd.arg("--file-path").arg(&out).arg("--log-key").arg(key);
    let output = run_with_stdin(cmd, b"raw bytes\n");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let mut cmd = sealog(&home);
    cmd.arg("--debug")
        .arg("--file-path")
        .arg(&out)
        .arg("--log-key")
        .arg(key)
        .stdin(Stdio::null());
    let shown = cmd.output().expect("run sealog --debug");
    assert!(shown.status.success());
    assert_eq!(String::from_utf8_lossy(&shown.stdout).lines().nth(1), Some("raw bytes"));
}

#[cfg(unix)]
fn terminate(child: &Child) {
    // SAFETY: kill(2) with a pid we spawned and a valid signal number.
    let rc = unsafe { libc::kill(child.id() as libc::pid_t, libc::SIGTERM) };
    assert_eq!(rc, 0, "kill failed");
}

#[cfg(unix)]
#[test]
fn test_sigterm_flushes_buffered_lines() {
    let home = tempdir().expect("tempdir");
    let out = home.path().join("signal.log");

    let mut child = sealog(&home)
        .arg("--file-path")
        .arg(&out)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn sealog");

    // Keep stdin open so only the signal can end the run.
    let mut stdin = child.stdin.take().expect("stdin");
    stdin
        .write_all(b"alpha\nbeta\ngamma\n")
        .expect("write stdin");
    stdin.flush().expect("flush stdin");

    std::thread::sleep(std::time::Duration::from_millis(1500));
    // Default 128 KiB buffer: nothing has reached the file yet.
    assert_eq!(std::fs::read(&out).expect("read output").len(), 0);

    terminate(&child);
    let status = child.wait().expect("wait for sealog");
    drop(stdin);

    assert!(status.success(), "status: {:?}", status);
    let contents = std::fs::read_to_string(&out).expect("read output");
    assert_eq!(contents, "alpha\nbeta\ngamma\n");
}
