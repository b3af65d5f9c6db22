use std::ffi::OsStr;
use std::fs;
use std::process::{Command, Output};

fn run(args: &[&OsStr]) -> Output {
    let binary = env!("CARGO_BIN_EXE_station-agg");
    Command::new(binary)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run station-agg")
}

#[test]
fn prints_rows_then_total() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = tmp.path().join("m.txt");
    fs::write(&path, "A;1.0\nB;-2.5\nA;3.0\n").expect("write input");

    let output = run(&[path.as_os_str(), OsStr::new("4"), OsStr::new("2")]);
    assert!(
        output.status.success(),
        "station-agg failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "A: min=1.0, avg=2.0, max=3.0\nB: min=-2.5, avg=-2.5, max=-2.5\ntotal stations: 2\n"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("records=3"), "missing stats line: {stderr}");
    assert!(stderr.contains("stations=2"), "missing stats line: {stderr}");
    assert!(stderr.contains("p50_chunk_us="), "missing chunk timing: {stderr}");
    assert!(stderr.contains("p99_chunk_us="), "missing chunk timing: {stderr}");
}

#[test]
fn limits_output_to_twenty_rows() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = tmp.path().join("many.txt");
    let contents: String = (0..25).map(|i| format!("S{i:02};{i}.0\n")).collect();
    fs::write(&path, contents).expect("write input");

    let output = run(&[path.as_os_str()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 21);
    assert_eq!(lines[0], "S00: min=0.0, avg=0.0, max=0.0");
    assert_eq!(lines[19], "S19: min=19.0, avg=19.0, max=19.0");
    assert_eq!(lines[20], "total stations: 25");
}

#[test]
fn missing_file_exits_with_failure() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = tmp.path().join("nope.txt");

    let output = run(&[path.as_os_str()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot open"), "unexpected stderr: {stderr}");
}

#[test]
fn strict_flag_rejects_malformed_record() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = tmp.path().join("bad.txt");
    fs::write(&path, "A;1.0\nB;two\n").expect("write input");

    let lenient = run(&[path.as_os_str()]);
    assert!(lenient.status.success());

    let strict = run(&[OsStr::new("--strict"), path.as_os_str()]);
    assert_eq!(strict.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains("record at byte 6"), "unexpected stderr: {stderr}");
}

#[test]
fn usage_errors_exit_with_two() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = tmp.path().join("m.txt");
    fs::write(&path, "A;1.0\n").expect("write input");

    for args in [
        Vec::new(),
        vec![path.as_os_str(), OsStr::new("0")],
        vec![path.as_os_str(), OsStr::new("four")],
        vec![path.as_os_str(), OsStr::new("1"), OsStr::new("1"), OsStr::new("1")],
        vec![OsStr::new("--window=0"), path.as_os_str()],
        vec![OsStr::new("--bogus"), path.as_os_str()],
    ] {
        let output = run(&args);
        assert_eq!(output.status.code(), Some(2), "args {args:?}");
    }
}

#[test]
fn help_exits_cleanly() {
    let output = run(&[OsStr::new("--help")]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage:"));
}
