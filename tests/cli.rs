use std::io::Write;
use std::process::{Command, Output, Stdio};

use rsline::{ReedSolomon, Encodes, PARITY_COUNT};

fn run_with_stdin(args: &[&str], input: &[u8]) -> Output {
    let bin = env!("CARGO_BIN_EXE_rsline");
    let mut child = Command::new(bin)
        .args(args)
        .env_remove("DEBUG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    {
        let stdin = child.stdin.as_mut().unwrap();
        stdin.write_all(input).unwrap();
    }

    child.wait_with_output().unwrap()
}

fn stdout_of(args: &[&str], input: &[u8]) -> String {
    let out = run_with_stdin(args, input);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    String::from_utf8(out.stdout).unwrap()
}

fn codeword_hex(msg: &[u8]) -> String {
    rsline::to_hex(&ReedSolomon::new(PARITY_COUNT).encode(msg).unwrap())
}

#[test]
fn no_mode_prints_usage_and_npar() {
    let bin = env!("CARGO_BIN_EXE_rsline");
    let out = Command::new(bin).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(String::from_utf8(out.stdout).unwrap(), format!("NPAR={PARITY_COUNT}\n"));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

#[test]
fn encode_raw_lines() {
    let stdout = stdout_of(&["encode"], b"ABC\nABCD\n");
    assert_eq!(stdout, "414243234EB33A\n4142434420877B3B\n");
    let expected = format!("{}\n{}\n", codeword_hex(b"ABC"), codeword_hex(b"ABCD"));
    assert_eq!(stdout, expected);
}

#[test]
fn encode_hex_lines() {
    let stdout = stdout_of(&["encode", "--hex"], b"FF00FF\n");
    assert_eq!(stdout, "FF00FF885F7DD5\n");
}

#[test]
fn decode_known_codewords() {
    let stdout = stdout_of(&["decode"], b"414243234EB33A\n4142434420877B3B\n");
    assert_eq!(stdout, "G ABC\nG ABCD\n");
}

#[test]
fn decode_survives_erasures_the_codec_cannot_place() {
    let input = format!("681E__B4__85\n{}\n", codeword_hex(b"ok"));
    let out = run_with_stdin(&["decode", "--hex"], input.as_bytes());
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "B 681E\nG 6F6B\n");
}

#[test]
fn decode_good_corrected_and_bad() {
    let cw = codeword_hex(b"ABCD");
    let flipped = format!("41FF{}", &cw[4..]);
    let erased_tail = format!("41FF{}____", &cw[4..cw.len() - 4]);
    let hopeless = format!("{}__________", &cw[..cw.len() - 10]);
    let input = format!("{cw}\n{flipped}\n{erased_tail}\n{hopeless}\n");

    let stdout = stdout_of(&["decode"], input.as_bytes());
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "G ABCD");
    assert_eq!(lines[1], "C ABCD");
    assert_eq!(lines[2], "C ABCD");
    assert!(lines[3].starts_with("B "));
}

#[test]
fn decode_hex_output() {
    let cw = codeword_hex(b"ABCD");
    let stdout = stdout_of(&["decode", "--hex"], format!("{cw}\n").as_bytes());
    assert_eq!(stdout, "G 41424344\n");
}

#[test]
fn decode_skips_short_and_stops_on_empty_line() {
    let cw = codeword_hex(b"hi");
    let input = format!("4142\n{cw}\n\n{cw}\n");
    let stdout = stdout_of(&["decode", "--hex"], input.as_bytes());
    assert_eq!(stdout, "G 6869\n");
}

#[test]
fn decode_skips_malformed_hex() {
    let cw = codeword_hex(b"ok");
    let input = format!("ZZZZZZZZZZ\n{cw}\n");
    let out = run_with_stdin(&["decode"], input.as_bytes());
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "G ok\n");
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid hex pair"));
}

#[test]
fn pipeline_encode_into_decode() {
    let encoded = stdout_of(&["encode"], b"hello\nworld\n");
    let decoded = stdout_of(&["decode"], encoded.as_bytes());
    assert_eq!(decoded, "G hello\nG world\n");
}

#[test]
fn unknown_mode_is_usage_error() {
    let bin = env!("CARGO_BIN_EXE_rsline");
    let out = Command::new(bin).arg("transcode").output().unwrap();
    assert!(!out.status.success());
}
