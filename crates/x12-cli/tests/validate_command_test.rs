//! End-to-end tests for the validate and ack subcommands.

use std::fs;
use std::process::Command;

const ISA: &str = "ISA*00*          *00*          *ZZ*SENDER         *ZZ*RECEIVER       *240101*1200*^*00501*000000001*0*P*:~";

fn inquiry_270() -> String {
    format!(
        "{ISA}GS*HS*SENDER*RECEIVER*20240101*1200*1*X*005010X279A1~\
         ST*270*0001*005010X279A1~BHT*0022*13*A1*20240101*1200~HL*1**20*1~NM1*IL*1*DOE~SE*5*0001~\
         GE*1*1~IEA*1*000000001~"
    )
}

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_x12"))
}

#[test]
fn test_validate_clean_file_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inquiry.edi");
    fs::write(&path, inquiry_270()).unwrap();

    let output = bin()
        .args(["validate", path.to_str().unwrap(), "--profile", "hipaa"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 error(s)"));
}

#[test]
fn test_validate_structure_error_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.edi");
    fs::write(&path, inquiry_270().replace("IEA*1*000000001~", "IEA*1*000000009~")).unwrap();

    let output = bin()
        .args(["validate", path.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2), "{output:?}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("control number mismatch"));
}

#[test]
fn test_ack_writes_997_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("inquiry.edi");
    let output_path = dir.path().join("ack.edi");
    fs::write(&input, inquiry_270()).unwrap();

    let output = bin()
        .args([
            "ack",
            input.to_str().unwrap(),
            "--kind",
            "997",
            "--output",
            output_path.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let ack = fs::read_to_string(&output_path).unwrap();
    assert!(ack.contains("ST*997*"));
    assert!(ack.contains("AK5*A~"));
}

#[test]
fn test_generate_round_trips_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("inquiry.edi");
    let output_path = dir.path().join("regen.edi");
    fs::write(&input, inquiry_270()).unwrap();

    let output = bin()
        .args([
            "generate",
            input.to_str().unwrap(),
            "--output",
            output_path.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let regen = fs::read_to_string(&output_path).unwrap();
    assert_eq!(regen, inquiry_270());
}
