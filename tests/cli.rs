use assert_cmd::prelude::*; // Add methods on commands
use std::process::Command; // Run programs

// `echo`, `true`, and `false` stand in for esptool: the binary's contract is
// the result string it prints, not its exit status.

#[test]
fn forwards_arguments_and_prints_the_captured_output() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("esptool-bridge")?;
    cmd.args(["--tool", "echo", "flash_id", "--chip", "esp32"]);

    let output = cmd.output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "flash_id --chip esp32"
    );

    Ok(())
}

#[test]
fn silent_tool_prints_the_success_sentinel() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("esptool-bridge")?;
    cmd.args(["--tool", "true", "chip_id"]);

    let output = cmd.output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "ESPTool completed successfully"
    );

    Ok(())
}

#[test]
fn failing_tool_prints_the_exception_string() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("esptool-bridge")?;
    cmd.args(["--tool", "false", "write_flash", "0x1000", "bad.bin"]);

    let output = cmd.output()?;
    // The failure is carried in the string, not the exit status.
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("ESPTool Exception: esptool exited with"));

    Ok(())
}
