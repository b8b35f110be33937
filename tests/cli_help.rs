use std::process::Command;

#[test]
fn test_help_lists_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_edgesite"))
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["plan", "apply", "destroy", "status"] {
        assert!(stdout.contains(command), "missing '{}' in:\n{}", command, stdout);
    }
    assert!(stdout.contains("--cloud"));
}

#[test]
fn test_unknown_command_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_edgesite"))
        .arg("provision")
        .output()
        .unwrap();

    assert!(!output.status.success());
}
