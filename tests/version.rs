//! Integration test: binary reports the package version.

use std::process::Command;

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_navshell"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("navshell ") && stdout.contains(env!("CARGO_PKG_VERSION")),
        "Expected `navshell {}`, got: {}",
        env!("CARGO_PKG_VERSION"),
        stdout
    );
}
