use std::{path::Path, process::Command};

fn main() {
    let rev = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|rev| !rev.is_empty())
        .unwrap_or_else(|| "unknown".into());

    println!("cargo:rustc-env=REVSTAMP_BUILD_REV={rev}");
    println!("cargo:rerun-if-changed=build.rs");
    // Packaged sources have no .git; a missing path would rerun this every build.
    if Path::new(".git/HEAD").exists() {
        println!("cargo:rerun-if-changed=.git/HEAD");
    }
}
