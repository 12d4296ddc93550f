use std::path::Path;
use std::process::Command;

/// Short commit id of the workspace, or "unknown" outside a git checkout.
fn git_sha(workspace: &Path) -> String {
    Command::new("git")
        .arg("-C")
        .arg(workspace)
        .args(["describe", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let workspace = Path::new(&manifest_dir).join("..");

    println!("cargo:rustc-env=TALLY_BUILD_SHA={}", git_sha(&workspace));
    println!("cargo:rerun-if-changed=build.rs");
}
