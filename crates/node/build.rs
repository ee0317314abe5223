use std::process::Command;

fn gen_version() {
    let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    else {
        return;
    };
    if !output.status.success() {
        return;
    }
    let git_short_hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !git_short_hash.is_empty() {
        println!("cargo:rustc-env=GIT_SHORT_HASH={git_short_hash}");
    }
}

fn main() {
    gen_version();
}
