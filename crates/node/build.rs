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
    if let Ok(git_short_hash) = String::from_utf8(output.stdout) {
        println!("cargo:rustc-env=GIT_SHORT_HASH={}", git_short_hash.trim());
    }
}

fn main() {
    gen_version();
}
