// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

use std::process::Command;

fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");

    // exposed as `option_env!` to the crate, see startup.rs
    if let Some(version) = git_describe() {
        println!("cargo:rustc-env=OVERSIGHT_GIT_VERSION={version}");
    }
    if git_dirty() {
        println!("cargo:rustc-env=OVERSIGHT_GIT_DIRTY=1");
    }
    println!("cargo:rerun-if-changed=.git/HEAD");
}

fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--match", "v[0-9]*", "--tags", "--always", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8(output.stdout).ok()?;
    Some(version.trim().trim_start_matches('v').to_string())
}

fn git_dirty() -> bool {
    Command::new("git")
        .args(["diff-index", "--quiet", "HEAD", "--"])
        .status()
        .map(|status| status.code() == Some(1))
        .unwrap_or_default()
}
