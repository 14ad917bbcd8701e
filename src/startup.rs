// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

use const_format::formatcp;

/// Build information like timestamp, package name, etc.
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// Application version built from git version information.
pub const APP_VERSION: &str = formatcp!(
    "{}{}",
    match option_env!("OVERSIGHT_GIT_VERSION") {
        Some(v) => v,
        None => formatcp!("{}-non-git", built_info::PKG_VERSION),
    },
    match option_env!("OVERSIGHT_GIT_DIRTY") {
        Some(_) => "-dirty",
        None => "",
    }
);
