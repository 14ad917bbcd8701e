// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

#![forbid(non_ascii_idents)]
#![deny(unsafe_code)]

pub mod client;
pub mod controller;
pub mod coordinator;
pub mod entity;
pub mod util;

pub mod configuration;
pub mod errors;
pub mod startup;

#[cfg(test)]
mod mock_device;

pub use controller::*;
pub use startup::*;
