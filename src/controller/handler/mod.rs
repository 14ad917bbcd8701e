// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Actix message handlers.

mod device;
mod entity;
mod service;

pub use service::Service;
