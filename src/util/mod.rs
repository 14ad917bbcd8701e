// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Common utility functions.

mod case;
mod service_data;

pub use case::to_camel_case;
pub use service_data::DeserializeServiceData;
