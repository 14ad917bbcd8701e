// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Connectivity binary sensor.

use serde_json::{Map, Value};

use crate::coordinator::CoordinatorData;
use crate::entity::{EntityState, Platform, unique_id};

pub(crate) const CONNECTIVITY: &str = "connectivity";

/// The sensor is on if the last refresh succeeded. It is always available, otherwise it could
/// never report a disconnected device.
pub(crate) fn connectivity_state(device_id: &str, data: &CoordinatorData) -> EntityState {
    let mut attributes = Map::with_capacity(1);
    attributes.insert("device_class".into(), "connectivity".into());

    EntityState {
        entity_id: unique_id(device_id, CONNECTIVITY),
        platform: Platform::BinarySensor,
        name: "Connectivity",
        available: true,
        state: Some(Value::Bool(data.last_update_success)),
        attributes,
    }
}
