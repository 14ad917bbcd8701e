// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Actix actor message definitions used to communicate with the [`Controller`].

#[allow(unused_imports)] // used for doc links
use crate::controller::Controller;
use crate::configuration::DeviceSettings;
use crate::entity::{DeviceInfo, EntityAction, EntityState};
use crate::errors::ServiceError;
use actix::prelude::Message;
use serde_json::Value;

/// Set up a new OverSight device.
///
/// The device must be reachable: the initial state refresh is part of the setup. Returns the
/// device registry information with the unique device identifier.
#[derive(Debug, Message)]
#[rtype(result = "Result<DeviceInfo, ServiceError>")]
pub struct SetupDevice(pub DeviceSettings);

/// Remove a device and stop polling it.
#[derive(Debug, Message)]
#[rtype(result = "Result<(), ServiceError>")]
pub struct UnloadDevice {
    pub device_id: String,
}

/// Get all configured devices.
#[derive(Debug, Default, Message)]
#[rtype(result = "Vec<DeviceInfo>")]
pub struct ListDevices;

/// Get the entity states of a single device, or of all devices if `device_id` is not set.
#[derive(Debug, Default, Message)]
#[rtype(result = "Result<Vec<EntityState>, ServiceError>")]
pub struct GetEntityStates {
    pub device_id: Option<String>,
}

/// Execute an entity action.
#[derive(Debug, Message)]
#[rtype(result = "Result<(), ServiceError>")]
pub struct EntityCommand {
    pub entity_id: String,
    pub action: EntityAction,
}

/// Call a device service.
///
/// The target device is the first device owning one of the given `entity_ids`. The first
/// configured device is used if no entity matches.
#[derive(Debug, Message)]
#[rtype(result = "Result<Value, ServiceError>")]
pub struct CallService {
    pub service: String,
    pub entity_ids: Vec<String>,
    pub data: Option<Value>,
}

