// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Entities exposed for an OverSight device.
//!
//! Entity states are derived from the coordinator data. Actions are translated into device API
//! commands. All settings parameters are sent with the camelCase API name of the entity key.

mod binary_sensor;
mod notify;
mod number;
mod select;
mod switch;

pub use number::{NUMBERS, NumberDescription};
pub use switch::{SWITCHES, SwitchDescription};

use crate::client::{DeviceClient, Notification, SettingsGroup};
use crate::coordinator::CoordinatorData;
use crate::errors::{ApiError, ServiceError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::Display;

pub const MANUFACTURER: &str = "OverSight";
pub const MODEL: &str = "Android TV Overlay";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    BinarySensor,
    Number,
    Select,
    Switch,
    Notify,
}

/// Device registry information shared by all entities of a device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
}

impl DeviceInfo {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            manufacturer: MANUFACTURER,
            model: MODEL,
        }
    }
}

/// Current state of a single entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState {
    pub entity_id: String,
    pub platform: Platform,
    pub name: &'static str,
    pub available: bool,
    /// `None` if the state is unknown.
    pub state: Option<Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

/// Entity action requested by a client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EntityAction {
    SetValue {
        value: f64,
    },
    SelectOption {
        option: String,
    },
    TurnOn,
    TurnOff,
    SendMessage {
        message: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        data: Option<Map<String, Value>>,
    },
}

/// Device API request for an entity action.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    UpdateSettings {
        group: SettingsGroup,
        params: Map<String, Value>,
    },
    Notify(Notification),
}

impl DeviceCommand {
    pub async fn send(&self, client: &DeviceClient) -> Result<Value, ApiError> {
        match self {
            DeviceCommand::UpdateSettings { group, params } => {
                client.update_settings(*group, params).await
            }
            DeviceCommand::Notify(notification) => client.send_notification(notification).await,
        }
    }

    /// Settings changes must be followed by a state refresh.
    pub fn requires_refresh(&self) -> bool {
        matches!(self, DeviceCommand::UpdateSettings { .. })
    }
}

/// Entity unique identifier.
pub fn unique_id(device_id: &str, key: &str) -> String {
    format!("{device_id}_{key}")
}

/// Return the entity key if the entity id belongs to the given device.
pub fn entity_key<'a>(device_id: &str, entity_id: &'a str) -> Option<&'a str> {
    let key = entity_id.strip_prefix(device_id)?.strip_prefix('_')?;
    platform_of(key).map(|_| key)
}

/// Platform of an entity key, `None` for an unknown key.
pub fn platform_of(key: &str) -> Option<Platform> {
    if key == binary_sensor::CONNECTIVITY {
        Some(Platform::BinarySensor)
    } else if number::find(key).is_some() {
        Some(Platform::Number)
    } else if key == select::HOT_CORNER {
        Some(Platform::Select)
    } else if switch::find(key).is_some() {
        Some(Platform::Switch)
    } else if key == notify::NOTIFY {
        Some(Platform::Notify)
    } else {
        None
    }
}

/// States of all entities of a device.
pub fn entity_states(device_id: &str, data: &CoordinatorData) -> Vec<EntityState> {
    let mut entities = Vec::with_capacity(10);
    entities.push(binary_sensor::connectivity_state(device_id, data));
    entities.extend(
        NUMBERS
            .iter()
            .map(|desc| number::number_state(device_id, desc, data)),
    );
    entities.push(select::hot_corner_state(device_id, data));
    entities.extend(
        SWITCHES
            .iter()
            .map(|desc| switch::switch_state(device_id, desc, data)),
    );
    entities.push(notify::notify_state(device_id, data));
    entities
}

/// Translate an entity action into a device command.
pub fn command(key: &str, action: EntityAction) -> Result<DeviceCommand, ServiceError> {
    let not_found = || ServiceError::NotFound(format!("Unknown entity: {key}"));
    let platform = platform_of(key).ok_or_else(not_found)?;

    match (platform, action) {
        (Platform::Number, EntityAction::SetValue { value }) => {
            number::set_value_command(number::find(key).ok_or_else(not_found)?, value)
        }
        (Platform::Select, EntityAction::SelectOption { option }) => {
            select::select_option_command(&option)
        }
        (Platform::Switch, EntityAction::TurnOn) => Ok(switch::switch_command(
            switch::find(key).ok_or_else(not_found)?,
            true,
        )),
        (Platform::Switch, EntityAction::TurnOff) => Ok(switch::switch_command(
            switch::find(key).ok_or_else(not_found)?,
            false,
        )),
        (
            Platform::Notify,
            EntityAction::SendMessage {
                message,
                title,
                data,
            },
        ) => notify::send_message_command(message, title, data),
        (platform, action) => Err(ServiceError::BadRequest(format!(
            "Action {action:?} is not supported by {platform} entity {key}"
        ))),
    }
}

/// Execute an entity action on the device.
///
/// Returns `true` if the coordinator should refresh the device state.
pub async fn execute(
    client: &DeviceClient,
    key: &str,
    action: EntityAction,
) -> Result<bool, ServiceError> {
    let command = command(key, action)?;
    command.send(client).await?;
    Ok(command.requires_refresh())
}

fn settings_params(key: &str, value: Value) -> Map<String, Value> {
    let mut params = Map::with_capacity(1);
    params.insert(crate::util::to_camel_case(key), value);
    params
}
