// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Switch entities for on/off settings.

use serde_json::{Map, Value};

use crate::client::SettingsGroup;
use crate::coordinator::CoordinatorData;
use crate::entity::{DeviceCommand, EntityState, Platform, settings_params, unique_id};

#[derive(Debug, PartialEq)]
pub struct SwitchDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub group: SettingsGroup,
}

pub static SWITCHES: [SwitchDescription; 3] = [
    SwitchDescription {
        key: "display_notifications",
        name: "Display notifications",
        group: SettingsGroup::Notifications,
    },
    SwitchDescription {
        key: "display_fixed_notifications",
        name: "Display fixed notifications",
        group: SettingsGroup::Notifications,
    },
    SwitchDescription {
        key: "pixel_shift",
        name: "Pixel shift",
        group: SettingsGroup::Settings,
    },
];

pub(crate) fn find(key: &str) -> Option<&'static SwitchDescription> {
    SWITCHES.iter().find(|s| s.key == key)
}

pub(crate) fn switch_state(
    device_id: &str,
    switch: &SwitchDescription,
    data: &CoordinatorData,
) -> EntityState {
    EntityState {
        entity_id: unique_id(device_id, switch.key),
        platform: Platform::Switch,
        name: switch.name,
        available: data.is_available(),
        state: data.state.as_ref().and_then(|s| s.value_of(switch.key)),
        attributes: Map::new(),
    }
}

pub(crate) fn switch_command(switch: &SwitchDescription, on: bool) -> DeviceCommand {
    DeviceCommand::UpdateSettings {
        group: switch.group,
        params: settings_params(switch.key, Value::Bool(on)),
    }
}
