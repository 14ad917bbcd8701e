// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Hot corner select entity.

use serde_json::{Map, Value};
use std::str::FromStr;
use strum::VariantNames;

use crate::client::{HotCorner, SettingsGroup};
use crate::coordinator::CoordinatorData;
use crate::entity::{DeviceCommand, EntityState, Platform, settings_params, unique_id};
use crate::errors::ServiceError;

pub(crate) const HOT_CORNER: &str = "hot_corner";

pub(crate) fn hot_corner_state(device_id: &str, data: &CoordinatorData) -> EntityState {
    let mut attributes = Map::with_capacity(1);
    attributes.insert("options".into(), HotCorner::VARIANTS.into());

    EntityState {
        entity_id: unique_id(device_id, HOT_CORNER),
        platform: Platform::Select,
        name: "Hot corner",
        available: data.is_available(),
        state: data.state.as_ref().and_then(|s| s.value_of(HOT_CORNER)),
        attributes,
    }
}

pub(crate) fn select_option_command(option: &str) -> Result<DeviceCommand, ServiceError> {
    let corner = HotCorner::from_str(option).map_err(|_| {
        ServiceError::BadRequest(format!(
            "Invalid hot corner option '{option}', valid options: {}",
            HotCorner::VARIANTS.join(", ")
        ))
    })?;

    Ok(DeviceCommand::UpdateSettings {
        group: SettingsGroup::Overlay,
        params: settings_params(HOT_CORNER, Value::from(corner.as_ref())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn select_option_sends_hot_corner() {
        let mut params = Map::new();
        params.insert("hotCorner".into(), json!("bottom_start"));
        assert_eq!(
            DeviceCommand::UpdateSettings {
                group: SettingsGroup::Overlay,
                params
            },
            select_option_command("bottom_start").unwrap()
        );
    }

    #[test]
    fn invalid_option_is_rejected() {
        assert!(matches!(
            select_option_command("center"),
            Err(ServiceError::BadRequest(_))
        ));
    }

    #[test]
    fn options_are_listed() {
        let state = hot_corner_state("abc", &CoordinatorData::default());
        assert_eq!(
            Some(&json!(["top_start", "top_end", "bottom_start", "bottom_end"])),
            state.attributes.get("options")
        );
    }
}
