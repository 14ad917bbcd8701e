// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Number entities for visibility and duration settings.

use serde_json::{Map, Value};

use crate::client::SettingsGroup;
use crate::coordinator::CoordinatorData;
use crate::entity::{DeviceCommand, EntityState, Platform, settings_params, unique_id};
use crate::errors::ServiceError;

#[derive(Debug, PartialEq)]
pub struct NumberDescription {
    pub key: &'static str,
    pub name: &'static str,
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub unit: &'static str,
    pub group: SettingsGroup,
}

pub static NUMBERS: [NumberDescription; 4] = [
    NumberDescription {
        key: "overlay_visibility",
        name: "Overlay visibility",
        min: 0,
        max: 95,
        step: 5,
        unit: "%",
        group: SettingsGroup::Overlay,
    },
    NumberDescription {
        key: "clock_overlay_visibility",
        name: "Clock overlay visibility",
        min: 0,
        max: 100,
        step: 5,
        unit: "%",
        group: SettingsGroup::Overlay,
    },
    NumberDescription {
        key: "notification_duration",
        name: "Notification duration",
        min: 3,
        max: 30,
        step: 1,
        unit: "s",
        group: SettingsGroup::Notifications,
    },
    NumberDescription {
        key: "fixed_notifications_visibility",
        name: "Fixed notifications visibility",
        min: 0,
        max: 100,
        step: 5,
        unit: "%",
        group: SettingsGroup::Notifications,
    },
];

pub(crate) fn find(key: &str) -> Option<&'static NumberDescription> {
    NUMBERS.iter().find(|n| n.key == key)
}

pub(crate) fn number_state(
    device_id: &str,
    number: &NumberDescription,
    data: &CoordinatorData,
) -> EntityState {
    let mut attributes = Map::with_capacity(4);
    attributes.insert("min_value".into(), number.min.into());
    attributes.insert("max_value".into(), number.max.into());
    attributes.insert("step".into(), number.step.into());
    attributes.insert("unit".into(), number.unit.into());

    EntityState {
        entity_id: unique_id(device_id, number.key),
        platform: Platform::Number,
        name: number.name,
        available: data.is_available(),
        state: data.state.as_ref().and_then(|s| s.value_of(number.key)),
        attributes,
    }
}

/// Values are truncated to an integer after the range check.
pub(crate) fn set_value_command(
    number: &NumberDescription,
    value: f64,
) -> Result<DeviceCommand, ServiceError> {
    if !value.is_finite() || value < number.min as f64 || value > number.max as f64 {
        return Err(ServiceError::BadRequest(format!(
            "Invalid value {value} for {}: must be in range {}-{}",
            number.key, number.min, number.max
        )));
    }

    Ok(DeviceCommand::UpdateSettings {
        group: number.group,
        params: settings_params(number.key, Value::from(value.trunc() as u32)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("overlay_visibility", -1.0)]
    #[case("overlay_visibility", 96.0)]
    #[case("clock_overlay_visibility", 100.5)]
    #[case("notification_duration", 2.9)]
    #[case("notification_duration", 31.0)]
    #[case("fixed_notifications_visibility", f64::NAN)]
    fn value_out_of_range_is_rejected(#[case] key: &str, #[case] value: f64) {
        let result = set_value_command(find(key).unwrap(), value);
        assert!(matches!(result, Err(ServiceError::BadRequest(_))), "{result:?}");
    }

    #[rstest]
    #[case("overlay_visibility", 0.0, 0)]
    #[case("overlay_visibility", 95.0, 95)]
    #[case("notification_duration", 3.0, 3)]
    #[case("notification_duration", 29.9, 29)]
    fn value_in_range_is_truncated(#[case] key: &str, #[case] value: f64, #[case] expected: u32) {
        match set_value_command(find(key).unwrap(), value).unwrap() {
            DeviceCommand::UpdateSettings { params, .. } => {
                assert_eq!(Some(&json!(expected)), params.values().next());
            }
            c => panic!("Unexpected command {c:?}"),
        }
    }

    #[test]
    fn number_attributes() {
        let state = number_state(
            "abc",
            find("notification_duration").unwrap(),
            &CoordinatorData::default(),
        );
        assert_eq!(Some(&json!(3)), state.attributes.get("min_value"));
        assert_eq!(Some(&json!(30)), state.attributes.get("max_value"));
        assert_eq!(Some(&json!(1)), state.attributes.get("step"));
        assert_eq!(Some(&json!("s")), state.attributes.get("unit"));
        assert!(!state.available);
    }
}
