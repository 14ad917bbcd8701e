// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Notify entity sending popup notifications.

use serde_json::{Map, Value};

use crate::client::Notification;
use crate::coordinator::CoordinatorData;
use crate::entity::{DeviceCommand, EntityState, Platform, unique_id};
use crate::errors::ServiceError;

pub(crate) const NOTIFY: &str = "notify";

/// Optional notification fields passed through from the message data.
const PASS_THROUGH_FIELDS: [&str; 7] = [
    "source",
    "image",
    "video",
    "smallIcon",
    "largeIcon",
    "corner",
    "duration",
];

pub(crate) fn notify_state(device_id: &str, data: &CoordinatorData) -> EntityState {
    EntityState {
        entity_id: unique_id(device_id, NOTIFY),
        platform: Platform::Notify,
        name: "Notify",
        available: data.is_available(),
        state: None,
        attributes: Map::new(),
    }
}

pub(crate) fn send_message_command(
    message: String,
    title: Option<String>,
    data: Option<Map<String, Value>>,
) -> Result<DeviceCommand, ServiceError> {
    let mut fields = Map::with_capacity(9);
    fields.insert("message".into(), message.into());
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        fields.insert("title".into(), title.into());
    }
    if let Some(mut data) = data {
        for field in PASS_THROUGH_FIELDS {
            if let Some(value) = data.remove(field) {
                fields.insert(field.into(), value);
            }
        }
    }

    let notification: Notification = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ServiceError::BadRequest(format!("Invalid notification data: {e}")))?;

    Ok(DeviceCommand::Notify(notification))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_only() {
        let command = send_message_command("Hello".into(), None, None).unwrap();
        match command {
            DeviceCommand::Notify(n) => {
                assert_eq!(json!({"message": "Hello"}), serde_json::to_value(n).unwrap())
            }
            c => panic!("Unexpected command {c:?}"),
        }
        assert!(!send_message_command("x".into(), None, None)
            .unwrap()
            .requires_refresh());
    }

    #[test]
    fn empty_title_is_dropped() {
        let command = send_message_command("Hello".into(), Some(String::new()), None).unwrap();
        let DeviceCommand::Notify(n) = command else {
            panic!("Expected notify command");
        };
        assert_eq!(None, n.title);
    }

    #[test]
    fn optional_fields_are_passed_through() {
        let data = json!({
            "source": "Doorbell",
            "smallIcon": "mdi:bell",
            "largeIcon": "mdi:door",
            "duration": 10,
            "corner": "top_start",
            "color": "red"
        });
        let command = send_message_command(
            "Someone is at the door".into(),
            Some("Front door".into()),
            data.as_object().cloned(),
        )
        .unwrap();

        let DeviceCommand::Notify(n) = command else {
            panic!("Expected notify command");
        };
        assert_eq!(
            json!({
                "message": "Someone is at the door",
                "title": "Front door",
                "source": "Doorbell",
                "smallIcon": "mdi:bell",
                "largeIcon": "mdi:door",
                "corner": "top_start",
                "duration": 10
            }),
            serde_json::to_value(n).unwrap()
        );
    }

    #[test]
    fn optional_field_values_are_forwarded_as_given() {
        let data = json!({"duration": "5", "corner": "top_start", "image": {"url": "x"}});
        let command =
            send_message_command("Hi".into(), None, data.as_object().cloned()).unwrap();

        let DeviceCommand::Notify(n) = command else {
            panic!("Expected notify command");
        };
        assert_eq!(
            json!({
                "message": "Hi",
                "duration": "5",
                "corner": "top_start",
                "image": {"url": "x"}
            }),
            serde_json::to_value(n).unwrap()
        );
    }
}
