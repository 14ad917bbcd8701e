// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! OverSight REST API data structure definitions for JSON serialization & deserialization.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

/// Response wrapper of every device endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

impl ApiEnvelope {
    /// Returns the result payload, or an empty object if the device didn't send one.
    pub fn into_result(self) -> Value {
        match self.result {
            None | Some(Value::Null) => Value::Object(Default::default()),
            Some(v) => v,
        }
    }
}

/// Device settings endpoint group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SettingsGroup {
    Overlay,
    Notifications,
    Settings,
}

impl SettingsGroup {
    pub fn path(&self) -> &'static str {
        match self {
            SettingsGroup::Overlay => "/set/overlay",
            SettingsGroup::Notifications => "/set/notifications",
            SettingsGroup::Settings => "/set/settings",
        }
    }
}

/// Transient popup notification.
///
/// The optional fields use the device's camelCase names, also when deserialized from the data
/// object of a notify call. Their values are forwarded to the device as given.
#[derive(Debug, Clone, Default, PartialEq, Builder, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[builder(setter(into))]
    #[serde(default)]
    pub message: String,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Value>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, alias = "small_icon", skip_serializing_if = "Option::is_none")]
    pub small_icon: Option<Value>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, alias = "large_icon", skip_serializing_if = "Option::is_none")]
    pub large_icon: Option<Value>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner: Option<Value>,
    /// Display duration in seconds.
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Value>,
}

/// Persistent, addressable badge notification.
///
/// Deserialized from snake_case service data, serialized with the camelCase wire names.
/// Sending an existing `id` updates the badge, `visible: false` removes it.
#[derive(Debug, Clone, Default, PartialEq, Builder, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct FixedNotification {
    #[builder(setter(into))]
    pub id: String,
    /// Only set by [`FixedNotification::remove`], never taken from service data.
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_color: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_duration: Option<u32>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_duration: Option<u32>,
    #[builder(setter(into, strip_option), default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_expand: Option<bool>,
}

impl FixedNotification {
    /// Request to remove the badge with the given id.
    pub fn remove(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            visible: Some(false),
            ..Default::default()
        }
    }
}
