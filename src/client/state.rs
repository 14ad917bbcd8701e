// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Device state snapshot built from the `/info` response.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DefaultOnError, serde_as};
use strum::{AsRefStr, Display, EnumString, VariantNames};

pub const DEF_DEVICE_NAME: &str = "OverSight Device";
const DEF_NOTIFICATION_DURATION: u32 = 8;
const DEF_FIXED_NOTIFICATIONS_VISIBILITY: u8 = 100;
const DEF_REMOTE_PORT: u16 = 5001;

/// Screen corner used for the overlay hot corner.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    AsRefStr,
    Display,
    EnumString,
    VariantNames,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HotCorner {
    TopStart,
    #[default]
    TopEnd,
    BottomStart,
    BottomEnd,
}

/// Current state of an OverSight device.
///
/// Created from scratch for every successful `/info` request and never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceState {
    pub overlay_visibility: u8,
    pub clock_overlay_visibility: u8,
    pub hot_corner: HotCorner,
    pub display_notifications: bool,
    /// Popup notification duration in seconds.
    pub notification_duration: u32,
    pub display_fixed_notifications: bool,
    pub fixed_notifications_visibility: u8,
    pub device_name: String,
    pub pixel_shift: bool,
    pub remote_port: u16,
    pub device_id: String,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            overlay_visibility: 0,
            clock_overlay_visibility: 0,
            hot_corner: HotCorner::default(),
            display_notifications: true,
            notification_duration: DEF_NOTIFICATION_DURATION,
            display_fixed_notifications: true,
            fixed_notifications_visibility: DEF_FIXED_NOTIFICATIONS_VISIBILITY,
            device_name: DEF_DEVICE_NAME.to_string(),
            pixel_shift: false,
            remote_port: DEF_REMOTE_PORT,
            device_id: String::new(),
        }
    }
}

// Raw `/info` payload. Missing, null and invalid values all end up as `None`.

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InfoResponse {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    device_id: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    overlay: Option<OverlayInfo>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    notifications: Option<NotificationsInfo>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    settings: Option<SettingsInfo>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverlayInfo {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    overlay_visibility: Option<u8>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    clock_overlay_visibility: Option<u8>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    hot_corner: Option<HotCorner>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationsInfo {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    display_notifications: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    notification_duration: Option<u32>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    display_fixed_notifications: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    fixed_notifications_visibility: Option<u8>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsInfo {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    device_name: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pixel_shift: Option<bool>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    remote_port: Option<u16>,
}

impl DeviceState {
    /// Create the device state from the `result` object of the `/info` endpoint.
    ///
    /// Returns an error only if `info` is not a JSON object.
    pub fn from_info(info: &Value) -> Result<Self, serde_json::Error> {
        // a struct would also be accepted from a JSON array
        if !info.is_object() {
            return Err(serde::de::Error::custom("device info must be a JSON object"));
        }
        let info = InfoResponse::deserialize(info)?;
        let overlay = info.overlay.unwrap_or_default();
        let notifications = info.notifications.unwrap_or_default();
        let settings = info.settings.unwrap_or_default();
        let def = DeviceState::default();

        Ok(Self {
            overlay_visibility: overlay.overlay_visibility.unwrap_or(def.overlay_visibility),
            clock_overlay_visibility: overlay
                .clock_overlay_visibility
                .unwrap_or(def.clock_overlay_visibility),
            hot_corner: overlay.hot_corner.unwrap_or(def.hot_corner),
            display_notifications: notifications
                .display_notifications
                .unwrap_or(def.display_notifications),
            // zero is not a valid duration
            notification_duration: notifications
                .notification_duration
                .filter(|v| *v > 0)
                .unwrap_or(def.notification_duration),
            display_fixed_notifications: notifications
                .display_fixed_notifications
                .unwrap_or(def.display_fixed_notifications),
            // unlike duration and port, zero is a valid visibility and kept
            fixed_notifications_visibility: notifications
                .fixed_notifications_visibility
                .unwrap_or(def.fixed_notifications_visibility),
            device_name: settings
                .device_name
                .filter(|v| !v.is_empty())
                .unwrap_or(def.device_name),
            pixel_shift: settings.pixel_shift.unwrap_or(def.pixel_shift),
            remote_port: settings
                .remote_port
                .filter(|v| *v > 0)
                .unwrap_or(def.remote_port),
            device_id: info.device_id.unwrap_or(def.device_id),
        })
    }

    /// Get a state value by its snake_case key, e.g. `pixel_shift`.
    pub fn value_of(&self, key: &str) -> Option<Value> {
        let value = match key {
            "overlay_visibility" => Value::from(self.overlay_visibility),
            "clock_overlay_visibility" => Value::from(self.clock_overlay_visibility),
            "hot_corner" => Value::from(self.hot_corner.as_ref()),
            "display_notifications" => Value::from(self.display_notifications),
            "notification_duration" => Value::from(self.notification_duration),
            "display_fixed_notifications" => Value::from(self.display_fixed_notifications),
            "fixed_notifications_visibility" => Value::from(self.fixed_notifications_visibility),
            "device_name" => Value::from(self.device_name.as_str()),
            "pixel_shift" => Value::from(self.pixel_shift),
            "remote_port" => Value::from(self.remote_port),
            "device_id" => Value::from(self.device_id.as_str()),
            _ => return None,
        };
        Some(value)
    }
}
