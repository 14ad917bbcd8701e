// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! OverSight device REST API client.
//!
//! Every endpoint returns the same JSON envelope `{success, message, result}`. The client unwraps
//! the envelope and returns the `result` payload, or an [`ApiError`].
//!
//! Transport failures (timeouts, connection & name resolution errors) are retried a fixed number
//! of times. Device reported errors and HTTP error status codes are returned immediately.

use std::time::Duration;

use actix::clock::{sleep, timeout};
use awc::error::{PayloadError, SendRequestError};
use awc::http::Method;
use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use crate::configuration::{ClientSettings, DeviceSettings};
use crate::errors::ApiError;

mod model;
mod state;

pub use model::*;
pub use state::*;

/// Client for a single OverSight device.
///
/// Cheap to clone: the underlying [`awc::Client`] is reference counted. Like all actix clients
/// it must be used on the thread it was created on.
#[derive(Clone)]
pub struct DeviceClient {
    /// `host:port` of the device
    id: String,
    base_url: Url,
    http: awc::Client,
    request_timeout: Duration,
    retries: u8,
    retry_interval: Duration,
}

/// Outcome of a failed request attempt.
enum AttemptError {
    /// Transport level failure, the request may be retried.
    Transient(String),
    /// Final error, don't retry.
    Fatal(ApiError),
}

impl DeviceClient {
    pub fn new(device: &DeviceSettings, settings: &ClientSettings) -> Result<Self, ApiError> {
        let base_url = base_url(&device.host, device.port)?;
        let http = awc::Client::builder()
            // the per-attempt timeout also covers reading the response body
            .disable_timeout()
            .disable_redirects()
            .finish();

        Ok(Self {
            id: device.address(),
            base_url,
            http,
            request_timeout: settings.request_timeout,
            retries: settings.retries,
            retry_interval: settings.retry_interval,
        })
    }

    /// `host:port` of the device.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Base URL of the device API, e.g. `http://192.168.1.20:5001/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get device info and current state.
    pub async fn get_info(&self) -> Result<Value, ApiError> {
        self.api_wrapper::<()>(Method::GET, "/info", None).await
    }

    /// Update overlay settings.
    pub async fn set_overlay(&self, params: &Map<String, Value>) -> Result<Value, ApiError> {
        self.update_settings(SettingsGroup::Overlay, params).await
    }

    /// Update notification settings.
    pub async fn set_notifications(&self, params: &Map<String, Value>) -> Result<Value, ApiError> {
        self.update_settings(SettingsGroup::Notifications, params).await
    }

    /// Update general settings.
    pub async fn set_settings(&self, params: &Map<String, Value>) -> Result<Value, ApiError> {
        self.update_settings(SettingsGroup::Settings, params).await
    }

    /// Update the settings of the given group. Parameter names must use the camelCase API names.
    pub async fn update_settings(
        &self,
        group: SettingsGroup,
        params: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        debug!("[{}] Updating {group} settings: {params:?}", self.id);
        self.api_wrapper(Method::POST, group.path(), Some(params)).await
    }

    /// Send a popup notification.
    pub async fn send_notification(&self, notification: &Notification) -> Result<Value, ApiError> {
        self.api_wrapper(Method::POST, "/notify", Some(notification)).await
    }

    /// Create, update or remove a fixed notification (badge).
    pub async fn send_fixed_notification(
        &self,
        notification: &FixedNotification,
    ) -> Result<Value, ApiError> {
        self.api_wrapper(Method::POST, "/notify_fixed", Some(notification)).await
    }

    /// Get active fixed notifications.
    pub async fn get_fixed_notifications(&self) -> Result<Value, ApiError> {
        self.api_wrapper::<()>(Method::GET, "/fixed_notifications", None).await
    }

    /// Wake the device screen.
    pub async fn screen_on(&self) -> Result<Value, ApiError> {
        self.api_wrapper::<()>(Method::POST, "/screen_on", None).await
    }

    /// Restart the overlay service.
    pub async fn restart_service(&self) -> Result<Value, ApiError> {
        self.api_wrapper::<()>(Method::POST, "/restart_service", None).await
    }

    /// Perform the request with retries on transport failures.
    async fn api_wrapper<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        data: Option<&T>,
    ) -> Result<Value, ApiError> {
        let url = self.base_url.join(path).map_err(ApiError::unexpected)?;
        let mut last_cause = String::new();

        for attempt in 0..=self.retries {
            let result = match timeout(self.request_timeout, self.attempt(&method, &url, data)).await
            {
                Ok(result) => result,
                Err(_) => Err(AttemptError::Transient(format!(
                    "Timeout after {:?}",
                    self.request_timeout
                ))),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(AttemptError::Fatal(e)) => {
                    debug!("[{}] {method} {path} failed: {e}", self.id);
                    return Err(e);
                }
                Err(AttemptError::Transient(cause)) => {
                    if attempt < self.retries {
                        warn!(
                            "[{}] {method} {path} failed (attempt {}/{}), retrying in {:?}: {cause}",
                            self.id,
                            attempt + 1,
                            self.retries + 1,
                            self.retry_interval
                        );
                        sleep(self.retry_interval).await;
                    }
                    last_cause = cause;
                }
            }
        }

        Err(ApiError::Communication {
            address: self.id.clone(),
            cause: last_cause,
        })
    }

    /// A single request attempt: send, check HTTP status, unwrap the response envelope.
    async fn attempt<T: Serialize>(
        &self,
        method: &Method,
        url: &Url,
        data: Option<&T>,
    ) -> Result<Value, AttemptError> {
        debug!("[{}] <- {method} {}", self.id, url.path());
        let request = self.http.request(method.clone(), url.as_str());
        let response = match data {
            Some(data) => request.send_json(data).await,
            None => request.send().await,
        };
        let mut response = response.map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::Fatal(ApiError::Api {
                message: format!("Device returned HTTP status {status} for {}", url.path()),
                cause: None,
            }));
        }

        let body = response.body().await.map_err(|e| match e {
            PayloadError::Overflow => AttemptError::Fatal(ApiError::unexpected(e)),
            e => AttemptError::Transient(e.to_string()),
        })?;
        debug!("[{}] -> {status} {} bytes", self.id, body.len());

        let envelope: ApiEnvelope = serde_json::from_slice(&body)
            .map_err(|e| AttemptError::Fatal(ApiError::unexpected(e)))?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| "Unknown API error".to_string());
            return Err(AttemptError::Fatal(ApiError::api(message)));
        }

        Ok(envelope.into_result())
    }
}

/// Connection, timeout and transport errors are transient, everything else is fatal.
fn classify_send_error(e: SendRequestError) -> AttemptError {
    match e {
        SendRequestError::Connect(_)
        | SendRequestError::Send(_)
        | SendRequestError::Response(_)
        | SendRequestError::Timeout => AttemptError::Transient(e.to_string()),
        e => AttemptError::Fatal(ApiError::unexpected(e)),
    }
}

fn base_url(host: &str, port: u16) -> Result<Url, ApiError> {
    // IPv6 literals must be enclosed in brackets
    let host = if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host.to_string()
    };
    Url::parse(&format!("http://{host}:{port}/"))
        .map_err(|e| ApiError::api(format!("Invalid device address {host}:{port}: {e}")))
}
