// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Device service calls.

use crate::client::FixedNotification;
use crate::controller::{CallService, Controller};
use crate::errors::ServiceError;
use crate::util::DeserializeServiceData;
use actix::{Handler, ResponseFuture};
use log::info;
use serde::Deserialize;
use std::str::FromStr;
use strum::{Display, EnumString, VariantNames};

/// Device services which are not bound to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum Service {
    /// Create or update a fixed notification badge.
    SendFixedNotification,
    /// Remove a fixed notification badge by its id.
    RemoveFixedNotification,
    ScreenOn,
    RestartService,
    /// Returns the active fixed notifications.
    GetFixedNotifications,
}

#[derive(Deserialize)]
struct FixedNotificationId {
    id: String,
}

/// Invalid service data is a caller error.
fn bad_data(e: serde_json::Error) -> ServiceError {
    ServiceError::BadRequest(format!("Invalid service data: {e}"))
}

impl Handler<CallService> for Controller {
    type Result = ResponseFuture<Result<serde_json::Value, ServiceError>>;

    fn handle(&mut self, msg: CallService, _ctx: &mut Self::Context) -> Self::Result {
        let Ok(service) = Service::from_str(&msg.service) else {
            let error = ServiceError::BadRequest(format!(
                "Unknown service: {}. Supported services: {}",
                msg.service,
                Service::VARIANTS.join(", ")
            ));
            return Box::pin(async move { Err(error) });
        };
        let entry = match self.service_target(&msg.entity_ids) {
            Ok(entry) => entry,
            Err(e) => return Box::pin(async move { Err(e) }),
        };
        info!("[{}] Calling service {service}", entry.client.id());

        let client = entry.client.clone();
        let data = msg.data;

        Box::pin(async move {
            let result = match service {
                Service::SendFixedNotification => {
                    let notification: FixedNotification = data.deserialize().map_err(bad_data)?;
                    client.send_fixed_notification(&notification).await?
                }
                Service::RemoveFixedNotification => {
                    let id: FixedNotificationId = data.deserialize().map_err(bad_data)?;
                    client
                        .send_fixed_notification(&FixedNotification::remove(id.id))
                        .await?
                }
                Service::ScreenOn => client.screen_on().await?,
                Service::RestartService => client.restart_service().await?,
                Service::GetFixedNotifications => client.get_fixed_notifications().await?,
            };
            Ok(result)
        })
    }
}
