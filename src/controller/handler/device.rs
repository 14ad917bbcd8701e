// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Device setup and lifecycle handling.

use crate::client::DeviceClient;
use crate::controller::{Controller, DeviceEntry, ListDevices, SetupDevice, UnloadDevice};
use crate::coordinator::{Coordinator, CoordinatorData, Shutdown, StateUpdated, Subscribe};
use crate::entity::DeviceInfo;
use crate::errors::ServiceError;
use actix::{
    ActorFutureExt, AsyncContext, Handler, MessageResult, ResponseActFuture, WrapFuture, fut,
};
use log::{debug, info, warn};

/// Set up a device.
///
/// The initial coordinator refresh must succeed, otherwise the setup fails and no entry is
/// created. The unique device identifier is the device id reported by the device, or `host_port`
/// if the device didn't report one.
impl Handler<SetupDevice> for Controller {
    type Result = ResponseActFuture<Self, Result<DeviceInfo, ServiceError>>;

    fn handle(&mut self, msg: SetupDevice, ctx: &mut Self::Context) -> Self::Result {
        let device = msg.0;
        info!("[{}] Setting up device", device.address());

        let client = match DeviceClient::new(&device, &self.settings.client) {
            Ok(client) => client,
            Err(e) => return Box::pin(fut::result(Err(ServiceError::SetupFailed(e)))),
        };
        let update_interval = self.settings.polling.update_interval;
        let listener = ctx.address().recipient();
        let coordinator_client = client.clone();

        Box::pin(
            async move { Coordinator::first_refresh(coordinator_client, update_interval).await }
                .into_actor(self) // converts future to ActorFuture
                .map(move |result, act, _ctx| {
                    let (coordinator, state) = result.map_err(ServiceError::SetupFailed)?;

                    let device_id = if state.device_id.is_empty() {
                        format!("{}_{}", device.host, device.port)
                    } else {
                        state.device_id.clone()
                    };
                    if act.entries.iter().any(|e| e.device_id == device_id) {
                        warn!("[{}] Device {device_id} is already configured", device.address());
                        coordinator.do_send(Shutdown);
                        return Err(ServiceError::AlreadyConfigured(device_id));
                    }

                    let title = device
                        .name
                        .clone()
                        .filter(|name| !name.trim().is_empty())
                        .unwrap_or_else(|| state.device_name.clone());
                    coordinator.do_send(Subscribe(listener));

                    let entry = DeviceEntry {
                        device_id,
                        title,
                        settings: device,
                        client,
                        coordinator,
                        data: CoordinatorData {
                            state: Some(state),
                            last_update_success: true,
                            last_error: None,
                        },
                    };
                    info!(
                        "[{}] Device '{}' set up with id {}",
                        entry.client.id(),
                        entry.title,
                        entry.device_id
                    );
                    let device_info = entry.device_info();
                    act.entries.push(entry);

                    Ok(device_info)
                }),
        )
    }
}

impl Handler<UnloadDevice> for Controller {
    type Result = Result<(), ServiceError>;

    fn handle(&mut self, msg: UnloadDevice, _ctx: &mut Self::Context) -> Self::Result {
        let index = self
            .entries
            .iter()
            .position(|e| e.device_id == msg.device_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Device not found: {}", msg.device_id)))?;

        let entry = self.entries.remove(index);
        entry.coordinator.do_send(Shutdown);
        info!(
            "Unloaded device '{}' ({}) at {}",
            entry.title, entry.device_id, entry.settings
        );

        Ok(())
    }
}

impl Handler<ListDevices> for Controller {
    type Result = MessageResult<ListDevices>;

    fn handle(&mut self, _msg: ListDevices, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.entries.iter().map(|e| e.device_info()).collect())
    }
}

/// Cache the latest coordinator data.
impl Handler<StateUpdated> for Controller {
    type Result = ();

    fn handle(&mut self, msg: StateUpdated, _ctx: &mut Self::Context) -> Self::Result {
        match self
            .entries
            .iter_mut()
            .find(|e| e.client.id() == msg.address)
        {
            Some(entry) => {
                debug!(
                    "[{}] State update, available: {}",
                    msg.address, msg.data.last_update_success
                );
                entry.data = msg.data;
            }
            None => debug!("[{}] Ignoring state update of unknown device", msg.address),
        }
    }
}
