// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Central controller managing the configured OverSight devices.
//!
//! Each device entry owns an API client and a polling coordinator. The controller caches the
//! latest coordinator data of every device and routes entity commands and service calls to the
//! owning device.

mod handler;
mod messages;

pub use handler::Service;
pub use messages::*;

use crate::client::DeviceClient;
use crate::configuration::{DeviceSettings, Settings};
use crate::coordinator::{Coordinator, CoordinatorData};
use crate::entity::{DeviceInfo, entity_key};
use crate::errors::ServiceError;
use actix::prelude::{Actor, Context};
use actix::Addr;
use log::info;

struct DeviceEntry {
    /// Unique device identifier
    device_id: String,
    title: String,
    settings: DeviceSettings,
    client: DeviceClient,
    coordinator: Addr<Coordinator>,
    /// Latest coordinator data
    data: CoordinatorData,
}

impl DeviceEntry {
    fn device_info(&self) -> DeviceInfo {
        DeviceInfo::new(&self.device_id, &self.title)
    }
}

pub struct Controller {
    settings: Settings,
    /// Configured devices in setup order
    entries: Vec<DeviceEntry>,
}

impl Controller {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            entries: Vec::new(),
        }
    }

    fn entry(&self, device_id: &str) -> Result<&DeviceEntry, ServiceError> {
        self.entries
            .iter()
            .find(|e| e.device_id == device_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Device not found: {device_id}")))
    }

    /// Find the device owning the entity. Returns the entry and the entity key.
    fn entity_owner<'a>(&self, entity_id: &'a str) -> Option<(&DeviceEntry, &'a str)> {
        self.entries
            .iter()
            .find_map(|e| entity_key(&e.device_id, entity_id).map(|key| (e, key)))
    }

    /// Target device of a service call: first device owning one of the entities, otherwise the
    /// first configured device.
    fn service_target(&self, entity_ids: &[String]) -> Result<&DeviceEntry, ServiceError> {
        entity_ids
            .iter()
            .find_map(|id| self.entity_owner(id).map(|(entry, _)| entry))
            .or_else(|| self.entries.first())
            .ok_or_else(|| ServiceError::NotFound("No OverSight devices configured".into()))
    }
}

impl Actor for Controller {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(
            "Controller started (polling: {}, request timeout: {:?}, retries: {})",
            self.settings.polling, self.settings.client.request_timeout, self.settings.client.retries
        );
    }
}
