// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Entity state and command handling.

use crate::controller::{Controller, EntityCommand, GetEntityStates};
use crate::coordinator::RequestRefresh;
use crate::entity::{EntityState, entity_states, execute};
use crate::errors::ServiceError;
use actix::{Handler, ResponseFuture};
use log::debug;

impl Handler<GetEntityStates> for Controller {
    type Result = Result<Vec<EntityState>, ServiceError>;

    fn handle(&mut self, msg: GetEntityStates, _ctx: &mut Self::Context) -> Self::Result {
        match msg.device_id {
            Some(device_id) => {
                let entry = self.entry(&device_id)?;
                Ok(entity_states(&entry.device_id, &entry.data))
            }
            None => Ok(self
                .entries
                .iter()
                .flat_map(|e| entity_states(&e.device_id, &e.data))
                .collect()),
        }
    }
}

/// Execute an entity action on the owning device.
///
/// A settings change requests an out-of-band coordinator refresh.
impl Handler<EntityCommand> for Controller {
    type Result = ResponseFuture<Result<(), ServiceError>>;

    fn handle(&mut self, msg: EntityCommand, _ctx: &mut Self::Context) -> Self::Result {
        let Some((entry, key)) = self.entity_owner(&msg.entity_id) else {
            let error = ServiceError::NotFound(format!("Entity not found: {}", msg.entity_id));
            return Box::pin(async move { Err(error) });
        };
        debug!("[{}] {}: {:?}", entry.client.id(), msg.entity_id, msg.action);

        let key = key.to_string();
        let client = entry.client.clone();
        let coordinator = entry.coordinator.clone();

        Box::pin(async move {
            if execute(&client, &key, msg.action).await? {
                coordinator.do_send(RequestRefresh);
            }
            Ok(())
        })
    }
}
