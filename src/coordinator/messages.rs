// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Actix actor message definitions used to communicate with the [`Coordinator`].

#[allow(unused_imports)] // used for doc links
use crate::coordinator::Coordinator;
use crate::coordinator::CoordinatorData;
use crate::errors::ApiError;
use actix::prelude::{Message, Recipient};
use derive_more::Constructor;

/// Refresh the device state now and return the outcome.
///
/// If a refresh is already in flight, a follow-up refresh is scheduled and the outcome of the last
/// completed refresh is returned.
#[derive(Debug, Default, Message)]
#[rtype(result = "Result<(), ApiError>")]
pub struct Refresh;

/// Out-of-band refresh request, e.g. after changing a device setting.
///
/// Fire and forget. Multiple requests during an in-flight refresh are coalesced into one
/// follow-up refresh. The polling schedule is not changed.
#[derive(Debug, Default, Message)]
#[rtype(result = "()")]
pub struct RequestRefresh;

/// Get the current state snapshot and update status.
#[derive(Debug, Default, Message)]
#[rtype(result = "CoordinatorData")]
pub struct GetData;

/// Register a listener for [`StateUpdated`] events.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Subscribe(pub Recipient<StateUpdated>);

/// Event sent to all listeners after every refresh attempt.
#[derive(Debug, Clone, Constructor, Message)]
#[rtype(result = "()")]
pub struct StateUpdated {
    /// `host:port` of the device
    pub address: String,
    pub data: CoordinatorData,
}

/// Stop polling. An in-flight refresh, including a pending retry, is abandoned.
#[derive(Debug, Default, Message)]
#[rtype(result = "()")]
pub struct Shutdown;
