// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Polling state coordinator.
//!
//! One coordinator actor per device. It owns the latest [`DeviceState`] snapshot, refreshes it
//! on a fixed interval and on request, and tracks the device availability. A failed refresh keeps
//! the last known good snapshot.

mod messages;

pub use messages::*;

use crate::client::{DeviceClient, DeviceState};
use crate::errors::ApiError;
use actix::prelude::{Actor, ActorContext, Context, Recipient};
use actix::{
    ActorFutureExt, Addr, AsyncContext, Handler, MessageResult, ResponseActFuture, WrapFuture, fut,
};
use log::{debug, error, info};
use rust_fsm::*;
use std::sync::Arc;
use std::time::Duration;

state_machine! {
    derive(Debug)
    Availability(Healthy)

    Healthy => {
        RefreshSucceeded => Healthy,
        RefreshFailed => Degraded [BecameUnavailable],
    },
    Degraded => {
        RefreshSucceeded => Healthy [Recovered],
        RefreshFailed => Degraded,
    }
}

/// Snapshot of the coordinator data for readers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatorData {
    /// Last known good device state. `None` if it was never populated.
    pub state: Option<Arc<DeviceState>>,
    /// Outcome of the last refresh attempt.
    pub last_update_success: bool,
    pub last_error: Option<ApiError>,
}

impl CoordinatorData {
    pub fn is_available(&self) -> bool {
        self.last_update_success
    }
}

pub struct Coordinator {
    /// `host:port` of the device, used as log prefix
    id: String,
    client: DeviceClient,
    update_interval: Duration,
    state: Option<Arc<DeviceState>>,
    last_update_success: bool,
    last_error: Option<ApiError>,
    machine: StateMachine<Availability>,
    /// A refresh is in flight
    refreshing: bool,
    /// A refresh was requested while another one was in flight
    refresh_pending: bool,
    listeners: Vec<Recipient<StateUpdated>>,
}

impl Coordinator {
    fn new(client: DeviceClient, update_interval: Duration, state: Arc<DeviceState>) -> Self {
        Self {
            id: client.id().to_string(),
            client,
            update_interval,
            state: Some(state),
            last_update_success: true,
            last_error: None,
            machine: StateMachine::new(),
            refreshing: false,
            refresh_pending: false,
            listeners: Vec::new(),
        }
    }

    /// Perform the initial refresh and start the coordinator.
    ///
    /// No coordinator is started if the device can't be reached or returns an error. The error
    /// is returned as is and should be treated as a setup failure.
    pub async fn first_refresh(
        client: DeviceClient,
        update_interval: Duration,
    ) -> Result<(Addr<Coordinator>, Arc<DeviceState>), ApiError> {
        let state = match fetch_state(&client).await {
            Ok(state) => state,
            Err(e) => {
                error!("[{}] Initial device refresh failed: {e}", client.id());
                return Err(e);
            }
        };
        info!(
            "[{}] Connected to '{}' ({})",
            client.id(),
            state.device_name,
            state.device_id
        );

        let state = Arc::new(state);
        let addr = Coordinator::new(client, update_interval, state.clone()).start();
        Ok((addr, state))
    }

    fn data(&self) -> CoordinatorData {
        CoordinatorData {
            state: self.state.clone(),
            last_update_success: self.last_update_success,
            last_error: self.last_error.clone(),
        }
    }

    /// Start a refresh. Must only be called if no other refresh is in flight.
    fn refresh(&mut self) -> ResponseActFuture<Self, Result<(), ApiError>> {
        self.refreshing = true;
        let client = self.client.clone();

        Box::pin(
            async move { fetch_state(&client).await }
                .into_actor(self) // converts future to ActorFuture
                .map(|result, act, ctx| {
                    act.refreshing = false;
                    let outcome = act.update(result);
                    act.notify_listeners();
                    if act.refresh_pending {
                        act.refresh_pending = false;
                        ctx.notify(RequestRefresh);
                    }
                    outcome
                }),
        )
    }

    fn update(&mut self, result: Result<DeviceState, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(state) => {
                debug!("[{}] Device state refreshed", self.id);
                self.state = Some(Arc::new(state));
                self.last_update_success = true;
                self.last_error = None;
                self.transition(AvailabilityInput::RefreshSucceeded);
                Ok(())
            }
            Err(e) => {
                debug!("[{}] Device refresh failed: {e}", self.id);
                self.last_update_success = false;
                self.last_error = Some(e.clone());
                self.transition(AvailabilityInput::RefreshFailed);
                Err(e)
            }
        }
    }

    fn transition(&mut self, input: AvailabilityInput) {
        match self.machine.consume(&input) {
            Ok(Some(AvailabilityOutput::BecameUnavailable)) => {
                let cause = self
                    .last_error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                error!("[{}] Device is unavailable: {cause}", self.id);
            }
            Ok(Some(AvailabilityOutput::Recovered)) => {
                info!("[{}] Device is available again", self.id);
            }
            Ok(None) => {}
            Err(_) => error!(
                "[{}] Invalid availability transition {:?} in state {:?}",
                self.id,
                input,
                self.machine.state()
            ),
        }
    }

    fn notify_listeners(&mut self) {
        let data = self.data();
        // drop listeners which are gone
        self.listeners.retain(|listener| listener.connected());
        for listener in &self.listeners {
            listener.do_send(StateUpdated::new(self.id.clone(), data.clone()));
        }
    }
}

async fn fetch_state(client: &DeviceClient) -> Result<DeviceState, ApiError> {
    let info = client.get_info().await?;
    DeviceState::from_info(&info).map_err(ApiError::unexpected)
}

impl Actor for Coordinator {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        debug!("[{}] Polling device every {:?}", self.id, self.update_interval);
        ctx.run_interval(self.update_interval, |act, ctx| {
            if act.refreshing {
                debug!("[{}] Refresh in progress, skipping scheduled update", act.id);
                return;
            }
            ctx.spawn(act.refresh().map(|_, _, _| ()));
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[{}] Coordinator stopped", self.id);
    }
}

impl Handler<Refresh> for Coordinator {
    type Result = ResponseActFuture<Self, Result<(), ApiError>>;

    fn handle(&mut self, _msg: Refresh, _ctx: &mut Self::Context) -> Self::Result {
        if self.refreshing {
            self.refresh_pending = true;
            let last = match &self.last_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            };
            return Box::pin(fut::result(last));
        }
        self.refresh()
    }
}

impl Handler<RequestRefresh> for Coordinator {
    type Result = ();

    fn handle(&mut self, _msg: RequestRefresh, ctx: &mut Self::Context) -> Self::Result {
        if self.refreshing {
            debug!("[{}] Refresh in progress, scheduling follow-up", self.id);
            self.refresh_pending = true;
        } else {
            ctx.spawn(self.refresh().map(|_, _, _| ()));
        }
    }
}

impl Handler<GetData> for Coordinator {
    type Result = MessageResult<GetData>;

    fn handle(&mut self, _msg: GetData, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.data())
    }
}

impl Handler<Subscribe> for Coordinator {
    type Result = ();

    fn handle(&mut self, msg: Subscribe, _ctx: &mut Self::Context) -> Self::Result {
        self.listeners.push(msg.0);
    }
}

impl Handler<Shutdown> for Coordinator {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        debug!("[{}] Shutting down coordinator", self.id);
        ctx.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HotCorner;
    use crate::configuration::{ClientSettings, DeviceSettings};
    use crate::mock_device::{MockDevice, MockReply, device_info};
    use actix::clock::sleep;
    use std::sync::Mutex;

    const NO_POLLING: Duration = Duration::from_secs(3600);

    fn client_settings() -> ClientSettings {
        ClientSettings {
            request_timeout: Duration::from_millis(500),
            retries: 1,
            retry_interval: Duration::from_millis(20),
        }
    }

    fn client(device: &DeviceSettings) -> DeviceClient {
        DeviceClient::new(device, &client_settings()).unwrap()
    }

    struct Listener(Arc<Mutex<Vec<StateUpdated>>>);

    impl Actor for Listener {
        type Context = Context<Self>;
    }

    impl Handler<StateUpdated> for Listener {
        type Result = ();

        fn handle(&mut self, msg: StateUpdated, _ctx: &mut Self::Context) -> Self::Result {
            self.0.lock().unwrap().push(msg);
        }
    }

    #[actix_web::test]
    async fn first_refresh_failure_starts_no_coordinator() {
        let device = DeviceSettings::new("127.0.0.1", MockDevice::unused_port());

        let result = Coordinator::first_refresh(client(&device), NO_POLLING).await;

        match result {
            Err(e) => assert!(matches!(e, ApiError::Communication { .. }), "{e:?}"),
            Ok(_) => panic!("Coordinator must not start"),
        }
    }

    #[actix_web::test]
    async fn first_refresh_device_error_fails_setup() {
        let device = MockDevice::start();
        device.set_default(MockReply::json(200, serde_json::json!({"success": false})));

        let result = Coordinator::first_refresh(client(&device.settings()), NO_POLLING).await;

        assert_eq!(Some(ApiError::api("Unknown API error")), result.err());
    }

    #[actix_web::test]
    async fn first_refresh_returns_snapshot() {
        let device = MockDevice::start();
        device.set_default(MockReply::ok(device_info("abc", "Living Room")));

        let (addr, state) = Coordinator::first_refresh(client(&device.settings()), NO_POLLING)
            .await
            .unwrap();

        assert_eq!("abc", state.device_id);
        assert_eq!("Living Room", state.device_name);
        let data = addr.send(GetData).await.unwrap();
        assert!(data.is_available());
        assert_eq!(Some(state), data.state);
        assert_eq!(None, data.last_error);
    }

    #[actix_web::test]
    async fn failed_refresh_keeps_last_snapshot() {
        let device = MockDevice::start();
        device.set_default(MockReply::ok(device_info("abc", "Living Room")));
        let (addr, state) = Coordinator::first_refresh(client(&device.settings()), NO_POLLING)
            .await
            .unwrap();
        for _ in 0..3 {
            assert_eq!(Ok(()), addr.send(Refresh).await.unwrap());
        }

        device.set_default(MockReply::json(500, serde_json::json!({})));
        let result = addr.send(Refresh).await.unwrap();

        assert!(matches!(result, Err(ApiError::Api { .. })), "{result:?}");
        let data = addr.send(GetData).await.unwrap();
        assert!(!data.is_available());
        assert_eq!(result.err(), data.last_error);
        assert_eq!(Some(state), data.state, "Last known good state must be kept");
        assert_eq!(5, device.count("/info"));
    }

    #[actix_web::test]
    async fn successful_refresh_after_failure_recovers() {
        let device = MockDevice::start();
        device.set_default(MockReply::ok(device_info("abc", "Living Room")));
        let (addr, _) = Coordinator::first_refresh(client(&device.settings()), NO_POLLING)
            .await
            .unwrap();
        device.reply(MockReply::json(200, serde_json::json!({"success": false})));
        assert!(addr.send(Refresh).await.unwrap().is_err());

        let mut info = device_info("abc", "Living Room");
        info["overlay"]["hotCorner"] = "bottom_start".into();
        device.reply(MockReply::ok(info));
        let result = addr.send(Refresh).await.unwrap();

        assert_eq!(Ok(()), result);
        let data = addr.send(GetData).await.unwrap();
        assert!(data.is_available());
        assert_eq!(None, data.last_error);
        assert_eq!(
            HotCorner::BottomStart,
            data.state.expect("device state").hot_corner
        );
    }

    #[actix_web::test]
    async fn device_is_polled_on_interval() {
        let device = MockDevice::start();
        device.set_default(MockReply::ok(device_info("abc", "TV")));

        let (_addr, _) =
            Coordinator::first_refresh(client(&device.settings()), Duration::from_millis(100))
                .await
                .unwrap();
        sleep(Duration::from_millis(450)).await;

        let count = device.count("/info");
        assert!(count >= 4, "Expected at least 3 scheduled refreshes, got {}", count - 1);
    }

    #[actix_web::test]
    async fn scheduled_update_is_skipped_while_refreshing() {
        let device = MockDevice::start();
        device.reply(MockReply::ok(device_info("abc", "TV")));
        // every poll takes longer than two update intervals
        device.set_default(MockReply::Delay(Duration::from_millis(250)));

        let (_addr, _) =
            Coordinator::first_refresh(client(&device.settings()), Duration::from_millis(100))
                .await
                .unwrap();
        sleep(Duration::from_millis(800)).await;

        // polls start at ~100, ~400 and ~700 ms. Overlapping polls would issue one per tick.
        let count = device.count("/info");
        assert!(
            (2..=5).contains(&count),
            "Expected no overlapping refreshes, got {} /info requests",
            count
        );
    }

    #[actix_web::test]
    async fn refresh_requests_are_coalesced() {
        let device = MockDevice::start();
        device.set_default(MockReply::ok(device_info("abc", "TV")));
        let (addr, _) = Coordinator::first_refresh(client(&device.settings()), NO_POLLING)
            .await
            .unwrap();
        device.reply(MockReply::Delay(Duration::from_millis(150)));
        device.reply(MockReply::Delay(Duration::from_millis(150)));

        for _ in 0..3 {
            addr.do_send(RequestRefresh);
        }
        sleep(Duration::from_millis(600)).await;

        // initial refresh + in-flight refresh + one follow-up
        assert_eq!(3, device.count("/info"));
    }

    #[actix_web::test]
    async fn shutdown_stops_polling() {
        let device = MockDevice::start();
        device.set_default(MockReply::ok(device_info("abc", "TV")));
        let (addr, _) =
            Coordinator::first_refresh(client(&device.settings()), Duration::from_millis(100))
                .await
                .unwrap();

        addr.send(Shutdown).await.unwrap();
        sleep(Duration::from_millis(50)).await;
        let count = device.count("/info");
        sleep(Duration::from_millis(300)).await;

        assert!(!addr.connected());
        assert_eq!(count, device.count("/info"));
    }

    #[actix_web::test]
    async fn listeners_are_notified_after_each_refresh() {
        let device = MockDevice::start();
        device.set_default(MockReply::ok(device_info("abc", "TV")));
        let (addr, _) = Coordinator::first_refresh(client(&device.settings()), NO_POLLING)
            .await
            .unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));
        let listener = Listener(events.clone()).start();
        addr.send(Subscribe(listener.recipient())).await.unwrap();

        addr.send(Refresh).await.unwrap().unwrap();
        device.reply(MockReply::json(503, serde_json::json!({})));
        let _ = addr.send(Refresh).await.unwrap();
        sleep(Duration::from_millis(50)).await;

        let events = events.lock().unwrap();
        assert_eq!(2, events.len());
        assert_eq!(device.settings().address(), events[0].address);
        assert!(events[0].data.last_update_success);
        assert!(!events[1].data.last_update_success);
        assert!(events[1].data.state.is_some());
    }
}
