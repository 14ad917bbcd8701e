// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

//! Scriptable in-process OverSight device for tests.
//!
//! Replies are served in the order they were queued with [`MockDevice::reply`]. Once the queue is
//! empty, the default reply is returned. Every request is recorded before the reply is produced.

use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::configuration::DeviceSettings;

#[derive(Clone, Debug)]
pub enum MockReply {
    Json(u16, Value),
    Raw(u16, String),
    /// Sleep before answering with an empty success result.
    Delay(Duration),
}

impl MockReply {
    /// Successful API envelope with the given result.
    pub fn ok(result: Value) -> Self {
        MockReply::Json(200, json!({"success": true, "result": result}))
    }

    pub fn json(status: u16, body: Value) -> Self {
        MockReply::Json(status, body)
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        MockReply::Raw(status, body.into())
    }
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

struct MockState {
    replies: Mutex<VecDeque<MockReply>>,
    default_reply: Mutex<MockReply>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockDevice {
    port: u16,
    state: Arc<MockState>,
}

impl MockDevice {
    /// Start the mock device on a random local port. Must be called from within an actix system.
    pub fn start() -> Self {
        let state = Arc::new(MockState {
            replies: Mutex::new(VecDeque::new()),
            default_reply: Mutex::new(MockReply::ok(json!({}))),
            requests: Mutex::new(Vec::new()),
        });
        let data = web::Data::from(state.clone());

        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .default_service(web::to(handle_request))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("mock device bind failed");
        let port = server.addrs()[0].port();
        actix_web::rt::spawn(server.run());

        Self { port, state }
    }

    /// A local port without a listener.
    pub fn unused_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind failed");
        listener.local_addr().expect("local address").port()
    }

    pub fn settings(&self) -> DeviceSettings {
        DeviceSettings::new("127.0.0.1", self.port)
    }

    /// Queue a reply for the next unanswered request.
    pub fn reply(&self, reply: MockReply) {
        self.state.replies.lock().unwrap().push_back(reply);
    }

    /// Reply returned when no queued reply is left.
    pub fn set_default(&self, reply: MockReply) {
        *self.state.default_reply.lock().unwrap() = reply;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Number of requests to the given path.
    pub fn count(&self, path: &str) -> usize {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }
}

async fn handle_request(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<MockState>,
) -> HttpResponse {
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    state.requests.lock().unwrap().push(RecordedRequest {
        method: req.method().to_string(),
        path: req.path().to_string(),
        body,
    });

    let queued = state.replies.lock().unwrap().pop_front();
    let reply = queued.unwrap_or_else(|| state.default_reply.lock().unwrap().clone());

    match reply {
        MockReply::Json(status, body) => HttpResponse::build(status_code(status)).json(body),
        MockReply::Raw(status, body) => HttpResponse::build(status_code(status))
            .content_type("text/html")
            .body(body),
        MockReply::Delay(delay) => {
            actix_web::rt::time::sleep(delay).await;
            HttpResponse::Ok().json(json!({"success": true, "result": {}}))
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).expect("valid status code")
}

/// `/info` result of a device with default settings.
pub fn device_info(device_id: &str, device_name: &str) -> Value {
    json!({
        "deviceId": device_id,
        "overlay": {
            "overlayVisibility": 0,
            "clockOverlayVisibility": 0,
            "hotCorner": "top_end"
        },
        "notifications": {
            "displayNotifications": true,
            "notificationDuration": 8,
            "displayFixedNotifications": true,
            "fixedNotificationsVisibility": 100
        },
        "settings": {
            "deviceName": device_name,
            "pixelShift": false,
            "remotePort": 5001
        }
    })
}
