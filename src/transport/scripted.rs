//! In-memory [`Transport`] double with per-target replies and release gates.

use crate::domain::error::TransportError;
use crate::transport::{ApiRequest, RawResponse, RequestId, Transport};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Holds a scripted reply back until [`Gate::release`] is called.
#[derive(Clone)]
pub(crate) struct Gate(Arc<Semaphore>);

impl Gate {
    pub(crate) fn release(&self) {
        self.0.add_permits(1);
    }
}

#[derive(Clone)]
struct Route {
    status: u16,
    reply: Result<Value, TransportError>,
    gate: Option<Gate>,
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<String>>,
}

/// Wraps `data` in a success envelope.
pub(crate) fn envelope(data: Value) -> Value {
    json!({ "error": false, "message": "success", "data": data })
}

/// An `error: true` envelope.
pub(crate) fn rejection(message: &str) -> Value {
    json!({ "error": true, "message": message, "data": null })
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Replies to `target` (path plus query string) with a raw JSON body.
    pub(crate) fn reply(&self, target: &str, body: Value) {
        self.routes.lock().unwrap().insert(
            target.to_string(),
            Route {
                status: 200,
                reply: Ok(body),
                gate: None,
            },
        );
    }

    /// Replies to `target` with `body` under a non-default HTTP status.
    pub(crate) fn reply_with_status(&self, target: &str, status: u16, body: Value) {
        self.routes.lock().unwrap().insert(
            target.to_string(),
            Route {
                status,
                reply: Ok(body),
                gate: None,
            },
        );
    }

    pub(crate) fn fail(&self, target: &str, error: TransportError) {
        self.routes.lock().unwrap().insert(
            target.to_string(),
            Route {
                status: 200,
                reply: Err(error),
                gate: None,
            },
        );
    }

    /// Like [`Self::reply`], but the reply waits until the returned gate opens.
    pub(crate) fn reply_gated(&self, target: &str, body: Value) -> Gate {
        let gate = Gate(Arc::new(Semaphore::new(0)));
        self.routes.lock().unwrap().insert(
            target.to_string(),
            Route {
                status: 200,
                reply: Ok(body),
                gate: Some(gate.clone()),
            },
        );
        gate
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self, target: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.as_str() == target)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let target = request.target();
        self.calls.lock().unwrap().push(target.clone());
        let route = self.routes.lock().unwrap().get(&target).cloned();

        let Some(route) = route else {
            return Err(TransportError::ClientFault {
                status: 404,
                path: target,
            });
        };
        if let Some(gate) = route.gate {
            if let Ok(permit) = gate.0.acquire().await {
                permit.forget();
            }
        }
        let body = route.reply?;
        Ok(RawResponse {
            request_id: RequestId::generate(),
            status: route.status,
            body: serde_json::to_vec(&body).unwrap(),
        })
    }
}
