//! Planned failures for exercising clients against a misbehaving server.
//!
//! Tests plan a [`Fault`] for an endpoint; the next matching request is
//! delayed and/or answered with the planned status instead of reaching the
//! route. Requests with nothing planned pass straight through.

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::{Method, StatusCode};
use actix_web::middleware::Next;
use actix_web::{HttpResponse, web};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /teams`
    Join,
    /// `PUT /teams`
    Leave,
    /// `GET /teams/current`
    Current,
}

impl Endpoint {
    fn from_request(method: &Method, path: &str) -> Option<Self> {
        match (method, path) {
            (&Method::POST, "/teams") => Some(Self::Join),
            (&Method::PUT, "/teams") => Some(Self::Leave),
            (&Method::GET, "/teams/current") => Some(Self::Current),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fault {
    pub delay: Duration,
    /// Answer with this status instead of running the route.
    pub status: Option<u16>,
}

impl Fault {
    pub fn delay(delay: Duration) -> Self {
        Self {
            delay,
            status: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            delay: Duration::ZERO,
            status: Some(status),
        }
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }
}

#[derive(Clone, Default)]
pub struct FaultInjector {
    planned: Arc<Mutex<HashMap<Endpoint, VecDeque<Fault>>>>,
}

impl FaultInjector {
    /// Queue a fault for the next request to `endpoint`. Faults for the same
    /// endpoint are applied in the order they were planned.
    pub fn plan(&self, endpoint: Endpoint, fault: Fault) {
        self.planned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(endpoint)
            .or_default()
            .push_back(fault);
    }

    fn take(&self, endpoint: Endpoint) -> Option<Fault> {
        self.planned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&endpoint)?
            .pop_front()
    }
}

/// Middleware applying planned faults. Registered with
/// `actix_web::middleware::from_fn`.
pub async fn inject_faults(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, actix_web::Error> {
    let fault = Endpoint::from_request(req.method(), req.path()).and_then(
        |endpoint| {
            req.app_data::<web::Data<FaultInjector>>()
                .and_then(|faults| faults.take(endpoint))
        },
    );

    if let Some(fault) = fault {
        tracing::debug!(?fault, path = req.path(), "applying planned fault");
        if !fault.delay.is_zero() {
            tokio::time::sleep(fault.delay).await;
        }
        if let Some(status) = fault.status {
            let status = StatusCode::from_u16(status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let response = HttpResponse::build(status).body("Planned fault");
            return Ok(req.into_response(response));
        }
    }

    Ok(next.call(req).await?.map_into_boxed_body())
}
