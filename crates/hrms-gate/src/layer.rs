//! Authorization middleware layer.

use crate::{AccessGate, Decision, GateError, Principal, RequestOrigin};
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use hrms_authz::{Capability, Resource, Verb};
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::warn;

/// Identifier of the record a request targets, recorded on the audit entry.
///
/// Inserted into request extensions by whatever extracts it from the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId(pub String);

/// Gates a route on one capability.
#[derive(Clone)]
pub struct AuthzLayer {
    gate: Arc<AccessGate>,
    resource: Resource,
    verb: Verb,
}

impl AuthzLayer {
    pub fn new(gate: Arc<AccessGate>, resource: Resource, verb: Verb) -> Self {
        Self {
            gate,
            resource,
            verb,
        }
    }

    pub fn read(gate: Arc<AccessGate>, resource: Resource) -> Self {
        Self::new(gate, resource, Verb::View)
    }

    pub fn create(gate: Arc<AccessGate>, resource: Resource) -> Self {
        Self::new(gate, resource, Verb::Create)
    }

    pub fn update(gate: Arc<AccessGate>, resource: Resource) -> Self {
        Self::new(gate, resource, Verb::Update)
    }

    pub fn delete(gate: Arc<AccessGate>, resource: Resource) -> Self {
        Self::new(gate, resource, Verb::Delete)
    }

    pub fn approve(gate: Arc<AccessGate>, resource: Resource) -> Self {
        Self::new(gate, resource, Verb::Approve)
    }

    pub fn export(gate: Arc<AccessGate>, resource: Resource) -> Self {
        Self::new(gate, resource, Verb::Export)
    }
}

impl<S> Layer<S> for AuthzLayer {
    type Service = AuthzMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthzMiddleware {
            inner,
            gate: self.gate.clone(),
            resource: self.resource,
            verb: self.verb,
        }
    }
}

#[derive(Clone)]
pub struct AuthzMiddleware<S> {
    inner: S,
    gate: Arc<AccessGate>,
    resource: Resource,
    verb: Verb,
}

impl<S> Service<Request<Body>> for AuthzMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        let resource = self.resource;
        let verb = self.verb;
        // The readied service handles this request; the fresh clone waits
        // for the next poll_ready.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let Some(principal) = req.extensions().get::<Principal>().cloned() else {
                warn!(capability = %Capability::new(resource, verb), "authorization check without authentication");
                return Ok(GateError::Unauthenticated.into_response());
            };
            let origin = RequestOrigin::from_headers(req.headers());
            let resource_id = req.extensions().get::<ResourceId>().map(|id| id.0.clone());

            match gate
                .authorize(&principal, resource, verb, &origin, resource_id.as_deref())
                .await
            {
                Ok(Decision::Granted) => inner.call(req).await,
                Ok(Decision::Denied) => Ok(GateError::Forbidden {
                    capability: Capability::new(resource, verb).to_string(),
                }
                .into_response()),
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}
