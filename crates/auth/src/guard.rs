//! Per-route permission guard for axum
//!
//! `RequirePermission` is a tower layer composed ahead of a handler with
//! `route_layer`. On success the validated claims are inserted into the
//! request extensions, where handlers read them with
//! `Extension<ValidatedClaims>`. On failure the handler is never called and
//! the `AuthError` is rendered instead.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use tower::{Layer, Service};

use crate::gate::AuthGate;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Layer requiring one permission string
#[derive(Clone)]
pub struct RequirePermission {
    gate: AuthGate,
    permission: Arc<str>,
}

impl RequirePermission {
    pub fn new(gate: AuthGate, permission: impl Into<Arc<str>>) -> Self {
        Self {
            gate,
            permission: permission.into(),
        }
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }
}

impl<S> Layer<S> for RequirePermission {
    type Service = RequirePermissionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePermissionService {
            inner,
            gate: self.gate.clone(),
            permission: Arc::clone(&self.permission),
        }
    }
}

#[derive(Clone)]
pub struct RequirePermissionService<S> {
    inner: S,
    gate: AuthGate,
    permission: Arc<str>,
}

impl<S> Service<Request> for RequirePermissionService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        // Keep the instance that was driven to readiness and leave the clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let gate = self.gate.clone();
        let permission = Arc::clone(&self.permission);

        Box::pin(async move {
            match gate.authorize(req.headers(), &permission).await {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    inner.call(req).await
                }
                Err(auth_error) => Ok(auth_error.into_response()),
            }
        })
    }
}
