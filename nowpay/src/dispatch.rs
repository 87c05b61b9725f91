//! The seam between the payment client and the HTTP layer.
//!
//! A [`Dispatcher`] takes a [`Route`] and a serialized JSON request body,
//! performs the call, and hands back the raw response body. Base URL,
//! credentials, timeouts and status handling all live behind it.

use std::sync::Arc;

use crate::route::Route;

/// Error surfaced by a [`Dispatcher`].
///
/// Boxed so the client can pass it to the caller unchanged. Callers that know
/// the dispatcher type can `downcast_ref` to its concrete error.
pub type DispatchError = Box<dyn std::error::Error + Send + Sync>;

/// Performs API calls by symbolic route name.
#[cfg_attr(target_family = "wasm", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_family = "wasm"), async_trait::async_trait)]
pub trait Dispatcher: Send + Sync {
    /// Sends `body` to `route` and returns the response body on success.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] on transport or HTTP failure.
    async fn send(&self, route: Route, body: Vec<u8>) -> Result<Vec<u8>, DispatchError>;
}

#[cfg_attr(target_family = "wasm", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_family = "wasm"), async_trait::async_trait)]
impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    async fn send(&self, route: Route, body: Vec<u8>) -> Result<Vec<u8>, DispatchError> {
        (**self).send(route, body).await
    }
}

#[cfg_attr(target_family = "wasm", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_family = "wasm"), async_trait::async_trait)]
impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    async fn send(&self, route: Route, body: Vec<u8>) -> Result<Vec<u8>, DispatchError> {
        (**self).send(route, body).await
    }
}
