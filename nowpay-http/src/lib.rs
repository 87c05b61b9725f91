//! HTTP transport for the NOWPayments API client.
//!
//! Provides [`HttpDispatcher`], a [`nowpay::Dispatcher`] that sends requests
//! with `reqwest`, and [`ClientConfig`] for loading the API key and server
//! from a file or the environment.
//!
//! # Modules
//!
//! - [`config`] - Client configuration loading
//! - [`constants`] - Server URLs, header names and the routing table
//! - [`dispatcher`] - The reqwest-backed dispatcher
//! - [`error`] - Transport and configuration error types
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use nowpay::{PaymentAmount, PaymentArgs};
//! use nowpay_http::ClientConfig;
//!
//! let client = nowpay_http::client(ClientConfig::from_env()?)?;
//! let payment = client
//!     .create_payment(&PaymentArgs::new(PaymentAmount::new(10.0, "usd").with_pay_currency("btc")))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;

pub use config::ClientConfig;
pub use dispatcher::HttpDispatcher;
pub use error::{ApiError, ConfigError, HttpDispatchError};

use nowpay::PaymentClient;

/// Builds a [`PaymentClient`] over an [`HttpDispatcher`] for `config`.
///
/// # Errors
///
/// Returns [`HttpDispatchError`] if the dispatcher cannot be built.
pub fn client(config: ClientConfig) -> Result<PaymentClient<HttpDispatcher>, HttpDispatchError> {
    HttpDispatcher::new(config).map(PaymentClient::new)
}
