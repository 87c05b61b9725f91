#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types and payment client for the NOWPayments API.
//!
//! This crate builds typed request payloads, hands them to a [`Dispatcher`]
//! by symbolic [`Route`], and decodes the responses into typed entities.
//! It performs no network I/O itself; the `nowpay-http` crate provides a
//! reqwest-backed dispatcher.
//!
//! # Overview
//!
//! The remote API is not consistent about the JSON types it returns. The
//! payment identifier arrives as a number from some endpoints and as a string
//! from others, and the pay amount arrives as a string in production and as a
//! number in the sandbox. [`proto::Payment`] always exposes a `String` id and
//! an `f64` pay amount, whatever the wire said.
//!
//! # Modules
//!
//! - [`client`] - [`PaymentClient`] with the payment creation operations
//! - [`dispatch`] - The [`Dispatcher`] seam to the HTTP layer
//! - [`error`] - [`PaymentError`] taxonomy
//! - [`proto`] - Wire types and response normalization
//! - [`route`] - Symbolic route names
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation for debugging and monitoring

pub mod client;
pub mod dispatch;
pub mod error;
pub mod proto;
pub mod route;

pub use client::PaymentClient;
pub use dispatch::{DispatchError, Dispatcher};
pub use error::PaymentError;
pub use proto::{InvoicePaymentArgs, Payment, PaymentAmount, PaymentArgs, decode_payment};
pub use route::Route;
