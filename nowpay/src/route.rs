//! Symbolic names for the API routes this client calls.
//!
//! The core crate only knows routes by name. Mapping a route onto an HTTP
//! method and path is the dispatcher's job.

use std::fmt;
use std::str::FromStr;

/// A named API route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Create a payment (`payment-create`).
    PaymentCreate,
    /// Create a payment from an existing invoice (`invoice-payment`).
    InvoicePayment,
}

impl Route {
    /// All known routes.
    pub const ALL: [Self; 2] = [Self::PaymentCreate, Self::InvoicePayment];

    /// Returns the symbolic route name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PaymentCreate => "payment-create",
            Self::InvoicePayment => "invoice-payment",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown route name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown route: {0}")]
pub struct UnknownRouteError(pub String);

impl FromStr for Route {
    type Err = UnknownRouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|route| route.name() == s)
            .ok_or_else(|| UnknownRouteError(s.to_owned()))
    }
}
