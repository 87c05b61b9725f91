//! Server URLs, header names and the route table.

use http::Method;
use nowpay::Route;

/// Production API base URL.
pub const PRODUCTION_URL: &str = "https://api.nowpayments.io/v1/";

/// Sandbox API base URL.
pub const SANDBOX_URL: &str = "https://api-sandbox.nowpayments.io/v1/";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Returns the HTTP method and base-relative path for `route`.
#[must_use]
pub fn endpoint(route: Route) -> (Method, &'static str) {
    match route {
        Route::PaymentCreate => (Method::POST, "payment"),
        Route::InvoicePayment => (Method::POST, "invoice-payment"),
    }
}
