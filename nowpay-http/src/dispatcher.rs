//! A [`nowpay::Dispatcher`] that talks to the payment API over HTTP.
//!
//! [`HttpDispatcher`] maps each [`Route`] onto a method and path beneath the
//! configured base URL, sends the JSON body with the `x-api-key` header, and
//! returns the raw response body on a 2xx status.
//!
//! ## Error Handling
//!
//! Failures are reported as [`HttpDispatchError`]:
//! - URL construction
//! - HTTP transport failures
//! - Response body read failures
//! - Non-2xx responses, decoded into [`ApiError`] when the body is the API's
//!   error object
//!
//! No request is retried.

use std::fmt::Display;
use std::time::Duration;

use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use nowpay::{DispatchError, Dispatcher, Route};
use reqwest::Client;
use url::Url;

use crate::config::ClientConfig;
use crate::constants::{API_KEY_HEADER, endpoint};
use crate::error::{ApiError, HttpDispatchError};

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

/// HTTP dispatcher for the payment API.
#[derive(Clone)]
pub struct HttpDispatcher {
    /// Base URL every route path is joined onto
    base_url: Url,
    /// Default headers, including the API key
    headers: HeaderMap,
    /// Per-request timeout
    timeout: Duration,
    /// Shared reqwest client
    client: Client,
}

impl HttpDispatcher {
    /// Creates a dispatcher for `config` with its own reqwest client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpDispatchError::Config`] if `config` is invalid,
    /// [`HttpDispatchError::InvalidApiKey`] if the key cannot be sent as a
    /// header, or [`HttpDispatchError::ClientBuild`] if reqwest fails to build.
    pub fn new(config: ClientConfig) -> Result<Self, HttpDispatchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(HttpDispatchError::ClientBuild)?;
        Self::with_client(config, client)
    }

    /// Creates a dispatcher for `config` on top of a pre-configured client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpDispatchError::Config`] if `config` is invalid, or
    /// [`HttpDispatchError::InvalidApiKey`] if the key cannot be sent as a header.
    pub fn with_client(config: ClientConfig, client: Client) -> Result<Self, HttpDispatchError> {
        config.validate()?;
        let base_url = config.base_url()?;

        let mut api_key =
            HeaderValue::from_str(config.api_key.trim()).map_err(HttpDispatchError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_KEY_HEADER, api_key);

        Ok(Self {
            base_url,
            headers,
            timeout: config.timeout(),
            client,
        })
    }

    /// Returns the base URL routes are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the full URL `route` is sent to.
    ///
    /// # Errors
    ///
    /// Returns [`HttpDispatchError::UrlParse`] if the path cannot be joined.
    pub fn route_url(&self, route: Route) -> Result<Url, HttpDispatchError> {
        let (_, path) = endpoint(route);
        self.base_url
            .join(path)
            .map_err(|source| HttpDispatchError::UrlParse {
                context: "Failed to construct route URL",
                source,
            })
    }

    /// Sends `body` to `route` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpDispatchError`] on transport failure or a non-2xx status.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "nowpay.http.dispatch",
            skip_all,
            fields(
                route = %route,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty,
            )
        )
    )]
    pub async fn dispatch(&self, route: Route, body: Vec<u8>) -> Result<Vec<u8>, HttpDispatchError> {
        let result = self.dispatch_inner(route, body).await;
        record_result_on_span(&result);
        result
    }

    async fn dispatch_inner(
        &self,
        route: Route,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, HttpDispatchError> {
        let context = route.name();
        let (method, _) = endpoint(route);
        let url = self.route_url(route)?;

        let response = self
            .client
            .request(method, url)
            .headers(self.headers.clone())
            .timeout(self.timeout)
            .body(body)
            .send()
            .await
            .map_err(|source| HttpDispatchError::Http { context, source })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| HttpDispatchError::ResponseBodyRead { context, source })?;

        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        let body = String::from_utf8_lossy(&bytes).into_owned();
        Err(match ApiError::from_body(status, &body) {
            Some(source) => HttpDispatchError::Api { context, source },
            None => HttpDispatchError::HttpStatus {
                context,
                status,
                body,
            },
        })
    }
}

#[cfg_attr(target_family = "wasm", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_family = "wasm"), async_trait::async_trait)]
impl Dispatcher for HttpDispatcher {
    async fn send(&self, route: Route, body: Vec<u8>) -> Result<Vec<u8>, DispatchError> {
        self.dispatch(route, body).await.map_err(Into::into)
    }
}

impl std::fmt::Debug for HttpDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDispatcher")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Records the outcome of a request on the current span.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
        }
    }
}

/// Records the outcome of a request on the current span.
/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
const fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use nowpay::{InvoicePaymentArgs, PaymentAmount, PaymentArgs, PaymentClient, PaymentError};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "test-api-key";

    fn config(server: &MockServer) -> ClientConfig {
        ClientConfig::new(API_KEY).with_server(format!("{}/v1", server.uri()))
    }

    fn client(server: &MockServer) -> PaymentClient<HttpDispatcher> {
        PaymentClient::new(HttpDispatcher::new(config(server)).unwrap())
    }

    fn args() -> PaymentArgs {
        PaymentArgs::new(
            PaymentAmount::new(3999.5, "usd")
                .with_pay_currency("btc")
                .with_order("RGDBP-21314", "Apple Macbook Pro 2019 x 1"),
        )
    }

    fn dispatch_error(err: PaymentError) -> HttpDispatchError {
        match err {
            PaymentError::Dispatch(inner) => *inner
                .downcast::<HttpDispatchError>()
                .expect("dispatch error from HttpDispatcher"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_payment_production_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment"))
            .and(header(API_KEY_HEADER, API_KEY))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "price_amount": 3999.5,
                "price_currency": "usd",
                "pay_currency": "btc",
                "order_id": "RGDBP-21314",
                "order_description": "Apple Macbook Pro 2019 x 1",
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "payment_id": "5745459419",
                "payment_status": "waiting",
                "pay_address": "3EZ2uTdVDAMFXTfc6uLDDKR6o8qKBZXVkj",
                "price_amount": 3999.5,
                "price_currency": "usd",
                "pay_amount": "0.17070286",
                "pay_currency": "btc",
                "order_id": "RGDBP-21314",
                "network": "btc",
                "network_precision": 8,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payment = client(&server).create_payment(&args()).await.unwrap();
        assert_eq!(payment.id, "5745459419");
        assert_eq!(payment.pay_amount, 0.170_702_86);
        assert_eq!(payment.pay_address, "3EZ2uTdVDAMFXTfc6uLDDKR6o8qKBZXVkj");
        assert_eq!(payment.amount.order_id.as_deref(), Some("RGDBP-21314"));
    }

    #[tokio::test]
    async fn test_create_payment_sandbox_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "payment_id": 5_745_459_419_u64,
                "payment_status": "waiting",
                "pay_amount": 0.170_702_86,
            })))
            .mount(&server)
            .await;

        let payment = client(&server).create_payment(&args()).await.unwrap();
        assert_eq!(payment.id, "5745459419");
        assert_eq!(payment.pay_amount, 0.170_702_86);
    }

    #[tokio::test]
    async fn test_create_payment_from_invoice_route() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/invoice-payment"))
            .and(body_json(json!({ "iid": "4522625843", "pay_currency": "btc" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payment_id": "6249365965",
                "payment_status": "waiting",
                "pay_amount": "0.0001",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payment = client(&server)
            .create_payment_from_invoice(&InvoicePaymentArgs::new("4522625843", "btc"))
            .await
            .unwrap();
        assert_eq!(payment.id, "6249365965");
        assert_eq!(payment.pay_amount, 0.0001);
    }

    #[tokio::test]
    async fn test_api_error_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": false,
                "statusCode": 400,
                "code": "AMOUNT_MINIMAL_ERROR",
                "message": "Amount is less than minimal",
            })))
            .mount(&server)
            .await;

        let err = client(&server).create_payment(&args()).await.unwrap_err();
        match dispatch_error(err) {
            HttpDispatchError::Api { context, source } => {
                assert_eq!(context, "payment-create");
                assert_eq!(source.status, http::StatusCode::BAD_REQUEST);
                assert_eq!(source.code, "AMOUNT_MINIMAL_ERROR");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unexpected_status_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client(&server).create_payment(&args()).await.unwrap_err();
        let err = dispatch_error(err);
        assert_eq!(err.status(), Some(http::StatusCode::BAD_GATEWAY));
        assert!(matches!(err, HttpDispatchError::HttpStatus { ref body, .. } if body == "bad gateway"));
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decoding_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment"))
            .respond_with(ResponseTemplate::new(201).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = client(&server).create_payment(&args()).await.unwrap_err();
        assert!(err.is_decoding());
    }

    #[tokio::test]
    async fn test_invalid_args_send_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .create_payment(&PaymentArgs::default())
            .await
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = HttpDispatcher::new(ClientConfig::default()).unwrap_err();
        assert!(matches!(err, HttpDispatchError::Config(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_route_urls() {
        let dispatcher = HttpDispatcher::new(ClientConfig::sandbox("key")).unwrap();
        assert_eq!(
            dispatcher.route_url(Route::PaymentCreate).unwrap().as_str(),
            "https://api-sandbox.nowpayments.io/v1/payment"
        );
        assert_eq!(
            dispatcher.route_url(Route::InvoicePayment).unwrap().as_str(),
            "https://api-sandbox.nowpayments.io/v1/invoice-payment"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let dispatcher = HttpDispatcher::new(ClientConfig::new("secret-key")).unwrap();
        assert!(!format!("{dispatcher:?}").contains("secret-key"));
    }
}
