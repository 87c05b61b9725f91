//! The payment gateway client.
//!
//! [`PaymentClient`] validates and serializes a request, hands it to its
//! [`Dispatcher`] under the matching [`Route`], and decodes the response with
//! [`decode_payment`]. It keeps no state besides the dispatcher, so it is safe
//! to share across tasks whenever the dispatcher is.

use serde::Serialize;

use crate::dispatch::Dispatcher;
use crate::error::PaymentError;
use crate::proto::{InvoicePaymentArgs, Payment, PaymentArgs, decode_payment};
use crate::route::Route;

#[cfg(feature = "telemetry")]
use tracing::instrument;

/// Client for the payment creation endpoints.
///
/// # Example
///
/// ```no_run
/// # async fn example<D: nowpay::Dispatcher>(dispatcher: D) -> Result<(), nowpay::PaymentError> {
/// use nowpay::{PaymentAmount, PaymentArgs, PaymentClient};
///
/// let client = PaymentClient::new(dispatcher);
/// let args = PaymentArgs::new(PaymentAmount::new(10.0, "usd").with_pay_currency("btc"));
/// let payment = client.create_payment(&args).await?;
/// println!("pay {} {:?} to {}", payment.pay_amount, payment.amount.pay_currency, payment.pay_address);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PaymentClient<D> {
    dispatcher: D,
}

impl<D> PaymentClient<D> {
    /// Creates a client on top of `dispatcher`.
    pub const fn new(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    /// Returns the underlying dispatcher.
    pub const fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Consumes the client and returns the dispatcher.
    pub fn into_inner(self) -> D {
        self.dispatcher
    }
}

impl<D: Dispatcher> PaymentClient<D> {
    /// Creates a payment.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::InvalidArgument`] if the price fields are missing.
    ///   Nothing is sent in that case.
    /// - [`PaymentError::Encoding`] if `args` cannot be serialized.
    /// - [`PaymentError::Dispatch`] with the dispatcher's error, unchanged.
    /// - [`PaymentError::Decoding`] if the response cannot be decoded.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "nowpay.payment.create", skip_all, fields(route = %Route::PaymentCreate))
    )]
    pub async fn create_payment(&self, args: &PaymentArgs) -> Result<Payment, PaymentError> {
        args.validate()?;
        self.call(Route::PaymentCreate, "payment args", args).await
    }

    /// Creates a payment from an existing invoice.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`PaymentClient::create_payment`]; `InvalidArgument`
    /// is returned when the invoice id or pay currency is empty.
    #[cfg_attr(
        feature = "telemetry",
        instrument(name = "nowpay.payment.from_invoice", skip_all, fields(route = %Route::InvoicePayment))
    )]
    pub async fn create_payment_from_invoice(
        &self,
        args: &InvoicePaymentArgs,
    ) -> Result<Payment, PaymentError> {
        args.validate()?;
        self.call(Route::InvoicePayment, "payment from invoice args", args)
            .await
    }

    async fn call<T>(
        &self,
        route: Route,
        context: &'static str,
        args: &T,
    ) -> Result<Payment, PaymentError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let body =
            serde_json::to_vec(args).map_err(|source| PaymentError::Encoding { context, source })?;
        let response = self
            .dispatcher
            .send(route, body)
            .await
            .map_err(PaymentError::dispatch)?;
        decode_payment(&response)
    }
}
