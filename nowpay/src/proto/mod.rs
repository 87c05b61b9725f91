//! Wire types for the payment API.
//!
//! All types serialize to JSON using the API's snake_case field names.
//! Optional request fields are omitted when unset rather than sent as `null`.
//!
//! # Key Types
//!
//! - [`PaymentAmount`] - Price and order fields shared by requests and responses
//! - [`PaymentArgs`] - Body of the create-payment call
//! - [`InvoicePaymentArgs`] - Body of the create-payment-from-invoice call
//! - [`Payment`] - The payment entity returned by the API

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

mod args;
mod payment;

pub use args::{InvoicePaymentArgs, PaymentArgs};
pub use payment::{PayAmountError, Payment, decode_payment};

/// Price and order fields common to payment requests and payment entities.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentAmount {
    /// Fiat (or crypto) price of the order.
    #[serde_as(as = "DefaultOnNull")]
    pub price_amount: f64,

    /// Currency the price is expressed in (e.g. `"usd"`).
    #[serde_as(as = "DefaultOnNull")]
    pub price_currency: String,

    /// Cryptocurrency the customer pays with (e.g. `"btc"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_currency: Option<String>,

    /// URL receiving instant payment notifications for this payment.
    #[serde(rename = "ipn_callback_url", skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,

    /// Merchant-side order identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Merchant-side order description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_description: Option<String>,
}

impl PaymentAmount {
    /// Creates an amount with only the required price fields set.
    #[must_use]
    pub fn new(price_amount: f64, price_currency: impl Into<String>) -> Self {
        Self {
            price_amount,
            price_currency: price_currency.into(),
            ..Self::default()
        }
    }

    /// Sets the currency the customer pays with.
    #[must_use]
    pub fn with_pay_currency(mut self, currency: impl Into<String>) -> Self {
        self.pay_currency = Some(currency.into());
        self
    }

    /// Sets the IPN callback URL.
    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    /// Sets the merchant order id and description.
    #[must_use]
    pub fn with_order(mut self, id: impl Into<String>, description: impl Into<String>) -> Self {
        self.order_id = Some(id.into());
        self.order_description = Some(description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_amount_with_required_fields_only() {
        let amount = PaymentAmount::new(3999.5, "usd");
        let value = serde_json::to_value(&amount).unwrap();
        assert_eq!(value, json!({ "price_amount": 3999.5, "price_currency": "usd" }));
    }

    #[test]
    fn test_amount_callback_url_wire_name() {
        let amount = PaymentAmount::new(1.0, "eur").with_callback_url("https://shop.example/ipn");
        let value = serde_json::to_value(&amount).unwrap();
        assert_eq!(value["ipn_callback_url"], "https://shop.example/ipn");
        assert!(value.get("callback_url").is_none());
    }

    #[test]
    fn test_amount_null_price_defaults() {
        let amount: PaymentAmount =
            serde_json::from_value(json!({ "price_amount": null, "price_currency": null }))
                .unwrap();
        assert_eq!(amount, PaymentAmount::default());
    }
}
