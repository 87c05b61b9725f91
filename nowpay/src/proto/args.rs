//! Request bodies for the payment creation calls.

use serde::{Deserialize, Serialize};

use crate::error::PaymentError;
use crate::proto::PaymentAmount;

/// Arguments used to create a payment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentArgs {
    /// Price and order fields.
    #[serde(flatten)]
    pub amount: PaymentAmount,

    /// Makes the customer pay all fees. Used with fixed-rate exchanges.
    #[serde(rename = "is_fee_paid_by_user", skip_serializing_if = "Option::is_none")]
    pub fee_paid_by_user: Option<bool>,

    /// Locks the exchange rate at creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_rate: Option<bool>,

    /// Sends funds to this address instead of the account's default one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_address: Option<String>,

    /// Amount the customer pays, stated in crypto. Converted from
    /// `price_amount` by the API when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_amount: Option<f64>,

    /// Currency of the payout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_currency: Option<String>,

    /// Extra id, memo or tag for `payout_address`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_extra_id: Option<String>,

    /// Purchase to attach another payment to, for several payments against
    /// one order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_id: Option<String>,

    /// Sandbox-only test case selector (e.g. `"success"`, `"partially_paid"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<String>,
}

impl PaymentArgs {
    /// Creates payment arguments from a price.
    #[must_use]
    pub fn new(amount: PaymentAmount) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    /// Requests a fixed-rate exchange.
    #[must_use]
    pub const fn with_fixed_rate(mut self, fee_paid_by_user: bool) -> Self {
        self.fixed_rate = Some(true);
        self.fee_paid_by_user = Some(fee_paid_by_user);
        self
    }

    /// Sets the sandbox test case.
    #[must_use]
    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.case = Some(case.into());
        self
    }

    /// Checks that the required price fields are present.
    ///
    /// Only absent data is rejected. Range checks on the price are left to
    /// the API.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidArgument`] when `price_currency` is empty
    /// or `price_amount` is NaN.
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.amount.price_currency.is_empty() {
            return Err(PaymentError::InvalidArgument("missing price_currency"));
        }
        if self.amount.price_amount.is_nan() {
            return Err(PaymentError::InvalidArgument("missing price_amount"));
        }
        Ok(())
    }
}

/// Arguments used to create a payment from an existing invoice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePaymentArgs {
    /// Invoice identifier.
    #[serde(rename = "iid")]
    pub invoice_id: String,

    /// Cryptocurrency the customer pays with.
    pub pay_currency: String,

    /// Purchase to attach the payment to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_id: Option<String>,

    /// Merchant-side order description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_description: Option<String>,

    /// Customer email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// Currency of the payout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_currency: Option<String>,

    /// Extra id, memo or tag for `payout_address`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_extra_id: Option<String>,

    /// Payout address overriding the account default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_address: Option<String>,
}

impl InvoicePaymentArgs {
    /// Creates invoice payment arguments with the required fields.
    #[must_use]
    pub fn new(invoice_id: impl Into<String>, pay_currency: impl Into<String>) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            pay_currency: pay_currency.into(),
            ..Self::default()
        }
    }

    /// Sets the customer email.
    #[must_use]
    pub fn with_customer_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    /// Checks that the invoice id and pay currency are present.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::InvalidArgument`] when either is empty.
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.invoice_id.is_empty() {
            return Err(PaymentError::InvalidArgument("missing invoice id"));
        }
        if self.pay_currency.is_empty() {
            return Err(PaymentError::InvalidArgument("missing pay_currency"));
        }
        Ok(())
    }
}
