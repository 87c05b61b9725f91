//! The payment entity and its response normalization.
//!
//! The API returns `payment_id` as a JSON number from the list endpoint and as
//! a string from the create endpoint. `pay_amount` is a string in production
//! and a number in the sandbox. [`Payment`] is first decoded into an
//! intermediate shape that keeps both fields as untyped JSON, then normalized.

use std::num::ParseFloatError;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use serde_with::{DefaultOnNull, serde_as};

use crate::error::PaymentError;
use crate::proto::PaymentAmount;

/// A payment as returned by the API.
///
/// `id` is always a string and `pay_amount` always an `f64`, whichever JSON
/// type the API used for them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPayment")]
pub struct Payment {
    /// Price and order fields echoed back by the API.
    #[serde(flatten)]
    pub amount: PaymentAmount,

    /// Server-assigned payment identifier.
    #[serde(rename = "payment_id")]
    pub id: String,
    /// Amount received so far, in `pay_currency`.
    pub amount_received: f64,
    /// Share of the payment burned, in percent.
    pub burning_percent: i64,
    /// Creation timestamp as sent by the API.
    pub created_at: String,
    /// Estimated expiry of the payment address.
    pub expiration_estimate_date: String,
    /// Blockchain network the payment is made on.
    pub network: String,
    /// Decimal precision of the network.
    pub network_precision: i64,
    /// Address the customer pays to.
    pub pay_address: String,
    /// Amount the customer pays, in `pay_currency`.
    pub pay_amount: f64,
    /// Extra id, memo or tag the customer must include.
    pub payin_extra_id: String,
    /// Purchase this payment belongs to.
    pub purchase_id: String,
    /// Token contract address, if any.
    pub smart_contract: String,
    /// Payment status (e.g. `"waiting"`, `"finished"`).
    #[serde(rename = "payment_status")]
    pub status: String,
    /// Payment time limit, if any.
    pub time_limit: String,
    /// Last update timestamp as sent by the API.
    pub updated_at: String,
}

/// Wire shape of [`Payment`] before normalization.
///
/// Absent or `null` fields take their zero value.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPayment {
    #[serde(flatten)]
    amount: PaymentAmount,

    payment_id: Value,
    #[serde_as(as = "DefaultOnNull")]
    amount_received: f64,
    #[serde_as(as = "DefaultOnNull")]
    burning_percent: i64,
    #[serde_as(as = "DefaultOnNull")]
    created_at: String,
    #[serde_as(as = "DefaultOnNull")]
    expiration_estimate_date: String,
    #[serde_as(as = "DefaultOnNull")]
    network: String,
    #[serde_as(as = "DefaultOnNull")]
    network_precision: i64,
    #[serde_as(as = "DefaultOnNull")]
    pay_address: String,
    pay_amount: Value,
    #[serde_as(as = "DefaultOnNull")]
    payin_extra_id: String,
    #[serde_as(as = "DefaultOnNull")]
    purchase_id: String,
    #[serde_as(as = "DefaultOnNull")]
    smart_contract: String,
    #[serde_as(as = "DefaultOnNull")]
    payment_status: String,
    #[serde_as(as = "DefaultOnNull")]
    time_limit: String,
    #[serde_as(as = "DefaultOnNull")]
    updated_at: String,
}

/// A string `pay_amount` that does not hold a usable float.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayAmountError {
    /// The string is not a float.
    #[error("parsing pay_amount {value:?} as a float: {source}")]
    Invalid {
        /// The offending wire value.
        value: String,
        /// The underlying parse error.
        #[source]
        source: ParseFloatError,
    },
    /// The string is numeric but does not fit in an `f64`.
    #[error("parsing pay_amount {value:?} as a float: value out of range")]
    OutOfRange {
        /// The offending wire value.
        value: String,
    },
}

impl TryFrom<RawPayment> for Payment {
    type Error = PayAmountError;

    fn try_from(raw: RawPayment) -> Result<Self, Self::Error> {
        let pay_amount = normalize_pay_amount(&raw.pay_amount)?;
        Ok(Self {
            amount: raw.amount,
            id: normalize_id(&raw.payment_id),
            amount_received: raw.amount_received,
            burning_percent: raw.burning_percent,
            created_at: raw.created_at,
            expiration_estimate_date: raw.expiration_estimate_date,
            network: raw.network,
            network_precision: raw.network_precision,
            pay_address: raw.pay_address,
            pay_amount,
            payin_extra_id: raw.payin_extra_id,
            purchase_id: raw.purchase_id,
            smart_contract: raw.smart_contract,
            status: raw.payment_status,
            time_limit: raw.time_limit,
            updated_at: raw.updated_at,
        })
    }
}

/// String amounts are parsed, numbers taken as is, anything else is `0.0`.
fn normalize_pay_amount(value: &Value) -> Result<f64, PayAmountError> {
    match value {
        Value::String(s) => parse_pay_amount(s),
        Value::Number(n) => Ok(n.as_f64().unwrap_or_default()),
        _ => Ok(0.0),
    }
}

/// Overflowing strings such as `"1e400"` are rejected; only an explicit
/// `inf` / `infinity` literal may yield an infinite amount.
fn parse_pay_amount(s: &str) -> Result<f64, PayAmountError> {
    let amount = s.parse::<f64>().map_err(|source| PayAmountError::Invalid {
        value: s.to_owned(),
        source,
    })?;
    if amount.is_infinite() && !is_infinity_literal(s) {
        return Err(PayAmountError::OutOfRange {
            value: s.to_owned(),
        });
    }
    Ok(amount)
}

fn is_infinity_literal(s: &str) -> bool {
    let unsigned = s.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Strings are taken as is, numbers become base-10 integers, anything else is `""`.
fn normalize_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => integer_string(n),
        _ => String::new(),
    }
}

fn integer_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    // Adding 0.0 turns -0 into 0.
    n.as_f64()
        .map(|f| format!("{}", f.trunc() + 0.0))
        .unwrap_or_default()
}

/// Decodes a raw API response into a [`Payment`].
///
/// # Errors
///
/// Returns [`PaymentError::Decoding`] if `bytes` is not a JSON object of the
/// expected shape or if `pay_amount` is a string that does not parse as a
/// float. A missing or `null` `payment_id` / `pay_amount` is not an error,
/// and a `null` body decodes to the all-zero [`Payment`].
pub fn decode_payment(bytes: &[u8]) -> Result<Payment, PaymentError> {
    serde_json::from_slice::<Option<Payment>>(bytes)
        .map(Option::unwrap_or_default)
        .map_err(|source| PaymentError::Decoding {
            context: "payment response",
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: &Value) -> Result<Payment, PaymentError> {
        decode_payment(&serde_json::to_vec(value).unwrap())
    }

    fn create_response() -> Value {
        json!({
            "payment_id": "5745459419",
            "payment_status": "waiting",
            "pay_address": "3EZ2uTdVDAMFXTfc6uLDDKR6o8qKBZXVkj",
            "price_amount": 3999.5,
            "price_currency": "usd",
            "pay_amount": "0.17070286",
            "pay_currency": "btc",
            "order_id": "RGDBP-21314",
            "order_description": "Apple Macbook Pro 2019 x 1",
            "ipn_callback_url": "https://nowpayments.io",
            "created_at": "2020-12-22T15:00:22.742Z",
            "updated_at": "2020-12-22T15:00:22.742Z",
            "purchase_id": "5837122679",
            "amount_received": null,
            "payin_extra_id": null,
            "smart_contract": "",
            "network": "btc",
            "network_precision": 8,
            "time_limit": null,
            "burning_percent": null,
            "expiration_estimate_date": "2020-12-23T15:00:22.742Z"
        })
    }

    #[test]
    fn test_decode_create_response() {
        let payment = decode(&create_response()).unwrap();
        assert_eq!(payment.id, "5745459419");
        assert_eq!(payment.status, "waiting");
        assert!((payment.pay_amount - 0.170_702_86).abs() < f64::EPSILON);
        assert_eq!(payment.amount.price_currency, "usd");
        assert_eq!(payment.amount.pay_currency.as_deref(), Some("btc"));
        assert_eq!(
            payment.amount.callback_url.as_deref(),
            Some("https://nowpayments.io")
        );
        assert_eq!(payment.network_precision, 8);
        assert_eq!(payment.amount_received, 0.0);
        assert_eq!(payment.payin_extra_id, "");
        assert_eq!(payment.time_limit, "");
    }

    #[test]
    fn test_payment_id_number() {
        let payment = decode(&json!({ "payment_id": 12345 })).unwrap();
        assert_eq!(payment.id, "12345");
    }

    #[test]
    fn test_payment_id_string() {
        let payment = decode(&json!({ "payment_id": "12345" })).unwrap();
        assert_eq!(payment.id, "12345");
    }

    #[test]
    fn test_payment_id_float_is_truncated() {
        let payment = decode(&json!({ "payment_id": 12345.9 })).unwrap();
        assert_eq!(payment.id, "12345");
    }

    #[test]
    fn test_payment_id_absent_or_other_type() {
        assert_eq!(decode(&json!({})).unwrap().id, "");
        assert_eq!(decode(&json!({ "payment_id": null })).unwrap().id, "");
        assert_eq!(decode(&json!({ "payment_id": true })).unwrap().id, "");
        assert_eq!(decode(&json!({ "payment_id": [1] })).unwrap().id, "");
    }

    #[test]
    fn test_pay_amount_string() {
        let payment = decode(&json!({ "pay_amount": "0.00123" })).unwrap();
        assert_eq!(payment.pay_amount, 0.00123);
    }

    #[test]
    fn test_pay_amount_number() {
        let payment = decode(&json!({ "pay_amount": 0.00123 })).unwrap();
        assert_eq!(payment.pay_amount, 0.00123);
    }

    #[test]
    fn test_pay_amount_absent_or_other_type() {
        assert_eq!(decode(&json!({})).unwrap().pay_amount, 0.0);
        assert_eq!(decode(&json!({ "pay_amount": null })).unwrap().pay_amount, 0.0);
        assert_eq!(decode(&json!({ "pay_amount": {} })).unwrap().pay_amount, 0.0);
    }

    #[test]
    fn test_pay_amount_invalid_string() {
        let err = decode(&json!({ "pay_amount": "not-a-number" })).unwrap_err();
        assert!(err.is_decoding());
        assert!(err.to_string().contains("not-a-number"));
    }

    #[test]
    fn test_pay_amount_out_of_range() {
        let err = decode(&json!({ "pay_amount": "1e400" })).unwrap_err();
        assert!(err.is_decoding());
        assert!(err.to_string().contains("out of range"));

        let err = decode(&json!({ "pay_amount": "-1e400" })).unwrap_err();
        assert!(err.is_decoding());
    }

    #[test]
    fn test_pay_amount_infinity_literal() {
        let payment = decode(&json!({ "pay_amount": "+Inf" })).unwrap();
        assert_eq!(payment.pay_amount, f64::INFINITY);
        let payment = decode(&json!({ "pay_amount": "-infinity" })).unwrap();
        assert_eq!(payment.pay_amount, f64::NEG_INFINITY);
    }

    #[test]
    fn test_null_body_is_zero_entity() {
        assert_eq!(decode_payment(b"null").unwrap(), Payment::default());
        assert_eq!(decode_payment(b" null ").unwrap(), Payment::default());
    }

    #[test]
    fn test_decode_malformed_json() {
        assert!(decode_payment(b"{\"payment_id\":").unwrap_err().is_decoding());
        assert!(decode_payment(b"[]").unwrap_err().is_decoding());
        assert!(decode_payment(b"").unwrap_err().is_decoding());
    }

    #[test]
    fn test_decode_wrong_field_type() {
        let err = decode(&json!({ "network_precision": "eight" })).unwrap_err();
        assert!(err.is_decoding());
    }

    #[test]
    fn test_empty_object_is_zero_entity() {
        assert_eq!(decode(&json!({})).unwrap(), Payment::default());
    }

    #[test]
    fn test_serialized_payment_decodes_back() {
        let payment = decode(&create_response()).unwrap();
        let value = serde_json::to_value(&payment).unwrap();
        assert_eq!(value["payment_id"], "5745459419");
        assert_eq!(value["payment_status"], "waiting");
        assert_eq!(decode(&value).unwrap(), payment);
    }
}
