//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use nowpay::{InvoicePaymentArgs, PaymentAmount, PaymentArgs};

/// Create payments through the NOWPayments API.
#[derive(Debug, Parser)]
#[command(name = "nowpay", version, about)]
pub struct Cli {
    /// JSON configuration file. Falls back to environment variables.
    #[arg(long, global = true, env = "NOWPAYMENTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Use the sandbox API regardless of the configured server.
    #[arg(long, global = true)]
    pub sandbox: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a payment.
    Create(CreateArgs),
    /// Create a payment from an existing invoice.
    FromInvoice(FromInvoiceArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Price of the order.
    #[arg(long)]
    pub price_amount: f64,
    /// Currency of the price (e.g. usd).
    #[arg(long)]
    pub price_currency: String,
    /// Cryptocurrency the customer pays with (e.g. btc).
    #[arg(long)]
    pub pay_currency: Option<String>,
    #[arg(long)]
    pub callback_url: Option<String>,
    #[arg(long)]
    pub order_id: Option<String>,
    #[arg(long)]
    pub order_description: Option<String>,
    /// Make the customer pay all fees.
    #[arg(long)]
    pub fee_paid_by_user: bool,
    /// Lock the exchange rate.
    #[arg(long)]
    pub fixed_rate: bool,
    #[arg(long)]
    pub payout_address: Option<String>,
    #[arg(long)]
    pub payout_currency: Option<String>,
    #[arg(long)]
    pub payout_extra_id: Option<String>,
    /// Amount to pay, stated in the pay currency.
    #[arg(long)]
    pub pay_amount: Option<f64>,
    #[arg(long)]
    pub purchase_id: Option<String>,
    /// Sandbox test case (e.g. success, partially_paid).
    #[arg(long)]
    pub case: Option<String>,
}

impl CreateArgs {
    /// Flags left off are omitted from the request.
    pub fn to_payment_args(&self) -> PaymentArgs {
        PaymentArgs {
            amount: PaymentAmount {
                price_amount: self.price_amount,
                price_currency: self.price_currency.clone(),
                pay_currency: self.pay_currency.clone(),
                callback_url: self.callback_url.clone(),
                order_id: self.order_id.clone(),
                order_description: self.order_description.clone(),
            },
            fee_paid_by_user: self.fee_paid_by_user.then_some(true),
            fixed_rate: self.fixed_rate.then_some(true),
            payout_address: self.payout_address.clone(),
            pay_amount: self.pay_amount,
            payout_currency: self.payout_currency.clone(),
            payout_extra_id: self.payout_extra_id.clone(),
            purchase_id: self.purchase_id.clone(),
            case: self.case.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct FromInvoiceArgs {
    /// Invoice identifier.
    #[arg(long)]
    pub invoice_id: String,
    /// Cryptocurrency the customer pays with.
    #[arg(long)]
    pub pay_currency: String,
    #[arg(long)]
    pub purchase_id: Option<String>,
    #[arg(long)]
    pub order_description: Option<String>,
    #[arg(long)]
    pub customer_email: Option<String>,
    #[arg(long)]
    pub payout_currency: Option<String>,
    #[arg(long)]
    pub payout_extra_id: Option<String>,
    #[arg(long)]
    pub payout_address: Option<String>,
}

impl FromInvoiceArgs {
    pub fn to_invoice_payment_args(&self) -> InvoicePaymentArgs {
        InvoicePaymentArgs {
            invoice_id: self.invoice_id.clone(),
            pay_currency: self.pay_currency.clone(),
            purchase_id: self.purchase_id.clone(),
            order_description: self.order_description.clone(),
            customer_email: self.customer_email.clone(),
            payout_currency: self.payout_currency.clone(),
            payout_extra_id: self.payout_extra_id.clone(),
            payout_address: self.payout_address.clone(),
        }
    }
}
