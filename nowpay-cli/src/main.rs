//! Command-line client for the payment API.
//!
//! # Usage
//!
//! ```bash
//! # Create a payment in the sandbox
//! NOWPAYMENTS_API_KEY=... nowpay --sandbox create --price-amount 10 --price-currency usd --pay-currency btc
//!
//! # Pay an existing invoice, reading settings from a JSON file
//! nowpay --config nowpay.json from-invoice --invoice-id 4522625843 --pay-currency btc
//!
//! # Configure logging level
//! RUST_LOG=debug nowpay ...
//! ```
//!
//! Settings are read from a `.env` file when present; see
//! [`nowpay_http::config`] for the recognized variables.

mod cli;

use std::io::Write;

use clap::Parser;
use nowpay::Payment;
use nowpay_http::ClientConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("nowpay failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;
    tracing::info!(server = %config.server, "Loaded configuration");

    let client = nowpay_http::client(config)?;
    let payment = match &cli.command {
        Command::Create(args) => client.create_payment(&args.to_payment_args()).await?,
        Command::FromInvoice(args) => {
            client
                .create_payment_from_invoice(&args.to_invoice_payment_args())
                .await?
        }
    };
    tracing::info!(payment_id = %payment.id, status = %payment.status, "Payment created");

    print_payment(&payment)
}

fn load_config(cli: &Cli) -> Result<ClientConfig, nowpay_http::ConfigError> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::from_env()?,
    };
    if cli.sandbox {
        return Ok(config.with_server(nowpay_http::constants::SANDBOX_URL));
    }
    Ok(config)
}

fn print_payment(payment: &Payment) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, payment)?;
    writeln!(stdout)?;
    Ok(())
}
