//! Client for the Saferpay hosting gateway (query-string/XML API).
//!
//! Three operations cover a hosted payment:
//!
//! 1. [`SaferpayClient::get_payment_url`] creates a payment session and
//!    returns the URL the shopper is sent to.
//! 2. [`SaferpayClient::handle_pay_confirm`] verifies the signed
//!    confirmation callback with the gateway, parses its `DATA` XML and
//!    checks the echoed amount, currency, order id and account against the
//!    original request.
//! 3. [`SaferpayClient::complete_payment`] captures the authorized payment.
//!
//! Gateway failures, whether reported as an `ERROR: ` line or as an HTTP
//! status, come back as a typed [`SaferpayError`].
//!
//! # Quick example
//!
//! ```no_run
//! use saferpay::{ClientOptions, Params, SaferpayClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), saferpay::SaferpayError> {
//! let client = SaferpayClient::new(ClientOptions::new().account_id("99867-94913159"))?;
//!
//! let url = client
//!     .get_payment_url(
//!         &Params::new()
//!             .with("AMOUNT", "1000")
//!             .with("CURRENCY", "EUR")
//!             .with("DESCRIPTION", "Order 123456789-001"),
//!     )
//!     .await?;
//! println!("redirect shopper to {url}");
//! # Ok(())
//! # }
//! ```

pub mod callback;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod params;
pub mod response;
pub mod security;
pub mod transport;

pub use callback::CallbackData;
pub use client::SaferpayClient;
pub use config::{ClientOptions, Config, ConfigError};
pub use error::{ErrorKind, SaferpayError};
pub use params::{Fields, Params};
pub use response::{PayConfirmation, PaymentCompletion};
pub use transport::{GatewayRequest, GatewayResponse, HttpTransport, ReqwestTransport};
