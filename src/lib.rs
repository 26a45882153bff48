//! # alipay-sdk
//!
//! Client SDK for the Alipay open API: deterministic request
//! canonicalization, RSA signing and verification, and the trade operations
//! built on top of them (app payment, mobile-web payment, refund).
//!
//! Every request is shaped the same way: business parameters are merged
//! with the fixed public parameters and per-call fields, serialized into a
//! canonical sorted query string, signed with the application's RSA private
//! key (`RSA1` for SHA-1, `RSA2` for SHA-256), and the signature attached
//! as the `sign` field. Inbound messages such as asynchronous notifications
//! are verified against the gateway's public key with the same canonical
//! construction.
//!
//! ## Quick Start
//!
//! ```rust
//! use alipay_sdk::{AlipayClient, CallOverrides, ClientConfig, generate_key_pair};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), alipay_sdk::Error> {
//! // Use your gateway-issued keys in production
//! let keys = generate_key_pair()?;
//!
//! let client = AlipayClient::new(ClientConfig {
//!     app_id: "2016080700188285".into(),
//!     app_private_key: keys.private_key_pem.clone(),
//!     alipay_public_key: keys.public_key_pem.clone(),
//!     notify_url: Some("https://example.com/notify".into()),
//!     ..Default::default()
//! })?;
//!
//! // Signed order token for the native mobile SDK
//! let order = client.app_pay_order(
//!     json!({
//!         "subject": "goods",
//!         "out_trade_no": "xxx",
//!         "total_amount": "1.00",
//!         "product_code": "QUICK_MSECURITY_PAY"
//!     }),
//!     &CallOverrides::default(),
//! )?;
//! assert!(order.contains("&sign="));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return `Result<T, Error>`. A mismatched signature
//! during verification is a normal `Ok(false)`, not an error; a refund the
//! gateway declines surfaces as [`Error::Gateway`] carrying the gateway's
//! error payload, distinct from transport failures.

pub mod canonicalize;
pub mod client;
pub mod error;
pub mod registry;
pub mod request;
pub mod sign;

pub use canonicalize::{canonical_query, ParamMap};
pub use client::{AlipayClient, ClientConfig, GatewayResponse};
pub use error::Error;
pub use registry::ClientRegistry;
pub use request::{CallOverrides, TradeOp, BASE_URL};
pub use sign::{generate_key_pair, KeyPair, SignType};
