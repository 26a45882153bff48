//! Gateway client: credential handling, request signing, notification
//! verification, and the trade operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::canonicalize::{canonical_query, render_value, ParamMap, SIGN_FIELD};
use crate::error::Error;
use crate::request::{self, CallOverrides, TradeOp, BASE_URL};
use crate::sign::{self, SignType};

/// Client configuration. `app_id`, `app_private_key`, and
/// `alipay_public_key` are required; everything else has a sensible default
/// via `Default`.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Account identifier assigned by the gateway.
    pub app_id: String,
    /// Application public key. Stored for completeness, not used internally.
    pub app_public_key: Option<String>,
    /// Application private key (PEM or raw base64), used for signing.
    pub app_private_key: String,
    /// Gateway's public key (PEM or raw base64), used to verify inbound
    /// signatures such as asynchronous notifications.
    pub alipay_public_key: String,
    /// Signing algorithm; defaults to RSA2 (SHA-256).
    pub sign_type: SignType,
    /// Asynchronous notification callback URL.
    pub notify_url: Option<String>,
    /// Synchronous return URL (mobile-web payment only).
    pub return_url: Option<String>,
    /// Alternate gateway endpoint; defaults to the production endpoint.
    pub base_url: Option<String>,
}

/// Nested response object inside the gateway's JSON envelope.
///
/// A present `sub_msg` signals a business-level decline even when the HTTP
/// exchange itself succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_msg: Option<String>,
    /// Operation-specific response fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Client for the gateway's open API.
///
/// Credentials are normalized once at construction and immutable afterwards;
/// a client can be shared freely across tasks.
#[derive(Debug, Clone)]
pub struct AlipayClient {
    app_id: String,
    #[allow(dead_code)]
    app_public_key: Option<String>,
    app_private_key: String,
    alipay_public_key: String,
    sign_type: SignType,
    notify_url: Option<String>,
    return_url: Option<String>,
    base_url: String,
    http: reqwest::Client,
}

impl AlipayClient {
    /// Construct a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAppId`] if the account identifier is empty.
    /// Key material is normalized but not parsed here; malformed keys
    /// surface at sign/verify time.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        if config.app_id.trim().is_empty() {
            return Err(Error::MissingAppId);
        }

        Ok(Self {
            app_id: config.app_id,
            app_public_key: config.app_public_key,
            app_private_key: sign::normalize_private_key(&config.app_private_key),
            alipay_public_key: sign::normalize_public_key(&config.alipay_public_key),
            sign_type: config.sign_type,
            notify_url: config.notify_url,
            return_url: config.return_url,
            base_url: config.base_url.unwrap_or_else(|| BASE_URL.to_string()),
            http: reqwest::Client::new(),
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn sign_type(&self) -> SignType {
        self.sign_type
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Assemble the parameter mapping for an operation, resolving per-call
    /// URL overrides against the configured defaults.
    fn build_params(&self, op: TradeOp, biz_content: &Value, overrides: &CallOverrides) -> ParamMap {
        debug!(method = op.method(), app_id = %self.app_id, "assembling request parameters");
        request::build_params(
            op,
            &self.app_id,
            self.sign_type,
            biz_content,
            overrides.notify_url.as_deref().or(self.notify_url.as_deref()),
            overrides.return_url.as_deref().or(self.return_url.as_deref()),
            &request::timestamp(),
        )
    }

    /// Sign a fully assembled parameter mapping.
    ///
    /// The algorithm is taken from the mapping's `sign_type` field; the sign
    /// base is the canonical query with `sign` excluded and no encoding.
    pub fn sign_params(&self, params: &ParamMap) -> Result<String, Error> {
        let sign_type = extract_sign_type(params)?;
        let base = canonical_query(params, false);
        sign::sign_data(&self.app_private_key, base.as_bytes(), sign_type)
    }

    /// Verify an inbound parameter mapping (e.g. an asynchronous
    /// notification) against the gateway's public key.
    ///
    /// The canonical string is rebuilt from all fields except `sign` and
    /// `sign_type`. A mismatched signature is a normal `false`; only missing
    /// fields, an unknown algorithm, or malformed key/signature material
    /// are errors.
    pub fn verify_notification(&self, params: &ParamMap) -> Result<bool, Error> {
        let signature = params
            .get(SIGN_FIELD)
            .and_then(Value::as_str)
            .ok_or(Error::MissingField("sign"))?;
        let sign_type = extract_sign_type(params)?;

        let rest: ParamMap = params
            .iter()
            .filter(|(key, _)| key.as_str() != SIGN_FIELD && key.as_str() != "sign_type")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let base = canonical_query(&rest, false);

        sign::verify_signature(
            &self.alipay_public_key,
            base.as_bytes(),
            signature,
            sign_type,
        )
    }

    /// Build the signed order token for app payment.
    ///
    /// The result is the percent-encoded canonical string plus the appended,
    /// URL-encoded signature. It is an opaque token handed to the native
    /// mobile SDK, not a URL and not transmitted by this client.
    pub fn app_pay_order(
        &self,
        biz_content: Value,
        overrides: &CallOverrides,
    ) -> Result<String, Error> {
        let params = self.build_params(TradeOp::AppPay, &biz_content, overrides);
        let signature = self.sign_params(&params)?;
        Ok(format!(
            "{}&sign={}",
            canonical_query(&params, true),
            urlencoding::encode(&signature)
        ))
    }

    /// Build the signed redirect URL for mobile-web payment.
    ///
    /// Values are left unencoded; the HTTP client following the redirect
    /// performs its own encoding.
    pub fn wap_pay_url(
        &self,
        biz_content: Value,
        overrides: &CallOverrides,
    ) -> Result<String, Error> {
        let params = self.build_params(TradeOp::WapPay, &biz_content, overrides);
        let signature = self.sign_params(&params)?;
        Ok(format!(
            "{}?{}&sign={}",
            self.base_url,
            canonical_query(&params, false),
            urlencoding::encode(&signature)
        ))
    }

    /// Refund a completed trade.
    ///
    /// Issues a GET to the gateway with all parameters (including the
    /// signature) as the query string. A transport-level failure (network,
    /// non-2xx, malformed JSON) surfaces as [`Error::Http`] or
    /// [`Error::Json`]; a structurally valid response carrying `sub_msg`
    /// surfaces as [`Error::Gateway`] with the gateway's error payload.
    pub async fn refund(&self, biz_content: Value) -> Result<GatewayResponse, Error> {
        let mut params =
            self.build_params(TradeOp::Refund, &biz_content, &CallOverrides::default());
        let signature = self.sign_params(&params)?;
        params.insert(SIGN_FIELD.to_string(), Value::String(signature));

        let query: Vec<(&str, String)> = params
            .iter()
            .map(|(key, value)| (key.as_str(), render_value(value)))
            .collect();

        debug!(url = %self.base_url, method = TradeOp::Refund.method(), "sending refund request");
        let response = self
            .http
            .get(&self.base_url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        let envelope: Value = response.json().await?;
        Self::parse_envelope(TradeOp::Refund, envelope)
    }

    /// Extract and check the nested `<operation>_response` object from a
    /// gateway JSON envelope.
    fn parse_envelope(op: TradeOp, envelope: Value) -> Result<GatewayResponse, Error> {
        let field = op.response_field();
        let nested = envelope
            .get(&field)
            .cloned()
            .ok_or(Error::MalformedResponse(field))?;
        let payload: GatewayResponse = serde_json::from_value(nested)?;

        if payload.sub_msg.is_some() {
            debug!(sub_code = ?payload.sub_code, "gateway declined the operation");
            return Err(Error::Gateway(payload));
        }
        Ok(payload)
    }
}

/// Read and parse the `sign_type` field of a parameter mapping.
fn extract_sign_type(params: &ParamMap) -> Result<SignType, Error> {
    params
        .get("sign_type")
        .and_then(Value::as_str)
        .ok_or(Error::MissingField("sign_type"))?
        .parse()
}
