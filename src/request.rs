//! Per-operation request parameter assembly.
//!
//! Each trade operation merges the same fixed public parameters with the
//! per-call fields (method, app_id, sign_type, timestamp, biz_content).
//! Which optional URL fields apply is driven by a small table on
//! [`TradeOp`] rather than per-method branching, so adding an operation is
//! one variant plus its table entries.

use chrono::Local;
use serde_json::Value;

use crate::canonicalize::ParamMap;
use crate::sign::SignType;

/// Production gateway endpoint.
pub const BASE_URL: &str = "https://openapi.alipay.com/gateway.do";

/// Fixed public parameters present on every request.
const PUBLIC_PARAMS: [(&str, &str); 3] = [("format", "JSON"), ("charset", "utf-8"), ("version", "1.0")];

/// Trade operations supported by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOp {
    /// App payment: produces an order token for the native mobile SDK.
    AppPay,
    /// Mobile-web payment: produces a redirect URL.
    WapPay,
    /// Refund of a completed trade.
    Refund,
}

impl TradeOp {
    /// Gateway method name.
    pub fn method(self) -> &'static str {
        match self {
            TradeOp::AppPay => "alipay.trade.app.pay",
            TradeOp::WapPay => "alipay.trade.wap.pay",
            TradeOp::Refund => "alipay.trade.refund",
        }
    }

    /// Whether the asynchronous notification URL applies to this operation.
    pub fn uses_notify_url(self) -> bool {
        matches!(self, TradeOp::AppPay | TradeOp::WapPay)
    }

    /// Whether the synchronous return URL applies to this operation.
    pub fn uses_return_url(self) -> bool {
        matches!(self, TradeOp::WapPay)
    }

    /// Name of the nested response object in the gateway's JSON envelope,
    /// e.g. `alipay_trade_refund_response`.
    pub fn response_field(self) -> String {
        format!("{}_response", self.method().replace('.', "_"))
    }
}

/// Per-call overrides of the configured callback URLs.
#[derive(Debug, Clone, Default)]
pub struct CallOverrides {
    /// Overrides the configured asynchronous notification URL.
    pub notify_url: Option<String>,
    /// Overrides the configured synchronous return URL (mobile-web only).
    pub return_url: Option<String>,
}

/// Request timestamp in the gateway's `YYYY-MM-DD HH:mm:ss` format, local time.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Assemble the full parameter mapping for an operation, ready for signing.
///
/// `notify_url` / `return_url` are the already-resolved values (per-call
/// override falling back to client configuration); they are included only
/// when the operation's table entry says they apply and a value is present.
pub fn build_params(
    op: TradeOp,
    app_id: &str,
    sign_type: SignType,
    biz_content: &Value,
    notify_url: Option<&str>,
    return_url: Option<&str>,
    timestamp: &str,
) -> ParamMap {
    let mut params = ParamMap::new();

    for (key, value) in PUBLIC_PARAMS {
        params.insert(key.to_string(), Value::String(value.to_string()));
    }
    params.insert("method".into(), Value::String(op.method().to_string()));
    params.insert("app_id".into(), Value::String(app_id.to_string()));
    params.insert(
        "sign_type".into(),
        Value::String(sign_type.as_str().to_string()),
    );
    params.insert("timestamp".into(), Value::String(timestamp.to_string()));
    params.insert("biz_content".into(), biz_content.clone());

    if op.uses_notify_url() {
        if let Some(url) = notify_url {
            params.insert("notify_url".into(), Value::String(url.to_string()));
        }
    }
    if op.uses_return_url() {
        if let Some(url) = return_url {
            params.insert("return_url".into(), Value::String(url.to_string()));
        }
    }

    params
}
