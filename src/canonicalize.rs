//! Canonical query-string serialization of request parameters.
//!
//! The gateway signs (and verifies) requests over a canonical string built
//! from the request parameters: keys sorted ascending by raw byte value,
//! joined as `key=value` pairs with literal `&` separators, with the `sign`
//! field itself excluded. Structured values appear as their compact JSON
//! serialization. The same construction doubles as the transmitted query
//! string when per-value percent-encoding is enabled; the `&`/`=` framing
//! stays literal in both modes.

use std::collections::BTreeMap;

use serde_json::Value;

/// Request parameter mapping. `BTreeMap` keeps keys in ascending byte order,
/// which is exactly the canonical ordering the gateway requires.
pub type ParamMap = BTreeMap<String, Value>;

/// Name of the signature field, never part of the canonical string.
pub const SIGN_FIELD: &str = "sign";

/// Build the canonical query string for a parameter mapping.
///
/// - Keys are emitted in ascending lexicographic (byte-wise) order.
/// - The `sign` field is skipped.
/// - String values are used verbatim; any other value is rendered as
///   compact JSON.
/// - With `encode` set, each value is percent-encoded as a URI component;
///   keys and the `&`/`=` delimiters are never encoded.
///
/// Byte-for-byte deterministic for identical input; no failure modes.
pub fn canonical_query(params: &ParamMap, encode: bool) -> String {
    params
        .iter()
        .filter(|(key, _)| key.as_str() != SIGN_FIELD)
        .map(|(key, value)| {
            let rendered = render_value(value);
            if encode {
                format!("{}={}", key, urlencoding::encode(&rendered))
            } else {
                format!("{}={}", key, rendered)
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Render a parameter value to its canonical string form: strings verbatim,
/// everything else as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn biz_params() -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("subject".into(), json!("goods"));
        params.insert("out_trade_no".into(), json!("xxx"));
        params.insert("total_amount".into(), json!("1.00"));
        params.insert("product_code".into(), json!("QUICK_MSECURITY_PAY"));
        params
    }

    #[test]
    fn test_known_vector() {
        assert_eq!(
            canonical_query(&biz_params(), false),
            "out_trade_no=xxx&product_code=QUICK_MSECURITY_PAY&subject=goods&total_amount=1.00"
        );
    }

    #[test]
    fn test_deterministic() {
        let params = biz_params();
        assert_eq!(
            canonical_query(&params, false),
            canonical_query(&params, false)
        );
    }

    #[test]
    fn test_key_order_independence() {
        // Insertion order must not matter
        let mut reversed = ParamMap::new();
        reversed.insert("total_amount".into(), json!("1.00"));
        reversed.insert("subject".into(), json!("goods"));
        reversed.insert("product_code".into(), json!("QUICK_MSECURITY_PAY"));
        reversed.insert("out_trade_no".into(), json!("xxx"));

        assert_eq!(
            canonical_query(&biz_params(), false),
            canonical_query(&reversed, false)
        );
    }

    #[test]
    fn test_sign_field_excluded() {
        let mut params = biz_params();
        params.insert("sign".into(), json!("c29tZXNpZ25hdHVyZQ=="));

        assert!(!canonical_query(&params, false).contains("sign="));
        assert!(!canonical_query(&params, true).contains("sign="));
    }

    #[test]
    fn test_nested_value_compact_json() {
        let mut params = ParamMap::new();
        params.insert(
            "biz_content".into(),
            json!({
                "subject": "goods",
                "out_trade_no": "xxx",
                "total_amount": "1.00",
                "product_code": "QUICK_MSECURITY_PAY"
            }),
        );
        params.insert("method".into(), json!("alipay.trade.app.pay"));

        // serde_json objects iterate in sorted key order, serialization is compact
        assert_eq!(
            canonical_query(&params, false),
            r#"biz_content={"out_trade_no":"xxx","product_code":"QUICK_MSECURITY_PAY","subject":"goods","total_amount":"1.00"}&method=alipay.trade.app.pay"#
        );
    }

    #[test]
    fn test_encode_flag_only_touches_values() {
        let mut params = ParamMap::new();
        params.insert("notify_url".into(), json!("https://example.com/notify?a=1"));
        params.insert("subject".into(), json!("goods"));

        let plain = canonical_query(&params, false);
        let encoded = canonical_query(&params, true);

        assert_eq!(
            plain,
            "notify_url=https://example.com/notify?a=1&subject=goods"
        );
        assert_eq!(
            encoded,
            "notify_url=https%3A%2F%2Fexample.com%2Fnotify%3Fa%3D1&subject=goods"
        );

        // Framing delimiters stay literal in both modes: one `=` per pair,
        // pairs joined by one `&`
        assert_eq!(encoded.matches('&').count(), 1);
        assert!(encoded.contains("notify_url=https%3A"));
    }

    #[test]
    fn test_encoded_nested_value() {
        let mut params = ParamMap::new();
        params.insert("biz_content".into(), json!({"out_trade_no": "xxx"}));

        assert_eq!(
            canonical_query(&params, true),
            "biz_content=%7B%22out_trade_no%22%3A%22xxx%22%7D"
        );
    }

    #[test]
    fn test_non_string_scalars() {
        let mut params = ParamMap::new();
        params.insert("count".into(), json!(3));
        params.insert("flag".into(), json!(true));

        assert_eq!(canonical_query(&params, false), "count=3&flag=true");
    }

    #[test]
    fn test_empty_map() {
        assert_eq!(canonical_query(&ParamMap::new(), false), "");
    }
}
