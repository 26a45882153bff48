use thiserror::Error;

use crate::client::GatewayResponse;

#[derive(Debug, Error)]
pub enum Error {
    #[error("app_id is required")]
    MissingAppId,

    #[error("unknown sign_type: {0}")]
    UnknownSignType(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("PKCS#1 error: {0}")]
    Pkcs1(String),

    #[error("PKCS#8 error: {0}")]
    Pkcs8(String),

    #[error("SPKI error: {0}")]
    Spki(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed gateway response: missing {0}")]
    MalformedResponse(String),

    #[error("gateway declined: {}", .0.sub_msg.as_deref().unwrap_or("no sub_msg"))]
    Gateway(GatewayResponse),
}

impl From<rsa::Error> for Error {
    fn from(err: rsa::Error) -> Self {
        Error::Crypto(err.to_string())
    }
}

impl From<rsa::signature::Error> for Error {
    fn from(err: rsa::signature::Error) -> Self {
        Error::Crypto(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for Error {
    fn from(err: rsa::pkcs1::Error) -> Self {
        Error::Pkcs1(err.to_string())
    }
}

impl From<rsa::pkcs8::Error> for Error {
    fn from(err: rsa::pkcs8::Error) -> Self {
        Error::Pkcs8(err.to_string())
    }
}

impl From<rsa::pkcs8::spki::Error> for Error {
    fn from(err: rsa::pkcs8::spki::Error) -> Self {
        Error::Spki(err.to_string())
    }
}
