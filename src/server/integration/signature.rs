//! Webhook signature verification.
//!
//! All providers sign with HMAC-SHA256 and differ only in what is signed and how the
//! digest is encoded. Comparisons go through [`Mac::verify_slice`], which is constant time.

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::server::error::{integration::IntegrationError, Error};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a Stripe signature timestamp
pub const STRIPE_TOLERANCE_SECS: u64 = 300;

fn mac(secret: &str, parts: &[&[u8]]) -> Result<HmacSha256, Error> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::InternalError(format!("Failed to create HMAC: {}", e)))?;
    for part in parts {
        mac.update(part);
    }

    Ok(mac)
}

/// Hex-encoded HMAC-SHA256 of `payload`
pub fn sign_hex(secret: &str, payload: &[u8]) -> Result<String, Error> {
    Ok(hex::encode(mac(secret, &[payload])?.finalize().into_bytes()))
}

/// Base64-encoded HMAC-SHA256 of `payload`
pub fn sign_base64(secret: &str, payload: &[u8]) -> Result<String, Error> {
    Ok(STANDARD.encode(mac(secret, &[payload])?.finalize().into_bytes()))
}

/// Builds a `Stripe-Signature` header value for `payload` signed at `timestamp`
pub fn stripe_header(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, Error> {
    let timestamp = timestamp.to_string();
    let digest = mac(secret, &[timestamp.as_bytes(), b".", payload])?
        .finalize()
        .into_bytes();

    Ok(format!("t={},v1={}", timestamp, hex::encode(digest)))
}

/// Verifies a hex-encoded signature of the raw body
pub fn verify_hex(
    provider: &'static str,
    secret: &str,
    payload: &[u8],
    signature: &str,
) -> Result<(), Error> {
    let expected =
        hex::decode(signature.trim()).map_err(|_| IntegrationError::InvalidSignature(provider))?;

    mac(secret, &[payload])?
        .verify_slice(&expected)
        .map_err(|_| IntegrationError::InvalidSignature(provider).into())
}

/// Verifies a base64-encoded signature of the raw body
pub fn verify_base64(
    provider: &'static str,
    secret: &str,
    payload: &[u8],
    signature: &str,
) -> Result<(), Error> {
    let expected = STANDARD
        .decode(signature.trim())
        .map_err(|_| IntegrationError::InvalidSignature(provider))?;

    mac(secret, &[payload])?
        .verify_slice(&expected)
        .map_err(|_| IntegrationError::InvalidSignature(provider).into())
}

/// Verifies a `Stripe-Signature` header of the form `t=<unix>,v1=<hex>[,v1=<hex>...]`.
///
/// The signed content is `{t}.{payload}`. Any `v1` entry may match, which covers
/// secret rotation. Timestamps further than the tolerance from `now` are rejected.
pub fn verify_stripe(secret: &str, header: &str, payload: &[u8], now: i64) -> Result<(), Error> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for item in header.split(',') {
        match item.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let Some(timestamp) = timestamp else {
        return Err(IntegrationError::InvalidSignature("Stripe").into());
    };
    if now.abs_diff(timestamp) > STRIPE_TOLERANCE_SECS {
        return Err(IntegrationError::InvalidSignature("Stripe").into());
    }

    let signed_timestamp = timestamp.to_string();
    let expected = mac(secret, &[signed_timestamp.as_bytes(), b".", payload])?;
    let matched = signatures.iter().any(|signature| {
        hex::decode(signature)
            .is_ok_and(|candidate| expected.clone().verify_slice(&candidate).is_ok())
    });

    if matched {
        Ok(())
    } else {
        Err(IntegrationError::InvalidSignature("Stripe").into())
    }
}
