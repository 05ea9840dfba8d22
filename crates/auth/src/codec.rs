//! Authenticated-encryption envelope for token payloads.
//!
//! Token text is `v1.local.` followed by unpadded base64url of
//! `nonce (24) || ciphertext || tag (16)`. The cipher is XChaCha20-Poly1305 with
//! the header bound as associated data. The plaintext is a JSON envelope holding
//! the codec-enforced validity window (`iat`, `nbf`, `exp`) and the payload.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use chrono::{DateTime, Utc};
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::error::{AuthError, AuthResult};
use crate::key::KeyMaterial;

/// Version/purpose header; also the associated data of every token.
pub const TOKEN_HEADER: &str = "v1.local.";

const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;

/// Codec-level validity window, independent of anything inside the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub issued_at: DateTime<Utc>,
    pub not_before: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TimeWindow {
    /// Check the window against `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), DecodeFailure> {
        if self.expires_at <= self.issued_at || self.not_before > self.expires_at {
            return Err(DecodeFailure::InvalidTimeWindow);
        }
        if now < self.not_before {
            return Err(DecodeFailure::NotYetValid);
        }
        if now >= self.expires_at {
            return Err(DecodeFailure::Expired);
        }
        Ok(())
    }
}

/// A successfully opened token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub window: TimeWindow,
    pub payload: T,
}

/// Why a token failed to decode.
///
/// Kept for logs only; callers above the verifier see [`AuthError::InvalidToken`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFailure {
    #[error("malformed token")]
    Malformed,

    #[error("authentication tag mismatch")]
    Tampered,

    #[error("payload is not a valid envelope")]
    InvalidPayload,

    #[error("invalid time window")]
    InvalidTimeWindow,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("token expired")]
    Expired,

    #[error("fault raised while decoding")]
    Fault,
}

impl DecodeFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeFailure::Malformed => "malformed",
            DecodeFailure::Tampered => "tampered",
            DecodeFailure::InvalidPayload => "invalid_payload",
            DecodeFailure::InvalidTimeWindow => "invalid_time_window",
            DecodeFailure::NotYetValid => "not_yet_valid",
            DecodeFailure::Expired => "expired",
            DecodeFailure::Fault => "fault",
        }
    }
}

#[derive(Serialize)]
struct SealedEnvelope<'a, T> {
    iat: DateTime<Utc>,
    nbf: DateTime<Utc>,
    exp: DateTime<Utc>,
    payload: &'a T,
}

#[derive(Deserialize)]
struct OpenedEnvelope<T> {
    iat: DateTime<Utc>,
    nbf: DateTime<Utc>,
    exp: DateTime<Utc>,
    payload: T,
}

/// Seals and opens tokens under the process key.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: Arc<KeyMaterial>,
}

impl TokenCodec {
    pub fn new(key: Arc<KeyMaterial>) -> Self {
        Self { key }
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(Key::from_slice(self.key.as_bytes()))
    }

    /// Serialize `payload` with its validity window and seal it.
    pub fn encode<T: Serialize>(&self, payload: &T, window: &TimeWindow) -> AuthResult<String> {
        let plaintext = serde_json::to_vec(&SealedEnvelope {
            iat: window.issued_at,
            nbf: window.not_before,
            exp: window.expires_at,
            payload,
        })
        .map_err(|e| AuthError::creation(format!("payload serialization failed: {e}")))?;

        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| AuthError::creation(format!("nonce generation failed: {e}")))?;

        let ciphertext = self
            .cipher()
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: &plaintext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|_| AuthError::creation("encryption failed"))?;

        let mut body = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        body.extend_from_slice(&nonce);
        body.extend_from_slice(&ciphertext);

        Ok(format!("{TOKEN_HEADER}{}", URL_SAFE_NO_PAD.encode(body)))
    }

    /// Open a token and check its validity window against `now`.
    ///
    /// Never panics: a fault raised anywhere in the decode path is caught here
    /// and reported as [`DecodeFailure::Fault`].
    pub fn decode<T: DeserializeOwned>(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Decoded<T>, DecodeFailure> {
        panic::catch_unwind(AssertUnwindSafe(|| self.open(token, now)))
            .unwrap_or(Err(DecodeFailure::Fault))
    }

    fn open<T: DeserializeOwned>(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Decoded<T>, DecodeFailure> {
        let encoded = token
            .strip_prefix(TOKEN_HEADER)
            .ok_or(DecodeFailure::Malformed)?;
        let body = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| DecodeFailure::Malformed)?;
        if body.len() < NONCE_LEN + TAG_LEN {
            return Err(DecodeFailure::Malformed);
        }

        let (nonce, ciphertext) = body.split_at(NONCE_LEN);
        let plaintext = self
            .cipher()
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|_| DecodeFailure::Tampered)?;

        let envelope: OpenedEnvelope<T> =
            serde_json::from_slice(&plaintext).map_err(|_| DecodeFailure::InvalidPayload)?;

        let window = TimeWindow {
            issued_at: envelope.iat,
            not_before: envelope.nbf,
            expires_at: envelope.exp,
        };
        window.validate(now)?;

        Ok(Decoded {
            window,
            payload: envelope.payload,
        })
    }
}
