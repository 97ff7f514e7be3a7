//! Signed and encrypted session tokens.
//!
//! A token carries a small string map (in practice `{"name": <user>}`)
//! entirely on the client. The layout follows the usual secure-cookie
//! construction:
//!
//! ```text
//! value = base64url(nonce || AES-256-GCM(json(payload)))
//! mac   = HMAC-SHA256(hash_key, "session|<ts>|<value>")
//! token = base64url("<ts>|<value>|" || mac)
//! ```
//!
//! Keys are generated at startup and only live in memory, so restarting
//! the process invalidates every outstanding token.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Session payload: string keys to string values.
pub type Payload = BTreeMap<String, String>;

/// Name mixed into the MAC so tokens are bound to the session cookie.
const TOKEN_NAME: &str = "session";

const HASH_KEY_LEN: usize = 64;
const BLOCK_KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Tolerated clock skew for tokens stamped in the future.
const MAX_FUTURE_SKEW_SECS: i64 = 60;

/// Reasons a token could not be produced or read back.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Not valid base64 or missing the `ts|value|mac` structure.
    #[error("malformed session token")]
    Malformed,

    /// The MAC did not verify.
    #[error("session token signature mismatch")]
    InvalidMac,

    /// The timestamp is outside the accepted window.
    #[error("session token expired")]
    Expired,

    /// Encryption failed while encoding.
    #[error("session payload encryption failed")]
    Encrypt,

    /// Authenticated decryption failed.
    #[error("session payload decryption failed")]
    Decrypt,

    /// The decrypted payload was not a string map.
    #[error("session payload is not valid JSON: {0}")]
    Payload(#[from] serde_json::Error),
}

/// In-memory key material.
#[derive(Clone)]
pub struct SessionKeys {
    hash_key: [u8; HASH_KEY_LEN],
    block_key: [u8; BLOCK_KEY_LEN],
}

impl SessionKeys {
    /// Generate a fresh random key pair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let mut hash_key = [0u8; HASH_KEY_LEN];
        let mut block_key = [0u8; BLOCK_KEY_LEN];
        rng.fill_bytes(&mut hash_key);
        rng.fill_bytes(&mut block_key);
        Self {
            hash_key,
            block_key,
        }
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

/// Encodes and decodes session tokens with a fixed key pair.
#[derive(Clone)]
pub struct SessionCodec {
    signer: HmacSha256,
    cipher: Aes256Gcm,
    max_age: Duration,
}

impl fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCodec")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl SessionCodec {
    /// Create a codec from existing keys.
    pub fn new(keys: SessionKeys, max_age: Duration) -> Self {
        let signer = <HmacSha256 as Mac>::new_from_slice(&keys.hash_key)
            .expect("HMAC accepts keys of any length");
        Self {
            signer,
            cipher: Aes256Gcm::new(&keys.block_key.into()),
            max_age,
        }
    }

    /// Create a codec with freshly generated keys.
    pub fn generate(max_age: Duration) -> Self {
        Self::new(SessionKeys::generate(), max_age)
    }

    /// Serialize, encrypt and sign `payload` into a URL-safe token.
    pub fn encode(&self, payload: &Payload) -> Result<String, SessionError> {
        self.encode_at(payload, Utc::now())
    }

    /// Reverse [`encode`](Self::encode). Never returns partial data.
    pub fn decode(&self, token: &str) -> Result<Payload, SessionError> {
        self.decode_at(token, Utc::now())
    }

    fn encode_at(&self, payload: &Payload, now: DateTime<Utc>) -> Result<String, SessionError> {
        let plaintext = serde_json::to_vec(payload)?;

        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_slice())
            .map_err(|_| SessionError::Encrypt)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        let value = URL_SAFE_NO_PAD.encode(sealed);

        let timestamp = now.timestamp().to_string();
        let mac = self
            .mac(timestamp.as_bytes(), value.as_bytes())
            .finalize()
            .into_bytes();

        let mut token = format!("{timestamp}|{value}|").into_bytes();
        token.extend_from_slice(&mac);
        Ok(URL_SAFE_NO_PAD.encode(token))
    }

    fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Payload, SessionError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| SessionError::Malformed)?;

        // The MAC is binary and may itself contain '|', so split at most twice.
        let mut parts = raw.splitn(3, |b| *b == b'|');
        let (Some(ts), Some(value), Some(mac)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SessionError::Malformed);
        };

        // Verify the bytes as received, before any parsing can normalize them.
        self.mac(ts, value)
            .verify_slice(mac)
            .map_err(|_| SessionError::InvalidMac)?;

        let timestamp: i64 = std::str::from_utf8(ts)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(SessionError::Malformed)?;

        let age = now.timestamp().saturating_sub(timestamp);
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);
        if age > max_age || age < -MAX_FUTURE_SKEW_SECS {
            return Err(SessionError::Expired);
        }

        let sealed = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|_| SessionError::Malformed)?;
        if sealed.len() < NONCE_LEN {
            return Err(SessionError::Malformed);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| SessionError::Decrypt)?;

        Ok(serde_json::from_slice(&plaintext)?)
    }

    fn mac(&self, timestamp: &[u8], value: &[u8]) -> HmacSha256 {
        let mut mac = self.signer.clone();
        mac.update(TOKEN_NAME.as_bytes());
        mac.update(b"|");
        mac.update(timestamp);
        mac.update(b"|");
        mac.update(value);
        mac
    }
}
