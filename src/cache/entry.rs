//! Cache Entry Module
//!
//! Binary layout of a stored entry: the expiry header comes first and is
//! fixed-width, so an expired entry can be discarded without touching the
//! payload.
//!
//! ```text
//! +-----+-------------------+-------------+-----------------+
//! | tag | expires_at (f64)  | len (u32)   | payload (JSON)  |
//! | 1 B | 8 B, big-endian   | 4 B, BE     | len bytes       |
//! +-----+-------------------+-------------+-----------------+
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::DecodeError;

/// Format tag written as the first byte of every entry.
pub const FORMAT_TAG: u8 = 1;

/// Size of the fixed header preceding the payload.
pub const HEADER_LEN: usize = 1 + 8 + 4;

// == Encode ==
/// Serializes a value together with its absolute expiry (seconds since epoch).
pub fn encode<V: Serialize + ?Sized>(value: &V, expires_at: f64) -> Result<Bytes, DecodeError> {
    if !expires_at.is_finite() {
        return Err(DecodeError::InvalidExpiry);
    }
    let payload = serde_json::to_vec(value)?;
    let len = u32::try_from(payload.len()).map_err(|_| DecodeError::Oversized(payload.len()))?;

    let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
    buf.put_u8(FORMAT_TAG);
    buf.put_f64(expires_at);
    buf.put_u32(len);
    buf.put_slice(&payload);
    Ok(buf.freeze())
}

// == Decode Expiry ==
/// Reads only the expiry header of an entry blob.
pub fn decode_expiry(blob: &[u8]) -> Result<f64, DecodeError> {
    if blob.len() < HEADER_LEN {
        return Err(DecodeError::Truncated(blob.len()));
    }
    let mut header = &blob[..HEADER_LEN];
    let tag = header.get_u8();
    if tag != FORMAT_TAG {
        return Err(DecodeError::UnknownFormat(tag));
    }
    let expires_at = header.get_f64();
    if !expires_at.is_finite() {
        return Err(DecodeError::InvalidExpiry);
    }
    Ok(expires_at)
}

// == Decode Value ==
/// Deserializes the payload of an entry blob.
///
/// The header is re-validated so a blob never yields a value unless its
/// framing is intact.
pub fn decode_value<V: DeserializeOwned>(blob: &[u8]) -> Result<V, DecodeError> {
    decode_expiry(blob)?;
    let mut len_field = &blob[9..HEADER_LEN];
    let declared = len_field.get_u32() as usize;
    let payload = &blob[HEADER_LEN..];
    if payload.len() != declared {
        return Err(DecodeError::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }
    Ok(serde_json::from_slice(payload)?)
}

// == Expiry Helpers ==
/// Returns true once `expires_at` lies strictly in the past.
pub fn is_expired(expires_at: f64, now: f64) -> bool {
    expires_at < now
}

/// Current Unix time in fractional seconds.
pub fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
