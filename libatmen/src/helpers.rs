use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::time::Duration;

/// Serialize a fixed-size byte array as a `0x`-prefixed hex string.
pub fn array_to_hex<S, const N: usize>(bytes: &[u8; N], s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    format!("0x{}", hex::encode(bytes)).serialize(s)
}

pub fn array_from_hex<'de, D, const N: usize>(de: D) -> Result<[u8; N], D::Error>
where
    D: Deserializer<'de>,
{
    let hex_str = String::deserialize(de)?;
    decode_hex_array(&hex_str).map_err(|e| serde::de::Error::custom(format!("Invalid hex string: {e}")))
}

/// Decode a hex string, with or without a `0x` prefix, into exactly `N` bytes.
pub fn decode_hex_array<const N: usize>(s: &str) -> Result<[u8; N], hex::FromHexError> {
    let s = strip_hex_prefix(s);
    let mut result = [0u8; N];
    hex::decode_to_slice(s, &mut result)?;
    Ok(result)
}

pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s)
}

/// A UTC Unix timestamp representing seconds since January 1, 1970.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a new Timestamp from seconds since Unix epoch.
    pub const fn new(seconds: u64) -> Self {
        Self(seconds)
    }

    /// Returns the current UTC time as a Timestamp.
    pub fn now() -> Self {
        Self(Utc::now().timestamp().max(0) as u64)
    }

    /// Returns the underlying seconds value.
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_secs()))
    }

    /// Converts this Timestamp to a chrono DateTime<Utc>.
    /// Out-of-range values return None.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let t = i64::try_from(self.0).ok()?;
        Utc.timestamp_opt(t, 0).single()
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}s", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_returns_current_time() {
        let before = Utc::now().timestamp() as u64;
        let ts = Timestamp::now();
        let after = Utc::now().timestamp() as u64;
        assert!(ts.as_secs() >= before && ts.as_secs() <= after);
    }

    #[test]
    fn saturating_add_does_not_wrap() {
        let ts = Timestamp::new(u64::MAX - 1);
        assert_eq!(ts.saturating_add(Duration::from_secs(10)).as_secs(), u64::MAX);
    }

    #[test]
    fn to_datetime() {
        let ts = Timestamp::new(1234567890);
        assert_eq!(ts.to_datetime().unwrap().timestamp(), 1234567890);
        assert_eq!(ts.to_string(), "2009-02-13T23:31:30+00:00");
    }

    #[test]
    fn ordering() {
        assert!(Timestamp::new(100) < Timestamp::new(200));
        assert_eq!(Timestamp::from(100), Timestamp::new(100));
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&Timestamp::new(1234567890)).unwrap();
        assert_eq!(json, "1234567890");
        let ts: Timestamp = serde_json::from_str("42").unwrap();
        assert_eq!(ts.as_secs(), 42);
    }

    #[test]
    fn hex_arrays() {
        let bytes: [u8; 4] = decode_hex_array("0xfc334e8c").unwrap();
        assert_eq!(bytes, [0xfc, 0x33, 0x4e, 0x8c]);
        let bytes: [u8; 4] = decode_hex_array("FC334E8C").unwrap();
        assert_eq!(bytes, [0xfc, 0x33, 0x4e, 0x8c]);
        assert!(decode_hex_array::<4>("fc334e").is_err());
    }
}
