//! Integrity and variant hashes.

use serde::{Deserialize, Deserializer, Serialize};

/// Length of a variant hash in hex characters.
pub const VARIANT_HASH_LEN: usize = 8;

/// A validated SHA256 digest (64 hex characters).
///
/// Index pages advertise these in the link fragment (`#sha256=...`). The
/// digest is kept exactly as advertised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha256Hash(String);

impl Sha256Hash {
    /// Create a validated `Sha256Hash`.
    ///
    /// # Errors
    ///
    /// Returns an error string if `s` is not exactly 64 ASCII hex characters.
    pub fn new(s: &str) -> Result<Self, String> {
        if s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(format!(
                "Invalid SHA256 hash: expected 64 hex chars, got '{s}'"
            ))
        }
    }

    /// Return the inner hex string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Sha256Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sha256Hash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error returned when a string is not a well-formed variant hash.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid variant hash '{0}': expected 8 lowercase hex characters")]
pub struct VariantHashError(pub String);

/// Short fixed-width digest identifying one variant combination.
///
/// Always exactly [`VARIANT_HASH_LEN`] lowercase hex characters. The absence
/// of a variant is modelled as `Option::<VariantHash>::None`, never as a
/// special hash value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VariantHash(String);

impl VariantHash {
    /// Parse a variant hash, rejecting anything that is not 8 lowercase hex chars.
    ///
    /// # Errors
    ///
    /// Returns [`VariantHashError`] when the length or alphabet is wrong.
    pub fn new(s: &str) -> Result<Self, VariantHashError> {
        let valid = s.len() == VARIANT_HASH_LEN
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(VariantHashError(s.to_string()))
        }
    }

    /// Build a hash from the leading bytes of a digest.
    pub(crate) fn from_digest(digest: &[u8]) -> Self {
        let prefix = digest.get(..VARIANT_HASH_LEN / 2).unwrap_or(digest);
        Self(hex::encode(prefix))
    }

    /// Return the hex string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for VariantHash {
    type Err = VariantHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for VariantHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for VariantHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for VariantHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_keeps_digest_as_given() {
        let upper = "70761CFE03C773CEB22AA2F671B4757976145175CDFCA038C02654D061D6DCC6";
        let hash = Sha256Hash::new(upper).unwrap();
        assert_eq!(hash.as_str(), upper);

        let mixed = "70761cfe03c773ceb22aa2f671b4757976145175CDFCA038C02654D061D6DCC6";
        assert_eq!(Sha256Hash::new(mixed).unwrap().as_str(), mixed);
    }

    #[test]
    fn sha256_rejects_wrong_length_and_alphabet() {
        assert!(Sha256Hash::new("invalidhash").is_err());
        assert!(Sha256Hash::new(&"g".repeat(64)).is_err());
        assert!(Sha256Hash::new(&"a".repeat(63)).is_err());
    }

    #[test]
    fn variant_hash_shape() {
        assert!(VariantHash::new("abcd1234").is_ok());
        assert!(VariantHash::new("ABCD1234").is_err());
        assert!(VariantHash::new("abcd123").is_err());
        assert!(VariantHash::new("abcd12345").is_err());
        assert!(VariantHash::new("no-variant").is_err());
    }

    #[test]
    fn variant_hash_from_digest_takes_four_bytes() {
        let hash = VariantHash::from_digest(&[0xde, 0xad, 0xbe, 0xef, 0x01, 0x02]);
        assert_eq!(hash.as_str(), "deadbeef");
    }
}
