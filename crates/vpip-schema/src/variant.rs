//! Variant provider values and descriptors.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::hash::VariantHash;

/// One value a provider offers for one of its keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderProperty {
    /// Name of the provider offering this value.
    pub provider_name: String,
    /// Property key within the provider (e.g. `architecture`).
    pub key: String,
    /// Property value (e.g. `tars`).
    pub value: String,
}

impl ProviderProperty {
    /// Create a property.
    pub fn new(
        provider_name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Whether this property renders to an unambiguous hash input.
    ///
    /// The provider name and key must not contain `::`, and no field may
    /// contain a line break. Otherwise two different properties could feed
    /// identical bytes to the descriptor hash.
    pub fn is_hashable(&self) -> bool {
        let fields = [&self.provider_name, &self.key, &self.value];
        !self.provider_name.contains("::")
            && !self.key.contains("::")
            && !fields.iter().any(|f| f.contains(['\n', '\r']))
    }
}

impl std::fmt::Display for ProviderProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} :: {} :: {}", self.provider_name, self.key, self.value)
    }
}

/// The values one provider accepts, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name, matched against priority configuration.
    pub provider_name: String,
    /// Acceptable values, most preferred first.
    pub ordered_values: Vec<ProviderProperty>,
}

impl ProviderConfig {
    /// Create a provider configuration.
    pub fn new(provider_name: impl Into<String>, ordered_values: Vec<ProviderProperty>) -> Self {
        Self {
            provider_name: provider_name.into(),
            ordered_values,
        }
    }
}

/// One concrete combination of provider values.
///
/// Holds at most one property per contributing provider, in provider
/// priority order. The empty descriptor means "no variant" and has no hash.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariantDescriptor {
    properties: Vec<ProviderProperty>,
    hash: Option<VariantHash>,
}

impl VariantDescriptor {
    /// Build a descriptor, deriving its hash from the ordered properties.
    ///
    /// Each property is fed to SHA-256 as `"{provider} :: {key} :: {value}\n"`
    /// in order; the hash is the first four digest bytes in hex. Identical
    /// ordered content always produces the identical hash.
    pub fn new(properties: Vec<ProviderProperty>) -> Self {
        let hash = (!properties.is_empty()).then(|| {
            let mut hasher = Sha256::new();
            for property in &properties {
                hasher.update(property.to_string().as_bytes());
                hasher.update(b"\n");
            }
            VariantHash::from_digest(&hasher.finalize())
        });
        Self { properties, hash }
    }

    /// The "no variant" descriptor.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Properties in provider priority order.
    pub fn properties(&self) -> &[ProviderProperty] {
        &self.properties
    }

    /// Number of providers represented.
    pub fn specificity(&self) -> usize {
        self.properties.len()
    }

    /// Whether this is the "no variant" descriptor.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The variant hash, or `None` for the "no variant" descriptor.
    pub fn hash(&self) -> Option<&VariantHash> {
        self.hash.as_ref()
    }
}

impl std::fmt::Display for VariantDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.hash {
            None => f.write_str("<no variant>"),
            Some(hash) => {
                write!(f, "{hash} [")?;
                for (i, property) in self.properties.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{property}")?;
                }
                f.write_str("]")
            }
        }
    }
}
