//! Core artifact and package-name types.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

use crate::hash::{Sha256Hash, VariantHash};

/// A single downloadable package file parsed from a simple-index page.
///
/// Immutable once parsed. Uniqueness is not enforced here; consumers that
/// need one artifact per variant key build their own mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Final path segment of the link (e.g. `requests-2.32.3-py3-none-any.whl`)
    pub filename: String,

    /// Three-component release version extracted from the filename
    pub version: Version,

    /// Source distribution or wheel
    pub format: ArtifactFormat,

    /// SHA256 advertised in the link fragment, when well-formed
    pub integrity_hash: Option<Sha256Hash>,

    /// Variant tag embedded in a wheel filename, if any
    pub variant_hash: Option<VariantHash>,
}

/// Distribution format of an [`Artifact`].
///
/// The derived ordering is the preference rank: a prebuilt wheel outranks a
/// source distribution of the same version.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtifactFormat {
    /// Source distribution (`.tar.gz`).
    #[serde(rename = "tar.gz")]
    SourceDist,
    /// Built distribution (`.whl`).
    #[serde(rename = "whl")]
    Wheel,
}

impl ArtifactFormat {
    /// Map a filename extension (without the leading dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "tar.gz" => Some(Self::SourceDist),
            "whl" => Some(Self::Wheel),
            _ => None,
        }
    }

    /// The extension this format is published under.
    pub fn extension(self) -> &'static str {
        match self {
            Self::SourceDist => "tar.gz",
            Self::Wheel => "whl",
        }
    }
}

impl std::fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A normalized project name, in the form used by simple-index URLs.
///
/// Lowercased, with every run of `-`, `_` and `.` collapsed to a single `-`,
/// so `Foo_Bar`, `foo.bar` and `foo--bar` all name the same project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageName(String);

impl PackageName {
    /// Create a new package name, normalizing the input.
    pub fn new(name: &str) -> Self {
        let mut normalized = String::with_capacity(name.len());
        let mut in_separator = false;
        for c in name.trim().chars() {
            if matches!(c, '-' | '_' | '.') {
                if !in_separator {
                    normalized.push('-');
                }
                in_separator = true;
            } else {
                normalized.push(c.to_ascii_lowercase());
                in_separator = false;
            }
        }
        Self(normalized)
    }

    /// Return the normalized name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for PackageName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PackageName {
    fn eq(&self, other: &str) -> bool {
        *self == Self::new(other)
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        *self == Self::new(other)
    }
}

impl Borrow<str> for PackageName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

/// Error returned when a string is not a `major.minor.patch` release number.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid version '{0}': expected three dot-separated non-negative integers")]
pub struct VersionError(pub String);

/// A three-component release version.
///
/// Parsed component-wise, so `02.1.0` and `2.1.0` are the same version and
/// order identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(semver::Version);

impl Version {
    /// Create a version from its numeric components.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(semver::Version::new(major, minor, patch))
    }

    /// Major component.
    pub fn major(&self) -> u64 {
        self.0.major
    }

    /// Minor component.
    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    /// Patch component.
    pub fn patch(&self) -> u64 {
        self.0.patch
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionError(s.to_string());
        let mut parts = s.split('.');
        let mut next = || -> Result<u64, VersionError> {
            let part = parts.next().ok_or_else(err)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }
            part.parse().map_err(|_| err())
        };
        let (major, minor, patch) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self::new(major, minor, patch))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
