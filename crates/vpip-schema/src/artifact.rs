//! Artifact URL grammar.
//!
//! A link on a simple-index page names an artifact when its last path
//! segment reads `{project}-{major.minor.patch}{opaque-suffix}.{tar.gz|whl}`.
//! Anything else is "not an artifact", which callers skip.

use regex::Regex;
use std::sync::LazyLock;

use crate::hash::Sha256Hash;
use crate::types::{Artifact, ArtifactFormat, Version};
use crate::wheel::variant_hash_from_wheel;

static ARTIFACT_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<project>[A-Za-z0-9_.\-]+?)-(?P<version>\d+\.\d+\.\d+)(?P<suffix>[^\s/]*?)\.(?P<extension>tar\.gz|whl)$",
    )
    .expect("artifact filename pattern is valid")
});

/// Errors raised while interpreting an index link.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ArtifactError {
    /// The link path does not name a source distribution or wheel.
    #[error("Improper URL '{url}': does not match a known python package")]
    MalformedArtifactUrl {
        /// The offending link.
        url: String,
    },
}

/// Parse a single index link into an [`Artifact`].
///
/// The integrity hash is taken from a `sha256` parameter in the URL fragment
/// and kept only when it is exactly 64 hex characters. For wheels, a variant
/// tag embedded in the filename becomes the artifact's variant hash; a wheel
/// name that fails the stricter wheel grammar is still a usable artifact, just
/// without a variant.
///
/// # Errors
///
/// Returns [`ArtifactError::MalformedArtifactUrl`] when the path does not match
/// the artifact grammar.
pub fn parse_artifact(url: &str) -> Result<Artifact, ArtifactError> {
    let malformed = || ArtifactError::MalformedArtifactUrl {
        url: url.to_string(),
    };

    let (path, fragment) = split_url(url);
    let filename = path.rsplit('/').next().unwrap_or(path);

    let caps = ARTIFACT_FILENAME.captures(filename).ok_or_else(malformed)?;
    let version: Version = caps["version"].parse().map_err(|_| malformed())?;
    let format = ArtifactFormat::from_extension(&caps["extension"]).ok_or_else(malformed)?;

    let integrity_hash = fragment
        .and_then(|f| fragment_param(f, "sha256"))
        .and_then(|h| Sha256Hash::new(h).ok());

    let variant_hash = match format {
        ArtifactFormat::Wheel => variant_hash_from_wheel(filename).unwrap_or_else(|e| {
            tracing::debug!("{e}; ignoring variant tag");
            None
        }),
        ArtifactFormat::SourceDist => None,
    };

    Ok(Artifact {
        filename: filename.to_string(),
        version,
        format,
        integrity_hash,
        variant_hash,
    })
}

/// Split a URL into its path and optional fragment, dropping scheme,
/// authority and query.
fn split_url(url: &str) -> (&str, Option<&str>) {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (url, None),
    };
    let rest = rest.split_once('?').map_or(rest, |(before, _)| before);

    let path = match rest.split_once("://") {
        Some((_, after_scheme)) => after_scheme.find('/').map_or("", |i| &after_scheme[i..]),
        None => rest,
    };
    (path, fragment)
}

/// First value of `key` in a `k=v&k2=v2` fragment.
fn fragment_param<'a>(fragment: &'a str, key: &str) -> Option<&'a str> {
    fragment
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}
