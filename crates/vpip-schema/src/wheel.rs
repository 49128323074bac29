//! Wheel filename grammar with variant tags.
//!
//! A variant wheel carries its tag as `~{8 lowercase hex}` right after the
//! version (or the optional build number), before the compatibility tags:
//!
//! ```text
//! {name}-{version}[-{build}][~{variant}]-{python}-{abi}-{platform}.whl
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::hash::VariantHash;

static WHEEL_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<name>[^\s-]+?)-(?P<ver>[^\s-]*?)
        (-(?P<build>\d[^-]*?))?
        (~(?P<variant>[0-9a-f]{8}))?
        -(?P<pyver>[^\s-]+?)-(?P<abi>[^\s-]+?)-(?P<plat>[^\s-]+?)
        \.whl$",
    )
    .expect("wheel filename pattern is valid")
});

/// Error raised when a filename is not shaped like a wheel.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WheelNameError {
    /// The filename does not follow the wheel naming convention.
    #[error("{filename} is not a valid wheel filename")]
    NotAWheelFilename {
        /// The rejected filename.
        filename: String,
    },
}

/// Extract the variant tag from a wheel filename.
///
/// Returns `Ok(None)` for an ordinary wheel without a tag.
///
/// # Errors
///
/// Returns [`WheelNameError::NotAWheelFilename`] when `filename` does not
/// match any valid wheel-naming shape.
pub fn variant_hash_from_wheel(filename: &str) -> Result<Option<VariantHash>, WheelNameError> {
    let caps = WHEEL_FILENAME
        .captures(filename)
        .ok_or_else(|| WheelNameError::NotAWheelFilename {
            filename: filename.to_string(),
        })?;

    Ok(caps
        .name("variant")
        .and_then(|m| VariantHash::new(m.as_str()).ok()))
}
