//! Simple-index page listing.

use regex::Regex;
use std::cmp::Reverse;
use std::sync::LazyLock;

use crate::artifact::parse_artifact;
use crate::types::Artifact;

static HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href=["'](.*?)["']"#).expect("href pattern is valid"));

/// Extract every `href` attribute value from an index page, in document order.
///
/// Attributes that are unquoted or never closed are skipped.
pub fn extract_links(html: &str) -> Vec<&str> {
    HREF.captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Parse an index page into candidate artifacts, best first.
///
/// Links that are not artifacts are dropped. The result is ordered by
/// version, newest first, and within one version a wheel precedes a source
/// distribution. Artifacts that tie on both keep their page order.
pub fn list_candidates(html: &str) -> Vec<Artifact> {
    let mut candidates: Vec<Artifact> = extract_links(html)
        .into_iter()
        .filter_map(|href| match parse_artifact(href) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                tracing::trace!("Skipping link: {e}");
                None
            }
        })
        .collect();

    // Stable sort: equal keys keep document order.
    candidates.sort_by(|a, b| Reverse((&a.version, a.format)).cmp(&Reverse((&b.version, b.format))));
    candidates
}
