//! Artifact resolution.
//!
//! Picks exactly one artifact from a [`CandidateSet`], either by following a
//! forced override or by probing variant descriptors in priority order.

use std::sync::Arc;

use thiserror::Error;
use vpip_schema::{Artifact, PackageName, VariantDescriptor, VariantHash};

use crate::candidates::CandidateSet;
use crate::combination::{Combinations, generate_descriptors, order_providers};
use crate::providers::{PrioritySource, ProviderSource, priority_from_names};
use crate::reporter::Reporter;

/// Terminal failures of a single resolution call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The index listed no artifacts at all.
    #[error("No candidates available")]
    NoCandidates,

    /// Variants were switched off and every candidate carries a variant.
    #[error("Variants are disabled and no candidate without a variant exists")]
    NoUnvariantedCandidate,

    /// The forced variant hash is not among the candidates.
    #[error("Forced variant {hash} is not available")]
    ForcedVariantNotFound {
        /// The requested hash.
        hash: VariantHash,
    },

    /// No descriptor matched and there is no generic candidate to fall back to.
    #[error("No candidate matches any supported variant and no generic candidate exists")]
    NoSuitableCandidate,
}

/// An out-of-band instruction that bypasses descriptor probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForcedVariant {
    /// Ignore variants entirely.
    NoVariant,
    /// Select exactly this variant.
    Hash(VariantHash),
    /// A value that is neither; treated as [`ForcedVariant::NoVariant`].
    Invalid(String),
}

impl ForcedVariant {
    /// Sentinel string meaning "ignore variants".
    pub const NO_VARIANT: &'static str = "no-variant";

    /// Interpret an override string. Blank input means no override; hex
    /// digits are accepted in either case.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw == Self::NO_VARIANT {
            return Some(Self::NoVariant);
        }
        Some(
            VariantHash::new(&raw.to_ascii_lowercase())
                .map_or_else(|_| Self::Invalid(raw.to_string()), Self::Hash),
        )
    }
}

/// Everything a caller asks for in one resolution.
#[derive(Debug, Clone)]
pub struct ResolutionRequest {
    /// Requested project.
    pub package_name: PackageName,
    /// Simple-index root URL.
    pub index_url: String,
    /// Explicit provider ordering. When set, providers not listed are excluded.
    pub provider_priority: Option<Vec<String>>,
    /// Override that bypasses probing.
    pub forced: Option<ForcedVariant>,
    /// Only the unvarianted candidate may be chosen.
    pub variants_disabled: bool,
}

impl ResolutionRequest {
    /// Request `package_name` from `index_url` with default variant handling.
    pub fn new(package_name: impl Into<PackageName>, index_url: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            index_url: index_url.into(),
            provider_priority: None,
            forced: None,
            variants_disabled: false,
        }
    }

    /// Restrict and order providers explicitly.
    pub fn with_provider_priority(mut self, providers: Vec<String>) -> Self {
        self.provider_priority = Some(providers);
        self
    }

    /// Set or clear the forced override.
    pub fn with_forced(mut self, forced: Option<ForcedVariant>) -> Self {
        self.forced = forced;
        self
    }

    /// Switch variant selection off.
    pub fn with_variants_disabled(mut self, disabled: bool) -> Self {
        self.variants_disabled = disabled;
        self
    }
}

/// Pick one artifact for `request`.
///
/// Descriptors are consumed lazily and probing stops at the first hit, so
/// only as much of `descriptors` is generated as needed. When the sequence
/// runs out, the unvarianted candidate is the fallback.
///
/// # Errors
///
/// Returns a [`ResolveError`] describing why no artifact could be chosen.
pub fn resolve<'a, I, R>(
    request: &ResolutionRequest,
    candidates: &'a CandidateSet,
    descriptors: I,
    reporter: &R,
) -> Result<&'a Artifact, ResolveError>
where
    I: IntoIterator<Item = VariantDescriptor>,
    R: Reporter + ?Sized,
{
    if candidates.is_empty() {
        return Err(ResolveError::NoCandidates);
    }

    let unvarianted = || {
        candidates
            .unvarianted()
            .ok_or(ResolveError::NoUnvariantedCandidate)
    };

    let forced = if request.variants_disabled {
        Some(&ForcedVariant::NoVariant)
    } else {
        request.forced.as_ref()
    };

    let picked = match forced {
        Some(ForcedVariant::NoVariant) => unvarianted()?,
        Some(ForcedVariant::Invalid(raw)) => {
            tracing::warn!("Ignoring malformed variant override `{raw}`; variants will not be used");
            unvarianted()?
        }
        Some(ForcedVariant::Hash(hash)) => candidates
            .get(Some(hash))
            .ok_or_else(|| ResolveError::ForcedVariantNotFound { hash: hash.clone() })?,
        None => probe(candidates, descriptors, reporter)?,
    };

    reporter.selected(picked);
    Ok(picked)
}

fn probe<'a, I, R>(
    candidates: &'a CandidateSet,
    descriptors: I,
    reporter: &R,
) -> Result<&'a Artifact, ResolveError>
where
    I: IntoIterator<Item = VariantDescriptor>,
    R: Reporter + ?Sized,
{
    for descriptor in descriptors {
        let hit = candidates.get(descriptor.hash());
        reporter.probed(&descriptor, hit.is_some());
        if let Some(artifact) = hit {
            return Ok(artifact);
        }
    }

    candidates
        .unvarianted()
        .ok_or(ResolveError::NoSuitableCandidate)
}

/// Resolution wired to injected provider, priority and reporting collaborators.
pub struct Resolver<R: Reporter> {
    providers: Arc<dyn ProviderSource>,
    priority: Arc<dyn PrioritySource>,
    reporter: R,
}

impl<R: Reporter> std::fmt::Debug for Resolver<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

impl<R: Reporter> Resolver<R> {
    /// Wire a resolver to its collaborators.
    pub fn new(
        providers: Arc<dyn ProviderSource>,
        priority: Arc<dyn PrioritySource>,
        reporter: R,
    ) -> Self {
        Self {
            providers,
            priority,
            reporter,
        }
    }

    /// Descriptors for `request`, most specific first.
    ///
    /// An explicit provider list both filters and orders the providers;
    /// otherwise the configured priority orders every known provider.
    pub fn descriptors(&self, request: &ResolutionRequest) -> Combinations {
        let configs = self.providers.provider_configs();
        let ordered = match &request.provider_priority {
            Some(names) => {
                let priority = priority_from_names(names);
                let selected = configs
                    .into_iter()
                    .filter(|cfg| priority.contains_key(&cfg.provider_name))
                    .collect();
                order_providers(selected, &priority)
            }
            None => order_providers(configs, &self.priority.provider_priority()),
        };

        for cfg in &ordered {
            tracing::debug!(
                "Using variant provider `{}` ({} values)",
                cfg.provider_name,
                cfg.ordered_values.len()
            );
        }
        generate_descriptors(&ordered)
    }

    /// Pick one artifact from `candidates` for `request`.
    ///
    /// Providers are only consulted when descriptor probing is needed.
    ///
    /// # Errors
    ///
    /// See [`resolve`].
    pub fn select<'a>(
        &self,
        request: &ResolutionRequest,
        candidates: &'a CandidateSet,
    ) -> Result<&'a Artifact, ResolveError> {
        let probing = !request.variants_disabled && request.forced.is_none();
        let descriptors = probing.then(|| self.descriptors(request));
        resolve(request, candidates, descriptors.into_iter().flatten(), &self.reporter)
    }
}
