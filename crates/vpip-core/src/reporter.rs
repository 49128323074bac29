//! Reporter trait for dependency injection
//!
//! Resolution reports each probed descriptor and the final pick through
//! this trait, so the probing logic stays testable without capturing output.

use vpip_schema::{Artifact, VariantDescriptor};

/// Receives resolution diagnostics in probe order.
pub trait Reporter: Send + Sync {
    /// A descriptor was looked up in the candidate set.
    fn probed(&self, descriptor: &VariantDescriptor, found: bool);

    /// An artifact was chosen.
    fn selected(&self, artifact: &Artifact);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn probed(&self, descriptor: &VariantDescriptor, found: bool) {
        (**self).probed(descriptor, found);
    }

    fn selected(&self, artifact: &Artifact) {
        (**self).selected(artifact);
    }
}

impl<T: Reporter + ?Sized> Reporter for &T {
    fn probed(&self, descriptor: &VariantDescriptor, found: bool) {
        (**self).probed(descriptor, found);
    }

    fn selected(&self, artifact: &Artifact) {
        (**self).selected(artifact);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn probed(&self, _: &VariantDescriptor, _: bool) {}
    fn selected(&self, _: &Artifact) {}
}

/// Forwards diagnostics to `tracing` (probes at debug, the pick at info).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn probed(&self, descriptor: &VariantDescriptor, found: bool) {
        let outcome = if found { "found" } else { "not found" };
        tracing::debug!("Probing variant {descriptor}: {outcome}");
    }

    fn selected(&self, artifact: &Artifact) {
        match &artifact.variant_hash {
            Some(hash) => tracing::info!("Selected {} (variant {hash})", artifact.filename),
            None => tracing::info!("Selected {} (no variant)", artifact.filename),
        }
    }
}
