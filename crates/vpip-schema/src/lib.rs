//! Shared types and filename grammars for vpip.
//!
//! Everything here is pure data: parsing a simple-index page into
//! [`Artifact`] records, the wheel variant-tag grammar, and the value types
//! the variant combination engine works over.

pub mod artifact;
pub mod hash;
pub mod listing;
pub mod types;
pub mod variant;
pub mod wheel;

// Re-exports
pub use artifact::{ArtifactError, parse_artifact};
pub use hash::*;
pub use listing::{extract_links, list_candidates};
pub use types::*;
pub use variant::{ProviderConfig, ProviderProperty, VariantDescriptor};
pub use wheel::{WheelNameError, variant_hash_from_wheel};
