//! Core library for vpip.
//!
//! Composes the three stages of a resolution: listing candidates from an
//! index page, enumerating variant descriptors in priority order, and picking
//! the single best artifact.

pub mod candidates;
pub mod combination;
pub mod config;
pub mod io;
pub mod providers;
pub mod reporter;
pub mod resolver;

pub use candidates::CandidateSet;
pub use combination::{Combinations, generate_descriptors, order_providers};
pub use providers::{PrioritySource, ProviderSource};
pub use reporter::{NullReporter, Reporter, TracingReporter};
pub use resolver::{ForcedVariant, ResolutionRequest, ResolveError, Resolver, resolve};

/// Re-export of the shared schema crate.
pub use vpip_schema as types;

/// User Agent string for index requests
pub const USER_AGENT: &str = concat!("vpip/", env!("CARGO_PKG_VERSION"));
