//! Collaborator seams for variant providers.
//!
//! The core never discovers or instantiates provider plugins. It only asks
//! these traits for already-built configurations and for a priority map.

use std::collections::HashMap;

use vpip_schema::ProviderConfig;

/// Supplies the provider configurations available to this process.
pub trait ProviderSource: Send + Sync {
    /// Already-instantiated provider configurations, in discovery order.
    fn provider_configs(&self) -> Vec<ProviderConfig>;
}

/// Supplies the configured provider priority (lower rank is preferred).
pub trait PrioritySource: Send + Sync {
    /// Provider name to rank. Empty means "use discovery order".
    fn provider_priority(&self) -> HashMap<String, usize>;
}

impl ProviderSource for Vec<ProviderConfig> {
    fn provider_configs(&self) -> Vec<ProviderConfig> {
        self.clone()
    }
}

impl PrioritySource for HashMap<String, usize> {
    fn provider_priority(&self) -> HashMap<String, usize> {
        self.clone()
    }
}

/// Rank providers by their position in `names`. The first occurrence of a
/// repeated name keeps its rank.
pub fn priority_from_names<S: AsRef<str>>(names: &[S]) -> HashMap<String, usize> {
    let mut priority = HashMap::new();
    for (rank, name) in names.iter().enumerate() {
        priority.entry(name.as_ref().to_string()).or_insert(rank);
    }
    priority
}
