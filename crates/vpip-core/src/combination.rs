//! Variant combination engine.
//!
//! Enumerates provider value combinations from most to least specific.
//! Within one specificity level, subsets of providers are visited in
//! lexicographic priority order, and each subset walks its providers' values
//! as an odometer whose leftmost (highest priority) wheel turns slowest. The
//! empty "no variant" descriptor comes last.
//!
//! For providers `A = [a1, a2]` and `B = [b1]` the sequence is:
//!
//! ```text
//! [a1, b1] [a2, b1] [a1] [a2] [b1] []
//! ```

use std::collections::HashMap;
use std::iter::FusedIterator;

use vpip_schema::{ProviderConfig, ProviderProperty, VariantDescriptor};

/// Stable-sort providers by priority rank (lower is preferred).
///
/// Providers missing from `priority` sort after every ranked provider and
/// keep their relative input order.
pub fn order_providers(
    mut configs: Vec<ProviderConfig>,
    priority: &HashMap<String, usize>,
) -> Vec<ProviderConfig> {
    configs.sort_by_key(|cfg| {
        priority
            .get(&cfg.provider_name)
            .copied()
            .unwrap_or(usize::MAX)
    });
    configs
}

/// Start a lazy enumeration of descriptors over already-ordered providers.
///
/// Providers without any values cannot contribute and are skipped.
pub fn generate_descriptors(ordered: &[ProviderConfig]) -> Combinations {
    let axes: Vec<Vec<ProviderProperty>> = ordered
        .iter()
        .filter(|cfg| {
            if cfg.ordered_values.is_empty() {
                tracing::debug!("Provider `{}` offers no values, skipping", cfg.provider_name);
                false
            } else {
                true
            }
        })
        .map(|cfg| cfg.ordered_values.clone())
        .collect();
    Combinations::new(axes)
}

/// Lazy, deterministic iterator over [`VariantDescriptor`]s.
///
/// Produces one descriptor per call; nothing beyond the current position is
/// materialized. A consumed iterator cannot be restarted, but generating
/// again from the same providers reproduces the same sequence.
#[derive(Debug, Clone)]
pub struct Combinations {
    axes: Vec<Vec<ProviderProperty>>,
    /// Indices into `axes` for the current subset, strictly increasing.
    subset: Vec<usize>,
    /// Value index for each member of `subset`.
    odometer: Vec<usize>,
    done: bool,
}

impl Combinations {
    fn new(axes: Vec<Vec<ProviderProperty>>) -> Self {
        let size = axes.len();
        Self {
            axes,
            subset: (0..size).collect(),
            odometer: vec![0; size],
            done: false,
        }
    }

    /// Total number of descriptors the full enumeration yields, the empty
    /// one included.
    pub fn total(&self) -> usize {
        self.axes
            .iter()
            .map(|values| values.len() + 1)
            .fold(1, usize::saturating_mul)
    }

    fn current(&self) -> VariantDescriptor {
        let properties = self
            .subset
            .iter()
            .zip(&self.odometer)
            .map(|(&axis, &value)| self.axes[axis][value].clone())
            .collect();
        VariantDescriptor::new(properties)
    }

    /// Turn the odometer one step. Returns `false` once it wraps around.
    fn advance_odometer(&mut self) -> bool {
        for pos in (0..self.odometer.len()).rev() {
            self.odometer[pos] += 1;
            if self.odometer[pos] < self.axes[self.subset[pos]].len() {
                return true;
            }
            self.odometer[pos] = 0;
        }
        false
    }

    /// Move to the next subset of the same size, or drop to the first subset
    /// of the next smaller size.
    fn advance_subset(&mut self) {
        let n = self.axes.len();
        let k = self.subset.len();

        if let Some(pos) = (0..k).rev().find(|&i| self.subset[i] < n - k + i) {
            self.subset[pos] += 1;
            for next in pos + 1..k {
                self.subset[next] = self.subset[next - 1] + 1;
            }
        } else {
            self.subset = (0..k.saturating_sub(1)).collect();
        }
        self.odometer = vec![0; self.subset.len()];
    }
}

impl Iterator for Combinations {
    type Item = VariantDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let descriptor = self.current();
        if self.subset.is_empty() {
            self.done = true;
        } else if !self.advance_odometer() {
            self.advance_subset();
        }
        Some(descriptor)
    }
}

impl FusedIterator for Combinations {}
