//! Capability contract
//!
//! A static declaration of what this translator can push to the store. The
//! engine consults it once, before building commands; execution never
//! re-validates a capability.

/// What the translator supports, declared up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Comparison predicates on the key column become ranges
    pub comparison_pushdown: bool,
    /// OR trees union-merge into range sets
    pub disjunction_pushdown: bool,
    /// IN and NOT IN lists on the key column become range sets
    pub in_list_pushdown: bool,
    /// Largest IN list the planner will expand
    pub max_in_list: usize,
    /// COUNT(*) without grouping runs store-side
    pub count_star_pushdown: bool,
    /// Joins never push down; the engine joins above this layer
    pub join_pushdown: bool,
    /// Non-key predicates, LIKE included, evaluate store-side as residuals
    pub residual_pushdown: bool,
    /// Default mutation batch size
    pub default_batch_size: usize,
}

impl Capabilities {
    /// The capabilities of this translator version.
    pub const fn current() -> Self {
        Self {
            comparison_pushdown: true,
            disjunction_pushdown: true,
            in_list_pushdown: true,
            max_in_list: 1000,
            count_star_pushdown: true,
            join_pushdown: false,
            residual_pushdown: true,
            default_batch_size: 2048,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::current()
    }
}
