/// Resolver configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolverConfig {
    /// Maximum number of nested expansions below the root.
    /// Branches that would go deeper are treated as unsatisfiable.
    pub max_depth: usize,
}

impl ResolverConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    pub fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new()
    }
}
