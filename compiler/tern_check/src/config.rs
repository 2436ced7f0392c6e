//! Checker configuration.

/// How an unhandled `match` value in a statement is reported.
///
/// `match` expressions must produce a value, so they are always strict.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum MatchPolicy {
    /// Unhandled values are errors.
    #[default]
    Strict,
    /// Unhandled values are warnings suggesting a `_` branch.
    Permissive,
}

/// Configuration for semantic checking.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CheckConfig {
    pub match_policy: MatchPolicy,
    /// Maximum nesting of generic instantiations created while another is
    /// being created. Bounds polymorphic recursion such as `f[T]` calling
    /// `f[List[T]]`.
    pub max_instantiation_depth: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        CheckConfig {
            match_policy: MatchPolicy::Strict,
            max_instantiation_depth: 64,
        }
    }
}

impl CheckConfig {
    /// Lenient configuration: unhandled match values only warn.
    pub fn permissive() -> Self {
        CheckConfig {
            match_policy: MatchPolicy::Permissive,
            ..CheckConfig::default()
        }
    }
}
