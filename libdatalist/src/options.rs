//! Parser configuration.

/// Default bracket nesting limit.
///
/// Keeps recursion depth bounded no matter how deeply an input nests.
pub const MAX_DEPTH: usize = 256;

/// Knobs for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of nested brackets. The implicit root does not count.
    pub max_depth: usize,
}

impl ParseOptions {
    /// Options with the default nesting limit.
    pub const fn new() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }

    /// Replace the nesting limit.
    pub const fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}
