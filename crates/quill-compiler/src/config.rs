//! Dispatch and reduction options.

/// What to do when several applicable candidates rank equally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbiguityPolicy {
    /// Pick the earliest candidate in declaration order and log the tie.
    #[default]
    FirstWins,
    /// Report [`AmbiguousOverload`](quill_core::CompilationError::AmbiguousOverload).
    Reject,
}

/// Options for overload dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Tie handling.
    pub ambiguity: AmbiguityPolicy,
}

impl DispatchOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tie handling policy.
    pub fn with_ambiguity(mut self, ambiguity: AmbiguityPolicy) -> Self {
        self.ambiguity = ambiguity;
        self
    }
}

/// Default limit on nested scopes.
pub const DEFAULT_MAX_SCOPE_DEPTH: usize = 256;

/// Options for the [`Reducer`](crate::Reducer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducerOptions {
    /// Options forwarded to every dispatch.
    pub dispatch: DispatchOptions,
    /// Maximum depth of the scope chain.
    pub max_scope_depth: usize,
}

impl Default for ReducerOptions {
    fn default() -> Self {
        Self {
            dispatch: DispatchOptions::default(),
            max_scope_depth: DEFAULT_MAX_SCOPE_DEPTH,
        }
    }
}

impl ReducerOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dispatch options.
    pub fn with_dispatch(mut self, dispatch: DispatchOptions) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Set the scope depth limit.
    pub fn with_max_scope_depth(mut self, depth: usize) -> Self {
        self.max_scope_depth = depth;
        self
    }
}
