//! Unified error types.
//!
//! ## Error Hierarchy
//!
//! ```text
//! QuillError (top-level wrapper)
//! ├── SymbolError        - symbol table contract violations
//! ├── RegistrationError  - type registry failures
//! └── CompilationError   - diagnostics raised while reducing a form
//! ```
//!
//! Resolution misses are not errors: lookups return `Option` and the caller
//! decides whether a miss is an `UndefinedSymbol` or a cue to try another path.
//! The variants here are either user-facing diagnostics carrying a [`Span`] or
//! contract violations that end the current compilation.

use thiserror::Error;

use crate::{Span, SymbolKey};

// ============================================================================
// Symbol Table Errors
// ============================================================================

/// Contract violations raised by the symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// A mutation was attempted on a frozen table.
    #[error("symbol table is read-only")]
    ReadOnly,

    /// `resolve` found no entry anywhere in the scope chain.
    #[error("symbol not found: {key}")]
    KeyNotFound {
        /// The key that was looked up.
        key: SymbolKey,
    },

    /// `add` was called twice with the same key on one table.
    #[error("duplicate symbol: {key}")]
    DuplicateKey {
        /// The duplicated key.
        key: SymbolKey,
    },
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised by the type registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A type with this hash already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A referenced type was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// Instantiation was requested for a type that declares no generic parameters.
    #[error("'{0}' is not a generic definition")]
    NotAGenericDefinition(String),

    /// Instantiation was requested with the wrong number of arguments.
    #[error("'{name}' expects {expected} generic argument(s), got {got}")]
    GenericArgCountMismatch {
        /// The generic definition.
        name: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Errors raised while reducing forms.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// No registered symbol and no fallback answered a form.
    #[error("at {span}: undefined symbol '{name}'")]
    UndefinedSymbol {
        /// The symbol name.
        name: String,
        /// Where the symbol was referenced.
        span: Span,
    },

    /// No candidate accepted the supplied arguments.
    #[error("at {span}: no applicable overload for '{name}({args})'")]
    NoMatchingOverload {
        /// The member name.
        name: String,
        /// The argument types as a string.
        args: String,
        /// Where the call was made.
        span: Span,
    },

    /// Several candidates ranked equally and the ambiguity policy rejects ties.
    #[error("at {span}: ambiguous call to '{name}': {candidates}")]
    AmbiguousOverload {
        /// The member name.
        name: String,
        /// Description of the tied candidates.
        candidates: String,
        /// Where the call was made.
        span: Span,
    },

    /// A receiver type has no descriptor.
    #[error("at {span}: unknown type '{name}'")]
    UnknownType {
        /// The type that was not found.
        name: String,
        /// Where the type was referenced.
        span: Span,
    },

    /// Nested scopes exceeded the configured limit.
    #[error("at {span}: scope nesting exceeds {limit}")]
    ScopeTooDeep {
        /// Configured maximum depth.
        limit: usize,
        /// Where the scope was opened.
        span: Span,
    },

    /// Internal invariant breach (malformed candidate data and the like).
    #[error("internal error: {message}")]
    Internal {
        /// The error message.
        message: String,
    },

    /// A symbol table contract violation.
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    /// A type registry failure.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl CompilationError {
    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CompilationError::Internal {
            message: message.into(),
        }
    }

    /// Get the span where this error occurred; [`Span::UNKNOWN`] for contract violations.
    pub fn span(&self) -> Span {
        match self {
            CompilationError::UndefinedSymbol { span, .. } => *span,
            CompilationError::NoMatchingOverload { span, .. } => *span,
            CompilationError::AmbiguousOverload { span, .. } => *span,
            CompilationError::UnknownType { span, .. } => *span,
            CompilationError::ScopeTooDeep { span, .. } => *span,
            CompilationError::Internal { .. }
            | CompilationError::Symbol(_)
            | CompilationError::Registration(_) => Span::UNKNOWN,
        }
    }

    /// Whether this error is a contract violation rather than a user-facing diagnostic.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CompilationError::Internal { .. }
                | CompilationError::Symbol(_)
                | CompilationError::Registration(_)
        )
    }
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Top-level error wrapper.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuillError {
    /// Symbol table error.
    #[error("symbol error: {0}")]
    Symbol(#[from] SymbolError),

    /// Type registry error.
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// Compilation error.
    #[error("compilation error: {0}")]
    Compilation(#[from] CompilationError),
}

/// Result alias using [`QuillError`].
pub type Result<T> = std::result::Result<T, QuillError>;
