//! Dispatch-style syntax nodes.
//!
//! The reader produces these; the reducer consumes them. A [`CallNode`]
//! describes any access (member read, method call, construction) in one
//! uniform shape: optional receiver, dispatch kind, name, explicit type
//! arguments and arguments.

use crate::{DispatchKind, Literal, Param, Span, TypeHash};

/// A syntax node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A literal value.
    Literal {
        /// The value.
        value: Literal,
        /// Source location.
        span: Span,
    },
    /// A bare identifier.
    Symbol {
        /// The identifier.
        name: String,
        /// Source location.
        span: Span,
    },
    /// A dispatch-style call.
    Call(CallNode),
    /// An anonymous function.
    Lambda {
        /// Declared parameters.
        params: Vec<Param>,
        /// Body.
        body: Box<Node>,
        /// Source location.
        span: Span,
    },
}

impl Node {
    /// A literal node.
    pub fn literal(value: Literal, span: Span) -> Self {
        Node::Literal { value, span }
    }

    /// An identifier node.
    pub fn symbol(name: impl Into<String>, span: Span) -> Self {
        Node::Symbol {
            name: name.into(),
            span,
        }
    }

    /// A lambda node.
    pub fn lambda(params: Vec<Param>, body: Node, span: Span) -> Self {
        Node::Lambda {
            params,
            body: Box::new(body),
            span,
        }
    }

    /// Source location.
    pub fn span(&self) -> Span {
        match self {
            Node::Literal { span, .. } | Node::Symbol { span, .. } | Node::Lambda { span, .. } => {
                *span
            }
            Node::Call(call) => call.span,
        }
    }
}

impl From<CallNode> for Node {
    fn from(call: CallNode) -> Self {
        Node::Call(call)
    }
}

/// A dispatch-style call: `receiver.name<type_args>(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CallNode {
    /// Receiver, absent for global forms.
    pub receiver: Option<Box<Node>>,
    /// Dispatch kind. [`DispatchKind::GENERIC`] is set when type arguments are present.
    pub kind: DispatchKind,
    /// Member name; empty for the default dispatch.
    pub name: String,
    /// Explicit generic arguments.
    pub type_args: Vec<TypeHash>,
    /// Arguments.
    pub args: Vec<Node>,
    /// Source location.
    pub span: Span,
}

impl CallNode {
    /// Create a call.
    pub fn new(kind: DispatchKind, name: impl Into<String>, args: Vec<Node>, span: Span) -> Self {
        Self {
            receiver: None,
            kind,
            name: name.into(),
            type_args: Vec::new(),
            args,
            span,
        }
    }

    /// A method call without a receiver.
    pub fn method(name: impl Into<String>, args: Vec<Node>, span: Span) -> Self {
        Self::new(DispatchKind::METHOD, name, args, span)
    }

    /// A constructor call.
    pub fn constructor(name: impl Into<String>, args: Vec<Node>, span: Span) -> Self {
        Self::new(DispatchKind::CONSTRUCTOR, name, args, span)
    }

    /// A member read.
    pub fn member(name: impl Into<String>, span: Span) -> Self {
        Self::new(DispatchKind::MEMBER, name, Vec::new(), span)
    }

    /// Set the receiver.
    pub fn with_receiver(mut self, receiver: Node) -> Self {
        self.receiver = Some(Box::new(receiver));
        self
    }

    /// Set explicit type arguments and mark the kind as generic.
    pub fn with_type_args(mut self, type_args: Vec<TypeHash>) -> Self {
        if !type_args.is_empty() {
            self.kind |= DispatchKind::GENERIC;
        }
        self.type_args = type_args;
        self
    }

    /// Whether explicit type arguments were given.
    pub fn is_generic(&self) -> bool {
        self.kind.contains(DispatchKind::GENERIC)
    }
}
