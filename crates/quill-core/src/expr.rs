//! Reduced expressions.
//!
//! Symbol definitions turn syntax nodes into [`Expr`] trees. Every node knows
//! its result type, which is what the dispatcher matches against parameter
//! types.

use std::fmt;

use ordered_float::OrderedFloat;

use crate::{MemberEntry, MethodEntry, Param, TypeHash, primitives};

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(OrderedFloat<f64>),
    /// Boolean.
    Bool(bool),
    /// String.
    Str(String),
    /// The null reference.
    Nil,
}

impl Literal {
    /// The built-in type of the literal.
    pub fn ty(&self) -> TypeHash {
        match self {
            Literal::Int(_) => primitives::INT,
            Literal::Float(_) => primitives::FLOAT,
            Literal::Bool(_) => primitives::BOOL,
            Literal::Str(_) => primitives::STRING,
            Literal::Nil => primitives::OBJECT,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Float(v) => write!(f, "{v}"),
            Literal::Bool(v) => write!(f, "{v}"),
            Literal::Str(v) => write!(f, "{v:?}"),
            Literal::Nil => f.write_str("null"),
        }
    }
}

/// A typed, reduced expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A constant value.
    Constant {
        /// The value.
        value: Literal,
        /// Result type.
        ty: TypeHash,
    },
    /// A reference to a bound parameter.
    Parameter {
        /// Parameter name.
        name: String,
        /// Declared type.
        ty: TypeHash,
    },
    /// A type used as a value; typed by its static wrapper.
    TypeRef {
        /// The referenced type.
        target: TypeHash,
        /// The static wrapper of `target`.
        ty: TypeHash,
    },
    /// Instance or static method call.
    Call {
        /// Receiver; `None` for static calls.
        receiver: Option<Box<Expr>>,
        /// The selected (specialized) method.
        method: MethodEntry,
        /// Arguments, variadic tail already packed.
        args: Vec<Expr>,
        /// Result type.
        ty: TypeHash,
    },
    /// Object construction.
    New {
        /// The selected constructor.
        constructor: MethodEntry,
        /// Arguments.
        args: Vec<Expr>,
        /// The constructed type.
        ty: TypeHash,
    },
    /// Array construction from items.
    NewArray {
        /// Element type.
        element: TypeHash,
        /// Items, each typed as `element`.
        items: Vec<Expr>,
        /// The array type.
        ty: TypeHash,
    },
    /// Field, property or indexer access.
    Member {
        /// Receiver; `None` for static members.
        receiver: Option<Box<Expr>>,
        /// The selected member.
        member: MemberEntry,
        /// Index arguments (empty unless an indexer).
        args: Vec<Expr>,
        /// Result type.
        ty: TypeHash,
    },
    /// Conversion of an operand to another type.
    Convert {
        /// The converted expression.
        operand: Box<Expr>,
        /// Target type.
        ty: TypeHash,
    },
    /// Anonymous function.
    Lambda {
        /// Declared parameters.
        params: Vec<Param>,
        /// Reduced body.
        body: Box<Expr>,
        /// [`primitives::LAMBDA`] until bound to a delegate type.
        ty: TypeHash,
    },
}

impl Expr {
    /// Result type of the expression.
    pub fn ty(&self) -> TypeHash {
        match self {
            Expr::Constant { ty, .. }
            | Expr::Parameter { ty, .. }
            | Expr::TypeRef { ty, .. }
            | Expr::Call { ty, .. }
            | Expr::New { ty, .. }
            | Expr::NewArray { ty, .. }
            | Expr::Member { ty, .. }
            | Expr::Convert { ty, .. }
            | Expr::Lambda { ty, .. } => *ty,
        }
    }

    /// A literal constant typed by its built-in type.
    pub fn literal(value: Literal) -> Self {
        let ty = value.ty();
        Expr::Constant { value, ty }
    }

    /// An integer constant.
    pub fn int(value: i64) -> Self {
        Self::literal(Literal::Int(value))
    }

    /// A float constant.
    pub fn float(value: f64) -> Self {
        Self::literal(Literal::Float(OrderedFloat(value)))
    }

    /// A boolean constant.
    pub fn bool(value: bool) -> Self {
        Self::literal(Literal::Bool(value))
    }

    /// A string constant.
    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(Literal::Str(value.into()))
    }

    /// A parameter reference.
    pub fn parameter(name: impl Into<String>, ty: TypeHash) -> Self {
        Expr::Parameter {
            name: name.into(),
            ty,
        }
    }

    /// An unbound lambda.
    pub fn lambda(params: Vec<Param>, body: Expr) -> Self {
        Expr::Lambda {
            params,
            body: Box::new(body),
            ty: primitives::LAMBDA,
        }
    }

    /// Whether this is a lambda.
    pub fn is_lambda(&self) -> bool {
        matches!(self, Expr::Lambda { .. })
    }

    /// Wrap in a [`Expr::Convert`] unless the type already matches.
    pub fn convert_to(self, ty: TypeHash) -> Self {
        if self.ty() == ty {
            self
        } else {
            Expr::Convert {
                operand: Box::new(self),
                ty,
            }
        }
    }

    /// Give a lambda its delegate type. Other expressions are returned unchanged.
    pub fn bind_lambda(self, delegate: TypeHash) -> Self {
        match self {
            Expr::Lambda { params, body, .. } => Expr::Lambda {
                params,
                body,
                ty: delegate,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_carry_builtin_types() {
        assert_eq!(Expr::int(1).ty(), primitives::INT);
        assert_eq!(Expr::float(1.5).ty(), primitives::FLOAT);
        assert_eq!(Expr::string("a").ty(), primitives::STRING);
        assert_eq!(Expr::literal(Literal::Nil).ty(), primitives::OBJECT);
    }

    #[test]
    fn convert_to_same_type_is_identity() {
        assert_eq!(Expr::int(3).convert_to(primitives::INT), Expr::int(3));
        let converted = Expr::int(3).convert_to(primitives::OBJECT);
        assert_eq!(converted.ty(), primitives::OBJECT);
        assert!(matches!(converted, Expr::Convert { .. }));
    }

    #[test]
    fn lambda_binding() {
        let lambda = Expr::lambda(
            vec![Param::new("x", primitives::INT)],
            Expr::parameter("x", primitives::INT),
        );
        assert_eq!(lambda.ty(), primitives::LAMBDA);
        let fn_type = TypeHash::from_name("IntFn");
        assert_eq!(lambda.bind_lambda(fn_type).ty(), fn_type);
        assert_eq!(Expr::int(1).bind_lambda(fn_type).ty(), primitives::INT);
    }
}
