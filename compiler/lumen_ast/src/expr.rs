//! Expression nodes.

use lumen_ir::{Span, Symbol, TypeId};

use crate::{BinaryOp, ExprId, ExprRange, NodeId, UnaryOp};

/// Literal value.
///
/// Floats are stored as bits so literals stay `Eq` and `Hash`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Bool(bool),
    I32(i32),
    U32(u32),
    F32(u32),
}

impl Literal {
    pub fn f32(value: f32) -> Self {
        Literal::F32(value.to_bits())
    }

    /// Float value of an `F32` literal.
    pub fn as_f32(self) -> Option<f32> {
        match self {
            Literal::F32(bits) => Some(f32::from_bits(bits)),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Literal(Literal),
    /// Reference to a variable, parameter or constant.
    Ident(Symbol),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// Call of a user function or builtin by name.
    Call {
        callee: Symbol,
        args: ExprRange,
    },
    /// `T(args...)`, e.g. `vec3<f32>(1.0, 2.0, 3.0)`.
    TypeConstructor {
        ty: TypeId,
        args: ExprRange,
    },
    /// Struct member access or vector swizzle.
    Member {
        object: ExprId,
        member: Symbol,
    },
    Index {
        object: ExprId,
        index: ExprId,
    },
    /// `bitcast<T>(operand)`
    Bitcast {
        ty: TypeId,
        operand: ExprId,
    },
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}
