//! AST node graph for the Lumen shader compiler.
//!
//! Nodes live in an [`Ast`] arena owned by one program generation and are
//! referred to by `u32` ids. Child lists are stored as compact ranges into
//! side tables, so every node kind is `Copy`.
//!
//! Every node carries a [`NodeId`] that is unique within its generation
//! and records that generation. A node id minted by one program never
//! appears in another program's arena: moving a subgraph between programs
//! goes through the clone protocol.

mod arena;
mod attr;
mod decl;
mod expr;
mod ids;
mod ops;
mod ranges;
mod stmt;
pub mod visitor;

pub use arena::Ast;
pub use attr::{AttrKind, Attribute, Builtin, PipelineStage};
pub use decl::{Decl, DeclKind, FunctionDecl, MemberDecl, VarKind, Variable};
pub use expr::{Expr, ExprKind, Literal};
pub use ids::{AttrId, CaseId, ExprId, MemberId, NodeId, SelectorId, StmtId, VarId};
pub use ops::{BinaryOp, UnaryOp};
pub use ranges::{AttrRange, CaseRange, ExprRange, MemberRange, SelectorRange, StmtRange, VarRange};
pub use stmt::{Case, CaseSelector, Stmt, StmtKind};

pub use lumen_ir::DeclId;
pub use visitor::Visitor;
