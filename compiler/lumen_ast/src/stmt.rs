//! Statement nodes.

use lumen_ir::Span;

use crate::{CaseRange, ExprId, NodeId, SelectorRange, StmtId, StmtRange, VarId};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    Assign {
        lhs: ExprId,
        rhs: ExprId,
    },
    /// `var`, `let` or `const` inside a function body.
    VarDecl(VarId),
    Block(StmtRange),
    If {
        cond: ExprId,
        body: StmtRange,
        /// Either a `Block` or a chained `If`.
        else_stmt: Option<StmtId>,
    },
    Loop {
        body: StmtRange,
        continuing: Option<StmtRange>,
    },
    Switch {
        cond: ExprId,
        cases: CaseRange,
    },
    Return(Option<ExprId>),
    Break,
    Continue,
    Discard,
    /// A call evaluated for its side effects.
    Call(ExprId),
}

impl StmtKind {
    /// Statements after which the rest of a block never runs.
    pub const fn is_terminator(&self) -> bool {
        matches!(
            self,
            StmtKind::Return(_) | StmtKind::Break | StmtKind::Continue | StmtKind::Discard
        )
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

/// One `case` clause of a switch.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Case {
    pub id: NodeId,
    pub selectors: SelectorRange,
    pub body: StmtRange,
    pub span: Span,
}

/// One selector of a case clause. `None` is the `default` selector.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CaseSelector {
    pub id: NodeId,
    pub expr: Option<ExprId>,
    pub span: Span,
}

impl CaseSelector {
    pub const fn is_default(&self) -> bool {
        self.expr.is_none()
    }
}
