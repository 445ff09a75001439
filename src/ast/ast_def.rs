// Tree built by the external parser and annotated by the passes:
// Program, Decl, Stmt, Expr, Param.
//
// Every node owns its children; resolved names hold a shared handle to
// their Symbol, whose owning declaration outlives the reference.

use std::rc::Rc;

use crate::ast::types::Type;
use crate::resolver::symbol::Symbol;

/// A parsed compilation unit: the top-level declaration sequence.
#[derive(Debug)]
pub struct Program {
    pub decls: Vec<Decl>,
}

impl Program {
    pub fn new(decls: Vec<Decl>) -> Self {
        Self { decls }
    }
}

/// `name: type;`, `name: type = value;` or `name: function ... = { ... }`.
///
/// `num_locals` and `symbol` are write-once annotations filled in by the
/// resolver.
#[derive(Debug)]
pub struct Decl {
    pub name: String,
    pub ty: Type,
    pub value: Option<Expr>,
    pub code: Option<Vec<Stmt>>,
    pub num_locals: usize,
    pub symbol: Option<Rc<Symbol>>,
}

impl Decl {
    pub fn variable(name: &str, ty: Type, value: Option<Expr>) -> Self {
        Self {
            name: name.to_string(),
            ty,
            value,
            code: None,
            num_locals: 0,
            symbol: None,
        }
    }

    pub fn function(
        name: &str,
        return_type: Type,
        params: Vec<Param>,
        code: Option<Vec<Stmt>>,
    ) -> Self {
        Self {
            name: name.to_string(),
            ty: Type::Function {
                return_type: Box::new(return_type),
                params,
            },
            value: None,
            code,
            num_locals: 0,
            symbol: None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.ty, Type::Function { .. })
    }
}

/// One formal parameter of a function type. The resolver attaches the
/// Parameter symbol; structural type equality never looks at it.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub symbol: Option<Rc<Symbol>>,
}

impl Param {
    pub fn new(name: &str, ty: Type) -> Self {
        Self {
            name: name.to_string(),
            ty,
            symbol: None,
        }
    }
}

#[derive(Debug)]
pub enum Stmt {
    Decl(Decl),
    Expr(Expr),
    IfElse {
        condition: Expr,
        body: Box<Stmt>,
        else_body: Option<Box<Stmt>>,
    },
    Block(Vec<Stmt>),
    For {
        init: Option<Expr>,
        condition: Option<Expr>,
        next: Option<Expr>,
        body: Box<Stmt>,
    },
    Print(Vec<Expr>),
    Return(Option<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Assign,
    Or,
    And,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
}

impl BinaryOp {
    /// Binding strength, used only by the pretty printer to decide where
    /// parentheses are needed.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Assign => 1,
            Self::Or => 2,
            Self::And => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge | Self::Eq | Self::Ne => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Mod => 6,
            Self::Exp => 7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Neg(Box<Expr>),
    Not(Box<Expr>),
    Increment(Box<Expr>),
    Decrement(Box<Expr>),
    Subscript {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    ArrayInitializer(Vec<Expr>),
    Name {
        name: String,
        symbol: Option<Rc<Symbol>>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    IntegerLiteral(i64),
    StringLiteral {
        value: String,
        /// Data-section label, assigned by the code generator's globals pass.
        label: Option<String>,
    },
    CharLiteral(char),
    BooleanLiteral(bool),
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self {
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    pub fn neg(operand: Expr) -> Self {
        Self {
            kind: ExprKind::Neg(Box::new(operand)),
        }
    }

    pub fn not(operand: Expr) -> Self {
        Self {
            kind: ExprKind::Not(Box::new(operand)),
        }
    }

    pub fn increment(target: Expr) -> Self {
        Self {
            kind: ExprKind::Increment(Box::new(target)),
        }
    }

    pub fn decrement(target: Expr) -> Self {
        Self {
            kind: ExprKind::Decrement(Box::new(target)),
        }
    }

    pub fn subscript(base: Expr, index: Expr) -> Self {
        Self {
            kind: ExprKind::Subscript {
                base: Box::new(base),
                index: Box::new(index),
            },
        }
    }

    pub fn array_initializer(elements: Vec<Expr>) -> Self {
        Self {
            kind: ExprKind::ArrayInitializer(elements),
        }
    }

    pub fn name(name: &str) -> Self {
        Self {
            kind: ExprKind::Name {
                name: name.to_string(),
                symbol: None,
            },
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self {
            kind: ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
        }
    }

    pub fn integer(value: i64) -> Self {
        Self {
            kind: ExprKind::IntegerLiteral(value),
        }
    }

    pub fn string(value: &str) -> Self {
        Self {
            kind: ExprKind::StringLiteral {
                value: value.to_string(),
                label: None,
            },
        }
    }

    pub fn char_literal(value: char) -> Self {
        Self {
            kind: ExprKind::CharLiteral(value),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            kind: ExprKind::BooleanLiteral(value),
        }
    }

    /// Binding strength of this node for the pretty printer.
    pub fn precedence(&self) -> u8 {
        match &self.kind {
            ExprKind::Binary { op, .. } => op.precedence(),
            ExprKind::Neg(_) | ExprKind::Not(_) => 8,
            ExprKind::Increment(_)
            | ExprKind::Decrement(_)
            | ExprKind::Subscript { .. }
            | ExprKind::Call { .. } => 9,
            _ => 10,
        }
    }

    /// True for the literal kinds a data-section entry can be rendered from.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::IntegerLiteral(_)
                | ExprKind::StringLiteral { .. }
                | ExprKind::CharLiteral(_)
                | ExprKind::BooleanLiteral(_)
        )
    }

    /// The resolved symbol of a name reference, if any.
    pub fn symbol(&self) -> Option<&Rc<Symbol>> {
        match &self.kind {
            ExprKind::Name { symbol, .. } => symbol.as_ref(),
            _ => None,
        }
    }
}
