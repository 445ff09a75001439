pub mod ast_def;
pub mod printer;
pub mod types;

pub use ast_def::{BinaryOp, Decl, Expr, ExprKind, Param, Program, Stmt};
pub use types::Type;
