// Pretty printing of the tree back to source-level syntax. Diagnostics
// embed these renderings, and the driver's print mode dumps whole programs.

use std::fmt;

use crate::ast::ast_def::{BinaryOp, Decl, Expr, ExprKind, Param, Program, Stmt};
use crate::ast::types::Type;

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Assign => "=",
            Self::Or => "||",
            Self::And => "&&",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Exp => "^",
        };
        write!(f, "{}", token)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Character => write!(f, "char"),
            Self::Integer => write!(f, "integer"),
            Self::String => write!(f, "string"),
            Self::Void => write!(f, "void"),
            Self::Array { element, size } => {
                write!(f, "array [")?;
                if let Some(size) = size {
                    write!(f, "{}", size)?;
                }
                write!(f, "] {}", element)
            }
            Self::Function {
                return_type,
                params,
            } => {
                write!(f, "function {}(", return_type)?;
                fmt_param_list(f, params)?;
                write!(f, ")")
            }
        }
    }
}

fn fmt_param_list(f: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}: {}", param.name, param.ty)?;
    }
    return Ok(());
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, 0)
    }
}

impl Expr {
    /// Print this expression, parenthesised when it binds looser than the
    /// surrounding operator.
    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        let parens = self.precedence() < parent;
        if parens {
            write!(f, "(")?;
        }

        let prec = self.precedence();
        match &self.kind {
            ExprKind::Binary { op, left, right } => {
                left.fmt_prec(f, prec)?;
                write!(f, "{}", op)?;
                right.fmt_prec(f, prec)?;
            }
            ExprKind::Neg(operand) => {
                write!(f, "-")?;
                operand.fmt_prec(f, prec)?;
            }
            ExprKind::Not(operand) => {
                write!(f, "!")?;
                operand.fmt_prec(f, prec)?;
            }
            ExprKind::Increment(target) => {
                target.fmt_prec(f, prec)?;
                write!(f, "++")?;
            }
            ExprKind::Decrement(target) => {
                target.fmt_prec(f, prec)?;
                write!(f, "--")?;
            }
            ExprKind::Subscript { base, index } => {
                base.fmt_prec(f, prec)?;
                write!(f, "[{}]", index)?;
            }
            ExprKind::ArrayInitializer(elements) => {
                write!(f, "{{")?;
                fmt_expr_list(f, elements)?;
                write!(f, "}}")?;
            }
            ExprKind::Name { name, .. } => write!(f, "{}", name)?,
            ExprKind::Call { callee, args } => {
                callee.fmt_prec(f, 0)?;
                write!(f, "(")?;
                fmt_expr_list(f, args)?;
                write!(f, ")")?;
            }
            ExprKind::IntegerLiteral(value) => write!(f, "{}", value)?,
            ExprKind::StringLiteral { value, .. } => write!(f, "\"{}\"", value)?,
            ExprKind::CharLiteral(value) => write!(f, "'{}'", value)?,
            ExprKind::BooleanLiteral(true) => write!(f, "true")?,
            ExprKind::BooleanLiteral(false) => write!(f, "false")?,
        }

        if parens {
            write!(f, ")")?;
        }
        return Ok(());
    }
}

fn fmt_expr_list(f: &mut fmt::Formatter<'_>, exprs: &[Expr]) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        expr.fmt_prec(f, 0)?;
    }
    return Ok(());
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decl in &self.decls {
            decl.fmt_indent(f, 0)?;
        }
        return Ok(());
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indent(f, 0)
    }
}

fn fmt_tabs(f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
    for _ in 0..level {
        write!(f, "\t")?;
    }
    return Ok(());
}

impl Decl {
    fn fmt_indent(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        fmt_tabs(f, level)?;
        write!(f, "{}: {}", self.name, self.ty)?;

        if let Some(value) = &self.value {
            writeln!(f, " = {};", value)?;
        } else if let Some(code) = &self.code {
            writeln!(f, " = {{")?;
            for stmt in code {
                stmt.fmt_indent(f, level + 1)?;
            }
            fmt_tabs(f, level)?;
            writeln!(f, "}}")?;
        } else {
            writeln!(f, ";")?;
        }
        return Ok(());
    }
}

impl Stmt {
    fn fmt_indent(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        match self {
            Self::Decl(decl) => decl.fmt_indent(f, level)?,
            Self::Expr(expr) => {
                fmt_tabs(f, level)?;
                writeln!(f, "{};", expr)?;
            }
            Self::IfElse {
                condition,
                body,
                else_body,
            } => {
                fmt_tabs(f, level)?;
                writeln!(f, "if ({})", condition)?;
                body.fmt_body(f, level)?;
                if let Some(else_body) = else_body {
                    fmt_tabs(f, level)?;
                    writeln!(f, "else")?;
                    else_body.fmt_body(f, level)?;
                }
            }
            Self::Block(stmts) => {
                fmt_tabs(f, level)?;
                writeln!(f, "{{")?;
                for stmt in stmts {
                    stmt.fmt_indent(f, level + 1)?;
                }
                fmt_tabs(f, level)?;
                writeln!(f, "}}")?;
            }
            Self::For {
                init,
                condition,
                next,
                body,
            } => {
                fmt_tabs(f, level)?;
                write!(f, "for(")?;
                if let Some(init) = init {
                    write!(f, "{}", init)?;
                }
                write!(f, ";")?;
                if let Some(condition) = condition {
                    write!(f, "{}", condition)?;
                }
                write!(f, ";")?;
                if let Some(next) = next {
                    write!(f, "{}", next)?;
                }
                writeln!(f, ")")?;
                body.fmt_body(f, level)?;
            }
            Self::Print(exprs) => {
                fmt_tabs(f, level)?;
                write!(f, "print ")?;
                fmt_expr_list(f, exprs)?;
                writeln!(f, ";")?;
            }
            Self::Return(expr) => {
                fmt_tabs(f, level)?;
                match expr {
                    Some(expr) => writeln!(f, "return {};", expr)?,
                    None => writeln!(f, "return;")?,
                }
            }
        }
        return Ok(());
    }

    // Blocks print at the same level as their header; single statements
    // indent one step.
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        match self {
            Self::Block(_) => self.fmt_indent(f, level),
            _ => self.fmt_indent(f, level + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ast_def::Expr;

    #[test]
    fn precedence_drives_parentheses() {
        let sum = Expr::binary(BinaryOp::Add, Expr::integer(1), Expr::integer(2));
        let product = Expr::binary(BinaryOp::Mul, sum, Expr::integer(3));
        assert_eq!(product.to_string(), "(1+2)*3");
    }

    #[test]
    fn equal_precedence_needs_no_parentheses() {
        let inner = Expr::binary(BinaryOp::Add, Expr::integer(1), Expr::integer(2));
        let outer = Expr::binary(BinaryOp::Add, inner, Expr::integer(3));
        assert_eq!(outer.to_string(), "1+2+3");
    }

    #[test]
    fn array_initializer_prints_elements() {
        let init = Expr::array_initializer(vec![
            Expr::integer(1),
            Expr::integer(2),
            Expr::integer(3),
        ]);
        assert_eq!(init.to_string(), "{1, 2, 3}");
    }

    #[test]
    fn function_type_prints_signature() {
        let ty = Type::function(
            Type::Integer,
            vec![Param::new("a", Type::Integer), Param::new("b", Type::String)],
        );
        assert_eq!(ty.to_string(), "function integer(a: integer, b: string)");
    }
}
