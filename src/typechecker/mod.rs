//! Static type checking over a resolved tree.
//!
//! One post-order traversal: child types are computed first, the node's own
//! type is produced for its parent, and the errorless flag folds upward.
//! Every node yields some type so checking never aborts; a mismatch prints
//! one diagnostic and clears the flag.

use crate::ast::{BinaryOp, Decl, Expr, ExprKind, Program, Stmt, Type};
use crate::diagnostics::Diagnostics;
use crate::resolver::symbol::SymbolKind;

/// The outcome of checking one expression subtree: the type handed to the
/// parent, plus whether the subtree was diagnostic-free.
#[derive(Debug, Clone)]
pub struct CheckedType {
    pub ty: Type,
    pub errorless: bool,
}

impl CheckedType {
    fn ok(ty: Type) -> Self {
        Self {
            ty,
            errorless: true,
        }
    }
}

pub struct TypeChecker {
    diagnostics: Diagnostics,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self {
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Check every declaration. Returns true iff no error was diagnosed.
    pub fn check(&mut self, program: &Program) -> bool {
        let mut ok = true;
        for decl in &program.decls {
            ok = self.check_decl(decl) && ok;
        }
        return ok;
    }

    fn check_decl(&mut self, d: &Decl) -> bool {
        let mut ok = true;

        if let Some(value) = &d.value {
            let right = self.check_expr(value);

            if !d.ty.equals(&right.ty) {
                self.diagnostics.report(format!(
                    "type error: attempted to assign value of type {} ({}) to variable of type {} ({})",
                    right.ty, value, d.ty, d.name
                ));
                ok = false;
            } else if let Type::Array { .. } = right.ty {
                ok = self.check_array_decl(d, value, &right.ty) && ok;
            } else if self.is_global(d) && !value.is_literal() {
                // The data section can only render literal scalars; anything
                // else would need startup code this backend does not emit.
                self.diagnostics.report(format!(
                    "type error: global variable {} must be initialized with a constant value, not {}",
                    d.name, value
                ));
                ok = false;
            }

            ok = right.errorless && ok;
        }

        if let Some(code) = &d.code {
            let return_type = match &d.ty {
                Type::Function { return_type, .. } => (**return_type).clone(),
                _ => Type::Void,
            };
            for stmt in code {
                ok = self.check_stmt(stmt, &return_type) && ok;
            }
        }

        return ok;
    }

    fn is_global(&self, d: &Decl) -> bool {
        matches!(
            d.symbol.as_deref().map(|s| s.kind),
            Some(SymbolKind::Global)
        )
    }

    // The initializer's type already matched structurally; arrays still
    // carry size rules that equality deliberately ignores.
    fn check_array_decl(&mut self, d: &Decl, value: &Expr, right: &Type) -> bool {
        let mut ok = true;

        if self.is_global(d) {
            if d.ty.size_literal().is_none() {
                self.diagnostics.report(format!(
                    "type error: global array {} must have constant size, not {}",
                    d.name,
                    array_size_text(&d.ty)
                ));
                ok = false;
            } else if !matches!(value.kind, ExprKind::ArrayInitializer(_)) {
                self.diagnostics.report(format!(
                    "type error: global array {} must be initialized with a constant value, not {}",
                    d.name, value
                ));
                ok = false;
            } else {
                let declared = d.ty.size_literal().unwrap_or(0);
                let actual = right.size_literal().unwrap_or(0);
                if declared != actual {
                    self.diagnostics.report(format!(
                        "type error: global array {} with size {} cannot be initialized to size {} ({})",
                        d.name, declared, actual, value
                    ));
                    ok = false;
                }

                if let (Type::Array { element, .. }, ExprKind::ArrayInitializer(elements)) =
                    (&d.ty, &value.kind)
                {
                    ok = self.check_all_literal_elements(element, elements) && ok;
                }
            }
        } else if matches!(value.kind, ExprKind::ArrayInitializer(_)) {
            self.diagnostics.report(format!(
                "type error: cannot initialize local array {} with element list {}",
                d.name, value
            ));
            ok = false;
        } else if let (Some(declared), Some(actual)) = (d.ty.size_literal(), right.size_literal()) {
            if declared != actual {
                self.diagnostics.report(format!(
                    "type error: cannot assign array {} of size {} to array {} of size {}",
                    value, actual, d.name, declared
                ));
                ok = false;
            }
        }

        return ok;
    }

    fn check_all_literal_elements(&mut self, element_type: &Type, elements: &[Expr]) -> bool {
        let mut ok = true;
        for element in elements {
            let matches_kind = match (element_type, &element.kind) {
                (Type::Integer, ExprKind::IntegerLiteral(_)) => true,
                (Type::Character, ExprKind::CharLiteral(_)) => true,
                (Type::String, ExprKind::StringLiteral { .. }) => true,
                (Type::Boolean, ExprKind::BooleanLiteral(_)) => true,
                _ => false,
            };
            if !matches_kind {
                self.diagnostics.report(format!(
                    "type error: element {} must be a literal of type {}",
                    element, element_type
                ));
                ok = false;
            }
        }
        return ok;
    }

    fn check_stmt(&mut self, s: &Stmt, return_type: &Type) -> bool {
        match s {
            Stmt::Decl(decl) => self.check_decl(decl),
            Stmt::Expr(expr) => self.check_expr(expr).errorless,
            Stmt::IfElse {
                condition,
                body,
                else_body,
            } => {
                let cond = self.check_expr(condition);
                let mut ok = cond.errorless;
                if !matches!(cond.ty, Type::Boolean) {
                    self.diagnostics.report(format!(
                        "type error: must use a boolean in an condition for an if statement, not a {}",
                        cond.ty
                    ));
                    ok = false;
                }
                ok = self.check_stmt(body, return_type) && ok;
                if let Some(else_body) = else_body {
                    ok = self.check_stmt(else_body, return_type) && ok;
                }
                ok
            }
            Stmt::Block(stmts) => {
                let mut ok = true;
                for stmt in stmts {
                    ok = self.check_stmt(stmt, return_type) && ok;
                }
                ok
            }
            Stmt::For {
                init,
                condition,
                next,
                body,
            } => {
                let mut ok = true;
                if let Some(init) = init {
                    ok = self.check_expr(init).errorless && ok;
                }
                if let Some(condition) = condition {
                    let cond = self.check_expr(condition);
                    if !matches!(cond.ty, Type::Boolean) {
                        self.diagnostics.report(format!(
                            "type error: must use a boolean in middle expression of for loop, not a {}",
                            cond.ty
                        ));
                        ok = false;
                    }
                    ok = cond.errorless && ok;
                }
                if let Some(next) = next {
                    ok = self.check_expr(next).errorless && ok;
                }
                ok = self.check_stmt(body, return_type) && ok;
                ok
            }
            Stmt::Print(exprs) => {
                let mut ok = true;
                for expr in exprs {
                    let t = self.check_expr(expr);
                    if !t.ty.is_printable() {
                        self.diagnostics.report(format!(
                            "type error: cannot print expression of type {} ({}). Only boolean, integer, character, and string are allowed.",
                            t.ty, expr
                        ));
                        ok = false;
                    }
                    ok = t.errorless && ok;
                }
                ok
            }
            Stmt::Return(expr) => match expr {
                Some(expr) => {
                    let t = self.check_expr(expr);
                    let mut ok = t.errorless;
                    if !t.ty.equals(return_type) {
                        self.diagnostics.report(format!(
                            "type error: cannot return expression ({}) of type {} from function with return type {}",
                            expr, t.ty, return_type
                        ));
                        ok = false;
                    }
                    ok
                }
                None => {
                    if matches!(return_type, Type::Void) {
                        true
                    } else {
                        self.diagnostics.report(format!(
                            "type error: cannot return without a value from function with return type {}",
                            return_type
                        ));
                        false
                    }
                }
            },
        }
    }

    /// Check one expression subtree and produce the type seen by its parent.
    pub fn check_expr(&mut self, e: &Expr) -> CheckedType {
        match &e.kind {
            ExprKind::Binary { op, left, right } => self.check_binary(*op, left, right),
            ExprKind::Neg(operand) => {
                let t = self.check_expr(operand);
                let mut errorless = t.errorless;
                if !matches!(t.ty, Type::Integer) {
                    self.diagnostics.report(format!(
                        "type error: cannot take the opposite of an expression of type {} ({})",
                        t.ty, operand
                    ));
                    errorless = false;
                }
                CheckedType {
                    ty: Type::Integer,
                    errorless,
                }
            }
            ExprKind::Not(operand) => {
                let t = self.check_expr(operand);
                let mut errorless = t.errorless;
                if !matches!(t.ty, Type::Boolean) {
                    self.diagnostics.report(format!(
                        "type error: cannot negate an expression of type {} ({})",
                        t.ty, operand
                    ));
                    errorless = false;
                }
                CheckedType {
                    ty: Type::Boolean,
                    errorless,
                }
            }
            ExprKind::Increment(target) | ExprKind::Decrement(target) => {
                let token = match e.kind {
                    ExprKind::Increment(_) => "++",
                    _ => "--",
                };
                let t = self.check_expr(target);
                let mut errorless = t.errorless;
                if !matches!(t.ty, Type::Integer) {
                    self.diagnostics.report(format!(
                        "type error: cannot perform {} operation on expression of type {} ({})",
                        token, t.ty, target
                    ));
                    errorless = false;
                }
                CheckedType {
                    ty: Type::Integer,
                    errorless,
                }
            }
            ExprKind::Subscript { base, index } => {
                let lt = self.check_expr(base);
                let rt = self.check_expr(index);
                let mut errorless = lt.errorless && rt.errorless;

                if !matches!(lt.ty, Type::Array { .. }) {
                    self.diagnostics.report(format!(
                        "type error: cannot subscript expression of type {} ({})",
                        lt.ty, base
                    ));
                    errorless = false;
                }
                if !matches!(rt.ty, Type::Integer) {
                    self.diagnostics.report(format!(
                        "type error: subscript value must be an integer literal rather than a {} ({})",
                        rt.ty, index
                    ));
                    errorless = false;
                }

                // Keep checking alive above a bad base: hand back whatever
                // type we do have.
                let ty = match lt.ty {
                    Type::Array { element, .. } => *element,
                    other => other,
                };
                CheckedType { ty, errorless }
            }
            ExprKind::ArrayInitializer(elements) => {
                let mut checked = Vec::with_capacity(elements.len());
                for element in elements {
                    checked.push(self.check_expr(element));
                }
                let mut errorless = checked.iter().all(|c| c.errorless);

                let first_ty = checked.first().map(|c| c.ty.clone()).unwrap_or(Type::Void);
                for (element, c) in elements.iter().zip(&checked).skip(1) {
                    if !c.ty.equals(&first_ty) {
                        self.diagnostics.report(format!(
                            "type error: element in array initializer of type {} ({}) does not match type of first element, which is {} ({})",
                            c.ty, element, first_ty, elements[0]
                        ));
                        errorless = false;
                    }
                }

                CheckedType {
                    ty: Type::array(first_ty, Some(Expr::integer(elements.len() as i64))),
                    errorless,
                }
            }
            ExprKind::Name { symbol, .. } => match symbol {
                Some(symbol) => CheckedType::ok(symbol.ty.clone()),
                // Unreachable after a successful resolve pass; stay total.
                None => CheckedType {
                    ty: Type::Void,
                    errorless: false,
                },
            },
            ExprKind::Call { callee, args } => self.check_call(callee, args),
            ExprKind::IntegerLiteral(_) => CheckedType::ok(Type::Integer),
            ExprKind::StringLiteral { .. } => CheckedType::ok(Type::String),
            ExprKind::CharLiteral(_) => CheckedType::ok(Type::Character),
            ExprKind::BooleanLiteral(_) => CheckedType::ok(Type::Boolean),
        }
    }

    fn check_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> CheckedType {
        let lt = self.check_expr(left);
        let rt = self.check_expr(right);
        let mut errorless = lt.errorless && rt.errorless;

        let ty = match op {
            BinaryOp::Assign => {
                if !lt.ty.equals(&rt.ty) {
                    self.diagnostics.report(format!(
                        "type error: cannot assign expression of type {} ({}) to variable of type {} ({})",
                        rt.ty, right, lt.ty, left
                    ));
                    errorless = false;
                }
                rt.ty.clone()
            }
            BinaryOp::Or | BinaryOp::And => {
                if !matches!(lt.ty, Type::Boolean) || !matches!(rt.ty, Type::Boolean) {
                    self.report_operand_pair(op, &lt.ty, left, &rt.ty, right);
                    errorless = false;
                }
                Type::Boolean
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                if !matches!(lt.ty, Type::Integer) || !matches!(rt.ty, Type::Integer) {
                    self.report_operand_pair(op, &lt.ty, left, &rt.ty, right);
                    errorless = false;
                }
                Type::Boolean
            }
            BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::Exp => {
                if !matches!(lt.ty, Type::Integer) || !matches!(rt.ty, Type::Integer) {
                    self.report_operand_pair(op, &lt.ty, left, &rt.ty, right);
                    errorless = false;
                }
                Type::Integer
            }
            BinaryOp::Eq | BinaryOp::Ne => {
                if !lt.ty.equals(&rt.ty) {
                    self.diagnostics.report(format!(
                        "type error: cannot perform {} operation on mismatching types {} ({}) and {} ({})",
                        op, lt.ty, left, rt.ty, right
                    ));
                    errorless = false;
                }
                for (t, operand) in [(&lt.ty, left), (&rt.ty, right)] {
                    if !is_comparable(t) {
                        self.diagnostics.report(format!(
                            "type error: cannot perform {} operation on expression of type {} ({})",
                            op, t, operand
                        ));
                        errorless = false;
                    }
                }
                Type::Boolean
            }
        };

        CheckedType { ty, errorless }
    }

    fn report_operand_pair(&mut self, op: BinaryOp, lt: &Type, left: &Expr, rt: &Type, right: &Expr) {
        self.diagnostics.report(format!(
            "type error: cannot perform {} operation on types {} ({}) and {} ({})",
            op, lt, left, rt, right
        ));
    }

    fn check_call(&mut self, callee: &Expr, args: &[Expr]) -> CheckedType {
        let lt = self.check_expr(callee);
        let mut errorless = lt.errorless;

        let (return_type, params) = match &lt.ty {
            Type::Function {
                return_type,
                params,
            } => ((**return_type).clone(), params.clone()),
            other => {
                self.diagnostics.report(format!(
                    "type error: cannot call expression of type {} ({})",
                    other, callee
                ));
                return CheckedType {
                    ty: other.clone(),
                    errorless: false,
                };
            }
        };

        for (param, arg) in params.iter().zip(args) {
            let t = self.check_expr(arg);
            errorless = t.errorless && errorless;
            if !param.ty.equals(&t.ty) {
                self.diagnostics.report(format!(
                    "type error: expression of type {} ({}) does not match parameter of type {}",
                    t.ty, arg, param.ty
                ));
                errorless = false;
            }
        }

        // Arity mismatches get exactly one diagnostic, at the first
        // unmatched position.
        if args.len() > params.len() {
            self.diagnostics.report(format!(
                "type error: extra expression given in function call ({})",
                args[params.len()]
            ));
            errorless = false;
        } else if params.len() > args.len() {
            self.diagnostics.report(format!(
                "type error: parameter of type {} missing from function call",
                params[args.len()].ty
            ));
            errorless = false;
        }

        CheckedType {
            ty: return_type,
            errorless,
        }
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn array_size_text(ty: &Type) -> String {
    match ty {
        Type::Array {
            size: Some(size), ..
        } => size.to_string(),
        _ => String::new(),
    }
}

fn is_comparable(t: &Type) -> bool {
    matches!(
        t,
        Type::Integer | Type::Character | Type::String | Type::Boolean
    )
}

/// Recompute the type of a checked expression without diagnostics.
///
/// The code generator needs type queries (string equality routing, print
/// routine selection) after checking has already succeeded; this re-query
/// assumes a resolved, well-typed tree.
pub fn type_of(e: &Expr) -> Type {
    match &e.kind {
        ExprKind::Binary { op, left: _, right } => match op {
            BinaryOp::Assign => type_of(right),
            BinaryOp::Or
            | BinaryOp::And
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::Eq
            | BinaryOp::Ne => Type::Boolean,
            BinaryOp::Add
            | BinaryOp::Sub
            | BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::Exp => Type::Integer,
        },
        ExprKind::Neg(_) | ExprKind::Increment(_) | ExprKind::Decrement(_) => Type::Integer,
        ExprKind::Not(_) => Type::Boolean,
        ExprKind::Subscript { base, .. } => match type_of(base) {
            Type::Array { element, .. } => *element,
            other => other,
        },
        ExprKind::ArrayInitializer(elements) => {
            let element = elements.first().map(type_of).unwrap_or(Type::Void);
            Type::array(element, Some(Expr::integer(elements.len() as i64)))
        }
        ExprKind::Name { symbol, .. } => match symbol {
            Some(symbol) => symbol.ty.clone(),
            None => Type::Void,
        },
        ExprKind::Call { callee, .. } => match type_of(callee) {
            Type::Function { return_type, .. } => *return_type,
            other => other,
        },
        ExprKind::IntegerLiteral(_) => Type::Integer,
        ExprKind::StringLiteral { .. } => Type::String,
        ExprKind::CharLiteral(_) => Type::Character,
        ExprKind::BooleanLiteral(_) => Type::Boolean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    #[test]
    fn arithmetic_on_integers_yields_integer() {
        let mut checker = TypeChecker::new();
        let e = Expr::binary(BinaryOp::Add, Expr::integer(1), Expr::integer(2));
        let t = checker.check_expr(&e);
        assert!(matches!(t.ty, Type::Integer));
        assert!(t.errorless);
    }

    #[test]
    fn boolean_operator_rejects_integers_but_stays_boolean() {
        let mut checker = TypeChecker::new();
        let e = Expr::binary(BinaryOp::And, Expr::integer(1), Expr::integer(2));
        let t = checker.check_expr(&e);
        assert!(matches!(t.ty, Type::Boolean));
        assert!(!t.errorless);
        assert_eq!(checker.diagnostics().len(), 1);
    }

    #[test]
    fn equality_on_mismatching_types_is_one_error() {
        let mut checker = TypeChecker::new();
        let e = Expr::binary(BinaryOp::Eq, Expr::integer(1), Expr::boolean(true));
        let t = checker.check_expr(&e);
        assert!(matches!(t.ty, Type::Boolean));
        assert!(!t.errorless);
        assert_eq!(checker.diagnostics().len(), 1);
    }

    #[test]
    fn errors_propagate_upward_without_cascading_diagnostics() {
        let mut checker = TypeChecker::new();
        // The inner negation misuse is the only error; the outer addition
        // sees two integers and stays silent.
        let bad = Expr::neg(Expr::boolean(true));
        let e = Expr::binary(BinaryOp::Add, bad, Expr::integer(2));
        let t = checker.check_expr(&e);
        assert!(matches!(t.ty, Type::Integer));
        assert!(!t.errorless);
        assert_eq!(checker.diagnostics().len(), 1);
    }

    #[test]
    fn array_initializer_takes_first_element_type_and_count() {
        let mut checker = TypeChecker::new();
        let e = Expr::array_initializer(vec![Expr::integer(1), Expr::integer(2), Expr::integer(3)]);
        let t = checker.check_expr(&e);
        assert!(t.errorless);
        assert_eq!(t.ty.size_literal(), Some(3));
        match &t.ty {
            Type::Array { element, .. } => assert!(matches!(**element, Type::Integer)),
            other => panic!("expected array type, got {}", other),
        }
    }

    #[test]
    fn silent_requery_matches_checked_type() {
        let e = Expr::binary(
            BinaryOp::Lt,
            Expr::integer(1),
            Expr::binary(BinaryOp::Mul, Expr::integer(2), Expr::integer(3)),
        );
        assert!(matches!(type_of(&e), Type::Boolean));
    }
}
