//! Name resolution: binds every name occurrence to a symbol, assigns
//! storage ordinals, and detects same-scope redeclaration.
//!
//! Errors are diagnosed and aggregated; the walk never stops early, so one
//! run reports every independent error.

pub mod scope;
pub mod symbol;

use std::rc::Rc;

use log::debug;

use crate::ast::{Decl, Expr, ExprKind, Param, Program, Stmt, Type};
use crate::diagnostics::Diagnostics;
use scope::ScopeStack;
use symbol::{Symbol, SymbolKind};

pub struct Resolver {
    scopes: ScopeStack,
    diagnostics: Diagnostics,
    // Ordinal counters for the function currently being resolved; shared
    // across its nested blocks.
    local_ordinal: usize,
    total_ordinal: usize,
    num_locals: usize,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            diagnostics: Diagnostics::new(),
            local_ordinal: 1,
            total_ordinal: 1,
            num_locals: 0,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Resolve the whole program inside a fresh global scope. Returns true
    /// iff no error was diagnosed anywhere in the tree.
    pub fn resolve(&mut self, program: &mut Program) -> bool {
        self.scopes.enter();
        let mut ok = true;
        for decl in &mut program.decls {
            ok = self.resolve_decl(decl) && ok;
        }
        self.scopes.exit();
        return ok;
    }

    fn resolve_decl(&mut self, d: &mut Decl) -> bool {
        let mut ok = true;

        let is_global = self.scopes.level() == 1;
        let symbol = if is_global {
            Rc::new(Symbol::new(SymbolKind::Global, d.ty.clone(), &d.name, 0, 0))
        } else {
            let s = Rc::new(Symbol::new(
                SymbolKind::Local,
                d.ty.clone(),
                &d.name,
                self.local_ordinal,
                self.total_ordinal,
            ));
            self.local_ordinal += 1;
            self.total_ordinal += 1;
            self.num_locals += 1;
            s
        };

        // Redeclaring a function with an identical signature models a
        // repeated prototype and is allowed; anything else in the same
        // frame is an error. The newer symbol rebinds either way.
        if let Some(prev) = self.scopes.lookup_current(&d.name) {
            if !(d.is_function() && d.ty.equals(&prev.ty)) {
                self.diagnostics.report(format!(
                    "resolve error: Redeclaration of variable \"{}\" ({}). Previous declaration was of type ({}).",
                    d.name, d.ty, prev.ty
                ));
                ok = false;
            }
        }
        self.scopes.bind(&d.name, Rc::clone(&symbol));
        d.symbol = Some(symbol);

        if let Some(value) = &mut d.value {
            ok = self.resolve_expr(value) && ok;
        }

        if let Some(code) = &mut d.code {
            self.scopes.enter();
            let saved = (self.local_ordinal, self.total_ordinal, self.num_locals);

            let mut param_count = 0;
            if let Type::Function { params, .. } = &mut d.ty {
                for (i, param) in params.iter_mut().enumerate() {
                    ok = Self::resolve_param(&mut self.scopes, &mut self.diagnostics, param, i + 1)
                        && ok;
                }
                param_count = params.len();
            }

            self.local_ordinal = 1;
            self.total_ordinal = param_count + 1;
            self.num_locals = 0;
            for stmt in code.iter_mut() {
                ok = self.resolve_stmt(stmt) && ok;
            }
            d.num_locals = self.num_locals;

            (self.local_ordinal, self.total_ordinal, self.num_locals) = saved;
            self.scopes.exit();
        }

        return ok;
    }

    fn resolve_param(
        scopes: &mut ScopeStack,
        diagnostics: &mut Diagnostics,
        param: &mut Param,
        ordinal: usize,
    ) -> bool {
        let mut ok = true;

        if let Some(prev) = scopes.lookup_current(&param.name) {
            diagnostics.report(format!(
                "resolve error: Redeclaration of variable \"{}\" ({}). Previous declaration was of type ({}).",
                param.name, param.ty, prev.ty
            ));
            ok = false;
        }

        let symbol = Rc::new(Symbol::new(
            SymbolKind::Param,
            param.ty.clone(),
            &param.name,
            ordinal,
            ordinal,
        ));
        scopes.bind(&param.name, Rc::clone(&symbol));
        param.symbol = Some(symbol);

        return ok;
    }

    fn resolve_stmt(&mut self, s: &mut Stmt) -> bool {
        match s {
            Stmt::Decl(decl) => self.resolve_decl(decl),
            Stmt::Expr(expr) => self.resolve_expr(expr),
            Stmt::IfElse {
                condition,
                body,
                else_body,
            } => {
                let mut ok = self.resolve_expr(condition);
                ok = self.resolve_stmt(body) && ok;
                if let Some(else_body) = else_body {
                    ok = self.resolve_stmt(else_body) && ok;
                }
                ok
            }
            Stmt::Block(stmts) => {
                self.scopes.enter();
                let mut ok = true;
                for stmt in stmts {
                    ok = self.resolve_stmt(stmt) && ok;
                }
                self.scopes.exit();
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
                    ok = self.resolve_expr(init) && ok;
                }
                if let Some(condition) = condition {
                    ok = self.resolve_expr(condition) && ok;
                }
                if let Some(next) = next {
                    ok = self.resolve_expr(next) && ok;
                }
                ok = self.resolve_stmt(body) && ok;
                ok
            }
            Stmt::Print(exprs) => {
                let mut ok = true;
                for expr in exprs {
                    ok = self.resolve_expr(expr) && ok;
                }
                ok
            }
            Stmt::Return(expr) => match expr {
                Some(expr) => self.resolve_expr(expr),
                None => true,
            },
        }
    }

    fn resolve_expr(&mut self, e: &mut Expr) -> bool {
        match &mut e.kind {
            ExprKind::Binary { left, right, .. } => {
                let ok = self.resolve_expr(left);
                self.resolve_expr(right) && ok
            }
            ExprKind::Neg(operand) | ExprKind::Not(operand) => self.resolve_expr(operand),
            ExprKind::Increment(target) | ExprKind::Decrement(target) => self.resolve_expr(target),
            ExprKind::Subscript { base, index } => {
                let ok = self.resolve_expr(base);
                self.resolve_expr(index) && ok
            }
            ExprKind::ArrayInitializer(elements) => {
                let mut ok = true;
                for element in elements {
                    ok = self.resolve_expr(element) && ok;
                }
                ok
            }
            ExprKind::Call { callee, args } => {
                let mut ok = self.resolve_expr(callee);
                for arg in args {
                    ok = self.resolve_expr(arg) && ok;
                }
                ok
            }
            ExprKind::Name { name, symbol } => match self.scopes.lookup(name) {
                Some(s) => {
                    match s.kind {
                        SymbolKind::Global => {
                            debug!("\"{}\" resolves to global {}", name, s.name);
                        }
                        SymbolKind::Local => {
                            debug!("\"{}\" resolves to local {}", name, s.which);
                        }
                        SymbolKind::Param => {
                            debug!("\"{}\" resolves to param {}", name, s.which);
                        }
                    }
                    *symbol = Some(s);
                    true
                }
                None => {
                    self.diagnostics
                        .report(format!("resolve error: \"{}\" is not defined", name));
                    false
                }
            },
            ExprKind::IntegerLiteral(_)
            | ExprKind::StringLiteral { .. }
            | ExprKind::CharLiteral(_)
            | ExprKind::BooleanLiteral(_) => true,
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
