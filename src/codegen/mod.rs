//! x86-64 code generation over a resolved, type-checked tree.
//!
//! Two passes: a globals pass fills the `.data` section (one entry per
//! global scalar/array plus a pooled label per string literal in function
//! bodies), then a text pass emits every global function. Expression
//! emission returns the scratch index holding the result; the caller frees
//! operand registers once combined.
//!
//! Failures here are backend capability limits, not language errors. They
//! abort generation through [`CodegenError`] instead of joining the
//! diagnostics stream.

pub mod label;
pub mod scratch;
pub mod writer;

use std::collections::HashMap;
use std::io::Write;

use lazy_static::lazy_static;
use thiserror::Error;

use crate::ast::{BinaryOp, Decl, Expr, ExprKind, Program, Stmt, Type};
use crate::typechecker::type_of;
use label::LabelAllocator;
use scratch::ScratchPool;
use writer::AsmWriter;

pub const ARGUMENT_REGISTERS: [&str; 6] = ["%rdi", "%rsi", "%rdx", "%rcx", "%r8", "%r9"];

const CALLEE_SAVED: [&str; 5] = ["%rbx", "%r12", "%r13", "%r14", "%r15"];

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("codegen error: Out of registers")]
    OutOfRegisters,
    #[error("codegen error: local arrays not implemented")]
    LocalArraysNotImplemented,
    #[error(
        "codegen error: too many arguments. Functions may not take more than {} arguments",
        ARGUMENT_REGISTERS.len()
    )]
    TooManyArguments,
    #[error("codegen error: cannot store to expression ({0})")]
    UnsupportedLvalue(String),
    #[error("codegen error: cannot call expression ({0})")]
    UnsupportedCallee(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CodegenResult<T> = Result<T, CodegenError>;

lazy_static! {
    // Checked print-argument type to runtime routine.
    static ref PRINT_ROUTINES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("boolean", "print_boolean");
        m.insert("integer", "print_integer");
        m.insert("char", "print_character");
        m.insert("string", "print_string");
        m
    };
}

pub struct CodeGenerator<W: Write> {
    writer: AsmWriter<W>,
    scratch: ScratchPool,
    labels: LabelAllocator,
}

impl<W: Write> CodeGenerator<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: AsmWriter::new(out),
            scratch: ScratchPool::new(),
            labels: LabelAllocator::new(),
        }
    }

    /// Emit the whole program: `.data` section, then `.text` section.
    ///
    /// Takes the tree mutably to record the data label assigned to each
    /// string literal; the text pass reads those labels back.
    pub fn generate(&mut self, program: &mut Program) -> CodegenResult<()> {
        self.writer.raw(".data")?;
        for decl in &mut program.decls {
            self.gen_global_data(decl)?;
        }

        self.writer.raw(".text")?;
        for decl in &program.decls {
            self.gen_global_text(decl)?;
        }
        return Ok(());
    }

    fn gen_global_data(&mut self, d: &mut Decl) -> CodegenResult<()> {
        match &d.ty {
            Type::Function { .. } => {
                // Functions contribute only the string literals pooled out
                // of their bodies.
                if let Some(code) = &mut d.code {
                    for stmt in code {
                        self.pool_stmt_strings(stmt)?;
                    }
                }
            }
            Type::Void => {}
            _ => {
                let directive = data_directive(&d.ty);
                let value = match &d.value {
                    Some(value) => literal_text(value),
                    None => default_value(&d.ty),
                };
                self.writer.data_entry(&d.name, directive, &value)?;
            }
        }
        return Ok(());
    }

    fn pool_stmt_strings(&mut self, s: &mut Stmt) -> CodegenResult<()> {
        match s {
            Stmt::Decl(decl) => {
                // Local initializers still carry string literals that need
                // data labels; the entry itself is stack-allocated.
                if let Some(value) = &mut decl.value {
                    self.pool_expr_strings(value)?;
                }
            }
            Stmt::Expr(expr) => self.pool_expr_strings(expr)?,
            Stmt::IfElse {
                condition,
                body,
                else_body,
            } => {
                self.pool_expr_strings(condition)?;
                self.pool_stmt_strings(body)?;
                if let Some(else_body) = else_body {
                    self.pool_stmt_strings(else_body)?;
                }
            }
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.pool_stmt_strings(stmt)?;
                }
            }
            Stmt::For {
                init,
                condition,
                next,
                body,
            } => {
                for expr in [init, condition, next].into_iter().flatten() {
                    self.pool_expr_strings(expr)?;
                }
                self.pool_stmt_strings(body)?;
            }
            Stmt::Print(exprs) => {
                for expr in exprs {
                    self.pool_expr_strings(expr)?;
                }
            }
            Stmt::Return(expr) => {
                if let Some(expr) = expr {
                    self.pool_expr_strings(expr)?;
                }
            }
        }
        return Ok(());
    }

    fn pool_expr_strings(&mut self, e: &mut Expr) -> CodegenResult<()> {
        match &mut e.kind {
            ExprKind::StringLiteral { value, label } => {
                let name = self.labels.string_label();
                self.writer.string_entry(&name, value)?;
                *label = Some(name);
            }
            ExprKind::Binary { left, right, .. } => {
                self.pool_expr_strings(left)?;
                self.pool_expr_strings(right)?;
            }
            ExprKind::Neg(operand) | ExprKind::Not(operand) => {
                self.pool_expr_strings(operand)?;
            }
            ExprKind::Increment(target) | ExprKind::Decrement(target) => {
                self.pool_expr_strings(target)?;
            }
            ExprKind::Subscript { base, index } => {
                self.pool_expr_strings(base)?;
                self.pool_expr_strings(index)?;
            }
            ExprKind::ArrayInitializer(elements) => {
                for element in elements {
                    self.pool_expr_strings(element)?;
                }
            }
            ExprKind::Call { callee, args } => {
                self.pool_expr_strings(callee)?;
                for arg in args {
                    self.pool_expr_strings(arg)?;
                }
            }
            ExprKind::Name { .. }
            | ExprKind::IntegerLiteral(_)
            | ExprKind::CharLiteral(_)
            | ExprKind::BooleanLiteral(_) => {}
        }
        return Ok(());
    }

    fn gen_global_text(&mut self, d: &Decl) -> CodegenResult<()> {
        let (params, code) = match (&d.ty, &d.code) {
            (Type::Function { params, .. }, Some(code)) => (params, code),
            _ => return Ok(()),
        };

        if params.len() > ARGUMENT_REGISTERS.len() {
            return Err(CodegenError::TooManyArguments);
        }

        self.writer.globl(&d.name)?;
        self.writer.label(&d.name)?;

        self.writer.pushq("%rbp")?;
        self.writer.movq("%rsp", "%rbp")?;

        // Parameters land in the first stack slots, in declaration order.
        for reg in ARGUMENT_REGISTERS.iter().take(params.len()) {
            self.writer.pushq(reg)?;
        }

        self.writer
            .op2("SUBQ", &format!("${}", 8 * d.num_locals), "%rsp")?;

        for reg in CALLEE_SAVED {
            self.writer.pushq(reg)?;
        }

        for stmt in code {
            self.gen_stmt(stmt, &d.name)?;
        }

        self.writer.label(&format!("{}_epilogue", d.name))?;

        for reg in CALLEE_SAVED.iter().rev() {
            self.writer.popq(reg)?;
        }

        self.writer.movq("%rbp", "%rsp")?;
        self.writer.popq("%rbp")?;
        self.writer.ret()?;
        return Ok(());
    }

    fn gen_stmt(&mut self, s: &Stmt, function_name: &str) -> CodegenResult<()> {
        match s {
            Stmt::Decl(decl) => {
                if matches!(decl.ty, Type::Array { .. }) {
                    return Err(CodegenError::LocalArraysNotImplemented);
                }
                if let Some(value) = &decl.value {
                    let r = self.gen_expr(value)?;
                    let location = match decl.symbol.as_deref() {
                        Some(symbol) => symbol.storage_location(),
                        None => String::new(),
                    };
                    self.writer.movq(ScratchPool::name(r), &location)?;
                    self.scratch.free(r);
                }
            }
            Stmt::Expr(expr) => {
                let r = self.gen_expr(expr)?;
                self.scratch.free(r);
            }
            Stmt::IfElse {
                condition,
                body,
                else_body,
            } => {
                let r = self.gen_expr(condition)?;
                let false_label = self.labels.jump_label();
                self.writer.cmp_imm(1, ScratchPool::name(r))?;
                self.writer.jump("JNE", &false_label)?;
                self.scratch.free(r);

                self.gen_stmt(body, function_name)?;
                match else_body {
                    Some(else_body) => {
                        let end_label = self.labels.jump_label();
                        self.writer.jump("JMP", &end_label)?;
                        self.writer.label(&false_label)?;
                        self.gen_stmt(else_body, function_name)?;
                        self.writer.label(&end_label)?;
                    }
                    None => {
                        self.writer.label(&false_label)?;
                    }
                }
            }
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.gen_stmt(stmt, function_name)?;
                }
            }
            Stmt::For {
                init,
                condition,
                next,
                body,
            } => {
                let top_label = self.labels.jump_label();
                let end_label = self.labels.jump_label();

                if let Some(init) = init {
                    let r = self.gen_expr(init)?;
                    self.scratch.free(r);
                }
                self.writer.label(&top_label)?;
                if let Some(condition) = condition {
                    let r = self.gen_expr(condition)?;
                    self.writer.cmp_imm(1, ScratchPool::name(r))?;
                    self.writer.jump("JNE", &end_label)?;
                    self.scratch.free(r);
                }
                self.gen_stmt(body, function_name)?;
                if let Some(next) = next {
                    let r = self.gen_expr(next)?;
                    self.scratch.free(r);
                }
                self.writer.jump("JMP", &top_label)?;
                self.writer.label(&end_label)?;
            }
            Stmt::Print(exprs) => {
                for expr in exprs {
                    let r = self.gen_expr(expr)?;
                    self.writer.movq(ScratchPool::name(r), ARGUMENT_REGISTERS[0])?;
                    if let Some(routine) = PRINT_ROUTINES.get(type_of(expr).to_string().as_str()) {
                        let result = self.call_runtime(routine)?;
                        self.scratch.free(result);
                    }
                    self.scratch.free(r);
                }
            }
            Stmt::Return(expr) => {
                if let Some(expr) = expr {
                    let r = self.gen_expr(expr)?;
                    self.writer.movq(ScratchPool::name(r), "%rax")?;
                    self.scratch.free(r);
                }
                self.writer.jump("JMP", &format!("{}_epilogue", function_name))?;
            }
        }
        return Ok(());
    }

    /// Emit one expression; the returned scratch index holds the result and
    /// belongs to the caller.
    fn gen_expr(&mut self, e: &Expr) -> CodegenResult<usize> {
        match &e.kind {
            ExprKind::Binary { op, left, right } => self.gen_binary(*op, left, right),
            ExprKind::Neg(operand) => {
                let r = self.gen_expr(operand)?;
                self.writer.movq("$-1", "%rax")?;
                self.writer.op1("IMULQ", ScratchPool::name(r))?;
                self.writer.movq("%rax", ScratchPool::name(r))?;
                Ok(r)
            }
            ExprKind::Not(operand) => {
                let r = self.gen_expr(operand)?;
                self.writer.op1("NOT", ScratchPool::name(r))?;
                self.writer.op2("AND", "$1", ScratchPool::name(r))?;
                Ok(r)
            }
            ExprKind::Increment(target) | ExprKind::Decrement(target) => {
                let op = match e.kind {
                    ExprKind::Increment(_) => "ADDQ",
                    _ => "SUBQ",
                };
                // Post-increment: the target register keeps the original
                // value, the bumped copy goes back to storage.
                let r = self.gen_expr(target)?;
                let tmp = self.scratch.alloc()?;
                self.writer.movq(ScratchPool::name(r), ScratchPool::name(tmp))?;
                self.writer.op2(op, "$1", ScratchPool::name(tmp))?;
                if let ExprKind::Subscript { base, index } = &target.kind {
                    // Element stores re-evaluate base and index, like
                    // assignment does.
                    let b = self.gen_expr(base)?;
                    let i = self.gen_expr(index)?;
                    let dst = format!("0({},{},8)", ScratchPool::name(b), ScratchPool::name(i));
                    self.writer.movq(ScratchPool::name(tmp), &dst)?;
                    self.scratch.free(b);
                    self.scratch.free(i);
                } else {
                    self.writer.movq(ScratchPool::name(tmp), &location_of(target)?)?;
                }
                self.scratch.free(tmp);
                Ok(r)
            }
            ExprKind::Subscript { base, index } => {
                let b = self.gen_expr(base)?;
                let i = self.gen_expr(index)?;
                let src = format!("0({},{},8)", ScratchPool::name(b), ScratchPool::name(i));
                self.writer.movq(&src, ScratchPool::name(i))?;
                self.scratch.free(b);
                Ok(i)
            }
            ExprKind::ArrayInitializer(_) => Err(CodegenError::LocalArraysNotImplemented),
            ExprKind::Name { .. } => {
                let r = self.scratch.alloc()?;
                self.writer.movq(&location_of(e)?, ScratchPool::name(r))?;
                Ok(r)
            }
            ExprKind::Call { callee, args } => self.gen_call(callee, args),
            ExprKind::IntegerLiteral(value) => {
                let r = self.scratch.alloc()?;
                self.writer.movq_imm(*value, ScratchPool::name(r))?;
                Ok(r)
            }
            ExprKind::StringLiteral { label, .. } => {
                let r = self.scratch.alloc()?;
                let name = label.as_deref().unwrap_or_default();
                self.writer.movq(&format!("${}", name), ScratchPool::name(r))?;
                Ok(r)
            }
            ExprKind::CharLiteral(value) => {
                let r = self.scratch.alloc()?;
                self.writer.movq_imm(*value as u32 as i64, ScratchPool::name(r))?;
                Ok(r)
            }
            ExprKind::BooleanLiteral(value) => {
                let r = self.scratch.alloc()?;
                self.writer.movq_imm(*value as i64, ScratchPool::name(r))?;
                Ok(r)
            }
        }
    }

    fn gen_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> CodegenResult<usize> {
        match op {
            BinaryOp::Assign => self.gen_assign(left, right),
            BinaryOp::Or | BinaryOp::And => {
                let l = self.gen_expr(left)?;
                let r = self.gen_expr(right)?;
                let mnemonic = if op == BinaryOp::Or { "OR" } else { "AND" };
                self.writer
                    .op2(mnemonic, ScratchPool::name(l), ScratchPool::name(r))?;
                self.writer.op2("AND", "$1", ScratchPool::name(r))?;
                self.scratch.free(l);
                Ok(r)
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let l = self.gen_expr(left)?;
                let r = self.gen_expr(right)?;
                let jcc = match op {
                    BinaryOp::Lt => "JL",
                    BinaryOp::Le => "JLE",
                    BinaryOp::Gt => "JG",
                    _ => "JGE",
                };
                self.materialize_comparison(jcc, l, r)
            }
            BinaryOp::Eq | BinaryOp::Ne => {
                let l = self.gen_expr(left)?;
                let r = self.gen_expr(right)?;
                let result = if matches!(type_of(right), Type::String) {
                    self.writer.movq(ScratchPool::name(l), ARGUMENT_REGISTERS[0])?;
                    self.writer.movq(ScratchPool::name(r), ARGUMENT_REGISTERS[1])?;
                    let result = self.call_runtime("string_equals")?;
                    self.scratch.free(l);
                    self.scratch.free(r);
                    result
                } else {
                    self.materialize_comparison("JE", l, r)?
                };
                if op == BinaryOp::Ne {
                    self.writer.op1("NOT", ScratchPool::name(result))?;
                    self.writer.op2("AND", "$1", ScratchPool::name(result))?;
                }
                Ok(result)
            }
            BinaryOp::Add => {
                let l = self.gen_expr(left)?;
                let r = self.gen_expr(right)?;
                self.writer
                    .op2("ADDQ", ScratchPool::name(l), ScratchPool::name(r))?;
                self.scratch.free(l);
                Ok(r)
            }
            BinaryOp::Sub => {
                let l = self.gen_expr(left)?;
                let r = self.gen_expr(right)?;
                self.writer
                    .op2("SUBQ", ScratchPool::name(r), ScratchPool::name(l))?;
                self.scratch.free(r);
                Ok(l)
            }
            BinaryOp::Mul => {
                let l = self.gen_expr(left)?;
                let r = self.gen_expr(right)?;
                self.writer.movq(ScratchPool::name(l), "%rax")?;
                self.writer.op1("IMULQ", ScratchPool::name(r))?;
                self.writer.movq("%rax", ScratchPool::name(r))?;
                self.scratch.free(l);
                Ok(r)
            }
            BinaryOp::Div => {
                let l = self.gen_expr(left)?;
                let r = self.gen_expr(right)?;
                self.writer.movq(ScratchPool::name(l), "%rax")?;
                self.writer.op0("CQO")?;
                self.writer.op1("IDIVQ", ScratchPool::name(r))?;
                self.writer.movq("%rax", ScratchPool::name(r))?;
                self.scratch.free(l);
                Ok(r)
            }
            BinaryOp::Mod => {
                let l = self.gen_expr(left)?;
                let r = self.gen_expr(right)?;
                self.writer.movq(ScratchPool::name(l), "%rax")?;
                self.writer.op0("CDQ")?;
                self.writer.op1("IDIVQ", ScratchPool::name(r))?;
                self.writer.movq("%rdx", ScratchPool::name(r))?;
                self.scratch.free(l);
                Ok(r)
            }
            BinaryOp::Exp => {
                let l = self.gen_expr(left)?;
                let r = self.gen_expr(right)?;
                self.writer.movq(ScratchPool::name(l), ARGUMENT_REGISTERS[0])?;
                self.writer.movq(ScratchPool::name(r), ARGUMENT_REGISTERS[1])?;
                let result = self.call_runtime("integer_power")?;
                self.scratch.free(l);
                self.scratch.free(r);
                Ok(result)
            }
        }
    }

    fn gen_assign(&mut self, target: &Expr, value: &Expr) -> CodegenResult<usize> {
        let r = self.gen_expr(value)?;
        if let ExprKind::Subscript { base, index } = &target.kind {
            let b = self.gen_expr(base)?;
            let i = self.gen_expr(index)?;
            let dst = format!("0({},{},8)", ScratchPool::name(b), ScratchPool::name(i));
            self.writer.movq(ScratchPool::name(r), &dst)?;
            self.scratch.free(b);
            self.scratch.free(i);
        } else {
            self.writer.movq(ScratchPool::name(r), &location_of(target)?)?;
        }
        return Ok(r);
    }

    // CMP right, left; taken branch materializes 1, fall-through 0. The
    // result lands in the right operand's register; the left is freed.
    fn materialize_comparison(&mut self, jcc: &str, l: usize, r: usize) -> CodegenResult<usize> {
        let true_label = self.labels.jump_label();
        let end_label = self.labels.jump_label();

        self.writer.cmp(ScratchPool::name(r), ScratchPool::name(l))?;
        self.writer.jump(jcc, &true_label)?;
        self.writer.movq_imm(0, ScratchPool::name(r))?;
        self.writer.jump("JMP", &end_label)?;
        self.writer.label(&true_label)?;
        self.writer.movq_imm(1, ScratchPool::name(r))?;
        self.writer.label(&end_label)?;

        self.scratch.free(l);
        return Ok(r);
    }

    fn gen_call(&mut self, callee: &Expr, args: &[Expr]) -> CodegenResult<usize> {
        let ExprKind::Name { name, .. } = &callee.kind else {
            return Err(CodegenError::UnsupportedCallee(callee.to_string()));
        };
        if args.len() > ARGUMENT_REGISTERS.len() {
            return Err(CodegenError::TooManyArguments);
        }

        // Arguments are evaluated right to left, then moved into the
        // argument registers left to right.
        let mut regs = vec![0usize; args.len()];
        for (i, arg) in args.iter().enumerate().rev() {
            regs[i] = self.gen_expr(arg)?;
        }
        for (i, r) in regs.iter().enumerate() {
            self.writer.movq(ScratchPool::name(*r), ARGUMENT_REGISTERS[i])?;
        }

        let result = self.call_runtime(name)?;
        for r in regs {
            self.scratch.free(r);
        }
        return Ok(result);
    }

    // %r10 and %r11 are scratch slots but caller-saved in the convention;
    // preserve them around every call.
    fn call_runtime(&mut self, name: &str) -> CodegenResult<usize> {
        self.writer.pushq("%r10")?;
        self.writer.pushq("%r11")?;
        self.writer.call(name)?;
        self.writer.popq("%r11")?;
        self.writer.popq("%r10")?;

        let r = self.scratch.alloc()?;
        self.writer.movq("%rax", ScratchPool::name(r))?;
        return Ok(r);
    }
}

fn location_of(e: &Expr) -> CodegenResult<String> {
    match e.symbol() {
        Some(symbol) => Ok(symbol.storage_location()),
        None => Err(CodegenError::UnsupportedLvalue(e.to_string())),
    }
}

fn data_directive(ty: &Type) -> &'static str {
    match ty {
        Type::String => ".string",
        Type::Array { element, .. } => data_directive(element),
        _ => ".quad",
    }
}

// Data-section text of a literal initializer. Checking already limited
// these to literals of the declared type.
fn literal_text(e: &Expr) -> String {
    match &e.kind {
        ExprKind::IntegerLiteral(value) => value.to_string(),
        ExprKind::CharLiteral(value) => (*value as u32).to_string(),
        ExprKind::StringLiteral { value, .. } => format!("\"{}\"", value),
        ExprKind::BooleanLiteral(value) => if *value { "1" } else { "0" }.to_string(),
        ExprKind::ArrayInitializer(elements) => elements
            .iter()
            .map(literal_text)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn default_value(ty: &Type) -> String {
    match ty {
        Type::String => "\"\"".to_string(),
        Type::Array { .. } => {
            let size = ty.size_literal().unwrap_or(0).max(0) as usize;
            vec!["0"; size].join(",")
        }
        _ => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(e: &Expr) -> (String, usize) {
        let mut buffer = Vec::new();
        let mut generator = CodeGenerator::new(&mut buffer);
        let r = generator.gen_expr(e).unwrap();
        let live = generator.scratch.live_count();
        drop(generator);
        (String::from_utf8(buffer).unwrap(), live)
    }

    #[test]
    fn integer_literal_loads_into_first_scratch() {
        let (text, live) = emit(&Expr::integer(5));
        assert_eq!(text, "MOVQ $5, %rbx\n");
        assert_eq!(live, 1);
    }

    #[test]
    fn addition_combines_into_right_operand_and_frees_left() {
        let e = Expr::binary(BinaryOp::Add, Expr::integer(1), Expr::integer(2));
        let (text, live) = emit(&e);
        assert_eq!(text, "MOVQ $1, %rbx\nMOVQ $2, %r10\nADDQ %rbx, %r10\n");
        assert_eq!(live, 1);
    }

    #[test]
    fn subtraction_keeps_the_left_operand_register() {
        let e = Expr::binary(BinaryOp::Sub, Expr::integer(7), Expr::integer(3));
        let (text, live) = emit(&e);
        assert_eq!(text, "MOVQ $7, %rbx\nMOVQ $3, %r10\nSUBQ %r10, %rbx\n");
        assert_eq!(live, 1);
    }

    #[test]
    fn less_than_branches_through_two_labels() {
        let e = Expr::binary(BinaryOp::Lt, Expr::integer(1), Expr::integer(2));
        let (text, _) = emit(&e);
        assert_eq!(
            text,
            "MOVQ $1, %rbx\nMOVQ $2, %r10\nCMP %r10, %rbx\nJL .L0\n\
             MOVQ $0, %r10\nJMP .L1\n.L0:\nMOVQ $1, %r10\n.L1:\n"
        );
    }

    #[test]
    fn not_equal_inverts_the_equality_result() {
        let e = Expr::binary(BinaryOp::Ne, Expr::integer(1), Expr::integer(2));
        let (text, _) = emit(&e);
        assert!(text.ends_with("NOT %r10\nAND $1, %r10\n"));
    }

    #[test]
    fn exponentiation_routes_through_the_runtime() {
        let e = Expr::binary(BinaryOp::Exp, Expr::integer(2), Expr::integer(10));
        let (text, live) = emit(&e);
        assert_eq!(
            text,
            "MOVQ $2, %rbx\nMOVQ $10, %r10\nMOVQ %rbx, %rdi\nMOVQ %r10, %rsi\n\
             PUSHQ %r10\nPUSHQ %r11\nCALL integer_power\nPOPQ %r11\nPOPQ %r10\n\
             MOVQ %rax, %r11\n"
        );
        assert_eq!(live, 1);
    }

    #[test]
    fn deeply_right_nested_additions_exhaust_the_pool() {
        // Right-leaning additions hold every partial result live at once;
        // depth eight needs an eighth concurrent register.
        let mut e = Expr::integer(0);
        for i in 1..=8 {
            e = Expr::binary(BinaryOp::Add, Expr::integer(i), e);
        }
        let mut buffer = Vec::new();
        let mut generator = CodeGenerator::new(&mut buffer);
        assert!(matches!(
            generator.gen_expr(&e),
            Err(CodegenError::OutOfRegisters)
        ));
    }

    #[test]
    fn array_defaults_join_zeros_by_declared_size() {
        let ty = Type::array(Type::Integer, Some(Expr::integer(4)));
        assert_eq!(default_value(&ty), "0,0,0,0");
        assert_eq!(data_directive(&ty), ".quad");
    }

    #[test]
    fn literal_text_renders_each_literal_kind() {
        assert_eq!(literal_text(&Expr::integer(42)), "42");
        assert_eq!(literal_text(&Expr::char_literal('a')), "97");
        assert_eq!(literal_text(&Expr::boolean(true)), "1");
        assert_eq!(literal_text(&Expr::string("hi")), "\"hi\"");
        let init =
            Expr::array_initializer(vec![Expr::integer(1), Expr::integer(2), Expr::integer(3)]);
        assert_eq!(literal_text(&init), "1, 2, 3");
    }
}
