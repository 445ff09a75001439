//! Semantic analysis and code generation core for the cminor language.
//!
//! The scanner, parser and command-line driver live outside this crate; they
//! hand us an already-built [`ast::Program`] and run the passes in order:
//! name resolution, type checking, x86-64 code generation. The first two
//! passes aggregate diagnostics and report success as a boolean; the code
//! generator assumes a fully resolved and checked tree and fails hard on
//! backend capability limits.

pub mod ast;
pub mod codegen;
pub mod diagnostics;
pub mod resolver;
pub mod typechecker;

use std::io::Write;

pub use ast::{BinaryOp, Decl, Expr, Param, Program, Stmt, Type};
pub use codegen::{CodeGenerator, CodegenError, CodegenResult};
pub use diagnostics::Diagnostics;
pub use resolver::Resolver;
pub use typechecker::TypeChecker;

/// Run the full pipeline over `program`, emitting assembly into `out`.
///
/// Returns `Ok(false)` without emitting anything when resolution or type
/// checking reported errors; the diagnostics have already been printed.
/// `Err` carries a fatal code-generation failure.
pub fn compile_program<W: Write>(program: &mut Program, out: W) -> CodegenResult<bool> {
    let mut resolver = Resolver::new();
    if !resolver.resolve(program) {
        return Ok(false);
    }

    let mut checker = TypeChecker::new();
    if !checker.check(program) {
        return Ok(false);
    }

    let mut generator = CodeGenerator::new(out);
    generator.generate(program)?;
    return Ok(true);
}
