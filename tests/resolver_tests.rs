use cminor::resolver::symbol::SymbolKind;
use cminor::{Decl, Expr, Param, Program, Resolver, Stmt, Type};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn inner_local_shadows_the_global_binding() {
    init_logging();
    let mut program = Program::new(vec![
        Decl::variable("x", Type::Integer, None),
        Decl::function(
            "f",
            Type::Void,
            Vec::new(),
            Some(vec![Stmt::Block(vec![
                Stmt::Decl(Decl::variable("x", Type::Boolean, None)),
                Stmt::Expr(Expr::name("x")),
            ])]),
        ),
    ]);

    let mut resolver = Resolver::new();
    assert!(resolver.resolve(&mut program));

    let code = program.decls[1].code.as_ref().unwrap();
    let Stmt::Block(stmts) = &code[0] else {
        panic!("expected block");
    };
    let Stmt::Expr(use_of_x) = &stmts[1] else {
        panic!("expected expression statement");
    };
    let symbol = use_of_x.symbol().unwrap();
    assert!(matches!(symbol.kind, SymbolKind::Local));
    assert!(matches!(symbol.ty, Type::Boolean));
}

#[test]
fn use_after_the_scope_exits_reverts_to_the_global() {
    init_logging();
    let mut program = Program::new(vec![
        Decl::variable("x", Type::Integer, None),
        Decl::function(
            "f",
            Type::Void,
            Vec::new(),
            Some(vec![
                Stmt::Block(vec![Stmt::Decl(Decl::variable("x", Type::Boolean, None))]),
                Stmt::Expr(Expr::name("x")),
            ]),
        ),
    ]);

    let mut resolver = Resolver::new();
    assert!(resolver.resolve(&mut program));

    let code = program.decls[1].code.as_ref().unwrap();
    let Stmt::Expr(use_of_x) = &code[1] else {
        panic!("expected expression statement");
    };
    assert!(matches!(
        use_of_x.symbol().unwrap().kind,
        SymbolKind::Global
    ));
}

#[test]
fn identical_function_prototypes_may_repeat() {
    init_logging();
    let mut program = Program::new(vec![
        Decl::function("f", Type::Integer, vec![Param::new("a", Type::Integer)], None),
        Decl::function("f", Type::Integer, vec![Param::new("b", Type::Integer)], None),
    ]);

    let mut resolver = Resolver::new();
    assert!(resolver.resolve(&mut program));
    assert!(resolver.diagnostics().is_empty());
}

#[test]
fn redeclaring_with_a_different_signature_is_an_error() {
    init_logging();
    let mut program = Program::new(vec![
        Decl::function("f", Type::Integer, vec![Param::new("a", Type::Integer)], None),
        Decl::function("f", Type::Integer, vec![Param::new("a", Type::Boolean)], None),
    ]);

    let mut resolver = Resolver::new();
    assert!(!resolver.resolve(&mut program));
    assert_eq!(resolver.diagnostics().len(), 1);
    assert_eq!(
        resolver.diagnostics().messages()[0],
        "resolve error: Redeclaration of variable \"f\" (function integer(a: boolean)). \
         Previous declaration was of type (function integer(a: integer))."
    );
}

#[test]
fn redeclaring_a_variable_in_the_same_scope_is_an_error() {
    init_logging();
    let mut program = Program::new(vec![
        Decl::variable("x", Type::Integer, None),
        Decl::variable("x", Type::Boolean, None),
    ]);

    let mut resolver = Resolver::new();
    assert!(!resolver.resolve(&mut program));
    assert_eq!(
        resolver.diagnostics().messages()[0],
        "resolve error: Redeclaration of variable \"x\" (boolean). \
         Previous declaration was of type (integer)."
    );
}

#[test]
fn undefined_names_are_diagnosed_and_resolution_continues() {
    init_logging();
    let mut program = Program::new(vec![Decl::function(
        "f",
        Type::Void,
        Vec::new(),
        Some(vec![
            Stmt::Expr(Expr::name("y")),
            Stmt::Expr(Expr::name("z")),
        ]),
    )]);

    let mut resolver = Resolver::new();
    assert!(!resolver.resolve(&mut program));
    assert_eq!(resolver.diagnostics().len(), 2);
    assert_eq!(
        resolver.diagnostics().messages()[0],
        "resolve error: \"y\" is not defined"
    );
    assert_eq!(
        resolver.diagnostics().messages()[1],
        "resolve error: \"z\" is not defined"
    );
}

#[test]
fn ordinals_run_function_wide_across_nested_blocks() {
    init_logging();
    let mut program = Program::new(vec![Decl::function(
        "f",
        Type::Void,
        vec![
            Param::new("a", Type::Integer),
            Param::new("b", Type::Integer),
        ],
        Some(vec![
            Stmt::Decl(Decl::variable("x", Type::Integer, None)),
            Stmt::Block(vec![Stmt::Decl(Decl::variable("y", Type::Integer, None))]),
            Stmt::Decl(Decl::variable("z", Type::Integer, None)),
        ]),
    )]);

    let mut resolver = Resolver::new();
    assert!(resolver.resolve(&mut program));

    let d = &program.decls[0];
    assert_eq!(d.num_locals, 3);

    let Type::Function { params, .. } = &d.ty else {
        panic!("expected function type");
    };
    let a = params[0].symbol.as_ref().unwrap();
    let b = params[1].symbol.as_ref().unwrap();
    assert_eq!((a.which, a.which_total), (1, 1));
    assert_eq!((b.which, b.which_total), (2, 2));

    let code = d.code.as_ref().unwrap();
    let Stmt::Decl(x) = &code[0] else { panic!() };
    let Stmt::Block(inner) = &code[1] else { panic!() };
    let Stmt::Decl(y) = &inner[0] else { panic!() };
    let Stmt::Decl(z) = &code[2] else { panic!() };

    let x = x.symbol.as_ref().unwrap();
    let y = y.symbol.as_ref().unwrap();
    let z = z.symbol.as_ref().unwrap();
    assert_eq!((x.which, x.which_total), (1, 3));
    assert_eq!((y.which, y.which_total), (2, 4));
    assert_eq!((z.which, z.which_total), (3, 5));
    assert_eq!(z.storage_location(), "-40(%rbp)");
}

#[test]
fn each_function_restarts_its_ordinal_counters() {
    init_logging();
    let mut program = Program::new(vec![
        Decl::function(
            "f",
            Type::Void,
            vec![Param::new("a", Type::Integer)],
            Some(vec![Stmt::Decl(Decl::variable("x", Type::Integer, None))]),
        ),
        Decl::function(
            "g",
            Type::Void,
            Vec::new(),
            Some(vec![Stmt::Decl(Decl::variable("x", Type::Integer, None))]),
        ),
    ]);

    let mut resolver = Resolver::new();
    assert!(resolver.resolve(&mut program));

    let f_code = program.decls[0].code.as_ref().unwrap();
    let Stmt::Decl(fx) = &f_code[0] else { panic!() };
    assert_eq!(fx.symbol.as_ref().unwrap().which_total, 2);

    let g_code = program.decls[1].code.as_ref().unwrap();
    let Stmt::Decl(gx) = &g_code[0] else { panic!() };
    assert_eq!(gx.symbol.as_ref().unwrap().which_total, 1);
}
