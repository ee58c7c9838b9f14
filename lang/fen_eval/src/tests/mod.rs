//! End-to-end tests: source text through lexer, parser and runtime.

use crate::errors::EvalErrorKind;
use crate::{EvalError, Interpreter};
use fen_ir::{SharedArena, SharedInterner};
use pretty_assertions::assert_eq;

fn run(source: &str) -> Result<String, EvalError> {
    let interner = SharedInterner::new();
    let tokens = match fen_lexer::lex(source, &interner) {
        Ok(tokens) => tokens,
        Err(e) => panic!("lex failed: {e}"),
    };
    let (module, arena) = match fen_parse::parse_module(&tokens, &interner) {
        Ok(parsed) => parsed,
        Err(e) => panic!("parse failed: {e}"),
    };
    let arena = SharedArena::new(arena);
    let mut interp = Interpreter::new(interner);
    interp.install(&arena, &module)?;
    interp.run_main()
}

fn run_ok(source: &str) -> String {
    match run(source) {
        Ok(out) => out,
        Err(e) => panic!("program failed: {e}"),
    }
}

#[test]
fn arithmetic_with_precedence() {
    assert_eq!(run_ok("fn main = 1 + 2 * 3"), "7");
    assert_eq!(run_ok("fn main = (1 + 2) * 3"), "9");
    assert_eq!(run_ok("fn main = 10 - 2 - 3"), "5");
}

#[test]
fn numeric_promotion() {
    assert_eq!(run_ok("fn main = 1 + 2"), "3");
    assert_eq!(run_ok("fn main = 1 + 2.5"), "3.5");
    assert_eq!(run_ok("fn main = 4 / 2"), "2.0");
    assert_eq!(run_ok("fn main = 7 / 2"), "3.5");
}

#[test]
fn division_by_zero_fails() {
    let err = match run("fn main = 1 / 0") {
        Ok(out) => panic!("expected failure, got {out}"),
        Err(e) => e,
    };
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
}

#[test]
fn currying_through_user_functions() {
    let source = "\
fn add a b = a + b
fn add3 = add 3
fn main = add3 4
";
    assert_eq!(run_ok(source), "7");
}

#[test]
fn functions_are_first_class() {
    let source = "\
fn apply2 f x = f (f x)
fn succ n = n + 1
fn main = apply2 succ 5
";
    assert_eq!(run_ok(source), "7");
}

#[test]
fn nested_scopes_resolve_the_nearest_binding() {
    let source = "\
fn x = 100
fn bump x = x + 1
fn main = bump 5
";
    assert_eq!(run_ok(source), "6");
}

#[test]
fn unresolved_names_fail() {
    let err = match run("fn main = ghost") {
        Ok(out) => panic!("expected failure, got {out}"),
        Err(e) => e,
    };
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "ghost".to_owned()
        }
    );
}

#[test]
fn conditionals_are_lazy() {
    assert_eq!(run_ok("fn main = if true then 1 else ghost"), "1");
    assert_eq!(run_ok("fn main = if false then ghost else 2"), "2");
}

#[test]
fn conditions_use_value_truthiness() {
    assert_eq!(run_ok("fn main = if 0 then 1 else 2"), "2");
    assert_eq!(run_ok("fn main = if 0.0 then 1 else 2"), "2");
    assert_eq!(run_ok("fn main = if 5 then 1 else 2"), "1");
    assert_eq!(run_ok("fn main = if () then 1 else 2"), "2");
}

#[test]
fn comparisons_and_equality() {
    assert_eq!(run_ok("fn main = if 3 > 2 then 1 else 0"), "1");
    assert_eq!(run_ok("fn main = if 2 >= 2 then 1 else 0"), "1");
    assert_eq!(run_ok("fn main = if 1 == 1.0 then 1 else 0"), "1");
    assert_eq!(run_ok("fn main = if 1 != true then 1 else 0"), "1");
}

#[test]
fn void_and_booleans_display() {
    assert_eq!(run_ok("fn main = ()"), "()");
    assert_eq!(run_ok("fn main = true"), "true");
    assert_eq!(run_ok("fn main = 2.0"), "2.0");
}

#[test]
fn deep_recursion_runs_on_the_trampoline() {
    // Tens of thousands of self-calls: each one defers to a partial that
    // the trampoline unwinds iteratively, with collections every few
    // hundred steps keeping the heap bounded.
    let source = "\
fn countdown n = if n == 0 then 0 else countdown (n - 1)
fn main = countdown 50000
";
    let interner = SharedInterner::new();
    let tokens = match fen_lexer::lex(source, &interner) {
        Ok(tokens) => tokens,
        Err(e) => panic!("lex failed: {e}"),
    };
    let (module, arena) = match fen_parse::parse_module(&tokens, &interner) {
        Ok(parsed) => parsed,
        Err(e) => panic!("parse failed: {e}"),
    };
    let arena = SharedArena::new(arena);
    let mut interp = Interpreter::new(interner);
    match interp.install(&arena, &module) {
        Ok(()) => {}
        Err(e) => panic!("install failed: {e}"),
    }
    let out = match interp.run_main() {
        Ok(out) => out,
        Err(e) => panic!("run failed: {e}"),
    };
    assert_eq!(out, "0");
    // The chain allocated tens of thousands of values; almost all of them
    // must have been reclaimed along the way.
    assert!(interp.heap().live_count() < 2048);
}

#[test]
fn recursion_with_accumulation() {
    let source = "\
fn sum n = if n == 0 then 0 else n + sum (n - 1)
fn main = sum 100
";
    assert_eq!(run_ok(source), "5050");
}

#[test]
fn mutually_recursive_bindings() {
    let source = "\
fn even n = if n == 0 then true else odd (n - 1)
fn odd n = if n == 0 then false else even (n - 1)
fn main = even 10
";
    assert_eq!(run_ok(source), "true");
}

#[test]
fn comments_are_ignored() {
    let source = "\
; a program
fn main = 3 ; trailing note
";
    assert_eq!(run_ok(source), "3");
}
